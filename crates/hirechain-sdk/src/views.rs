//! View gating helpers
//!
//! Pure functions deciding which affordances a view may offer. These are
//! advisory only — the backend re-validates every transition — but keeping
//! them in one place makes the branching exhaustive over [`ProfileType`]
//! and [`GigStatus`] instead of scattered string comparisons.

use hirechain_client::{
    Gig, GigStatus, Invitation, InvitationFilter, InvitationStatus, Profile, ProfileStats,
    ProfileType, UserProfileData,
};

/// Actions a view may offer on an invitation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvitationAction {
    Accept,
    Reject,
}

/// Accept/Reject are offered only while the invitation is pending; the
/// transition is irreversible from the client's perspective.
pub fn invitation_actions(status: InvitationStatus) -> &'static [InvitationAction] {
    match status {
        InvitationStatus::Pending => &[InvitationAction::Accept, InvitationAction::Reject],
        InvitationStatus::Accepted | InvitationStatus::Rejected => &[],
    }
}

/// Filter an invitation list for display.
pub fn filter_invitations<'a>(
    invitations: &'a [Invitation],
    filter: InvitationFilter,
) -> Vec<&'a Invitation> {
    invitations
        .iter()
        .filter(|invitation| filter.matches(invitation.status))
        .collect()
}

/// Actions a view may offer on a gig detail page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GigAction {
    AcceptInvitation,
    DeclineInvitation,
    Apply,
    MarkCompleted,
    RequestExtension,
    MakePayment,
}

/// Which actions the viewer gets on a gig.
///
/// `invitation` is the viewer's invitation status for this gig, when one
/// exists. No action ever moves a gig backward in its lifecycle.
pub fn gig_actions(
    viewer: &Profile,
    gig: &Gig,
    invitation: Option<InvitationStatus>,
) -> Vec<GigAction> {
    let viewer_account = &viewer.user_account_id;

    match viewer.profile_type {
        ProfileType::Freelancer => {
            let assigned_to_viewer = gig.assigned_freelancer_id.as_ref() == Some(viewer_account);

            match gig.status {
                GigStatus::Open => match invitation {
                    Some(InvitationStatus::Pending) => {
                        vec![GigAction::AcceptInvitation, GigAction::DeclineInvitation]
                    }
                    Some(InvitationStatus::Accepted) | Some(InvitationStatus::Rejected) => {
                        Vec::new()
                    }
                    None if gig.assigned_freelancer_id.is_none() => vec![GigAction::Apply],
                    None => Vec::new(),
                },
                GigStatus::InProgress if assigned_to_viewer => {
                    vec![GigAction::MarkCompleted, GigAction::RequestExtension]
                }
                GigStatus::InProgress
                | GigStatus::Completed
                | GigStatus::Finalized => Vec::new(),
            }
        }
        ProfileType::Hirer => {
            let owns_gig = &gig.client_id == viewer_account;

            match gig.status {
                GigStatus::InProgress | GigStatus::Completed if owns_gig => {
                    vec![GigAction::MakePayment]
                }
                GigStatus::Open
                | GigStatus::InProgress
                | GigStatus::Completed
                | GigStatus::Finalized => Vec::new(),
            }
        }
    }
}

/// One row of the rating-distribution display.
#[derive(Debug, Clone, PartialEq)]
pub struct RatingBar {
    pub stars: u8,
    pub count: u32,
    /// Bar width, 0.0..=100.0
    pub percent: f64,
}

/// Distribution rows, five stars first. With zero reviews every bar is
/// exactly 0% wide; there is no division.
pub fn rating_breakdown(stats: &ProfileStats) -> Vec<RatingBar> {
    (1..=5u8)
        .rev()
        .map(|stars| {
            let count = stats.count_for(stars);
            let percent = if stats.total_reviews > 0 {
                f64::from(count) / f64::from(stats.total_reviews) * 100.0
            } else {
                0.0
            };
            RatingBar {
                stars,
                count,
                percent,
            }
        })
        .collect()
}

/// The dashboard overview tiles.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardStats {
    pub active_gigs: u32,
    pub total_earned: f64,
    pub average_rating: f64,
    pub completed_gigs: u32,
}

/// Tile values from the aggregate profile, with absent optionals shown
/// as zero.
pub fn dashboard_stats(data: &UserProfileData) -> DashboardStats {
    DashboardStats {
        active_gigs: data.stats.active_gigs_count.unwrap_or(0),
        total_earned: data.stats.total_earned.unwrap_or(0.0),
        average_rating: data.stats.average_rating,
        completed_gigs: data.stats.completed_gigs_count,
    }
}
