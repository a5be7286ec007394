//! Rust counterparts of the PostgreSQL enum types.

mod account_role;
mod invitation_status;
mod milestone_status;
mod team_role;

pub use account_role::{AccountCapabilities, AccountRole};
pub use invitation_status::InvitationStatus;
pub use milestone_status::MilestoneStatus;
pub use team_role::TeamRole;
