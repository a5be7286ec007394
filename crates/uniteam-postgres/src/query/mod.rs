//! Repository traits, one per aggregate, implemented for [`PgConnection`].
//!
//! List queries accept a [`Pagination`] and, where visibility depends on the
//! caller, an [`AccessScope`].
//!
//! [`PgConnection`]: crate::PgConnection
//! [`AccessScope`]: crate::types::AccessScope

pub mod account;
pub mod invitation;
pub mod milestone;
pub mod profile;
pub mod project;
pub mod project_template;
pub mod team_member;

pub use account::AccountRepository;
pub use invitation::InvitationRepository;
pub use milestone::MilestoneRepository;
pub use profile::ProfileRepository;
pub use project::ProjectRepository;
pub use project_template::ProjectTemplateRepository;
pub use team_member::TeamMemberRepository;

pub use crate::types::Pagination;

/// Escapes `LIKE` wildcards in user input and wraps it in `%`.
pub(crate) fn contains_pattern(search: &str) -> String {
    let escaped = search
        .trim()
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

#[cfg(test)]
mod database_tests;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_like_wildcards() {
        assert_eq!(contains_pattern(" ada "), "%ada%");
        assert_eq!(contains_pattern("50%_off"), "%50\\%\\_off%");
    }
}
