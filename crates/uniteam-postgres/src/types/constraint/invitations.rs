//! Invitations table constraint violations.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use super::ConstraintCategory;

/// Invitations table constraint violations.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[derive(Serialize, Deserialize, Display, EnumIter, EnumString)]
#[serde(into = "String", try_from = "String")]
pub enum InvitationConstraints {
    #[strum(serialize = "invitations_sender_receiver_distinct")]
    SenderReceiverDistinct,
    #[strum(serialize = "invitations_responded_status")]
    RespondedStatus,
    #[strum(serialize = "invitations_responded_after_sent")]
    RespondedAfterSent,
    #[strum(serialize = "invitations_project_receiver_unique")]
    ProjectReceiverUnique,
}

impl InvitationConstraints {
    /// Parses a constraint name reported by PostgreSQL.
    pub fn new(constraint: &str) -> Option<Self> {
        constraint.parse().ok()
    }

    pub fn categorize(&self) -> ConstraintCategory {
        match self {
            InvitationConstraints::SenderReceiverDistinct
            | InvitationConstraints::RespondedStatus => ConstraintCategory::BusinessLogic,
            InvitationConstraints::RespondedAfterSent => ConstraintCategory::Chronological,
            InvitationConstraints::ProjectReceiverUnique => ConstraintCategory::Uniqueness,
        }
    }
}

impl From<InvitationConstraints> for String {
    #[inline]
    fn from(val: InvitationConstraints) -> Self {
        val.to_string()
    }
}

impl TryFrom<String> for InvitationConstraints {
    type Error = strum::ParseError;

    #[inline]
    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
