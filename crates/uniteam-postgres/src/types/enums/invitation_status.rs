//! Invitation lifecycle status.

use diesel_derive_enum::DbEnum;
#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// State of a team invitation.
///
/// `Pending` moves to either `Accepted` or `Declined`; both are terminal.
/// Corresponds to the `INVITATION_STATUS` PostgreSQL enum.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[derive(Serialize, Deserialize, DbEnum, Display, EnumIter, EnumString)]
#[ExistingTypePath = "crate::schema::sql_types::InvitationStatus"]
pub enum InvitationStatus {
    #[db_rename = "pending"]
    #[serde(rename = "PENDING")]
    #[strum(serialize = "PENDING")]
    #[default]
    Pending,

    #[db_rename = "accepted"]
    #[serde(rename = "ACCEPTED")]
    #[strum(serialize = "ACCEPTED")]
    Accepted,

    #[db_rename = "declined"]
    #[serde(rename = "DECLINED")]
    #[strum(serialize = "DECLINED")]
    Declined,
}

impl InvitationStatus {
    /// Returns whether no further transition is possible.
    #[inline]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, InvitationStatus::Pending)
    }

    /// Returns whether `self -> next` is a legal transition.
    #[inline]
    pub const fn can_transition_to(self, next: InvitationStatus) -> bool {
        matches!(
            (self, next),
            (
                InvitationStatus::Pending,
                InvitationStatus::Accepted | InvitationStatus::Declined
            )
        )
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn only_pending_can_move() {
        for from in InvitationStatus::iter() {
            for to in InvitationStatus::iter() {
                let expected = from == InvitationStatus::Pending && to != InvitationStatus::Pending;
                assert_eq!(from.can_transition_to(to), expected, "{from} -> {to}");
            }
        }
    }

    #[test]
    fn resolved_states_are_terminal() {
        assert!(!InvitationStatus::Pending.is_terminal());
        assert!(InvitationStatus::Accepted.is_terminal());
        assert!(InvitationStatus::Declined.is_terminal());
    }
}
