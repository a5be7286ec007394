//! Team invitation model.

use diesel::prelude::*;
use jiff_diesel::Timestamp;
use uuid::Uuid;

use crate::schema::invitations;
use crate::types::InvitationStatus;

/// An invitation for a student to join a project team.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = invitations)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Invitation {
    pub id: Uuid,
    pub project_id: Uuid,
    /// Leader or co-leader who sent the invitation.
    pub sender_id: Uuid,
    pub receiver_id: Uuid,
    pub status: InvitationStatus,
    pub sent_at: Timestamp,
    /// Set exactly when the invitation leaves `Pending`.
    pub responded_at: Option<Timestamp>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = invitations)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewInvitation {
    pub project_id: Uuid,
    pub sender_id: Uuid,
    pub receiver_id: Uuid,
}

#[derive(Debug, Clone, PartialEq, AsChangeset)]
#[diesel(table_name = invitations)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UpdateInvitation {
    pub status: InvitationStatus,
    pub responded_at: Timestamp,
}

impl Invitation {
    #[inline]
    pub fn is_pending(&self) -> bool {
        self.status == InvitationStatus::Pending
    }

    #[inline]
    pub fn is_addressed_to(&self, account_id: Uuid) -> bool {
        self.receiver_id == account_id
    }

    /// Returns the update that moves the invitation to `next`, or `None`
    /// when the transition is not allowed.
    pub fn respond(&self, next: InvitationStatus) -> Option<UpdateInvitation> {
        self.status
            .can_transition_to(next)
            .then(|| UpdateInvitation {
                status: next,
                responded_at: jiff::Timestamp::now().into(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invitation(status: InvitationStatus) -> Invitation {
        Invitation {
            id: Uuid::new_v4(),
            project_id: Uuid::new_v4(),
            sender_id: Uuid::new_v4(),
            receiver_id: Uuid::new_v4(),
            status,
            sent_at: jiff::Timestamp::UNIX_EPOCH.into(),
            responded_at: None,
        }
    }

    #[test]
    fn pending_invitation_can_be_answered() {
        let pending = invitation(InvitationStatus::Pending);
        let accepted = pending.respond(InvitationStatus::Accepted);
        assert_eq!(
            accepted.map(|update| update.status),
            Some(InvitationStatus::Accepted)
        );
        assert!(pending.respond(InvitationStatus::Declined).is_some());
        assert!(pending.respond(InvitationStatus::Pending).is_none());
    }

    #[test]
    fn resolved_invitation_is_frozen() {
        for status in [InvitationStatus::Accepted, InvitationStatus::Declined] {
            let resolved = invitation(status);
            assert!(resolved.respond(InvitationStatus::Accepted).is_none());
            assert!(resolved.respond(InvitationStatus::Declined).is_none());
        }
    }
}
