//! Invitation response types.

use jiff::Timestamp;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uniteam_postgres::model;
use uniteam_postgres::types::InvitationStatus;
use uuid::Uuid;

/// Represents an invitation to join a project team.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Invitation {
    /// Unique identifier of the invitation.
    pub invitation_id: Uuid,
    pub project_id: Uuid,
    /// Team leader or co-leader who sent the invitation.
    pub sender_id: Uuid,
    /// Student the invitation is addressed to.
    pub receiver_id: Uuid,
    pub status: InvitationStatus,
    pub sent_at: Timestamp,
    /// Set once the receiver accepted or declined.
    pub responded_at: Option<Timestamp>,
}

impl Invitation {
    pub fn from_model(invitation: model::Invitation) -> Self {
        Self {
            invitation_id: invitation.id,
            project_id: invitation.project_id,
            sender_id: invitation.sender_id,
            receiver_id: invitation.receiver_id,
            status: invitation.status,
            sent_at: invitation.sent_at.into(),
            responded_at: invitation.responded_at.map(Into::into),
        }
    }
}

/// List of invitations.
pub type Invitations = Vec<Invitation>;
