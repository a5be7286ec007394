//! Invitation request types.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uniteam_postgres::model::NewInvitation;
use uniteam_postgres::types::InvitationStatus;
use uuid::Uuid;
use validator::Validate;

/// Request payload for inviting a student to a project team.
#[must_use]
#[derive(Debug, Serialize, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateInvitation {
    pub project_id: Uuid,
    pub receiver_id: Uuid,
}

impl CreateInvitation {
    pub fn into_model(self, sender_id: Uuid) -> NewInvitation {
        NewInvitation {
            project_id: self.project_id,
            sender_id,
            receiver_id: self.receiver_id,
        }
    }
}

/// Optional status filter for the invitation list.
#[derive(Debug, Default, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct InvitationFilter {
    pub status: Option<InvitationStatus>,
}
