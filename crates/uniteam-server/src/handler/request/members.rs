//! Team membership request types.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uniteam_postgres::types::TeamRole;
use uuid::Uuid;
use validator::Validate;

/// Request payload for an administrator adding a member directly.
#[must_use]
#[derive(Debug, Serialize, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AddTeamMember {
    pub project_id: Uuid,
    pub account_id: Uuid,
    /// Defaults to `MEMBER`.
    #[serde(default)]
    pub member_role: TeamRole,
}

/// Request payload for changing a member's team role.
#[must_use]
#[derive(Debug, Serialize, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ChangeMemberRole {
    pub member_role: TeamRole,
}
