//! Path parameter types for HTTP handlers.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[must_use]
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AccountPathParams {
    /// Unique identifier of the account.
    pub account_id: Uuid,
}

#[must_use]
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProjectPathParams {
    /// Unique identifier of the project.
    pub project_id: Uuid,
}

#[must_use]
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MembershipPathParams {
    /// Unique identifier of the team membership.
    pub membership_id: Uuid,
}

#[must_use]
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MilestonePathParams {
    /// Unique identifier of the milestone.
    pub milestone_id: Uuid,
}

#[must_use]
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct InvitationPathParams {
    /// Unique identifier of the invitation.
    pub invitation_id: Uuid,
}

#[must_use]
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProjectTemplatePathParams {
    /// Unique identifier of the project template.
    pub template_id: Uuid,
}

#[must_use]
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MilestoneTemplatePathParams {
    /// Unique identifier of the milestone template.
    pub milestone_template_id: Uuid,
}
