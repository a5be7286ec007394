//! Team membership response types.

use std::collections::HashMap;

use jiff::Timestamp;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uniteam_postgres::model::{self, Account};
use uniteam_postgres::types::TeamRole;
use uuid::Uuid;

use super::AccountSummary;

/// Represents a team membership.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TeamMember {
    /// Unique identifier of the membership.
    pub membership_id: Uuid,
    pub team_id: Uuid,
    pub account_id: Uuid,
    /// The member's account.
    pub account: Option<AccountSummary>,
    /// Role of the member within the team.
    pub member_role: TeamRole,
    pub joined_at: Timestamp,
    pub updated_at: Timestamp,
}

impl TeamMember {
    pub fn from_model(member: model::TeamMember, account: Option<&Account>) -> Self {
        Self {
            membership_id: member.id,
            team_id: member.team_id,
            account_id: member.account_id,
            account: account.map(AccountSummary::from_model),
            member_role: member.member_role,
            joined_at: member.joined_at.into(),
            updated_at: member.updated_at.into(),
        }
    }

    /// Pairs every membership with its account from `accounts`.
    pub fn from_models(members: Vec<model::TeamMember>, accounts: &[Account]) -> Vec<Self> {
        let accounts: HashMap<Uuid, &Account> = accounts.iter().map(|a| (a.id, a)).collect();
        members
            .into_iter()
            .map(|member| {
                let account = accounts.get(&member.account_id).copied();
                Self::from_model(member, account)
            })
            .collect()
    }
}

/// List of team memberships.
pub type TeamMembers = Vec<TeamMember>;
