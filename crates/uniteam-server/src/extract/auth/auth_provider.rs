//! Authorization checks shared by every authenticated caller.

use uniteam_postgres::model::{Project, ProjectTemplate, TeamMember};
use uniteam_postgres::query::{ProjectRepository, TeamMemberRepository};
use uniteam_postgres::types::{AccessScope, AccountCapabilities, AccountRole};
use uniteam_postgres::{PgConnection, PgError};
use uuid::Uuid;

use super::{AuthResult, Permission};
use crate::TRACING_TARGET_AUTHORIZATION;
use crate::handler::{ErrorKind, Result};

/// Authorization provider for authenticated callers.
///
/// Implementors supply the caller's id and role. Capabilities and the list
/// visibility scope are derived from the role; project checks consult the
/// caller's membership in the project team.
pub trait AuthProvider {
    fn account_id(&self) -> Uuid;

    fn account_role(&self) -> AccountRole;

    #[inline]
    fn capabilities(&self) -> AccountCapabilities {
        self.account_role().capabilities()
    }

    #[inline]
    fn access_scope(&self) -> AccessScope {
        AccessScope::for_account(self.account_id(), self.account_role())
    }

    #[inline]
    fn is_admin(&self) -> bool {
        self.account_role().is_admin()
    }

    /// Checks `permission` on `project` for the caller.
    ///
    /// Team members are judged by their role. Without a membership only
    /// read-only permissions can be granted, and only to the project's
    /// supervisor or an administrator.
    #[allow(async_fn_in_trait)]
    async fn check_project_permission(
        &self,
        conn: &mut PgConnection,
        project: &Project,
        permission: Permission,
    ) -> Result<AuthResult, PgError> {
        let member = conn
            .find_membership_in_project(project.id, self.account_id())
            .await?;

        if let Some(member) = member {
            if permission.is_permitted_by_role(member.member_role) {
                tracing::debug!(
                    target: TRACING_TARGET_AUTHORIZATION,
                    account_id = %self.account_id(),
                    project_id = %project.id,
                    permission = ?permission,
                    role = ?member.member_role,
                    "Access granted: sufficient team role"
                );
                return Ok(AuthResult::granted_with_member(member));
            }

            tracing::warn!(
                target: TRACING_TARGET_AUTHORIZATION,
                account_id = %self.account_id(),
                project_id = %project.id,
                permission = ?permission,
                role = ?member.member_role,
                "Access denied: insufficient team role"
            );
            return Ok(AuthResult::denied(format!(
                "Team role {} is insufficient for this action",
                member.member_role
            )));
        }

        let is_supervisor = project.is_supervised_by(self.account_id());
        if permission.is_read_only() && (is_supervisor || self.capabilities().view_all) {
            tracing::debug!(
                target: TRACING_TARGET_AUTHORIZATION,
                account_id = %self.account_id(),
                project_id = %project.id,
                permission = ?permission,
                is_supervisor,
                "Access granted: supervisor or administrator"
            );
            return Ok(AuthResult::granted());
        }

        tracing::warn!(
            target: TRACING_TARGET_AUTHORIZATION,
            account_id = %self.account_id(),
            project_id = %project.id,
            permission = ?permission,
            "Access denied: not a team member"
        );
        Ok(AuthResult::denied("Not a member of this project's team"))
    }

    /// Loads the project and authorizes `permission` on it.
    ///
    /// Returns the project and the caller's membership, if any. A missing
    /// project is `not_found`, a denial is `forbidden`.
    #[allow(async_fn_in_trait)]
    async fn authorize_project(
        &self,
        conn: &mut PgConnection,
        project_id: Uuid,
        permission: Permission,
    ) -> Result<(Project, Option<TeamMember>)> {
        let Some(project) = conn.find_project_by_id(project_id).await? else {
            return Err(ErrorKind::NotFound
                .with_message(format!("Project not found: {project_id}"))
                .with_resource("project"));
        };

        let member = self
            .check_project_permission(conn, &project, permission)
            .await?
            .into_result()?;

        Ok((project, member))
    }

    /// Authorizes a mutation that needs a team membership and returns it.
    #[allow(async_fn_in_trait)]
    async fn authorize_team_member(
        &self,
        conn: &mut PgConnection,
        project_id: Uuid,
        permission: Permission,
    ) -> Result<(Project, TeamMember)> {
        let (project, member) = self.authorize_project(conn, project_id, permission).await?;
        match member {
            Some(member) => Ok((project, member)),
            None => Err(ErrorKind::Forbidden
                .with_message("Not a member of this project's team")
                .with_resource("permission")),
        }
    }

    /// Checks that the caller may edit or delete `template`.
    fn check_template_permission(&self, template: &ProjectTemplate) -> AuthResult {
        if template.is_created_by(self.account_id()) || self.capabilities().moderate_templates {
            return AuthResult::granted();
        }

        tracing::warn!(
            target: TRACING_TARGET_AUTHORIZATION,
            account_id = %self.account_id(),
            template_id = %template.id,
            "Access denied: not the template creator"
        );
        AuthResult::denied("Only the template creator or an administrator may change it")
    }

    fn authorize_template(&self, template: &ProjectTemplate) -> Result<()> {
        self.check_template_permission(template).into_result()?;
        Ok(())
    }

    fn check_self_permission(&self, target_account_id: Uuid) -> AuthResult {
        if self.account_id() == target_account_id || self.capabilities().manage_accounts {
            return AuthResult::granted();
        }

        tracing::warn!(
            target: TRACING_TARGET_AUTHORIZATION,
            account_id = %self.account_id(),
            target_account_id = %target_account_id,
            "Access denied: foreign account"
        );
        AuthResult::denied("Can only access your own account")
    }

    fn authorize_self(&self, target_account_id: Uuid) -> Result<()> {
        self.check_self_permission(target_account_id).into_result()?;
        Ok(())
    }

    fn check_admin_permission(&self) -> AuthResult {
        if self.capabilities().manage_accounts {
            return AuthResult::granted();
        }

        tracing::warn!(
            target: TRACING_TARGET_AUTHORIZATION,
            account_id = %self.account_id(),
            role = %self.account_role(),
            "Access denied: administrator required"
        );
        AuthResult::denied("Administrator privileges required")
    }

    fn authorize_admin(&self) -> Result<()> {
        self.check_admin_permission().into_result()?;
        Ok(())
    }

    /// Requires a role-derived capability, such as authoring templates.
    fn authorize_capability(
        &self,
        select: impl FnOnce(&AccountCapabilities) -> bool,
        denial: &'static str,
    ) -> Result<()> {
        if select(&self.capabilities()) {
            return Ok(());
        }

        tracing::warn!(
            target: TRACING_TARGET_AUTHORIZATION,
            account_id = %self.account_id(),
            role = %self.account_role(),
            denial,
            "Access denied: missing capability"
        );
        Err(ErrorKind::Forbidden
            .with_message(denial)
            .with_resource("permission"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Caller(Uuid, AccountRole);

    impl AuthProvider for Caller {
        fn account_id(&self) -> Uuid {
            self.0
        }

        fn account_role(&self) -> AccountRole {
            self.1
        }
    }

    fn template(created_by: Uuid) -> ProjectTemplate {
        let now = jiff::Timestamp::now();
        ProjectTemplate {
            id: Uuid::new_v4(),
            created_by,
            title: "Capstone".to_owned(),
            course_code: "CS400".to_owned(),
            description: String::new(),
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    #[test]
    fn templates_are_changed_by_creator_or_admin() {
        let author = Caller(Uuid::new_v4(), AccountRole::Lecturer);
        let template = template(author.0);

        assert!(author.authorize_template(&template).is_ok());
        assert!(Caller(Uuid::new_v4(), AccountRole::Admin).authorize_template(&template).is_ok());

        let other = Caller(Uuid::new_v4(), AccountRole::Lecturer);
        let error = other.authorize_template(&template).err();
        assert_eq!(error.map(|e| e.kind()), Some(ErrorKind::Forbidden));
    }

    #[test]
    fn only_lecturers_author_templates() {
        let denial = "Only lecturers can create templates";
        for (role, allowed) in [
            (AccountRole::Lecturer, true),
            (AccountRole::Student, false),
            (AccountRole::Admin, false),
        ] {
            let caller = Caller(Uuid::new_v4(), role);
            let result = caller.authorize_capability(|c| c.author_templates, denial);
            assert_eq!(result.is_ok(), allowed, "{role}");
        }
    }

    #[test]
    fn admins_manage_accounts() {
        let admin = Caller(Uuid::new_v4(), AccountRole::Admin);
        assert!(admin.authorize_admin().is_ok());
        assert!(admin.authorize_self(Uuid::new_v4()).is_ok());
        assert_eq!(admin.access_scope(), AccessScope::Unrestricted);

        let student = Caller(Uuid::new_v4(), AccountRole::Student);
        assert!(student.authorize_admin().is_err());
    }
}
