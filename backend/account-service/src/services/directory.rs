/// Account directory: listing, profile updates, and deletion within a
/// managed role scope. Privileged registration reuses the auth service
/// pipeline, so it is not duplicated here.
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::db::accounts;
use crate::error::{ApiError, ApiResult};
use crate::models::account::{Account, Role, UpdateProfileRequest};
use crate::validators::validate_email;

#[derive(Clone)]
pub struct DirectoryService {
    db: PgPool,
}

impl DirectoryService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// All accounts in the scope, newest first.
    pub async fn list(&self, target: Role) -> ApiResult<Vec<Account>> {
        accounts::list_by_role(&self.db, target).await
    }

    pub async fn get(&self, target: Role, account_id: Uuid) -> ApiResult<Account> {
        accounts::find_by_id_in_role(&self.db, target, account_id)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("{} not found", target.display_name())))
    }

    /// Apply a partial profile update. A changed email faces the same
    /// grammar and role-scoped uniqueness rules as registration; the
    /// password is not reachable through this path.
    pub async fn update(
        &self,
        target: Role,
        account_id: Uuid,
        fields: UpdateProfileRequest,
    ) -> ApiResult<Account> {
        let existing = self.get(target, account_id).await?;

        if let Some(ref email) = fields.email {
            if !validate_email(email) {
                return Err(ApiError::Validation(
                    "Please enter a valid email address".to_string(),
                ));
            }
            if *email != existing.email && accounts::email_exists(&self.db, target, email).await? {
                return Err(ApiError::EmailInUse);
            }
        }

        let account = accounts::update_profile(&self.db, target, account_id, &fields)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("{} not found", target.display_name())))?;

        info!(account_id = %account_id, role = target.as_str(), "account updated");
        Ok(account)
    }

    /// Remove an account; challenge and reset rows cascade with it.
    pub async fn delete(&self, target: Role, account_id: Uuid) -> ApiResult<()> {
        if !accounts::delete_in_role(&self.db, target, account_id).await? {
            return Err(ApiError::NotFound(format!(
                "{} not found",
                target.display_name()
            )));
        }

        info!(account_id = %account_id, role = target.as_str(), "account deleted");
        Ok(())
    }
}
