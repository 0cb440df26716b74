/// Credential store queries. Every lookup that serves a role-scoped API
/// path filters on the role column; only the JWT middleware resolves an
/// account by bare id, since ids are unique across all tiers.
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::models::account::{Account, Role, UpdateProfileRequest};

/// Insert payload assembled by the auth service after validation.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub role: Role,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub street: Option<String>,
    pub postcode: Option<String>,
    pub country: Option<String>,
    pub state_county: Option<String>,
    pub city_town: Option<String>,
    pub date_of_birth: Option<chrono::NaiveDate>,
    pub sex: Option<crate::models::account::Sex>,
    pub marital_status: Option<crate::models::account::MaritalStatus>,
    pub phone_number: Option<String>,
    pub nationality: Option<String>,
}

/// Create an account; starts unverified.
pub async fn insert(pool: &PgPool, new: &NewAccount) -> ApiResult<Account> {
    let account = sqlx::query_as::<_, Account>(
        r#"
        INSERT INTO accounts (
            id, role, email, password_hash, is_verified,
            first_name, last_name, street, postcode, country,
            state_county, city_town, date_of_birth, sex, marital_status,
            phone_number, nationality
        )
        VALUES ($1, $2, $3, $4, FALSE, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(new.role)
    .bind(&new.email)
    .bind(&new.password_hash)
    .bind(&new.first_name)
    .bind(&new.last_name)
    .bind(&new.street)
    .bind(&new.postcode)
    .bind(&new.country)
    .bind(&new.state_county)
    .bind(&new.city_town)
    .bind(new.date_of_birth)
    .bind(new.sex)
    .bind(new.marital_status)
    .bind(&new.phone_number)
    .bind(&new.nationality)
    .fetch_one(pool)
    .await
    .map_err(|e| ApiError::Database(e.to_string()))?;

    Ok(account)
}

/// Find an account by email within a role scope.
pub async fn find_by_email(pool: &PgPool, role: Role, email: &str) -> ApiResult<Option<Account>> {
    let account =
        sqlx::query_as::<_, Account>("SELECT * FROM accounts WHERE role = $1 AND email = $2")
            .bind(role)
            .bind(email)
            .fetch_optional(pool)
            .await
            .map_err(|e| ApiError::Database(e.to_string()))?;

    Ok(account)
}

/// Find an account by id, any role.
pub async fn find_by_id(pool: &PgPool, account_id: Uuid) -> ApiResult<Option<Account>> {
    let account = sqlx::query_as::<_, Account>("SELECT * FROM accounts WHERE id = $1")
        .bind(account_id)
        .fetch_optional(pool)
        .await
        .map_err(|e| ApiError::Database(e.to_string()))?;

    Ok(account)
}

/// Find an account by id within a role scope.
pub async fn find_by_id_in_role(
    pool: &PgPool,
    role: Role,
    account_id: Uuid,
) -> ApiResult<Option<Account>> {
    let account =
        sqlx::query_as::<_, Account>("SELECT * FROM accounts WHERE role = $1 AND id = $2")
            .bind(role)
            .bind(account_id)
            .fetch_optional(pool)
            .await
            .map_err(|e| ApiError::Database(e.to_string()))?;

    Ok(account)
}

/// Check whether an email is taken within a role scope.
pub async fn email_exists(pool: &PgPool, role: Role, email: &str) -> ApiResult<bool> {
    let exists = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM accounts WHERE role = $1 AND email = $2)",
    )
    .bind(role)
    .bind(email)
    .fetch_one(pool)
    .await
    .map_err(|e| ApiError::Database(e.to_string()))?;

    Ok(exists)
}

/// Replace the stored password hash.
pub async fn update_password(pool: &PgPool, account_id: Uuid, password_hash: &str) -> ApiResult<()> {
    sqlx::query("UPDATE accounts SET password_hash = $1, updated_at = NOW() WHERE id = $2")
        .bind(password_hash)
        .bind(account_id)
        .execute(pool)
        .await
        .map_err(|e| ApiError::Database(e.to_string()))?;

    Ok(())
}

/// Partial profile update: absent fields keep their stored values.
pub async fn update_profile(
    pool: &PgPool,
    role: Role,
    account_id: Uuid,
    fields: &UpdateProfileRequest,
) -> ApiResult<Option<Account>> {
    let account = sqlx::query_as::<_, Account>(
        r#"
        UPDATE accounts
        SET first_name = COALESCE($3, first_name),
            last_name = COALESCE($4, last_name),
            email = COALESCE($5, email),
            street = COALESCE($6, street),
            postcode = COALESCE($7, postcode),
            country = COALESCE($8, country),
            state_county = COALESCE($9, state_county),
            city_town = COALESCE($10, city_town),
            date_of_birth = COALESCE($11, date_of_birth),
            sex = COALESCE($12, sex),
            marital_status = COALESCE($13, marital_status),
            phone_number = COALESCE($14, phone_number),
            nationality = COALESCE($15, nationality),
            profile_picture = COALESCE($16, profile_picture),
            updated_at = NOW()
        WHERE role = $1 AND id = $2
        RETURNING *
        "#,
    )
    .bind(role)
    .bind(account_id)
    .bind(&fields.first_name)
    .bind(&fields.last_name)
    .bind(&fields.email)
    .bind(&fields.street)
    .bind(&fields.postcode)
    .bind(&fields.country)
    .bind(&fields.state_county)
    .bind(&fields.city_town)
    .bind(fields.date_of_birth)
    .bind(fields.sex)
    .bind(fields.marital_status)
    .bind(&fields.phone_number)
    .bind(&fields.nationality)
    .bind(&fields.profile_picture)
    .fetch_optional(pool)
    .await
    .map_err(|e| ApiError::Database(e.to_string()))?;

    Ok(account)
}

/// List all accounts of a role, newest first.
pub async fn list_by_role(pool: &PgPool, role: Role) -> ApiResult<Vec<Account>> {
    let accounts =
        sqlx::query_as::<_, Account>("SELECT * FROM accounts WHERE role = $1 ORDER BY created_at DESC")
            .bind(role)
            .fetch_all(pool)
            .await
            .map_err(|e| ApiError::Database(e.to_string()))?;

    Ok(accounts)
}

/// Delete an account within a role scope. Outstanding challenge and reset
/// rows go with it (ON DELETE CASCADE). Returns false when nothing matched.
pub async fn delete_in_role(pool: &PgPool, role: Role, account_id: Uuid) -> ApiResult<bool> {
    let result = sqlx::query("DELETE FROM accounts WHERE role = $1 AND id = $2")
        .bind(role)
        .bind(account_id)
        .execute(pool)
        .await
        .map_err(|e| ApiError::Database(e.to_string()))?;

    Ok(result.rows_affected() > 0)
}
