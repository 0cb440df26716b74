use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

/// Privilege tier of an account. One table serves all three; email
/// uniqueness and lookups are always scoped by role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[sqlx(type_name = "account_role", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Admin,
    SuperAdmin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
            Role::SuperAdmin => "super_admin",
        }
    }

    /// Name used in client-facing messages ("Admin not found").
    pub fn display_name(&self) -> &'static str {
        match self {
            Role::User => "User",
            Role::Admin => "Admin",
            Role::SuperAdmin => "SuperAdmin",
        }
    }

    /// Whether this role may administer accounts of `target`.
    pub fn can_manage(&self, target: Role) -> bool {
        match self {
            Role::SuperAdmin => matches!(target, Role::User | Role::Admin),
            Role::Admin => target == Role::User,
            Role::User => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[sqlx(type_name = "sex_type", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum Sex {
    Male,
    Female,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[sqlx(type_name = "marital_status_type", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum MaritalStatus {
    Single,
    Married,
}

/// Full database row. Deliberately not serializable: the password hash
/// must never reach a response body, so handlers convert to
/// [`AccountResponse`] first.
#[derive(Debug, Clone, FromRow)]
pub struct Account {
    pub id: Uuid,
    pub role: Role,
    pub email: String,
    pub password_hash: String,
    pub is_verified: bool,
    pub first_name: String,
    pub last_name: String,
    pub street: Option<String>,
    pub postcode: Option<String>,
    pub country: Option<String>,
    pub state_county: Option<String>,
    pub city_town: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub sex: Option<Sex>,
    pub marital_status: Option<MaritalStatus>,
    pub phone_number: Option<String>,
    pub nationality: Option<String>,
    pub profile_picture: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Client-facing account document, scrubbed of the password hash.
#[derive(Debug, Clone, Serialize)]
pub struct AccountResponse {
    pub id: Uuid,
    pub role: Role,
    pub email: String,
    pub is_verified: bool,
    pub first_name: String,
    pub last_name: String,
    pub street: Option<String>,
    pub postcode: Option<String>,
    pub country: Option<String>,
    pub state_county: Option<String>,
    pub city_town: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub sex: Option<Sex>,
    pub marital_status: Option<MaritalStatus>,
    pub phone_number: Option<String>,
    pub nationality: Option<String>,
    pub profile_picture: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Account> for AccountResponse {
    fn from(account: Account) -> Self {
        AccountResponse {
            id: account.id,
            role: account.role,
            email: account.email,
            is_verified: account.is_verified,
            first_name: account.first_name,
            last_name: account.last_name,
            street: account.street,
            postcode: account.postcode,
            country: account.country,
            state_county: account.state_county,
            city_town: account.city_town,
            date_of_birth: account.date_of_birth,
            sex: account.sex,
            marital_status: account.marital_status,
            phone_number: account.phone_number,
            nationality: account.nationality,
            profile_picture: account.profile_picture,
            created_at: account.created_at,
            updated_at: account.updated_at,
        }
    }
}

/// Registration payload. Required fields stay optional at the type level
/// so the service can report the first missing one instead of letting the
/// deserializer reject the request wholesale.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub street: Option<String>,
    pub postcode: Option<String>,
    pub country: Option<String>,
    pub state_county: Option<String>,
    pub city_town: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub sex: Option<Sex>,
    pub marital_status: Option<MaritalStatus>,
    pub phone_number: Option<String>,
    pub nationality: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub account: AccountResponse,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterResponse {
    pub message: String,
    pub account: AccountResponse,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChangePasswordRequest {
    pub old_password: Option<String>,
    pub new_password: Option<String>,
}

/// Partial profile update; absent fields keep their stored values.
/// Passwords are never updated through this path.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateProfileRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub street: Option<String>,
    pub postcode: Option<String>,
    pub country: Option<String>,
    pub state_county: Option<String>,
    pub city_town: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub sex: Option<Sex>,
    pub marital_status: Option<MaritalStatus>,
    pub phone_number: Option<String>,
    pub nationality: Option<String>,
    pub profile_picture: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_capabilities() {
        assert!(Role::SuperAdmin.can_manage(Role::User));
        assert!(Role::SuperAdmin.can_manage(Role::Admin));
        assert!(!Role::SuperAdmin.can_manage(Role::SuperAdmin));
        assert!(Role::Admin.can_manage(Role::User));
        assert!(!Role::Admin.can_manage(Role::Admin));
        assert!(!Role::User.can_manage(Role::User));
    }

    #[test]
    fn test_role_wire_format() {
        assert_eq!(
            serde_json::to_string(&Role::SuperAdmin).unwrap(),
            "\"super_admin\""
        );
        assert_eq!(
            serde_json::from_str::<Role>("\"admin\"").unwrap(),
            Role::Admin
        );
    }

    #[test]
    fn test_profile_enum_wire_format() {
        assert_eq!(serde_json::to_string(&Sex::Male).unwrap(), "\"MALE\"");
        assert_eq!(
            serde_json::from_str::<MaritalStatus>("\"SINGLE\"").unwrap(),
            MaritalStatus::Single
        );
    }
}
