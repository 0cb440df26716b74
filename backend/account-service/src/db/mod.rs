pub mod accounts;
pub mod email_verifications;
pub mod password_resets;
