pub mod auth;
pub mod directory;
pub mod email;
pub mod otp;
pub mod reset;
