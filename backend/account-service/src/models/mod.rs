pub mod account;
pub mod verification;
