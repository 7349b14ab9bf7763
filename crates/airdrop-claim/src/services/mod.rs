//! Backend-facing services.

pub mod airdrop_service;
pub mod auth_service;

pub use airdrop_service::AirdropService;
pub use auth_service::AuthService;
