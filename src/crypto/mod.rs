//! Cryptographic functions for Mabourse
//!
//! Argon2id password hashing for the password that guards config deletion.

pub mod password;

pub use password::{hash_password, prompt_password, verify_password, SecretPassword};
