//! Authentication for relief-gateway
//!
//! Provides:
//! - Password hashing with bcrypt
//! - JWT token generation for login sessions

pub mod jwt;
pub mod password;

pub use jwt::{Claims, TokenIssuer};
pub use password::{hash_password, verify_password};
