//! # Auth Module
//!
//! This module handles all authentication-related functionality including:
//! - OAuth sign-in and callback handling
//! - JWT minting and verification
//! - The user directory (find-or-create by email, role promotion)
//! - Request authorization middleware and the AuthedUser extractor

pub mod directory;
pub mod extractors;
pub mod guard;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod token;


pub use extractors::AuthedUser;
pub use models::{Claims, Role, User};
pub use routes::auth_routes;
