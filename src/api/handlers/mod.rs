//! API request handlers.
//!
//! This module contains all HTTP request handlers organized by functionality.

/// Administration handlers (users, roles, system info).
pub mod admin;
/// Authentication handlers (register, login, current user).
pub mod auth;
/// Key material generation handlers.
pub mod keys;
/// Role assignment handler.
pub mod roles;
/// Root and health handlers.
pub mod system;
/// User directory handlers.
pub mod users;
