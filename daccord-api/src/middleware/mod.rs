/// Middleware modules for the API server
///
/// - `auth`: bearer-token gate in front of protected routes
/// - `security`: hardening headers on every response

pub mod auth;
pub mod security;
