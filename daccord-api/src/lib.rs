//! # Daccord API Server Library
//!
//! HTTP layer of the Daccord community-discovery backend.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration from the environment
//! - `error`: Error type and failure envelope
//! - `extract`: Extractors that reject with the envelope
//! - `middleware`: Auth gate and security headers
//! - `response`: Success envelope
//! - `routes`: Route handlers

pub mod app;
pub mod config;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod response;
pub mod routes;
