//! # Daccord Shared Library
//!
//! Types, persistence and authentication primitives used by the Daccord API
//! server.
//!
//! ## Module Organization
//!
//! - `auth`: token issue/verify, password hashing, per-request auth context
//! - `db`: connection pool and embedded migrations
//! - `models`: row types and their SQL
//! - `store`: the `Store` trait with Postgres and in-memory backends

pub mod auth;
pub mod db;
pub mod models;
pub mod store;
