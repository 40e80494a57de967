/// API route handlers, one module per resource
///
/// - `health`: liveness and storage probe
/// - `auth`: registration and login
/// - `communities`: browse and create communities
/// - `members`: member listings and joining communities
/// - `music`: playlists and tracks
/// - `activities`: activity feed

pub mod activities;
pub mod auth;
pub mod communities;
pub mod health;
pub mod members;
pub mod music;

mod validation;
