/// Row models
///
/// Each model owns the SQL for its table. Functions take a `&PgPool` (or a
/// connection when they must run inside a caller's transaction) and return
/// raw `sqlx::Error`; mapping to HTTP-facing errors happens in
/// [`crate::store`].

pub mod activity;
pub mod community;
pub mod membership;
pub mod playlist;
pub mod track;
pub mod user;

pub use activity::{Activity, ActivityUser, ActivityWithUser, CreateActivity};
pub use community::{Community, CreateCommunity};
pub use membership::{CommunityMember, CommunityRole, CreateCommunityMember};
pub use playlist::{CreatePlaylist, Playlist, PlaylistEntry, PlaylistWithTracks, UpdatePlaylist};
pub use track::{CreateTrack, Track};
pub use user::{CreateUser, MemberProfile, User, UserRole, UserSummary};
