use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// A registered user's credential record.
///
/// `username` is the natural key (a syntactically valid email address,
/// case-sensitive as stored, globally unique). `password_hash` is the
/// opaque bcrypt output; it is never serialized into responses and is only
/// ever compared through `auth::password::verify_password`, never by
/// equality with a candidate plaintext.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Identity {
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Set once, at creation.
    pub created_at: DateTime<Utc>,
}
