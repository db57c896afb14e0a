use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use ts_rs::TS;
use utoipa::ToSchema;
use uuid::Uuid;

// --- Store Records ---

/// User
///
/// A row of the `users` table. Never serialized to clients.
#[derive(Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    // Optional display name shown as the author of posts.
    pub name: Option<String>,
    // Stored as received. See DESIGN.md (open question on hashing).
    pub password: String,
}

// Keeps the credential out of log lines.
impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("name", &self.name)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// NewUser
///
/// Values needed to insert a user; the id is assigned by the repository.
#[derive(Clone)]
pub struct NewUser {
    pub email: String,
    pub name: Option<String>,
    pub password: String,
}

/// Post
///
/// A row of the `posts` table.
#[derive(Debug, Clone, FromRow)]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    // FK to users.id.
    pub author_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// BlogRow
///
/// Flat result of the posts/users join used for reads.
#[derive(Debug, Clone, FromRow)]
pub struct BlogRow {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub author_name: Option<String>,
}

// --- Request Payloads ---
// Parsed through `validation::Schema`; the serde/ts/utoipa derives describe the wire shape.

/// SignupInput
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct SignupInput {
    #[schema(example = "ada@example.com")]
    pub email: String,
    /// At least 6 characters.
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// SigninInput
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct SigninInput {
    #[schema(example = "ada@example.com")]
    pub email: String,
    pub password: String,
}

/// CreateBlogInput
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct CreateBlogInput {
    pub title: String,
    pub content: String,
}

/// UpdateBlogInput
///
/// Partial update: absent fields keep their stored value.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct UpdateBlogInput {
    pub id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

// --- Responses ---

/// TokenResponse
///
/// Returned by signup and signin.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct TokenResponse {
    pub jwt: String,
}

/// IdResponse
///
/// Returned by post creation and update.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct IdResponse {
    pub id: Uuid,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct Author {
    pub name: Option<String>,
}

/// Blog
///
/// Public projection of a post: the author is reduced to a display name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct Blog {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub author: Author,
}

impl From<BlogRow> for Blog {
    fn from(row: BlogRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            content: row.content,
            author: Author {
                name: row.author_name,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct BlogListResponse {
    pub blogs: Vec<Blog>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct BlogResponse {
    pub blog: Blog,
}
