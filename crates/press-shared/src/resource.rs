//! Public JSON shape of a post.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use press_core::domain::Post;

/// Timestamps are exposed as calendar dates.
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Post resource - what clients see of a [`Post`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostResource {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub image: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl PostResource {
    pub fn collection(posts: Vec<Post>) -> Vec<Self> {
        posts.into_iter().map(Self::from).collect()
    }
}

impl From<Post> for PostResource {
    fn from(post: Post) -> Self {
        Self {
            id: post.id,
            title: post.title,
            description: post.description,
            image: post.image,
            created_at: format_date(&post.created_at),
            updated_at: format_date(&post.updated_at),
        }
    }
}

fn format_date(at: &DateTime<Utc>) -> String {
    at.format(DATE_FORMAT).to_string()
}
