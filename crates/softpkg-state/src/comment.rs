//! # Review Comments
//!
//! Append-only discussion entries attached to a request.

use serde::{Deserialize, Serialize};

use softpkg_core::{Account, CommentId, CommentText, Timestamp};

/// A single review comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewComment {
    /// Unique comment identifier.
    pub id: CommentId,
    /// When the comment was made.
    pub created_at: Timestamp,
    /// Who wrote it.
    pub author: Account,
    /// Comment body.
    pub content: CommentText,
}

impl ReviewComment {
    /// Create a comment stamped with `created_at`.
    pub fn new(author: Account, content: CommentText, created_at: Timestamp) -> Self {
        Self {
            id: CommentId::new(),
            created_at,
            author,
            content,
        }
    }
}
