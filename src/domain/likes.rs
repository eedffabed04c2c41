//! Like-relation types shared across the ledger and the remote client.

use serde::{Deserialize, Serialize};

use super::error::DomainError;

/// One server-reported like record for a post, as delivered by the bulk
/// "my likes" endpoint. Wire format is camelCase JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeRecord {
    pub post_id: String,
    pub liked: bool,
    pub likes_count: i64,
}

/// Authoritative server response to a like toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleOutcome {
    pub liked: bool,
    pub like_count: i64,
}

/// The ledger's view of a single post.
///
/// Unobserved posts read as `liked: false, count: 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LikeState {
    pub liked: bool,
    pub count: i64,
}

impl LikeState {
    pub const UNOBSERVED: LikeState = LikeState {
        liked: false,
        count: 0,
    };
}

/// A post id is valid iff non-empty. Authentication is enforced upstream,
/// not here.
pub fn validate_post_id(post_id: &str) -> Result<(), DomainError> {
    if post_id.is_empty() {
        return Err(DomainError::validation("post id must be non-empty"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_post_id_is_rejected() {
        assert!(validate_post_id("").is_err());
        assert!(validate_post_id("post_1").is_ok());
    }

    #[test]
    fn toggle_outcome_decodes_camel_case() {
        let outcome: ToggleOutcome =
            serde_json::from_str(r#"{"liked":true,"likeCount":6}"#).expect("decode outcome");
        assert!(outcome.liked);
        assert_eq!(outcome.like_count, 6);
    }

    #[test]
    fn like_record_decodes_camel_case() {
        let record: LikeRecord =
            serde_json::from_str(r#"{"postId":"post_1","liked":false,"likesCount":3}"#)
                .expect("decode record");
        assert_eq!(record.post_id, "post_1");
        assert!(!record.liked);
        assert_eq!(record.likes_count, 3);
    }
}
