pub mod error;
pub mod likes;

pub use error::DomainError;
pub use likes::{LikeRecord, LikeState, ToggleOutcome, validate_post_id};
