//! Comment source seam

use crate::error::Result;
use async_trait::async_trait;

/// Anything that can turn a video identifier into its comment texts.
///
/// Implementations resolve the platform's internal content id, download the
/// comment payload and return the comment texts in document order with
/// empty entries removed. Every failure maps to
/// [`Error::SourceUnavailable`](crate::Error::SourceUnavailable).
#[async_trait]
pub trait CommentSource: Send + Sync {
    /// Fetch all comment texts for `video_id`
    async fn fetch_comments(&self, video_id: &str) -> Result<Vec<String>>;

    /// Get the source name
    fn name(&self) -> &str;
}
