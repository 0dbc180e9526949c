//! Single-flight guard for analysis runs
//!
//! At most one analysis per video is live. Starting a new run cancels the
//! previous one for the same video; the superseded run observes the
//! cancellation at its next await point and its result is discarded.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

#[derive(Debug)]
struct ActiveSession {
    id: u64,
    token: CancellationToken,
}

/// Tracks the live analysis session per video
#[derive(Debug, Clone, Default)]
pub struct SessionRegistry {
    active: Arc<Mutex<HashMap<String, ActiveSession>>>,
    next_id: Arc<AtomicU64>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a session for `video_id`, cancelling any session already running
    /// for it
    pub fn begin(&self, video_id: &str) -> AnalysisSession {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let token = CancellationToken::new();

        let previous = self.active.lock().insert(
            video_id.to_string(),
            ActiveSession {
                id,
                token: token.clone(),
            },
        );
        if let Some(previous) = previous {
            debug!(
                video_id,
                superseded = previous.id,
                session = id,
                "Superseding analysis session"
            );
            previous.token.cancel();
        }

        AnalysisSession {
            video_id: video_id.to_string(),
            id,
            token,
            registry: self.clone(),
        }
    }

    /// Number of live sessions
    pub fn active_count(&self) -> usize {
        self.active.lock().len()
    }

    fn finish(&self, video_id: &str, id: u64) {
        let mut active = self.active.lock();
        if active.get(video_id).is_some_and(|session| session.id == id) {
            active.remove(video_id);
        }
    }
}

/// Handle for one analysis run; deregisters itself on drop
#[derive(Debug)]
pub struct AnalysisSession {
    video_id: String,
    id: u64,
    token: CancellationToken,
    registry: SessionRegistry,
}

impl AnalysisSession {
    pub fn video_id(&self) -> &str {
        &self.video_id
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// Whether a newer session replaced this one
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Resolves once a newer session replaces this one
    pub async fn cancelled(&self) {
        self.token.cancelled().await
    }
}

impl Drop for AnalysisSession {
    fn drop(&mut self) {
        self.registry.finish(&self.video_id, self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_cancels_previous() {
        let registry = SessionRegistry::new();
        let first = registry.begin("BV1xx");
        let second = registry.begin("BV1xx");

        assert!(first.is_cancelled());
        assert!(!second.is_cancelled());
        assert!(second.id() > first.id());
        assert_eq!(registry.active_count(), 1);
    }

    #[test]
    fn test_sessions_for_different_videos_coexist() {
        let registry = SessionRegistry::new();
        let a = registry.begin("BV1aa");
        let b = registry.begin("BV1bb");

        assert!(!a.is_cancelled());
        assert!(!b.is_cancelled());
        assert_eq!(registry.active_count(), 2);
    }

    #[test]
    fn test_stale_drop_keeps_newer_session() {
        let registry = SessionRegistry::new();
        let first = registry.begin("BV1xx");
        let second = registry.begin("BV1xx");

        drop(first);
        assert_eq!(registry.active_count(), 1);

        drop(second);
        assert_eq!(registry.active_count(), 0);
    }

    #[tokio::test]
    async fn test_cancelled_resolves() {
        let registry = SessionRegistry::new();
        let first = registry.begin("BV1xx");
        let _second = registry.begin("BV1xx");

        tokio::time::timeout(std::time::Duration::from_secs(1), first.cancelled())
            .await
            .unwrap();
    }
}
