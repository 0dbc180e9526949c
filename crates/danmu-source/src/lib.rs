//! danmu source
//!
//! Bilibili danmaku retrieval behind [`danmu_core::CommentSource`].

pub mod client;
pub mod video;
pub mod xml;

pub use client::{BilibiliSource, DEFAULT_API_BASE, DEFAULT_COMMENT_BASE};
pub use video::{VideoId, VideoIdParser};
pub use xml::{DanmakuEntry, DanmakuParser};
