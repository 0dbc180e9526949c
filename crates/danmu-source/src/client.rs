//! Bilibili comment source

use crate::video::{VideoId, VideoIdParser};
use crate::xml::{DanmakuEntry, DanmakuParser};
use async_trait::async_trait;
use danmu_core::{CommentSource, Error, Result};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};

/// Public web API base
pub const DEFAULT_API_BASE: &str = "https://api.bilibili.com";

/// Danmaku payload host
pub const DEFAULT_COMMENT_BASE: &str = "https://comment.bilibili.com";

const USER_AGENT: &str = concat!("danmu-insight/", env!("CARGO_PKG_VERSION"));
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Deserialize)]
struct ViewResponse {
    code: i64,
    #[serde(default)]
    message: String,
    data: Option<ViewData>,
}

#[derive(Debug, Deserialize)]
struct ViewData {
    cid: Option<u64>,
}

/// Fetches danmaku for a Bilibili video: resolve the cid, then download the
/// XML payload
#[derive(Debug, Clone)]
pub struct BilibiliSource {
    client: reqwest::Client,
    api_base: String,
    comment_base: String,
    video_ids: VideoIdParser,
    danmaku: DanmakuParser,
}

impl BilibiliSource {
    /// Create a source against the public endpoints
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(DEFAULT_TIMEOUT)
            .build()?;
        Self::with_client(client)
    }

    /// Create a source with a caller-supplied HTTP client
    pub fn with_client(client: reqwest::Client) -> Result<Self> {
        Ok(Self {
            client,
            api_base: DEFAULT_API_BASE.to_string(),
            comment_base: DEFAULT_COMMENT_BASE.to_string(),
            video_ids: VideoIdParser::new()?,
            danmaku: DanmakuParser::new()?,
        })
    }

    /// Override both endpoint bases (mirrors, tests)
    pub fn with_base_urls(
        mut self,
        api_base: impl Into<String>,
        comment_base: impl Into<String>,
    ) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self.comment_base = comment_base.into().trim_end_matches('/').to_string();
        self
    }

    /// Parse a page URL or bare id
    pub fn parse_video_id(&self, input: &str) -> Result<VideoId> {
        self.video_ids.parse(input)
    }

    /// Resolve the content id the danmaku payload is keyed by
    pub async fn resolve_cid(&self, video: &VideoId) -> Result<u64> {
        let url = format!("{}/x/web-interface/view", self.api_base);
        let (name, value) = video.query();

        let response = self
            .client
            .get(&url)
            .query(&[(name, value.as_str())])
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| {
                Error::source_unavailable(format!("View request for {video} failed: {e}"))
            })?;

        let body = response
            .text()
            .await
            .map_err(|e| {
                Error::source_unavailable(format!("View response for {video} unreadable: {e}"))
            })?;
        let view: ViewResponse = serde_json::from_str(&body).map_err(|e| {
            Error::source_unavailable(format!("View response for {video} is not JSON: {e}"))
        })?;

        if view.code != 0 {
            return Err(Error::source_unavailable(format!(
                "View API rejected {video}: code {} {}",
                view.code, view.message
            )));
        }

        view.data
            .and_then(|data| data.cid)
            .ok_or_else(|| Error::source_unavailable(format!("No cid for {video}")))
    }

    /// Download and parse the danmaku payload for `cid`
    pub async fn fetch_entries(&self, cid: u64) -> Result<Vec<DanmakuEntry>> {
        let url = format!("{}/{}.xml", self.comment_base, cid);

        let xml = self
            .client
            .get(&url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| {
                Error::source_unavailable(format!("Danmaku request for cid {cid} failed: {e}"))
            })?
            .text()
            .await
            .map_err(|e| {
                Error::source_unavailable(format!(
                    "Danmaku payload for cid {cid} unreadable: {e}"
                ))
            })?;

        let entries = self.danmaku.parse(&xml);
        debug!(cid, entries = entries.len(), bytes = xml.len(), "Parsed danmaku payload");
        Ok(entries)
    }
}

#[async_trait]
impl CommentSource for BilibiliSource {
    async fn fetch_comments(&self, video_id: &str) -> Result<Vec<String>> {
        let video = self.parse_video_id(video_id)?;
        let cid = self.resolve_cid(&video).await?;
        let entries = self.fetch_entries(cid).await?;

        info!(video = %video, cid, comments = entries.len(), "Fetched danmaku");
        Ok(entries.into_iter().map(|entry| entry.text).collect())
    }

    fn name(&self) -> &str {
        "bilibili"
    }
}
