//! Video identifiers

use danmu_core::{Error, Result};
use regex::Regex;

/// A Bilibili video identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum VideoId {
    /// `BV...` identifier, kept verbatim
    Bv(String),

    /// Legacy numeric `av` identifier
    Av(u64),
}

impl VideoId {
    /// Query parameter `(name, value)` for the view endpoint
    pub fn query(&self) -> (&'static str, String) {
        match self {
            Self::Bv(bvid) => ("bvid", bvid.clone()),
            Self::Av(aid) => ("aid", aid.to_string()),
        }
    }
}

impl std::fmt::Display for VideoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bv(bvid) => f.write_str(bvid),
            Self::Av(aid) => write!(f, "av{aid}"),
        }
    }
}

/// Extracts video identifiers from page URLs or bare ids
#[derive(Debug, Clone)]
pub struct VideoIdParser {
    pattern: Regex,
}

impl VideoIdParser {
    pub fn new() -> Result<Self> {
        Ok(Self {
            pattern: Regex::new(r"(?:^|bilibili\.com/video/)(av\d+|BV\w+)")
                .map_err(|e| Error::internal(format!("Failed to compile video id regex: {e}")))?,
        })
    }

    /// Parse `https://www.bilibili.com/video/BV1xx411c7mD?p=1`, `BV1xx411c7mD`
    /// or `av170001`
    pub fn parse(&self, input: &str) -> Result<VideoId> {
        let input = input.trim();
        let id = self
            .pattern
            .captures(input)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
            .ok_or_else(|| Error::source_unavailable(format!("No video id in '{input}'")))?;

        match id.strip_prefix("av") {
            Some(digits) => digits
                .parse()
                .map(VideoId::Av)
                .map_err(|e| Error::source_unavailable(format!("Invalid av id '{id}': {e}"))),
            None => Ok(VideoId::Bv(id.to_string())),
        }
    }
}
