//! Danmaku XML payload parsing
//!
//! The payload is a flat list of `<d p="offset,mode,size,color,...">text</d>`
//! elements. Only the text and the playback offset are kept.

use danmu_core::{Error, Result};
use regex::Regex;

/// One danmaku element
#[derive(Debug, Clone, PartialEq)]
pub struct DanmakuEntry {
    /// Playback offset in seconds
    pub offset_secs: f64,
    pub text: String,
}

/// Extracts `<d>` elements in document order
#[derive(Debug, Clone)]
pub struct DanmakuParser {
    element: Regex,
    attribute: Regex,
}

impl DanmakuParser {
    pub fn new() -> Result<Self> {
        Ok(Self {
            element: Regex::new(r"(?s)<d\b([^>]*)>(.*?)</d>")
                .map_err(|e| Error::internal(format!("Failed to compile danmaku regex: {e}")))?,
            attribute: Regex::new(r#"\bp\s*=\s*"([^"]*)""#)
                .map_err(|e| Error::internal(format!("Failed to compile attribute regex: {e}")))?,
        })
    }

    /// Parse every element, decoding entities and dropping empty texts
    pub fn parse(&self, xml: &str) -> Vec<DanmakuEntry> {
        self.element
            .captures_iter(xml)
            .filter_map(|caps| {
                let text = html_escape::decode_html_entities(caps.get(2)?.as_str()).into_owned();
                if text.trim().is_empty() {
                    return None;
                }

                let offset_secs = caps
                    .get(1)
                    .and_then(|attrs| self.attribute.captures(attrs.as_str()))
                    .and_then(|p| p.get(1))
                    .and_then(|p| p.as_str().split(',').next())
                    .and_then(|offset| offset.trim().parse().ok())
                    .unwrap_or(0.0);

                Some(DanmakuEntry { offset_secs, text })
            })
            .collect()
    }
}
