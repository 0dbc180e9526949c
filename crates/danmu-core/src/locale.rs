//! Display language: sentiment labels and classification prompts

use crate::types::SentimentClass;
use serde::{Deserialize, Serialize};

/// Language used for sentiment labels and the remote classification prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DisplayLanguage {
    #[default]
    #[serde(rename = "zh-CN")]
    ZhCn,
    #[serde(rename = "en-US")]
    EnUs,
}

impl DisplayLanguage {
    /// Parse a language code; anything unrecognized falls back to zh-CN
    pub fn from_code(code: &str) -> Self {
        match code.trim().to_ascii_lowercase().as_str() {
            "en-us" | "en" | "en_us" => Self::EnUs,
            _ => Self::ZhCn,
        }
    }

    /// Canonical language code
    pub fn code(&self) -> &'static str {
        match self {
            Self::ZhCn => "zh-CN",
            Self::EnUs => "en-US",
        }
    }

    /// Sentiment label as the remote service is asked to write it
    pub fn label(&self, class: SentimentClass) -> &'static str {
        match (self, class) {
            (Self::ZhCn, SentimentClass::Positive) => "正面",
            (Self::ZhCn, SentimentClass::Negative) => "负面",
            (Self::ZhCn, SentimentClass::Neutral) => "中性",
            (Self::EnUs, SentimentClass::Positive) => "Positive",
            (Self::EnUs, SentimentClass::Negative) => "Negative",
            (Self::EnUs, SentimentClass::Neutral) => "Neutral",
        }
    }

    /// Batched sentiment prompt: one comment per line, one `comment -> label`
    /// line expected back per comment.
    pub fn classification_prompt(&self, comments: &[String]) -> String {
        let joined = comments.join("\n");
        match self {
            Self::ZhCn => format!(
                "分析以下B站弹幕的情绪倾向。每条弹幕只能标记为正面、负面或中性。\n\n{joined}\n\n请按每条弹幕一行，格式为：弹幕内容 -> 情绪（正面/负面/中性）"
            ),
            Self::EnUs => format!(
                "Analyze the sentiment of the following Bilibili danmu comments. Each comment must be labeled Positive, Negative or Neutral.\n\n{joined}\n\nReply with one line per comment in the format: comment -> sentiment (Positive/Negative/Neutral)"
            ),
        }
    }

    /// Batched word segmentation prompt: one `comment -> word word ...` line
    /// expected back per comment.
    pub fn tokenization_prompt(&self, comments: &[String]) -> String {
        let joined = comments.join("\n");
        match self {
            Self::ZhCn => format!(
                "将以下每条弹幕切分为词语。\n\n{joined}\n\n请按每条弹幕一行，格式为：弹幕内容 -> 词语1 词语2 词语3（词语之间用空格分隔）"
            ),
            Self::EnUs => format!(
                "Split each of the following comments into words.\n\n{joined}\n\nReply with one line per comment in the format: comment -> word1 word2 word3 (words separated by spaces)"
            ),
        }
    }
}

impl std::fmt::Display for DisplayLanguage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl std::str::FromStr for DisplayLanguage {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_code(s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_language_defaults_to_chinese() {
        assert_eq!(DisplayLanguage::from_code("fr-FR"), DisplayLanguage::ZhCn);
        assert_eq!(DisplayLanguage::from_code(""), DisplayLanguage::ZhCn);
        assert_eq!(DisplayLanguage::from_code("en-US"), DisplayLanguage::EnUs);
    }

    #[test]
    fn test_prompt_contains_comments_and_labels() {
        let comments = vec!["好棒".to_string(), "无聊".to_string()];
        let prompt = DisplayLanguage::ZhCn.classification_prompt(&comments);

        assert!(prompt.contains("好棒\n无聊"));
        assert!(prompt.contains("弹幕内容 -> 情绪"));

        let prompt = DisplayLanguage::EnUs.classification_prompt(&comments);
        assert!(prompt.contains("Positive/Negative/Neutral"));
    }

    #[test]
    fn test_language_serde_codes() {
        let json = serde_json::to_string(&DisplayLanguage::EnUs).unwrap();
        assert_eq!(json, "\"en-US\"");
    }
}
