//! danmu core
//!
//! Core types, traits, and utilities shared across the danmu analysis crates.
//!
//! This crate provides:
//! - Comment, classification and term-frequency types
//! - Error types and result handling
//! - Frequency aggregation of raw comment streams
//! - Display-language labels and classification prompts
//! - Provider adapters for remote text-classification services

pub mod adapters;
pub mod error;
pub mod frequency;
pub mod locale;
pub mod provider;
pub mod source;
pub mod types;

pub use adapters::{
    anthropic_adapter, AdapterConfig, AuthScheme, ConfigurableAdapter, OpenAiAdapter,
};
pub use error::{Error, Result};
pub use frequency::FrequencyTable;
pub use locale::DisplayLanguage;
pub use provider::{AdapterRegistry, ProviderAdapter, ProviderId, ProviderRequest};
pub use source::CommentSource;
pub use types::{
    ChatMessage, Classification, SentimentClass, SentimentSummary, TermFrequency,
    TermFrequencyTable, WeightedClassification,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::frequency::FrequencyTable;
    pub use crate::locale::DisplayLanguage;
    pub use crate::provider::{ProviderAdapter, ProviderId};
    pub use crate::source::CommentSource;
    pub use crate::types::{Classification, SentimentClass, WeightedClassification};
}
