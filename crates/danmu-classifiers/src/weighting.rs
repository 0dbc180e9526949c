//! Weight expansion: restore raw-stream statistics from a unique-item
//! classification

use danmu_core::{Classification, FrequencyTable, SentimentClass, WeightedClassification};

/// Repeat every classified comment by its occurrence count.
///
/// A comment missing from `table` contributes nothing. When every
/// classified comment is present in the table, the weighted total equals
/// `table.total()`.
pub fn expand_weights(
    classification: &Classification,
    table: &FrequencyTable,
) -> WeightedClassification {
    let mut weighted = WeightedClassification::default();
    for class in SentimentClass::PRECEDENCE {
        for text in classification.bucket(class) {
            weighted.extend_repeated(class, text, table.count(text));
        }
    }
    weighted
}
