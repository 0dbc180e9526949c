//! Property tests over the local path: aggregation, lexicon, weighting and
//! term extraction

use danmu_classifiers::{
    expand_weights, parse_classification, LexiconClassifier, WordFrequencyExtractor,
};
use danmu_core::{DisplayLanguage, FrequencyTable};
use proptest::prelude::*;
use std::collections::HashSet;

fn comment_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("好棒".to_string()),
        Just("无聊".to_string()),
        Just("不好".to_string()),
        Just("前方 高能".to_string()),
        "[a-z好差 ，。!]{0,8}",
    ]
}

proptest! {
    #[test]
    fn prop_lexicon_partitions_unique_set(comments in proptest::collection::vec(comment_strategy(), 0..40)) {
        let table = FrequencyTable::aggregate(&comments);
        let unique = table.unique();
        let classification = LexiconClassifier::new().unwrap().classify_all(&unique);

        prop_assert_eq!(classification.len(), unique.len());
        let seen: HashSet<&str> = classification.iter().map(|(_, text)| text).collect();
        prop_assert_eq!(seen.len(), unique.len());
    }

    #[test]
    fn prop_lexicon_is_deterministic(comments in proptest::collection::vec(comment_strategy(), 0..40)) {
        let classifier = LexiconClassifier::new().unwrap();
        prop_assert_eq!(classifier.classify_all(&comments), classifier.classify_all(&comments));
    }

    #[test]
    fn prop_weighted_total_is_raw_total(comments in proptest::collection::vec(comment_strategy(), 0..40)) {
        let table = FrequencyTable::aggregate(&comments);
        let classification = LexiconClassifier::new().unwrap().classify_all(&table.unique());

        prop_assert_eq!(expand_weights(&classification, &table).total(), table.total());
    }

    #[test]
    fn prop_term_table_is_ranked_and_bounded(
        comments in proptest::collection::vec("[a-d好棒 ，]{0,12}", 0..120),
        limit in 1usize..60,
    ) {
        let table = FrequencyTable::aggregate(&comments);
        let terms = WordFrequencyExtractor::with_limit(limit).extract(&table.unique(), &table, None);

        prop_assert!(terms.len() <= limit);
        prop_assert!(terms.iter().all(|t| t.term.chars().count() > 1));
        prop_assert!(terms.windows(2).all(|w| w[0].weight >= w[1].weight));
    }

    #[test]
    fn prop_reply_parsing_never_panics(reply in "[a-z好 >\n-]{0,64}") {
        let classification = parse_classification(&reply, DisplayLanguage::ZhCn);
        prop_assert!(classification.len() <= reply.lines().count());
    }
}
