//! Property-based tests for crypto-knowledge
//!
//! These tests verify invariants that must hold for all inputs:
//! - Prompt rendering only touches the placeholder
//! - The normalizer never panics and always yields exactly one shape
//! - Fenced JSON objects survive extraction unchanged
//!
//! Run with: cargo test --test property_tests

use proptest::prelude::*;

// ============================================================================
// PROMPT RENDERING TESTS
// ============================================================================

mod prompt_tests {
    use super::*;
    use crypto_knowledge::prompt::{render, MASTER_PROMPT, TOPIC_PLACEHOLDER};

    proptest! {
        /// Invariant: output is the template with the topic spliced in at the placeholder
        #[test]
        fn only_placeholder_changes(topic in "\\PC{1,80}") {
            let at = MASTER_PROMPT.find(TOPIC_PLACEHOLDER).unwrap();
            let rendered = render(&topic);

            prop_assert_eq!(&rendered[..at], &MASTER_PROMPT[..at]);
            prop_assert_eq!(&rendered[at..at + topic.len()], topic.as_str());
            prop_assert_eq!(
                &rendered[at + topic.len()..],
                &MASTER_PROMPT[at + TOPIC_PLACEHOLDER.len()..]
            );
        }

        /// Invariant: rendered length grows by exactly the topic/placeholder difference
        #[test]
        fn length_is_predictable(topic in ".{1,200}") {
            let rendered = render(&topic);
            prop_assert_eq!(
                rendered.len(),
                MASTER_PROMPT.len() - TOPIC_PLACEHOLDER.len() + topic.len()
            );
        }
    }
}

// ============================================================================
// NORMALIZER TESTS
// ============================================================================

mod normalize_tests {
    use super::*;
    use crypto_knowledge::normalize::{normalize, NormalizedResult};
    use serde_json::{Map, Value};

    fn json_object() -> impl Strategy<Value = Value> {
        prop::collection::vec(("[a-z_]{1,12}", "[A-Za-z0-9 .,:;()+-]{0,40}"), 0..6).prop_map(
            |pairs| {
                let mut map = Map::new();
                for (k, v) in pairs {
                    map.insert(k, Value::String(v));
                }
                Value::Object(map)
            },
        )
    }

    proptest! {
        /// Invariant: normalize never panics on any string input
        #[test]
        fn never_panics(s in ".*") {
            let _ = normalize(&s);
        }

        /// Invariant: a fenced object comes back exactly, whatever prose surrounds it
        #[test]
        fn fenced_object_round_trips(
            value in json_object(),
            before in "[A-Za-z .,!?]{0,60}",
            after in "[A-Za-z .,!?]{0,60}",
        ) {
            let text = format!(
                "{}\n```json\n{}\n```\n{}",
                before,
                serde_json::to_string_pretty(&value).unwrap(),
                after
            );
            prop_assert_eq!(normalize(&text), NormalizedResult::Parsed(value));
        }

        /// Invariant: pretty output is stable for the same input
        #[test]
        fn pretty_output_is_stable(value in json_object()) {
            let text = format!("```json\n{}\n```", value);
            prop_assert_eq!(normalize(&text).to_pretty_json(), normalize(&text).to_pretty_json());
        }

        /// Invariant: failures always carry the full original text
        #[test]
        fn envelope_keeps_raw(s in "x[A-Za-z ]{0,80}") {
            // A leading bare letter can never start valid JSON
            match normalize(&s) {
                NormalizedResult::Unparsed { raw } => prop_assert_eq!(raw, s),
                NormalizedResult::Parsed(v) => prop_assert!(false, "unexpected parse: {}", v),
            }
        }
    }
}
