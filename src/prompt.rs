//! Master prompt template and topic rendering

/// Placeholder substituted by [`render`]. Appears exactly once in [`MASTER_PROMPT`].
pub const TOPIC_PLACEHOLDER: &str = "{topic}";

/// Prompt sent to the model for every tool call.
pub const MASTER_PROMPT: &str = r#"
You are a world-class financial engineer and senior quantitative analyst. You have deep expertise in cryptocurrency trading, algorithmic strategies, advanced statistics, and machine learning models.

Your task is to provide a comprehensive, implementation-focused guide for an AI software developer on the following topic: "{topic}"

You MUST follow these steps:
1.  **Internal Research:** Use your built-in Google Search tool to conduct thorough research on the topic. Find the official definition, the underlying mathematical or logical formula, common use cases in the crypto domain, and popular Python implementations.
2.  **Critical Synthesis:** Analyze the search results. Discard any promotional fluff, irrelevant information, or overly simplistic explanations. Synthesize the core, actionable knowledge.
3.  **Structured Formatting:** You MUST format your entire final answer as a single, valid JSON object. There should be NO text, explanation, or markdown outside of the ```json ... ``` block.

The JSON object must strictly follow this structure:
{
  "name": "The full, official name of the concept.",
  "description": "A clear, concise explanation of what the concept is and its primary purpose.",
  "use_case_in_crypto": "Specific, practical applications of this concept for cryptocurrency analysis or trading, based on your research.",
  "components_or_formula": "The mathematical formula, key components, or logical steps explained clearly. This must be a string.",
  "implementation_steps": [
    "A numbered list of high-level steps for a developer to follow for implementation.",
    "Step 2...",
    "Step 3..."
  ],
  "python_example": "A clean, well-commented, and practical Python code snippet demonstrating a common implementation. The code should be self-contained where possible.",
  "key_considerations": [
      "A list of potential pitfalls, limitations, or expert best practices to be aware of during implementation.",
      "Consideration 2..."
  ]
}

Now, begin your research and provide the structured response for the specified topic.
"#;

/// Render the master prompt for a topic.
///
/// The topic is inserted verbatim; nothing in it is escaped or interpreted,
/// so a topic that itself contains `{topic}` is left as-is.
pub fn render(topic: &str) -> String {
    MASTER_PROMPT.replacen(TOPIC_PLACEHOLDER, topic, 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_has_single_placeholder() {
        assert_eq!(MASTER_PROMPT.matches(TOPIC_PLACEHOLDER).count(), 1);
    }

    #[test]
    fn test_render_substitutes_topic() {
        let prompt = render("Sharpe ratio");
        assert!(prompt.contains(r#"the following topic: "Sharpe ratio""#));
        assert!(!prompt.contains(TOPIC_PLACEHOLDER));
    }

    #[test]
    fn test_render_preserves_rest_of_template() {
        let topic = "cryptocurrency technical indicator: RSI";
        let prompt = render(topic);
        let at = MASTER_PROMPT.find(TOPIC_PLACEHOLDER).unwrap();

        assert_eq!(&prompt[..at], &MASTER_PROMPT[..at]);
        assert_eq!(&prompt[at..at + topic.len()], topic);
        assert_eq!(
            &prompt[at + topic.len()..],
            &MASTER_PROMPT[at + TOPIC_PLACEHOLDER.len()..]
        );
    }

    #[test]
    fn test_render_is_verbatim() {
        let prompt = render("{topic} and {{braces}}");
        assert!(prompt.contains(r#""{topic} and {{braces}}""#));
    }

    #[test]
    fn test_template_describes_expected_keys() {
        for key in [
            "\"name\"",
            "\"description\"",
            "\"use_case_in_crypto\"",
            "\"components_or_formula\"",
            "\"implementation_steps\"",
            "\"python_example\"",
            "\"key_considerations\"",
        ] {
            assert!(MASTER_PROMPT.contains(key), "missing {key}");
        }
    }
}
