//! Prompt assembly for answer synthesis.
//!
//! One fixed template with two slots. No truncation, no token budgeting,
//! no escaping of special characters: the context and question are
//! substituted verbatim. That is a deliberate simplification, not a
//! hardened prompt-injection defense.

/// Fill the answer-synthesis template with retrieved context and the
/// user's question.
pub fn render_prompt(context: &str, question: &str) -> String {
    format!(
        "Answer the question based only on the following context:\n\n\
         {context}\n\n\
         ---\n\n\
         Answer the question based on the above context: {question}"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_contains_question_and_context() {
        let prompt = render_prompt(
            "Paris is the capital of France.",
            "What is the capital of France?",
        );
        assert!(prompt.contains("Paris is the capital of France."));
        assert!(prompt.contains("Answer the question based on the above context: What is the capital of France?"));
        assert!(prompt.starts_with("Answer the question based only on the following context:"));
    }

    #[test]
    fn test_prompt_keeps_special_characters_verbatim() {
        // Braces and template-looking text in either slot pass through untouched
        let prompt = render_prompt("chunk with {question} inside", "ask about {context}");
        assert!(prompt.contains("chunk with {question} inside"));
        assert!(prompt.contains("ask about {context}"));
    }

    #[test]
    fn test_prompt_preserves_joined_context() {
        let context = "first\n\n---\n\nsecond";
        let prompt = render_prompt(context, "q");
        assert!(prompt.contains(context));
    }
}
