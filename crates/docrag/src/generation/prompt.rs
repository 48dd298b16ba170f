//! Prompt templates for question answering

use crate::retrieval::SearchResult;

/// Prompt builder for grounded question answering
pub struct PromptBuilder;

impl PromptBuilder {
    /// Build the context block from search results in rank order
    pub fn build_context(results: &[SearchResult]) -> String {
        results
            .iter()
            .map(|r| r.passage.text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Build the question-answering prompt
    ///
    /// The model is told to answer only from the context and to decline
    /// with a fixed phrase when the context does not contain the answer.
    pub fn build_qa_prompt(question: &str, context: &str) -> String {
        format!(
            r#"Answer the question as detailed as possible from the provided context. Make sure to provide all the details. If the answer is not in the provided context, just say, "The answer is not available in the context." Do not provide a wrong answer.

Context:
{context}

Question: {question}

Answer:"#,
            context = context,
            question = question
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Passage;
    use uuid::Uuid;

    fn result(text: &str, score: f32) -> SearchResult {
        SearchResult {
            passage: Passage::new(Uuid::new_v4(), text.to_string(), None, 0, 0, 0),
            score,
        }
    }

    #[test]
    fn test_context_joins_passages_in_rank_order() {
        let results = vec![result("first passage", 0.9), result("second passage", 0.5)];
        let context = PromptBuilder::build_context(&results);

        assert_eq!(context, "first passage\n\nsecond passage");
    }

    #[test]
    fn test_qa_prompt_embeds_context_and_question() {
        let prompt = PromptBuilder::build_qa_prompt("What is the capital?", "Paris is the capital.");

        assert!(prompt.contains("Context:\nParis is the capital."));
        assert!(prompt.contains("Question: What is the capital?"));
        assert!(prompt.contains("The answer is not available in the context."));
        assert!(prompt.ends_with("Answer:"));
    }
}
