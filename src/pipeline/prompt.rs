//! Prompt templates for the pipeline stages

use crate::types::chunk::RetrievedChunk;
use crate::types::response::SubQueryAnswer;

/// Prompt builder for decomposition, answering, and fusion
pub struct PromptBuilder;

impl PromptBuilder {
    /// Prompt asking the model to split a query into independent
    /// sub-questions, one per line.
    pub fn build_decompose_prompt(query: &str, max_subqueries: usize) -> String {
        format!(
            r#"You are an expert in drug information. Split the following user query into up to {max_subqueries} independent sub-questions.
Return each sub-question on a separate line.

User query: "{query}""#
        )
    }

    /// Grounded answering prompt: all retrieved chunk texts verbatim, answer
    /// strictly from them.
    pub fn build_answer_prompt(sub_query: &str, chunks: &[RetrievedChunk]) -> String {
        let context = chunks
            .iter()
            .map(|c| format!("Chunk: {}", c.text))
            .collect::<Vec<_>>()
            .join("\n\n");

        format!(
            r#"You are a medical expert. Answer the question below using ONLY the information from the retrieved chunks.
Do not make assumptions or hallucinate. Be concise and precise.

{context}

Question: {sub_query}
Answer:"#
        )
    }

    /// Fusion prompt: sub-answers as a numbered list, synthesize one coherent
    /// answer from the supplied material only.
    pub fn build_combine_prompt(user_query: &str, answers: &[SubQueryAnswer]) -> String {
        let combined = answers
            .iter()
            .enumerate()
            .map(|(i, a)| format!("{}. {}", i + 1, a.answer))
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            r#"You are a medical expert. The user asked the following question:

{user_query}

Here are the answers to sub-questions:

{combined}

Combine these into a single, concise, coherent answer. Only use the provided information.
Final Answer:"#
        )
    }
}
