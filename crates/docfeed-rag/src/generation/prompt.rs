//! Prompt templates for normalization, chunking, and answering
//!
//! The chunking prompt carries the output contract the parser in
//! `ingestion::chunker` depends on: every chunk except the last is
//! terminated by the exact sequence `]*,`.

use crate::ingestion::chunker::CHUNK_DELIMITER;

/// Fixed sentence the answering path emits when no relevant context exists
pub const FALLBACK_SENTENCE: &str = "Feed me more documents to answer this question.";

/// A system/user prompt pair for one generative call
#[derive(Debug, Clone)]
pub struct Prompt {
    /// System instruction (role and rules)
    pub system: String,
    /// User turn (the payload)
    pub user: String,
}

/// Prompt builder for the three generative calls in the pipeline
pub struct PromptBuilder;

impl PromptBuilder {
    /// Build the normalization prompt: markdown in, plain text out,
    /// nothing dropped.
    pub fn normalization(text: &str) -> Prompt {
        let system = "\
You are a text preprocessor for an embeddings model. Convert markdown-formatted \
text into plain text by removing all markdown syntax and formatting: headers, \
emphasis, lists, tables, code fences, and emojis. Keep header text as plain \
sentences. For links, keep both the link text and the URL. For images, keep the \
alt text. For code blocks, keep the code itself as literal text. Every piece of \
original textual content, including URLs, must be preserved in the output, free \
of markdown-specific characters, so the embeddings model sees clean text."
            .to_string();

        Prompt {
            system,
            user: format!("Convert the following markdown to plain text: {}", text),
        }
    }

    /// Build the chunking prompt with the delimiter output contract.
    pub fn chunking(text: &str) -> Prompt {
        let system = format!(
            "\
You split long text into chunks of approximately 100 words each. Rules:
1. Output only the chunks, no headings or commentary.
2. Terminate every chunk except the last with the exact sequence \"{delim}\". \
The last chunk has no terminator.
3. Each chunk must be a coherent piece of text that makes sense on its own. \
Never split a sentence or paragraph in the middle; if a boundary would fall \
mid-sentence, include the whole sentence in that chunk.
4. Prefer natural breaks such as headings, lists, or sections, and never break \
inside a list or a section.
5. Chunks must not duplicate each other, and together they must cover the \
entire input without omission.
These chunks are embedded and stored individually in a vector database, and \
user questions are answered by retrieving them, so each chunk must stand alone \
without semantic loss.",
            delim = CHUNK_DELIMITER
        );

        Prompt {
            system,
            user: format!("Split the following text into chunks: {}", text),
        }
    }

    /// Build the answering prompt from retrieved context and the question.
    pub fn answering(context: &str, question: &str) -> Prompt {
        let system = format!(
            "\
You are a professional question answering model. Answer the question using the \
context below. If the context is not relevant to the question, respond with \
exactly: \"{fallback}\"
Always format your response as proper markdown. Never say that your answer is \
based on the provided context.

Context: {context}",
            fallback = FALLBACK_SENTENCE,
            context = context
        );

        Prompt {
            system,
            user: format!("Answer the following question: {}", question),
        }
    }
}
