//! Reasoning-trace extraction.
//!
//! Reasoning-capable models either return their chain of thought in a dedicated response field
//! or inline it in `<think>` blocks inside the content. Either way the trace must be split from
//! the content before the reply is displayed or persisted.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
	static ref THINK_BLOCK_PATTERN: Regex =
		Regex::new(r"(?s)<think>(.*?)</think>").expect("hardcoded pattern is valid");
}

/// A reply content with its reasoning trace split out.
///
/// Returned as a new immutable record; the caller's response object is never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReasoningSplit {
	/// The displayable content, with every `<think>` block removed and whitespace trimmed.
	pub content: String,
	/// The extracted reasoning trace, `None` when the reply carried none.
	pub reasoning: Option<String>,
}

/// Split the reasoning trace out of a model reply.
///
/// An explicit `reasoning_field` (as returned by some APIs) takes precedence; otherwise every
/// inline `<think>` block is collected, trimmed and joined with newlines. The content is cleaned
/// of `<think>` blocks in both cases.
pub fn extract_reasoning(content: &str, reasoning_field: Option<&str>) -> ReasoningSplit {
	let reasoning = match reasoning_field {
		Some(field) if !field.is_empty() => Some(field.to_string()),
		_ => {
			let blocks: Vec<&str> = THINK_BLOCK_PATTERN
				.captures_iter(content)
				.filter_map(|captures| captures.get(1))
				.map(|block| block.as_str().trim())
				.filter(|block| !block.is_empty())
				.collect();

			if blocks.is_empty() {
				None
			} else {
				Some(blocks.join("\n"))
			}
		},
	};

	let cleaned = THINK_BLOCK_PATTERN.replace_all(content, "").trim().to_string();

	ReasoningSplit { content: cleaned, reasoning }
}
