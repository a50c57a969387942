//! Code-block shielding.
//!
//! Fenced code blocks regularly contain text that looks like an image reference or a LaTeX span.
//! Before the scanner runs, every fenced span is swapped for a collision-resistant placeholder
//! token; the assembler swaps the originals back in as it emits segments.

use lazy_static::lazy_static;
use regex::Regex;
use uuid::Uuid;

lazy_static! {
	/// Fenced code-block span, including multi-line content.
	static ref CODE_BLOCK_PATTERN: Regex =
		Regex::new(r"(?s)```.+?```").expect("hardcoded pattern is valid");
}

/// Ordered (placeholder, original) pairs recorded while shielding one reply.
///
/// Placeholder tokens are fixed-length random hex, so no token can be a substring of another and
/// unshielding is a total, order-independent substitution. The map is call-local; it is built
/// fresh for every pipeline invocation.
#[derive(Debug, Default, Clone)]
pub(crate) struct ShieldMap {
	pairs: Vec<(String, String)>,
}

impl ShieldMap {
	/// Replace every fenced code block in `msg` with a fresh placeholder token.
	///
	/// Returns the shielded text along with the map required to restore it. Identical code
	/// blocks each receive their own token; replacement consumes one occurrence per match, in
	/// document order.
	pub(crate) fn shield(msg: &str) -> (String, Self) {
		let pairs: Vec<(String, String)> = CODE_BLOCK_PATTERN
			.find_iter(msg)
			.map(|m| (Uuid::new_v4().simple().to_string(), m.as_str().to_string()))
			.collect();

		let mut shielded = msg.to_string();
		for (token, original) in &pairs {
			shielded = shielded.replacen(original.as_str(), token.as_str(), 1);
		}

		(shielded, Self { pairs })
	}

	/// Restore every placeholder occurring in `msg` to its original code block.
	///
	/// Idempotent when `msg` carries no placeholders.
	pub(crate) fn unshield(&self, msg: &str) -> String {
		let mut restored = msg.to_string();
		for (token, original) in &self.pairs {
			restored = restored.replace(token.as_str(), original.as_str());
		}
		restored
	}

	/// Number of shielded code blocks.
	pub(crate) fn len(&self) -> usize {
		self.pairs.len()
	}
}
