//! Embedded-content tag scanner.
//!
//! A single pattern alternation drives the pipeline's main iteration, matching Markdown image
//! references and LaTeX delimiter spans left to right, non-overlapping. Image references come
//! first in the alternation: an image URL may itself look like LaTeX, so the image reading has
//! to win.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
	/// Markdown image reference `![desc](url)` or LaTeX delimiter span
	/// (`$...$`, `\(...\)`, `\[...\]`), with non-greedy bodies.
	static ref IMG_LATEX_PATTERN: Regex = Regex::new(
		r"(?s)(?P<image>!\[.*?\]\(.*?\))|(?P<latex>\$.*?\$|\\\(.*?\\\)|\\\[.*?\\\])"
	)
	.expect("hardcoded pattern is valid");
}

/// How one scanner match is classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TagKind {
	Image,
	Latex,
	/// The outer pattern matched but no inner group populated. Defensive fallback; the current
	/// alternation always populates exactly one group.
	Unrecognized,
}

/// A located span in the shielded working text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TagMatch {
	/// Raw matched text, possibly containing shield placeholders.
	pub raw: String,
	/// Byte offset of the span's start in the shielded text.
	pub start: usize,
	/// Byte offset one past the span's end in the shielded text.
	pub end: usize,
	pub kind: TagKind,
}

/// Whether `msg` contains any embedded-content tag at all.
///
/// Runs on the raw reply before shielding: shielding and rendering are only worth doing when
/// embedded content exists.
pub(crate) fn has_tags(msg: &str) -> bool {
	IMG_LATEX_PATTERN.is_match(msg)
}

/// All tag matches in `msg`, in document order.
pub(crate) fn scan(msg: &str) -> Vec<TagMatch> {
	IMG_LATEX_PATTERN
		.captures_iter(msg)
		.map(|captures| {
			let whole = captures.get(0).expect("group 0 always participates");
			let kind = if captures.name("image").is_some() {
				TagKind::Image
			} else if captures.name("latex").is_some() {
				TagKind::Latex
			} else {
				TagKind::Unrecognized
			};

			TagMatch {
				raw: whole.as_str().to_string(),
				start: whole.start(),
				end: whole.end(),
				kind,
			}
		})
		.collect()
}
