use std::{marker::PhantomData, time::Duration};

use tracing::{debug, error, instrument, trace};

use crate::{
	scanner::{self, TagKind},
	shield::ShieldMap,
	types::{BrocadeError, RenderFailure, RichMessage, Segment, WeaveError},
	Config, ImageFetcher, LatexRenderer,
};

/// User-facing marker appended when a LaTeX span fails to render.
const LATEX_FAILURE_MARKER: &str = "（公式解析失败）";
/// User-facing marker appended when the scanner matched a tag it could not classify.
const UNKNOWN_TAG_MARKER: &str = "（未知内容解析失败）";

/// The rich-text pipeline.
///
/// Parses one model reply, shields fenced code blocks, resolves embedded image references and
/// LaTeX spans, and reassembles everything as an ordered [`RichMessage`].
///
/// This is implemented over the [`Config`] trait.
pub struct Brocade<T: Config> {
	fetcher: T::Fetcher,
	renderer: T::Renderer,
	foreground_colour: String,
	_phantom: PhantomData<T>,
}

impl<T: Config> Brocade<T> {
	/// Creates a new instance of `Brocade`.
	///
	/// `foreground_colour` is handed to the render service for every formula.
	pub fn new(foreground_colour: impl Into<String>) -> Self {
		Self {
			fetcher: T::Fetcher::new(Duration::from_secs(T::FETCH_TIMEOUT_SECS)),
			renderer: T::Renderer::new(),
			foreground_colour: foreground_colour.into(),
			_phantom: PhantomData,
		}
	}

	/// Whether rich-text parsing is switched on for this deployment.
	///
	/// Callers should check this before invoking [`Brocade::weave`].
	pub fn enabled() -> bool {
		T::RICHTEXT_ENABLED
	}

	/// The renderer adapter, exposed so the host process can call
	/// [`LatexRenderer::load_channel`] once at startup.
	pub fn renderer(&self) -> &T::Renderer {
		&self.renderer
	}

	/// Post-process one model reply into an ordered sequence of text and image segments.
	///
	/// Replies without embedded content short-circuit into a single text segment. Fetch and
	/// render failures degrade to text locally and never abort the whole reply; the only error
	/// this method surfaces is a scanner/shield desynchronization, which indicates a bug rather
	/// than bad input.
	#[instrument(skip(self, msg))]
	pub async fn weave(&self, msg: &str) -> Result<RichMessage, BrocadeError> {
		if !scanner::has_tags(msg) {
			return Ok(RichMessage::text(msg))
		}

		let (shielded, shield_map) = ShieldMap::shield(msg);

		trace!("Shielded {} code block(s)", shield_map.len());

		let mut result = RichMessage::new();
		let mut last_index = 0usize;

		for tag in scanner::scan(&shielded) {
			// Matches arrive in document order over the same string the shield produced. A match
			// starting inside the already-consumed prefix means the two desynchronized.
			if tag.start < last_index {
				error!("Tag {:?} overlaps already-consumed text", tag.raw);
				return Err(WeaveError::TagDesynchronized(tag.raw).into())
			}

			result.push_text(shield_map.unshield(&shielded[last_index..tag.start]));
			last_index = tag.end;

			match tag.kind {
				TagKind::Image => {
					let tag_found = shield_map.unshield(&tag.raw);
					self.weave_image(&mut result, &tag_found).await;
				},
				TagKind::Latex => {
					// Delimiters are stripped before unshielding so that delimiter characters
					// inside a shielded code block survive untouched.
					let expression = shield_map.unshield(&strip_latex_delimiters(&tag.raw));
					self.weave_latex(&mut result, &expression).await;
				},
				TagKind::Unrecognized => {
					let tag_found = shield_map.unshield(&tag.raw);
					result.push_text(format!("{}{}", tag_found, UNKNOWN_TAG_MARKER));
				},
			}
		}

		result.push_text(shield_map.unshield(&shielded[last_index..]));

		Ok(result)
	}

	/// Resolve one Markdown image reference.
	///
	/// On a successful fetch the image segment is followed by a parenthesized plain-text caption
	/// for clients that cannot render images. On failure the literal tag text is emitted
	/// instead.
	async fn weave_image(&self, result: &mut RichMessage, tag_found: &str) {
		let description = match tag_found.find(']') {
			Some(end) => &tag_found[2..end],
			None => "",
		};
		let url = match tag_found.find('(') {
			Some(open) => &tag_found[open + 1..tag_found.len() - 1],
			None => "",
		};

		match self.fetcher.fetch(url).await {
			Some(image) => {
				result.push(Segment::Image {
					raw: image.raw,
					mimetype: image.mimetype,
					name: format!("{}.png", description),
				});
				result.push_text(format!("（{}）", description));
			},
			None => {
				debug!("Degrading unfetchable image {} to literal text", url);
				result.push_text(tag_found.to_string());
			},
		}
	}

	/// Render one LaTeX expression.
	///
	/// Render failures degrade to the original expression plus a failure marker, followed by
	/// whichever diagnostic shape the service returned.
	async fn weave_latex(&self, result: &mut RichMessage, expression: &str) {
		match self
			.renderer
			.render(expression, T::LATEX_DPI, &self.foreground_colour)
			.await
		{
			Ok(png) => result.push(Segment::Image {
				raw: png,
				mimetype: "image/png".to_string(),
				name: "latex.png".to_string(),
			}),
			Err(failure) => {
				debug!("Degrading unrenderable formula {:?} to text", expression);
				result.push_text(format!("{}{}", expression, LATEX_FAILURE_MARKER));
				match failure {
					RenderFailure::Diagnostic(diagnostic) => result.push_text(diagnostic),
					RenderFailure::ErrorImage(raw) => result.push(Segment::Image {
						raw,
						mimetype: "image/png".to_string(),
						name: "latex_error.png".to_string(),
					}),
				}
			},
		}
	}
}

/// Strip every LaTeX delimiter family from a matched span, leaving the expression body.
fn strip_latex_delimiters(raw: &str) -> String {
	raw.replace('$', "")
		.replace("\\(", "")
		.replace("\\)", "")
		.replace("\\[", "")
		.replace("\\]", "")
}
