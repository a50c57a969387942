use std::fmt::Display;

/// One atomic unit of an assembled [`RichMessage`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
	/// Plain text to be delivered verbatim.
	Text(String),
	/// An inline image with its raw bytes, MIME type and display name.
	Image { raw: Vec<u8>, mimetype: String, name: String },
}

/// An ordered sequence of [`Segment`]s assembled from one model reply.
///
/// Segment order equals the left-to-right order of content in the original reply. The message is
/// built fresh per [`crate::Brocade::weave`] invocation and shares no state with other
/// invocations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RichMessage(Vec<Segment>);

impl RichMessage {
	pub fn new() -> Self {
		Self(Vec::new())
	}

	/// A message consisting of a single text segment.
	pub fn text(msg: impl Into<String>) -> Self {
		Self(vec![Segment::Text(msg.into())])
	}

	pub fn push(&mut self, segment: Segment) {
		self.0.push(segment);
	}

	/// Append a text segment, eliding it when the content is empty.
	pub fn push_text(&mut self, text: String) {
		if !text.is_empty() {
			self.0.push(Segment::Text(text));
		}
	}

	pub fn segments(&self) -> &[Segment] {
		&self.0
	}

	pub fn into_segments(self) -> Vec<Segment> {
		self.0
	}

	/// Concatenation of all text segments, ignoring images.
	pub fn plain_text(&self) -> String {
		self.0
			.iter()
			.filter_map(|segment| match segment {
				Segment::Text(text) => Some(text.as_str()),
				Segment::Image { .. } => None,
			})
			.collect()
	}
}

impl IntoIterator for RichMessage {
	type Item = Segment;
	type IntoIter = std::vec::IntoIter<Segment>;

	fn into_iter(self) -> Self::IntoIter {
		self.0.into_iter()
	}
}

/// Raw bytes and MIME type of an image retrieved by an [`crate::ImageFetcher`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedImage {
	pub raw: Vec<u8>,
	pub mimetype: String,
}

/// Failure payload returned by a [`crate::LatexRenderer`].
///
/// Render services report failures either as a human-readable diagnostic or as a pre-rendered
/// error image; the pipeline handles both shapes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderFailure {
	/// Human-readable diagnostic describing why the expression could not be rendered.
	Diagnostic(String),
	/// PNG bytes of an error image rendered by the service itself.
	ErrorImage(Vec<u8>),
}

#[derive(Debug, thiserror::Error)]
pub enum BrocadeError {
	Weave(#[from] WeaveError),
	Store(#[from] StoreError),
}

impl Display for BrocadeError {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Weave(e) => write!(f, "{}", e),
			Self::Store(e) => write!(f, "{}", e),
		}
	}
}

#[derive(Debug, thiserror::Error)]
pub enum WeaveError {
	/// The scanner and the code-block shield desynchronized while reassembling a reply.
	///
	/// This is a programming-error class, distinct from fetch and render failures which degrade
	/// to text locally. It must propagate rather than silently corrupt segment ordering.
	TagDesynchronized(String),
}

impl Display for WeaveError {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::TagDesynchronized(tag) => {
				write!(f, "Tag desynchronized from shielded text: {}", tag)
			},
		}
	}
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
	Io(#[from] std::io::Error),
	Parsing(#[from] serde_json::Error),
}

impl Display for StoreError {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			StoreError::Io(e) => write!(f, "IO error: {}", e),
			StoreError::Parsing(e) => write!(f, "Parsing error: {}", e),
		}
	}
}
