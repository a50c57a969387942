//! Utility layer for chat-bot plugins driven by a language-model API.
//!
//! The centerpiece of this crate is the rich-text pipeline implemented by [`Brocade`]. Model
//! replies frequently embed Markdown image references, LaTeX formulas and fenced code blocks;
//! [`Brocade::weave`] parses such a reply and reassembles it as an ordered [`RichMessage`] of
//! plain-text and image segments, ready to be handed to a chat transport. Code blocks are
//! shielded behind collision-resistant placeholders so their content is never mistaken for
//! embedded tags, images are fetched over HTTP, and LaTeX spans are rendered to PNG through an
//! external render service.
//!
//! Around the pipeline, the crate carries the small utilities a chat-bot plugin typically needs:
//! reasoning-trace extraction ([`reasoning`]), a JSON document store for nicknames, praise lists
//! and conversation backups ([`store`]), and system-prompt assembly ([`prompt`]).
//!
//! Effective use of this crate necessitates the implementation of the [`Config`] trait, wiring
//! in an [`ImageFetcher`] (the out-of-the-box [`HttpFetcher`] suffices for most deployments) and
//! a [`LatexRenderer`] adapter for whichever render service the host process talks to.
//!
//! # Example
//!
//! ```ignore
//! use brocade::{Brocade, Config, HttpFetcher, Segment};
//!
//! #[derive(Debug)]
//! struct Bot;
//!
//! impl Config for Bot {
//!     type Fetcher = HttpFetcher;
//!     type Renderer = MyRenderServiceAdapter;
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let brocade = Brocade::<Bot>::new("#ffaa99");
//!     brocade.renderer().load_channel(None).await.unwrap();
//!
//!     let reply = "Euler's identity: $e^{i\\pi} + 1 = 0$";
//!     let message = brocade.weave(reply).await.unwrap();
//!
//!     for segment in message.segments() {
//!         match segment {
//!             Segment::Text(text) => println!("text: {}", text),
//!             Segment::Image { name, .. } => println!("image: {}", name),
//!         }
//!     }
//! }
//! ```

pub mod fetch;
pub mod prompt;
pub mod reasoning;
pub mod render;
mod scanner;
mod shield;
pub mod store;
pub mod types;
mod weave;

#[cfg(test)]
mod mock;

pub use fetch::{HttpFetcher, ImageFetcher};
pub use render::LatexRenderer;
pub use types::{BrocadeError, FetchedImage, RenderFailure, RichMessage, Segment, WeaveError};
pub use weave::Brocade;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// A trait consisting of the main configuration parameters for [`Brocade`].
pub trait Config: Send + Sync + 'static {
	/// Whether rich-text parsing is switched on for this deployment.
	///
	/// The pipeline is constructible regardless of this flag; callers are expected to check
	/// [`Brocade::enabled`] before invoking [`Brocade::weave`] and fall back to plain text
	/// delivery when it is `false`.
	///
	/// Defaults to `true`.
	const RICHTEXT_ENABLED: bool = true;
	/// Timeout in seconds applied to each image fetch.
	///
	/// Defaults to `10`.
	const FETCH_TIMEOUT_SECS: u64 = 10;
	/// Resolution passed to the LaTeX render service.
	///
	/// Defaults to `300`.
	const LATEX_DPI: u32 = 300;

	/// Retrieves binary content and MIME type for image URLs embedded in replies.
	///
	/// [`HttpFetcher`] is the out-of-the-box implementation.
	type Fetcher: ImageFetcher;
	/// Adapter over the external LaTeX-to-PNG render service.
	type Renderer: LatexRenderer;
}
