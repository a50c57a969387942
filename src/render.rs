//! LaTeX render service interface.

use async_trait::async_trait;

use crate::types::RenderFailure;

/// Adapter over the external LaTeX-to-PNG conversion service.
///
/// The service is stateful: [`LatexRenderer::load_channel`] must be called once per process
/// before the first render. The pipeline otherwise treats the renderer as opaque; concurrent
/// render calls from multiple in-flight replies must be serialized or otherwise made safe by the
/// implementation.
#[async_trait]
pub trait LatexRenderer: Send + Sync {
	fn new() -> Self;

	/// Establish the render session.
	///
	/// `channel` selects a persistent identity on the render service; `None` uses the default
	/// shared session.
	async fn load_channel(&self, channel: Option<&str>) -> crate::Result<()>;

	/// Render `expression` to PNG at the given resolution and foreground colour.
	///
	/// On failure the payload is either a human-readable diagnostic or a pre-rendered error
	/// image; see [`RenderFailure`].
	async fn render(
		&self,
		expression: &str,
		dpi: u32,
		foreground_colour: &str,
	) -> Result<Vec<u8>, RenderFailure>;
}
