use std::time::Duration;

use async_trait::async_trait;

use crate::{
	types::{FetchedImage, RenderFailure},
	Config, ImageFetcher, LatexRenderer,
};

pub const MOCK_IMAGE_BYTES: &[u8] = b"\x89PNG mock image";
pub const MOCK_ERROR_IMAGE_BYTES: &[u8] = b"\x89PNG mock error image";

/// Expression marker that makes [`MockRenderer`] fail with a diagnostic string.
pub const DIAGNOSTIC_FAILURE_MARKER: &str = "\\diagfail";
/// Expression marker that makes [`MockRenderer`] fail with an error image.
pub const ERROR_IMAGE_FAILURE_MARKER: &str = "\\imgfail";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockConfig;

impl Config for MockConfig {
	type Fetcher = MockFetcher;
	type Renderer = MockRenderer;
}

/// Deterministic fetcher: succeeds with fixed bytes unless the URL contains `missing`.
#[derive(Debug, Clone)]
pub struct MockFetcher;

#[async_trait]
impl ImageFetcher for MockFetcher {
	fn new(_timeout: Duration) -> Self {
		Self
	}

	async fn fetch(&self, url: &str) -> Option<FetchedImage> {
		if url.contains("missing") {
			return None
		}

		Some(FetchedImage { raw: MOCK_IMAGE_BYTES.to_vec(), mimetype: "image/png".to_string() })
	}
}

/// Deterministic renderer: renders `rendered:<expression>` bytes unless the expression carries
/// one of the failure markers, so tests can observe exactly what reached the service.
#[derive(Debug, Clone)]
pub struct MockRenderer;

#[async_trait]
impl LatexRenderer for MockRenderer {
	fn new() -> Self {
		Self
	}

	async fn load_channel(&self, _channel: Option<&str>) -> crate::Result<()> {
		Ok(())
	}

	async fn render(
		&self,
		expression: &str,
		_dpi: u32,
		_foreground_colour: &str,
	) -> Result<Vec<u8>, RenderFailure> {
		if expression.contains(DIAGNOSTIC_FAILURE_MARKER) {
			return Err(RenderFailure::Diagnostic("undefined control sequence".to_string()))
		}
		if expression.contains(ERROR_IMAGE_FAILURE_MARKER) {
			return Err(RenderFailure::ErrorImage(MOCK_ERROR_IMAGE_BYTES.to_vec()))
		}

		Ok(format!("rendered:{}", expression).into_bytes())
	}
}
