//! Image retrieval for embedded Markdown references.

use std::time::Duration;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine};
use reqwest::{header, StatusCode};
use tracing::debug;

use crate::types::FetchedImage;

/// Latest Firefox identification header; some image hosts reject clients without one.
const BROWSER_USER_AGENT: &str =
	"Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:134.0) Gecko/20100101 Firefox/134.0";

/// Retrieves binary content and MIME type for a URL.
///
/// Implementations never fail for ordinary network or HTTP errors; any non-200 status or
/// transport failure yields `None` and the caller decides the fallback behaviour.
#[async_trait]
pub trait ImageFetcher: Send + Sync {
	fn new(timeout: Duration) -> Self;

	/// Fetch the raw bytes and declared-or-inferred MIME type behind `url`.
	async fn fetch(&self, url: &str) -> Option<FetchedImage>;
}

/// The out-of-the-box [`ImageFetcher`] backed by `reqwest`.
///
/// Uses a browser-like identification header and the platform's default transport security.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
	client: reqwest::Client,
}

#[async_trait]
impl ImageFetcher for HttpFetcher {
	fn new(timeout: Duration) -> Self {
		let client = reqwest::Client::builder()
			.user_agent(BROWSER_USER_AGENT)
			.timeout(timeout)
			.build()
			.expect("Failed to build HTTP client");

		Self { client }
	}

	async fn fetch(&self, url: &str) -> Option<FetchedImage> {
		let response = match self.client.get(url).send().await {
			Ok(response) => response,
			Err(e) => {
				debug!("Image fetch failed for {}: {}", url, e);
				return None
			},
		};

		if response.status() != StatusCode::OK {
			debug!("Image fetch for {} returned status {}", url, response.status());
			return None
		}

		let mimetype = response
			.headers()
			.get(header::CONTENT_TYPE)
			.and_then(|value| value.to_str().ok())
			.map(str::to_string)
			.or_else(|| guess_mimetype(url).map(str::to_string))
			.unwrap_or_else(|| "application/octet-stream".to_string());

		let raw = match response.bytes().await {
			Ok(bytes) => bytes.to_vec(),
			Err(e) => {
				debug!("Failed to read image body from {}: {}", url, e);
				return None
			},
		};

		Some(FetchedImage { raw, mimetype })
	}
}

/// Fetch an image and encode it as a `data:<mime>;base64,<payload>` URL.
///
/// `None` on any fetch failure, mirroring [`ImageFetcher::fetch`].
pub async fn data_url<F: ImageFetcher>(fetcher: &F, url: &str) -> Option<String> {
	let image = fetcher.fetch(url).await?;
	let payload = STANDARD.encode(&image.raw);

	Some(format!("data:{};base64,{}", image.mimetype, payload))
}

/// Infer an image MIME type from the URL's file extension.
///
/// Used when the response omits a `Content-Type` header.
pub(crate) fn guess_mimetype(url: &str) -> Option<&'static str> {
	let path = url.split(['?', '#']).next().unwrap_or(url);
	let (_, extension) = path.rsplit_once('.')?;
	if extension.contains('/') {
		// The last dot belongs to the host name, not a file extension.
		return None
	}

	match extension.to_ascii_lowercase().as_str() {
		"png" => Some("image/png"),
		"jpg" | "jpeg" => Some("image/jpeg"),
		"gif" => Some("image/gif"),
		"webp" => Some("image/webp"),
		"bmp" => Some("image/bmp"),
		"svg" => Some("image/svg+xml"),
		_ => None,
	}
}
