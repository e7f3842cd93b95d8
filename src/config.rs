//! Runtime configuration for the remote API.

use log::info;

/// Origin used when the host page does not override it.
pub const DEFAULT_ORIGIN: &str = "http://localhost:5000";

/// Name of the `<meta>` tag that can override the API origin.
pub const ORIGIN_META_NAME: &str = "graph-api-origin";

/// Where the upload and graph endpoints live.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiConfig {
	/// Scheme, host and optional port, with or without a trailing slash.
	pub origin: String,
}

impl Default for ApiConfig {
	fn default() -> Self {
		Self::new(DEFAULT_ORIGIN)
	}
}

impl ApiConfig {
	/// Build a config for a fixed origin.
	pub fn new(origin: impl Into<String>) -> Self {
		Self {
			origin: origin.into(),
		}
	}

	/// Read the origin from `<meta name="graph-api-origin" content="...">`,
	/// falling back to [`DEFAULT_ORIGIN`].
	pub fn from_document() -> Self {
		match read_meta_origin() {
			Some(origin) => {
				info!("api origin overridden by host page: {}", origin);
				Self::new(origin)
			}
			None => Self::default(),
		}
	}

	/// Join `path` onto the origin without doubling slashes.
	pub fn endpoint(&self, path: &str) -> String {
		format!(
			"{}/{}",
			self.origin.trim_end_matches('/'),
			path.trim_start_matches('/')
		)
	}

	/// `POST` target for CSV uploads.
	pub fn upload_url(&self) -> String {
		self.endpoint("upload")
	}

	/// `GET` target for the edge list.
	pub fn network_data_url(&self) -> String {
		self.endpoint("networkdata")
	}
}

fn read_meta_origin() -> Option<String> {
	let document = web_sys::window()?.document()?;
	let selector = format!("meta[name=\"{}\"]", ORIGIN_META_NAME);
	let meta = document.query_selector(&selector).ok()??;
	let content = meta.get_attribute("content")?;
	let content = content.trim();
	(!content.is_empty()).then(|| content.to_string())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn default_points_at_local_server() {
		let config = ApiConfig::default();
		assert_eq!(config.upload_url(), "http://localhost:5000/upload");
		assert_eq!(config.network_data_url(), "http://localhost:5000/networkdata");
	}

	#[test]
	fn endpoint_does_not_double_slashes() {
		let config = ApiConfig::new("https://graphs.example.com/");
		assert_eq!(config.endpoint("/upload"), "https://graphs.example.com/upload");
	}
}
