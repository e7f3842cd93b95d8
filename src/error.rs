//! Error type shared by ingestion, uploads and graph fetches.

use thiserror::Error;

/// Everything that can go wrong between picking a file and drawing its graph.
///
/// None of these are fatal: each one ends up in the status line and the log.
#[derive(Debug, Error)]
pub enum AppError {
	/// The CSV text could not be parsed.
	#[error("Failed to parse {file}: {source}")]
	Parse {
		/// Name of the file being parsed.
		file: String,
		/// Underlying parser error.
		#[source]
		source: csv::Error,
	},

	/// The browser could not hand us the file contents.
	#[error("Failed to read {file}: {reason}")]
	Read {
		/// Name of the file being read.
		file: String,
		/// Stringified JS error.
		reason: String,
	},

	/// The request never produced a response.
	#[error("Network error: {0}")]
	Network(#[from] gloo_net::Error),

	/// The server answered but refused the upload.
	#[error("{0}")]
	UploadRejected(String),

	/// The graph endpoint answered with a non-success status.
	#[error("Graph request failed with status {0}")]
	GraphFetch(u16),

	/// A response body did not match the expected shape.
	#[error("Unexpected response body: {0}")]
	Decode(#[from] serde_json::Error),
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn rejected_upload_displays_server_message() {
		let err = AppError::UploadRejected("Invalid header row".into());
		assert_eq!(err.to_string(), "Invalid header row");
	}

	#[test]
	fn graph_fetch_mentions_status() {
		assert!(AppError::GraphFetch(502).to_string().contains("502"));
	}
}
