//! HTTP client for the upload and graph endpoints.

use gloo_net::http::Request;
use log::{debug, warn};
use serde::Deserialize;
use web_sys::{File, FormData};

use crate::chart::Edge;
use crate::config::ApiConfig;
use crate::error::{AppError, Result};
use crate::upload::{UPLOAD_FAILED, UploadOutcome};

/// Multipart field the server reads the CSV from.
pub const UPLOAD_FIELD: &str = "csvFile";

/// Body returned by `POST /upload`.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct UploadResponse {
	/// Human-readable result, shown in the status line.
	pub message: String,
	/// Rows stored by the server.
	#[serde(default)]
	pub count: Option<f64>,
}

/// Thin wrapper over the two endpoints.
#[derive(Clone, Debug, Default)]
pub struct ApiClient {
	config: ApiConfig,
}

impl ApiClient {
	/// Client for the endpoints under `config.origin`.
	pub fn new(config: ApiConfig) -> Self {
		Self { config }
	}

	/// Upload one file. Never fails: every error becomes a failed outcome.
	pub async fn upload_csv(&self, file: File) -> UploadOutcome {
		let name = file.name();
		match self.try_upload(&file).await {
			Ok((ok, body)) => {
				debug!("{}: upload answered ok={} {:?}", name, ok, body);
				upload_outcome(ok, body)
			}
			Err(err) => {
				warn!("{}: upload failed: {}", name, err);
				UploadOutcome::Failed {
					message: UPLOAD_FAILED.to_string(),
				}
			}
		}
	}

	async fn try_upload(&self, file: &File) -> Result<(bool, UploadResponse)> {
		let form = FormData::new().map_err(|e| js_error(file, e))?;
		form.append_with_blob(UPLOAD_FIELD, file)
			.map_err(|e| js_error(file, e))?;

		let response = Request::post(&self.config.upload_url())
			.body(form)?
			.send()
			.await?;
		let body: UploadResponse = serde_json::from_str(&response.text().await?)?;
		Ok((response.ok(), body))
	}

	/// Fetch the edge list. Not scoped to a file: the endpoint serves one graph.
	pub async fn network_data(&self) -> Result<Vec<Edge>> {
		let response = Request::get(&self.config.network_data_url())
			.send()
			.await?;
		if !response.ok() {
			return Err(AppError::GraphFetch(response.status()));
		}
		parse_edges(&response.text().await?)
	}
}

/// Decide the outcome of an upload that produced a decodable body.
pub fn upload_outcome(ok: bool, body: UploadResponse) -> UploadOutcome {
	if ok {
		UploadOutcome::Accepted {
			message: body.message,
			count: body.count.filter(|c| c.is_finite()).unwrap_or(0.0),
		}
	} else {
		UploadOutcome::Failed {
			message: AppError::UploadRejected(body.message).to_string(),
		}
	}
}

/// Decode the graph endpoint's JSON array.
pub fn parse_edges(body: &str) -> Result<Vec<Edge>> {
	Ok(serde_json::from_str(body)?)
}

fn js_error(file: &File, err: wasm_bindgen::JsValue) -> AppError {
	AppError::Read {
		file: file.name(),
		reason: format!("{:?}", err),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn upload_response_count_is_optional() {
		let body: UploadResponse = serde_json::from_str(r#"{"message":"Stored."}"#).unwrap();
		assert_eq!(body.count, None);
		assert_eq!(
			upload_outcome(true, body),
			UploadOutcome::Accepted {
				message: "Stored.".into(),
				count: 0.0
			}
		);
	}

	#[test]
	fn non_success_status_keeps_server_message() {
		let body = UploadResponse {
			message: "Only CSV files are allowed.".into(),
			count: None,
		};
		assert_eq!(
			upload_outcome(false, body),
			UploadOutcome::Failed {
				message: "Only CSV files are allowed.".into()
			}
		);
	}

	#[test]
	fn edges_parse_from_array() {
		let edges = parse_edges(r#"[{"from":"a","to":"b","strength":2}]"#).unwrap();
		assert_eq!(edges, vec![Edge::new("a", "b").with_strength(2.0)]);
	}

	#[test]
	fn malformed_graph_body_is_decode_error() {
		assert!(matches!(parse_edges("{}"), Err(AppError::Decode(_))));
	}

	#[test]
	fn fractional_and_negative_counts_still_decode() {
		for raw in [r#"{"message":"ok","count":3.0}"#, r#"{"message":"ok","count":-1}"#] {
			let body: UploadResponse = serde_json::from_str(raw).unwrap();
			assert!(upload_outcome(true, body).is_success());
		}
	}
}
