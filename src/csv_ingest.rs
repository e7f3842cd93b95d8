//! Turning selected files into preview rows.

use log::debug;
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;
use web_sys::File;

use crate::error::{AppError, Result};

/// One CSV record as `(header, value)` pairs in column order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CsvRow {
	fields: Vec<(String, String)>,
}

impl CsvRow {
	/// Value stored under `header`, if this row has that column.
	pub fn get(&self, header: &str) -> Option<&str> {
		self.fields
			.iter()
			.find(|(key, _)| key == header)
			.map(|(_, value)| value.as_str())
	}

	/// Header names in column order.
	pub fn keys(&self) -> impl Iterator<Item = &str> {
		self.fields.iter().map(|(key, _)| key.as_str())
	}

	/// Number of populated columns.
	pub fn len(&self) -> usize {
		self.fields.len()
	}

	/// True when the row carries no columns.
	pub fn is_empty(&self) -> bool {
		self.fields.is_empty()
	}
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for CsvRow {
	fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
		Self {
			fields: iter
				.into_iter()
				.map(|(k, v)| (k.into(), v.into()))
				.collect(),
		}
	}
}

/// Parse CSV text whose first line holds the headers.
///
/// Blank lines are skipped and values stay strings. Short rows only carry
/// the columns they have; extra trailing values are dropped.
pub fn parse_csv(file: &str, text: &str) -> Result<Vec<CsvRow>> {
	let mut reader = csv::ReaderBuilder::new()
		.has_headers(true)
		.flexible(true)
		.from_reader(text.as_bytes());

	let parse_err = |source| AppError::Parse {
		file: file.to_string(),
		source,
	};

	let headers = reader.headers().map_err(parse_err)?.clone();
	let mut rows: Vec<CsvRow> = Vec::new();
	for record in reader.records() {
		let record = record.map_err(parse_err)?;
		rows.push(headers.iter().zip(record.iter()).collect());
	}

	debug!("parsed {} rows from {}", rows.len(), file);
	Ok(rows)
}

/// Read a browser file to text and parse it.
pub async fn read_and_parse(file: File) -> Result<Vec<CsvRow>> {
	let name = file.name();
	let text = JsFuture::from(file.text())
		.await
		.map_err(|e| read_error(&name, e))?
		.as_string()
		.ok_or_else(|| AppError::Read {
			file: name.clone(),
			reason: "file contents were not text".into(),
		})?;
	parse_csv(&name, &text)
}

fn read_error(file: &str, err: JsValue) -> AppError {
	AppError::Read {
		file: file.to_string(),
		reason: format!("{:?}", err),
	}
}
