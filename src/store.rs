//! Per-file lifecycle state.
//!
//! Records are shown by position but every asynchronous completion finds its
//! record by [`FileId`], so a delete while a parse or fetch is in flight can
//! never hand one file's results to another.

use std::fmt;

use log::{debug, info, warn};

use crate::chart::Edge;
use crate::csv_ingest::CsvRow;
use crate::error::Result;
use crate::upload::UploadReport;

/// Status shown when Upload is pressed with nothing selected.
pub const NO_FILES_SELECTED: &str = "Please select at least one file.";
/// Status shown for any graph fetch failure.
pub const GRAPH_FETCH_FAILED: &str = "An error occurred while fetching graph data.";

/// Identity of a record for the lifetime of the session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FileId(pub u64);

impl fmt::Display for FileId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "file-{}", self.0)
	}
}

/// Everything known about one selected file.
#[derive(Clone, Debug)]
pub struct FileRecord<H> {
	/// Assigned on selection, never reused.
	pub id: FileId,
	/// Name as reported by the browser.
	pub name: String,
	/// Opaque file handle, owned by this record.
	pub handle: H,
	/// Empty until the parse completes.
	pub rows: Vec<CsvRow>,
	/// Present once a graph fetch succeeded.
	pub graph: Option<Vec<Edge>>,
	/// Set by the latest upload batch.
	pub visualize_ready: bool,
}

/// Ordered records plus the status line.
///
/// `H` is the opaque file handle; the browser build uses `web_sys::File`.
#[derive(Clone, Debug)]
pub struct FileStore<H> {
	records: Vec<FileRecord<H>>,
	status: String,
	next_id: u64,
}

impl<H> Default for FileStore<H> {
	fn default() -> Self {
		Self {
			records: Vec::new(),
			status: String::new(),
			next_id: 1,
		}
	}
}

impl<H: Clone> FileStore<H> {
	/// Replace all records with freshly selected files.
	///
	/// Returns the new ids with their handles so the caller can start a parse
	/// for each one.
	pub fn select_files(&mut self, files: Vec<(String, H)>) -> Vec<(FileId, H)> {
		self.status.clear();
		self.records = files
			.into_iter()
			.map(|(name, handle)| {
				let id = FileId(self.next_id);
				self.next_id += 1;
				FileRecord {
					id,
					name,
					handle,
					rows: Vec::new(),
					graph: None,
					visualize_ready: false,
				}
			})
			.collect();
		info!("selected {} files", self.records.len());
		self.records
			.iter()
			.map(|r| (r.id, r.handle.clone()))
			.collect()
	}

	/// Handles to upload, or `None` (with a status message) when nothing is
	/// selected.
	pub fn begin_upload(&mut self) -> Option<Vec<(FileId, H)>> {
		if self.records.is_empty() {
			self.status = NO_FILES_SELECTED.to_string();
			return None;
		}
		Some(
			self.records
				.iter()
				.map(|r| (r.id, r.handle.clone()))
				.collect(),
		)
	}
}

impl<H> FileStore<H> {
	/// Store the outcome of parsing one file.
	pub fn record_parsed(&mut self, id: FileId, result: Result<Vec<CsvRow>>) {
		match result {
			Ok(rows) => match self.get_mut(id) {
				Some(record) => {
					debug!("{}: {} rows parsed", record.name, rows.len());
					record.rows = rows;
				}
				None => debug!("dropping parse result for removed {}", id),
			},
			Err(err) => {
				if self.get(id).is_none() {
					debug!("dropping parse error for removed {}: {}", id, err);
					return;
				}
				warn!("{}", err);
				self.status = err.to_string();
			}
		}
	}

	/// Apply a finished upload batch.
	///
	/// Outcomes for records that were deleted or replaced since the batch
	/// started are ignored; when none of the batch is left this does nothing.
	/// Otherwise every record's readiness is recomputed from the report, so
	/// records that failed or were not part of the batch end up not ready.
	pub fn apply_upload_report(&mut self, report: &UploadReport) {
		let live = report.retain(|id| self.get(id).is_some());
		if live.attempted().next().is_none() {
			debug!("dropping upload report for removed files");
			return;
		}
		let succeeded = live.succeeded();
		for record in &mut self.records {
			record.visualize_ready = succeeded.contains(&record.id);
		}
		self.status = live.status_message();
	}

	/// Attach fetched edges to a record, or report the failure.
	pub fn attach_graph(&mut self, id: FileId, result: Result<Vec<Edge>>) {
		match result {
			Ok(edges) => match self.get_mut(id) {
				Some(record) => {
					info!("{}: graph with {} edges", record.name, edges.len());
					record.graph = Some(edges);
				}
				None => debug!("dropping graph for removed {}", id),
			},
			Err(err) => {
				warn!("graph fetch for {} failed: {}", id, err);
				if self.get(id).is_some() {
					self.status = GRAPH_FETCH_FAILED.to_string();
				}
			}
		}
	}

	/// Remove the record at `index`; later records move up one place.
	pub fn delete_file(&mut self, index: usize) -> Option<FileRecord<H>> {
		if index >= self.records.len() {
			return None;
		}
		let removed = self.records.remove(index);
		info!("removed {}", removed.name);
		Some(removed)
	}

	/// Id of a visualize-ready record, for starting a graph fetch.
	pub fn graph_target(&self, id: FileId) -> Option<FileId> {
		self.get(id).filter(|r| r.visualize_ready).map(|r| r.id)
	}

	/// Records in selection order.
	pub fn records(&self) -> &[FileRecord<H>] {
		&self.records
	}

	/// Record with this id, if it is still listed.
	pub fn get(&self, id: FileId) -> Option<&FileRecord<H>> {
		self.records.iter().find(|r| r.id == id)
	}

	fn get_mut(&mut self, id: FileId) -> Option<&mut FileRecord<H>> {
		self.records.iter_mut().find(|r| r.id == id)
	}

	/// Current position of a record.
	pub fn position_of(&self, id: FileId) -> Option<usize> {
		self.records.iter().position(|r| r.id == id)
	}

	/// Id of the record currently at `index`.
	pub fn id_at(&self, index: usize) -> Option<FileId> {
		self.records.get(index).map(|r| r.id)
	}

	/// Ids in display order.
	pub fn ids(&self) -> Vec<FileId> {
		self.records.iter().map(|r| r.id).collect()
	}

	/// Status line; empty means nothing to show.
	pub fn status(&self) -> &str {
		&self.status
	}
}
