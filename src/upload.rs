//! Concurrent upload of every selected file.

use std::future::Future;

use futures::future::join_all;
use log::info;

use crate::store::FileId;

/// Message used when a request produced no usable answer.
pub const UPLOAD_FAILED: &str = "File upload failed.";

/// How one file's upload ended.
#[derive(Clone, Debug, PartialEq)]
pub enum UploadOutcome {
	/// 2xx response with a readable body.
	Accepted {
		/// Server message.
		message: String,
		/// Rows the server reports having stored; 0 when it sent none.
		count: f64,
	},
	/// Anything else; carries the message to show.
	Failed {
		/// Server message, or [`UPLOAD_FAILED`].
		message: String,
	},
}

impl UploadOutcome {
	/// Whether this file may now be visualized.
	pub fn is_success(&self) -> bool {
		matches!(self, UploadOutcome::Accepted { .. })
	}
}

/// Every outcome of one upload batch, in batch order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UploadReport {
	outcomes: Vec<(FileId, UploadOutcome)>,
}

impl UploadReport {
	/// Collect per-file outcomes.
	pub fn from_outcomes(outcomes: impl IntoIterator<Item = (FileId, UploadOutcome)>) -> Self {
		Self {
			outcomes: outcomes.into_iter().collect(),
		}
	}

	/// Only the outcomes whose file passes `keep`.
	pub fn retain(&self, keep: impl Fn(FileId) -> bool) -> Self {
		Self::from_outcomes(
			self.outcomes
				.iter()
				.filter(|(id, _)| keep(*id))
				.cloned(),
		)
	}

	/// Files that were part of the batch.
	pub fn attempted(&self) -> impl Iterator<Item = FileId> + '_ {
		self.outcomes.iter().map(|(id, _)| *id)
	}

	/// Files whose upload succeeded.
	pub fn succeeded(&self) -> Vec<FileId> {
		self.outcomes
			.iter()
			.filter(|(_, outcome)| outcome.is_success())
			.map(|(id, _)| *id)
			.collect()
	}

	/// Messages of failed uploads.
	pub fn failures(&self) -> Vec<&str> {
		self.outcomes
			.iter()
			.filter_map(|(_, outcome)| match outcome {
				UploadOutcome::Failed { message } => Some(message.as_str()),
				UploadOutcome::Accepted { .. } => None,
			})
			.collect()
	}

	/// Sum of the row counts reported for successful uploads.
	pub fn rows_accepted(&self) -> f64 {
		self.outcomes
			.iter()
			.map(|(_, outcome)| match outcome {
				UploadOutcome::Accepted { count, .. } => *count,
				UploadOutcome::Failed { .. } => 0.0,
			})
			.sum()
	}

	/// Human-readable summary for the status line.
	pub fn status_message(&self) -> String {
		let succeeded = self.succeeded().len();
		let failures = self.failures();
		let mut parts = Vec::new();
		if succeeded > 0 {
			parts.push(format!("{} files uploaded successfully.", succeeded));
		}
		if !failures.is_empty() {
			parts.push(failures.join(" "));
		}
		parts.join(" ")
	}
}

/// Upload every target concurrently and wait for all of them.
///
/// No state is touched until the whole batch has settled.
pub async fn dispatch<H, F, Fut>(targets: Vec<(FileId, H)>, upload: F) -> UploadReport
where
	F: Fn(H) -> Fut,
	Fut: Future<Output = UploadOutcome>,
{
	let total = targets.len();
	let pending = targets.into_iter().map(|(id, handle)| {
		let request = upload(handle);
		async move { (id, request.await) }
	});
	let report = UploadReport::from_outcomes(join_all(pending).await);
	info!(
		"upload batch done: {} of {} succeeded, {} rows stored",
		report.succeeded().len(),
		total,
		report.rows_accepted()
	);
	report
}

#[cfg(test)]
mod tests {
	use std::cell::RefCell;

	use futures::channel::oneshot;
	use futures::executor::block_on;

	use super::*;

	fn accepted(count: f64) -> UploadOutcome {
		UploadOutcome::Accepted {
			message: "ok".into(),
			count,
		}
	}

	fn failed(message: &str) -> UploadOutcome {
		UploadOutcome::Failed {
			message: message.into(),
		}
	}

	#[test]
	fn two_of_three_succeed() {
		let targets = vec![
			(FileId(1), "a.csv"),
			(FileId(2), "b.csv"),
			(FileId(3), "c.csv"),
		];
		let report = block_on(dispatch(targets, |name| async move {
			if name == "b.csv" {
				failed("b.csv is missing a header row.")
			} else {
				accepted(10.0)
			}
		}));

		assert_eq!(report.succeeded(), vec![FileId(1), FileId(3)]);
		assert_eq!(report.rows_accepted(), 20.0);
		let status = report.status_message();
		assert!(status.contains("2 files uploaded successfully."));
		assert!(status.contains("b.csv is missing a header row."));
	}

	#[test]
	fn failures_only_join_messages() {
		let report = UploadReport::from_outcomes([
			(FileId(1), failed(UPLOAD_FAILED)),
			(FileId(2), failed("Too large.")),
		]);
		assert_eq!(report.status_message(), "File upload failed. Too large.");
	}

	#[test]
	fn successes_only_report_count() {
		let report = UploadReport::from_outcomes([(FileId(4), accepted(0.0))]);
		assert_eq!(report.status_message(), "1 files uploaded successfully.");
	}

	#[test]
	fn requests_run_concurrently() {
		// The first upload only finishes once the second has started, which
		// would deadlock if requests were issued one after another.
		let (tx, rx) = oneshot::channel::<()>();
		let tx = RefCell::new(Some(tx));
		let rx = RefCell::new(Some(rx));

		let report = block_on(dispatch(
			vec![(FileId(1), true), (FileId(2), false)],
			|waits| {
				let rx = if waits { rx.borrow_mut().take() } else { None };
				let tx = if waits { None } else { tx.borrow_mut().take() };
				async move {
					if let Some(rx) = rx {
						let _ = rx.await;
					}
					if let Some(tx) = tx {
						let _ = tx.send(());
					}
					accepted(1.0)
				}
			},
		));
		assert_eq!(report.succeeded().len(), 2);
	}

	#[test]
	fn retain_drops_outcomes_of_unknown_files() {
		let report = UploadReport::from_outcomes([
			(FileId(1), accepted(2.0)),
			(FileId(2), failed("Too large.")),
			(FileId(3), accepted(5.0)),
		]);
		let kept = report.retain(|id| id != FileId(3));
		assert_eq!(kept.attempted().collect::<Vec<_>>(), [FileId(1), FileId(2)]);
		assert_eq!(kept.rows_accepted(), 2.0);
		assert_eq!(kept.status_message(), "1 files uploaded successfully. Too large.");
	}
}
