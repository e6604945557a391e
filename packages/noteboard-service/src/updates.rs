use serde::{Deserialize, Serialize};

use crate::{Error, NoteboardService, Result, StoredDatePolicy};
use noteboard_domain::{DateRange, Note, Project};

pub const EXPORT_HEADER: [&str; 5] = ["Project", "PR", "Date/Start", "End", "Update"];

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct UpdatesRequest {
	pub start: Option<String>,
	pub end: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UpdatesResponse {
	pub pr: String,
	pub title: String,
	pub updates: Vec<Note>,
}

/// One note flattened for tabular output.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportRow {
	pub project: String,
	pub pr: String,
	/// The note's date, or the start of its range.
	pub date_or_start: String,
	/// Empty for point notes.
	pub end: String,
	pub update: String,
}
impl ExportRow {
	pub fn fields(&self) -> [&str; 5] {
		[
			self.project.as_str(),
			self.pr.as_str(),
			self.date_or_start.as_str(),
			self.end.as_str(),
			self.update.as_str(),
		]
	}
}

impl NoteboardService {
	/// Notes of project `pr` inside the requested range, in insertion order.
	pub fn get_updates_in_range(&self, pr: &str, req: &UpdatesRequest) -> Result<UpdatesResponse> {
		let (project, updates) = self.filtered(pr, req)?;

		Ok(UpdatesResponse { pr: project.pr, title: project.title, updates })
	}

	pub fn export_updates_in_range(
		&self,
		pr: &str,
		req: &UpdatesRequest,
	) -> Result<Vec<ExportRow>> {
		let (project, updates) = self.filtered(pr, req)?;
		let rows = updates
			.into_iter()
			.map(|note| ExportRow {
				project: project.title.clone(),
				pr: project.pr.clone(),
				date_or_start: note.first_date().to_string(),
				end: note.end_date().unwrap_or_default().to_string(),
				update: note.update().to_string(),
			})
			.collect();

		Ok(rows)
	}

	fn filtered(&self, pr: &str, req: &UpdatesRequest) -> Result<(Project, Vec<Note>)> {
		let range = DateRange::parse(req.start.as_deref(), req.end.as_deref())?;
		let mut project = self.get_project(pr)?;
		let notes = match project.notes.take() {
			Some(notes) if !notes.is_empty() => notes,
			_ => return Err(Error::NoUpdates { pr: project.pr }),
		};
		let mut kept = Vec::with_capacity(notes.len());

		for (idx, note) in notes.into_iter().enumerate() {
			match range.matches(&note) {
				Ok(true) => kept.push(note),
				Ok(false) => {},
				Err(err) => match self.stored_dates {
					StoredDatePolicy::Skip => {
						tracing::warn!(
							pr = project.pr.as_str(),
							note = idx,
							error = %err,
							"Skipping note with malformed date."
						);
					},
					StoredDatePolicy::Reject => return Err(err.into()),
				},
			}
		}

		Ok((project, kept))
	}
}
