mod error;

pub use error::{Error, Result};

use std::{
	fs,
	path::{Path, PathBuf},
};

use serde_json::{Value, json};
use tempfile::TempDir;
use uuid::Uuid;

use noteboard_domain::{Note, PointNote, Project, RangeNote};

/// A project document living in its own temporary directory. The directory is removed on drop.
pub struct TestDocument {
	dir: TempDir,
	path: PathBuf,
}
impl TestDocument {
	/// A document path that does not exist yet.
	pub fn empty() -> Result<Self> {
		let dir = tempfile::Builder::new().prefix("noteboard_test_").tempdir()?;
		let path = dir.path().join(format!("projects_{}.json", Uuid::new_v4().simple()));

		Ok(Self { dir, path })
	}

	pub fn with_projects(projects: &[Project]) -> Result<Self> {
		let doc = Self::empty()?;

		doc.write_json(&serde_json::to_value(projects)?)?;

		Ok(doc)
	}

	/// Seeds the document with [`sample_projects`].
	pub fn seeded() -> Result<Self> {
		Self::with_projects(&sample_projects())
	}

	pub fn path(&self) -> &Path {
		&self.path
	}

	pub fn dir(&self) -> &Path {
		self.dir.path()
	}

	pub fn write_raw(&self, raw: impl AsRef<[u8]>) -> Result<()> {
		fs::write(&self.path, raw)?;

		Ok(())
	}

	pub fn write_json(&self, value: &Value) -> Result<()> {
		self.write_raw(serde_json::to_vec_pretty(value)?)
	}

	pub fn read_json(&self) -> Result<Value> {
		let raw = fs::read(&self.path)?;

		Ok(serde_json::from_slice(&raw)?)
	}

	/// Files left next to the document, excluding the document itself.
	pub fn stray_files(&self) -> Result<Vec<PathBuf>> {
		let mut stray = Vec::new();

		for entry in fs::read_dir(self.dir.path())? {
			let entry_path = entry?.path();

			if entry_path != self.path {
				stray.push(entry_path);
			}
		}

		Ok(stray)
	}
}

/// Three projects: `PR-100` with mixed notes, `PR-200` with no `notes` key, and `PR-300` with an
/// empty notes list.
pub fn sample_projects() -> Vec<Project> {
	let fixture = json!([
		{
			"pr": "PR-100",
			"title": "Library annex",
			"owner": "Facilities",
			"notes": [
				{ "date": "2025-09-18", "update": "Permit approved.", "status": "green" },
				{ "dateStart": "2025-09-20", "dateEnd": "2025-09-25", "update": "Site prep." },
				{ "date": "2025-09-27", "update": "Footings poured." },
			],
		},
		{ "pr": "PR-200", "title": "Parking lot resurfacing", "phase": "planning" },
		{ "pr": "PR-300", "title": "Roof replacement", "notes": [] },
	]);

	match serde_json::from_value(fixture) {
		Ok(projects) => projects,
		Err(err) => panic!("Sample projects fixture must deserialize: {err}."),
	}
}

pub fn point_note(date: &str, update: &str) -> Note {
	Note::Point(PointNote {
		date: date.to_string(),
		update: update.to_string(),
		status: None,
		extra: Default::default(),
	})
}

pub fn range_note(start: &str, end: &str, update: &str) -> Note {
	Note::Range(RangeNote {
		date_start: start.to_string(),
		date_end: end.to_string(),
		update: update.to_string(),
		extra: Default::default(),
	})
}

/// Projects `PR-0` through `PR-{count - 1}`, none with notes.
pub fn numbered_projects(count: usize) -> Vec<Project> {
	(0..count).map(|idx| Project::new(format!("PR-{idx}"), format!("Project {idx}"))).collect()
}
