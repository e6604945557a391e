//! Whole-collection persistence. The document is a JSON array of projects and is always
//! rewritten in full.

use std::{
	collections::HashSet,
	io::ErrorKind,
	path::{Path, PathBuf},
};

use tokio::fs;
use uuid::Uuid;

use crate::{Error, Result};
use noteboard_domain::Project;

/// Reads the document at `path`. A missing file is an empty collection.
pub async fn load(path: &Path) -> Result<Vec<Project>> {
	let raw = match fs::read(path).await {
		Ok(raw) => raw,
		Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
		Err(err) => return Err(Error::Io { path: path.to_path_buf(), source: err }),
	};
	let projects: Vec<Project> = serde_json::from_slice(&raw).map_err(|err| Error::CorruptData {
		path: path.to_path_buf(),
		message: err.to_string(),
	})?;

	check_identifiers(&projects).map_err(|message| Error::CorruptData {
		path: path.to_path_buf(),
		message,
	})?;

	Ok(projects)
}

/// Replaces the document with `projects`. The bytes go to a sibling temp file first and are
/// renamed into place, so readers see either the old or the new document.
pub async fn save(path: &Path, projects: &[Project]) -> Result<()> {
	let mut encoded = serde_json::to_vec_pretty(projects)?;

	encoded.push(b'\n');

	if let Some(parent) = path.parent()
		&& !parent.as_os_str().is_empty()
	{
		fs::create_dir_all(parent)
			.await
			.map_err(|err| Error::Io { path: parent.to_path_buf(), source: err })?;
	}

	let temp = temp_path(path);

	if let Err(err) = fs::write(&temp, &encoded).await {
		discard_temp(&temp).await;

		return Err(Error::Io { path: temp, source: err });
	}
	if let Err(err) = fs::rename(&temp, path).await {
		discard_temp(&temp).await;

		return Err(Error::Io { path: path.to_path_buf(), source: err });
	}

	Ok(())
}

/// Every project needs a non-empty `pr` that no other project shares.
pub fn check_identifiers(projects: &[Project]) -> std::result::Result<(), String> {
	let mut seen = HashSet::with_capacity(projects.len());

	for (idx, project) in projects.iter().enumerate() {
		if project.pr.trim().is_empty() {
			return Err(format!("Project at index {idx} has an empty pr."));
		}
		if !seen.insert(project.pr.as_str()) {
			return Err(format!("Duplicate pr {:?}.", project.pr));
		}
	}

	Ok(())
}

// A failed write may or may not have created the file.
async fn discard_temp(temp: &Path) {
	match fs::remove_file(temp).await {
		Ok(()) => {},
		Err(err) if err.kind() == ErrorKind::NotFound => {},
		Err(err) => {
			tracing::warn!(path = ?temp, error = %err, "Failed to remove temp document.");
		},
	}
}

fn temp_path(path: &Path) -> PathBuf {
	let name = path.file_name().and_then(|name| name.to_str()).unwrap_or("projects.json");

	path.with_file_name(format!(".{name}.{}.tmp", Uuid::new_v4().simple()))
}
