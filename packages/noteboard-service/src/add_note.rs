use std::sync::Arc;

use crate::{Error, NoteboardService, Result, publish_snapshot};
use noteboard_domain::{Note, Project};

impl NoteboardService {
	/// Appends `note` to project `pr`, persists it, and pushes the refreshed collection to every
	/// subscriber.
	pub async fn add_note(&self, pr: &str, note: Note) -> Result<Project> {
		validate_note(&note)?;

		let store = Arc::clone(&self.store);
		let broadcaster = self.broadcaster.clone();
		let pr = pr.to_string();
		// Detached so a dropped request cannot stop a commit between the disk write and the
		// snapshot swap.
		let task = tokio::spawn(async move {
			store
				.append_note_then(&pr, note, |projects| publish_snapshot(&broadcaster, projects))
				.await
		});

		Ok(task.await??)
	}
}

/// Rejects notes with blank text or dates that do not parse. Range order is not checked.
pub fn validate_note(note: &Note) -> Result<()> {
	if note.update().trim().is_empty() {
		return Err(Error::InvalidRequest { message: "update must be non-empty.".to_string() });
	}

	note.span()?;

	Ok(())
}
