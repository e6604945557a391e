use std::sync::Arc;

use crate::{Error, NoteboardService, Result, publish_snapshot};
use noteboard_domain::Project;

impl NoteboardService {
	pub fn list_projects(&self) -> Arc<Vec<Project>> {
		self.store.all()
	}

	pub fn get_project(&self, pr: &str) -> Result<Project> {
		Ok(self.store.get(pr)?)
	}

	/// Registers a new project. `pr` and `title` are required; everything else passes through.
	pub async fn add_project(&self, mut project: Project) -> Result<Project> {
		project.pr = project.pr.trim().to_string();

		let mut missing = Vec::new();

		if project.pr.is_empty() {
			missing.push("pr".to_string());
		}
		if project.title.trim().is_empty() {
			missing.push("title".to_string());
		}
		if !missing.is_empty() {
			return Err(Error::MissingFields { fields: missing });
		}
		if let Some(notes) = project.notes.as_ref() {
			for note in notes {
				crate::validate_note(note)?;
			}
		}

		let store = Arc::clone(&self.store);
		let broadcaster = self.broadcaster.clone();
		let task = tokio::spawn(async move {
			store
				.insert_project_then(project, |projects| publish_snapshot(&broadcaster, projects))
				.await
		});

		Ok(task.await??)
	}
}
