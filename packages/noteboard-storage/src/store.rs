use std::{
	path::{Path, PathBuf},
	sync::{Arc, RwLock},
};

use tokio::sync::Mutex;

use crate::{Error, Result, document};
use noteboard_domain::{Note, Project};

/// In-memory mirror of the project document.
///
/// Readers take the current snapshot, an `Arc` that is replaced only after the document on disk
/// has been rewritten. Writers are serialized by `writer`, which is held from lookup through
/// persistence and the commit callback, so appends can never overwrite one another.
pub struct Store {
	path: PathBuf,
	snapshot: RwLock<Arc<Vec<Project>>>,
	writer: Mutex<()>,
}
impl Store {
	pub async fn open(cfg: &noteboard_config::Storage) -> Result<Self> {
		Self::open_path(&cfg.path).await
	}

	pub async fn open_path(path: &Path) -> Result<Self> {
		let projects = document::load(path).await?;

		tracing::info!(path = ?path, projects = projects.len(), "Project document loaded.");

		Ok(Self {
			path: path.to_path_buf(),
			snapshot: RwLock::new(Arc::new(projects)),
			writer: Mutex::new(()),
		})
	}

	pub fn path(&self) -> &Path {
		&self.path
	}

	/// Re-reads the document from disk without touching the cached snapshot.
	pub async fn load(&self) -> Result<Vec<Project>> {
		document::load(&self.path).await
	}

	/// Replaces the whole collection.
	pub async fn save(&self, projects: Vec<Project>) -> Result<()> {
		document::check_identifiers(&projects).map_err(Error::Conflict)?;

		let _guard = self.writer.lock().await;

		document::save(&self.path, &projects).await?;
		self.replace(Arc::new(projects));

		Ok(())
	}

	pub fn all(&self) -> Arc<Vec<Project>> {
		Arc::clone(&self.snapshot.read().unwrap_or_else(|err| err.into_inner()))
	}

	pub fn get(&self, pr: &str) -> Result<Project> {
		self.all()
			.iter()
			.find(|project| project.pr == pr)
			.cloned()
			.ok_or_else(|| Error::NotFound(format!("Project {pr:?} does not exist.")))
	}

	pub async fn append_note(&self, pr: &str, note: Note) -> Result<Project> {
		self.append_note_then(pr, note, |_| ()).await
	}

	/// Appends `note` to project `pr` and persists the collection. `on_commit` runs with the new
	/// collection before the write lock is released, so callbacks observe commits in order.
	pub async fn append_note_then<F>(&self, pr: &str, note: Note, on_commit: F) -> Result<Project>
	where
		F: FnOnce(&[Project]),
	{
		let _guard = self.writer.lock().await;
		let mut projects = Vec::clone(&self.all());
		let project = projects
			.iter_mut()
			.find(|project| project.pr == pr)
			.ok_or_else(|| Error::NotFound(format!("Project {pr:?} does not exist.")))?;

		project.push_note(note);

		let updated = project.clone();

		self.commit(projects, on_commit).await?;

		tracing::info!(pr, notes = updated.notes().len(), "Note appended.");

		Ok(updated)
	}

	/// Adds a new project at the end of the collection.
	pub async fn insert_project_then<F>(&self, project: Project, on_commit: F) -> Result<Project>
	where
		F: FnOnce(&[Project]),
	{
		let _guard = self.writer.lock().await;
		let mut projects = Vec::clone(&self.all());

		if projects.iter().any(|existing| existing.pr == project.pr) {
			return Err(Error::Conflict(format!("Project {:?} already exists.", project.pr)));
		}

		projects.push(project.clone());

		self.commit(projects, on_commit).await?;

		tracing::info!(pr = project.pr.as_str(), "Project inserted.");

		Ok(project)
	}

	// Callers must hold `writer`.
	async fn commit<F>(&self, projects: Vec<Project>, on_commit: F) -> Result<()>
	where
		F: FnOnce(&[Project]),
	{
		document::save(&self.path, &projects).await?;

		let projects = Arc::new(projects);

		self.replace(Arc::clone(&projects));
		on_commit(&projects);

		Ok(())
	}

	fn replace(&self, projects: Arc<Vec<Project>>) {
		*self.snapshot.write().unwrap_or_else(|err| err.into_inner()) = projects;
	}
}
