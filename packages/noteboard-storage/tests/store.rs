use std::sync::{Arc, Mutex};

use serde_json::json;

use noteboard_domain::Project;
use noteboard_storage::{Error, Store, document};
use noteboard_testkit::{
	TestDocument, numbered_projects, point_note, range_note, sample_projects,
};

#[tokio::test]
async fn missing_document_is_empty() {
	let doc = TestDocument::empty().expect("Failed to create test document.");
	let store = Store::open_path(doc.path()).await.expect("Missing document must open.");

	assert!(store.all().is_empty());
}

#[tokio::test]
async fn corrupt_document_is_rejected() {
	let doc = TestDocument::empty().expect("Failed to create test document.");

	doc.write_raw("{ not json").expect("Failed to write corrupt document.");

	let err = Store::open_path(doc.path()).await.err().expect("Expected corrupt data error.");

	assert!(matches!(err, Error::CorruptData { .. }), "Unexpected error: {err:?}");
}

#[tokio::test]
async fn duplicate_identifiers_are_corrupt() {
	let doc = TestDocument::empty().expect("Failed to create test document.");

	doc.write_json(&json!([
		{ "pr": "PR-1", "title": "First" },
		{ "pr": "PR-1", "title": "Second" },
	]))
	.expect("Failed to write document.");

	let err = document::load(doc.path()).await.expect_err("Expected corrupt data error.");

	assert!(err.to_string().contains("Duplicate pr"), "Unexpected error: {err}");
}

#[tokio::test]
async fn appended_note_survives_reopen() {
	let doc = TestDocument::seeded().expect("Failed to create test document.");
	let store = Store::open_path(doc.path()).await.expect("Failed to open store.");
	let note = point_note("2025-09-30", "Inspection scheduled.");
	let updated = store.append_note("PR-100", note.clone()).await.expect("Append must succeed.");

	assert_eq!(updated.notes().last(), Some(&note));
	assert_eq!(store.get("PR-100").expect("Project must exist.").notes().len(), 4);

	let reopened = Store::open_path(doc.path()).await.expect("Failed to reopen store.");
	let project = reopened.get("PR-100").expect("Project must exist after reopen.");

	assert_eq!(project.notes().last(), Some(&note));
}

#[tokio::test]
async fn first_note_creates_notes_field() {
	let doc = TestDocument::seeded().expect("Failed to create test document.");
	let store = Store::open_path(doc.path()).await.expect("Failed to open store.");

	store
		.append_note("PR-200", range_note("2025-10-01", "2025-10-03", "Survey."))
		.await
		.expect("Append must succeed.");

	let raw = doc.read_json().expect("Failed to read document.");

	assert_eq!(raw[1]["phase"], json!("planning"));
	assert_eq!(raw[1]["notes"][0]["dateStart"], json!("2025-10-01"));
}

#[tokio::test]
async fn append_to_unknown_project_fails() {
	let doc = TestDocument::seeded().expect("Failed to create test document.");
	let store = Store::open_path(doc.path()).await.expect("Failed to open store.");
	let before = doc.read_json().expect("Failed to read document.");
	let err = store
		.append_note("does-not-exist", point_note("2025-09-30", "Nothing."))
		.await
		.expect_err("Expected not found.");

	assert!(matches!(err, Error::NotFound(_)), "Unexpected error: {err:?}");
	assert_eq!(doc.read_json().expect("Failed to read document."), before);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_appends_to_distinct_projects_all_persist() {
	const COUNT: usize = 16;

	let doc =
		TestDocument::with_projects(&numbered_projects(COUNT)).expect("Failed to create document.");
	let store = Arc::new(Store::open_path(doc.path()).await.expect("Failed to open store."));
	let mut handles = Vec::with_capacity(COUNT);

	for idx in 0..COUNT {
		let store = Arc::clone(&store);

		handles.push(tokio::spawn(async move {
			let note = point_note("2025-09-21", &format!("n{idx}"));

			store.append_note(&format!("PR-{idx}"), note).await
		}));
	}
	for handle in handles {
		handle.await.expect("Task must not panic.").expect("Append must succeed.");
	}

	let reopened = Store::open_path(doc.path()).await.expect("Failed to reopen store.");

	for idx in 0..COUNT {
		let project = reopened.get(&format!("PR-{idx}")).expect("Project must exist.");

		assert_eq!(project.notes().len(), 1, "Lost update on PR-{idx}.");
		assert_eq!(project.notes()[0].update(), format!("n{idx}"));
	}
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_appends_to_one_project_all_persist() {
	const COUNT: usize = 12;

	let doc =
		TestDocument::with_projects(&numbered_projects(1)).expect("Failed to create document.");
	let store = Arc::new(Store::open_path(doc.path()).await.expect("Failed to open store."));
	let mut handles = Vec::with_capacity(COUNT);

	for idx in 0..COUNT {
		let store = Arc::clone(&store);

		handles.push(tokio::spawn(async move {
			store.append_note("PR-0", point_note("2025-09-21", &format!("n{idx}"))).await
		}));
	}
	for handle in handles {
		handle.await.expect("Task must not panic.").expect("Append must succeed.");
	}

	let reopened = Store::open_path(doc.path()).await.expect("Failed to reopen store.");

	assert_eq!(reopened.get("PR-0").expect("Project must exist.").notes().len(), COUNT);
}

#[tokio::test]
async fn save_then_load_round_trips() {
	let doc = TestDocument::seeded().expect("Failed to create test document.");
	let store = Store::open_path(doc.path()).await.expect("Failed to open store.");
	let loaded = store.load().await.expect("Load must succeed.");

	store.save(loaded.clone()).await.expect("Save must succeed.");

	assert_eq!(store.load().await.expect("Reload must succeed."), loaded);
	assert_eq!(*store.all(), loaded);
}

#[tokio::test]
async fn save_leaves_no_temp_files() {
	let doc = TestDocument::seeded().expect("Failed to create test document.");
	let store = Store::open_path(doc.path()).await.expect("Failed to open store.");

	store.append_note("PR-300", point_note("2025-09-22", "Tear-off.")).await.expect("Append.");
	store.save(store.all().to_vec()).await.expect("Save must succeed.");

	assert!(doc.stray_files().expect("Failed to list directory.").is_empty());
}

#[tokio::test]
async fn save_rejects_duplicate_identifiers() {
	let doc = TestDocument::seeded().expect("Failed to create test document.");
	let store = Store::open_path(doc.path()).await.expect("Failed to open store.");
	let projects = vec![Project::new("PR-1", "A"), Project::new("PR-1", "B")];
	let err = store.save(projects).await.expect_err("Expected conflict.");

	assert!(matches!(err, Error::Conflict(_)), "Unexpected error: {err:?}");
	assert_eq!(store.all().len(), 3);
}

#[tokio::test]
async fn insert_project_rejects_existing_identifier() {
	let doc = TestDocument::seeded().expect("Failed to create test document.");
	let store = Store::open_path(doc.path()).await.expect("Failed to open store.");
	let err = store
		.insert_project_then(Project::new("PR-100", "Duplicate"), |_| ())
		.await
		.expect_err("Expected conflict.");

	assert!(matches!(err, Error::Conflict(_)), "Unexpected error: {err:?}");

	store
		.insert_project_then(Project::new("PR-400", "Gym floor"), |_| ())
		.await
		.expect("Insert must succeed.");

	assert_eq!(store.all().last().map(|project| project.pr.as_str()), Some("PR-400"));
}

#[tokio::test]
async fn commit_callback_sees_committed_collection() {
	let doc = TestDocument::seeded().expect("Failed to create test document.");
	let store = Store::open_path(doc.path()).await.expect("Failed to open store.");
	let seen = Mutex::new(None);

	store
		.append_note_then("PR-300", point_note("2025-09-22", "Tear-off."), |projects| {
			*seen.lock().expect("Lock poisoned.") = Some(projects.to_vec());
		})
		.await
		.expect("Append must succeed.");

	let seen = seen.into_inner().expect("Lock poisoned.").expect("Callback must run.");

	assert_eq!(seen, *store.all());
	assert_eq!(seen[2].notes().len(), 1);
}

#[tokio::test]
async fn failed_persist_keeps_snapshot_and_skips_commit() {
	let doc = TestDocument::empty().expect("Failed to create test document.");
	let nested = doc.dir().join("nested");
	let path = nested.join("projects.json");
	let store = Store::open_path(&path).await.expect("Failed to open store.");

	assert_eq!(store.path(), path.as_path());

	store
		.insert_project_then(Project::new("PR-1", "Boiler"), |_| ())
		.await
		.expect("Insert must succeed.");

	// The document's directory turns into a regular file, so every later save fails.
	std::fs::remove_dir_all(&nested).expect("Failed to remove document directory.");
	std::fs::write(&nested, b"not a directory").expect("Failed to write blocking file.");

	let before = store.all();
	let mut committed = false;
	let err = store
		.append_note_then("PR-1", point_note("2025-09-30", "Valve swapped."), |_| committed = true)
		.await
		.expect_err("Expected io error.");

	assert!(matches!(err, Error::Io { .. }), "Unexpected error: {err:?}");
	assert!(!committed, "Commit callback must not run when persisting fails.");
	assert_eq!(store.all(), before);
	assert!(store.get("PR-1").expect("Project must exist.").notes().is_empty());

	let err = store.save(sample_projects()).await.expect_err("Expected io error.");

	assert!(matches!(err, Error::Io { .. }), "Unexpected error: {err:?}");
	assert_eq!(store.all(), before);
}

#[tokio::test]
async fn failed_temp_write_leaves_no_stray_files() {
	let doc = TestDocument::empty().expect("Failed to create test document.");
	// Short enough for the document, too long once the temp prefix and suffix are added.
	let path = doc.dir().join(format!("{}.json", "p".repeat(220)));
	let err = document::save(&path, &sample_projects()).await.expect_err("Expected io error.");

	assert!(matches!(err, Error::Io { .. }), "Unexpected error: {err:?}");
	assert!(!path.exists());
	assert!(doc.stray_files().expect("Failed to list directory.").is_empty());
}

#[tokio::test]
async fn failed_rename_leaves_no_stray_files() {
	let doc = TestDocument::empty().expect("Failed to create test document.");

	std::fs::create_dir(doc.path()).expect("Failed to create blocking directory.");

	let err = document::save(doc.path(), &sample_projects()).await.expect_err("Expected io error.");

	assert!(matches!(err, Error::Io { .. }), "Unexpected error: {err:?}");
	assert!(doc.stray_files().expect("Failed to list directory.").is_empty());
}
