use serde_json::json;
use time::{Date, Month};

use noteboard_domain::{DateError, DateRange, Note, PointNote, Project, RangeNote, date_filter};

fn date(day: u8) -> Date {
	Date::from_calendar_date(2025, Month::September, day).expect("Valid test date.")
}

fn point(raw: &str) -> Note {
	Note::Point(PointNote {
		date: raw.to_string(),
		update: "Poured footings.".to_string(),
		status: None,
		extra: Default::default(),
	})
}

fn range(start: &str, end: &str) -> Note {
	Note::Range(RangeNote {
		date_start: start.to_string(),
		date_end: end.to_string(),
		update: "Framing crew on site.".to_string(),
		extra: Default::default(),
	})
}

#[test]
fn point_note_inside_and_outside_range() {
	let note = point("2025-09-21");

	assert_eq!(date_filter::matches(&note, Some(date(20)), Some(date(25))), Ok(true));
	assert_eq!(date_filter::matches(&note, Some(date(22)), Some(date(25))), Ok(false));
}

#[test]
fn point_note_bounds_are_inclusive() {
	let note = point("2025-09-21");

	assert_eq!(date_filter::matches(&note, Some(date(21)), Some(date(21))), Ok(true));
	assert_eq!(date_filter::matches(&note, None, Some(date(20))), Ok(false));
}

#[test]
fn range_note_matches_on_overlap() {
	let note = range("2025-09-20", "2025-09-25");

	assert_eq!(date_filter::matches(&note, Some(date(24)), Some(date(30))), Ok(true));
	assert_eq!(date_filter::matches(&note, Some(date(26)), Some(date(30))), Ok(false));
	assert_eq!(date_filter::matches(&note, Some(date(1)), Some(date(19))), Ok(false));
	assert_eq!(date_filter::matches(&note, Some(date(1)), Some(date(20))), Ok(true));
}

#[test]
fn missing_bounds_are_unbounded() {
	let note = range("2025-09-20", "2025-09-25");

	assert_eq!(DateRange::UNBOUNDED.matches(&note), Ok(true));
	assert_eq!(DateRange::new(Some(date(25)), None).matches(&note), Ok(true));
	assert_eq!(DateRange::new(None, Some(date(19))).matches(&note), Ok(false));
}

#[test]
fn malformed_dates_are_reported() {
	let note = point("21/09/2025");
	let err = date_filter::matches(&note, None, None).expect_err("Expected invalid date.");

	assert_eq!(err, DateError::Invalid { value: "21/09/2025".to_string() });
	assert!(DateRange::parse(Some("2025-13-01"), None).is_err());
}

#[test]
fn range_parse_treats_blank_as_absent() {
	let parsed = DateRange::parse(Some(""), Some(" 2025-09-30 ")).expect("Expected valid range.");

	assert_eq!(parsed, DateRange::new(None, Some(date(30))));
}

#[test]
fn notes_deserialize_by_shape() {
	let notes: Vec<Note> = serde_json::from_value(json!([
		{ "date": "2025-09-21", "update": "Inspection passed.", "status": "green" },
		{ "dateStart": "2025-09-20", "dateEnd": "2025-09-25", "update": "Framing." },
	]))
	.expect("Notes must deserialize.");

	match &notes[0] {
		Note::Point(note) => assert_eq!(note.status.as_deref(), Some("green")),
		other => panic!("Expected point note, got {other:?}."),
	}

	assert!(matches!(notes[1], Note::Range(_)));
	assert_eq!(notes[1].first_date(), "2025-09-20");
	assert_eq!(notes[1].end_date(), Some("2025-09-25"));
}

#[test]
fn project_preserves_unknown_fields() {
	let raw = json!({
		"pr": "PR-7",
		"title": "Library annex",
		"owner": "Facilities",
		"budget": { "approved": 120000 },
	});
	let project: Project = serde_json::from_value(raw.clone()).expect("Project must deserialize.");

	assert!(project.notes.is_none());
	assert!(project.notes().is_empty());
	assert_eq!(project.extra["owner"], json!("Facilities"));
	assert_eq!(serde_json::to_value(&project).expect("Project must serialize."), raw);
}

#[test]
fn push_note_creates_notes_field() {
	let mut project = Project::new("PR-1", "Roof");

	project.push_note(point("2025-09-21"));

	assert_eq!(project.notes().len(), 1);
	assert_eq!(project.notes()[0].update(), "Poured footings.");
}
