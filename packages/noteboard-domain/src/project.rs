use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use time::Date;

use crate::{DateError, date_filter};

/// A tracked project. Keys the core does not interpret are kept in `extra` so they survive a
/// load/save cycle untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
	#[serde(default)]
	pub pr: String,
	#[serde(default)]
	pub title: String,
	#[serde(flatten)]
	pub extra: Map<String, Value>,
	/// `None` when the document has no `notes` key for this project.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub notes: Option<Vec<Note>>,
}
impl Project {
	pub fn new(pr: impl Into<String>, title: impl Into<String>) -> Self {
		Self { pr: pr.into(), title: title.into(), extra: Map::new(), notes: None }
	}

	pub fn notes(&self) -> &[Note] {
		self.notes.as_deref().unwrap_or_default()
	}

	pub fn push_note(&mut self, note: Note) {
		self.notes.get_or_insert_with(Vec::new).push(note);
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Note {
	// Listed first so a note carrying both shapes' keys resolves to a range.
	Range(RangeNote),
	Point(PointNote),
}
impl Note {
	pub fn update(&self) -> &str {
		match self {
			Self::Range(note) => &note.update,
			Self::Point(note) => &note.update,
		}
	}

	/// The single date of a point note, or the start of a range note.
	pub fn first_date(&self) -> &str {
		match self {
			Self::Range(note) => &note.date_start,
			Self::Point(note) => &note.date,
		}
	}

	pub fn end_date(&self) -> Option<&str> {
		match self {
			Self::Range(note) => Some(&note.date_end),
			Self::Point(_) => None,
		}
	}

	/// Parses every date the note carries as `(first, last)`; both are equal for a point note.
	pub fn span(&self) -> Result<(Date, Date), DateError> {
		match self {
			Self::Range(note) => Ok((
				date_filter::parse_date(&note.date_start)?,
				date_filter::parse_date(&note.date_end)?,
			)),
			Self::Point(note) => {
				let date = date_filter::parse_date(&note.date)?;

				Ok((date, date))
			},
		}
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointNote {
	pub date: String,
	#[serde(default)]
	pub update: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub status: Option<String>,
	#[serde(flatten)]
	pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeNote {
	#[serde(rename = "dateStart")]
	pub date_start: String,
	#[serde(rename = "dateEnd")]
	pub date_end: String,
	#[serde(default)]
	pub update: String,
	#[serde(flatten)]
	pub extra: Map<String, Value>,
}
