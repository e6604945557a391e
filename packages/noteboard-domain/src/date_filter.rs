use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

use crate::{DateError, Note};

const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Inclusive bounds for a date query. A missing bound leaves that side open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
	pub start: Option<Date>,
	pub end: Option<Date>,
}
impl DateRange {
	pub const UNBOUNDED: Self = Self { start: None, end: None };

	pub fn new(start: Option<Date>, end: Option<Date>) -> Self {
		Self { start, end }
	}

	/// Builds a range from raw query values. Blank values count as absent.
	pub fn parse(start: Option<&str>, end: Option<&str>) -> Result<Self, DateError> {
		Ok(Self { start: parse_optional(start)?, end: parse_optional(end)? })
	}

	pub fn matches(&self, note: &Note) -> Result<bool, DateError> {
		matches(note, self.start, self.end)
	}
}

pub fn parse_date(raw: &str) -> Result<Date, DateError> {
	Date::parse(raw.trim(), DATE_FORMAT).map_err(|_| DateError::Invalid { value: raw.to_string() })
}

/// Whether `note` falls inside `[start, end]`. Range notes match on any overlap.
pub fn matches(note: &Note, start: Option<Date>, end: Option<Date>) -> Result<bool, DateError> {
	let (first, last) = note.span()?;

	if let Some(start) = start
		&& last < start
	{
		return Ok(false);
	}
	if let Some(end) = end
		&& first > end
	{
		return Ok(false);
	}

	Ok(true)
}

fn parse_optional(raw: Option<&str>) -> Result<Option<Date>, DateError> {
	match raw.map(str::trim) {
		Some(value) if !value.is_empty() => parse_date(value).map(Some),
		_ => Ok(None),
	}
}
