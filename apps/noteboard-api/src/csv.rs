//! CSV rendering for note exports.

use noteboard_service::{EXPORT_HEADER, ExportRow};

pub fn render(rows: &[ExportRow]) -> String {
	let mut out = String::new();

	push_record(&mut out, &EXPORT_HEADER);

	for row in rows {
		push_record(&mut out, &row.fields());
	}

	out
}

/// Name offered to the client for a project's export.
pub fn file_name(pr: &str) -> String {
	let safe: String = pr
		.chars()
		.map(|ch| {
			if ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_' | '.') { ch } else { '_' }
		})
		.collect();

	format!("{safe}_updates.csv")
}

fn push_record(out: &mut String, fields: &[&str]) {
	for (idx, field) in fields.iter().enumerate() {
		if idx > 0 {
			out.push(',');
		}

		push_field(out, field);
	}

	out.push_str("\r\n");
}

fn push_field(out: &mut String, field: &str) {
	if !field.contains([',', '"', '\r', '\n']) {
		out.push_str(field);

		return;
	}

	out.push('"');
	out.push_str(&field.replace('"', "\"\""));
	out.push('"');
}
