//! Formatting helpers for log output.

/// Truncates an identifier for display purposes.
///
/// Keeps the first 8 characters followed by ".." so log lines stay readable
/// when identifiers are long UUIDs.
pub fn truncate_id(id: &str) -> String {
	if id.len() <= 8 {
		id.to_string()
	} else {
		format!("{}..", &id[..8])
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_truncate_id() {
		assert_eq!(truncate_id("short"), "short");
		assert_eq!(truncate_id("12345678"), "12345678");
		assert_eq!(
			truncate_id("ce6f2c57-7277-4f93-963c-3b2c09d1e9a8"),
			"ce6f2c57.."
		);
	}
}
