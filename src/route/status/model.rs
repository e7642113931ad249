use schemars::JsonSchema;
use serde::Serialize;

/// The most collection names reported by the diagnostics endpoint.
pub const MAX_COLLECTIONS: usize = 10;
/// Database errors are cut to this many characters.
pub const MAX_ERROR_LENGTH: usize = 80;

#[derive(Debug, Serialize, JsonSchema)]
pub struct Liveness {
	pub message: &'static str,
}

/// The state of the database as seen by the diagnostics endpoint.
#[derive(Debug)]
pub enum DatabaseStatus {
	NotConfigured,
	Connected,
	/// The database is configured but could not be queried.
	Error(String),
}

impl DatabaseStatus {
	pub fn error(error: &impl std::fmt::Display) -> Self {
		Self::Error(error.to_string().chars().take(MAX_ERROR_LENGTH).collect())
	}
}

impl std::fmt::Display for DatabaseStatus {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::NotConfigured => f.write_str("not configured"),
			Self::Connected => f.write_str("connected"),
			Self::Error(error) => write!(f, "connected but error: {error}"),
		}
	}
}

/// Backend and database status.
#[derive(Debug, Serialize, JsonSchema)]
pub struct Diagnostics {
	/// Always `running`.
	pub backend: &'static str,
	/// `connected`, `not configured`, or `connected but error: <message>`.
	pub database: String,
	/// Up to ten collection names.
	pub collections: Vec<String>,
}

impl Diagnostics {
	pub fn new(database: &DatabaseStatus, mut collections: Vec<String>) -> Self {
		collections.truncate(MAX_COLLECTIONS);

		Self {
			backend: "running",
			database: database.to_string(),
			collections,
		}
	}
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn test_error_is_truncated_by_characters() {
		let status = DatabaseStatus::error(&"é".repeat(100));

		let DatabaseStatus::Error(message) = &status else {
			panic!("expected an error status");
		};

		assert_eq!(message.chars().count(), MAX_ERROR_LENGTH);
	}

	#[test]
	fn test_short_error_is_kept() {
		assert_eq!(
			DatabaseStatus::error(&"timeout").to_string(),
			"connected but error: timeout"
		);
	}
}
