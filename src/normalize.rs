//! Conversion of stored documents into their API representation.
//!
//! Stored documents carry their identifier under [`ID_KEY`] and may contain
//! native timestamps. Neither leaks into responses: the identifier is exposed
//! as a string `id` field and timestamps are rendered as ISO-8601 strings.

use chrono::{SecondsFormat, Utc};
use mongodb::bson::{self, Bson, Document};
use serde_json::Value;

/// The key under which the store keeps a document's identifier.
pub const ID_KEY: &str = "_id";
/// The key under which the identifier is exposed.
pub const PUBLIC_ID_KEY: &str = "id";

pub type Map = serde_json::Map<String, Value>;

/// Renders a stored timestamp in ISO-8601 (RFC 3339) form, in UTC with millisecond precision.
pub fn timestamp(datetime: bson::DateTime) -> String {
	chrono::DateTime::<Utc>::from_timestamp_millis(datetime.timestamp_millis()).map_or_else(
		|| datetime.to_string(),
		|datetime| datetime.to_rfc3339_opts(SecondsFormat::Millis, true),
	)
}

fn identifier(value: &Bson) -> String {
	match value {
		Bson::ObjectId(id) => id.to_hex(),
		Bson::String(id) => id.clone(),
		other => other.to_string(),
	}
}

fn field_value(value: &Bson) -> Value {
	match value {
		Bson::DateTime(datetime) => Value::String(timestamp(*datetime)),
		other => other.clone().into_relaxed_extjson(),
	}
}

/// Normalizes a document, if there is one.
pub fn normalize(document: Option<&Document>) -> Option<Map> {
	document.map(normalize_document)
}

/// Copies `document` into its API representation.
///
/// The stored identifier is renamed to `id` and converted to a string, replacing
/// any stored field that is already called `id`. Top-level timestamps become
/// ISO-8601 strings and every other field is passed through.
pub fn normalize_document(document: &Document) -> Map {
	let mut normalized = document
		.iter()
		.filter(|(key, _)| key.as_str() != ID_KEY)
		.map(|(key, field)| (key.clone(), field_value(field)))
		.collect::<Map>();

	if let Some(id) = document.get(ID_KEY) {
		normalized.insert(PUBLIC_ID_KEY.into(), Value::String(identifier(id)));
	}

	normalized
}

#[cfg(test)]
mod test {
	use mongodb::bson::{doc, oid::ObjectId};
	use serde_json::json;

	use super::*;

	#[test]
	fn test_identifier_is_renamed() {
		let id = ObjectId::new();
		let document = doc! { "_id": id, "title": "Global Markets Shift" };

		let normalized = normalize_document(&document);

		assert!(!normalized.contains_key(ID_KEY));
		assert_eq!(normalized["id"], json!(id.to_hex()));
		assert_eq!(normalized["title"], json!("Global Markets Shift"));
		assert_eq!(normalized.len(), 2);
	}

	#[test]
	fn test_identifier_replaces_existing_id_field() {
		let id = ObjectId::new();
		let document = doc! { "id": 5, "_id": id };

		let normalized = normalize_document(&document);

		assert_eq!(normalized.len(), 1);
		assert_eq!(normalized["id"], json!(id.to_hex()));
	}

	#[test]
	fn test_timestamps_are_iso_8601() {
		let document = doc! {
			"created_at": bson::DateTime::from_millis(1_700_000_000_123),
			"nested": { "count": 3 }
		};

		let normalized = normalize_document(&document);

		assert_eq!(normalized["created_at"], json!("2023-11-14T22:13:20.123Z"));
		assert_eq!(normalized["nested"], json!({ "count": 3 }));
	}

	#[test]
	fn test_input_is_not_mutated() {
		let document = doc! { "_id": ObjectId::new(), "title": "t" };
		let copy = document.clone();

		normalize_document(&document);

		assert_eq!(document, copy);
	}

	#[test]
	fn test_absent_document() {
		assert_eq!(normalize(None), None);
		assert_eq!(normalize(Some(&Document::new())), Some(Map::new()));
	}
}
