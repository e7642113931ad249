pub use crate::route::model::{IdInput, SearchInput};

use mongodb::bson::Document;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

use crate::normalize::{self, Map};

/// A single post.
///
/// Fields missing from a stored post take their default value.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize, JsonSchema, Validate)]
#[serde(default)]
pub struct Post {
	/// The headline of the post.
	pub title: String,
	/// The region the post covers.
	pub region: String,
	/// A short summary shown in listings.
	pub excerpt: String,
	/// The publication date, as supplied by the author.
	pub date: Option<Value>,
	pub tags: Vec<String>,
	/// The body of the post, as a list of content blocks.
	pub content: Vec<Value>,
}

impl Post {
	/// Projects a stored document onto the post fields, ignoring any others.
	pub fn from_document(document: &Document) -> Result<Self, serde_json::Error> {
		serde_json::from_value(Value::Object(normalize::normalize_document(document)))
	}
}

/// A stored post exactly as normalized: its string `id` and every other stored
/// field, such as its creation time.
///
/// Stored posts are not required to fit [`Post`], so no field is checked or defaulted.
#[derive(Debug, Serialize, JsonSchema)]
#[serde(transparent)]
pub struct PostDocument(pub Map);

impl From<Map> for PostDocument {
	fn from(normalized: Map) -> Self {
		Self(normalized)
	}
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct Created {
	/// The unique identifier of the new post.
	pub id: String,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct Deleted {
	/// Always `deleted`.
	pub status: &'static str,
}

impl Deleted {
	pub const STATUS: &'static str = "deleted";
}
