use mongodb::bson::oid::ObjectId;
use schemars::JsonSchema;
use serde::Deserialize;
use validator::Validate;

/// These can be removed when [`serde`] supports
/// literal defaults: <https://github.com/serde-rs/serde/issues/368>
#[inline]
fn fifty() -> i64 {
	50
}

#[derive(Deserialize, Validate, JsonSchema)]
pub struct SearchInput {
	/// Text to look for, ignoring case. Matches everything when empty.
	pub q: Option<String>,
	/// The maximum number of items to return.
	#[validate(range(min = 1))]
	#[serde(default = "fifty")]
	pub limit: i64,
}

#[derive(Deserialize, Validate, JsonSchema)]
pub struct IdInput {
	/// The 24-character hexadecimal id of the document.
	pub id: String,
}

impl IdInput {
	/// Parses the id, returning `None` if it is not a well-formed object id.
	pub fn object_id(&self) -> Option<ObjectId> {
		ObjectId::parse_str(&self.id).ok()
	}
}
