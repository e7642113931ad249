use std::{collections::HashMap, sync::Mutex};

use async_trait::async_trait;
use mongodb::bson::{oid::ObjectId, Bson, Document};
use regex::{Regex, RegexBuilder};

use super::{DocumentStore, Filter, StoreError};

/// An in-process [`DocumentStore`] for exercising the router without a database server.
///
/// Search patterns are compiled as case-insensitive regular expressions, matching
/// the semantics of the MongoDB `$regex` operator with the `i` option.
#[derive(Default)]
pub struct MemoryStore {
	collections: Mutex<HashMap<String, Vec<Document>>>,
}

fn field_matches(regex: &Regex, value: Option<&Bson>) -> bool {
	match value {
		Some(Bson::String(value)) => regex.is_match(value),
		Some(Bson::Array(values)) => values
			.iter()
			.any(|value| matches!(value, Bson::String(value) if regex.is_match(value))),
		_ => false,
	}
}

#[async_trait]
impl DocumentStore for MemoryStore {
	async fn insert(&self, collection: &str, mut document: Document) -> Result<String, StoreError> {
		let id = match document.get("_id") {
			Some(Bson::ObjectId(id)) => *id,
			_ => {
				let id = ObjectId::new();
				document.insert("_id", id);
				id
			}
		};

		self.collections
			.lock()
			.unwrap()
			.entry(collection.to_owned())
			.or_default()
			.push(document);

		Ok(id.to_hex())
	}

	async fn find(
		&self,
		collection: &str,
		filter: &Filter,
		limit: i64,
	) -> Result<Vec<Document>, StoreError> {
		let regex = match filter {
			Filter::All => None,
			Filter::AnyFieldMatches { fields, pattern } => Some((
				fields,
				RegexBuilder::new(pattern)
					.case_insensitive(true)
					.build()
					.map_err(|error| StoreError::Backend(Box::new(error)))?,
			)),
		};

		let collections = self.collections.lock().unwrap();
		let Some(documents) = collections.get(collection) else {
			return Ok(Vec::new());
		};

		Ok(documents
			.iter()
			.filter(|document| match &regex {
				None => true,
				Some((fields, regex)) => fields
					.iter()
					.any(|field| field_matches(regex, document.get(*field))),
			})
			.take(usize::try_from(limit).unwrap_or(0))
			.cloned()
			.collect())
	}

	async fn find_by_id(
		&self,
		collection: &str,
		id: ObjectId,
	) -> Result<Option<Document>, StoreError> {
		let collections = self.collections.lock().unwrap();

		Ok(collections.get(collection).and_then(|documents| {
			documents
				.iter()
				.find(|document| document.get_object_id("_id").ok() == Some(id))
				.cloned()
		}))
	}

	async fn delete_by_id(&self, collection: &str, id: ObjectId) -> Result<u64, StoreError> {
		let mut collections = self.collections.lock().unwrap();
		let Some(documents) = collections.get_mut(collection) else {
			return Ok(0);
		};

		let before = documents.len();
		documents.retain(|document| document.get_object_id("_id").ok() != Some(id));

		Ok((before - documents.len()) as u64)
	}

	async fn list_collections(&self) -> Result<Vec<String>, StoreError> {
		Ok(self.collections.lock().unwrap().keys().cloned().collect())
	}
}

/// A store whose every operation fails, for exercising error paths.
pub struct FailingStore;

fn refused() -> StoreError {
	StoreError::Backend("connection refused".into())
}

#[async_trait]
impl DocumentStore for FailingStore {
	async fn insert(&self, _: &str, _: Document) -> Result<String, StoreError> {
		Err(refused())
	}

	async fn find(&self, _: &str, _: &Filter, _: i64) -> Result<Vec<Document>, StoreError> {
		Err(refused())
	}

	async fn find_by_id(&self, _: &str, _: ObjectId) -> Result<Option<Document>, StoreError> {
		Err(refused())
	}

	async fn delete_by_id(&self, _: &str, _: ObjectId) -> Result<u64, StoreError> {
		Err(refused())
	}

	async fn list_collections(&self) -> Result<Vec<String>, StoreError> {
		Err(StoreError::Backend(
			"server selection timeout: no available servers matching the criteria, topology: Unknown"
				.into(),
		))
	}
}

#[cfg(test)]
mod test {
	use mongodb::bson::doc;

	use super::*;

	#[tokio::test]
	async fn test_insert_then_find_by_id() {
		let store = MemoryStore::default();
		let id = store
			.insert("post", doc! { "title": "hello" })
			.await
			.unwrap();

		let found = store
			.find_by_id("post", ObjectId::parse_str(&id).unwrap())
			.await
			.unwrap()
			.unwrap();

		assert_eq!(found.get_str("title").unwrap(), "hello");
		assert_eq!(found.get_object_id("_id").unwrap().to_hex(), id);
	}

	#[tokio::test]
	async fn test_find_matches_array_elements() {
		let store = MemoryStore::default();

		store
			.insert("post", doc! { "title": "a", "tags": ["Europe", "trade"] })
			.await
			.unwrap();
		store
			.insert("post", doc! { "title": "b", "tags": ["asia"] })
			.await
			.unwrap();

		let filter = Filter::AnyFieldMatches {
			fields: &["tags"],
			pattern: "EUROPE".into(),
		};
		let found = store.find("post", &filter, 10).await.unwrap();

		assert_eq!(found.len(), 1);
		assert_eq!(found[0].get_str("title").unwrap(), "a");
	}

	#[tokio::test]
	async fn test_invalid_pattern_is_an_error() {
		let store = MemoryStore::default();
		let filter = Filter::AnyFieldMatches {
			fields: &["title"],
			pattern: "(".into(),
		};

		assert!(matches!(
			store.find("post", &filter, 10).await,
			Err(StoreError::Backend(..))
		));
	}

	#[tokio::test]
	async fn test_delete_twice() {
		let store = MemoryStore::default();
		let id = store.insert("post", doc! {}).await.unwrap();
		let id = ObjectId::parse_str(&id).unwrap();

		assert_eq!(store.delete_by_id("post", id).await.unwrap(), 1);
		assert_eq!(store.delete_by_id("post", id).await.unwrap(), 0);
		assert!(store.find_by_id("post", id).await.unwrap().is_none());
	}
}
