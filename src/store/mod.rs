//! Document store abstraction.
//!
//! Handlers only ever see [`Database`], a cheaply clonable handle around a
//! [`DocumentStore`]. The MongoDB implementation lives in [`mongo`].

pub mod mongo;

#[cfg(test)]
pub mod memory;

use std::sync::Arc;

use async_trait::async_trait;
use mongodb::bson::{oid::ObjectId, Document};

/// An error raised by a store operation.
///
/// The message is surfaced to the client as-is.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
	#[error("database not available")]
	Unavailable,
	/// Any failure reported by the backing store, such as a connection or query error.
	#[error("{0}")]
	Backend(Box<dyn std::error::Error + Send + Sync>),
}

impl From<mongodb::error::Error> for StoreError {
	fn from(error: mongodb::error::Error) -> Self {
		Self::Backend(Box::new(error))
	}
}

/// A store-independent filter expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
	/// Matches every document.
	All,
	/// Matches documents where at least one of `fields` matches `pattern`,
	/// ignoring case. Array fields match if any of their string elements do.
	AnyFieldMatches {
		fields: &'static [&'static str],
		pattern: String,
	},
}

/// A generic document store, parameterized over a collection name.
#[async_trait]
pub trait DocumentStore: Send + Sync {
	/// Persists a new document, returning its assigned identifier as a string.
	async fn insert(&self, collection: &str, document: Document) -> Result<String, StoreError>;

	/// Returns at most `limit` documents matching `filter`, in store order.
	async fn find(
		&self,
		collection: &str,
		filter: &Filter,
		limit: i64,
	) -> Result<Vec<Document>, StoreError>;

	async fn find_by_id(
		&self,
		collection: &str,
		id: ObjectId,
	) -> Result<Option<Document>, StoreError>;

	/// Deletes the document with the given id, returning how many were removed.
	async fn delete_by_id(&self, collection: &str, id: ObjectId) -> Result<u64, StoreError>;

	async fn list_collections(&self) -> Result<Vec<String>, StoreError>;

	/// Releases any resources held by the store. Called once, after the server stops.
	async fn shutdown(&self) {}
}

/// The process-wide store handle.
///
/// Constructed once at startup and never mutated afterwards. A handle without
/// a store (no connection string configured) reports [`StoreError::Unavailable`]
/// for every operation.
#[derive(Clone)]
pub struct Database(Option<Arc<dyn DocumentStore>>);

impl Database {
	pub fn new(store: impl DocumentStore + 'static) -> Self {
		Self(Some(Arc::new(store)))
	}

	pub fn unavailable() -> Self {
		Self(None)
	}

	pub fn is_configured(&self) -> bool {
		self.0.is_some()
	}

	pub fn store(&self) -> Result<&dyn DocumentStore, StoreError> {
		self.0.as_deref().ok_or(StoreError::Unavailable)
	}

	pub async fn shutdown(&self) {
		if let Some(store) = &self.0 {
			store.shutdown().await;
		}
	}
}
