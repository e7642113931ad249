use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
	bson::{doc, oid::ObjectId, Bson, Document},
	Client, Collection,
};

use super::{DocumentStore, Filter, StoreError};

/// Used when the connection string does not name a database.
pub const DEFAULT_DATABASE: &str = "app";

/// A [`DocumentStore`] backed by a MongoDB database.
pub struct MongoStore {
	client: Client,
	database: mongodb::Database,
}

impl MongoStore {
	/// Connects to the database named in `uri`, or [`DEFAULT_DATABASE`] if it names none.
	///
	/// The driver connects lazily, so an unreachable server only surfaces
	/// once the first operation is attempted.
	pub async fn connect(uri: &str) -> Result<Self, StoreError> {
		let client = Client::with_uri_str(uri).await?;
		let database = client
			.default_database()
			.unwrap_or_else(|| client.database(DEFAULT_DATABASE));

		tracing::info!(database = database.name(), "configured mongodb store");

		Ok(Self { client, database })
	}

	fn collection(&self, name: &str) -> Collection<Document> {
		self.database.collection(name)
	}
}

/// Translates a [`Filter`] into a MongoDB query document.
///
/// Patterns are passed through as regular expressions without escaping.
pub fn filter_document(filter: &Filter) -> Document {
	match filter {
		Filter::All => Document::new(),
		Filter::AnyFieldMatches { fields, pattern } => {
			let clauses = fields
				.iter()
				.map(|field| {
					let mut clause = Document::new();
					clause.insert(*field, doc! { "$regex": pattern.as_str(), "$options": "i" });
					clause
				})
				.collect::<Vec<_>>();

			doc! { "$or": clauses }
		}
	}
}

#[async_trait]
impl DocumentStore for MongoStore {
	async fn insert(&self, collection: &str, document: Document) -> Result<String, StoreError> {
		let result = self.collection(collection).insert_one(document).await?;

		Ok(match result.inserted_id {
			Bson::ObjectId(id) => id.to_hex(),
			other => other.to_string(),
		})
	}

	async fn find(
		&self,
		collection: &str,
		filter: &Filter,
		limit: i64,
	) -> Result<Vec<Document>, StoreError> {
		let filter = filter_document(filter);

		tracing::debug!(collection, %filter, limit, "finding documents");

		let documents = self
			.collection(collection)
			.find(filter)
			.limit(limit)
			.await?
			.try_collect()
			.await?;

		Ok(documents)
	}

	async fn find_by_id(
		&self,
		collection: &str,
		id: ObjectId,
	) -> Result<Option<Document>, StoreError> {
		Ok(self
			.collection(collection)
			.find_one(doc! { "_id": id })
			.await?)
	}

	async fn delete_by_id(&self, collection: &str, id: ObjectId) -> Result<u64, StoreError> {
		let result = self
			.collection(collection)
			.delete_one(doc! { "_id": id })
			.await?;

		Ok(result.deleted_count)
	}

	async fn list_collections(&self) -> Result<Vec<String>, StoreError> {
		Ok(self.database.list_collection_names().await?)
	}

	async fn shutdown(&self) {
		self.client.clone().shutdown().await;
	}
}
