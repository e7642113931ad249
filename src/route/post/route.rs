use axum::extract::State;
use macros::route;
use mongodb::bson;

use crate::{
	error::ErrorResponse,
	extract::{Json, Path, Query},
	normalize,
	openapi::tag,
	search,
	store::Database,
};

use super::{model, Error, RouteError, COLLECTION, SEARCH_FIELDS};

/// List posts
/// Returns up to `limit` posts. When `q` is given, only posts whose title, region,
/// excerpt or tags contain it (ignoring case) are returned.
#[route(tag = tag::POST)]
pub async fn list_posts(
	State(database): State<Database>,
	Query(input): Query<model::SearchInput>,
) -> Result<Json<Vec<model::Post>>, RouteError> {
	let filter = search::build_filter(input.q.as_deref(), SEARCH_FIELDS);
	let documents = database
		.store()?
		.find(COLLECTION, &filter, input.limit)
		.await?;

	let posts = documents
		.iter()
		.map(model::Post::from_document)
		.collect::<Result<Vec<_>, _>>()?;

	Ok(Json(posts))
}

/// Create post
/// Stores a new post and returns its unique id.
#[route(tag = tag::POST)]
pub async fn create_post(
	State(database): State<Database>,
	Json(post): Json<model::Post>,
) -> Result<Json<model::Created>, RouteError> {
	let mut document = bson::to_document(&post)?;
	let now = bson::DateTime::now();

	document.insert("created_at", now);
	document.insert("updated_at", now);

	let id = database.store()?.insert(COLLECTION, document).await?;

	tracing::info!(%id, "created post");

	Ok(Json(model::Created { id }))
}

/// Get single post
/// Returns a single stored post by its unique id, with every stored field.
#[route(
	tag = tag::POST,
	response(status = 400, description = "The id is malformed.", shape = "Json<ErrorResponse<'static>>"),
	response(status = 404, description = "No post has this id.", shape = "Json<ErrorResponse<'static>>")
)]
pub async fn get_post(
	State(database): State<Database>,
	Path(path): Path<model::IdInput>,
) -> Result<Json<model::PostDocument>, RouteError> {
	let id = path.object_id().ok_or(Error::InvalidId(path.id))?;
	let document = database.store()?.find_by_id(COLLECTION, id).await?;
	let document = normalize::normalize(document.as_ref()).ok_or(Error::UnknownPost(id))?;

	Ok(Json(document.into()))
}

/// Delete post
/// Deletes a post by its unique id.
#[route(
	tag = tag::POST,
	response(status = 400, description = "The id is malformed.", shape = "Json<ErrorResponse<'static>>"),
	response(status = 404, description = "No post has this id.", shape = "Json<ErrorResponse<'static>>")
)]
pub async fn delete_post(
	State(database): State<Database>,
	Path(path): Path<model::IdInput>,
) -> Result<Json<model::Deleted>, RouteError> {
	let id = path.object_id().ok_or(Error::InvalidId(path.id))?;
	let deleted = database.store()?.delete_by_id(COLLECTION, id).await?;

	if deleted == 0 {
		return Err(Error::UnknownPost(id).into());
	}

	tracing::info!(%id, "deleted post");

	Ok(Json(model::Deleted {
		status: model::Deleted::STATUS,
	}))
}
