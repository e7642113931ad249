use aide::axum::{routing::get_with, ApiRouter};
use axum::http::StatusCode;
use mongodb::bson::oid::ObjectId;

use crate::{error, AppState};

pub mod model;
pub mod route;

/// The collection posts are stored in.
pub const COLLECTION: &str = "post";
/// The fields a search query is matched against.
pub const SEARCH_FIELDS: &[&str] = &["title", "region", "excerpt", "tags"];

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("invalid id")]
	InvalidId(String),
	#[error("not found")]
	UnknownPost(ObjectId),
}

pub type RouteError = error::RouteError<Error>;

impl From<Error> for RouteError {
	fn from(error: Error) -> Self {
		Self::Route(error)
	}
}

pub fn routes() -> ApiRouter<AppState> {
	use route::*;

	ApiRouter::new()
		.api_route(
			"/",
			get_with(list_posts, list_posts_docs).post_with(create_post, create_post_docs),
		)
		.api_route(
			"/:id",
			get_with(get_post, get_post_docs).delete_with(delete_post, delete_post_docs),
		)
}

impl error::ErrorShape for Error {
	fn status(&self) -> StatusCode {
		match self {
			Self::InvalidId(..) => StatusCode::BAD_REQUEST,
			Self::UnknownPost(..) => StatusCode::NOT_FOUND,
		}
	}

	fn errors(&self) -> Vec<error::Message<'_>> {
		let message = error::Message::new(self.to_string());

		let message = match self {
			Self::InvalidId(id) => message.field("id").detail("id", id.as_str()),
			Self::UnknownPost(id) => message.detail("post", id.to_hex()),
		};

		message.into_vec()
	}
}
