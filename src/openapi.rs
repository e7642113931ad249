//! The generated `OpenAPI` document and the pages that serve it.

use std::sync::Arc;

use aide::{
	axum::{
		routing::{get, get_with},
		ApiRouter, IntoApiResponse,
	},
	openapi::{OpenApi, Tag},
	scalar::Scalar,
	transform::TransformOpenApi,
};
use axum::{response::IntoResponse, Extension};

use crate::{error, extract::Json};

pub const TITLE: &str = "The Foreign Desk API";
/// Where the documentation routes are nested.
pub const DOCS_PATH: &str = "/docs";
/// Where the JSON document is served, relative to [`DOCS_PATH`].
const SPEC_ROUTE: &str = "/private/api.json";
/// [`SPEC_ROUTE`] as seen by clients.
const SPEC_URL: &str = "/docs/private/api.json";

pub mod tag {
	pub const POST: &str = "Post";
	pub const STATUS: &str = "Status";
}

/// Describes the API as a whole; applied when the router is finished.
pub fn docs(api: TransformOpenApi) -> TransformOpenApi {
	api.title(TITLE)
		.summary("Stories from the foreign desk")
		.description("Create, search, read and delete posts.")
		.tag(Tag {
			name: tag::POST.into(),
			description: Some("Post management".into()),
			..Default::default()
		})
		.tag(Tag {
			name: tag::STATUS.into(),
			description: Some("Liveness and diagnostics".into()),
			..Default::default()
		})
		.default_response_with::<Json<error::ErrorResponse<'static>>, _>(|res| {
			res.example(error::ErrorResponse {
				success: false,
				errors: error::Message::new("not found")
					.detail("post", "0123456789abcdef01234567")
					.into_vec(),
			})
		})
}

/// The Scalar reference page and the JSON document it renders.
///
/// Nest under [`DOCS_PATH`]; the document itself is read from an
/// `Extension<Arc<OpenApi>>` layered onto the finished router.
pub fn routes<S>() -> ApiRouter<S>
where
	S: Clone + Send + Sync + 'static,
{
	let reference = Scalar::new(SPEC_URL).with_title(TITLE);

	ApiRouter::new()
		.api_route(
			"/",
			get_with(reference.axum_handler(), |op| {
				op.description("This documentation page.")
			}),
		)
		.route(SPEC_ROUTE, get(serve_spec))
}

async fn serve_spec(Extension(api): Extension<Arc<OpenApi>>) -> impl IntoApiResponse {
	Json(api.as_ref()).into_response()
}
