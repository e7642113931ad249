use std::borrow::Cow;

use aide::OperationOutput;
use axum::{
	body::Body,
	extract::rejection,
	http::{Response, StatusCode},
	response::IntoResponse,
};
use schemars::JsonSchema;
use serde::Serialize;

use crate::{extract::Json, store::StoreError};

pub use crate::normalize::Map;

/// A single error message sent to the client.
#[derive(Debug, Serialize, JsonSchema)]
pub struct Message<'a> {
	/// A description of the error.
	pub content: Cow<'a, str>,
	/// The request field that caused the error, if any.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub field: Option<Cow<'a, str>>,
	/// Additional structured information about the error.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub details: Option<Cow<'a, Map>>,
}

impl<'a> Message<'a> {
	pub fn new(content: impl Into<Cow<'a, str>>) -> Self {
		Self {
			content: content.into(),
			field: None,
			details: None,
		}
	}

	pub fn field(mut self, field: impl Into<Cow<'a, str>>) -> Self {
		self.field = Some(field.into());
		self
	}

	pub fn detail(mut self, key: &str, value: impl Into<serde_json::Value>) -> Self {
		self.details
			.get_or_insert_with(|| Cow::Owned(Map::new()))
			.to_mut()
			.insert(key.into(), value.into());
		self
	}

	pub fn into_vec(self) -> Vec<Self> {
		vec![self]
	}
}

/// The body of every error response.
#[derive(Debug, Serialize, JsonSchema)]
pub struct ErrorResponse<'a> {
	pub success: bool,
	pub errors: Vec<Message<'a>>,
}

/// Describes how an error is presented to the client.
pub trait ErrorShape: std::error::Error {
	fn status(&self) -> StatusCode;
	fn errors(&self) -> Vec<Message<'_>>;
}

fn shape(error: &impl ErrorShape) -> Response<Body> {
	let status = error.status();

	if status.is_server_error() {
		tracing::error!(%error, "request failed");
	}

	(
		status,
		Json(ErrorResponse {
			success: false,
			errors: error.errors(),
		}),
	)
		.into_response()
}

/// Errors shared by every route.
///
/// Unlike route-specific errors, store errors are shown to the client
/// verbatim, so the [`Display`](std::fmt::Display) of [`StoreError`] must
/// be safe to expose.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
	#[error("validation error: {0}")]
	Validation(#[from] validator::ValidationErrors),
	#[error("invalid json body")]
	Json(axum_jsonschema::JsonSchemaRejection),
	#[error("{}", .0.body_text())]
	Query(#[from] rejection::QueryRejection),
	#[error("{}", .0.body_text())]
	Path(#[from] rejection::PathRejection),
	#[error("{0}")]
	Store(#[from] StoreError),
	#[error("malformed document: {0}")]
	Document(#[from] serde_json::Error),
	#[error("unable to encode document: {0}")]
	Encode(#[from] mongodb::bson::ser::Error),
}

impl From<axum_jsonschema::JsonSchemaRejection> for AppError {
	fn from(rejection: axum_jsonschema::JsonSchemaRejection) -> Self {
		Self::Json(rejection)
	}
}

impl ErrorShape for AppError {
	fn status(&self) -> StatusCode {
		match self {
			Self::Validation(..) | Self::Json(..) => StatusCode::BAD_REQUEST,
			Self::Query(rejection) => rejection.status(),
			Self::Path(rejection) => rejection.status(),
			Self::Store(..) | Self::Document(..) | Self::Encode(..) => {
				StatusCode::INTERNAL_SERVER_ERROR
			}
		}
	}

	fn errors(&self) -> Vec<Message<'_>> {
		match self {
			Self::Validation(errors) => errors
				.field_errors()
				.into_iter()
				.flat_map(|(field, errors)| {
					errors
						.iter()
						.map(move |error| Message::new(error.to_string()).field(field.to_string()))
				})
				.collect(),
			other => Message::new(other.to_string()).into_vec(),
		}
	}
}

impl IntoResponse for AppError {
	fn into_response(self) -> Response<Body> {
		match self {
			// carries its own description of which part of the body failed
			Self::Json(rejection) => rejection.into_response(),
			other => shape(&other),
		}
	}
}

/// The error type returned by route handlers: either an error shared
/// by all routes, or one specific to the route module `E`.
#[derive(Debug)]
pub enum RouteError<E> {
	App(AppError),
	Route(E),
}

impl<E> From<AppError> for RouteError<E> {
	fn from(error: AppError) -> Self {
		Self::App(error)
	}
}

impl<E> From<StoreError> for RouteError<E> {
	fn from(error: StoreError) -> Self {
		Self::App(error.into())
	}
}

impl<E> From<serde_json::Error> for RouteError<E> {
	fn from(error: serde_json::Error) -> Self {
		Self::App(error.into())
	}
}

impl<E> From<mongodb::bson::ser::Error> for RouteError<E> {
	fn from(error: mongodb::bson::ser::Error) -> Self {
		Self::App(error.into())
	}
}

impl<E: ErrorShape> IntoResponse for RouteError<E> {
	fn into_response(self) -> Response<Body> {
		match self {
			Self::App(error) => error.into_response(),
			Self::Route(error) => shape(&error),
		}
	}
}

impl<E> OperationOutput for RouteError<E> {
	type Inner = Self;
}
