#![warn(clippy::pedantic)]

mod config;
mod error;
mod extract;
mod normalize;
mod openapi;
mod route;
mod search;
mod store;

use std::sync::Arc;

use aide::{axum::ApiRouter, openapi::OpenApi};
use axum::{Extension, Router};
use tower::ServiceBuilder;
use tower_http::{
	compression::CompressionLayer,
	cors::CorsLayer,
	request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
	trace::TraceLayer,
};

use crate::{
	config::Config,
	store::{mongo::MongoStore, Database},
};

pub type AppState = State;

/// The shared application state.
///
/// Built once at startup and cloned into every handler. Nothing in it
/// is mutated after construction.
#[derive(Clone, axum::extract::FromRef)]
pub struct State {
	pub database: Database,
}

/// Builds the application router, including the `OpenAPI` documentation routes.
pub fn router(state: AppState) -> Router {
	let mut api = OpenApi::default();

	ApiRouter::new()
		.merge(route::status::routes())
		.nest("/api/posts", route::post::routes())
		.nest(openapi::DOCS_PATH, openapi::routes())
		.finish_api_with(&mut api, openapi::docs)
		.layer(Extension(Arc::new(api)))
		.layer(
			ServiceBuilder::new()
				.layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
				.layer(TraceLayer::new_for_http())
				.layer(PropagateRequestIdLayer::x_request_id())
				.layer(CompressionLayer::new())
				.layer(CorsLayer::very_permissive()),
		)
		.with_state(state)
}

async fn shutdown_signal() {
	match tokio::signal::ctrl_c().await {
		Ok(()) => tracing::info!("shutting down"),
		Err(error) => {
			tracing::error!(%error, "failed to listen for the shutdown signal");
			std::future::pending::<()>().await;
		}
	}
}

#[tokio::main]
async fn main() {
	tracing_subscriber::fmt::init();
	dotenvy::dotenv().ok();

	let config = Config::from_env().expect("invalid configuration");

	let database = if let Some(url) = &config.database_url {
		Database::new(
			MongoStore::connect(url)
				.await
				.expect("failed to configure database"),
		)
	} else {
		tracing::warn!("DATABASE_URL is not set, running without a database");
		Database::unavailable()
	};

	let state = State {
		database: database.clone(),
	};

	let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port))
		.await
		.expect("failed to bind to port");

	tracing::info!(
		database = database.is_configured(),
		"listening on port {}",
		config.port
	);

	axum::serve(listener, router(state))
		.with_graceful_shutdown(shutdown_signal())
		.await
		.expect("server error");

	database.shutdown().await;
}
