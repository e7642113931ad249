use axum::extract::State;
use macros::route;

use crate::{extract::Json, openapi::tag, store::Database};

use super::model::{DatabaseStatus, Diagnostics, Liveness};

/// Liveness
/// Returns a static message while the server is running.
#[route(tag = tag::STATUS)]
pub async fn root() -> Json<Liveness> {
	Json(Liveness {
		message: "The Foreign Desk backend is running",
	})
}

/// Diagnostics
/// Reports whether the database is reachable by listing up to ten of its collections.
/// Database errors are reported in the body rather than as an error status.
#[route(tag = tag::STATUS)]
pub async fn test_database(State(database): State<Database>) -> Json<Diagnostics> {
	let Ok(store) = database.store() else {
		return Json(Diagnostics::new(&DatabaseStatus::NotConfigured, Vec::new()));
	};

	Json(match store.list_collections().await {
		Ok(collections) => Diagnostics::new(&DatabaseStatus::Connected, collections),
		Err(error) => {
			tracing::warn!(%error, "database diagnostics failed");

			Diagnostics::new(&DatabaseStatus::error(&error), Vec::new())
		}
	})
}
