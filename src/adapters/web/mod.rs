//! Web server adapter.
//!
//! Axum router over a shared [`Ledger`]: the ledger list with totals and
//! charts, an add form, and delete links addressed by transaction id.

mod error;
mod handlers;
mod templates;

pub use error::WebError;
pub use handlers::*;
pub use templates::*;

use axum::{Router, routing::get};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::domain::ledger::Ledger;
use crate::domain::settings::Settings;

pub struct AppState {
    pub ledger: Ledger,
    pub settings: Settings,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route(
            "/add",
            get(handlers::add_form).post(handlers::add_transaction),
        )
        .route(
            "/delete/{id}",
            get(handlers::delete_transaction).post(handlers::delete_transaction),
        )
        .fallback(handlers::not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

fn is_htmx_request(headers: &axum::http::HeaderMap) -> bool {
    headers.get("HX-Request").is_some()
}
