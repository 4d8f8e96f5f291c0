//! HTTP request handlers for web adapter.

use askama::Template;
use axum::{
    Form,
    extract::{Path, State},
    http::HeaderMap,
    response::{Html, IntoResponse, Redirect, Response},
};
use std::sync::Arc;

use crate::adapters::chart_svg::dashboard_svg;
use crate::domain::report;
use crate::domain::transaction::{Kind, today};

use super::{AppState, LedgerView, WebError, is_htmx_request};

fn render(template: &impl Template) -> Result<Response, WebError> {
    template
        .render()
        .map(|html| Html(html).into_response())
        .map_err(|e| WebError::internal(format!("template error: {}", e)))
}

pub async fn index(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, WebError> {
    let rows = state.ledger.load()?;
    let chart = if rows.is_empty() {
        None
    } else {
        let chart = &state.settings.chart;
        Some(dashboard_svg(
            &report::by_category(&rows, Kind::Expense),
            &report::totals(&rows),
            chart.width,
            chart.height,
        ))
    };
    let view = LedgerView::build(
        &rows,
        chart,
        &state.settings.currency,
        state.settings.newest_first,
    );

    if is_htmx_request(&headers) {
        render(&super::templates::LedgerFragment { view: &view })
    } else {
        render(&super::templates::IndexTemplate { view: &view })
    }
}

pub async fn add_form() -> Result<Response, WebError> {
    let today = today();
    render(&super::templates::AddTemplate {
        today: &today,
        kinds: &Kind::ALL,
    })
}

#[derive(Debug, serde::Deserialize)]
pub struct AddFormData {
    #[serde(alias = "type")]
    pub kind: String,
    pub category: String,
    #[serde(alias = "value")]
    pub amount: String,
    #[serde(default)]
    pub date: Option<String>,
}

pub async fn add_transaction(
    State(state): State<Arc<AppState>>,
    Form(form): Form<AddFormData>,
) -> Result<Redirect, WebError> {
    let kind: Kind = form.kind.parse()?;
    state
        .ledger
        .add(kind, &form.category, &form.amount, form.date.as_deref())?;
    Ok(Redirect::to("/"))
}

pub async fn delete_transaction(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> Result<Redirect, WebError> {
    state.ledger.remove_by_id(id)?;
    Ok(Redirect::to("/"))
}

pub async fn not_found() -> WebError {
    WebError::not_found("page not found")
}
