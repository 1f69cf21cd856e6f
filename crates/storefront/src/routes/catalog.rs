//! Catalog route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
    response::IntoResponse,
};
use serde::Deserialize;
use tidepool_core::{CatalogFilters, SortOrder};
use tower_sessions::Session;
use tracing::instrument;

use super::bag_count_header;
use crate::catalog::{CatalogController, CatalogView};
use crate::error::{Result, add_breadcrumb};
use crate::state::AppState;
use crate::store::SessionBagStore;

/// Catalog query parameters. Missing values mean "no restriction".
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CatalogQuery {
    pub search: String,
    pub category: String,
    pub price: String,
    pub sort: String,
}

/// Display the filtered and sorted catalog.
#[instrument(skip(state, session))]
pub async fn index(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<CatalogQuery>,
) -> Json<CatalogView> {
    let mut catalog = CatalogController::new(state.catalog(), SessionBagStore::new(session));
    catalog.filter(CatalogFilters::from_inputs(
        &query.search,
        &query.category,
        &query.price,
    ));
    Json(catalog.sort_by(SortOrder::parse(&query.sort)))
}

/// Add a catalog card to the bag.
#[instrument(skip(state, session))]
pub async fn add_to_bag(
    State(state): State<AppState>,
    session: Session,
    Path(card): Path<usize>,
) -> Result<impl IntoResponse> {
    let catalog = CatalogController::new(state.catalog(), SessionBagStore::new(session));
    let added = catalog.add_to_bag(card).await?;

    add_breadcrumb("bag", "Added to bag", Some(&[("product", added.name.as_str())]));

    Ok((bag_count_header(added.bag_count), Json(added)))
}
