//! Bag route handlers.

use axum::{
    Json,
    extract::Path,
    response::{IntoResponse, Redirect},
};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use super::bag_count_header;
use crate::bag::{BagController, BagView};
use crate::error::Result;
use crate::store::{BagStore, SessionBagStore};

/// Quantity change request body.
#[derive(Debug, Deserialize)]
pub struct QuantityChange {
    pub delta: i64,
}

/// Bag count indicator.
#[derive(Debug, Serialize)]
pub struct BagCount {
    pub count: u64,
    /// Whether the indicator is shown at all.
    pub visible: bool,
}

/// Display the bag page.
#[instrument(skip(session))]
pub async fn show(session: Session) -> Result<Json<BagView>> {
    let bag = BagController::load(SessionBagStore::new(session)).await?;
    Ok(Json(bag.render()))
}

/// Get the bag count indicator.
#[instrument(skip(session))]
pub async fn count(session: Session) -> Result<Json<BagCount>> {
    let count = SessionBagStore::new(session).get().await?.item_count();
    Ok(Json(BagCount {
        count,
        visible: count > 0,
    }))
}

/// Change the quantity of one bag line.
#[instrument(skip(session))]
pub async fn adjust_quantity(
    session: Session,
    Path(index): Path<usize>,
    Json(change): Json<QuantityChange>,
) -> Result<impl IntoResponse> {
    let mut bag = BagController::load(SessionBagStore::new(session)).await?;
    let view = bag.adjust_quantity(index, change.delta).await?;
    Ok((bag_count_header(view.bag_count), Json(view)))
}

/// Remove one bag line.
#[instrument(skip(session))]
pub async fn remove(session: Session, Path(index): Path<usize>) -> Result<impl IntoResponse> {
    let mut bag = BagController::load(SessionBagStore::new(session)).await?;
    let view = bag.remove(index).await?;
    Ok((bag_count_header(view.bag_count), Json(view)))
}

/// Proceed to checkout, refusing an empty bag.
#[instrument(skip(session))]
pub async fn checkout(session: Session) -> Result<Redirect> {
    let bag = BagController::load(SessionBagStore::new(session)).await?;
    bag.begin_checkout()?;
    Ok(Redirect::to("/checkout"))
}
