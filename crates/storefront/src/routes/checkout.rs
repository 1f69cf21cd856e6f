//! Checkout route handlers.

use axum::{
    Json,
    extract::State,
    response::IntoResponse,
};
use tower_sessions::Session;
use tracing::instrument;

use super::bag_count_header;
use crate::checkout::{CheckoutController, CheckoutForm, CheckoutView};
use crate::error::{Result, add_breadcrumb};
use crate::state::AppState;
use crate::store::SessionBagStore;

/// Display the checkout summary.
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> Result<Json<CheckoutView>> {
    let checkout = CheckoutController::load(
        SessionBagStore::new(session.clone()),
        state.relay(),
        &state.config().checkout,
    )
    .await?;
    let control = state.submit_control(session.id()).await;

    Ok(Json(checkout.with_control(control).render()))
}

/// Place the order.
///
/// Concurrent submissions from the same session share one submit control,
/// so only the first goes through while it is pending.
#[instrument(skip(state, session, form))]
pub async fn submit(
    State(state): State<AppState>,
    session: Session,
    Json(form): Json<CheckoutForm>,
) -> Result<impl IntoResponse> {
    let checkout = CheckoutController::load(
        SessionBagStore::new(session.clone()),
        state.relay(),
        &state.config().checkout,
    )
    .await?;
    let session_id = session.id();
    let mut checkout = checkout.with_control(state.submit_control(session_id).await);

    add_breadcrumb("checkout", "Order submitted", None);
    let confirmation = checkout.submit(form).await?;
    state.retire_submit_control(session_id).await;

    Ok((bag_count_header(0), Json(confirmation)))
}
