// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use tracing::info;

use crate::{ramp::RampDirection, state::AppState};

/// Redirect to the partner's buy or sell page for the logged-in wallet.
#[utoipa::path(
    get,
    path = "/v1/ramp/{direction}",
    params(
        ("direction" = RampDirection, Path, description = "`buy` or `sell`")
    ),
    tag = "Ramp",
    responses(
        (status = 303, description = "Redirect to the ramp partner"),
        (status = 204, description = "No wallet address; nothing to do")
    )
)]
pub async fn redirect_to_ramp(
    Path(direction): Path<RampDirection>,
    State(state): State<AppState>,
) -> Response {
    let url = match direction {
        RampDirection::Buy => state.orchestrator.buy_asset(),
        RampDirection::Sell => state.orchestrator.sell_asset(),
    };
    match url {
        Some(url) => {
            info!(?direction, "Redirecting to ramp partner");
            Redirect::to(&url).into_response()
        }
        None => StatusCode::NO_CONTENT.into_response(),
    }
}
