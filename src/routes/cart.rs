use axum::{Json, Router, routing::post};

use crate::{
    dto::cart::{QuoteRequest, QuoteResponse},
    error::AppResult,
    pricing,
    response::{ApiResponse, Meta},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/quote", post(quote_cart))
}

/// Price a serialized cart: subtotal, shipping, tax and total, rounded for
/// display. The same figures are recomputed server-side at order creation.
#[utoipa::path(
    post,
    path = "/api/cart/quote",
    request_body = QuoteRequest,
    responses(
        (status = 200, description = "Pricing breakdown", body = ApiResponse<QuoteResponse>),
    ),
    tag = "Cart"
)]
pub async fn quote_cart(
    Json(payload): Json<QuoteRequest>,
) -> AppResult<Json<ApiResponse<QuoteResponse>>> {
    let quote = pricing::quote(payload.cart.lines()).rounded();
    Ok(Json(ApiResponse::success(
        "Quote",
        QuoteResponse { quote },
        Some(Meta::empty()),
    )))
}
