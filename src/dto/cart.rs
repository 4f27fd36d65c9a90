use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::cart::Cart;
use crate::pricing::Quote;

/// The serialized cart document the storefront client persists, exactly as
/// stored. Deserializing it here is the explicit client-storage boundary.
#[derive(Debug, Deserialize, ToSchema)]
pub struct QuoteRequest {
    #[serde(flatten)]
    pub cart: Cart,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct QuoteResponse {
    #[serde(flatten)]
    pub quote: Quote,
}
