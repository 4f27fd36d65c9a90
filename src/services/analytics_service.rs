use chrono::Utc;
use sea_orm::EntityTrait;
use std::collections::HashMap;
use uuid::Uuid;

use crate::{
    analytics::{self, AnalyticsSummary, TimeRange},
    entity::{order_items::Entity as OrderItems, orders::Entity as Orders},
    error::AppResult,
    middleware::auth::AuthAdmin,
    models::Order,
    response::{ApiResponse, Meta},
    services::order_service::order_from_entity,
    state::AppState,
};

/// Recompute the analytics summary from the full order set. Deliberately
/// uncached: the expected collection size keeps a full scan cheap, and a
/// read-only fold has nothing to invalidate.
pub async fn summary(
    state: &AppState,
    _admin: &AuthAdmin,
    range: TimeRange,
) -> AppResult<ApiResponse<AnalyticsSummary>> {
    let order_models = Orders::find().all(&state.orm).await?;
    let item_models = OrderItems::find().all(&state.orm).await?;

    let mut items_by_order: HashMap<Uuid, Vec<_>> = HashMap::new();
    for item in item_models {
        items_by_order.entry(item.order_id).or_default().push(item);
    }

    let orders = order_models
        .into_iter()
        .map(|model| {
            let items = items_by_order.remove(&model.id).unwrap_or_default();
            order_from_entity(model, items)
        })
        .collect::<AppResult<Vec<Order>>>()?;

    let summary = analytics::summarize(&orders, range, Utc::now().date_naive());
    Ok(ApiResponse::success("Analytics", summary, Some(Meta::empty())))
}
