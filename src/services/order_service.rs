use chrono::Utc;
use rand::Rng;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::orders::{CreateOrderRequest, CreateOrderResponse, OrderList, UpdateOrderStatusRequest},
    entity::{
        order_items::{
            ActiveModel as OrderItemActive, Column as OrderItemCol, Entity as OrderItems,
            Model as OrderItemModel,
        },
        orders::{
            ActiveModel as OrderActive, Column as OrderCol, Entity as Orders, Model as OrderModel,
        },
    },
    error::{AppError, AppResult},
    mailer::templates,
    middleware::auth::AuthAdmin,
    models::{Order, OrderItem, OrderStatus},
    pricing,
    response::{ApiResponse, Meta},
    routes::params::{OrderListQuery, SortOrder},
    state::AppState,
};

/// Create an order from a priced cart plus shipping contact details.
///
/// The client-submitted figures are never trusted: subtotal, shipping, tax
/// and the frozen amount are recomputed here. The confirmation email is
/// queued after the write and cannot fail the creation.
pub async fn create_order(
    state: &AppState,
    payload: CreateOrderRequest,
) -> AppResult<ApiResponse<CreateOrderResponse>> {
    if payload.items.is_empty() {
        return Err(AppError::BadRequest("No items provided".into()));
    }
    for item in &payload.items {
        if item.quantity < 0 {
            return Err(AppError::BadRequest(format!(
                "Invalid quantity for item '{}'",
                item.name
            )));
        }
        if item.price.is_sign_negative() {
            return Err(AppError::BadRequest(format!(
                "Invalid price for item '{}'",
                item.name
            )));
        }
    }
    require("email", &payload.email)?;
    require("firstName", &payload.first_name)?;
    require("lastName", &payload.last_name)?;
    require("address", &payload.address)?;
    require("city", &payload.city)?;
    require("postcode", &payload.postcode)?;

    let quote = pricing::quote(payload.items.iter().map(|i| (i.price, i.quantity))).rounded();
    let reference = generate_reference();
    let order_id = Uuid::new_v4();

    let txn = state.orm.begin().await?;

    let order = OrderActive {
        id: Set(order_id),
        reference: Set(reference.clone()),
        email: Set(payload.email),
        first_name: Set(payload.first_name),
        last_name: Set(payload.last_name),
        address: Set(payload.address),
        city: Set(payload.city),
        postcode: Set(payload.postcode),
        amount: Set(quote.total),
        status: Set(OrderStatus::Processing.as_str().into()),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&txn)
    .await?;

    let mut items: Vec<OrderItemModel> = Vec::with_capacity(payload.items.len());
    for input in payload.items {
        let item = OrderItemActive {
            id: Set(Uuid::new_v4()),
            order_id: Set(order.id),
            name: Set(input.name),
            quantity: Set(input.quantity),
            price: Set(input.price),
            image: Set(input.image),
            created_at: NotSet,
        }
        .insert(&txn)
        .await?;
        items.push(item);
    }

    txn.commit().await?;

    let order = order_from_entity(order, items)?;

    if let Err(err) = log_audit(
        &state.pool,
        None,
        "order_create",
        Some("orders"),
        Some(serde_json::json!({ "orderId": order.reference, "amount": order.amount })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    state.mailer.enqueue(templates::order_confirmation(&order));

    Ok(ApiResponse::success(
        "Order created",
        CreateOrderResponse {
            reference,
            order,
        },
        Some(Meta::empty()),
    ))
}

/// Customer-facing tracking lookup by exact reference.
pub async fn get_order(state: &AppState, reference: &str) -> AppResult<ApiResponse<Order>> {
    let order = Orders::find()
        .filter(OrderCol::Reference.eq(reference))
        .one(&state.orm)
        .await?;
    let order = match order {
        Some(o) => o,
        None => return Err(AppError::NotFound),
    };

    let items = OrderItems::find()
        .filter(OrderItemCol::OrderId.eq(order.id))
        .all(&state.orm)
        .await?;

    Ok(ApiResponse::success(
        "OK",
        order_from_entity(order, items)?,
        Some(Meta::empty()),
    ))
}

/// Admin listing, newest first by default.
pub async fn list_orders(
    state: &AppState,
    _admin: &AuthAdmin,
    query: OrderListQuery,
) -> AppResult<ApiResponse<OrderList>> {
    let (page, limit, offset) = query.pagination.normalize();
    let mut condition = Condition::all();
    if let Some(status) = query.status.as_ref().filter(|s| !s.is_empty()) {
        condition = condition.add(OrderCol::Status.eq(status.clone()));
    }

    let sort_order = query.sort_order.unwrap_or(SortOrder::Desc);

    let mut finder = Orders::find().filter(condition);
    finder = match sort_order {
        SortOrder::Asc => finder.order_by_asc(OrderCol::CreatedAt),
        SortOrder::Desc => finder.order_by_desc(OrderCol::CreatedAt),
    };

    let total = finder.clone().count(&state.orm).await? as i64;

    let orders = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?;

    let items = load_items_for(state, &orders).await?;
    let orders = orders
        .into_iter()
        .map(|order| {
            let own: Vec<OrderItemModel> = items
                .iter()
                .filter(|i| i.order_id == order.id)
                .cloned()
                .collect();
            order_from_entity(order, own)
        })
        .collect::<AppResult<Vec<_>>>()?;

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success(
        "Orders",
        OrderList { items: orders },
        Some(meta),
    ))
}

/// Admin order detail by reference.
pub async fn get_order_admin(
    state: &AppState,
    _admin: &AuthAdmin,
    reference: &str,
) -> AppResult<ApiResponse<Order>> {
    get_order(state, reference).await
}

/// Overwrite an order's status. The status *value* is checked by the enum
/// at the boundary; the transition edge is not: delivered may be followed
/// by pending, and concurrent updates resolve last-write-wins.
pub async fn update_status(
    state: &AppState,
    admin: &AuthAdmin,
    reference: &str,
    payload: UpdateOrderStatusRequest,
) -> AppResult<ApiResponse<Order>> {
    let existing = Orders::find()
        .filter(OrderCol::Reference.eq(reference))
        .one(&state.orm)
        .await?;
    let existing = match existing {
        Some(o) => o,
        None => return Err(AppError::NotFound),
    };

    let mut active: OrderActive = existing.into();
    active.status = Set(payload.status.as_str().into());
    active.updated_at = Set(Utc::now().into());
    let order = active.update(&state.orm).await?;

    let items = OrderItems::find()
        .filter(OrderItemCol::OrderId.eq(order.id))
        .all(&state.orm)
        .await?;
    let order = order_from_entity(order, items)?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(admin.admin_id),
        "order_status_update",
        Some("orders"),
        Some(serde_json::json!({ "orderId": order.reference, "status": order.status })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    state
        .mailer
        .enqueue(templates::order_status_update(&order, payload.status));

    Ok(ApiResponse::success(
        "Order updated",
        order,
        Some(Meta::empty()),
    ))
}

async fn load_items_for(
    state: &AppState,
    orders: &[OrderModel],
) -> AppResult<Vec<OrderItemModel>> {
    if orders.is_empty() {
        return Ok(Vec::new());
    }
    let ids: Vec<Uuid> = orders.iter().map(|o| o.id).collect();
    let items = OrderItems::find()
        .filter(OrderItemCol::OrderId.is_in(ids))
        .all(&state.orm)
        .await?;
    Ok(items)
}

fn require(field: &str, value: &str) -> AppResult<()> {
    if value.trim().is_empty() {
        return Err(AppError::BadRequest(format!("{field} is required")));
    }
    Ok(())
}

pub(crate) fn order_from_entity(
    model: OrderModel,
    items: Vec<OrderItemModel>,
) -> AppResult<Order> {
    let status: OrderStatus = model
        .status
        .parse()
        .map_err(|e: String| AppError::Internal(anyhow::anyhow!(e)))?;
    Ok(Order {
        id: model.id,
        reference: model.reference,
        email: model.email,
        first_name: model.first_name,
        last_name: model.last_name,
        address: model.address,
        city: model.city,
        postcode: model.postcode,
        amount: model.amount,
        status,
        items: items.into_iter().map(order_item_from_entity).collect(),
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    })
}

fn order_item_from_entity(model: OrderItemModel) -> OrderItem {
    OrderItem {
        name: model.name,
        quantity: model.quantity,
        price: model.price,
        image: model.image,
    }
}

/// `ORD-` + last six digits of the unix-millis clock + four random digits.
/// Not globally unique by construction; the unique index on the column
/// backs the improbable collision.
fn generate_reference() -> String {
    let millis = Utc::now().timestamp_millis().to_string();
    let ts = &millis[millis.len().saturating_sub(6)..];
    let rand: u32 = rand::rng().random_range(1000..10000);
    format!("ORD-{ts}-{rand}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_shape() {
        let reference = generate_reference();
        let parts: Vec<&str> = reference.split('-').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "ORD");
        assert_eq!(parts[1].len(), 6);
        assert!(parts[1].chars().all(|c| c.is_ascii_digit()));
        assert_eq!(parts[2].len(), 4);
        assert!(parts[2].chars().all(|c| c.is_ascii_digit()));
    }
}
