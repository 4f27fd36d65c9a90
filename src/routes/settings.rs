use axum::{
    Json, Router,
    extract::State,
    routing::{delete, get, post},
};

use crate::{
    dto::settings::{SaveBankDetailsRequest, SaveContactDetailsRequest},
    error::AppResult,
    middleware::auth::AuthAdmin,
    models::{BankDetails, ContactDetails},
    response::ApiResponse,
    services::settings_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/bank", get(get_bank_details))
        .route("/bank", post(save_bank_details))
        .route("/bank", delete(delete_bank_details))
        .route("/contact", get(get_contact_details))
        .route("/contact", post(save_contact_details))
        .route("/contact", delete(delete_contact_details))
}

#[utoipa::path(
    get,
    path = "/api/admin/bank",
    responses(
        (status = 200, description = "Current bank details, null if unset", body = ApiResponse<Option<BankDetails>>),
        (status = 401, description = "Unauthorized"),
    ),
    security(("bearer_auth" = [])),
    tag = "Settings"
)]
pub async fn get_bank_details(
    State(state): State<AppState>,
    admin: AuthAdmin,
) -> AppResult<Json<ApiResponse<Option<BankDetails>>>> {
    let resp = settings_service::get_bank_details(&state, &admin).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/admin/bank",
    request_body = SaveBankDetailsRequest,
    responses(
        (status = 200, description = "Saved bank details", body = ApiResponse<BankDetails>),
        (status = 400, description = "Missing required field"),
    ),
    security(("bearer_auth" = [])),
    tag = "Settings"
)]
pub async fn save_bank_details(
    State(state): State<AppState>,
    admin: AuthAdmin,
    Json(payload): Json<SaveBankDetailsRequest>,
) -> AppResult<Json<ApiResponse<BankDetails>>> {
    let resp = settings_service::save_bank_details(&state, &admin, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/admin/bank",
    responses(
        (status = 200, description = "Bank details removed"),
        (status = 401, description = "Unauthorized"),
    ),
    security(("bearer_auth" = [])),
    tag = "Settings"
)]
pub async fn delete_bank_details(
    State(state): State<AppState>,
    admin: AuthAdmin,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = settings_service::delete_bank_details(&state, &admin).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/contact",
    responses(
        (status = 200, description = "Current contact details, null if unset", body = ApiResponse<Option<ContactDetails>>),
        (status = 401, description = "Unauthorized"),
    ),
    security(("bearer_auth" = [])),
    tag = "Settings"
)]
pub async fn get_contact_details(
    State(state): State<AppState>,
    admin: AuthAdmin,
) -> AppResult<Json<ApiResponse<Option<ContactDetails>>>> {
    let resp = settings_service::get_contact_details(&state, &admin).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/admin/contact",
    request_body = SaveContactDetailsRequest,
    responses(
        (status = 200, description = "Saved contact details", body = ApiResponse<ContactDetails>),
        (status = 400, description = "Missing required field"),
    ),
    security(("bearer_auth" = [])),
    tag = "Settings"
)]
pub async fn save_contact_details(
    State(state): State<AppState>,
    admin: AuthAdmin,
    Json(payload): Json<SaveContactDetailsRequest>,
) -> AppResult<Json<ApiResponse<ContactDetails>>> {
    let resp = settings_service::save_contact_details(&state, &admin, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/admin/contact",
    responses(
        (status = 200, description = "Contact details removed"),
        (status = 401, description = "Unauthorized"),
    ),
    security(("bearer_auth" = [])),
    tag = "Settings"
)]
pub async fn delete_contact_details(
    State(state): State<AppState>,
    admin: AuthAdmin,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = settings_service::delete_contact_details(&state, &admin).await?;
    Ok(Json(resp))
}
