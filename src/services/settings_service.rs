use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, EntityTrait, QueryOrder, Set};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::settings::{SaveBankDetailsRequest, SaveContactDetailsRequest},
    entity::{
        bank_details::{
            ActiveModel as BankActive, Column as BankCol, Entity as BankRows,
            Model as BankModel,
        },
        contact_details::{
            ActiveModel as ContactActive, Column as ContactCol, Entity as ContactRows,
            Model as ContactModel,
        },
    },
    error::{AppError, AppResult},
    middleware::auth::AuthAdmin,
    models::{BankDetails, ContactDetails},
    response::{ApiResponse, Meta},
    state::AppState,
};

/// Most recently updated bank document, or null when none exists.
pub async fn get_bank_details(
    state: &AppState,
    _admin: &AuthAdmin,
) -> AppResult<ApiResponse<Option<BankDetails>>> {
    let bank = BankRows::find()
        .order_by_desc(BankCol::UpdatedAt)
        .one(&state.orm)
        .await?
        .map(bank_from_entity);
    Ok(ApiResponse::success("Bank details", bank, Some(Meta::empty())))
}

/// Single-document upsert: overwrite the existing row or create the first.
pub async fn save_bank_details(
    state: &AppState,
    admin: &AuthAdmin,
    payload: SaveBankDetailsRequest,
) -> AppResult<ApiResponse<BankDetails>> {
    for (field, value) in [
        ("bankName", &payload.bank_name),
        ("accountHolderName", &payload.account_holder_name),
        ("accountNumber", &payload.account_number),
        ("bankAddress", &payload.bank_address),
    ] {
        if value.trim().is_empty() {
            return Err(AppError::BadRequest(format!("{field} is required")));
        }
    }

    let existing = BankRows::find()
        .order_by_desc(BankCol::UpdatedAt)
        .one(&state.orm)
        .await?;

    let saved = match existing {
        Some(row) => {
            let mut active: BankActive = row.into();
            active.bank_name = Set(payload.bank_name);
            active.account_holder_name = Set(payload.account_holder_name);
            active.account_number = Set(payload.account_number);
            active.bank_address = Set(payload.bank_address);
            if payload.swift_code.is_some() {
                active.swift_code = Set(payload.swift_code);
            }
            if payload.routing_number.is_some() {
                active.routing_number = Set(payload.routing_number);
            }
            active.updated_at = Set(Utc::now().into());
            active.update(&state.orm).await?
        }
        None => {
            BankActive {
                id: Set(Uuid::new_v4()),
                bank_name: Set(payload.bank_name),
                account_holder_name: Set(payload.account_holder_name),
                account_number: Set(payload.account_number),
                bank_address: Set(payload.bank_address),
                swift_code: Set(payload.swift_code),
                routing_number: Set(payload.routing_number),
                created_at: NotSet,
                updated_at: NotSet,
            }
            .insert(&state.orm)
            .await?
        }
    };

    if let Err(err) = log_audit(
        &state.pool,
        Some(admin.admin_id),
        "bank_details_save",
        Some("bank_details"),
        None,
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Bank details saved",
        bank_from_entity(saved),
        Some(Meta::empty()),
    ))
}

pub async fn delete_bank_details(
    state: &AppState,
    admin: &AuthAdmin,
) -> AppResult<ApiResponse<serde_json::Value>> {
    BankRows::delete_many().exec(&state.orm).await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(admin.admin_id),
        "bank_details_delete",
        Some("bank_details"),
        None,
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Bank details deleted",
        serde_json::json!({ "success": true }),
        Some(Meta::empty()),
    ))
}

pub async fn get_contact_details(
    state: &AppState,
    _admin: &AuthAdmin,
) -> AppResult<ApiResponse<Option<ContactDetails>>> {
    let contact = ContactRows::find()
        .order_by_desc(ContactCol::UpdatedAt)
        .one(&state.orm)
        .await?
        .map(contact_from_entity);
    Ok(ApiResponse::success(
        "Contact details",
        contact,
        Some(Meta::empty()),
    ))
}

pub async fn save_contact_details(
    state: &AppState,
    admin: &AuthAdmin,
    payload: SaveContactDetailsRequest,
) -> AppResult<ApiResponse<ContactDetails>> {
    for (field, value) in [
        ("phoneNumber", &payload.phone_number),
        ("email", &payload.email),
        ("address", &payload.address),
    ] {
        if value.trim().is_empty() {
            return Err(AppError::BadRequest(format!("{field} is required")));
        }
    }

    let existing = ContactRows::find()
        .order_by_desc(ContactCol::UpdatedAt)
        .one(&state.orm)
        .await?;

    let saved = match existing {
        Some(row) => {
            let mut active: ContactActive = row.into();
            active.phone_number = Set(payload.phone_number);
            active.email = Set(payload.email);
            active.address = Set(payload.address);
            active.updated_at = Set(Utc::now().into());
            active.update(&state.orm).await?
        }
        None => {
            ContactActive {
                id: Set(Uuid::new_v4()),
                phone_number: Set(payload.phone_number),
                email: Set(payload.email),
                address: Set(payload.address),
                created_at: NotSet,
                updated_at: NotSet,
            }
            .insert(&state.orm)
            .await?
        }
    };

    if let Err(err) = log_audit(
        &state.pool,
        Some(admin.admin_id),
        "contact_details_save",
        Some("contact_details"),
        None,
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Contact details saved",
        contact_from_entity(saved),
        Some(Meta::empty()),
    ))
}

pub async fn delete_contact_details(
    state: &AppState,
    admin: &AuthAdmin,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ContactRows::delete_many().exec(&state.orm).await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(admin.admin_id),
        "contact_details_delete",
        Some("contact_details"),
        None,
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Contact details deleted",
        serde_json::json!({ "success": true }),
        Some(Meta::empty()),
    ))
}

fn bank_from_entity(model: BankModel) -> BankDetails {
    BankDetails {
        id: model.id,
        bank_name: model.bank_name,
        account_holder_name: model.account_holder_name,
        account_number: model.account_number,
        bank_address: model.bank_address,
        swift_code: model.swift_code,
        routing_number: model.routing_number,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    }
}

fn contact_from_entity(model: ContactModel) -> ContactDetails {
    ContactDetails {
        id: model.id,
        phone_number: model.phone_number,
        email: model.email,
        address: model.address,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    }
}
