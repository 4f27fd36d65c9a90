use argon2::{
    Argon2, PasswordHasher,
    password_hash::{PasswordHash, PasswordVerifier, SaltString},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use password_hash::rand_core::OsRng;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, Set};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::auth::{Claims, LoginRequest, LoginResponse, RegisterRequest},
    entity::admins::{ActiveModel as AdminActive, Column as AdminCol, Entity as Admins},
    error::{AppError, AppResult},
    models::Admin,
    response::{ApiResponse, Meta},
    state::AppState,
};

const TOKEN_TTL_DAYS: i64 = 7;

/// Bootstrap registration: allowed only while no admin account exists.
pub async fn register_admin(
    state: &AppState,
    payload: RegisterRequest,
) -> AppResult<ApiResponse<LoginResponse>> {
    let RegisterRequest { email, password } = payload;
    if email.trim().is_empty() || password.trim().is_empty() {
        return Err(AppError::BadRequest("Email and password are required".into()));
    }

    let admin_count = Admins::find().count(&state.orm).await?;
    if admin_count > 0 {
        return Err(AppError::Forbidden);
    }

    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?
        .to_string();

    let admin = AdminActive {
        id: Set(Uuid::new_v4()),
        email: Set(email.trim().to_lowercase()),
        password_hash: Set(password_hash),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    let admin = Admin {
        id: admin.id,
        email: admin.email,
        created_at: admin.created_at.with_timezone(&Utc),
    };
    let token = issue_token(&admin)?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(admin.id),
        "admin_register",
        Some("admins"),
        Some(serde_json::json!({ "adminId": admin.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Admin registered",
        LoginResponse { token, admin },
        Some(Meta::empty()),
    ))
}

pub async fn login_admin(
    state: &AppState,
    payload: LoginRequest,
) -> AppResult<ApiResponse<LoginResponse>> {
    let LoginRequest { email, password } = payload;

    let admin = Admins::find()
        .filter(AdminCol::Email.eq(email.trim().to_lowercase()))
        .one(&state.orm)
        .await?;
    let admin = match admin {
        Some(a) => a,
        None => return Err(AppError::Unauthorized),
    };

    let parsed_hash = PasswordHash::new(&admin.password_hash)
        .map_err(|_| AppError::Internal(anyhow::anyhow!("Invalid password hash")))?;

    let argon2 = Argon2::default();
    if argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_err()
    {
        return Err(AppError::Unauthorized);
    }

    let admin = Admin {
        id: admin.id,
        email: admin.email,
        created_at: admin.created_at.with_timezone(&Utc),
    };
    let token = issue_token(&admin)?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(admin.id),
        "admin_login",
        Some("admins"),
        Some(serde_json::json!({ "adminId": admin.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Logged in",
        LoginResponse { token, admin },
        Some(Meta::empty()),
    ))
}

fn issue_token(admin: &Admin) -> AppResult<String> {
    let secret = std::env::var("JWT_SECRET")
        .map_err(|_| AppError::Internal(anyhow::anyhow!("JWT_SECRET is not set")))?;

    let expiration = Utc::now()
        .checked_add_signed(Duration::days(TOKEN_TTL_DAYS))
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to set expiration")))?;

    let claims = Claims {
        sub: admin.id.to_string(),
        email: admin.email.clone(),
        exp: expiration.timestamp() as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?;

    Ok(token)
}
