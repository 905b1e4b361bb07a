// src/contact/handlers.rs
//! Contact form handlers - public submission plus admin inbox management

use axum::{
    extract::{Extension, Json, Path},
    http::StatusCode,
};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info, warn};

use super::models::{ContactFormRequest, ContactFormResponse, ContactMessage};
use super::validators::ContactFormValidator;
use crate::auth::AdminUser;
use crate::common::{generate_message_id, safe_email_log, ApiError, AppState, Validator};

/// POST /api/public/contact - Submit contact form (public endpoint)
pub async fn submit_contact_form(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    Json(request): Json<ContactFormRequest>,
) -> Result<Json<ContactFormResponse>, ApiError> {
    let state = state_lock.read().await.clone();

    let validation_result = ContactFormValidator.validate(&request);
    if !validation_result.is_valid {
        warn!(errors = ?validation_result.errors, "Contact form validation failed");
        return Err(ApiError::from(validation_result));
    }

    let message_id = generate_message_id();

    sqlx::query(
        r#"
        INSERT INTO contact_messages (id, name, email, subject, message, read, created_at)
        VALUES (?, ?, ?, ?, ?, 0, datetime('now'))
        "#,
    )
    .bind(&message_id)
    .bind(request.name.trim())
    .bind(request.email.trim())
    .bind(request.subject.trim())
    .bind(&request.message)
    .execute(&state.db)
    .await
    .map_err(|e| {
        error!(error = %e, "Database error storing contact message");
        ApiError::DatabaseError(e)
    })?;

    info!(
        message_id = %message_id,
        from_email = %safe_email_log(&request.email),
        subject = %request.subject,
        "Contact message stored"
    );

    Ok(Json(ContactFormResponse {
        success: true,
        message: "Thank you for your message! I'll get back to you soon.".to_string(),
    }))
}

/// GET /api/admin/contact - List contact messages, newest first
pub async fn list_messages(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    _admin: AdminUser,
) -> Result<Json<Vec<ContactMessage>>, ApiError> {
    let state = state_lock.read().await.clone();

    let messages = sqlx::query_as::<_, ContactMessage>(
        "SELECT * FROM contact_messages ORDER BY created_at DESC",
    )
    .fetch_all(&state.db)
    .await
    .map_err(ApiError::DatabaseError)?;

    Ok(Json(messages))
}

/// PUT /api/admin/contact/:id/read - Mark a message as read
pub async fn mark_read(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    admin: AdminUser,
    Path(message_id): Path<String>,
) -> Result<Json<ContactMessage>, ApiError> {
    let state = state_lock.read().await.clone();

    let result = sqlx::query("UPDATE contact_messages SET read = 1 WHERE id = ?")
        .bind(&message_id)
        .execute(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?;

    if result.rows_affected() == 0 {
        return Err(ApiError::NotFound("message not found".to_string()));
    }

    let message = sqlx::query_as::<_, ContactMessage>(
        "SELECT * FROM contact_messages WHERE id = ?",
    )
    .bind(&message_id)
    .fetch_one(&state.db)
    .await
    .map_err(ApiError::DatabaseError)?;

    info!(admin_id = %admin.0.id, message_id = %message_id, "Contact message marked read");

    Ok(Json(message))
}

/// DELETE /api/admin/contact/:id - Delete a message
pub async fn delete_message(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    admin: AdminUser,
    Path(message_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let state = state_lock.read().await.clone();

    let result = sqlx::query("DELETE FROM contact_messages WHERE id = ?")
        .bind(&message_id)
        .execute(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?;

    if result.rows_affected() == 0 {
        return Err(ApiError::NotFound("message not found".to_string()));
    }

    info!(admin_id = %admin.0.id, message_id = %message_id, "Contact message deleted");

    Ok(StatusCode::NO_CONTENT)
}
