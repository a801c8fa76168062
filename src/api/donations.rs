//! Donation lifecycle endpoints.
//!
//! A donation moves `available -> claimed -> completed`, driven by its
//! owning donor. Status changes and deletion both require ownership; a
//! mismatch is reported as 404 rather than 403 so callers cannot probe
//! which ids exist.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use crate::db::{
    CreateDonationRequest, Donation, DonationStatus, MessageResponse, UpdateDonationRequest, User,
};
use crate::AppState;

use super::auth::AuthUser;
use super::error::ApiError;
use super::validation::validate_required;

fn validate_create_request(req: &CreateDonationRequest) -> Result<(), ApiError> {
    validate_required(&req.title, "Title").map_err(ApiError::validation)?;
    validate_required(&req.description, "Description").map_err(ApiError::validation)?;
    validate_required(&req.food_type, "Food type").map_err(ApiError::validation)?;
    validate_required(&req.quantity, "Quantity").map_err(ApiError::validation)?;
    validate_required(&req.expiry_date, "Expiry date").map_err(ApiError::validation)?;
    validate_required(&req.location, "Location").map_err(ApiError::validation)?;
    validate_required(&req.contact_info, "Contact info").map_err(ApiError::validation)?;
    Ok(())
}

/// Create a donation listing
///
/// POST /api/donations
///
/// Any authenticated user that resolves to a stored account may create a
/// listing; restricting creation to donors is a client-side rule.
pub async fn create_donation(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Json(req): Json<CreateDonationRequest>,
) -> Result<(StatusCode, Json<Donation>), ApiError> {
    let user: Option<User> = sqlx::query_as("SELECT * FROM users WHERE id = ?")
        .bind(&auth.user_id)
        .fetch_optional(&state.db)
        .await?;
    let user = user.ok_or_else(|| ApiError::not_found("User not found"))?;

    validate_create_request(&req)?;

    let id = Uuid::new_v4().to_string();
    let now = Utc::now().to_rfc3339();

    sqlx::query(
        r#"
        INSERT INTO donations
            (id, title, description, food_type, quantity, expiry_date,
             location, contact_info, donor_id, donor_name, status, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(&req.title)
    .bind(&req.description)
    .bind(&req.food_type)
    .bind(&req.quantity)
    .bind(&req.expiry_date)
    .bind(&req.location)
    .bind(&req.contact_info)
    .bind(&user.id)
    .bind(&user.name)
    .bind(DonationStatus::Available.to_string())
    .bind(&now)
    .execute(&state.db)
    .await?;

    let donation: Donation = sqlx::query_as("SELECT * FROM donations WHERE id = ?")
        .bind(&id)
        .fetch_one(&state.db)
        .await?;

    tracing::info!(donation = %donation.id, donor = %user.id, "Donation created");

    Ok((StatusCode::CREATED, Json(donation)))
}

/// List all available donations, newest first
///
/// GET /api/donations
///
/// Public. Degrades to an empty list on storage errors so the browse page
/// never hard-fails on a transient outage.
pub async fn list_available_donations(State(state): State<Arc<AppState>>) -> Json<Vec<Donation>> {
    let result = sqlx::query_as::<_, Donation>(
        "SELECT * FROM donations WHERE status = 'available' ORDER BY created_at DESC",
    )
    .fetch_all(&state.db)
    .await;

    match result {
        Ok(donations) => Json(donations),
        Err(e) => {
            tracing::error!("Error loading donations: {}", e);
            Json(Vec::new())
        }
    }
}

/// List the caller's own donations regardless of status, newest first
///
/// GET /api/my-donations
pub async fn list_my_donations(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> Result<Json<Vec<Donation>>, ApiError> {
    let donations = sqlx::query_as::<_, Donation>(
        "SELECT * FROM donations WHERE donor_id = ? ORDER BY created_at DESC",
    )
    .bind(&auth.user_id)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(donations))
}

/// Update a donation's status
///
/// PATCH /api/donations/:id
///
/// Only the owning donor may change status. The API does not enforce
/// forward-only ordering between the three values.
pub async fn update_donation(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(id): Path<String>,
    Json(req): Json<UpdateDonationRequest>,
) -> Result<Json<Donation>, ApiError> {
    let status: DonationStatus = req.status.parse().map_err(ApiError::validation)?;

    let result = sqlx::query("UPDATE donations SET status = ? WHERE id = ? AND donor_id = ?")
        .bind(status.to_string())
        .bind(&id)
        .bind(&auth.user_id)
        .execute(&state.db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::not_found("Donation not found"));
    }

    let donation: Donation = sqlx::query_as("SELECT * FROM donations WHERE id = ?")
        .bind(&id)
        .fetch_one(&state.db)
        .await?;

    tracing::info!(donation = %id, status = %status, "Donation status updated");

    Ok(Json(donation))
}

/// Delete a donation
///
/// DELETE /api/donations/:id
pub async fn delete_donation(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let result = sqlx::query("DELETE FROM donations WHERE id = ? AND donor_id = ?")
        .bind(&id)
        .bind(&auth.user_id)
        .execute(&state.db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::not_found("Donation not found"));
    }

    tracing::info!(donation = %id, "Donation deleted");

    Ok(Json(MessageResponse {
        message: "Donation deleted successfully".to_string(),
    }))
}
