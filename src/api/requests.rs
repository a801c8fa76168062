//! Request lifecycle endpoints.
//!
//! A request moves `pending -> accepted` or `pending -> rejected` and is
//! terminal after that. Accepting a request also claims its donation; both
//! writes happen in one transaction so a partial failure cannot leave the
//! two records out of sync.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use crate::db::{
    CreateFoodRequestRequest, Donation, DonationStatus, FoodRequest, RequestStatus,
    RespondToRequestRequest, User,
};
use crate::AppState;

use super::auth::AuthUser;
use super::error::ApiError;
use super::validation::validate_required;

/// Create a claim request against an available donation
///
/// POST /api/requests
pub async fn create_request(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Json(req): Json<CreateFoodRequestRequest>,
) -> Result<(StatusCode, Json<FoodRequest>), ApiError> {
    let user: Option<User> = sqlx::query_as("SELECT * FROM users WHERE id = ?")
        .bind(&auth.user_id)
        .fetch_optional(&state.db)
        .await?;
    let user = user.ok_or_else(|| ApiError::not_found("User not found"))?;

    if !user.is_recipient() {
        return Err(ApiError::forbidden("Only recipients can request food"));
    }

    validate_required(&req.reason, "Reason").map_err(ApiError::validation)?;

    let donation: Option<Donation> = sqlx::query_as("SELECT * FROM donations WHERE id = ?")
        .bind(&req.donation_id)
        .fetch_optional(&state.db)
        .await?;
    let donation = donation.ok_or_else(|| ApiError::not_found("Donation not found"))?;

    if donation.status_enum() != Ok(DonationStatus::Available) {
        return Err(ApiError::validation("This donation is no longer available"));
    }

    let id = Uuid::new_v4().to_string();
    let now = Utc::now().to_rfc3339();

    // donation title and recipient contact details are snapshotted here and
    // never refreshed if the source records change later
    sqlx::query(
        r#"
        INSERT INTO requests
            (id, donation_id, donation_title, recipient_id, recipient_name,
             recipient_email, recipient_phone, reason, status, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(&donation.id)
    .bind(&donation.title)
    .bind(&user.id)
    .bind(&user.name)
    .bind(&user.email)
    .bind(&user.phone)
    .bind(&req.reason)
    .bind(RequestStatus::Pending.to_string())
    .bind(&now)
    .execute(&state.db)
    .await?;

    let request: FoodRequest = sqlx::query_as("SELECT * FROM requests WHERE id = ?")
        .bind(&id)
        .fetch_one(&state.db)
        .await?;

    tracing::info!(request = %request.id, donation = %donation.id, "Food request created");

    Ok((StatusCode::CREATED, Json(request)))
}

/// List the requests relevant to the caller, newest first
///
/// GET /api/my-requests
///
/// Donors see every request made against their donations; recipients see
/// the requests they created. The donor view is a two-step join: fetch the
/// donor's donation ids, then filter requests against that set.
pub async fn list_my_requests(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> Result<Json<Vec<FoodRequest>>, ApiError> {
    let user: Option<User> = sqlx::query_as("SELECT * FROM users WHERE id = ?")
        .bind(&auth.user_id)
        .fetch_optional(&state.db)
        .await?;
    let user = user.ok_or_else(|| ApiError::not_found("User not found"))?;

    let requests = if user.is_donor() {
        let donation_ids: Vec<(String,)> =
            sqlx::query_as("SELECT id FROM donations WHERE donor_id = ?")
                .bind(&user.id)
                .fetch_all(&state.db)
                .await?;

        if donation_ids.is_empty() {
            Vec::new()
        } else {
            let placeholders = vec!["?"; donation_ids.len()].join(", ");
            let sql = format!(
                "SELECT * FROM requests WHERE donation_id IN ({}) ORDER BY created_at DESC",
                placeholders
            );
            let mut query = sqlx::query_as::<_, FoodRequest>(&sql);
            for (id,) in &donation_ids {
                query = query.bind(id);
            }
            query.fetch_all(&state.db).await?
        }
    } else {
        sqlx::query_as::<_, FoodRequest>(
            "SELECT * FROM requests WHERE recipient_id = ? ORDER BY created_at DESC",
        )
        .bind(&user.id)
        .fetch_all(&state.db)
        .await?
    };

    Ok(Json(requests))
}

/// Accept or reject a request
///
/// PATCH /api/requests/:id
///
/// Only the donor owning the referenced donation may respond. A request
/// that has already left `pending` cannot be answered again. Accepting
/// claims the donation in the same transaction.
pub async fn respond_to_request(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(id): Path<String>,
    Json(req): Json<RespondToRequestRequest>,
) -> Result<Json<FoodRequest>, ApiError> {
    let status: RequestStatus = req.status.parse().map_err(ApiError::validation)?;
    if status == RequestStatus::Pending {
        return Err(ApiError::validation("Status must be accepted or rejected"));
    }

    let request: Option<FoodRequest> = sqlx::query_as("SELECT * FROM requests WHERE id = ?")
        .bind(&id)
        .fetch_optional(&state.db)
        .await?;
    let request = request.ok_or_else(|| ApiError::not_found("Request not found"))?;

    let donation: Option<Donation> = sqlx::query_as("SELECT * FROM donations WHERE id = ?")
        .bind(&request.donation_id)
        .fetch_optional(&state.db)
        .await?;
    let owns_donation = donation
        .as_ref()
        .map(|d| d.donor_id == auth.user_id)
        .unwrap_or(false);
    if !owns_donation {
        return Err(ApiError::forbidden("Not authorized to update this request"));
    }

    // Both writes commit or neither does. The pending guard lives in the
    // UPDATE itself so a concurrent respond that lands first makes this one
    // affect zero rows instead of overwriting a terminal state.
    let mut tx = state.db.begin().await?;

    let result = sqlx::query(
        "UPDATE requests SET status = ?, donor_response = COALESCE(?, donor_response) \
         WHERE id = ? AND status = ?",
    )
    .bind(status.to_string())
    .bind(&req.donor_response)
    .bind(&id)
    .bind(RequestStatus::Pending.to_string())
    .execute(&mut *tx)
    .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::validation("Request has already been answered"));
    }

    if status == RequestStatus::Accepted {
        sqlx::query("UPDATE donations SET status = ? WHERE id = ?")
            .bind(DonationStatus::Claimed.to_string())
            .bind(&request.donation_id)
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;

    let updated: FoodRequest = sqlx::query_as("SELECT * FROM requests WHERE id = ?")
        .bind(&id)
        .fetch_one(&state.db)
        .await?;

    tracing::info!(request = %id, status = %status, "Request answered");

    Ok(Json(updated))
}
