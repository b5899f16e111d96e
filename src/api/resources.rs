//! Resource (catalog) endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::resource::{CreateResource, Resource, ResourceStatus},
};

use super::ApiJson;

/// Fill response with the number of seeded resources
#[derive(Serialize, ToSchema)]
pub struct FillResponse {
    /// Status message
    pub message: String,
    /// Number of resources added
    pub added: usize,
}

/// List all resources
#[utoipa::path(
    get,
    path = "/resources",
    tag = "resources",
    responses(
        (status = 200, description = "List of resources", body = Vec<Resource>)
    )
)]
pub async fn list_resources(
    State(state): State<crate::AppState>,
) -> AppResult<Json<Vec<Resource>>> {
    let resources = state.services.catalog.list_resources().await?;
    Ok(Json(resources))
}

/// Get resource details by ID
#[utoipa::path(
    get,
    path = "/resources/{id}",
    tag = "resources",
    params(
        ("id" = i64, Path, description = "Resource ID")
    ),
    responses(
        (status = 200, description = "Resource details", body = Resource),
        (status = 404, description = "Resource not found")
    )
)]
pub async fn get_resource(
    State(state): State<crate::AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Resource>> {
    let resource = state.services.catalog.get_resource(id).await?;
    Ok(Json(resource))
}

/// Create a new resource
#[utoipa::path(
    post,
    path = "/resources",
    tag = "resources",
    request_body = CreateResource,
    responses(
        (status = 201, description = "Resource created", body = Resource),
        (status = 400, description = "Invalid input")
    )
)]
pub async fn create_resource(
    State(state): State<crate::AppState>,
    ApiJson(input): ApiJson<CreateResource>,
) -> AppResult<(StatusCode, Json<Resource>)> {
    input
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let created = state.services.catalog.create_resource(input).await?;

    Ok((StatusCode::CREATED, Json(created)))
}

/// Mark a resource as available
#[utoipa::path(
    put,
    path = "/resources/{id}/enable",
    tag = "resources",
    params(
        ("id" = i64, Path, description = "Resource ID")
    ),
    responses(
        (status = 200, description = "Resource enabled", body = Resource),
        (status = 404, description = "Resource not found")
    )
)]
pub async fn enable_resource(
    State(state): State<crate::AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Resource>> {
    let resource = state
        .services
        .catalog
        .set_resource_status(id, ResourceStatus::Available)
        .await?;
    Ok(Json(resource))
}

/// Mark a resource as disabled
#[utoipa::path(
    put,
    path = "/resources/{id}/disable",
    tag = "resources",
    params(
        ("id" = i64, Path, description = "Resource ID")
    ),
    responses(
        (status = 200, description = "Resource disabled", body = Resource),
        (status = 404, description = "Resource not found")
    )
)]
pub async fn disable_resource(
    State(state): State<crate::AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Resource>> {
    let resource = state
        .services
        .catalog
        .set_resource_status(id, ResourceStatus::Disabled)
        .await?;
    Ok(Json(resource))
}

/// Seed the catalog with demo data
#[utoipa::path(
    get,
    path = "/resources/fill",
    tag = "resources",
    responses(
        (status = 200, description = "Demo data inserted", body = FillResponse)
    )
)]
pub async fn fill_resources(State(state): State<crate::AppState>) -> AppResult<Json<FillResponse>> {
    let added = state.services.catalog.seed_demo_resources().await?;

    Ok(Json(FillResponse {
        message: "Demo data inserted".to_string(),
        added,
    }))
}
