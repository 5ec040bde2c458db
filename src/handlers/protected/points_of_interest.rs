// handlers/protected/points_of_interest.rs - /api/cities/:cityId/pointsofinterest
//
// Every handler resolves the city first (404), then checks the caller's city
// claim (403), and only then touches points of interest.

use axum::{
    extract::{Path, State},
    http::{header::LOCATION, HeaderValue},
    Extension, Json,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::info;

use super::authorize_city;
use crate::api::{PointOfInterestDto, PointOfInterestForCreationDto, PointOfInterestForUpdateDto};
use crate::auth::Principal;
use crate::database::models::PointOfInterest;
use crate::database::CityInfoRepository;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::patch::{apply_patch, parse_document};
use crate::state::AppState;
use crate::validation::validate_model;

fn parse_body<T: DeserializeOwned>(payload: Value) -> Result<T, ApiError> {
    serde_json::from_value(payload).map_err(|e| ApiError::invalid_json(e.to_string()))
}

async fn find_point(
    repository: &CityInfoRepository,
    city_id: i64,
    point_id: i64,
) -> Result<PointOfInterest, ApiError> {
    match repository.get_point_of_interest(city_id, point_id).await? {
        Some(point) => Ok(point),
        None => {
            info!("Point of interest {} wasn't found in city {}.", point_id, city_id);
            Err(ApiError::not_found(format!(
                "Point of interest {} not found in city {}",
                point_id, city_id
            )))
        }
    }
}

async fn save(repository: &mut CityInfoRepository) -> Result<(), ApiError> {
    if repository.commit().await {
        Ok(())
    } else {
        Err(ApiError::internal_server_error(
            "A problem happened while handling your request.",
        ))
    }
}

/// GET /api/cities/:cityId/pointsofinterest - All points of interest of a city
pub async fn list(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(city_id): Path<i64>,
) -> ApiResult<Vec<PointOfInterestDto>> {
    let repository = state.repository();
    authorize_city(&state, &repository, &principal, city_id).await?;

    let points = repository.get_points_of_interest(city_id).await?;
    Ok(ApiResponse::success(points.iter().map(PointOfInterestDto::from).collect()))
}

/// GET /api/cities/:cityId/pointsofinterest/:id - One point of interest
pub async fn get(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path((city_id, point_id)): Path<(i64, i64)>,
) -> ApiResult<PointOfInterestDto> {
    let repository = state.repository();
    authorize_city(&state, &repository, &principal, city_id).await?;

    let point = find_point(&repository, city_id, point_id).await?;
    Ok(ApiResponse::success(PointOfInterestDto::from(&point)))
}

/// POST /api/cities/:cityId/pointsofinterest - Create a point of interest
///
/// Answers 201 with the stored point and a `Location` header pointing at it.
pub async fn create(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(city_id): Path<i64>,
    Json(payload): Json<Value>,
) -> ApiResult<PointOfInterestDto> {
    let mut repository = state.repository();
    authorize_city(&state, &repository, &principal, city_id).await?;

    let body: PointOfInterestForCreationDto = parse_body(payload)?;
    validate_model(&body)?;

    let Some(pending) = repository.add_point_of_interest(city_id, body.into_new_point()).await? else {
        return Err(ApiError::not_found(format!("City {} not found", city_id)));
    };
    save(&mut repository).await?;

    let Some(id) = repository.assigned_id(pending) else {
        tracing::error!("Commit succeeded but no id was assigned to the new point of interest");
        return Err(ApiError::internal_server_error(
            "A problem happened while handling your request.",
        ));
    };
    let created = find_point(&repository, city_id, id).await?;

    let location = format!("/api/cities/{}/pointsofinterest/{}", city_id, id);
    let location = HeaderValue::from_str(&location)
        .map_err(|_| ApiError::internal_server_error("Failed to format response"))?;

    Ok(ApiResponse::created(PointOfInterestDto::from(&created)).with_header(LOCATION, location))
}

/// PUT /api/cities/:cityId/pointsofinterest/:id - Replace every field of a point of interest
pub async fn update(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path((city_id, point_id)): Path<(i64, i64)>,
    Json(payload): Json<Value>,
) -> ApiResult<()> {
    let mut repository = state.repository();
    authorize_city(&state, &repository, &principal, city_id).await?;

    let body: PointOfInterestForUpdateDto = parse_body(payload)?;
    validate_model(&body)?;

    let mut point = find_point(&repository, city_id, point_id).await?;
    body.merge_into(&mut point);
    repository.update_point_of_interest(point);
    save(&mut repository).await?;

    Ok(ApiResponse::<()>::no_content())
}

/// PATCH /api/cities/:cityId/pointsofinterest/:id - Apply a JSON Patch document
///
/// ```json
/// [ { "op": "replace", "path": "/name", "value": "Updated name" } ]
/// ```
pub async fn partially_update(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path((city_id, point_id)): Path<(i64, i64)>,
    Json(payload): Json<Value>,
) -> ApiResult<()> {
    let mut repository = state.repository();
    authorize_city(&state, &repository, &principal, city_id).await?;

    let operations = parse_document(payload)?;
    let mut point = find_point(&repository, city_id, point_id).await?;

    let patched = apply_patch(&operations, &PointOfInterestForUpdateDto::from(&point))?;
    patched.merge_into(&mut point);
    repository.update_point_of_interest(point);
    save(&mut repository).await?;

    Ok(ApiResponse::<()>::no_content())
}

/// DELETE /api/cities/:cityId/pointsofinterest/:id - Delete a point of interest and notify by mail
pub async fn delete(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path((city_id, point_id)): Path<(i64, i64)>,
) -> ApiResult<()> {
    let mut repository = state.repository();
    authorize_city(&state, &repository, &principal, city_id).await?;

    let point = find_point(&repository, city_id, point_id).await?;
    repository.delete_point_of_interest(&point);
    save(&mut repository).await?;

    state.mail.send(
        "Point of interest deleted.",
        &format!("Point of interest {} with id {} was deleted.", point.name, point.id),
    );

    Ok(ApiResponse::<()>::no_content())
}
