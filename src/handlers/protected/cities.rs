// handlers/protected/cities.rs - /api/cities

use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    http::{HeaderName, HeaderValue},
};
use serde::Deserialize;
use tracing::info;

use crate::api::{CityDto, CityResponseDto, CityWithoutPointsOfInterestDto};
use crate::error::ApiError;
use crate::filter::{CityQueryParams, PaginationMetadata, PAGINATION_HEADER};
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CityDetailParams {
    #[serde(default)]
    pub include_points_of_interest: bool,
}

fn pagination_header(metadata: &PaginationMetadata) -> Result<(HeaderName, HeaderValue), ApiError> {
    let json = serde_json::to_string(metadata).map_err(|e| {
        tracing::error!("Failed to serialize pagination metadata: {}", e);
        ApiError::internal_server_error("Failed to format response")
    })?;
    let value = HeaderValue::from_str(&json)
        .map_err(|_| ApiError::internal_server_error("Failed to format response"))?;
    Ok((HeaderName::from_static(PAGINATION_HEADER), value))
}

/// GET /api/cities - Filtered, paged list of cities without their points of interest
///
/// Query: `name`, `searchQuery`, `pageNumber` (default 1), `pageSize` (default 10, at most 20).
/// Paging metadata travels in the `X-Pagination` header.
pub async fn list(
    State(state): State<AppState>,
    params: Result<Query<CityQueryParams>, QueryRejection>,
) -> ApiResult<Vec<CityWithoutPointsOfInterestDto>> {
    let Query(params) = params?;
    let query = params.into_query(&state.config.query)?;
    let repository = state.repository();

    let (cities, metadata) = repository.get_cities_page(&query).await?;
    let (name, value) = pagination_header(&metadata)?;

    let data = cities.iter().map(CityWithoutPointsOfInterestDto::from).collect();
    Ok(ApiResponse::success(data).with_header(name, value))
}

/// GET /api/cities/:cityId - One city, optionally with its points of interest
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    query: Result<Query<CityDetailParams>, QueryRejection>,
) -> ApiResult<CityResponseDto> {
    let Query(query) = query?;
    let repository = state.repository();

    let Some(city) = repository.get_city(id, query.include_points_of_interest).await? else {
        info!("City with id {} wasn't found.", id);
        return Err(ApiError::not_found(format!("City {} not found", id)));
    };

    let data = if query.include_points_of_interest {
        CityResponseDto::WithPointsOfInterest(CityDto::from(&city))
    } else {
        CityResponseDto::WithoutPointsOfInterest(CityWithoutPointsOfInterestDto::from(&city))
    };
    Ok(ApiResponse::success(data))
}
