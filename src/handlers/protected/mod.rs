// handlers/protected/mod.rs - Protected handlers (JWT required)
//
// Every route here sits behind `jwt_auth_middleware`, which injects the
// caller's `Principal` as a request extension.
pub mod cities;
pub mod points_of_interest;

use tracing::{info, warn};

use crate::auth::Principal;
use crate::database::models::City;
use crate::database::CityInfoRepository;
use crate::error::ApiError;
use crate::state::AppState;

/// Resolve the city a point-of-interest request targets.
///
/// A missing city is reported before the authorization decision, so the
/// answer is 404 before it is ever 403.
pub(crate) async fn authorize_city(
    state: &AppState,
    repository: &CityInfoRepository,
    principal: &Principal,
    city_id: i64,
) -> Result<City, ApiError> {
    let city = match repository.city_exists(city_id).await? {
        true => repository.get_city(city_id, false).await?,
        false => None,
    };
    let Some(city) = city else {
        info!("City with id {} wasn't found when accessing points of interest.", city_id);
        return Err(ApiError::not_found(format!("City {} not found", city_id)));
    };

    if !state.authorizer.is_authorized(principal, &city) {
        warn!(
            "Principal {} with city claim {:?} denied access to city {}",
            principal.subject, principal.city, city.name
        );
        return Err(ApiError::forbidden(format!(
            "Not allowed to access points of interest of {}",
            city.name
        )));
    }

    Ok(city)
}
