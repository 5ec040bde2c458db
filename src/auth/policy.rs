use super::Claims;
use crate::database::models::City;

/// The authenticated caller, as handed to handlers by the JWT middleware.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub subject: String,
    pub given_name: String,
    pub family_name: String,
    pub city: Option<String>,
}

impl From<Claims> for Principal {
    fn from(claims: Claims) -> Self {
        let city = Some(claims.city).filter(|c| !c.is_empty());
        Self {
            subject: claims.sub,
            given_name: claims.given_name,
            family_name: claims.family_name,
            city,
        }
    }
}

/// Decides whether a principal may act on a city's points of interest.
pub trait AuthorizationChecker: Send + Sync {
    fn is_authorized(&self, principal: &Principal, city: &City) -> bool;
}

/// Grants access when the principal's `city` claim equals the city name.
#[derive(Debug, Clone, Copy, Default)]
pub struct CityClaimPolicy;

impl AuthorizationChecker for CityClaimPolicy {
    fn is_authorized(&self, principal: &Principal, city: &City) -> bool {
        principal.city.as_deref() == Some(city.name.as_str())
    }
}
