use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::handlers::{protected, public};
use crate::middleware::jwt_auth_middleware;
use crate::state::AppState;

/// Build the full application router.
pub fn app(state: AppState) -> Router {
    let protected_routes = Router::new()
        .merge(city_routes())
        .merge(point_of_interest_routes())
        .route_layer(middleware::from_fn_with_state(state.clone(), jwt_auth_middleware));

    let mut router = Router::new()
        // Public
        .route("/", get(public::status::root))
        .route("/health", get(public::status::health))
        .merge(authentication_routes())
        // Protected API
        .merge(protected_routes);

    if state.config.security.enable_cors {
        router = router.layer(CorsLayer::permissive());
    }
    if state.config.api.enable_request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }

    router.with_state(state)
}

fn authentication_routes() -> Router<AppState> {
    use public::authentication;

    Router::new().route("/api/authentication/authenticate", post(authentication::authenticate))
}

fn city_routes() -> Router<AppState> {
    use protected::cities;

    Router::new()
        .route("/api/cities", get(cities::list))
        // Shares the `:city_id` segment name with the point-of-interest routes.
        .route("/api/cities/:city_id", get(cities::get))
}

fn point_of_interest_routes() -> Router<AppState> {
    use protected::points_of_interest as poi;

    Router::new()
        .route(
            "/api/cities/:city_id/pointsofinterest",
            get(poi::list).post(poi::create),
        )
        .route(
            "/api/cities/:city_id/pointsofinterest/:id",
            get(poi::get)
                .put(poi::update)
                .patch(poi::partially_update)
                .delete(poi::delete),
        )
}
