//! HTTP handlers for the Shipyard server.

use actix_web::error::{BlockingError, InternalError, JsonPayloadError, QueryPayloadError};
use actix_web::{HttpRequest, HttpResponse, Responder, delete, get, post, web};
use log::error;
use serde::{Deserialize, Serialize};
use shipyard_core::{PageRequest, ShipCriteria, ShipDraft, ShipOrder, ShipService, ShipType, ShipyardError};
use utoipa::{IntoParams, OpenApi, ToSchema};

use crate::openapi::ApiDoc;
use crate::registry::SharedRegistry;

#[derive(Clone)]
/// Shared application state for handlers.
pub struct AppState {
    /// Ship operations over the configured registry.
    pub ships: ShipService<SharedRegistry>,
}

impl AppState {
    /// Wrap a registry in handler state.
    pub fn new(registry: SharedRegistry) -> Self {
        Self {
            ships: ShipService::new(registry),
        }
    }
}

/// Error response payload.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message.
    pub message: String,
}

/// Query parameters shared by listing and counting.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ShipSearchParams {
    /// Case-insensitive substring of the name.
    pub name: Option<String>,
    /// Case-insensitive substring of the planet.
    pub planet: Option<String>,
    /// Exact ship type.
    pub ship_type: Option<ShipType>,
    /// Produced strictly after this epoch-millisecond timestamp.
    pub after: Option<i64>,
    /// Produced strictly before this epoch-millisecond timestamp.
    pub before: Option<i64>,
    /// Second-hand flag.
    pub is_used: Option<bool>,
    /// Exclusive lower speed bound.
    pub min_speed: Option<f64>,
    /// Exclusive upper speed bound.
    pub max_speed: Option<f64>,
    /// Exclusive lower crew bound.
    pub min_crew_size: Option<i32>,
    /// Exclusive upper crew bound.
    pub max_crew_size: Option<i32>,
    /// Exclusive lower rating bound.
    pub min_rating: Option<f64>,
    /// Exclusive upper rating bound.
    pub max_rating: Option<f64>,
    /// Sort key, `ID` when omitted.
    pub order: Option<ShipOrder>,
    /// Zero-based page, 0 when omitted.
    pub page_number: Option<i64>,
    /// Page size, 3 when omitted.
    pub page_size: Option<i64>,
}

impl ShipSearchParams {
    /// Filter criteria carried by the query.
    pub fn criteria(&self) -> ShipCriteria {
        ShipCriteria {
            name: self.name.clone(),
            planet: self.planet.clone(),
            ship_type: self.ship_type,
            after: self.after,
            before: self.before,
            used: self.is_used,
            min_speed: self.min_speed,
            max_speed: self.max_speed,
            min_crew_size: self.min_crew_size,
            max_crew_size: self.max_crew_size,
            min_rating: self.min_rating,
            max_rating: self.max_rating,
        }
    }

    /// Ordering and page window carried by the query.
    pub fn page_request(&self) -> PageRequest {
        PageRequest::new(self.order, self.page_number, self.page_size)
    }
}

/// Register every ship route, with `/count` ahead of `/{id}`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::QueryConfig::default().error_handler(query_error))
        .app_data(web::JsonConfig::default().error_handler(json_error))
        .service(list_ships)
        .service(count_ships)
        .service(get_ship)
        .service(create_ship)
        .service(update_ship)
        .service(delete_ship)
        .service(openapi_json);
}

#[utoipa::path(
    get,
    path = "/rest/ships",
    params(ShipSearchParams),
    responses(
        (status = 200, description = "One page of matching ships", body = [shipyard_core::Ship]),
        (status = 400, description = "Malformed query", body = ErrorResponse)
    ),
    tag = "ships"
)]
#[get("/rest/ships")]
/// List ships matching the query, sorted and paged.
pub async fn list_ships(
    state: web::Data<AppState>,
    query: web::Query<ShipSearchParams>,
) -> impl Responder {
    let params = query.into_inner();
    let ships = state.ships.clone();
    let result =
        web::block(move || ships.search(&params.criteria(), &params.page_request())).await;
    respond(result, |page| HttpResponse::Ok().json(page))
}

#[utoipa::path(
    get,
    path = "/rest/ships/count",
    params(ShipSearchParams),
    responses(
        (status = 200, description = "Number of matching ships", body = usize),
        (status = 400, description = "Malformed query", body = ErrorResponse)
    ),
    tag = "ships"
)]
#[get("/rest/ships/count")]
/// Count ships matching the query; paging parameters are ignored.
pub async fn count_ships(
    state: web::Data<AppState>,
    query: web::Query<ShipSearchParams>,
) -> impl Responder {
    let criteria = query.criteria();
    let ships = state.ships.clone();
    let result = web::block(move || ships.count(&criteria)).await;
    respond(result, |count| HttpResponse::Ok().json(count))
}

#[utoipa::path(
    get,
    path = "/rest/ships/{id}",
    params(
        ("id" = String, Path, description = "Ship identifier")
    ),
    responses(
        (status = 200, description = "Stored ship", body = shipyard_core::Ship),
        (status = 400, description = "Invalid identifier", body = ErrorResponse),
        (status = 404, description = "Ship not found", body = ErrorResponse)
    ),
    tag = "ships"
)]
#[get("/rest/ships/{id}")]
/// Fetch one ship.
pub async fn get_ship(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let raw_id = path.into_inner();
    let ships = state.ships.clone();
    let result = web::block(move || ships.get_one(&raw_id)).await;
    respond(result, |ship| HttpResponse::Ok().json(ship))
}

#[utoipa::path(
    post,
    path = "/rest/ships",
    request_body = ShipDraft,
    responses(
        (status = 200, description = "Created ship", body = shipyard_core::Ship),
        (status = 400, description = "Invalid ship", body = ErrorResponse)
    ),
    tag = "ships"
)]
#[post("/rest/ships")]
/// Create a ship from a complete draft.
pub async fn create_ship(
    state: web::Data<AppState>,
    payload: web::Json<ShipDraft>,
) -> impl Responder {
    let draft = payload.into_inner();
    let ships = state.ships.clone();
    let result = web::block(move || ships.create(draft)).await;
    respond(result, |ship| HttpResponse::Ok().json(ship))
}

#[utoipa::path(
    post,
    path = "/rest/ships/{id}",
    params(
        ("id" = String, Path, description = "Ship identifier")
    ),
    request_body = ShipDraft,
    responses(
        (status = 200, description = "Updated ship", body = shipyard_core::Ship),
        (status = 400, description = "Invalid identifier or field", body = ErrorResponse),
        (status = 404, description = "Ship not found", body = ErrorResponse)
    ),
    tag = "ships"
)]
#[post("/rest/ships/{id}")]
/// Apply the supplied fields to a stored ship.
pub async fn update_ship(
    state: web::Data<AppState>,
    path: web::Path<String>,
    payload: web::Json<ShipDraft>,
) -> impl Responder {
    let raw_id = path.into_inner();
    let draft = payload.into_inner();
    let ships = state.ships.clone();
    let result = web::block(move || ships.update(&raw_id, draft)).await;
    respond(result, |ship| HttpResponse::Ok().json(ship))
}

#[utoipa::path(
    delete,
    path = "/rest/ships/{id}",
    params(
        ("id" = String, Path, description = "Ship identifier")
    ),
    responses(
        (status = 200, description = "Ship deleted"),
        (status = 400, description = "Invalid identifier", body = ErrorResponse),
        (status = 404, description = "Ship not found", body = ErrorResponse)
    ),
    tag = "ships"
)]
#[delete("/rest/ships/{id}")]
/// Delete a stored ship.
pub async fn delete_ship(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let raw_id = path.into_inner();
    let ships = state.ships.clone();
    let result = web::block(move || ships.delete(&raw_id)).await;
    respond(result, |()| HttpResponse::Ok().finish())
}

#[utoipa::path(
    get,
    path = "/rest/openapi.json",
    responses(
        (status = 200, description = "OpenAPI document", body = serde_json::Value)
    ),
    tag = "system"
)]
#[get("/rest/openapi.json")]
/// Serve the OpenAPI document.
pub async fn openapi_json() -> impl Responder {
    HttpResponse::Ok().json(ApiDoc::openapi())
}

fn respond<T>(
    outcome: Result<Result<T, ShipyardError>, BlockingError>,
    ok: impl FnOnce(T) -> HttpResponse,
) -> HttpResponse {
    match outcome {
        Ok(Ok(value)) => ok(value),
        Ok(Err(err)) => error_response(&err),
        Err(err) => HttpResponse::InternalServerError().json(ErrorResponse {
            message: format!("ship task failed: {err}"),
        }),
    }
}

fn error_response(err: &ShipyardError) -> HttpResponse {
    let message = err.to_string();
    match err {
        ShipyardError::InvalidRequest(_) => HttpResponse::BadRequest().json(ErrorResponse { message }),
        ShipyardError::NotFound(_) => HttpResponse::NotFound().json(ErrorResponse { message }),
        ShipyardError::Storage(_) => {
            error!("{message}");
            HttpResponse::InternalServerError().json(ErrorResponse { message })
        }
    }
}

fn query_error(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let response = HttpResponse::BadRequest().json(ErrorResponse {
        message: format!("invalid request: {err}"),
    });
    InternalError::from_response(err, response).into()
}

fn json_error(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let response = HttpResponse::BadRequest().json(ErrorResponse {
        message: format!("invalid request: {err}"),
    });
    InternalError::from_response(err, response).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use shipyard_core::{InMemoryRegistry, ProdDate, Ship, ShipId, ShipRegistry};
    use std::sync::Arc;

    fn ship(name: &str, year: i32, speed: f64, used: bool) -> Ship {
        Ship {
            id: None,
            name: name.to_string(),
            planet: "Earth".to_string(),
            ship_type: ShipType::Transport,
            prod_date: ProdDate::from_year(year).expect("year"),
            used,
            speed,
            crew_size: 100,
            rating: shipyard_core::compute_rating(speed, used, year),
        }
    }

    fn fleet() -> Vec<Ship> {
        (0..10)
            .map(|index| ship(&format!("Ship {index}"), 2900 + index, 0.1 + f64::from(index % 5) * 0.1, index % 2 == 1))
            .collect()
    }

    fn state_with(ships: Vec<Ship>) -> web::Data<AppState> {
        let registry = InMemoryRegistry::with_ships(ships).expect("registry");
        web::Data::new(AppState::new(Arc::new(registry)))
    }

    struct BrokenRegistry;

    impl ShipRegistry for BrokenRegistry {
        fn list_all(&self) -> shipyard_core::Result<Vec<Ship>> {
            Err(ShipyardError::storage("disk on fire"))
        }

        fn get_by_id(&self, _id: ShipId) -> shipyard_core::Result<Option<Ship>> {
            Err(ShipyardError::storage("disk on fire"))
        }

        fn save(&self, _ship: Ship) -> shipyard_core::Result<Ship> {
            Err(ShipyardError::storage("disk on fire"))
        }

        fn exists_by_id(&self, _id: ShipId) -> shipyard_core::Result<bool> {
            Err(ShipyardError::storage("disk on fire"))
        }

        fn delete_by_id(&self, _id: ShipId) -> shipyard_core::Result<()> {
            Err(ShipyardError::storage("disk on fire"))
        }
    }

    #[actix_web::test]
    async fn list_defaults_to_first_three_by_id() {
        let app = test::init_service(App::new().app_data(state_with(fleet())).configure(configure)).await;

        let req = test::TestRequest::get().uri("/rest/ships").to_request();
        let page: Vec<Ship> = test::call_and_read_body_json(&app, req).await;

        let ids: Vec<_> = page.iter().map(|ship| ship.id).collect();
        assert_eq!(ids, vec![Some(1), Some(2), Some(3)]);
    }

    #[actix_web::test]
    async fn list_applies_filters_order_and_paging() {
        let app = test::init_service(App::new().app_data(state_with(fleet())).configure(configure)).await;

        let req = test::TestRequest::get()
            .uri("/rest/ships?isUsed=true&order=SPEED&pageNumber=0&pageSize=10")
            .to_request();
        let page: Vec<Ship> = test::call_and_read_body_json(&app, req).await;

        assert_eq!(page.len(), 5);
        assert!(page.iter().all(|ship| ship.used));
        assert!(page.windows(2).all(|pair| pair[0].speed <= pair[1].speed));

        let req = test::TestRequest::get()
            .uri("/rest/ships?pageNumber=3")
            .to_request();
        let page: Vec<Ship> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].id, Some(10));
    }

    #[actix_web::test]
    async fn count_ignores_paging() {
        let app = test::init_service(App::new().app_data(state_with(fleet())).configure(configure)).await;

        let req = test::TestRequest::get()
            .uri("/rest/ships/count?name=ship&pageSize=1")
            .to_request();
        let count: usize = test::call_and_read_body_json(&app, req).await;
        assert_eq!(count, 10);

        let req = test::TestRequest::get()
            .uri("/rest/ships/count?minCrewSize=100")
            .to_request();
        let count: usize = test::call_and_read_body_json(&app, req).await;
        assert_eq!(count, 0);
    }

    #[actix_web::test]
    async fn malformed_query_is_bad_request() {
        let app = test::init_service(App::new().app_data(state_with(fleet())).configure(configure)).await;

        let req = test::TestRequest::get()
            .uri("/rest/ships?minSpeed=fast")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let req = test::TestRequest::get()
            .uri("/rest/ships?shipType=GALLEON")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn get_maps_errors_to_status_codes() {
        let app = test::init_service(App::new().app_data(state_with(fleet())).configure(configure)).await;

        let req = test::TestRequest::get().uri("/rest/ships/4").to_request();
        let found: Ship = test::call_and_read_body_json(&app, req).await;
        assert_eq!(found.name, "Ship 3");

        let req = test::TestRequest::get().uri("/rest/ships/abc").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let req = test::TestRequest::get().uri("/rest/ships/0").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let req = test::TestRequest::get().uri("/rest/ships/999").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: ErrorResponse = test::read_body_json(resp).await;
        assert!(body.message.contains("999"));
    }

    #[actix_web::test]
    async fn create_validates_and_rates() {
        let app = test::init_service(App::new().app_data(state_with(Vec::new())).configure(configure)).await;
        let prod_date = ProdDate::from_year(2800).expect("year").millis();

        let req = test::TestRequest::post()
            .uri("/rest/ships")
            .set_json(serde_json::json!({
                "name": "Pioneer",
                "planet": "Venus",
                "shipType": "MILITARY",
                "prodDate": prod_date,
                "speed": 0.5,
                "crewSize": 12
            }))
            .to_request();
        let created: Ship = test::call_and_read_body_json(&app, req).await;
        assert_eq!(created.id, Some(1));
        assert!(!created.used);
        assert_eq!(created.rating, 0.18);

        let req = test::TestRequest::post()
            .uri("/rest/ships")
            .set_json(serde_json::json!({
                "name": "x".repeat(51),
                "planet": "Venus",
                "shipType": "MILITARY",
                "prodDate": prod_date,
                "speed": 0.5,
                "crewSize": 12
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let req = test::TestRequest::post()
            .uri("/rest/ships")
            .insert_header(("content-type", "application/json"))
            .set_payload("{not json")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn update_merges_fields_and_rerates() {
        let app = test::init_service(App::new().app_data(state_with(fleet())).configure(configure)).await;

        let req = test::TestRequest::post()
            .uri("/rest/ships/1")
            .set_json(serde_json::json!({"name": "Renamed", "isUsed": true}))
            .to_request();
        let updated: Ship = test::call_and_read_body_json(&app, req).await;
        assert_eq!(updated.id, Some(1));
        assert_eq!(updated.name, "Renamed");
        assert!(updated.used);
        assert_eq!(updated.rating, shipyard_core::compute_rating(0.1, true, 2900));

        let req = test::TestRequest::post()
            .uri("/rest/ships/999999")
            .set_json(serde_json::json!({"name": "X"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let req = test::TestRequest::post()
            .uri("/rest/ships/abc")
            .set_json(serde_json::json!({}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn delete_then_get_is_not_found() {
        let app = test::init_service(App::new().app_data(state_with(fleet())).configure(configure)).await;

        let req = test::TestRequest::delete().uri("/rest/ships/2").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = test::read_body(resp).await;
        assert!(body.is_empty());

        let req = test::TestRequest::get().uri("/rest/ships/2").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let req = test::TestRequest::delete().uri("/rest/ships/2").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn storage_failures_are_server_errors() {
        let state = web::Data::new(AppState::new(Arc::new(BrokenRegistry)));
        let app = test::init_service(App::new().app_data(state).configure(configure)).await;

        let req = test::TestRequest::get().uri("/rest/ships/count").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: ErrorResponse = test::read_body_json(resp).await;
        assert!(body.message.contains("disk on fire"));
    }

    #[actix_web::test]
    async fn openapi_json_lists_ship_routes() {
        let app = test::init_service(App::new().app_data(state_with(Vec::new())).configure(configure)).await;

        let req = test::TestRequest::get().uri("/rest/openapi.json").to_request();
        let doc: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert!(doc["paths"]["/rest/ships"].is_object());
        assert!(doc["paths"]["/rest/ships/{id}"].is_object());
    }
}
