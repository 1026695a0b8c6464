//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};

use crate::cache::RouteQuery;
use crate::catalog::{CatalogError, NewLocation, SegmentSpec, UpdateLocation};
use crate::domain::{LocationCode, LocationId, SegmentId, Weekday};
use crate::routing::RouteError;

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/routes/search", get(search_routes))
        .route("/locations", get(list_locations).post(create_location))
        .route(
            "/locations/:id",
            get(get_location).put(update_location).delete(delete_location),
        )
        .route("/locations/code/:code", get(get_location_by_code))
        .route(
            "/transportations",
            get(list_segments).post(create_segment),
        )
        .route("/transportations/search", get(search_segments))
        .route("/transportations/origin", get(segments_by_origin))
        .route(
            "/transportations/:id",
            get(get_segment).put(update_segment).delete(delete_segment),
        )
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Search valid routes between two locations on a travel date.
async fn search_routes(
    State(state): State<AppState>,
    Query(params): Query<RouteSearchParams>,
) -> Result<Json<Vec<RouteDto>>, AppError> {
    let query = RouteQuery {
        origin: params.origin_code,
        destination: params.destination_code,
        travel_date: params.travel_date,
    };

    let itineraries = state.finder.find_routes(&query).await?;
    let routes = routes_to_dto(&itineraries, &state.catalog)?;
    Ok(Json(routes))
}

// Locations

async fn list_locations(
    State(state): State<AppState>,
) -> Result<Json<Vec<LocationDto>>, AppError> {
    let locations = state.catalog.list_locations()?;
    Ok(Json(
        locations.iter().map(LocationDto::from_location).collect(),
    ))
}

async fn get_location(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<LocationDto>, AppError> {
    let location = state.catalog.location_by_id(LocationId(id))?;
    Ok(Json(LocationDto::from_location(&location)))
}

async fn get_location_by_code(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<LocationDto>, AppError> {
    let code = LocationCode::parse(&code).map_err(|e| AppError::BadRequest {
        message: e.to_string(),
    })?;
    let location = state.catalog.location_by_code(&code)?;
    Ok(Json(LocationDto::from_location(&location)))
}

async fn create_location(
    State(state): State<AppState>,
    Json(req): Json<CreateLocationRequest>,
) -> Result<(StatusCode, Json<LocationDto>), AppError> {
    let location = state.manager.create_location(NewLocation {
        name: req.name,
        country: req.country,
        city: req.city,
        code: req.code,
    })?;
    Ok((StatusCode::CREATED, Json(LocationDto::from_location(&location))))
}

async fn update_location(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateLocationRequest>,
) -> Result<Json<LocationDto>, AppError> {
    let location = state.manager.update_location(
        LocationId(id),
        UpdateLocation {
            name: req.name,
            country: req.country,
            city: req.city,
        },
    )?;
    Ok(Json(LocationDto::from_location(&location)))
}

async fn delete_location(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    state.manager.delete_location(LocationId(id))?;
    Ok(StatusCode::NO_CONTENT)
}

// Transportation segments

async fn list_segments(State(state): State<AppState>) -> Result<Json<Vec<SegmentDto>>, AppError> {
    let segments = state.catalog.list_segments()?;
    let dtos = segments
        .iter()
        .map(|s| SegmentDto::resolve(s, &state.catalog))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Json(dtos))
}

async fn get_segment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<SegmentDto>, AppError> {
    let segment = state.catalog.segment_by_id(SegmentId(id))?;
    Ok(Json(SegmentDto::resolve(&segment, &state.catalog)?))
}

/// Segments running directly between two locations.
async fn search_segments(
    State(state): State<AppState>,
    Query(params): Query<SegmentSearchParams>,
) -> Result<Json<Vec<SegmentDto>>, AppError> {
    let origin = state.catalog.location_by_code(&params.origin_code)?;
    let destination = state.catalog.location_by_code(&params.destination_code)?;

    let segments = state.catalog.segments_between(origin.id, destination.id)?;
    let dtos = segments
        .iter()
        .map(|s| SegmentDto::resolve(s, &state.catalog))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Json(dtos))
}

/// Segments departing a location on a given date's weekday.
async fn segments_by_origin(
    State(state): State<AppState>,
    Query(params): Query<SegmentsByOriginParams>,
) -> Result<Json<Vec<SegmentDto>>, AppError> {
    let origin = state.catalog.location_by_code(&params.origin_code)?;
    let day = Weekday::from_date(params.date);

    let segments = state.catalog.segments_for_day_from(day, origin.id)?;
    let dtos = segments
        .iter()
        .map(|s| SegmentDto::resolve(s, &state.catalog))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Json(dtos))
}

async fn create_segment(
    State(state): State<AppState>,
    Json(req): Json<SegmentRequest>,
) -> Result<(StatusCode, Json<SegmentDto>), AppError> {
    let segment = state.manager.create_segment(SegmentSpec {
        origin: LocationId(req.origin_location_id),
        destination: LocationId(req.destination_location_id),
        mode: req.transportation_type,
        operating_days: req.operating_days,
    })?;
    let dto = SegmentDto::resolve(&segment, &state.catalog)?;
    Ok((StatusCode::CREATED, Json(dto)))
}

async fn update_segment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<SegmentRequest>,
) -> Result<Json<SegmentDto>, AppError> {
    let segment = state.manager.update_segment(
        SegmentId(id),
        SegmentSpec {
            origin: LocationId(req.origin_location_id),
            destination: LocationId(req.destination_location_id),
            mode: req.transportation_type,
            operating_days: req.operating_days,
        },
    )?;
    let dto = SegmentDto::resolve(&segment, &state.catalog)?;
    Ok(Json(dto))
}

async fn delete_segment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    state.manager.delete_segment(SegmentId(id))?;
    Ok(StatusCode::NO_CONTENT)
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    Conflict { message: String },
    Internal { message: String },
}

impl From<RouteError> for AppError {
    fn from(e: RouteError) -> Self {
        match e {
            RouteError::LocationNotFound(_) => AppError::NotFound {
                message: e.to_string(),
            },
            RouteError::DataAccess(_) => AppError::Internal {
                message: e.to_string(),
            },
        }
    }
}

impl From<CatalogError> for AppError {
    fn from(e: CatalogError) -> Self {
        match &e {
            CatalogError::LocationCodeNotFound(_)
            | CatalogError::LocationNotFound(_)
            | CatalogError::SegmentNotFound(_) => AppError::NotFound {
                message: e.to_string(),
            },
            CatalogError::LocationCodeExists(_) | CatalogError::LocationInUse(_) => {
                AppError::Conflict {
                    message: e.to_string(),
                }
            }
            CatalogError::Store(_) => AppError::Internal {
                message: e.to_string(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::Conflict { message } => (StatusCode::CONFLICT, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        tracing::warn!(%status, %message, "request failed");

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
