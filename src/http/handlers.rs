//! Request handlers.

use std::collections::HashMap;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::{json, Value};

use crate::config::QueryConfig;
use crate::error::AppError;
use crate::http::response::ListEnvelope;
use crate::http::server::AppState;
use crate::models::{Director, DirectorFilter, Movie, MovieFilter};
use crate::observability::metrics;
use crate::query::{self, Filters, QueryParams, SortColumn, SortSafelist};

pub async fn healthcheck(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "available",
        "system_info": {
            "environment": &*state.environment,
            "version": env!("CARGO_PKG_VERSION"),
        }
    }))
}

/// `GET /v1/movies?title=&genres=&page=&page_size=&sort=`
pub async fn list_movies(
    State(state): State<AppState>,
    Query(raw): Query<HashMap<String, String>>,
) -> Result<Json<ListEnvelope<Movie>>, AppError> {
    let params = QueryParams::from(raw);
    let filter = MovieFilter::from_params(&params);
    let filters = validated("movies", &params, &state.movie_sort, &state.limits)?;

    let page = query::execute(
        "movies",
        state.movies.as_ref(),
        &filter,
        &filters,
        state.store_timeout,
    )
    .await?;

    Ok(Json(ListEnvelope::new("movies", page)))
}

/// `GET /v1/directors?name=&awards=&page=&page_size=&sort=`
pub async fn list_directors(
    State(state): State<AppState>,
    Query(raw): Query<HashMap<String, String>>,
) -> Result<Json<ListEnvelope<Director>>, AppError> {
    let params = QueryParams::from(raw);
    let filter = DirectorFilter::from_params(&params);
    let filters = validated("directors", &params, &state.director_sort, &state.limits)?;

    let page = query::execute(
        "directors",
        state.directors.as_ref(),
        &filter,
        &filters,
        state.store_timeout,
    )
    .await?;

    Ok(Json(ListEnvelope::new("directors", page)))
}

pub async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "the requested resource could not be found" })),
    )
}

fn validated<C: SortColumn>(
    entity: &'static str,
    params: &QueryParams,
    safelist: &SortSafelist<C>,
    limits: &QueryConfig,
) -> Result<Filters<C>, AppError> {
    query::validate(params, safelist, limits).map_err(|errors| {
        tracing::debug!(entity, %errors, "List query failed validation");
        metrics::record_validation_failure(entity);
        AppError::Validation(errors)
    })
}
