//! HTTP handler functions for the accident dashboard API.

use accident_map_accident_models::AccidentRecord;
use accident_map_analytics::{
    cause_ranking, filter_period, geo_projection, phase_histogram, record_count, summarize,
};
use accident_map_analytics_models::{FilterBounds, default_time_from, default_time_to};
use accident_map_server_models::{
    ApiBounds, ApiCount, ApiError, ApiHealth, ApiMapView, ApiSummary, SelectionParams,
};
use accident_map_source::{Dataset, SourceError};
use accident_map_source::parsing::parse_time_of_day;
use actix_web::{HttpResponse, web};
use chrono::{NaiveDate, NaiveTime};

use crate::AppState;

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /api/bounds`
///
/// Returns the selectable date range and the default time-of-day range.
pub async fn bounds(state: web::Data<AppState>) -> HttpResponse {
    let dataset = match state.dataset() {
        Ok(dataset) => dataset,
        Err(e) => return unavailable(&e),
    };

    let range = dataset.date_range();
    HttpResponse::Ok().json(ApiBounds {
        min_date: range.map(|(min, _)| min),
        max_date: range.map(|(_, max)| max),
        default_time_from: default_time_from(),
        default_time_to: default_time_to(),
        total_records: dataset.len() as u64,
    })
}

/// `GET /api/map-view`
pub async fn map_view(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(ApiMapView::from(state.config.map))
}

/// `GET /api/summary`
///
/// Filters to the requested period and returns every aggregation.
pub async fn summary(
    state: web::Data<AppState>,
    params: web::Query<SelectionParams>,
) -> HttpResponse {
    let dataset = match state.dataset() {
        Ok(dataset) => dataset,
        Err(e) => return unavailable(&e),
    };
    let bounds = match resolve_bounds(&dataset, &params) {
        Ok(bounds) => bounds,
        Err(message) => return bad_request(message),
    };

    let summary = summarize(dataset.records(), &bounds, &state.config.causes);
    HttpResponse::Ok().json(ApiSummary::new(summary, state.config.map))
}

/// `GET /api/count`
pub async fn count(
    state: web::Data<AppState>,
    params: web::Query<SelectionParams>,
) -> HttpResponse {
    with_period(&state, &params, |period| {
        HttpResponse::Ok().json(ApiCount {
            count: record_count(period),
        })
    })
}

/// `GET /api/phases`
pub async fn phases(
    state: web::Data<AppState>,
    params: web::Query<SelectionParams>,
) -> HttpResponse {
    with_period(&state, &params, |period| {
        HttpResponse::Ok().json(phase_histogram(period))
    })
}

/// `GET /api/causes`
pub async fn causes(
    state: web::Data<AppState>,
    params: web::Query<SelectionParams>,
) -> HttpResponse {
    with_period(&state, &params, |period| {
        HttpResponse::Ok().json(cause_ranking(period, &state.config.causes))
    })
}

/// `GET /api/points`
pub async fn points(
    state: web::Data<AppState>,
    params: web::Query<SelectionParams>,
) -> HttpResponse {
    with_period(&state, &params, |period| {
        HttpResponse::Ok().json(geo_projection(period))
    })
}

/// Resolves the selection and hands the filtered period to `respond`.
fn with_period(
    state: &AppState,
    params: &SelectionParams,
    respond: impl FnOnce(&[AccidentRecord]) -> HttpResponse,
) -> HttpResponse {
    let dataset = match state.dataset() {
        Ok(dataset) => dataset,
        Err(e) => return unavailable(&e),
    };

    match resolve_bounds(&dataset, params) {
        Ok(bounds) => respond(&filter_period(dataset.records(), &bounds)),
        Err(message) => bad_request(message),
    }
}

/// Builds filter bounds from query parameters, defaulting omitted dates to
/// the dataset range and omitted times to the full day.
fn resolve_bounds(dataset: &Dataset, params: &SelectionParams) -> Result<FilterBounds, String> {
    let (min_date, max_date) = dataset
        .date_range()
        .unwrap_or((NaiveDate::MIN, NaiveDate::MAX));

    let bounds = FilterBounds {
        date_from: parse_param_date("dateFrom", params.date_from.as_deref())?.unwrap_or(min_date),
        date_to: parse_param_date("dateTo", params.date_to.as_deref())?.unwrap_or(max_date),
        time_from: parse_param_time("timeFrom", params.time_from.as_deref())?
            .unwrap_or_else(default_time_from),
        time_to: parse_param_time("timeTo", params.time_to.as_deref())?
            .unwrap_or_else(default_time_to),
    };

    log::debug!(
        "Resolved selection {}..={} {}..={}",
        bounds.date_from,
        bounds.date_to,
        bounds.time_from,
        bounds.time_to
    );

    Ok(bounds)
}

fn parse_param_date(name: &str, value: Option<&str>) -> Result<Option<NaiveDate>, String> {
    value
        .map(|v| {
            NaiveDate::parse_from_str(v.trim(), "%Y-%m-%d")
                .map_err(|e| format!("Invalid {name} '{v}': {e}. Expected format: YYYY-MM-DD"))
        })
        .transpose()
}

fn parse_param_time(name: &str, value: Option<&str>) -> Result<Option<NaiveTime>, String> {
    value
        .map(|v| {
            parse_time_of_day(v)
                .ok_or_else(|| format!("Invalid {name} '{v}'. Expected format: HH:MM[:SS]"))
        })
        .transpose()
}

fn bad_request(message: String) -> HttpResponse {
    log::warn!("Rejected selection: {message}");
    HttpResponse::BadRequest().json(ApiError { error: message })
}

fn unavailable(err: &SourceError) -> HttpResponse {
    log::error!("Accident data unavailable: {err}");
    HttpResponse::InternalServerError().json(ApiError {
        error: format!("Accident data unavailable: {err}"),
    })
}
