/*
Copyright 2024 San Francisco Compute Company

Licensed under the Apache License, Version 2.0 (the "License");
you may not use this file except in compliance with the License.
You may obtain a copy of the License at

    http://www.apache.org/licenses/LICENSE-2.0

Unless required by applicable law or agreed to in writing, software
distributed under the License is distributed on an "AS IS" BASIS,
WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
See the License for the specific language governing permissions and
limitations under the License.
*/

//! Route handlers

use super::error::ApiError;
use crate::adapters::primary::MetricsExporter;
use crate::domain::{RawQueryResult, ThrottleRendering};
use crate::ports::TelemetryService;
use axum::extract::{Query, State};
use axum::http::header;
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use log::info;
use std::sync::Arc;

const REDOC_INDEX: &str = include_str!("../../../../assets/redoc/index.html");
const OPENAPI_DOCUMENT: &str = include_str!("../../../../assets/redoc/openapi.json");

type TelemetryState = State<Arc<dyn TelemetryService>>;

pub async fn temperature(
    State(telemetry): TelemetryState,
) -> Result<Json<RawQueryResult>, ApiError> {
    let temp = telemetry
        .temperature()
        .await
        .map_err(|e| ApiError::internal("fetch temperature", e))?;

    info!("Fetched temperature");
    Ok(Json(temp))
}

pub async fn configuration(
    State(telemetry): TelemetryState,
) -> Result<Json<RawQueryResult>, ApiError> {
    let config = telemetry
        .configuration()
        .await
        .map_err(|e| ApiError::internal("fetch configuration", e))?;

    info!("Fetched configuration");
    Ok(Json(config))
}

pub async fn voltages(
    State(telemetry): TelemetryState,
) -> Result<Json<RawQueryResult>, ApiError> {
    let voltages = telemetry
        .voltages()
        .await
        .map_err(|e| ApiError::internal("fetch voltages", e))?;

    info!("Fetched voltages");
    Ok(Json(voltages))
}

pub async fn clock(
    State(telemetry): TelemetryState,
) -> Result<Json<RawQueryResult>, ApiError> {
    let clock = telemetry
        .clock()
        .await
        .map_err(|e| ApiError::internal("fetch clock rates", e))?;

    info!("Fetched clock rates");
    Ok(Json(clock))
}

/// Whether the first `human` query parameter is exactly `true`
///
/// Repeated parameters are allowed; later values are ignored.
fn wants_human(params: &[(String, String)]) -> bool {
    params
        .iter()
        .find(|(key, _)| key == "human")
        .is_some_and(|(_, value)| value == "true")
}

pub async fn throttled(
    State(telemetry): TelemetryState,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Json<RawQueryResult>, ApiError> {
    let rendering = ThrottleRendering::from_human_flag(wants_human(&params));
    let throttled = telemetry
        .throttled(rendering)
        .await
        .map_err(|e| ApiError::internal("fetch throttled status", e))?;

    info!("Fetched throttled status");
    Ok(Json(throttled))
}

pub async fn metrics(State(exporter): State<Arc<MetricsExporter>>) -> Result<Response, ApiError> {
    let body = exporter
        .scrape()
        .await
        .map_err(|e| ApiError::internal("export metrics", e))?;

    Ok(([(header::CONTENT_TYPE, exporter.content_type())], body).into_response())
}

pub async fn redoc() -> Html<&'static str> {
    Html(REDOC_INDEX)
}

pub async fn openapi() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "application/json")], OPENAPI_DOCUMENT)
}

pub async fn not_found() -> ApiError {
    ApiError::NotFound
}
