// src/server/handlers.rs
// Route handlers: index, health and prediction

use axum::{Json, body::Bytes, extract::State, response::IntoResponse};
use serde_json::{Map, Value, json};
use tracing::debug;

use super::error::{ApiError, ApiResult};
use super::state::AppState;
use crate::dataset::Features;
use crate::predictor::PredictionResult;

pub async fn index() -> impl IntoResponse {
    Json(json!({ "message": "Water Quality Disease Risk API is running!" }))
}

pub async fn health() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// POST /predict
///
/// The body is parsed by hand rather than through `Json<T>` so that every
/// failure, including malformed JSON, produces the same 400 error shape.
pub async fn predict(State(state): State<AppState>, body: Bytes) -> ApiResult<Json<PredictionResult>> {
    let value: Value = serde_json::from_slice(&body)
        .map_err(|e| ApiError::bad_request(format!("invalid JSON body: {e}")))?;
    let features = parse_features(&value).map_err(ApiError::bad_request)?;

    let result = state.predictor.predict(features)?;
    debug!(
        ph = features.ph,
        turbidity = features.turbidity,
        tds = features.tds,
        predicted = %result.predicted_risk,
        "Prediction served"
    );
    Ok(Json(result))
}

/// Read the three measurements from a request object, applying defaults for
/// absent fields.
pub fn parse_features(value: &Value) -> Result<Features, String> {
    let obj = value
        .as_object()
        .ok_or_else(|| format!("request body must be a JSON object, got {}", kind(value)))?;
    let defaults = Features::default();

    Ok(Features {
        ph: field(obj, "pH", defaults.ph)?,
        turbidity: field(obj, "turbidity", defaults.turbidity)?,
        tds: field(obj, "tds", defaults.tds)?,
    })
}

fn field(obj: &Map<String, Value>, name: &str, default: f64) -> Result<f64, String> {
    match obj.get(name) {
        None => Ok(default),
        Some(value) => coerce_f64(value).map_err(|e| format!("{name}: {e}")),
    }
}

/// Float coercion: numbers pass through, numeric strings are parsed (finite
/// values only) and booleans map to 1.0/0.0.
fn coerce_f64(value: &Value) -> Result<f64, String> {
    match value {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| format!("number out of range: {n}")),
        Value::String(s) => {
            let v = s
                .trim()
                .parse::<f64>()
                .map_err(|_| format!("could not convert string to float: '{s}'"))?;
            // JSON cannot carry NaN or infinity back in the response
            if v.is_finite() {
                Ok(v)
            } else {
                Err(format!("value must be a finite number, got '{s}'"))
            }
        }
        Value::Bool(b) => Ok(if *b { 1.0 } else { 0.0 }),
        other => Err(format!("expected a number, got {}", kind(other))),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
