use envelope_core::{
    build_envelope_with, parse_samples, tangent_edges, to_geojson, validate_samples, Envelope,
    EnvelopeOptions, GeoPoint, RadiusSample, Track,
};
use serde::Serialize;
use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn init() {
    // Panics show up in the browser console instead of "unreachable".
    console_error_panic_hook::set_once();
}

fn js_err(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn checked_samples(samples_json: &str) -> Result<Vec<RadiusSample>, JsValue> {
    let samples = parse_samples(samples_json).map_err(js_err)?;
    validate_samples(&samples).map_err(js_err)?;
    Ok(samples)
}

// json_compatible: maps become plain objects, which GeoJSON consumers expect.
fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| JsValue::from_str(&format!("Serialization failed: {e}")))
}

/// Build the envelope for a JSON array of `{lat, lon, radius}` samples.
/// Returns `{ strips: [[{lat, lon} x4]], circles: [{center, radius}] }`.
#[wasm_bindgen]
pub fn build_envelope(samples_json: &str) -> Result<JsValue, JsValue> {
    let samples = checked_samples(samples_json)?;
    to_js(&envelope_core::build_envelope(&samples))
}

/// Same as [`build_envelope`] with an explicit disk shrink factor.
#[wasm_bindgen(js_name = buildEnvelopeWith)]
pub fn build_envelope_with_shrink(samples_json: &str, circle_shrink: f64) -> Result<JsValue, JsValue> {
    let samples = checked_samples(samples_json)?;
    to_js(&build_envelope_with(&samples, &EnvelopeOptions { circle_shrink }))
}

/// Envelope plus tangent edges as a GeoJSON FeatureCollection.
#[wasm_bindgen]
pub fn envelope_geojson(samples_json: &str, circle_segments: u32, with_edges: bool) -> Result<JsValue, JsValue> {
    let samples = checked_samples(samples_json)?;
    let envelope = envelope_core::build_envelope(&samples);
    let edges = if with_edges { tangent_edges(&samples) } else { Vec::new() };
    to_js(&to_geojson(&envelope, circle_segments as usize, &edges))
}

/// Strip vertices flattened as `[lat, lon]` x 4 per strip, for direct upload
/// into a vertex buffer.
#[wasm_bindgen]
pub fn strip_vertices(samples_json: &str) -> Result<js_sys::Float64Array, JsValue> {
    let samples = checked_samples(samples_json)?;
    let flat = flatten_strips(&envelope_core::build_envelope(&samples));
    Ok(js_sys::Float64Array::from(flat.as_slice()))
}

fn flatten_strips(envelope: &Envelope) -> Vec<f64> {
    envelope
        .strips
        .iter()
        .flatten()
        .flat_map(|p| [p.lat, p.lon])
        .collect()
}

#[derive(Serialize)]
struct TrackLayers {
    past: Vec<GeoPoint>,
    forecast: Vec<GeoPoint>,
    envelope: Envelope,
}

/// Past and forecast polylines of a cyclone track, plus its envelope.
#[wasm_bindgen]
pub fn track_paths(track_json: &str) -> Result<JsValue, JsValue> {
    let track = Track::from_json(track_json).map_err(js_err)?;
    validate_samples(&track.samples()).map_err(js_err)?;
    to_js(&TrackLayers {
        past: track.past_path(),
        forecast: track.forecast_path(),
        envelope: track.envelope(&EnvelopeOptions::default()),
    })
}
