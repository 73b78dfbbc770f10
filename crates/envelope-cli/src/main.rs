//! Offline envelope runner: reads a sample or cyclone-track JSON file and
//! writes the tangent envelope as JSON or GeoJSON.

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use envelope_core::{
    build_envelope_with, parse_samples, segment_outcomes, tangent_edges, to_geojson,
    validate_samples, EnvelopeOptions, RadiusSample, SegmentOutcome, Track, DEFAULT_CIRCLE_SHRINK,
};
use serde_json::{json, Value};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Json,
    Geojson,
}

#[derive(Parser, Debug)]
#[command(name = "envelope-cli", about = "Build variable-radius storm envelopes from track samples")]
struct Args {
    /// JSON file with `[{lat, lon, radius}]` samples (or `{"points": [...]}`).
    #[arg(short, long)]
    input: PathBuf,

    /// Treat the input as a cyclone track (`id`, `status`, `vmax` per point).
    #[arg(long)]
    track: bool,

    #[arg(short, long, value_enum, default_value = "json")]
    format: Format,

    /// Disk radius factor.
    #[arg(long, default_value_t = DEFAULT_CIRCLE_SHRINK)]
    shrink: f64,

    /// Vertices per disk ring in GeoJSON output.
    #[arg(long, default_value_t = 64)]
    circle_segments: usize,

    /// Include the tangent edges of every strip.
    #[arg(long)]
    edges: bool,

    /// Reject out-of-range coordinates and negative radii.
    #[arg(long)]
    strict: bool,

    /// Output file; stdout when omitted.
    #[arg(short, long)]
    output: Option<PathBuf>,
}

/// Track-mode input also yields the past/forecast polylines.
struct Loaded {
    samples: Vec<RadiusSample>,
    track: Option<Track>,
}

fn load(text: &str, as_track: bool) -> Result<Loaded> {
    if as_track {
        let track = Track::from_json(text).context("parsing cyclone track")?;
        Ok(Loaded { samples: track.samples(), track: Some(track) })
    } else {
        let samples = parse_samples(text).context("parsing samples")?;
        Ok(Loaded { samples, track: None })
    }
}

fn render(args: &Args, loaded: &Loaded) -> Result<Value> {
    if args.strict {
        validate_samples(&loaded.samples)?;
    }

    let outcomes = segment_outcomes(&loaded.samples);
    for (i, outcome) in outcomes.iter().enumerate() {
        if *outcome != SegmentOutcome::Strip {
            log::info!("segment {i}->{}: no strip ({outcome:?})", i + 1);
        }
    }

    let options = EnvelopeOptions { circle_shrink: args.shrink };
    let envelope = build_envelope_with(&loaded.samples, &options);
    let edges = if args.edges { tangent_edges(&loaded.samples) } else { Vec::new() };
    log::info!(
        "{} samples -> {} strips, {} circles",
        loaded.samples.len(),
        envelope.strips.len(),
        envelope.circles.len()
    );

    let value = match args.format {
        Format::Geojson => to_geojson(&envelope, args.circle_segments, &edges),
        Format::Json => {
            let mut value = json!({
                "strips": envelope.strips,
                "circles": envelope.circles,
                "bounds": envelope.bounds(),
                "segments": outcomes,
            });
            if args.edges {
                value["edges"] = json!(edges);
            }
            if let Some(track) = &loaded.track {
                value["past"] = json!(track.past_path());
                value["forecast"] = json!(track.forecast_path());
            }
            value
        }
    };
    Ok(value)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let text = fs::read_to_string(&args.input)
        .with_context(|| format!("reading {}", args.input.display()))?;
    let loaded = load(&text, args.track)?;
    let value = render(&args, &loaded)?;
    let body = serde_json::to_string_pretty(&value)?;

    match &args.output {
        Some(path) => {
            fs::write(path, body).with_context(|| format!("writing {}", path.display()))?;
            log::info!("wrote {}", path.display());
        }
        None => {
            let mut out = std::io::stdout().lock();
            writeln!(out, "{body}")?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLES: &str = r#"[
        {"lat": 16, "lon": 108.8, "radius": 0},
        {"lat": 16, "lon": 108.8, "radius": 0},
        {"lat": 17, "lon": 108.4, "radius": 20000}
    ]"#;

    fn args(extra: &[&str]) -> Args {
        let mut argv = vec!["envelope-cli", "--input", "unused.json"];
        argv.extend_from_slice(extra);
        Args::parse_from(argv)
    }

    #[test]
    fn json_output_reports_skipped_segment() {
        let loaded = load(SAMPLES, false).unwrap();
        let value = render(&args(&[]), &loaded).unwrap();
        assert_eq!(value["strips"].as_array().unwrap().len(), 1);
        assert_eq!(value["circles"].as_array().unwrap().len(), 1);
        assert_eq!(value["segments"][0], "coincident_centers");
        assert_eq!(value["segments"][1], "strip");
        assert!(value.get("edges").is_none());
    }

    #[test]
    fn geojson_output_with_edges() {
        let loaded = load(SAMPLES, false).unwrap();
        let value = render(&args(&["--format", "geojson", "--edges"]), &loaded).unwrap();
        assert_eq!(value["type"], "FeatureCollection");
        // 1 strip + 1 circle + 2 edges
        assert_eq!(value["features"].as_array().unwrap().len(), 4);
    }

    #[test]
    fn strict_rejects_bad_radius() {
        let loaded = load(r#"[{"lat": 0, "lon": 0, "radius": -1}]"#, false).unwrap();
        assert!(render(&args(&["--strict"]), &loaded).is_err());
        assert!(render(&args(&[]), &loaded).is_ok());
    }

    #[test]
    fn track_mode_adds_paths() {
        let text = r#"{"points": [
            {"id": 1, "lat": 17.5, "lng": 111.0, "status": "past", "radius": 0, "vmax": 75},
            {"id": 2, "lat": 18.2, "lng": 109.8, "status": "forecast", "radius": 60000, "vmax": 80},
            {"id": 3, "lat": 19.0, "lng": 108.5, "status": "forecast", "radius": 80000, "vmax": 85}
        ]}"#;
        let loaded = load(text, true).unwrap();
        let value = render(&args(&["--track", "--shrink", "1.0"]), &loaded).unwrap();
        assert_eq!(value["past"].as_array().unwrap().len(), 2);
        assert_eq!(value["forecast"].as_array().unwrap().len(), 2);
        assert_eq!(value["circles"][0]["radius"], 60000.0);
    }
}
