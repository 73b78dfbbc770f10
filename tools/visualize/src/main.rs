//! Diagnostic visualizer — writes envelope PNG debug images to data/debug/.
//! Not part of the main pipeline; no tests, no clippy target.

use std::fs;
use std::path::Path;

use envelope_core::{
    tangent_edges, Envelope, EnvelopeOptions, GeoPoint, PlanarPoint, RadiusSample, Track,
    TrackPoint, TrackStatus,
};

const W: u32 = 768;
const H: u32 = 768;
/// Margin around the envelope bounds, as a fraction of the larger extent.
const PAD: f64 = 0.08;

// ── Colour helpers ────────────────────────────────────────────────────────────

const BACKGROUND: [u8; 3] = [245, 245, 240];
const STRIP: [u8; 3] = [255, 150, 80];
const DISK: [u8; 3] = [255, 106, 0];
const EDGE: [u8; 3] = [0, 0, 0];
const PAST: [u8; 3] = [117, 116, 116];
const FORECAST: [u8; 3] = [255, 45, 85];

// ── Mercator → pixel frame ────────────────────────────────────────────────────

/// Maps Web-Mercator metres onto the image, north up, uniform scale.
struct Frame {
    min: PlanarPoint,
    scale: f64,
}

impl Frame {
    fn fit(points: &[PlanarPoint]) -> Self {
        let (mut lo, mut hi) = (points[0], points[0]);
        for p in points {
            lo = PlanarPoint::new(lo.x.min(p.x), lo.y.min(p.y));
            hi = PlanarPoint::new(hi.x.max(p.x), hi.y.max(p.y));
        }
        let extent = (hi.x - lo.x).max(hi.y - lo.y).max(1.0);
        let pad = extent * PAD;
        let scale = W.min(H) as f64 / (extent + 2.0 * pad);
        Self { min: PlanarPoint::new(lo.x - pad, lo.y - pad), scale }
    }

    fn to_px(&self, p: PlanarPoint) -> (f64, f64) {
        let x = (p.x - self.min.x) * self.scale;
        let y = H as f64 - (p.y - self.min.y) * self.scale;
        (x, y)
    }

    fn to_meters(&self, px: f64, py: f64) -> PlanarPoint {
        PlanarPoint::new(px / self.scale + self.min.x, (H as f64 - py) / self.scale + self.min.y)
    }
}

/// Even-odd point-in-polygon test on the plane.
fn inside(poly: &[PlanarPoint], p: PlanarPoint) -> bool {
    let mut hit = false;
    let mut j = poly.len() - 1;
    for i in 0..poly.len() {
        let (a, b) = (poly[i], poly[j]);
        if (a.y > p.y) != (b.y > p.y) && p.x < (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x {
            hit = !hit;
        }
        j = i;
    }
    hit
}

fn draw_line(img: &mut image::RgbImage, frame: &Frame, a: GeoPoint, b: GeoPoint, color: [u8; 3]) {
    let (x0, y0) = frame.to_px(a.to_meters());
    let (x1, y1) = frame.to_px(b.to_meters());
    let steps = (x1 - x0).abs().max((y1 - y0).abs()).ceil().max(1.0) as usize;
    for s in 0..=steps {
        let t = s as f64 / steps as f64;
        let x = x0 + (x1 - x0) * t;
        let y = y0 + (y1 - y0) * t;
        if x >= 0.0 && y >= 0.0 && (x as u32) < W && (y as u32) < H {
            img.put_pixel(x as u32, y as u32, image::Rgb(color));
        }
    }
}

fn draw_polyline(img: &mut image::RgbImage, frame: &Frame, path: &[GeoPoint], color: [u8; 3]) {
    for w in path.windows(2) {
        draw_line(img, frame, w[0], w[1], color);
    }
}

/// Rasterise disks under strips so the tangent seams stay visible.
fn render_envelope(envelope: &Envelope, frame: &Frame) -> image::RgbImage {
    let disks: Vec<(PlanarPoint, f64)> = envelope
        .circles
        .iter()
        .map(|c| (c.center.to_meters(), c.radius))
        .collect();
    let strips: Vec<Vec<PlanarPoint>> = envelope
        .strips
        .iter()
        .map(|q| q.iter().map(|p| p.to_meters()).collect())
        .collect();

    let mut img = image::RgbImage::from_pixel(W, H, image::Rgb(BACKGROUND));
    for py in 0..H {
        for px in 0..W {
            let m = frame.to_meters(px as f64 + 0.5, py as f64 + 0.5);
            let color = if strips.iter().any(|s| inside(s, m)) {
                STRIP
            } else if disks.iter().any(|&(c, r)| c.distance(m) <= r) {
                DISK
            } else {
                continue;
            };
            img.put_pixel(px, py, image::Rgb(color));
        }
    }
    img
}

fn frame_for(envelope: &Envelope, extra: &[GeoPoint]) -> Option<Frame> {
    let b = envelope.bounds()?;
    let mut points = vec![
        GeoPoint::new(b.min_lat, b.min_lon).to_meters(),
        GeoPoint::new(b.max_lat, b.max_lon).to_meters(),
    ];
    points.extend(extra.iter().map(|p| p.to_meters()));
    Some(Frame::fit(&points))
}

fn demo_track() -> Track {
    let fix = |id, lat, lon, status, radius, vmax| TrackPoint { id, lat, lon, status, radius, vmax };
    use TrackStatus::{Forecast, Past};
    Track::new(vec![
        fix(1, 15.5, 115.5, Past, 0.0, 60.0),
        fix(2, 16.2, 114.0, Past, 0.0, 65.0),
        fix(3, 17.0, 112.5, Past, 0.0, 70.0),
        fix(4, 17.5, 111.0, Past, 0.0, 75.0),
        fix(5, 18.2, 109.8, Forecast, 60_000.0, 80.0),
        fix(6, 19.0, 108.5, Forecast, 80_000.0, 85.0),
        fix(7, 20.2, 107.0, Forecast, 100_000.0, 90.0),
        fix(8, 21.0, 105.8, Forecast, 120_000.0, 83.0),
    ])
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    let out_dir = Path::new("data/debug");
    fs::create_dir_all(out_dir).expect("cannot create data/debug/");

    // ── 1. envelope.png: growing radius with tangent edges ───────────────────
    {
        let samples = [
            RadiusSample::new(16.0, 108.8, 0.0),
            RadiusSample::new(16.5, 108.8, 10_000.0),
            RadiusSample::new(17.0, 108.4, 20_000.0),
            RadiusSample::new(17.5, 108.5, 30_000.0),
        ];
        println!("Building envelope for {} samples…", samples.len());
        let envelope = envelope_core::build_envelope(&samples);
        let frame = frame_for(&envelope, &[]).expect("demo envelope is not empty");
        let mut img = render_envelope(&envelope, &frame);
        for [a, b] in tangent_edges(&samples) {
            draw_line(&mut img, &frame, a, b, EDGE);
        }
        let path = out_dir.join("envelope.png");
        img.save(&path).expect("failed to save envelope.png");
        println!("Wrote {}", path.display());
    }

    // ── 2. track_envelope.png: past/forecast split over the envelope ─────────
    {
        let track = demo_track();
        println!("Building envelope for cyclone track ({} fixes)…", track.points.len());
        let envelope = track.envelope(&EnvelopeOptions::default());
        let past = track.past_path();
        let forecast = track.forecast_path();
        let frame = frame_for(&envelope, &past).expect("demo track is not empty");
        let mut img = render_envelope(&envelope, &frame);
        draw_polyline(&mut img, &frame, &past, PAST);
        draw_polyline(&mut img, &frame, &forecast, FORECAST);
        let path = out_dir.join("track_envelope.png");
        img.save(&path).expect("failed to save track_envelope.png");
        println!("Wrote {}", path.display());
    }

    println!("Done.");
}
