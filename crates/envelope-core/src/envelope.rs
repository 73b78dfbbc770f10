//! Variable-radius envelope: tangent strips between consecutive radius
//! circles along a track, plus one disk per sample.
//!
//! Shapes are computed on the Web-Mercator plane and handed back in
//! geographic degrees. Segments without external tangents (coincident
//! centers, nested circles) are left out of the output; use
//! [`segment_outcomes`] to see which ones and why.

use serde::{Deserialize, Serialize};

use crate::error::{EnvelopeError, Result};
use crate::projection::{GeoPoint, PlanarPoint};
use crate::tangent::{classify_segment, external_tangents, SegmentOutcome, TangentPair};

/// Shrink applied to sample disks so their edge tucks under the strips.
pub const DEFAULT_CIRCLE_SHRINK: f64 = 0.95;

/// Smallest vertex count accepted by [`CircleDescriptor::ring`].
pub const MIN_RING_SEGMENTS: usize = 8;

// ── Types ─────────────────────────────────────────────────────────────────────

/// One point on a track with its circle radius in metres (0 = no circle).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RadiusSample {
    pub lat: f64,
    #[serde(alias = "lng")]
    pub lon: f64,
    pub radius: f64,
}

impl RadiusSample {
    pub fn new(lat: f64, lon: f64, radius: f64) -> Self {
        Self { lat, lon, radius }
    }

    pub fn position(&self) -> GeoPoint {
        GeoPoint::new(self.lat, self.lon)
    }
}

/// Tangent-bounded quadrilateral `[A.p1, A.p2, B.p2, B.p1]`.
pub type Quad = [GeoPoint; 4];

/// One tangent side of a strip, from circle 1 to circle 2.
pub type TangentEdge = [GeoPoint; 2];

/// A sample disk ready for a map circle primitive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CircleDescriptor {
    pub center: GeoPoint,
    /// Radius in metres with the rendering shrink already applied.
    pub radius: f64,
}

impl CircleDescriptor {
    /// Closed polygon approximation of the disk, first vertex repeated last.
    ///
    /// The radius is laid out on the Mercator plane, the same space the
    /// strips are built in, so the ring lines up with the tangent points.
    pub fn ring(&self, segments: usize) -> Vec<GeoPoint> {
        let n = segments.max(MIN_RING_SEGMENTS);
        let c = self.center.to_meters();
        let mut ring = Vec::with_capacity(n + 1);
        for i in 0..n {
            let angle = std::f64::consts::TAU * i as f64 / n as f64;
            let p = c + PlanarPoint::new(angle.cos(), angle.sin()) * self.radius;
            ring.push(p.to_geo());
        }
        ring.push(ring[0]);
        ring
    }
}

/// Geographic bounding box, degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoBounds {
    pub min_lat: f64,
    pub min_lon: f64,
    pub max_lat: f64,
    pub max_lon: f64,
}

impl GeoBounds {
    fn from_point(p: GeoPoint) -> Self {
        Self { min_lat: p.lat, min_lon: p.lon, max_lat: p.lat, max_lon: p.lon }
    }

    fn include(&mut self, p: GeoPoint) {
        self.min_lat = self.min_lat.min(p.lat);
        self.min_lon = self.min_lon.min(p.lon);
        self.max_lat = self.max_lat.max(p.lat);
        self.max_lon = self.max_lon.max(p.lon);
    }
}

/// Builder settings. Deserializable so front ends can pass them as JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvelopeOptions {
    /// Factor applied to each sample radius for the emitted disks.
    pub circle_shrink: f64,
}

impl Default for EnvelopeOptions {
    fn default() -> Self {
        Self { circle_shrink: DEFAULT_CIRCLE_SHRINK }
    }
}

/// Geographic shapes for one track.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub strips: Vec<Quad>,
    pub circles: Vec<CircleDescriptor>,
}

impl Envelope {
    pub fn is_empty(&self) -> bool {
        self.strips.is_empty() && self.circles.is_empty()
    }

    /// Box around every strip vertex and every disk, or `None` when empty.
    pub fn bounds(&self) -> Option<GeoBounds> {
        let mut points = self.strips.iter().flatten().copied().chain(self.circles.iter().flat_map(|c| {
            let m = c.center.to_meters();
            [
                (m + PlanarPoint::new(-c.radius, -c.radius)).to_geo(),
                (m + PlanarPoint::new(c.radius, c.radius)).to_geo(),
            ]
        }));
        let mut bounds = GeoBounds::from_point(points.next()?);
        for p in points {
            bounds.include(p);
        }
        Some(bounds)
    }
}

// ── Builder ───────────────────────────────────────────────────────────────────

fn solve_pair(a: &RadiusSample, b: &RadiusSample) -> (SegmentOutcome, Option<[TangentPair; 2]>) {
    if a.lat == b.lat && a.lon == b.lon {
        return (SegmentOutcome::CoincidentCenters, None);
    }
    let c1 = a.position().to_meters();
    let c2 = b.position().to_meters();
    match external_tangents(c1, a.radius, c2, b.radius).as_slice() {
        &[first, second] => (SegmentOutcome::Strip, Some([first, second])),
        _ => (classify_segment(c1, a.radius, c2, b.radius), None),
    }
}

fn resolved_pairs(samples: &[RadiusSample]) -> impl Iterator<Item = [TangentPair; 2]> + '_ {
    samples.windows(2).enumerate().filter_map(|(i, w)| {
        let (outcome, pairs) = solve_pair(&w[0], &w[1]);
        if pairs.is_none() {
            log::trace!("segment {i}->{} skipped: {outcome:?}", i + 1);
        }
        pairs
    })
}

/// Build the envelope with [`EnvelopeOptions::default`].
pub fn build_envelope(samples: &[RadiusSample]) -> Envelope {
    build_envelope_with(samples, &EnvelopeOptions::default())
}

/// Build strips for every consecutive pair that has external tangents and a
/// disk for every sample with a positive radius.
pub fn build_envelope_with(samples: &[RadiusSample], options: &EnvelopeOptions) -> Envelope {
    let strips: Vec<Quad> = resolved_pairs(samples)
        .map(|[a, b]| [a.p1, a.p2, b.p2, b.p1].map(PlanarPoint::to_geo))
        .collect();

    let circles: Vec<CircleDescriptor> = samples
        .iter()
        .filter(|s| s.radius > 0.0)
        .map(|s| CircleDescriptor {
            center: s.position(),
            radius: s.radius * options.circle_shrink,
        })
        .collect();

    log::debug!(
        "envelope: {} samples -> {} strips, {} circles",
        samples.len(),
        strips.len(),
        circles.len()
    );

    Envelope { strips, circles }
}

/// Per consecutive pair, whether it yields a strip and, if not, why.
pub fn segment_outcomes(samples: &[RadiusSample]) -> Vec<SegmentOutcome> {
    samples.windows(2).map(|w| solve_pair(&w[0], &w[1]).0).collect()
}

/// Both tangent sides of every emitted strip, side A then side B.
pub fn tangent_edges(samples: &[RadiusSample]) -> Vec<TangentEdge> {
    resolved_pairs(samples)
        .flat_map(|pairs| pairs.map(|t| [t.p1.to_geo(), t.p2.to_geo()]))
        .collect()
}

// ── Input ─────────────────────────────────────────────────────────────────────

/// Range checks the builder deliberately skips. Reports the first offender.
pub fn validate_samples(samples: &[RadiusSample]) -> Result<()> {
    for (index, s) in samples.iter().enumerate() {
        for (field, v) in [("lat", s.lat), ("lon", s.lon), ("radius", s.radius)] {
            if !v.is_finite() {
                return Err(EnvelopeError::NonFinite { index, field });
            }
        }
        if !(-90.0..=90.0).contains(&s.lat) {
            return Err(EnvelopeError::LatitudeOutOfRange { index, lat: s.lat });
        }
        if !(-180.0..=180.0).contains(&s.lon) {
            return Err(EnvelopeError::LongitudeOutOfRange { index, lon: s.lon });
        }
        if s.radius < 0.0 {
            return Err(EnvelopeError::NegativeRadius { index, radius: s.radius });
        }
    }
    Ok(())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SampleInput {
    List(Vec<RadiusSample>),
    Wrapped { points: Vec<RadiusSample> },
}

/// Decode samples from a bare JSON array or a `{"points": [...]}` object.
pub fn parse_samples(json: &str) -> Result<Vec<RadiusSample>> {
    Ok(match serde_json::from_str(json)? {
        SampleInput::List(points) | SampleInput::Wrapped { points } => points,
    })
}
