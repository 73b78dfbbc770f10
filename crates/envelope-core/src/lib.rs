//! Variable-radius storm envelope geometry.
//!
//! Turns an ordered track of `(lat, lon, radius)` samples into tangent strips
//! and sample disks on a spherical Web-Mercator plane, returned in degrees
//! for a map layer to draw.

pub mod envelope;
pub mod error;
pub mod geojson;
pub mod projection;
pub mod tangent;
pub mod track;

pub use envelope::{
    build_envelope, build_envelope_with, parse_samples, segment_outcomes, tangent_edges,
    validate_samples, CircleDescriptor, Envelope, EnvelopeOptions, GeoBounds, Quad, RadiusSample,
    TangentEdge, DEFAULT_CIRCLE_SHRINK,
};
pub use error::{EnvelopeError, Result};
pub use geojson::to_geojson;
pub use projection::{to_lat_lng, to_meters, GeoPoint, PlanarPoint, EARTH_RADIUS_M};
pub use tangent::{classify_segment, external_tangents, SegmentOutcome, TangentPair};
pub use track::{Track, TrackPoint, TrackStatus};
