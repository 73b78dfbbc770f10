//! Cyclone track: observed ("past") positions followed by forecast positions.
//! Only forecast points normally carry an uncertainty radius.

use serde::{Deserialize, Serialize};

use crate::envelope::{build_envelope_with, Envelope, EnvelopeOptions, RadiusSample};
use crate::error::Result;
use crate::projection::GeoPoint;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackStatus {
    Past,
    Forecast,
}

/// One fix of a storm track.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackPoint {
    pub id: u32,
    pub lat: f64,
    #[serde(alias = "lng")]
    pub lon: f64,
    pub status: TrackStatus,
    /// Uncertainty radius in metres, 0 when unknown.
    #[serde(default)]
    pub radius: f64,
    /// Maximum sustained wind, km/h.
    #[serde(default)]
    pub vmax: f64,
}

impl TrackPoint {
    pub fn position(&self) -> GeoPoint {
        GeoPoint::new(self.lat, self.lon)
    }

    pub fn sample(&self) -> RadiusSample {
        RadiusSample::new(self.lat, self.lon, self.radius)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub points: Vec<TrackPoint>,
}

impl Track {
    pub fn new(points: Vec<TrackPoint>) -> Self {
        Self { points }
    }

    /// Decode `{"points": [...]}` or a bare array of points.
    pub fn from_json(json: &str) -> Result<Self> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Input {
            List(Vec<TrackPoint>),
            Wrapped(Track),
        }
        Ok(match serde_json::from_str(json)? {
            Input::List(points) => Self { points },
            Input::Wrapped(track) => track,
        })
    }

    /// Index of the first forecast fix.
    pub fn forecast_start(&self) -> Option<usize> {
        self.points.iter().position(|p| p.status == TrackStatus::Forecast)
    }

    /// Start of the track through the first forecast fix, inclusive.
    /// The whole track when nothing is forecast yet.
    pub fn past_path(&self) -> Vec<GeoPoint> {
        let end = self.forecast_start().map_or(self.points.len(), |i| i + 1);
        self.points[..end].iter().map(TrackPoint::position).collect()
    }

    /// First forecast fix to the end; shares its first vertex with [`Track::past_path`].
    pub fn forecast_path(&self) -> Vec<GeoPoint> {
        match self.forecast_start() {
            Some(i) => self.points[i..].iter().map(TrackPoint::position).collect(),
            None => Vec::new(),
        }
    }

    pub fn samples(&self) -> Vec<RadiusSample> {
        self.points.iter().map(TrackPoint::sample).collect()
    }

    pub fn envelope(&self, options: &EnvelopeOptions) -> Envelope {
        build_envelope_with(&self.samples(), options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(id: u32, lat: f64, lon: f64, status: TrackStatus, radius: f64) -> TrackPoint {
        TrackPoint { id, lat, lon, status, radius, vmax: 0.0 }
    }

    fn demo_track() -> Track {
        use TrackStatus::*;
        Track::new(vec![
            point(1, 15.5, 115.5, Past, 0.0),
            point(2, 16.2, 114.0, Past, 0.0),
            point(3, 17.0, 112.5, Past, 0.0),
            point(4, 17.5, 111.0, Past, 0.0),
            point(5, 18.2, 109.8, Forecast, 60_000.0),
            point(6, 19.0, 108.5, Forecast, 80_000.0),
            point(7, 20.2, 107.0, Forecast, 100_000.0),
            point(8, 21.0, 105.8, Forecast, 120_000.0),
        ])
    }

    #[test]
    fn paths_share_joint_vertex() {
        let track = demo_track();
        assert_eq!(track.forecast_start(), Some(4));
        let past = track.past_path();
        let forecast = track.forecast_path();
        assert_eq!(past.len(), 5);
        assert_eq!(forecast.len(), 4);
        assert_eq!(past.last(), forecast.first());
    }

    #[test]
    fn no_forecast_means_all_past() {
        let mut track = demo_track();
        track.points.truncate(4);
        assert_eq!(track.forecast_start(), None);
        assert_eq!(track.past_path().len(), 4);
        assert!(track.forecast_path().is_empty());
    }

    #[test]
    fn empty_track() {
        let track = Track::default();
        assert!(track.past_path().is_empty());
        assert!(track.forecast_path().is_empty());
        assert!(track.envelope(&EnvelopeOptions::default()).is_empty());
    }

    #[test]
    fn envelope_covers_every_segment() {
        let env = demo_track().envelope(&EnvelopeOptions::default());
        assert_eq!(env.strips.len(), 7);
        assert_eq!(env.circles.len(), 4);
    }

    #[test]
    fn decodes_viewer_json() {
        let json = r#"[
            {"id": 1, "lat": 15.5, "lng": 115.5, "status": "past", "radius": 0, "vmax": 60},
            {"id": 5, "lat": 18.2, "lng": 109.8, "status": "forecast", "radius": 60000, "vmax": 80}
        ]"#;
        let track = Track::from_json(json).unwrap();
        assert_eq!(track.points.len(), 2);
        assert_eq!(track.points[1].status, TrackStatus::Forecast);
        assert_eq!(track.points[1].lon, 109.8);

        let wrapped = Track::from_json(r#"{"points": [{"id": 2, "lat": 1, "lon": 2, "status": "past"}]}"#).unwrap();
        assert_eq!(wrapped.points[0].radius, 0.0);
    }
}
