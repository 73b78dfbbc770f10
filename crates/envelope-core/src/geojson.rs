//! GeoJSON (RFC 7946) export for map layers that take plain features.
//! Positions are `[lon, lat]`; disks are approximated by closed rings.

use serde_json::{json, Value};

use crate::envelope::{Envelope, TangentEdge};
use crate::projection::GeoPoint;

fn position(p: &GeoPoint) -> Value {
    json!([p.lon, p.lat])
}

fn closed_ring(points: &[GeoPoint]) -> Value {
    let mut ring: Vec<Value> = points.iter().map(position).collect();
    if points.first() != points.last() {
        if let Some(first) = points.first() {
            ring.push(position(first));
        }
    }
    Value::Array(ring)
}

fn polygon_feature(ring: &[GeoPoint], properties: Value) -> Value {
    json!({
        "type": "Feature",
        "geometry": { "type": "Polygon", "coordinates": [closed_ring(ring)] },
        "properties": properties,
    })
}

/// Strips first, then disks, then the optional tangent edges.
pub fn to_geojson(envelope: &Envelope, circle_segments: usize, edges: &[TangentEdge]) -> Value {
    let strips = envelope
        .strips
        .iter()
        .enumerate()
        .map(|(index, quad)| polygon_feature(quad, json!({ "kind": "strip", "index": index })));

    let circles = envelope.circles.iter().enumerate().map(|(index, c)| {
        polygon_feature(
            &c.ring(circle_segments),
            json!({ "kind": "circle", "index": index, "radius": c.radius }),
        )
    });

    let edges = edges.iter().enumerate().map(|(index, edge)| {
        json!({
            "type": "Feature",
            "geometry": {
                "type": "LineString",
                "coordinates": edge.iter().map(position).collect::<Vec<_>>(),
            },
            "properties": { "kind": "edge", "index": index },
        })
    });

    json!({
        "type": "FeatureCollection",
        "features": strips.chain(circles).chain(edges).collect::<Vec<_>>(),
    })
}
