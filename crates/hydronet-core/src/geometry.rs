// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Planar geometry for nodes and edges, persisted as WKT.
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure to build or parse a geometry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeometryError {
    /// A line string needs at least two vertices.
    #[error("a line string needs at least 2 points, got {0}")]
    TooFewPoints(usize),
    /// Text is not a supported WKT geometry.
    #[error("invalid WKT `{0}`")]
    InvalidWkt(String),
}

/// A 2D point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// X coordinate.
    pub x: f64,
    /// Y coordinate.
    pub y: f64,
}

impl Point {
    /// Point at `(x, y)`.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "POINT ({} {})", self.x, self.y)
    }
}

impl FromStr for Point {
    type Err = GeometryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let body = wkt_body(s, "POINT")?;
        parse_coord(body).ok_or_else(|| GeometryError::InvalidWkt(s.to_owned()))
    }
}

/// A polyline with at least two vertices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineString {
    points: Vec<Point>,
}

impl LineString {
    /// Builds a line string from its vertices.
    pub fn new(points: Vec<Point>) -> Result<Self, GeometryError> {
        if points.len() < 2 {
            return Err(GeometryError::TooFewPoints(points.len()));
        }
        Ok(Self { points })
    }

    /// Straight segment from `a` to `b`.
    pub fn segment(a: Point, b: Point) -> Self {
        Self { points: vec![a, b] }
    }

    /// Vertices in order.
    pub fn points(&self) -> &[Point] {
        &self.points
    }
}

impl fmt::Display for LineString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("LINESTRING (")?;
        for (i, p) in self.points.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{} {}", p.x, p.y)?;
        }
        f.write_str(")")
    }
}

impl FromStr for LineString {
    type Err = GeometryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let body = wkt_body(s, "LINESTRING")?;
        let points = body
            .split(',')
            .map(parse_coord)
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| GeometryError::InvalidWkt(s.to_owned()))?;
        Self::new(points)
    }
}

/// Text between the parentheses of `KIND (...)`, matched case-insensitively.
fn wkt_body<'a>(s: &'a str, kind: &str) -> Result<&'a str, GeometryError> {
    let invalid = || GeometryError::InvalidWkt(s.to_owned());
    let s = s.trim();
    let head = s.get(..kind.len()).ok_or_else(invalid)?;
    if !head.eq_ignore_ascii_case(kind) {
        return Err(invalid());
    }
    s[kind.len()..]
        .trim_start()
        .strip_prefix('(')
        .and_then(|rest| rest.strip_suffix(')'))
        .ok_or_else(invalid)
}

fn parse_coord(text: &str) -> Option<Point> {
    let mut parts = text.split_whitespace();
    let x = parts.next()?.parse().ok()?;
    let y = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some(Point::new(x, y))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn point_wkt_round_trips() {
        let p = Point::new(1.5, -2.0);
        assert_eq!(p.to_string(), "POINT (1.5 -2)");
        assert_eq!("point(1.5 -2)".parse::<Point>().unwrap(), p);
    }

    #[test]
    fn line_string_wkt_round_trips() {
        let line = LineString::segment(Point::new(0.0, 0.0), Point::new(1.0, 2.5));
        let text = line.to_string();
        assert_eq!(text, "LINESTRING (0 0, 1 2.5)");
        assert_eq!(text.parse::<LineString>().unwrap(), line);
    }

    #[test]
    fn rejects_malformed_wkt() {
        assert!("POINT (1)".parse::<Point>().is_err());
        assert!("POINT (1 2 3)".parse::<Point>().is_err());
        assert!("POLYGON ((0 0, 1 1))".parse::<Point>().is_err());
        assert_eq!(
            "LINESTRING (0 0)".parse::<LineString>(),
            Err(GeometryError::TooFewPoints(1))
        );
    }
}
