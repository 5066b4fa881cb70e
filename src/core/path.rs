//! SVG path-data generation and line simplification.
//!
//! Every function here is pure: the same points always produce the same
//! path string, so engines and tests consume identical geometry.

use std::fmt::Write;

use serde::{Deserialize, Serialize};

use crate::core::types::Point;

/// Where the vertical riser of a step sits between two samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StepPosition {
    Before,
    #[default]
    After,
    Middle,
}

/// Formats a coordinate with at most two decimals.
#[must_use]
pub fn coord(value: f64) -> String {
    let mut text = format!("{value:.2}");
    if text.contains('.') {
        let trimmed = text.trim_end_matches('0').trim_end_matches('.').len();
        text.truncate(trimmed);
    }
    if text == "-0" { "0".to_owned() } else { text }
}

/// Straight segments through every point.
#[must_use]
pub fn linear_path(points: &[Point]) -> String {
    let mut path = String::with_capacity(points.len() * 16);
    for (index, point) in points.iter().enumerate() {
        let command = if index == 0 { 'M' } else { 'L' };
        let _ = write!(path, "{command}{},{}", coord(point.x), coord(point.y));
    }
    path
}

/// Catmull-Rom spline through the points, emitted as cubic Béziers.
///
/// `tension` in `[0, 1]` scales the tangents; `0.5` is the classic uniform
/// Catmull-Rom curve. Fewer than two points yield an empty path and exactly
/// two points a straight segment.
#[must_use]
pub fn smooth_path(points: &[Point], tension: f64) -> String {
    if points.len() < 2 {
        return String::new();
    }
    if points.len() == 2 {
        return linear_path(points);
    }

    let tension = if tension.is_finite() {
        tension.clamp(0.0, 1.0)
    } else {
        0.5
    };
    let factor = tension / 3.0;
    let last = points.len() - 1;

    let mut path = String::with_capacity(points.len() * 48);
    let _ = write!(path, "M{},{}", coord(points[0].x), coord(points[0].y));
    for index in 0..last {
        let p0 = points[index.saturating_sub(1)];
        let p1 = points[index];
        let p2 = points[index + 1];
        let p3 = points[(index + 2).min(last)];

        let cp1 = Point::new(p1.x + (p2.x - p0.x) * factor, p1.y + (p2.y - p0.y) * factor);
        let cp2 = Point::new(p2.x - (p3.x - p1.x) * factor, p2.y - (p3.y - p1.y) * factor);
        let _ = write!(
            path,
            "C{},{} {},{} {},{}",
            coord(cp1.x),
            coord(cp1.y),
            coord(cp2.x),
            coord(cp2.y),
            coord(p2.x),
            coord(p2.y)
        );
    }
    path
}

/// Staircase path through the points.
#[must_use]
pub fn step_path(points: &[Point], position: StepPosition) -> String {
    let Some(first) = points.first() else {
        return String::new();
    };

    let mut path = String::with_capacity(points.len() * 24);
    let _ = write!(path, "M{},{}", coord(first.x), coord(first.y));
    for pair in points.windows(2) {
        let (from, to) = (pair[0], pair[1]);
        match position {
            StepPosition::Before => {
                let _ = write!(path, "V{}H{}", coord(to.y), coord(to.x));
            }
            StepPosition::After => {
                let _ = write!(path, "H{}V{}", coord(to.x), coord(to.y));
            }
            StepPosition::Middle => {
                let mid = (from.x + to.x) / 2.0;
                let _ = write!(path, "H{}V{}H{}", coord(mid), coord(to.y), coord(to.x));
            }
        }
    }
    path
}

/// Closes a line path down to `baseline_y`, producing a fillable area.
#[must_use]
pub fn close_to_baseline(line_path: &str, points: &[Point], baseline_y: f64) -> String {
    let (Some(first), Some(last)) = (points.first(), points.last()) else {
        return String::new();
    };
    format!(
        "{line_path}L{},{}L{},{}Z",
        coord(last.x),
        coord(baseline_y),
        coord(first.x),
        coord(baseline_y)
    )
}

/// Total polyline length through the points.
#[must_use]
pub fn polyline_length(points: &[Point]) -> f64 {
    points
        .windows(2)
        .map(|pair| (pair[1].x - pair[0].x).hypot(pair[1].y - pair[0].y))
        .sum()
}

/// Distance from `point` to the infinite line through `start` and `end`.
#[must_use]
pub fn perpendicular_distance(point: Point, start: Point, end: Point) -> f64 {
    let dx = end.x - start.x;
    let dy = end.y - start.y;
    let magnitude = dx.hypot(dy);
    if magnitude == 0.0 {
        return (point.x - start.x).hypot(point.y - start.y);
    }
    (dy * point.x - dx * point.y + end.x * start.y - end.y * start.x).abs() / magnitude
}

/// Douglas-Peucker simplification.
///
/// The point farthest from the chord between the segment endpoints splits
/// the segment when its distance exceeds `tolerance`; otherwise the segment
/// collapses to its endpoints. The output is a subsequence of `points` that
/// keeps the first and last point. A non-positive tolerance returns the
/// input unchanged.
#[must_use]
pub fn simplify_path(points: &[Point], tolerance: f64) -> Vec<Point> {
    if points.len() < 3 || !tolerance.is_finite() || tolerance <= 0.0 {
        return points.to_vec();
    }

    let last = points.len() - 1;
    let mut keep = vec![false; points.len()];
    keep[0] = true;
    keep[last] = true;

    // explicit work stack instead of recursion: long series would otherwise
    // recurse once per retained point
    let mut segments = vec![(0_usize, last)];
    while let Some((start, end)) = segments.pop() {
        if end <= start + 1 {
            continue;
        }

        let mut max_distance = 0.0;
        let mut split = start;
        for index in (start + 1)..end {
            let distance = perpendicular_distance(points[index], points[start], points[end]);
            if distance > max_distance {
                max_distance = distance;
                split = index;
            }
        }

        if max_distance > tolerance {
            keep[split] = true;
            segments.push((start, split));
            segments.push((split, end));
        }
    }

    points
        .iter()
        .zip(keep)
        .filter_map(|(point, kept)| kept.then_some(*point))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pts(raw: &[(f64, f64)]) -> Vec<Point> {
        raw.iter().copied().map(Point::from).collect()
    }

    #[test]
    fn coord_trims_trailing_zeros() {
        assert_eq!(coord(10.0), "10");
        assert_eq!(coord(10.5), "10.5");
        assert_eq!(coord(1.005_1), "1.01");
        assert_eq!(coord(-0.001), "0");
    }

    #[test]
    fn step_after_emits_horizontal_then_vertical() {
        let path = step_path(&pts(&[(0.0, 0.0), (10.0, 5.0)]), StepPosition::After);
        assert_eq!(path, "M0,0H10V5");
    }

    #[test]
    fn smooth_path_degenerates_gracefully() {
        assert_eq!(smooth_path(&pts(&[(1.0, 1.0)]), 0.5), "");
        assert_eq!(smooth_path(&pts(&[(0.0, 0.0), (4.0, 4.0)]), 0.5), "M0,0L4,4");
        let curve = smooth_path(&pts(&[(0.0, 0.0), (4.0, 4.0), (8.0, 0.0)]), 0.5);
        assert_eq!(curve.matches('C').count(), 2);
    }

    #[test]
    fn simplify_keeps_the_spike() {
        let input = pts(&[(0.0, 0.0), (1.0, 0.0), (2.0, 10.0), (3.0, 0.0), (4.0, 0.0)]);
        let output = simplify_path(&input, 1.0);
        assert_eq!(output, pts(&[(0.0, 0.0), (2.0, 10.0), (4.0, 0.0)]));

        let flat = pts(&[(0.0, 0.0), (1.0, 0.1), (2.0, -0.1), (3.0, 0.0)]);
        assert_eq!(simplify_path(&flat, 1.0), pts(&[(0.0, 0.0), (3.0, 0.0)]));
    }
}
