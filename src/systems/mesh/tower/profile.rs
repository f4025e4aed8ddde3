// cross-section profile handling: orientation fitting into a target
// footprint, the stepped fallback outline, and the text codec used by the
// profile editor

use bevy::prelude::*;

use crate::config;
use crate::systems::mesh::tower::Polygon;

/// Computes the signed area of a polygon. Positive for counter-clockwise
/// winding. Returns 0.0 for polygons with fewer than 3 vertices.
pub fn polygon_area(polygon: &[Vec2]) -> f32 {
    if polygon.len() < 3 {
        return 0.0;
    }

    let n = polygon.len();
    let mut area = 0.0;

    for i in 0..n {
        let j = (i + 1) % n;
        area += polygon[i].x * polygon[j].y - polygon[j].x * polygon[i].y;
    }

    area / 2.0
}

/// Determines whether a point is inside a polygon using the ray-casting algorithm.
pub fn point_in_polygon(point: Vec2, polygon: &[Vec2]) -> bool {
    if polygon.len() < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = polygon.len() - 1;

    for i in 0..polygon.len() {
        let yi = polygon[i].y;
        let yj = polygon[j].y;
        let xi = polygon[i].x;
        let xj = polygon[j].x;

        if ((yi > point.y) != (yj > point.y))
            && (point.x < (xj - xi) * (point.y - yi) / (yj - yi) + xi)
        {
            inside = !inside;
        }
        j = i;
    }

    inside
}

fn bounding_box(points: &[Vec2]) -> Option<(Vec2, Vec2)> {
    let mut min = Vec2::INFINITY;
    let mut max = Vec2::NEG_INFINITY;
    for p in points {
        if !p.x.is_finite() || !p.y.is_finite() {
            continue;
        }
        min = min.min(*p);
        max = max.max(*p);
    }
    (min.x <= max.x).then_some((min, max))
}

// drop consecutive coincident points, wrap-around included; the loop is
// implicitly closed, so an explicit closing point collapses into the first
fn dedup_loop(points: &[Vec2]) -> Polygon {
    let mut out: Polygon = Vec::with_capacity(points.len());
    for &p in points {
        if out
            .last()
            .is_none_or(|last| last.distance(p) > config::PROFILE_DEDUP_EPSILON)
        {
            out.push(p);
        }
    }
    while out.len() > 1
        && out[0].distance(*out.last().unwrap()) <= config::PROFILE_DEDUP_EPSILON
    {
        out.pop();
    }
    out
}

/// Fits an arbitrary closed profile into a `target_w` x `target_h`
/// footprint centered on the origin. Tries the profile as drawn and
/// rotated 90 degrees, keeps whichever fills the target better under a
/// uniform (distortion-free) scale. Degenerate input of any kind resolves
/// to [`fallback_outline`]; this never fails.
pub fn fit(
    profile: &[Vec2],
    target_w: f32,
    target_h: f32,
    fallback_complexity: usize,
    inset_fraction: f32,
) -> Polygon {
    let eff_w = target_w * (1.0 - inset_fraction);
    let eff_h = target_h * (1.0 - inset_fraction);

    // a single NaN coordinate would otherwise spread through the
    // transform and the dedup distance chain
    let finite: Polygon = profile
        .iter()
        .copied()
        .filter(|p| p.x.is_finite() && p.y.is_finite())
        .collect();
    let cleaned = dedup_loop(&finite);
    let Some((min, max)) = bounding_box(&cleaned) else {
        return fallback_outline(fallback_complexity, eff_w, eff_h);
    };
    let span = max - min;
    if cleaned.len() < 4
        || span.x < config::PROFILE_SPAN_EPSILON
        || span.y < config::PROFILE_SPAN_EPSILON
    {
        return fallback_outline(fallback_complexity, eff_w, eff_h);
    }

    // uniform scale candidates: as drawn, and rotated a quarter turn
    let direct = (eff_w / span.x).min(eff_h / span.y);
    let swapped = (eff_w / span.y).min(eff_h / span.x);
    let rotate = swapped > direct;
    let scale = direct.max(swapped);

    let center = (min + max) * 0.5;
    let fitted: Polygon = cleaned
        .iter()
        .map(|&p| {
            let q = (p - center) * scale;
            if rotate { Vec2::new(-q.y, q.x) } else { q }
        })
        .collect();

    let fitted = dedup_loop(&fitted);
    if fitted.len() < 4 {
        return fallback_outline(fallback_complexity, eff_w, eff_h);
    }
    fitted
}

/// Synthesizes a symmetric stepped outline filling `width` x `height`,
/// with `complexity` concentric inward steps each shrunk by a fixed
/// ratio from the previous. Always valid, independent of any input.
pub fn fallback_outline(complexity: usize, width: f32, height: f32) -> Polygon {
    let n = complexity.max(1);
    let hw = (width * 0.5).max(config::PROFILE_SPAN_EPSILON);
    let hh = (height * 0.5).max(config::PROFILE_SPAN_EPSILON);
    let r = config::FALLBACK_STEP_RATIO;

    // staircase through quadrant I, from (hw, 0) up to the flat top
    let xs: Vec<f32> = (0..=n).map(|k| hw * r.powi(k as i32)).collect();
    let y_norm = 1.0 - r.powi(n as i32);
    let ys: Vec<f32> = (0..=n)
        .map(|k| hh * (1.0 - r.powi(k as i32)) / y_norm)
        .collect();

    let mut quadrant: Polygon = Vec::with_capacity(2 * n + 1);
    for k in 0..n {
        quadrant.push(Vec2::new(xs[k], ys[k]));
        quadrant.push(Vec2::new(xs[k], ys[k + 1]));
    }
    quadrant.push(Vec2::new(xs[n], ys[n]));

    // mirror into the remaining quadrants, counter-clockwise
    let mut outline: Polygon = quadrant.clone();
    outline.extend(quadrant.iter().rev().map(|p| Vec2::new(-p.x, p.y)));
    outline.extend(quadrant.iter().map(|p| Vec2::new(-p.x, -p.y)));
    outline.extend(quadrant.iter().rev().map(|p| Vec2::new(p.x, -p.y)));

    dedup_loop(&outline)
}

/// The profile the editor starts from: a stepped gopuram plan with door
/// projections, 29 points, bounding box 250 x 180.
pub fn default_profile() -> Polygon {
    [
        (0.0, -90.0),
        (55.0, -90.0),
        (55.0, -82.0),
        (75.0, -82.0),
        (75.0, -74.0),
        (95.0, -74.0),
        (95.0, -66.0),
        (125.0, -66.0),
        (125.0, -20.0),
        (112.0, -20.0),
        (112.0, 20.0),
        (125.0, 20.0),
        (125.0, 66.0),
        (95.0, 66.0),
        (95.0, 78.0),
        (55.0, 78.0),
        (55.0, 90.0),
        (0.0, 90.0),
        (-55.0, 90.0),
        (-55.0, 78.0),
        (-95.0, 78.0),
        (-95.0, 66.0),
        (-125.0, 66.0),
        (-125.0, 0.0),
        (-125.0, -66.0),
        (-95.0, -66.0),
        (-95.0, -78.0),
        (-55.0, -78.0),
        (-55.0, -90.0),
    ]
    .iter()
    .map(|&(x, y)| Vec2::new(x, y))
    .collect()
}

/// Parses profile text, one point per line. Lines are separated by
/// newlines or semicolons; within a line, coordinates split on commas
/// and/or whitespace. Malformed lines and non-finite coordinates are
/// skipped; degeneracy is resolved downstream by the fitter fallback.
pub fn parse_profile(text: &str) -> Polygon {
    let mut points = Polygon::new();
    for line in text.split(['\n', ';']) {
        let mut coords = line
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|t| !t.is_empty())
            .map_while(|t| t.parse::<f32>().ok());
        if let (Some(x), Some(y)) = (coords.next(), coords.next()) {
            if x.is_finite() && y.is_finite() {
                points.push(Vec2::new(x, y));
            }
        }
    }
    points
}

/// Serializes a profile as "x, y" lines at 6 decimal digits;
/// `parse_profile` reproduces the input to 1e-6 per coordinate.
pub fn serialize_profile(points: &[Vec2]) -> String {
    let mut out = String::with_capacity(points.len() * 24);
    for p in points {
        out.push_str(&format!("{:.6}, {:.6}\n", p.x, p.y));
    }
    out
}
