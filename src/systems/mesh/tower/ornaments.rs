// repeated-ornament placement along tier faces. Every function here is a
// pure function of the host slab's resolved dimensions; the only
// randomness in ornament layout is whatever noise already shaped the slab

use bevy::prelude::*;

use crate::config;
use crate::systems::mesh::tower::tiers::TierDescriptor;
use crate::systems::mesh::tower::{GeometryNode, Part, ShapeKind};

/// Evenly spaced column offsets along a face span, keeping the center
/// band |offset| < 0.18 * span clear for mini-shrines. The clearance can
/// starve the row, so two repair rules keep the guarantee of at least
/// two columns per face:
/// - nothing survives: a symmetric pair at +-0.35 * span
/// - one survives: a mirrored partner at 0.4 * span on the far side
pub fn column_positions(span: f32, count: usize) -> Vec<f32> {
    let half = span * 0.5;
    let margin = span * config::COLUMN_END_MARGIN_FRAC;

    let spaced: Vec<f32> = if count < 2 {
        vec![0.0]
    } else {
        let usable = span - 2.0 * margin;
        (0..count)
            .map(|i| -half + margin + usable * i as f32 / (count - 1) as f32)
            .collect()
    };

    let exclusion = span * config::COLUMN_EXCLUSION_FRAC;
    let mut kept: Vec<f32> = spaced.into_iter().filter(|p| p.abs() >= exclusion).collect();

    match kept.len() {
        0 => {
            let p = span * config::COLUMN_FALLBACK_FRAC;
            kept = vec![-p, p];
        }
        1 => {
            let survivor = kept[0];
            kept.push(-survivor.signum() * span * config::COLUMN_MIRROR_FRAC);
            kept.sort_by(|a, b| a.partial_cmp(b).unwrap());
        }
        _ => {}
    }
    kept
}

/// Evenly spaced offsets with fixed inset margins, for bead rails,
/// pilasters and statue rows. No clearance rule.
pub fn row_positions(span: f32, count: usize) -> Vec<f32> {
    let margin = span * config::ORNAMENT_INSET_FRAC;
    let half = span * 0.5;
    match count {
        0 => Vec::new(),
        1 => vec![0.0],
        n => {
            let usable = span - 2.0 * margin;
            (0..n)
                .map(|i| -half + margin + usable * i as f32 / (n - 1) as f32)
                .collect()
        }
    }
}

pub fn bead_count(span: f32) -> usize {
    ((span / config::BEAD_SPACING) as usize).max(config::MIN_BEADS_PER_RAIL)
}

pub fn statue_count(column_count: usize) -> usize {
    column_count.saturating_sub(2).max(config::MIN_STATUES_PER_ROW)
}

pub fn pilaster_count(column_count: usize) -> usize {
    column_count + 1
}

// a face of the slab: outward normal axis and the span the ornaments run along
struct Face {
    outward: Vec3, // unit, +-X or +-Z
    along: Vec3,   // unit, the axis offsets apply to
    span: f32,     // length of the face
    half_out: f32, // distance from slab center to the face plane
}

fn faces(width: f32, depth: f32) -> [Face; 4] {
    [
        Face { outward: Vec3::Z, along: Vec3::X, span: width, half_out: depth * 0.5 },
        Face { outward: Vec3::NEG_Z, along: Vec3::X, span: width, half_out: depth * 0.5 },
        Face { outward: Vec3::X, along: Vec3::Z, span: depth, half_out: width * 0.5 },
        Face { outward: Vec3::NEG_X, along: Vec3::Z, span: depth, half_out: width * 0.5 },
    ]
}

/// Columns on all four faces, proud of the wall by ~half their radius.
pub fn columns_for_tier(d: &TierDescriptor, count: usize) -> Vec<GeometryNode> {
    let radius = (d.height * 0.1).max(1.0);
    let col_height = d.height * 0.85;
    let mut nodes = Vec::new();
    for face in faces(d.width, d.depth) {
        for offset in column_positions(face.span, count) {
            let pos = face.along * offset
                + face.outward * (face.half_out + radius * 0.5)
                + Vec3::Y * (d.height * 0.5);
            nodes.push(GeometryNode::shape(
                Transform::from_translation(pos),
                ShapeKind::Cylinder { radius, height: col_height },
                d.color_index + 1,
                Part::Column,
            ));
        }
    }
    nodes
}

/// Exactly four mini-shrines, one centered on each face, pushed outward
/// so that (1 - protrusion) of their depth clears the slab wall.
pub fn mini_shrines_for_tier(d: &TierDescriptor, protrusion: f32, color: usize) -> Vec<GeometryNode> {
    let body = Vec3::new(d.width * 0.14, d.height * 0.95, d.width * 0.14);
    let mut nodes = Vec::new();
    for face in faces(d.width, d.depth) {
        let shrine_depth = body.z;
        let center = face.outward * (face.half_out + shrine_depth * (0.5 - protrusion))
            + Vec3::Y * (d.height * 0.5);

        let mut shrine = GeometryNode::group(Transform::from_translation(center));
        shrine.push(GeometryNode::shape(
            Transform::IDENTITY,
            ShapeKind::Box { size: body },
            color,
            Part::MiniShrine,
        ));
        shrine.push(GeometryNode::shape(
            Transform::from_translation(Vec3::Y * (body.y * 0.5 + d.height * 0.12)),
            ShapeKind::Cone { radius: body.x * 0.62, height: d.height * 0.35 },
            color,
            Part::MiniShrine,
        ));
        nodes.push(shrine);
    }
    nodes
}

/// A rail of beads just under the slab's top edge on every face.
pub fn bead_rails_for_tier(d: &TierDescriptor) -> Vec<GeometryNode> {
    let radius = (d.height * 0.05).max(0.8);
    let mut nodes = Vec::new();
    for face in faces(d.width, d.depth) {
        for offset in row_positions(face.span, bead_count(face.span)) {
            let pos = face.along * offset
                + face.outward * (face.half_out + radius * 0.6)
                + Vec3::Y * (d.height * 0.88);
            nodes.push(GeometryNode::shape(
                Transform::from_translation(pos),
                ShapeKind::Sphere { radius },
                d.color_index + 2,
                Part::Bead,
            ));
        }
    }
    nodes
}

/// Flat pilaster strips between the columns.
pub fn pilasters_for_tier(d: &TierDescriptor, column_count: usize) -> Vec<GeometryNode> {
    let size_y = d.height * 0.7;
    let mut nodes = Vec::new();
    for face in faces(d.width, d.depth) {
        let strip = Vec3::new(face.span * 0.02, size_y, face.span * 0.02);
        for offset in row_positions(face.span, pilaster_count(column_count)) {
            let pos = face.along * offset
                + face.outward * (face.half_out + strip.z * 0.25)
                + Vec3::Y * (d.height * 0.5);
            nodes.push(GeometryNode::shape(
                Transform::from_translation(pos),
                ShapeKind::Box { size: strip },
                d.color_index,
                Part::Pilaster,
            ));
        }
    }
    nodes
}

/// Figure row along each face, count derived from the column count.
pub fn statue_row_for_tier(d: &TierDescriptor, column_count: usize) -> Vec<GeometryNode> {
    let height = d.height * 0.45;
    let radius = height * 0.22;
    let mut nodes = Vec::new();
    for face in faces(d.width, d.depth) {
        for offset in row_positions(face.span, statue_count(column_count)) {
            let pos = face.along * offset
                + face.outward * (face.half_out + radius)
                + Vec3::Y * (d.height * 0.28);
            nodes.push(GeometryNode::shape(
                Transform::from_translation(pos),
                ShapeKind::Cylinder { radius, height },
                d.color_index + 3,
                Part::Statue,
            ));
        }
    }
    nodes
}

/// Shallow recessed niches between pilaster positions.
pub fn niche_rows_for_tier(d: &TierDescriptor, column_count: usize) -> Vec<GeometryNode> {
    let niche = Vec3::new(d.width * 0.05, d.height * 0.55, d.width * 0.02);
    let mut nodes = Vec::new();
    for face in faces(d.width, d.depth) {
        for offset in row_positions(face.span, column_count.max(2) - 1) {
            let pos = face.along * offset
                + face.outward * (face.half_out + niche.z * 0.2)
                + Vec3::Y * (d.height * 0.5);
            nodes.push(GeometryNode::shape(
                Transform::from_translation(pos),
                ShapeKind::Box { size: niche },
                d.color_index + 4,
                Part::Niche,
            ));
        }
    }
    nodes
}

/// Two thin horizontal bands wrapping the whole slab.
pub fn stripe_bands_for_tier(d: &TierDescriptor) -> Vec<GeometryNode> {
    let thickness = d.height * 0.06;
    [0.22_f32, 0.74]
        .iter()
        .map(|&frac| {
            GeometryNode::shape(
                Transform::from_translation(Vec3::Y * (d.height * frac)),
                ShapeKind::Box {
                    size: Vec3::new(d.width * 1.01, thickness, d.depth * 1.01),
                },
                d.color_index + 1,
                Part::Stripe,
            )
        })
        .collect()
}

/// Apex cluster: a central pot, a ring of six around it, and a smaller
/// secondary row interpolated across a fixed span above.
pub fn apex_finials(color: usize) -> Vec<GeometryNode> {
    // cone meshes are centered on their origin, so every pot is lifted
    // by half its height to sit on the apex platform
    let mut nodes = vec![GeometryNode::shape(
        Transform::from_translation(Vec3::Y * 17.0),
        ShapeKind::Cone { radius: 9.0, height: 34.0 },
        color,
        Part::Finial,
    )];

    for i in 0..config::FINIAL_RING_COUNT {
        let angle = i as f32 / config::FINIAL_RING_COUNT as f32 * std::f32::consts::TAU;
        let pos = Vec3::new(
            angle.cos() * config::FINIAL_RING_RADIUS,
            10.0,
            angle.sin() * config::FINIAL_RING_RADIUS,
        );
        nodes.push(GeometryNode::shape(
            Transform::from_translation(pos),
            ShapeKind::Cone { radius: 5.0, height: 20.0 },
            color,
            Part::Finial,
        ));
    }

    for i in 0..config::SECONDARY_FINIAL_COUNT {
        let t = i as f32 / (config::SECONDARY_FINIAL_COUNT - 1) as f32;
        let x = -config::SECONDARY_FINIAL_SPAN * 0.5 + config::SECONDARY_FINIAL_SPAN * t;
        nodes.push(GeometryNode::shape(
            Transform::from_translation(Vec3::new(x, 25.0, 0.0)),
            ShapeKind::Cone { radius: 2.6, height: 10.0 },
            color,
            Part::Finial,
        ));
    }

    nodes
}

/// Ridge row for an enclosure wall segment running along local X.
pub fn ridge_finials(length: f32, color: usize) -> Vec<GeometryNode> {
    (0..config::FINIAL_RIDGE_COUNT)
        .map(|i| {
            let t = (i as f32 + 0.5) / config::FINIAL_RIDGE_COUNT as f32;
            GeometryNode::shape(
                Transform::from_translation(Vec3::new(-length * 0.5 + length * t, 8.0, 0.0)),
                ShapeKind::Cone { radius: 4.0, height: 16.0 },
                color,
                Part::Finial,
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::systems::mesh::tower::lod::DetailLevel;
    use crate::systems::mesh::tower::noise::NoiseField;
    use crate::systems::mesh::tower::params::ParameterState;
    use crate::systems::mesh::tower::tiers;

    #[test]
    fn column_rows_never_drop_below_two() {
        for count in 0..12 {
            for span in [40.0_f32, 120.0, 300.0] {
                let positions = column_positions(span, count);
                assert!(positions.len() >= 2, "span {span} count {count}");
            }
        }
    }

    #[test]
    fn column_clearance_band_is_respected() {
        for count in 2..12 {
            let span = 200.0;
            for p in column_positions(span, count) {
                assert!(
                    p.abs() >= span * config::COLUMN_EXCLUSION_FRAC - 1e-4,
                    "count {count}: {p} inside the clearance band"
                );
            }
        }
    }

    #[test]
    fn starved_row_falls_back_to_symmetric_pair() {
        let span = 100.0;
        let positions = column_positions(span, 1);
        assert_eq!(positions.len(), 2);
        assert_eq!(positions[0], -span * config::COLUMN_FALLBACK_FRAC);
        assert_eq!(positions[1], span * config::COLUMN_FALLBACK_FRAC);
    }

    #[test]
    fn exactly_four_mini_shrines_with_seven_eighths_protruding() {
        let d = TierDescriptor {
            tier: 0,
            sub_step: 0,
            width: 200.0,
            depth: 160.0,
            height: 40.0,
            y_offset: 0.0,
            color_index: 0,
            is_top: false,
        };
        let shrines = mini_shrines_for_tier(&d, 0.125, 0);
        assert_eq!(shrines.len(), 4);

        // front-face shrine: embedded depth must be protrusion * body depth
        let front = shrines
            .iter()
            .find(|s| s.transform.translation.z > 0.0 && s.transform.translation.x == 0.0)
            .unwrap();
        let body = d.width * 0.14;
        let inner_edge = front.transform.translation.z - body * 0.5;
        let embedded = d.depth * 0.5 - inner_edge;
        assert!((embedded - 0.125 * body).abs() < 1e-3);
    }

    #[test]
    fn statue_count_floors_at_three() {
        assert_eq!(statue_count(2), 3);
        assert_eq!(statue_count(4), 3);
        assert_eq!(statue_count(9), 7);
    }

    #[test]
    fn bead_count_scales_with_span() {
        assert_eq!(bead_count(10.0), config::MIN_BEADS_PER_RAIL);
        assert!(bead_count(300.0) > bead_count(100.0));
    }

    #[test]
    fn apex_cluster_has_ring_center_and_secondary_row() {
        let cluster = apex_finials(0);
        assert_eq!(
            cluster.len(),
            1 + config::FINIAL_RING_COUNT + config::SECONDARY_FINIAL_COUNT
        );
        let ring: Vec<_> = cluster[1..=config::FINIAL_RING_COUNT].iter().collect();
        for finial in ring {
            let p = finial.transform.translation;
            let r = (p.x * p.x + p.z * p.z).sqrt();
            assert!((r - config::FINIAL_RING_RADIUS).abs() < 1e-3);
        }
    }

    #[test]
    fn ridge_row_spreads_along_the_wall() {
        let row = ridge_finials(400.0, 0);
        assert_eq!(row.len(), config::FINIAL_RIDGE_COUNT);
        assert!(row.iter().all(|n| n.transform.translation.x.abs() < 200.0));
    }

    #[test]
    fn ornament_layout_is_deterministic() {
        let params = ParameterState::default();
        let noise = NoiseField::new(11);
        let a = tiers::compute(&params, &noise, DetailLevel::High);
        let b = tiers::compute(&params, &noise, DetailLevel::High);
        for (da, db) in a.iter().zip(&b) {
            let ca = columns_for_tier(da, params.column_count);
            let cb = columns_for_tier(db, params.column_count);
            assert_eq!(ca.len(), cb.len());
            for (x, y) in ca.iter().zip(&cb) {
                assert_eq!(x.transform.translation, y.transform.translation);
            }
        }
    }
}
