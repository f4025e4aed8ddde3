// geometry synthesis: composes profile fitting, tier layout and ornament
// placement into one tower's node tree, and assembles the full walled
// complex out of towers. Owns the tree it returns; consumers only read it.

use bevy::prelude::*;

use crate::config;
use crate::systems::mesh::tower::lod::{self, DetailLevel};
use crate::systems::mesh::tower::noise::NoiseField;
use crate::systems::mesh::tower::ornaments;
use crate::systems::mesh::tower::params::ParameterState;
use crate::systems::mesh::tower::profile;
use crate::systems::mesh::tower::tiers::{self, TierDescriptor};
use crate::systems::mesh::tower::{GeometryNode, Part, ShapeKind};

/// Builds one tower: plinth, profile-fitted base with door recesses,
/// tier stack with detail-gated ornaments and cornices, apex finial
/// cluster. `bead_visible` is resolved by the caller from the bead knobs
/// and the instance's own distance.
pub fn build_tower(
    params: &ParameterState,
    noise: &NoiseField,
    detail: DetailLevel,
    bead_visible: bool,
) -> GeometryNode {
    build_tower_shifted(params, noise, detail, bead_visible, 0)
}

// color_shift rotates the palette; the central shrine uses it so its
// stack reads differently from the gate towers
fn build_tower_shifted(
    params: &ParameterState,
    noise: &NoiseField,
    detail: DetailLevel,
    bead_visible: bool,
    color_shift: usize,
) -> GeometryNode {
    let base_w = params.base_width();
    let base_d = params.base_depth();
    let base_h = params.base_height();
    let plinth_h = base_h * config::PLINTH_HEIGHT_FRAC;

    let mut root = GeometryNode::group(Transform::IDENTITY);
    root.push(plinth(base_w, base_d, plinth_h, color_shift));

    // base prism with its door recesses, seated flush on the plinth
    let footprint = profile::fit(
        &params.profile,
        base_w,
        base_d,
        config::FALLBACK_COMPLEXITY,
        0.0,
    );
    let mut base = GeometryNode::shape(
        Transform::from_translation(Vec3::Y * plinth_h),
        ShapeKind::Prism { footprint, height: base_h },
        color_shift,
        Part::Base,
    );
    push_doors(&mut base, params, base_w, base_d, base_h);
    root.push(base);

    // tier stack
    let descriptors = tiers::compute(params, noise, detail);
    let columns = detail.column_count(params.column_count);
    let mut top_y = plinth_h + base_h;

    for d in &descriptors {
        let slab_base = plinth_h + base_h + d.y_offset;
        let mut slab = GeometryNode::shape(
            Transform::from_translation(Vec3::Y * slab_base),
            ShapeKind::Prism {
                footprint: profile::fit(
                    &params.profile,
                    d.width,
                    d.depth,
                    config::FALLBACK_COMPLEXITY,
                    0.0,
                ),
                height: d.height,
            },
            d.color_index + color_shift,
            Part::Tier,
        );

        attach_ornaments(&mut slab, d, params, detail, bead_visible, columns, color_shift);

        if last_sub_step(d, &descriptors) {
            push_cornices(&mut slab, params, d, color_shift);
        }

        root.push(slab);
        top_y = top_y.max(slab_base + d.height);
    }

    // apex cluster at the accumulated top height
    let mut crown = GeometryNode::group(Transform::from_translation(Vec3::Y * top_y));
    for finial in ornaments::apex_finials(color_shift) {
        crown.push(finial);
    }
    root.push(crown);

    root
}

fn last_sub_step(d: &TierDescriptor, all: &[TierDescriptor]) -> bool {
    !all.iter().any(|o| o.tier == d.tier && o.sub_step == d.sub_step + 1)
}

fn attach_ornaments(
    slab: &mut GeometryNode,
    d: &TierDescriptor,
    params: &ParameterState,
    detail: DetailLevel,
    bead_visible: bool,
    columns: usize,
    color_shift: usize,
) {
    // heavy classes go on the tier's bottom slab, light ones repeat on
    // every sub-step, bead rails trim the tier's top edge
    let bottom_slab = d.sub_step == 0;

    if bottom_slab {
        for node in ornaments::columns_for_tier(d, columns) {
            slab.push(node);
        }
        if detail.mini_shrines() && !d.is_top {
            let shrine_color = params.shrine_color_index + color_shift;
            for node in ornaments::mini_shrines_for_tier(d, params.shrine_protrusion, shrine_color)
            {
                slab.push(node);
            }
        }
        if detail.statues() {
            for node in ornaments::statue_row_for_tier(d, columns) {
                slab.push(node);
            }
        }
        if detail.niches() {
            for node in ornaments::niche_rows_for_tier(d, columns) {
                slab.push(node);
            }
        }
    }

    if detail.pilasters() {
        for node in ornaments::pilasters_for_tier(d, columns) {
            slab.push(node);
        }
    }
    if detail.stripes() {
        for node in ornaments::stripe_bands_for_tier(d) {
            slab.push(node);
        }
    }
    if bead_visible {
        for node in ornaments::bead_rails_for_tier(d) {
            slab.push(node);
        }
    }
}

// stepped platform under the base: body at full flare, three steps
// easing in toward the base footprint, top seating flush at y = height
fn plinth(base_w: f32, base_d: f32, height: f32, color_shift: usize) -> GeometryNode {
    let mut group = GeometryNode::group(Transform::IDENTITY);
    let body_h = height * 0.4;
    let step_h = (height - body_h) / 3.0;

    let mut y = 0.0;
    for (i, part_h) in [body_h, step_h, step_h, step_h].into_iter().enumerate() {
        // flare eases from the full spread down to just proud of the base
        let t = i as f32 / 3.0;
        let flare = config::PLINTH_FLARE + (1.02 - config::PLINTH_FLARE) * t;
        group.push(GeometryNode::shape(
            Transform::from_translation(Vec3::Y * (y + part_h * 0.5)),
            ShapeKind::Box {
                size: Vec3::new(base_w * flare, part_h, base_d * flare),
            },
            color_shift,
            Part::Plinth,
        ));
        y += part_h;
    }
    group
}

fn push_doors(base: &mut GeometryNode, params: &ParameterState, w: f32, d: f32, h: f32) {
    let door_w = w * config::DOOR_WIDTH_FRAC;
    let door_h = h * config::DOOR_HEIGHT_FRAC;
    let lift = params.door_height_offset * door_h;
    for dir in [1.0_f32, -1.0] {
        base.push(GeometryNode::shape(
            Transform::from_translation(Vec3::new(
                0.0,
                lift + door_h * 0.5,
                dir * (d * 0.5 - config::DOOR_RECESS * 0.5),
            )),
            ShapeKind::Box {
                size: Vec3::new(door_w, door_h, config::DOOR_RECESS * 2.0),
            },
            0,
            Part::Door,
        ));
    }
}

fn push_cornices(slab: &mut GeometryNode, params: &ParameterState, d: &TierDescriptor, color_shift: usize) {
    let thickness = d.height * config::CORNICE_THICKNESS_FRAC;
    let mut y = d.height;
    for (i, scale) in config::CORNICE_SCALES.iter().enumerate() {
        slab.push(GeometryNode::shape(
            Transform::from_translation(Vec3::Y * (y + thickness * 0.5)),
            ShapeKind::Prism {
                footprint: profile::fit(
                    &params.profile,
                    d.width * scale,
                    d.depth * scale,
                    config::FALLBACK_COMPLEXITY,
                    0.0,
                ),
                height: thickness,
            },
            d.color_index + color_shift + i,
            Part::Cornice,
        ));
        y += thickness;
    }
}

/// Anchor positions of the tracked (perimeter) towers, for the LOD poll.
pub fn tower_anchors(params: &ParameterState) -> Vec<Vec3> {
    let mut anchors = Vec::new();
    for ring in 0..=params.inner_enclosures {
        let half = enclosure_half_extent(params, ring);
        anchors.push(Vec3::new(0.0, 0.0, half));
        anchors.push(Vec3::new(0.0, 0.0, -half));
        anchors.push(Vec3::new(half, 0.0, 0.0));
        anchors.push(Vec3::new(-half, 0.0, 0.0));
    }
    anchors
}

fn enclosure_half_extent(params: &ParameterState, ring: usize) -> f32 {
    params.base_width().max(params.base_depth()) * 0.5
        + params.wall_spacing * (ring + 1) as f32
}

/// Assembles the whole complex: ground slab, concentric walled
/// enclosures with ridge finials, a gate tower per enclosure face (each
/// classified by its own distance to the viewer) and the scaled central
/// shrine at fixed Medium detail.
pub fn build_complex(
    params: &ParameterState,
    noise: &NoiseField,
    viewer: Vec3,
) -> GeometryNode {
    let mut root = GeometryNode::group(Transform::IDENTITY);

    let outermost = enclosure_half_extent(params, params.inner_enclosures);
    let ground = outermost + config::GROUND_MARGIN;
    root.push(GeometryNode::shape(
        Transform::from_translation(Vec3::Y * -2.0),
        ShapeKind::Box { size: Vec3::new(ground * 2.0, 4.0, ground * 2.0) },
        4,
        Part::Ground,
    ));

    // central shrine: uniform scale-down, capped stack, fixed Medium
    let mut shrine_params = params.clone();
    shrine_params.striations = shrine_params.striations.min(config::CENTRAL_SHRINE_TIER_CAP);
    let mut shrine = build_tower_shifted(
        &shrine_params,
        noise,
        DetailLevel::Medium,
        false,
        params.shrine_color_index,
    );
    shrine.transform = Transform::from_scale(Vec3::splat(config::CENTRAL_SHRINE_SCALE));
    root.push(shrine);

    for ring in 0..=params.inner_enclosures {
        let half = enclosure_half_extent(params, ring);
        push_enclosure_walls(&mut root, params, half);
    }

    for anchor in tower_anchors(params) {
        let distance = viewer.distance(anchor);
        let detail = lod::classify(distance, params.lod_near, params.lod_far);
        let bead_visible = detail.beads(params.bead_enabled, distance, params.bead_distance);
        let mut tower = build_tower(params, noise, detail, bead_visible);
        tower.transform = Transform::from_translation(anchor);
        root.push(tower);
    }

    root
}

fn push_enclosure_walls(root: &mut GeometryNode, params: &ParameterState, half: f32) {
    let t = params.wall_thickness;
    let length = half * 2.0 + t;

    for dir in [1.0_f32, -1.0] {
        // walls running along X, then along Z; ridge rows ride their tops
        for (offset, rotation) in [
            (Vec3::new(0.0, 0.0, dir * half), Quat::IDENTITY),
            (Vec3::new(dir * half, 0.0, 0.0), Quat::from_rotation_y(std::f32::consts::FRAC_PI_2)),
        ] {
            let mut wall = GeometryNode::shape(
                Transform::from_translation(offset + Vec3::Y * (config::WALL_HEIGHT * 0.5))
                    .with_rotation(rotation),
                ShapeKind::Box {
                    size: Vec3::new(length, config::WALL_HEIGHT, t),
                },
                2,
                Part::Wall,
            );
            let mut ridge =
                GeometryNode::group(Transform::from_translation(Vec3::Y * (config::WALL_HEIGHT * 0.5)));
            for finial in ornaments::ridge_finials(length, 2) {
                ridge.push(finial);
            }
            wall.push(ridge);
            root.push(wall);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_state() -> ParameterState {
        let mut p = ParameterState::default();
        p.clamp();
        p
    }

    #[test]
    fn high_detail_tower_carries_every_ornament_class() {
        let params = default_state();
        let noise = NoiseField::new(config::INITIAL_SEED);
        let tree = build_tower(&params, &noise, DetailLevel::High, true);

        for part in [
            Part::Plinth,
            Part::Base,
            Part::Door,
            Part::Tier,
            Part::Cornice,
            Part::Column,
            Part::Pilaster,
            Part::Niche,
            Part::Stripe,
            Part::Statue,
            Part::Bead,
            Part::MiniShrine,
            Part::Finial,
        ] {
            assert!(tree.count_part(part) > 0, "missing {part:?}");
        }
        assert_eq!(tree.count_part(Part::Door), 2);
        assert_eq!(tree.count_part(Part::Plinth), 4); // body + three steps
    }

    #[test]
    fn low_detail_tower_omits_statues_and_mini_shrines() {
        let params = default_state();
        let noise = NoiseField::new(config::INITIAL_SEED);
        let tree = build_tower(&params, &noise, DetailLevel::Low, false);

        assert_eq!(tree.count_part(Part::Statue), 0);
        assert_eq!(tree.count_part(Part::MiniShrine), 0);
        assert_eq!(tree.count_part(Part::Pilaster), 0);
        assert_eq!(tree.count_part(Part::Niche), 0);
        assert_eq!(tree.count_part(Part::Stripe), 0);
        assert_eq!(tree.count_part(Part::Bead), 0);
        // massing and silhouette survive
        assert!(tree.count_part(Part::Tier) > 0);
        assert!(tree.count_part(Part::Cornice) > 0);
        assert!(tree.count_part(Part::Column) > 0);
        assert!(tree.count_part(Part::Finial) > 0);
    }

    #[test]
    fn top_tier_trades_mini_shrines_for_finials() {
        let params = default_state();
        let noise = NoiseField::new(config::INITIAL_SEED);
        let tree = build_tower(&params, &noise, DetailLevel::High, false);

        // 4 shrines per non-top tier, none on the top one; each shrine
        // is a body + roof pair of MiniShrine shapes
        let tiers_with_shrines = params.striations.min(params.visible_tier_cap) - 1;
        assert_eq!(tree.count_part(Part::MiniShrine), tiers_with_shrines * 4 * 2);
    }

    #[test]
    fn complex_spawns_a_gate_tower_per_enclosure_face() {
        let mut params = default_state();
        params.inner_enclosures = 2;
        params.clamp();
        let noise = NoiseField::new(config::INITIAL_SEED);
        let tree = build_complex(&params, &noise, Vec3::new(0.0, 200.0, 2_000.0));

        // 3 rings x 4 gate towers + the central shrine
        assert_eq!(tree.count_part(Part::Base), 13);
        assert_eq!(tower_anchors(&params).len(), 12);
        assert_eq!(tree.count_part(Part::Ground), 1);
        // 4 walls per ring, ridge finials on each
        assert_eq!(tree.count_part(Part::Wall), 12);
        assert!(tree.count_part(Part::Finial) >= 12 * config::FINIAL_RIDGE_COUNT);
    }

    #[test]
    fn distant_viewer_strips_far_gate_towers() {
        let mut params = default_state();
        params.lod_near = 1250.0;
        params.lod_far = 2500.0;
        params.clamp();
        let noise = NoiseField::new(config::INITIAL_SEED);

        // viewer far beyond every anchor: all gate towers classify Low
        let tree = build_complex(&params, &noise, Vec3::new(30_000.0, 0.0, 0.0));
        // only the fixed-Medium central shrine still carries mini-shrines
        let shrine_only = build_tower_shifted(
            &{
                let mut p = params.clone();
                p.striations = p.striations.min(config::CENTRAL_SHRINE_TIER_CAP);
                p
            },
            &noise,
            DetailLevel::Medium,
            false,
            params.shrine_color_index,
        );
        assert_eq!(tree.count_part(Part::MiniShrine), shrine_only.count_part(Part::MiniShrine));
        assert_eq!(tree.count_part(Part::Statue), 0);
    }

    #[test]
    fn shrine_tier_stack_is_capped() {
        let mut params = default_state();
        params.striations = 12;
        params.inner_enclosures = 0;
        params.clamp();
        let noise = NoiseField::new(config::INITIAL_SEED);

        let shrine_params = {
            let mut p = params.clone();
            p.striations = p.striations.min(config::CENTRAL_SHRINE_TIER_CAP);
            p
        };
        let shrine = build_tower(&shrine_params, &noise, DetailLevel::Medium, false);
        let full = build_tower(&params, &noise, DetailLevel::Medium, false);
        assert!(shrine.count_part(Part::Tier) < full.count_part(Part::Tier));
    }

    #[test]
    fn synthesis_is_deterministic_for_a_fixed_seed() {
        let params = default_state();
        let noise = NoiseField::new(99);
        let a = build_complex(&params, &noise, Vec3::splat(500.0));
        let b = build_complex(&params, &noise, Vec3::splat(500.0));
        let mut count_a = 0;
        a.visit_shapes(&mut |_| count_a += 1);
        let mut count_b = 0;
        b.visit_shapes(&mut |_| count_b += 1);
        assert_eq!(count_a, count_b);
    }
}
