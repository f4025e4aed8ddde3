// cross-module scenario tests; the per-module details live next to the
// code they exercise

use bevy::prelude::*;

use crate::config;
use crate::systems::mesh::tower::lod::{self, DetailLevel};
use crate::systems::mesh::tower::noise::NoiseField;
use crate::systems::mesh::tower::params::ParameterState;
use crate::systems::mesh::tower::profile;
use crate::systems::mesh::tower::synth;
use crate::systems::mesh::tower::{Part, Polygon, ShapeKind};

fn footprint_of_base(tree: &crate::systems::mesh::tower::GeometryNode) -> Polygon {
    let mut footprint = None;
    tree.visit_shapes(&mut |spec| {
        if spec.part == Part::Base {
            if let ShapeKind::Prism { footprint: f, .. } = &spec.kind {
                footprint.get_or_insert_with(|| f.clone());
            }
        }
    });
    footprint.expect("tower has a base prism")
}

fn span(polygon: &[Vec2]) -> Vec2 {
    let mut min = Vec2::INFINITY;
    let mut max = Vec2::NEG_INFINITY;
    for p in polygon {
        min = min.min(*p);
        max = max.max(*p);
    }
    max - min
}

// default 29-point profile at unit scales and a 12-tier stack: the real
// profile survives fitting and the base footprint lands on 250 x 180
#[test]
fn default_scene_base_footprint_hits_target() {
    let mut params = ParameterState::default();
    params.scale_x = 1.0;
    params.scale_y = 1.0;
    params.scale_z = 1.0;
    params.striations = 12;
    params.clamp();
    assert_eq!(params.profile.len(), 29);

    let noise = NoiseField::new(config::INITIAL_SEED);
    let tree = synth::build_tower(&params, &noise, DetailLevel::High, true);

    let footprint = footprint_of_base(&tree);
    assert_eq!(footprint.len(), 29, "fallback must not fire for the default profile");
    let s = span(&footprint);
    assert!((s.x - 250.0).abs() <= 250.0 * 0.02, "width {}", s.x);
    assert!((s.y - 180.0).abs() <= 180.0 * 0.02, "depth {}", s.y);
}

// a tower 3000 units away with the default thresholds classifies Low
// and its rebuild omits statue rows and mini-shrines
#[test]
fn far_tower_rebuild_strips_figures_and_shrines() {
    let mut params = ParameterState::default();
    params.lod_near = 1250.0;
    params.lod_far = 2500.0;
    params.clamp();

    let detail = lod::classify(3000.0, params.lod_near, params.lod_far);
    assert_eq!(detail, DetailLevel::Low);

    let noise = NoiseField::new(config::INITIAL_SEED);
    let bead_visible = detail.beads(params.bead_enabled, 3000.0, params.bead_distance);
    let tree = synth::build_tower(&params, &noise, detail, bead_visible);

    assert_eq!(tree.count_part(Part::Statue), 0);
    assert_eq!(tree.count_part(Part::MiniShrine), 0);
    assert!(tree.count_part(Part::Tier) > 0);
}

// hostile parameter state: everything non-finite or absurd still
// produces a tree, because clamping is total and fitting falls back
#[test]
fn synthesis_survives_hostile_state() {
    let mut params = ParameterState::default();
    params.scale_x = f32::NAN;
    params.scale_y = f32::INFINITY;
    params.striations = usize::MAX;
    params.noise_intensity = -1e30;
    params.lod_near = 9e9;
    params.lod_far = -9e9;
    params.profile = vec![Vec2::ZERO; 7];
    params.clamp();

    let noise = NoiseField::new(1);
    let tree = synth::build_complex(&params, &noise, Vec3::ZERO);
    assert!(tree.count_part(Part::Base) > 0);

    // degenerate profile means every prism came from the fallback outline
    let footprint = footprint_of_base(&tree);
    assert!(footprint.len() >= 4);
}

// a full edit-parse-refit cycle through the text codec
#[test]
fn profile_edit_round_trip_reaches_the_tree() {
    let mut params = ParameterState::default();
    let text = profile::serialize_profile(&params.profile);
    params.profile = profile::parse_profile(&text);
    params.clamp();

    let noise = NoiseField::new(config::INITIAL_SEED);
    let tree = synth::build_tower(&params, &noise, DetailLevel::High, false);
    assert_eq!(footprint_of_base(&tree).len(), 29);
}

// moving the viewer across both thresholds changes the classification
// of every perimeter anchor exactly as the band edges dictate
#[test]
fn anchor_classification_tracks_viewer_distance() {
    let mut params = ParameterState::default();
    params.inner_enclosures = 0;
    params.clamp();

    let anchors = synth::tower_anchors(&params);
    assert_eq!(anchors.len(), 4);

    for anchor in &anchors {
        let near_viewer = *anchor + Vec3::new(0.0, 50.0, 0.0);
        let d = near_viewer.distance(*anchor);
        assert_eq!(lod::classify(d, params.lod_near, params.lod_far), DetailLevel::High);

        let far_viewer = *anchor + Vec3::new(0.0, 0.0, params.lod_far + 100.0);
        let d = far_viewer.distance(*anchor);
        assert_eq!(lod::classify(d, params.lod_near, params.lod_far), DetailLevel::Low);
    }
}
