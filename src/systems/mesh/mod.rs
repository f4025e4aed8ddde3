// this is the entry point for the temple synthesis plugin: resources,
// events, and the rebuild machinery (debounce, LOD polling, top-level
// rebuild with failure containment)

use std::panic::{catch_unwind, AssertUnwindSafe};

use bevy::prelude::*;

use crate::config;

pub mod mesh_gen;
pub mod temple;
pub mod tower;

use temple::{Temple, TempleAssets};
use tower::lod::{self, DetailLevel};
use tower::noise::NoiseField;
use tower::params::{LodBound, ParameterState};
use tower::synth;

// resources
#[derive(Resource)]
pub struct Seed(pub u64);

#[derive(Resource)]
pub struct NoiseSource(pub NoiseField);

// observable synthesis status; the UI renders it and failures also go
// through the log layer
#[derive(Resource)]
pub struct SynthStatus {
    pub healthy: bool,
    pub message: String,
}

impl Default for SynthStatus {
    fn default() -> Self {
        Self { healthy: true, message: "synthesis ok".into() }
    }
}

// fired by the control surface on every edit; rapid edits coalesce
#[derive(Event)]
pub struct ParamsEdited {
    pub lod_edit: Option<LodBound>,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum RebuildReason {
    Initial,
    ParamChange,
    Refit,
    DetailChange,
    Reseed,
}

// Event for full re-synthesis
#[derive(Event)]
pub struct RebuildEvent {
    pub reason: RebuildReason,
}

// pending edits wait out a short delay so slider drags trigger one rebuild
#[derive(Resource)]
pub struct RebuildDebounce {
    timer: Timer,
    armed: bool,
    lod_edit: Option<LodBound>,
}

impl Default for RebuildDebounce {
    fn default() -> Self {
        Self {
            timer: Timer::from_seconds(config::REBUILD_DEBOUNCE_SECONDS, TimerMode::Once),
            armed: false,
            lod_edit: None,
        }
    }
}

// re-entrancy guard: true from the moment a rebuild is queued until the
// rebuild system has processed it
#[derive(Resource, Default)]
pub struct RebuildPending(pub bool);

// last known per-anchor classification; the poll only fires a rebuild
// when something here actually changes
#[derive(Resource)]
pub struct DetailTracker {
    timer: Timer,
    pub classes: Vec<DetailLevel>,
}

impl Default for DetailTracker {
    fn default() -> Self {
        Self {
            timer: Timer::from_seconds(config::LOD_POLL_SECONDS, TimerMode::Repeating),
            classes: Vec::new(),
        }
    }
}

// main plugin for synthesis
pub struct TempleGenerationPlugin;

impl Plugin for TempleGenerationPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(Seed(config::INITIAL_SEED))
            .insert_resource(NoiseSource(NoiseField::new(config::INITIAL_SEED)))
            .insert_resource(ParameterState::default())
            .insert_resource(SynthStatus::default())
            .insert_resource(RebuildDebounce::default())
            .insert_resource(RebuildPending::default())
            .insert_resource(DetailTracker::default())
            .insert_resource(TempleAssets::default())
            .add_event::<ParamsEdited>()
            .add_event::<RebuildEvent>()
            .add_systems(Startup, initial_build)
            .add_systems(
                Update,
                (tick_debounce, poll_detail_levels, handle_rebuild).chain(),
            );
    }
}

fn initial_build(mut pending: ResMut<RebuildPending>, mut rebuilds: EventWriter<RebuildEvent>) {
    pending.0 = true;
    rebuilds.write(RebuildEvent { reason: RebuildReason::Initial });
}

fn tick_debounce(
    time: Res<Time>,
    mut edits: EventReader<ParamsEdited>,
    mut debounce: ResMut<RebuildDebounce>,
    mut params: ResMut<ParameterState>,
    mut pending: ResMut<RebuildPending>,
    mut rebuilds: EventWriter<RebuildEvent>,
) {
    for edit in edits.read() {
        debounce.armed = true;
        debounce.timer.reset();
        if edit.lod_edit.is_some() {
            debounce.lod_edit = edit.lod_edit;
        }
    }

    if !debounce.armed {
        return;
    }
    debounce.timer.tick(time.delta());
    if !debounce.timer.finished() {
        return;
    }

    debounce.armed = false;
    params.clamp_with_edit(debounce.lod_edit.take());
    if !pending.0 {
        pending.0 = true;
        rebuilds.write(RebuildEvent { reason: RebuildReason::ParamChange });
    }
}

fn poll_detail_levels(
    time: Res<Time>,
    mut tracker: ResMut<DetailTracker>,
    params: Res<ParameterState>,
    camera: Query<&Transform, With<Camera>>,
    mut pending: ResMut<RebuildPending>,
    mut rebuilds: EventWriter<RebuildEvent>,
) {
    tracker.timer.tick(time.delta());
    if !tracker.timer.just_finished() || pending.0 {
        return;
    }
    let Ok(camera_transform) = camera.single() else {
        return;
    };

    let classes = classify_anchors(&params, camera_transform.translation);
    if classes != tracker.classes {
        pending.0 = true;
        rebuilds.write(RebuildEvent { reason: RebuildReason::DetailChange });
    }
}

fn classify_anchors(params: &ParameterState, viewer: Vec3) -> Vec<DetailLevel> {
    synth::tower_anchors(params)
        .iter()
        .map(|anchor| lod::classify(viewer.distance(*anchor), params.lod_near, params.lod_far))
        .collect()
}

fn handle_rebuild(
    mut commands: Commands,
    mut events: EventReader<RebuildEvent>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut params: ResMut<ParameterState>,
    noise: Res<NoiseSource>,
    seed: Res<Seed>,
    mut tracked: ResMut<TempleAssets>,
    mut status: ResMut<SynthStatus>,
    mut pending: ResMut<RebuildPending>,
    mut tracker: ResMut<DetailTracker>,
    roots: Query<Entity, With<Temple>>,
    camera: Query<&Transform, With<Camera>>,
) {
    let mut requested = None;
    for event in events.read() {
        requested = Some(event.reason);
    }
    let Some(reason) = requested else {
        return;
    };

    // invalid values are never surfaced; the state is re-validated
    // before every rebuild
    params.clamp();

    let viewer = camera
        .single()
        .map(|t| t.translation)
        .unwrap_or(Vec3::new(0.0, 600.0, 1400.0));

    let result = catch_unwind(AssertUnwindSafe(|| {
        synth::build_complex(&params, &noise.0, viewer)
    }));

    match result {
        Ok(tree) => {
            // old tree goes away only once the replacement exists
            temple::release_temple(&mut commands, &mut meshes, &mut materials, &mut tracked, &roots);
            temple::spawn_temple(&mut commands, &mut meshes, &mut materials, &mut tracked, &tree, seed.0);
            tracker.classes = classify_anchors(&params, viewer);
            status.healthy = true;
            status.message = format!("synthesis ok ({reason:?})");
            info!("rebuilt temple complex ({reason:?})");
        }
        Err(_) => {
            // keep the previously displayed tree in place
            status.healthy = false;
            status.message = format!("synthesis failed ({reason:?}); showing previous build");
            error!("temple synthesis panicked ({reason:?}); previous tree kept");
        }
    }

    pending.0 = false;
}
