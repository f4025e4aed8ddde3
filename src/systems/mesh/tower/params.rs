use bevy::prelude::*;

use crate::config::{self, Bounds};
use crate::systems::mesh::tower::profile;
use crate::systems::mesh::tower::Polygon;

// which LOD bound the user is currently dragging; the other one yields
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum LodBound {
    Near,
    Far,
}

// tower synthesis parameters
// mutated in place by the UI, re-clamped before every rebuild so the
// stored state is never partially invalid
#[derive(Resource, Clone, Debug)]
pub struct ParameterState {
    pub scale_x: f32,
    pub scale_y: f32,
    pub scale_z: f32,
    pub striations: usize, // outer tier count
    pub noise_intensity: f32,
    pub base_scale: f32,
    pub door_height_offset: f32,
    pub column_count: usize,
    pub visible_tier_cap: usize,
    pub wall_thickness: f32,
    pub wall_spacing: f32,
    pub inner_enclosures: usize,
    pub shrine_protrusion: f32,
    pub shrine_color_index: usize,
    pub lod_near: f32,
    pub lod_far: f32,
    pub bead_enabled: bool,
    pub bead_distance: f32,
    pub profile: Polygon,
}

impl Default for ParameterState {
    fn default() -> Self {
        Self {
            scale_x: config::SCALE_X.default,
            scale_y: config::SCALE_Y.default,
            scale_z: config::SCALE_Z.default,
            striations: config::STRIATIONS.default as usize,
            noise_intensity: config::NOISE_INTENSITY.default,
            base_scale: config::BASE_SCALE.default,
            door_height_offset: config::DOOR_HEIGHT_OFFSET.default,
            column_count: config::COLUMN_COUNT.default as usize,
            visible_tier_cap: config::VISIBLE_TIER_CAP.default as usize,
            wall_thickness: config::WALL_THICKNESS.default,
            wall_spacing: config::WALL_SPACING.default,
            inner_enclosures: config::INNER_ENCLOSURES.default as usize,
            shrine_protrusion: config::SHRINE_PROTRUSION.default,
            shrine_color_index: config::SHRINE_COLOR_INDEX.default as usize,
            lod_near: config::LOD_NEAR.default,
            lod_far: config::LOD_FAR.default,
            bead_enabled: true,
            bead_distance: config::BEAD_DISTANCE.default,
            profile: profile::default_profile(),
        }
    }
}

// non-finite input resolves to the knob default, everything else clamps
fn snap(value: f32, bounds: Bounds) -> f32 {
    if !value.is_finite() {
        bounds.default
    } else {
        value.clamp(bounds.min, bounds.max)
    }
}

fn snap_count(value: usize, bounds: Bounds) -> usize {
    (value as f32).clamp(bounds.min, bounds.max) as usize
}

impl ParameterState {
    /// Total re-validation. After this every numeric field is finite and
    /// inside its declared range, and lod_near < lod_far holds.
    pub fn clamp(&mut self) {
        self.clamp_with_edit(None);
    }

    /// Like [`clamp`](Self::clamp), but when the violation comes from a
    /// live edit of one LOD bound, the bound *not* being edited yields.
    pub fn clamp_with_edit(&mut self, editing: Option<LodBound>) {
        self.scale_x = snap(self.scale_x, config::SCALE_X);
        self.scale_y = snap(self.scale_y, config::SCALE_Y);
        self.scale_z = snap(self.scale_z, config::SCALE_Z);
        self.striations = snap_count(self.striations, config::STRIATIONS);
        self.noise_intensity = snap(self.noise_intensity, config::NOISE_INTENSITY);
        self.base_scale = snap(self.base_scale, config::BASE_SCALE);
        self.door_height_offset = snap(self.door_height_offset, config::DOOR_HEIGHT_OFFSET);
        self.column_count = snap_count(self.column_count, config::COLUMN_COUNT);
        self.visible_tier_cap = snap_count(self.visible_tier_cap, config::VISIBLE_TIER_CAP);
        self.wall_thickness = snap(self.wall_thickness, config::WALL_THICKNESS);
        self.wall_spacing = snap(self.wall_spacing, config::WALL_SPACING);
        self.inner_enclosures = snap_count(self.inner_enclosures, config::INNER_ENCLOSURES);
        self.shrine_protrusion = snap(self.shrine_protrusion, config::SHRINE_PROTRUSION);
        self.shrine_color_index = self.shrine_color_index % config::PALETTE_SIZE;
        self.lod_near = snap(self.lod_near, config::LOD_NEAR);
        self.lod_far = snap(self.lod_far, config::LOD_FAR);
        self.bead_distance = snap(self.bead_distance, config::BEAD_DISTANCE);

        // profile points must be finite; offenders are dropped here and a
        // too-short result is handled by the fitter fallback downstream
        self.profile.retain(|p| p.x.is_finite() && p.y.is_finite());

        // lod_far must stay strictly above lod_near
        if self.lod_near >= self.lod_far {
            match editing {
                Some(LodBound::Near) => {
                    self.lod_far =
                        (self.lod_near + config::LOD_FAR.step).min(config::LOD_FAR.max);
                    // near may sit at the very top of its range; back it off
                    if self.lod_near >= self.lod_far {
                        self.lod_near = self.lod_far - config::LOD_NEAR.step;
                    }
                }
                Some(LodBound::Far) => {
                    self.lod_near =
                        (self.lod_far - config::LOD_NEAR.step).max(config::LOD_NEAR.min);
                    if self.lod_near >= self.lod_far {
                        self.lod_far = self.lod_near + config::LOD_FAR.step;
                    }
                }
                None => {
                    self.lod_far =
                        (self.lod_near + config::LOD_FAR.step).min(config::LOD_FAR.max);
                    if self.lod_near >= self.lod_far {
                        self.lod_near = self.lod_far - config::LOD_NEAR.step;
                    }
                }
            }
        }
        debug_assert!(self.lod_near < self.lod_far);
    }

    pub fn base_width(&self) -> f32 {
        config::BASE_WIDTH_UNIT * self.scale_x
    }

    pub fn base_depth(&self) -> f32 {
        config::BASE_DEPTH_UNIT * self.scale_z
    }

    pub fn base_height(&self) -> f32 {
        config::BASE_HEIGHT_UNIT * self.base_scale
    }

    pub fn total_height(&self) -> f32 {
        config::TOTAL_HEIGHT_UNIT * self.scale_y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_valid(p: &ParameterState) {
        assert!(p.scale_x.is_finite() && (0.4..=2.5).contains(&p.scale_x));
        assert!(p.scale_y.is_finite() && (0.4..=2.5).contains(&p.scale_y));
        assert!(p.scale_z.is_finite() && (0.4..=2.5).contains(&p.scale_z));
        assert!((1..=16).contains(&p.striations));
        assert!(p.noise_intensity.is_finite() && (0.0..=40.0).contains(&p.noise_intensity));
        assert!(p.lod_near.is_finite() && p.lod_far.is_finite());
        assert!(p.lod_near < p.lod_far);
        assert!(p.shrine_color_index < config::PALETTE_SIZE);
    }

    #[test]
    fn defaults_are_already_valid() {
        let mut p = ParameterState::default();
        let before = format!("{p:?}");
        p.clamp();
        assert_eq!(before, format!("{p:?}"));
    }

    #[test]
    fn out_of_range_values_clamp_into_range() {
        let mut p = ParameterState::default();
        p.scale_x = 99.0;
        p.scale_y = -3.0;
        p.striations = 500;
        p.noise_intensity = 1e9;
        p.shrine_color_index = 17;
        p.clamp();
        assert_valid(&p);
        assert_eq!(p.scale_x, 2.5);
        assert_eq!(p.scale_y, 0.4);
        assert_eq!(p.striations, 16);
        assert_eq!(p.shrine_color_index, 17 % config::PALETTE_SIZE);
    }

    #[test]
    fn non_finite_values_fall_back_to_defaults() {
        let mut p = ParameterState::default();
        p.scale_x = f32::NAN;
        p.base_scale = f32::INFINITY;
        p.lod_near = f32::NEG_INFINITY;
        p.clamp();
        assert_valid(&p);
        assert_eq!(p.scale_x, config::SCALE_X.default);
        assert_eq!(p.base_scale, config::BASE_SCALE.default);
    }

    #[test]
    fn non_finite_profile_points_are_dropped() {
        let mut p = ParameterState::default();
        let n = p.profile.len();
        p.profile.push(Vec2::new(f32::NAN, 0.0));
        p.clamp();
        assert_eq!(p.profile.len(), n);
    }

    #[test]
    fn editing_near_pushes_far_up() {
        let mut p = ParameterState::default();
        p.lod_near = 3000.0;
        p.lod_far = 2500.0;
        p.clamp_with_edit(Some(LodBound::Near));
        assert_eq!(p.lod_near, 3000.0);
        assert!(p.lod_far > p.lod_near);
    }

    #[test]
    fn editing_far_pulls_near_down() {
        let mut p = ParameterState::default();
        p.lod_far = 800.0;
        p.lod_near = 1250.0;
        p.clamp_with_edit(Some(LodBound::Far));
        assert_eq!(p.lod_far, 800.0);
        assert!(p.lod_near < p.lod_far);
    }

    #[test]
    fn bound_correction_holds_at_range_extremes() {
        let mut p = ParameterState::default();
        p.lod_near = config::LOD_NEAR.max;
        p.lod_far = config::LOD_NEAR.max;
        p.clamp_with_edit(Some(LodBound::Near));
        assert!(p.lod_near < p.lod_far);

        let mut p = ParameterState::default();
        p.lod_far = config::LOD_FAR.min;
        p.lod_near = config::LOD_FAR.min;
        p.clamp_with_edit(Some(LodBound::Far));
        assert!(p.lod_near < p.lod_far);
    }
}
