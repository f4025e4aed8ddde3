// tier layout: turns the global parameters into the ordered list of
// tier/sub-step slabs the synthesizer extrudes. Pure; all inputs arrive
// pre-clamped, so there are no failure modes here.

use crate::config;
use crate::systems::mesh::tower::lod::DetailLevel;
use crate::systems::mesh::tower::noise::NoiseField;
use crate::systems::mesh::tower::params::ParameterState;

/// One horizontal slab of the tower, ephemeral. `y_offset` is measured
/// from the top of the base prism.
#[derive(Clone, Debug)]
pub struct TierDescriptor {
    pub tier: usize,
    pub sub_step: usize,
    pub width: f32,
    pub depth: f32,
    pub height: f32,
    pub y_offset: f32,
    pub color_index: usize,
    pub is_top: bool,
}

/// Sub-step count for one outer tier before detail gating: 2 or 3,
/// chosen by the noise field so neighboring tiers stay correlated.
fn raw_sub_steps(noise: &NoiseField, tier: usize) -> usize {
    2 + ((noise.sample(tier as f32 * 0.3, 0.0) * 2.0).floor() as usize).min(1)
}

fn gated_sub_steps(noise: &NoiseField, tier: usize, detail: DetailLevel) -> usize {
    let raw = raw_sub_steps(noise, tier);
    match detail {
        DetailLevel::High => raw,
        DetailLevel::Medium => {
            (((raw as f32) * config::MEDIUM_SUB_STEP_FACTOR).round() as usize).max(1)
        }
        DetailLevel::Low => 1,
    }
}

/// Computes the ordered tier/sub-step descriptor sequence. Only the
/// first `visible_tier_cap` outer tiers are realized; later tiers are
/// silently dropped (a reveal mechanism, not an error).
pub fn compute(
    params: &ParameterState,
    noise: &NoiseField,
    detail: DetailLevel,
) -> Vec<TierDescriptor> {
    let tier_count = params.striations.max(1);
    let realized = tier_count.min(params.visible_tier_cap.max(1));

    let base_width = params.base_width();
    let base_depth = params.base_depth();
    let tier_height = (params.total_height() - params.base_height()) / tier_count as f32;

    let mut descriptors = Vec::with_capacity(realized * 3);
    for tier in 0..realized {
        let taper = 1.0 - (tier as f32 / tier_count as f32) * config::TIER_TAPER;
        let sub_steps = gated_sub_steps(noise, tier, detail);
        let step_height = tier_height / sub_steps as f32;

        for sub_step in 0..sub_steps {
            let sub_taper = 1.0 - (sub_step as f32 / sub_steps as f32) * config::SUB_STEP_TAPER;
            let jitter = (noise.sample((tier + sub_step) as f32 * 0.3, sub_step as f32 * 0.17)
                - 0.5)
                * params.noise_intensity
                * 0.5;

            descriptors.push(TierDescriptor {
                tier,
                sub_step,
                width: base_width * taper * sub_taper,
                depth: base_depth * taper * sub_taper,
                height: step_height,
                y_offset: tier as f32 * tier_height + sub_step as f32 * step_height + jitter,
                color_index: (tier + sub_step) % config::PALETTE_SIZE,
                is_top: tier == realized - 1,
            });
        }
    }

    descriptors
}
