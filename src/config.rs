// Configuration file. All measurements in scene units (1 unit ~ 1 cm of the real monument)
// This controls the initial synthesis parameter settings and per-knob slider bounds

pub const INITIAL_SEED: u64 = 7540013318992358421;

// Base massing (units); multiplied by the scale knobs at synthesis time
pub const BASE_WIDTH_UNIT: f32 = 250.0;   // footprint width before scale_x
pub const BASE_DEPTH_UNIT: f32 = 180.0;   // footprint depth before scale_z
pub const BASE_HEIGHT_UNIT: f32 = 100.0;  // base prism height before base_scale
pub const TOTAL_HEIGHT_UNIT: f32 = 720.0; // full tower height before scale_y

// Tier shaping (dimensionless ratios)
pub const TIER_TAPER: f32 = 0.3;       // width/depth lost across the full tier stack
pub const SUB_STEP_TAPER: f32 = 0.1;   // additional taper across one tier's sub-steps
pub const MEDIUM_SUB_STEP_FACTOR: f32 = 0.8;

// Cyclic facade palette, sRGB. Tier color index = (tier + sub-step) mod PALETTE_SIZE
pub const PALETTE_SIZE: usize = 5;
pub const PALETTE: [[f32; 3]; PALETTE_SIZE] = [
    [0.83, 0.53, 0.28], // ochre
    [0.78, 0.42, 0.24], // burnt sienna
    [0.87, 0.64, 0.35], // sandstone
    [0.62, 0.33, 0.22], // laterite
    [0.90, 0.74, 0.48], // pale stucco
];

// Ornament clearance and placement (fractions of the host face span)
pub const COLUMN_EXCLUSION_FRAC: f32 = 0.18; // center band reserved for mini-shrines
pub const COLUMN_FALLBACK_FRAC: f32 = 0.35;  // symmetric pair when exclusion empties the row
pub const COLUMN_MIRROR_FRAC: f32 = 0.4;     // mirrored partner for a single survivor
pub const COLUMN_END_MARGIN_FRAC: f32 = 0.08;
pub const ORNAMENT_INSET_FRAC: f32 = 0.1;    // end margins for bead/pilaster/statue rows
pub const BEAD_SPACING: f32 = 9.0;           // units between beads along a rail
pub const MIN_BEADS_PER_RAIL: usize = 4;
pub const MIN_STATUES_PER_ROW: usize = 3;

// Finial layout
pub const FINIAL_RING_COUNT: usize = 6;
pub const FINIAL_RING_RADIUS: f32 = 26.0;       // apex ring radius (units)
pub const FINIAL_RIDGE_COUNT: usize = 6;        // per wall ridge segment
pub const SECONDARY_FINIAL_COUNT: usize = 4;    // smaller row above the ring
pub const SECONDARY_FINIAL_SPAN: f32 = 52.0;    // fixed span the secondary row interpolates across

// Plinth and base openings
pub const PLINTH_HEIGHT_FRAC: f32 = 0.3;  // of the base prism height
pub const PLINTH_FLARE: f32 = 1.18;       // widest step relative to the base footprint
pub const DOOR_WIDTH_FRAC: f32 = 0.22;    // of base width
pub const DOOR_HEIGHT_FRAC: f32 = 0.55;   // of base height
pub const DOOR_RECESS: f32 = 6.0;         // how deep the opening reads (units)

// Cornices: the profile is re-fitted at these two scales at each tier top
pub const CORNICE_SCALES: [f32; 2] = [1.06, 1.14];
pub const CORNICE_THICKNESS_FRAC: f32 = 0.12; // of the sub-step height

// Profile fitting
pub const PROFILE_SPAN_EPSILON: f32 = 1e-4;  // degenerate bbox threshold
pub const PROFILE_DEDUP_EPSILON: f32 = 1e-5; // consecutive-point merge distance
pub const FALLBACK_STEP_RATIO: f32 = 0.82;   // shrink per concentric fallback step
pub const FALLBACK_COMPLEXITY: usize = 3;

// Complex assembly
pub const CENTRAL_SHRINE_SCALE: f32 = 0.6;
pub const CENTRAL_SHRINE_TIER_CAP: usize = 6;
pub const TOWERS_PER_ENCLOSURE: usize = 4;
pub const WALL_HEIGHT: f32 = 70.0;        // enclosure wall height (units)
pub const GROUND_MARGIN: f32 = 160.0;     // ground slab beyond the outermost wall

// Rebuild cadence (seconds)
pub const REBUILD_DEBOUNCE_SECONDS: f32 = 0.25;
pub const LOD_POLL_SECONDS: f32 = 0.25;

// Slider bounds for one numeric knob. clamp_state() and the UI both read these,
// so a value stored in ParameterState can never leave its declared range.
#[derive(Clone, Copy, Debug)]
pub struct Bounds {
    pub min: f32,
    pub max: f32,
    pub step: f32,
    pub default: f32,
}

pub const SCALE_X: Bounds = Bounds { min: 0.4, max: 2.5, step: 0.05, default: 1.0 };
pub const SCALE_Y: Bounds = Bounds { min: 0.4, max: 2.5, step: 0.05, default: 1.0 };
pub const SCALE_Z: Bounds = Bounds { min: 0.4, max: 2.5, step: 0.05, default: 1.0 };
pub const STRIATIONS: Bounds = Bounds { min: 1.0, max: 16.0, step: 1.0, default: 12.0 };
pub const NOISE_INTENSITY: Bounds = Bounds { min: 0.0, max: 40.0, step: 0.5, default: 6.0 };
pub const BASE_SCALE: Bounds = Bounds { min: 0.5, max: 2.0, step: 0.05, default: 1.0 };
pub const DOOR_HEIGHT_OFFSET: Bounds = Bounds { min: 0.0, max: 0.6, step: 0.01, default: 0.12 };
pub const COLUMN_COUNT: Bounds = Bounds { min: 2.0, max: 12.0, step: 1.0, default: 6.0 };
pub const VISIBLE_TIER_CAP: Bounds = Bounds { min: 1.0, max: 16.0, step: 1.0, default: 15.0 };
pub const WALL_THICKNESS: Bounds = Bounds { min: 4.0, max: 30.0, step: 0.5, default: 12.0 };
pub const WALL_SPACING: Bounds = Bounds { min: 80.0, max: 400.0, step: 5.0, default: 220.0 };
pub const INNER_ENCLOSURES: Bounds = Bounds { min: 0.0, max: 3.0, step: 1.0, default: 1.0 };
pub const SHRINE_PROTRUSION: Bounds = Bounds { min: 0.05, max: 0.45, step: 0.005, default: 0.125 };
pub const SHRINE_COLOR_INDEX: Bounds = Bounds { min: 0.0, max: 4.0, step: 1.0, default: 3.0 };
pub const LOD_NEAR: Bounds = Bounds { min: 100.0, max: 4000.0, step: 25.0, default: 1250.0 };
pub const LOD_FAR: Bounds = Bounds { min: 200.0, max: 6000.0, step: 25.0, default: 2500.0 };
pub const BEAD_DISTANCE: Bounds = Bounds { min: 100.0, max: 3000.0, step: 25.0, default: 900.0 };
