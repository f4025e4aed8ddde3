// distance-gated detail selection. Classification is a pure function of
// (distance, near, far); the caller keeps near < far via
// ParameterState::clamp_with_edit before ever calling in here.

/// Discrete detail tier for one tower instance.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum DetailLevel {
    High,
    Medium,
    Low,
}

/// distance < near => High; near <= distance < far => Medium; else Low.
pub fn classify(distance: f32, lod_near: f32, lod_far: f32) -> DetailLevel {
    debug_assert!(lod_near < lod_far);
    if distance < lod_near {
        DetailLevel::High
    } else if distance < lod_far {
        DetailLevel::Medium
    } else {
        DetailLevel::Low
    }
}

impl DetailLevel {
    // ornament gating; High enables everything, Low strips the tower to
    // its massing plus columns and cornices
    pub fn pilasters(self) -> bool {
        self != DetailLevel::Low
    }

    pub fn niches(self) -> bool {
        self != DetailLevel::Low
    }

    pub fn mini_shrines(self) -> bool {
        self != DetailLevel::Low
    }

    pub fn statues(self) -> bool {
        self == DetailLevel::High
    }

    pub fn stripes(self) -> bool {
        self == DetailLevel::High
    }

    /// Bead rails carry their own enable flag and distance threshold on
    /// top of requiring High detail.
    pub fn beads(self, enabled: bool, distance: f32, bead_distance: f32) -> bool {
        self == DetailLevel::High && enabled && distance < bead_distance
    }

    /// Columns are never dropped entirely, only thinned.
    pub fn column_count(self, requested: usize) -> usize {
        match self {
            DetailLevel::High | DetailLevel::Medium => requested,
            DetailLevel::Low => (requested / 2).max(2),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::systems::mesh::tower::params::{LodBound, ParameterState};

    #[test]
    fn classification_matches_the_band_edges() {
        assert_eq!(classify(0.0, 1250.0, 2500.0), DetailLevel::High);
        assert_eq!(classify(1249.9, 1250.0, 2500.0), DetailLevel::High);
        assert_eq!(classify(1250.0, 1250.0, 2500.0), DetailLevel::Medium);
        assert_eq!(classify(2499.9, 1250.0, 2500.0), DetailLevel::Medium);
        assert_eq!(classify(2500.0, 1250.0, 2500.0), DetailLevel::Low);
        assert_eq!(classify(3000.0, 1250.0, 2500.0), DetailLevel::Low);
    }

    #[test]
    fn inverted_bounds_are_corrected_before_classification() {
        let mut p = ParameterState::default();
        p.lod_near = 3000.0;
        p.lod_far = 1000.0;
        p.clamp_with_edit(Some(LodBound::Near));
        assert!(p.lod_near < p.lod_far);
        // a tower inside the (corrected) near band classifies High
        assert_eq!(classify(100.0, p.lod_near, p.lod_far), DetailLevel::High);
    }

    #[test]
    fn low_detail_strips_dense_ornament_classes() {
        let low = DetailLevel::Low;
        assert!(!low.pilasters());
        assert!(!low.niches());
        assert!(!low.mini_shrines());
        assert!(!low.statues());
        assert!(!low.stripes());
        assert!(!low.beads(true, 0.0, 10_000.0));
        assert_eq!(low.column_count(8), 4);
        assert_eq!(low.column_count(2), 2);
    }

    #[test]
    fn medium_detail_keeps_structure_drops_figures() {
        let medium = DetailLevel::Medium;
        assert!(medium.pilasters());
        assert!(medium.mini_shrines());
        assert!(!medium.statues());
        assert!(!medium.beads(true, 0.0, 10_000.0));
        assert_eq!(medium.column_count(8), 8);
    }

    #[test]
    fn beads_need_high_detail_flag_and_proximity() {
        let high = DetailLevel::High;
        assert!(high.beads(true, 500.0, 900.0));
        assert!(!high.beads(false, 500.0, 900.0));
        assert!(!high.beads(true, 1200.0, 900.0));
    }
}
