//! Conversion between physical lengths (centimetres) and world units.

use serde::{Deserialize, Serialize};

/// Centimetres per inch.
const CM_PER_INCH: f64 = 2.54;

/// Default drawing scale (1:100).
pub const DEFAULT_SCALE: f64 = 100.0;

/// Linear resolution mapping physical centimetres to world units.
///
/// World units are screen pixels at zoom 1, so the resolution depends on the
/// display density and the drawing scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Units {
    /// World units per physical centimetre.
    pub world_per_cm: f64,
}

impl Default for Units {
    fn default() -> Self {
        Self::identity()
    }
}

impl Units {
    /// One world unit per centimetre.
    pub fn identity() -> Self {
        Self { world_per_cm: 1.0 }
    }

    /// Resolution for a display of `dpi` dots per inch at the default 1:100 scale.
    pub fn from_dpi(dpi: f64) -> Self {
        Self::from_dpi_and_scale(dpi, DEFAULT_SCALE)
    }

    /// Resolution for a display of `dpi` dots per inch at a 1:`scale` drawing scale.
    pub fn from_dpi_and_scale(dpi: f64, scale: f64) -> Self {
        Self {
            world_per_cm: dpi / CM_PER_INCH / scale,
        }
    }

    /// Convert centimetres to world units.
    pub fn cm_to_world(&self, cm: f64) -> f64 {
        cm * self.world_per_cm
    }

    /// Convert world units to centimetres.
    pub fn world_to_cm(&self, world: f64) -> f64 {
        world / self.world_per_cm
    }

    /// Round a world coordinate to the nearest multiple of `step_cm` centimetres.
    pub fn round_to_cm_step(&self, world: f64, step_cm: f64) -> f64 {
        let cm = self.world_to_cm(world);
        self.cm_to_world((cm / step_cm).round() * step_cm)
    }
}
