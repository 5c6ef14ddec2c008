//! Editor tolerances and constants.

use crate::units::Units;
use kurbo::{Rect, Size};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: &'static str, value: f64 },
}

/// Tunable constants of the editor.
///
/// Lengths are in centimetres unless the field name says otherwise; they are
/// converted to world units through [`Units`] at the point of use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Physical-to-world resolution.
    pub units: Units,
    /// Wall endpoint / wall line / corner snap tolerance while drawing.
    pub snap_tolerance_cm: f64,
    /// Hit tolerance for walls and openings in edit mode.
    pub edit_tolerance_cm: f64,
    /// Hit tolerance for corners in edit mode.
    pub corner_hit_tolerance_cm: f64,
    /// Wall endpoints closer than this merge into one corner.
    pub corner_merge_tolerance_cm: f64,
    /// Background grid pitch.
    pub grid_pitch_cm: f64,
    /// Sub-grid applied to window and door endpoints.
    pub opening_grid_cm: f64,
    /// Shortest window or door that can be placed.
    pub min_opening_length_cm: f64,
    /// Shortest wall that can be drawn, in world units.
    pub min_wall_length_world: f64,
    /// Direction quantum for committed walls, in degrees.
    pub angle_step_degrees: f64,
    /// Thickness of newly drawn walls.
    pub default_thickness_cm: u32,
    /// Thicknesses the user may select (main wall, partition).
    pub allowed_thicknesses_cm: Vec<u32>,
    /// Side length of the deletion zone, in screen pixels.
    pub delete_zone_size_px: f64,
    /// Distance of the deletion zone from the top-right screen corner, in screen pixels.
    pub delete_zone_margin_px: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            units: Units::default(),
            snap_tolerance_cm: 50.0,
            edit_tolerance_cm: 10.0,
            corner_hit_tolerance_cm: 15.0,
            corner_merge_tolerance_cm: 10.0,
            grid_pitch_cm: 30.0,
            opening_grid_cm: 5.0,
            min_opening_length_cm: 40.0,
            min_wall_length_world: 40.0,
            angle_step_degrees: 5.0,
            default_thickness_cm: 30,
            allowed_thicknesses_cm: vec![30, 10],
            delete_zone_size_px: 140.0,
            delete_zone_margin_px: 50.0,
        }
    }
}

impl EditorConfig {
    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the configuration to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Reject non-positive tolerances and pitches.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("units.world_per_cm", self.units.world_per_cm),
            ("snap_tolerance_cm", self.snap_tolerance_cm),
            ("edit_tolerance_cm", self.edit_tolerance_cm),
            ("corner_hit_tolerance_cm", self.corner_hit_tolerance_cm),
            ("corner_merge_tolerance_cm", self.corner_merge_tolerance_cm),
            ("grid_pitch_cm", self.grid_pitch_cm),
            ("opening_grid_cm", self.opening_grid_cm),
            ("angle_step_degrees", self.angle_step_degrees),
        ];
        for (field, value) in positive {
            if !(value > 0.0 && value.is_finite()) {
                return Err(ConfigError::InvalidValue { field, value });
            }
        }
        Ok(())
    }

    /// Snap tolerance in world units.
    pub fn snap_tolerance(&self) -> f64 {
        self.units.cm_to_world(self.snap_tolerance_cm)
    }

    /// Edit hit tolerance in world units.
    pub fn edit_tolerance(&self) -> f64 {
        self.units.cm_to_world(self.edit_tolerance_cm)
    }

    /// Corner hit tolerance in world units.
    pub fn corner_hit_tolerance(&self) -> f64 {
        self.units.cm_to_world(self.corner_hit_tolerance_cm)
    }

    /// Corner merge tolerance in world units.
    pub fn corner_merge_tolerance(&self) -> f64 {
        self.units.cm_to_world(self.corner_merge_tolerance_cm)
    }

    /// Grid pitch in world units.
    pub fn grid_pitch(&self) -> f64 {
        self.units.cm_to_world(self.grid_pitch_cm)
    }

    /// Whether `thickness_cm` is one of the selectable thicknesses.
    pub fn is_allowed_thickness(&self, thickness_cm: u32) -> bool {
        self.allowed_thicknesses_cm.contains(&thickness_cm)
    }

    /// The deletion hot-zone for a viewport, in screen coordinates.
    ///
    /// It sits in the top-right corner and does not depend on pan or zoom.
    pub fn delete_zone(&self, viewport: Size) -> Rect {
        let right = viewport.width - self.delete_zone_margin_px;
        let top = self.delete_zone_margin_px;
        Rect::new(
            right - self.delete_zone_size_px,
            top,
            right,
            top + self.delete_zone_size_px,
        )
    }
}
