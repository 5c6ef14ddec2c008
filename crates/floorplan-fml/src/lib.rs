//! Floorplanner (FML) project export.
//!
//! Produces a single-floor, single-design project document from a
//! [`FloorPlan`]. Coordinates and widths are written in whole centimetres
//! using the plan's [`Units`].

use floorplan_core::geometry;
use floorplan_core::{FloorPlan, Opening, OpeningKind, Units, Wall};
use kurbo::Point;
use serde_json::{Value, json};

/// Storey height written for the floor and every wall, in centimetres.
const STOREY_HEIGHT_CM: i64 = 300;

/// Catalogue id of the door model.
const DOOR_REFID: &str = "e1826";
/// Catalogue id of the window model.
const WINDOW_REFID: &str = "b291deba1c7627783ff4b8cbb41cb11040687507";

/// Wall surface colours.
const DECOR_LEFT: &str = "#e3ddd1";
const DECOR_RIGHT: &str = "#ebdfc7";

/// Export options.
#[derive(Debug, Clone)]
pub struct FmlOptions {
    /// Project name.
    pub name: String,
}

impl Default for FmlOptions {
    fn default() -> Self {
        Self {
            name: "Project".to_string(),
        }
    }
}

/// Build the project document.
pub fn export_fml(plan: &FloorPlan, units: &Units, options: &FmlOptions) -> Value {
    let walls: Vec<Value> = plan
        .walls()
        .iter()
        .enumerate()
        .map(|(index, wall)| {
            let openings: Vec<Value> = plan
                .openings()
                .iter()
                .filter(|o| o.wall == index)
                .map(|o| opening_to_json(o, wall, units))
                .collect();
            wall_to_json(wall, openings, units)
        })
        .collect();

    log::debug!(
        "Exported {} walls and {} openings to FML",
        walls.len(),
        plan.openings().len()
    );

    json!({
        "name": options.name,
        "public": false,
        "floors": [{
            "name": "Ground Floor",
            "level": 0,
            "height": STOREY_HEIGHT_CM,
            "designs": [{
                "name": "Design 1",
                "walls": walls,
                "areas": [],
                "surfaces": [],
                "dimensions": [],
                "items": [],
                "labels": [],
                "lines": []
            }],
            "cameras": []
        }]
    })
}

/// Build the project document as pretty-printed JSON.
pub fn to_string(plan: &FloorPlan, units: &Units, options: &FmlOptions) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&export_fml(plan, units, options))
}

/// File name for an export, optionally prefixed.
pub fn fml_file_name(prefix: &str) -> String {
    if prefix.is_empty() {
        "terv.fml".to_string()
    } else {
        format!("{}_terv.fml", prefix)
    }
}

/// Truncate a world length to whole centimetres.
fn whole_cm(units: &Units, world: f64) -> i64 {
    units.world_to_cm(world) as i64
}

fn point_to_json(point: Point, units: &Units) -> Value {
    json!({ "x": whole_cm(units, point.x), "y": whole_cm(units, point.y) })
}

fn wall_to_json(wall: &Wall, openings: Vec<Value>, units: &Units) -> Value {
    json!({
        "a": point_to_json(wall.start, units),
        "b": point_to_json(wall.end, units),
        "c": null,
        "az": { "z": 0, "h": STOREY_HEIGHT_CM },
        "bz": { "z": 0, "h": STOREY_HEIGHT_CM },
        "thickness": wall.thickness,
        "balance": 0.5,
        "openings": openings,
        "decor": {
            "left": { "color": DECOR_LEFT },
            "right": { "color": DECOR_RIGHT }
        }
    })
}

fn opening_to_json(opening: &Opening, wall: &Wall, units: &Units) -> Value {
    let t = geometry::segment_parameter(opening.center(), wall.start, wall.end);
    let width = whole_cm(units, opening.length());
    match opening.kind {
        OpeningKind::Door => json!({
            "type": "door",
            "refid": DOOR_REFID,
            "width": width,
            "t": t,
            "mirrored": [0, 0],
            "z": 0,
            "z_height": 220
        }),
        OpeningKind::Window => json!({
            "type": "window",
            "refid": WINDOW_REFID,
            "width": width,
            "t": t,
            "mirrored": [0, 0],
            "z": 70,
            "z_height": 150
        }),
    }
}
