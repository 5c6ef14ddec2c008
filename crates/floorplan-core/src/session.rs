//! The editing state machine.
//!
//! An [`EditSession`] owns the plan, the camera and the persistence store and
//! turns pointer events into model mutations. Single-pointer gestures draw,
//! place or edit depending on the mode; two-pointer gestures pan and zoom.

use crate::camera::Camera;
use crate::config::EditorConfig;
use crate::geometry;
use crate::input::{Pinch, PointerEvent};
use crate::plan::{FloorPlan, Opening, Wall};
use crate::selection::{self, EditTarget};
use crate::snap::SnapEngine;
use crate::storage::{PlanStore, Storage};
use crate::tools::{Mode, ToolKind, ToolState};
use kurbo::{Point, Rect, Size};
use std::sync::Arc;

/// Interactive editing session over a floor plan.
pub struct EditSession<S: Storage> {
    config: EditorConfig,
    plan: FloorPlan,
    camera: Camera,
    store: PlanStore<S>,
    tool: ToolKind,
    mode: Mode,
    /// Thickness of the next wall, in centimetres.
    thickness: u32,
    viewport: Size,
    tool_state: ToolState,
    target: EditTarget,
    /// Last edit sample in world coordinates.
    last_sample: Option<Point>,
    pinch: Option<Pinch>,
    /// Set when a pinch ends while a pointer stays down; the next move only re-anchors.
    resync: bool,
    /// Length of the edited element in centimetres.
    length_readout: Option<f64>,
}

impl<S: Storage> EditSession<S> {
    /// Create a session and load the stored plan.
    pub fn new(config: EditorConfig, storage: Arc<S>) -> Self {
        let mut store = PlanStore::new(storage);
        let loaded = store.load();
        if loaded.recovered {
            log::warn!("Stored plan was partially unreadable; continuing with what could be loaded");
        }
        let plan = FloorPlan::from_parts(
            loaded.walls,
            loaded.openings,
            config.corner_merge_tolerance(),
        );
        log::debug!(
            "Loaded plan with {} walls and {} openings",
            plan.walls().len(),
            plan.openings().len()
        );

        let tool = ToolKind::default();
        Self {
            thickness: config.default_thickness_cm,
            config,
            plan,
            camera: Camera::new(),
            store,
            tool,
            mode: tool.mode(),
            viewport: Size::ZERO,
            tool_state: ToolState::Idle,
            target: EditTarget::None,
            last_sample: None,
            pinch: None,
            resync: false,
            length_readout: None,
        }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn plan(&self) -> &FloorPlan {
        &self.plan
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn tool(&self) -> ToolKind {
        self.tool
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Thickness of the next wall, in centimetres.
    pub fn wall_thickness(&self) -> u32 {
        self.thickness
    }

    pub fn viewport(&self) -> Size {
        self.viewport
    }

    /// The active edit target.
    pub fn edit_target(&self) -> EditTarget {
        self.target
    }

    /// Whether the last save failed or has not happened yet.
    pub fn has_unsaved_changes(&self) -> bool {
        self.store.is_dirty()
    }

    pub fn screen_to_world(&self, point: Point) -> Point {
        self.camera.screen_to_world(point)
    }

    pub fn world_to_screen(&self, point: Point) -> Point {
        self.camera.world_to_screen(point)
    }

    /// The deletion hot-zone in screen coordinates.
    pub fn delete_zone(&self) -> Rect {
        self.config.delete_zone(self.viewport)
    }

    /// The segment being drawn or placed, in world coordinates.
    pub fn draw_preview(&self) -> Option<(Point, Point)> {
        self.tool_state.segment()
    }

    /// Length of the segment being drawn or placed, in centimetres.
    ///
    /// Openings long enough to be placed read in whole sub-grid steps.
    pub fn preview_length_cm(&self) -> Option<f64> {
        let (start, end) = self.tool_state.segment()?;
        let cm = self.config.units.world_to_cm(geometry::distance(start, end));
        if self.mode.opening_kind().is_some() && cm >= self.config.min_opening_length_cm {
            let step = self.config.opening_grid_cm;
            Some((cm / step).round() * step)
        } else {
            Some(cm)
        }
    }

    /// Length of the element being edited, in centimetres.
    pub fn length_readout_cm(&self) -> Option<f64> {
        self.length_readout
    }

    /// Select a drawing tool. This also leaves edit mode.
    pub fn set_tool(&mut self, tool: ToolKind) {
        self.tool = tool;
        self.mode = tool.mode();
        self.clear_transient();
    }

    /// Flip between editing and idle.
    pub fn toggle_edit_mode(&mut self) {
        self.mode = if self.mode == Mode::Editing {
            Mode::Idle
        } else {
            Mode::Editing
        };
        self.clear_transient();
    }

    /// Set the thickness of subsequently drawn walls.
    ///
    /// Returns `false` and keeps the current thickness if the value is not selectable.
    pub fn set_wall_thickness(&mut self, thickness_cm: u32) -> bool {
        if !self.config.is_allowed_thickness(thickness_cm) {
            log::warn!("Ignoring unsupported wall thickness {} cm", thickness_cm);
            return false;
        }
        self.thickness = thickness_cm;
        true
    }

    pub fn set_viewport(&mut self, viewport: Size) {
        self.viewport = viewport;
    }

    /// Remove every wall and opening and persist the empty plan.
    pub fn clear_all(&mut self) {
        self.plan.clear();
        self.mode = Mode::Idle;
        self.clear_transient();
        self.persist();
    }

    /// Dispatch a pointer event.
    pub fn handle_pointer_event(&mut self, event: &PointerEvent) {
        match event {
            PointerEvent::Cancel => self.cancel_gesture(),
            PointerEvent::Down { positions } | PointerEvent::Move { positions }
                if positions.len() >= 2 =>
            {
                self.pinch_move(positions[0], positions[1]);
            }
            PointerEvent::Up { positions } if positions.len() >= 2 => self.end_pinch(),
            PointerEvent::Down { .. } | PointerEvent::Move { .. } | PointerEvent::Up { .. } => {
                let Some(position) = event.primary() else {
                    return;
                };
                match event {
                    PointerEvent::Down { .. } => self.pointer_down(position),
                    PointerEvent::Move { .. } => self.pointer_move(position),
                    _ => self.pointer_up(position),
                }
            }
        }
    }

    /// Single pointer went down at a screen position.
    pub fn pointer_down(&mut self, screen: Point) {
        self.pinch = None;
        self.resync = false;
        let world = self.camera.screen_to_world(screen);
        match self.mode {
            Mode::Editing => self.begin_edit(world),
            mode if mode.is_drawing() => self.begin_draw(world),
            _ => {}
        }
    }

    /// Single pointer moved to a screen position.
    pub fn pointer_move(&mut self, screen: Point) {
        if self.pinch.is_some() {
            return;
        }
        let world = self.camera.screen_to_world(screen);
        if self.resync {
            self.resync = false;
            if self.last_sample.is_some() {
                self.last_sample = Some(world);
            }
            return;
        }
        match self.mode {
            Mode::Editing => self.update_edit(world),
            mode if mode.is_drawing() => self.update_draw(world),
            _ => {}
        }
    }

    /// Single pointer lifted at a screen position.
    pub fn pointer_up(&mut self, screen: Point) {
        self.pinch = None;
        self.resync = false;
        match self.mode {
            Mode::Editing => self.release_edit(screen),
            mode if mode.is_drawing() => {
                let world = self.camera.screen_to_world(screen);
                self.commit_draw(world);
            }
            _ => {}
        }
    }

    fn pinch_move(&mut self, a: Point, b: Point) {
        match self.pinch.as_mut() {
            Some(pinch) => pinch.update(a, b, &mut self.camera),
            None => {
                if self.tool_state.is_active() {
                    log::debug!("Pinch started; discarding draw gesture");
                    self.tool_state = ToolState::Idle;
                }
                self.pinch = Some(Pinch::begin(a, b));
            }
        }
    }

    fn end_pinch(&mut self) {
        if self.pinch.take().is_some() {
            self.resync = true;
        }
    }

    fn cancel_gesture(&mut self) {
        self.tool_state = ToolState::Idle;
        self.pinch = None;
        self.resync = false;
        if self.target.is_structural() {
            self.plan.rebuild_topology();
        }
        self.target = EditTarget::None;
        self.last_sample = None;
        self.length_readout = None;
    }

    fn clear_transient(&mut self) {
        self.tool_state = ToolState::Idle;
        self.target = EditTarget::None;
        self.last_sample = None;
        self.pinch = None;
        self.resync = false;
        self.length_readout = None;
    }

    /// Snap a draw or place point for the current mode.
    fn resolve_draw_point(&self, world: Point) -> Point {
        let engine = SnapEngine::new(&self.config);
        if self.mode == Mode::DrawWall {
            engine
                .resolve_wall_point(world, self.plan.walls(), self.plan.corners())
                .point
        } else {
            engine.snap_to_opening_grid(world).point
        }
    }

    fn begin_draw(&mut self, world: Point) {
        let start = self.resolve_draw_point(world);
        self.tool_state = ToolState::Active {
            start,
            current: start,
        };
    }

    fn update_draw(&mut self, world: Point) {
        if !self.tool_state.is_active() {
            return;
        }
        let point = self.resolve_draw_point(world);
        if let ToolState::Active { current, .. } = &mut self.tool_state {
            *current = point;
        }
    }

    fn commit_draw(&mut self, world: Point) {
        let ToolState::Active { start, .. } = std::mem::take(&mut self.tool_state) else {
            return;
        };
        let end = self.resolve_draw_point(world);

        match self.mode.opening_kind() {
            None => self.commit_wall(start, end),
            Some(kind) => {
                let engine = SnapEngine::new(&self.config);
                let Some(host) = engine.find_host_wall(start, end, self.plan.walls()) else {
                    log::debug!("Discarding opening: no wall near both ends");
                    return;
                };
                let Some(wall) = self.plan.wall(host) else {
                    return;
                };
                let start = engine.snap_onto_wall(start, wall);
                let end = engine.snap_onto_wall(end, wall);

                let min_length = self.config.units.cm_to_world(self.config.min_opening_length_cm);
                if geometry::distance(start, end) < min_length {
                    log::debug!("Discarding opening shorter than {} cm", self.config.min_opening_length_cm);
                    return;
                }
                if self.plan.add_opening(Opening::new(start, end, kind, host)).is_some() {
                    log::debug!("Placed {:?} on wall {}", kind, host);
                    self.persist();
                }
            }
        }
    }

    fn commit_wall(&mut self, start: Point, end: Point) {
        if geometry::distance(start, end) <= self.config.min_wall_length_world {
            log::debug!("Discarding wall shorter than {} units", self.config.min_wall_length_world);
            return;
        }
        let snapped = SnapEngine::new(&self.config).snap_wall_direction(start, end);
        let index = self.plan.add_wall(Wall::new(start, snapped.point, self.thickness));
        log::debug!(
            "Committed wall {} at {:.0} degrees, {:.1} units",
            index,
            snapped.angle_degrees,
            snapped.distance
        );
        self.persist();
    }

    fn begin_edit(&mut self, world: Point) {
        self.target = selection::resolve_edit_target(world, &self.plan, &self.config);
        self.last_sample = Some(world);
        self.length_readout = self.target_length_cm();
    }

    fn update_edit(&mut self, world: Point) {
        let Some(last) = self.last_sample.replace(world) else {
            return;
        };
        if self.target.is_none() {
            return;
        }
        let delta = world - last;
        let engine = SnapEngine::new(&self.config);

        match self.target {
            EditTarget::None => {}
            EditTarget::WallWhole(i) => {
                if let Some(wall) = self.plan.wall_mut(i) {
                    wall.translate(delta);
                }
            }
            EditTarget::WallEndpoint(i, end) => {
                if let Some(wall) = self.plan.wall_mut(i) {
                    *wall.endpoint_mut(end) += delta;
                }
            }
            EditTarget::OpeningWhole(i) => {
                let Some(host) = self.host_wall(i) else {
                    return;
                };
                if let Some(opening) = self.plan.opening_mut(i) {
                    let half = (opening.end - opening.start) / 2.0;
                    let center =
                        engine.slide_onto_wall(opening.center() + delta, half.hypot(), &host);
                    opening.start = center - half;
                    opening.end = center + half;
                }
            }
            EditTarget::OpeningEndpoint(i, end) => {
                let Some(host) = self.host_wall(i) else {
                    return;
                };
                if let Some(opening) = self.plan.opening_mut(i) {
                    let moved = opening.endpoint(end) + delta;
                    *opening.endpoint_mut(end) = engine.snap_onto_wall(moved, &host);
                }
            }
            EditTarget::Corner(i) => {
                self.plan.move_corner(i, delta, self.config.edit_tolerance());
            }
        }

        self.length_readout = self.target_length_cm();
        self.persist();
    }

    fn release_edit(&mut self, screen: Point) {
        let target = std::mem::take(&mut self.target);
        if !target.is_none() && self.delete_zone().contains(screen) {
            self.delete_target(target);
            self.persist();
        }
        if target.is_structural() {
            self.plan.rebuild_topology();
        }
        self.last_sample = None;
        self.length_readout = None;
    }

    fn delete_target(&mut self, target: EditTarget) {
        match target {
            EditTarget::None => {}
            EditTarget::OpeningWhole(i) | EditTarget::OpeningEndpoint(i, _) => {
                if self.plan.remove_opening(i).is_some() {
                    log::debug!("Deleted opening {}", i);
                }
            }
            EditTarget::WallWhole(i) | EditTarget::WallEndpoint(i, _) => {
                if self.plan.remove_wall(i).is_some() {
                    log::debug!("Deleted wall {}", i);
                }
            }
            EditTarget::Corner(i) => {
                let removed = self.plan.remove_corner(i);
                log::debug!("Deleted corner {} with {} walls", i, removed.len());
            }
        }
    }

    fn host_wall(&self, opening: usize) -> Option<Wall> {
        let host = self.plan.opening(opening)?.wall;
        self.plan.wall(host).cloned()
    }

    fn target_length_cm(&self) -> Option<f64> {
        let length = match self.target {
            EditTarget::None => return None,
            EditTarget::WallWhole(i) | EditTarget::WallEndpoint(i, _) => self.plan.wall(i)?.length(),
            EditTarget::OpeningWhole(i) | EditTarget::OpeningEndpoint(i, _) => {
                self.plan.opening(i)?.length()
            }
            EditTarget::Corner(i) => {
                let first = *self.plan.corner(i)?.walls.first()?;
                self.plan.wall(first)?.length()
            }
        };
        Some(self.config.units.world_to_cm(length))
    }

    fn persist(&mut self) {
        if let Err(e) = self.store.save(self.plan.walls(), self.plan.openings()) {
            log::warn!("Failed to save plan: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::{OpeningKind, SegmentEnd};
    use crate::storage::{MemoryStorage, StorageError, StorageResult};
    use kurbo::Vec2;

    fn assert_near(actual: Point, expected: Point) {
        assert!(
            (actual - expected).hypot() < 1e-9,
            "expected {:?}, got {:?}",
            expected,
            actual
        );
    }

    fn wall(x1: f64, y1: f64, x2: f64, y2: f64) -> Wall {
        Wall::new(Point::new(x1, y1), Point::new(x2, y2), 30)
    }

    fn opening(x1: f64, y1: f64, x2: f64, y2: f64, host: usize) -> Opening {
        Opening::new(Point::new(x1, y1), Point::new(x2, y2), OpeningKind::Window, host)
    }

    fn session() -> EditSession<MemoryStorage> {
        EditSession::new(EditorConfig::default(), Arc::new(MemoryStorage::new()))
    }

    fn session_with(walls: Vec<Wall>, openings: Vec<Opening>) -> EditSession<MemoryStorage> {
        let storage = Arc::new(MemoryStorage::new());
        PlanStore::new(storage.clone()).save(&walls, &openings).unwrap();
        let mut session = EditSession::new(EditorConfig::default(), storage);
        session.set_viewport(Size::new(1000.0, 800.0));
        session
    }

    fn drag(session: &mut EditSession<MemoryStorage>, from: Point, to: Point) {
        session.pointer_down(from);
        session.pointer_move(to);
        session.pointer_up(to);
    }

    /// A point inside the deletion zone of a 1000x800 viewport.
    const TRASH: Point = Point::new(880.0, 120.0);

    #[test]
    fn test_starts_in_wall_mode() {
        let session = session();
        assert_eq!(session.tool(), ToolKind::Wall);
        assert_eq!(session.mode(), Mode::DrawWall);
        assert_eq!(session.wall_thickness(), 30);
        assert!(session.plan().is_empty());
    }

    #[test]
    fn test_draw_wall_snaps_direction_and_keeps_length() {
        let config = EditorConfig {
            grid_pitch_cm: 1.0,
            ..EditorConfig::default()
        };
        let mut session = EditSession::new(config, Arc::new(MemoryStorage::new()));

        drag(&mut session, Point::new(0.0, 0.0), Point::new(123.0, 4.0));

        let walls = session.plan().walls();
        assert_eq!(walls.len(), 1);
        let length = (123.0f64 * 123.0 + 4.0 * 4.0).sqrt();
        assert_near(walls[0].start, Point::ZERO);
        assert_near(walls[0].end, Point::new(length, 0.0));
        assert!((walls[0].length() - 123.065).abs() < 1e-3);
        assert!(!session.has_unsaved_changes());
    }

    #[test]
    fn test_short_wall_discarded() {
        let mut session = session();
        drag(&mut session, Point::new(0.0, 0.0), Point::new(30.0, 0.0));
        assert!(session.plan().walls().is_empty());
        assert!(session.draw_preview().is_none());
    }

    #[test]
    fn test_draw_preview_and_readout() {
        let mut session = session();
        session.pointer_down(Point::new(2.0, 1.0));
        session.pointer_move(Point::new(92.0, 3.0));
        assert_eq!(
            session.draw_preview(),
            Some((Point::new(0.0, 0.0), Point::new(90.0, 0.0)))
        );
        assert!((session.preview_length_cm().unwrap() - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_wall_end_snaps_to_existing_endpoint() {
        let mut session = session_with(vec![wall(0.0, 0.0, 300.0, 0.0)], vec![]);
        session.set_tool(ToolKind::Wall);
        // Starts 20 units off the end of the first wall.
        drag(&mut session, Point::new(310.0, 17.0), Point::new(300.0, 240.0));
        let walls = session.plan().walls();
        assert_eq!(walls.len(), 2);
        assert_near(walls[1].start, Point::new(300.0, 0.0));
        assert_near(walls[1].end, Point::new(300.0, 240.0));
        assert_eq!(session.plan().corners().len(), 3);
    }

    #[test]
    fn test_wall_thickness_selection() {
        let mut session = session();
        assert!(!session.set_wall_thickness(25));
        assert_eq!(session.wall_thickness(), 30);
        assert!(session.set_wall_thickness(10));

        drag(&mut session, Point::new(0.0, 0.0), Point::new(120.0, 0.0));
        assert_eq!(session.plan().walls()[0].thickness, 10);
    }

    #[test]
    fn test_place_window_on_wall() {
        let mut session = session_with(vec![wall(0.0, 0.0, 300.0, 0.0)], vec![]);
        session.set_tool(ToolKind::Window);

        drag(&mut session, Point::new(60.0, 8.0), Point::new(180.0, -6.0));

        let openings = session.plan().openings();
        assert_eq!(openings.len(), 1);
        assert_eq!(openings[0].kind, OpeningKind::Window);
        assert_eq!(openings[0].wall, 0);
        assert_near(openings[0].start, Point::new(60.0, 0.0));
        assert_near(openings[0].end, Point::new(180.0, 0.0));
    }

    #[test]
    fn test_place_door_picks_nearest_wall() {
        let mut session = session_with(
            vec![wall(0.0, 0.0, 300.0, 0.0), wall(0.0, 40.0, 300.0, 40.0)],
            vec![],
        );
        session.set_tool(ToolKind::Door);

        drag(&mut session, Point::new(100.0, 30.0), Point::new(200.0, 30.0));

        let openings = session.plan().openings();
        assert_eq!(openings.len(), 1);
        assert_eq!(openings[0].kind, OpeningKind::Door);
        assert_eq!(openings[0].wall, 1);
        assert_near(openings[0].start, Point::new(100.0, 40.0));
    }

    #[test]
    fn test_short_opening_discarded() {
        let mut session = session_with(vec![wall(0.0, 0.0, 300.0, 0.0)], vec![]);
        session.set_tool(ToolKind::Window);

        // 35 units after snapping.
        drag(&mut session, Point::new(60.0, 0.0), Point::new(96.0, 0.0));
        assert!(session.plan().openings().is_empty());

        // 98 rounds up to 100, giving exactly the minimum.
        drag(&mut session, Point::new(60.0, 0.0), Point::new(98.0, 0.0));
        assert_eq!(session.plan().openings().len(), 1);
        assert!((session.plan().openings()[0].length() - 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_opening_away_from_walls_discarded() {
        let mut session = session_with(vec![wall(0.0, 0.0, 300.0, 0.0)], vec![]);
        session.set_tool(ToolKind::Window);
        drag(&mut session, Point::new(60.0, 10.0), Point::new(180.0, 90.0));
        assert!(session.plan().openings().is_empty());
    }

    #[test]
    fn test_opening_preview_rounds_to_sub_grid() {
        let mut session = session_with(vec![wall(0.0, 0.0, 300.0, 0.0)], vec![]);
        session.set_tool(ToolKind::Window);
        session.pointer_down(Point::new(0.0, 0.0));
        session.pointer_move(Point::new(43.0, 0.0));
        assert!((session.preview_length_cm().unwrap() - 45.0).abs() < 1e-9);
    }

    #[test]
    fn test_move_corner_moves_coincident_endpoints() {
        let mut session = session_with(
            vec![wall(0.0, 0.0, 300.0, 0.0), wall(300.0, 0.0, 300.0, 240.0)],
            vec![],
        );
        session.toggle_edit_mode();

        session.pointer_down(Point::new(302.0, 1.0));
        assert!(matches!(session.edit_target(), EditTarget::Corner(_)));
        session.pointer_move(Point::new(322.0, 11.0));
        session.pointer_up(Point::new(322.0, 11.0));

        let walls = session.plan().walls();
        assert_near(walls[0].start, Point::new(0.0, 0.0));
        assert_near(walls[0].end, Point::new(320.0, 10.0));
        assert_near(walls[1].start, Point::new(320.0, 10.0));
        assert_near(walls[1].end, Point::new(300.0, 240.0));
        assert_eq!(session.plan().corners().len(), 3);
        assert!(session.plan().corners().iter().any(|c| c.position == Point::new(320.0, 10.0)));
    }

    #[test]
    fn test_move_wall_endpoint() {
        let mut session = session_with(vec![wall(0.0, 0.0, 300.0, 0.0)], vec![]);
        let config = EditorConfig {
            corner_hit_tolerance_cm: 1.0,
            ..EditorConfig::default()
        };
        session.config = config;
        session.toggle_edit_mode();

        session.pointer_down(Point::new(296.0, 0.0));
        assert_eq!(session.edit_target(), EditTarget::WallEndpoint(0, SegmentEnd::End));
        session.pointer_move(Point::new(346.0, 0.0));
        assert!((session.length_readout_cm().unwrap() - 350.0).abs() < 1e-9);
        session.pointer_up(Point::new(346.0, 0.0));

        assert_near(session.plan().walls()[0].end, Point::new(350.0, 0.0));
        assert!(session.length_readout_cm().is_none());
        assert_eq!(session.edit_target(), EditTarget::None);
    }

    #[test]
    fn test_move_whole_wall() {
        let mut session = session_with(vec![wall(0.0, 0.0, 300.0, 0.0)], vec![]);
        session.toggle_edit_mode();
        drag(&mut session, Point::new(150.0, 3.0), Point::new(160.0, 53.0));

        let walls = session.plan().walls();
        assert_near(walls[0].start, Point::new(10.0, 50.0));
        assert_near(walls[0].end, Point::new(310.0, 50.0));
        assert_near(session.plan().corners()[0].position, Point::new(10.0, 50.0));
    }

    #[test]
    fn test_slide_opening_keeps_length() {
        let mut session = session_with(
            vec![wall(0.0, 0.0, 600.0, 0.0)],
            vec![opening(100.0, 0.0, 200.0, 0.0, 0)],
        );
        session.toggle_edit_mode();

        session.pointer_down(Point::new(150.0, 2.0));
        assert_eq!(session.edit_target(), EditTarget::OpeningWhole(0));
        session.pointer_move(Point::new(183.0, 30.0));
        session.pointer_up(Point::new(183.0, 30.0));

        let opening = &session.plan().openings()[0];
        assert_near(opening.start, Point::new(135.0, 0.0));
        assert_near(opening.end, Point::new(235.0, 0.0));
    }

    #[test]
    fn test_slide_opening_stays_on_wall() {
        let mut session = session_with(
            vec![wall(0.0, 0.0, 600.0, 0.0)],
            vec![opening(100.0, 0.0, 200.0, 0.0, 0)],
        );
        session.toggle_edit_mode();

        drag(&mut session, Point::new(150.0, 2.0), Point::new(-50.0, 2.0));
        let opening = &session.plan().openings()[0];
        assert_near(opening.start, Point::new(0.0, 0.0));
        assert_near(opening.end, Point::new(100.0, 0.0));

        drag(&mut session, Point::new(50.0, 2.0), Point::new(900.0, 2.0));
        let opening = &session.plan().openings()[0];
        assert_near(opening.start, Point::new(500.0, 0.0));
        assert_near(opening.end, Point::new(600.0, 0.0));
    }

    #[test]
    fn test_stretch_opening_endpoint() {
        let mut session = session_with(
            vec![wall(0.0, 0.0, 600.0, 0.0)],
            vec![opening(100.0, 0.0, 200.0, 0.0, 0)],
        );
        session.toggle_edit_mode();

        session.pointer_down(Point::new(102.0, 0.0));
        assert_eq!(
            session.edit_target(),
            EditTarget::OpeningEndpoint(0, SegmentEnd::Start)
        );
        session.pointer_move(Point::new(71.0, 20.0));
        assert!((session.length_readout_cm().unwrap() - 130.0).abs() < 1e-9);
        session.pointer_up(Point::new(71.0, 20.0));

        let opening = &session.plan().openings()[0];
        assert_near(opening.start, Point::new(70.0, 0.0));
        assert_near(opening.end, Point::new(200.0, 0.0));
    }

    #[test]
    fn test_delete_wall_cascades() {
        let mut session = session_with(
            vec![
                wall(0.0, 0.0, 300.0, 0.0),
                wall(0.0, 300.0, 300.0, 300.0),
                wall(0.0, 600.0, 300.0, 600.0),
            ],
            vec![
                opening(100.0, 0.0, 200.0, 0.0, 0),
                opening(20.0, 300.0, 60.0, 300.0, 1),
                opening(100.0, 600.0, 200.0, 600.0, 2),
                opening(220.0, 300.0, 260.0, 300.0, 1),
            ],
        );
        session.toggle_edit_mode();

        session.pointer_down(Point::new(150.0, 300.0));
        assert_eq!(session.edit_target(), EditTarget::WallWhole(1));
        session.pointer_up(TRASH);

        let plan = session.plan();
        assert_eq!(plan.walls().len(), 2);
        assert_eq!(plan.walls()[1].start, Point::new(0.0, 600.0));
        let hosts: Vec<usize> = plan.openings().iter().map(|o| o.wall).collect();
        assert_eq!(hosts, vec![0, 1]);
        assert!(plan.openings().iter().all(|o| o.wall < plan.walls().len()));
    }

    #[test]
    fn test_delete_corner_removes_connected_walls() {
        let mut session = session_with(
            vec![wall(0.0, 0.0, 300.0, 0.0), wall(300.0, 0.0, 300.0, 240.0)],
            vec![opening(300.0, 100.0, 300.0, 200.0, 1)],
        );
        session.toggle_edit_mode();

        session.pointer_down(Point::new(300.0, 0.0));
        assert!(matches!(session.edit_target(), EditTarget::Corner(_)));
        session.pointer_up(TRASH);

        assert!(session.plan().walls().is_empty());
        assert!(session.plan().openings().is_empty());
        assert!(session.plan().corners().is_empty());
    }

    #[test]
    fn test_delete_opening() {
        let mut session = session_with(
            vec![wall(0.0, 0.0, 300.0, 0.0)],
            vec![opening(100.0, 0.0, 200.0, 0.0, 0)],
        );
        session.toggle_edit_mode();
        session.pointer_down(Point::new(150.0, 0.0));
        session.pointer_up(TRASH);

        assert!(session.plan().openings().is_empty());
        assert_eq!(session.plan().walls().len(), 1);
    }

    #[test]
    fn test_release_outside_zone_keeps_target() {
        let mut session = session_with(vec![wall(0.0, 0.0, 300.0, 0.0)], vec![]);
        session.toggle_edit_mode();
        session.pointer_down(Point::new(150.0, 0.0));
        session.pointer_up(Point::new(150.0, 0.0));

        assert_eq!(session.plan().walls().len(), 1);
        assert_eq!(session.edit_target(), EditTarget::None);
    }

    #[test]
    fn test_delete_zone_ignores_camera() {
        let mut session = session_with(vec![wall(0.0, 0.0, 300.0, 0.0)], vec![]);
        session.camera_mut().pan(Vec2::new(500.0, 0.0));
        session.camera_mut().zoom = 2.0;
        session.toggle_edit_mode();

        // Wall midpoint (150, 0) is at screen (800, 0).
        session.pointer_down(Point::new(800.0, 0.0));
        assert_eq!(session.edit_target(), EditTarget::WallWhole(0));
        session.pointer_up(TRASH);
        assert!(session.plan().walls().is_empty());
    }

    #[test]
    fn test_pinch_cancels_draw() {
        let mut session = session();
        session.handle_pointer_event(&PointerEvent::Down {
            positions: vec![Point::new(0.0, 0.0)],
        });
        assert!(session.draw_preview().is_some());

        let two = vec![Point::new(0.0, 0.0), Point::new(100.0, 0.0)];
        session.handle_pointer_event(&PointerEvent::Down { positions: two });
        assert!(session.draw_preview().is_none());

        session.handle_pointer_event(&PointerEvent::Move {
            positions: vec![Point::new(20.0, 10.0), Point::new(120.0, 10.0)],
        });
        assert_eq!(session.camera().offset, Vec2::new(20.0, 10.0));

        session.handle_pointer_event(&PointerEvent::Up {
            positions: vec![Point::new(20.0, 10.0), Point::new(120.0, 10.0)],
        });
        session.handle_pointer_event(&PointerEvent::Up {
            positions: vec![Point::new(300.0, 10.0)],
        });
        assert!(session.plan().walls().is_empty());
    }

    #[test]
    fn test_pinch_does_not_jump_edit_drag() {
        let mut session = session_with(vec![wall(0.0, 0.0, 300.0, 0.0)], vec![]);
        session.toggle_edit_mode();

        session.handle_pointer_event(&PointerEvent::Down {
            positions: vec![Point::new(150.0, 0.0)],
        });
        assert_eq!(session.edit_target(), EditTarget::WallWhole(0));

        session.handle_pointer_event(&PointerEvent::Down {
            positions: vec![Point::new(150.0, 0.0), Point::new(250.0, 0.0)],
        });
        session.handle_pointer_event(&PointerEvent::Move {
            positions: vec![Point::new(150.0, 0.0), Point::new(450.0, 0.0)],
        });
        session.handle_pointer_event(&PointerEvent::Up {
            positions: vec![Point::new(150.0, 0.0), Point::new(450.0, 0.0)],
        });
        assert_eq!(session.edit_target(), EditTarget::WallWhole(0));

        // First move after the pinch only re-anchors.
        session.handle_pointer_event(&PointerEvent::Move {
            positions: vec![Point::new(170.0, 0.0)],
        });
        assert_near(session.plan().walls()[0].start, Point::new(0.0, 0.0));

        let zoom = session.camera().zoom;
        session.handle_pointer_event(&PointerEvent::Move {
            positions: vec![Point::new(170.0, 30.0)],
        });
        assert_near(session.plan().walls()[0].start, Point::new(0.0, 30.0 / zoom));
    }

    #[test]
    fn test_cancel_clears_edit_and_rebuilds_corners() {
        let mut session = session_with(vec![wall(0.0, 0.0, 300.0, 0.0)], vec![]);
        session.toggle_edit_mode();

        session.handle_pointer_event(&PointerEvent::Down {
            positions: vec![Point::new(150.0, 3.0)],
        });
        session.handle_pointer_event(&PointerEvent::Move {
            positions: vec![Point::new(160.0, 53.0)],
        });
        assert!(session.length_readout_cm().is_some());
        session.handle_pointer_event(&PointerEvent::Cancel);

        assert!(session.edit_target().is_none());
        assert!(session.length_readout_cm().is_none());
        assert_near(session.plan().walls()[0].start, Point::new(10.0, 50.0));
        assert_near(session.plan().corners()[0].position, Point::new(10.0, 50.0));

        // A later move without a new press does nothing.
        session.handle_pointer_event(&PointerEvent::Move {
            positions: vec![Point::new(400.0, 400.0)],
        });
        assert_near(session.plan().walls()[0].start, Point::new(10.0, 50.0));
    }

    #[test]
    fn test_cancel_drops_draw_preview() {
        let mut session = session();
        session.handle_pointer_event(&PointerEvent::Down {
            positions: vec![Point::new(0.0, 0.0)],
        });
        session.handle_pointer_event(&PointerEvent::Move {
            positions: vec![Point::new(300.0, 0.0)],
        });
        assert!(session.draw_preview().is_some());

        session.handle_pointer_event(&PointerEvent::Cancel);
        assert!(session.draw_preview().is_none());
        session.handle_pointer_event(&PointerEvent::Up {
            positions: vec![Point::new(300.0, 0.0)],
        });
        assert!(session.plan().walls().is_empty());
    }

    #[test]
    fn test_toggle_edit_mode_clears_state() {
        let mut session = session_with(vec![wall(0.0, 0.0, 300.0, 0.0)], vec![]);
        session.toggle_edit_mode();
        assert_eq!(session.mode(), Mode::Editing);
        session.pointer_down(Point::new(150.0, 0.0));
        assert!(!session.edit_target().is_none());

        session.toggle_edit_mode();
        assert_eq!(session.mode(), Mode::Idle);
        assert!(session.edit_target().is_none());
        assert!(session.length_readout_cm().is_none());

        // Idle ignores pointers.
        drag(&mut session, Point::new(0.0, 100.0), Point::new(200.0, 100.0));
        assert_eq!(session.plan().walls().len(), 1);
    }

    #[test]
    fn test_changes_persist_across_sessions() {
        let storage = Arc::new(MemoryStorage::new());
        let mut session = EditSession::new(EditorConfig::default(), storage.clone());
        drag(&mut session, Point::new(0.0, 0.0), Point::new(300.0, 0.0));
        session.set_tool(ToolKind::Door);
        drag(&mut session, Point::new(100.0, 0.0), Point::new(190.0, 0.0));

        let reopened = EditSession::new(EditorConfig::default(), storage);
        assert_eq!(reopened.plan().walls(), session.plan().walls());
        assert_eq!(reopened.plan().openings(), session.plan().openings());
        assert_eq!(reopened.plan().corners().len(), 2);
    }

    #[test]
    fn test_clear_all() {
        let storage = Arc::new(MemoryStorage::new());
        let mut session = EditSession::new(EditorConfig::default(), storage.clone());
        drag(&mut session, Point::new(0.0, 0.0), Point::new(300.0, 0.0));
        session.clear_all();

        assert!(session.plan().is_empty());
        assert_eq!(session.mode(), Mode::Idle);
        let reopened = EditSession::new(EditorConfig::default(), storage);
        assert!(reopened.plan().is_empty());
    }

    #[test]
    fn test_load_drops_orphan_openings() {
        let session = session_with(
            vec![wall(0.0, 0.0, 300.0, 0.0)],
            vec![opening(100.0, 0.0, 200.0, 0.0, 0), opening(10.0, 0.0, 60.0, 0.0, 3)],
        );
        assert_eq!(session.plan().openings().len(), 1);
    }

    #[test]
    fn test_load_skips_bad_opening_record() {
        let storage = Arc::new(MemoryStorage::new());
        PlanStore::new(storage.clone())
            .save(&[wall(0.0, 0.0, 300.0, 0.0)], &[])
            .unwrap();
        storage
            .put(
                crate::storage::OPENINGS_KEY,
                r#"[
                    {"x1":100,"y1":0,"x2":200,"y2":0,"kind":"WINDOW","parentWallIndex":0},
                    {"x1":10,"y1":0,"x2":60,"y2":0,"kind":"DOOR","parentWallIndex":-1}
                ]"#,
            )
            .unwrap();

        let session = EditSession::new(EditorConfig::default(), storage);
        assert_eq!(session.plan().walls().len(), 1);
        assert_eq!(session.plan().openings().len(), 1);
        assert_eq!(session.plan().openings()[0].wall, 0);
    }

    /// Storage that accepts reads but fails every write.
    struct FailingStorage;

    impl Storage for FailingStorage {
        fn get(&self, _key: &str) -> StorageResult<Option<String>> {
            Ok(None)
        }

        fn put(&self, _key: &str, _value: &str) -> StorageResult<()> {
            Err(StorageError::Other("disk full".to_string()))
        }

        fn remove(&self, _key: &str) -> StorageResult<()> {
            Ok(())
        }
    }

    #[test]
    fn test_save_failure_is_not_fatal() {
        let mut session = EditSession::new(EditorConfig::default(), Arc::new(FailingStorage));
        session.pointer_down(Point::new(0.0, 0.0));
        session.pointer_up(Point::new(300.0, 0.0));
        assert_eq!(session.plan().walls().len(), 1);
        assert!(session.has_unsaved_changes());
    }
}
