//! Floor Plan Core Library
//!
//! Platform-agnostic geometry, snapping, topology and editing logic for the
//! floor-plan modeler. Nothing here renders or talks to a platform; a
//! renderer reads the model and session state, and storage is plugged in
//! through [`storage::Storage`].

pub mod camera;
pub mod config;
pub mod geometry;
pub mod input;
pub mod plan;
pub mod selection;
pub mod session;
pub mod snap;
pub mod storage;
pub mod tools;
pub mod topology;
pub mod units;

pub use camera::Camera;
pub use config::{ConfigError, EditorConfig};
pub use input::{Pinch, PointerEvent};
pub use plan::{FloorPlan, Opening, OpeningKind, SegmentEnd, Wall};
pub use selection::EditTarget;
pub use session::EditSession;
pub use snap::{SnapEngine, SnapKind, SnapResult};
pub use storage::{LoadedPlan, MemoryStorage, PlanStore, Storage, StorageError, StorageResult};
pub use tools::{Mode, ToolKind, ToolState};
pub use topology::{Corner, Topology};
pub use units::Units;
