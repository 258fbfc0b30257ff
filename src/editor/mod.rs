//! Interactive scenario editing core.
//!
//! Owns the node/edge graph and everything that mutates it:
//! - Session-scoped node id allocation
//! - Palette drops projected from screen to canvas space
//! - Single-node selection routing edit-panel submissions
//! - Whole-graph save, load and update against a scenario store
//!
//! Nothing here touches the DOM; the canvas and sidebar components drive it.
//!
//! # Example
//!
//! ```ignore
//! use scenario_canvas::editor::{DropEvent, EditorSession, Position, Viewport};
//!
//! let mut session = EditorSession::default();
//! let id = session.drop_item(
//!     &DropEvent {
//!         pointer: Position::new(120.0, 80.0),
//!         payload: Some(r#"{"name":"Boss","type":"enemy"}"#.into()),
//!     },
//!     &Viewport::default(),
//! );
//! ```

mod error;
mod graph;
mod ids;
mod placement;
pub mod rest;
mod selection;
mod session;
pub mod store;
mod sync;
mod types;

pub use error::{GraphError, StoreError, SyncError};
pub use graph::{EdgePolicy, GraphModel};
pub use ids::{DEFAULT_ID_PREFIX, IdGenerator};
pub use placement::{CanvasProjection, DropEvent, Viewport, parse_payload};
pub use rest::RestScenarioStore;
pub use selection::{NodeEdit, Selection};
pub use session::{EdgeChange, EditorSession, NodeChange};
pub use store::{MemoryScenarioStore, ScenarioId, ScenarioRecord, ScenarioStore};
pub use sync::{LoadOutcome, LoadedScenario, SavedScenario, ScenarioSync};
pub use types::{
	Connection, DRAG_PAYLOAD_TYPE, Edge, EdgeId, GraphSnapshot, Node, NodeData, NodeDataPatch,
	NodeId, NodeKind, PaletteItem, Position,
};
