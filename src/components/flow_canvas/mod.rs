//! Scenario canvas component.
//!
//! Renders the editor session's nodes and edges on an HTML canvas with:
//! - Drop targets for palette items (placed at the projected pointer position)
//! - Click-to-select, drag-to-move and shift-drag-to-connect on nodes
//! - A per-node delete button
//! - Pan and zoom of the whole view, with zoom and fit-view controls
//! - A lines or dots background grid
//!
//! # Example
//!
//! ```ignore
//! use scenario_canvas::{EditorSession, FlowCanvas};
//!
//! let session = RwSignal::new(EditorSession::default());
//! view! { <FlowCanvas session=session /> }
//! ```

mod component;
mod render;
mod state;
pub mod theme;

pub use component::FlowCanvas;
pub use theme::{GridVariant, Theme};
