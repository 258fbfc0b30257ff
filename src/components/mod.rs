//! Browser components driving the editor.

pub mod flow_canvas;
pub mod sidebar;
