//! scenario-canvas: drag-and-drop scenario mind map editor.
//!
//! This crate provides a WASM-based editor where palette elements are dropped
//! onto a canvas, connected and annotated, and the resulting graph is saved to
//! and loaded from a remote scenario table by name.

use std::rc::Rc;

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info, warn};
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, Window};

pub mod components;
pub mod config;
pub mod editor;

pub use components::flow_canvas::FlowCanvas;
pub use components::sidebar::Sidebar;
pub use config::{EditorConfig, StoreConfig};
pub use editor::{EditorSession, MemoryScenarioStore, RestScenarioStore, ScenarioStore, ScenarioSync};

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("scenario-canvas: logging initialized");
}

/// Load editor configuration from a script element with id="editor-config".
/// Expected format: JSON matching [`EditorConfig`]; missing or invalid config
/// falls back to defaults.
fn load_config() -> EditorConfig {
	let json_text = (|| {
		let window: Window = web_sys::window()?;
		let document = window.document()?;
		let element = document.get_element_by_id("editor-config")?;
		let script: HtmlScriptElement = element.dyn_into().ok()?;
		script.text().ok()
	})();

	let Some(json_text) = json_text else {
		info!("scenario-canvas: no editor config, using defaults");
		return EditorConfig::default();
	};
	match EditorConfig::from_json(&json_text) {
		Ok(config) => config,
		Err(e) => {
			warn!("scenario-canvas: {e}; using defaults");
			EditorConfig::default()
		}
	}
}

/// Pick the scenario store the config asks for.
fn build_store(config: &EditorConfig) -> Box<dyn ScenarioStore> {
	match &config.store {
		Some(store) => {
			let rest = RestScenarioStore::new(store);
			info!("scenario-canvas: using scenario store at {}", rest.endpoint());
			Box::new(rest)
		}
		None => {
			info!("scenario-canvas: no store configured, scenarios stay in memory");
			Box::new(MemoryScenarioStore::new())
		}
	}
}

/// Main application component.
/// Owns the editing session and wires it to the canvas and the sidebar.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let config = load_config();
	let session = RwSignal::new(EditorSession::new(
		config.id_generator(),
		config.edge_policy(),
	));
	let sync = Rc::new(ScenarioSync::new(build_store(&config)));

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="light" />
		<Title text="Scenario Editor" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<div class="dndflow">
			<div class="canvas-wrapper">
				<FlowCanvas session=session grid=config.background />
			</div>
			<Sidebar session=session sync=sync palette=config.palette />
		</div>
	}
}
