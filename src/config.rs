//! Editor configuration read from the host page.

use serde::Deserialize;

use crate::components::flow_canvas::GridVariant;
use crate::editor::{DEFAULT_ID_PREFIX, EdgePolicy, IdGenerator, PaletteItem};

/// Connection details for a REST scenario store.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct StoreConfig {
	/// Project URL, e.g. `https://xyz.supabase.co`.
	pub url: String,
	/// Anonymous API key sent as `apikey` and bearer token.
	#[serde(default)]
	pub api_key: String,
	#[serde(default = "default_table")]
	pub table: String,
}

fn default_table() -> String {
	"scenarios".to_string()
}

fn default_id_prefix() -> String {
	DEFAULT_ID_PREFIX.to_string()
}

fn default_true() -> bool {
	true
}

/// Everything the page can tune. Every field is optional in JSON.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct EditorConfig {
	/// Remote store; the in-memory store is used when absent.
	#[serde(default)]
	pub store: Option<StoreConfig>,
	#[serde(default = "default_id_prefix")]
	pub id_prefix: String,
	#[serde(default = "default_true")]
	pub allow_self_loops: bool,
	/// Canvas background grid, `"lines"` or `"dots"`.
	#[serde(default)]
	pub background: GridVariant,
	/// Items offered by the sidebar palette.
	#[serde(default = "default_palette")]
	pub palette: Vec<PaletteItem>,
}

impl Default for EditorConfig {
	fn default() -> Self {
		Self {
			store: None,
			id_prefix: default_id_prefix(),
			allow_self_loops: true,
			background: GridVariant::default(),
			palette: default_palette(),
		}
	}
}

/// Failure reading editor configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
	#[error("invalid editor config: {0}")]
	Parse(#[from] serde_json::Error),

	#[error("store url must start with http:// or https://, got `{0}`")]
	InvalidStoreUrl(String),
}

impl EditorConfig {
	/// Parse and validate page-supplied JSON.
	pub fn from_json(json: &str) -> Result<Self, ConfigError> {
		let config: Self = serde_json::from_str(json)?;
		if let Some(store) = &config.store {
			if !(store.url.starts_with("http://") || store.url.starts_with("https://")) {
				return Err(ConfigError::InvalidStoreUrl(store.url.clone()));
			}
		}
		Ok(config)
	}

	/// A fresh id generator using the configured prefix.
	pub fn id_generator(&self) -> IdGenerator {
		IdGenerator::new(self.id_prefix.clone())
	}

	/// Edge rules for new sessions.
	pub fn edge_policy(&self) -> EdgePolicy {
		EdgePolicy {
			allow_self_loops: self.allow_self_loops,
		}
	}
}

fn palette_item(name: &str, item_type: &str, description: &str) -> PaletteItem {
	PaletteItem {
		name: Some(name.to_string()),
		item_type: item_type.to_string(),
		image: None,
		notes: None,
		description: Some(description.to_string()),
	}
}

/// Built-in palette used when the page provides none.
pub fn default_palette() -> Vec<PaletteItem> {
	vec![
		palette_item("Character", "character", "A person in the scenario"),
		palette_item("Enemy", "enemy", "An opponent to overcome"),
		palette_item("Location", "location", "A place the story visits"),
		palette_item("Item", "item", "An object that can be found or used"),
		palette_item("Event", "event", "Something that happens"),
	]
}
