//! Renderer settings
//!
//! ```toml
//! container = "#app"
//! default_class = "screen"
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{PagesError, PagesResult};

/// Where and how screens are mounted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PagesSettings {
	/// Selector of the mount container.
	pub container: String,
	/// `class` applied by `mount` when no class is given.
	pub default_class: String,
}

impl Default for PagesSettings {
	fn default() -> Self {
		Self {
			container: "main".to_string(),
			default_class: String::new(),
		}
	}
}

impl PagesSettings {
	/// Loads settings from TOML; missing keys take their defaults.
	pub fn from_toml_str(source: &str) -> PagesResult<Self> {
		toml::from_str(source).map_err(|error| PagesError::Settings(error.to_string()))
	}

	/// Sets the container selector.
	pub fn with_container(mut self, container: impl Into<String>) -> Self {
		self.container = container.into();
		self
	}

	/// Sets the default mount class.
	pub fn with_default_class(mut self, class_name: impl Into<String>) -> Self {
		self.default_class = class_name.into();
		self
	}
}
