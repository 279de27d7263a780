//! Declarative menu configuration.
//!
//! A menu's shape (layout, title, content region) can be stored as JSON and
//! loaded with [`MenuSpec::from_json`]. Elements carry behavior and are bound
//! in code on the builder returned by [`MenuBuilder::from_spec`].
//!
//! ```json
//! {
//!   "layout": ["#########", "#       #", "###<#>###"],
//!   "title": "<gold>Shop</gold>",
//!   "content_region": " "
//! }
//! ```
//!
//! [`MenuBuilder::from_spec`]: crate::menu::MenuBuilder::from_spec

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{MenuError, Result};

/// Layout as one string (line breaks allowed) or one string per row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LayoutSource {
    Text(String),
    Rows(Vec<String>),
}

impl LayoutSource {
    pub fn to_layout_string(&self) -> String {
        match self {
            LayoutSource::Text(text) => text.clone(),
            LayoutSource::Rows(rows) => rows.concat(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuSpec {
    pub layout: LayoutSource,
    #[serde(default)]
    pub title: Option<String>,
    /// Character whose slots form the scrollable content region.
    #[serde(default)]
    pub content_region: Option<char>,
}

impl MenuSpec {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path)
            .map_err(|err| MenuError::Spec(format!("{}: {err}", path.display())))?;
        Self::from_json(&data)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
