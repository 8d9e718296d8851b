use crate::RenderOptions;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

pub const DEFAULT_TITLE: &str = "Music Discovery Database Insights Dashboard";

pub const DEFAULT_DESCRIPTION: &str = "Music streaming platforms often reinforce mainstream artists \
through popularity-based algorithms, limiting the discovery of hidden musical talents. This dashboard \
visualizes insights from a structured relational database designed to track listener engagement, \
playlist dynamics, and revenue trends across platforms. By analyzing real user interactions instead \
of algorithmic bias, we enable fairer, data-driven exploration of underrated songs and emerging artists.";

/// How panels are arranged on the page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
pub enum LayoutMode {
    /// Side-by-side columns, two or three panels per row
    #[serde(rename = "columns")]
    #[default]
    Columns,
    /// One full-width panel per row, numbered headings
    #[serde(rename = "stacked")]
    Stacked,
}

/// Page-level settings, built once at startup and never mutated
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DashboardConfig {
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_description")]
    pub description: String,
    #[serde(default)]
    pub layout: LayoutMode,
    #[serde(default)]
    pub render: RenderOptions,
}

fn default_title() -> String { DEFAULT_TITLE.to_string() }
fn default_description() -> String { DEFAULT_DESCRIPTION.to_string() }

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            description: default_description(),
            layout: LayoutMode::default(),
            render: RenderOptions::default(),
        }
    }
}

impl DashboardConfig {
    /// Parse a JSON config document; missing fields take their defaults
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("Invalid dashboard config")
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
        Self::from_json(&text).with_context(|| format!("In config file '{}'", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::OutputFormat;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = DashboardConfig::from_json("{}").unwrap();
        assert_eq!(config, DashboardConfig::default());
        assert_eq!(config.render.width, 800);
        assert_eq!(config.layout, LayoutMode::Columns);
    }

    #[test]
    fn test_partial_config() {
        let config = DashboardConfig::from_json(
            r#"{"title": "Weekly", "layout": "stacked", "render": {"width": 640, "type": "png"}}"#,
        )
        .unwrap();
        assert_eq!(config.title, "Weekly");
        assert_eq!(config.description, DEFAULT_DESCRIPTION);
        assert_eq!(config.layout, LayoutMode::Stacked);
        assert_eq!(config.render.width, 640);
        assert_eq!(config.render.height, 600);
        assert_eq!(config.render.format, OutputFormat::Png);
    }

    #[test]
    fn test_invalid_layout() {
        let result = DashboardConfig::from_json(r#"{"layout": "grid"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_from_missing_file() {
        let err = DashboardConfig::from_file(Path::new("/nonexistent/tunesight.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
