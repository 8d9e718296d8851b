// Library exports for tunesight

pub mod catalog;
pub mod compiler;
pub mod config;
pub mod data;
pub mod error;
pub mod geometry;
pub mod graph;
pub mod ir;
pub mod layout;
pub mod palette;
pub mod resolve;
pub mod runtime;
pub mod scale;
pub mod service;
pub mod transform;

pub use config::{DashboardConfig, LayoutMode};
pub use data::{load_table, Dataset};
pub use error::{DashboardError, Result};
pub use ir::{ChartKind, ChartSpec, Panel};
pub use runtime::{render_chart, render_dashboard};
pub use transform::select_top_n;

use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
pub enum OutputFormat {
    #[serde(rename = "svg")]
    #[default]
    Svg,
    #[serde(rename = "png")]
    Png,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RenderOptions {
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    #[serde(default, rename = "type")]
    pub format: OutputFormat,
}

fn default_width() -> u32 { 800 }
fn default_height() -> u32 { 600 }

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            format: OutputFormat::Svg,
        }
    }
}
