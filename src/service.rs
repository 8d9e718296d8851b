//! The two capability seams of the renderer: drawing a chart and placing it
//! on the page. Any implementation honouring these contracts can be swapped in.

use crate::compiler::compile_scene;
use crate::error::Result;
use crate::graph::render_scene;
use crate::ir::{Panel, ResolvedChart};
use crate::layout::{PanelContent, Region};
use crate::RenderOptions;

/// Turns a fully resolved chart into a rendered panel
pub trait ChartService {
    fn render(&self, chart: &ResolvedChart) -> Result<Panel>;
}

/// Accepts rendered panels (or their failures) into page regions
pub trait LayoutService {
    fn place(&mut self, content: PanelContent, region: Region, caption: &str);
}

/// Default chart service: compiles a scene and draws it with plotters
#[derive(Debug, Clone, Default)]
pub struct PlottersChartService {
    options: RenderOptions,
}

impl PlottersChartService {
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }
}

impl ChartService for PlottersChartService {
    fn render(&self, chart: &ResolvedChart) -> Result<Panel> {
        let scene = compile_scene(chart, &self.options)?;
        log::debug!("Compiled scene with {} draw commands", scene.commands.len());
        let image = render_scene(&scene, self.options.format)?;
        Ok(Panel {
            image,
            legend: scene.legend,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{ChartImage, Orientation, ResolvedGeometry};
    use crate::palette::PaletteId;

    #[test]
    fn test_plotters_service_renders_svg_with_legend() {
        let chart = ResolvedChart {
            title: None,
            palette: PaletteId::Prism,
            x_label: Some("platform_name".to_string()),
            y_label: Some("avg_revenue_per_stream".to_string()),
            geometry: ResolvedGeometry::Bar {
                categories: vec!["Tidal".to_string(), "Spotify".to_string()],
                values: vec![0.0125, 0.004],
                color_keys: Some(vec!["Tidal".to_string(), "Spotify".to_string()]),
                orientation: Orientation::Vertical,
            },
        };
        let panel = PlottersChartService::default().render(&chart).unwrap();
        assert!(matches!(panel.image, ChartImage::Svg(_)));
        assert_eq!(panel.legend.len(), 2);
        assert_eq!(panel.legend[1].label, "Spotify");
    }
}
