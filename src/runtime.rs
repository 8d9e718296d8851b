// Runtime executor for the dashboard pipeline

use crate::catalog::{self, PanelDefinition};
use crate::config::DashboardConfig;
use crate::data::{load_table, Dataset};
use crate::error::{DashboardError, Result};
use crate::ir::{ChartSpec, Panel};
use crate::layout::{HtmlPage, PageLayout, PanelContent};
use crate::resolve::resolve_chart;
use crate::service::{ChartService, LayoutService, PlottersChartService};
use std::path::Path;

/// Render one chart: resolve its channels against the dataset, then hand the
/// resolved chart to the service. The service is never called when a column
/// is missing or there is nothing to draw.
pub fn render_chart(
    data: &Dataset,
    spec: &ChartSpec,
    service: &dyn ChartService,
) -> Result<Panel> {
    let chart = resolve_chart(data, spec)?;
    service.render(&chart)
}

/// Load, validate, transform and draw a single panel
pub fn render_panel(
    definition: &PanelDefinition,
    config: &DashboardConfig,
    data_dir: &Path,
    service: &dyn ChartService,
) -> Result<Panel> {
    let path = data_dir.join(definition.file_name());
    let data = load_table(&path)?;
    log::debug!(
        "Panel {}: loaded {} rows from {}",
        definition.number,
        data.len(),
        path.display()
    );

    data.validate(definition.schema)?;
    let data = definition.transform.apply(&data)?;
    log::debug!(
        "Panel {}: {} rows after {:?}",
        definition.number,
        data.len(),
        definition.transform
    );

    render_chart(&data, &definition.chart(config.layout), service)
}

/// Outcome of one page render
#[derive(Debug, Default)]
pub struct RenderSummary {
    pub rendered: usize,
    /// Panel number and the error shown in its place
    pub failed: Vec<(usize, DashboardError)>,
}

impl RenderSummary {
    pub fn total(&self) -> usize {
        self.rendered + self.failed.len()
    }
}

/// Render every panel in page order and place each one, or its error
/// placeholder, into the layout. A failing panel never stops the others.
pub fn render_dashboard(
    config: &DashboardConfig,
    data_dir: &Path,
    charts: &dyn ChartService,
    layout: &mut dyn LayoutService,
) -> RenderSummary {
    let mut summary = RenderSummary::default();

    for definition in catalog::panels() {
        let heading = definition.heading(config.layout);
        let content = match render_panel(&definition, config, data_dir, charts) {
            Ok(panel) => {
                summary.rendered += 1;
                PanelContent::Chart { heading, panel }
            }
            Err(error) => {
                log::warn!(
                    "Panel {} ({}) failed: {}",
                    definition.number,
                    definition.file_stem,
                    error
                );
                summary.failed.push((definition.number, error.clone()));
                PanelContent::Failed { heading, error }
            }
        };
        layout.place(content, definition.region(config.layout), definition.caption);
    }

    log::info!(
        "Rendered {} of {} panels from {}",
        summary.rendered,
        summary.total(),
        data_dir.display()
    );
    summary
}

/// Render the whole dashboard with the default services and return the HTML
pub fn render_page(config: &DashboardConfig, data_dir: &Path) -> (String, RenderSummary) {
    let charts = PlottersChartService::new(config.render.clone());
    let mut page = HtmlPage::new(PageLayout::for_mode(config.layout, catalog::panels().len()));
    let summary = render_dashboard(config, data_dir, &charts, &mut page);
    (page.render(config), summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{ChartImage, ChartKind, ResolvedChart, ResolvedGeometry};
    use crate::layout::Region;
    use crate::palette::PaletteId;
    use std::cell::RefCell;

    /// Records every chart it is asked to draw
    #[derive(Default)]
    struct RecordingCharts {
        calls: RefCell<Vec<ResolvedChart>>,
    }

    impl ChartService for RecordingCharts {
        fn render(&self, chart: &ResolvedChart) -> Result<Panel> {
            self.calls.borrow_mut().push(chart.clone());
            Ok(Panel {
                image: ChartImage::Svg("<svg/>".to_string()),
                legend: Vec::new(),
            })
        }
    }

    #[derive(Default)]
    struct RecordingLayout {
        placed: Vec<(PanelContent, Region, String)>,
    }

    impl LayoutService for RecordingLayout {
        fn place(&mut self, content: PanelContent, region: Region, caption: &str) {
            self.placed.push((content, region, caption.to_string()));
        }
    }

    fn listeners() -> Dataset {
        Dataset::from_literals(
            &["country", "listener_count"],
            &[&["USA", "120"], &["India", "340"], &["Brazil", "90"]],
        )
    }

    #[test]
    fn test_render_chart_keeps_row_order() {
        let charts = RecordingCharts::default();
        let spec = ChartSpec::new(ChartKind::Bar, PaletteId::Bold)
            .y("country")
            .x("listener_count")
            .color("country")
            .horizontal();
        render_chart(&listeners(), &spec, &charts).unwrap();

        let calls = charts.calls.borrow();
        assert_eq!(calls.len(), 1);
        match &calls[0].geometry {
            ResolvedGeometry::Bar { categories, values, .. } => {
                assert_eq!(categories, &["USA", "India", "Brazil"]);
                assert_eq!(values, &[120.0, 340.0, 90.0]);
            }
            other => panic!("expected bars, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_column_never_reaches_service() {
        let charts = RecordingCharts::default();
        let spec = ChartSpec::new(ChartKind::Bar, PaletteId::Bold).x("country").y("listeners");
        let err = render_chart(&listeners(), &spec, &charts).unwrap_err();
        assert!(matches!(
            err,
            DashboardError::ColumnNotFound { ref column, .. } if column == "listeners"
        ));
        assert!(charts.calls.borrow().is_empty());
    }

    #[test]
    fn test_empty_dataset_is_render_error() {
        let charts = RecordingCharts::default();
        let empty = Dataset::from_literals(&["country", "listener_count"], &[]);
        let spec = ChartSpec::new(ChartKind::Bar, PaletteId::Bold).x("country").y("listener_count");
        let err = render_chart(&empty, &spec, &charts).unwrap_err();
        assert!(matches!(err, DashboardError::ChartRender(_)));
        assert!(charts.calls.borrow().is_empty());
    }

    #[test]
    fn test_short_row_never_reaches_service() {
        let charts = RecordingCharts::default();
        let ragged = Dataset::from_literals(
            &["country", "listener_count"],
            &[&["USA", "120"], &["India"]],
        );
        let spec = ChartSpec::new(ChartKind::Bar, PaletteId::Bold)
            .y("country")
            .x("listener_count")
            .horizontal();
        let err = render_chart(&ragged, &spec, &charts).unwrap_err();
        assert!(matches!(err, DashboardError::DataSource { .. }));
        assert!(charts.calls.borrow().is_empty());
    }

    #[test]
    fn test_empty_data_dir_places_ten_placeholders() {
        let dir = tempfile::tempdir().unwrap();
        let charts = RecordingCharts::default();
        let mut layout = RecordingLayout::default();
        let summary =
            render_dashboard(&DashboardConfig::default(), dir.path(), &charts, &mut layout);

        assert_eq!(summary.rendered, 0);
        assert_eq!(summary.failed.len(), 10);
        assert_eq!(layout.placed.len(), 10);
        assert!(layout.placed.iter().all(|(content, _, _)| content.is_failed()));
        assert!(matches!(summary.failed[0].1, DashboardError::DataSource { .. }));
        assert!(charts.calls.borrow().is_empty());
    }

    #[test]
    fn test_render_panel_truncates_top_ten() {
        let dir = tempfile::tempdir().unwrap();
        let mut csv = String::from("platform_name,total_streams\n");
        for i in 0..15 {
            csv.push_str(&format!("P{},{}\n", i, i * 100));
        }
        std::fs::write(dir.path().join("total_streams_per_platform.csv"), csv).unwrap();

        let charts = RecordingCharts::default();
        let definition = &catalog::panels()[0];
        render_panel(definition, &DashboardConfig::default(), dir.path(), &charts).unwrap();

        let calls = charts.calls.borrow();
        match &calls[0].geometry {
            ResolvedGeometry::Bar { categories, values, .. } => {
                assert_eq!(categories.len(), 10);
                assert_eq!(categories[0], "P14");
                assert_eq!(values[9], 500.0);
            }
            other => panic!("expected bars, got {:?}", other),
        }
    }

    #[test]
    fn test_schema_violation_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("listeners_per_country.csv"),
            "country,listener_count\nUSA,many\n",
        )
        .unwrap();
        let charts = RecordingCharts::default();
        let definition = &catalog::panels()[2];
        let err = render_panel(definition, &DashboardConfig::default(), dir.path(), &charts)
            .unwrap_err();
        assert!(matches!(err, DashboardError::DataSource { .. }));
        assert!(err.to_string().contains("listener_count"));
    }
}
