use crate::config::{DashboardConfig, LayoutMode};
use crate::error::DashboardError;
use crate::ir::{ChartImage, Panel};
use crate::palette::to_css;
use crate::service::LayoutService;
use base64::Engine;
use maud::{html, Markup, PreEscaped, DOCTYPE};
use std::collections::BTreeMap;

/// Where a panel lands on the page
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Region {
    FullWidth { row: usize },
    /// `column` counts fillable columns only; spacers are skipped
    Column { row: usize, column: usize },
}

impl Region {
    fn key(&self) -> (usize, usize) {
        match *self {
            Region::FullWidth { row } => (row, 0),
            Region::Column { row, column } => (row, column),
        }
    }
}

/// What a panel slot shows: a chart or the reason it could not be drawn
#[derive(Debug, Clone, PartialEq)]
pub enum PanelContent {
    Chart { heading: String, panel: Panel },
    Failed { heading: String, error: DashboardError },
}

impl PanelContent {
    pub fn heading(&self) -> &str {
        match self {
            PanelContent::Chart { heading, .. } | PanelContent::Failed { heading, .. } => heading,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, PanelContent::Failed { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Slot {
    Column(f32),
    Spacer(f32),
}

/// Rows of weighted column slots
#[derive(Debug, Clone, PartialEq)]
pub struct PageLayout {
    rows: Vec<Vec<Slot>>,
}

impl PageLayout {
    /// Two wide columns around a spacer, then three equal columns, twice over
    pub fn columns() -> Self {
        let wide = vec![Slot::Column(2.0), Slot::Spacer(0.5), Slot::Column(2.0)];
        let triple = vec![Slot::Column(1.0), Slot::Column(1.0), Slot::Column(1.0)];
        Self {
            rows: vec![wide.clone(), triple.clone(), wide, triple],
        }
    }

    pub fn stacked(panels: usize) -> Self {
        Self {
            rows: vec![vec![Slot::Column(1.0)]; panels],
        }
    }

    pub fn for_mode(mode: LayoutMode, panels: usize) -> Self {
        match mode {
            LayoutMode::Columns => Self::columns(),
            LayoutMode::Stacked => Self::stacked(panels),
        }
    }

    pub fn rows(&self) -> &[Vec<Slot>] {
        &self.rows
    }

    /// Fillable regions in reading order
    pub fn regions(&self) -> Vec<Region> {
        let mut regions = Vec::new();
        for (row, slots) in self.rows.iter().enumerate() {
            let columns = slots.iter().filter(|s| matches!(s, Slot::Column(_))).count();
            if columns == 1 && slots.len() == 1 {
                regions.push(Region::FullWidth { row });
            } else {
                regions.extend((0..columns).map(|column| Region::Column { row, column }));
            }
        }
        regions
    }
}

#[derive(Debug, Clone)]
struct Placed {
    content: PanelContent,
    caption: String,
}

/// Layout service that collects panels and renders one HTML document
#[derive(Debug, Clone)]
pub struct HtmlPage {
    layout: PageLayout,
    placed: BTreeMap<(usize, usize), Placed>,
}

impl LayoutService for HtmlPage {
    fn place(&mut self, content: PanelContent, region: Region, caption: &str) {
        if !self.layout.regions().contains(&region) {
            log::warn!(
                "Region {:?} is not part of the page layout; panel will not be shown",
                region
            );
        }
        self.placed.insert(
            region.key(),
            Placed {
                content,
                caption: caption.to_string(),
            },
        );
    }
}

impl HtmlPage {
    pub fn new(layout: PageLayout) -> Self {
        Self {
            layout,
            placed: BTreeMap::new(),
        }
    }

    pub fn content_at(&self, region: Region) -> Option<&PanelContent> {
        self.placed.get(&region.key()).map(|p| &p.content)
    }

    pub fn caption_at(&self, region: Region) -> Option<&str> {
        self.placed.get(&region.key()).map(|p| p.caption.as_str())
    }

    /// Placed panels in reading order
    pub fn contents(&self) -> Vec<&PanelContent> {
        self.layout
            .regions()
            .into_iter()
            .filter_map(|region| self.content_at(region))
            .collect()
    }

    pub fn render(&self, config: &DashboardConfig) -> String {
        let markup = html! {
            (DOCTYPE)
            html lang="en" {
                head {
                    meta charset="utf-8";
                    meta name="viewport" content="width=device-width, initial-scale=1";
                    title { (config.title) }
                    style { (PreEscaped(PAGE_CSS)) }
                }
                body {
                    h1.banner { (config.title) }
                    div.description { (config.description) }
                    @for (row, slots) in self.layout.rows().iter().enumerate() {
                        div.row {
                            (self.row_markup(row, slots))
                        }
                    }
                }
            }
        };
        markup.into_string()
    }

    fn row_markup(&self, row: usize, slots: &[Slot]) -> Markup {
        let mut column = 0;
        let mut cells = Vec::with_capacity(slots.len());
        for slot in slots {
            match *slot {
                Slot::Spacer(weight) => cells.push(html! {
                    div.spacer style={ "flex: " (weight) " 1 0" } {}
                }),
                Slot::Column(weight) => {
                    let placed = self.placed.get(&(row, column));
                    column += 1;
                    cells.push(html! {
                        div.cell style={ "flex: " (weight) " 1 0" } {
                            @if let Some(placed) = placed {
                                (panel_markup(placed))
                            }
                        }
                    });
                }
            }
        }
        html! {
            @for cell in cells { (cell) }
        }
    }
}

fn panel_markup(placed: &Placed) -> Markup {
    html! {
        section.panel {
            h3 { (placed.content.heading()) }
            @match &placed.content {
                PanelContent::Chart { panel, .. } => {
                    div.chart { (image_markup(&panel.image)) }
                    @if !panel.legend.is_empty() {
                        ul.legend {
                            @for entry in &panel.legend {
                                li {
                                    span.swatch style={ "background:" (to_css(entry.color)) } {}
                                    (entry.label)
                                }
                            }
                        }
                    }
                }
                PanelContent::Failed { error, .. } => {
                    div.panel-error role="alert" {
                        strong { (error.kind()) }
                        ": " (error.to_string())
                    }
                }
            }
            p.caption { (placed.caption) }
        }
    }
}

fn image_markup(image: &ChartImage) -> Markup {
    match image {
        ChartImage::Svg(svg) => html! { (PreEscaped(svg.as_str())) },
        ChartImage::Png(bytes) => {
            let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);
            html! { img alt="chart" src={ "data:image/png;base64," (encoded) }; }
        }
    }
}

const PAGE_CSS: &str = r#"
body { margin: 0; padding: 24px 32px; font-family: "Inter", system-ui, sans-serif; color: #2a3f5f; background: #fafbfd; }
h1.banner { text-align: center; color: #89CFF0; margin-bottom: 8px; }
div.description { text-align: center; font-size: 18px; padding: 10px; max-width: 1200px; margin: 0 auto 24px; }
div.row { display: flex; gap: 16px; margin-bottom: 24px; }
section.panel { background: #fff; border-radius: 8px; padding: 12px 16px; box-shadow: 0 1px 4px rgba(0,0,0,0.08); }
section.panel h3 { margin: 4px 0 12px; }
div.chart svg, div.chart img { width: 100%; height: auto; }
ul.legend { list-style: none; padding: 0; margin: 8px 0; display: flex; flex-wrap: wrap; gap: 4px 12px; font-size: 13px; }
span.swatch { display: inline-block; width: 10px; height: 10px; margin-right: 6px; border-radius: 2px; }
div.panel-error { border: 1px solid #e11d48; background: #fff1f2; color: #9f1239; padding: 16px; border-radius: 6px; }
p.caption { font-size: 14px; color: #5b6678; }
"#;
