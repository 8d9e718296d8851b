use crate::palette::PaletteId;
use plotters::style::RGBColor;

// =============================================================================
// Phase 0: Chart request
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Bar,
    Pie,
    /// Pie with a hole, sized by `ChartSpec::hole`
    Donut,
    Line,
    Scatter,
    PolarLine,
    Treemap,
    Sunburst,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    #[default]
    Vertical,
    Horizontal,
}

/// Column names mapped onto visual channels. Which ones are required depends
/// on the chart kind.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Channels {
    pub x: Option<String>,
    pub y: Option<String>,
    pub color: Option<String>,
    pub size: Option<String>,
    pub names: Option<String>,
    pub values: Option<String>,
    /// Hierarchy levels, outermost first
    pub path: Vec<String>,
    pub r: Option<String>,
    pub theta: Option<String>,
}

/// Declarative chart request: kind, channel mapping, palette
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub channels: Channels,
    pub orientation: Orientation,
    pub palette: PaletteId,
    pub title: Option<String>,
    pub markers: bool,
    pub hole: f64,
    pub close_line: bool,
}

impl ChartSpec {
    pub fn new(kind: ChartKind, palette: PaletteId) -> Self {
        Self {
            kind,
            channels: Channels::default(),
            orientation: Orientation::Vertical,
            palette,
            title: None,
            markers: false,
            hole: if kind == ChartKind::Donut { 0.5 } else { 0.0 },
            close_line: false,
        }
    }

    pub fn x(mut self, col: &str) -> Self {
        self.channels.x = Some(col.to_string());
        self
    }

    pub fn y(mut self, col: &str) -> Self {
        self.channels.y = Some(col.to_string());
        self
    }

    pub fn color(mut self, col: &str) -> Self {
        self.channels.color = Some(col.to_string());
        self
    }

    pub fn size(mut self, col: &str) -> Self {
        self.channels.size = Some(col.to_string());
        self
    }

    pub fn names(mut self, col: &str) -> Self {
        self.channels.names = Some(col.to_string());
        self
    }

    pub fn values(mut self, col: &str) -> Self {
        self.channels.values = Some(col.to_string());
        self
    }

    pub fn path(mut self, cols: &[&str]) -> Self {
        self.channels.path = cols.iter().map(|c| c.to_string()).collect();
        self
    }

    pub fn r(mut self, col: &str) -> Self {
        self.channels.r = Some(col.to_string());
        self
    }

    pub fn theta(mut self, col: &str) -> Self {
        self.channels.theta = Some(col.to_string());
        self
    }

    pub fn horizontal(mut self) -> Self {
        self.orientation = Orientation::Horizontal;
        self
    }

    pub fn title(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }

    pub fn markers(mut self) -> Self {
        self.markers = true;
        self
    }

    pub fn hole(mut self, fraction: f64) -> Self {
        self.hole = fraction;
        self
    }

    pub fn closed(mut self) -> Self {
        self.close_line = true;
        self
    }
}

// =============================================================================
// Phase 1: Resolution
// =============================================================================

/// Values on one positional axis
#[derive(Debug, Clone, PartialEq)]
pub enum AxisValues {
    Continuous(Vec<f64>),
    Categorical(Vec<String>),
}

impl AxisValues {
    pub fn len(&self) -> usize {
        match self {
            AxisValues::Continuous(v) => v.len(),
            AxisValues::Categorical(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Chart request with every channel looked up and parsed
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedChart {
    pub title: Option<String>,
    pub palette: PaletteId,
    pub x_label: Option<String>,
    pub y_label: Option<String>,
    pub geometry: ResolvedGeometry,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedGeometry {
    Bar {
        categories: Vec<String>,
        values: Vec<f64>,
        color_keys: Option<Vec<String>>,
        orientation: Orientation,
    },
    Pie {
        names: Vec<String>,
        values: Vec<f64>,
        hole: f64,
    },
    Hierarchy {
        layout: HierarchyLayout,
        paths: Vec<Vec<String>>,
        values: Vec<f64>,
    },
    Line {
        x: AxisValues,
        y: Vec<f64>,
        markers: bool,
    },
    Scatter {
        x: AxisValues,
        y: AxisValues,
        color_keys: Option<Vec<String>>,
        sizes: Option<Vec<f64>>,
    },
    Polar {
        theta: Vec<String>,
        r: Vec<f64>,
        closed: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HierarchyLayout {
    Treemap,
    Sunburst,
}

// =============================================================================
// Phase 2: Scaling
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Scale {
    pub domain: (f64, f64), // Coordinate min/max handed to the backend
    pub is_categorical: bool,
    pub categories: Vec<String>, // If categorical, maps index -> label
    /// Categorical only: first category at the far end of the axis
    pub reversed: bool,
}

// =============================================================================
// Phase 3: Compilation (Scene Graph)
// =============================================================================

/// Coordinate system the draw commands are expressed in
#[derive(Debug, Clone, PartialEq)]
pub enum Frame {
    /// Data coordinates with drawn axes
    Cartesian {
        x: Scale,
        y: Scale,
        x_label: Option<String>,
        y_label: Option<String>,
    },
    /// Square [-1, 1] x [-1, 1] area, y up, no axes (pies, polar)
    Radial,
    /// Full [0, 1] x [0, 1] area, y up, no axes (treemaps)
    Area,
}

/// Backend-neutral chart description. The backend executes it blindly.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneGraph {
    pub width: u32,
    pub height: u32,
    pub title: Option<String>,
    pub frame: Frame,
    pub commands: Vec<DrawCommand>,
    pub legend: Vec<LegendEntry>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Rect {
        // Top-Left, Bottom-Right
        tl: (f64, f64),
        br: (f64, f64),
        fill: RGBColor,
        stroke: Option<RGBColor>,
    },
    Polygon {
        points: Vec<(f64, f64)>,
        fill: RGBColor,
        stroke: Option<RGBColor>,
    },
    Line {
        points: Vec<(f64, f64)>,
        color: RGBColor,
        width: u32,
    },
    Marker {
        center: (f64, f64),
        radius: u32, // pixels
        fill: RGBColor,
        alpha: f64,
    },
    Label {
        pos: (f64, f64),
        text: String,
        size: f64,
        color: RGBColor,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub label: String,
    pub color: RGBColor,
}

// =============================================================================
// Phase 4: Output
// =============================================================================

/// Encoded chart image
#[derive(Debug, Clone, PartialEq)]
pub enum ChartImage {
    Svg(String),
    Png(Vec<u8>),
}

/// One rendered chart, ready to be placed on the page
#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    pub image: ChartImage,
    pub legend: Vec<LegendEntry>,
}
