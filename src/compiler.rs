use crate::error::Result;
use crate::geometry::{self, Node, Rect};
use crate::ir::{
    AxisValues, DrawCommand, Frame, HierarchyLayout, LegendEntry, Orientation, ResolvedChart,
    ResolvedGeometry, Scale, SceneGraph,
};
use crate::palette::ColorPalette;
use crate::RenderOptions;
use plotters::style::RGBColor;

const WHITE: RGBColor = RGBColor(255, 255, 255);
const INK: RGBColor = RGBColor(42, 63, 95);
const GUIDE: RGBColor = RGBColor(215, 222, 232);

/// Radius of the outermost ring in the radial frame
const OUTER_RADIUS: f64 = 0.9;
const BAR_WIDTH: f64 = 0.8;

/// Compile a resolved chart into a SceneGraph of drawing commands
pub fn compile_scene(chart: &ResolvedChart, options: &RenderOptions) -> Result<SceneGraph> {
    let mut palette = ColorPalette::new(chart.palette);

    let (frame, commands, legend) = match &chart.geometry {
        ResolvedGeometry::Bar {
            categories,
            values,
            color_keys,
            orientation,
        } => compile_bars(
            chart,
            categories,
            values,
            color_keys.as_deref(),
            *orientation,
            &mut palette,
        ),
        ResolvedGeometry::Pie { names, values, hole } => {
            compile_pie(names, values, *hole, &mut palette)
        }
        ResolvedGeometry::Hierarchy { layout, paths, values } => {
            let roots = geometry::build_hierarchy(paths, values);
            match layout {
                HierarchyLayout::Sunburst => compile_sunburst(&roots, &mut palette),
                HierarchyLayout::Treemap => compile_treemap(&roots, &mut palette),
            }
        }
        ResolvedGeometry::Line { x, y, markers } => compile_line(chart, x, y, *markers, &palette),
        ResolvedGeometry::Scatter { x, y, color_keys, sizes } => {
            compile_scatter(chart, x, y, color_keys.as_deref(), sizes.as_deref(), &mut palette)
        }
        ResolvedGeometry::Polar { theta, r, closed } => compile_polar(theta, r, *closed, &palette),
    };

    Ok(SceneGraph {
        width: options.width,
        height: options.height,
        title: chart.title.clone(),
        frame,
        commands,
        legend,
    })
}

type Compiled = (Frame, Vec<DrawCommand>, Vec<LegendEntry>);

// =============================================================================
// Cartesian charts
// =============================================================================

fn compile_bars(
    chart: &ResolvedChart,
    categories: &[String],
    values: &[f64],
    color_keys: Option<&[String]>,
    orientation: Orientation,
    palette: &mut ColorPalette,
) -> Compiled {
    let horizontal = orientation == Orientation::Horizontal;
    // Horizontal bars list the first row at the top
    let cat_scale = Scale::categorical(crate::scale::unique_in_order(categories), horizontal);
    let val_scale = Scale::continuous(values, true);
    let half = BAR_WIDTH / 2.0;

    let mut commands = Vec::with_capacity(values.len());
    for (idx, (category, &value)) in categories.iter().zip(values).enumerate() {
        let slot = cat_scale.slot_of(category).unwrap_or(idx as f64);
        let fill = match color_keys {
            Some(keys) => palette.color_for(&keys[idx]),
            None => palette.primary(),
        };
        let (tl, br) = if horizontal {
            ((0.0, slot + half), (value, slot - half))
        } else {
            ((slot - half, value), (slot + half, 0.0))
        };
        commands.push(DrawCommand::Rect { tl, br, fill, stroke: None });
    }

    let (x, y) = if horizontal { (val_scale, cat_scale) } else { (cat_scale, val_scale) };
    let frame = Frame::Cartesian {
        x,
        y,
        x_label: chart.x_label.clone(),
        y_label: chart.y_label.clone(),
    };
    (frame, commands, legend_if(color_keys.is_some(), palette))
}

fn compile_line(
    chart: &ResolvedChart,
    x: &AxisValues,
    y: &[f64],
    markers: bool,
    palette: &ColorPalette,
) -> Compiled {
    let x_scale = Scale::for_axis(x, false);
    let y_scale = Scale::continuous(y, false);
    let color = palette.primary();

    let points: Vec<(f64, f64)> = (0..y.len())
        .map(|idx| (axis_coord(&x_scale, x, idx), y[idx]))
        .collect();

    let mut commands = vec![DrawCommand::Line {
        points: points.clone(),
        color,
        width: 2,
    }];
    if markers {
        commands.extend(points.into_iter().map(|center| DrawCommand::Marker {
            center,
            radius: 4,
            fill: color,
            alpha: 1.0,
        }));
    }

    let frame = Frame::Cartesian {
        x: x_scale,
        y: y_scale,
        x_label: chart.x_label.clone(),
        y_label: chart.y_label.clone(),
    };
    (frame, commands, Vec::new())
}

fn compile_scatter(
    chart: &ResolvedChart,
    x: &AxisValues,
    y: &AxisValues,
    color_keys: Option<&[String]>,
    sizes: Option<&[f64]>,
    palette: &mut ColorPalette,
) -> Compiled {
    let x_scale = Scale::for_axis(x, false);
    let y_scale = Scale::for_axis(y, false);
    let radii = marker_radii(sizes, x.len());

    let commands = (0..x.len())
        .map(|idx| DrawCommand::Marker {
            center: (axis_coord(&x_scale, x, idx), axis_coord(&y_scale, y, idx)),
            radius: radii[idx],
            fill: match color_keys {
                Some(keys) => palette.color_for(&keys[idx]),
                None => palette.primary(),
            },
            alpha: 0.8,
        })
        .collect();

    let frame = Frame::Cartesian {
        x: x_scale,
        y: y_scale,
        x_label: chart.x_label.clone(),
        y_label: chart.y_label.clone(),
    };
    (frame, commands, legend_if(color_keys.is_some(), palette))
}

/// Linear map of the size channel onto marker radii in pixels
fn marker_radii(sizes: Option<&[f64]>, n: usize) -> Vec<u32> {
    const MIN_RADIUS: f64 = 4.0;
    const MAX_RADIUS: f64 = 18.0;

    let sizes = match sizes {
        Some(s) => s,
        None => return vec![6; n],
    };
    let min = sizes.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = sizes.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    sizes
        .iter()
        .map(|&s| {
            let t = if max > min { (s - min) / (max - min) } else { 0.5 };
            (MIN_RADIUS + t * (MAX_RADIUS - MIN_RADIUS)).round() as u32
        })
        .collect()
}

fn axis_coord(scale: &Scale, values: &AxisValues, idx: usize) -> f64 {
    match values {
        AxisValues::Continuous(v) => v[idx],
        AxisValues::Categorical(v) => scale.slot_of(&v[idx]).unwrap_or(idx as f64),
    }
}

// =============================================================================
// Radial charts
// =============================================================================

fn compile_pie(
    names: &[String],
    values: &[f64],
    hole: f64,
    palette: &mut ColorPalette,
) -> Compiled {
    let total: f64 = values.iter().sum();
    let inner = hole * OUTER_RADIUS;
    let mut commands = Vec::new();
    let mut labels = Vec::new();
    let mut start = 0.0;

    for (name, &value) in names.iter().zip(values) {
        let fill = palette.color_for(name);
        let share = value / total;
        if share <= 0.0 {
            continue;
        }
        let end = start + share;
        commands.push(DrawCommand::Polygon {
            points: geometry::wedge(start, end, inner, OUTER_RADIUS),
            fill,
            stroke: Some(WHITE),
        });
        if share >= 0.04 {
            let label_radius = (inner + OUTER_RADIUS) / 2.0;
            labels.push(DrawCommand::Label {
                pos: geometry::polar_point(label_radius, (start + end) / 2.0),
                text: format!("{:.1}%", share * 100.0),
                size: 12.0,
                color: WHITE,
            });
        }
        start = end;
    }
    // Labels go on top of every wedge
    commands.extend(labels);

    (Frame::Radial, commands, legend_if(true, palette))
}

fn compile_sunburst(roots: &[Node], palette: &mut ColorPalette) -> Compiled {
    let levels = geometry::depth(roots).max(1);
    let ring = OUTER_RADIUS / levels as f64;
    let total: f64 = roots.iter().map(|n| n.value).sum();

    let mut commands = Vec::new();
    let mut labels = Vec::new();
    let mut start = 0.0;
    for root in roots {
        let color = palette.color_for(&root.label);
        let span = root.value / total;
        sunburst_node(root, start, span, 0, ring, color, &mut commands, &mut labels);
        start += span;
    }
    commands.extend(labels);

    (Frame::Radial, commands, legend_if(true, palette))
}

#[allow(clippy::too_many_arguments)]
fn sunburst_node(
    node: &Node,
    start: f64,
    span: f64,
    level: usize,
    ring: f64,
    color: RGBColor,
    commands: &mut Vec<DrawCommand>,
    labels: &mut Vec<DrawCommand>,
) {
    if span <= 0.0 {
        return;
    }
    let inner = ring * level as f64;
    let outer = inner + ring;
    commands.push(DrawCommand::Polygon {
        points: geometry::wedge(start, start + span, inner, outer),
        fill: color,
        stroke: Some(WHITE),
    });
    if span >= 0.05 {
        let radius = if level == 0 && inner == 0.0 { outer * 0.6 } else { (inner + outer) / 2.0 };
        labels.push(DrawCommand::Label {
            pos: geometry::polar_point(radius, start + span / 2.0),
            text: node.label.clone(),
            size: 11.0,
            color: INK,
        });
    }

    let mut child_start = start;
    for child in &node.children {
        let child_span = if node.value > 0.0 { span * child.value / node.value } else { 0.0 };
        let child_color = lighten(color, 0.25);
        sunburst_node(
            child,
            child_start,
            child_span,
            level + 1,
            ring,
            child_color,
            commands,
            labels,
        );
        child_start += child_span;
    }
}

fn compile_polar(theta: &[String], r: &[f64], closed: bool, palette: &ColorPalette) -> Compiled {
    let categories = crate::scale::unique_in_order(theta);
    let n = categories.len().max(1) as f64;
    let r_max = r.iter().cloned().fold(0.0, f64::max);
    let r_max = if r_max > 0.0 { r_max } else { 1.0 };
    let turn_of = |label: &str| {
        categories.iter().position(|c| c == label).unwrap_or(0) as f64 / n
    };

    let mut commands = Vec::new();

    // Guide rings with their values on the 12 o'clock spoke
    for step in 1..=4 {
        let fraction = step as f64 / 4.0;
        commands.push(DrawCommand::Line {
            points: geometry::ring(OUTER_RADIUS * fraction),
            color: GUIDE,
            width: 1,
        });
        commands.push(DrawCommand::Label {
            pos: (0.04, OUTER_RADIUS * fraction),
            text: format_value(r_max * fraction),
            size: 10.0,
            color: INK,
        });
    }
    // Spokes and category labels
    for category in &categories {
        let turn = turn_of(category);
        commands.push(DrawCommand::Line {
            points: vec![(0.0, 0.0), geometry::polar_point(OUTER_RADIUS, turn)],
            color: GUIDE,
            width: 1,
        });
        commands.push(DrawCommand::Label {
            pos: geometry::polar_point(OUTER_RADIUS + 0.1, turn),
            text: category.clone(),
            size: 10.0,
            color: INK,
        });
    }

    let mut points: Vec<(f64, f64)> = theta
        .iter()
        .zip(r)
        .map(|(label, &value)| geometry::polar_point(OUTER_RADIUS * value / r_max, turn_of(label)))
        .collect();
    if closed {
        if let Some(&first) = points.first() {
            points.push(first);
        }
    }
    commands.push(DrawCommand::Line {
        points,
        color: palette.primary(),
        width: 2,
    });

    (Frame::Radial, commands, Vec::new())
}

// =============================================================================
// Treemap
// =============================================================================

/// Header strip reserved for a parent's label, in area units
const TREEMAP_HEADER: f64 = 0.05;
const TREEMAP_PAD: f64 = 0.006;

fn compile_treemap(roots: &[Node], palette: &mut ColorPalette) -> Compiled {
    let bounds = Rect { x: 0.0, y: 0.0, w: 1.0, h: 1.0 };
    let mut commands = Vec::new();
    let mut labels = Vec::new();

    let values: Vec<f64> = roots.iter().map(|n| n.value).collect();
    for (root, rect) in roots.iter().zip(geometry::squarify(&values, bounds)) {
        let color = palette.color_for(&root.label);
        treemap_node(root, rect, color, &mut commands, &mut labels);
    }
    commands.extend(labels);

    (Frame::Area, commands, legend_if(true, palette))
}

fn treemap_node(
    node: &Node,
    rect: Rect,
    color: RGBColor,
    commands: &mut Vec<DrawCommand>,
    labels: &mut Vec<DrawCommand>,
) {
    if rect.w <= 0.0 || rect.h <= 0.0 {
        return;
    }
    // Area frame is y up; layout runs top-down
    commands.push(DrawCommand::Rect {
        tl: (rect.x, 1.0 - rect.y),
        br: (rect.x + rect.w, 1.0 - (rect.y + rect.h)),
        fill: color,
        stroke: Some(WHITE),
    });

    if node.children.is_empty() {
        let (cx, cy) = rect.center();
        labels.push(DrawCommand::Label {
            pos: (cx, 1.0 - cy),
            text: node.label.clone(),
            size: 11.0,
            color: INK,
        });
        return;
    }

    labels.push(DrawCommand::Label {
        pos: (rect.x + rect.w / 2.0, 1.0 - (rect.y + TREEMAP_HEADER / 2.0)),
        text: node.label.clone(),
        size: 11.0,
        color: INK,
    });
    let inner = rect.inset(TREEMAP_PAD, TREEMAP_HEADER, TREEMAP_PAD, TREEMAP_PAD);
    let values: Vec<f64> = node.children.iter().map(|c| c.value).collect();
    for (child, child_rect) in node.children.iter().zip(geometry::squarify(&values, inner)) {
        treemap_node(child, child_rect, lighten(color, 0.25), commands, labels);
    }
}

// =============================================================================
// Helpers
// =============================================================================

fn legend_if(enabled: bool, palette: &ColorPalette) -> Vec<LegendEntry> {
    if !enabled {
        return Vec::new();
    }
    palette
        .entries()
        .into_iter()
        .map(|(label, color)| LegendEntry { label, color })
        .collect()
}

/// Blend towards white by `amount` in [0, 1]
fn lighten(color: RGBColor, amount: f64) -> RGBColor {
    let mix = |c: u8| (c as f64 + (255.0 - c as f64) * amount).round() as u8;
    RGBColor(mix(color.0), mix(color.1), mix(color.2))
}

/// Compact number for ticks and guide labels (1.2M, 35k, 0.004)
pub fn format_value(value: f64) -> String {
    let abs = value.abs();
    if abs >= 1e9 {
        format!("{}B", trim_float(value / 1e9))
    } else if abs >= 1e6 {
        format!("{}M", trim_float(value / 1e6))
    } else if abs >= 1e4 {
        format!("{}k", trim_float(value / 1e3))
    } else {
        trim_float(value)
    }
}

fn trim_float(value: f64) -> String {
    let precision = if value.abs() >= 100.0 {
        0
    } else if value.abs() >= 1.0 {
        2
    } else {
        4
    };
    let s = format!("{:.*}", precision, value);
    if s.contains('.') {
        let s = s.trim_end_matches('0').trim_end_matches('.');
        if s == "-0" { "0".to_string() } else { s.to_string() }
    } else {
        s
    }
}
