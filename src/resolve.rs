use crate::data::Dataset;
use crate::error::{DashboardError, Result};
use crate::ir::{
    AxisValues, ChartKind, ChartSpec, HierarchyLayout, Orientation, ResolvedChart, ResolvedGeometry,
};

/// Resolve every channel of a chart request against the dataset.
///
/// All referenced columns are looked up before any value is parsed, so a
/// missing column always surfaces as `ColumnNotFound`. An empty dataset or a
/// mapping the chart kind cannot draw surfaces as `ChartRender`.
pub fn resolve_chart(data: &Dataset, spec: &ChartSpec) -> Result<ResolvedChart> {
    // 1. Every referenced column must exist
    for col in referenced_columns(spec)? {
        data.column_index(col)?;
    }

    // 2. Nothing to draw
    if data.is_empty() {
        return Err(DashboardError::chart_render(format!(
            "{:?} chart has no rows to draw",
            spec.kind
        )));
    }

    // 3. Extract per kind
    let ch = &spec.channels;
    let (geometry, x_label, y_label) = match spec.kind {
        ChartKind::Bar => {
            let x = required(&ch.x, spec.kind, "x")?;
            let y = required(&ch.y, spec.kind, "y")?;
            let (cat_col, val_col) = match spec.orientation {
                Orientation::Vertical => (x, y),
                Orientation::Horizontal => (y, x),
            };
            let geometry = ResolvedGeometry::Bar {
                categories: data.text_column(cat_col)?,
                values: data.numeric_column(val_col)?,
                color_keys: optional_text(data, &ch.color)?,
                orientation: spec.orientation,
            };
            (geometry, Some(x.to_string()), Some(y.to_string()))
        }
        ChartKind::Pie | ChartKind::Donut => {
            let names = required(&ch.names, spec.kind, "names")?;
            let values = data.numeric_column(required(&ch.values, spec.kind, "values")?)?;
            check_parts(&values, spec.kind)?;
            let hole = if spec.kind == ChartKind::Donut { spec.hole } else { 0.0 };
            if !(0.0..0.95).contains(&hole) {
                return Err(DashboardError::chart_render(format!(
                    "hole fraction {} outside [0, 0.95)",
                    hole
                )));
            }
            let geometry = ResolvedGeometry::Pie {
                names: data.text_column(names)?,
                values,
                hole,
            };
            (geometry, None, None)
        }
        ChartKind::Treemap | ChartKind::Sunburst => {
            let levels = hierarchy_levels(spec)?;
            let values = data.numeric_column(required(&ch.values, spec.kind, "values")?)?;
            check_parts(&values, spec.kind)?;

            let columns: Vec<Vec<String>> = levels
                .iter()
                .map(|col| data.text_column(col))
                .collect::<Result<_>>()?;
            let paths = (0..data.len())
                .map(|row| columns.iter().map(|col| col[row].clone()).collect())
                .collect();

            let layout = if spec.kind == ChartKind::Treemap {
                HierarchyLayout::Treemap
            } else {
                HierarchyLayout::Sunburst
            };
            (ResolvedGeometry::Hierarchy { layout, paths, values }, None, None)
        }
        ChartKind::Line => {
            let x = required(&ch.x, spec.kind, "x")?;
            let y = required(&ch.y, spec.kind, "y")?;
            let geometry = ResolvedGeometry::Line {
                x: axis_values(data, x)?,
                y: data.numeric_column(y)?,
                markers: spec.markers,
            };
            (geometry, Some(x.to_string()), Some(y.to_string()))
        }
        ChartKind::Scatter => {
            let x = required(&ch.x, spec.kind, "x")?;
            let y = required(&ch.y, spec.kind, "y")?;
            let sizes = match &ch.size {
                Some(col) => Some(data.numeric_column(col)?),
                None => None,
            };
            let geometry = ResolvedGeometry::Scatter {
                x: axis_values(data, x)?,
                y: axis_values(data, y)?,
                color_keys: optional_text(data, &ch.color)?,
                sizes,
            };
            (geometry, Some(x.to_string()), Some(y.to_string()))
        }
        ChartKind::PolarLine => {
            let r = data.numeric_column(required(&ch.r, spec.kind, "r")?)?;
            if r.iter().any(|v| *v < 0.0) {
                return Err(DashboardError::chart_render("polar radius must not be negative"));
            }
            let geometry = ResolvedGeometry::Polar {
                theta: data.text_column(required(&ch.theta, spec.kind, "theta")?)?,
                r,
                closed: spec.close_line,
            };
            (geometry, None, None)
        }
    };

    Ok(ResolvedChart {
        title: spec.title.clone(),
        palette: spec.palette,
        x_label,
        y_label,
        geometry,
    })
}

/// Every column a request touches, required channels first
fn referenced_columns(spec: &ChartSpec) -> Result<Vec<&str>> {
    let ch = &spec.channels;
    let mut cols: Vec<&str> = match spec.kind {
        ChartKind::Bar | ChartKind::Line | ChartKind::Scatter => vec![
            required(&ch.x, spec.kind, "x")?,
            required(&ch.y, spec.kind, "y")?,
        ],
        ChartKind::Pie | ChartKind::Donut => vec![
            required(&ch.names, spec.kind, "names")?,
            required(&ch.values, spec.kind, "values")?,
        ],
        ChartKind::Treemap | ChartKind::Sunburst => {
            let mut cols = hierarchy_levels(spec)?;
            cols.push(required(&ch.values, spec.kind, "values")?);
            cols
        }
        ChartKind::PolarLine => vec![
            required(&ch.r, spec.kind, "r")?,
            required(&ch.theta, spec.kind, "theta")?,
        ],
    };
    cols.extend(ch.color.as_deref());
    if spec.kind == ChartKind::Scatter {
        cols.extend(ch.size.as_deref());
    }
    Ok(cols)
}

/// `path` levels, falling back to `names` as a single level
fn hierarchy_levels(spec: &ChartSpec) -> Result<Vec<&str>> {
    if !spec.channels.path.is_empty() {
        return Ok(spec.channels.path.iter().map(|s| s.as_str()).collect());
    }
    Ok(vec![required(&spec.channels.names, spec.kind, "path")?])
}

fn required<'a>(channel: &'a Option<String>, kind: ChartKind, name: &str) -> Result<&'a str> {
    channel.as_deref().ok_or_else(|| {
        DashboardError::chart_render(format!("{:?} chart requires a '{}' mapping", kind, name))
    })
}

fn optional_text(data: &Dataset, channel: &Option<String>) -> Result<Option<Vec<String>>> {
    match channel {
        Some(col) => Ok(Some(data.text_column(col)?)),
        None => Ok(None),
    }
}

/// Numeric when every cell parses, categorical otherwise
fn axis_values(data: &Dataset, col: &str) -> Result<AxisValues> {
    if data.is_numeric(col)? {
        Ok(AxisValues::Continuous(data.numeric_column(col)?))
    } else {
        Ok(AxisValues::Categorical(data.text_column(col)?))
    }
}

/// Part-of-whole charts need non-negative values with a positive total
fn check_parts(values: &[f64], kind: ChartKind) -> Result<()> {
    if values.iter().any(|v| *v < 0.0) {
        return Err(DashboardError::chart_render(format!(
            "{:?} chart cannot show negative values",
            kind
        )));
    }
    if values.iter().sum::<f64>() <= 0.0 {
        return Err(DashboardError::chart_render(format!(
            "{:?} chart values sum to zero",
            kind
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::PaletteId;

    fn platforms() -> Dataset {
        Dataset::from_literals(
            &["platform_name", "total_streams"],
            &[&["Spotify", "300"], &["Deezer", "100"], &["Tidal", "200"]],
        )
    }

    #[test]
    fn test_resolve_horizontal_bar_swaps_axes() {
        let spec = ChartSpec::new(ChartKind::Bar, PaletteId::Pastel)
            .x("total_streams")
            .y("platform_name")
            .color("platform_name")
            .horizontal();
        let resolved = resolve_chart(&platforms(), &spec).unwrap();
        match resolved.geometry {
            ResolvedGeometry::Bar { categories, values, color_keys, orientation } => {
                assert_eq!(categories, vec!["Spotify", "Deezer", "Tidal"]);
                assert_eq!(values, vec![300.0, 100.0, 200.0]);
                assert_eq!(color_keys.unwrap().len(), 3);
                assert_eq!(orientation, Orientation::Horizontal);
            }
            other => panic!("unexpected geometry {:?}", other),
        }
        assert_eq!(resolved.x_label.as_deref(), Some("total_streams"));
    }

    #[test]
    fn test_resolve_missing_column() {
        let spec = ChartSpec::new(ChartKind::Bar, PaletteId::Pastel)
            .x("platform_name")
            .y("total_revenue");
        let err = resolve_chart(&platforms(), &spec).unwrap_err();
        assert!(matches!(
            err,
            DashboardError::ColumnNotFound { ref column, .. } if column == "total_revenue"
        ));
    }

    #[test]
    fn test_resolve_missing_color_column() {
        let spec = ChartSpec::new(ChartKind::Bar, PaletteId::Pastel)
            .x("platform_name")
            .y("total_streams")
            .color("genre");
        let err = resolve_chart(&platforms(), &spec).unwrap_err();
        assert!(matches!(err, DashboardError::ColumnNotFound { .. }));
    }

    #[test]
    fn test_resolve_missing_column_wins_over_empty() {
        let data = Dataset::from_literals(&["a", "b"], &[]);
        let spec = ChartSpec::new(ChartKind::Line, PaletteId::Set3).x("a").y("c");
        let err = resolve_chart(&data, &spec).unwrap_err();
        assert!(matches!(err, DashboardError::ColumnNotFound { .. }));
    }

    #[test]
    fn test_resolve_empty_dataset() {
        let data = Dataset::from_literals(&["a", "b"], &[]);
        let spec = ChartSpec::new(ChartKind::Line, PaletteId::Set3).x("a").y("b");
        let err = resolve_chart(&data, &spec).unwrap_err();
        assert!(matches!(err, DashboardError::ChartRender(_)));
    }

    #[test]
    fn test_resolve_missing_channel() {
        let spec = ChartSpec::new(ChartKind::Pie, PaletteId::Set2).names("platform_name");
        let err = resolve_chart(&platforms(), &spec).unwrap_err();
        assert!(err.to_string().contains("'values'"));
    }

    #[test]
    fn test_resolve_pie_rejects_negative() {
        let data = Dataset::from_literals(&["n", "v"], &[&["a", "3"], &["b", "-1"]]);
        let spec = ChartSpec::new(ChartKind::Pie, PaletteId::Set2).names("n").values("v");
        assert!(matches!(resolve_chart(&data, &spec), Err(DashboardError::ChartRender(_))));
    }

    #[test]
    fn test_resolve_donut_hole() {
        let data = Dataset::from_literals(&["n", "v"], &[&["a", "3"]]);
        let spec = ChartSpec::new(ChartKind::Donut, PaletteId::BluesR).names("n").values("v");
        match resolve_chart(&data, &spec).unwrap().geometry {
            ResolvedGeometry::Pie { hole, .. } => assert_eq!(hole, 0.5),
            other => panic!("unexpected geometry {:?}", other),
        }
    }

    #[test]
    fn test_resolve_hierarchy_from_names() {
        let spec = ChartSpec::new(ChartKind::Treemap, PaletteId::YlOrRd)
            .names("platform_name")
            .values("total_streams");
        match resolve_chart(&platforms(), &spec).unwrap().geometry {
            ResolvedGeometry::Hierarchy { layout, paths, values } => {
                assert_eq!(layout, HierarchyLayout::Treemap);
                assert_eq!(paths[0], vec!["Spotify"]);
                assert_eq!(values.len(), 3);
            }
            other => panic!("unexpected geometry {:?}", other),
        }
    }

    #[test]
    fn test_resolve_scatter_mixed_axes() {
        let data = Dataset::from_literals(
            &["genre", "avg_popularity"],
            &[&["Pop", "80"], &["Jazz", "40"]],
        );
        let spec = ChartSpec::new(ChartKind::Scatter, PaletteId::PlasmaR)
            .x("avg_popularity")
            .y("genre")
            .size("avg_popularity")
            .color("genre");
        match resolve_chart(&data, &spec).unwrap().geometry {
            ResolvedGeometry::Scatter { x, y, sizes, .. } => {
                assert_eq!(x, AxisValues::Continuous(vec![80.0, 40.0]));
                assert_eq!(y, AxisValues::Categorical(vec!["Pop".into(), "Jazz".into()]));
                assert_eq!(sizes, Some(vec![80.0, 40.0]));
            }
            other => panic!("unexpected geometry {:?}", other),
        }
    }

    #[test]
    fn test_resolve_bar_value_not_numeric() {
        let spec = ChartSpec::new(ChartKind::Bar, PaletteId::Dark2)
            .x("total_streams")
            .y("platform_name");
        let err = resolve_chart(&platforms(), &spec).unwrap_err();
        assert!(matches!(err, DashboardError::DataSource { .. }));
    }
}
