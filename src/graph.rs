use crate::compiler::format_value;
use crate::error::{DashboardError, Result};
use crate::ir::{ChartImage, DrawCommand, Frame, Scale, SceneGraph};
use crate::OutputFormat;
use image::ImageEncoder;
use plotters::coord::{CoordTranslate, Shift};
use plotters::drawing::DrawingAreaErrorKind;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

const INK: RGBColor = RGBColor(42, 63, 95);

/// Largest canvas the bitmap backend will allocate (64 megapixels)
const MAX_PIXELS: usize = 64 * 1024 * 1024;

type DrawResult<DB> =
    std::result::Result<(), DrawingAreaErrorKind<<DB as DrawingBackend>::ErrorType>>;

/// Execute a SceneGraph on an in-memory backend and encode the result
pub fn render_scene(scene: &SceneGraph, format: OutputFormat) -> Result<ChartImage> {
    if scene.width == 0 || scene.height == 0 {
        return Err(DashboardError::chart_render(format!(
            "invalid canvas size {}x{}",
            scene.width, scene.height
        )));
    }

    match format {
        OutputFormat::Svg => {
            let mut svg = String::new();
            {
                let root = SVGBackend::with_string(&mut svg, (scene.width, scene.height))
                    .into_drawing_area();
                draw_scene(&root, scene).map_err(backend_error)?;
                root.present().map_err(backend_error)?;
            }
            Ok(ChartImage::Svg(svg))
        }
        OutputFormat::Png => {
            let mut buffer = vec![0u8; rgb_buffer_len(scene.width, scene.height)?];
            {
                let root = BitMapBackend::with_buffer(&mut buffer, (scene.width, scene.height))
                    .into_drawing_area();
                draw_scene(&root, scene).map_err(backend_error)?;
                root.present().map_err(backend_error)?;
            }
            encode_png(&buffer, scene.width, scene.height).map(ChartImage::Png)
        }
    }
}

/// Byte length of an RGB buffer, refusing canvases that would not fit
fn rgb_buffer_len(width: u32, height: u32) -> Result<usize> {
    let pixels = (width as usize)
        .checked_mul(height as usize)
        .filter(|pixels| *pixels <= MAX_PIXELS)
        .ok_or_else(|| {
            DashboardError::chart_render(format!(
                "canvas {}x{} exceeds the {} pixel limit",
                width, height, MAX_PIXELS
            ))
        })?;
    Ok(pixels * 3)
}

/// Encode an RGB buffer as PNG
fn encode_png(buffer: &[u8], width: u32, height: u32) -> Result<Vec<u8>> {
    let mut png_bytes = Vec::new();
    {
        let encoder = image::codecs::png::PngEncoder::new(&mut png_bytes);
        encoder
            .write_image(buffer, width, height, image::ColorType::Rgb8)
            .map_err(|e| DashboardError::chart_render(format!("Failed to encode PNG: {}", e)))?;
    }
    Ok(png_bytes)
}

fn backend_error<E: std::fmt::Display>(err: E) -> DashboardError {
    DashboardError::chart_render(err.to_string())
}

fn draw_scene<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    scene: &SceneGraph,
) -> DrawResult<DB> {
    root.fill(&WHITE)?;

    let area = match &scene.title {
        Some(title) => root.titled(title, ("sans-serif", 18.0).into_font().color(&INK))?,
        None => root.clone(),
    };

    match &scene.frame {
        Frame::Cartesian { x, y, x_label, y_label } => {
            let mut chart = ChartBuilder::on(&area)
                .margin(12)
                .x_label_area_size(if x_label.is_some() { 50 } else { 35 })
                .y_label_area_size(if y.is_categorical { 110 } else { 60 })
                .build_cartesian_2d(x.domain.0..x.domain.1, y.domain.0..y.domain.1)?;

            let x_fmt = |v: &f64| tick_label(x, *v);
            let y_fmt = |v: &f64| tick_label(y, *v);
            {
                let mut mesh = chart.configure_mesh();
                mesh.x_label_formatter(&x_fmt).y_label_formatter(&y_fmt);
                // Category slots get one tick each and no grid line
                if x.is_categorical {
                    mesh.x_labels(x.categories.len()).disable_x_mesh();
                }
                if y.is_categorical {
                    mesh.y_labels(y.categories.len()).disable_y_mesh();
                }
                if let Some(label) = x_label {
                    mesh.x_desc(label.as_str());
                }
                if let Some(label) = y_label {
                    mesh.y_desc(label.as_str());
                }
                mesh.draw()?;
            }

            draw_commands(chart.plotting_area(), &scene.commands)?;
        }
        Frame::Radial => {
            // Keep circles round
            let (w, h) = area.dim_in_pixel();
            let side = w.min(h);
            let square = area.clone().shrink(((w - side) / 2, (h - side) / 2), (side, side));
            let chart = ChartBuilder::on(&square)
                .margin(8)
                .build_cartesian_2d(-1.1..1.1, -1.1..1.1)?;
            draw_commands(chart.plotting_area(), &scene.commands)?;
        }
        Frame::Area => {
            let chart = ChartBuilder::on(&area)
                .margin(4)
                .build_cartesian_2d(0.0..1.0, 0.0..1.0)?;
            draw_commands(chart.plotting_area(), &scene.commands)?;
        }
    }

    Ok(())
}

fn draw_commands<DB, CT>(area: &DrawingArea<DB, CT>, commands: &[DrawCommand]) -> DrawResult<DB>
where
    DB: DrawingBackend,
    CT: CoordTranslate<From = (f64, f64)>,
{
    for command in commands {
        match command {
            DrawCommand::Rect { tl, br, fill, stroke } => {
                area.draw(&Rectangle::new([*tl, *br], fill.filled()))?;
                if let Some(stroke) = stroke {
                    area.draw(&Rectangle::new([*tl, *br], stroke.stroke_width(1)))?;
                }
            }
            DrawCommand::Polygon { points, fill, stroke } => {
                area.draw(&Polygon::new(points.clone(), fill.filled()))?;
                if let Some(stroke) = stroke {
                    let mut outline = points.clone();
                    outline.extend(points.first().copied());
                    area.draw(&PathElement::new(outline, stroke.stroke_width(1)))?;
                }
            }
            DrawCommand::Line { points, color, width } => {
                area.draw(&PathElement::new(points.clone(), color.stroke_width(*width)))?;
            }
            DrawCommand::Marker { center, radius, fill, alpha } => {
                area.draw(&Circle::new(*center, *radius as i32, fill.mix(*alpha).filled()))?;
            }
            DrawCommand::Label { pos, text, size, color } => {
                let style = ("sans-serif", *size)
                    .into_font()
                    .color(color)
                    .pos(Pos::new(HPos::Center, VPos::Center));
                area.draw(&Text::new(text.clone(), *pos, style))?;
            }
        }
    }
    Ok(())
}

fn tick_label(scale: &Scale, value: f64) -> String {
    if scale.is_categorical {
        scale.label_at(value)
    } else {
        format_value(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::LegendEntry;

    fn bar_scene() -> SceneGraph {
        SceneGraph {
            width: 320,
            height: 240,
            title: Some("Streams".to_string()),
            frame: Frame::Cartesian {
                x: Scale::categorical(vec!["a".to_string(), "b".to_string()], false),
                y: Scale::continuous(&[0.0, 10.0], true),
                x_label: Some("platform_name".to_string()),
                y_label: None,
            },
            commands: vec![
                DrawCommand::Rect {
                    tl: (-0.4, 4.0),
                    br: (0.4, 0.0),
                    fill: RGBColor(102, 197, 204),
                    stroke: None,
                },
                DrawCommand::Rect {
                    tl: (0.6, 10.0),
                    br: (1.4, 0.0),
                    fill: RGBColor(246, 207, 113),
                    stroke: None,
                },
            ],
            legend: vec![LegendEntry { label: "a".to_string(), color: RGBColor(102, 197, 204) }],
        }
    }

    #[test]
    fn test_render_svg() {
        let image = render_scene(&bar_scene(), OutputFormat::Svg).unwrap();
        match image {
            ChartImage::Svg(svg) => {
                assert!(svg.contains("<svg"));
                assert!(svg.contains("platform_name"));
            }
            other => panic!("expected svg, got {:?}", other),
        }
    }

    #[test]
    fn test_render_png_signature() {
        let image = render_scene(&bar_scene(), OutputFormat::Png).unwrap();
        match image {
            ChartImage::Png(bytes) => {
                assert!(bytes.len() > 8);
                assert_eq!(&bytes[0..8], &[137, 80, 78, 71, 13, 10, 26, 10]);
            }
            other => panic!("expected png, got {:?}", other),
        }
    }

    #[test]
    fn test_render_radial_svg() {
        let scene = SceneGraph {
            width: 300,
            height: 200,
            title: None,
            frame: Frame::Radial,
            commands: vec![
                DrawCommand::Polygon {
                    points: crate::geometry::wedge(0.0, 0.6, 0.0, 0.9),
                    fill: RGBColor(8, 48, 107),
                    stroke: Some(WHITE),
                },
                DrawCommand::Label {
                    pos: (0.3, 0.3),
                    text: "60.0%".to_string(),
                    size: 12.0,
                    color: WHITE,
                },
            ],
            legend: Vec::new(),
        };
        match render_scene(&scene, OutputFormat::Svg).unwrap() {
            ChartImage::Svg(svg) => assert!(svg.contains("60.0%")),
            other => panic!("expected svg, got {:?}", other),
        }
    }

    #[test]
    fn test_render_zero_size() {
        let mut scene = bar_scene();
        scene.width = 0;
        assert!(matches!(
            render_scene(&scene, OutputFormat::Svg),
            Err(DashboardError::ChartRender(_))
        ));
    }

    #[test]
    fn test_render_png_oversized() {
        let mut scene = bar_scene();
        scene.width = 70_000;
        scene.height = 70_000;
        let err = render_scene(&scene, OutputFormat::Png).unwrap_err();
        assert!(matches!(err, DashboardError::ChartRender(_)));
        assert!(err.to_string().contains("70000x70000"));
    }

    #[test]
    fn test_rgb_buffer_len() {
        assert_eq!(rgb_buffer_len(800, 600).unwrap(), 800 * 600 * 3);
        assert!(rgb_buffer_len(u32::MAX, u32::MAX).is_err());
    }
}
