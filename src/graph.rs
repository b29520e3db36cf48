#![cfg(not(tarpaulin_include))]

use crate::error::{DashboardError, Result};
use crate::figures::{Bar, Figure, FigureData, HIGHLIGHT_COLOR, Series, Slice, YearBin};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::FontTransform;
use std::f64::consts::PI;

/// Configuration options for chart rendering
#[derive(Clone, Debug)]
pub struct GraphOptions {
    /// Width of the chart in pixels
    pub width: u32,

    /// Height of the chart in pixels
    pub height: u32,

    /// Font size of the caption
    pub title_size: u32,
}

impl Default for GraphOptions {
    /// 800x600 pixels with a 24px caption
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            title_size: 24,
        }
    }
}

fn render_err<E: std::fmt::Display>(e: E) -> DashboardError {
    DashboardError::Render(e.to_string())
}

/// Parses `#rrggbb`, falling back to black
fn parse_color(hex: &str) -> RGBColor {
    let hex = hex.trim_start_matches('#');
    if hex.len() != 6 {
        return BLACK;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).unwrap_or(0);
    RGBColor(channel(0), channel(2), channel(4))
}

/// Renders a chart description to an SVG document
///
/// This is the main entry point for server-side rendering. It delegates to the
/// renderer matching the figure's data.
///
/// # Arguments
/// * `figure` - Chart description produced by one of the figure builders
/// * `options` - Output size and caption style
///
/// # Returns
/// * A Result containing the SVG markup or an error
///
/// # Examples
/// ```
/// use htm_dashboard::figures::make_piechart;
/// use htm_dashboard::figures::Category;
/// use htm_dashboard::graph::{GraphOptions, create_graph};
///
/// let figure = make_piechart(&[], Category::Material);
/// let svg = create_graph(&figure, &GraphOptions::default()).unwrap();
/// assert!(svg.contains("<svg"));
/// ```
pub fn create_graph(figure: &Figure, options: &GraphOptions) -> Result<String> {
    let mut svg = String::new();
    {
        let root =
            SVGBackend::with_string(&mut svg, (options.width, options.height)).into_drawing_area();
        root.fill(&WHITE).map_err(render_err)?;

        if figure.is_empty() {
            draw_empty(&root, figure, options)?;
        } else {
            match &figure.data {
                FigureData::Lines { series, log_y } => {
                    draw_lines(&root, figure, series, *log_y, options)?
                }
                FigureData::Pie { slices } => draw_pie(&root, figure, slices, options)?,
                FigureData::Bars { bars } => draw_bars(&root, figure, bars, options)?,
                FigureData::Histogram { bins } => draw_histogram(&root, figure, bins, options)?,
            }
        }

        root.present().map_err(render_err)?;
    }
    Ok(svg)
}

fn draw_empty<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    figure: &Figure,
    options: &GraphOptions,
) -> Result<()> {
    let area = root
        .titled(&figure.title, ("sans-serif", options.title_size as f64))
        .map_err(render_err)?;
    let (w, h) = area.dim_in_pixel();
    area.draw(&Text::new(
        "No data",
        (w as i32 / 2 - 30, h as i32 / 2),
        ("sans-serif", 18).into_font(),
    ))
    .map_err(render_err)?;
    Ok(())
}

/// Draws the property-vs-temperature curves
///
/// With `log_y` the values are plotted as base-10 logarithms on a linear axis
/// and the tick labels are written as powers of ten.
fn draw_lines<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    figure: &Figure,
    series: &[Series],
    log_y: bool,
    options: &GraphOptions,
) -> Result<()> {
    let transform = |v: f64| if log_y { v.log10() } else { v };

    let points = series.iter().flat_map(|s| s.points.iter());
    let (mut x_min, mut x_max) = (f64::INFINITY, f64::NEG_INFINITY);
    let (mut y_min, mut y_max) = (f64::INFINITY, f64::NEG_INFINITY);
    for &(x, y) in points {
        let y = transform(y);
        if !y.is_finite() {
            continue;
        }
        x_min = x_min.min(x);
        x_max = x_max.max(x);
        y_min = y_min.min(y);
        y_max = y_max.max(y);
    }
    if !x_min.is_finite() || !y_min.is_finite() {
        return draw_empty(root, figure, options);
    }
    if x_max - x_min < f64::EPSILON {
        x_max += 1.0;
    }
    let pad = ((y_max - y_min) * 0.05).max(0.5);
    y_min -= pad;
    y_max += pad;

    let mut chart = ChartBuilder::on(root)
        .caption(&figure.title, ("sans-serif", options.title_size as f64).into_font())
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(70)
        .build_cartesian_2d(x_min..x_max, y_min..y_max)
        .map_err(render_err)?;

    let y_formatter = |v: &f64| {
        if log_y {
            format!("1e{:.0}", v)
        } else {
            format!("{:.2e}", v)
        }
    };
    chart
        .configure_mesh()
        .x_desc(&figure.x_label)
        .y_desc(&figure.y_label)
        .y_label_formatter(&y_formatter)
        .draw()
        .map_err(render_err)?;

    let mut has_legend = false;
    for s in series {
        let color = parse_color(&s.color);
        let style = color.stroke_width(2);
        let pts: Vec<(f64, f64)> = s
            .points
            .iter()
            .map(|&(x, y)| (x, transform(y)))
            .filter(|(_, y)| y.is_finite())
            .collect();

        let anno = if s.dashed {
            chart
                .draw_series(
                    pts.windows(2)
                        .step_by(2)
                        .map(|w| PathElement::new(vec![w[0], w[1]], style)),
                )
                .map_err(render_err)?
        } else {
            chart
                .draw_series(LineSeries::new(pts, style))
                .map_err(render_err)?
        };

        if s.show_legend {
            has_legend = true;
            anno.label(s.group.clone()).legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2))
            });
        }
    }

    if has_legend {
        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()
            .map_err(render_err)?;
    }
    Ok(())
}

/// Draws pie slices as filled polygons, largest first, clockwise from 12 o'clock
fn draw_pie<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    figure: &Figure,
    slices: &[Slice],
    options: &GraphOptions,
) -> Result<()> {
    let area = root
        .titled(&figure.title, ("sans-serif", options.title_size as f64))
        .map_err(render_err)?;
    let (w, h) = area.dim_in_pixel();
    let center = (w as f64 * 0.4, h as f64 / 2.0);
    let radius = (w.min(h) as f64 * 0.4).max(10.0);
    let total: usize = slices.iter().map(|s| s.count).sum();

    let mut start = -PI / 2.0;
    for (i, slice) in slices.iter().enumerate() {
        let sweep = 2.0 * PI * slice.count as f64 / total.max(1) as f64;
        let steps = ((sweep / (2.0 * PI)) * 120.0).ceil().max(2.0) as usize;

        let mut polygon = vec![(center.0 as i32, center.1 as i32)];
        for k in 0..=steps {
            let angle = start + sweep * k as f64 / steps as f64;
            polygon.push((
                (center.0 + radius * angle.cos()) as i32,
                (center.1 + radius * angle.sin()) as i32,
            ));
        }
        let color = parse_color(&slice.color);
        area.draw(&Polygon::new(polygon, color.filled()))
            .map_err(render_err)?;

        // legend entry on the right-hand side
        let legend_x = (w as f64 * 0.8) as i32;
        let legend_y = 20 + i as i32 * 22;
        area.draw(&Rectangle::new(
            [(legend_x, legend_y), (legend_x + 14, legend_y + 14)],
            color.filled(),
        ))
        .map_err(render_err)?;
        let percent = 100.0 * slice.count as f64 / total.max(1) as f64;
        area.draw(&Text::new(
            format!("{} ({:.1}%)", slice.label, percent),
            (legend_x + 20, legend_y),
            ("sans-serif", 14).into_font(),
        ))
        .map_err(render_err)?;

        start += sweep;
    }
    Ok(())
}

fn draw_bars<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    figure: &Figure,
    bars: &[Bar],
    options: &GraphOptions,
) -> Result<()> {
    let n = bars.len() as f64;
    let max = bars.iter().map(|b| b.value).fold(0.0, f64::max).max(1.0);

    let mut chart = ChartBuilder::on(root)
        .caption(&figure.title, ("sans-serif", options.title_size as f64).into_font())
        .margin(10)
        .x_label_area_size(90)
        .y_label_area_size(60)
        .build_cartesian_2d(-0.5..n - 0.5, 0.0..max * 1.1)
        .map_err(render_err)?;

    let labels: Vec<&str> = bars.iter().map(|b| b.label.as_str()).collect();
    let x_formatter = |x: &f64| {
        let rounded = x.round();
        if (x - rounded).abs() > 1e-6 || rounded < 0.0 {
            return String::new();
        }
        labels.get(rounded as usize).map(|l| l.to_string()).unwrap_or_default()
    };

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(bars.len())
        .x_label_formatter(&x_formatter)
        .x_label_style(
            ("sans-serif", 10)
                .into_font()
                .transform(FontTransform::Rotate90),
        )
        .y_desc(&figure.y_label)
        .draw()
        .map_err(render_err)?;

    chart
        .draw_series(bars.iter().enumerate().map(|(i, bar)| {
            let x = i as f64;
            Rectangle::new(
                [(x - 0.4, 0.0), (x + 0.4, bar.value)],
                parse_color(&bar.color).filled(),
            )
        }))
        .map_err(render_err)?;
    Ok(())
}

fn draw_histogram<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    figure: &Figure,
    bins: &[YearBin],
    options: &GraphOptions,
) -> Result<()> {
    let first = bins.first().map(|b| b.start).unwrap_or(0);
    let last = bins.last().map(|b| b.end).unwrap_or(first + 1);
    let max_count = bins.iter().map(|b| b.count).max().unwrap_or(0) as f64;

    let mut chart = ChartBuilder::on(root)
        .caption(&figure.title, ("sans-serif", options.title_size as f64).into_font())
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(first as f64..last as f64, 0.0..max_count + 1.0)
        .map_err(render_err)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc(&figure.x_label)
        .y_desc(&figure.y_label)
        .x_label_formatter(&|x: &f64| format!("{:.0}", x))
        .y_label_formatter(&|y: &f64| format!("{:.0}", y))
        .draw()
        .map_err(render_err)?;

    let highlight = parse_color(HIGHLIGHT_COLOR);
    let normal = parse_color(crate::figures::BIN_COLOR);
    chart
        .draw_series(bins.iter().map(|bin| {
            let color = if bin.selected { highlight } else { normal };
            Rectangle::new(
                [(bin.start as f64, 0.0), (bin.end as f64, bin.count as f64)],
                color.mix(0.8).filled(),
            )
        }))
        .map_err(render_err)?;
    Ok(())
}
