// Plotters canvas for plain and grouped bar charts

use crate::{OutputFormat, RenderOptions};
use anyhow::{Context, Result};
use image::ImageEncoder;
use plotters::coord::ranged1d::Ranged;
use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::ops::Range;

/// Style configuration for bar layers
#[derive(Debug, Clone, Default)]
pub struct BarStyle {
    pub color: Option<String>,
    /// Outline drawn around each bar
    pub edge_color: Option<String>,
}

/// Width of a bar in a plain bar chart, in category units
const BAR_WIDTH: f64 = 0.8;
/// Number of y-axis labels, also the dashed grid positions of grouped charts
const Y_LABELS: usize = 10;

/// Caption and axis descriptions
#[derive(Debug, Clone, Default)]
pub struct ChartLabels {
    pub title: Option<String>,
    pub x_desc: Option<String>,
    pub y_desc: Option<String>,
    /// Heading drawn as the first legend entry
    pub legend_title: Option<String>,
}

impl ChartLabels {
    pub fn new(title: &str, x_desc: &str, y_desc: &str) -> Self {
        Self {
            title: Some(title.to_string()),
            x_desc: Some(x_desc.to_string()),
            y_desc: Some(y_desc.to_string()),
            legend_title: None,
        }
    }

    pub fn with_legend_title(mut self, legend_title: &str) -> Self {
        self.legend_title = Some(legend_title.to_string());
        self
    }
}

enum Surface {
    Bitmap(Vec<u8>),
    Svg(String),
}

/// Canvas for a single bar chart, rendered to PNG or SVG bytes
pub struct Canvas {
    surface: Surface,
    width: u32,
    height: u32,
    labels: ChartLabels,
}

impl Canvas {
    pub fn new(options: &RenderOptions, labels: ChartLabels) -> Result<Self> {
        if options.width == 0 || options.height == 0 {
            anyhow::bail!(
                "Canvas dimensions must be non-zero (width: {}, height: {})",
                options.width,
                options.height
            );
        }

        let surface = match options.format {
            OutputFormat::Png => {
                let len = (options.width as usize)
                    .checked_mul(options.height as usize)
                    .and_then(|pixels| pixels.checked_mul(3))
                    .ok_or_else(|| {
                        anyhow::anyhow!(
                            "Canvas dimensions too large (width: {}, height: {})",
                            options.width,
                            options.height
                        )
                    })?;
                Surface::Bitmap(vec![0u8; len])
            }
            OutputFormat::Svg => Surface::Svg(String::new()),
        };

        Ok(Canvas {
            surface,
            width: options.width,
            height: options.height,
            labels,
        })
    }

    /// Add a bar layer to the canvas (categorical x-axis, one bar per category)
    pub fn add_bar_layer(
        &mut self,
        categories: Vec<String>,
        y_data: Vec<f64>,
        style: BarStyle,
    ) -> Result<()> {
        if categories.len() != y_data.len() {
            anyhow::bail!(
                "Categories and Y data must have the same length (categories: {}, y: {})",
                categories.len(),
                y_data.len()
            );
        }

        if categories.is_empty() {
            anyhow::bail!("Cannot create bar chart with no data");
        }

        let y_max = y_data.iter().cloned().fold(0.0, f64::max);
        let y_range = 0.0..padded_max(y_max);
        let size = (self.width, self.height);

        match &mut self.surface {
            Surface::Bitmap(buffer) => {
                let root = BitMapBackend::with_buffer(buffer, size).into_drawing_area();
                draw_bars(&root, &self.labels, &categories, &y_data, &style, y_range)
            }
            Surface::Svg(svg) => {
                let root = SVGBackend::with_string(svg, size).into_drawing_area();
                draw_bars(&root, &self.labels, &categories, &y_data, &style, y_range)
            }
        }
    }

    /// Add a dodged bar group: one cluster per category, one bar per series
    pub fn add_bar_group(
        &mut self,
        categories: Vec<String>,
        series: Vec<(String, Vec<f64>)>, // (legend key, y_data) for each series
        bar_width: f64,
        y_limit: f64,
    ) -> Result<()> {
        if categories.is_empty() {
            anyhow::bail!("Cannot create bar chart with no categories");
        }

        if series.is_empty() {
            anyhow::bail!("Cannot create bar chart with no series");
        }

        if let Some((key, y_data)) = series.iter().find(|(_, y)| y.len() != categories.len()) {
            anyhow::bail!(
                "Series '{}' has {} values but there are {} categories",
                key,
                y_data.len(),
                categories.len()
            );
        }

        let y_top = if y_limit > 0.0 { y_limit } else { 1.0 };
        let y_range = 0.0..y_top;
        let size = (self.width, self.height);

        match &mut self.surface {
            Surface::Bitmap(buffer) => {
                let root = BitMapBackend::with_buffer(buffer, size).into_drawing_area();
                draw_bar_group(&root, &self.labels, &categories, &series, bar_width, y_range)
            }
            Surface::Svg(svg) => {
                let root = SVGBackend::with_string(svg, size).into_drawing_area();
                draw_bar_group(&root, &self.labels, &categories, &series, bar_width, y_range)
            }
        }
    }

    /// Finalize and encode the canvas (PNG bytes or SVG text)
    pub fn render(self) -> Result<Vec<u8>> {
        match self.surface {
            Surface::Bitmap(buffer) => {
                let mut png_bytes = Vec::new();
                {
                    let encoder = image::codecs::png::PngEncoder::new(&mut png_bytes);
                    encoder
                        .write_image(&buffer, self.width, self.height, image::ColorType::Rgb8)
                        .context("Failed to encode PNG")?;
                }
                Ok(png_bytes)
            }
            Surface::Svg(svg) => Ok(svg.into_bytes()),
        }
    }
}

fn draw_bars<DB>(
    root: &DrawingArea<DB, Shift>,
    labels: &ChartLabels,
    categories: &[String],
    y_data: &[f64],
    style: &BarStyle,
    y_range: Range<f64>,
) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    root.fill(&WHITE).context("Failed to fill background")?;

    let num_categories = categories.len();
    let mut chart = ChartBuilder::on(root)
        .margin(10)
        .caption(labels.title.as_deref().unwrap_or(""), ("sans-serif", 20))
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(category_range(num_categories), y_range)
        .context("Failed to build chart")?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(num_categories)
        .x_label_formatter(&|x| category_label(categories, *x))
        .x_desc(labels.x_desc.as_deref().unwrap_or(""))
        .y_desc(labels.y_desc.as_deref().unwrap_or(""))
        .draw()
        .context("Failed to draw mesh")?;

    let color = parse_color(&style.color);

    for (cat_idx, &y_val) in y_data.iter().enumerate() {
        let x_center = cat_idx as f64;
        let corners = [
            (x_center - BAR_WIDTH / 2.0, 0.0),
            (x_center + BAR_WIDTH / 2.0, y_val),
        ];
        chart
            .draw_series(std::iter::once(Rectangle::new(corners, color.filled())))
            .context("Failed to draw bar")?;

        if style.edge_color.is_some() {
            let edge = parse_color(&style.edge_color);
            chart
                .draw_series(std::iter::once(Rectangle::new(corners, edge.stroke_width(1))))
                .context("Failed to draw bar outline")?;
        }
    }

    let value_style = ("sans-serif", 12)
        .into_font()
        .color(&BLACK)
        .pos(Pos::new(HPos::Center, VPos::Bottom));
    chart
        .draw_series(y_data.iter().enumerate().map(|(cat_idx, &y_val)| {
            EmptyElement::at((cat_idx as f64, y_val))
                + Text::new(format_count(y_val), (0, -3), value_style.clone())
        }))
        .context("Failed to draw bar labels")?;

    root.present().context("Failed to present drawing")?;

    Ok(())
}

fn draw_bar_group<DB>(
    root: &DrawingArea<DB, Shift>,
    labels: &ChartLabels,
    categories: &[String],
    series: &[(String, Vec<f64>)],
    bar_width: f64,
    y_range: Range<f64>,
) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    root.fill(&WHITE).context("Failed to fill background")?;

    let num_categories = categories.len();
    let num_series = series.len();
    let x_range = category_range(num_categories);
    let grid_ticks = y_ticks(y_range.clone());

    let mut chart = ChartBuilder::on(root)
        .margin(10)
        .caption(labels.title.as_deref().unwrap_or(""), ("sans-serif", 24))
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(x_range.clone(), y_range)
        .context("Failed to build chart")?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .disable_y_mesh()
        .y_labels(Y_LABELS)
        .x_labels(num_categories)
        .x_label_formatter(&|x| category_label(categories, *x))
        .x_desc(labels.x_desc.as_deref().unwrap_or(""))
        .y_desc(labels.y_desc.as_deref().unwrap_or(""))
        .draw()
        .context("Failed to draw mesh")?;

    let grid_style = BLACK.mix(0.25).stroke_width(1);
    chart
        .draw_series(
            grid_ticks
                .iter()
                .flat_map(|&y| dashed_segments(x_range.clone(), y, 0.08, 0.05))
                .map(|segment| PathElement::new(segment.to_vec(), grid_style)),
        )
        .context("Failed to draw grid")?;

    if let Some(title) = labels.legend_title.as_deref() {
        chart
            .draw_series(std::iter::empty::<Rectangle<(f64, f64)>>())
            .context("Failed to draw legend title")?
            .label(title)
            .legend(|(x, y)| EmptyElement::at((x, y)));
    }

    let value_style = ("sans-serif", 10)
        .into_font()
        .color(&BLACK)
        .pos(Pos::new(HPos::Center, VPos::Bottom));

    for (series_idx, (key, y_data)) in series.iter().enumerate() {
        let color = Palette99::pick(series_idx).to_rgba();

        chart
            .draw_series(y_data.iter().enumerate().map(|(cat_idx, &y_val)| {
                let x_center = dodge_center(cat_idx, series_idx, num_series, bar_width);
                Rectangle::new(
                    [
                        (x_center - bar_width / 2.0, 0.0),
                        (x_center + bar_width / 2.0, y_val),
                    ],
                    color.filled(),
                )
            }))
            .context("Failed to draw bar")?
            .label(key.as_str())
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled()));

        chart
            .draw_series(y_data.iter().enumerate().map(|(cat_idx, &y_val)| {
                let x_center = dodge_center(cat_idx, series_idx, num_series, bar_width);
                EmptyElement::at((x_center, y_val))
                    + Text::new(format_count(y_val), (0, -3), value_style.clone())
            }))
            .context("Failed to draw bar labels")?;
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()
        .context("Failed to draw legend")?;

    root.present().context("Failed to present drawing")?;

    Ok(())
}

/// X range placing category `i` at integer position `i`
fn category_range(num_categories: usize) -> Range<f64> {
    -0.5..(num_categories as f64 - 0.5)
}

/// Y positions of the axis labels, computed the way the mesh places them
fn y_ticks(y_range: Range<f64>) -> Vec<f64> {
    RangedCoordf64::from(y_range).key_points(Y_LABELS)
}

/// Dash segments along a horizontal line at `y`, clipped to `x_range`
fn dashed_segments(x_range: Range<f64>, y: f64, dash: f64, gap: f64) -> Vec<[(f64, f64); 2]> {
    let mut segments = Vec::new();
    let mut start = x_range.start;
    while start < x_range.end {
        let end = (start + dash).min(x_range.end);
        segments.push([(start, y), (end, y)]);
        start = end + gap;
    }
    segments
}

/// Tick label for an x position; only whole positions carry a category name
fn category_label(categories: &[String], x: f64) -> String {
    let idx = x.round();
    if idx < 0.0 || (x - idx).abs() > 1e-6 {
        return String::new();
    }
    categories.get(idx as usize).cloned().unwrap_or_default()
}

/// Center of bar `series_idx` (of `num_series`) in the cluster at `cluster`.
/// The cluster is centered on its integer position.
pub fn dodge_center(cluster: usize, series_idx: usize, num_series: usize, bar_width: f64) -> f64 {
    cluster as f64 - bar_width * (num_series as f64 - 1.0) / 2.0 + bar_width * series_idx as f64
}

/// Top of the y axis for plain bar charts, with headroom for the value labels
fn padded_max(y_max: f64) -> f64 {
    if y_max <= 0.0 {
        1.0
    } else {
        y_max * 1.1
    }
}

fn format_count(value: f64) -> String {
    format!("{}", value.round() as i64)
}

/// Parse color string to RGBColor
fn parse_color(color_str: &Option<String>) -> RGBColor {
    match color_str.as_deref() {
        Some("red") => RED,
        Some("green") => RGBColor(0, 128, 0),
        Some("blue") => BLUE,
        Some("black") => BLACK,
        Some("yellow") => YELLOW,
        Some("cyan") => CYAN,
        Some("magenta") => MAGENTA,
        Some("white") => WHITE,
        Some("skyblue") => RGBColor(135, 206, 235),
        Some("orange") => RGBColor(255, 165, 0),
        _ => BLUE, // default
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png_options() -> RenderOptions {
        RenderOptions::default()
    }

    fn svg_options() -> RenderOptions {
        RenderOptions {
            width: 400,
            height: 300,
            format: OutputFormat::Svg,
        }
    }

    fn names(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    fn is_valid_png(bytes: &[u8]) -> bool {
        bytes.len() > 8 && bytes[0..8] == [137, 80, 78, 71, 13, 10, 26, 10]
    }

    #[test]
    fn test_dodge_center_single_bar() {
        assert!((dodge_center(0, 0, 1, 0.15) - 0.0).abs() < 1e-9);
        assert!((dodge_center(3, 0, 1, 0.15) - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_dodge_center_five_bars() {
        // five bars around cluster 2: 1.7, 1.85, 2.0, 2.15, 2.3
        let centers: Vec<f64> = (0..5).map(|i| dodge_center(2, i, 5, 0.15)).collect();
        let expected = [1.7, 1.85, 2.0, 2.15, 2.3];
        for (got, want) in centers.iter().zip(expected.iter()) {
            assert!((got - want).abs() < 1e-9, "{} != {}", got, want);
        }
    }

    #[test]
    fn test_dodge_center_even_count_is_symmetric() {
        let left = dodge_center(1, 0, 4, 0.15);
        let right = dodge_center(1, 3, 4, 0.15);
        assert!(((left + right) / 2.0 - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_category_label() {
        let cats = names(&["blue", "green"]);
        assert_eq!(category_label(&cats, 0.0), "blue");
        assert_eq!(category_label(&cats, 1.0), "green");
        assert_eq!(category_label(&cats, 0.5), "");
        assert_eq!(category_label(&cats, 2.0), "");
        assert_eq!(category_label(&cats, -1.0), "");
    }

    #[test]
    fn test_parse_color() {
        assert_eq!(parse_color(&Some("orange".to_string())), RGBColor(255, 165, 0));
        assert_eq!(parse_color(&Some("green".to_string())), RGBColor(0, 128, 0));
        assert_eq!(parse_color(&None), BLUE);
    }

    #[test]
    fn test_padded_max() {
        assert_eq!(padded_max(0.0), 1.0);
        assert!((padded_max(10.0) - 11.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_dimensions_rejected() {
        let options = RenderOptions {
            width: 0,
            height: 600,
            format: OutputFormat::Png,
        };
        assert!(Canvas::new(&options, ChartLabels::default()).is_err());
    }

    #[test]
    fn test_oversized_bitmap_rejected() {
        let options = RenderOptions {
            width: u32::MAX,
            height: u32::MAX,
            format: OutputFormat::Png,
        };
        let result = Canvas::new(&options, ChartLabels::default());
        assert!(result.is_err());
        assert!(result.err().unwrap().to_string().contains("too large"));
    }

    #[test]
    fn test_dashed_segments_cover_range() {
        let segments = dashed_segments(-0.5..0.5, 2.0, 0.08, 0.05);
        assert_eq!(segments.first().unwrap()[0], (-0.5, 2.0));
        assert!(segments.last().unwrap()[1].0 <= 0.5);
        for pair in segments.windows(2) {
            let gap = pair[1][0].0 - pair[0][1].0;
            assert!((gap - 0.05).abs() < 1e-9);
        }
        for segment in &segments {
            assert_eq!(segment[0].1, 2.0);
            assert!(segment[1].0 - segment[0].0 <= 0.08 + 1e-9);
        }
    }

    #[test]
    fn test_y_ticks_within_range() {
        let ticks = y_ticks(0.0..4.6);
        assert!(!ticks.is_empty());
        assert!(ticks.len() <= Y_LABELS);
        assert!(ticks.iter().all(|&y| (0.0..=4.6).contains(&y)));
    }

    #[test]
    fn test_bar_layer_length_mismatch() {
        let mut canvas = Canvas::new(&png_options(), ChartLabels::default()).unwrap();
        let result = canvas.add_bar_layer(names(&["a", "b"]), vec![1.0], BarStyle::default());
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("same length"));
    }

    #[test]
    fn test_bar_layer_empty() {
        let mut canvas = Canvas::new(&png_options(), ChartLabels::default()).unwrap();
        let result = canvas.add_bar_layer(Vec::new(), Vec::new(), BarStyle::default());
        assert!(result.is_err());
    }

    #[test]
    fn test_bar_layer_renders_png() {
        let mut canvas = Canvas::new(
            &png_options(),
            ChartLabels::new("Eye colors", "Eye color", "People"),
        )
        .unwrap();
        canvas
            .add_bar_layer(
                names(&["blue", "green"]),
                vec![3.0, 1.0],
                BarStyle {
                    color: Some("skyblue".to_string()),
                    ..BarStyle::default()
                },
            )
            .unwrap();
        let bytes = canvas.render().unwrap();
        assert!(is_valid_png(&bytes));
    }

    #[test]
    fn test_bar_group_renders_svg() {
        let labels = ChartLabels::default().with_legend_title("Hair color");
        let mut canvas = Canvas::new(&svg_options(), labels).unwrap();
        canvas
            .add_bar_group(
                names(&["blue", "green"]),
                vec![
                    ("black".to_string(), vec![1.0, 0.0]),
                    ("red".to_string(), vec![2.0, 4.0]),
                ],
                0.15,
                4.6,
            )
            .unwrap();
        let svg = String::from_utf8(canvas.render().unwrap()).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("black"));
        assert!(svg.contains("Hair color"));
    }

    #[test]
    fn test_bar_group_without_legend_title() {
        let mut canvas = Canvas::new(&svg_options(), ChartLabels::default()).unwrap();
        canvas
            .add_bar_group(names(&["blue"]), vec![("red".to_string(), vec![2.0])], 0.15, 2.3)
            .unwrap();
        let svg = String::from_utf8(canvas.render().unwrap()).unwrap();
        assert!(!svg.contains("Hair color"));
    }

    #[test]
    fn test_bar_group_series_mismatch() {
        let mut canvas = Canvas::new(&png_options(), ChartLabels::default()).unwrap();
        let result = canvas.add_bar_group(
            names(&["blue", "green"]),
            vec![("black".to_string(), vec![1.0])],
            0.15,
            1.15,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_bar_group_no_series() {
        let mut canvas = Canvas::new(&png_options(), ChartLabels::default()).unwrap();
        let result = canvas.add_bar_group(names(&["blue"]), Vec::new(), 0.15, 1.15);
        assert!(result.is_err());
    }
}
