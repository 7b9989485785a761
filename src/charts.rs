// Chart rendering for the people table: three distributions plus the eye x hair chart

use crate::data::{Distribution, Distributions};
use crate::display::Display;
use crate::graph::{self, BarStyle, ChartLabels};
use crate::pivot::{self, Pivot, BAR_WIDTH};
use crate::store::Store;
use crate::RenderOptions;
use anyhow::{Context, Result};
use log::{debug, info};
use std::path::PathBuf;

pub const NO_DATA_MESSAGE: &str = "No data to plot.";

/// Result of the bivariate renderer
#[derive(Debug, Clone, PartialEq)]
pub enum BivariateOutcome {
    /// The grouped query returned no rows; nothing was drawn
    NoData,
    Rendered(PathBuf),
}

/// Re-read every row, count the three distributions client-side and show one bar
/// chart per distribution. Distributions with no categories are skipped.
pub fn render_distributions(
    store: &Store,
    options: &RenderOptions,
    display: &mut Display,
) -> Result<Vec<PathBuf>> {
    let rows = store.all_rows().context("Failed to read rows for charts")?;
    let dists = Distributions::from_rows(&rows);

    let charts = [
        (
            "eye_colors",
            &dists.eye_colors,
            ChartLabels::new("Eye color distribution", "Eye color", "Number of people"),
            BarStyle {
                color: Some("skyblue".to_string()),
                ..BarStyle::default()
            },
        ),
        (
            "hair_colors",
            &dists.hair_colors,
            ChartLabels::new("Hair color distribution", "Hair color", "Number of people"),
            BarStyle {
                color: Some("orange".to_string()),
                ..BarStyle::default()
            },
        ),
        (
            "weight_categories",
            &dists.weight_categories,
            ChartLabels::new("Weight distribution by category", "Category", "Number of people"),
            BarStyle {
                color: Some("green".to_string()),
                edge_color: Some("black".to_string()),
            },
        ),
    ];

    let mut paths = Vec::new();
    for (name, dist, labels, style) in charts {
        if dist.is_empty() {
            info!("no rows for {}, skipping chart", name);
            continue;
        }
        debug!("{} ({} rows): {:?}", name, dist.total(), dist.entries());
        let bytes = render_distribution(dist, labels, style, options)
            .with_context(|| format!("Failed to render {} chart", name))?;
        paths.push(display.show(name, &bytes)?);
    }

    Ok(paths)
}

/// One bar per category, in the distribution's first-appearance order
pub fn render_distribution(
    dist: &Distribution,
    labels: ChartLabels,
    style: BarStyle,
    options: &RenderOptions,
) -> Result<Vec<u8>> {
    let mut canvas = graph::Canvas::new(options, labels)?;
    canvas.add_bar_layer(dist.categories().to_vec(), dist.heights(), style)?;
    canvas.render()
}

/// Grouped eye x hair chart built from the two-column aggregate.
/// Prints [`NO_DATA_MESSAGE`] and draws nothing when the table is empty.
pub fn render_bivariate(
    store: &Store,
    options: &RenderOptions,
    display: &mut Display,
) -> Result<BivariateOutcome> {
    let rows = pivot::eye_hair_counts(store)?;
    if rows.is_empty() {
        println!("{}", NO_DATA_MESSAGE);
        return Ok(BivariateOutcome::NoData);
    }

    let pivot = Pivot::from_rows(rows);
    let bytes = render_pivot(&pivot, options).context("Failed to render eye/hair chart")?;
    let path = display.show("eye_hair", &bytes)?;
    Ok(BivariateOutcome::Rendered(path))
}

/// Draw a non-empty pivot: one cluster per eye color, one bar per hair color
pub fn render_pivot(pivot: &Pivot, options: &RenderOptions) -> Result<Vec<u8>> {
    let mut canvas = graph::Canvas::new(
        options,
        ChartLabels::new(
            "Hair color distribution by eye color",
            "Eye color",
            "Number of people",
        )
        .with_legend_title("Hair color"),
    )?;
    canvas.add_bar_group(
        pivot.eye_colors().to_vec(),
        pivot.series(),
        BAR_WIDTH,
        pivot.y_limit(),
    )?;
    canvas.render()
}
