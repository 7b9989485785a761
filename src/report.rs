// Server-side aggregate report printed to stdout

use crate::person::WeightCategory;
use crate::store::Store;
use anyhow::{Context, Result};
use std::io::Write;

pub const EYE_HEADER: &str = "👁️ Eye color distribution:";
pub const HAIR_HEADER: &str = "💇 Hair color distribution:";
pub const WEIGHT_HEADER: &str = "⚖️ Weight distribution by category:";

pub fn eye_color_counts(store: &Store) -> Result<Vec<(String, i64)>> {
    store
        .label_counts("SELECT eye_color, COUNT(*) FROM people GROUP BY eye_color")
        .context("Eye color aggregate failed")
}

pub fn hair_color_counts(store: &Store) -> Result<Vec<(String, i64)>> {
    store
        .label_counts("SELECT hair_color, COUNT(*) FROM people GROUP BY hair_color")
        .context("Hair color aggregate failed")
}

/// Counts per weight bucket, the bucket being computed inside the query
pub fn weight_category_counts(store: &Store) -> Result<Vec<(String, i64)>> {
    let sql = format!(
        "SELECT {} AS weight_category, COUNT(*) AS count FROM people GROUP BY weight_category",
        WeightCategory::sql_case()
    );
    store
        .label_counts(&sql)
        .context("Weight category aggregate failed")
}

/// Write the three aggregate sections, one `label: count` line per group
pub fn print_report<W: Write>(store: &Store, out: &mut W) -> Result<()> {
    writeln!(out, "{}", EYE_HEADER)?;
    write_counts(out, &eye_color_counts(store)?)?;

    writeln!(out, "\n{}", HAIR_HEADER)?;
    write_counts(out, &hair_color_counts(store)?)?;

    writeln!(out, "\n{}", WEIGHT_HEADER)?;
    write_counts(out, &weight_category_counts(store)?)?;

    Ok(())
}

fn write_counts<W: Write>(out: &mut W, counts: &[(String, i64)]) -> Result<()> {
    for (label, count) in counts {
        writeln!(out, "{}: {}", label, count)?;
    }
    Ok(())
}
