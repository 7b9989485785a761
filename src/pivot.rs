// Eye x hair pivot table and grouped-bar layout

use crate::store::Store;
use anyhow::{Context, Result};
use std::collections::{BTreeSet, HashMap};

/// Width of a single bar inside a cluster
pub const BAR_WIDTH: f64 = 0.15;
/// Y-axis headroom factor for the count labels drawn above bars
pub const Y_HEADROOM: f64 = 1.15;

const PAIR_COUNTS: &str = "SELECT eye_color, hair_color, COUNT(*) AS count
    FROM people GROUP BY eye_color, hair_color ORDER BY eye_color, hair_color";

/// Grouped (eye_color, hair_color, count) rows straight from the store
pub fn eye_hair_counts(store: &Store) -> Result<Vec<(String, String, i64)>> {
    store
        .pair_counts(PAIR_COUNTS)
        .context("Eye/hair aggregate failed")
}

/// Two-level mapping: eye color -> hair color -> count
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pivot {
    eye_order: Vec<String>,
    cells: HashMap<String, HashMap<String, i64>>,
}

impl Pivot {
    pub fn from_rows<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = (String, String, i64)>,
    {
        let mut pivot = Pivot::default();
        for (eye, hair, count) in rows {
            if !pivot.cells.contains_key(&eye) {
                pivot.eye_order.push(eye.clone());
            }
            pivot.cells.entry(eye).or_default().insert(hair, count);
        }
        pivot
    }

    pub fn is_empty(&self) -> bool {
        self.eye_order.is_empty()
    }

    /// Outer keys, in the order they were first seen
    pub fn eye_colors(&self) -> &[String] {
        &self.eye_order
    }

    /// Inner keys across every group, sorted and de-duplicated
    pub fn hair_colors(&self) -> Vec<String> {
        let set: BTreeSet<&String> = self.cells.values().flat_map(|inner| inner.keys()).collect();
        set.into_iter().cloned().collect()
    }

    /// Count for a pair; absent pairs are 0
    pub fn count(&self, eye: &str, hair: &str) -> i64 {
        self.cells
            .get(eye)
            .and_then(|inner| inner.get(hair))
            .copied()
            .unwrap_or(0)
    }

    pub fn max_count(&self) -> i64 {
        self.cells
            .values()
            .flat_map(|inner| inner.values())
            .copied()
            .max()
            .unwrap_or(0)
    }

    pub fn y_limit(&self) -> f64 {
        self.max_count() as f64 * Y_HEADROOM
    }

    /// One series per hair color: heights for every eye color cluster
    pub fn series(&self) -> Vec<(String, Vec<f64>)> {
        self.hair_colors()
            .into_iter()
            .map(|hair| {
                let heights = self
                    .eye_order
                    .iter()
                    .map(|eye| self.count(eye, &hair) as f64)
                    .collect();
                (hair, heights)
            })
            .collect()
    }
}
