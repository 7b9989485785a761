// Client-side frequency counts feeding the univariate charts

use crate::person::{Observation, WeightCategory};
use std::collections::HashMap;

/// Frequency count of categorical values, keeping first-appearance order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Distribution {
    order: Vec<String>,
    counts: HashMap<String, u64>,
}

impl Distribution {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_values<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut dist = Self::new();
        for value in values {
            dist.add(value.into());
        }
        dist
    }

    pub fn add(&mut self, category: String) {
        // Track category order (first appearance)
        if !self.counts.contains_key(&category) {
            self.order.push(category.clone());
        }
        *self.counts.entry(category).or_insert(0) += 1;
    }

    pub fn get(&self, category: &str) -> u64 {
        self.counts.get(category).copied().unwrap_or(0)
    }

    pub fn categories(&self) -> &[String] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    /// (category, count) pairs in first-appearance order
    pub fn entries(&self) -> Vec<(String, u64)> {
        self.order
            .iter()
            .map(|cat| (cat.clone(), self.get(cat)))
            .collect()
    }

    /// Counts as chart heights, matching [`Distribution::categories`]
    pub fn heights(&self) -> Vec<f64> {
        self.order.iter().map(|cat| self.get(cat) as f64).collect()
    }
}

/// The three univariate distributions, counted client-side from raw rows
#[derive(Debug, Clone, Default)]
pub struct Distributions {
    pub eye_colors: Distribution,
    pub hair_colors: Distribution,
    pub weight_categories: Distribution,
}

impl Distributions {
    pub fn from_rows(rows: &[Observation]) -> Self {
        Self {
            eye_colors: Distribution::from_values(rows.iter().map(|r| r.eye_color.as_str())),
            hair_colors: Distribution::from_values(rows.iter().map(|r| r.hair_color.as_str())),
            weight_categories: Distribution::from_values(
                rows.iter()
                    .map(|r| WeightCategory::categorize(r.weight).label()),
            ),
        }
    }
}
