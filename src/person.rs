// Data model for the people table

use std::fmt;

/// A single row of the `people` table
#[derive(Debug, Clone, PartialEq)]
pub struct Person {
    pub name: String,
    pub eye_color: String,
    pub hair_color: String,
    /// Kilograms
    pub weight: f64,
}

impl Person {
    pub fn new(name: &str, eye_color: &str, hair_color: &str, weight: f64) -> Self {
        Self {
            name: name.to_string(),
            eye_color: eye_color.to_string(),
            hair_color: hair_color.to_string(),
            weight,
        }
    }
}

/// The columns read back for chart rendering (name is not needed there)
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub eye_color: String,
    pub hair_color: String,
    pub weight: f64,
}

/// Ordinal weight bucket derived from a weight at query time, never stored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WeightCategory {
    Underweight,
    Normal,
    Overweight,
}

impl WeightCategory {
    /// Upper bound (exclusive) of the underweight bucket
    pub const UNDERWEIGHT_BELOW: f64 = 60.0;
    /// Upper bound (exclusive) of the normal bucket
    pub const NORMAL_BELOW: f64 = 80.0;

    pub fn categorize(weight: f64) -> Self {
        if weight < Self::UNDERWEIGHT_BELOW {
            WeightCategory::Underweight
        } else if weight < Self::NORMAL_BELOW {
            WeightCategory::Normal
        } else {
            WeightCategory::Overweight
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            WeightCategory::Underweight => "Sottopeso",
            WeightCategory::Normal => "Normopeso",
            WeightCategory::Overweight => "Sovrappeso",
        }
    }

    /// SQL expression computing the bucket label for the `weight` column
    pub fn sql_case() -> String {
        format!(
            "CASE WHEN weight < {} THEN '{}' WHEN weight < {} THEN '{}' ELSE '{}' END",
            Self::UNDERWEIGHT_BELOW,
            WeightCategory::Underweight.label(),
            Self::NORMAL_BELOW,
            WeightCategory::Normal.label(),
            WeightCategory::Overweight.label(),
        )
    }
}

impl fmt::Display for WeightCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
