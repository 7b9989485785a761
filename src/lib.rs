// Library exports for peoplestats

pub mod charts;
pub mod data;
pub mod display;
pub mod generator;
pub mod graph;
pub mod person;
pub mod pivot;
pub mod report;
pub mod store;

use anyhow::{Context, Result};
use serde::Deserialize;

#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq)]
pub enum OutputFormat {
    #[serde(rename = "png")]
    #[default]
    Png,
    #[serde(rename = "svg")]
    Svg,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Svg => "svg",
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct RenderOptions {
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    #[serde(default, rename = "type")]
    pub format: OutputFormat,
}

fn default_width() -> u32 { 800 }
fn default_height() -> u32 { 600 }

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            format: OutputFormat::Png,
        }
    }
}

impl RenderOptions {
    /// Parse options from a JSON object such as `{"width": 1400, "type": "svg"}`
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Invalid render options")
    }
}
