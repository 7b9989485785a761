// Sequential chart presentation: save each chart, then optionally block for inspection

use crate::OutputFormat;
use anyhow::{Context, Result};
use log::debug;
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

pub struct Display {
    out_dir: PathBuf,
    format: OutputFormat,
    wait: bool,
    shown: Vec<PathBuf>,
}

impl Display {
    /// `wait` makes every [`Display::show`] block until Enter is pressed on stdin
    pub fn new(out_dir: impl AsRef<Path>, format: OutputFormat, wait: bool) -> Result<Self> {
        let out_dir = out_dir.as_ref().to_path_buf();
        fs::create_dir_all(&out_dir)
            .with_context(|| format!("Failed to create chart directory {}", out_dir.display()))?;
        Ok(Self {
            out_dir,
            format,
            wait,
            shown: Vec::new(),
        })
    }

    /// Write one chart to `<out_dir>/<name>.<ext>` and present it
    pub fn show(&mut self, name: &str, bytes: &[u8]) -> Result<PathBuf> {
        let path = self
            .out_dir
            .join(format!("{}.{}", name, self.format.extension()));
        fs::write(&path, bytes)
            .with_context(|| format!("Failed to write chart {}", path.display()))?;
        debug!("wrote {} bytes to {}", bytes.len(), path.display());
        println!("📊 Chart saved to {}", path.display());

        if self.wait {
            wait_for_enter(&mut io::stdin().lock(), &mut io::stdout())?;
        }

        self.shown.push(path.clone());
        Ok(path)
    }

    /// Paths of every chart shown so far, in order
    pub fn shown(&self) -> &[PathBuf] {
        &self.shown
    }
}

fn wait_for_enter<R: BufRead, W: Write>(input: &mut R, out: &mut W) -> Result<()> {
    write!(out, "Press Enter to continue...")?;
    out.flush()?;
    let mut line = String::new();
    input.read_line(&mut line).context("Failed to read from stdin")?;
    Ok(())
}
