use anyhow::Result;
use clap::Parser;
use log::{debug, info};
use peoplestats::display::Display;
use peoplestats::store::{Store, DEFAULT_DB_PATH};
use peoplestats::{charts, generator, report, RenderOptions};
use std::io::{self, IsTerminal};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "peoplestats")]
#[command(about = "Report and chart eye color, hair color and weight statistics from a SQLite store", long_about = None)]
struct Args {
    /// SQLite store file (created if missing)
    #[arg(long, default_value = DEFAULT_DB_PATH)]
    db: PathBuf,

    /// Populate the store with synthetic people before reporting
    #[arg(long)]
    seed: bool,

    /// Directory the charts are written to
    #[arg(long, default_value = "charts")]
    out_dir: PathBuf,

    /// Render options as JSON (e.g., '{"width": 1400, "height": 800, "type": "svg"}')
    #[arg(long)]
    options: Option<String>,

    /// Do not pause for Enter after each chart
    #[arg(long)]
    no_wait: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let options = match &args.options {
        Some(json) => RenderOptions::from_json(json)?,
        None => RenderOptions::default(),
    };
    let wait = !args.no_wait && io::stdin().is_terminal();
    debug!("render options: {:?}, wait: {}", options, wait);

    let mut store = None;
    let outcome = match run(&args, &options, wait, &mut store) {
        Err(e) if is_store_error(&e) => {
            println!("❌ Database error: {:#}", e);
            Ok(())
        }
        other => other,
    };

    // The connection is closed on every path, including after an error
    if let Some(store) = store {
        match store.close() {
            Ok(()) => println!("\n🔌 Database connection closed."),
            Err(e) => println!("❌ Database error: {:#}", e),
        }
    }

    outcome
}

fn run(
    args: &Args,
    options: &RenderOptions,
    wait: bool,
    slot: &mut Option<Store>,
) -> Result<()> {
    let store = slot.insert(Store::open(&args.db)?);
    info!("using store {}", args.db.display());

    if args.seed {
        generator::seed(store, &mut rand::thread_rng())?;
    }

    report::print_report(store, &mut io::stdout().lock())?;

    let mut display = Display::new(&args.out_dir, options.format, wait)?;
    charts::render_distributions(store, options, &mut display)?;
    charts::render_bivariate(store, options, &mut display)?;

    Ok(())
}

/// Store and query failures are reported and swallowed; anything else aborts
fn is_store_error(err: &anyhow::Error) -> bool {
    err.chain()
        .any(|cause| cause.downcast_ref::<rusqlite::Error>().is_some())
}
