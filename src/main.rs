mod app;
mod color;
mod report;
mod state;
mod ui;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use eframe::egui;

use app::ThermoPandaApp;
use report::ReportArgs;
use thermo_panda::DashboardConfig;
use thermo_panda::data::{filter_and_summarize, load_csv};

#[derive(Parser)]
#[command(name = "thermo-panda")]
#[command(about = "Temperature & humidity dashboard", long_about = None)]
struct Cli {
    /// JSON config file (data path, column names)
    #[arg(long)]
    config: Option<PathBuf>,
    /// CSV of readings; overrides the config's data_path
    #[arg(long)]
    data: Option<PathBuf>,
    /// Print the summary table instead of opening the window
    #[arg(long)]
    print: bool,
    /// Lower time bound for --print (inclusive)
    #[arg(long, requires = "print")]
    from: Option<String>,
    /// Upper time bound for --print (inclusive)
    #[arg(long, requires = "print")]
    to: Option<String>,
    /// Location to include with --print; repeat for several
    #[arg(long = "location", requires = "print")]
    locations: Vec<String>,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => DashboardConfig::load(path)?,
        None => DashboardConfig::default(),
    };
    if let Some(data) = cli.data {
        config.data_path = data;
    }

    if cli.print {
        let args = ReportArgs {
            from: cli.from,
            to: cli.to,
            locations: cli.locations,
        };
        return print_report(&config, &args);
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 860.0])
            .with_min_inner_size([640.0, 420.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Thermo Panda – Temperature & Humidity",
        options,
        Box::new(move |_cc| Ok(Box::new(ThermoPandaApp::new(config)))),
    )
    .map_err(|e| anyhow::anyhow!("failed to start the window: {e}"))
}

fn print_report(config: &DashboardConfig, args: &ReportArgs) -> Result<()> {
    let dataset = load_csv(&config.data_path, &config.columns)
        .with_context(|| format!("loading {}", config.data_path.display()))?;

    match report::criteria_from_args(&dataset, args)? {
        Some(criteria) => {
            let result = filter_and_summarize(&dataset.readings, &criteria);
            print!("{}", report::render(&result));
        }
        None => println!("{} contains no readings.", config.data_path.display()),
    }
    Ok(())
}
