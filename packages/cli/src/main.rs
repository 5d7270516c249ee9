#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for city emissions inventories and forecasts.

use std::fs::File;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use cityscale_cli::CliError;
use cityscale_cli::config::load_config;
use cityscale_cli::simulation::{SimulationInputs, project_drivers, run_simulation};
use cityscale_forecast::urban_form::calculate_urban_modifiers;
use cityscale_forecast_models::UrbanFormParameters;
use cityscale_io::geo::load_geojson_bounds;
use cityscale_report::{render_summary, write_forecast_csv, write_sector_csv};
use cityscale_storage::paths::{RUNS_DIR_ENV, default_runs_dir};
use cityscale_storage::{RunRecord, list_runs, load_run, save_run};

#[derive(Parser)]
#[command(name = "cityscale", about = "City greenhouse-gas inventory and forecast tool")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the base-year inventory and forecast Baseline vs Mitigation
    Run {
        /// TOML config; built-in defaults are used for anything it omits
        #[arg(long)]
        config: Option<PathBuf>,
        /// Activity CSV (`sector,activity`). Defaults to the config's manual activity
        #[arg(long)]
        activity: Option<PathBuf>,
        /// Emission factor CSV (`sector,co2_factor,ch4_factor,n2o_factor`)
        #[arg(long)]
        factors: PathBuf,
        /// Directory for run records
        #[arg(long, env = RUNS_DIR_ENV)]
        runs_dir: Option<PathBuf>,
        /// Do not store a run record
        #[arg(long)]
        no_save: bool,
        /// Also write the forecast table to this CSV file
        #[arg(long)]
        forecast_csv: Option<PathBuf>,
        /// Also write the base-year sector table to this CSV file
        #[arg(long)]
        sector_csv: Option<PathBuf>,
    },
    /// Check inputs without running the simulation
    Validate {
        /// TOML config
        #[arg(long)]
        config: Option<PathBuf>,
        /// Activity CSV
        #[arg(long)]
        activity: Option<PathBuf>,
        /// Emission factor CSV
        #[arg(long)]
        factors: PathBuf,
    },
    /// Print the urban-form modifiers for the given built environment
    Modifiers {
        /// Residents per square kilometre
        #[arg(long, default_value = "4000")]
        density: f64,
        /// Compactness index in [0, 1]
        #[arg(long, default_value = "0.5")]
        compactness: f64,
        /// Transit access index in [0, 1]
        #[arg(long, default_value = "0.5")]
        transit: f64,
    },
    /// Print projected population and GDP for each year of the horizon
    Drivers {
        /// TOML config
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// List stored runs, most recent first
    Runs {
        /// Directory for run records
        #[arg(long, env = RUNS_DIR_ENV)]
        runs_dir: Option<PathBuf>,
    },
    /// Print a stored run
    Show {
        /// Run record file
        path: PathBuf,
        /// Print the raw JSON record instead of the summary
        #[arg(long)]
        json: bool,
    },
    /// Print the bounding box of a city boundary `GeoJSON` file
    Bounds {
        /// `GeoJSON` file
        path: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            activity,
            factors,
            runs_dir,
            no_save,
            forecast_csv,
            sector_csv,
        } => {
            let config = load_config(config.as_deref())?;
            let inputs = SimulationInputs::load(config, activity.as_deref(), &factors)?;
            let record = run_simulation(&inputs)?;

            print_summary(&record);

            if let Some(path) = forecast_csv {
                write_forecast_csv(create(&path)?, &record.forecast)?;
                log::info!("Wrote forecast to {}", path.display());
            }
            if let Some(path) = sector_csv {
                write_sector_csv(create(&path)?, &record.base_sector_results)?;
                log::info!("Wrote sector results to {}", path.display());
            }
            if !no_save {
                let dir = runs_dir.unwrap_or_else(default_runs_dir);
                let saved = save_run(&dir, &record)?;
                println!();
                println!("Run stored at: {}", saved.display());
            }
        }
        Commands::Validate {
            config,
            activity,
            factors,
        } => {
            let config = load_config(config.as_deref())?;
            let inputs = SimulationInputs::load(config, activity.as_deref(), &factors)?;
            let report = inputs.validate();

            for warning in &report.warnings {
                println!("warning: {warning}");
            }
            for error in &report.errors {
                println!("error: {error}");
            }
            if !report.is_ok() {
                return Err(CliError::Validation(report.errors).into());
            }
            println!(
                "Inputs are valid ({} warning(s))",
                report.warnings.len()
            );
        }
        Commands::Modifiers {
            density,
            compactness,
            transit,
        } => {
            let modifiers = calculate_urban_modifiers(&UrbanFormParameters {
                density_per_km2: density,
                compactness_index: compactness,
                transit_access_index: transit,
            });
            println!("transport:   {:.4}", modifiers.transport);
            println!("residential: {:.4}", modifiers.residential);
            println!("energy:      {:.4}", modifiers.energy);
        }
        Commands::Drivers { config } => {
            let config = load_config(config.as_deref())?;
            let projection = project_drivers(&config)?;
            println!(
                "{:<6} {:>14} {:>16} {:>20} {:>16}",
                "YEAR", "POPULATION", "GDP_PER_CAPITA", "GDP", "ENERGY_INTENSITY"
            );
            println!("{}", "-".repeat(76));
            for row in &projection {
                println!(
                    "{:<6} {:>14.0} {:>16.2} {:>20.0} {:>16.4}",
                    row.year, row.population, row.gdp_per_capita, row.gdp, row.energy_intensity
                );
            }
        }
        Commands::Runs { runs_dir } => {
            let dir = runs_dir.unwrap_or_else(default_runs_dir);
            let runs = list_runs(&dir)?;
            if runs.is_empty() {
                println!("No runs stored in {}", dir.display());
                return Ok(());
            }
            println!("{:<28} CITY", "FILE");
            println!("{}", "-".repeat(50));
            for path in &runs {
                let name = path.file_name().map_or_else(
                    || path.display().to_string(),
                    |n| n.to_string_lossy().into_owned(),
                );
                let city = load_run::<RunRecord>(path)
                    .map_or_else(|_| "(unreadable)".to_string(), |r| r.meta.city_name);
                println!("{name:<28} {city}");
            }
        }
        Commands::Show { path, json } => {
            if json {
                let value: serde_json::Value = load_run(&path)?;
                println!("{}", serde_json::to_string_pretty(&value)?);
            } else {
                let record: RunRecord = load_run(&path)?;
                print_summary(&record);
            }
        }
        Commands::Bounds { path } => match load_geojson_bounds(&path)? {
            Some(b) => println!(
                "x: {} .. {}\ny: {} .. {}",
                b.min_x, b.max_x, b.min_y, b.max_y
            ),
            None => println!("no polygon coordinates"),
        },
    }

    Ok(())
}

fn print_summary(record: &RunRecord) {
    print!(
        "{}",
        render_summary(
            &record.meta.city_name,
            &record.base_summary,
            &record.base_sector_results,
            &record.forecast,
        )
    );
}

fn create(path: &Path) -> Result<File, CliError> {
    Ok(File::create(path)?)
}
