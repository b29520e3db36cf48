#![cfg(not(tarpaulin_include))]

use htm_dashboard::controller::{ChartSettings, ControlState, Controller};
use htm_dashboard::{Config, PropertyKind, loader};
use log::info;
use std::env;
use std::io::{self, Write};
use std::path::PathBuf;

fn usage(program: &str) {
    eprintln!(
        "Usage: {} <diffusivity|solubility> [--material <m>]... [--isotope <h|d|t>]... \
         [--author <a>]... [--years <low>:<high>] [--format json|python|csv] \
         [--data-dir <dir>] [--config <path>]",
        program
    );
}

fn parse_years(value: &str) -> Option<(i32, i32)> {
    let (low, high) = value.split_once(':')?;
    Some((low.trim().parse().ok()?, high.trim().parse().ok()?))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        usage(&args[0]);
        std::process::exit(2);
    }

    let kind: PropertyKind = match args[1].parse() {
        Ok(kind) => kind,
        Err(e) => {
            eprintln!("Error: {}", e);
            usage(&args[0]);
            std::process::exit(2);
        }
    };

    let mut controls = ControlState::default();
    let mut format = String::from("json");
    let mut data_dir: Option<PathBuf> = None;
    let mut config_path: Option<PathBuf> = None;

    let mut i = 2;
    while i < args.len() {
        let Some(value) = args.get(i + 1) else {
            eprintln!("Error: missing value for '{}'", args[i]);
            usage(&args[0]);
            std::process::exit(2);
        };
        match args[i].as_str() {
            "--material" => controls.materials.push(value.clone()),
            "--isotope" => controls.isotopes.push(value.clone()),
            "--author" => controls.authors.push(value.clone()),
            "--years" => match parse_years(value) {
                Some(years) => controls.years = Some(years),
                None => {
                    eprintln!("Error: invalid year range '{}'", value);
                    std::process::exit(2);
                }
            },
            "--format" => format = value.to_lowercase(),
            "--data-dir" => data_dir = Some(PathBuf::from(value)),
            "--config" => config_path = Some(PathBuf::from(value)),
            other => {
                eprintln!("Error: unexpected argument '{}'", other);
                usage(&args[0]);
                std::process::exit(2);
            }
        }
        i += 2;
    }

    let config = Config::load(config_path.as_deref())?;
    let store = match data_dir.or(config.data_dir.clone()) {
        Some(dir) => loader::load_dir(dir)?,
        None => loader::bundled()?,
    };
    let controller = Controller::new(&store, kind, ChartSettings::from(&config));

    let download = match format.as_str() {
        "json" => controller.export_data(&controls)?,
        "python" => controller.export_code(&controls),
        "csv" => controller.export_csv(&controls)?,
        other => {
            eprintln!("Error: unknown format '{}'", other);
            std::process::exit(2);
        }
    };
    info!("Writing {} ({} bytes)", download.filename, download.content.len());

    let mut stdout = io::stdout().lock();
    stdout.write_all(&download.content)?;
    stdout.flush()?;
    Ok(())
}
