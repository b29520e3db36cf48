#![cfg(not(tarpaulin_include))]

use htm_dashboard::{Config, app};
use std::env;
use std::path::PathBuf;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().collect();

    // Optional `--config <path>`
    let mut config_path: Option<PathBuf> = None;
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" if i + 1 < args.len() => {
                config_path = Some(PathBuf::from(&args[i + 1]));
                i += 2;
            }
            "-h" | "--help" => {
                println!("Usage: {} [--config <path>]", args[0]);
                return Ok(());
            }
            other => {
                eprintln!("Error: unexpected argument '{}'", other);
                eprintln!("Usage: {} [--config <path>]", args[0]);
                std::process::exit(2);
            }
        }
    }

    let config = Config::load(config_path.as_deref())?;
    app::run(config).await?;

    Ok(())
}
