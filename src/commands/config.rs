use std::path::PathBuf;

use anyhow::{Context, Result};
use colored::Colorize;

use crate::{cli::ConfigCmd, types::Config};

/// Keys the rest of the tool actually reads.
const KNOWN_KEYS: [&str; 2] = ["db_path", "units"];

pub fn config_path() -> Result<PathBuf> {
    dirs::config_dir()
        .map(|d| d.join("tramax").join("config"))
        .context("Could not determine config directory")
}

pub async fn handle(cmd: ConfigCmd) -> Result<()> {
    let path = config_path()?;
    let mut cfg = Config::load(&path)?;

    match cmd {
        ConfigCmd::List => {
            if cfg.map.is_empty() {
                println!("{}", "(no config set)".dimmed());
            } else {
                println!("{}", "Config:".cyan().bold());
                for (k, v) in &cfg.map {
                    println!("  {} = {}", k.green(), v);
                }
            }
        }

        ConfigCmd::Get { key } => match cfg.map.get(&key) {
            Some(val) => println!("{}", val),
            None => println!("{} key `{}` not found", "warning:".yellow().bold(), key),
        },

        ConfigCmd::Set { key, val } => {
            if !KNOWN_KEYS.contains(&key.as_str()) {
                println!(
                    "{} `{}` is not a key tramax reads (known: {})",
                    "warning:".yellow().bold(),
                    key,
                    KNOWN_KEYS.join(", ")
                );
            }

            cfg.map.insert(key.clone(), val.clone());
            cfg.save(&path)?;
            println!("{} set `{}` = `{}`", "info:".blue().bold(), key.green(), val);
        }

        ConfigCmd::Unset { key } => {
            if cfg.map.remove(&key).is_some() {
                cfg.save(&path)?;
                println!("{} removed `{}`", "info:".blue().bold(), key.green());
            } else {
                println!("{} key `{}` not found", "warning:".yellow().bold(), key);
            }
        }
    }

    Ok(())
}
