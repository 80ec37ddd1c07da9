//! Configuration file management commands.

use crate::config::{self, Config};

/// Write a default configuration file to the user config directory.
pub fn cmd_init_config(force: bool) -> anyhow::Result<()> {
    let Some(path) = config::config_path() else {
        eprintln!("Error: could not determine the user config directory.");
        std::process::exit(1);
    };

    if path.exists() && !force {
        println!("✗ Config already exists: {}", path.display());
        println!("  Use --force to overwrite it with defaults.");
        return Ok(());
    }

    let written = config::save(&Config::default())?;
    println!("✓ Wrote default config to {}", written.display());
    Ok(())
}
