//! Data normalization command.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use ghibli_data::Normalizer;

use crate::config::load_config;

/// Run the normalize command.
pub fn run(config_path: &Path, data_dir: Option<PathBuf>) -> Result<()> {
    let data_dir = match data_dir {
        Some(dir) => dir,
        None => PathBuf::from(load_config(config_path)?.data.dir),
    };

    Normalizer::new(&data_dir)
        .run()
        .with_context(|| format!("Failed to normalize {}", data_dir.display()))?;

    tracing::info!("Place poster and banner images in public/images/");

    Ok(())
}
