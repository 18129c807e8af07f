use std::path::PathBuf;

use anyhow::{Context, Result};

const DATA_DIR_NAME: &str = "snus-tracker";

pub fn resolve_data_dir() -> Result<PathBuf> {
    let base = dirs::data_dir().context("resolve data dir")?;
    Ok(base.join(DATA_DIR_NAME))
}
