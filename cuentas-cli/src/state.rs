use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

/// `$CUENTAS_HOME`, or `~/.cuentas`.
pub fn cuentas_home() -> Result<PathBuf> {
    if let Some(dir) = std::env::var_os("CUENTAS_HOME").filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".cuentas"))
}

pub fn ensure_cuentas_home() -> Result<PathBuf> {
    let dir = cuentas_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

/// Default location of the local transaction file.
pub fn default_data_path() -> Result<PathBuf> {
    Ok(ensure_cuentas_home()?.join("movimientos.json"))
}
