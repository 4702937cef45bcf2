//! Digest utility for CardioPredict model artifacts.
//!
//! Prints the SHA-256 of each artifact so it can be pinned through
//! `CARDIO_SCALER_SHA256` / `CARDIO_CLASSIFIER_SHA256`.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin artifact_digest -- [<artifact>...]
//! ```
//!
//! With no arguments the configured scaler and classifier paths are used
//! and the matching `export` lines are printed as well.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use cardiopredict::adapters::artifacts::sha256_hex;
use cardiopredict::config::AppConfig;

fn digest_file(path: &Path) -> Result<String, String> {
    let bytes = fs::read(path).map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
    Ok(sha256_hex(&bytes))
}

fn main() -> Result<(), String> {
    let args: Vec<PathBuf> = env::args().skip(1).map(PathBuf::from).collect();

    if args.iter().any(|a| a.as_os_str() == "-h" || a.as_os_str() == "--help") {
        eprintln!("Usage: artifact_digest [<artifact>...]");
        return Ok(());
    }

    if !args.is_empty() {
        for path in &args {
            println!("{}  {}", digest_file(path)?, path.display());
        }
        return Ok(());
    }

    let config = AppConfig::from_env();
    let scaler = digest_file(&config.scaler_path)?;
    let classifier = digest_file(&config.classifier_path)?;

    println!("{}  {}", scaler, config.scaler_path.display());
    println!("{}  {}", classifier, config.classifier_path.display());
    println!();
    println!("export CARDIO_SCALER_SHA256={scaler}");
    println!("export CARDIO_CLASSIFIER_SHA256={classifier}");

    Ok(())
}
