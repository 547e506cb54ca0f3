use std::fs::{File, read_to_string};
use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use log::{Level, info};
use serde::Serialize;
use serde::de::DeserializeOwned;

pub fn init_logging(verbose: bool) -> Result<()> {
    let level = if verbose { Level::Debug } else { Level::Info };
    simple_logger::init_with_level(level).context("Failed to initialise logging")?;
    Ok(())
}

///
/// Read and deserialize a JSON file. Gene models are validated while they
/// are deserialized, so a malformed model fails here with the offending gene.
///
pub fn read_json<T: DeserializeOwned>(path: &str) -> Result<T> {
    let raw = read_to_string(Path::new(path))
        .with_context(|| format!("Failed to read {}", path))?;
    let value = serde_json::from_str(&raw).with_context(|| format!("Failed to parse {}", path))?;
    Ok(value)
}

///
/// Write `value` as pretty JSON to `output`, or to stdout when no path is given.
///
pub fn write_json<T: Serialize>(value: &T, output: Option<&String>) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output to JSON")?;

    match output {
        Some(p) => {
            let mut file = File::create(Path::new(p))
                .with_context(|| format!("Failed to create output file: {}", p))?;
            file.write_all(json.as_bytes())?;
            info!("Output written to {}", p);
        }
        None => {
            io::stdout().write_all(json.as_bytes())?;
            println!();
        }
    }

    Ok(())
}
