//! `zonepack <file.json>` — converts a JSON file to MessagePack and back.
//!
//! Writes `<stem>.mpack` with the encoded bytes, then decodes them through
//! a fresh zone and writes `<stem>.mpack.json` as a self-check round trip.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use thiserror::Error;

use zonepack::{json, msgpack, Zone};

#[derive(Parser)]
#[command(name = "zonepack", about = "Convert a JSON file to MessagePack and back")]
struct Args {
    /// JSON file to convert.
    pub path: PathBuf,
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("input is not well-formed JSON: {0}")]
    Parse(serde_json::Error),
    #[error("round-trip self-check failed: {0}")]
    Decode(#[from] msgpack::DecodeError),
    #[error("writing the round-trip JSON failed: {0}")]
    Print(serde_json::Error),
}

fn run(path: &Path) -> Result<(), CliError> {
    let text = fs::read(path)?;
    let doc: serde_json::Value =
        serde_json::from_slice(&text).map_err(CliError::Parse)?;

    let packed = json::encode(&doc);
    let mpack_path = path.with_extension("mpack");
    fs::write(&mpack_path, &packed)?;

    let zone = Zone::new();
    let value = msgpack::decode_exact(&packed, &zone)?;
    let back = json::from_value(&value);

    let mut json_path = mpack_path.into_os_string();
    json_path.push(".json");
    fs::write(json_path, serde_json::to_vec(&back).map_err(CliError::Print)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn json_error() -> serde_json::Error {
        serde_json::from_str::<serde_json::Value>("{").unwrap_err()
    }

    #[test]
    fn parse_and_print_failures_read_differently() {
        let parse = CliError::Parse(json_error()).to_string();
        let print = CliError::Print(json_error()).to_string();
        assert!(parse.starts_with("input is not well-formed JSON"));
        assert!(print.starts_with("writing the round-trip JSON failed"));
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    match run(&args.path) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("zonepack: {err}");
            ExitCode::FAILURE
        }
    }
}
