use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use log::{LevelFilter, debug, error, info};
use serde_json::Value as JsonValue;

use geojson_lite::{RandomFactory, build, validate_geojson};

/// Validate GeoJSON documents or generate random ones.
#[derive(Parser, Debug)]
#[command(name = "geojson-lite", version, about, long_about = None)]
struct Cli {
    /// Raise log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Check GeoJSON files; exits non-zero if any of them is invalid.
    Validate {
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Report why a file was rejected.
        #[arg(long)]
        detailed: bool,
    },

    /// Write a random FeatureCollection.
    Generate {
        /// JSON file with generation options.
        #[arg(long)]
        options: Option<PathBuf>,

        /// Point, LineString or Polygon.
        #[arg(long = "type")]
        geometry_type: Option<String>,

        #[arg(long)]
        vertices: Option<u64>,

        #[arg(long)]
        stride: Option<u64>,

        #[arg(long)]
        num_prop: Option<u64>,

        #[arg(long, default_value_t = 1)]
        features: usize,

        #[arg(long)]
        seed: Option<u64>,

        /// Defaults to stdout.
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    match cli.command {
        Commands::Validate { files, detailed } => validate_files(&files, detailed),
        Commands::Generate {
            options,
            geometry_type,
            vertices,
            stride,
            num_prop,
            features,
            seed,
            output,
        } => {
            let mut raw = match options {
                Some(path) => read_document(&path)?,
                None => JsonValue::Object(Default::default()),
            };
            let overrides = [
                ("type", geometry_type.map(JsonValue::from)),
                ("vertices", vertices.map(JsonValue::from)),
                ("stride", stride.map(JsonValue::from)),
                ("numProp", num_prop.map(JsonValue::from)),
            ];
            if let Some(object) = raw.as_object_mut() {
                for (key, value) in overrides {
                    if let Some(value) = value {
                        object.insert(key.to_string(), value);
                    }
                }
            }
            generate(&raw, features, seed, output)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn validate_files(files: &[PathBuf], detailed: bool) -> Result<ExitCode, Box<dyn std::error::Error>> {
    if count_invalid(files, detailed) > 0 {
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

/// Number of `files` that are unreadable, not JSON, or not valid GeoJSON.
fn count_invalid(files: &[PathBuf], detailed: bool) -> usize {
    let mut invalid = 0;
    for path in files {
        let document = match read_document(path) {
            Ok(document) => document,
            Err(reason) => {
                invalid += 1;
                error!("{}: {}", path.display(), reason);
                continue;
            }
        };
        match validate_geojson(&document, detailed) {
            Ok(true) => info!("{}: valid", path.display()),
            Ok(false) => {
                invalid += 1;
                error!("{}: invalid", path.display());
            }
            Err(reason) => {
                invalid += 1;
                error!("{}: {}", path.display(), reason);
            }
        }
    }
    invalid
}

fn read_document(path: &Path) -> Result<JsonValue, Box<dyn std::error::Error>> {
    Ok(serde_json::from_str(&fs::read_to_string(path)?)?)
}

fn generate(
    raw: &JsonValue,
    features: usize,
    seed: Option<u64>,
    output: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut factory = match seed {
        Some(seed) => RandomFactory::from_json_seeded(raw, seed)?,
        None => RandomFactory::from_json(raw)?,
    };
    debug!("generation options: {}", factory.options().to_json()?);
    info!("Generating {} features...", features);
    let collection = factory.generate_features(features)?;
    let geojson_string = serde_json::to_string(&build::to_document(&collection)?)?;

    match output {
        Some(file_path) => {
            let mut file = File::create(&file_path)?;
            file.write_all(geojson_string.as_bytes())?;
            info!("Data saved to {}", file_path.display());
        }
        None => println!("{}", geojson_string),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_fixture(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("geojson-lite-{}-{}", std::process::id(), name));
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_count_invalid_keeps_going_past_bad_files() {
        let valid = write_fixture("point.geojson", r#"{"type": "Point", "coordinates": [0, 0]}"#);
        let not_json = write_fixture("broken.geojson", "{\"type\": ");
        let unclosed = write_fixture(
            "ring.geojson",
            r#"{"type": "Polygon", "coordinates": [[[0, 0], [1, 1], [2, 2]]]}"#,
        );
        let missing = std::env::temp_dir().join("geojson-lite-does-not-exist.geojson");

        let files = vec![not_json.clone(), missing, valid.clone(), unclosed.clone()];
        assert_eq!(count_invalid(&files, false), 3);
        assert_eq!(count_invalid(&files, true), 3);
        assert_eq!(count_invalid(&[valid.clone()], true), 0);

        for path in [valid, not_json, unclosed] {
            fs::remove_file(path).unwrap();
        }
    }
}
