use anyhow::{bail, Context, Result};
use std::env;
use std::fs;
use std::path::PathBuf;

use owner_resolution::logging::init_logging;
use owner_resolution::{write_invalid_csv_file, DocumentInput, OwnerResolver, ResolverConfig};

const USAGE: &str =
    "usage: owner-resolution <document.json> [--config <tuning.json>] [--invalid-csv <path>]";

struct Args {
    document: PathBuf,
    config: Option<PathBuf>,
    invalid_csv: Option<PathBuf>,
}

fn parse_args() -> Result<Args> {
    let mut document = None;
    let mut config = None;
    let mut invalid_csv = None;

    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                config = Some(PathBuf::from(args.next().context("--config needs a path")?));
            }
            "--invalid-csv" => {
                invalid_csv = Some(PathBuf::from(args.next().context("--invalid-csv needs a path")?));
            }
            "-h" | "--help" => {
                println!("{}", USAGE);
                std::process::exit(0);
            }
            flag if flag.starts_with("--") => bail!("unknown option {}\n{}", flag, USAGE),
            path if document.is_none() => document = Some(PathBuf::from(path)),
            extra => bail!("unexpected argument {}\n{}", extra, USAGE),
        }
    }

    Ok(Args {
        document: document.context(USAGE)?,
        config,
        invalid_csv,
    })
}

fn main() -> Result<()> {
    init_logging();
    let args = parse_args()?;

    let config = match &args.config {
        Some(path) => ResolverConfig::from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => ResolverConfig::default(),
    };
    let resolver = OwnerResolver::new(config).context("Failed to build resolver")?;

    let json = fs::read_to_string(&args.document)
        .with_context(|| format!("Failed to read {}", args.document.display()))?;
    let doc = DocumentInput::from_json(&json)
        .with_context(|| format!("Malformed document {}", args.document.display()))?;

    let output = resolver.resolve_document(&doc);
    tracing::info!(
        owners = output.owners_by_date.owner_count(),
        invalid = output.invalid_owners.len(),
        "resolved {}",
        args.document.display()
    );

    if let Some(path) = &args.invalid_csv {
        write_invalid_csv_file(path, &output.invalid_owners)
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }

    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}
