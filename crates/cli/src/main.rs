//! CLI tool for offline e-KYC archives
//!
//! Decrypts a share-code protected e-KYC ZIP and prints the identity fields.

use anyhow::{Context, Result};
use base64::{engine::general_purpose::STANDARD, Engine};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use ekyc_core::boundary::{validate_share_code, ResponseClass, VerificationResponse};
use ekyc_core::config::{DEFAULT_DOCUMENT_EXTENSION, DEFAULT_MAX_DOCUMENT_SIZE};
use ekyc_core::{ExtractorConfig, IdentityExtractor, IdentityRecord};

#[derive(Parser)]
#[command(name = "ekyc")]
#[command(version)]
#[command(about = "Extract identity data from offline e-KYC ZIP files", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Maximum decompressed document size in bytes
    #[arg(long, global = true, value_name = "BYTES", default_value_t = DEFAULT_MAX_DOCUMENT_SIZE)]
    max_size: u64,

    /// Suffix identifying the document entry inside the ZIP
    #[arg(long, global = true, value_name = "SUFFIX", default_value = DEFAULT_DOCUMENT_EXTENSION)]
    extension: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Decrypt and parse an e-KYC ZIP
    Parse {
        /// Path to e-KYC ZIP file
        #[arg(short, long)]
        file: PathBuf,

        /// Share code (4-digit password)
        #[arg(short, long)]
        code: String,

        /// Print the JSON response instead of a summary
        #[arg(long)]
        json: bool,

        /// Write the decoded photograph (JPEG) to this path
        #[arg(long, value_name = "PATH")]
        photo_out: Option<PathBuf>,
    },

    /// List the entries of a ZIP without decrypting it
    Inspect {
        /// Path to ZIP file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Show example usage
    Examples,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Initialize logger
    if cli.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    }

    let config = ExtractorConfig::default()
        .with_document_extension(cli.extension.as_str())
        .with_max_document_size(cli.max_size);
    let extractor = IdentityExtractor::new(config);

    match cli.command {
        Commands::Parse {
            file,
            code,
            json,
            photo_out,
        } => cmd_parse(&extractor, &file, &code, json, photo_out.as_deref()),
        Commands::Inspect { file } => cmd_inspect(&extractor, &file),
        Commands::Examples => {
            cmd_examples();
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn cmd_parse(
    extractor: &IdentityExtractor,
    file: &Path,
    code: &str,
    json: bool,
    photo_out: Option<&Path>,
) -> Result<ExitCode> {
    let code = match validate_share_code(code) {
        Ok(code) => code,
        Err(e) => {
            log::warn!("Rejected share code input: {}", e);
            eprintln!("❌ {}", e);
            return Ok(ExitCode::from(1));
        }
    };

    let bytes = std::fs::read(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;

    let result = extractor.extract_identity(&bytes, code);

    if let (Ok(record), Some(path)) = (&result, photo_out) {
        write_photo(record, path)?;
    }

    if let Err(e) = &result {
        if !e.kind().is_client_error() {
            log::error!("Internal extraction failure: {:?}", e);
        }
    }

    let response = VerificationResponse::from_result(result);

    if json {
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else {
        print_summary(&response);
    }

    Ok(match response.class() {
        ResponseClass::Success => ExitCode::SUCCESS,
        ResponseClass::ClientError => ExitCode::from(1),
        ResponseClass::ServerError => ExitCode::from(2),
    })
}

fn print_summary(response: &VerificationResponse) {
    match response {
        VerificationResponse::Verified {
            name,
            dob,
            gender,
            address,
            reference_id,
            photo,
            ..
        } => {
            println!("✅ Successfully extracted e-KYC data");
            println!();
            println!("Personal Information:");
            println!("  Reference ID: {}", reference_id);
            println!("  Name:         {}", name);
            println!("  DOB:          {}", dob);
            println!("  Gender:       {}", gender);
            println!();
            println!("Address:");
            println!("  {}", address);
            println!();
            println!(
                "Photo: {}",
                photo
                    .as_ref()
                    .map(|p| format!("{} base64 characters", p.len()))
                    .unwrap_or_else(|| "not present".to_string())
            );
        }
        VerificationResponse::Failed { error, code, .. } => {
            eprintln!("❌ {} [{}]", error, code);
        }
    }
}

fn write_photo(record: &IdentityRecord, path: &Path) -> Result<()> {
    let Some(photo) = &record.photograph else {
        eprintln!("⚠️  Document has no photograph, nothing written");
        return Ok(());
    };

    // Some issuers wrap the base64 text across lines
    let compact: String = photo.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    let image = STANDARD
        .decode(compact.as_bytes())
        .context("Photograph is not valid base64")?;

    std::fs::write(path, &image)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    println!("📷 Photo saved to {} ({} bytes)", path.display(), image.len());

    Ok(())
}

fn cmd_inspect(extractor: &IdentityExtractor, file: &Path) -> Result<ExitCode> {
    let bytes = std::fs::read(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;

    let entries = match extractor.inspect(&bytes) {
        Ok(entries) => entries,
        Err(e) => {
            eprintln!("❌ {}", e);
            return Ok(ExitCode::from(1));
        }
    };

    println!(
        "{:>10}  {:>10}  {:>9}  Name",
        "Length", "Size", "Encrypted"
    );
    println!("{}", "-".repeat(50));
    for entry in &entries {
        println!(
            "{:>10}  {:>10}  {:>9}  {}",
            entry.size,
            entry.compressed_size,
            if entry.encrypted { "yes" } else { "no" },
            entry.name
        );
    }
    println!("{}", "-".repeat(50));
    println!("{} entries", entries.len());

    Ok(ExitCode::SUCCESS)
}

fn cmd_examples() {
    println!("📚 ekyc Examples");
    println!();
    println!("1. Show the fields of an offline e-KYC download:");
    println!("   ekyc parse --file offlineaadhaar.zip --code 1234");
    println!();
    println!("2. Emit the JSON response served to the upload page:");
    println!("   ekyc parse --file offlineaadhaar.zip --code 1234 --json");
    println!();
    println!("3. Save the photograph as a JPEG:");
    println!("   ekyc parse --file offlineaadhaar.zip --code 1234 --photo-out photo.jpg");
    println!();
    println!("4. List what is inside a ZIP:");
    println!("   ekyc inspect --file offlineaadhaar.zip");
    println!();
    println!("Exit codes: 0 success, 1 rejected input or file, 2 internal error.");
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_arguments() {
        let cli = Cli::try_parse_from([
            "ekyc", "parse", "--file", "a.zip", "--code", "1234", "--json",
        ])
        .unwrap();
        assert_eq!(cli.max_size, DEFAULT_MAX_DOCUMENT_SIZE);
        assert_eq!(cli.extension, ".xml");
        match cli.command {
            Commands::Parse { file, code, json, photo_out } => {
                assert_eq!(file, PathBuf::from("a.zip"));
                assert_eq!(code, "1234");
                assert!(json);
                assert!(photo_out.is_none());
            }
            _ => panic!("expected parse command"),
        }
    }
}
