//! Example: Extract identity fields from an offline e-KYC ZIP
//!
//! Usage:
//!   cargo run --example extract_identity -- <path_to_zip> <share_code>

use ekyc_core::{extract_identity, ErrorKind};

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 3 {
        eprintln!("Usage: {} <ekyc_zip_path> <share_code>", args[0]);
        eprintln!("Example: {} ~/offlineaadhaar.zip 1234", args[0]);
        std::process::exit(1);
    }

    let zip_path = &args[1];
    let share_code = &args[2];

    let bytes = match std::fs::read(zip_path) {
        Ok(bytes) => bytes,
        Err(e) => {
            eprintln!("Cannot read {}: {}", zip_path, e);
            std::process::exit(1);
        }
    };

    match extract_identity(&bytes, share_code) {
        Ok(record) => {
            println!("Reference ID: {}", record.reference_id);
            println!("Name:         {}", record.name);
            println!("DOB:          {}", record.date_of_birth);
            println!("Gender:       {}", record.gender);
            println!("Address:      {}", record.address);
            println!("Has photo:    {}", record.has_photograph());
        }
        Err(e) if e.kind() == ErrorKind::Internal => {
            eprintln!("Internal error: {:?}", e);
            std::process::exit(2);
        }
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    }
}
