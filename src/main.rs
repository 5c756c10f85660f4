// src/main.rs - Command line tools for Cuckoo Cycle proofs
// Tree location: ./src/main.rs

//! cuckoo-pow Main Entry Point
//!
//! Verifies, mines, encodes and decodes proofs from the command line.
//! Settings come from an optional JSON file, with flags taking precedence.
//!
//! # Version History
//! - 0.1.0: verify and mine commands
//! - 0.1.1: encode/decode for the consensus proof layout
//! - 0.1.2: JSON settings file, config command

use std::path::PathBuf;
use std::time::Instant;

use chrono::Local;
use clap::{Parser, Subcommand};
use cuckoo_pow::{
    algorithms::{Algorithm, Cuckaroo, Cuckoo, Miner},
    consensus::PROOF_SIZE,
    init, CuckooPowError, Proof, Result, Settings,
};

#[derive(Parser)]
#[command(name = "cuckoo-pow")]
#[command(about = "Cuckoo Cycle proof-of-work verifier, miner and proof codec")]
struct Cli {
    /// JSON settings file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Verify a cycle against a header
    Verify {
        /// Header bytes (hex)
        #[arg(long)]
        header: String,
        /// Comma separated nonces (decimal or 0x-prefixed hex)
        #[arg(short, long)]
        nonces: String,
        /// Graph flavour (cuckoo, cuckaroo)
        #[arg(short, long)]
        algorithm: Option<String>,
        /// Size shift (edge bits for cuckaroo)
        #[arg(short, long)]
        size: Option<u8>,
        /// Easiness percentage (cuckoo only)
        #[arg(short, long)]
        easiness: Option<u64>,
    },
    /// Search a header's graph for a proof with the reference miner
    Mine {
        /// Header bytes (hex)
        #[arg(long)]
        header: String,
        /// Size shift
        #[arg(short, long)]
        size: Option<u8>,
        /// Easiness percentage
        #[arg(short, long)]
        easiness: Option<u64>,
    },
    /// Encode nonces in the consensus proof layout
    Encode {
        /// Size shift
        #[arg(short, long)]
        size: Option<u8>,
        /// Comma separated nonces (decimal or 0x-prefixed hex)
        #[arg(short, long)]
        nonces: String,
    },
    /// Decode a proof in the consensus layout
    Decode {
        /// Encoded proof (hex)
        proof: String,
    },
    /// Show the effective configuration
    Config,
}

fn main() -> Result<()> {
    init()?;

    let cli = Cli::parse();
    let settings = load_settings(cli.config.as_ref())?;

    match cli.command {
        Commands::Verify {
            header,
            nonces,
            algorithm,
            size,
            easiness,
        } => {
            let mut settings = settings;
            if let Some(name) = algorithm {
                settings.algorithm = parse_algorithm(&name)?;
            }
            apply_overrides(&mut settings, size, easiness)?;
            verify(&settings, &header, &nonces)?;
        }
        Commands::Mine {
            header,
            size,
            easiness,
        } => {
            let mut settings = settings;
            apply_overrides(&mut settings, size, easiness)?;
            mine(&settings, &header)?;
        }
        Commands::Encode { size, nonces } => {
            let proof = Proof::new(size.unwrap_or(settings.size_shift), &parse_nonces(&nonces)?)?;
            println!("{}", hex::encode(proof.to_bytes()?));
        }
        Commands::Decode { proof } => {
            decode(&proof)?;
        }
        Commands::Config => {
            println!("{}", serde_json::to_string_pretty(&settings)?);
        }
    }

    Ok(())
}

fn timestamp() -> String {
    Local::now().format("%H:%M:%S").to_string()
}

fn load_settings(path: Option<&PathBuf>) -> Result<Settings> {
    let settings = match path {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    Ok(settings)
}

fn apply_overrides(settings: &mut Settings, size: Option<u8>, easiness: Option<u64>) -> Result<()> {
    if let Some(size) = size {
        settings.size_shift = size;
    }
    if let Some(easiness) = easiness {
        settings.easiness = easiness;
    }
    settings.validate()?;
    Ok(())
}

fn verify(settings: &Settings, header_hex: &str, nonces: &str) -> Result<()> {
    let header = hex::decode(header_hex.trim_start_matches("0x"))?;
    let nonces = parse_nonces(nonces)?;

    let result = match settings.algorithm {
        Algorithm::Cuckoo => Cuckoo::new(&header, settings.size_shift)?.check(&nonces, settings.easiness),
        Algorithm::Cuckaroo => Cuckaroo::new(&header, settings.size_shift)?.check(&nonces),
    };

    match result {
        Ok(()) => {
            println!(
                "{} {} cycle verified (size shift {})",
                timestamp(),
                settings.algorithm.name(),
                settings.size_shift
            );
            Ok(())
        }
        Err(reason) => {
            println!("{} {} cycle rejected: {}", timestamp(), settings.algorithm.name(), reason);
            Err(reason.into())
        }
    }
}

fn mine(settings: &Settings, header_hex: &str) -> Result<()> {
    if settings.algorithm != Algorithm::Cuckoo {
        return Err(CuckooPowError::Input(format!(
            "the reference miner only supports {}",
            Algorithm::Cuckoo.name()
        )));
    }

    let header = hex::decode(header_hex.trim_start_matches("0x"))?;
    let cuckoo = Cuckoo::new(&header, settings.size_shift)?;
    let miner = Miner::new(settings.easiness, PROOF_SIZE)?.with_max_path_len(settings.max_path_len);

    println!(
        "{} Mining size shift {} at easiness {}%",
        timestamp(),
        settings.size_shift,
        settings.easiness
    );

    let start_time = Instant::now();
    let proof = miner.mine(&cuckoo)?;
    let elapsed = start_time.elapsed();

    match proof {
        Some(proof) => {
            println!("{} Found {}-cycle in {:.2}s", timestamp(), PROOF_SIZE, elapsed.as_secs_f64());
            println!("{} Difficulty: {}", timestamp(), proof.to_difficulty()?);
            println!("{}", serde_json::to_string(&proof)?);
            println!("{}", hex::encode(proof.to_bytes()?));
        }
        None => {
            println!("{} No {}-cycle found in {:.2}s", timestamp(), PROOF_SIZE, elapsed.as_secs_f64());
        }
    }

    Ok(())
}

fn decode(proof_hex: &str) -> Result<()> {
    let bytes = hex::decode(proof_hex.trim_start_matches("0x"))?;
    let proof = Proof::read_from(&mut bytes.as_slice())?;

    println!("{}", serde_json::to_string_pretty(&proof)?);
    println!("{} Difficulty: {}", timestamp(), proof.to_difficulty()?);
    Ok(())
}

fn parse_algorithm(name: &str) -> Result<Algorithm> {
    Algorithm::from_name(name).ok_or_else(|| {
        CuckooPowError::Input(format!("Invalid algorithm: '{}'. Use 'cuckoo' or 'cuckaroo'", name))
    })
}

fn parse_nonces(list: &str) -> Result<Vec<u32>> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            let parsed = match s.strip_prefix("0x") {
                Some(hex) => u32::from_str_radix(hex, 16),
                None => s.parse(),
            };
            parsed.map_err(|_| CuckooPowError::Input(format!("Invalid nonce: '{}'", s)))
        })
        .collect()
}
