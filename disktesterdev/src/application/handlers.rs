use std::path::PathBuf;

use disktester_core::error::Result;
use disktester_core::set::{self, SetConfig, ValidateOutcome};

use crate::presentation::progress::ConsoleProgress;

// Decimal units throughout: -s is GB (10^9), -c is MB (10^6).
const GB: u64 = 1_000_000_000;
const MB: u64 = 1_000_000;

pub fn handle_test(folder: PathBuf, size_gb: u64, chunksize_mb: u64) -> Result<()> {
    let cfg = SetConfig {
        total_bytes: size_gb * GB,
        chunk_size: chunksize_mb * MB,
    };
    println!(
        "Testing disk {} with {} GB of random data, {}MB x {} chunks",
        folder.display(),
        size_gb,
        chunksize_mb,
        cfg.num_chunks()
    );

    let report = set::run_test(&folder, &cfg, &ConsoleProgress::new())?;
    println!(
        "All data validated successfully ({} chunks, {} bytes)",
        report.chunks, report.bytes_written
    );
    Ok(())
}

pub fn handle_validate(folder: PathBuf) -> Result<()> {
    match set::run_validate(&folder, &ConsoleProgress::new())? {
        ValidateOutcome::NoDirectory(dest) => {
            println!(
                "Folder {} does not exist, nothing to validate",
                dest.display()
            );
        }
        ValidateOutcome::Validated { chunks } => {
            println!("All data validated successfully ({chunks} chunks)");
        }
    }
    Ok(())
}

pub fn handle_clean(folder: PathBuf) -> Result<()> {
    let report = set::clean(&folder, &ConsoleProgress::new())?;
    if !report.existed {
        println!(
            "Folder {} does not exist, nothing to clean",
            report.dest.display()
        );
        return Ok(());
    }

    if report.failed > 0 {
        println!(
            "Removed {} chunk files, {} could not be removed",
            report.removed, report.failed
        );
    } else {
        println!("Removed {} chunk files", report.removed);
    }

    if report.dir_removed {
        println!(
            "Folder {} is now empty and has been removed",
            report.dest.display()
        );
    } else {
        println!("Folder {} is not empty, not removing", report.dest.display());
    }
    Ok(())
}
