use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[cfg(target_os = "macos")]
pub const DEFAULT_FOLDER: &str = "/Volumes/2TData";
#[cfg(target_os = "windows")]
pub const DEFAULT_FOLDER: &str = "D:\\";
#[cfg(not(any(target_os = "macos", target_os = "windows")))]
pub const DEFAULT_FOLDER: &str = "/mnt/2TData";

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Disk tester, writes and validates random data to disk in chunks with checksum files",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fill the volume with random chunk files, then re-read and verify each one
    Test {
        /// Volume (mount point) to test
        #[arg(short, long, default_value = DEFAULT_FOLDER)]
        folder: PathBuf,

        /// Size of random data to write in GB. Leave some free space for the
        /// .sha1 checksum files
        #[arg(short, long, default_value_t = 500)]
        size: u64,

        /// Size of each chunk file in MB
        #[arg(short, long, default_value_t = 200)]
        chunksize: u64,
    },

    /// Re-verify chunk files already on the volume
    Validate {
        /// Volume (mount point) to validate
        #[arg(short, long, default_value = DEFAULT_FOLDER)]
        folder: PathBuf,
    },

    /// Remove chunk files written by an earlier run
    Clean {
        /// Volume (mount point) to clean
        #[arg(short, long, default_value = DEFAULT_FOLDER)]
        folder: PathBuf,
    },
}
