//! covstore-segregate — split a coverage data file into per-package
//! shard files.
//!
//! Usage:
//!   covstore-segregate --datafile <PATH> --package <DOTTED_NAME> --destination <DIR>
//!
//! Argument or validation failures print a diagnostic to stderr and
//! exit with code 1, before any protected operation runs. Success
//! exits 0.

use std::path::PathBuf;
use std::process;

use clap::{Arg, Command};
use covstore_core::CoverageSnapshot;
use covstore_durability::DataStore;
use covstore_segregate::segregate;

fn build_cli() -> Command {
    Command::new("covstore-segregate")
        .about("Split a coverage data file into per-package shard files")
        .arg(
            Arg::new("datafile")
                .long("datafile")
                .value_name("PATH")
                .help("Coverage data file to read (must exist)")
                .required(true),
        )
        .arg(
            Arg::new("package")
                .long("package")
                .value_name("DOTTED_NAME")
                .help("Namespace prefix to partition under")
                .required(true),
        )
        .arg(
            Arg::new("destination")
                .long("destination")
                .value_name("DIR")
                .help("Directory receiving the shard files (created if absent)")
                .required(true),
        )
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // try_get_matches so that argument errors exit 1, not clap's
    // default 2.
    let matches = match build_cli().try_get_matches() {
        Ok(matches) => matches,
        Err(e) => {
            eprintln!("{e}");
            process::exit(1);
        }
    };

    let Some(datafile) = matches.get_one::<String>("datafile") else {
        eprintln!("Error: --datafile option must be set");
        process::exit(1);
    };
    let Some(package) = matches.get_one::<String>("package") else {
        eprintln!("Error: --package option must be set");
        process::exit(1);
    };
    let Some(destination) = matches.get_one::<String>("destination") else {
        eprintln!("Error: --destination option must be set");
        process::exit(1);
    };

    let datafile = PathBuf::from(datafile);
    let destination = PathBuf::from(destination);

    if !datafile.exists() {
        eprintln!("Error: data file {} does not exist", datafile.display());
        process::exit(1);
    }
    if !datafile.is_file() {
        eprintln!(
            "Error: data file {} must be a regular file",
            datafile.display()
        );
        process::exit(1);
    }
    if destination.exists() && !destination.is_dir() {
        eprintln!(
            "Error: destination directory {} already exists but is not a directory",
            destination.display()
        );
        process::exit(1);
    }
    if let Err(e) = std::fs::create_dir_all(&destination) {
        eprintln!(
            "Error: cannot create destination directory {}: {e}",
            destination.display()
        );
        process::exit(1);
    }

    let store = DataStore::from_env();
    // An unreadable or corrupt data file degrades to an empty snapshot;
    // the store already logged why.
    let snapshot = store.load(&datafile).unwrap_or_else(CoverageSnapshot::new);
    segregate(&store, &snapshot, package, &destination);
}
