//! Scribe CLI - makes the scrolls of an OpenMW load order learnable.
//!
//! This is the main entry point for the Scribe command-line application.

mod config;

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;
use tracing_subscriber::EnvFilter;

use scribe::magic::{NO_SALE_MODULE, SCRIBE_MODULE};
use scribe::prelude::*;

use crate::config::OpenMwConfig;

/// Scribe - learn spells from the scrolls of your OpenMW load order
#[derive(Parser)]
#[command(name = "scribe")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// openmw.cfg to read the load order from
    #[arg(short, long, env = "OPENMW_CONFIG")]
    conffile: Option<PathBuf>,

    /// Directory to store the new modules in (defaults to the OpenMW-CS data directory)
    #[arg(short = 'd', long, env = "OPENMW_MOD_DIR")]
    moddir: Option<PathBuf>,

    /// Seed for the randomized skill requirements and spell costs
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("scribe=info".parse()?))
        .init();

    let cli = Cli::parse();

    let conffile = match cli.conffile {
        Some(path) => path,
        None => config::default_config_path()
            .context("Unrecognized platform, specify the config file with -c")?,
    };
    let moddir = match cli.moddir {
        Some(path) => path,
        None => config::default_mod_dir()
            .context("Unrecognized platform, specify the output directory with -d")?,
    };

    if !conffile.exists() {
        anyhow::bail!("The config file '{}' doesn't seem to exist", conffile.display());
    }

    let config = OpenMwConfig::load(&conffile)?;
    info!(
        "Config file parsed: {} data directories, {} content files",
        config.data_dirs.len(),
        config.content.len()
    );

    let plugins: Vec<PathBuf> = config
        .resolve()
        .into_iter()
        .filter(|path| !is_own_output(path))
        .collect();

    let corpus = scan(&plugins)?;

    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let derivation = derive(corpus, &mut rng);
    info!(
        "{} scrolls: {} learnable, {} scripted, {} unlearnable; {} merchants restricted",
        derivation.scrolls.len(),
        derivation.derived(),
        derivation.scripted,
        derivation.unlearnable,
        derivation.npcs.len()
    );

    OutputAssembler::default()
        .write(&moddir, &derivation)
        .context("Failed to write output modules")?;

    print_instructions(&moddir);

    Ok(())
}

fn scan(plugins: &[PathBuf]) -> Result<Corpus> {
    println!("Scanning {} plugins...", plugins.len());

    let pb = ProgressBar::new(plugins.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    let start = Instant::now();
    let mut corpus = Corpus::new();
    for path in plugins {
        if let Some(name) = path.file_name() {
            pb.set_message(name.to_string_lossy().into_owned());
        }
        corpus
            .scan_file(path)
            .with_context(|| format!("Failed to scan {}", path.display()))?;
        pb.inc(1);
    }

    pb.finish_with_message("Done");
    println!(
        "Scanned in {:?}: {} books, {} enchantments, {} NPCs",
        start.elapsed(),
        corpus.books.len(),
        corpus.enchantments.len(),
        corpus.npcs.len()
    );

    Ok(corpus)
}

fn print_instructions(moddir: &Path) {
    println!("\n\n****************************************");
    println!(
        " When you next start the OpenMW Launcher, look for 2 modules named '{}' and '{}' in {}.",
        SCRIBE_MODULE,
        NO_SALE_MODULE,
        moddir.display()
    );
    println!(" Drag them to the bottom of the load list and enable one or both of them.");
    println!(" They need to load after every module that adds scrolls or NPCs.");
    println!();
    println!(" Do not share the created files: they are built from your current load list.");
    println!(" Do not move them to the Morrowind Data Files directory, it creates confusing duplicates.");
    println!(" Do not rename them: the file names are how old versions are skipped on the next run.");
    println!();
}
