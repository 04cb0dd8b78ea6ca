// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! hydronet-gen
//!
//! Builds every named test model and writes it to
//! `<out>/<name>/hydronet.toml`. Models are generated in parallel, one per
//! worker; the output directory is emptied first.
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;
use hydronet_core::Hash32;
use hydronet_testmodels::{constructor, constructors, Constructor};
use rayon::prelude::*;
use tracing::{debug, error, info, Level};
use tracing_subscriber::FmtSubscriber;

const README: &str = "\
# hydronet testmodels

The content of this directory are generated test models for hydronet.
Don't put important stuff in here, it will be emptied for every run.
";

#[derive(Parser, Debug)]
#[command(name = "hydronet-gen", version, about = "Generate the hydronet test models")]
struct Args {
    /// Output directory, emptied before writing
    #[arg(long, default_value = "generated_testmodels")]
    out: PathBuf,

    /// Only generate this model (repeatable)
    #[arg(long, value_name = "NAME")]
    only: Vec<String>,

    /// Worker threads; 0 uses one per core
    #[arg(short, long, default_value_t = 0)]
    jobs: usize,

    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("setting default subscriber failed")?;

    let selected = select(&args.only)?;
    prepare(&args.out)?;

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(args.jobs)
        .build()
        .context("failed to build worker pool")?;
    let failed: Vec<&str> = pool.install(|| {
        selected
            .par_iter()
            .filter_map(|&(name, build)| match generate(&args.out, name, build) {
                Ok(hash) => {
                    info!(hash = %hex::encode(hash), "Generated {name}");
                    None
                }
                Err(err) => {
                    error!("{name}: {err:#}");
                    Some(name)
                }
            })
            .collect()
    });

    if !failed.is_empty() {
        bail!("{} model(s) failed: {}", failed.len(), failed.join(", "));
    }
    info!(count = selected.len(), out = %args.out.display(), "all models generated");
    Ok(())
}

/// Constructors to run: every valid model, or the ones named by `--only`.
fn select(only: &[String]) -> Result<Vec<(&str, Constructor)>> {
    if only.is_empty() {
        return Ok(constructors().to_vec());
    }
    only.iter()
        .map(|wanted| {
            constructor(wanted)
                .map(|build| (wanted.as_str(), build))
                .with_context(|| format!("unknown model `{wanted}`"))
        })
        .collect()
}

fn prepare(out: &Path) -> Result<()> {
    if out.is_dir() {
        fs::remove_dir_all(out)
            .with_context(|| format!("failed to empty {}", out.display()))?;
    }
    fs::create_dir_all(out).with_context(|| format!("failed to create {}", out.display()))?;
    fs::write(out.join("README.md"), README).context("failed to write README.md")?;
    debug!(out = %out.display(), "prepared output directory");
    Ok(())
}

fn generate(out: &Path, name: &str, build: Constructor) -> Result<Hash32> {
    let model = build().with_context(|| format!("failed to build {name}"))?;
    let path = out.join(name).join("hydronet.toml");
    hydronet_io::write_model(&model, &path)
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(model.graph().content_hash()?)
}
