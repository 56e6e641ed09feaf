use anyhow::{Result, anyhow};
use clap::{Args, ValueEnum};
use log::debug;
use once_cell::sync::OnceCell;
use std::path::PathBuf;

static POOL_INIT: OnceCell<()> = OnceCell::new();
static GLOBAL_OPTS: OnceCell<GlobalOpts> = OnceCell::new();

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum, Debug, Default)]
pub enum OutputFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Args, Debug, Clone, Default)]
pub struct GlobalOpts {
    // write output to a file instead of stdout
    #[arg(short = 'o', long, value_name = "PATH", global = true)]
    pub output: Option<PathBuf>,

    // pretty | json
    #[arg(
        short = 'F',
        long,
        value_enum,
        default_value = "pretty",
        value_name = "FMT",
        global = true
    )]
    pub format: OutputFormat,

    #[arg(
        short = 't',
        long,
        global = true,
        help = "Threads for parallel runs (optional)"
    )]
    pub threads: Option<usize>,

    // verbosity (-v, -vv, etc.)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

/// Map `-v` counts onto a default filter for our crates. RUST_LOG, if set,
/// still wins.
pub fn setup_logging(level: u8) {
    let level = match level {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    let env = env_logger::Env::default().default_filter_or(format!("actv={}", level));
    let _ = env_logger::Builder::from_env(env).try_init();
}

/// Build the global rayon pool once. Later calls are no-ops.
pub fn setup_rayon(threads: Option<usize>) -> Result<()> {
    POOL_INIT.get_or_try_init(|| {
        let mut builder = rayon::ThreadPoolBuilder::new();
        if let Some(n) = threads {
            builder = builder.num_threads(n);
        }
        builder
            .build_global()
            .map_err(|e| anyhow!("failed to build global thread pool: {}", e))
    })?;
    debug!("rayon pool: {} threads", rayon::current_num_threads());
    Ok(())
}

pub fn init_globals(opts: GlobalOpts) -> Result<()> {
    let threads = opts.threads;
    let verbose = opts.verbose;

    if GLOBAL_OPTS.set(opts).is_err() {
        anyhow::bail!("Global options already initialized");
    }

    // logging
    setup_logging(verbose);
    // threading
    setup_rayon(threads)
}

pub fn get_globals() -> Result<&'static GlobalOpts> {
    GLOBAL_OPTS
        .get()
        .ok_or_else(|| anyhow!("Global options not initialized"))
}
