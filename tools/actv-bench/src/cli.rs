use actv_core_kernel::{Activation, Kernel};
use actv_globals::GlobalOpts;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "actv-bench",
    version = env!("CARGO_PKG_VERSION"),
    about = "Check and benchmark the GELU / Dish activation kernels."
)]
pub struct Cli {
    #[command(flatten)]
    pub g: GlobalOpts,

    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compare fast and reference kernels on the same inputs
    Check(CheckArgs),
    /// Time kernels over a fixed-size buffer
    Bench(BenchArgs),
}

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Only check this activation (gelu | dish); default is both
    #[arg(short = 'a', long)]
    pub activation: Option<Activation>,

    /// Override the per-activation tolerance
    #[arg(long, value_name = "TOL")]
    pub tolerance: Option<f32>,

    /// Comma-separated inputs, e.g. --input=-2,-1,0,1
    #[arg(
        short = 'i',
        long = "input",
        value_delimiter = ',',
        allow_negative_numbers = true
    )]
    pub inputs: Vec<f32>,
}

#[derive(Args, Debug)]
pub struct BenchArgs {
    /// Kernel to run (gelu_fast | gelu_ref | dish_fast | dish_ref); default is all four
    #[arg(short = 'k', long)]
    pub kernel: Option<Kernel>,

    /// Elements per call
    #[arg(short = 'n', long, default_value_t = 1024)]
    pub size: usize,

    /// Timed calls
    #[arg(long, default_value_t = 10_000)]
    pub iters: usize,

    /// Untimed calls before timing starts
    #[arg(long, default_value_t = 100)]
    pub warmup: usize,

    /// Split each call across the thread pool in pieces of this many elements
    #[arg(long, value_name = "ELEMS")]
    pub parallel: Option<usize>,
}
