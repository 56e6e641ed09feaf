mod cli;

use crate::cli::{BenchArgs, CheckArgs, Cli, Command};
use actv_core_kernel::{Activation, Kernel};
use actv_core_report::{
    BenchConfig, PROBE_INPUTS, default_tolerance, render_bench, render_check, run_bench, run_check,
};
use actv_globals::{GlobalOpts, OutputFormat, get_globals, init_globals};
use clap::Parser;
use log::{debug, info};

fn emit(text: &str, globals: &GlobalOpts) -> anyhow::Result<()> {
    match &globals.output {
        Some(path) => {
            std::fs::write(path, format!("{}\n", text))?;
            info!("wrote {}", path.display());
        }
        None => println!("{}", text),
    }
    Ok(())
}

pub async fn run_check_cmd(cmd: CheckArgs, globals: &GlobalOpts) -> anyhow::Result<bool> {
    debug!("actv-bench::check");

    let inputs: &[f32] = if cmd.inputs.is_empty() {
        &PROBE_INPUTS
    } else {
        &cmd.inputs
    };
    let activations = match cmd.activation {
        Some(a) => vec![a],
        None => Activation::ALL.to_vec(),
    };

    let mut reports = Vec::with_capacity(activations.len());
    for act in activations {
        let tol = cmd.tolerance.unwrap_or_else(|| default_tolerance(act));
        reports.push(run_check(act, inputs, tol)?);
    }
    let passed = reports.iter().all(|r| r.passed);

    let text = match globals.format {
        OutputFormat::Pretty => reports
            .iter()
            .map(render_check)
            .collect::<Vec<_>>()
            .join("\n\n"),
        OutputFormat::Json => serde_json::to_string_pretty(&reports)?,
    };
    emit(&text, globals)?;

    Ok(passed)
}

pub async fn run_bench_cmd(cmd: BenchArgs, globals: &GlobalOpts) -> anyhow::Result<()> {
    debug!("actv-bench::bench");

    let cfg = BenchConfig {
        size: cmd.size,
        iters: cmd.iters,
        warmup: cmd.warmup,
        parallel_split: cmd.parallel,
    };
    let kernels = match cmd.kernel {
        Some(k) => vec![k],
        None => Kernel::ALL.to_vec(),
    };

    let mut reports = Vec::with_capacity(kernels.len());
    for kernel in kernels {
        // keep the timed loop off the async workers
        let report = tokio::task::spawn_blocking(move || run_bench(kernel, &cfg)).await??;
        reports.push(report);
    }

    let text = match globals.format {
        OutputFormat::Pretty => reports
            .iter()
            .map(render_bench)
            .collect::<Vec<_>>()
            .join("\n\n"),
        OutputFormat::Json => serde_json::to_string_pretty(&reports)?,
    };
    emit(&text, globals)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_globals(cli.g)?;
    let globals = get_globals()?;

    match cli.cmd {
        Command::Check(args) => {
            if !run_check_cmd(args, globals).await? {
                anyhow::bail!("fast and reference kernels disagree beyond tolerance");
            }
            Ok(())
        }
        Command::Bench(args) => run_bench_cmd(args, globals).await,
    }
}
