use std::path::PathBuf;
use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use roverkin_io::{hex32, load_config, run_trace, trace_hash, write_trace_json};
use roverkin_world::SimConfig;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name="rover_trace", version, about="Run the rover rig headless and emit a JSON trace + digest")]
struct Opts {
    /// Number of ticks to simulate
    #[arg(long, default_value_t = 1800)]
    ticks: u64,

    /// Seconds per tick
    #[arg(long, default_value_t = 1.0 / 60.0)]
    dt: f32,

    /// JSON SimConfig overriding any subset of the defaults
    #[arg(long)]
    params: Option<PathBuf>,

    /// Keep every N-th snapshot in the trace
    #[arg(long, default_value_t = 60)]
    every: u64,

    /// Output .json path (omit to only print the digest)
    #[arg(long)]
    out: Option<PathBuf>,

    /// Pretty-print JSON
    #[arg(long, action=ArgAction::SetTrue)]
    pretty: bool,

    /// Dump the effective config as JSON and exit
    #[arg(long, action=ArgAction::SetTrue)]
    print_config: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let opts = Opts::parse();

    let config = match &opts.params {
        Some(p) => load_config(p).with_context(|| format!("load {}", p.display()))?,
        None => SimConfig::default(),
    };

    if opts.print_config {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    info!(ticks = opts.ticks, dt = opts.dt, "tracing rover");
    let trace = run_trace(config, opts.ticks, opts.dt, opts.every);

    if let Some(out) = &opts.out {
        write_trace_json(&trace, out, opts.pretty)?;
        let mut hash_path = out.clone();
        hash_path.set_extension("blake3");
        std::fs::write(&hash_path, format!("{}\n", hex32(trace_hash(&trace))))
            .with_context(|| format!("write {}", hash_path.display()))?;
        println!("Trace:   {}", out.display());
    }

    println!("Records: {}", trace.records.len());
    println!("Phase:   {}", trace.final_phase);
    println!("State:   {}", trace.final_hash);
    println!("Trace#:  {}", hex32(trace_hash(&trace)));
    Ok(())
}
