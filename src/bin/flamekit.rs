use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "flamekit", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List registered variations and their capabilities.
    List,
    /// Print the parameters of one variation.
    Params(ParamsArgs),
    /// Print the kernel bundle of a flame.
    Kernel(KernelArgs),
    /// Check scalar/kernel parity.
    Parity(ParityArgs),
    /// Run the chaos game and print bounds and counts.
    Run(RunArgs),
}

#[derive(Parser, Debug)]
struct ParamsArgs {
    /// Variation name (exact).
    name: String,
}

#[derive(Parser, Debug)]
struct KernelArgs {
    /// Input flame JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Fail if any variation lacks a kernel form.
    #[arg(long, default_value_t = false)]
    strict: bool,
}

#[derive(Parser, Debug)]
struct ParityArgs {
    /// Samples per function.
    #[arg(long, default_value_t = 1000)]
    samples: usize,

    /// Sampling seed.
    #[arg(long, default_value_t = 7)]
    seed: u64,

    /// Draw the amount and every parameter per sample instead of using defaults.
    #[arg(long, default_value_t = false)]
    sampled: bool,

    /// Functions to check; all kernel-capable functions when empty.
    names: Vec<String>,
}

#[derive(Parser, Debug)]
struct RunArgs {
    /// Input flame JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Iterations after warmup.
    #[arg(long, default_value_t = 100_000)]
    iterations: u64,

    /// Enable worker-level parallelism.
    #[arg(long, default_value_t = false)]
    parallel: bool,

    /// Override rayon worker threads (parallel mode only).
    #[arg(long)]
    threads: Option<usize>,

    /// Base seed.
    #[arg(long, default_value_t = 0)]
    seed: u64,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::List => cmd_list(),
        Command::Params(args) => cmd_params(args),
        Command::Kernel(args) => cmd_kernel(args),
        Command::Parity(args) => cmd_parity(args),
        Command::Run(args) => cmd_run(args),
    }
}

fn load_flame(path: &Path) -> anyhow::Result<flamekit::Flame> {
    let f = File::open(path).with_context(|| format!("open flame JSON '{}'", path.display()))?;
    let flame = flamekit::Flame::from_json_reader(BufReader::new(f))
        .with_context(|| format!("load flame '{}'", path.display()))?;
    Ok(flame)
}

fn cmd_list() -> anyhow::Result<()> {
    for func in flamekit::variation::registry::all() {
        println!(
            "{:<24} {:>3}  {}",
            func.name(),
            func.priority(),
            func.capabilities().labels().join("|")
        );
    }
    Ok(())
}

fn cmd_params(args: ParamsArgs) -> anyhow::Result<()> {
    let func = flamekit::variation::registry::create(&args.name)?;
    for (spec, value) in func.params().iter().zip(func.parameter_values()) {
        let alias = spec.alias.map(|a| format!(" (alias {a})")).unwrap_or_default();
        println!("{:<20} {:>12} {:?}{alias}", spec.name, value, spec.kind);
    }
    Ok(())
}

fn cmd_kernel(args: KernelArgs) -> anyhow::Result<()> {
    let flame = load_flame(&args.in_path)?;
    let ctx = flamekit::Context::seeded(0).with_preserve_z(flame.preserve_z());
    let bundle = flamekit::export_kernels(&flame, &ctx);
    if args.strict {
        bundle.require_complete()?;
    }

    println!("// varset {}", bundle.varset_id);
    for entry in &bundle.entries {
        println!(
            "// layer {} {}xform {}",
            entry.layer,
            if entry.final_xform { "final " } else { "" },
            entry.xform
        );
        print!("{}", entry.source);
    }
    for name in &bundle.unsupported {
        eprintln!("no kernel form: {name}");
    }
    Ok(())
}

fn cmd_parity(args: ParityArgs) -> anyhow::Result<()> {
    let names: Vec<String> = if args.names.is_empty() {
        flamekit::variation::registry::all()
            .into_iter()
            .filter(|f| {
                f.capabilities()
                    .contains(flamekit::Capabilities::SUPPORTS_GPU)
            })
            .map(|f| f.name().to_owned())
            .collect()
    } else {
        args.names
    };

    let mut failed = 0usize;
    for name in &names {
        let report = if args.sampled {
            flamekit::check_function_sampled(name, args.samples, args.seed)?
        } else {
            flamekit::check_function(name, args.samples, args.seed)?
        };
        println!(
            "{:<24} {:?} {:>6}/{:<6} max_err={:.3e}",
            report.name,
            report.mode,
            report.samples - report.mismatches,
            report.samples,
            report.max_error
        );
        if !report.is_ok() {
            failed += 1;
        }
    }
    if failed > 0 {
        anyhow::bail!("{failed} function(s) failed parity");
    }
    Ok(())
}

fn cmd_run(args: RunArgs) -> anyhow::Result<()> {
    let flame = load_flame(&args.in_path)?;
    let opts = flamekit::SessionOpts {
        iterations: args.iterations,
        parallel: args.parallel,
        threads: args.threads,
        seed: args.seed,
        ..flamekit::SessionOpts::default()
    };
    let session = flamekit::IterationSession::new(&flame, opts)?;
    let mut sink = flamekit::BoundsSink::default();
    let stats = session.run(&mut sink)?;

    println!(
        "iterations={} plotted={} hidden={} restarts={} workers={}",
        stats.iterations, stats.plotted, stats.hidden, stats.restarts, stats.workers
    );
    match sink.bounds {
        Some([x0, y0, x1, y1]) => println!("bounds x=[{x0:.6}, {x1:.6}] y=[{y0:.6}, {y1:.6}]"),
        None => println!("bounds: no points plotted"),
    }
    Ok(())
}
