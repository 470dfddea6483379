//!
//! This is the demo front end for the Smalltalk-like evaluator.
//!
#![warn(missing_docs)]

use std::time::Instant;

use anyhow::anyhow;
use clap::Parser;
#[cfg(feature = "jemalloc")]
use jemallocator::Jemalloc;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use st_interpreter::config::{Policy, Strictness};
use st_interpreter::demos::{self, Demo};
use st_interpreter::universe::Universe;

#[cfg(feature = "jemalloc")]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

#[derive(Debug, Clone, PartialEq, Parser)]
#[clap(about, author)]
struct Options {
    /// The demo to run (`factorial`, `exceptions`, `classes` or `all`).
    #[clap(name = "DEMO", default_value = "all")]
    demo: String,

    /// Signal `UnboundVariable` when assigning to an undeclared name.
    #[clap(long)]
    strict_assignment: bool,

    /// Bind missing block arguments to nil (and drop extra ones) instead of signaling.
    #[clap(long)]
    lenient_arity: bool,

    /// Enable verbose output (with timing information).
    #[clap(short = 'v')]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let opts: Options = Options::parse();

    let default_level = if opts.verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();

    let strictness = Strictness {
        undeclared_assignment: if opts.strict_assignment {
            Policy::Strict
        } else {
            Policy::Lenient
        },
        arity: if opts.lenient_arity {
            Policy::Lenient
        } else {
            Policy::Strict
        },
    };

    let selected = match opts.demo.as_str() {
        "all" => demos::all(),
        name => vec![demos::by_name(name).ok_or_else(|| {
            anyhow!(
                "unknown demo '{}' (expected `factorial`, `exceptions`, `classes` or `all`)",
                name
            )
        })?],
    };

    for demo in selected {
        run(demo, strictness, opts.verbose)?;
    }

    Ok(())
}

fn run(demo: Demo, strictness: Strictness, verbose: bool) -> anyhow::Result<()> {
    let mut universe = Universe::with_strictness(strictness)?;

    println!("=== {} ===", demo.name);
    for (source, body) in demo.steps.iter() {
        let start = Instant::now();
        let output = universe.evaluate(body);
        let elapsed = start.elapsed();

        println!("{}", source);
        match output {
            Ok(value) => println!("  => {}", value.to_string(&universe)),
            Err(condition) => println!("  ERROR: {}", condition),
        }
        if verbose {
            println!(
                "  (executed in {}s {}ms)",
                elapsed.as_secs(),
                elapsed.subsec_millis()
            );
        }
    }
    println!();

    Ok(())
}
