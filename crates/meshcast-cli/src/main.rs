//! Meshcast binary
//!
//! Admits broadcast clients over a capacity-limited network.

use std::env;

use meshcast_cli::{run, write_output, CliConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn print_usage() {
    eprintln!("usage: meshcast [INPUT] [OUTPUT] [--max-slice N] [--no-verify] [--pretty]");
    eprintln!();
    eprintln!("  INPUT   problem JSON, `-` or absent for stdin ($MESHCAST_INPUT)");
    eprintln!("  OUTPUT  solution JSON, `-` or absent for stdout ($MESHCAST_OUTPUT)");
    eprintln!();
    eprintln!("  --max-slice N  stop searching past slice N ($MESHCAST_MAX_SLICE)");
    eprintln!("  --no-verify    skip the solution check ($MESHCAST_VERIFY=0)");
    eprintln!("  --pretty       indent the output");
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr so stdout stays valid JSON
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "meshcast=info,meshcast_cli=info,meshcast_admission=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    if args.iter().any(|a| a == "-h" || a == "--help") {
        print_usage();
        return Ok(());
    }

    let config = CliConfig::from_env()?.with_args(&args)?;
    let output = run(&config)?;

    tracing::info!(
        admitted = output.report.admitted.len(),
        rejected = output.report.rejected.len(),
        revenue = output.report.revenue,
        "admission complete"
    );

    write_output(&output, &config)?;
    Ok(())
}
