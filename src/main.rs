//! Ohmsolve - DC Circuit Solver
//!
//! Solves a schematic netlist and prints every branch current and meter
//! reading.
//!
//! # Usage
//!
//! ```bash
//! ohmsolve circuit.net
//! ohmsolve --reference 3 - < circuit.net
//! ```

use std::io::{self, Read, Write};
use std::path::PathBuf;

use clap::Parser;
use ohmsolve_core::{
    error::{OhmsolveError, Result},
    netlist,
    report::write_report,
    solver::DEFAULT_PIVOT_TOLERANCE,
    Circuit, SolverConfig,
};

/// DC circuit solver for schematic netlists
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the netlist file, or `-` to read stdin
    #[arg(value_name = "NETLIST")]
    netlist: PathBuf,

    /// Node held at 0 V
    #[arg(short, long, value_name = "NODE", default_value_t = 1)]
    reference: usize,

    /// Relative pivot threshold for singular matrix detection
    #[arg(long, default_value_t = DEFAULT_PIVOT_TOLERANCE)]
    pivot_tolerance: f64,
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    // Parse the netlist
    let records = if args.netlist.as_os_str() == "-" {
        let mut content = String::new();
        io::stdin()
            .read_to_string(&mut content)
            .map_err(|e| OhmsolveError::FileReadError {
                path: "<stdin>".to_string(),
                source: e,
            })?;
        netlist::parse(&content)?
    } else {
        netlist::parse_file(&args.netlist)?
    };

    // Build and solve the circuit
    let mut circuit = Circuit::from_netlist(&records)?;
    circuit.set_reference_node(args.reference)?;
    tracing::info!(
        nodes = circuit.node_count(),
        branches = circuit.branches().len(),
        "circuit ready"
    );

    let config = SolverConfig::new().with_pivot_tolerance(args.pivot_tolerance);
    let solution = circuit.solve(&config)?;

    // Report
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_report(solution, &mut out)?;
    out.flush().map_err(|e| OhmsolveError::ReportWriteError {
        message: e.to_string(),
    })
}
