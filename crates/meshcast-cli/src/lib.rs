//! Meshcast command-line front end.
//!
//! Reads a JSON [`Problem`], runs greedy admission over it and writes the
//! admitted paths, client priorities, capacity table and a run report as
//! JSON.

mod config;
mod error;
mod problem;

pub use config::CliConfig;
pub use error::{Error, Result};
pub use problem::Problem;

use std::fs::File;
use std::io::{self, BufWriter, Write};

use meshcast_admission::{verify, AdmissionController, CapacityModel, RunReport, Solution};
use serde::Serialize;
use tracing::{info, warn};

/// What the binary writes: the solution fields plus the report.
#[derive(Debug, Clone, Serialize)]
pub struct Output {
    #[serde(flatten)]
    pub solution: Solution,
    pub report: RunReport,
}

/// Load the configured problem and solve it.
pub fn run(config: &CliConfig) -> Result<Output> {
    let problem = match &config.input {
        Some(path) => {
            info!(input = %path.display(), "reading problem");
            Problem::from_path(path)?
        }
        None => {
            info!("reading problem from stdin");
            Problem::from_reader(io::stdin().lock())?
        }
    };
    solve(&problem, config)
}

/// Admit the problem's clients and, if enabled, check the result.
pub fn solve(problem: &Problem, config: &CliConfig) -> Result<Output> {
    let topology = problem.topology()?;
    let baseline = problem.baseline(&topology);
    let mut capacity = CapacityModel::from_topology(&topology);

    info!(
        nodes = topology.node_count(),
        routers = topology.routers().count(),
        links = topology.edge_count(),
        reachable = baseline.reachable_count(),
        clients = problem.clients.len(),
        "topology loaded"
    );

    let admission = AdmissionController::new(&topology)
        .with_baseline(baseline)
        .with_config(config.search())
        .run(&problem.clients, &mut capacity)?;

    let solution = admission.solution(&capacity);
    if config.verify {
        if let Err(violations) = verify(&solution, &topology, &capacity) {
            warn!(count = violations.len(), "solution failed verification");
            return Err(Error::Verification(violations));
        }
    }

    Ok(Output {
        solution,
        report: admission.report,
    })
}

/// Serialize `output` to the configured file or stdout.
pub fn write_output(output: &Output, config: &CliConfig) -> Result<()> {
    match &config.output {
        Some(path) => {
            let writer = BufWriter::new(File::create(path)?);
            write_json(writer, output, config.pretty)?;
            info!(output = %path.display(), "solution written");
        }
        None => write_json(io::stdout().lock(), output, config.pretty)?,
    }
    Ok(())
}

fn write_json<W: Write>(mut writer: W, output: &Output, pretty: bool) -> Result<()> {
    if pretty {
        serde_json::to_writer_pretty(&mut writer, output)?;
    } else {
        serde_json::to_writer(&mut writer, output)?;
    }
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use meshcast_topology::NodeId;

    // two clients behind one capacity-1 router
    const CONTESTED: &str = r#"{
        "provider": 0,
        "graph": { "0": [1], "1": [2, 3] },
        "capacities": [4294967295, 1, 5, 5],
        "clients": [
            { "id": 2, "payment": 10, "alpha": 1.0 },
            { "id": 3, "payment": 50, "alpha": 1.0 }
        ]
    }"#;

    fn contested() -> Problem {
        Problem::from_reader(CONTESTED.as_bytes()).unwrap()
    }

    #[test]
    fn solve_admits_higher_payment_first() {
        let output = solve(&contested(), &CliConfig::default()).unwrap();

        assert_eq!(
            output.solution.paths.get(&NodeId(3)),
            Some(&vec![NodeId(0), NodeId(1), NodeId(3)])
        );
        assert!(!output.solution.paths.contains_key(&NodeId(2)));
        assert_eq!(output.solution.priorities[&NodeId(3)], 0);
        assert_eq!(output.solution.priorities[&NodeId(2)], 1);
        assert_eq!(output.report.revenue, 50);
        assert_eq!(output.report.rejected.len(), 1);
    }

    #[test]
    fn horizon_rejects_everything_beyond_it() {
        let config = CliConfig {
            max_slice: Some(1),
            ..CliConfig::default()
        };
        let output = solve(&contested(), &config).unwrap();

        assert!(output.solution.paths.is_empty());
        assert_eq!(output.solution.priorities.len(), 2);
        assert_eq!(output.report.revenue, 0);
    }

    #[test]
    fn invalid_client_aborts() {
        let mut problem = contested();
        problem.clients[0].alpha = -1.0;
        assert!(matches!(
            solve(&problem, &CliConfig::default()),
            Err(Error::Admission(_))
        ));
    }

    #[test]
    fn output_serializes_flat() {
        let output = solve(&contested(), &CliConfig::default()).unwrap();
        let value = serde_json::to_value(&output).unwrap();

        assert_eq!(value["paths"]["3"], serde_json::json!([0, 1, 3]));
        assert_eq!(value["priorities"]["2"], 1);
        assert_eq!(value["capacities"]["1"], 1);
        assert_eq!(value["report"]["revenue"], 50);
        assert_eq!(value["report"]["rejected"][0]["reason"], "unreachable");
        assert_eq!(value["report"]["admitted"][0]["clients_on_path"], 0);
    }

    #[test]
    fn file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("problem.json");
        let output = dir.path().join("solution.json");
        File::create(&input)
            .unwrap()
            .write_all(CONTESTED.as_bytes())
            .unwrap();

        let config = CliConfig {
            input: Some(input),
            output: Some(output.clone()),
            pretty: true,
            ..CliConfig::default()
        };
        write_output(&run(&config).unwrap(), &config).unwrap();

        let written: Solution =
            serde_json::from_reader(File::open(&output).unwrap()).unwrap();
        assert_eq!(written.paths.len(), 1);
        assert_eq!(written.priorities.len(), 2);
        assert_eq!(written.capacities.len(), 4);
    }
}
