use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use steplex_solver::{Constraint, LinearProgram, ObjectiveFunction, Solver, TableauStep, TraceStatus};

#[derive(Parser)]
#[command(name = "steplex")]
#[command(about = "Step-traced simplex solver for upper-bounded linear programs", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve a problem file and print every tableau step
    Solve {
        /// JSON problem file
        file: PathBuf,
        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
        /// Only print the final step
        #[arg(long)]
        last: bool,
    },
    /// Validate a problem file and print a summary
    Check {
        /// The file to check
        file: PathBuf,
    },
    /// Test a candidate assignment against every constraint
    Feasible {
        /// JSON problem file
        file: PathBuf,
        /// One value per decision variable
        #[arg(required = true, num_args = 1..)]
        values: Vec<f64>,
    },
    /// Print a sample problem file
    Sample,
}

#[derive(serde::Deserialize)]
struct ProblemFile {
    objective: Vec<f64>,
    constraints: Vec<ConstraintFile>,
}

#[derive(serde::Deserialize)]
struct ConstraintFile {
    coefficients: Vec<f64>,
    limit: f64,
}

const SAMPLE: &str = r#"{
  "objective": [1, 0, 2, -1, 0],
  "constraints": [
    { "coefficients": [1, 2, 0, 1, 1], "limit": 12 },
    { "coefficients": [-1, 2, -2, 4, 0], "limit": 13 },
    { "coefficients": [1, 1, 1, 1, 0], "limit": 7 }
  ]
}"#;

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Solve { file, format, last } => {
            let program = load_program(&file);
            let trace = Solver::new().solve(&program);

            if format == "json" {
                match serde_json::to_string_pretty(&trace) {
                    Ok(json) => println!("{}", json),
                    Err(e) => {
                        eprintln!("Error serializing trace: {}", e);
                        std::process::exit(1);
                    }
                }
                return;
            }

            println!("Status: {}", status_label(trace.status));
            println!();
            if last {
                if let Some(step) = trace.final_step() {
                    print_step(trace.steps.len() - 1, trace.steps.len(), step);
                }
            } else {
                for (index, step) in trace.steps.iter().enumerate() {
                    print_step(index, trace.steps.len(), step);
                }
            }
            if !trace.is_optimal() {
                std::process::exit(1);
            }
        }
        Commands::Check { file } => {
            let program = load_program(&file);
            println!("✓ {} is valid", file.display());
            println!("  {} variables", program.num_variables());
            println!("  {} constraints", program.num_constraints());
        }
        Commands::Feasible { file, values } => {
            let program = load_program(&file);
            match program.is_feasible(&values) {
                Ok(true) => {
                    println!("feasible");
                    match program.objective().evaluate(&values) {
                        Ok(value) => println!("objective value: {:.2}", value),
                        Err(e) => {
                            eprintln!("Error: {}", e);
                            std::process::exit(1);
                        }
                    }
                }
                Ok(false) => {
                    println!("infeasible");
                    std::process::exit(1);
                }
                Err(e) => {
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                }
            }
        }
        Commands::Sample => {
            println!("{}", SAMPLE);
        }
    }
}

fn load_program(path: &Path) -> LinearProgram {
    let source = match std::fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error reading file: {}", e);
            std::process::exit(1);
        }
    };

    let file: ProblemFile = match serde_json::from_str(&source) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Invalid problem file: {}", e);
            std::process::exit(1);
        }
    };

    let objective = match ObjectiveFunction::from_coefficients(file.objective) {
        Ok(o) => o,
        Err(e) => {
            eprintln!("Invalid objective: {}", e);
            std::process::exit(1);
        }
    };

    let mut program = LinearProgram::with_objective(objective);
    for (index, c) in file.constraints.into_iter().enumerate() {
        let constraint = match Constraint::new(c.coefficients, c.limit) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Invalid constraint {}: {}", index + 1, e);
                std::process::exit(1);
            }
        };
        if let Err(e) = program.add_constraint(constraint) {
            eprintln!("Invalid constraint {}: {}", index + 1, e);
            std::process::exit(1);
        }
    }
    program
}

fn status_label(status: TraceStatus) -> &'static str {
    match status {
        TraceStatus::Optimal => "OPTIMAL",
        TraceStatus::NoConstraints => "NO CONSTRAINTS",
        TraceStatus::IterationCapExceeded => "ITERATION CAP EXCEEDED",
        TraceStatus::DegeneratePivot => "DEGENERATE PIVOT",
        TraceStatus::Failed => "FAILED",
    }
}

fn print_step(index: usize, total: usize, step: &TableauStep) {
    println!("Step {}/{}", index + 1, total);

    let basis: Vec<String> = step
        .basic_variables
        .iter()
        .map(|base| match base {
            Some(col) => format!("x{}", col + 1),
            None => "-".to_string(),
        })
        .collect();
    println!("  basis: [{}]", basis.join(", "));

    for (row, values) in step.tableau.iter().enumerate() {
        let cells: Vec<String> = values.iter().map(|v| format!("{:8.2}", v)).collect();
        println!("  {} | {:8.2}", cells.join(" "), step.limits[row]);
    }

    if let Some((value, columns)) = step.objective_row.split_last() {
        let cells: Vec<String> = columns.iter().map(|v| format!("{:8.2}", v)).collect();
        println!("  objective: {}   value: {:.2}", cells.join(" "), value);
    }

    let cells: Vec<String> = step.reduced_costs.iter().map(|v| format!("{:8.2}", v)).collect();
    println!("  reduced:   {}", cells.join(" "));

    if let (Some(entering), Some(leaving)) = (step.entering_index, step.leaving_index) {
        println!("  next pivot: entering x{}, leaving row {}", entering + 1, leaving + 1);
    }
    println!();
}
