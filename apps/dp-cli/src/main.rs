use clap::{Parser, Subcommand};
use dp_dynamics::{DynamicsError, DynamicsSolver, JointCountScene, SolverRegistry};
use dp_project::{ProblemDef, ProjectError, SolverDef};
use dp_property::{PropertyContainer, PropertyError, Schema};
use nalgebra::DVector;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "dp-cli")]
#[command(about = "Dynamics solver CLI - configure and step plugin solvers", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List registered solver types
    List,
    /// Show the initializer schema of a solver type
    Schema {
        /// Registered solver type name
        solver_type: String,
        /// Print a YAML declaration with the default values instead
        #[arg(long)]
        yaml: bool,
    },
    /// Show how each solver in a problem file is configured
    Inspect {
        /// Path to the problem YAML or JSON file
        problem_path: PathBuf,
    },
    /// Step a solver from a problem file and print the trajectory as CSV
    Simulate {
        /// Path to the problem YAML or JSON file
        problem_path: PathBuf,
        /// Solver name (defaults to the first solver in the file)
        #[arg(long)]
        solver: Option<String>,
        /// Number of steps
        #[arg(long, default_value_t = 100)]
        steps: usize,
        /// Initial state, comma separated (defaults to zeros)
        #[arg(long, value_delimiter = ',', allow_negative_numbers = true)]
        x0: Vec<f64>,
        /// Constant control, comma separated (defaults to zeros)
        #[arg(long, value_delimiter = ',', allow_negative_numbers = true)]
        u: Vec<f64>,
        /// Controlled joints in the scene (defaults to the position count)
        #[arg(long)]
        joints: Option<usize>,
    },
}

#[derive(thiserror::Error, Debug)]
enum CliError {
    #[error(transparent)]
    Project(#[from] ProjectError),

    #[error(transparent)]
    Dynamics(#[from] DynamicsError),

    #[error(transparent)]
    Property(#[from] PropertyError),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Solver not found: {0}")]
    SolverNotFound(String),

    #[error("Invalid argument: {0}")]
    InvalidArg(String),
}

type CliResult<T> = Result<T, CliError>;

fn main() -> CliResult<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let registry = SolverRegistry::with_defaults();

    match cli.command {
        Commands::List => cmd_list(&registry),
        Commands::Schema { solver_type, yaml } => cmd_schema(&registry, &solver_type, yaml),
        Commands::Inspect { problem_path } => cmd_inspect(&registry, &problem_path),
        Commands::Simulate {
            problem_path,
            solver,
            steps,
            x0,
            u,
            joints,
        } => cmd_simulate(
            &registry,
            &problem_path,
            solver.as_deref(),
            steps,
            x0,
            u,
            joints,
        ),
    }
}

fn cmd_list(registry: &SolverRegistry) -> CliResult<()> {
    if registry.is_empty() {
        println!("No solver types registered");
        return Ok(());
    }
    println!("Solver types:");
    for name in registry.names() {
        let schema = registry.schema(name)?;
        println!(
            "  {} ({} properties, {} required)",
            name,
            schema.fields().len(),
            schema.required_fields().count()
        );
    }
    Ok(())
}

fn cmd_schema(registry: &SolverRegistry, solver_type: &str, yaml: bool) -> CliResult<()> {
    if yaml {
        let def = SolverDef::from_container(solver_type, &registry.template(solver_type)?)?;
        print!("{}", serde_yaml::to_string(&def)?);
    } else {
        print!("{}", registry.schema(solver_type)?);
    }
    Ok(())
}

fn cmd_inspect(registry: &SolverRegistry, problem_path: &Path) -> CliResult<()> {
    let problem = dp_project::load(problem_path)?;
    println!("Problem: {} ({} solvers)", problem.name, problem.solvers.len());

    for def in &problem.solvers {
        let schema = registry.schema(&def.solver_type)?;
        let declared = def.to_container(schema)?;

        println!();
        println!("{} as {}", def.name().unwrap_or("<unnamed>"), def.solver_type);

        let missing = missing_required(schema, &declared);
        if !missing.is_empty() {
            warn!(solver_type = %def.solver_type, ?missing, "required properties not declared");
            println!("  missing required: {}", missing.join(", "));
            continue;
        }

        let mut merged = schema.template();
        schema.merge_into(&mut merged, &declared)?;
        print!("{merged}");
    }
    Ok(())
}

/// Required fields of `schema` that `declared` does not name.
fn missing_required<'a>(schema: &'a Schema, declared: &PropertyContainer) -> Vec<&'a str> {
    schema
        .required_fields()
        .map(|field| field.name())
        .filter(|name| !declared.contains(name))
        .collect()
}

fn cmd_simulate(
    registry: &SolverRegistry,
    problem_path: &Path,
    solver_name: Option<&str>,
    steps: usize,
    x0: Vec<f64>,
    u: Vec<f64>,
    joints: Option<usize>,
) -> CliResult<()> {
    let problem = dp_project::load(problem_path)?;
    let def = select_solver(&problem, solver_name)?;

    let schema = registry.schema(&def.solver_type)?;
    let mut solver = registry.create(&def.solver_type, def.to_container(schema)?)?;
    let joints = joints.unwrap_or(solver.num_positions());
    solver.assign_scene(&JointCountScene::new(joints))?;

    let x0 = vector_or_zeros("x0", x0, solver.base().state_dim())?;
    let u = vector_or_zeros("u", u, solver.num_controls())?;
    info!(
        solver = %solver.name(),
        integrator = %solver.integrator(),
        dt = solver.dt(),
        steps,
        "simulating"
    );

    print_row(0.0, &x0);
    let mut x = x0;
    for k in 1..=steps {
        x = solver.simulate_one_step(&x, &u)?;
        print_row(k as f64 * solver.dt(), &x);
    }
    Ok(())
}

fn select_solver<'a>(problem: &'a ProblemDef, name: Option<&str>) -> CliResult<&'a SolverDef> {
    match name {
        Some(name) => problem
            .solver(name)
            .ok_or_else(|| CliError::SolverNotFound(name.to_string())),
        None => problem
            .solvers
            .first()
            .ok_or_else(|| CliError::SolverNotFound("problem declares no solvers".to_string())),
    }
}

fn vector_or_zeros(what: &str, values: Vec<f64>, dim: usize) -> CliResult<DVector<f64>> {
    if values.is_empty() {
        return Ok(DVector::zeros(dim));
    }
    if values.len() != dim {
        return Err(CliError::InvalidArg(format!(
            "--{what} has {} values, solver expects {dim}",
            values.len()
        )));
    }
    Ok(DVector::from_vec(values))
}

fn print_row(t: f64, x: &DVector<f64>) {
    let cols: Vec<String> = x.iter().map(|v| format!("{v:.6}")).collect();
    println!("{t:.4},{}", cols.join(","));
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn simulate_parses_negative_vectors() {
        let cli = Cli::parse_from([
            "dp-cli", "simulate", "p.yaml", "--steps", "5", "--x0", "0,-0.5,0,0", "--u", "-1",
        ]);
        let Commands::Simulate { x0, u, steps, .. } = cli.command else {
            panic!("expected simulate");
        };
        assert_eq!(steps, 5);
        assert_eq!(x0, vec![0.0, -0.5, 0.0, 0.0]);
        assert_eq!(u, vec![-1.0]);
    }

    #[test]
    fn empty_vector_defaults_to_zeros() {
        assert_eq!(vector_or_zeros("u", vec![], 2).unwrap(), DVector::zeros(2));
        assert!(vector_or_zeros("u", vec![1.0], 2).is_err());
    }

    #[test]
    fn undeclared_required_fields_are_listed() {
        let registry = SolverRegistry::with_defaults();
        let solver_type = dp_dynamics::CARTPOLE_TYPE_NAME;
        let schema = registry.schema(solver_type).unwrap();

        let bare = SolverDef::new(solver_type).with("dt", 0.1);
        let declared = bare.to_container(schema).unwrap();
        assert_eq!(missing_required(schema, &declared), vec!["name"]);

        let named = SolverDef::new(solver_type).with("name", "cp");
        let declared = named.to_container(schema).unwrap();
        assert!(missing_required(schema, &declared).is_empty());
    }

    #[test]
    fn select_first_or_named_solver() {
        let problem = ProblemDef {
            version: 1,
            name: "p".into(),
            solvers: vec![
                SolverDef::new("A").with("name", "a"),
                SolverDef::new("A").with("name", "b"),
            ],
        };
        assert_eq!(select_solver(&problem, None).unwrap().name(), Some("a"));
        assert_eq!(select_solver(&problem, Some("b")).unwrap().name(), Some("b"));
        assert!(select_solver(&problem, Some("c")).is_err());
    }
}
