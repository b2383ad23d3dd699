//! dp-project: problem files declaring solvers and their properties.

pub mod schema;
pub mod validate;

pub use schema::{ProblemDef, SolverDef};
pub use validate::{ValidationError, validate_problem};

use dp_property::PropertyError;
use std::path::Path;

pub const LATEST_VERSION: u32 = 1;

pub type ProjectResult<T> = Result<T, ProjectError>;

#[derive(thiserror::Error, Debug)]
pub enum ProjectError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Property error: {0}")]
    Property(#[from] PropertyError),

    #[error("Unknown property '{key}' for solver type {solver_type}")]
    UnknownProperty { solver_type: String, key: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub fn from_yaml_str(content: &str) -> ProjectResult<ProblemDef> {
    let problem: ProblemDef = serde_yaml::from_str(content)?;
    validate_problem(&problem)?;
    Ok(problem)
}

pub fn load_yaml(path: &Path) -> ProjectResult<ProblemDef> {
    let content = std::fs::read_to_string(path)?;
    from_yaml_str(&content)
}

pub fn save_yaml(path: &Path, problem: &ProblemDef) -> ProjectResult<()> {
    validate_problem(problem)?;
    let content = serde_yaml::to_string(problem)?;
    std::fs::write(path, content)?;
    Ok(())
}

pub fn load_json(path: &Path) -> ProjectResult<ProblemDef> {
    let content = std::fs::read_to_string(path)?;
    let problem: ProblemDef = serde_json::from_str(&content)?;
    validate_problem(&problem)?;
    Ok(problem)
}

pub fn save_json(path: &Path, problem: &ProblemDef) -> ProjectResult<()> {
    validate_problem(problem)?;
    let content = serde_json::to_string_pretty(problem)?;
    std::fs::write(path, content)?;
    Ok(())
}

/// Load by extension: `.json` as JSON, anything else as YAML.
pub fn load(path: &Path) -> ProjectResult<ProblemDef> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => load_json(path),
        _ => load_yaml(path),
    }
}
