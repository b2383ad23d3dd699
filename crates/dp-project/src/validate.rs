//! Structural checks on problem files, independent of any solver schema.

use crate::LATEST_VERSION;
use crate::schema::ProblemDef;
use std::collections::HashSet;

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("Duplicate solver name: {name}")]
    DuplicateName { name: String },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

pub fn validate_problem(problem: &ProblemDef) -> Result<(), ValidationError> {
    if problem.version == 0 || problem.version > LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: problem.version,
        });
    }

    let mut names = HashSet::new();
    for (i, solver) in problem.solvers.iter().enumerate() {
        if solver.solver_type.trim().is_empty() {
            return Err(ValidationError::InvalidValue {
                field: format!("solvers[{i}].type"),
                value: solver.solver_type.clone(),
                reason: "solver type must not be empty".to_string(),
            });
        }

        if let Some(value) = solver.properties.get("name") {
            let Some(name) = value.as_str() else {
                return Err(ValidationError::InvalidValue {
                    field: format!("solvers[{i}].name"),
                    value: format!("{value:?}"),
                    reason: "name must be a string".to_string(),
                });
            };
            if !names.insert(name) {
                return Err(ValidationError::DuplicateName {
                    name: name.to_string(),
                });
            }
        }
    }

    Ok(())
}
