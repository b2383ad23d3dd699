use dp_dynamics::{CARTPOLE_TYPE_NAME, DynamicsSolver, Integrator, SolverRegistry};
use std::path::{Path, PathBuf};

fn demo(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../../demos/problems")
        .join(name)
}

fn build(def: &dp_project::SolverDef) -> Box<dyn DynamicsSolver> {
    let registry = SolverRegistry::with_defaults();
    let schema = registry.schema(&def.solver_type).unwrap();
    let container = def.to_container(schema).unwrap();
    registry.create(&def.solver_type, container).unwrap()
}

#[test]
fn yaml_demo_loads_and_instantiates() {
    let problem = dp_project::load_yaml(&demo("cartpole_swing.yaml")).unwrap();
    assert_eq!(problem.solvers.len(), 2);

    let swing = build(problem.solver("swing").unwrap());
    assert_eq!(swing.type_name(), CARTPOLE_TYPE_NAME);
    assert_eq!(swing.integrator(), Integrator::RK4);
    assert_eq!(swing.dt(), 0.01);

    let coarse = build(problem.solver("coarse").unwrap());
    assert_eq!(coarse.integrator(), Integrator::SymplecticEuler);
    assert_eq!(coarse.dt(), 0.05);
}

#[test]
fn json_demo_loads_and_instantiates() {
    let problem = dp_project::load(&demo("cartpole_swing.json")).unwrap();
    let solver = build(&problem.solvers[0]);
    assert_eq!(solver.name(), "swing");
}
