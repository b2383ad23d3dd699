//! Scene interface queried by dynamics solvers.

/// The parts of a kinematic scene a dynamics solver checks itself against.
pub trait Scene {
    /// Number of joints driven by the planner.
    fn num_controlled_joints(&self) -> usize;
}

/// A scene described only by its controlled joint count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JointCountScene {
    pub num_controlled_joints: usize,
}

impl JointCountScene {
    pub fn new(num_controlled_joints: usize) -> Self {
        Self {
            num_controlled_joints,
        }
    }
}

impl Scene for JointCountScene {
    fn num_controlled_joints(&self) -> usize {
        self.num_controlled_joints
    }
}
