/// Simulation scalar. Every angle, length and duration in the workspace uses it.
pub type Scalar = f32;
