pub mod scalar;
pub mod ease;
pub mod hash;
pub mod time;
pub mod schedule;

pub use scalar::Scalar;
pub use ease::{ease_factor, approach};
pub use hash::{StepHasher, hash_scalar, hash_vec3};
pub use time::TickPolicy;
pub use schedule::{StepStage, schedule_digest};
