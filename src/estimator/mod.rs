pub mod fixed;
pub mod mock;
pub mod variant;

pub use fixed::FixedEstimator;
pub use mock::MockEstimator;
pub use variant::EstimatorVariant;
