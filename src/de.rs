//! Differential-expression results and significance calls.
//!
//! A DE result table is produced upstream by an opaque statistical tool; this
//! module only reads the three values it needs per gene (identifier, effect
//! size, and adjusted significance) and classifies genes against explicit
//! [`Thresholds`].

pub mod columns;
pub mod gene;
pub mod loader;
pub mod threshold;

pub use columns::Columns;
pub use gene::DeGene;
pub use loader::DeSet;
pub use loader::Loader;
pub use threshold::SignificantSet;
pub use threshold::Thresholds;
