pub mod container;
pub mod memory;

pub use container::{ContainerStat, SkippedLine, Snapshot};
pub use memory::{to_megabytes, UnitError};
