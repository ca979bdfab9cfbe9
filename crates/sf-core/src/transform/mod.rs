//! Pure row transforms: projection, deduplication, temporal decomposition,
//! surrogate keys and the fact join.
//!
//! Nothing here performs I/O or holds state between calls; the pipeline
//! module wires these into table builds.

pub mod dedup;
pub mod join;
pub mod project;
pub mod surrogate;
pub mod temporal;

pub use dedup::dedup;
pub use join::{left_outer_join, JoinStats, Joined};
pub use project::{project, project_all, project_as};
pub use surrogate::{assign_ids, assign_ids_by_key};
pub use temporal::{decompose, TemporalRecord};
