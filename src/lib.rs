//! # exploded-assembly
//!
//! An engine-agnostic layout engine that turns a multi-part model into the
//! images of a step-by-step assembly manual: an overview, a parts inventory
//! grid, one exploded view per assembly step with arrows showing where each
//! new part goes, and the finished assembly.
//!
//! The heavy lifting is pure geometry. [`AssemblyPlanner`] partitions the part
//! list into steps and produces a frozen [`Snapshot`] per image (positions,
//! visibility, [`ArrowIndicator`]s and a [`FramingResult`]). A host engine
//! only has to implement [`Scene`]; [`ManualGenerator`] drives it and writes
//! the [`Manifest`] consumed by document generation.

pub mod arrow;
pub mod camera;
pub mod classify;
pub mod config;
pub mod error;
pub mod explode;
pub mod geometry;
pub mod layout;
pub mod manifest;
pub mod part;
pub mod scene;

pub use arrow::*;
pub use camera::*;
pub use classify::*;
pub use config::*;
pub use error::*;
pub use explode::*;
pub use geometry::*;
pub use layout::*;
pub use manifest::*;
pub use part::*;
pub use scene::*;
