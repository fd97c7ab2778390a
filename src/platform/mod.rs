//! Platform abstraction layer
//!
//! Browser events arrive between frames; this layer buffers them into the
//! per-tick input the simulation consumes.

pub mod pointer;
pub mod step;

pub use pointer::PointerTracker;
pub use step::FixedStep;
