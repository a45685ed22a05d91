//! Runway management
//!
//! - `registry`: owns the runways in registration order
//! - `allocator`: eligibility queries, wear, repair and repair pricing
//!
//! The allocator holds no runway state of its own; it reads and mutates the
//! registry it is handed.

pub mod allocator;
pub mod registry;

pub use allocator::{RunwayAllocator, WearConfig, WearOutcome};
pub use registry::RunwayRegistry;
