//! Filter implementations for the refill pipeline.
//!
//! This module contains all the concrete filter implementations
//! that can be composed into a FilterPipeline.

pub mod already_decided;
pub mod external_posting;
pub mod skill_overlap;

// Re-export for convenience
pub use already_decided::AlreadyDecidedFilter;
pub use external_posting::ExternalPostingFilter;
pub use skill_overlap::SkillOverlapFilter;
