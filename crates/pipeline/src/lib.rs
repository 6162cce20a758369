//! Client-side filtering of refill batches.
//!
//! This crate provides:
//! - Filter trait and implementations for candidate filtering
//! - FilterPipeline for composing filters
//!
//! ## Architecture
//! A refill batch passes through the pipeline after it has been parsed and
//! before it is appended to the queue:
//! 1. Already-decided candidates are dropped (they must never be shown twice)
//! 2. The user's active filters are applied (external postings, skill overlap)
//!
//! Match scores are display-only and never filter a batch; the score floor in
//! `ActiveFilters` is for the feed service to honour.
//!
//! ## Example Usage
//! ```ignore
//! use pipeline::FilterPipeline;
//! use pipeline::filters::*;
//!
//! let pipeline = FilterPipeline::new()
//!     .add_filter(AlreadyDecidedFilter)
//!     .add_filter(ExternalPostingFilter);
//!
//! let kept = pipeline.apply(batch.items, &snapshot)?;
//! ```

pub mod traits;
pub mod filters;
pub mod filter_pipeline;

// Re-export main types
pub use traits::Filter;
pub use filter_pipeline::FilterPipeline;
