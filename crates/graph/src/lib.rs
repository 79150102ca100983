//! Transform Graph: per-object local transforms and parent links.
//!
//! # Invariants
//! - The parent relation is acyclic; a rejected re-parent leaves the graph unchanged.
//! - World transforms are composed from the ancestor chain on every query, so
//!   moving a parent moves all descendants without touching them.
//! - Removing a node detaches its children and keeps their world placement.
//! - All mutations are recorded in an event log, drained once per step.

pub mod graph;

pub use graph::{GraphError, GraphEvent, TransformGraph, TransformNode};
