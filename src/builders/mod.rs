//! Builder patterns for complex object construction.
//!
//! This module provides fluent builders for the migration system's two
//! configurable entry points:
//!
//! - **`OrchestratorBuilder`**: assembles an orchestrator with its adapter
//!   registry and flash-loan routes in one validated step
//! - **`PathFinderBuilder`**: assembles a path finder from tier and
//!   stable-pair settings

pub mod finder;
pub mod orchestrator;

pub use finder::PathFinderBuilder;
pub use orchestrator::OrchestratorBuilder;
