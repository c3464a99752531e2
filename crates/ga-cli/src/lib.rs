//! Play-history awards CLI.
//!
//! Thin shell over [`ga_core`]: loads the library JSON leniently, builds
//! the four award tiers for a reference date, and renders them as text or
//! JSON. The optional `--pick` step delegates deferred categories to
//! [`ga_llm`].

pub mod cli;
pub mod commands;
pub mod config;
pub mod library;
