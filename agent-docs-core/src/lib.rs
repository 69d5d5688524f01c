#![doc = "agent-docs-core: core logic library for agent-docs."]

//! This crate turns a cached documentation tree for a framework into a compact,
//! pipe-delimited index meant to be spliced into an agent manifest such as
//! `AGENTS.md`. All logic lives here; the `agent-docs` crate only adds CLI glue.
//!
//! # Pipeline
//! [`tree`] → [`prioritize`] → [`format`] → [`enforce`], wired together in
//! [`compress`]. Collaborators (docs fetching, release-note knowledge) sit behind
//! the traits in [`contract`].

pub mod catalog;
pub mod compress;
pub mod config;
pub mod contract;
pub mod enforce;
pub mod fetch;
pub mod format;
pub mod inject;
pub mod prioritize;
pub mod registry;
pub mod tree;
