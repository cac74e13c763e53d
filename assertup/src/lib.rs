//! Core library for the `assertup` assertion-rewriting tool.
//!
//! `assertup` rewrites redundant or deprecated `unittest` assertion calls in
//! Python test sources into their most specific equivalent, leaving every
//! other byte of the source untouched, including comments and line layout.

#![allow(clippy::items_after_statements)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

/// Module containing the static rewrite rule tables.
pub mod rules;

/// Module containing the call-expression pattern matcher.
/// This is responsible for traversing the Python AST and proposing rewrites.
pub mod matcher;

/// Module defining the rewrite data structure and replacement construction.
pub mod rewrite;

/// Module for recovering and remapping trailing argument comments.
pub mod comments;

/// Module for rendering replacement calls and splicing them into the source.
pub mod patcher;

/// Module driving whole-source passes and the fixpoint loop.
/// This is the public engine API.
pub mod refactor;

/// Module containing utility functions.
/// This includes helper functions used across the application.
pub mod utils;

/// Module defining the command-line interface arguments and structs.
pub mod cli;

/// Module for handling CLI execution: file discovery, per-file refactoring,
/// and reporting.
pub mod commands;

/// Module for loading configuration.
pub mod config;

pub use refactor::{
    rewrite_source, rewrite_to_fixpoint, Blacklist, RefactorError, RewriteRecord,
    DEFAULT_MAX_PASSES,
};
