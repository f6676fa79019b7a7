// ABOUTME: Library crate for mysql-dump-splitter
// ABOUTME: Exports the segmentation engine for use in the binary and tests

pub mod commands;
pub mod config;
pub mod filters;
pub mod output;
pub mod scanner;
