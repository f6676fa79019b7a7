// ABOUTME: Command implementations for the dump splitter
// ABOUTME: Exports the split entry point shared by the binary and tests

pub mod split;

pub use split::split;
