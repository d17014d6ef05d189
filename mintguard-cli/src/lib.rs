//! Command-line front end for the mintguard core.
//!
//! Provides:
//! - clap argument definitions and catalog help
//! - conversion of flags and prompt answers into raw guard input
//! - candy-guard wire serialization
//! - the compile pipeline and transaction-builder hand-off
//! - the interactive wizard
//!
//! The `mintguard` binary wires these together.

pub mod cli;
pub mod parse;
pub mod serialize;
pub mod submit;
pub mod wizard;
