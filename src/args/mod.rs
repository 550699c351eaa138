// src/args/mod.rs

//! Scanner command-line assembly.
//!
//! - [`tokenize`] splits the property blob into fragments.
//! - [`macros`] expands `$VAR` references against the run's environment.
//! - [`assembler`] escapes fragments and adds the mandatory arguments.

pub mod assembler;
pub mod macros;
pub mod tokenize;

pub use assembler::{
    ArgumentList, LOGGING_LEVEL_KEY, MandatoryExtras, PLATFORM_VERSION_KEY, PLUGIN_VERSION_KEY,
    assemble,
};
pub use macros::{expand_fragment, replace_macros};
pub use tokenize::{split_command_line, split_fragments};
