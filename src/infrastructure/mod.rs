//! Infrastructure layer for filesystem and environment interactions.

pub mod paths;

pub use paths::{config_file, expand_tilde, get_data_dir, token_file, trace_file};
