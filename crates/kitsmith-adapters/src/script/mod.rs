//! Post-generation script adapters.

mod shell;

pub use shell::ShellScriptRunner;
