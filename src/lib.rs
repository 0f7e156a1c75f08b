#![forbid(unsafe_code)]
//! Build task compiling sets of Sass/SCSS sources into single output files.
//!
//! The task is configured with a list of source sets. Each set names the
//! directories to search, the filename patterns to pick, and the destination
//! file. Every set is discovered, fed file by file into a fresh
//! [`Preprocessor`], and written to its destination.
//!
//! ```rust,ignore
//! use less_task::{LessOptions, LessTask, Task};
//!
//! let options = LessOptions::from_path("less.json")?;
//! LessTask::new(options).run()?;
//! ```

mod config;
mod engine;
mod error;
mod finder;
mod io;
mod sourcemap;
mod task;

pub use crate::config::{CompilerOptions, LessOptions, OneOrMany, SourceSet, SourceSetConfig};
pub use crate::engine::{Compiled, ExternalSourceMap, GrassPreprocessor, Preprocessor};
pub use crate::error::*;
pub use crate::finder::{NamePattern, find, find_files};
pub use crate::io::as_overhead;
pub use crate::sourcemap::SourceMap;
pub use crate::task::LessTask;

/// A unit of work a host runner can list and execute.
pub trait Task {
    /// Describe the task and the options it recognizes. Pure metadata, the
    /// options are not validated here.
    fn configure(&self) -> TaskSpec;

    fn run(&self) -> Result<(), TaskError>;
}

/// Registration metadata of a task, as exposed by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub options: Vec<OptionSpec>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionSpec {
    pub name: &'static str,
    pub required: bool,
    pub description: &'static str,
}

impl TaskSpec {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            description: "",
            options: Vec::new(),
        }
    }

    pub fn description(mut self, description: &'static str) -> Self {
        self.description = description;
        self
    }

    pub fn option(mut self, name: &'static str, required: bool, description: &'static str) -> Self {
        self.options.push(OptionSpec {
            name,
            required,
            description,
        });
        self
    }
}
