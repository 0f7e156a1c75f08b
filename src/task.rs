use std::time::Instant;

use camino::{Utf8Path, Utf8PathBuf};

use crate::config::{CompilerOptions, LessOptions};
use crate::engine::{GrassPreprocessor, Preprocessor};
use crate::error::TaskError;
use crate::finder::find_files;
use crate::io::{as_overhead, write_file};
use crate::{Task, TaskSpec};

/// Compiles every configured source set into its destination stylesheet.
///
/// Relative paths in the options resolve against the working directory,
/// which is the process working directory unless set with
/// [`LessTask::with_working_dir`].
#[derive(Debug, Clone)]
pub struct LessTask {
    options: LessOptions,
    working_dir: Utf8PathBuf,
}

impl LessTask {
    pub fn new(options: LessOptions) -> Self {
        Self {
            options,
            working_dir: Utf8PathBuf::from("."),
        }
    }

    pub fn with_working_dir(mut self, working_dir: impl Into<Utf8PathBuf>) -> Self {
        self.working_dir = working_dir.into();
        self
    }

    pub fn options(&self) -> &LessOptions {
        &self.options
    }

    /// Run the task with a custom engine. `engine` is called once per source
    /// set, so no state is shared between destinations.
    pub fn run_with<P, F>(&self, engine: F) -> Result<(), TaskError>
    where
        P: Preprocessor,
        F: Fn(&CompilerOptions) -> P,
    {
        let s = Instant::now();

        let sets = self.options.validate(&self.working_dir)?;
        let mut compiler = self.options.compiler_options();
        compiler.source_map_write_to = compiler
            .source_map_write_to
            .map(|path| self.working_dir.join(path));

        for set in &sets {
            let span = tracing::info_span!("less", dest = %set.dest);
            let _enter = span.enter();

            let files = find_files(set)?;
            self.compile_files(engine(&compiler), &files, &set.dest)?;
        }

        tracing::info!("Compiled {} stylesheets {}", sets.len(), as_overhead(s));

        Ok(())
    }

    fn compile_files<P>(
        &self,
        mut engine: P,
        files: &[Utf8PathBuf],
        dest: &Utf8Path,
    ) -> Result<(), TaskError>
    where
        P: Preprocessor,
    {
        for file in files {
            tracing::debug!("Compiling {file}");
            engine
                .parse_file(file)
                .map_err(|err| TaskError::Engine(dest.to_owned(), err))?;
        }

        let compiled = engine
            .finish(dest)
            .map_err(|err| TaskError::Engine(dest.to_owned(), err))?;

        tracing::debug!("Writing to {dest}");
        write_file(dest, &compiled.css)?;

        if let Some(map) = compiled.source_map {
            tracing::debug!("Writing source map to {}", map.path);
            write_file(&map.path, &map.json)?;
        }

        Ok(())
    }
}

impl Task for LessTask {
    fn configure(&self) -> TaskSpec {
        TaskSpec::new("less")
            .description("Compiles the `src` Sass/SCSS files")
            .option("src", true, "Source sets to compile")
            .option("compress", false, "Remove whitespace and comments")
            .option("sourceMap", false, "Create a source map")
            .option(
                "sourceMapWriteTo",
                false,
                "Where to write the source map. If unset, it is inlined in the compiled file.",
            )
            .option("sourceMapUrl", false, "Url to use for the source map")
    }

    fn run(&self) -> Result<(), TaskError> {
        self.run_with(GrassPreprocessor::new)
    }
}
