use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors raised while reading or validating the task options.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Couldn't read configuration file '{0}'.\n{1}")]
    Read(Utf8PathBuf, std::io::Error),

    #[error("Couldn't parse configuration.\n{0}")]
    Parse(#[from] serde_json::Error),

    #[error("`src` option is required")]
    MissingSource,

    #[error("`src[{0}]` must have a `dest` option")]
    MissingDest(usize),

    #[error("`src[{0}]` must have a `files` option")]
    MissingFiles(usize),

    #[error("`src[{0}]` has an {1}")]
    Pattern(usize, PatternError),
}

/// A `files` entry that is neither a valid glob nor a valid expression.
#[derive(Debug, Error)]
pub enum PatternError {
    #[error("invalid glob pattern '{0}'.\n{1}")]
    Glob(String, glob::PatternError),

    #[error("invalid regular expression '{0}'.\n{1}")]
    Regex(String, regex::Error),
}

/// Errors raised while discovering source files.
#[derive(Debug, Error)]
pub enum FindError {
    #[error("The \"{0}\" directory does not exist.")]
    DirectoryNotFound(Utf8PathBuf),

    #[error("Couldn't compile glob pattern.\n{0}")]
    GlobPattern(#[from] glob::PatternError),

    #[error("Couldn't run glob.\n{0}")]
    Glob(#[from] glob::GlobError),

    #[error("Couldn't convert path to UTF-8.\n{0}")]
    PathFormat(#[from] camino::FromPathBufError),
}

/// Errors raised by the stylesheet preprocessor.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Couldn't read source file '{0}'.\n{1}")]
    Read(Utf8PathBuf, std::io::Error),

    #[error("Stylesheet compilation error: {0}")]
    Compile(#[from] Box<grass::Error>),

    #[error("Couldn't serialize source map.\n{0}")]
    SourceMap(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum TaskError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),

    #[error("Error while discovering files:\n{0}")]
    Discovery(#[from] FindError),

    #[error("Error while compiling '{0}':\n{1}")]
    Engine(Utf8PathBuf, EngineError),

    #[error("Couldn't write '{path}'.\n{source}")]
    Filesystem {
        path: Utf8PathBuf,
        source: std::io::Error,
    },
}
