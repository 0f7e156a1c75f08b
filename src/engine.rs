//! Stylesheet preprocessing.
//!
//! A [`Preprocessor`] takes source files one at a time and accumulates them,
//! later files seeing the variables and mixins of earlier ones. Calling
//! [`Preprocessor::finish`] consumes the engine, so every destination starts
//! from a fresh instance.

use std::fs;

use camino::{Utf8Path, Utf8PathBuf};

use crate::config::CompilerOptions;
use crate::error::EngineError;
use crate::sourcemap::{SourceMap, mapping_comment, relative_url};

pub trait Preprocessor {
    /// Feed the next source file.
    fn parse_file(&mut self, path: &Utf8Path) -> Result<(), EngineError>;

    /// Compile everything fed so far into the stylesheet for `dest`.
    fn finish(self, dest: &Utf8Path) -> Result<Compiled, EngineError>;
}

/// Output of a single compilation.
#[derive(Debug, Clone)]
pub struct Compiled {
    pub css: String,
    /// Source map to be written next to the stylesheet, when one was
    /// requested with an external location.
    pub source_map: Option<ExternalSourceMap>,
}

#[derive(Debug, Clone)]
pub struct ExternalSourceMap {
    pub path: Utf8PathBuf,
    pub json: String,
}

struct Source {
    path: Utf8PathBuf,
    text: String,
}

/// [`Preprocessor`] backed by the `grass` Sass compiler.
///
/// The entry stylesheet imports every SCSS source in turn, so each file keeps
/// its own `@use` rules at its top and resolves relative imports next to
/// itself. Sources in other formats are inlined verbatim, as `@import` of a
/// `.css` file would be left for the browser.
pub struct GrassPreprocessor {
    options: CompilerOptions,
    entry: String,
    sources: Vec<Source>,
}

impl GrassPreprocessor {
    pub fn new(options: &CompilerOptions) -> Self {
        Self {
            options: options.clone(),
            entry: String::new(),
            sources: Vec::new(),
        }
    }

    fn compress(&self) -> bool {
        self.options.compress.unwrap_or(false)
    }

    fn source_map(&self, dest: &Utf8Path) -> SourceMap {
        SourceMap::new(
            dest.file_name().unwrap_or(dest.as_str()),
            self.sources
                .iter()
                .map(|source| (source.path.as_str(), source.text.as_str())),
        )
    }
}

fn is_scss(path: &Utf8Path) -> bool {
    path.extension() == Some("scss")
}

fn import_rule(path: &Utf8Path) -> String {
    let quoted = path.as_str().replace('\\', "\\\\").replace('"', "\\\"");
    format!("@import \"{quoted}\";\n")
}

impl Preprocessor for GrassPreprocessor {
    fn parse_file(&mut self, path: &Utf8Path) -> Result<(), EngineError> {
        let read = |err| EngineError::Read(path.to_owned(), err);

        let text = fs::read_to_string(path).map_err(read)?;

        if is_scss(path) {
            let absolute = path.canonicalize_utf8().map_err(read)?;
            self.entry.push_str(&import_rule(&absolute));
        } else {
            if !self.entry.is_empty() && !self.entry.ends_with('\n') {
                self.entry.push('\n');
            }
            self.entry.push_str(&text);
        }

        self.sources.push(Source {
            path: path.to_owned(),
            text,
        });

        Ok(())
    }

    fn finish(mut self, dest: &Utf8Path) -> Result<Compiled, EngineError> {
        let style = match self.compress() {
            true => grass::OutputStyle::Compressed,
            false => grass::OutputStyle::Expanded,
        };
        let opts = grass::Options::default().style(style);

        let input = std::mem::take(&mut self.entry);
        let mut css = grass::from_string(input, &opts)?;

        if !self.options.source_map.unwrap_or(false) {
            return Ok(Compiled {
                css,
                source_map: None,
            });
        }

        let map = self.source_map(dest);
        let (url, source_map) = match &self.options.source_map_write_to {
            Some(path) => {
                let url = match &self.options.source_map_url {
                    Some(url) => url.clone(),
                    None => relative_url(path, dest.parent().unwrap_or(Utf8Path::new(""))),
                };
                let external = ExternalSourceMap {
                    path: path.clone(),
                    json: map.to_json()?,
                };
                (url, Some(external))
            }
            None => match &self.options.source_map_url {
                Some(url) => (url.clone(), None),
                None => (map.to_data_url()?, None),
            },
        };

        if !self.compress() && !css.is_empty() && !css.ends_with('\n') {
            css.push('\n');
        }
        css.push_str(&mapping_comment(&url));

        Ok(Compiled { css, source_map })
    }
}
