use std::fs;

use camino::{Utf8Path, Utf8PathBuf};
use serde::Deserialize;

use crate::error::ConfigError;
use crate::finder::NamePattern;

/// A configuration value accepted either as a single item or as a list.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::One(item) => vec![item],
            OneOrMany::Many(items) => items,
        }
    }
}

impl<T> From<T> for OneOrMany<T> {
    fn from(item: T) -> Self {
        OneOrMany::One(item)
    }
}

/// One entry of the `src` option, as written in the configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SourceSetConfig {
    /// Directories to search, the working directory when absent.
    #[serde(default)]
    pub path: Option<OneOrMany<Utf8PathBuf>>,
    /// Filename patterns, required.
    #[serde(default)]
    pub files: Option<OneOrMany<String>>,
    /// Search subdirectories too.
    #[serde(default)]
    pub recursive: Option<bool>,
    /// Output file, required.
    #[serde(default)]
    pub dest: Option<Utf8PathBuf>,
}

/// A validated source set with every path resolved against the working
/// directory.
#[derive(Debug, Clone)]
pub struct SourceSet {
    pub paths: Vec<Utf8PathBuf>,
    pub files: Vec<NamePattern>,
    pub recursive: bool,
    pub dest: Utf8PathBuf,
}

impl SourceSetConfig {
    fn validate(&self, index: usize, working_dir: &Utf8Path) -> Result<SourceSet, ConfigError> {
        let dest = self
            .dest
            .as_ref()
            .ok_or(ConfigError::MissingDest(index))?;

        let files = self
            .files
            .clone()
            .ok_or(ConfigError::MissingFiles(index))?
            .into_vec()
            .iter()
            .map(|raw| NamePattern::parse(raw))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|err| ConfigError::Pattern(index, err))?;

        let paths = match &self.path {
            Some(path) => path
                .clone()
                .into_vec()
                .iter()
                .map(|path| working_dir.join(path))
                .collect(),
            None => vec![working_dir.to_owned()],
        };

        Ok(SourceSet {
            paths,
            files,
            recursive: self.recursive.unwrap_or(false),
            dest: working_dir.join(dest),
        })
    }
}

/// Options of the `less` task.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessOptions {
    #[serde(default)]
    pub src: Option<Vec<SourceSetConfig>>,
    #[serde(default)]
    pub compress: Option<bool>,
    #[serde(default)]
    pub source_map: Option<bool>,
    #[serde(default)]
    pub source_map_write_to: Option<Utf8PathBuf>,
    #[serde(default)]
    pub source_map_url: Option<String>,
}

/// Flags handed to the preprocessor. `None` leaves the engine default in
/// place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompilerOptions {
    pub compress: Option<bool>,
    pub source_map: Option<bool>,
    pub source_map_write_to: Option<Utf8PathBuf>,
    pub source_map_url: Option<String>,
}

impl LessOptions {
    pub fn from_path(path: impl AsRef<Utf8Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path) //
            .map_err(|err| ConfigError::Read(path.to_owned(), err))?;

        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Checks every source set before anything touches the filesystem, so a
    /// broken entry never leaves partial output behind.
    pub fn validate(&self, working_dir: &Utf8Path) -> Result<Vec<SourceSet>, ConfigError> {
        self.src
            .as_ref()
            .ok_or(ConfigError::MissingSource)?
            .iter()
            .enumerate()
            .map(|(index, set)| set.validate(index, working_dir))
            .collect()
    }

    pub fn compiler_options(&self) -> CompilerOptions {
        let source_map = self.source_map.unwrap_or(false);

        if !source_map && self.source_map_write_to.is_some() {
            tracing::warn!("`sourceMapWriteTo` has no effect without `sourceMap`");
        }

        if !source_map && self.source_map_url.is_some() {
            tracing::warn!("`sourceMapUrl` has no effect without `sourceMap`");
        }

        CompilerOptions {
            compress: self.compress.filter(|compress| *compress),
            source_map: self.source_map,
            source_map_write_to: self.source_map_write_to.clone(),
            source_map_url: self.source_map_url.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_one_or_many() {
        let options = LessOptions::from_json(
            r#"{
                "src": [
                    { "path": "styles", "files": "*.less", "dest": "out/a.css" },
                    { "path": ["a", "b"], "files": ["*.less", "*.css"], "recursive": true, "dest": "out/b.css" }
                ],
                "compress": true,
                "sourceMap": true,
                "sourceMapWriteTo": "out/map.json",
                "sourceMapUrl": "/map.json"
            }"#,
        )
        .unwrap();

        let src = options.src.as_ref().unwrap();
        assert_eq!(src[0].path, Some(OneOrMany::One("styles".into())));
        assert_eq!(src[0].files, Some(OneOrMany::One("*.less".into())));
        assert_eq!(
            src[1].path,
            Some(OneOrMany::Many(vec!["a".into(), "b".into()]))
        );
        assert_eq!(src[1].recursive, Some(true));
        assert_eq!(options.source_map_write_to, Some("out/map.json".into()));
        assert_eq!(options.source_map_url.as_deref(), Some("/map.json"));
    }

    #[test]
    fn test_validate_resolves_paths() {
        let options = LessOptions::from_json(
            r#"{ "src": [{ "path": ["a", "/abs"], "files": "*.less", "dest": "out/app.css" }] }"#,
        )
        .unwrap();

        let sets = options.validate(Utf8Path::new("/work")).unwrap();
        assert_eq!(sets.len(), 1);
        assert_eq!(
            sets[0].paths,
            [Utf8PathBuf::from("/work/a"), Utf8PathBuf::from("/abs")]
        );
        assert_eq!(sets[0].dest, Utf8PathBuf::from("/work/out/app.css"));
        assert!(!sets[0].recursive);
    }

    #[test]
    fn test_validate_default_path() {
        let options =
            LessOptions::from_json(r#"{ "src": [{ "files": "*.less", "dest": "app.css" }] }"#)
                .unwrap();

        let sets = options.validate(Utf8Path::new("/work")).unwrap();
        assert_eq!(sets[0].paths, [Utf8PathBuf::from("/work")]);
    }

    #[test]
    fn test_validate_missing_keys() {
        let options = LessOptions::from_json(
            r#"{ "src": [{ "files": "*.less", "dest": "a.css" }, { "files": "*.less" }] }"#,
        )
        .unwrap();
        assert!(matches!(
            options.validate(Utf8Path::new(".")),
            Err(ConfigError::MissingDest(1))
        ));

        let options = LessOptions::from_json(r#"{ "src": [{ "dest": "a.css" }] }"#).unwrap();
        assert!(matches!(
            options.validate(Utf8Path::new(".")),
            Err(ConfigError::MissingFiles(0))
        ));

        // `dest` is reported first when both are missing
        let options = LessOptions::from_json(r#"{ "src": [{}] }"#).unwrap();
        assert!(matches!(
            options.validate(Utf8Path::new(".")),
            Err(ConfigError::MissingDest(0))
        ));

        let options = LessOptions::from_json(r#"{}"#).unwrap();
        assert!(matches!(
            options.validate(Utf8Path::new(".")),
            Err(ConfigError::MissingSource)
        ));
    }

    #[test]
    fn test_validate_bad_pattern() {
        let options =
            LessOptions::from_json(r#"{ "src": [{ "files": "[", "dest": "a.css" }] }"#).unwrap();

        assert!(matches!(
            options.validate(Utf8Path::new(".")),
            Err(ConfigError::Pattern(0, _))
        ));
    }

    #[test]
    fn test_compiler_options_only_present() {
        let options = LessOptions::default();
        assert_eq!(options.compiler_options(), CompilerOptions::default());

        let options = LessOptions {
            compress: Some(true),
            source_map: Some(false),
            ..Default::default()
        };
        assert_eq!(
            options.compiler_options(),
            CompilerOptions {
                compress: Some(true),
                source_map: Some(false),
                ..Default::default()
            }
        );

        // An explicit `false` is left to the engine default
        let options = LessOptions {
            compress: Some(false),
            ..Default::default()
        };
        assert_eq!(options.compiler_options().compress, None);
    }

    #[test]
    fn test_malformed_document() {
        assert!(matches!(
            LessOptions::from_json("{ not json"),
            Err(ConfigError::Parse(_))
        ));
    }
}
