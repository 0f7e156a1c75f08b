use camino::{Utf8Path, Utf8PathBuf};
use glob::{MatchOptions, Pattern, glob_with};
use regex::Regex;

use crate::config::SourceSet;
use crate::error::{FindError, PatternError};

/// Filename matcher applied to the base name of every discovered file.
///
/// Delimited strings like `/^main\.scss$/`, `#^theme-#i` or `{^_}` are
/// regular expressions. The delimiter is any non-alphanumeric, non-space
/// character other than a backslash, or a bracket pair, and may be followed
/// by the flags `i`, `m`, `s`, `x` and `u`. Everything else is a shell glob
/// such as `*.scss`.
#[derive(Debug, Clone)]
pub enum NamePattern {
    Glob(Pattern),
    Regex(Regex),
}

impl NamePattern {
    pub fn parse(raw: &str) -> Result<Self, PatternError> {
        match delimited(raw) {
            Some((expr, flags)) => {
                let expr = match flags.is_empty() {
                    true => expr.to_string(),
                    false => format!("(?{flags}){expr}"),
                };

                Regex::new(&expr)
                    .map(NamePattern::Regex)
                    .map_err(|err| PatternError::Regex(raw.to_string(), err))
            }
            None => Pattern::new(raw)
                .map(NamePattern::Glob)
                .map_err(|err| PatternError::Glob(raw.to_string(), err)),
        }
    }

    pub fn matches(&self, name: &str) -> bool {
        match self {
            NamePattern::Glob(pattern) => pattern.matches_with(name, MATCH_OPTIONS),
            NamePattern::Regex(regex) => regex.is_match(name),
        }
    }
}

const FLAGS: &[char] = &['i', 'm', 's', 'x', 'u'];

/// Splits a delimited expression into its body and inline flag group.
fn delimited(raw: &str) -> Option<(&str, String)> {
    let mut end = raw.len();
    while end > 3 && raw[..end].ends_with(FLAGS) {
        end -= 1;
    }

    let (body, flags) = raw.split_at(end);
    let mut chars = body.chars();
    let open = chars.next()?;
    let close = chars.next_back()?;
    let expr = chars.as_str();

    let paired = matches!((open, close), ('{', '}') | ('(', ')') | ('[', ']') | ('<', '>'));
    let same = open == close && !open.is_alphanumeric() && !open.is_whitespace() && open != '\\';

    if expr.is_empty() || !(paired || same) {
        return None;
    }

    let flags: String = flags.chars().filter(|flag| *flag != 'u').collect();
    Some((expr, flags))
}

/// Leading dots must be matched literally, so hidden files and directories
/// stay out of the results unless a pattern names them.
const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: true,
};

/// Lists the regular files under `root` whose name matches `pattern`, in
/// name-sorted walk order. Only direct children are considered unless
/// `recursive` is set.
pub fn find(
    root: &Utf8Path,
    pattern: &NamePattern,
    recursive: bool,
) -> Result<Vec<Utf8PathBuf>, FindError> {
    if !root.is_dir() {
        return Err(FindError::DirectoryNotFound(root.to_owned()));
    }

    let base = Utf8PathBuf::from(Pattern::escape(root.as_str()));
    let expr = if recursive {
        base.join("**").join("*")
    } else {
        base.join("*")
    };

    let mut found = Vec::new();
    for entry in glob_with(expr.as_str(), MATCH_OPTIONS)? {
        let path = Utf8PathBuf::try_from(entry?)?;

        if !path.is_file() {
            continue;
        }

        if path.file_name().is_some_and(|name| pattern.matches(name)) {
            found.push(path);
        }
    }

    Ok(found)
}

/// Expands every path × pattern pair of a source set, keeping the pairs in
/// configuration order.
pub fn find_files(set: &SourceSet) -> Result<Vec<Utf8PathBuf>, FindError> {
    let mut files = Vec::new();

    for path in &set.paths {
        for pattern in &set.files {
            files.extend(find(path, pattern, set.recursive)?);
        }
    }

    Ok(files)
}
