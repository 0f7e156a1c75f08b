use std::fmt::Display;
use std::fs;
use std::time::Instant;

use camino::Utf8Path;
use console::Style;

use crate::error::TaskError;

const ANSI_BLUE: Style = Style::new().blue();

pub fn as_overhead(s: Instant) -> impl Display {
    let e = Instant::now();
    let f = format!("(+{}ms)", e.duration_since(s).as_millis());
    ANSI_BLUE.apply_to(f)
}

/// Write `contents` to `path`, creating missing parent directories and
/// replacing any existing file.
pub fn write_file(path: &Utf8Path, contents: &str) -> Result<(), TaskError> {
    let fail = |source| TaskError::Filesystem {
        path: path.to_owned(),
        source,
    };

    if let Some(dir) = path.parent().filter(|dir| !dir.as_str().is_empty()) {
        fs::create_dir_all(dir).map_err(fail)?;
    }

    fs::write(path, contents).map_err(fail)
}
