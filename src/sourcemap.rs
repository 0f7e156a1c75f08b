use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use camino::{Utf8Component, Utf8Path};
use serde::Serialize;

/// Version 3 source map. The compiler exposes no position data, so the map
/// lists its sources with their content and leaves `mappings` empty.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceMap {
    version: u8,
    file: String,
    sources: Vec<String>,
    sources_content: Vec<String>,
    names: Vec<String>,
    mappings: String,
}

impl SourceMap {
    pub fn new<'a>(file: &str, sources: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let (sources, sources_content) = sources
            .into_iter()
            .map(|(path, content)| (path.to_string(), content.to_string()))
            .unzip();

        Self {
            version: 3,
            file: file.to_string(),
            sources,
            sources_content,
            names: Vec::new(),
            mappings: String::new(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn to_data_url(&self) -> serde_json::Result<String> {
        let json = self.to_json()?;
        Ok(format!(
            "data:application/json;base64,{}",
            STANDARD.encode(json)
        ))
    }
}

/// The trailing comment pointing a stylesheet at its source map.
pub fn mapping_comment(url: &str) -> String {
    format!("/*# sourceMappingURL={url} */")
}

/// URL of `target` as seen from a stylesheet in `from_dir`. Both paths must
/// share the same base; when only one is absolute `target` is used as is.
pub fn relative_url(target: &Utf8Path, from_dir: &Utf8Path) -> String {
    if target.is_absolute() != from_dir.is_absolute() {
        return target.as_str().replace('\\', "/");
    }

    let parts = |path: &Utf8Path| {
        path.components()
            .filter(|part| *part != Utf8Component::CurDir)
            .map(|part| part.as_str().to_string())
            .collect::<Vec<_>>()
    };
    let target = parts(target);
    let from_dir = parts(from_dir);

    let common = target
        .iter()
        .zip(&from_dir)
        .take_while(|(a, b)| a == b)
        .count();

    let mut url: Vec<&str> = vec![".."; from_dir.len() - common];
    url.extend(target[common..].iter().map(String::as_str));
    url.join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_json() {
        let map = SourceMap::new("app.css", [("a.scss", "a {}"), ("b.scss", "b {}")]);
        assert_eq!(
            map.to_json().unwrap(),
            r#"{"version":3,"file":"app.css","sources":["a.scss","b.scss"],"sourcesContent":["a {}","b {}"],"names":[],"mappings":""}"#
        );
    }

    #[test]
    fn test_to_data_url() {
        let map = SourceMap::new("app.css", []);
        let url = map.to_data_url().unwrap();

        let encoded = url
            .strip_prefix("data:application/json;base64,")
            .unwrap();
        let decoded = STANDARD.decode(encoded).unwrap();
        assert_eq!(decoded, map.to_json().unwrap().into_bytes());
    }

    #[test]
    fn test_relative_url() {
        assert_eq!(
            relative_url(
                Utf8Path::new("./build/maps/app.css.map"),
                Utf8Path::new("./build")
            ),
            "maps/app.css.map"
        );
        assert_eq!(
            relative_url(
                Utf8Path::new("/work/maps/app.css.map"),
                Utf8Path::new("/work/build/css")
            ),
            "../../maps/app.css.map"
        );
        assert_eq!(
            relative_url(Utf8Path::new("app.css.map"), Utf8Path::new("")),
            "app.css.map"
        );
        assert_eq!(
            relative_url(Utf8Path::new("/abs/app.css.map"), Utf8Path::new("build")),
            "/abs/app.css.map"
        );
    }

    #[test]
    fn test_mapping_comment() {
        assert_eq!(
            mapping_comment("/app.css.map"),
            "/*# sourceMappingURL=/app.css.map */"
        );
    }
}
