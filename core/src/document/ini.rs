use std::path::{Path, PathBuf};

use indexmap::IndexMap;

use super::{ConfigDocument, DocumentFile, KeyPath};

/// Flat `key=value` document grouped in `[section]`s.
///
/// Keys before the first header live in the root section (`""`), which is
/// written first and without a header. Comment lines are not preserved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IniDocument {
    path: PathBuf,
    sections: IndexMap<String, IndexMap<String, String>>,
}

impl IniDocument {
    /// Empty document that will save to `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            sections: IndexMap::new(),
        }
    }

    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.sections
            .get(section)
            .and_then(|keys| keys.get(key))
            .map(String::as_str)
    }

    pub fn set(&mut self, section: &str, key: &str, value: &str) {
        // IndexMap::insert keeps the position of an existing key.
        self.sections
            .entry(section.to_string())
            .or_default()
            .insert(key.to_string(), value.to_string());
    }

    pub fn section_names(&self) -> impl Iterator<Item = &str> {
        self.sections.keys().map(String::as_str)
    }

    fn section_name(path: &KeyPath) -> String {
        path.scope.join("/")
    }
}

impl ConfigDocument for IniDocument {
    fn value(&self, path: &KeyPath) -> Option<&str> {
        self.get(&Self::section_name(path), &path.key)
    }

    fn set_value(&mut self, path: &KeyPath, value: &str) {
        self.set(&Self::section_name(path), &path.key, value);
    }
}

impl DocumentFile for IniDocument {
    fn parse(path: PathBuf, text: &str) -> Self {
        let mut doc = Self::new(path);
        let mut current = String::new();

        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with(';') || line.starts_with('#') {
                continue;
            }
            if let Some(name) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
                current = name.trim().to_string();
                doc.sections.entry(current.clone()).or_default();
                continue;
            }
            if let Some((key, value)) = line.split_once('=') {
                let key = key.trim();
                if !key.is_empty() {
                    doc.set(&current, key, value.trim());
                }
            }
        }

        doc
    }

    fn path(&self) -> &Path {
        &self.path
    }

    fn to_text(&self) -> String {
        let mut out = String::new();

        if let Some(root) = self.sections.get("") {
            for (key, value) in root {
                out.push_str(&format!("{}={}\n", key, value));
            }
        }

        for (name, keys) in self.sections.iter().filter(|(name, _)| !name.is_empty()) {
            if !out.is_empty() {
                out.push('\n');
            }
            out.push_str(&format!("[{}]\n", name));
            for (key, value) in keys {
                out.push_str(&format!("{}={}\n", key, value));
            }
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GUI_SETTINGS: &str = "\
[main_window]
geometry=@ByteArray(abc)
confirmationBoxExitGame=true

; last used paths
[Meta]
currentStylesheet=Default
";

    fn parse(text: &str) -> IniDocument {
        IniDocument::parse(PathBuf::from("test.ini"), text)
    }

    #[test]
    fn test_parse_sections_and_keys() {
        let doc = parse(GUI_SETTINGS);
        assert_eq!(doc.get("main_window", "geometry"), Some("@ByteArray(abc)"));
        assert_eq!(doc.get("main_window", "confirmationBoxExitGame"), Some("true"));
        assert_eq!(doc.get("Meta", "currentStylesheet"), Some("Default"));
        assert_eq!(doc.get("Meta", "missing"), None);
    }

    #[test]
    fn test_value_may_contain_equals() {
        let doc = parse("gamedir=./a=b\n");
        assert_eq!(doc.get("", "gamedir"), Some("./a=b"));
    }

    #[test]
    fn test_set_preserves_unrelated_entries() {
        let mut doc = parse(GUI_SETTINGS);
        doc.set("main_window", "confirmationBoxExitGame", "false");
        doc.set("GSFrame", "disableMouse", "true");

        assert_eq!(
            doc.to_text(),
            "[main_window]\ngeometry=@ByteArray(abc)\nconfirmationBoxExitGame=false\n\n\
             [Meta]\ncurrentStylesheet=Default\n\n\
             [GSFrame]\ndisableMouse=true\n"
        );
    }

    #[test]
    fn test_root_section_written_first_without_header() {
        let mut doc = IniDocument::new("redream.cfg");
        doc.set("video", "x", "1");
        doc.set("", "vsync", "1");
        assert_eq!(doc.to_text(), "vsync=1\n\n[video]\nx=1\n");
    }

    #[test]
    fn test_reparse_is_stable() {
        let mut doc = parse(GUI_SETTINGS);
        doc.set_value(&KeyPath::new(["Meta"], "useRichPresence"), "false");
        let once = doc.to_text();
        let twice = parse(&once).to_text();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_nested_scope_joins_section_name() {
        let mut doc = IniDocument::new("x.ini");
        doc.set_value(&KeyPath::new(["a", "b"], "k"), "v");
        assert_eq!(doc.section_names().collect::<Vec<_>>(), vec!["a/b"]);
    }
}
