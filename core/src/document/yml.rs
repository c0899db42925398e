//! Hierarchical `key: value` documents (the block-mapping subset of YAML that
//! emulator config files use).
//!
//! Only mappings are interpreted. Sequence items, comments and anything else
//! are kept as raw lines under the container they appear in, so unknown
//! content survives a rewrite.

use std::path::{Path, PathBuf};

use super::{ConfigDocument, DocumentFile, KeyPath};

const INDENT: usize = 2;

/// One line-level entry of a container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum YmlEntry {
    Value { key: String, value: String },
    Container(YmlContainer),
    /// A line kept verbatim, `offset` columns deeper than its container's keys.
    Raw { offset: usize, text: String },
}

impl YmlEntry {
    fn name(&self) -> Option<&str> {
        match self {
            YmlEntry::Value { key, .. } => Some(key),
            YmlEntry::Container(container) => Some(&container.name),
            YmlEntry::Raw { .. } => None,
        }
    }
}

/// A named container of values and child containers, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct YmlContainer {
    pub name: String,
    pub entries: Vec<YmlEntry>,
}

impl YmlContainer {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.iter().find_map(|entry| match entry {
            YmlEntry::Value { key: k, value } if k == key => Some(value.as_str()),
            _ => None,
        })
    }

    /// Set a leaf value. A child container of the same name is replaced.
    pub fn set(&mut self, key: &str, value: &str) {
        let entry = YmlEntry::Value {
            key: key.to_string(),
            value: value.to_string(),
        };
        match self.position(key) {
            Some(index) => self.entries[index] = entry,
            None => self.entries.push(entry),
        }
    }

    pub fn container(&self, name: &str) -> Option<&YmlContainer> {
        self.entries.iter().find_map(|entry| match entry {
            YmlEntry::Container(c) if c.name == name => Some(c),
            _ => None,
        })
    }

    /// Return the child container `name`, creating it if needed.
    ///
    /// Calling this repeatedly never creates duplicate siblings. A leaf value
    /// with the same name is replaced in place by an empty container.
    pub fn get_or_create_container(&mut self, name: &str) -> &mut YmlContainer {
        let index = match self.position(name) {
            Some(index) => {
                if !matches!(self.entries[index], YmlEntry::Container(_)) {
                    self.entries[index] = YmlEntry::Container(YmlContainer::new(name));
                }
                index
            }
            None => {
                self.entries
                    .push(YmlEntry::Container(YmlContainer::new(name)));
                self.entries.len() - 1
            }
        };
        match &mut self.entries[index] {
            YmlEntry::Container(container) => container,
            _ => unreachable!("entry {index} was just made a container"),
        }
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.name() == Some(name))
    }

    fn write(&self, out: &mut String, depth: usize) {
        let pad = " ".repeat(depth * INDENT);
        for entry in &self.entries {
            match entry {
                YmlEntry::Value { key, value } if value.is_empty() => {
                    out.push_str(&format!("{pad}{key}:\n"));
                }
                YmlEntry::Value { key, value } => {
                    out.push_str(&format!("{pad}{key}: {value}\n"));
                }
                YmlEntry::Container(child) if child.entries.is_empty() => {
                    out.push_str(&format!("{pad}{}: {{}}\n", child.name));
                }
                YmlEntry::Container(child) => {
                    out.push_str(&format!("{pad}{}:\n", child.name));
                    child.write(out, depth + 1);
                }
                YmlEntry::Raw { offset, text } => {
                    out.push_str(&format!("{pad}{}{text}\n", " ".repeat(*offset)));
                }
            }
        }
    }
}

/// Hierarchical config document bound to a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YmlDocument {
    path: PathBuf,
    root: YmlContainer,
}

impl YmlDocument {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            root: YmlContainer::default(),
        }
    }

    pub fn root(&self) -> &YmlContainer {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut YmlContainer {
        &mut self.root
    }

    fn find(&self, scope: &[String]) -> Option<&YmlContainer> {
        scope
            .iter()
            .try_fold(&self.root, |container, name| container.container(name))
    }
}

impl ConfigDocument for YmlDocument {
    fn value(&self, path: &KeyPath) -> Option<&str> {
        self.find(&path.scope)?.get(&path.key)
    }

    fn set_value(&mut self, path: &KeyPath, value: &str) {
        let mut container = &mut self.root;
        for name in &path.scope {
            container = container.get_or_create_container(name);
        }
        container.set(&path.key, value);
    }
}

impl DocumentFile for YmlDocument {
    fn parse(path: PathBuf, text: &str) -> Self {
        let lines: Vec<Line<'_>> = text
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(Line::new)
            .collect();
        let mut pos = 0;
        let mut root = YmlContainer::default();

        // Anything dedented below the first line still belongs to the root.
        while pos < lines.len() {
            let indent = lines[pos].indent;
            root.entries.extend(parse_block(&lines, &mut pos, indent));
        }

        Self { path, root }
    }

    fn path(&self) -> &Path {
        &self.path
    }

    fn to_text(&self) -> String {
        let mut out = String::new();
        self.root.write(&mut out, 0);
        out
    }
}

struct Line<'a> {
    indent: usize,
    text: &'a str,
}

impl<'a> Line<'a> {
    fn new(raw: &'a str) -> Self {
        let raw = raw.trim_end();
        let text = raw.trim_start();
        Self {
            indent: raw.len() - text.len(),
            text,
        }
    }

    fn is_sequence_item(&self) -> bool {
        self.text == "-" || self.text.starts_with("- ")
    }

    /// Verbatim entry for a line inside a block whose keys sit at `indent`.
    fn raw(&self, indent: usize) -> YmlEntry {
        YmlEntry::Raw {
            offset: self.indent.saturating_sub(indent),
            text: self.text.to_string(),
        }
    }
}

/// Parse consecutive lines at `indent` (and their children).
fn parse_block(lines: &[Line<'_>], pos: &mut usize, indent: usize) -> Vec<YmlEntry> {
    let mut entries = Vec::new();

    while let Some(line) = lines.get(*pos) {
        if line.indent < indent {
            break;
        }
        *pos += 1;

        // Deeper lines without a header (block scalars, mappings inside
        // sequence items) and sequence items are kept verbatim, at their depth.
        if line.indent > indent || line.is_sequence_item() || line.text.starts_with('#') {
            entries.push(line.raw(indent));
            continue;
        }

        if let Some(key) = line.text.strip_suffix(':')
            && !key.contains(": ")
        {
            entries.push(parse_header(lines, pos, indent, key));
            continue;
        }

        match line.text.split_once(": ") {
            Some((key, value)) if value.trim() == "{}" => {
                entries.push(YmlEntry::Container(YmlContainer::new(key.trim_end())));
            }
            Some((key, value)) => entries.push(YmlEntry::Value {
                key: key.trim_end().to_string(),
                value: value.trim().to_string(),
            }),
            None => entries.push(line.raw(indent)),
        }
    }

    entries
}

/// A `key:` line: a container if children follow, otherwise an empty value.
fn parse_header(lines: &[Line<'_>], pos: &mut usize, indent: usize, key: &str) -> YmlEntry {
    let key = key.trim_end();
    match lines.get(*pos) {
        Some(next) if next.indent > indent => {
            let child_indent = next.indent;
            YmlEntry::Container(YmlContainer {
                name: key.to_string(),
                entries: parse_block(lines, pos, child_indent),
            })
        }
        // Block sequences may sit at the same indent as their key. Item
        // bodies continue on deeper lines.
        Some(next) if next.indent == indent && next.is_sequence_item() => {
            let mut items = Vec::new();
            while let Some(item) = lines.get(*pos)
                && (item.indent > indent || (item.indent == indent && item.is_sequence_item()))
            {
                items.push(item.raw(indent));
                *pos += 1;
            }
            YmlEntry::Container(YmlContainer {
                name: key.to_string(),
                entries: items,
            })
        }
        _ => YmlEntry::Value {
            key: key.to_string(),
            value: String::new(),
        },
    }
}
