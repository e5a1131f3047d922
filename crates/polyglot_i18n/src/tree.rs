//! Translation trees and dictionaries.
//!
//! A [`Translations`] dictionary maps a language code to a [`TranslationTree`].
//! Each tree node is either a text leaf or a nested tree, so lookups never have
//! to deal with values of unexpected kinds; loaders reject them up front.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

use crate::I18nError;

const MAX_DEPTH: usize = 32;
const MAX_KEY_BYTES: usize = 128;
const MAX_VALUE_BYTES: usize = 16 * 1024;

/// A single node of a translation tree.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TranslationNode {
    Text(String),
    Tree(TranslationTree),
}

impl From<&str> for TranslationNode {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for TranslationNode {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<TranslationTree> for TranslationNode {
    fn from(v: TranslationTree) -> Self {
        Self::Tree(v)
    }
}

/// One language's nested set of translations.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TranslationTree {
    nodes: IndexMap<String, TranslationNode>,
}

impl TranslationTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert of a text leaf.
    pub fn text(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, TranslationNode::Text(value.into()));
        self
    }

    /// Builder-style insert of a nested tree.
    pub fn tree(mut self, key: impl Into<String>, child: TranslationTree) -> Self {
        self.insert(key, TranslationNode::Tree(child));
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, node: impl Into<TranslationNode>) {
        self.nodes.insert(key.into(), node.into());
    }

    pub fn get(&self, key: &str) -> Option<&TranslationNode> {
        self.nodes.get(key)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TranslationNode)> {
        self.nodes.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Resolve a dotted path to a text leaf.
    ///
    /// Every segment is visited. A nested tree under the segment becomes the
    /// current node; a text leaf is remembered and the walk stays where it is;
    /// a missing key is skipped. The last remembered leaf wins, so a path that
    /// runs past its deepest leaf still resolves to that leaf. Empty leaves
    /// count as missing.
    pub fn lookup(&self, path: &str) -> Option<&str> {
        let mut node = self;
        let mut found: Option<&str> = None;

        for segment in path.split('.') {
            match node.get(segment) {
                Some(TranslationNode::Tree(child)) => node = child,
                Some(TranslationNode::Text(s)) => found = Some(s.as_str()),
                None => {}
            }
        }

        found.filter(|s| !s.is_empty())
    }

    /// Deep-merge `other` into `self`; `other` wins on conflicting leaves.
    pub fn merge(&mut self, other: TranslationTree) {
        for (key, incoming) in other.nodes {
            match (self.nodes.get_mut(&key), incoming) {
                (Some(TranslationNode::Tree(mine)), TranslationNode::Tree(theirs)) => {
                    mine.merge(theirs);
                }
                (_, incoming) => {
                    self.nodes.insert(key, incoming);
                }
            }
        }
    }
}

impl<K: Into<String>, V: Into<TranslationNode>> FromIterator<(K, V)> for TranslationTree {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut tree = Self::new();
        for (k, v) in iter {
            tree.insert(k, v);
        }
        tree
    }
}

/// A translation dictionary: language code -> translation tree.
///
/// Deserializing runs [`Translations::validate`], so a dictionary read
/// through serde obeys the same key and size rules as the loaders.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Translations {
    languages: IndexMap<String, TranslationTree>,
}

impl Translations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert of a language tree.
    pub fn with_language(mut self, lang: impl Into<String>, tree: TranslationTree) -> Self {
        self.insert(lang, tree);
        self
    }

    pub fn insert(&mut self, lang: impl Into<String>, tree: TranslationTree) {
        self.languages.insert(lang.into(), tree);
    }

    pub fn get(&self, lang: &str) -> Option<&TranslationTree> {
        self.languages.get(lang)
    }

    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.languages.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.languages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.languages.is_empty()
    }

    /// Look up `path` in the tree for `lang`.
    pub fn lookup(&self, lang: &str, path: &str) -> Option<&str> {
        self.get(lang)?.lookup(path)
    }

    /// Merge another dictionary into this one, language by language.
    pub fn merge(&mut self, other: Translations) {
        for (lang, tree) in other.languages {
            match self.languages.get_mut(&lang) {
                Some(mine) => mine.merge(tree),
                None => {
                    self.languages.insert(lang, tree);
                }
            }
        }
    }

    /// Parse a YAML document shaped as `lang -> nested mapping of strings`.
    #[cfg(feature = "yaml")]
    pub fn from_yaml_str(src: &str) -> Result<Self, I18nError> {
        let value: serde_yaml::Value = serde_yaml::from_str(src)?;
        Self::from_document(yaml::into_document(value)?)
    }

    /// Parse a JSON document shaped as `lang -> nested object of strings`.
    #[cfg(feature = "json")]
    pub fn from_json_str(src: &str) -> Result<Self, I18nError> {
        let value: serde_json::Value = serde_json::from_str(src)?;
        Self::from_document(json::into_document(value)?)
    }

    /// Check every key and leaf against the catalog limits.
    ///
    /// Keys must be non-empty and free of `.`, since such keys could never be
    /// reached by a dotted path.
    pub fn validate(&self) -> Result<(), I18nError> {
        for (lang, tree) in &self.languages {
            check_key(lang, lang)?;
            validate_tree(lang, tree, 1)?;
        }
        Ok(())
    }

    #[cfg(any(feature = "yaml", feature = "json"))]
    fn from_document(doc: Document) -> Result<Self, I18nError> {
        let Document::Map(entries) = doc else {
            return Err(I18nError::invalid("", "top level must be a mapping of languages"));
        };

        let mut out = Self::new();
        for (lang, node) in entries {
            match build_node(&lang, node)? {
                TranslationNode::Tree(tree) => out.insert(lang, tree),
                TranslationNode::Text(_) => {
                    return Err(I18nError::invalid(
                        lang,
                        "a language must map to a mapping, not a string",
                    ));
                }
            }
        }
        out.validate()?;
        Ok(out)
    }
}

impl<'de> Deserialize<'de> for Translations {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let languages = IndexMap::<String, TranslationTree>::deserialize(deserializer)?;
        let out = Self { languages };
        out.validate().map_err(serde::de::Error::custom)?;
        Ok(out)
    }
}

impl<K: Into<String>> FromIterator<(K, TranslationTree)> for Translations {
    fn from_iter<T: IntoIterator<Item = (K, TranslationTree)>>(iter: T) -> Self {
        let mut out = Self::new();
        for (k, v) in iter {
            out.insert(k, v);
        }
        out
    }
}

/// Format-neutral view of a parsed document.
#[cfg(any(feature = "yaml", feature = "json"))]
enum Document {
    Text(String),
    Map(Vec<(String, Document)>),
    /// Anything else; carries the kind name for error messages.
    Other(&'static str),
}

fn check_key(path: &str, key: &str) -> Result<(), I18nError> {
    if key.is_empty() {
        return Err(I18nError::invalid(path, "empty key"));
    }
    if key.contains('.') {
        return Err(I18nError::invalid(path, format!("key `{key}` must not contain `.`")));
    }
    if key.len() > MAX_KEY_BYTES {
        return Err(I18nError::invalid(
            path,
            format!("key is too long (max {MAX_KEY_BYTES} bytes)"),
        ));
    }
    Ok(())
}

fn validate_tree(path: &str, tree: &TranslationTree, depth: usize) -> Result<(), I18nError> {
    if depth > MAX_DEPTH {
        return Err(I18nError::invalid(
            path,
            format!("nesting is too deep (max {MAX_DEPTH})"),
        ));
    }

    for (key, node) in tree.iter() {
        let child_path = format!("{path}.{key}");
        check_key(&child_path, key)?;
        match node {
            TranslationNode::Text(s) if s.len() > MAX_VALUE_BYTES => {
                return Err(I18nError::invalid(
                    child_path,
                    format!("value is too long (max {MAX_VALUE_BYTES} bytes)"),
                ));
            }
            TranslationNode::Text(_) => {}
            TranslationNode::Tree(child) => validate_tree(&child_path, child, depth + 1)?,
        }
    }
    Ok(())
}

/// Shape-only conversion; limits are enforced afterwards by `validate`.
#[cfg(any(feature = "yaml", feature = "json"))]
fn build_node(path: &str, doc: Document) -> Result<TranslationNode, I18nError> {
    match doc {
        Document::Text(s) => Ok(TranslationNode::Text(s)),
        Document::Map(entries) => {
            let mut tree = TranslationTree::new();
            for (key, child) in entries {
                let node = build_node(&format!("{path}.{key}"), child)?;
                tree.insert(key, node);
            }
            Ok(TranslationNode::Tree(tree))
        }
        Document::Other(kind) => Err(I18nError::invalid(
            path,
            format!("expected a string or a mapping, found {kind}"),
        )),
    }
}

#[cfg(feature = "yaml")]
mod yaml {
    use super::Document;
    use crate::I18nError;
    use serde_yaml::Value;

    pub(super) fn into_document(value: Value) -> Result<Document, I18nError> {
        convert("", value)
    }

    fn convert(path: &str, value: Value) -> Result<Document, I18nError> {
        Ok(match value {
            Value::String(s) => Document::Text(s),
            Value::Mapping(map) => {
                let mut entries = Vec::with_capacity(map.len());
                for (k, v) in map {
                    // Path segments are text, so scalar keys like `404` count too.
                    let key = match k {
                        Value::String(s) => s,
                        Value::Number(n) => n.to_string(),
                        Value::Bool(b) => b.to_string(),
                        _ => {
                            return Err(I18nError::invalid(
                                path,
                                "yaml keys must be strings, numbers or booleans",
                            ));
                        }
                    };
                    let child_path = if path.is_empty() {
                        key.clone()
                    } else {
                        format!("{path}.{key}")
                    };
                    let child = convert(&child_path, v)?;
                    entries.push((key, child));
                }
                Document::Map(entries)
            }
            Value::Tagged(tagged) => convert(path, tagged.value)?,
            Value::Null => Document::Other("null"),
            Value::Bool(_) => Document::Other("a boolean"),
            Value::Number(_) => Document::Other("a number"),
            Value::Sequence(_) => Document::Other("a sequence"),
        })
    }
}

#[cfg(feature = "json")]
mod json {
    use super::Document;
    use crate::I18nError;
    use serde_json::Value;

    pub(super) fn into_document(value: Value) -> Result<Document, I18nError> {
        Ok(convert(value))
    }

    fn convert(value: Value) -> Document {
        match value {
            Value::String(s) => Document::Text(s),
            Value::Object(map) => {
                Document::Map(map.into_iter().map(|(k, v)| (k, convert(v))).collect())
            }
            Value::Null => Document::Other("null"),
            Value::Bool(_) => Document::Other("a boolean"),
            Value::Number(_) => Document::Other("a number"),
            Value::Array(_) => Document::Other("an array"),
        }
    }
}
