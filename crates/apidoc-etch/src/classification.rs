//! Options class classification
//!
//! Maps every documented options class onto one or more product categories.
//! A class is emitted once per category it belongs to; a class without an
//! entry cannot be documented.
//!
//! The table is a TOML dataset. A default dataset ships with the library and
//! can be replaced through [`GeneratorConfig::classification`](crate::docgen::GeneratorConfig).

use crate::diagnostics::{DocError, DocResult};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Built-in dataset
const BUILTIN_CLASSIFICATION: &str = include_str!("../assets/classification.toml");

/// File stems of the generated configuration documents
const RESERVED_KEYS: &[&str] = &["configuration-index", "cheatsheet"];

/// Product category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// Directory and link name
    pub key: String,
    /// Display name
    pub name: String,
    /// Front-matter title of the category root file
    pub title: String,
    /// Front-matter meta title
    pub meta_title: String,
    /// Front-matter meta description
    pub meta_description: String,
    /// Introduction paragraph below the front matter
    #[serde(default)]
    pub intro: String,
}

impl Category {
    /// Front-matter header of the category root file
    pub fn header(&self) -> String {
        let mut header = format!(
            "---\ntitle: \"{}\"\nmetaTitle: \"{}\"\nmetaDescription: \"{}\"\n---\n\n",
            self.title, self.meta_title, self.meta_description
        );
        if !self.intro.is_empty() {
            header.push_str(&self.intro);
            header.push('\n');
        }
        header
    }
}

/// Class name to category mapping
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ClassificationTable {
    /// Categories in display order
    #[serde(rename = "category", default)]
    categories: Vec<Category>,
    /// Options class name -> category keys
    #[serde(default)]
    classes: IndexMap<String, Vec<String>>,
}

impl ClassificationTable {
    /// Parse a TOML dataset and check that every referenced category exists
    pub fn from_toml_str(text: &str, origin: &Path) -> DocResult<Self> {
        let table: Self = toml::from_str(text).map_err(|e| DocError::toml(origin, e.to_string()))?;
        table.validate()?;
        Ok(table)
    }

    /// Read a TOML dataset from disk
    pub fn load(path: &Path) -> DocResult<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_toml_str(&text, path)
    }

    /// Dataset embedded in the library
    pub fn builtin() -> DocResult<Self> {
        Self::from_toml_str(BUILTIN_CLASSIFICATION, Path::new("classification.toml"))
    }

    /// Dataset from `path`, or the built-in one
    pub fn load_or_builtin(path: Option<&Path>) -> DocResult<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Self::builtin(),
        }
    }

    fn validate(&self) -> DocResult<()> {
        if let Some(category) = self.categories.iter().find(|c| RESERVED_KEYS.contains(&c.key.as_str())) {
            return Err(DocError::config(format!(
                "Category key '{}' is the name of a generated document",
                category.key
            )));
        }
        for (class, keys) in &self.classes {
            if keys.is_empty() {
                return Err(DocError::config(format!("Options class '{}' has no category", class)));
            }
            if let Some(key) = keys.iter().find(|k| self.category(k).is_none()) {
                return Err(DocError::UnknownCategory(key.clone()));
            }
        }
        Ok(())
    }

    /// All categories in display order
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Category by key
    pub fn category(&self, key: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.key == key)
    }

    /// Position of a category in display order
    pub fn category_index(&self, key: &str) -> Option<usize> {
        self.categories.iter().position(|c| c.key == key)
    }

    /// Categories of an options class, in the order they are listed for it
    pub fn categories_of(&self, class_name: &str) -> DocResult<Vec<&Category>> {
        let keys = self
            .classes
            .get(class_name)
            .ok_or_else(|| DocError::Unclassified(class_name.to_string()))?;
        keys.iter()
            .map(|key| self.category(key).ok_or_else(|| DocError::UnknownCategory(key.clone())))
            .collect()
    }

    /// Whether a class has an entry
    pub fn is_classified(&self, class_name: &str) -> bool {
        self.classes.contains_key(class_name)
    }

    /// Names of the classes mapped into a category
    pub fn classes_in<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.classes
            .iter()
            .filter(move |(_, keys)| keys.iter().any(|k| k == key))
            .map(|(class, _)| class.as_str())
    }

    /// Add or replace the entry of a class
    pub fn with_class<I, S>(mut self, class_name: impl Into<String>, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.classes
            .insert(class_name.into(), keys.into_iter().map(Into::into).collect());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_builtin_table() {
        let table = ClassificationTable::builtin().unwrap();
        let keys: Vec<&str> = table.categories().iter().map(|c| c.key.as_str()).collect();
        assert_eq!(
            keys,
            vec!["sensenet", "previewgenerator", "identityserver", "sn-io", "taskmanagement", "searchservice"]
        );

        let categories = table.categories_of("RabbitMqOptions").unwrap();
        let names: Vec<&str> = categories.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["SenseNet", "SearchService"]);
        assert_eq!(table.category_index("sn-io"), Some(3));
    }

    #[test]
    fn test_unclassified() {
        let table = ClassificationTable::builtin().unwrap();
        let err = table.categories_of("NopeOptions").unwrap_err();
        assert_eq!(err.to_string(), "Options class 'NopeOptions' is not categorized.");
        assert!(!table.is_classified("NopeOptions"));
    }

    #[test]
    fn test_classes_in() {
        let table = ClassificationTable::builtin().unwrap();
        let io: Vec<&str> = table.classes_in("sn-io").collect();
        assert_eq!(
            io,
            vec!["DisplaySettings", "FsReaderArgs", "FsWriterArgs", "RepositoryReaderArgs", "RepositoryWriterArgs"]
        );
    }

    #[test]
    fn test_header() {
        let table = ClassificationTable::builtin().unwrap();
        let header = table.category("taskmanagement").unwrap().header();
        assert_eq!(
            header,
            "---\ntitle: \"TaskManagement\"\nmetaTitle: \"sensenet - Configuring sensenet TaskManagement\"\nmetaDescription: \"Configuring sensenet TaskManagement\"\n---\n\nThis section contains configuration for sensenet TaskManagement.\n"
        );
    }

    #[test]
    fn test_custom_dataset() {
        let text = r#"
            [[category]]
            key = "tools"
            name = "Tools"
            title = "Tools"
            metaTitle = "Tools"
            metaDescription = "Tools"

            [classes]
            ToolOptions = ["tools"]
        "#;
        let table = ClassificationTable::from_toml_str(text, Path::new("custom.toml")).unwrap();
        assert_eq!(table.categories_of("ToolOptions").unwrap()[0].key, "tools");

        let table = table.with_class("OtherOptions", ["tools"]);
        assert!(table.is_classified("OtherOptions"));
    }

    #[test]
    fn test_unknown_category_rejected() {
        let text = r#"
            [classes]
            ToolOptions = ["missing"]
        "#;
        let err = ClassificationTable::from_toml_str(text, Path::new("custom.toml")).unwrap_err();
        assert!(matches!(err, DocError::UnknownCategory(key) if key == "missing"));
    }

    #[test]
    fn test_reserved_category_key_rejected() {
        let text = r#"
            [[category]]
            key = "cheatsheet"
            name = "Cheat sheet"
            title = "Cheat sheet"
            metaTitle = "Cheat sheet"
            metaDescription = "Cheat sheet"
        "#;
        let err = ClassificationTable::from_toml_str(text, Path::new("custom.toml")).unwrap_err();
        assert!(matches!(err, DocError::Config(_)));
    }
}
