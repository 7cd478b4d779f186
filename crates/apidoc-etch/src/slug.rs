//! Link slug generation
//!
//! Slugs identify entities in links and file names. Operation and options
//! class slugs are the lower-cased entity name; a name seen again in the same
//! run gets a numeric suffix starting at 1 (`foo`, `foo1`, `foo2`, ...).
//! Slugs are assigned in declaration-encounter order, never display order.
//!
//! The operation index and cheat sheet share the operations directory with
//! the entity files, so their names are never handed out as slugs.

use crate::operation::OperationDef;
use crate::options_class::OptionsClassDef;
use std::collections::HashSet;

/// File stems of the generated operation documents
pub const RESERVED_SLUGS: &[&str] = &["index", "cheatsheet"];

/// Category as used in links: lower-cased with whitespace removed.
///
/// ```
/// use apidoc_etch::slug::category_slug;
///
/// assert_eq!(category_slug("Content Types"), "contenttypes");
/// ```
///
/// A category named like a generated document gets a numeric suffix:
///
/// ```
/// use apidoc_etch::slug::category_slug;
///
/// assert_eq!(category_slug("Index"), "index1");
/// ```
pub fn category_slug(category: &str) -> String {
    let mut slug = category
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_lowercase();
    if RESERVED_SLUGS.contains(&slug.as_str()) {
        slug.push('1');
    }
    slug
}

/// Hands out collision-free slugs within one generation run
#[derive(Debug, Default)]
pub struct SlugRegistry {
    taken: HashSet<String>,
}

impl SlugRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry where `names` are already taken
    pub fn with_reserved(names: &[&str]) -> Self {
        Self {
            taken: names.iter().map(|n| n.to_string()).collect(),
        }
    }

    /// Reserve and return the slug for `name`
    pub fn unique(&mut self, name: &str) -> String {
        let base = name.to_lowercase();
        let mut candidate = base.clone();
        let mut counter = 0;
        while self.taken.contains(&candidate) {
            counter += 1;
            candidate = format!("{}{}", base, counter);
        }
        self.taken.insert(candidate.clone());
        candidate
    }

    /// Whether a slug has been handed out
    pub fn contains(&self, slug: &str) -> bool {
        self.taken.contains(slug)
    }
}

/// Assign unique slugs to every operation, in slice order
pub fn assign_operation_slugs<'a>(ops: impl IntoIterator<Item = &'a mut OperationDef>) {
    let mut registry = SlugRegistry::with_reserved(RESERVED_SLUGS);
    for op in ops {
        op.slug = registry.unique(&op.operation_name);
    }
}

/// Assign unique slugs to every options class, in slice order
pub fn assign_options_slugs(classes: &mut [OptionsClassDef]) {
    let mut registry = SlugRegistry::new();
    for oc in classes.iter_mut() {
        oc.slug = registry.unique(&oc.class_name);
    }
}
