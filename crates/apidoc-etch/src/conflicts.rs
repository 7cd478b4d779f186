//! Configuration section conflict detection
//!
//! Two options classes bound to the same section path either agree on the
//! type of every property they share (a duplication worth a warning) or they
//! don't (a hard conflict; neither class is documented).

use crate::diagnostics::{Diagnostic, DiagnosticsCollector};
use crate::options_class::OptionsClassDef;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Outcome of comparing two classes that share a section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ConflictKind {
    /// Shared property names agree on type; both classes stay documented
    Duplicate,
    /// A shared property name disagrees on type; both classes are dropped
    TypeViolation,
}

/// Two classes with the same section path
#[derive(Debug, Clone, PartialEq)]
pub struct SectionConflict<'a> {
    /// Shared section path
    pub section: &'a str,
    /// Severity of the clash
    pub kind: ConflictKind,
    /// Earlier class in encounter order
    pub first: &'a OptionsClassDef,
    /// Later class in encounter order
    pub second: &'a OptionsClassDef,
}

impl SectionConflict<'_> {
    /// Report message naming both classes, their files and property lists
    pub fn message(&self) -> String {
        let describe = |oc: &OptionsClassDef| {
            format!("\t{}: {}\n\t\t{}", oc.class_name, oc.file, oc.property_signature("; "))
        };
        match self.kind {
            ConflictKind::TypeViolation => format!(
                "ERROR! Duplicated section '{}' and property type violation found in these options classes:\n{}\n{}\n\tDocumentations of these classes are skipped.",
                self.section,
                describe(self.first),
                describe(self.second)
            ),
            ConflictKind::Duplicate => format!(
                "WARNING! Duplicated section '{}' found in these options classes:\n{}\n{}",
                self.section,
                describe(self.first),
                describe(self.second)
            ),
        }
    }
}

/// Classify a pair of classes sharing a section.
///
/// The result does not depend on argument order.
pub fn classify_pair(a: &OptionsClassDef, b: &OptionsClassDef) -> ConflictKind {
    let violated = a.properties.iter().any(|pa| {
        b.properties
            .iter()
            .any(|pb| pb.name == pa.name && pb.type_name != pa.type_name)
    });
    if violated {
        ConflictKind::TypeViolation
    } else {
        ConflictKind::Duplicate
    }
}

/// Every unordered pair of classes with an identical section path, in encounter order
pub fn detect_conflicts(classes: &[OptionsClassDef]) -> Vec<SectionConflict<'_>> {
    let mut conflicts = Vec::new();
    for (i, first) in classes.iter().enumerate() {
        for second in &classes[i + 1..] {
            if first.section == second.section {
                conflicts.push(SectionConflict {
                    section: &first.section,
                    kind: classify_pair(first, second),
                    first,
                    second,
                });
            }
        }
    }
    conflicts
}

/// Drop hard-conflicting classes and log every conflict.
///
/// Returns the report messages in detection order.
pub fn resolve_conflicts(
    classes: &mut Vec<OptionsClassDef>,
    diagnostics: &mut DiagnosticsCollector,
) -> Vec<String> {
    let mut messages = Vec::new();
    let mut dropped = HashSet::new();

    for conflict in detect_conflicts(classes) {
        let message = conflict.message();
        let diagnostic = match conflict.kind {
            ConflictKind::TypeViolation => {
                dropped.insert(conflict.first.full_name());
                dropped.insert(conflict.second.full_name());
                Diagnostic::error(message.clone())
            }
            ConflictKind::Duplicate => Diagnostic::warning(message.clone()),
        };
        diagnostics.add(diagnostic.in_file(&conflict.second.file).with_code("section-conflict"));
        messages.push(message);
    }

    if !dropped.is_empty() {
        classes.retain(|oc| !dropped.contains(&oc.full_name()));
    }
    messages
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options_class::PropertyDef;
    use crate::test::mock_options_class;
    use pretty_assertions::assert_eq;

    fn port_class(name: &str, port_type: &str) -> OptionsClassDef {
        let mut oc = mock_options_class(name, "X", vec![PropertyDef::new("Port", port_type)]);
        oc.file = format!("/repo/src/{}.cs", name);
        oc
    }

    #[test]
    fn test_classify_is_symmetric() {
        let a = port_class("A", "int");
        let b = port_class("B", "string");
        let c = mock_options_class("C", "X", vec![PropertyDef::new("Port", "int"), PropertyDef::new("Host", "string")]);

        assert_eq!(classify_pair(&a, &b), ConflictKind::TypeViolation);
        assert_eq!(classify_pair(&b, &a), ConflictKind::TypeViolation);
        assert_eq!(classify_pair(&a, &c), ConflictKind::Duplicate);
        assert_eq!(classify_pair(&c, &a), ConflictKind::Duplicate);
    }

    #[test]
    fn test_hard_conflict_drops_both() {
        let mut classes = vec![
            port_class("A", "int"),
            port_class("B", "string"),
            mock_options_class("Other", "Y", vec![]),
        ];
        let mut diagnostics = DiagnosticsCollector::new();
        let messages = resolve_conflicts(&mut classes, &mut diagnostics);

        let names: Vec<&str> = classes.iter().map(|c| c.class_name.as_str()).collect();
        assert_eq!(names, vec!["Other"]);
        assert_eq!(messages.len(), 1);
        assert_eq!(
            messages[0],
            "ERROR! Duplicated section 'X' and property type violation found in these options classes:\n\
             \tA: /repo/src/A.cs\n\t\tint Port\n\
             \tB: /repo/src/B.cs\n\t\tstring Port\n\
             \tDocumentations of these classes are skipped."
        );
        assert!(diagnostics.has_errors());
        assert_eq!(diagnostics.with_code("section-conflict").count(), 1);
    }

    #[test]
    fn test_duplicate_keeps_both() {
        let mut classes = vec![port_class("A", "int"), port_class("B", "int")];
        let mut diagnostics = DiagnosticsCollector::new();
        let messages = resolve_conflicts(&mut classes, &mut diagnostics);

        assert_eq!(classes.len(), 2);
        assert!(messages[0].starts_with("WARNING! Duplicated section 'X'"));
        assert!(!diagnostics.has_errors());
        assert_eq!(diagnostics.warning_count(), 1);
    }

    #[test]
    fn test_three_way_section() {
        let classes = vec![port_class("A", "int"), port_class("B", "int"), port_class("C", "long")];
        let kinds: Vec<ConflictKind> = detect_conflicts(&classes).iter().map(|c| c.kind).collect();
        assert_eq!(
            kinds,
            vec![ConflictKind::Duplicate, ConflictKind::TypeViolation, ConflictKind::TypeViolation]
        );
    }
}
