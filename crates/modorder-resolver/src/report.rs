//! Constraint health reporting.

use std::fmt;

use modorder_core::entity::EntityKind;

/// Every constraint problem found in a resolver's current state.
#[derive(Debug, Default)]
pub struct ConstraintReport {
    pub issues: Vec<ConstraintIssue>,
}

/// A single problem that [`crate::LoadOrderResolver::reconcile`] or a
/// force-marker rebuild would normally prevent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConstraintIssue {
    /// `owner` references `target`, which is not an enabled entity of `kind`.
    DanglingTarget {
        kind: EntityKind,
        owner: String,
        target: String,
    },
    /// Two natives are each ordered before the other.
    Contradiction { first: String, second: String },
    /// More than one entity looks like it holds the force marker of `kind`.
    MultipleMarkers {
        kind: EntityKind,
        holders: Vec<String>,
    },
}

impl ConstraintReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, issue: ConstraintIssue) {
        self.issues.push(issue);
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }
}

impl fmt::Display for ConstraintReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.issues.is_empty() {
            return write!(f, "No constraint issues.");
        }
        writeln!(f, "Constraint issues ({}):", self.issues.len())?;
        for issue in &self.issues {
            writeln!(f, "  {issue}")?;
        }
        Ok(())
    }
}

impl fmt::Display for ConstraintIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DanglingTarget {
                kind,
                owner,
                target,
            } => write!(f, "{kind} {owner} references missing {kind} {target}"),
            Self::Contradiction { first, second } => {
                write!(f, "{first} and {second} are each ordered before the other")
            }
            Self::MultipleMarkers { kind, holders } => write!(
                f,
                "several {kind}s hold a force marker: {}",
                holders.join(", ")
            ),
        }
    }
}
