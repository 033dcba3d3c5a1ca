//! Load-order resolution engine: entity enable/disable bookkeeping,
//! force-first/force-last constraint synthesis, fixed precedence rules,
//! reconciliation after structural changes, and topological load order.

pub mod graph;
pub mod report;
pub mod resolver;
pub mod rules;

pub use report::{ConstraintIssue, ConstraintReport};
pub use resolver::{LoadOrderResolver, Summary};
pub use rules::FixedOrder;
