//! Expression suites.
//!
//! A suite is a YAML/JSON document listing expressions together with the
//! outcome each one must produce. This module handles parsing suites and
//! running them through an `Evaluator`.

mod parser;
mod report;

pub use parser::{Case, Expectation, Suite, SuiteError};
pub use report::{CaseOutcome, SuiteReport};
