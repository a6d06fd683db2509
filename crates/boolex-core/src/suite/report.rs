//! Running suites and reporting outcomes.
//!
//! Every case is evaluated independently; a failing case never stops the run.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::parser::{Expectation, Suite};
use crate::evaluator::Evaluator;

/// Outcome of one case.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CaseOutcome {
    pub id: String,
    pub expression: String,
    pub expected: Expectation,
    pub actual: Expectation,
    pub passed: bool,
}

/// Result of running a whole suite.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuiteReport {
    /// Name of the suite that was run
    pub suite: String,

    /// One outcome per case, in suite order
    pub outcomes: Vec<CaseOutcome>,

    pub passed: usize,
    pub failed: usize,

    /// When the run finished
    pub ran_at: DateTime<Utc>,
}

impl SuiteReport {
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }

    pub fn failures(&self) -> impl Iterator<Item = &CaseOutcome> {
        self.outcomes.iter().filter(|outcome| !outcome.passed)
    }
}

impl Suite {
    /// Evaluate every case and compare it with its expectation.
    pub fn run(&self, evaluator: &Evaluator) -> SuiteReport {
        let outcomes: Vec<CaseOutcome> = self
            .cases
            .iter()
            .map(|case| {
                let actual = Expectation::from(evaluator.evaluate(&case.expression));
                let passed = actual == case.expect;
                if !passed {
                    tracing::warn!(
                        suite = %self.name,
                        case = %case.id,
                        expected = ?case.expect,
                        actual = ?actual,
                        "Case failed"
                    );
                }
                CaseOutcome {
                    id: case.id.clone(),
                    expression: case.expression.clone(),
                    expected: case.expect,
                    actual,
                    passed,
                }
            })
            .collect();

        let passed = outcomes.iter().filter(|outcome| outcome.passed).count();
        let failed = outcomes.len() - passed;
        tracing::info!(suite = %self.name, passed, failed, "Suite finished");

        SuiteReport {
            suite: self.name.clone(),
            outcomes,
            passed,
            failed,
            ran_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;

    const SUITE: &str = r#"
name: "Mixed"
cases:
  - id: "S1"
    expression: "true & false | true"
    expect: true
  - id: "S2"
    expression: "!(true & false)"
    expect: true
  - id: "S3"
    expression: "true $"
    expect: invalid_characters
  - id: "S4"
    expression: "(true"
    expect: true
"#;

    #[test]
    fn test_run_reports_each_case() {
        let suite = Suite::from_yaml(SUITE).unwrap();
        let report = suite.run(&Evaluator::new());

        assert_eq!(report.suite, "Mixed");
        assert_eq!(report.outcomes.len(), 4);
        assert_eq!(report.passed, 3);
        assert_eq!(report.failed, 1);
        assert!(!report.is_success());

        let failures: Vec<&CaseOutcome> = report.failures().collect();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].id, "S4");
        assert_eq!(
            failures[0].actual,
            Expectation::Error(ValidationError::MismatchedParentheses)
        );
    }

    #[test]
    fn test_bundled_suite_passes() {
        let suite =
            Suite::from_yaml(include_str!("../../../../suites/precedence.yaml")).unwrap();
        let report = suite.run(&Evaluator::new());
        assert!(report.is_success(), "failures: {:?}", report.failures().collect::<Vec<_>>());
    }

    #[test]
    fn test_bundled_json_suite_passes() {
        let suite = Suite::from_json(include_str!("../../../../suites/grouping.json")).unwrap();
        let report = suite.run(&Evaluator::new());
        assert!(report.is_success(), "failures: {:?}", report.failures().collect::<Vec<_>>());
        assert_eq!(report.passed, 9);
    }

    #[test]
    fn test_empty_suite_succeeds() {
        let suite = Suite::from_yaml("name: \"Empty\"\n").unwrap();
        let report = suite.run(&Evaluator::new());
        assert!(report.is_success());
        assert_eq!(report.passed, 0);
    }

    #[test]
    fn test_report_serializes() {
        let suite = Suite::from_yaml(SUITE).unwrap();
        let report = suite.run(&Evaluator::new());
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["suite"], "Mixed");
        assert_eq!(json["outcomes"][2]["actual"], "invalid_characters");
        assert_eq!(json["outcomes"][0]["actual"], true);
    }
}
