use coach_config::{Dataset, EvalExample};
use coach_core::{CoachError, GradingOutcome, RubricKey};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{CoachingResponder, ResponseGrader};

/// Outcome of evaluating a single dataset example.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExampleResult {
    pub goal: String,
    pub reply: Option<String>,
    pub outcome: Option<GradingOutcome>,
    pub error: Option<String>,
}

impl ExampleResult {
    fn failed(goal: String, reply: Option<String>, error: &CoachError) -> Self {
        Self {
            goal,
            reply,
            outcome: None,
            error: Some(error.to_string()),
        }
    }
}

/// Mean rubric scores over the successfully graded examples.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreSummary {
    pub graded: usize,
    pub failed: usize,
    pub mean_iscore: f64,
    pub mean_rscore: f64,
    pub mean_escore: f64,
}

/// Full report for one experiment run.
#[derive(Debug, Clone, Serialize)]
pub struct ExperimentReport {
    pub experiment: String,
    pub dataset: String,
    pub summary: ScoreSummary,
    pub results: Vec<ExampleResult>,
}

/// Drives the responder and grader over a dataset, one example at a time.
pub struct Experiment {
    responder: CoachingResponder,
    grader: ResponseGrader,
    name: String,
}

impl Experiment {
    /// Creates an experiment named `{prefix}-{short id}` for grouping runs
    /// across prompt variants.
    pub fn new(responder: CoachingResponder, grader: ResponseGrader, prefix: &str) -> Self {
        let id = Uuid::new_v4().simple().to_string();
        Self {
            responder,
            grader,
            name: format!("{prefix}-{}", &id[..8]),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Evaluates every example sequentially. A transport failure is fatal
    /// for its example only; the run continues with the rest.
    pub async fn run(&self, dataset: &Dataset) -> ExperimentReport {
        info!(
            "EXPERIMENT {}: evaluating {} examples from '{}'",
            self.name,
            dataset.examples.len(),
            dataset.name
        );

        let mut results = Vec::with_capacity(dataset.examples.len());
        for (idx, example) in dataset.examples.iter().enumerate() {
            results.push(self.run_example(idx, example).await);
        }

        let summary = summarize(&results);
        info!(
            "EXPERIMENT {}: graded {}/{} (iscore {:.2}, rscore {:.2}, escore {:.2})",
            self.name,
            summary.graded,
            results.len(),
            summary.mean_iscore,
            summary.mean_rscore,
            summary.mean_escore
        );

        ExperimentReport {
            experiment: self.name.clone(),
            dataset: dataset.name.clone(),
            summary,
            results,
        }
    }

    async fn run_example(&self, idx: usize, example: &EvalExample) -> ExampleResult {
        let Some(goal) = example.goal_text().map(String::from) else {
            warn!("EXPERIMENT: example {idx} skipped: no user turn");
            return ExampleResult::failed(String::new(), None, &CoachError::MissingUserTurn);
        };

        let reply = match self.responder.respond(&example.messages).await {
            Ok(msg) => msg.content,
            Err(e) => {
                warn!("EXPERIMENT: example {idx} responder failed: {e}");
                return ExampleResult::failed(goal, None, &e);
            }
        };

        match self.grader.grade(&goal, &reply).await {
            Ok(outcome) => ExampleResult {
                goal,
                reply: Some(reply),
                outcome: Some(outcome),
                error: None,
            },
            Err(e) => {
                warn!("EXPERIMENT: example {idx} grader failed: {e}");
                ExampleResult::failed(goal, Some(reply), &e)
            }
        }
    }
}

/// Computes per-key means over the graded examples.
fn summarize(results: &[ExampleResult]) -> ScoreSummary {
    let graded: Vec<&GradingOutcome> = results.iter().filter_map(|r| r.outcome.as_ref()).collect();

    let mean = |key: RubricKey| {
        if graded.is_empty() {
            0.0
        } else {
            graded.iter().map(|o| f64::from(o.get(key))).sum::<f64>() / graded.len() as f64
        }
    };

    ScoreSummary {
        graded: graded.len(),
        failed: results.len() - graded.len(),
        mean_iscore: mean(RubricKey::IScore),
        mean_rscore: mean(RubricKey::RScore),
        mean_escore: mean(RubricKey::EScore),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graded(iscore: u8, rscore: u8, escore: u8) -> ExampleResult {
        ExampleResult {
            goal: "goal".into(),
            reply: Some("reply".into()),
            outcome: Some(GradingOutcome::from_scores(iscore, rscore, escore)),
            error: None,
        }
    }

    fn failed() -> ExampleResult {
        ExampleResult {
            goal: "goal".into(),
            reply: None,
            outcome: None,
            error: Some("LLM request failed: connection refused".into()),
        }
    }

    #[test]
    fn test_summarize_averages_over_graded_examples_only() {
        let results = vec![graded(1, 1, 1), graded(1, 0, 0), failed()];
        let summary = summarize(&results);

        assert_eq!(summary.graded, 2);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.mean_iscore, 1.0);
        assert_eq!(summary.mean_rscore, 0.5);
        assert_eq!(summary.mean_escore, 0.5);
    }

    #[test]
    fn test_summarize_handles_an_all_failed_run() {
        let summary = summarize(&[failed(), failed()]);
        assert_eq!(summary.graded, 0);
        assert_eq!(summary.failed, 2);
        assert_eq!(summary.mean_iscore, 0.0);
    }

    #[test]
    fn test_summarize_handles_no_results() {
        let summary = summarize(&[]);
        assert_eq!(summary.graded, 0);
        assert_eq!(summary.failed, 0);
    }
}
