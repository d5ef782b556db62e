use coach_core::{CoachError, GradingOutcome};
use coach_llm::LlmClient;
use tracing::{info, warn};

use crate::prompts::{grading_prompt, GRADER_SYSTEM_PROMPT};

/// Grades a coaching reply against the three-criterion rubric.
pub struct ResponseGrader {
    client: LlmClient,
}

impl ResponseGrader {
    pub fn new(client: LlmClient) -> Self {
        Self { client }
    }

    /// Asks the grading model for three binary scores and packages them as
    /// a total outcome.
    ///
    /// A malformed grader reply degrades to the all-zero outcome and is
    /// never raised; a failed remote call propagates to the caller.
    pub async fn grade(&self, goal: &str, reply: &str) -> Result<GradingOutcome, CoachError> {
        info!("GRADER: Scoring coaching reply");

        let prompt = grading_prompt(goal, reply);
        let response = self.client.chat(GRADER_SYSTEM_PROMPT, &prompt).await?;

        let outcome = score_reply(&response.content);
        info!(
            "GRADER: iscore={} rscore={} escore={}",
            outcome.scores[0].score, outcome.scores[1].score, outcome.scores[2].score
        );

        Ok(outcome)
    }
}

/// Turns the grader's raw reply into a total outcome: parsed scores on
/// success, the degraded all-zero outcome on any parse failure.
fn score_reply(reply: &str) -> GradingOutcome {
    match parse_scores(reply) {
        Ok((iscore, rscore, escore)) => GradingOutcome::from_scores(iscore, rscore, escore),
        Err(e) => {
            warn!("GRADER: {e}");
            let reason = match e {
                CoachError::ParseError(reason) => reason,
                other => other.to_string(),
            };
            GradingOutcome::parse_failure(&reason)
        }
    }
}

/// Parses the grader's reply into three validated binary scores.
///
/// The reply must contain exactly three whitespace-separated integers,
/// each 0 or 1.
fn parse_scores(reply: &str) -> Result<(u8, u8, u8), CoachError> {
    let tokens: Vec<&str> = reply.split_whitespace().collect();
    if tokens.len() != 3 {
        return Err(CoachError::ParseError(format!(
            "expected three scores, got {}",
            tokens.len()
        )));
    }

    let mut values = [0u8; 3];
    for (slot, token) in values.iter_mut().zip(&tokens) {
        match token.parse::<i64>() {
            Ok(v @ 0..=1) => *slot = v as u8,
            Ok(v) => {
                return Err(CoachError::ParseError(format!("score {v} is out of range")))
            }
            Err(_) => {
                return Err(CoachError::ParseError(format!("'{token}' is not a number")))
            }
        }
    }

    Ok((values[0], values[1], values[2]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use coach_core::RubricKey;

    #[test]
    fn test_well_formed_reply_maps_to_ordered_scores() {
        let outcome = score_reply("1 1 1");
        assert_eq!(outcome.get(RubricKey::IScore), 1);
        assert_eq!(outcome.get(RubricKey::RScore), 1);
        assert_eq!(outcome.get(RubricKey::EScore), 1);
        assert_eq!(outcome.scores[0].explanation, "Question presence: 1");
        assert_eq!(outcome.scores[1].explanation, "Explanation presence");
        assert_eq!(outcome.scores[2].explanation, "Examples presence");
    }

    #[test]
    fn test_mixed_scores_keep_their_positions() {
        let outcome = score_reply("1 0 1");
        assert_eq!(outcome.get(RubricKey::IScore), 1);
        assert_eq!(outcome.get(RubricKey::RScore), 0);
        assert_eq!(outcome.get(RubricKey::EScore), 1);
    }

    #[test]
    fn test_too_few_tokens_degrade_to_zeros() {
        let outcome = score_reply("1 0");
        assert!(outcome.scores.iter().all(|s| s.score == 0));
        assert!(outcome.scores[0].explanation.contains("expected three scores"));
    }

    #[test]
    fn test_too_many_tokens_degrade_to_zeros() {
        let outcome = score_reply("1 0 1 1");
        assert!(outcome.scores.iter().all(|s| s.score == 0));
    }

    #[test]
    fn test_non_numeric_tokens_degrade_to_zeros() {
        let outcome = score_reply("yes no maybe");
        assert!(outcome.scores.iter().all(|s| s.score == 0));
        assert!(outcome.scores[0].explanation.contains("Failed to parse score"));
    }

    #[test]
    fn test_out_of_range_score_degrades() {
        let outcome = score_reply("1 1 2");
        assert!(outcome.scores.iter().all(|s| s.score == 0));
        assert!(outcome.scores[0].explanation.contains("out of range"));
    }

    #[test]
    fn test_negative_score_degrades() {
        let outcome = score_reply("1 -1 1");
        assert!(outcome.scores.iter().all(|s| s.score == 0));
    }

    #[test]
    fn test_surrounding_whitespace_is_tolerated() {
        let outcome = score_reply("  1\t0   1\n");
        assert_eq!(outcome.get(RubricKey::IScore), 1);
        assert_eq!(outcome.get(RubricKey::RScore), 0);
        assert_eq!(outcome.get(RubricKey::EScore), 1);
    }

    #[test]
    fn test_scoring_is_idempotent() {
        assert_eq!(score_reply("1 1 1"), score_reply("1 1 1"));
        assert_eq!(score_reply("garbage"), score_reply("garbage"));
    }

    #[test]
    fn test_empty_reply_degrades_to_zeros() {
        let outcome = score_reply("");
        assert!(outcome.scores.iter().all(|s| s.score == 0));
        assert!(outcome.scores[0].explanation.contains("got 0"));
    }

    #[test]
    fn test_parse_scores_rejects_without_panicking() {
        assert!(parse_scores("0 1 0").is_ok());
        assert!(matches!(parse_scores("0 1"), Err(CoachError::ParseError(_))));
        assert!(matches!(parse_scores("a b c"), Err(CoachError::ParseError(_))));
    }
}
