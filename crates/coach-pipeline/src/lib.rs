mod grader;
mod prompts;
mod responder;
mod runner;

pub use grader::ResponseGrader;
pub use responder::CoachingResponder;
pub use runner::{ExampleResult, Experiment, ExperimentReport, ScoreSummary};
