use anyhow::{Context, Result};
use async_openai::Client;
use coach_config::{Dataset, Settings};
use coach_llm::LlmClient;
use coach_pipeline::{CoachingResponder, Experiment, ResponseGrader};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".parse().unwrap()),
        )
        .compact()
        .init();

    let settings = Settings::from_env();
    let dataset = Dataset::from_file(&settings.dataset_path)
        .with_context(|| format!("loading dataset from {}", settings.dataset_path))?;

    info!(
        "Loaded dataset '{}' with {} examples",
        dataset.name,
        dataset.examples.len()
    );

    // One transport, two sampling configurations.
    let client = Client::new();
    let coach_client = LlmClient::with_client(
        client.clone(),
        &settings.coach_model,
        settings.coach_temperature,
    );
    let grader_client = LlmClient::with_client(
        client,
        &settings.grader_model,
        settings.grader_temperature,
    );

    let responder = match settings
        .system_prompt()
        .context("reading coaching prompt override")?
    {
        Some(prompt) => CoachingResponder::with_system_prompt(coach_client, prompt),
        None => CoachingResponder::new(coach_client),
    };
    let grader = ResponseGrader::new(grader_client);

    let experiment = Experiment::new(responder, grader, &settings.experiment_prefix);
    let report = experiment.run(&dataset).await;

    if report.summary.graded == 0 {
        anyhow::bail!("experiment {} graded no examples", report.experiment);
    }

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
