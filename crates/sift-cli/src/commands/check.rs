//! Check command implementation.

use crate::cli::BackendArgs;
use crate::config::{Config, OutputFormat};
use crate::error::Result;
use crate::output::Formatter;
use sift_domain::InferenceBackend;
use sift_llm::OllamaBackend;
use sift_pipeline::SiftError;

/// Execute the check command.
pub async fn execute_check(args: BackendArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let mut inference = config.classify.inference.clone();
    args.apply(&mut inference);

    let backend = OllamaBackend::new(&inference.endpoint, &inference.model);
    let outcome = backend.check_available().await;

    if let OutputFormat::Json = formatter.format() {
        println!(
            "{}",
            formatter.json(&serde_json::json!({
                "endpoint": backend.endpoint(),
                "model": backend.model(),
                "available": outcome.is_ok(),
                "error": outcome.as_ref().err().map(|e| e.to_string()),
            }))?
        );
    }

    match outcome {
        Ok(()) => {
            if let OutputFormat::Table = formatter.format() {
                println!(
                    "{}",
                    formatter.success(&format!(
                        "{} is serving model '{}'",
                        backend.endpoint(),
                        backend.model()
                    ))
                );
            }
            Ok(())
        }
        Err(e) => {
            if let OutputFormat::Table = formatter.format() {
                println!("{}", formatter.error(&e.to_string()));
                if let Some(help) = backend.remediation() {
                    println!("{}", formatter.info(&help));
                }
            }
            Err(SiftError::BackendUnavailable(e.to_string()).into())
        }
    }
}
