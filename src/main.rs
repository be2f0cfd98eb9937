use contract_intel::ops::telemetry;
use contract_intel::{ContractProcessor, EngineConfig, InMemoryJobStore};
use std::path::Path;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    // * .env is optional; real environment variables take precedence
    dotenvy::dotenv().ok();
    telemetry::init_tracing();

    let Some(path) = std::env::args().nth(1) else {
        eprintln!("usage: contract-intel <text-file>");
        return ExitCode::from(2);
    };

    let text = match tokio::fs::read_to_string(&path).await {
        Ok(text) => text,
        Err(e) => {
            tracing::error!(path = %path, error = %e, "Failed to read contract file");
            return ExitCode::FAILURE;
        }
    };

    let processor = match ContractProcessor::from_config(EngineConfig::from_env()) {
        Ok(processor) => processor,
        Err(e) => {
            tracing::error!(error = %e, "Failed to initialize oracle client");
            return ExitCode::FAILURE;
        }
    };

    let contract_id = Path::new(&path)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("contract")
        .to_string();

    let store = InMemoryJobStore::new();
    if let Err(e) = store.create(&contract_id) {
        tracing::error!(error = %e, "Failed to register job");
        return ExitCode::FAILURE;
    }

    match processor.process_contract(&contract_id, &text, &store).await {
        Ok(record) => {
            println!("{}", record.to_json_pretty());
            if record.status == contract_intel::JobStatus::Completed {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Err(e) => {
            tracing::error!(error = %e, "Job store failure");
            ExitCode::FAILURE
        }
    }
}
