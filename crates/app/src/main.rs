use std::path::Path;

use anyhow::{bail, Context};
use moneta_categorize::{CategorizationEngine, HttpClassifier};
use moneta_pipeline::{IngestPipeline, MemoryStore, PdftotextExtractor, UploadedFile};
use serde_json::json;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "moneta=info".into()),
        )
        .init();

    let paths: Vec<String> = std::env::args().skip(1).collect();
    if paths.is_empty() {
        bail!("usage: moneta <statement.csv|statement.pdf>...");
    }

    let mut files = Vec::with_capacity(paths.len());
    for path in &paths {
        let bytes = std::fs::read(path).with_context(|| format!("reading {path}"))?;
        let filename = Path::new(path)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(path)
            .to_string();
        files.push(UploadedFile { filename, content_type: None, bytes });
    }

    // The classifier endpoint is optional; without it everything runs
    // through the keyword rules.
    let classifier = HttpClassifier::new(std::env::var("MONETA_CLASSIFIER_URL").ok());
    let pipeline = IngestPipeline::new(
        CategorizationEngine::new(classifier),
        PdftotextExtractor,
        MemoryStore::new(),
    );

    let outcome = pipeline.process_batch(files).await?;

    for report in &outcome.files {
        match &report.error {
            Some(e) => tracing::warn!(file = %report.filename, "rejected: {e}"),
            None => tracing::info!(
                file = %report.filename,
                accepted = report.accepted,
                skipped = report.row_errors.len(),
                "parsed"
            ),
        }
        for row_error in &report.row_errors {
            tracing::debug!(file = %report.filename, "{row_error}");
        }
    }

    let summary = json!({
        "transactions": outcome.transactions,
        "total_amount": outcome.total_amount,
        "date_range": outcome.date_range.map(|r| r.to_string()),
        "category_counts": outcome.category_counts,
        "files": outcome.files.iter().map(|f| json!({
            "filename": f.filename,
            "accepted": f.accepted,
            "row_errors": f.row_errors,
            "error": f.error,
            "persist_error": f.persist_error,
        })).collect::<Vec<_>>(),
    });

    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
