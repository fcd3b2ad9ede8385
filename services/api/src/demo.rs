use crate::infra::{build_router, build_service};
use clap::Args;
use claimwatch::config::AppConfig;
use claimwatch::error::AppError;
use claimwatch::risk::{
    BulkOutcome, ClaimInput, PredictionDetail, PredictionResult, PredictionRouter,
};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct PredictArgs {
    /// Claim payload as inline JSON
    #[arg(long, conflicts_with = "file")]
    pub(crate) json: Option<String>,
    /// Path to a JSON file holding the claim payload
    #[arg(long)]
    pub(crate) file: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct BulkArgs {
    /// Insurance claims CSV export
    #[arg(long)]
    pub(crate) csv: PathBuf,
    /// Print the full JSON batch instead of one line per row
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Model artifact JSON to use instead of the configured one
    #[arg(long)]
    pub(crate) artifacts: Option<PathBuf>,
}

pub(crate) fn run_predict(args: PredictArgs) -> Result<(), AppError> {
    let payload = match (args.json, args.file) {
        (Some(json), _) => json,
        (None, Some(path)) => std::fs::read_to_string(path)?,
        (None, None) => {
            return Err(AppError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "provide a claim with --json or --file",
            )))
        }
    };

    let claim: ClaimInput = serde_json::from_str(&payload)?;
    let config = AppConfig::load()?;
    let router = build_router(&config)?;
    let result = router.dispatch(&claim)?;

    let rendered = serde_json::to_string_pretty(&result)?;
    println!("{rendered}");
    Ok(())
}

pub(crate) fn run_bulk(args: BulkArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let service = build_service(&config)?;
    let file = std::fs::File::open(&args.csv)?;
    let batch = service.predict_bulk(file)?;

    if args.json {
        let rendered = serde_json::to_string_pretty(&batch)?;
        println!("{rendered}");
        return Ok(());
    }

    println!(
        "Scored {} of {} claims from {}",
        batch.scored(),
        batch.rows.len(),
        args.csv.display()
    );
    if !batch.missing_features.is_empty() {
        let missing: Vec<&str> = batch
            .missing_features
            .iter()
            .map(|feature| feature.name())
            .collect();
        println!("Columns not found (filled with 0): {}", missing.join(", "));
    }
    for row in &batch.rows {
        match &row.outcome {
            BulkOutcome::Scored { prediction } => println!(
                "- row {}: {} risk {:.2} | {}",
                row.row,
                prediction.risk_tier.label(),
                prediction.decision_risk(),
                prediction.fraud_persona
            ),
            BulkOutcome::Failed { error } => println!("- row {}: failed ({error})", row.row),
        }
    }
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;
    if let Some(path) = args.artifacts {
        config.models.artifacts_path = Some(path);
    }
    let router = build_router(&config)?;

    println!(
        "ClaimWatch demo ({} fusion, alpha {:.2})",
        config.fusion.method.name(),
        config.fusion.alpha
    );
    for (title, claim) in sample_claims() {
        println!("\n{title}");
        render_prediction(&router, &claim);
    }
    Ok(())
}

fn sample_claims() -> Vec<(&'static str, ClaimInput)> {
    vec![
        (
            "Routine auto claim on a long-standing policy",
            ClaimInput::insurance(3_800.0, 1_460.0, 0.0, 47.0),
        ),
        (
            "Large claim three weeks after the policy started",
            ClaimInput::insurance(30_000.0, 20.0, 0.0, 40.0),
        ),
        (
            "Policyholder with five earlier claims",
            ClaimInput::insurance(18_500.0, 700.0, 5.0, 33.0),
        ),
        (
            "Job posting asking for an upfront fee",
            ClaimInput::job_posting(
                "URGENT! Work from home, no experience needed. Pay the upfront fee by wire transfer and start today. Contact us on WhatsApp.",
            ),
        ),
        (
            "Job posting for an onsite engineering role",
            ClaimInput::job_posting(
                "Our platform team is hiring a backend engineer for the Denver office. Degree in CS preferred; salary, benefits and a two-stage interview.",
            ),
        ),
    ]
}

fn render_prediction(router: &PredictionRouter, claim: &ClaimInput) {
    match router.dispatch(claim) {
        Ok(result) => print_result(&result),
        Err(err) => println!("  could not score claim: {err}"),
    }
}

fn print_result(result: &PredictionResult) {
    println!(
        "  {} | risk {:.2} | trust {:.2} | anomaly {:.1}/10",
        result.risk_tier.label(),
        result.decision_risk(),
        result.trust_score,
        result.anomaly_score()
    );
    println!("  Persona: {}", result.fraud_persona);
    match &result.detail {
        PredictionDetail::Tabular(detail) => {
            for attribution in detail.top_features.iter().take(3) {
                println!(
                    "    {:<20} value {:>10.1} | contribution {:+.3}",
                    attribution.feature, attribution.value, attribution.shap_value
                );
            }
        }
        PredictionDetail::Text(detail) => {
            let terms: Vec<&str> = detail
                .important_keywords
                .iter()
                .take(5)
                .map(|keyword| keyword.keyword.as_str())
                .collect();
            if !terms.is_empty() {
                println!("    Terms: {}", terms.join(", "));
            }
        }
    }
    println!("  {}", result.summary);
    for action in &result.recommended_actions {
        println!("    - {action}");
    }
}
