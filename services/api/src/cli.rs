use crate::demo::{run_bulk, run_demo, run_predict, BulkArgs, DemoArgs, PredictArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use claimwatch::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "ClaimWatch",
    about = "Score insurance claims and job postings for fraud risk",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Score a single claim given as JSON
    Predict(PredictArgs),
    /// Score every row of an insurance claims CSV
    Bulk(BulkArgs),
    /// Walk through sample claims with the configured models
    Demo(DemoArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Predict(args) => run_predict(args),
        Command::Bulk(args) => run_bulk(args),
        Command::Demo(args) => run_demo(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_serve_without_subcommand() {
        let cli = Cli::try_parse_from(["claimwatch"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn parses_predict_and_bulk_arguments() {
        let cli = Cli::try_parse_from([
            "claimwatch",
            "predict",
            "--json",
            r#"{"fraud_type":"job_fraud","job_text":"hi"}"#,
        ])
        .expect("parses");
        match cli.command {
            Some(Command::Predict(args)) => assert!(args.json.is_some()),
            other => panic!("expected predict command, got {other:?}"),
        }

        let cli =
            Cli::try_parse_from(["claimwatch", "bulk", "--csv", "claims.csv"]).expect("parses");
        match cli.command {
            Some(Command::Bulk(args)) => assert_eq!(args.csv.to_str(), Some("claims.csv")),
            other => panic!("expected bulk command, got {other:?}"),
        }
    }

    #[test]
    fn predict_rejects_both_inline_and_file_input() {
        let result = Cli::try_parse_from([
            "claimwatch",
            "predict",
            "--json",
            "{}",
            "--file",
            "claim.json",
        ]);
        assert!(result.is_err());
    }
}
