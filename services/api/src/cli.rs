use crate::demo::{
    run_demo, run_emi, run_evaluate, run_lenders, DemoArgs, EmiArgs, EvaluateArgs, LenderArgs,
};
use crate::server;
use clap::{Args, Parser, Subcommand};
use loan_eligibility::error::AppError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "Loan Eligibility Engine",
    about = "Evaluate retail loan applications and serve the eligibility API",
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
    /// Evaluate one application read from a JSON file and print the decision
    Evaluate(EvaluateArgs),
    /// List lenders whose published criteria admit a query read from a JSON file
    Lenders(LenderArgs),
    /// Quote the monthly installment for a principal, rate, and term
    Emi(EmiArgs),
    /// Run one sample application per loan category and print a summary
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
    /// JSON policy book replacing the standard category tables
    #[arg(long)]
    pub(crate) policy: Option<PathBuf>,
    /// CSV lender catalog replacing the seeded lender rules
    #[arg(long)]
    pub(crate) lenders: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Evaluate(args) => run_evaluate(args),
        Command::Lenders(args) => run_lenders(args),
        Command::Emi(args) => run_emi(args),
        Command::Demo(args) => run_demo(args),
    }
}
