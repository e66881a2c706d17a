use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use sdh_service::{Providers, SdhService};

#[derive(Debug, Parser)]
#[command(
	version = sdh_cli::VERSION,
	rename_all = "kebab",
	styles = sdh_cli::styles(),
	about = "Finds resolved SDH issues similar to a ticket and drafts a findings report."
)]
pub struct Args {
	#[arg(long, short = 'c', value_name = "FILE")]
	pub config: PathBuf,
	/// Number of the SDH issue to analyze.
	#[arg(value_name = "ISSUE_NUMBER")]
	pub issue: u64,
	/// Post the report as a comment on the issue.
	#[arg(long)]
	pub post: bool,
}

pub async fn run(args: Args) -> color_eyre::Result<()> {
	let config = sdh_config::load(&args.config)?;

	init_tracing(&config)?;

	tracing::info!(
		owner = %config.github.owner,
		repo = %config.github.repo,
		ticket = args.issue,
		"Starting analysis."
	);

	let providers = Providers::from_config(&config)?;
	let service = SdhService::new(config, providers);
	let report = service.process_ticket(args.issue).await?;

	println!("{}", sdh_cli::framed_report(&report));

	if args.post {
		service.post_report(args.issue, &report).await?;
	}

	Ok(())
}

fn init_tracing(config: &sdh_config::Config) -> color_eyre::Result<()> {
	let filter =
		EnvFilter::try_new(&config.service.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

	tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

	Ok(())
}
