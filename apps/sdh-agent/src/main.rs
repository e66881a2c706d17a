use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = sdh_agent::Args::parse();

	sdh_agent::run(args).await
}
