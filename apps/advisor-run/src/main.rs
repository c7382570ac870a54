use clap::Parser;

use advisor_run::Args;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = Args::parse();

	advisor_run::run(args).await
}
