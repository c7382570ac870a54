use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = advisor_api::Args::parse();

	advisor_api::run(args).await
}
