//! One-shot recommendation runs from the command line, printing JSON to stdout.

use std::{
	fs,
	path::{Path, PathBuf},
};

use clap::Parser;
use color_eyre::eyre::{self, WrapErr};
use serde_json::Value;

use advisor_service::{AdvisorService, RecommendationRequest};
use advisor_storage::db::Db;

#[derive(Debug, Parser)]
#[command(
	version = advisor_cli::VERSION,
	rename_all = "kebab",
	styles = advisor_cli::styles(),
)]
pub struct Args {
	#[arg(long, short = 'c', value_name = "FILE")]
	pub config: PathBuf,
	#[arg(long, value_name = "ID")]
	pub client_id: String,
	/// JSON change set. Omit to run on stored and external data only.
	#[arg(long, value_name = "FILE", conflicts_with = "context_only")]
	pub changes: Option<PathBuf>,
	#[arg(long, value_name = "ID", conflicts_with = "context_only")]
	pub alert_id: Option<String>,
	/// Print the aggregated client context without running the pipeline.
	#[arg(long)]
	pub context_only: bool,
	/// Write the JSON report here instead of stdout.
	#[arg(long, short = 'o', value_name = "FILE")]
	pub out: Option<PathBuf>,
}

pub async fn run(args: Args) -> color_eyre::Result<()> {
	let config = advisor_config::load(&args.config)?;

	advisor_cli::init_tracing(&config.service.log_level);

	let changes = read_changes(args.changes.as_deref())?;
	let db = Db::connect(&config.storage.postgres).await?;

	db.ensure_schema().await?;

	let service = AdvisorService::new(config, db)?;
	let report = if args.context_only {
		serde_json::to_value(service.get_current_database_context(&args.client_id).await?)?
	} else {
		let output = service
			.generate_product_recommendations(RecommendationRequest {
				changes,
				client_id: args.client_id.clone(),
				alert_id: args.alert_id.clone(),
			})
			.await?;

		tracing::info!(
			run_id = %output.run_id,
			recommendations = output.recommendations.len(),
			"Run complete."
		);

		serde_json::to_value(output)?
	};
	let rendered = serde_json::to_string_pretty(&report)?;

	match args.out.as_deref() {
		Some(path) => fs::write(path, rendered)
			.wrap_err_with(|| format!("Failed to write report to {}.", path.display()))?,
		None => println!("{rendered}"),
	}

	Ok(())
}

/// Reads the change set file. No file means an empty change set.
pub fn read_changes(path: Option<&Path>) -> color_eyre::Result<Value> {
	let Some(path) = path else {
		return Ok(Value::Object(Default::default()));
	};
	let raw = fs::read_to_string(path)
		.wrap_err_with(|| format!("Failed to read changes from {}.", path.display()))?;
	let changes: Value = serde_json::from_str(&raw)
		.wrap_err_with(|| format!("Failed to parse changes in {}.", path.display()))?;

	if !changes.is_object() {
		return Err(eyre::eyre!("Changes in {} must be a JSON object.", path.display()));
	}

	Ok(changes)
}
