pub fn render_schema() -> String {
	expand_includes(include_str!("../../../sql/init.sql"))
}

fn expand_includes(sql: &str) -> String {
	let mut out = String::new();

	for line in sql.lines() {
		let trimmed = line.trim();

		if let Some(path) = trimmed.strip_prefix("\\ir ") {
			match path.trim() {
				"tables/001_clients.sql" =>
					out.push_str(include_str!("../../../sql/tables/001_clients.sql")),
				"tables/002_client_suitability_profiles.sql" => out.push_str(include_str!(
					"../../../sql/tables/002_client_suitability_profiles.sql"
				)),
				"tables/003_contract_summary.sql" =>
					out.push_str(include_str!("../../../sql/tables/003_contract_summary.sql")),
				"tables/004_products.sql" =>
					out.push_str(include_str!("../../../sql/tables/004_products.sql")),
				"tables/005_agent_run_events.sql" =>
					out.push_str(include_str!("../../../sql/tables/005_agent_run_events.sql")),
				"tables/006_agent_two_recommendation_runs.sql" => out.push_str(include_str!(
					"../../../sql/tables/006_agent_two_recommendation_runs.sql"
				)),
				_ => out.push_str(line),
			}
		} else {
			out.push_str(line);
		}

		out.push('\n');
	}

	out
}
