use serde_json::json;
use time::OffsetDateTime;
use uuid::Uuid;

use advisor_config::Postgres;
use advisor_storage::{
	db::Db,
	models::{RecommendationRunRow, RunEventRow, SuitabilityProfileRow},
	queries,
};
use advisor_testkit::TestDatabase;

async fn bootstrap(test_db: &TestDatabase) -> Db {
	let cfg = Postgres { dsn: test_db.dsn().to_string(), pool_max_conns: 1 };
	let db = Db::connect(&cfg).await.expect("Failed to connect to Postgres.");

	db.ensure_schema().await.expect("Failed to ensure schema.");

	db
}

async fn seed_client(db: &Db, account: &str) {
	sqlx::query(
		"INSERT INTO clients (client_account_number, client_name, external_customer_id) VALUES ($1, $2, $3)",
	)
	.bind(account)
	.bind("Avery Client")
	.bind("CUST-9")
	.execute(&db.pool)
	.await
	.expect("Failed to seed client.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set ADVISOR_PG_DSN to run."]
async fn schema_bootstrap_is_repeatable() {
	let Some(base_dsn) = advisor_testkit::env_dsn() else {
		eprintln!("Skipping schema_bootstrap_is_repeatable; set ADVISOR_PG_DSN to run this test.");

		return;
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let db = bootstrap(&test_db).await;

	db.ensure_schema().await.expect("Second bootstrap should be a no-op.");

	let count: i64 = sqlx::query_scalar(
		"SELECT count(*) FROM information_schema.tables WHERE table_name = 'agent_run_events'",
	)
	.fetch_one(&db.pool)
	.await
	.expect("Failed to query schema tables.");

	assert_eq!(count, 1);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set ADVISOR_PG_DSN to run."]
async fn suitability_upsert_is_last_write_wins() {
	let Some(base_dsn) = advisor_testkit::env_dsn() else {
		eprintln!(
			"Skipping suitability_upsert_is_last_write_wins; set ADVISOR_PG_DSN to run this test."
		);

		return;
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let db = bootstrap(&test_db).await;

	seed_client(&db, "ACCT-1").await;

	let mut row = SuitabilityProfileRow {
		client_account_number: "ACCT-1".to_string(),
		risk_tolerance: Some("conservative".to_string()),
		age: Some(64),
		..Default::default()
	};

	queries::upsert_client_suitability_profile(&db, &row).await.expect("First upsert failed.");

	row.risk_tolerance = Some("moderate".to_string());

	queries::upsert_client_suitability_profile(&db, &row).await.expect("Second upsert failed.");

	let stored = queries::fetch_suitability_profile(&db, "ACCT-1")
		.await
		.expect("Failed to fetch profile.")
		.expect("Profile should exist.");

	assert_eq!(stored, row);

	let count: i64 = sqlx::query_scalar("SELECT count(*) FROM client_suitability_profiles")
		.fetch_one(&db.pool)
		.await
		.expect("Failed to count profiles.");

	assert_eq!(count, 1);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set ADVISOR_PG_DSN to run."]
async fn run_event_and_payload_round_trip() {
	let Some(base_dsn) = advisor_testkit::env_dsn() else {
		eprintln!("Skipping run_event_and_payload_round_trip; set ADVISOR_PG_DSN to run this test.");

		return;
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let db = bootstrap(&test_db).await;
	let run_id = Uuid::new_v4();
	let payload_id = Uuid::new_v4();
	let now = OffsetDateTime::now_utc();

	queries::insert_recommendation_run(
		&db,
		&RecommendationRunRow {
			id: payload_id,
			run_id,
			created_at: now,
			client_id: "ACCT-2".to_string(),
			payload: json!({ "recommendations": [] }),
		},
	)
	.await
	.expect("Failed to insert payload.");
	queries::insert_run_event(
		&db,
		&RunEventRow {
			event_id: Uuid::new_v4(),
			occurred_at: now,
			agent_id: "agent_two".to_string(),
			run_id,
			client_id_scope: "scope".to_string(),
			input_summary: json!({ "sectionsPresent": ["suitability"] }),
			success: true,
			error_message: None,
			explanation_summary: Some("summary".to_string()),
			data_sources_used: vec!["store_products".to_string()],
			choice_criteria: vec!["rate".to_string()],
			input_validation_passed: true,
			guardrail_triggered: false,
			payload_ref: Some(payload_id),
		},
	)
	.await
	.expect("Failed to insert event.");

	let events = queries::fetch_run_events(&db, run_id).await.expect("Failed to fetch events.");

	assert_eq!(events.len(), 1);
	assert_eq!(events[0].payload_ref, Some(payload_id));
	assert_eq!(events[0].choice_criteria, vec!["rate".to_string()]);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set ADVISOR_PG_DSN to run."]
async fn unknown_client_is_absent_and_products_filter_unsellable() {
	let Some(base_dsn) = advisor_testkit::env_dsn() else {
		eprintln!(
			"Skipping unknown_client_is_absent_and_products_filter_unsellable; set ADVISOR_PG_DSN to run this test."
		);

		return;
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let db = bootstrap(&test_db).await;

	seed_client(&db, "ACCT-3").await;

	assert!(queries::fetch_client(&db, "ACCT").await.expect("Lookup failed.").is_none());
	assert!(queries::fetch_client(&db, "ACCT-3").await.expect("Lookup failed.").is_some());

	for (id, can_sell) in [("P-1", true), ("P-2", false)] {
		sqlx::query(
			"INSERT INTO products (product_id, carrier, product_name, current_fixed_rate, can_sell) VALUES ($1, 'Carrier', 'Fixed', 4.0, $2)",
		)
		.bind(id)
		.bind(can_sell)
		.execute(&db.pool)
		.await
		.expect("Failed to seed product.");
	}

	let products = queries::fetch_products(&db).await.expect("Failed to fetch products.");

	assert_eq!(products.len(), 1);
	assert_eq!(products[0].product_id, "P-1");

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}
