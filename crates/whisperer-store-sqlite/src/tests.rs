//! Integration tests for `SqliteStore` against in-memory and file databases.

use std::{fs, path::Path};

use whisperer_core::{
  relation::RELATIONS,
  store::DataStore,
  table::{ColumnKind, Value},
};

use crate::{Error, SqliteStore, TableSource};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

// ─── Fixtures ────────────────────────────────────────────────────────────────

const AD_SALES_CSV: &str = "\
date,item_id,ad_sales,impressions,ad_spend,clicks,units_sold
2025-06-01,0,332.96,1963,65.1,8,3
2025-06-01,1,0,382,2.31,1,0
2025-06-02,0,120.5,800,20.0,4,1
";

const TOTAL_SALES_CSV: &str = "\
date,item_id,total_sales,total_units_ordered
2025-06-01,0,309.99,1
2025-06-01,1,0,0
";

const ELIGIBILITY_CSV: &str = "\
eligibility_datetime_utc,item_id,eligibility,message
2025-06-04 08:50:07+00:00,29,FALSE,\"This product's cost to Amazon does not allow us to meet customers' pricing expectations.\"
2025-06-04 08:50:07+00:00,270,TRUE,
";

fn write_fixtures(dir: &Path) -> Vec<TableSource> {
  let files = [
    ("ad_sales", "ad_sales.csv", AD_SALES_CSV),
    ("total_sales", "total_sales.csv", TOTAL_SALES_CSV),
    ("eligibility", "eligibility.csv", ELIGIBILITY_CSV),
  ];
  files
    .into_iter()
    .map(|(table, file, contents)| {
      let path = dir.join(file);
      fs::write(&path, contents).expect("write fixture");
      TableSource::new(table, path)
    })
    .collect()
}

// ─── Loading + introspection ─────────────────────────────────────────────────

#[tokio::test]
async fn load_then_introspect_yields_the_three_relations() {
  let dir = tempfile::tempdir().unwrap();
  let s = store().await;

  let report = s.load(&write_fixtures(dir.path())).await.unwrap();
  let rows: Vec<_> = report.iter().map(|t| (t.table.as_str(), t.rows)).collect();
  assert_eq!(rows, vec![("ad_sales", 3), ("total_sales", 2), ("eligibility", 2)]);

  let schema = s.schema().await.unwrap();
  assert_eq!(schema.len(), 3);
  for (table, relation) in schema.iter().zip(RELATIONS) {
    assert_eq!(table.name, relation.name);
    assert_eq!(table.column_names(), relation.columns);
  }
}

#[tokio::test]
async fn declared_types_follow_the_data() {
  let dir = tempfile::tempdir().unwrap();
  let s = store().await;
  s.load(&write_fixtures(dir.path())).await.unwrap();

  let schema = s.schema().await.unwrap();
  let ad_sales = &schema[0];
  let types: Vec<_> = ad_sales
    .columns
    .iter()
    .map(|c| (c.name.as_str(), c.declared_type.as_str()))
    .collect();
  assert_eq!(
    types,
    vec![
      ("date", "TEXT"),
      ("item_id", "INTEGER"),
      ("ad_sales", "REAL"),
      ("impressions", "INTEGER"),
      ("ad_spend", "REAL"),
      ("clicks", "INTEGER"),
      ("units_sold", "INTEGER"),
    ]
  );
}

#[tokio::test]
async fn reload_replaces_previous_contents() {
  let dir = tempfile::tempdir().unwrap();
  let s = store().await;
  let sources = write_fixtures(dir.path());

  s.load(&sources).await.unwrap();
  s.load(&sources).await.unwrap();

  let count = s.execute("SELECT COUNT(*) AS n FROM ad_sales;").await.unwrap();
  assert_eq!(count.rows, vec![vec![Value::Integer(3)]]);
  assert_eq!(s.schema().await.unwrap().len(), 3);
}

#[tokio::test]
async fn load_preserves_row_order_and_nulls() {
  let dir = tempfile::tempdir().unwrap();
  let s = store().await;
  s.load(&write_fixtures(dir.path())).await.unwrap();

  let t = s
    .execute("SELECT item_id, eligibility, message FROM eligibility")
    .await
    .unwrap();
  assert_eq!(t.rows[0][0], Value::Integer(29));
  assert_eq!(t.rows[0][1], Value::Text("FALSE".into()));
  assert!(matches!(&t.rows[0][2], Value::Text(m) if m.starts_with("This product's cost")));
  assert_eq!(t.rows[1][0], Value::Integer(270));
  assert_eq!(t.rows[1][2], Value::Null);
}

#[tokio::test]
async fn missing_source_file_is_an_error_and_writes_nothing() {
  let dir = tempfile::tempdir().unwrap();
  let s = store().await;
  let mut sources = write_fixtures(dir.path());
  sources[2].path = dir.path().join("does-not-exist.csv");

  let err = s.load(&sources).await.unwrap_err();
  assert!(matches!(err, Error::Csv { .. }), "got {err:?}");
  assert!(s.schema().await.unwrap().is_empty());
}

#[tokio::test]
async fn ragged_source_file_is_an_error() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("bad.csv");
  fs::write(&path, "date,item_id\n2025-06-01,1,extra\n").unwrap();

  let s = store().await;
  let err = s.load(&[TableSource::new("total_sales", path)]).await.unwrap_err();
  assert!(matches!(err, Error::Csv { .. }), "got {err:?}");
}

#[tokio::test]
async fn file_store_reopens_per_operation() {
  let dir = tempfile::tempdir().unwrap();
  let db = dir.path().join("ecommerce.db");
  let s = SqliteStore::at(&db);
  assert_eq!(s.path(), Some(db.as_path()));

  s.load(&write_fixtures(dir.path())).await.unwrap();
  assert!(db.exists());

  let reopened = SqliteStore::at(&db);
  assert_eq!(reopened.schema().await.unwrap().len(), 3);
  let t = reopened
    .execute("SELECT SUM(total_sales.total_sales) AS total_sales FROM total_sales;")
    .await
    .unwrap();
  assert_eq!(t.rows, vec![vec![Value::Real(309.99)]]);
}

// ─── Execution ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn select_one_yields_single_cell() {
  let s = store().await;
  assert!(s.path().is_none());
  let t = s.execute("SELECT 1 AS x;").await.unwrap();
  assert_eq!(t.column_count(), 1);
  assert_eq!(t.columns[0].name, "x");
  assert_eq!(t.columns[0].kind, ColumnKind::Numeric);
  assert_eq!(t.rows, vec![vec![Value::Integer(1)]]);
}

#[tokio::test]
async fn syntax_error_is_a_query_error() {
  let s = store().await;
  let err = s.execute("SELEC 1;").await.unwrap_err();
  assert!(matches!(err, Error::Query(_)), "got {err:?}");
  assert!(err.to_string().contains("syntax error"));
}

#[tokio::test]
async fn missing_relation_is_a_query_error() {
  let s = store().await;
  let err = s.execute("SELECT * FROM nowhere").await.unwrap_err();
  assert!(err.to_string().contains("no such table"));
}

#[tokio::test]
async fn statement_without_rows_is_reported() {
  let s = store().await;
  let err = s.execute("CREATE TABLE scratch (a INTEGER)").await.unwrap_err();
  assert!(matches!(err, Error::NoResultSet));
  // The statement still ran.
  let schema = s.schema().await.unwrap();
  assert_eq!(schema[0].name, "scratch");
}

#[tokio::test]
async fn blank_or_comment_only_sql_is_reported() {
  let s = store().await;
  for sql in ["", "   \n", "-- just a comment", ";"] {
    let err = s.execute(sql).await.unwrap_err();
    assert!(matches!(err, Error::EmptyStatement), "{sql:?}: got {err:?}");
    assert_eq!(err.to_string(), "no SQL to run");
  }
}

#[tokio::test]
async fn trailing_statements_are_rejected_and_nothing_runs() {
  let dir = tempfile::tempdir().unwrap();
  let s = store().await;
  s.load(&write_fixtures(dir.path())).await.unwrap();

  for sql in [
    "SELECT 1 AS x; DELETE FROM ad_sales; garbage words here",
    "SELECT 1 AS x;\nThis query returns one.",
    "DELETE FROM ad_sales; SELECT 1",
  ] {
    let err = s.execute(sql).await.unwrap_err();
    assert!(matches!(err, Error::MultipleStatements), "{sql:?}: got {err:?}");
  }

  let t = s.execute("SELECT COUNT(*) AS n FROM ad_sales").await.unwrap();
  assert_eq!(t.rows, vec![vec![Value::Integer(3)]]);
}

#[tokio::test]
async fn trailing_semicolons_and_comments_are_fine() {
  let s = store().await;
  let t = s.execute("SELECT 1 AS x;;  -- one row\n").await.unwrap();
  assert_eq!(t.rows, vec![vec![Value::Integer(1)]]);
}

#[tokio::test]
async fn unexpected_header_still_loads_with_file_columns() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("total_sales.csv");
  fs::write(&path, "day,sku,revenue\n2025-06-01,7,12.5\n").unwrap();

  let s = store().await;
  let report = s.load(&[TableSource::new("total_sales", path)]).await.unwrap();
  assert_eq!(report[0].rows, 1);

  let schema = s.schema().await.unwrap();
  assert_eq!(schema[0].name, "total_sales");
  assert_eq!(schema[0].column_names(), vec!["day", "sku", "revenue"]);
  let t = s.execute("SELECT revenue FROM total_sales").await.unwrap();
  assert_eq!(t.rows, vec![vec![Value::Real(12.5)]]);
}

#[tokio::test]
async fn non_finite_numbers_keep_the_column_as_text() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("odd.csv");
  fs::write(&path, "item_id,roas\n1,2.5\n2,NaN\n3,inf\n").unwrap();

  let s = store().await;
  s.load(&[TableSource::new("odd", path)]).await.unwrap();

  let schema = s.schema().await.unwrap();
  assert_eq!(schema[0].columns[1].declared_type, "TEXT");
  let t = s.execute("SELECT roas FROM odd").await.unwrap();
  assert_eq!(
    t.rows,
    vec![
      vec![Value::Text("2.5".into())],
      vec![Value::Text("NaN".into())],
      vec![Value::Text("inf".into())],
    ]
  );
}

#[tokio::test]
async fn worked_example_runs_against_loaded_data() {
  let dir = tempfile::tempdir().unwrap();
  let s = store().await;
  s.load(&write_fixtures(dir.path())).await.unwrap();

  let t = s
    .execute(
      "SELECT ad_sales.item_id, SUM(ad_sales.clicks) * 1.0 / SUM(ad_sales.impressions) AS ctr \
       FROM ad_sales WHERE ad_sales.impressions > 0 GROUP BY ad_sales.item_id;",
    )
    .await
    .unwrap();
  assert_eq!(t.kinds(), vec![ColumnKind::Numeric, ColumnKind::Numeric]);
  assert_eq!(t.row_count(), 2);
  assert_eq!(t.rows[1][0], Value::Integer(1));
}
