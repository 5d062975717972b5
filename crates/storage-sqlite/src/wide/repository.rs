//! Wide-column store emulation over SQLite.
//!
//! Backs the two store-shaped collaborators of the engine: the source
//! reader (business record tables) and the shared profile store. Rows are
//! cells keyed by (table, family, row key, qualifier); each row additionally
//! carries a version so profile writes can be conditional.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::r2d2::{self, Pool};
use diesel::SqliteConnection;

use tagmill_core::errors::{SourceError, StoreError};
use tagmill_core::profiles::{ProfilePut, ProfileStoreTrait, VersionedRow, WriteOutcome};
use tagmill_core::rules::SourceDescriptor;
use tagmill_core::source::{SourceReaderTrait, SourceRow, SourceRows};
use tagmill_core::Result;

use super::model::{WideCellDB, WideRowDB};
use crate::db::{get_connection, WriteHandle};
use crate::errors::StorageError;
use crate::schema::{wide_cells, wide_rows, wide_tables};

pub struct WideColumnRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl WideColumnRepository {
    pub fn new(
        pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
        writer: WriteHandle,
    ) -> Self {
        Self { pool, writer }
    }

    fn is_registered(
        conn: &mut SqliteConnection,
        table: &str,
        family: &str,
    ) -> QueryResult<bool> {
        wide_tables::table
            .find((table, family))
            .first::<(String, String)>(conn)
            .optional()
            .map(|found| found.is_some())
    }

    /// Declare a (table, family) pair to exist. Source tables must be
    /// registered before a model can read them.
    pub async fn register_table(&self, table: &str, family: &str) -> Result<()> {
        let table = table.to_string();
        let family = family.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<()> {
                diesel::insert_or_ignore_into(wide_tables::table)
                    .values((
                        wide_tables::table_name.eq(&table),
                        wide_tables::family.eq(&family),
                    ))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(())
            })
            .await
    }

    /// Unconditional upsert of one row's cells, registering the table on
    /// the way. Used to load business records, not by the merge path.
    pub async fn put_row(
        &self,
        table: &str,
        family: &str,
        row_key: &str,
        cells: HashMap<String, Option<String>>,
    ) -> Result<()> {
        let table = table.to_string();
        let family = family.to_string();
        let row_key = row_key.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<()> {
                diesel::insert_or_ignore_into(wide_tables::table)
                    .values((
                        wide_tables::table_name.eq(&table),
                        wide_tables::family.eq(&family),
                    ))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                diesel::insert_or_ignore_into(wide_rows::table)
                    .values(WideRowDB {
                        table_name: table.clone(),
                        family: family.clone(),
                        row_key: row_key.clone(),
                        version: 1,
                    })
                    .execute(conn)
                    .map_err(StorageError::from)?;
                for (qualifier, value) in cells {
                    diesel::replace_into(wide_cells::table)
                        .values(WideCellDB {
                            table_name: table.clone(),
                            family: family.clone(),
                            row_key: row_key.clone(),
                            qualifier,
                            value,
                        })
                        .execute(conn)
                        .map_err(StorageError::from)?;
                }
                Ok(())
            })
            .await
    }
}

impl SourceReaderTrait for WideColumnRepository {
    fn read(&self, descriptor: &SourceDescriptor) -> Result<SourceRows> {
        let mut conn = get_connection(&self.pool)
            .map_err(|e| SourceError::ReadFailed(e.to_string()))?;

        let registered = Self::is_registered(&mut conn, &descriptor.table, &descriptor.family)
            .map_err(|e| SourceError::ReadFailed(e.to_string()))?;
        if !registered {
            return Err(SourceError::TableMissing {
                table: descriptor.table.clone(),
                family: descriptor.family.clone(),
            }
            .into());
        }

        let cells = wide_cells::table
            .filter(wide_cells::table_name.eq(&descriptor.table))
            .filter(wide_cells::family.eq(&descriptor.family))
            .order((wide_cells::row_key.asc(), wide_cells::qualifier.asc()))
            .load::<WideCellDB>(&mut conn)
            .map_err(|e| SourceError::ReadFailed(e.to_string()))?;

        // Row-key order keeps re-reads of an unchanged table identical.
        let mut grouped: BTreeMap<String, HashMap<String, Option<String>>> = BTreeMap::new();
        for cell in cells {
            grouped
                .entry(cell.row_key)
                .or_default()
                .insert(cell.qualifier, cell.value);
        }

        let filters = descriptor.filters.clone();
        let select_columns = descriptor.select_columns.clone();
        let rows: Vec<SourceRow> = grouped
            .into_values()
            .filter(|cells| {
                filters.iter().all(|f| {
                    cells.get(&f.column).and_then(|v| v.as_deref()) == Some(f.value.as_str())
                })
            })
            .map(|cells| {
                select_columns
                    .iter()
                    .map(|column| (column.clone(), cells.get(column).cloned().flatten()))
                    .collect::<SourceRow>()
            })
            .collect();

        Ok(Box::new(rows.into_iter()))
    }
}

#[async_trait]
impl ProfileStoreTrait for WideColumnRepository {
    fn scan(&self, table: &str, family: &str) -> Result<HashMap<String, VersionedRow>> {
        let mut conn =
            get_connection(&self.pool).map_err(|e| StoreError::ScanFailed(e.to_string()))?;

        // A profile table nobody has written yet is an empty store, not an
        // error: the first model run ever starts from nothing.
        let registered = Self::is_registered(&mut conn, table, family)
            .map_err(|e| StoreError::ScanFailed(e.to_string()))?;
        if !registered {
            return Ok(HashMap::new());
        }

        let versions = wide_rows::table
            .filter(wide_rows::table_name.eq(table))
            .filter(wide_rows::family.eq(family))
            .load::<WideRowDB>(&mut conn)
            .map_err(|e| StoreError::ScanFailed(e.to_string()))?;

        let mut snapshot: HashMap<String, VersionedRow> = versions
            .into_iter()
            .map(|row| {
                (
                    row.row_key,
                    VersionedRow {
                        version: row.version,
                        cells: HashMap::new(),
                    },
                )
            })
            .collect();

        let cells = wide_cells::table
            .filter(wide_cells::table_name.eq(table))
            .filter(wide_cells::family.eq(family))
            .load::<WideCellDB>(&mut conn)
            .map_err(|e| StoreError::ScanFailed(e.to_string()))?;

        for cell in cells {
            if let Some(value) = cell.value {
                snapshot
                    .entry(cell.row_key)
                    .or_default()
                    .cells
                    .insert(cell.qualifier, value);
            }
        }

        Ok(snapshot)
    }

    async fn write_checked(
        &self,
        table: &str,
        family: &str,
        puts: Vec<ProfilePut>,
    ) -> Result<WriteOutcome> {
        let table = table.to_string();
        let family = family.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<WriteOutcome> {
                diesel::insert_or_ignore_into(wide_tables::table)
                    .values((
                        wide_tables::table_name.eq(&table),
                        wide_tables::family.eq(&family),
                    ))
                    .execute(conn)
                    .map_err(|e| StoreError::WriteFailed(e.to_string()))?;

                let mut outcome = WriteOutcome::default();
                for put in puts {
                    let ProfilePut {
                        row_key,
                        expected_version,
                        cells,
                    } = put;

                    let current: Option<i64> = wide_rows::table
                        .find((&table, &family, &row_key))
                        .select(wide_rows::version)
                        .first(conn)
                        .optional()
                        .map_err(|e| StoreError::WriteFailed(e.to_string()))?;

                    let version_ok = match (current, expected_version) {
                        (None, None) => {
                            diesel::insert_into(wide_rows::table)
                                .values(WideRowDB {
                                    table_name: table.clone(),
                                    family: family.clone(),
                                    row_key: row_key.clone(),
                                    version: 1,
                                })
                                .execute(conn)
                                .map_err(|e| StoreError::WriteFailed(e.to_string()))?;
                            true
                        }
                        (Some(current), Some(expected)) if current == expected => {
                            diesel::update(wide_rows::table.find((&table, &family, &row_key)))
                                .set(wide_rows::version.eq(current + 1))
                                .execute(conn)
                                .map_err(|e| StoreError::WriteFailed(e.to_string()))?;
                            true
                        }
                        _ => false,
                    };

                    if !version_ok {
                        outcome.conflicts.push(row_key);
                        continue;
                    }

                    for (qualifier, value) in cells {
                        diesel::replace_into(wide_cells::table)
                            .values(WideCellDB {
                                table_name: table.clone(),
                                family: family.clone(),
                                row_key: row_key.clone(),
                                qualifier,
                                value: Some(value),
                            })
                            .execute(conn)
                            .map_err(|e| StoreError::WriteFailed(e.to_string()))?;
                    }
                    outcome.written += 1;
                }
                Ok(outcome)
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_pool, get_connection, run_migrations, spawn_writer, DbPool};
    use crate::tags::TagMetadataRepository;
    use diesel::RunQueryDsl;
    use tagmill_core::classify::ClassifyMode;
    use tagmill_core::errors::Error;
    use tagmill_core::models::{ModelDriver, TagModelConfig};
    use tagmill_core::profiles::ProfileStoreConfig;
    use tagmill_core::rules::parse_rule;
    use tempfile::tempdir;

    async fn create_test_repository() -> (Arc<WideColumnRepository>, Arc<DbPool>, tempfile::TempDir)
    {
        let temp_dir = tempdir().expect("Failed to create temp directory");
        let db_path = temp_dir.path().join("test.db");
        let db_path_str = db_path.to_string_lossy().to_string();

        let pool = create_pool(&db_path_str).expect("Failed to create pool");
        run_migrations(&pool).expect("Failed to run migrations");
        let writer = spawn_writer((*pool).clone());

        let repo = Arc::new(WideColumnRepository::new(Arc::clone(&pool), writer));
        (repo, pool, temp_dir)
    }

    fn cells(pairs: &[(&str, &str)]) -> HashMap<String, Option<String>> {
        pairs
            .iter()
            .map(|(q, v)| (q.to_string(), Some(v.to_string())))
            .collect()
    }

    fn insert_tag(
        pool: &Arc<DbPool>,
        id: i64,
        level: i32,
        pid: Option<i64>,
        rule: &str,
    ) {
        let mut conn = get_connection(pool).expect("Failed to get connection");
        let pid_sql = pid.map_or("NULL".to_string(), |p| p.to_string());
        diesel::sql_query(format!(
            "INSERT INTO tags (id, name, level, pid, rule, state, created_at, updated_at) \
             VALUES ({id}, 'tag-{id}', {level}, {pid_sql}, '{rule}', 1, datetime('now'), datetime('now'))"
        ))
        .execute(&mut conn)
        .expect("Failed to insert tag");
    }

    fn descriptor(rule: &str) -> SourceDescriptor {
        parse_rule(rule).unwrap()
    }

    const USERS_RULE: &str =
        "inType=hbase##hbaseTable=tbl_users##family=detail##selectFieldNames=id,marriage";

    #[tokio::test]
    async fn reading_unregistered_table_is_fatal() {
        let (repo, _pool, _temp_dir) = create_test_repository().await;

        let err = match repo.read(&descriptor(USERS_RULE)) {
            Ok(_) => panic!("expected read of unregistered table to fail"),
            Err(e) => e,
        };
        assert!(matches!(err, Error::Source(SourceError::TableMissing { .. })));
    }

    #[tokio::test]
    async fn read_projects_select_columns_and_applies_filters() {
        let (repo, _pool, _temp_dir) = create_test_repository().await;
        repo.put_row(
            "tbl_users",
            "detail",
            "r1",
            cells(&[("id", "U1"), ("marriage", "2"), ("state", "1"), ("extra", "x")]),
        )
        .await
        .unwrap();
        repo.put_row(
            "tbl_users",
            "detail",
            "r2",
            cells(&[("id", "U2"), ("marriage", "1"), ("state", "0")]),
        )
        .await
        .unwrap();

        let with_filter = descriptor(
            "inType=hbase##hbaseTable=tbl_users##family=detail\
             ##selectFieldNames=id,marriage##whereFieldNames=state=1",
        );
        let rows: Vec<_> = repo.read(&with_filter).unwrap().collect();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("id"), Some("U1"));
        assert_eq!(rows[0].get("marriage"), Some("2"));
        // projection dropped the unselected column
        assert_eq!(rows[0].get("extra"), None);
    }

    #[tokio::test]
    async fn rereading_unchanged_table_yields_identical_rows() {
        let (repo, _pool, _temp_dir) = create_test_repository().await;
        repo.put_row("tbl_users", "detail", "r2", cells(&[("id", "U2"), ("marriage", "1")]))
            .await
            .unwrap();
        repo.put_row("tbl_users", "detail", "r1", cells(&[("id", "U1"), ("marriage", "2")]))
            .await
            .unwrap();

        let first: Vec<_> = repo.read(&descriptor(USERS_RULE)).unwrap().collect();
        let second: Vec<_> = repo.read(&descriptor(USERS_RULE)).unwrap().collect();
        assert_eq!(first, second);
        assert_eq!(first[0].get("id"), Some("U1"));
    }

    #[tokio::test]
    async fn scan_of_unwritten_store_is_empty() {
        let (repo, _pool, _temp_dir) = create_test_repository().await;
        let snapshot = repo.scan("tbl_profile", "user").unwrap();
        assert!(snapshot.is_empty());
    }

    #[tokio::test]
    async fn checked_write_creates_then_appends_with_version_bump() {
        let (repo, _pool, _temp_dir) = create_test_repository().await;

        let outcome = repo
            .write_checked(
                "tbl_profile",
                "user",
                vec![ProfilePut {
                    row_key: "user:U1".to_string(),
                    expected_version: None,
                    cells: [
                        ("userId".to_string(), "U1".to_string()),
                        ("tagIds".to_string(), "90".to_string()),
                    ]
                    .into_iter()
                    .collect(),
                }],
            )
            .await
            .unwrap();
        assert_eq!(outcome.written, 1);
        assert!(outcome.conflicts.is_empty());

        let snapshot = repo.scan("tbl_profile", "user").unwrap();
        let row = snapshot.get("user:U1").unwrap();
        assert_eq!(row.version, 1);
        assert_eq!(row.cells.get("tagIds").map(String::as_str), Some("90"));

        let outcome = repo
            .write_checked(
                "tbl_profile",
                "user",
                vec![ProfilePut {
                    row_key: "user:U1".to_string(),
                    expected_version: Some(1),
                    cells: [("tagIds".to_string(), "90,143".to_string())]
                        .into_iter()
                        .collect(),
                }],
            )
            .await
            .unwrap();
        assert_eq!(outcome.written, 1);

        let snapshot = repo.scan("tbl_profile", "user").unwrap();
        let row = snapshot.get("user:U1").unwrap();
        assert_eq!(row.version, 2);
        assert_eq!(row.cells.get("tagIds").map(String::as_str), Some("90,143"));
        // untouched qualifier survives the cell-level upsert
        assert_eq!(row.cells.get("userId").map(String::as_str), Some("U1"));
    }

    #[tokio::test]
    async fn stale_version_is_reported_not_applied() {
        let (repo, _pool, _temp_dir) = create_test_repository().await;
        repo.write_checked(
            "tbl_profile",
            "user",
            vec![ProfilePut {
                row_key: "user:U1".to_string(),
                expected_version: None,
                cells: [("tagIds".to_string(), "90".to_string())].into_iter().collect(),
            }],
        )
        .await
        .unwrap();

        let outcome = repo
            .write_checked(
                "tbl_profile",
                "user",
                vec![ProfilePut {
                    row_key: "user:U1".to_string(),
                    expected_version: Some(7),
                    cells: [("tagIds".to_string(), "clobbered".to_string())]
                        .into_iter()
                        .collect(),
                }],
            )
            .await
            .unwrap();

        assert_eq!(outcome.written, 0);
        assert_eq!(outcome.conflicts, vec!["user:U1".to_string()]);

        let snapshot = repo.scan("tbl_profile", "user").unwrap();
        let row = snapshot.get("user:U1").unwrap();
        assert_eq!(row.version, 1);
        assert_eq!(row.cells.get("tagIds").map(String::as_str), Some("90"));
    }

    #[tokio::test]
    async fn model_runs_accumulate_tags_across_models() {
        let (repo, pool, _temp_dir) = create_test_repository().await;

        insert_tag(&pool, 15, 4, Some(3), USERS_RULE);
        insert_tag(&pool, 89, 5, Some(15), "1");
        insert_tag(&pool, 90, 5, Some(15), "2");
        insert_tag(
            &pool,
            24,
            4,
            Some(3),
            "inType=hbase##hbaseTable=tbl_orders##family=detail##selectFieldNames=memberId,paymentCode",
        );
        insert_tag(&pool, 143, 5, Some(24), "alipay");
        insert_tag(&pool, 144, 5, Some(24), "wxpay");

        repo.put_row("tbl_users", "detail", "r1", cells(&[("id", "U1"), ("marriage", "2")]))
            .await
            .unwrap();
        for (row_key, code) in [("o1", "alipay"), ("o2", "alipay"), ("o3", "wxpay")] {
            repo.put_row(
                "tbl_orders",
                "detail",
                row_key,
                cells(&[("memberId", "U1"), ("paymentCode", code)]),
            )
            .await
            .unwrap();
        }

        let metadata = Arc::new(TagMetadataRepository::new(Arc::clone(&pool)));
        let driver = ModelDriver::new(
            metadata,
            repo.clone(),
            repo.clone(),
            ProfileStoreConfig::default(),
        );

        let marriage = TagModelConfig {
            tag_id: 15,
            mode: ClassifyMode::Direct,
        };
        let summary = driver.run(&marriage).await.unwrap();
        assert_eq!(summary.created, 1);

        let snapshot = repo.scan("tbl_profile", "user").unwrap();
        assert_eq!(
            snapshot["user:U1"].cells.get("tagIds").map(String::as_str),
            Some("90")
        );

        // identical re-run writes nothing
        let rerun = driver.run(&marriage).await.unwrap();
        assert_eq!(rerun.skipped, 1);
        assert_eq!(rerun.write_attempts, 0);
        let snapshot = repo.scan("tbl_profile", "user").unwrap();
        assert_eq!(snapshot["user:U1"].version, 1);

        // a second model appends its dominant tag without losing the first
        let payment = TagModelConfig {
            tag_id: 24,
            mode: ClassifyMode::Aggregated,
        };
        let summary = driver.run(&payment).await.unwrap();
        assert_eq!(summary.appended, 1);

        let snapshot = repo.scan("tbl_profile", "user").unwrap();
        assert_eq!(
            snapshot["user:U1"].cells.get("tagIds").map(String::as_str),
            Some("90,143")
        );
    }
}
