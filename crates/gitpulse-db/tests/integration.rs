use gitpulse_db::{check_connectivity, create_pool, run_migrations, DbRuntimeSettings};

#[test]
fn file_backed_database_initializes() {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let path = dir.path().join("events.db");
    let pool = create_pool(
        path.to_str().expect("utf-8 path"),
        DbRuntimeSettings::default(),
    );

    check_connectivity(&pool).expect("database should be reachable");

    let conn = pool.get().expect("failed to get connection");
    let mode: String = conn
        .query_row("PRAGMA journal_mode;", [], |row| row.get(0))
        .expect("failed to query journal_mode");
    assert_eq!(mode, "wal");

    let applied = run_migrations(&conn).expect("failed to run migrations");
    assert_eq!(applied, 2);

    let mut stmt = conn
        .prepare(
            "SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
        )
        .expect("failed to prepare table query");
    let tables: Vec<String> = stmt
        .query_map([], |row| row.get(0))
        .expect("failed to execute table query")
        .map(|r| r.expect("failed to read table name"))
        .collect();

    assert_eq!(tables, vec!["_gitpulse_migrations", "github_events"]);
}

#[test]
fn migrations_are_shared_across_pooled_connections() {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let path = dir.path().join("events.db");
    let pool = create_pool(
        path.to_str().expect("utf-8 path"),
        DbRuntimeSettings::default(),
    );

    let first = pool.get().expect("failed to get connection");
    run_migrations(&first).expect("failed to run migrations");

    let second = pool.get().expect("failed to get a second connection");
    let applied = run_migrations(&second).expect("re-running migrations should succeed");
    assert_eq!(applied, 0);
}
