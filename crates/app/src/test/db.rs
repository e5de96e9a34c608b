//! Per-test PostgreSQL databases inside one shared container.

use std::{
    process,
    sync::{
        OnceLock,
        atomic::{AtomicU32, Ordering},
        mpsc,
    },
    thread,
};

use once_cell::sync::Lazy;
use sqlx::{Connection, PgConnection, PgPool, query};
use testcontainers_modules::{
    postgres::Postgres as PostgresImage,
    testcontainers::{ContainerAsync, ImageExt, runners::AsyncRunner},
};
use tokio::{runtime, sync::OnceCell};
use tracing::warn;

use crate::database;

const TEST_USER: &str = "stockroom_test";
const TEST_PASSWORD: &str = "stockroom_test_password";

/// `DROP DATABASE ... WITH (FORCE)` needs PostgreSQL 13 or newer.
const POSTGRES_TAG: &str = "16-alpine";

/// The container plus the address it was published on.
///
/// Host and port are resolved once, so later tests never talk to the Docker
/// client that was created on the first test's runtime.
struct TestServer {
    _container: ContainerAsync<PostgresImage>,
    host: String,
    port: u16,
}

impl TestServer {
    async fn start() -> Self {
        let container = PostgresImage::default()
            .with_user(TEST_USER)
            .with_password(TEST_PASSWORD)
            .with_db_name("stockroom_test")
            .with_tag(POSTGRES_TAG)
            .start()
            .await
            .expect("Failed to start PostgreSQL container");

        let port = container
            .get_host_port_ipv4(5432)
            .await
            .expect("Failed to get container port");

        let host = std::env::var("TESTCONTAINERS_HOST_OVERRIDE")
            .unwrap_or_else(|_| "localhost".to_string());

        Self {
            _container: container,
            host,
            port,
        }
    }

    fn url(&self, database: &str) -> String {
        format!(
            "postgresql://{TEST_USER}:{TEST_PASSWORD}@{}:{}/{database}",
            self.host, self.port
        )
    }
}

static SERVER: Lazy<OnceCell<TestServer>> = Lazy::new(OnceCell::new);

/// Databases waiting to be dropped.
static DROP_QUEUE: OnceLock<mpsc::Sender<String>> = OnceLock::new();

static NEXT_DATABASE: AtomicU32 = AtomicU32::new(0);

async fn server() -> &'static TestServer {
    SERVER.get_or_init(TestServer::start).await
}

/// Drop databases from a thread that owns its own runtime.
///
/// Every `#[tokio::test]` runs on a runtime that is shut down when the test
/// returns, so a task spawned there would stop receiving after the first test.
fn start_reaper(admin_url: String) -> mpsc::Sender<String> {
    let (sender, receiver) = mpsc::channel::<String>();

    thread::Builder::new()
        .name("stockroom-test-db-reaper".to_string())
        .spawn(move || {
            let runtime = runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .expect("Failed to build reaper runtime");

            for name in receiver {
                if let Err(error) = runtime.block_on(drop_database(&admin_url, &name)) {
                    warn!("failed to drop test database {name}: {error}");
                }
            }
        })
        .expect("Failed to spawn test database reaper");

    sender
}

async fn drop_database(admin_url: &str, name: &str) -> Result<(), sqlx::Error> {
    let mut conn = PgConnection::connect(admin_url).await?;

    // `name` is always produced by `unique_name`, so quoting is enough. FORCE
    // ends the pool connections the dropped `TestDb` could not close itself.
    query(&format!("DROP DATABASE IF EXISTS \"{name}\" WITH (FORCE)"))
        .execute(&mut conn)
        .await?;

    conn.close().await
}

fn unique_name() -> String {
    let sequence = NEXT_DATABASE.fetch_add(1, Ordering::Relaxed);

    format!("stockroom_test_{}_{sequence}", process::id())
}

/// A freshly created database holding an empty `productos` table.
///
/// Every test gets its own database, so `SERIAL` ids start at 1 and listings only ever see
/// the rows that test inserted. The database is dropped by the reaper thread once the value
/// goes out of scope.
#[derive(Debug)]
pub(crate) struct TestDb {
    pool: PgPool,
    name: String,
}

impl Drop for TestDb {
    fn drop(&mut self) {
        let Some(sender) = DROP_QUEUE.get() else {
            return;
        };

        if sender.send(self.name.clone()).is_err() {
            warn!(database = %self.name, "test database reaper has stopped");
        }
    }
}

impl TestDb {
    pub(crate) async fn new() -> Self {
        let server = server().await;
        let admin_url = server.url("postgres");

        DROP_QUEUE.get_or_init(|| start_reaper(admin_url.clone()));

        let name = unique_name();

        let mut conn = PgConnection::connect(&admin_url)
            .await
            .expect("Failed to connect to postgres database");

        query(&format!("CREATE DATABASE \"{name}\""))
            .execute(&mut conn)
            .await
            .expect("Failed to create test database");

        conn.close()
            .await
            .expect("Failed to close admin connection");

        let pool = PgPool::connect(&server.url(&name))
            .await
            .expect("Failed to create pool for test database");

        database::ensure_schema(&pool)
            .await
            .expect("Failed to create productos table");

        Self { pool, name }
    }

    pub(crate) fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub(crate) async fn count_products(&self) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM productos")
            .fetch_one(&self.pool)
            .await
            .expect("Failed to count productos rows")
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn unique_names_do_not_repeat() {
        let first = unique_name();
        let second = unique_name();

        assert_ne!(first, second);
        assert!(first.starts_with("stockroom_test_"), "unexpected name {first}");
    }

    #[tokio::test]
    async fn productos_table_starts_empty() {
        let test_db = TestDb::new().await;

        assert_eq!(test_db.count_products().await, 0);

        // Creating the table again must be a no-op.
        database::ensure_schema(test_db.pool())
            .await
            .expect("Failed to re-run schema creation");

        assert_eq!(test_db.count_products().await, 0);
    }

    #[tokio::test]
    async fn ping_succeeds_against_live_database() {
        let test_db = TestDb::new().await;

        database::ping(test_db.pool())
            .await
            .expect("Failed to ping test database");
    }

    async fn database_exists(admin_url: &str, name: &str) -> bool {
        let mut conn = PgConnection::connect(admin_url)
            .await
            .expect("Failed to connect to postgres database");

        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM pg_database WHERE datname = $1)")
            .bind(name)
            .fetch_one(&mut conn)
            .await
            .expect("Failed to query pg_database")
    }

    // Databases created on one test runtime must still be reaped after that
    // runtime is gone.
    #[test]
    fn databases_are_dropped_after_their_runtime_shuts_down() {
        let first_runtime = runtime::Runtime::new().expect("Failed to build runtime");
        let (admin_url, name) = first_runtime.block_on(async {
            let test_db = TestDb::new().await;

            (server().await.url("postgres"), test_db.name.clone())
        });
        drop(first_runtime);

        let second_runtime = runtime::Runtime::new().expect("Failed to build runtime");
        let dropped = second_runtime.block_on(async {
            for _ in 0..50 {
                if !database_exists(&admin_url, &name).await {
                    return true;
                }

                tokio::time::sleep(Duration::from_millis(100)).await;
            }

            false
        });

        assert!(dropped, "database {name} was never dropped");
    }
}
