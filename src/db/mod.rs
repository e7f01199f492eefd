use deadpool_postgres::{Manager, ManagerConfig, Pool, RecyclingMethod};
use tokio_postgres::NoTls;

pub mod bill;
pub mod fixtures;
pub mod memory;

pub struct PostgresStore {
    pub pool: Pool,
}

impl PostgresStore {
    pub async fn new(conn_str: &str) -> Result<Self, anyhow::Error> {
        let cfg: tokio_postgres::Config = conn_str.parse()?;
        let mgr_config = ManagerConfig {
            recycling_method: RecyclingMethod::Fast,
        };
        let pool = Pool::builder(Manager::from_config(cfg, NoTls, mgr_config))
            .max_size(16)
            .build()?;

        Ok(Self { pool })
    }

    pub async fn init(&self) -> Result<(), anyhow::Error> {
        let qry = r#"
            CREATE TABLE IF NOT EXISTS bills (
                id TEXT PRIMARY KEY,
                email TEXT NOT NULL,
                bill_type TEXT NOT NULL,
                name TEXT NOT NULL,
                date DATE NOT NULL,
                amount DOUBLE PRECISION NOT NULL,
                vat TEXT NOT NULL DEFAULT '',
                pct INTEGER NOT NULL DEFAULT 20,
                commentary TEXT NOT NULL DEFAULT '',
                file_url TEXT,
                file_name TEXT,
                status TEXT NOT NULL,
                comment_admin TEXT,
                created_at TIMESTAMPTZ DEFAULT (NOW() AT TIME ZONE 'UTC')
            )
        "#;
        self.pool.get().await?.execute(qry, &[]).await?;
        Ok(())
    }
}
