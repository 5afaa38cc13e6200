use sqlx::{Pool, Postgres};

// Creates the accounts, sessions and tests tables if they do not exist yet
pub async fn init_db(pool: &Pool<Postgres>) -> Result<(), sqlx::Error> {
    // Postgres prepared statements hold a single command, so each runs on its own
    let statements = [
        r#"
        CREATE TABLE IF NOT EXISTS accounts (
            id TEXT PRIMARY KEY,
            last_seen TIMESTAMPTZ,
            last_played TEXT
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS sessions (
            token TEXT PRIMARY KEY,
            account_id TEXT NOT NULL REFERENCES accounts (id) ON DELETE CASCADE,
            created_at TIMESTAMPTZ NOT NULL DEFAULT now()
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS tests (
            id TEXT PRIMARY KEY,
            cpm DOUBLE PRECISION NOT NULL,
            raw_cpm DOUBLE PRECISION NOT NULL,
            wpm DOUBLE PRECISION NOT NULL,
            correct INTEGER NOT NULL,
            incorrect INTEGER NOT NULL,
            corrections INTEGER NOT NULL,
            type TEXT NOT NULL,
            account_id TEXT NOT NULL REFERENCES accounts (id),
            created_at TIMESTAMPTZ NOT NULL DEFAULT now()
        )
        "#,
        "CREATE INDEX IF NOT EXISTS idx_tests_wpm ON tests (wpm DESC, created_at, id)",
        "CREATE INDEX IF NOT EXISTS idx_tests_account ON tests (account_id, created_at DESC)",
    ];

    for statement in statements {
        sqlx::query(statement).execute(pool).await?;
    }
    Ok(())
}
