use rusqlite::Connection;

/// Initialize the database schema.
pub fn init_db(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        -- Accounts. Only billing-relevant fields live here; identity and
        -- session handling belong to the surrounding platform.
        CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            email TEXT NOT NULL UNIQUE,
            plan TEXT NOT NULL DEFAULT 'free' CHECK (plan IN ('free', 'pro')),
            billing_status TEXT NOT NULL DEFAULT 'none' CHECK (billing_status IN ('none', 'pending', 'paid')),
            created_at INTEGER NOT NULL,
            updated_at INTEGER NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_users_email ON users(email);

        -- Invoices. Amount, surcharge and payload are snapshotted at
        -- creation and never recomputed; 'expired' is reachable only via an
        -- external sweep.
        CREATE TABLE IF NOT EXISTS invoices (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            plan_name TEXT NOT NULL,
            base_amount INTEGER NOT NULL,
            unique_code INTEGER NOT NULL,
            final_amount INTEGER NOT NULL,
            payload TEXT NOT NULL,
            status TEXT NOT NULL DEFAULT 'pending' CHECK (status IN ('pending', 'paid', 'expired')),
            created_at INTEGER NOT NULL,
            updated_at INTEGER NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_invoices_user ON invoices(user_id);
        CREATE INDEX IF NOT EXISTS idx_invoices_user_created ON invoices(user_id, created_at DESC);

        -- Admin-managed global key/value settings (QRIS payloads).
        CREATE TABLE IF NOT EXISTS global_settings (
            name TEXT PRIMARY KEY,
            value TEXT NOT NULL
        );
        "#,
    )
}
