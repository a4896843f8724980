use rusqlite::{Connection, OptionalExtension, Result, params};

/// Ensure that the `log` table exists; applied migrations are recorded there.
fn ensure_log_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

struct Migration {
    version: &'static str,
    description: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: "20250301_0001_create_shifts",
        description: "Created shifts table",
        sql: r#"
        CREATE TABLE IF NOT EXISTS shifts (
            id           INTEGER PRIMARY KEY AUTOINCREMENT,
            employee_id  TEXT NOT NULL,
            date         TEXT NOT NULL,
            start_time   TEXT NOT NULL,
            end_time     TEXT,
            gps_in       TEXT NOT NULL,
            gps_out      TEXT,
            selfie_in    TEXT NOT NULL,
            selfie_out   TEXT,
            break_start  TEXT,
            break_end    TEXT,
            UNIQUE (employee_id, date)
        );

        CREATE INDEX IF NOT EXISTS idx_shifts_date_open ON shifts(date, end_time);
        "#,
    },
    Migration {
        version: "20250301_0002_create_daily_state",
        description: "Created daily_state singleton",
        sql: r#"
        CREATE TABLE IF NOT EXISTS daily_state (
            id               INTEGER PRIMARY KEY CHECK (id = 1),
            current_lead_id  TEXT,
            updated_at       TEXT NOT NULL,
            lead_date        TEXT NOT NULL
        );
        "#,
    },
    Migration {
        version: "20250301_0003_create_production_reports",
        description: "Created production_reports table",
        sql: r#"
        CREATE TABLE IF NOT EXISTS production_reports (
            id                INTEGER PRIMARY KEY AUTOINCREMENT,
            date              TEXT NOT NULL UNIQUE,
            lead_employee_id  TEXT NOT NULL,
            product_a_small   INTEGER,
            product_a_medium  INTEGER,
            product_b_small   INTEGER,
            product_b_medium  INTEGER,
            jars_small        INTEGER NOT NULL DEFAULT 0,
            jars_medium       INTEGER NOT NULL DEFAULT 0,
            jar_photo_ref     TEXT,
            distributor_start TEXT,
            sales_start       TEXT,
            updated_at        TEXT NOT NULL
        );
        "#,
    },
    Migration {
        version: "20250301_0004_create_system_settings",
        description: "Created system_settings table",
        sql: r#"
        CREATE TABLE IF NOT EXISTS system_settings (
            key    TEXT PRIMARY KEY,
            value  TEXT NOT NULL
        );
        "#,
    },
];

fn is_applied(conn: &Connection, version: &str) -> Result<bool> {
    let mut chk = conn.prepare(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([version], |_| Ok(())).optional()?.is_some())
}

fn apply(conn: &Connection, m: &Migration) -> Result<()> {
    conn.execute_batch("BEGIN;")?;

    let res = conn.execute_batch(m.sql).and_then(|_| {
        conn.execute(
            "INSERT INTO log (date, operation, target, message)
             VALUES (datetime('now'), 'migration_applied', ?1, ?2)",
            params![m.version, m.description],
        )
    });

    match res {
        Ok(_) => conn.execute_batch("COMMIT;"),
        Err(e) => {
            let _ = conn.execute_batch("ROLLBACK;");
            Err(e)
        }
    }
}

/// Public entry point: run all pending migrations, in order.
/// Returns `(version, description)` of each migration applied by this call.
///
/// Invoked by db::initialize::init_db(). Prints nothing; callers report.
pub fn run_pending_migrations(conn: &Connection) -> Result<Vec<(&'static str, &'static str)>> {
    ensure_log_table(conn)?;

    let mut applied = Vec::new();
    for m in MIGRATIONS {
        if is_applied(conn, m.version)? {
            continue;
        }
        apply(conn, m)?;
        tracing::info!(version = m.version, "migration applied");
        applied.push((m.version, m.description));
    }

    Ok(applied)
}

/// Versions recorded as applied, in application order.
pub fn applied_versions(conn: &Connection) -> Result<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT target FROM log WHERE operation = 'migration_applied' ORDER BY id ASC",
    )?;
    let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}
