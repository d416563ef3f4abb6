use sqlx::PgPool;

/// Create the `nodes` and `edges` tables and their indexes. Safe to call on
/// an already-migrated database; the DDL is all `IF NOT EXISTS`.
pub async fn migrate(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::raw_sql(include_str!("../../sql/schema.sql"))
        .execute(pool)
        .await?;
    Ok(())
}
