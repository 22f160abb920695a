//! Schema migrations, applied at runtime from the workspace `migrations/` directory

use std::path::{Path, PathBuf};

use sqlx::migrate::{MigrateError, Migrator};
use sqlx::PgPool;
use tracing::info;

/// Location of the bundled migrations in a source checkout
pub fn default_migrations_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../migrations")
}

/// Apply every pending migration found in `dir`
pub async fn run_migrations(pool: &PgPool, dir: &Path) -> Result<(), MigrateError> {
    let migrator = Migrator::new(dir).await?;
    info!(
        dir = %dir.display(),
        migrations = migrator.iter().count(),
        "Applying database migrations"
    );
    migrator.run(pool).await
}
