//! `peaklabel init`: create or migrate the database.

use std::path::Path;

use serde_json::json;

use super::command::InitArgs;
use super::output;
use crate::application::seed::seed_store;
use crate::error::Result;
use crate::infrastructure::bootstrap;
use crate::infrastructure::config::settings::Config;

/// Open the database (running migrations) and optionally seed it.
pub fn execute(config: &Config, db: &Path, args: &InitArgs) -> Result<()> {
    let store = bootstrap::open_store(config, db)?;
    let seeded = if args.seed { seed_store(&store)? } else { 0 };

    if output::is_json() {
        output::json_output(json!({
            "command": "init",
            "database": db.display().to_string(),
            "seeded": seeded,
        }));
        return Ok(());
    }

    output::header(env!("CARGO_PKG_VERSION"));
    output::success("Database ready");
    output::field("Database", db.display());
    if seeded > 0 {
        output::field("Seeded events", seeded);
    } else if args.seed {
        output::hint("database already holds events; seeding skipped");
    }
    Ok(())
}
