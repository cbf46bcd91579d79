// 📝 Logging - diagnostics go to stderr so exercise output stays clean

use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

/// Install the global subscriber; `filter` uses `EnvFilter` syntax
pub fn init_logging(filter: &str) -> Result<()> {
    let filter = EnvFilter::try_new(filter)
        .map_err(|err| anyhow!("Invalid log filter `{}`: {}", filter, err))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|err| anyhow!("Failed to initialize logging: {}", err))
}
