//! Check command implementation
//!
//! Prints the configuration that the other commands would run with.

use tracing::info;

use crate::config::EffectiveConfig;
use crate::Result;

/// Run the check command
pub fn run(config: &EffectiveConfig) -> Result<()> {
    info!("Configuration layered and validated");
    println!("{}", config);
    Ok(())
}
