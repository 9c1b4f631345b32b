//! Init command for creating the data directory and starter files.

use anyhow::Result;
use ilr_data::DataStore;

/// Runs the init command.
///
/// Existing data files are never overwritten, so re-running is safe.
pub fn run(store: &DataStore) -> Result<()> {
    let written = store.write_starter_files()?;

    if written.is_empty() {
        println!(
            "Data directory already initialized: {}",
            store.dir().display()
        );
        return Ok(());
    }

    for path in &written {
        println!("Created: {}", path.display());
    }
    println!();
    println!("Edit {} to set your entry date,", store.config_path().display());
    println!("then run 'ilr status' to see your progress.");

    Ok(())
}
