use crate::error::Result;
use crate::refresh;

/// Ask a running TUI to reload its goals (`buzz refresh`)
pub fn cmd_refresh() -> Result<()> {
    let path = refresh::flag_path()?;
    refresh::request(&path)?;
    println!("Refresh requested");
    Ok(())
}
