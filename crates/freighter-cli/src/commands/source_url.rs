//! Source URL command - derive a browsable source URL for a tag

use freighter_warehouse::SourceUrlTable;

use crate::error::Result;

/// Print the derived URL, or an empty line when the host is unknown
pub fn run(base_url: &str, tag: &str) -> Result<()> {
    let url = SourceUrlTable::builtin().derive(base_url, tag);
    if url.is_empty() {
        tracing::debug!("No source URL provider matches {}", base_url);
    }
    println!("{}", url);
    Ok(())
}
