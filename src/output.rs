//! Rendering compiled batches for the command line

use anyhow::Result;

use crate::binding::{apply, Batch, RecordingBinder};
use crate::cli::OutputFormat;

/// Render batches in the requested format
pub fn render(batches: &[Batch], format: OutputFormat) -> Result<String> {
    Ok(match format {
        OutputFormat::Text => render_text(batches),
        OutputFormat::Json => {
            let mut out = serde_json::to_string_pretty(batches)?;
            out.push('\n');
            out
        }
        OutputFormat::Yaml => serde_yaml::to_string(batches)?,
    })
}

/// One block per batch: the settings line, then one entry per line
pub fn render_text(batches: &[Batch]) -> String {
    let mut out = String::new();
    for (i, batch) in batches.iter().enumerate() {
        out.push_str(&format!("batch {} {}\n", i + 1, batch.settings()));
        for entry in batch.entries() {
            out.push_str(&format!("  {}\n", entry));
        }
    }
    out
}

/// One line per bind call, in the order the binder would receive them
pub fn render_bind_calls(batches: &[Batch]) -> String {
    let mut binder = RecordingBinder::new();
    if let Err(never) = apply(batches, &mut binder) {
        match never {}
    }

    binder
        .calls
        .iter()
        .map(|(settings, entry)| format!("bind {} {}\n", settings, entry))
        .collect()
}
