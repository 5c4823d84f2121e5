//! Debug captures of KBB pages.
//!
//! KBB changes its markup often. When a price stops parsing, the saved html
//! and screenshot of the last run are the quickest way to see why.

use std::path::Path;

use base64::Engine;

use crate::traits::events::{EventSink, PipelineEvent};
use crate::traits::fetcher::StructuredPage;

/// Write whatever html/screenshot the fetcher captured into `dir`.
///
/// Never fails: problems are reported as `ArtifactSkipped` events.
pub async fn save_kbb_artifacts<E: EventSink + ?Sized>(
    dir: &Path,
    asset_id: i64,
    page: &StructuredPage,
    events: &E,
) {
    if let Some(html) = page.html.as_deref().filter(|h| !h.is_empty()) {
        let path = dir.join(format!("kbb_html_{}.html", asset_id));
        write(&path, html.as_bytes(), asset_id, events).await;
    }

    if let Some(screenshot) = page.screenshot.as_deref().filter(|s| !s.is_empty()) {
        match decode_screenshot(screenshot) {
            Ok(bytes) => {
                let path = dir.join(format!("kbb_screenshot_{}.png", asset_id));
                write(&path, &bytes, asset_id, events).await;
            }
            Err(reason) => events.record(PipelineEvent::ArtifactSkipped { asset_id, reason }),
        }
    }
}

/// Decode a data URL or bare base64 screenshot.
fn decode_screenshot(screenshot: &str) -> Result<Vec<u8>, String> {
    if screenshot.starts_with("http://") || screenshot.starts_with("https://") {
        return Err(format!("screenshot hosted remotely at {}", screenshot));
    }

    let encoded = match screenshot.split_once(',') {
        Some((_, data)) => data,
        None => screenshot,
    };

    base64::engine::general_purpose::STANDARD
        .decode(encoded.trim())
        .map_err(|e| format!("screenshot is not valid base64: {}", e))
}

async fn write<E: EventSink + ?Sized>(path: &Path, bytes: &[u8], asset_id: i64, events: &E) {
    if let Some(parent) = path.parent() {
        if let Err(e) = tokio::fs::create_dir_all(parent).await {
            events.record(PipelineEvent::ArtifactSkipped {
                asset_id,
                reason: format!("cannot create {}: {}", parent.display(), e),
            });
            return;
        }
    }

    match tokio::fs::write(path, bytes).await {
        Ok(()) => events.record(PipelineEvent::ArtifactSaved {
            asset_id,
            path: path.display().to_string(),
        }),
        Err(e) => events.record(PipelineEvent::ArtifactSkipped {
            asset_id,
            reason: format!("cannot write {}: {}", path.display(), e),
        }),
    }
}
