use std::io::{BufRead as _, BufReader, Write as _};
use std::path::Path;

use anyhow::Context as _;

use crate::formats::{BookRecord, CrawlResult};

/// Replaces `path` with one JSON line per entry (`null` for entries without
/// data). The file is rendered in full and renamed into place, so readers see
/// either the previous file or the new one.
pub fn write_results(path: &Path, entries: &[Option<BookRecord>]) -> anyhow::Result<()> {
    let mut rendered = String::new();
    for entry in entries {
        let line = serde_json::to_string(entry).context("serialize crawl entry")?;
        rendered.push_str(&line);
        rendered.push('\n');
    }

    let parent_dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent_dir)
        .with_context(|| format!("create output dir: {}", parent_dir.display()))?;

    let mut tmp = tempfile::NamedTempFile::new_in(parent_dir)
        .with_context(|| format!("create temp file in: {}", parent_dir.display()))?;
    tmp.write_all(rendered.as_bytes())
        .with_context(|| format!("write temp file: {}", tmp.path().display()))?;
    tmp.flush().context("flush temp file")?;
    tmp.persist(path)
        .with_context(|| format!("replace output file: {}", path.display()))?;

    Ok(())
}

pub fn read_results(path: &Path) -> anyhow::Result<CrawlResult> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("open crawl results: {}", path.display()))?;

    let mut entries = CrawlResult::new();
    for line in BufReader::new(file).lines() {
        let line = line.context("read crawl results line")?;
        if line.trim().is_empty() {
            continue;
        }
        let entry = serde_json::from_str(&line).context("parse crawl entry")?;
        entries.push(entry);
    }
    Ok(entries)
}
