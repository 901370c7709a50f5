use crate::error::BrowseError;
use crate::models::{Breadcrumb, DirectoryEntry, DirectorySnapshot, EntryType};
use crate::utils::compare_names;
use chrono::{DateTime, SecondsFormat, Utc};
use futures::stream::{self, StreamExt, TryStreamExt};
use log::debug;
use path_clean::PathClean;
use std::path::{is_separator, Path, PathBuf};
use tokio::fs as tokio_fs;

/// Upper bound on in-flight metadata reads for a single listing.
const METADATA_CONCURRENCY: usize = 32;

/// Joins `requested` onto `base` and collapses `.`/`..` lexically. The result
/// must be `base` itself or lie beneath it, compared component by component so
/// that a sibling such as `/dp-apps-evil` never passes for base `/dp-apps`.
pub fn resolve_path(base: &Path, requested: &str) -> Result<PathBuf, BrowseError> {
    let base = base.clean();
    let stripped = requested.trim_start_matches(is_separator);
    let resolved = base.join(stripped).clean();

    if resolved.starts_with(&base) {
        Ok(resolved)
    } else {
        Err(BrowseError::OutOfBounds)
    }
}

pub fn build_breadcrumbs(base_label: &str, requested: &str) -> Vec<Breadcrumb> {
    let mut breadcrumbs = vec![Breadcrumb {
        label: base_label.to_string(),
        path: String::new(),
    }];
    let mut cumulative = String::new();
    for segment in requested.split('/').filter(|s| !s.is_empty()) {
        if !cumulative.is_empty() {
            cumulative.push('/');
        }
        cumulative.push_str(segment);
        breadcrumbs.push(Breadcrumb {
            label: segment.to_string(),
            path: cumulative.clone(),
        });
    }
    breadcrumbs
}

/// Lists one level of `base`/`requested` and assembles the navigation state
/// around it. Any metadata failure fails the whole snapshot.
pub async fn read_directory(
    base: &Path,
    requested: &str,
) -> Result<DirectorySnapshot, BrowseError> {
    let base = base.clean();
    let resolved = resolve_path(&base, requested)?;
    debug!("Reading directory: {}", resolved.display());

    let mut reader = tokio_fs::read_dir(&resolved)
        .await
        .map_err(|e| BrowseError::read(&resolved, e))?;
    let mut children = Vec::new();
    while let Some(child) = reader
        .next_entry()
        .await
        .map_err(|e| BrowseError::read(&resolved, e))?
    {
        children.push(child);
    }
    debug!("Found {} entries in {}", children.len(), resolved.display());

    // `buffered` keeps listing order, so the stable sort below breaks ties by it.
    let mut entries: Vec<DirectoryEntry> = stream::iter(children)
        .map(|child| describe_entry(&base, child))
        .buffered(METADATA_CONCURRENCY)
        .try_collect()
        .await?;
    sort_entries(&mut entries);

    let breadcrumbs = build_breadcrumbs(&base_label(&base), requested);
    let parent_path = parent_of(&breadcrumbs);

    Ok(DirectorySnapshot {
        base_path: base.display().to_string(),
        requested_path: requested.to_string(),
        absolute_path: resolved.display().to_string(),
        parent_path,
        breadcrumbs,
        entries,
    })
}

async fn describe_entry(
    base: &Path,
    child: tokio_fs::DirEntry,
) -> Result<DirectoryEntry, BrowseError> {
    let path = child.path();
    // DirEntry::metadata does not traverse symlinks; a link is listed as a file.
    let metadata = child
        .metadata()
        .await
        .map_err(|e| BrowseError::read(&path, e))?;
    let modified = metadata
        .modified()
        .map_err(|e| BrowseError::read(&path, e))?;

    let entry_type = if metadata.is_dir() {
        EntryType::Directory
    } else {
        EntryType::File
    };

    Ok(DirectoryEntry {
        name: child.file_name().to_string_lossy().into_owned(),
        relative_path: relative_path(base, &path),
        entry_type,
        size: metadata.len(),
        modified: DateTime::<Utc>::from(modified).to_rfc3339_opts(SecondsFormat::Millis, true),
    })
}

/// Directories first, then files, each group in name order.
pub fn sort_entries(entries: &mut [DirectoryEntry]) {
    entries.sort_by(|a, b| {
        b.is_dir()
            .cmp(&a.is_dir())
            .then_with(|| compare_names(&a.name, &b.name))
    });
}

/// `/`-joined path of `path` below `base`, whatever the host separator is.
fn relative_path(base: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(base).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn base_label(base: &Path) -> String {
    base.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| base.display().to_string())
}

fn parent_of(breadcrumbs: &[Breadcrumb]) -> Option<String> {
    if breadcrumbs.len() > 1 {
        Some(breadcrumbs[breadcrumbs.len() - 2].path.clone())
    } else {
        None
    }
}
