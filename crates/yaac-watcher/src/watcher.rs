//! File watcher for real-time updates.
//!
//! Uses the notify crate to watch the scan root recursively. Raw events
//! are classified into the five changes that trigger a re-scan, filtered
//! through the ignore set, and forwarded to an async channel.

use notify::event::{CreateKind, ModifyKind, RemoveKind, RenameMode};
use notify::{Event, EventKind, RecursiveMode, Watcher};
use std::fmt;
use std::path::{Path, PathBuf};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info, warn};
use yaac_core::{IgnoreSet, FUNCTIONS_FILE_NAME, LAYOUT_FILE_NAME};

/// Type of change detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Added,
    Changed,
    Removed,
    DirAdded,
    DirRemoved,
}

/// A change that should trigger a re-scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchEvent {
    pub kind: ChangeKind,
    pub path: PathBuf,
}

impl fmt::Display for WatchEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self.kind {
            ChangeKind::Added => "File added",
            ChangeKind::Changed => "File changed",
            ChangeKind::Removed => "File removed",
            ChangeKind::DirAdded => "Directory added",
            ChangeKind::DirRemoved => "Directory removed",
        };
        write!(f, "{}: {}", label, self.path.display())
    }
}

/// Decides which raw notify events become [`WatchEvent`]s.
#[derive(Debug, Clone)]
pub struct WatchFilter {
    root: PathBuf,
    ignore: IgnoreSet,
}

impl WatchFilter {
    /// `root` should be absolute; notify reports paths under it as given.
    pub fn new(root: impl Into<PathBuf>, ignore: IgnoreSet) -> Self {
        Self {
            root: root.into(),
            ignore,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Converts one notify event into zero or more watch events.
    pub fn classify(&self, event: &Event) -> Vec<WatchEvent> {
        event
            .paths
            .iter()
            .enumerate()
            .filter_map(|(index, path)| {
                let kind = change_kind(&event.kind, index, path)?;
                self.accepts(kind, path).then(|| WatchEvent {
                    kind,
                    path: path.clone(),
                })
            })
            .collect()
    }

    fn accepts(&self, kind: ChangeKind, path: &Path) -> bool {
        let Ok(relative) = path.strip_prefix(&self.root) else {
            return false;
        };
        if relative.as_os_str().is_empty() || self.ignore.is_ignored(relative) {
            return false;
        }

        let is_file_event = matches!(
            kind,
            ChangeKind::Added | ChangeKind::Changed | ChangeKind::Removed
        );
        !(is_file_event && is_output_file(path))
    }
}

/// Maps a notify event kind to a change, for the `index`th path of the event.
fn change_kind(kind: &EventKind, index: usize, path: &Path) -> Option<ChangeKind> {
    let added = || {
        if path.is_dir() {
            ChangeKind::DirAdded
        } else {
            ChangeKind::Added
        }
    };

    match kind {
        EventKind::Create(CreateKind::Folder) => Some(ChangeKind::DirAdded),
        EventKind::Create(CreateKind::File) => Some(ChangeKind::Added),
        EventKind::Create(_) => Some(added()),

        EventKind::Remove(RemoveKind::Folder) => Some(ChangeKind::DirRemoved),
        EventKind::Remove(_) => Some(ChangeKind::Removed),

        // Renames show up as a remove of the old name and an add of the new one
        EventKind::Modify(ModifyKind::Name(RenameMode::From)) => Some(ChangeKind::Removed),
        EventKind::Modify(ModifyKind::Name(RenameMode::To)) => Some(added()),
        EventKind::Modify(ModifyKind::Name(RenameMode::Both)) => {
            if index == 0 {
                Some(ChangeKind::Removed)
            } else {
                Some(added())
            }
        }

        // Directory metadata churns whenever a child changes; ignore it
        EventKind::Modify(_) | EventKind::Any => (!path.is_dir()).then_some(ChangeKind::Changed),

        EventKind::Access(_) | EventKind::Other => None,
    }
}

fn is_output_file(path: &Path) -> bool {
    path.file_name()
        .is_some_and(|name| name == LAYOUT_FILE_NAME || name == FUNCTIONS_FILE_NAME)
}

/// Watches a directory for changes.
///
/// Events flow until the watcher is dropped, which closes the
/// underlying OS watch.
pub struct FileWatcher {
    #[allow(dead_code)]
    watcher: notify::RecommendedWatcher,
}

impl FileWatcher {
    /// Starts a recursive watch on the filter's root, sending accepted
    /// events to `sender`.
    pub fn new(filter: WatchFilter, sender: UnboundedSender<WatchEvent>) -> Result<Self, notify::Error> {
        let root = filter.root().to_path_buf();

        let mut watcher = notify::recommended_watcher(move |res: Result<Event, notify::Error>| {
            match res {
                Ok(event) => {
                    for change in filter.classify(&event) {
                        debug!("{}", change);
                        if sender.send(change).is_err() {
                            warn!("Failed to send file change event");
                        }
                    }
                }
                Err(e) => warn!("Watch error: {}", e),
            }
        })?;

        watcher.watch(&root, RecursiveMode::Recursive)?;

        info!("Watching {} for changes", root.display());

        Ok(Self { watcher })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::time::Duration;
    use tempfile::tempdir;
    use tokio::sync::mpsc::unbounded_channel;

    fn filter(root: &Path) -> WatchFilter {
        let ignore = IgnoreSet::new(["**/node_modules/**", "**/.git/**"]).unwrap();
        WatchFilter::new(root, ignore)
    }

    fn event(kind: EventKind, paths: &[&Path]) -> Event {
        paths
            .iter()
            .fold(Event::new(kind), |e, p| e.add_path(p.to_path_buf()))
    }

    #[test]
    fn test_classify_file_changes() {
        let root = Path::new("/project");
        let filter = filter(root);

        let created = event(
            EventKind::Create(CreateKind::File),
            &[Path::new("/project/src/a.ts")],
        );
        assert_eq!(
            filter.classify(&created),
            vec![WatchEvent {
                kind: ChangeKind::Added,
                path: PathBuf::from("/project/src/a.ts"),
            }]
        );

        let removed_dir = event(
            EventKind::Remove(RemoveKind::Folder),
            &[Path::new("/project/old")],
        );
        assert_eq!(filter.classify(&removed_dir)[0].kind, ChangeKind::DirRemoved);

        let access = event(
            EventKind::Access(notify::event::AccessKind::Any),
            &[Path::new("/project/src/a.ts")],
        );
        assert!(filter.classify(&access).is_empty());
    }

    #[test]
    fn test_classify_rename_both() {
        let filter = filter(Path::new("/project"));
        let rename = event(
            EventKind::Modify(ModifyKind::Name(RenameMode::Both)),
            &[Path::new("/project/a.js"), Path::new("/project/b.js")],
        );

        let kinds: Vec<_> = filter.classify(&rename).iter().map(|e| e.kind).collect();
        assert_eq!(kinds, vec![ChangeKind::Removed, ChangeKind::Added]);
    }

    #[test]
    fn test_ignored_and_output_paths_dropped() {
        let filter = filter(Path::new("/project"));

        for path in [
            "/project/node_modules/x/index.js",
            "/project/.git/HEAD",
            "/project/.cursorlayout",
            "/project/.cursorfunctions",
            "/elsewhere/file.js",
        ] {
            let e = event(EventKind::Create(CreateKind::File), &[Path::new(path)]);
            assert!(filter.classify(&e).is_empty(), "{} should be dropped", path);
        }
    }

    #[test]
    fn test_event_display() {
        let e = WatchEvent {
            kind: ChangeKind::Changed,
            path: PathBuf::from("/p/a.js"),
        };
        assert_eq!(e.to_string(), "File changed: /p/a.js");
    }

    #[test]
    fn test_watcher_creation() {
        let dir = tempdir().unwrap();
        let (tx, _rx) = unbounded_channel();
        let watcher = FileWatcher::new(filter(dir.path()), tx);
        assert!(watcher.is_ok());
    }

    #[tokio::test]
    async fn test_watcher_detects_new_file() {
        let dir = tempdir().unwrap();
        let (tx, mut rx) = unbounded_channel();
        let _watcher = FileWatcher::new(filter(dir.path()), tx).unwrap();

        fs::write(dir.path().join("fresh.ts"), "export const x = 1;").unwrap();

        let Ok(received) = tokio::time::timeout(Duration::from_secs(5), rx.recv()).await else {
            // Some CI sandboxes deliver no inotify events at all
            eprintln!("no watch event delivered; skipping");
            return;
        };

        let change = received.expect("watcher closed the channel while alive");
        assert!(change.path.ends_with("fresh.ts"), "unexpected event: {}", change);
        assert!(matches!(change.kind, ChangeKind::Added | ChangeKind::Changed));
    }
}
