//! File watching for live rebuilds.

use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::{Duration, Instant};

use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc as async_mpsc;

use weft_pattern::is_data_file;

/// A change under a watched directory, classified by the kind of
/// source it touches. Every kind triggers a rebuild; the classification
/// feeds logging.
#[derive(Debug, Clone)]
pub enum WatchEvent {
    /// A pattern template was created, changed, or removed.
    Template(PathBuf),

    /// A data file was created, changed, or removed.
    Data(PathBuf),

    /// Anything else under a watched directory (docs, assets).
    Other(PathBuf),
}

impl WatchEvent {
    pub fn path(&self) -> &Path {
        match self {
            WatchEvent::Template(path) | WatchEvent::Data(path) | WatchEvent::Other(path) => path,
        }
    }
}

/// Watches project directories and forwards debounced change events.
pub struct FileWatcher {
    _watcher: RecommendedWatcher,
}

impl FileWatcher {
    /// Watch `paths` recursively. Returns the watcher, which must stay
    /// alive for events to keep flowing, and the channel they arrive on.
    pub fn new(
        paths: &[PathBuf],
        template_extensions: Vec<String>,
    ) -> Result<(Self, async_mpsc::Receiver<WatchEvent>), std::io::Error> {
        let (sync_tx, sync_rx) = mpsc::channel();
        let (async_tx, async_rx) = async_mpsc::channel(100);

        let mut watcher = notify::recommended_watcher(move |res: Result<notify::Event, _>| {
            if let Ok(event) = res {
                let _ = sync_tx.send(event);
            }
        })
        .map_err(std::io::Error::other)?;

        for path in paths {
            if path.exists() {
                watcher
                    .watch(path, RecursiveMode::Recursive)
                    .map_err(std::io::Error::other)?;
            }
        }

        // Editors save in bursts; the forwarder collapses each burst to
        // at most one event per debounce window.
        std::thread::spawn(move || forward_debounced(sync_rx, async_tx, template_extensions));

        Ok((Self { _watcher: watcher }, async_rx))
    }
}

/// Debounce forwarder bridging notify's callback thread into the async
/// channel. The first change in a burst forwards immediately; anything
/// landing inside the window is held and flushed once the window
/// closes, so the last save in a burst still reaches the rebuild loop.
fn forward_debounced(
    events: mpsc::Receiver<notify::Event>,
    tx: async_mpsc::Sender<WatchEvent>,
    template_extensions: Vec<String>,
) {
    let debounce = Duration::from_millis(150);
    let mut last_forwarded: Option<Instant> = None;
    let mut pending: Option<WatchEvent> = None;

    loop {
        let received = if pending.is_none() {
            match events.recv() {
                Ok(event) => classify_event(&event, &template_extensions),
                Err(_) => return,
            }
        } else {
            let deadline = last_forwarded.map_or_else(Instant::now, |last| last + debounce);
            match deadline.checked_duration_since(Instant::now()) {
                None => None,
                Some(remaining) => match events.recv_timeout(remaining) {
                    Ok(event) => match classify_event(&event, &template_extensions) {
                        Some(classified) => Some(classified),
                        None => continue,
                    },
                    Err(mpsc::RecvTimeoutError::Timeout) => None,
                    Err(mpsc::RecvTimeoutError::Disconnected) => {
                        if let Some(held) = pending.take() {
                            let _ = tx.blocking_send(held);
                        }
                        return;
                    }
                },
            }
        };

        match received {
            Some(event) => {
                let now = Instant::now();
                let event = match pending.take() {
                    Some(held) => coalesce(held, event),
                    None => event,
                };
                if last_forwarded.is_some_and(|last| now.duration_since(last) < debounce) {
                    pending = Some(event);
                } else {
                    if tx.blocking_send(event).is_err() {
                        return;
                    }
                    last_forwarded = Some(now);
                }
            }
            // Window closed with a change still held.
            None => {
                if let Some(held) = pending.take() {
                    if tx.blocking_send(held).is_err() {
                        return;
                    }
                    last_forwarded = Some(Instant::now());
                }
            }
        }
    }
}

fn classify_event(event: &notify::Event, template_extensions: &[String]) -> Option<WatchEvent> {
    event
        .paths
        .iter()
        .find_map(|path| classify(path, &event.kind, template_extensions))
}

/// Pick which of two changes in one window survives. A full pass covers
/// template and data edits too, so an asset change outranks whatever
/// follows it.
fn coalesce(held: WatchEvent, fresh: WatchEvent) -> WatchEvent {
    match held {
        WatchEvent::Other(_) => held,
        _ => fresh,
    }
}

fn classify(
    path: &Path,
    kind: &notify::EventKind,
    template_extensions: &[String],
) -> Option<WatchEvent> {
    use notify::EventKind;

    if !matches!(
        kind,
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
    ) {
        return None;
    }

    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    if template_extensions.iter().any(|e| e.as_str() == ext) {
        Some(WatchEvent::Template(path.to_path_buf()))
    } else if is_data_file(path) {
        Some(WatchEvent::Data(path.to_path_buf()))
    } else {
        Some(WatchEvent::Other(path.to_path_buf()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn classifies_by_extension() {
        use notify::event::{AccessKind, CreateKind, ModifyKind};
        use notify::EventKind;

        let exts = vec!["html".to_string()];

        assert!(matches!(
            classify(
                Path::new("patterns/00-a.html"),
                &EventKind::Create(CreateKind::File),
                &exts
            ),
            Some(WatchEvent::Template(_))
        ));
        assert!(matches!(
            classify(
                Path::new("data/global.yaml"),
                &EventKind::Modify(ModifyKind::Any),
                &exts
            ),
            Some(WatchEvent::Data(_))
        ));
        assert!(matches!(
            classify(
                Path::new("assets/logo.svg"),
                &EventKind::Modify(ModifyKind::Any),
                &exts
            ),
            Some(WatchEvent::Other(_))
        ));
        assert!(classify(
            Path::new("patterns/00-a.html"),
            &EventKind::Access(AccessKind::Any),
            &exts
        )
        .is_none());
    }

    #[test]
    fn events_expose_their_path() {
        let event = WatchEvent::Data(PathBuf::from("data/global.json"));
        assert_eq!(event.path(), Path::new("data/global.json"));
    }

    fn spawn_forwarder(
        extensions: &[&str],
    ) -> (mpsc::Sender<notify::Event>, async_mpsc::Receiver<WatchEvent>) {
        let (raw_tx, raw_rx) = mpsc::channel();
        let (tx, rx) = async_mpsc::channel(8);
        let extensions: Vec<String> = extensions.iter().map(|e| e.to_string()).collect();
        std::thread::spawn(move || forward_debounced(raw_rx, tx, extensions));
        (raw_tx, rx)
    }

    fn touch(tx: &mpsc::Sender<notify::Event>, rel: &str) {
        use notify::event::CreateKind;
        use notify::EventKind;

        let event =
            notify::Event::new(EventKind::Create(CreateKind::File)).add_path(PathBuf::from(rel));
        tx.send(event).unwrap();
    }

    #[test]
    fn bursts_flush_their_final_change() {
        let (raw_tx, mut rx) = spawn_forwarder(&["html"]);

        touch(&raw_tx, "patterns/00-a.html");
        touch(&raw_tx, "data/global.json");

        assert!(matches!(rx.blocking_recv(), Some(WatchEvent::Template(_))));
        // The second save landed inside the debounce window and must
        // still arrive once it closes.
        assert!(matches!(rx.blocking_recv(), Some(WatchEvent::Data(_))));
    }

    #[test]
    fn asset_changes_hold_their_slot_through_a_burst() {
        let (raw_tx, mut rx) = spawn_forwarder(&["html"]);

        touch(&raw_tx, "patterns/00-a.html");
        touch(&raw_tx, "assets/logo.svg");
        touch(&raw_tx, "patterns/00-b.html");

        assert!(matches!(rx.blocking_recv(), Some(WatchEvent::Template(_))));
        assert!(matches!(rx.blocking_recv(), Some(WatchEvent::Other(_))));
    }

    #[tokio::test]
    async fn forwards_template_changes() {
        let temp = tempdir().unwrap();

        let (watcher, mut rx) = FileWatcher::new(
            &[temp.path().to_path_buf()],
            vec!["html".to_string(), "mustache".to_string()],
        )
        .unwrap();

        // Give inotify time to set up.
        tokio::time::sleep(Duration::from_millis(100)).await;
        fs::write(temp.path().join("00-button.html"), "<button></button>").unwrap();

        let event = tokio::time::timeout(Duration::from_secs(3), rx.recv()).await;
        drop(watcher);

        let event = event.expect("timeout waiting for watch event");
        assert!(matches!(event, Some(WatchEvent::Template(_))));
    }
}
