// ManaDash - app/feed.rs
//
// Mana event feed: loads a JSON-lines event file and, optionally, follows it
// for appended lines, streaming events to the UI thread.
//
// Architecture:
//   - `FeedManager` lives on the UI thread; `run_feed` runs on a background
//     thread. The store is never touched off the UI thread: events travel as
//     `FeedProgress` messages over an mpsc channel and the UI applies them.
//   - An `Arc<AtomicBool>` cancel flag stops the follow loop. The poll sleep
//     is split into short slices so cancel is noticed promptly.
//
// Format: one JSON object per line (see `FeedRecord`). Blank lines are
// skipped. Malformed lines are reported as warnings with their line number
// and never stop the feed.
//
// Follow mode:
//   - Bytes after the last newline are an in-progress line and are carried
//     over to the next tick.
//   - A file that shrinks (truncated or rotated) is re-read from offset 0.
//   - Reads are capped at MAX_FEED_READ_BYTES_PER_TICK per tick, and a
//     partial line larger than MAX_FEED_PARTIAL_BYTES is discarded.

use crate::core::model::{FeedProgress, FeedRecord, ManaEvent, NetworkTotals};
use crate::util::constants::{
    FEED_CANCEL_CHECK_INTERVAL_MS, MAX_FEED_LINE_WARNINGS, MAX_FEED_PARTIAL_BYTES,
    MAX_FEED_READ_BYTES_PER_TICK,
};
use crate::util::error::FeedError;
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::time::Duration;

// =============================================================================
// Line parsing
// =============================================================================

/// Result of parsing a block of lines.
#[derive(Debug, Default)]
pub struct ParsedLines {
    /// Successfully decoded events, in file order.
    pub events: Vec<ManaEvent>,

    /// Last totals record in the block.
    pub totals: Option<NetworkTotals>,

    /// Per-line errors, capped at `MAX_FEED_LINE_WARNINGS`.
    pub errors: Vec<FeedError>,

    /// Total malformed lines, including those beyond the error cap.
    pub malformed: usize,

    /// Number of lines consumed (blank lines included).
    pub lines: u64,
}

/// Decode every line of `text`. `first_line` is the 1-based line number of
/// the first line, used in error messages.
pub fn parse_lines(text: &str, path: &Path, first_line: u64) -> ParsedLines {
    let mut parsed = ParsedLines::default();
    for (offset, line) in text.lines().enumerate() {
        parsed.lines += 1;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match serde_json::from_str::<FeedRecord>(line) {
            Ok(FeedRecord::Event(event)) => parsed.events.push(event),
            Ok(FeedRecord::Totals { totals }) => parsed.totals = Some(totals),
            Err(source) => {
                parsed.malformed += 1;
                if parsed.errors.len() < MAX_FEED_LINE_WARNINGS {
                    parsed.errors.push(FeedError::LineParse {
                        path: path.to_path_buf(),
                        line_number: first_line + offset as u64,
                        source,
                    });
                }
            }
        }
    }
    parsed
}

/// Read and decode a whole event file.
///
/// A missing or unreadable file is an error; malformed lines are not.
pub fn load_events(path: &Path) -> Result<ParsedLines, FeedError> {
    let bytes = read_file(path)?;
    let text = String::from_utf8_lossy(&bytes);
    let parsed = parse_lines(&text, path, 1);
    tracing::info!(
        file = %path.display(),
        events = parsed.events.len(),
        malformed = parsed.malformed,
        "Loaded event file"
    );
    Ok(parsed)
}

fn read_file(path: &Path) -> Result<Vec<u8>, FeedError> {
    std::fs::read(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            FeedError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            FeedError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })
}

/// Split off everything up to and including the last newline in `buffer`
/// and decode it, leaving the in-progress remainder behind as raw bytes.
///
/// Only complete lines are decoded, so a multi-byte character split across
/// two reads survives intact.
fn take_complete_lines(buffer: &mut Vec<u8>) -> Option<String> {
    let nl_pos = buffer.iter().rposition(|&b| b == b'\n')?;
    let rest = buffer.split_off(nl_pos + 1);
    let complete = std::mem::replace(buffer, rest);
    Some(String::from_utf8_lossy(&complete).into_owned())
}

// =============================================================================
// FeedManager
// =============================================================================

/// Manages the event feed thread.
pub struct FeedManager {
    progress_rx: Option<mpsc::Receiver<FeedProgress>>,
    cancel_flag: Option<Arc<AtomicBool>>,
    follow: bool,
}

impl FeedManager {
    pub fn new() -> Self {
        Self {
            progress_rx: None,
            cancel_flag: None,
            follow: false,
        }
    }

    /// Start loading `path` on a background thread. With `follow`, keep
    /// polling every `poll_interval_ms` for appended lines until stopped.
    ///
    /// A feed that is already running is stopped first; its remaining
    /// messages are discarded.
    pub fn start(&mut self, path: PathBuf, follow: bool, poll_interval_ms: u64) {
        self.stop();

        let (tx, rx) = mpsc::channel();
        let cancel = Arc::new(AtomicBool::new(false));

        self.progress_rx = Some(rx);
        self.cancel_flag = Some(Arc::clone(&cancel));
        self.follow = follow;

        tracing::info!(file = %path.display(), follow, "Event feed started");
        std::thread::spawn(move || {
            run_feed(path, follow, poll_interval_ms, tx, cancel);
        });
    }

    /// Request the feed thread to stop.
    ///
    /// The thread exits within `FEED_CANCEL_CHECK_INTERVAL_MS` and sends
    /// `FeedProgress::Stopped`, which `poll_progress` still delivers.
    pub fn stop(&mut self) {
        if let Some(flag) = self.cancel_flag.take() {
            flag.store(true, Ordering::SeqCst);
        }
    }

    /// Returns `true` while the feed thread is running and has not been
    /// stopped. Becomes `false` once a terminal message (`Failed`,
    /// `Stopped`, or `Loaded` without follow) has been drained.
    pub fn is_active(&self) -> bool {
        self.cancel_flag.is_some()
    }

    /// Drain up to `max` queued messages without blocking.
    pub fn poll_progress(&mut self, max: usize) -> Vec<FeedProgress> {
        let mut messages = Vec::new();
        let mut finished = false;
        if let Some(ref rx) = self.progress_rx {
            while messages.len() < max {
                match rx.try_recv() {
                    Ok(msg) => {
                        let terminal = match msg {
                            FeedProgress::Failed { .. } | FeedProgress::Stopped => true,
                            FeedProgress::Loaded { .. } => !self.follow,
                            _ => false,
                        };
                        messages.push(msg);
                        if terminal {
                            finished = true;
                            break;
                        }
                    }
                    Err(mpsc::TryRecvError::Empty) => break,
                    Err(mpsc::TryRecvError::Disconnected) => {
                        finished = true;
                        break;
                    }
                }
            }
        }
        if finished {
            tracing::debug!("Event feed finished");
            self.cancel_flag = None;
            self.progress_rx = None;
        }
        messages
    }
}

impl Default for FeedManager {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for FeedManager {
    fn drop(&mut self) {
        self.stop();
    }
}

// =============================================================================
// Background feed thread
// =============================================================================

struct FollowState {
    path: PathBuf,
    offset: u64,
    partial: Vec<u8>,
    next_line: u64,
}

fn run_feed(
    path: PathBuf,
    follow: bool,
    poll_interval_ms: u64,
    tx: mpsc::Sender<FeedProgress>,
    cancel: Arc<AtomicBool>,
) {
    macro_rules! send {
        ($msg:expr) => {
            if tx.send($msg).is_err() {
                // UI channel closed.
                return;
            }
        };
    }

    // -------------------------------------------------------------------------
    // Initial load. In follow mode an unterminated last line is held back
    // until it is completed.
    // -------------------------------------------------------------------------
    let bytes = match read_file(&path) {
        Ok(b) => b,
        Err(e) => {
            tracing::warn!(error = %e, "Event feed failed to start");
            send!(FeedProgress::Failed {
                error: e.to_string()
            });
            return;
        }
    };

    let mut state = FollowState {
        path,
        offset: bytes.len() as u64,
        partial: bytes,
        next_line: 1,
    };

    let initial = if follow {
        take_complete_lines(&mut state.partial).unwrap_or_default()
    } else {
        String::from_utf8_lossy(&std::mem::take(&mut state.partial)).into_owned()
    };
    let parsed = parse_lines(&initial, &state.path, state.next_line);
    state.next_line += parsed.lines;
    if !send_parsed(&tx, parsed, true) {
        return;
    }

    if !follow {
        return;
    }

    // -------------------------------------------------------------------------
    // Follow loop.
    // -------------------------------------------------------------------------
    let slices = (poll_interval_ms / FEED_CANCEL_CHECK_INTERVAL_MS).max(1);

    loop {
        for _ in 0..slices {
            std::thread::sleep(Duration::from_millis(FEED_CANCEL_CHECK_INTERVAL_MS));
            if cancel.load(Ordering::SeqCst) {
                send!(FeedProgress::Stopped);
                return;
            }
        }

        let current_size = match std::fs::metadata(&state.path) {
            Ok(m) => m.len(),
            Err(e) => {
                tracing::warn!(file = %state.path.display(), error = %e, "Feed: stat error");
                send!(FeedProgress::Warning {
                    message: format!("Cannot stat '{}': {e}", state.path.display()),
                });
                continue;
            }
        };

        if current_size < state.offset {
            tracing::info!(
                file = %state.path.display(),
                old_offset = state.offset,
                new_size = current_size,
                "Feed: file truncated or rotated, re-reading from start"
            );
            state.offset = 0;
            state.partial.clear();
            state.next_line = 1;
        }

        if current_size == state.offset {
            continue;
        }

        let available = (current_size - state.offset) as usize;
        let limit = available.min(MAX_FEED_READ_BYTES_PER_TICK);
        let new_bytes = match read_bytes_at(&state.path, state.offset, limit) {
            Ok(b) => b,
            Err(e) => {
                tracing::warn!(file = %state.path.display(), error = %e, "Feed: read error");
                send!(FeedProgress::Warning {
                    message: format!("Read error on '{}': {e}", state.path.display()),
                });
                continue;
            }
        };
        if new_bytes.is_empty() {
            continue;
        }
        state.offset += new_bytes.len() as u64;
        state.partial.extend_from_slice(&new_bytes);

        let Some(complete) = take_complete_lines(&mut state.partial) else {
            if state.partial.len() > MAX_FEED_PARTIAL_BYTES {
                let dropped = state.partial.len();
                state.partial.clear();
                send!(FeedProgress::Warning {
                    message: format!(
                        "Discarded {dropped} bytes without a newline in '{}'",
                        state.path.display()
                    ),
                });
            }
            continue;
        };

        let parsed = parse_lines(&complete, &state.path, state.next_line);
        state.next_line += parsed.lines;
        if !send_parsed(&tx, parsed, false) {
            return;
        }
    }
}

/// Forward parsed events and their warnings. Returns false once the UI has
/// hung up.
fn send_parsed(tx: &mpsc::Sender<FeedProgress>, parsed: ParsedLines, initial: bool) -> bool {
    for error in &parsed.errors {
        if tx
            .send(FeedProgress::Warning {
                message: error.to_string(),
            })
            .is_err()
        {
            return false;
        }
    }
    let suppressed = parsed.malformed.saturating_sub(parsed.errors.len());
    if suppressed > 0 {
        let message = format!("{suppressed} further malformed lines not shown");
        if tx.send(FeedProgress::Warning { message }).is_err() {
            return false;
        }
    }

    let ParsedLines { events, totals, .. } = parsed;
    if initial {
        tx.send(FeedProgress::Loaded { events, totals }).is_ok()
    } else if events.is_empty() && totals.is_none() {
        true
    } else {
        tracing::debug!(count = events.len(), "Feed: new events");
        tx.send(FeedProgress::NewEvents { events, totals }).is_ok()
    }
}

/// Read up to `limit` bytes from `path` starting at `offset`.
fn read_bytes_at(path: &Path, offset: u64, limit: usize) -> std::io::Result<Vec<u8>> {
    let mut file = std::fs::File::open(path)?;
    file.seek(SeekFrom::Start(offset))?;
    let mut buf = vec![0u8; limit];
    let n = file.read(&mut buf)?;
    buf.truncate(n);
    Ok(buf)
}
