//! Transient notification queue.
//!
//! Messages are shown oldest first and disappear either when the user
//! dismisses them or when their auto-expiry timer fires. Every removal path
//! funnels into the same idempotent dismissal, so an entry is removed at most
//! once no matter which path wins.
//!
//! Timers are tokio tasks keyed by notification id. Dismissing an entry aborts
//! its timers; dropping the queue aborts all of them.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, Weak};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, trace, warn};

/// How long a notification lives unless dismissed earlier.
pub const DEFAULT_AUTO_DISMISS: Duration = Duration::from_secs(5);

/// Ids are unique for the lifetime of the process, across all queues.
static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Identifier of a notification. Never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NotificationId(u64);

impl NotificationId {
    fn next() -> Self {
        Self(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// The raw numeric id.
    #[must_use]
    pub fn get(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for NotificationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// How a notification should be styled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Neutral information.
    #[default]
    Info,
    /// A completed action.
    Success,
    /// Something went wrong.
    Error,
}

impl Severity {
    /// A one-character indicator for plain-text rendering.
    #[must_use]
    pub fn indicator(self) -> &'static str {
        match self {
            Self::Info => "i",
            Self::Success => "✓",
            Self::Error => "✗",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Success => write!(f, "success"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// A single queued message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Unique id.
    pub id: NotificationId,
    /// Message text.
    pub text: String,
    /// Styling.
    pub severity: Severity,
}

/// Why an entry left the queue. Only used for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DismissCause {
    Manual,
    Countdown,
    Expired,
}

#[derive(Debug)]
struct QueueShared {
    messages: watch::Sender<Vec<Notification>>,
    timers: Mutex<HashMap<NotificationId, Vec<JoinHandle<()>>>>,
}

impl QueueShared {
    fn contains(&self, id: NotificationId) -> bool {
        self.messages.borrow().iter().any(|n| n.id == id)
    }

    fn dismiss(&self, id: NotificationId, cause: DismissCause) -> bool {
        let handles = self
            .timers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id);
        // A firing timer may abort itself here; it has no await left, so it
        // still runs to completion.
        for handle in handles.into_iter().flatten() {
            handle.abort();
        }

        let removed = self.messages.send_if_modified(|messages| {
            let before = messages.len();
            messages.retain(|n| n.id != id);
            messages.len() != before
        });
        if removed {
            debug!(%id, ?cause, "Dismissed notification");
        } else {
            trace!(%id, ?cause, "Notification already gone");
        }
        removed
    }

    fn abort_all(&self) {
        let mut timers = self.timers.lock().unwrap_or_else(PoisonError::into_inner);
        for handle in timers.drain().flat_map(|(_, handles)| handles) {
            handle.abort();
        }
    }
}

impl Drop for QueueShared {
    fn drop(&mut self) {
        self.abort_all();
    }
}

/// Ordered queue of ephemeral notifications.
#[derive(Debug)]
pub struct NotificationQueue {
    shared: Arc<QueueShared>,
    auto_dismiss: Duration,
}

impl Default for NotificationQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationQueue {
    /// Create an empty queue with the default 5 second expiry.
    #[must_use]
    pub fn new() -> Self {
        Self::with_auto_dismiss(DEFAULT_AUTO_DISMISS)
    }

    /// Create an empty queue with a custom expiry.
    #[must_use]
    pub fn with_auto_dismiss(auto_dismiss: Duration) -> Self {
        let (messages, _) = watch::channel(Vec::new());
        Self {
            shared: Arc::new(QueueShared {
                messages,
                timers: Mutex::new(HashMap::new()),
            }),
            auto_dismiss,
        }
    }

    /// The expiry applied to new entries.
    #[must_use]
    pub fn auto_dismiss(&self) -> Duration {
        self.auto_dismiss
    }

    /// Append a message and schedule its expiry.
    ///
    /// Expiry needs a tokio runtime. Without one the entry stays until
    /// dismissed by hand.
    pub fn enqueue(&self, text: impl Into<String>, severity: Severity) -> NotificationId {
        let id = NotificationId::next();
        let notification = Notification {
            id,
            text: text.into(),
            severity,
        };
        debug!(%id, %severity, "Enqueued notification");
        self.shared
            .messages
            .send_modify(|messages| messages.push(notification));
        self.schedule(id, self.auto_dismiss, DismissCause::Expired);
        id
    }

    /// Enqueue an [`Severity::Info`] message.
    pub fn info(&self, text: impl Into<String>) -> NotificationId {
        self.enqueue(text, Severity::Info)
    }

    /// Enqueue a [`Severity::Success`] message.
    pub fn success(&self, text: impl Into<String>) -> NotificationId {
        self.enqueue(text, Severity::Success)
    }

    /// Enqueue a [`Severity::Error`] message.
    pub fn error(&self, text: impl Into<String>) -> NotificationId {
        self.enqueue(text, Severity::Error)
    }

    /// Remove an entry and cancel its timers.
    ///
    /// Returns `false` if the entry was already gone.
    pub fn dismiss(&self, id: NotificationId) -> bool {
        self.shared.dismiss(id, DismissCause::Manual)
    }

    /// Dismiss an entry after `delay`, on top of its expiry timer.
    ///
    /// This is the display layer's countdown; whichever timer fires first
    /// removes the entry and cancels the other.
    pub fn dismiss_after(&self, id: NotificationId, delay: Duration) {
        self.schedule(id, delay, DismissCause::Countdown);
    }

    /// Remove every entry and cancel every timer.
    pub fn clear(&self) {
        self.shared.abort_all();
        self.shared.messages.send_if_modified(|messages| {
            let had_any = !messages.is_empty();
            messages.clear();
            had_any
        });
    }

    /// A snapshot of the queue, oldest first.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Notification> {
        self.shared.messages.borrow().clone()
    }

    /// Look up a single entry.
    #[must_use]
    pub fn get(&self, id: NotificationId) -> Option<Notification> {
        self.shared
            .messages
            .borrow()
            .iter()
            .find(|n| n.id == id)
            .cloned()
    }

    /// Number of queued entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.shared.messages.borrow().len()
    }

    /// Check if the queue is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shared.messages.borrow().is_empty()
    }

    /// Number of timers still waiting to fire.
    #[must_use]
    pub fn pending_timers(&self) -> usize {
        self.shared
            .timers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .flatten()
            .filter(|handle| !handle.is_finished())
            .count()
    }

    /// Subscribe to queue changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Vec<Notification>> {
        self.shared.messages.subscribe()
    }

    fn schedule(&self, id: NotificationId, delay: Duration, cause: DismissCause) {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            warn!(%id, "No async runtime; notification will not auto-dismiss");
            return;
        };

        // Hold the timer lock across spawn and insert so the timer cannot
        // fire before its handle is tracked.
        let mut timers = self
            .shared
            .timers
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if !self.shared.contains(id) {
            trace!(%id, "Not scheduling timer for absent notification");
            return;
        }

        let shared: Weak<QueueShared> = Arc::downgrade(&self.shared);
        let handle = runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            if let Some(shared) = shared.upgrade() {
                shared.dismiss(id, cause);
            }
        });
        timers.entry(id).or_default().push(handle);
    }
}
