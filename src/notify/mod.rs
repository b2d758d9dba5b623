use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// How long a toast stays on screen once displayed.
pub const TOAST_DURATION: Duration = Duration::from_millis(3000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
    Info,
    Warning,
}

impl ToastKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ToastKind::Success => "success",
            ToastKind::Error => "error",
            ToastKind::Info => "info",
            ToastKind::Warning => "warning",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub id: u64,
    pub message: String,
    pub kind: ToastKind,
}

struct Listener {
    id: u64,
    tx: Sender<Toast>,
}

/// Broadcast bus for transient notifications. Cloning the hub shares the
/// listener list, so any part of the app (including background tasks) can
/// raise a toast and every live subscriber sees it.
#[derive(Clone)]
pub struct NotificationHub {
    listeners: Arc<Mutex<Vec<Listener>>>,
    next_listener_id: Arc<AtomicU64>,
    next_toast_id: Arc<AtomicU64>,
}

/// Held by whoever renders toasts. Dropping it unsubscribes.
pub struct ToastReceiver {
    id: u64,
    rx: Receiver<Toast>,
    hub: NotificationHub,
}

impl ToastReceiver {
    pub fn try_recv(&self) -> Option<Toast> {
        self.rx.try_recv().ok()
    }
}

impl Drop for ToastReceiver {
    fn drop(&mut self) {
        self.hub.unsubscribe(self.id);
    }
}

impl NotificationHub {
    pub fn new() -> Self {
        Self {
            listeners: Arc::new(Mutex::new(Vec::new())),
            next_listener_id: Arc::new(AtomicU64::new(1)),
            next_toast_id: Arc::new(AtomicU64::new(1)),
        }
    }

    pub fn subscribe(&self) -> ToastReceiver {
        let id = self.next_listener_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = mpsc::channel();
        if let Ok(mut listeners) = self.listeners.lock() {
            listeners.push(Listener { id, tx });
        }
        ToastReceiver {
            id,
            rx,
            hub: self.clone(),
        }
    }

    fn unsubscribe(&self, listener_id: u64) {
        if let Ok(mut listeners) = self.listeners.lock() {
            listeners.retain(|listener| listener.id != listener_id);
        }
    }

    /// Delivers one toast to every live listener. With no listeners the
    /// message is dropped.
    pub fn show(&self, message: impl Into<String>, kind: ToastKind) {
        let toast = Toast {
            id: self.next_toast_id.fetch_add(1, Ordering::Relaxed),
            message: message.into(),
            kind,
        };
        let Ok(mut listeners) = self.listeners.lock() else {
            return;
        };
        listeners.retain(|listener| listener.tx.send(toast.clone()).is_ok());
    }

    pub fn success(&self, message: impl Into<String>) {
        self.show(message, ToastKind::Success);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.show(message, ToastKind::Error);
    }

    pub fn info(&self, message: impl Into<String>) {
        self.show(message, ToastKind::Info);
    }

    pub fn warning(&self, message: impl Into<String>) {
        self.show(message, ToastKind::Warning);
    }
}

impl Default for NotificationHub {
    fn default() -> Self {
        Self::new()
    }
}
