//! Native dialog (alert/confirm/prompt) capture.
//!
//! Dialogs block the page until something answers them, so every page gets a
//! background task that accepts each dialog the moment it opens and forwards
//! a [`Dialog`] record over a channel. Test code never installs callbacks;
//! it arms a [`DialogExpectation`] before the triggering action and awaits
//! the record afterwards.
//!
//! ```ignore
//! let expectation = page.expect_dialog()?;
//! page.click(".btn-success").await?;
//! let dialog = expectation.wait(Duration::from_secs(5)).await?;
//! assert!(dialog.message.contains("Product added"));
//! ```

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use chromiumoxide::cdp::browser_protocol::page::{
    DialogType, EventJavascriptDialogOpening, HandleJavaScriptDialogParams,
};
use chromiumoxide::page::Page as ChromePage;
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::sync::{Mutex, MutexGuard};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::error::{BrowserError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DialogKind {
    Alert,
    Confirm,
    Prompt,
    BeforeUnload,
}

impl From<&DialogType> for DialogKind {
    fn from(kind: &DialogType) -> Self {
        match kind {
            DialogType::Alert => DialogKind::Alert,
            DialogType::Confirm => DialogKind::Confirm,
            DialogType::Prompt => DialogKind::Prompt,
            DialogType::Beforeunload => DialogKind::BeforeUnload,
        }
    }
}

/// A dialog that opened on the page and was accepted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dialog {
    pub kind: DialogKind,
    pub message: String,
    /// URL of the frame that opened the dialog.
    pub url: String,
    pub timestamp: SystemTime,
}

impl Dialog {
    pub fn new(kind: DialogKind, message: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            url: url.into(),
            timestamp: SystemTime::now(),
        }
    }

    pub fn message_contains(&self, needle: &str) -> bool {
        self.message.contains(needle)
    }
}

impl From<&EventJavascriptDialogOpening> for Dialog {
    fn from(event: &EventJavascriptDialogOpening) -> Self {
        Dialog::new(DialogKind::from(&event.r#type), event.message.clone(), event.url.clone())
    }
}

/// Producer half, owned by the page's handler task.
#[derive(Debug, Clone)]
pub(crate) struct DialogSender {
    tx: UnboundedSender<Dialog>,
    seen: Arc<AtomicUsize>,
}

impl DialogSender {
    pub(crate) fn send(&self, dialog: Dialog) {
        self.seen.fetch_add(1, Ordering::SeqCst);
        // The receiver lives as long as the page; a send after close is moot.
        let _ = self.tx.send(dialog);
    }
}

/// Consumer half, owned by the page.
#[derive(Debug)]
pub struct DialogInbox {
    rx: Mutex<UnboundedReceiver<Dialog>>,
    seen: Arc<AtomicUsize>,
}

impl DialogInbox {
    pub(crate) fn channel() -> (DialogSender, DialogInbox) {
        let (tx, rx) = mpsc::unbounded_channel();
        let seen = Arc::new(AtomicUsize::new(0));
        (
            DialogSender {
                tx,
                seen: seen.clone(),
            },
            DialogInbox {
                rx: Mutex::new(rx),
                seen,
            },
        )
    }

    /// Total dialogs accepted on this page so far.
    pub fn seen(&self) -> usize {
        self.seen.load(Ordering::SeqCst)
    }

    /// Arm an expectation: drop any dialog already delivered, then hold the
    /// inbox until the expectation is awaited or dropped.
    ///
    /// Only one expectation can be armed at a time; arming a second while
    /// the first is alive fails with [`BrowserError::DialogAlreadyArmed`].
    pub fn expect(&self) -> Result<DialogExpectation<'_>> {
        let mut rx = self
            .rx
            .try_lock()
            .map_err(|_| BrowserError::DialogAlreadyArmed)?;
        let mut stale = 0usize;
        while rx.try_recv().is_ok() {
            stale += 1;
        }
        if stale > 0 {
            debug!(stale, "discarded dialogs delivered before the expectation");
        }
        Ok(DialogExpectation { rx })
    }
}

/// An armed wait for the next dialog.
#[derive(Debug)]
pub struct DialogExpectation<'a> {
    rx: MutexGuard<'a, UnboundedReceiver<Dialog>>,
}

impl DialogExpectation<'_> {
    /// The next dialog, or a [`BrowserError::WaitTimeout`] if none opens in time.
    pub async fn wait(mut self, timeout: Duration) -> Result<Dialog> {
        match tokio::time::timeout(timeout, self.rx.recv()).await {
            Ok(Some(dialog)) => Ok(dialog),
            Ok(None) => Err(BrowserError::AlreadyClosed),
            Err(_) => Err(BrowserError::WaitTimeout {
                condition: "dialog to open".to_string(),
                timeout,
            }),
        }
    }
}

/// Subscribe to dialog events and start the accepting task.
///
/// The subscription is established before this returns, so no dialog
/// triggered afterwards can be missed.
pub(crate) async fn spawn_dialog_handler(
    page: Arc<ChromePage>,
) -> Result<(DialogInbox, JoinHandle<()>)> {
    let mut events = page
        .event_listener::<EventJavascriptDialogOpening>()
        .await
        .map_err(|e| BrowserError::ConnectionFailed(e.to_string()))?;

    let (sender, inbox) = DialogInbox::channel();

    let task = tokio::spawn(async move {
        while let Some(event) = events.next().await {
            let dialog = Dialog::from(&*event);
            if let Err(e) = page.execute(HandleJavaScriptDialogParams::new(true)).await {
                warn!("failed to accept {:?} dialog: {}", dialog.kind, e);
            }
            debug!(kind = ?dialog.kind, message = %dialog.message, "accepted dialog");
            sender.send(dialog);
        }
    });

    Ok((inbox, task))
}
