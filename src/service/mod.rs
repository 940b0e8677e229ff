//! The async alert service.
//!
//! All mutations to the entry collection and snooze table happen on one
//! worker task; external callers hold a cloneable [`AlertService`] handle and
//! submit operations as messages into its queue. The worker processes them
//! strictly in submission order, so queries observe a totally-ordered,
//! race-free view of the manager.

mod worker;

use thiserror::Error;
use tokio::{
    sync::{mpsc, oneshot},
    task::JoinHandle,
};
use tokio_util::sync::CancellationToken;

use crate::{
    engine::lifecycle::{AlertLifecycleManager, AlertTiming},
    models::{AlertEntry, AlertEvent, AlertMetadata},
};
use worker::Worker;

/// A subscriber callback invoked synchronously for every emitted event.
pub type EventListener = Box<dyn Fn(&AlertEvent) + Send>;

/// Errors surfaced by the service handle.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The channel for communicating with the worker task was closed
    /// unexpectedly.
    #[error("Channel closed")]
    ChannelClosed,
}

/// Messages submitted to the worker task.
pub(crate) enum Command {
    Add { key: String, metadata: AlertMetadata },
    Update { key: String, metadata: AlertMetadata },
    Remove { key: String },
    SetExpanded { key: String, expanded: bool },
    SetRemoteInputActive { key: String, active: bool },
    SnoozeAll,
    UnpinAll { user_initiated: bool },
    SetUser { user: i64 },
    SetTiming { timing: AlertTiming },
    Subscribe { listener: EventListener },
    TopEntry { reply: oneshot::Sender<Option<AlertEntry>> },
    HasPinnedEntry { reply: oneshot::Sender<bool> },
    IsSnoozed { package: String, reply: oneshot::Sender<bool> },
}

/// Cloneable handle to the alert worker task.
#[derive(Clone)]
pub struct AlertService {
    tx: mpsc::Sender<Command>,
}

impl AlertService {
    /// Spawns the worker task that owns `manager` and returns the handle to
    /// it. The worker drains its queue until every handle is dropped or
    /// `cancel` fires.
    pub fn start(
        manager: AlertLifecycleManager,
        capacity: usize,
        cancel: CancellationToken,
    ) -> (Self, JoinHandle<()>) {
        let (tx, rx) = mpsc::channel(capacity);
        let worker = Worker::new(manager, rx, cancel);
        let join = tokio::spawn(worker.run());
        (Self { tx }, join)
    }

    async fn send(&self, command: Command) -> Result<(), ServiceError> {
        self.tx.send(command).await.map_err(|_| ServiceError::ChannelClosed)
    }

    async fn query<R>(
        &self,
        make: impl FnOnce(oneshot::Sender<R>) -> Command,
    ) -> Result<R, ServiceError> {
        let (reply, rx) = oneshot::channel();
        self.send(make(reply)).await?;
        rx.await.map_err(|_| ServiceError::ChannelClosed)
    }

    /// Submits an `add` for `key`. Duplicate keys are ignored by the worker.
    pub async fn add(
        &self,
        key: impl Into<String>,
        metadata: AlertMetadata,
    ) -> Result<(), ServiceError> {
        self.send(Command::Add { key: key.into(), metadata }).await
    }

    /// Submits an `update` for a tracked key.
    pub async fn update(
        &self,
        key: impl Into<String>,
        metadata: AlertMetadata,
    ) -> Result<(), ServiceError> {
        self.send(Command::Update { key: key.into(), metadata }).await
    }

    /// Submits a removal for `key`.
    pub async fn remove(&self, key: impl Into<String>) -> Result<(), ServiceError> {
        self.send(Command::Remove { key: key.into() }).await
    }

    /// Marks a pinned entry expanded or collapsed.
    pub async fn set_expanded(
        &self,
        key: impl Into<String>,
        expanded: bool,
    ) -> Result<(), ServiceError> {
        self.send(Command::SetExpanded { key: key.into(), expanded }).await
    }

    /// Records remote-input composition state for `key`.
    pub async fn set_remote_input_active(
        &self,
        key: impl Into<String>,
        active: bool,
    ) -> Result<(), ServiceError> {
        self.send(Command::SetRemoteInputActive { key: key.into(), active }).await
    }

    /// Snoozes the package of every tracked entry.
    pub async fn snooze_all(&self) -> Result<(), ServiceError> {
        self.send(Command::SnoozeAll).await
    }

    /// Unpins every tracked entry.
    pub async fn unpin_all(&self, user_initiated: bool) -> Result<(), ServiceError> {
        self.send(Command::UnpinAll { user_initiated }).await
    }

    /// Switches the user snooze records are evaluated against.
    pub async fn set_user(&self, user: i64) -> Result<(), ServiceError> {
        self.send(Command::SetUser { user }).await
    }

    /// Applies new timing configuration.
    pub async fn set_timing(&self, timing: AlertTiming) -> Result<(), ServiceError> {
        self.send(Command::SetTiming { timing }).await
    }

    /// Registers a subscriber for all subsequent events.
    pub async fn subscribe(&self, listener: EventListener) -> Result<(), ServiceError> {
        self.send(Command::Subscribe { listener }).await
    }

    /// Returns the highest-priority tracked entry, if any.
    pub async fn top_entry(&self) -> Result<Option<AlertEntry>, ServiceError> {
        self.query(|reply| Command::TopEntry { reply }).await
    }

    /// True iff any tracked entry is pinned.
    pub async fn has_pinned_entry(&self) -> Result<bool, ServiceError> {
        self.query(|reply| Command::HasPinnedEntry { reply }).await
    }

    /// Returns whether `package` is snoozed for the current user.
    pub async fn is_snoozed(&self, package: impl Into<String>) -> Result<bool, ServiceError> {
        let package = package.into();
        self.query(|reply| Command::IsSnoozed { package, reply }).await
    }
}
