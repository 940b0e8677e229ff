//! The worker task that owns the lifecycle manager.

use std::{collections::HashMap, panic::AssertUnwindSafe};

use futures::StreamExt;
use tokio::sync::mpsc;
use tokio_util::{
    sync::CancellationToken,
    time::{delay_queue, DelayQueue},
};

use super::{Command, EventListener};
use crate::{
    engine::lifecycle::{AlertLifecycleManager, Outcome, TimerOp},
    models::AlertEvent,
};

pub(crate) struct Worker {
    manager: AlertLifecycleManager,
    rx: mpsc::Receiver<Command>,
    timers: DelayQueue<String>,
    timer_keys: HashMap<String, delay_queue::Key>,
    listeners: Vec<EventListener>,
    cancel: CancellationToken,
}

impl Worker {
    pub(crate) fn new(
        manager: AlertLifecycleManager,
        rx: mpsc::Receiver<Command>,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            manager,
            rx,
            timers: DelayQueue::new(),
            timer_keys: HashMap::new(),
            listeners: Vec::new(),
            cancel,
        }
    }

    pub(crate) async fn run(mut self) {
        loop {
            tokio::select! {
                maybe_command = self.rx.recv() => match maybe_command {
                    Some(command) => self.handle(command),
                    None => break,
                },
                // An empty queue yields `None`, which just disables this
                // branch until the next loop iteration.
                Some(expired) = self.timers.next() => {
                    let key = expired.into_inner();
                    self.timer_keys.remove(&key);
                    let outcome = self.manager.handle_expiry(&key);
                    self.apply(outcome);
                }
                _ = self.cancel.cancelled() => {
                    tracing::info!("Alert worker received shutdown signal.");
                    break;
                }
            }
        }
        tracing::debug!("Alert worker stopped.");
    }

    fn handle(&mut self, command: Command) {
        match command {
            Command::Add { key, metadata } => {
                let outcome = self.manager.add(&key, metadata);
                self.apply(outcome);
            }
            Command::Update { key, metadata } => {
                let outcome = self.manager.update(&key, metadata);
                self.apply(outcome);
            }
            Command::Remove { key } => {
                let outcome = self.manager.remove(&key);
                self.apply(outcome);
            }
            Command::SetExpanded { key, expanded } => {
                let outcome = self.manager.set_expanded(&key, expanded);
                self.apply(outcome);
            }
            Command::SetRemoteInputActive { key, active } => {
                let outcome = self.manager.set_remote_input_active(&key, active);
                self.apply(outcome);
            }
            Command::SnoozeAll => self.manager.snooze_all(),
            Command::UnpinAll { user_initiated } => {
                let outcome = self.manager.unpin_all(user_initiated);
                self.apply(outcome);
            }
            Command::SetUser { user } => self.manager.set_user(user),
            Command::SetTiming { timing } => self.manager.set_timing(timing),
            Command::Subscribe { listener } => self.listeners.push(listener),
            Command::TopEntry { reply } => {
                let _ = reply.send(self.manager.top_entry().cloned());
            }
            Command::HasPinnedEntry { reply } => {
                let _ = reply.send(self.manager.has_pinned_entry());
            }
            Command::IsSnoozed { package, reply } => {
                let _ = reply.send(self.manager.is_snoozed(&package));
            }
        }
    }

    fn apply(&mut self, outcome: Outcome) {
        for op in outcome.timers {
            match op {
                TimerOp::Schedule { key, at } => {
                    let at = tokio::time::Instant::from_std(at);
                    match self.timer_keys.get(&key) {
                        Some(timer_key) => self.timers.reset_at(timer_key, at),
                        None => {
                            let timer_key = self.timers.insert_at(key.clone(), at);
                            self.timer_keys.insert(key, timer_key);
                        }
                    }
                }
                TimerOp::Cancel { key } => {
                    if let Some(timer_key) = self.timer_keys.remove(&key) {
                        self.timers.remove(&timer_key);
                    }
                }
            }
        }
        for event in &outcome.events {
            self.emit(event);
        }
    }

    /// Fans out one event. A panicking subscriber is logged and skipped so it
    /// cannot starve later subscribers or poison manager state.
    fn emit(&self, event: &AlertEvent) {
        for (index, listener) in self.listeners.iter().enumerate() {
            let call = AssertUnwindSafe(|| listener(event));
            if std::panic::catch_unwind(call).is_err() {
                tracing::error!(subscriber = index, ?event, "Alert subscriber panicked.");
            }
        }
    }
}
