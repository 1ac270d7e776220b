use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use tokio::{
    sync::{broadcast, watch},
    task::JoinHandle,
};
use tracing::{error, info, warn};

use super::{
    manager::{PushFailure, SubscriptionManager},
    platform::Permission,
};
use crate::error::Error;

const NOTICE_CAPACITY: usize = 16;

/// What the settings view renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PushState {
    pub permission: Permission,
    pub is_subscribed: bool,
    pub is_loading: bool,
    pub is_supported: bool,
}

/// Transient, non-blocking messages for the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Subscribed,
    Unsubscribed,
    Failure(PushFailure),
}

struct Inner {
    manager: SubscriptionManager,
    state: watch::Sender<PushState>,
    notices: broadcast::Sender<Notice>,
    running: AtomicUsize,
}

/// UI-facing push controller. Cloning shares the same state.
///
/// The controller does not reject overlapping pipelines; callers disable
/// their controls while `is_loading` is set.
#[derive(Clone)]
pub struct PushController {
    inner: Arc<Inner>,
}

/// Counts running pipelines; `is_loading` is cleared when the last one
/// ends, including on panic or abort.
struct LoadingGuard<'a> {
    inner: &'a Inner,
}

impl<'a> LoadingGuard<'a> {
    fn start(inner: &'a Inner) -> Self {
        inner.state.send_modify(|s| {
            inner.running.fetch_add(1, Ordering::SeqCst);
            s.is_loading = true;
        });
        LoadingGuard { inner }
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        let running = &self.inner.running;
        self.inner.state.send_modify(|s| {
            s.is_loading = running.fetch_sub(1, Ordering::SeqCst) > 1;
        });
    }
}

impl PushController {
    pub fn new(manager: SubscriptionManager) -> Self {
        let is_supported = manager.is_supported();
        let permission = if is_supported {
            manager.permission()
        } else {
            Permission::Default
        };

        let (state, _) = watch::channel(PushState {
            permission,
            is_subscribed: false,
            is_loading: false,
            is_supported,
        });
        let (notices, _) = broadcast::channel(NOTICE_CAPACITY);

        PushController {
            inner: Arc::new(Inner {
                manager,
                state,
                notices,
                running: AtomicUsize::new(0),
            }),
        }
    }

    pub fn state(&self) -> PushState {
        *self.inner.state.borrow()
    }

    pub fn watch(&self) -> watch::Receiver<PushState> {
        self.inner.state.subscribe()
    }

    pub fn notices(&self) -> broadcast::Receiver<Notice> {
        self.inner.notices.subscribe()
    }

    /// Reconciles with the browser. The store is never consulted.
    pub async fn mount(&self) {
        let manager = &self.inner.manager;

        if !manager.is_supported() {
            self.inner.state.send_modify(|s| {
                s.is_supported = false;
                s.is_subscribed = false;
            });
            return;
        }

        let permission = manager.permission();
        let is_subscribed = manager.get_subscription_status().await;

        if permission == Permission::Denied && is_subscribed {
            warn!("Push subscription active while notification permission is denied");
        }

        self.inner.state.send_modify(|s| {
            s.is_supported = true;
            s.permission = permission;
            s.is_subscribed = is_subscribed;
        });
    }

    pub async fn subscribe(&self) {
        if !self.state().is_supported {
            return;
        }

        let outcome = {
            let _loading = LoadingGuard::start(&self.inner);
            self.run_subscribe().await
        };

        match outcome {
            Ok(()) => {
                info!("Push notifications enabled");
                self.notify(Notice::Subscribed);
            },
            Err(failure) => {
                warn!("Push subscribe failed: {}", failure);
                self.notify(Notice::Failure(failure));
            },
        }
    }

    async fn run_subscribe(&self) -> Result<(), PushFailure> {
        let manager = &self.inner.manager;

        let permission = manager.request_permission().await;
        self.inner.state.send_modify(|s| s.permission = permission);

        if permission != Permission::Granted {
            return Err(PushFailure::PermissionDenied);
        }

        let descriptor = manager
            .subscribe_to_push()
            .await
            .ok_or(PushFailure::SubscriptionFailure)?;

        manager
            .persist_subscription(&descriptor)
            .await
            .map_err(|e| {
                error!("Persisting push subscription failed: {}", e);
                PushFailure::PersistenceFailure(e.to_string())
            })?;

        self.inner.state.send_modify(|s| s.is_subscribed = true);
        manager.show_confirmation().await;

        Ok(())
    }

    pub async fn unsubscribe(&self) {
        if !self.state().is_supported {
            return;
        }

        let _loading = LoadingGuard::start(&self.inner);
        let manager = &self.inner.manager;

        match manager.unsubscribe_from_push().await {
            Ok(()) => {
                self.inner.state.send_modify(|s| s.is_subscribed = false);
                info!("Push notifications disabled");
                self.notify(Notice::Unsubscribed);
            },
            Err(failure @ PushFailure::LocalUnsubscribeFailure(_)) => {
                let is_subscribed = manager.get_subscription_status().await;
                self.inner
                    .state
                    .send_modify(|s| s.is_subscribed = is_subscribed);
                warn!("Push unsubscribe failed: {}", failure);
                self.notify(Notice::Failure(failure));
            },
            Err(failure) => {
                self.inner.state.send_modify(|s| s.is_subscribed = false);
                warn!("Push unsubscribe incomplete: {}", failure);
                self.notify(Notice::Failure(failure));
            },
        }
    }

    pub fn spawn_subscribe(&self) -> PipelineHandle {
        let controller = self.clone();
        PipelineHandle {
            task: tokio::spawn(async move { controller.subscribe().await }),
        }
    }

    pub fn spawn_unsubscribe(&self) -> PipelineHandle {
        let controller = self.clone();
        PipelineHandle {
            task: tokio::spawn(async move { controller.unsubscribe().await }),
        }
    }

    fn notify(&self, notice: Notice) {
        // No receivers just means no view is listening.
        let _ = self.inner.notices.send(notice);
    }
}

/// A running pipeline. Dropping or abandoning it does not cancel the work.
#[derive(Debug)]
pub struct PipelineHandle {
    task: JoinHandle<()>,
}

impl PipelineHandle {
    pub async fn join(self) -> Result<(), Error> {
        self.task.await?;
        Ok(())
    }

    pub fn abandon(self) {
        info!("Push pipeline detached from view");
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}
