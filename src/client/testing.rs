//! In-crate fakes for the client push core tests.

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Mutex,
};

use async_trait::async_trait;
use tokio::sync::Notify;
use uuid::Uuid;

use super::{
    platform::{NotificationContent, Permission, PlatformError, PushPlatform},
    store::SubscriptionStore,
};
use crate::{
    error::Error,
    model::Push_Subscription,
    types::{SubscriptionDescriptor, SubscriptionKeys},
};

pub fn descriptor(endpoint: &str) -> SubscriptionDescriptor {
    SubscriptionDescriptor {
        endpoint: endpoint.to_owned(),
        expiration_time: None,
        keys: SubscriptionKeys {
            p256dh: String::from("BNcRdreALRFXTkOOUHK1EtK2wtaz5Ry4YfYCA_0QTpQtUbVlUls0VJXg7A8u-Ts1XbjhazAkj7I99e8QcYP7DkM"),
            auth: String::from("tBHItJI5svbpez7KI4CCXg"),
        },
    }
}

#[derive(Debug)]
struct PlatformState {
    permission: Permission,
    prompt_result: Permission,
    active: Option<SubscriptionDescriptor>,
    notifications: Vec<NotificationContent>,
}

pub struct FakePlatform {
    supported: bool,
    fail_subscribe: bool,
    fail_unsubscribe: bool,
    fail_notification: bool,
    endpoint: String,
    state: Mutex<PlatformState>,
    subscribe_calls: AtomicUsize,
    unsubscribe_calls: AtomicUsize,
    gate: Option<Notify>,
}

impl FakePlatform {
    /// The prompt resolves to `Granted` unless the permission is already
    /// `Denied`, which the browser never re-prompts for.
    pub fn new(permission: Permission) -> Self {
        let prompt_result = match permission {
            Permission::Denied => Permission::Denied,
            _ => Permission::Granted,
        };

        FakePlatform {
            supported: true,
            fail_subscribe: false,
            fail_unsubscribe: false,
            fail_notification: false,
            endpoint: String::from("https://push.example/device-1"),
            state: Mutex::new(PlatformState {
                permission,
                prompt_result,
                active: None,
                notifications: vec![],
            }),
            subscribe_calls: AtomicUsize::new(0),
            unsubscribe_calls: AtomicUsize::new(0),
            gate: None,
        }
    }

    pub fn unsupported() -> Self {
        FakePlatform {
            supported: false,
            ..FakePlatform::new(Permission::Default)
        }
    }

    pub fn with_active(self, descriptor: SubscriptionDescriptor) -> Self {
        self.lock().active = Some(descriptor);
        self
    }

    pub fn with_prompt_result(self, result: Permission) -> Self {
        self.lock().prompt_result = result;
        self
    }

    pub fn failing_subscribe(mut self) -> Self {
        self.fail_subscribe = true;
        self
    }

    pub fn failing_unsubscribe(mut self) -> Self {
        self.fail_unsubscribe = true;
        self
    }

    pub fn failing_notification(mut self) -> Self {
        self.fail_notification = true;
        self
    }

    /// `subscribe()` blocks until `release()` is called.
    pub fn gated(mut self) -> Self {
        self.gate = Some(Notify::new());
        self
    }

    pub fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.notify_one();
        }
    }

    pub fn revoke_permission(&self) {
        self.lock().permission = Permission::Denied;
    }

    pub fn subscribe_calls(&self) -> usize {
        self.subscribe_calls.load(Ordering::SeqCst)
    }

    pub fn unsubscribe_calls(&self) -> usize {
        self.unsubscribe_calls.load(Ordering::SeqCst)
    }

    pub fn notifications(&self) -> Vec<NotificationContent> {
        self.lock().notifications.clone()
    }

    pub fn is_active(&self) -> bool {
        self.lock().active.is_some()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, PlatformState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl PushPlatform for FakePlatform {
    fn is_supported(&self) -> bool {
        self.supported
    }

    fn permission(&self) -> Permission {
        self.lock().permission
    }

    async fn request_permission(&self) -> Permission {
        let mut state = self.lock();
        state.permission = state.prompt_result;
        state.permission
    }

    async fn subscribe(
        &self,
        _application_server_key: &str,
    ) -> Result<SubscriptionDescriptor, PlatformError> {
        self.subscribe_calls.fetch_add(1, Ordering::SeqCst);

        if let Some(gate) = &self.gate {
            gate.notified().await;
        }

        if self.fail_subscribe {
            return Err(PlatformError::PushService(String::from(
                "registration failed",
            )));
        }

        let d = descriptor(&self.endpoint);
        self.lock().active = Some(d.clone());
        Ok(d)
    }

    async fn current_subscription(
        &self,
    ) -> Result<Option<SubscriptionDescriptor>, PlatformError> {
        Ok(self.lock().active.clone())
    }

    async fn unsubscribe(&self) -> Result<bool, PlatformError> {
        self.unsubscribe_calls.fetch_add(1, Ordering::SeqCst);

        if self.fail_unsubscribe {
            return Err(PlatformError::PushService(String::from(
                "unsubscribe failed",
            )));
        }

        Ok(self.lock().active.take().is_some())
    }

    async fn show_notification(
        &self,
        content: NotificationContent,
    ) -> Result<(), PlatformError> {
        if self.fail_notification {
            return Err(PlatformError::Notification(String::from(
                "no active registration",
            )));
        }

        self.lock().notifications.push(content);
        Ok(())
    }
}

/// Every call fails like an unreachable backend.
pub struct FailingStore;

#[async_trait]
impl SubscriptionStore for FailingStore {
    async fn persist(&self, _record: &Push_Subscription) -> Result<(), Error> {
        Err(Error::ServerError(String::from("network unreachable")))
    }

    async fn remove(&self, _user_id: Uuid, _endpoint: &str) -> Result<(), Error> {
        Err(Error::ServerError(String::from("network unreachable")))
    }
}
