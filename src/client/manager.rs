use std::sync::Arc;

use tracing::{error, info, warn};
use uuid::Uuid;

use super::{
    platform::{NotificationContent, Permission, PushPlatform},
    store::SubscriptionStore,
};
use crate::{error::Error, model::Push_Subscription, types::SubscriptionDescriptor};

/// Failures of the push pipelines. All of them end up as UI notices.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PushFailure {
    #[error("Notifications are blocked. Allow them in your browser settings to get reminders.")]
    PermissionDenied,

    #[error("Push notifications are not supported on this browser.")]
    UnsupportedPlatform,

    #[error("Could not subscribe to push notifications. Please try again.")]
    SubscriptionFailure,

    #[error("Subscribed on this device, but saving the subscription failed: {0}")]
    PersistenceFailure(String),

    #[error("Notifications are off on this device; the server copy could not be removed: {0}")]
    UnsubscribeRemoteFailure(String),

    #[error("Could not turn off notifications on this device: {0}")]
    LocalUnsubscribeFailure(String),
}

/// Bridges the browser push APIs and the subscription store for one
/// signed-in user.
pub struct SubscriptionManager {
    platform: Arc<dyn PushPlatform>,
    store: Arc<dyn SubscriptionStore>,
    user_id: Uuid,
    application_server_key: Option<String>,
}

impl SubscriptionManager {
    pub fn new(
        platform: Arc<dyn PushPlatform>,
        store: Arc<dyn SubscriptionStore>,
        user_id: Uuid,
        application_server_key: Option<String>,
    ) -> Self {
        SubscriptionManager {
            platform,
            store,
            user_id,
            application_server_key,
        }
    }

    pub fn is_supported(&self) -> bool {
        self.platform.is_supported()
    }

    pub fn permission(&self) -> Permission {
        self.platform.permission()
    }

    pub async fn request_permission(&self) -> Permission {
        if !self.is_supported() {
            return Permission::Denied;
        }

        self.platform.request_permission().await
    }

    /// `None` covers every expected failure: permission not granted, no
    /// application server key, service worker or push service errors.
    pub async fn subscribe_to_push(&self) -> Option<SubscriptionDescriptor> {
        if self.permission() != Permission::Granted {
            warn!("Push subscribe attempted without granted permission");
            return None;
        }

        let key = match self.application_server_key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() => key,
            _ => {
                warn!("No VAPID public key configured");
                return None;
            },
        };

        match self.platform.subscribe(key).await {
            Ok(descriptor) => Some(descriptor),
            Err(e) => {
                warn!("Push subscribe failed: {}", e);
                None
            },
        }
    }

    pub async fn persist_subscription(
        &self,
        descriptor: &SubscriptionDescriptor,
    ) -> Result<(), Error> {
        descriptor.validate()?;
        let record =
            Push_Subscription::from_descriptor(self.user_id, descriptor, None)?;
        self.store.persist(&record).await
    }

    /// Unregisters on the device first, then deletes the stored copy. A
    /// failed remote delete still leaves the device unsubscribed.
    pub async fn unsubscribe_from_push(&self) -> Result<(), PushFailure> {
        let current = self
            .platform
            .current_subscription()
            .await
            .map_err(|e| PushFailure::LocalUnsubscribeFailure(e.to_string()))?;

        let descriptor = match current {
            Some(descriptor) => descriptor,
            None => {
                info!("No active push subscription to remove");
                return Ok(());
            },
        };

        self.platform
            .unsubscribe()
            .await
            .map_err(|e| PushFailure::LocalUnsubscribeFailure(e.to_string()))?;

        if let Err(e) = self.store.remove(self.user_id, &descriptor.endpoint).await
        {
            error!("Removing stored push subscription failed: {}", e);
            return Err(PushFailure::UnsubscribeRemoteFailure(e.to_string()));
        }

        Ok(())
    }

    /// Asks the browser, never the store.
    pub async fn get_subscription_status(&self) -> bool {
        if !self.is_supported() {
            return false;
        }

        match self.platform.current_subscription().await {
            Ok(current) => current.is_some(),
            Err(e) => {
                warn!("Reading push subscription failed: {}", e);
                false
            },
        }
    }

    pub async fn show_confirmation(&self) {
        let content = NotificationContent {
            title: String::from("Notifications enabled"),
            body: String::from(
                "You'll be reminded when vaccinations and supplies are due.",
            ),
            icon: None,
            badge: None,
            tag: Some(String::from("push-enabled")),
            url: None,
        };

        if let Err(e) = self.platform.show_notification(content).await {
            warn!("Confirmation notification failed: {}", e);
        }
    }
}
