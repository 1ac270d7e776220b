use std::{fmt, io, str::FromStr};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::types::SubscriptionDescriptor;

/// `Notification.permission`, owned by the browser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Permission {
    Default,
    Granted,
    Denied,
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Permission::Default => write!(f, "default"),
            Permission::Granted => write!(f, "granted"),
            Permission::Denied => write!(f, "denied"),
        }
    }
}

impl FromStr for Permission {
    type Err = io::Error;

    fn from_str(value: &str) -> Result<Permission, Self::Err> {
        match value {
            "default" => Ok(Permission::Default),
            "granted" => Ok(Permission::Granted),
            "denied" => Ok(Permission::Denied),
            _ => Err(io::Error::other("Permission not supported")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationContent {
    pub title: String,
    pub body: String,
    pub icon: Option<String>,
    pub badge: Option<String>,
    pub tag: Option<String>,
    pub url: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
    #[error("Service worker not ready: {0}")]
    ServiceWorker(String),

    #[error("Push service error: {0}")]
    PushService(String),

    #[error("Notification error: {0}")]
    Notification(String),
}

/// Browser capabilities the push core depends on.
#[async_trait]
pub trait PushPlatform: Send + Sync {
    /// Notification API and service worker support are both present.
    fn is_supported(&self) -> bool;

    fn permission(&self) -> Permission;

    /// Shows the native prompt. A declined prompt resolves to `Denied`.
    async fn request_permission(&self) -> Permission;

    /// `PushManager.subscribe()` on the active service worker registration.
    async fn subscribe(
        &self,
        application_server_key: &str,
    ) -> Result<SubscriptionDescriptor, PlatformError>;

    /// `PushManager.getSubscription()`; the browser's view is authoritative.
    async fn current_subscription(
        &self,
    ) -> Result<Option<SubscriptionDescriptor>, PlatformError>;

    /// Returns `false` when there was nothing to unsubscribe.
    async fn unsubscribe(&self) -> Result<bool, PlatformError>;

    async fn show_notification(
        &self,
        content: NotificationContent,
    ) -> Result<(), PlatformError>;
}
