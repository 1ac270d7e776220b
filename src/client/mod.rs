//! Push notification core used by the PWA shell.
//!
//! The browser's Notification, Service Worker and Push APIs are reached
//! only through [`PushPlatform`]; subscription persistence goes through
//! [`SubscriptionStore`]. [`PushController`] is the stateful surface the
//! UI binds to.

pub use self::{
    controller::{Notice, PipelineHandle, PushController, PushState},
    manager::{PushFailure, SubscriptionManager},
    platform::{NotificationContent, Permission, PlatformError, PushPlatform},
    service_worker::{click_target, render_push},
    store::{MemoryStore, RemoteStore, SubscriptionStore},
};

mod controller;
mod manager;
mod platform;
mod service_worker;
mod store;

#[cfg(test)]
mod testing;
