//! Push notification types
//!
//! Wire types shared by the delivery side (VAPID + aes128gcm) and the
//! client push core: the browser-issued subscription descriptor, the
//! notification payload, and the per-message delivery headers.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD as BASE64_URL, Engine};
use serde::{Deserialize, Serialize};
use std::{fmt, io, str::FromStr};

use crate::error::Error;

// =============================================================================
// Push Message Types
// =============================================================================

#[derive(Debug, Clone)]
pub struct PushHeader {
    pub ttl: i64,
    pub urgency: Urgency,
}

/// Payload rendered by the service worker as a system notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PushPayload {
    pub title: String,
    pub body: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl fmt::Display for PushPayload {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let json = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        write!(f, "{}", json)
    }
}

// =============================================================================
// Urgency Enum
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum Urgency {
    VeryLow,
    Low,
    Normal,
    High,
}

impl fmt::Display for Urgency {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Urgency::VeryLow => write!(f, "very-low"),
            Urgency::Low => write!(f, "low"),
            Urgency::Normal => write!(f, "normal"),
            Urgency::High => write!(f, "high"),
        }
    }
}

impl FromStr for Urgency {
    type Err = io::Error;

    fn from_str(value: &str) -> Result<Urgency, Self::Err> {
        match value {
            "very-low" => Ok(Urgency::VeryLow),
            "low" => Ok(Urgency::Low),
            "normal" => Ok(Urgency::Normal),
            "high" => Ok(Urgency::High),
            _ => Err(io::Error::other("Urgency not supported")),
        }
    }
}

// =============================================================================
// Subscription Descriptor
// =============================================================================

/// The JSON object a browser returns from `PushManager.subscribe()`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionDescriptor {
    pub endpoint: String,
    #[serde(
        default,
        alias = "expirationTime",
        skip_serializing_if = "Option::is_none"
    )]
    pub expiration_time: Option<i64>,
    pub keys: SubscriptionKeys,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionKeys {
    pub p256dh: String,
    pub auth: String,
}

impl SubscriptionDescriptor {
    pub fn validate(&self) -> Result<(), Error> {
        let url = url::Url::parse(&self.endpoint)?;

        if url.scheme() != "https" {
            return Err(Error::InvalidOption {
                option: format!("endpoint scheme {}", url.scheme()),
            });
        }

        if url.host().is_none() {
            return Err(Error::InvalidOption {
                option: String::from("endpoint host"),
            });
        }

        if self.keys.p256dh.trim().is_empty() {
            return Err(Error::MissingParams(String::from("keys.p256dh")));
        }

        if self.keys.auth.trim().is_empty() {
            return Err(Error::MissingParams(String::from("keys.auth")));
        }

        for (name, value) in
            [("p256dh", &self.keys.p256dh), ("auth", &self.keys.auth)]
        {
            BASE64_URL.decode(value.trim_end_matches('=')).map_err(|e| {
                Error::InvalidOption {
                    option: format!("keys.{} is not base64url: {}", name, e),
                }
            })?;
        }

        Ok(())
    }
}

// =============================================================================
// JWT Claims
// =============================================================================

/// VAPID claims signed with the application server key.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub aud: String,
    pub sub: String,
    pub exp: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(endpoint: &str) -> SubscriptionDescriptor {
        SubscriptionDescriptor {
            endpoint: endpoint.to_string(),
            expiration_time: None,
            keys: SubscriptionKeys {
                p256dh: String::from("BNcRdreALRFXTkOOUHK1EtK2wtaz5Ry4YfYCA_0QTpQtUbVlUls0VJXg7A8u-Ts1XbjhazAkj7I99e8QcYP7DkM"),
                auth: String::from("tBHItJI5svbpez7KI4CCXg"),
            },
        }
    }

    #[test]
    fn test_descriptor_accepts_browser_json() {
        let json = r#"{
            "endpoint": "https://fcm.googleapis.com/fcm/send/abc",
            "expirationTime": null,
            "keys": { "p256dh": "BNcR", "auth": "tBHI" }
        }"#;
        let parsed: SubscriptionDescriptor = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.expiration_time, None);
        assert!(parsed.validate().is_ok());
    }

    #[test]
    fn test_descriptor_rejects_plain_http() {
        let d = descriptor("http://push.example.com/abc");
        assert!(matches!(d.validate(), Err(Error::InvalidOption { .. })));
    }

    #[test]
    fn test_descriptor_rejects_empty_keys() {
        let mut d = descriptor("https://push.example.com/abc");
        d.keys.auth = String::new();
        assert!(matches!(d.validate(), Err(Error::MissingParams(_))));
    }

    #[test]
    fn test_descriptor_rejects_non_base64url_keys() {
        let mut d = descriptor("https://push.example.com/abc");
        d.keys.p256dh = String::from("not base64/+");
        assert!(d.validate().is_err());
    }

    #[test]
    fn test_descriptor_rejects_undecodable_keys() {
        let mut d = descriptor("https://push.example.com/abc");
        d.keys.p256dh = String::from("=A=B");
        assert!(matches!(d.validate(), Err(Error::InvalidOption { .. })));

        let mut d = descriptor("https://push.example.com/abc");
        d.keys.auth = String::from("a");
        assert!(matches!(d.validate(), Err(Error::InvalidOption { .. })));
    }

    #[test]
    fn test_descriptor_accepts_padded_keys() {
        let mut d = descriptor("https://push.example.com/abc");
        d.keys.auth = String::from("tBHItJI5svbpez7KI4CCXg==");
        assert!(d.validate().is_ok());
    }

    #[test]
    fn test_payload_display_is_json() {
        let payload = PushPayload {
            title: String::from("Rabies booster"),
            body: String::from("Due in 3 days"),
            tag: Some(String::from("health-record-1")),
            url: None,
            icon: None,
        };
        let value: serde_json::Value =
            serde_json::from_str(&payload.to_string()).unwrap();
        assert_eq!(value["title"], "Rabies booster");
        assert!(value.get("url").is_none());
    }

    #[test]
    fn test_urgency_round_trips_header_value() {
        assert_eq!(Urgency::from_str("very-low").unwrap(), Urgency::VeryLow);
        assert_eq!(Urgency::High.to_string(), "high");
        assert!(Urgency::from_str("urgent").is_err());
    }
}
