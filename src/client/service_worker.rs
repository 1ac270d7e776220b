//! Push event handling on the service worker side: turns the raw push
//! message data into the system notification that gets shown, and picks
//! the page a click opens.

use serde::Deserialize;

use super::platform::NotificationContent;

pub const APP_TITLE: &str = "PetCare";
pub const DEFAULT_BODY: &str = "You have a new notification";
pub const DEFAULT_ICON: &str = "/icons/icon-192x192.png";
pub const DEFAULT_BADGE: &str = "/icons/badge-72x72.png";
pub const DEFAULT_URL: &str = "/";

#[derive(Debug, Default, Deserialize)]
struct IncomingPush {
    title: Option<String>,
    body: Option<String>,
    icon: Option<String>,
    badge: Option<String>,
    tag: Option<String>,
    url: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

pub fn render_push(data: Option<&[u8]>) -> NotificationContent {
    let data = data.unwrap_or_default();

    let incoming = match serde_json::from_slice::<IncomingPush>(data) {
        Ok(incoming) => incoming,
        Err(_) => {
            let text = String::from_utf8_lossy(data).trim().to_owned();
            IncomingPush {
                body: Some(text),
                ..IncomingPush::default()
            }
        },
    };

    NotificationContent {
        title: non_empty(incoming.title)
            .unwrap_or_else(|| String::from(APP_TITLE)),
        body: non_empty(incoming.body)
            .unwrap_or_else(|| String::from(DEFAULT_BODY)),
        icon: Some(
            non_empty(incoming.icon)
                .unwrap_or_else(|| String::from(DEFAULT_ICON)),
        ),
        badge: Some(
            non_empty(incoming.badge)
                .unwrap_or_else(|| String::from(DEFAULT_BADGE)),
        ),
        tag: non_empty(incoming.tag),
        url: non_empty(incoming.url),
    }
}

/// Page to focus or open when the notification is clicked.
pub fn click_target(content: &NotificationContent) -> &str {
    content.url.as_deref().unwrap_or(DEFAULT_URL)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_payload_with_title() {
        let content = render_push(Some(
            br#"{"title":"Max: Rabies","body":"Due in 3 days","tag":"health-record-7","url":"/health?record=7"}"#,
        ));

        assert_eq!(content.title, "Max: Rabies");
        assert_eq!(content.body, "Due in 3 days");
        assert_eq!(content.tag.as_deref(), Some("health-record-7"));
        assert_eq!(content.icon.as_deref(), Some(DEFAULT_ICON));
        assert_eq!(click_target(&content), "/health?record=7");
    }

    #[test]
    fn test_json_payload_without_title_uses_app_title() {
        let content = render_push(Some(br#"{"body":"Flea treatment due"}"#));

        assert_eq!(content.title, APP_TITLE);
        assert_eq!(content.body, "Flea treatment due");
        assert_eq!(click_target(&content), DEFAULT_URL);
    }

    #[test]
    fn test_plain_text_payload_becomes_body() {
        let content = render_push(Some(b"  Time for a walk  "));

        assert_eq!(content.title, APP_TITLE);
        assert_eq!(content.body, "Time for a walk");
        assert_eq!(content.tag, None);
    }

    #[test]
    fn test_empty_payload_renders_default() {
        for data in [None, Some(&b""[..])] {
            let content = render_push(data);
            assert_eq!(content.title, APP_TITLE);
            assert_eq!(content.body, DEFAULT_BODY);
            assert_eq!(content.badge.as_deref(), Some(DEFAULT_BADGE));
        }
    }

    #[test]
    fn test_non_object_json_is_treated_as_text() {
        let content = render_push(Some(b"42"));
        assert_eq!(content.body, "42");
    }
}
