//! Prompt display snapshot
//!
//! Pure derivation from the notification state for whatever surface the
//! host renders. No DOM or styling concerns live in this crate.

use serde::{Deserialize, Serialize};

/// Display URLs longer than this are cut with a `..` suffix.
const TRUNCATE_LENGTH: usize = 50;

/// Everything a prompt surface needs to render one notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptView {
    /// Popups observed since the prompt became visible
    pub blocked_count: u32,
    /// Seconds until the prompt resolves to timeout-deny
    pub remaining_seconds: u32,
    /// Requested URL, resolved against the page host when relative
    pub url: String,
    /// Truncated form of `url` for constrained surfaces
    pub display_url: String,
}

impl PromptView {
    pub fn new(hostname: &str, raw_url: &str, blocked_count: u32, remaining_seconds: u32) -> Self {
        let url = resolve_display_url(hostname, raw_url);
        let display_url = truncate_url(&url);
        Self {
            blocked_count,
            remaining_seconds,
            url,
            display_url,
        }
    }
}

/// Host-relative URLs (leading `/`) are shown against the current page
/// host; anything else is forwarded verbatim, malformed or not.
fn resolve_display_url(hostname: &str, url: &str) -> String {
    if url.starts_with('/') {
        format!("{}{}", hostname, url)
    } else {
        url.to_string()
    }
}

fn truncate_url(url: &str) -> String {
    if url.chars().count() > TRUNCATE_LENGTH {
        let head: String = url.chars().take(TRUNCATE_LENGTH).collect();
        format!("{}..", head)
    } else {
        url.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_url_resolved_against_host() {
        let view = PromptView::new("shop.example.com", "/offer.html", 1, 15);
        assert_eq!(view.url, "shop.example.com/offer.html");
    }

    #[test]
    fn test_absolute_url_forwarded_verbatim() {
        let view = PromptView::new("shop.example.com", "https://ads.invalid/p", 1, 15);
        assert_eq!(view.url, "https://ads.invalid/p");
        assert_eq!(view.display_url, "https://ads.invalid/p");
    }

    #[test]
    fn test_long_url_truncated() {
        let long = format!("https://ads.invalid/{}", "x".repeat(60));
        let view = PromptView::new("example.com", &long, 1, 15);

        assert_eq!(view.display_url.chars().count(), 52);
        assert!(view.display_url.ends_with(".."));
        // The full URL is preserved alongside the truncated form
        assert_eq!(view.url, long);
    }

    #[test]
    fn test_malformed_url_not_validated() {
        let view = PromptView::new("example.com", "not a url at all", 2, 9);
        assert_eq!(view.url, "not a url at all");
        assert_eq!(view.blocked_count, 2);
        assert_eq!(view.remaining_seconds, 9);
    }
}
