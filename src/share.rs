//! Invite links and clipboard copy.

use crate::constants::{APP_NAME, APP_URL};
use base64::Engine;
use std::io::{self, Write};
use url::Url;

const PITCH: &str = "Manage your data and privacy with ease";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShareTarget {
    WhatsApp,
    Facebook,
    X,
    YouTube,
    Email,
}

impl ShareTarget {
    pub const ALL: [ShareTarget; 5] = [
        ShareTarget::WhatsApp,
        ShareTarget::Facebook,
        ShareTarget::X,
        ShareTarget::YouTube,
        ShareTarget::Email,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ShareTarget::WhatsApp => "WhatsApp",
            ShareTarget::Facebook => "Facebook",
            ShareTarget::X => "X",
            ShareTarget::YouTube => "YouTube",
            ShareTarget::Email => "Email",
        }
    }

    /// Destination link with the invite text filled in.
    pub fn link(self) -> Result<Url, url::ParseError> {
        match self {
            ShareTarget::WhatsApp => Url::parse_with_params(
                "https://wa.me/",
                &[("text", format!("Try {APP_NAME}! {PITCH}: {APP_URL}"))],
            ),
            ShareTarget::Facebook => Url::parse_with_params(
                "https://www.facebook.com/sharer/sharer.php",
                &[("u", APP_URL)],
            ),
            ShareTarget::X => Url::parse_with_params(
                "https://twitter.com/intent/tweet",
                &[
                    ("text", format!("Try {APP_NAME}!")),
                    ("url", APP_URL.to_string()),
                ],
            ),
            ShareTarget::YouTube => Url::parse_with_params(
                "https://www.youtube.com/results",
                &[("search_query", APP_NAME)],
            ),
            ShareTarget::Email => Url::parse_with_params(
                "mailto:",
                &[
                    ("subject", format!("{APP_NAME} invitation")),
                    ("body", format!("Hi, try this app: {APP_URL}")),
                ],
            ),
        }
    }
}

/// Puts `text` on the terminal's clipboard with an OSC 52 sequence.
///
/// Terminals without OSC 52 support drop the sequence silently.
pub fn copy_to_clipboard(out: &mut impl Write, text: &str) -> io::Result<()> {
    let payload = base64::engine::general_purpose::STANDARD.encode(text);
    write!(out, "\x1b]52;c;{payload}\x07")?;
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(url: &Url, key: &str) -> Option<String> {
        url.query_pairs()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.into_owned())
    }

    #[test]
    fn test_every_target_embeds_app() {
        for target in ShareTarget::ALL {
            let link = target.link().unwrap();
            let values: Vec<_> = link.query_pairs().map(|(_, v)| v.into_owned()).collect();
            assert!(
                values.iter().any(|v| v.contains(APP_URL) || v.contains(APP_NAME)),
                "{} link is missing the app reference",
                target.name()
            );
        }
    }

    #[test]
    fn test_whatsapp_link_is_encoded() {
        let link = ShareTarget::WhatsApp.link().unwrap();
        assert_eq!(link.host_str(), Some("wa.me"));
        assert!(!link.as_str().contains(' '));
        assert!(query(&link, "text").unwrap().ends_with(APP_URL));
    }

    #[test]
    fn test_email_link_is_mailto() {
        let link = ShareTarget::Email.link().unwrap();
        assert_eq!(link.scheme(), "mailto");
        assert!(query(&link, "body").unwrap().contains(APP_URL));
    }

    #[test]
    fn test_facebook_shares_app_url() {
        let link = ShareTarget::Facebook.link().unwrap();
        assert_eq!(query(&link, "u").as_deref(), Some(APP_URL));
    }

    #[test]
    fn test_copy_writes_osc52() {
        let mut out = Vec::new();
        copy_to_clipboard(&mut out, "abc").unwrap();
        assert_eq!(out, b"\x1b]52;c;YWJj\x07");
    }
}
