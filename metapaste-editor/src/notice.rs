//! Post-save notice.
//!
//! A bulk save suppresses the other save listeners, so the operator is told
//! to save once more. The hint travels as a one-time query argument on the
//! redirect; the admin screen shows the notice when it sees the argument and
//! strips it from the URL it displays.

use crate::dispatch::SaveContext;
use crate::panel::escape_html;
use metapaste_host::query;

const BULK_UPDATE_MESSAGE: &str = "All custom fields were replaced from the Post Meta Copy Paste \
                                   box. Other plugins were paused during that save, so please \
                                   update the post once more to let them process the new values.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Success,
    Warning,
    Error,
}

impl NoticeKind {
    fn css_class(&self) -> &'static str {
        match self {
            Self::Info => "notice-info",
            Self::Success => "notice-success",
            Self::Warning => "notice-warning",
            Self::Error => "notice-error",
        }
    }
}

/// An admin-screen notice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminNotice {
    pub kind: NoticeKind,
    pub dismissible: bool,
    pub message: String,
}

impl AdminNotice {
    pub fn to_html(&self) -> String {
        let dismiss = if self.dismissible { " is-dismissible" } else { "" };
        format!(
            r#"<div class="notice {}{}"><p>{}</p></div>"#,
            self.kind.css_class(),
            dismiss,
            escape_html(&self.message)
        )
    }
}

/// Marker handling for the notice shown after a bulk save.
#[derive(Debug, Clone)]
pub struct PostSaveNotice {
    query_arg: String,
}

impl PostSaveNotice {
    pub fn new(query_arg: impl Into<String>) -> Self {
        Self {
            query_arg: query_arg.into(),
        }
    }

    /// Requests the one-time marker on the redirect that follows this save.
    pub fn mark(&self, ctx: &mut SaveContext) {
        ctx.add_redirect_arg(self.query_arg.as_str(), "1");
    }

    /// Whether `url` carries the marker.
    pub fn is_marked(&self, url: &str) -> bool {
        query::query_arg(url, &self.query_arg).is_some()
    }

    /// The notice to show for a request to `url`, if any.
    pub fn notice_for(&self, url: &str) -> Option<AdminNotice> {
        self.is_marked(url).then(|| AdminNotice {
            kind: NoticeKind::Info,
            dismissible: true,
            message: BULK_UPDATE_MESSAGE.to_string(),
        })
    }

    /// Registers the marker in the host's list of arguments stripped from
    /// displayed URLs.
    pub fn removable_query_args(&self, mut existing: Vec<String>) -> Vec<String> {
        if !existing.iter().any(|a| *a == self.query_arg) {
            existing.push(self.query_arg.clone());
        }
        existing
    }

    /// The URL as it should be displayed: all removable arguments stripped.
    pub fn displayed_url(&self, url: &str, removable: &[String]) -> String {
        query::remove_query_args(url, removable)
    }
}
