use chrono::{DateTime, Utc};

use super::record::{format_timestamp, ActionKind, EventRecord};
use crate::github::types::WebhookPayload;

const BRANCH_PREFIX: &str = "refs/heads/";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    Record(EventRecord),
    NoAction,
}

pub struct EventNormalizer;

impl EventNormalizer {
    /// The payload's `action` wins; the delivery's event header is the fallback.
    pub fn discriminator<'a>(
        payload: &'a WebhookPayload,
        event_header: Option<&'a str>,
    ) -> Option<&'a str> {
        payload.action().or(event_header).filter(|d| !d.is_empty())
    }

    pub fn normalize(
        payload: &WebhookPayload,
        discriminator: Option<&str>,
        now: DateTime<Utc>,
    ) -> Classification {
        let kind = match discriminator {
            Some("push") => ActionKind::Push,
            Some("pull_request") => ActionKind::PullRequest,
            Some("closed") if payload.is_merged() => ActionKind::Merge,
            _ => return Classification::NoAction,
        };

        let record = match kind {
            ActionKind::Push => EventRecord {
                request_id: Self::lenient(payload.after(), kind, "after"),
                author: payload.author(),
                action: kind,
                from_branch: None,
                to_branch: Self::lenient(payload.git_ref().map(Self::branch_name), kind, "ref"),
                timestamp: format_timestamp(now),
            },
            ActionKind::PullRequest | ActionKind::Merge => EventRecord {
                request_id: Self::lenient(
                    payload.pull_request_id().as_deref(),
                    kind,
                    "pull_request.id",
                ),
                author: payload.author(),
                action: kind,
                from_branch: payload.head_ref().map(str::to_string),
                to_branch: Self::lenient(payload.base_ref(), kind, "pull_request.base.ref"),
                timestamp: format_timestamp(now),
            },
        };

        Classification::Record(record)
    }

    /// Missing fields are stored as null rather than rejecting the delivery.
    fn lenient(value: Option<&str>, kind: ActionKind, field: &'static str) -> Option<String> {
        if value.is_none() {
            tracing::warn!(action = %kind, field, "Webhook payload is missing a field; storing null");
        }
        value.map(str::to_string)
    }

    fn branch_name(git_ref: &str) -> &str {
        git_ref.strip_prefix(BRANCH_PREFIX).unwrap_or(git_ref)
    }
}
