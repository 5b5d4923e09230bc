pub mod signature;
pub mod types;

pub use signature::{SignatureValidator, SIGNATURE_HEADER};
pub use types::WebhookPayload;

/// GitHub names the event kind in this header; push deliveries carry no `action` field.
pub const EVENT_HEADER: &str = "X-GitHub-Event";
