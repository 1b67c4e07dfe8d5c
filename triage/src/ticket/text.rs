//! Ticket title and description generation from chat transcripts.

use crate::config::TextLimits;
use crate::ticket::session::ChatSession;

const ELLIPSIS: &str = "...";

/// Keep the first `max_chars` characters, appending `...` if anything was cut
pub fn truncate_with_ellipsis(text: &str, max_chars: usize) -> String {
    let text = text.trim();
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}{}", text[..cut].trim_end(), ELLIPSIS),
        None => text.to_string(),
    }
}

/// First customer message, or a generic line naming the customer
pub fn generate_title(session: &ChatSession, limits: &TextLimits) -> String {
    let first = session
        .customer_messages()
        .map(|m| m.content.trim())
        .find(|c| !c.is_empty());
    match first {
        Some(content) => truncate_with_ellipsis(&collapse_whitespace(content), limits.title_max_chars),
        None => {
            let who = if session.customer_name.trim().is_empty() {
                session.customer_id.as_str()
            } else {
                session.customer_name.trim()
            };
            truncate_with_ellipsis(
                &format!("Chat support request from {}", who),
                limits.title_max_chars,
            )
        }
    }
}

/// All customer messages joined by spaces, or a session summary line
pub fn generate_description(session: &ChatSession, limits: &TextLimits) -> String {
    let joined = session
        .customer_messages()
        .map(|m| collapse_whitespace(&m.content))
        .filter(|c| !c.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    if joined.is_empty() {
        return truncate_with_ellipsis(
            &format!(
                "Chat session {} on {} ended without customer messages",
                session.id, session.platform
            ),
            limits.description_max_chars,
        );
    }
    truncate_with_ellipsis(&joined, limits.description_max_chars)
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
