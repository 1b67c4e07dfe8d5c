//! Built-in knowledge-base articles used when no snapshot is supplied.

use super::KnowledgeBaseEntry;

pub fn sample_entries() -> Vec<KnowledgeBaseEntry> {
    let mut entries = vec![
        KnowledgeBaseEntry::new(
            "kb-password-reset",
            "How to reset your password",
            "Open the login page, choose forgot password and follow the emailed link. \
             Reset links expire after one hour.",
            &["account", "password", "login"],
        ),
        KnowledgeBaseEntry::new(
            "kb-billing-refund",
            "Refunds for duplicate or incorrect charges",
            "If a customer was double charged or sees an unexpected charge on an invoice, \
             confirm the duplicate transaction in the billing dashboard and issue a refund. \
             Refunds appear within five business days.",
            &["billing", "refund", "payment", "invoice"],
        ),
        KnowledgeBaseEntry::new(
            "kb-api-integration",
            "Troubleshooting API integration errors",
            "Check that the API key is active, requests use HTTPS and the webhook endpoint \
             returns 200. Rate limits reset every minute.",
            &["api", "integration", "developer", "webhook"],
        ),
        KnowledgeBaseEntry::new(
            "kb-account-security",
            "Suspicious activity on your account",
            "Lock the account, revoke active sessions and force a password change. \
             Escalate confirmed breaches to the security team immediately.",
            &["security", "breach", "account"],
        ),
        KnowledgeBaseEntry::new(
            "kb-shipping-status",
            "Tracking a delayed shipment",
            "Look up the order number in the shipping portal to see carrier status. \
             Orders delayed more than seven days qualify for reshipment.",
            &["shipping", "order", "delivery"],
        ),
    ];

    let seed_usage = [42, 87, 19, 11, 64];
    let seed_confidence = [0.92, 0.88, 0.75, 0.81, 0.85];
    for ((entry, usage), confidence) in entries.iter_mut().zip(seed_usage).zip(seed_confidence) {
        entry.usage_count = usage;
        entry.confidence = confidence;
    }
    entries
}
