//! Tickets: the chat-session input model, the ticket aggregate and the
//! orchestrator that turns one into the other.

pub mod orchestrator;
pub mod session;
pub mod text;
pub mod types;

pub use orchestrator::{SharedTicketOrchestrator, TicketOrchestrator};
pub use session::{ChatMessage, ChatSession, MessageSender, Platform, Satisfaction};
pub use text::{generate_description, generate_title, truncate_with_ellipsis};
pub use types::{new_ticket_id, Ticket, TicketSource, TicketStatus};
