//! Per-session interview logic: transcript accumulation, the event protocol,
//! score delivery, the session runtime, and the interview prompt builder.
//!
//! Each live session owns exactly one of everything in this crate — its
//! accumulator, its event queue, its live channel. Nothing here is shared
//! across sessions, so nothing here takes a lock.

pub mod delivery;
pub mod events;
pub mod prompt;
pub mod runtime;
pub mod transcript;

pub use delivery::{deliver_scores, DeliveryOutcome, DeliveryReport};
pub use events::{LiveMessage, SessionEvent};
pub use prompt::build_interview_prompt;
pub use runtime::{candidate_id_from_room, run_session, SessionContext};
pub use transcript::TranscriptAccumulator;
