//! Core orchestration for the limerick tutoring assistant.
//!
//! A [`session::TutorSession`] ties together the per-document conversation
//! state, the completion provider, the rhyme provider, and the audit log.
//! The host document (menus, sidebar, body text) stays behind the
//! [`host::HostDocument`] capability trait.

pub mod activity_log;
pub mod host;
pub mod selection;
pub mod session;

pub use activity_log::{ActivityLogger, ActivitySink, FileSink, LogRecord, MemorySink};
pub use host::HostDocument;
pub use selection::{RangeElement, Selection, extract_plain_text};
pub use session::TutorSession;
