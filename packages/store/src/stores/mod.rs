//! # Entity stores
//!
//! One serialisable state struct per entity family. Each one owns its
//! [`Collection`](crate::collection::Collection)s and exposes the mutators and
//! derived queries the screens use. Mutations are total: unknown ids are
//! ignored and reported through `bool`/`Option` returns, never errors.
//!
//! | State | Persisted under | Contents |
//! |-------|-----------------|----------|
//! | [`SubjectsState`] | `<prefix>-subjects` | subjects and their weekly classes |
//! | [`SubjectItemsState`] | `<prefix>-items` | per-subject documents, images, videos, notes |
//! | [`NotesState`] | `<prefix>-notes` | notes |
//! | [`DocsState`] | `<prefix>-docs` | picked documents |
//! | [`EventsState`] | `<prefix>-events` | dated events, "next event" query |
//! | [`BrowserState`] | `<prefix>-browser` | in-app browser tabs and the active tab |
//!
//! None of these know about persistence; [`crate::persist::Persisted`] wraps
//! them for that.

mod browser;
mod docs;
mod events;
mod items;
mod notes;
mod subjects;

pub use browser::BrowserState;
pub use docs::DocsState;
pub use events::EventsState;
pub use items::SubjectItemsState;
pub use notes::NotesState;
pub use subjects::SubjectsState;
