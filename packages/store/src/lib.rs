pub mod collection;
pub mod companion;
pub mod config;
pub mod error;
pub mod models;
pub mod persist;
pub mod query;
pub mod schedule;
pub mod storage;
pub mod stores;

mod file_store;
mod memory;
pub use file_store::FileStore;
pub use memory::MemoryStore;

pub use companion::{Cascade, Companion};
pub use config::CompanionConfig;
pub use error::{Result, StoreError};
pub use models::{
    BrowserTab, ClassSchedule, Doc, EventItem, NewClass, NewDoc, NewEvent, NewNote, NewSubject,
    NewSubjectItem, Note, Segment, Subject, SubjectItem, SubjectItemType, TabPatch,
};
pub use persist::Persisted;
pub use storage::StateStorage;
