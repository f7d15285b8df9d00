//! # Companion: every store on one storage backend
//!
//! [`Companion`] owns one [`Persisted`] instance per store, all sharing a
//! single [`StateStorage`]. It is the entry point front ends use: read through
//! the accessors, mutate through `update_*` (which persists), and use the
//! cross-store operations defined here.
//!
//! ## Cross-store operations
//!
//! | Method | Description |
//! |--------|-------------|
//! | [`delete_subject`](Companion::delete_subject) | Removes a subject and everything that references it: classes, subject items, notes, documents and events. |
//! | [`add_class`](Companion::add_class), [`add_item`](Companion::add_item), [`add_note`](Companion::add_note), [`add_doc`](Companion::add_doc), [`add_event`](Companion::add_event) | Insert a record after checking that its subject exists. |
//! | [`search`](Companion::search) | Free-text search over subjects, documents and notes. |
//! | [`recent_activity`](Companion::recent_activity) | Merged docs + notes feed, length from [`QueryConfig`](crate::config::QueryConfig). |
//! | [`todays_classes`](Companion::todays_classes) | Today's classes with countdowns. |
//! | [`next_event`](Companion::next_event) | Soonest event at or after a time. |

use chrono::NaiveDateTime;
use tracing::info;

use crate::config::CompanionConfig;
use crate::error::{Result, StoreError};
use crate::models::{
    ClassSchedule, Doc, EventItem, NewClass, NewDoc, NewEvent, NewNote, NewSubjectItem, Note,
    Subject,
};
use crate::persist::Persisted;
use crate::query::{self, Activity, SearchHit};
use crate::schedule::{self, TodayClass};
use crate::storage::StateStorage;
use crate::stores::{
    BrowserState, DocsState, EventsState, NotesState, SubjectItemsState, SubjectsState,
};

/// Records removed by [`Companion::delete_subject`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Cascade {
    pub subject: Option<Subject>,
    pub classes: usize,
    pub items: usize,
    pub notes: usize,
    pub docs: usize,
    pub events: usize,
}

pub struct Companion<S> {
    config: CompanionConfig,
    subjects: Persisted<S, SubjectsState>,
    items: Persisted<S, SubjectItemsState>,
    notes: Persisted<S, NotesState>,
    docs: Persisted<S, DocsState>,
    events: Persisted<S, EventsState>,
    browser: Persisted<S, BrowserState>,
}

impl<S: StateStorage + Clone> Companion<S> {
    /// Load every store from `storage`. Stores never written start empty.
    pub async fn open(storage: S, config: CompanionConfig) -> Result<Self> {
        let key = |name: &str| config.storage.key(name);
        let subjects = Persisted::load(storage.clone(), key("subjects")).await?;
        let items = Persisted::load(storage.clone(), key("items")).await?;
        let notes = Persisted::load(storage.clone(), key("notes")).await?;
        let docs = Persisted::load(storage.clone(), key("docs")).await?;
        let events = Persisted::load(storage.clone(), key("events")).await?;
        let browser = Persisted::load(storage, key("browser")).await?;
        Ok(Self {
            config,
            subjects,
            items,
            notes,
            docs,
            events,
            browser,
        })
    }

    pub fn config(&self) -> &CompanionConfig {
        &self.config
    }

    pub fn subjects(&self) -> &SubjectsState {
        self.subjects.state()
    }

    pub fn items(&self) -> &SubjectItemsState {
        self.items.state()
    }

    pub fn notes(&self) -> &NotesState {
        self.notes.state()
    }

    pub fn docs(&self) -> &DocsState {
        self.docs.state()
    }

    pub fn events(&self) -> &EventsState {
        self.events.state()
    }

    pub fn browser(&self) -> &BrowserState {
        self.browser.state()
    }

    pub async fn update_subjects<R>(&mut self, f: impl FnOnce(&mut SubjectsState) -> R) -> R {
        self.subjects.update(f).await
    }

    pub async fn update_items<R>(&mut self, f: impl FnOnce(&mut SubjectItemsState) -> R) -> R {
        self.items.update(f).await
    }

    pub async fn update_notes<R>(&mut self, f: impl FnOnce(&mut NotesState) -> R) -> R {
        self.notes.update(f).await
    }

    pub async fn update_docs<R>(&mut self, f: impl FnOnce(&mut DocsState) -> R) -> R {
        self.docs.update(f).await
    }

    pub async fn update_events<R>(&mut self, f: impl FnOnce(&mut EventsState) -> R) -> R {
        self.events.update(f).await
    }

    pub async fn update_browser<R>(&mut self, f: impl FnOnce(&mut BrowserState) -> R) -> R {
        self.browser.update(f).await
    }

    fn require_subject(&self, id: &str) -> Result<()> {
        if self.subjects().get_subject(id).is_some() {
            Ok(())
        } else {
            Err(StoreError::UnknownSubject(id.to_string()))
        }
    }

    pub async fn add_class(&mut self, new: NewClass) -> Result<u32> {
        self.require_subject(&new.subject_id)?;
        Ok(self.update_subjects(|s| s.add_class(new)).await)
    }

    pub async fn add_item(&mut self, new: NewSubjectItem) -> Result<String> {
        self.require_subject(&new.subject_id)?;
        Ok(self.update_items(|s| s.add_item(new)).await)
    }

    pub async fn add_note(&mut self, new: NewNote) -> Result<String> {
        self.require_subject(&new.subject_id)?;
        Ok(self.update_notes(|s| s.add_note(new)).await)
    }

    pub async fn add_doc(&mut self, new: NewDoc) -> Result<String> {
        self.require_subject(&new.subject_id)?;
        Ok(self.update_docs(|s| s.add_doc(new)).await)
    }

    pub async fn add_event(&mut self, new: NewEvent) -> Result<String> {
        self.require_subject(&new.subject_id)?;
        Ok(self.update_events(|s| s.add_event(new)).await)
    }

    /// Delete a subject and every record that references it.
    ///
    /// Dependents are removed even when the subject itself is already gone,
    /// which clears out orphans left behind by older data.
    pub async fn delete_subject(&mut self, id: &str) -> Cascade {
        let classes_before = self.subjects().classes_for_subject(id).len();
        let subject = self.update_subjects(|s| s.remove_subject(id)).await;
        let items = self.update_items(|s| s.clear_subject(id)).await;
        let notes = self.update_notes(|s| s.clear_subject(id)).await;
        let docs = self.update_docs(|s| s.clear_subject(id)).await;
        let events = self.update_events(|s| s.clear_subject(id)).await;

        let cascade = Cascade {
            subject,
            classes: classes_before,
            items,
            notes,
            docs,
            events,
        };
        info!(
            subject = id,
            classes = cascade.classes,
            items = cascade.items,
            notes = cascade.notes,
            docs = cascade.docs,
            events = cascade.events,
            "deleted subject"
        );
        cascade
    }

    pub fn search(&self, query: &str) -> Vec<SearchHit> {
        query::search(
            query,
            self.subjects().subjects().as_slice(),
            self.docs().docs().as_slice(),
            self.notes().notes().as_slice(),
        )
    }

    pub fn recent_activity(&self) -> Vec<Activity> {
        query::recent_activity(
            self.docs().docs().as_slice(),
            self.notes().notes().as_slice(),
            self.config.queries.recent_activity_limit,
        )
    }

    pub fn recent_notes(&self) -> Vec<Note> {
        self.notes().recent(self.config.queries.recent_limit)
    }

    pub fn recent_docs(&self) -> Vec<Doc> {
        self.docs().recent(self.config.queries.recent_limit)
    }

    pub fn todays_classes(&self, now: NaiveDateTime) -> Vec<TodayClass> {
        schedule::todays_classes(self.subjects(), now)
    }

    pub fn average_attendance(&self) -> Option<u32> {
        schedule::average_attendance(self.subjects().classes().as_slice())
    }

    pub fn classes_for_subject(&self, subject_id: &str) -> Vec<ClassSchedule> {
        self.subjects().classes_for_subject(subject_id)
    }

    pub fn next_event(&self, from: i64) -> Option<EventItem> {
        self.events().next(from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file_store::FileStore;
    use crate::memory::MemoryStore;
    use crate::models::{NewSubject, SubjectItemType};

    async fn open_memory() -> (Companion<MemoryStore>, MemoryStore) {
        let storage = MemoryStore::new();
        let companion = Companion::open(storage.clone(), CompanionConfig::default())
            .await
            .unwrap();
        (companion, storage)
    }

    fn new_note(subject_id: &str, title: &str) -> NewNote {
        NewNote {
            subject_id: subject_id.to_string(),
            title: title.to_string(),
            content: String::new(),
        }
    }

    fn new_event(subject_id: &str, starts_at: i64) -> NewEvent {
        NewEvent {
            subject_id: subject_id.to_string(),
            title: format!("event at {starts_at}"),
            starts_at,
            ends_at: None,
            location: None,
        }
    }

    #[tokio::test]
    async fn test_open_empty_storage() {
        let (companion, storage) = open_memory().await;
        assert!(companion.subjects().subjects().is_empty());
        assert!(companion.notes().notes().is_empty());
        assert_eq!(companion.browser().tabs().len(), 1);
        // Opening writes nothing
        assert!(storage.keys().is_empty());
    }

    #[tokio::test]
    async fn test_mutations_use_prefixed_keys() {
        let storage = MemoryStore::new();
        let mut companion = Companion::open(storage.clone(), CompanionConfig::new("k19"))
            .await
            .unwrap();

        let math = companion
            .update_subjects(|s| s.add_subject(NewSubject::named("Math")))
            .await;
        companion.add_note(new_note(&math, "Limits")).await.unwrap();

        assert_eq!(storage.keys(), ["k19-notes", "k19-subjects"]);
    }

    #[tokio::test]
    async fn test_add_requires_known_subject() {
        let (mut companion, _) = open_memory().await;

        let err = companion.add_note(new_note("ghost", "x")).await.unwrap_err();
        assert!(matches!(err, StoreError::UnknownSubject(id) if id == "ghost"));
        assert!(companion
            .add_class(NewClass::new("ghost", 0, "09:00"))
            .await
            .is_err());
        assert!(companion.notes().notes().is_empty());
        assert!(companion.subjects().classes().is_empty());
    }

    #[tokio::test]
    async fn test_delete_subject_cascades_everywhere() {
        let (mut companion, storage) = open_memory().await;
        let math = companion
            .update_subjects(|s| s.add_subject(NewSubject::named("Math")))
            .await;
        let art = companion
            .update_subjects(|s| s.add_subject(NewSubject::named("Art")))
            .await;

        for subject in [&math, &art] {
            companion
                .add_class(NewClass::new(subject.as_str(), 0, "09:00"))
                .await
                .unwrap();
            companion
                .add_item(NewSubjectItem::new(subject.as_str(), "f.pdf", SubjectItemType::Pdf))
                .await
                .unwrap();
            companion.add_note(new_note(subject, "n")).await.unwrap();
            companion
                .add_doc(NewDoc {
                    subject_id: subject.clone(),
                    name: "d".to_string(),
                    uri: "file:///d".to_string(),
                    mime_type: None,
                })
                .await
                .unwrap();
            companion.add_event(new_event(subject, 10)).await.unwrap();
        }

        let cascade = companion.delete_subject(&math).await;
        assert_eq!(cascade.subject.map(|s| s.name).as_deref(), Some("Math"));
        assert_eq!(
            (cascade.classes, cascade.items, cascade.notes, cascade.docs, cascade.events),
            (1, 1, 1, 1, 1)
        );

        assert!(companion.classes_for_subject(&math).is_empty());
        assert!(companion.items().items_by_subject(&math).is_empty());
        assert!(companion.notes().notes_by_subject(&math).is_empty());
        assert!(companion.docs().docs_by_subject(&math).is_empty());
        assert!(companion.events().events_by_subject(&math).is_empty());
        assert_eq!(companion.classes_for_subject(&art).len(), 1);
        assert_eq!(companion.notes().notes_by_subject(&art).len(), 1);

        // The cascade is persisted
        let reopened = Companion::open(storage, CompanionConfig::default())
            .await
            .unwrap();
        assert!(reopened.subjects().get_subject(&math).is_none());
        assert!(reopened.notes().notes_by_subject(&math).is_empty());
        assert_eq!(reopened.events().events().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_missing_subject_clears_orphans() {
        let (mut companion, _) = open_memory().await;
        companion
            .update_notes(|s| s.add_note(new_note("gone", "orphan")))
            .await;

        let cascade = companion.delete_subject("gone").await;
        assert!(cascade.subject.is_none());
        assert_eq!(cascade.notes, 1);
    }

    #[tokio::test]
    async fn test_queries_through_companion() {
        let (mut companion, _) = open_memory().await;
        let math = companion
            .update_subjects(|s| s.add_subject(NewSubject::named("Mathematics")))
            .await;
        companion.add_note(new_note(&math, "Math homework")).await.unwrap();
        companion.add_event(new_event(&math, 500)).await.unwrap();
        companion.add_event(new_event(&math, 200)).await.unwrap();

        assert_eq!(companion.search("math").len(), 2);
        assert_eq!(companion.recent_activity().len(), 1);
        assert_eq!(companion.recent_notes().len(), 1);
        assert_eq!(companion.next_event(100).unwrap().starts_at, 200);
        assert_eq!(companion.next_event(300).unwrap().starts_at, 500);
        assert!(companion.next_event(600).is_none());
    }

    #[tokio::test]
    async fn test_state_survives_reopen_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStore::new(dir.path().to_path_buf());

        let mut companion = Companion::open(storage.clone(), CompanionConfig::default())
            .await
            .unwrap();
        let physics = companion
            .update_subjects(|s| s.add_subject(NewSubject::named("Physics")))
            .await;
        let class_id = companion
            .add_class(NewClass::new(physics.as_str(), 2, "13:00"))
            .await
            .unwrap();
        let tab = companion.update_browser(|b| b.add_tab("https://arxiv.org")).await;
        drop(companion);

        let reopened = Companion::open(storage, CompanionConfig::default())
            .await
            .unwrap();
        let subjects = reopened.subjects();
        assert_eq!(subjects.get_subject(&physics).unwrap().name, "Physics");
        assert_eq!(subjects.classes().get(&class_id).unwrap().time, "13:00");
        assert_eq!(reopened.browser().active_tab_id(), Some(tab.as_str()));
        assert_eq!(reopened.average_attendance(), Some(100));
    }
}
