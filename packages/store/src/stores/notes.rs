use serde::{Deserialize, Serialize};

use crate::collection::Collection;
use crate::models::{current_timestamp, new_id, NewNote, Note};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotesState {
    notes: Collection<Note>,
}

impl NotesState {
    pub fn notes(&self) -> &Collection<Note> {
        &self.notes
    }

    pub fn add_note(&mut self, new: NewNote) -> String {
        self.insert(new.into_note(new_id(), current_timestamp()))
    }

    /// Prepend a fully built note.
    pub fn insert(&mut self, note: Note) -> String {
        let id = note.id.clone();
        self.notes.prepend(note);
        id
    }

    pub fn remove_note(&mut self, id: &str) -> Option<Note> {
        self.notes.remove(id)
    }

    pub fn notes_by_subject(&self, subject_id: &str) -> Vec<Note> {
        self.notes.by_subject(subject_id)
    }

    pub fn recent(&self, limit: usize) -> Vec<Note> {
        self.notes.recent(limit)
    }

    pub fn clear_subject(&mut self, subject_id: &str) -> usize {
        self.notes.remove_by_subject(subject_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_note(subject_id: &str, title: &str) -> NewNote {
        NewNote {
            subject_id: subject_id.to_string(),
            title: title.to_string(),
            content: format!("{title} body"),
        }
    }

    #[test]
    fn test_add_note_stamps_and_prepends() {
        let mut state = NotesState::default();
        let a = state.add_note(new_note("s1", "first"));
        let b = state.add_note(new_note("s1", "second"));

        assert_ne!(a, b);
        assert_eq!(state.notes().as_slice()[0].id, b);
        let note = state.notes().get(&a).unwrap();
        assert!(note.created_at > 0);
        assert!(!note.ai_generated);
    }

    #[test]
    fn test_recent_limits_and_orders() {
        let mut state = NotesState::default();
        for (i, ts) in [(1, 300), (2, 100), (3, 200)] {
            let id = format!("n{i}");
            state.insert(new_note("s1", &id).into_note(id.clone(), ts));
        }

        let ids: Vec<_> = state.recent(2).into_iter().map(|n| n.id).collect();
        assert_eq!(ids, ["n1", "n3"]);
    }

    #[test]
    fn test_remove_and_by_subject() {
        let mut state = NotesState::default();
        let a = state.add_note(new_note("s1", "a"));
        state.add_note(new_note("s2", "b"));

        assert_eq!(state.notes_by_subject("s1").len(), 1);
        assert_eq!(state.remove_note(&a).unwrap().title, "a");
        assert!(state.notes_by_subject("s1").is_empty());
        assert!(state.remove_note(&a).is_none());
    }
}
