use serde::{Deserialize, Serialize};

use crate::collection::Collection;
use crate::models::{current_timestamp, new_id, Doc, NewDoc};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocsState {
    docs: Collection<Doc>,
}

impl DocsState {
    pub fn docs(&self) -> &Collection<Doc> {
        &self.docs
    }

    pub fn add_doc(&mut self, new: NewDoc) -> String {
        self.insert(new.into_doc(new_id(), current_timestamp()))
    }

    pub fn insert(&mut self, doc: Doc) -> String {
        let id = doc.id.clone();
        self.docs.prepend(doc);
        id
    }

    pub fn remove_doc(&mut self, id: &str) -> Option<Doc> {
        self.docs.remove(id)
    }

    /// Attach or replace the summary of a document.
    pub fn set_summary(&mut self, id: &str, summary: impl Into<String>) -> bool {
        let summary = summary.into();
        self.docs.modify(id, |d| d.summary = Some(summary))
    }

    pub fn docs_by_subject(&self, subject_id: &str) -> Vec<Doc> {
        self.docs.by_subject(subject_id)
    }

    pub fn recent(&self, limit: usize) -> Vec<Doc> {
        self.docs.recent(limit)
    }

    pub fn clear_subject(&mut self, subject_id: &str) -> usize {
        self.docs.remove_by_subject(subject_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_doc(subject_id: &str, name: &str) -> NewDoc {
        NewDoc {
            subject_id: subject_id.to_string(),
            name: name.to_string(),
            uri: format!("file:///docs/{name}"),
            mime_type: Some("application/pdf".to_string()),
        }
    }

    #[test]
    fn test_add_and_remove_doc() {
        let mut state = DocsState::default();
        let id = state.add_doc(new_doc("s1", "syllabus.pdf"));

        let doc = state.docs().get(&id).unwrap();
        assert_eq!(doc.uri, "file:///docs/syllabus.pdf");
        assert!(doc.summary.is_none());

        assert!(state.remove_doc(&id).is_some());
        assert!(state.docs().is_empty());
    }

    #[test]
    fn test_set_summary() {
        let mut state = DocsState::default();
        let id = state.add_doc(new_doc("s1", "paper.pdf"));
        assert!(state.set_summary(&id, "Short version"));
        let summary = state.docs().get(&id).unwrap().summary.clone();
        assert_eq!(summary.as_deref(), Some("Short version"));
        assert!(!state.set_summary("missing", "x"));
    }

    #[test]
    fn test_recent_docs() {
        let mut state = DocsState::default();
        state.insert(new_doc("s1", "a").into_doc("a".into(), 5));
        state.insert(new_doc("s2", "b").into_doc("b".into(), 50));
        state.insert(new_doc("s1", "c").into_doc("c".into(), 20));

        let ids: Vec<_> = state.recent(10).into_iter().map(|d| d.id).collect();
        assert_eq!(ids, ["b", "c", "a"]);
        assert_eq!(state.docs_by_subject("s1").len(), 2);
    }
}
