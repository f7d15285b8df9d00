//! Cross-store queries used by the home view: free-text search and the merged
//! recent activity feed.

use crate::models::{Doc, Note, Subject};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HitKind {
    Subject,
    Doc,
    Note,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchHit {
    pub kind: HitKind,
    pub id: String,
    /// Owning subject; `None` for subject hits.
    pub subject_id: Option<String>,
    pub title: String,
}

/// Case-insensitive substring search. Subjects match on name, documents on
/// name, notes on title and content. Hits are grouped subjects first, then
/// documents, then notes, each group in store order. An empty query matches
/// nothing.
pub fn search(query: &str, subjects: &[Subject], docs: &[Doc], notes: &[Note]) -> Vec<SearchHit> {
    let needle = query.to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }
    let hit = |haystack: &str| haystack.to_lowercase().contains(&needle);

    let subject_hits = subjects
        .iter()
        .filter(|s| hit(s.name.as_str()))
        .map(|s| SearchHit {
            kind: HitKind::Subject,
            id: s.id.clone(),
            subject_id: None,
            title: s.name.clone(),
        });
    let doc_hits = docs.iter().filter(|d| hit(d.name.as_str())).map(|d| SearchHit {
        kind: HitKind::Doc,
        id: d.id.clone(),
        subject_id: Some(d.subject_id.clone()),
        title: d.name.clone(),
    });
    let note_hits = notes
        .iter()
        .filter(|n| hit(format!("{} {}", n.title, n.content).as_str()))
        .map(|n| SearchHit {
            kind: HitKind::Note,
            id: n.id.clone(),
            subject_id: Some(n.subject_id.clone()),
            title: n.title.clone(),
        });

    subject_hits.chain(doc_hits).chain(note_hits).collect()
}

/// One entry of the recent activity feed.
#[derive(Clone, Debug, PartialEq)]
pub enum Activity {
    Doc(Doc),
    Note(Note),
}

impl Activity {
    pub fn id(&self) -> &str {
        match self {
            Activity::Doc(d) => &d.id,
            Activity::Note(n) => &n.id,
        }
    }

    pub fn subject_id(&self) -> &str {
        match self {
            Activity::Doc(d) => &d.subject_id,
            Activity::Note(n) => &n.subject_id,
        }
    }

    pub fn created_at(&self) -> i64 {
        match self {
            Activity::Doc(d) => d.created_at,
            Activity::Note(n) => n.created_at,
        }
    }

    /// `"[doc] name"` or `"[note] title"`.
    pub fn label(&self) -> String {
        match self {
            Activity::Doc(d) => format!("[doc] {}", d.name),
            Activity::Note(n) => format!("[note] {}", n.title),
        }
    }
}

/// Documents and notes merged newest first and cut to `limit`. On equal
/// timestamps documents come before notes.
pub fn recent_activity(docs: &[Doc], notes: &[Note], limit: usize) -> Vec<Activity> {
    let mut feed: Vec<Activity> = docs
        .iter()
        .cloned()
        .map(Activity::Doc)
        .chain(notes.iter().cloned().map(Activity::Note))
        .collect();
    feed.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
    feed.truncate(limit);
    feed
}
