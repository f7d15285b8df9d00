use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::collection::Collection;
use crate::models::{NewSubjectItem, Segment, SubjectItem};

/// Files and notes attached to subjects, newest first.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubjectItemsState {
    items: Collection<SubjectItem>,
}

impl SubjectItemsState {
    pub fn items(&self) -> &Collection<SubjectItem> {
        &self.items
    }

    /// Prepend an item dated today (local time) unless the input carries a date.
    pub fn add_item(&mut self, new: NewSubjectItem) -> String {
        self.add_item_on(new, Local::now().date_naive())
    }

    pub fn add_item_on(&mut self, new: NewSubjectItem, today: NaiveDate) -> String {
        let item = new.into_item(today);
        let id = item.id.clone();
        self.items.prepend(item);
        id
    }

    pub fn remove_item(&mut self, id: &str) -> Option<SubjectItem> {
        self.items.remove(id)
    }

    /// Drop every item of a subject. Returns how many were removed.
    pub fn clear_subject(&mut self, subject_id: &str) -> usize {
        self.items.remove_by_subject(subject_id)
    }

    pub fn items_by_subject(&self, subject_id: &str) -> Vec<SubjectItem> {
        self.items.by_subject(subject_id)
    }

    pub fn items_in_segment(&self, subject_id: &str, segment: Segment) -> Vec<SubjectItem> {
        self.items
            .iter()
            .filter(|i| i.subject_id == subject_id && segment.contains(i.item_type))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SubjectItemType;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 9, 1).unwrap()
    }

    #[test]
    fn test_add_item_prepends_with_defaults() {
        let mut state = SubjectItemsState::default();
        let pdf = NewSubjectItem::new("s1", "a.pdf", SubjectItemType::Pdf);
        let png = NewSubjectItem::new("s1", "b.png", SubjectItemType::Png);
        let first = state.add_item_on(pdf, day());
        let second = state.add_item_on(png, day());

        let items = state.items().as_slice();
        assert_eq!(items[0].id, second);
        assert_eq!(items[1].id, first);
        assert_eq!(items[0].date, day());
    }

    #[test]
    fn test_explicit_id_and_date_win() {
        let mut state = SubjectItemsState::default();
        let mut new = NewSubjectItem::new("s1", "clip", SubjectItemType::Mp4);
        new.id = Some("fixed".to_string());
        new.date = NaiveDate::from_ymd_opt(2024, 1, 2);
        new.uri = Some("file:///clip.mp4".to_string());

        assert_eq!(state.add_item_on(new, day()), "fixed");
        let item = state.items().get("fixed").unwrap();
        assert_eq!(item.date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        assert_eq!(item.uri.as_deref(), Some("file:///clip.mp4"));
    }

    #[test]
    fn test_segments_filter_by_type_and_subject() {
        let mut state = SubjectItemsState::default();
        for (subject, name, ty) in [
            ("s1", "notes.pdf", SubjectItemType::Pdf),
            ("s1", "essay.docx", SubjectItemType::Docx),
            ("s1", "board.jpg", SubjectItemType::Jpg),
            ("s1", "lecture.mp4", SubjectItemType::Mp4),
            ("s1", "idea", SubjectItemType::Note),
            ("s2", "other.pdf", SubjectItemType::Pdf),
        ] {
            state.add_item_on(NewSubjectItem::new(subject, name, ty), day());
        }

        let docs: Vec<_> = state
            .items_in_segment("s1", Segment::Documents)
            .into_iter()
            .map(|i| i.name)
            .collect();
        assert_eq!(docs, ["essay.docx", "notes.pdf"]);
        assert_eq!(state.items_in_segment("s1", Segment::Images).len(), 1);
        assert_eq!(state.items_in_segment("s1", Segment::Videos).len(), 1);
        assert_eq!(state.items_in_segment("s1", Segment::Notes).len(), 1);
        assert_eq!(state.items_in_segment("s2", Segment::Documents).len(), 1);
    }

    #[test]
    fn test_clear_subject() {
        let mut state = SubjectItemsState::default();
        state.add_item_on(NewSubjectItem::new("s1", "a", SubjectItemType::Note), day());
        state.add_item_on(NewSubjectItem::new("s2", "b", SubjectItemType::Note), day());
        state.add_item_on(NewSubjectItem::new("s1", "c", SubjectItemType::Note), day());

        assert_eq!(state.clear_subject("s1"), 2);
        assert!(state.items_by_subject("s1").is_empty());
        assert_eq!(state.items_by_subject("s2").len(), 1);
    }
}
