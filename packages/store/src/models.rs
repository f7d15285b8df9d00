//! # Domain models for the study companion
//!
//! Plain data records held by the stores in [`crate::stores`]. Every record is
//! `Serialize + Deserialize` with camelCase field names so the persisted JSON
//! blobs keep the shape device storage has always seen (`subjectId`,
//! `startsAt`, `createdAt`, ...).
//!
//! ## Types
//!
//! | Struct | Represents |
//! |--------|-----------|
//! | [`Subject`] | A user-defined course. Anchor for every other record via `subject_id`. |
//! | [`ClassSchedule`] | One weekly timetable slot: day index (Mon = 0), `"HH:MM"` start, duration in hours and a free-form attendance percentage. |
//! | [`SubjectItem`] | A document, image, video or note attached to a subject, typed by [`SubjectItemType`]. |
//! | [`Note`] | A titled text note. |
//! | [`Doc`] | A picked document, stored by its URI. |
//! | [`EventItem`] | A dated event (exam, deadline, meeting) with epoch-millisecond bounds. |
//! | [`BrowserTab`] | A tab of the in-app browser. |
//!
//! Each record has a matching `New*` input struct carrying only the fields the
//! caller chooses; the store fills in ids and timestamps.
//!
//! ## Helper functions
//!
//! - [`new_id`]: random UUID v4 string used for every string-keyed record.
//! - [`current_timestamp`]: epoch milliseconds, the unit of every `created_at`.
//! - [`SubjectItemType::from_ext`]: maps a file extension to an item type.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::collection::{Record, SubjectScoped, Timestamped};

/// Generate a fresh record id.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Current time as epoch milliseconds.
pub fn current_timestamp() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// A course or topic.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub lecturer: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    /// Online meeting link for the class.
    #[serde(default)]
    pub class_link: String,
    #[serde(default)]
    pub room: String,
    /// Image URI returned by the device picker, stored verbatim.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default)]
    pub created_at: i64,
}

/// Input for [`crate::stores::SubjectsState::add_subject`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NewSubject {
    /// Caller-chosen id; a random one is assigned when `None`.
    pub id: Option<String>,
    pub name: String,
    pub lecturer: String,
    pub phone: String,
    pub email: String,
    pub class_link: String,
    pub room: String,
    pub image_url: Option<String>,
}

impl NewSubject {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub(crate) fn into_subject(self, created_at: i64) -> Subject {
        Subject {
            id: self.id.unwrap_or_else(new_id),
            name: self.name,
            lecturer: self.lecturer,
            phone: self.phone,
            email: self.email,
            class_link: self.class_link,
            room: self.room,
            image_url: self.image_url,
            created_at,
        }
    }
}

/// One weekly class slot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassSchedule {
    pub id: u32,
    pub subject_id: String,
    /// Start time as `"HH:MM"`.
    pub time: String,
    /// Day index: Monday = 0 through Saturday = 5.
    pub day: u8,
    /// Duration in hours.
    pub duration: u32,
    /// Attendance percentage, 0 to 100.
    pub attendance: u8,
}

/// Input for [`crate::stores::SubjectsState::add_class`].
#[derive(Clone, Debug, PartialEq)]
pub struct NewClass {
    pub subject_id: String,
    pub time: String,
    pub day: u8,
    pub duration: u32,
    pub attendance: u8,
}

impl NewClass {
    /// A one-hour class with full attendance.
    pub fn new(subject_id: impl Into<String>, day: u8, time: impl Into<String>) -> Self {
        Self {
            subject_id: subject_id.into(),
            time: time.into(),
            day,
            duration: 1,
            attendance: 100,
        }
    }

    pub(crate) fn into_class(self, id: u32) -> ClassSchedule {
        ClassSchedule {
            id,
            subject_id: self.subject_id,
            time: self.time,
            day: self.day,
            duration: self.duration,
            attendance: self.attendance.min(100),
        }
    }
}

/// File kind of a [`SubjectItem`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubjectItemType {
    Pdf,
    Docx,
    Jpg,
    Png,
    Mp4,
    Note,
}

impl SubjectItemType {
    /// Derive the item type from a file extension. Unknown extensions map to `None`.
    pub fn from_ext(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "doc" | "docx" => Some(Self::Docx),
            "jpg" | "jpeg" => Some(Self::Jpg),
            "png" => Some(Self::Png),
            "mp4" | "mov" => Some(Self::Mp4),
            "md" | "txt" | "note" => Some(Self::Note),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Docx => "docx",
            Self::Jpg => "jpg",
            Self::Png => "png",
            Self::Mp4 => "mp4",
            Self::Note => "note",
        }
    }
}

impl fmt::Display for SubjectItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubjectItemType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_ext(s).ok_or_else(|| format!("unknown item type {s:?}"))
    }
}

/// Category filter over subject items.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Segment {
    Documents,
    Images,
    Videos,
    Notes,
}

impl Segment {
    pub const ALL: [Segment; 4] = [
        Segment::Documents,
        Segment::Images,
        Segment::Videos,
        Segment::Notes,
    ];

    pub fn contains(&self, item_type: SubjectItemType) -> bool {
        use SubjectItemType::*;
        match self {
            Segment::Documents => matches!(item_type, Pdf | Docx),
            Segment::Images => matches!(item_type, Jpg | Png),
            Segment::Videos => matches!(item_type, Mp4),
            Segment::Notes => matches!(item_type, Note),
        }
    }
}

impl FromStr for Segment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "documents" | "docs" => Ok(Segment::Documents),
            "images" => Ok(Segment::Images),
            "videos" => Ok(Segment::Videos),
            "notes" => Ok(Segment::Notes),
            _ => Err(format!("unknown segment {s:?}")),
        }
    }
}

/// A file or note attached to a subject.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectItem {
    pub id: String,
    pub subject_id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub item_type: SubjectItemType,
    /// Day the item was added, serialized as `YYYY-MM-DD`.
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
}

/// Input for [`crate::stores::SubjectItemsState::add_item`].
#[derive(Clone, Debug, PartialEq)]
pub struct NewSubjectItem {
    pub id: Option<String>,
    pub subject_id: String,
    pub name: String,
    pub item_type: SubjectItemType,
    pub date: Option<NaiveDate>,
    pub uri: Option<String>,
}

impl NewSubjectItem {
    pub fn new(
        subject_id: impl Into<String>,
        name: impl Into<String>,
        item_type: SubjectItemType,
    ) -> Self {
        Self {
            id: None,
            subject_id: subject_id.into(),
            name: name.into(),
            item_type,
            date: None,
            uri: None,
        }
    }

    pub(crate) fn into_item(self, today: NaiveDate) -> SubjectItem {
        SubjectItem {
            id: self.id.unwrap_or_else(new_id),
            subject_id: self.subject_id,
            name: self.name,
            item_type: self.item_type,
            date: self.date.unwrap_or(today),
            uri: self.uri,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: String,
    pub subject_id: String,
    pub title: String,
    pub content: String,
    pub created_at: i64,
    /// Reserved for assistant-written notes; nothing sets it yet.
    #[serde(default)]
    pub ai_generated: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewNote {
    pub subject_id: String,
    pub title: String,
    pub content: String,
}

impl NewNote {
    pub fn into_note(self, id: String, created_at: i64) -> Note {
        Note {
            id,
            subject_id: self.subject_id,
            title: self.title,
            content: self.content,
            created_at,
            ai_generated: false,
        }
    }
}

/// A document picked from the device.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Doc {
    pub id: String,
    pub subject_id: String,
    pub name: String,
    /// Local file URI.
    pub uri: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    pub created_at: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewDoc {
    pub subject_id: String,
    pub name: String,
    pub uri: String,
    pub mime_type: Option<String>,
}

impl NewDoc {
    pub fn into_doc(self, id: String, created_at: i64) -> Doc {
        Doc {
            id,
            subject_id: self.subject_id,
            name: self.name,
            uri: self.uri,
            mime_type: self.mime_type,
            created_at,
            summary: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventItem {
    pub id: String,
    pub subject_id: String,
    pub title: String,
    /// Epoch milliseconds.
    pub starts_at: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ends_at: Option<i64>,
    /// Room or online link.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub created_at: i64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewEvent {
    pub subject_id: String,
    pub title: String,
    pub starts_at: i64,
    pub ends_at: Option<i64>,
    pub location: Option<String>,
}

impl NewEvent {
    pub fn into_event(self, id: String, created_at: i64) -> EventItem {
        EventItem {
            id,
            subject_id: self.subject_id,
            title: self.title,
            starts_at: self.starts_at,
            ends_at: self.ends_at,
            location: self.location,
            created_at,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrowserTab {
    pub id: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub created_at: i64,
}

/// Partial update for a [`BrowserTab`]; `None` fields are left untouched.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TabPatch {
    pub url: Option<String>,
    pub title: Option<String>,
}

impl Record for Subject {
    type Id = str;
    fn id(&self) -> &str {
        &self.id
    }
}

impl Record for ClassSchedule {
    type Id = u32;
    fn id(&self) -> &u32 {
        &self.id
    }
}

impl SubjectScoped for ClassSchedule {
    fn subject_id(&self) -> &str {
        &self.subject_id
    }
}

impl Record for SubjectItem {
    type Id = str;
    fn id(&self) -> &str {
        &self.id
    }
}

impl SubjectScoped for SubjectItem {
    fn subject_id(&self) -> &str {
        &self.subject_id
    }
}

impl Record for Note {
    type Id = str;
    fn id(&self) -> &str {
        &self.id
    }
}

impl SubjectScoped for Note {
    fn subject_id(&self) -> &str {
        &self.subject_id
    }
}

impl Timestamped for Note {
    fn created_at(&self) -> i64 {
        self.created_at
    }
}

impl Record for Doc {
    type Id = str;
    fn id(&self) -> &str {
        &self.id
    }
}

impl SubjectScoped for Doc {
    fn subject_id(&self) -> &str {
        &self.subject_id
    }
}

impl Timestamped for Doc {
    fn created_at(&self) -> i64 {
        self.created_at
    }
}

impl Record for EventItem {
    type Id = str;
    fn id(&self) -> &str {
        &self.id
    }
}

impl SubjectScoped for EventItem {
    fn subject_id(&self) -> &str {
        &self.subject_id
    }
}

impl Record for BrowserTab {
    type Id = str;
    fn id(&self) -> &str {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_type_from_ext() {
        assert_eq!(SubjectItemType::from_ext("PDF"), Some(SubjectItemType::Pdf));
        assert_eq!(
            SubjectItemType::from_ext("jpeg"),
            Some(SubjectItemType::Jpg)
        );
        assert_eq!(SubjectItemType::from_ext("zip"), None);
        assert_eq!("docx".parse::<SubjectItemType>(), Ok(SubjectItemType::Docx));
    }

    #[test]
    fn test_segment_membership() {
        assert!(Segment::Documents.contains(SubjectItemType::Pdf));
        assert!(Segment::Documents.contains(SubjectItemType::Docx));
        assert!(Segment::Images.contains(SubjectItemType::Png));
        assert!(!Segment::Images.contains(SubjectItemType::Mp4));
        assert!(Segment::Notes.contains(SubjectItemType::Note));

        // Every type lands in exactly one segment
        for ty in [
            SubjectItemType::Pdf,
            SubjectItemType::Docx,
            SubjectItemType::Jpg,
            SubjectItemType::Png,
            SubjectItemType::Mp4,
            SubjectItemType::Note,
        ] {
            assert_eq!(Segment::ALL.iter().filter(|s| s.contains(ty)).count(), 1);
        }
    }

    #[test]
    fn test_json_field_names() {
        let item = SubjectItem {
            id: "i1".into(),
            subject_id: "s1".into(),
            name: "Lecture 1".into(),
            item_type: SubjectItemType::Pdf,
            date: NaiveDate::from_ymd_opt(2025, 3, 4).unwrap(),
            uri: None,
        };
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["subjectId"], "s1");
        assert_eq!(json["type"], "pdf");
        assert_eq!(json["date"], "2025-03-04");
        assert!(json.get("uri").is_none());
    }

    #[test]
    fn test_note_without_ai_flag_deserializes() {
        let note: Note = serde_json::from_str(
            r#"{"id":"n1","subjectId":"s1","title":"T","content":"C","createdAt":5}"#,
        )
        .unwrap();
        assert!(!note.ai_generated);
        assert_eq!(note.created_at, 5);
    }

    #[test]
    fn test_new_class_clamps_attendance() {
        let mut new = NewClass::new("s1", 0, "09:00");
        new.attendance = 140;
        assert_eq!(new.into_class(1).attendance, 100);
    }
}
