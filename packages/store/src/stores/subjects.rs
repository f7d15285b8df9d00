use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::collection::Collection;
use crate::models::{current_timestamp, ClassSchedule, NewClass, NewSubject, Subject};

/// Subjects and the weekly timetable built from them.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubjectsState {
    subjects: Collection<Subject>,
    classes: Collection<ClassSchedule>,
}

impl SubjectsState {
    pub fn subjects(&self) -> &Collection<Subject> {
        &self.subjects
    }

    pub fn classes(&self) -> &Collection<ClassSchedule> {
        &self.classes
    }

    pub fn get_subject(&self, id: &str) -> Option<&Subject> {
        self.subjects.get(id)
    }

    /// Append a subject and return its id.
    ///
    /// A caller-supplied id that already exists replaces that subject instead
    /// of adding a duplicate.
    pub fn add_subject(&mut self, new: NewSubject) -> String {
        let subject = new.into_subject(current_timestamp());
        let id = subject.id.clone();
        if let Some(existing) = self.subjects.get(&id) {
            let subject = Subject {
                created_at: existing.created_at,
                ..subject
            };
            self.subjects.update(subject);
        } else {
            self.subjects.append(subject);
        }
        id
    }

    pub fn update_subject(&mut self, subject: Subject) -> bool {
        self.subjects.update(subject)
    }

    pub fn rename_subject(&mut self, id: &str, name: impl Into<String>) -> bool {
        let name = name.into();
        self.subjects.modify(id, |s| s.name = name)
    }

    /// Remove a subject together with every class row that references it.
    pub fn remove_subject(&mut self, id: &str) -> Option<Subject> {
        let removed = self.subjects.remove(id);
        let classes = self.classes.remove_by_subject(id);
        debug!(subject = id, classes, "removed subject");
        removed
    }

    /// Add a class slot. Ids are sequential: one past the current maximum,
    /// or the lowest free id once the maximum is `u32::MAX`.
    pub fn add_class(&mut self, new: NewClass) -> u32 {
        let id = match self.classes.iter().map(|c| c.id).max() {
            None => 1,
            Some(max) => max
                .checked_add(1)
                .unwrap_or_else(|| (1..).find(|id| !self.classes.contains(id)).unwrap_or(0)),
        };
        self.classes.append(new.into_class(id));
        id
    }

    pub fn update_class(&mut self, mut class: ClassSchedule) -> bool {
        class.attendance = class.attendance.min(100);
        self.classes.update(class)
    }

    pub fn set_attendance(&mut self, id: u32, attendance: u8) -> bool {
        self.classes.modify(&id, |c| c.attendance = attendance.min(100))
    }

    pub fn remove_class(&mut self, id: u32) -> Option<ClassSchedule> {
        self.classes.remove(&id)
    }

    pub fn classes_for_subject(&self, subject_id: &str) -> Vec<ClassSchedule> {
        self.classes.by_subject(subject_id)
    }

    /// The class occupying a timetable cell, if any.
    pub fn class_at(&self, day: u8, time: &str) -> Option<&ClassSchedule> {
        self.classes.iter().find(|c| c.day == day && c.time == time)
    }

    pub fn classes_on(&self, day: u8) -> Vec<ClassSchedule> {
        self.classes
            .iter()
            .filter(|c| c.day == day)
            .cloned()
            .collect()
    }
}
