use std::io::Write;
use std::path::Path;

use anyhow::{anyhow, bail, Context};
use chrono::{Local, NaiveDateTime, TimeZone};
use clap::{Args, Subcommand};
use store::query::HitKind;
use store::schedule::{self, AttendanceLevel, TodayClass, WEEK_DAYS};
use store::{
    Companion, NewClass, NewDoc, NewEvent, NewNote, NewSubject, NewSubjectItem, Segment,
    StateStorage, SubjectItemType, TabPatch,
};

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Add, list, edit and remove subjects.
    #[command(subcommand)]
    Subject(SubjectCommand),

    /// Manage the weekly class timetable.
    #[command(subcommand)]
    Class(ClassCommand),

    /// Files and notes attached to a subject.
    #[command(subcommand)]
    Item(ItemCommand),

    #[command(subcommand)]
    Note(NoteCommand),

    #[command(subcommand)]
    Doc(DocCommand),

    #[command(subcommand)]
    Event(EventCommand),

    /// In-app browser tabs.
    #[command(subcommand)]
    Tab(TabCommand),

    /// Search subjects, documents and notes.
    Search { query: String },

    /// Recent documents and notes, newest first.
    Recent,

    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Debug, Args)]
pub struct SubjectFields {
    #[arg(long)]
    pub lecturer: Option<String>,
    #[arg(long)]
    pub phone: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
    /// Online class link.
    #[arg(long)]
    pub link: Option<String>,
    #[arg(long)]
    pub room: Option<String>,
    /// Image URI.
    #[arg(long)]
    pub image: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum SubjectCommand {
    Add {
        name: String,
        /// Use this id instead of a generated one.
        #[arg(long)]
        id: Option<String>,
        #[command(flatten)]
        fields: SubjectFields,
    },
    List,
    /// Everything recorded for one subject.
    Show { id: String },
    Edit {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[command(flatten)]
        fields: SubjectFields,
    },
    /// Remove a subject with its classes, items, notes, documents and events.
    Remove { id: String },
}

#[derive(Debug, Subcommand)]
pub enum ClassCommand {
    Add {
        #[arg(long)]
        subject: String,
        /// Mon..Sat or 0..5.
        #[arg(long, value_parser = parse_day)]
        day: u8,
        /// Start time, HH:MM.
        #[arg(long)]
        time: String,
        /// Hours.
        #[arg(long, default_value_t = 1)]
        duration: u32,
        #[arg(long, default_value_t = 100)]
        attendance: u8,
    },
    List {
        #[arg(long, value_parser = parse_day)]
        day: Option<u8>,
    },
    Edit {
        id: u32,
        #[arg(long, value_parser = parse_day)]
        day: Option<u8>,
        #[arg(long)]
        time: Option<String>,
        #[arg(long)]
        duration: Option<u32>,
        #[arg(long)]
        attendance: Option<u8>,
    },
    Remove { id: u32 },
    /// Today's classes with the time left until each starts.
    Today,
}

#[derive(Debug, Subcommand)]
pub enum ItemCommand {
    Add {
        #[arg(long)]
        subject: String,
        #[arg(long)]
        name: String,
        /// pdf, docx, jpg, png, mp4 or note. Guessed from the name when omitted.
        #[arg(long = "type")]
        item_type: Option<SubjectItemType>,
        #[arg(long)]
        uri: Option<String>,
    },
    List {
        #[arg(long)]
        subject: String,
        /// documents, images, videos or notes.
        #[arg(long)]
        segment: Option<Segment>,
    },
    Remove { id: String },
}

#[derive(Debug, Subcommand)]
pub enum NoteCommand {
    Add {
        #[arg(long)]
        subject: String,
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        content: String,
    },
    List {
        #[arg(long)]
        subject: Option<String>,
    },
    Remove { id: String },
    Recent,
}

#[derive(Debug, Subcommand)]
pub enum DocCommand {
    Add {
        #[arg(long)]
        subject: String,
        #[arg(long)]
        name: String,
        /// File URI as returned by the document picker.
        #[arg(long)]
        uri: String,
        #[arg(long)]
        mime: Option<String>,
    },
    List {
        #[arg(long)]
        subject: Option<String>,
    },
    Remove { id: String },
    Recent,
}

#[derive(Debug, Subcommand)]
pub enum EventCommand {
    Add {
        #[arg(long)]
        subject: String,
        #[arg(long)]
        title: String,
        /// Local time, "YYYY-MM-DD HH:MM".
        #[arg(long, value_parser = parse_datetime)]
        starts: NaiveDateTime,
        #[arg(long, value_parser = parse_datetime)]
        ends: Option<NaiveDateTime>,
        #[arg(long)]
        location: Option<String>,
    },
    List {
        #[arg(long)]
        subject: Option<String>,
    },
    Remove { id: String },
    /// The soonest event that has not started yet.
    Next,
}

#[derive(Debug, Subcommand)]
pub enum TabCommand {
    Open { url: String },
    Close { id: String },
    Activate { id: String },
    Rename { id: String, title: String },
    List,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the effective configuration as TOML.
    Show,
}

fn parse_day(s: &str) -> Result<u8, String> {
    if let Ok(day) = s.parse::<u8>() {
        if usize::from(day) < WEEK_DAYS.len() {
            return Ok(day);
        }
    }
    WEEK_DAYS
        .iter()
        .position(|d| d.eq_ignore_ascii_case(s))
        .map(|i| i as u8)
        .ok_or_else(|| format!("expected Mon..Sat or 0..5, got {s:?}"))
}

fn parse_datetime(s: &str) -> Result<NaiveDateTime, String> {
    NaiveDateTime::parse_from_str(s.trim(), "%Y-%m-%d %H:%M")
        .map_err(|e| format!("expected \"YYYY-MM-DD HH:MM\": {e}"))
}

fn local_millis(at: NaiveDateTime) -> anyhow::Result<i64> {
    Local
        .from_local_datetime(&at)
        .earliest()
        .map(|dt| dt.timestamp_millis())
        .ok_or_else(|| anyhow!("{at} does not exist in the local time zone"))
}

fn format_millis(ms: i64) -> String {
    Local
        .timestamp_millis_opt(ms)
        .single()
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| ms.to_string())
}

fn day_label(day: u8) -> &'static str {
    schedule::day_name(day).unwrap_or("?")
}

fn ext_of(name: &str) -> Option<&str> {
    Path::new(name).extension().and_then(|e| e.to_str())
}

/// Execute one command against the stores, writing human-readable output to `out`.
pub async fn run<S, W>(
    companion: &mut Companion<S>,
    command: Command,
    now: NaiveDateTime,
    out: &mut W,
) -> anyhow::Result<()>
where
    S: StateStorage + Clone,
    W: Write,
{
    match command {
        Command::Subject(cmd) => run_subject(companion, cmd, out).await,
        Command::Class(cmd) => run_class(companion, cmd, now, out).await,
        Command::Item(cmd) => run_item(companion, cmd, out).await,
        Command::Note(cmd) => run_note(companion, cmd, out).await,
        Command::Doc(cmd) => run_doc(companion, cmd, out).await,
        Command::Event(cmd) => run_event(companion, cmd, now, out).await,
        Command::Tab(cmd) => run_tab(companion, cmd, out).await,
        Command::Search { query } => {
            for hit in companion.search(&query) {
                let kind = kind_label(&hit.kind);
                writeln!(out, "[{kind}] {}  {}", hit.title, hit.id)?;
            }
            Ok(())
        }
        Command::Recent => {
            for activity in companion.recent_activity() {
                let when = format_millis(activity.created_at());
                writeln!(out, "{}  {when}", activity.label())?;
            }
            Ok(())
        }
        Command::Config(ConfigCommand::Show) => {
            write!(out, "{}", companion.config().to_toml()?)?;
            Ok(())
        }
    }
}

fn kind_label(kind: &HitKind) -> &'static str {
    match kind {
        HitKind::Subject => "subject",
        HitKind::Doc => "doc",
        HitKind::Note => "note",
    }
}

fn apply_fields(subject: &mut store::Subject, fields: SubjectFields) {
    if let Some(v) = fields.lecturer {
        subject.lecturer = v;
    }
    if let Some(v) = fields.phone {
        subject.phone = v;
    }
    if let Some(v) = fields.email {
        subject.email = v;
    }
    if let Some(v) = fields.link {
        subject.class_link = v;
    }
    if let Some(v) = fields.room {
        subject.room = v;
    }
    if let Some(v) = fields.image {
        subject.image_url = Some(v);
    }
}

async fn run_subject<S: StateStorage + Clone, W: Write>(
    companion: &mut Companion<S>,
    cmd: SubjectCommand,
    out: &mut W,
) -> anyhow::Result<()> {
    match cmd {
        SubjectCommand::Add { name, id, fields } => {
            let new = NewSubject {
                id,
                name,
                lecturer: fields.lecturer.unwrap_or_default(),
                phone: fields.phone.unwrap_or_default(),
                email: fields.email.unwrap_or_default(),
                class_link: fields.link.unwrap_or_default(),
                room: fields.room.unwrap_or_default(),
                image_url: fields.image,
            };
            let id = companion.update_subjects(|s| s.add_subject(new)).await;
            writeln!(out, "{id}")?;
        }
        SubjectCommand::List => {
            for subject in companion.subjects().subjects() {
                writeln!(out, "{}  {}  {}", subject.id, subject.name, subject.room)?;
            }
        }
        SubjectCommand::Show { id } => {
            let subject = companion
                .subjects()
                .get_subject(&id)
                .with_context(|| format!("no subject {id:?}"))?;
            writeln!(out, "{}", subject.name)?;
            for (label, value) in [
                ("lecturer", &subject.lecturer),
                ("phone", &subject.phone),
                ("email", &subject.email),
                ("link", &subject.class_link),
                ("room", &subject.room),
            ] {
                if !value.is_empty() {
                    writeln!(out, "  {label}: {value}")?;
                }
            }
            for class in companion.classes_for_subject(&id) {
                writeln!(
                    out,
                    "  class #{} {} {} ({}h, {}%)",
                    class.id,
                    day_label(class.day),
                    class.time,
                    class.duration,
                    class.attendance
                )?;
            }
            for segment in Segment::ALL {
                for item in companion.items().items_in_segment(&id, segment) {
                    let (name, kind, date) = (&item.name, item.item_type, item.date);
                    writeln!(out, "  {segment:?}: {name} ({kind}, {date})")?;
                }
            }
            for note in companion.notes().notes_by_subject(&id) {
                writeln!(out, "  note: {}", note.title)?;
            }
            for doc in companion.docs().docs_by_subject(&id) {
                writeln!(out, "  doc: {}", doc.name)?;
            }
            for event in companion.events().events_by_subject(&id) {
                let when = format_millis(event.starts_at);
                writeln!(out, "  event: {} at {when}", event.title)?;
            }
        }
        SubjectCommand::Edit { id, name, fields } => {
            let mut subject = companion
                .subjects()
                .get_subject(&id)
                .cloned()
                .with_context(|| format!("no subject {id:?}"))?;
            if let Some(name) = name {
                subject.name = name;
            }
            apply_fields(&mut subject, fields);
            companion.update_subjects(|s| s.update_subject(subject)).await;
        }
        SubjectCommand::Remove { id } => {
            if companion.subjects().get_subject(&id).is_none() {
                bail!("no subject {id:?}");
            }
            let cascade = companion.delete_subject(&id).await;
            writeln!(
                out,
                "removed {id} with {} classes, {} items, {} notes, {} docs, {} events",
                cascade.classes, cascade.items, cascade.notes, cascade.docs, cascade.events
            )?;
        }
    }
    Ok(())
}

async fn run_class<S: StateStorage + Clone, W: Write>(
    companion: &mut Companion<S>,
    cmd: ClassCommand,
    now: NaiveDateTime,
    out: &mut W,
) -> anyhow::Result<()> {
    match cmd {
        ClassCommand::Add {
            subject,
            day,
            time,
            duration,
            attendance,
        } => {
            schedule::parse_class_time(&time)?;
            let new = NewClass {
                subject_id: subject,
                time,
                day,
                duration,
                attendance,
            };
            let id = companion.add_class(new).await?;
            writeln!(out, "{id}")?;
        }
        ClassCommand::List { day } => {
            let classes = match day {
                Some(day) => companion.subjects().classes_on(day),
                None => companion.subjects().classes().as_slice().to_vec(),
            };
            for class in &classes {
                let subject = companion
                    .subjects()
                    .get_subject(&class.subject_id)
                    .map(|s| s.name.as_str())
                    .unwrap_or("Unknown Subject");
                let level = match AttendanceLevel::of(class.attendance) {
                    AttendanceLevel::Good => "good",
                    AttendanceLevel::Warning => "warning",
                    AttendanceLevel::Low => "low",
                };
                writeln!(
                    out,
                    "#{} {} {} {}  {}h  {}% ({level})",
                    class.id,
                    day_label(class.day),
                    class.time,
                    subject,
                    class.duration,
                    class.attendance
                )?;
            }
            if let Some(avg) = schedule::average_attendance(&classes) {
                writeln!(out, "average attendance: {avg}%")?;
            }
        }
        ClassCommand::Edit {
            id,
            day,
            time,
            duration,
            attendance,
        } => {
            let mut class = companion
                .subjects()
                .classes()
                .get(&id)
                .cloned()
                .with_context(|| format!("no class #{id}"))?;
            if let Some(time) = time {
                schedule::parse_class_time(&time)?;
                class.time = time;
            }
            if let Some(day) = day {
                class.day = day;
            }
            if let Some(duration) = duration {
                class.duration = duration;
            }
            if let Some(attendance) = attendance {
                class.attendance = attendance;
            }
            companion.update_subjects(|s| s.update_class(class)).await;
        }
        ClassCommand::Remove { id } => {
            if companion.update_subjects(|s| s.remove_class(id)).await.is_none() {
                bail!("no class #{id}");
            }
        }
        ClassCommand::Today => {
            let today = companion.todays_classes(now);
            if today.is_empty() {
                writeln!(out, "no classes today")?;
            }
            for class in today {
                let countdown = class
                    .countdown
                    .map(|c| c.to_string())
                    .unwrap_or_else(|| "?".to_string());
                let TodayClass {
                    time,
                    subject_name,
                    room,
                    ..
                } = class;
                writeln!(out, "{time} {subject_name} ({room})  {countdown}")?;
            }
        }
    }
    Ok(())
}

async fn run_item<S: StateStorage + Clone, W: Write>(
    companion: &mut Companion<S>,
    cmd: ItemCommand,
    out: &mut W,
) -> anyhow::Result<()> {
    match cmd {
        ItemCommand::Add {
            subject,
            name,
            item_type,
            uri,
        } => {
            let item_type = match item_type {
                Some(t) => t,
                None => ext_of(&name)
                    .and_then(SubjectItemType::from_ext)
                    .with_context(|| format!("cannot guess the type of {name:?}"))?,
            };
            let mut new = NewSubjectItem::new(subject, name, item_type);
            new.uri = uri;
            let id = companion.add_item(new).await?;
            writeln!(out, "{id}")?;
        }
        ItemCommand::List { subject, segment } => {
            let items = match segment {
                Some(segment) => companion.items().items_in_segment(&subject, segment),
                None => companion.items().items_by_subject(&subject),
            };
            for item in items {
                let (id, name, kind, date) = (&item.id, &item.name, item.item_type, item.date);
                writeln!(out, "{id}  {name} [{kind}] {date}")?;
            }
        }
        ItemCommand::Remove { id } => {
            if companion.update_items(|s| s.remove_item(&id)).await.is_none() {
                bail!("no item {id:?}");
            }
        }
    }
    Ok(())
}

async fn run_note<S: StateStorage + Clone, W: Write>(
    companion: &mut Companion<S>,
    cmd: NoteCommand,
    out: &mut W,
) -> anyhow::Result<()> {
    match cmd {
        NoteCommand::Add {
            subject,
            title,
            content,
        } => {
            let id = companion
                .add_note(NewNote {
                    subject_id: subject,
                    title,
                    content,
                })
                .await?;
            writeln!(out, "{id}")?;
        }
        NoteCommand::List { subject } => {
            let notes = match subject {
                Some(subject) => companion.notes().notes_by_subject(&subject),
                None => companion.notes().notes().as_slice().to_vec(),
            };
            for note in notes {
                writeln!(out, "{}  {}", note.id, note.title)?;
            }
        }
        NoteCommand::Remove { id } => {
            if companion.update_notes(|s| s.remove_note(&id)).await.is_none() {
                bail!("no note {id:?}");
            }
        }
        NoteCommand::Recent => {
            for note in companion.recent_notes() {
                let when = format_millis(note.created_at);
                writeln!(out, "{when}  {}  {}", note.title, note.id)?;
            }
        }
    }
    Ok(())
}

async fn run_doc<S: StateStorage + Clone, W: Write>(
    companion: &mut Companion<S>,
    cmd: DocCommand,
    out: &mut W,
) -> anyhow::Result<()> {
    match cmd {
        DocCommand::Add {
            subject,
            name,
            uri,
            mime,
        } => {
            let id = companion
                .add_doc(NewDoc {
                    subject_id: subject,
                    name,
                    uri,
                    mime_type: mime,
                })
                .await?;
            writeln!(out, "{id}")?;
        }
        DocCommand::List { subject } => {
            let docs = match subject {
                Some(subject) => companion.docs().docs_by_subject(&subject),
                None => companion.docs().docs().as_slice().to_vec(),
            };
            for doc in docs {
                writeln!(out, "{}  {}  {}", doc.id, doc.name, doc.uri)?;
            }
        }
        DocCommand::Remove { id } => {
            if companion.update_docs(|s| s.remove_doc(&id)).await.is_none() {
                bail!("no document {id:?}");
            }
        }
        DocCommand::Recent => {
            for doc in companion.recent_docs() {
                let when = format_millis(doc.created_at);
                writeln!(out, "{when}  {}  {}", doc.name, doc.id)?;
            }
        }
    }
    Ok(())
}

async fn run_event<S: StateStorage + Clone, W: Write>(
    companion: &mut Companion<S>,
    cmd: EventCommand,
    now: NaiveDateTime,
    out: &mut W,
) -> anyhow::Result<()> {
    match cmd {
        EventCommand::Add {
            subject,
            title,
            starts,
            ends,
            location,
        } => {
            let new = NewEvent {
                subject_id: subject,
                title,
                starts_at: local_millis(starts)?,
                ends_at: ends.map(local_millis).transpose()?,
                location,
            };
            let id = companion.add_event(new).await?;
            writeln!(out, "{id}")?;
        }
        EventCommand::List { subject } => {
            let events = match subject {
                Some(subject) => companion.events().events_by_subject(&subject),
                None => companion.events().events().as_slice().to_vec(),
            };
            for event in events {
                let when = format_millis(event.starts_at);
                writeln!(out, "{when}  {}  {}", event.title, event.id)?;
            }
        }
        EventCommand::Remove { id } => {
            if companion.update_events(|s| s.remove_event(&id)).await.is_none() {
                bail!("no event {id:?}");
            }
        }
        EventCommand::Next => match companion.next_event(local_millis(now)?) {
            Some(event) => {
                let when = format_millis(event.starts_at);
                write!(out, "{when}  {}", event.title)?;
                if let Some(location) = &event.location {
                    write!(out, " @ {location}")?;
                }
                writeln!(out)?;
            }
            None => writeln!(out, "no upcoming events")?,
        },
    }
    Ok(())
}

async fn run_tab<S: StateStorage + Clone, W: Write>(
    companion: &mut Companion<S>,
    cmd: TabCommand,
    out: &mut W,
) -> anyhow::Result<()> {
    match cmd {
        TabCommand::Open { url } => {
            let id = companion.update_browser(|b| b.add_tab(url)).await;
            writeln!(out, "{id}")?;
        }
        TabCommand::Close { id } => {
            if companion.update_browser(|b| b.close_tab(&id)).await.is_none() {
                bail!("no tab {id:?}");
            }
        }
        TabCommand::Activate { id } => {
            if !companion.update_browser(|b| b.set_active(&id)).await {
                bail!("no tab {id:?}");
            }
        }
        TabCommand::Rename { id, title } => {
            let patch = TabPatch {
                title: Some(title),
                ..TabPatch::default()
            };
            if !companion.update_browser(|b| b.update_tab(&id, patch)).await {
                bail!("no tab {id:?}");
            }
        }
        TabCommand::List => {
            let active = companion.browser().active_tab_id().map(str::to_string);
            for tab in companion.browser().tabs() {
                let marker = if active.as_deref() == Some(tab.id.as_str()) {
                    "*"
                } else {
                    " "
                };
                let title = tab.title.as_deref().unwrap_or("");
                writeln!(out, "{marker} {}  {}  {title}", tab.id, tab.url)?;
            }
        }
    }
    Ok(())
}
