//! Append-only log of study sessions; the source of truth for hours spent.
//!
//! Logging time never changes a subtopic's status.

use chrono::{DateTime, NaiveDate};
use tracing::{info, warn};

use crate::error::{Result, TrackerError};
use crate::models::{SessionDraft, Subtopic};
use crate::store::SkillStore;

pub struct SessionLog<'a, S: SkillStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: SkillStore + ?Sized> SessionLog<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Append a session and return the subtopic with its new `hours_spent`.
    pub fn record_session(
        &self,
        subtopic_id: i64,
        duration_minutes: f64,
        notes: Option<&str>,
        session_date: Option<&str>,
    ) -> Result<Subtopic> {
        if let Err(e) = validate_duration(duration_minutes) {
            warn!(subtopic_id, duration_minutes, "rejected session");
            return Err(e);
        }
        let session_date = session_date.map(normalize_date).transpose()?;

        let draft = SessionDraft {
            subtopic_id,
            duration_minutes,
            notes: clean_text(notes),
            session_date,
        };
        let session = self.store.record_session(&draft)?;
        let subtopic = self.store.get_subtopic(subtopic_id)?;

        info!(
            session_id = session.id,
            subtopic_id,
            duration_minutes,
            hours_spent = subtopic.hours_spent,
            "session recorded"
        );
        Ok(subtopic)
    }
}

pub fn validate_duration(duration_minutes: f64) -> Result<()> {
    if !duration_minutes.is_finite() || duration_minutes <= 0.0 {
        return Err(TrackerError::validation(
            "Duration must be a number of minutes greater than 0",
        ));
    }
    Ok(())
}

/// Accepts RFC 3339 timestamps or plain `YYYY-MM-DD` dates (midnight UTC).
fn normalize_date(s: &str) -> Result<String> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.to_rfc3339());
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        if let Some(dt) = date.and_hms_opt(0, 0, 0) {
            return Ok(dt.and_utc().to_rfc3339());
        }
    }
    Err(TrackerError::validation(format!(
        "Invalid session date '{}'. Use YYYY-MM-DD or an RFC 3339 timestamp",
        s
    )))
}

pub(crate) fn clean_text(s: Option<&str>) -> Option<String> {
    s.map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use crate::models::{ResourceType, SkillDraft, SubtopicDraft};

    fn setup() -> (Database, i64) {
        let db = Database::open(":memory:").unwrap();
        db.init().unwrap();
        let skill = db
            .create_skill(
                &SkillDraft {
                    name: "Rust".into(),
                    category: None,
                    resource_type: ResourceType::Book,
                    platform: None,
                    target_hours: 4.0,
                    description: None,
                    subtopics: vec![SubtopicDraft {
                        title: "Lifetimes".into(),
                        ..Default::default()
                    }],
                },
                &[4.0],
            )
            .unwrap();
        let sub_id = skill.subtopics[0].id;
        (db, sub_id)
    }

    mod validation_tests {
        use super::*;

        #[test]
        fn positive_durations_pass() {
            assert!(validate_duration(1.0).is_ok());
            assert!(validate_duration(0.5).is_ok());
            assert!(validate_duration(600.0).is_ok());
        }

        #[test]
        fn zero_negative_and_nan_fail() {
            for bad in [0.0, -5.0, f64::NAN, f64::INFINITY] {
                assert!(
                    matches!(validate_duration(bad), Err(TrackerError::Validation(_))),
                    "expected validation error for {}",
                    bad
                );
            }
        }

        #[test]
        fn dates_normalize() {
            assert_eq!(
                normalize_date("2026-03-04").unwrap(),
                "2026-03-04T00:00:00+00:00"
            );
            assert!(normalize_date("2026-03-04T09:30:00+02:00").is_ok());
            assert!(matches!(
                normalize_date("yesterday"),
                Err(TrackerError::Validation(_))
            ));
        }

        #[test]
        fn clean_text_drops_blank() {
            assert_eq!(clean_text(Some("  ")), None);
            assert_eq!(clean_text(Some(" notes ")), Some("notes".to_string()));
            assert_eq!(clean_text(None), None);
        }
    }

    mod record_tests {
        use super::*;
        use crate::models::Status;

        #[test]
        fn hours_accumulate() {
            let (db, sub_id) = setup();
            let log = SessionLog::new(&db);

            let after_first = log.record_session(sub_id, 90.0, None, None).unwrap();
            assert_eq!(after_first.hours_spent, 1.5);

            let after_second = log.record_session(sub_id, 30.0, Some("review"), None).unwrap();
            assert_eq!(after_second.hours_spent, 2.0);
        }

        #[test]
        fn logging_does_not_change_status() {
            let (db, sub_id) = setup();
            let sub = SessionLog::new(&db)
                .record_session(sub_id, 60.0, None, None)
                .unwrap();
            assert_eq!(sub.status, Status::ToLearn);
        }

        #[test]
        fn invalid_duration_leaves_hours_unchanged() {
            let (db, sub_id) = setup();
            let log = SessionLog::new(&db);
            log.record_session(sub_id, 30.0, None, None).unwrap();

            assert!(log.record_session(sub_id, -5.0, None, None).is_err());
            assert!(log.record_session(sub_id, 0.0, None, None).is_err());

            assert_eq!(db.get_subtopic(sub_id).unwrap().hours_spent, 0.5);
            assert_eq!(db.list_sessions(sub_id).unwrap().len(), 1);
        }

        #[test]
        fn blank_notes_are_not_stored() {
            let (db, sub_id) = setup();
            SessionLog::new(&db)
                .record_session(sub_id, 10.0, Some("   "), Some("2026-05-01"))
                .unwrap();

            let sessions = db.list_sessions(sub_id).unwrap();
            assert!(sessions[0].notes.is_none());
            assert!(sessions[0].session_date.starts_with("2026-05-01"));
        }
    }
}
