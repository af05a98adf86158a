//! Skill completion detection and the optional review that follows it.

use tracing::{debug, info, warn};

use crate::broadcast::RefreshBroadcaster;
use crate::error::{Result, TrackerError};
use crate::models::{Review, Skill, Status, Subtopic};
use crate::progress;
use crate::session_log::clean_text;
use crate::store::SkillStore;

#[derive(Debug, Clone)]
pub struct Evaluation {
    pub skill: Skill,
    /// True only on the evaluation that first marked the skill completed.
    pub newly_completed: bool,
}

pub struct SkillCompletionCoordinator<'a, S: SkillStore + ?Sized> {
    store: &'a S,
    broadcaster: &'a RefreshBroadcaster,
}

impl<'a, S: SkillStore + ?Sized> SkillCompletionCoordinator<'a, S> {
    pub fn new(store: &'a S, broadcaster: &'a RefreshBroadcaster) -> Self {
        Self { store, broadcaster }
    }

    /// Bring a drifted stored status back in line with the subtopics. Emits
    /// `CompletionDetected` when the skill becomes completed.
    pub fn evaluate(&self, skill_id: i64) -> Result<Evaluation> {
        let skill = self.store.get_skill(skill_id)?;
        let derived = progress::derive_status(&skill.subtopics);

        if derived == skill.status {
            debug!(skill_id, status = derived.as_str(), "skill status unchanged");
            return Ok(Evaluation {
                skill,
                newly_completed: false,
            });
        }

        self.store.set_skill_status(skill_id, derived)?;
        let skill = self.store.get_skill(skill_id)?;
        let newly_completed = derived == Status::Completed;

        if newly_completed {
            info!(skill_id, name = %skill.name, "skill completed");
            self.broadcaster.completion_detected(skill_id);
        } else {
            debug!(skill_id, status = derived.as_str(), "skill status updated");
        }

        Ok(Evaluation {
            skill,
            newly_completed,
        })
    }

    /// Write a subtopic status together with the skill status it implies, in
    /// one store call. Emits `CompletionDetected` once the store confirms a
    /// write that completes the skill.
    pub fn commit(
        &self,
        skill: &Skill,
        subtopic_id: i64,
        status: Status,
    ) -> Result<(Subtopic, Evaluation)> {
        let projected: Vec<Subtopic> = skill
            .subtopics
            .iter()
            .cloned()
            .map(|mut s| {
                if s.id == subtopic_id {
                    s.status = status;
                }
                s
            })
            .collect();
        let derived = progress::derive_status(&projected);

        let subtopic = self.store.set_subtopic_status(subtopic_id, status, derived)?;
        let newly_completed = derived == Status::Completed && skill.status != Status::Completed;

        if newly_completed {
            info!(skill_id = skill.id, name = %skill.name, "skill completed");
            self.broadcaster.completion_detected(skill.id);
        } else if derived != skill.status {
            debug!(skill_id = skill.id, status = derived.as_str(), "skill status updated");
        }

        Ok((
            subtopic,
            Evaluation {
                skill: self.store.get_skill(skill.id)?,
                newly_completed,
            },
        ))
    }

    /// Store (or replace) the review. A rating of 0 or none means "no rating".
    pub fn record_review(
        &self,
        skill_id: i64,
        rating: Option<i64>,
        notes: Option<&str>,
    ) -> Result<Skill> {
        let review = Review {
            rating: validate_rating(rating)?,
            notes: clean_text(notes),
        };

        let skill = self.store.submit_review(skill_id, &review)?;
        if skill.status != Status::Completed {
            debug!(skill_id, "review stored for a skill that is not completed");
        }
        info!(skill_id, rating = ?review.rating, "review recorded");
        Ok(skill)
    }
}

pub fn validate_rating(rating: Option<i64>) -> Result<Option<u8>> {
    match rating {
        None | Some(0) => Ok(None),
        Some(r @ 1..=5) => Ok(Some(r as u8)),
        Some(r) => {
            warn!(rating = r, "rejected review rating");
            Err(TrackerError::validation(format!(
                "Rating must be between 1 and 5 (got {})",
                r
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::broadcast::Signal;
    use crate::db::Database;
    use crate::models::{ResourceType, SessionDraft, SkillDraft, SubtopicDraft};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn setup(subtopics: usize) -> (Database, Skill) {
        let db = Database::open(":memory:").unwrap();
        db.init().unwrap();
        let drafts = (0..subtopics)
            .map(|i| SubtopicDraft {
                title: format!("Part {}", i + 1),
                ..Default::default()
            })
            .collect::<Vec<_>>();
        let hours = vec![1.0; subtopics];
        let skill = db
            .create_skill(
                &SkillDraft {
                    name: "Rust".into(),
                    category: None,
                    resource_type: ResourceType::Course,
                    platform: None,
                    target_hours: subtopics as f64,
                    description: None,
                    subtopics: drafts,
                },
                &hours,
            )
            .unwrap();
        (db, skill)
    }

    fn complete(db: &Database, subtopic_id: i64) {
        db.record_session(&SessionDraft {
            subtopic_id,
            duration_minutes: 60.0,
            notes: None,
            session_date: None,
        })
        .unwrap();
        // Leave the skill status behind so evaluate has something to repair
        let skill_id = db.get_subtopic(subtopic_id).unwrap().skill_id;
        let skill_status = db.get_skill(skill_id).unwrap().status;
        db.set_subtopic_status(subtopic_id, Status::Completed, skill_status)
            .unwrap();
    }

    fn completions(bus: &RefreshBroadcaster) -> Rc<RefCell<Vec<i64>>> {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        bus.subscribe(move |s| {
            if let Signal::CompletionDetected { skill_id } = s {
                sink.borrow_mut().push(*skill_id);
            }
        });
        seen
    }

    mod evaluate_tests {
        use super::*;

        #[test]
        fn partial_completion_marks_in_progress() {
            let (db, skill) = setup(2);
            let bus = RefreshBroadcaster::new();
            let seen = completions(&bus);
            complete(&db, skill.subtopics[0].id);

            let eval = SkillCompletionCoordinator::new(&db, &bus)
                .evaluate(skill.id)
                .unwrap();

            assert!(!eval.newly_completed);
            assert_eq!(eval.skill.status, Status::InProgress);
            assert_eq!(eval.skill.progress, 50);
            assert!(seen.borrow().is_empty());
        }

        #[test]
        fn full_completion_emits_once() {
            let (db, skill) = setup(2);
            let bus = RefreshBroadcaster::new();
            let seen = completions(&bus);
            let coordinator = SkillCompletionCoordinator::new(&db, &bus);

            complete(&db, skill.subtopics[0].id);
            complete(&db, skill.subtopics[1].id);

            let first = coordinator.evaluate(skill.id).unwrap();
            let second = coordinator.evaluate(skill.id).unwrap();

            assert!(first.newly_completed);
            assert_eq!(first.skill.status, Status::Completed);
            assert!(first.skill.completed_at.is_some());
            assert!(!second.newly_completed);
            assert_eq!(*seen.borrow(), vec![skill.id]);
        }

        #[test]
        fn reset_reopens_completed_skill() {
            let (db, skill) = setup(1);
            let bus = RefreshBroadcaster::new();
            let coordinator = SkillCompletionCoordinator::new(&db, &bus);

            complete(&db, skill.subtopics[0].id);
            coordinator.evaluate(skill.id).unwrap();

            db.set_subtopic_status(skill.subtopics[0].id, Status::ToLearn, Status::Completed)
                .unwrap();
            let eval = coordinator.evaluate(skill.id).unwrap();

            assert_eq!(eval.skill.status, Status::ToLearn);
            assert!(eval.skill.completed_at.is_none());
        }

        #[test]
        fn skill_without_subtopics_never_completes() {
            let (db, skill) = setup(0);
            let bus = RefreshBroadcaster::new();
            let seen = completions(&bus);

            let eval = SkillCompletionCoordinator::new(&db, &bus)
                .evaluate(skill.id)
                .unwrap();

            assert_eq!(eval.skill.status, Status::ToLearn);
            assert!(seen.borrow().is_empty());
        }

        #[test]
        fn unknown_skill_is_not_found() {
            let (db, _) = setup(1);
            let bus = RefreshBroadcaster::new();
            assert!(matches!(
                SkillCompletionCoordinator::new(&db, &bus).evaluate(404),
                Err(TrackerError::NotFound { .. })
            ));
        }
    }

    mod commit_tests {
        use super::*;

        fn log(db: &Database, subtopic_id: i64) {
            db.record_session(&SessionDraft {
                subtopic_id,
                duration_minutes: 30.0,
                notes: None,
                session_date: None,
            })
            .unwrap();
        }

        #[test]
        fn writes_subtopic_and_skill_together() {
            let (db, skill) = setup(2);
            let bus = RefreshBroadcaster::new();
            let seen = completions(&bus);
            let sub = skill.subtopics[0].id;
            log(&db, sub);

            let (updated, eval) = SkillCompletionCoordinator::new(&db, &bus)
                .commit(&skill, sub, Status::Completed)
                .unwrap();

            assert_eq!(updated.status, Status::Completed);
            assert!(!eval.newly_completed);
            assert_eq!(db.get_skill(skill.id).unwrap().status, Status::InProgress);
            assert!(seen.borrow().is_empty());
        }

        #[test]
        fn last_subtopic_completes_skill_once() {
            let (db, skill) = setup(1);
            let bus = RefreshBroadcaster::new();
            let seen = completions(&bus);
            let coordinator = SkillCompletionCoordinator::new(&db, &bus);
            let sub = skill.subtopics[0].id;
            log(&db, sub);

            let (_, eval) = coordinator.commit(&skill, sub, Status::Completed).unwrap();
            assert!(eval.newly_completed);
            assert_eq!(eval.skill.status, Status::Completed);
            assert!(eval.skill.completed_at.is_some());

            // Already stored as completed; evaluate finds nothing to do
            assert!(!coordinator.evaluate(skill.id).unwrap().newly_completed);
            assert_eq!(*seen.borrow(), vec![skill.id]);
        }
    }

    mod review_tests {
        use super::*;

        #[test]
        fn validate_rating_bounds() {
            assert_eq!(validate_rating(None).unwrap(), None);
            assert_eq!(validate_rating(Some(0)).unwrap(), None);
            assert_eq!(validate_rating(Some(1)).unwrap(), Some(1));
            assert_eq!(validate_rating(Some(5)).unwrap(), Some(5));
            assert!(matches!(validate_rating(Some(6)), Err(TrackerError::Validation(_))));
            assert!(matches!(validate_rating(Some(-1)), Err(TrackerError::Validation(_))));
        }

        #[test]
        fn second_review_overwrites_first() {
            let (db, skill) = setup(1);
            let bus = RefreshBroadcaster::new();
            let coordinator = SkillCompletionCoordinator::new(&db, &bus);

            coordinator
                .record_review(skill.id, Some(5), Some("great course"))
                .unwrap();
            let updated = coordinator
                .record_review(skill.id, Some(3), Some("revised"))
                .unwrap();

            assert_eq!(updated.rating, Some(3));
            assert_eq!(updated.completion_notes.as_deref(), Some("revised"));
            let stored = db.get_skill(skill.id).unwrap();
            assert_eq!(stored.rating, Some(3));
        }

        #[test]
        fn invalid_rating_keeps_previous_review() {
            let (db, skill) = setup(1);
            let bus = RefreshBroadcaster::new();
            let coordinator = SkillCompletionCoordinator::new(&db, &bus);

            coordinator.record_review(skill.id, Some(4), None).unwrap();
            assert!(coordinator.record_review(skill.id, Some(9), None).is_err());

            assert_eq!(db.get_skill(skill.id).unwrap().rating, Some(4));
        }

        #[test]
        fn declining_review_keeps_skill_completed() {
            let (db, skill) = setup(1);
            let bus = RefreshBroadcaster::new();
            let coordinator = SkillCompletionCoordinator::new(&db, &bus);

            complete(&db, skill.subtopics[0].id);
            coordinator.evaluate(skill.id).unwrap();
            let reviewed = coordinator.record_review(skill.id, None, None).unwrap();

            assert_eq!(reviewed.status, Status::Completed);
            assert_eq!(reviewed.rating, None);
        }
    }
}
