//! Entry point for every mutation and read the CLI and TUI perform.
//!
//! A mutation runs to completion before returning: store write, derived
//! recompute, completion check, then refresh broadcasts. Broadcasts only go
//! out after the store confirmed the change; rejected or failed operations
//! publish nothing.

use std::rc::Rc;

use tracing::{debug, info, warn};

use crate::broadcast::{RefreshBroadcaster, RefreshTopic};
use crate::completion::SkillCompletionCoordinator;
use crate::error::{Result, TrackerError};
use crate::models::{LearningSession, Skill, SkillDraft, Status, StatusChange, Subtopic};
use crate::progress::{self, Dashboard};
use crate::session_log::{clean_text, SessionLog};
use crate::state_machine::SubtopicStateMachine;
use crate::store::SkillStore;

const RECENT_ACTIVITY_LIMIT: usize = 5;

pub struct Tracker<S: SkillStore> {
    store: S,
    broadcaster: Rc<RefreshBroadcaster>,
}

impl<S: SkillStore> Tracker<S> {
    pub fn new(store: S, broadcaster: Rc<RefreshBroadcaster>) -> Self {
        Self { store, broadcaster }
    }

    pub fn broadcaster(&self) -> &Rc<RefreshBroadcaster> {
        &self.broadcaster
    }

    pub fn create_skill(&self, draft: SkillDraft) -> Result<Skill> {
        let draft = normalize_draft(draft).inspect_err(|e| warn!(error = %e, "rejected skill"))?;
        let expected = progress::plan_expected_hours(draft.target_hours, &draft.subtopics);

        let skill = self.store.create_skill(&draft, &expected)?;
        info!(
            skill_id = skill.id,
            name = %skill.name,
            subtopics = skill.subtopics.len(),
            "skill created"
        );
        self.notify(skill.id);
        Ok(skill)
    }

    pub fn get_skill(&self, skill_id: i64) -> Result<Skill> {
        self.store.get_skill(skill_id)
    }

    pub fn list_skills(&self) -> Result<Vec<Skill>> {
        self.store.list_skills()
    }

    pub fn get_subtopic(&self, subtopic_id: i64) -> Result<Subtopic> {
        self.store.get_subtopic(subtopic_id)
    }

    pub fn list_sessions(&self, subtopic_id: i64) -> Result<Vec<LearningSession>> {
        self.store.list_sessions(subtopic_id)
    }

    pub fn record_session(
        &self,
        subtopic_id: i64,
        duration_minutes: f64,
        notes: Option<&str>,
        session_date: Option<&str>,
    ) -> Result<Subtopic> {
        let subtopic = SessionLog::new(&self.store).record_session(
            subtopic_id,
            duration_minutes,
            notes,
            session_date,
        )?;
        self.notify(subtopic.skill_id);
        Ok(subtopic)
    }

    pub fn set_subtopic_status(&self, subtopic_id: i64, status: Status) -> Result<StatusChange> {
        let change =
            SubtopicStateMachine::new(&self.store, &self.broadcaster).transition(subtopic_id, status)?;
        if change.changed {
            self.notify(change.skill.id);
        } else {
            debug!(subtopic_id, status = status.as_str(), "status already current");
        }
        Ok(change)
    }

    pub fn set_expected_hours(&self, subtopic_id: i64, hours: f64) -> Result<Subtopic> {
        if !hours.is_finite() || hours < 0.0 {
            warn!(subtopic_id, hours, "rejected expected hours");
            return Err(TrackerError::validation(
                "Expected hours must be zero or a positive number",
            ));
        }
        let subtopic = self.store.set_expected_hours(subtopic_id, hours)?;
        info!(subtopic_id, hours, "expected hours updated");
        self.notify(subtopic.skill_id);
        Ok(subtopic)
    }

    pub fn record_review(
        &self,
        skill_id: i64,
        rating: Option<i64>,
        notes: Option<&str>,
    ) -> Result<Skill> {
        let skill = SkillCompletionCoordinator::new(&self.store, &self.broadcaster)
            .record_review(skill_id, rating, notes)?;
        self.notify(skill_id);
        Ok(skill)
    }

    pub fn delete_skill(&self, skill_id: i64) -> Result<()> {
        self.store.delete_skill(skill_id)?;
        info!(skill_id, "skill deleted");
        self.broadcaster.publish(RefreshTopic::Skills);
        self.broadcaster.publish(RefreshTopic::Dashboard);
        Ok(())
    }

    pub fn dashboard(&self) -> Result<Dashboard> {
        let skills = self.store.list_skills()?;
        let recent = self.store.recent_activity(RECENT_ACTIVITY_LIMIT)?;
        Ok(progress::summarize(&skills, recent))
    }

    fn notify(&self, skill_id: i64) {
        self.broadcaster.publish(RefreshTopic::Skill(skill_id));
        self.broadcaster.publish(RefreshTopic::Skills);
        self.broadcaster.publish(RefreshTopic::Dashboard);
    }
}

fn normalize_draft(draft: SkillDraft) -> Result<SkillDraft> {
    let name = draft.name.trim().to_string();
    if name.is_empty() {
        return Err(TrackerError::validation("Skill name is required"));
    }
    if !draft.target_hours.is_finite() || draft.target_hours < 0.0 {
        return Err(TrackerError::validation(
            "Target hours must be zero or a positive number",
        ));
    }

    let mut subtopics = Vec::with_capacity(draft.subtopics.len());
    for mut sub in draft.subtopics {
        let title = sub.title.trim();
        if title.is_empty() {
            continue;
        }
        if let Some(h) = sub.expected_hours {
            if !h.is_finite() || h < 0.0 {
                return Err(TrackerError::validation(format!(
                    "Expected hours for '{}' must be zero or a positive number",
                    title
                )));
            }
        }
        sub.title = title.to_string();
        sub.description = clean_text(sub.description.as_deref());
        subtopics.push(sub);
    }

    Ok(SkillDraft {
        name,
        category: clean_text(draft.category.as_deref()),
        resource_type: draft.resource_type,
        platform: clean_text(draft.platform.as_deref()),
        target_hours: draft.target_hours,
        description: clean_text(draft.description.as_deref()),
        subtopics,
    })
}
