//! Persistence contract consumed by the tracker.
//!
//! Every call either applies fully or returns an error with nothing applied.
//! Implementations report storage failures as `TrackerError::Collaborator`
//! and unknown ids as `TrackerError::NotFound`.

use crate::error::Result;
use crate::models::{
    Activity, LearningSession, Review, SessionDraft, Skill, SkillDraft, Status, Subtopic,
};

pub trait SkillStore {
    /// Persist a validated draft; subtopic drafts must carry expected hours.
    fn create_skill(&self, draft: &SkillDraft, expected_hours: &[f64]) -> Result<Skill>;

    /// Skill with nested subtopics and derived fields filled in.
    fn get_skill(&self, skill_id: i64) -> Result<Skill>;

    fn list_skills(&self) -> Result<Vec<Skill>>;

    fn get_subtopic(&self, subtopic_id: i64) -> Result<Subtopic>;

    /// Writes the subtopic status together with the owning skill's status.
    /// Both land or neither does.
    fn set_subtopic_status(
        &self,
        subtopic_id: i64,
        status: Status,
        skill_status: Status,
    ) -> Result<Subtopic>;

    fn set_expected_hours(&self, subtopic_id: i64, hours: f64) -> Result<Subtopic>;

    /// Marks the skill's stored status, stamping or clearing `completed_at`.
    fn set_skill_status(&self, skill_id: i64, status: Status) -> Result<()>;

    fn record_session(&self, draft: &SessionDraft) -> Result<LearningSession>;

    fn list_sessions(&self, subtopic_id: i64) -> Result<Vec<LearningSession>>;

    fn recent_activity(&self, limit: usize) -> Result<Vec<Activity>>;

    /// Overwrites any previous review.
    fn submit_review(&self, skill_id: i64, review: &Review) -> Result<Skill>;

    fn delete_skill(&self, skill_id: i64) -> Result<()>;
}
