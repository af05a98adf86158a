//! Subtopic status transitions and the completion eligibility rule.
//!
//! `to-learn -> in-progress -> completed`, with any state allowed back to
//! `to-learn` or `in-progress`. Entering `completed` requires both a plan
//! (`expected_hours > 0`) and logged time (`hours_spent > 0`). Every caller
//! goes through [`SubtopicStateMachine::transition`]; no view re-checks the
//! rule on its own.

use tracing::{info, warn};

use crate::broadcast::RefreshBroadcaster;
use crate::completion::SkillCompletionCoordinator;
use crate::error::{Result, TrackerError};
use crate::models::{Skill, Status, StatusChange, Subtopic};
use crate::progress;
use crate::store::SkillStore;

pub fn check_eligibility(subtopic: &Subtopic) -> Result<()> {
    if subtopic.expected_hours <= 0.0 || subtopic.hours_spent <= 0.0 {
        return Err(TrackerError::IneligibleCompletion {
            subtopic_id: subtopic.id,
            expected_hours: subtopic.expected_hours,
            hours_spent: subtopic.hours_spent,
        });
    }
    Ok(())
}

pub fn is_eligible(subtopic: &Subtopic) -> bool {
    check_eligibility(subtopic).is_ok()
}

pub struct SubtopicStateMachine<'a, S: SkillStore + ?Sized> {
    store: &'a S,
    coordinator: SkillCompletionCoordinator<'a, S>,
}

impl<'a, S: SkillStore + ?Sized> SubtopicStateMachine<'a, S> {
    pub fn new(store: &'a S, broadcaster: &'a RefreshBroadcaster) -> Self {
        Self {
            store,
            coordinator: SkillCompletionCoordinator::new(store, broadcaster),
        }
    }

    /// Move a subtopic to `target`. Requesting the current status never fails
    /// eligibility; it only writes when the stored skill status has drifted
    /// from its subtopics. A rejected or failed transition leaves the stored
    /// statuses untouched.
    pub fn transition(&self, subtopic_id: i64, target: Status) -> Result<StatusChange> {
        let current = self.store.get_subtopic(subtopic_id)?;
        let skill = self.store.get_skill(current.skill_id)?;

        if current.status == target {
            return self.settle(current, skill);
        }

        if target == Status::Completed {
            if let Err(e) = check_eligibility(&current) {
                warn!(
                    subtopic_id,
                    expected_hours = current.expected_hours,
                    hours_spent = current.hours_spent,
                    "completion rejected"
                );
                return Err(e);
            }
        }

        let (updated, evaluation) = self.coordinator.commit(&skill, subtopic_id, target)?;
        info!(
            subtopic_id,
            from = current.status.as_str(),
            to = target.as_str(),
            "subtopic status changed"
        );

        Ok(StatusChange {
            subtopic: updated,
            skill: evaluation.skill,
            changed: true,
            skill_completed: evaluation.newly_completed,
        })
    }

    fn settle(&self, subtopic: Subtopic, skill: Skill) -> Result<StatusChange> {
        if progress::derive_status(&skill.subtopics) == skill.status {
            return Ok(StatusChange {
                subtopic,
                skill,
                changed: false,
                skill_completed: false,
            });
        }

        warn!(
            skill_id = skill.id,
            stored = skill.status.as_str(),
            "skill status out of line with its subtopics"
        );
        let evaluation = self.coordinator.evaluate(skill.id)?;
        Ok(StatusChange {
            subtopic,
            skill: evaluation.skill,
            changed: true,
            skill_completed: evaluation.newly_completed,
        })
    }
}
