//! Skill-level numbers derived from subtopics and sessions.
//!
//! Nothing here is stored. Every load of a skill runs [`apply`], so the
//! numbers a view sees are recomputed after each mutation.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::models::{Activity, Skill, Status, Subtopic, SubtopicDraft};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SkillProgress {
    pub progress: u8,
    pub completed_count: usize,
    pub total_count: usize,
    pub learned_hours: f64,
}

/// `round(100 * done / total)`, or 0 when there is nothing to count.
pub fn percent(done: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let done = done.min(total);
    // Integer round-half-up
    ((200 * done + total) / (2 * total)) as u8
}

pub fn compute_progress(subtopics: &[Subtopic]) -> SkillProgress {
    let total_count = subtopics.len();
    let completed_count = subtopics
        .iter()
        .filter(|s| s.status == Status::Completed)
        .count();
    let learned_hours = subtopics.iter().map(|s| s.hours_spent).sum();

    SkillProgress {
        progress: percent(completed_count, total_count),
        completed_count,
        total_count,
        learned_hours,
    }
}

/// Skill status implied by its subtopics. A skill with no subtopics has
/// nothing to complete and stays `to-learn`.
pub fn derive_status(subtopics: &[Subtopic]) -> Status {
    if subtopics.is_empty() {
        Status::ToLearn
    } else if subtopics.iter().all(|s| s.status == Status::Completed) {
        Status::Completed
    } else if subtopics.iter().any(|s| s.status != Status::ToLearn) {
        Status::InProgress
    } else {
        Status::ToLearn
    }
}

/// Refresh the derived fields of a freshly loaded skill.
pub fn apply(skill: &mut Skill) {
    let p = compute_progress(&skill.subtopics);
    skill.progress = p.progress;
    skill.learned_hours = p.learned_hours;
}

/// Expected hours for each subtopic draft. Explicit estimates are kept; the
/// target hours they leave over are split evenly across the rest, rounded to
/// the nearest half hour.
pub fn plan_expected_hours(target_hours: f64, drafts: &[SubtopicDraft]) -> Vec<f64> {
    let explicit: f64 = drafts.iter().filter_map(|d| d.expected_hours).sum();
    let unplanned = drafts.iter().filter(|d| d.expected_hours.is_none()).count();

    let share = if unplanned == 0 {
        0.0
    } else {
        let remaining = (target_hours - explicit).max(0.0);
        ((remaining / unplanned as f64) * 2.0).round() / 2.0
    };

    drafts
        .iter()
        .map(|d| d.expected_hours.unwrap_or(share))
        .collect()
}

// === Dashboard / analytics ===

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardStats {
    pub total_skills: usize,
    pub completed_skills: usize,
    pub total_learning_hours: f64,
    pub completion_rate: u8,
}

#[derive(Debug, Clone, Serialize)]
pub struct SkillProgressRow {
    pub skill_id: i64,
    pub name: String,
    pub category: String,
    pub status: Status,
    pub progress: u8,
    pub completed_count: usize,
    pub total_count: usize,
    pub target_hours: f64,
    pub learned_hours: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub stats: DashboardStats,
    pub skills_progress: Vec<SkillProgressRow>,
    pub category_breakdown: BTreeMap<String, usize>,
    pub recent_activities: Vec<Activity>,
}

pub fn summarize(skills: &[Skill], recent_activities: Vec<Activity>) -> Dashboard {
    let mut category_breakdown = BTreeMap::new();
    let mut skills_progress = Vec::with_capacity(skills.len());

    for skill in skills {
        *category_breakdown.entry(skill.category.clone()).or_insert(0) += 1;

        let p = compute_progress(&skill.subtopics);
        skills_progress.push(SkillProgressRow {
            skill_id: skill.id,
            name: skill.name.clone(),
            category: skill.category.clone(),
            status: skill.status,
            progress: p.progress,
            completed_count: p.completed_count,
            total_count: p.total_count,
            target_hours: skill.target_hours,
            learned_hours: p.learned_hours,
        });
    }

    let completed_skills = skills
        .iter()
        .filter(|s| s.status == Status::Completed)
        .count();
    let total_learning_hours = skills_progress.iter().map(|r| r.learned_hours).sum();

    Dashboard {
        stats: DashboardStats {
            total_skills: skills.len(),
            completed_skills,
            total_learning_hours,
            completion_rate: percent(completed_skills, skills.len()),
        },
        skills_progress,
        category_breakdown,
        recent_activities,
    }
}
