// Several accessors are only used by the JSON output and the TUI
#![allow(dead_code)]

use serde::{Deserialize, Serialize};

// Subtopic status; a skill's status uses the same three values but is derived
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    ToLearn,
    InProgress,
    Completed,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::ToLearn => "to-learn",
            Status::InProgress => "in-progress",
            Status::Completed => "completed",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "to-learn" | "to_learn" | "todo" | "reset" => Some(Status::ToLearn),
            "in-progress" | "in_progress" | "started" | "start" => Some(Status::InProgress),
            "completed" | "complete" | "done" => Some(Status::Completed),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Status::ToLearn => "To Learn",
            Status::InProgress => "In Progress",
            Status::Completed => "Completed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceType {
    Course,
    Video,
    Article,
    Tutorial,
    Book,
}

impl ResourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::Course => "course",
            ResourceType::Video => "video",
            ResourceType::Article => "article",
            ResourceType::Tutorial => "tutorial",
            ResourceType::Book => "book",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "course" => Some(ResourceType::Course),
            "video" | "videos" => Some(ResourceType::Video),
            "article" | "articles" => Some(ResourceType::Article),
            "tutorial" => Some(ResourceType::Tutorial),
            "book" => Some(ResourceType::Book),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ResourceType::Course => "Course",
            ResourceType::Video => "Video Series",
            ResourceType::Article => "Article Series",
            ResourceType::Tutorial => "Tutorial",
            ResourceType::Book => "Book",
        }
    }
}

// A skill with its subtopics. progress and learned_hours are filled in from
// the subtopics every time the skill is loaded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Skill {
    pub id: i64,
    pub name: String,
    pub category: String,
    pub resource_type: ResourceType,
    pub platform: Option<String>,
    pub description: Option<String>,
    pub target_hours: f64,
    pub status: Status,
    pub progress: u8,
    pub learned_hours: f64,
    pub rating: Option<u8>,
    pub completion_notes: Option<String>,
    pub created_at: String,
    pub completed_at: Option<String>,
    pub subtopics: Vec<Subtopic>,
}

impl Skill {
    pub fn completed_count(&self) -> usize {
        self.subtopics
            .iter()
            .filter(|s| s.status == Status::Completed)
            .count()
    }

    pub fn rating_stars(&self) -> String {
        match self.rating {
            Some(r) => format!("{}{}", "★".repeat(r as usize), "☆".repeat(5 - r as usize)),
            None => "-".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subtopic {
    pub id: i64,
    pub skill_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub status: Status,
    pub expected_hours: f64,
    // Sum of logged session minutes / 60, never stored
    pub hours_spent: f64,
}

// Append-only record of one block of study
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LearningSession {
    pub id: i64,
    pub subtopic_id: i64,
    pub duration_minutes: f64,
    pub notes: Option<String>,
    pub session_date: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubtopicDraft {
    pub title: String,
    pub description: Option<String>,
    pub expected_hours: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillDraft {
    pub name: String,
    pub category: Option<String>,
    pub resource_type: ResourceType,
    pub platform: Option<String>,
    pub target_hours: f64,
    pub description: Option<String>,
    pub subtopics: Vec<SubtopicDraft>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionDraft {
    pub subtopic_id: i64,
    pub duration_minutes: f64,
    pub notes: Option<String>,
    // RFC 3339; defaults to now
    pub session_date: Option<String>,
}

// Optional post-completion review. rating None means "no rating".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub rating: Option<u8>,
    pub notes: Option<String>,
}

// Result of a subtopic status change, after the store confirmed it
#[derive(Debug, Clone, Serialize)]
pub struct StatusChange {
    pub subtopic: Subtopic,
    pub skill: Skill,
    // false when nothing was written
    pub changed: bool,
    pub skill_completed: bool,
}

// A logged session joined with the names it belongs to
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Activity {
    pub session_id: i64,
    pub skill_id: i64,
    pub skill_name: String,
    pub subtopic_title: String,
    pub duration_minutes: f64,
    pub session_date: String,
}

// JSON output wrapper for CLI
#[derive(Debug, Serialize)]
pub struct JsonOutput<T: Serialize> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T: Serialize> JsonOutput<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(msg.into()),
        }
    }
}
