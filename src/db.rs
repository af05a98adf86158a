use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;

use crate::error::{Result, TrackerError};
use crate::models::{
    Activity, LearningSession, ResourceType, Review, SessionDraft, Skill, SkillDraft, Status,
    Subtopic,
};
use crate::progress;
use crate::store::SkillStore;

const SKILL_COLUMNS: &str = "id, name, category, resource_type, platform, description, \
     target_hours, status, rating, completion_notes, created_at, completed_at";

// hours_spent is read through from the session log on every load
const SUBTOPIC_COLUMNS: &str = "st.id, st.skill_id, st.title, st.description, st.status, \
     st.expected_hours, \
     COALESCE((SELECT SUM(ls.duration_minutes) FROM learning_sessions ls \
               WHERE ls.subtopic_id = st.id), 0) / 60.0";

// completed_at is stamped once on entering completed and cleared on leaving it
const UPDATE_SKILL_STATUS: &str = r#"
    UPDATE skills
    SET status = ?1,
        completed_at = CASE WHEN ?1 = 'completed' THEN COALESCE(completed_at, ?2) ELSE NULL END
    WHERE id = ?3
"#;

pub struct Database {
    conn: Connection,
}

impl Database {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        Ok(Self { conn })
    }

    pub fn init(&self) -> Result<()> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS skills (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                category TEXT NOT NULL,
                resource_type TEXT NOT NULL CHECK(resource_type IN ('course', 'video', 'article', 'tutorial', 'book')),
                platform TEXT,
                description TEXT,
                target_hours REAL NOT NULL DEFAULT 0 CHECK(target_hours >= 0),
                status TEXT NOT NULL DEFAULT 'to-learn' CHECK(status IN ('to-learn', 'in-progress', 'completed')),
                rating INTEGER CHECK(rating BETWEEN 1 AND 5),
                completion_notes TEXT,
                created_at TEXT NOT NULL,
                completed_at TEXT
            );

            CREATE TABLE IF NOT EXISTS subtopics (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                skill_id INTEGER NOT NULL,
                position INTEGER NOT NULL DEFAULT 0,
                title TEXT NOT NULL,
                description TEXT,
                status TEXT NOT NULL DEFAULT 'to-learn' CHECK(status IN ('to-learn', 'in-progress', 'completed')),
                expected_hours REAL NOT NULL DEFAULT 0 CHECK(expected_hours >= 0),
                FOREIGN KEY (skill_id) REFERENCES skills(id) ON DELETE CASCADE
            );

            -- Append-only study log
            CREATE TABLE IF NOT EXISTS learning_sessions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                subtopic_id INTEGER NOT NULL,
                duration_minutes REAL NOT NULL CHECK(duration_minutes > 0),
                notes TEXT,
                session_date TEXT NOT NULL,
                FOREIGN KEY (subtopic_id) REFERENCES subtopics(id) ON DELETE CASCADE
            );

            CREATE INDEX IF NOT EXISTS idx_subtopics_skill ON subtopics(skill_id);
            CREATE INDEX IF NOT EXISTS idx_sessions_subtopic ON learning_sessions(subtopic_id);
            CREATE INDEX IF NOT EXISTS idx_sessions_date ON learning_sessions(session_date);
            CREATE INDEX IF NOT EXISTS idx_skills_status ON skills(status);
            "#,
        )?;

        Ok(())
    }

    fn skill_from_row(row: &Row) -> rusqlite::Result<Skill> {
        let resource_str: String = row.get(3)?;
        let status_str: String = row.get(7)?;
        let rating: Option<i64> = row.get(8)?;
        Ok(Skill {
            id: row.get(0)?,
            name: row.get(1)?,
            category: row.get(2)?,
            resource_type: ResourceType::from_str(&resource_str).unwrap_or(ResourceType::Course),
            platform: row.get(4)?,
            description: row.get(5)?,
            target_hours: row.get(6)?,
            status: Status::from_str(&status_str).unwrap_or(Status::ToLearn),
            progress: 0,
            learned_hours: 0.0,
            rating: rating.map(|r| r as u8),
            completion_notes: row.get(9)?,
            created_at: row.get(10)?,
            completed_at: row.get(11)?,
            subtopics: vec![],
        })
    }

    fn subtopic_from_row(row: &Row) -> rusqlite::Result<Subtopic> {
        let status_str: String = row.get(4)?;
        Ok(Subtopic {
            id: row.get(0)?,
            skill_id: row.get(1)?,
            title: row.get(2)?,
            description: row.get(3)?,
            status: Status::from_str(&status_str).unwrap_or(Status::ToLearn),
            expected_hours: row.get(5)?,
            hours_spent: row.get(6)?,
        })
    }

    fn session_from_row(row: &Row) -> rusqlite::Result<LearningSession> {
        Ok(LearningSession {
            id: row.get(0)?,
            subtopic_id: row.get(1)?,
            duration_minutes: row.get(2)?,
            notes: row.get(3)?,
            session_date: row.get(4)?,
        })
    }

    fn load_subtopics(&self, skill_id: i64) -> rusqlite::Result<Vec<Subtopic>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM subtopics st WHERE st.skill_id = ?1 ORDER BY st.position, st.id",
            SUBTOPIC_COLUMNS
        ))?;
        let rows = stmt.query_map(params![skill_id], Self::subtopic_from_row)?;
        rows.collect()
    }

    fn find_skill(&self, skill_id: i64) -> rusqlite::Result<Option<Skill>> {
        let skill = self
            .conn
            .query_row(
                &format!("SELECT {} FROM skills WHERE id = ?1", SKILL_COLUMNS),
                params![skill_id],
                Self::skill_from_row,
            )
            .optional()?;

        match skill {
            Some(mut s) => {
                s.subtopics = self.load_subtopics(s.id)?;
                progress::apply(&mut s);
                Ok(Some(s))
            }
            None => Ok(None),
        }
    }
}

impl SkillStore for Database {
    fn create_skill(&self, draft: &SkillDraft, expected_hours: &[f64]) -> Result<Skill> {
        let now = Utc::now().to_rfc3339();
        let category = draft
            .category
            .clone()
            .unwrap_or_else(|| draft.resource_type.label().to_string());

        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            r#"
            INSERT INTO skills (name, category, resource_type, platform, description, target_hours, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                draft.name,
                category,
                draft.resource_type.as_str(),
                draft.platform,
                draft.description,
                draft.target_hours,
                now
            ],
        )?;
        let skill_id = tx.last_insert_rowid();

        for (position, sub) in draft.subtopics.iter().enumerate() {
            let expected = expected_hours.get(position).copied().unwrap_or(0.0);
            tx.execute(
                r#"
                INSERT INTO subtopics (skill_id, position, title, description, expected_hours)
                VALUES (?1, ?2, ?3, ?4, ?5)
                "#,
                params![skill_id, position as i64, sub.title, sub.description, expected],
            )?;
        }
        tx.commit()?;

        self.get_skill(skill_id)
    }

    fn get_skill(&self, skill_id: i64) -> Result<Skill> {
        self.find_skill(skill_id)?.ok_or(TrackerError::NotFound {
            entity: "Skill",
            id: skill_id,
        })
    }

    fn list_skills(&self) -> Result<Vec<Skill>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM skills ORDER BY created_at DESC, id DESC",
            SKILL_COLUMNS
        ))?;
        let rows = stmt.query_map([], Self::skill_from_row)?;
        let mut skills = rows.collect::<rusqlite::Result<Vec<_>>>()?;

        for skill in &mut skills {
            skill.subtopics = self.load_subtopics(skill.id)?;
            progress::apply(skill);
        }

        Ok(skills)
    }

    fn get_subtopic(&self, subtopic_id: i64) -> Result<Subtopic> {
        self.conn
            .query_row(
                &format!("SELECT {} FROM subtopics st WHERE st.id = ?1", SUBTOPIC_COLUMNS),
                params![subtopic_id],
                Self::subtopic_from_row,
            )
            .optional()?
            .ok_or(TrackerError::NotFound {
                entity: "Subtopic",
                id: subtopic_id,
            })
    }

    fn set_subtopic_status(
        &self,
        subtopic_id: i64,
        status: Status,
        skill_status: Status,
    ) -> Result<Subtopic> {
        let tx = self.conn.unchecked_transaction()?;
        let skill_id: i64 = tx
            .query_row(
                "SELECT skill_id FROM subtopics WHERE id = ?1",
                params![subtopic_id],
                |row| row.get(0),
            )
            .optional()?
            .ok_or(TrackerError::NotFound {
                entity: "Subtopic",
                id: subtopic_id,
            })?;

        tx.execute(
            "UPDATE subtopics SET status = ?1 WHERE id = ?2",
            params![status.as_str(), subtopic_id],
        )?;
        tx.execute(
            UPDATE_SKILL_STATUS,
            params![skill_status.as_str(), Utc::now().to_rfc3339(), skill_id],
        )?;
        tx.commit()?;

        self.get_subtopic(subtopic_id)
    }

    fn set_expected_hours(&self, subtopic_id: i64, hours: f64) -> Result<Subtopic> {
        let rows = self.conn.execute(
            "UPDATE subtopics SET expected_hours = ?1 WHERE id = ?2",
            params![hours, subtopic_id],
        )?;
        if rows == 0 {
            return Err(TrackerError::NotFound {
                entity: "Subtopic",
                id: subtopic_id,
            });
        }
        self.get_subtopic(subtopic_id)
    }

    fn set_skill_status(&self, skill_id: i64, status: Status) -> Result<()> {
        let now = Utc::now().to_rfc3339();
        let rows = self
            .conn
            .execute(UPDATE_SKILL_STATUS, params![status.as_str(), now, skill_id])?;
        if rows == 0 {
            return Err(TrackerError::NotFound {
                entity: "Skill",
                id: skill_id,
            });
        }
        Ok(())
    }

    fn record_session(&self, draft: &SessionDraft) -> Result<LearningSession> {
        // Surface a missing subtopic as NotFound rather than a constraint error
        self.get_subtopic(draft.subtopic_id)?;

        let session_date = draft
            .session_date
            .clone()
            .unwrap_or_else(|| Utc::now().to_rfc3339());

        self.conn.execute(
            r#"
            INSERT INTO learning_sessions (subtopic_id, duration_minutes, notes, session_date)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            params![draft.subtopic_id, draft.duration_minutes, draft.notes, session_date],
        )?;
        let id = self.conn.last_insert_rowid();

        Ok(LearningSession {
            id,
            subtopic_id: draft.subtopic_id,
            duration_minutes: draft.duration_minutes,
            notes: draft.notes.clone(),
            session_date,
        })
    }

    fn list_sessions(&self, subtopic_id: i64) -> Result<Vec<LearningSession>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, subtopic_id, duration_minutes, notes, session_date
            FROM learning_sessions
            WHERE subtopic_id = ?1
            ORDER BY session_date DESC, id DESC
            "#,
        )?;
        let rows = stmt.query_map(params![subtopic_id], Self::session_from_row)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    fn recent_activity(&self, limit: usize) -> Result<Vec<Activity>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT ls.id, sk.id, sk.name, st.title, ls.duration_minutes, ls.session_date
            FROM learning_sessions ls
            JOIN subtopics st ON ls.subtopic_id = st.id
            JOIN skills sk ON st.skill_id = sk.id
            ORDER BY ls.session_date DESC, ls.id DESC
            LIMIT ?1
            "#,
        )?;
        let rows = stmt.query_map(params![limit as i64], |row| {
            Ok(Activity {
                session_id: row.get(0)?,
                skill_id: row.get(1)?,
                skill_name: row.get(2)?,
                subtopic_title: row.get(3)?,
                duration_minutes: row.get(4)?,
                session_date: row.get(5)?,
            })
        })?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    fn submit_review(&self, skill_id: i64, review: &Review) -> Result<Skill> {
        let rows = self.conn.execute(
            "UPDATE skills SET rating = ?1, completion_notes = ?2 WHERE id = ?3",
            params![review.rating.map(i64::from), review.notes, skill_id],
        )?;
        if rows == 0 {
            return Err(TrackerError::NotFound {
                entity: "Skill",
                id: skill_id,
            });
        }
        self.get_skill(skill_id)
    }

    fn delete_skill(&self, skill_id: i64) -> Result<()> {
        let rows = self
            .conn
            .execute("DELETE FROM skills WHERE id = ?1", params![skill_id])?;
        if rows == 0 {
            return Err(TrackerError::NotFound {
                entity: "Skill",
                id: skill_id,
            });
        }
        Ok(())
    }
}
