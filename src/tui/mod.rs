mod ui;
mod widgets;

use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::io;
use std::rc::Rc;
use std::time::Duration;

use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use crate::broadcast::{RefreshTopic, Signal, SubscriberId};
use crate::completion::validate_rating;
use crate::db::Database;
use crate::error::TrackerError;
use crate::models::{LearningSession, Skill, Status, Subtopic};
use crate::progress::Dashboard;
use crate::tracker::Tracker;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Dashboard,
    Skills,
    SkillDetail,
}

impl View {
    fn next(&self) -> Self {
        match self {
            View::Dashboard => View::Skills,
            View::Skills => View::Dashboard,
            View::SkillDetail => View::Skills,
        }
    }

    fn prev(&self) -> Self {
        match self {
            View::Dashboard => View::Skills,
            View::Skills => View::Dashboard,
            View::SkillDetail => View::Skills,
        }
    }
}

/// What the bottom line is currently collecting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    LogMinutes,
    PlanHours,
    ReviewRating,
    ReviewNotes,
}

impl InputMode {
    pub fn prompt(&self) -> &'static str {
        match self {
            InputMode::Normal => "",
            InputMode::LogMinutes => "Minutes studied: ",
            InputMode::PlanHours => "Expected hours: ",
            InputMode::ReviewRating => "Rating 1-5 (empty for none): ",
            InputMode::ReviewNotes => "Completion notes: ",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatusMessage {
    pub text: String,
    pub is_error: bool,
}

pub struct StatefulList<T> {
    pub items: Vec<T>,
    pub selected: Option<usize>,
}

impl<T> StatefulList<T> {
    fn with_items(items: Vec<T>) -> Self {
        let selected = if items.is_empty() { None } else { Some(0) };
        Self { items, selected }
    }

    /// Swap in fresh items, keeping the cursor where it was when possible.
    fn replace(&mut self, items: Vec<T>) {
        self.selected = match (self.selected, items.len()) {
            (_, 0) => None,
            (Some(i), len) => Some(i.min(len - 1)),
            (None, _) => Some(0),
        };
        self.items = items;
    }

    fn next(&mut self) {
        if self.items.is_empty() {
            return;
        }
        let i = match self.selected {
            Some(i) => {
                if i >= self.items.len() - 1 {
                    0
                } else {
                    i + 1
                }
            }
            None => 0,
        };
        self.selected = Some(i);
    }

    fn previous(&mut self) {
        if self.items.is_empty() {
            return;
        }
        let i = match self.selected {
            Some(i) => {
                if i == 0 {
                    self.items.len() - 1
                } else {
                    i - 1
                }
            }
            None => 0,
        };
        self.selected = Some(i);
    }

    fn first(&mut self) {
        if !self.items.is_empty() {
            self.selected = Some(0);
        }
    }

    fn last(&mut self) {
        if !self.items.is_empty() {
            self.selected = Some(self.items.len() - 1);
        }
    }

    fn selected_item(&self) -> Option<&T> {
        self.selected.and_then(|i| self.items.get(i))
    }
}

pub struct App {
    tracker: Tracker<Database>,
    subscription: SubscriberId,
    stale: Rc<RefCell<HashSet<RefreshTopic>>>,
    completed: Rc<Cell<Option<i64>>>,
    pub view: View,
    pub dashboard: Dashboard,
    pub skills: StatefulList<Skill>,
    pub selected_skill: Option<Skill>,
    pub subtopics: StatefulList<Subtopic>,
    pub sessions: Vec<LearningSession>,
    pub input_mode: InputMode,
    pub input: String,
    pub review_skill: Option<i64>,
    pub review_rating: Option<i64>,
    pub message: Option<StatusMessage>,
    pub should_quit: bool,
}

impl App {
    pub fn new(tracker: Tracker<Database>) -> Result<Self, Box<dyn std::error::Error>> {
        let stale = Rc::new(RefCell::new(HashSet::new()));
        let completed = Rc::new(Cell::new(None));

        let subscription = {
            let stale = Rc::clone(&stale);
            let completed = Rc::clone(&completed);
            tracker.broadcaster().subscribe(move |signal| match signal {
                Signal::Refresh(topic) => {
                    stale.borrow_mut().insert(*topic);
                }
                Signal::CompletionDetected { skill_id } => completed.set(Some(*skill_id)),
            })
        };

        let dashboard = tracker.dashboard()?;
        let skills = tracker.list_skills()?;

        Ok(Self {
            tracker,
            subscription,
            stale,
            completed,
            view: View::Dashboard,
            dashboard,
            skills: StatefulList::with_items(skills),
            selected_skill: None,
            subtopics: StatefulList::with_items(Vec::new()),
            sessions: Vec::new(),
            input_mode: InputMode::Normal,
            input: String::new(),
            review_skill: None,
            review_rating: None,
            message: None,
            should_quit: false,
        })
    }

    pub fn refresh_data(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        self.dashboard = self.tracker.dashboard()?;
        self.skills.replace(self.tracker.list_skills()?);
        if let Some(id) = self.selected_skill.as_ref().map(|s| s.id) {
            self.load_skill(id)?;
        }
        Ok(())
    }

    /// Reload whatever the broadcaster marked stale since the last call.
    pub fn apply_refreshes(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        let topics: Vec<RefreshTopic> = self.stale.borrow_mut().drain().collect();
        for topic in topics {
            match topic {
                RefreshTopic::Dashboard => self.dashboard = self.tracker.dashboard()?,
                RefreshTopic::Skills => self.skills.replace(self.tracker.list_skills()?),
                RefreshTopic::Skill(id) => {
                    if self.selected_skill.as_ref().is_some_and(|s| s.id == id) {
                        self.load_skill(id)?;
                    }
                }
            }
        }

        if let Some(skill_id) = self.completed.take() {
            self.begin_review(skill_id);
        }
        Ok(())
    }

    fn load_skill(&mut self, skill_id: i64) -> Result<(), Box<dyn std::error::Error>> {
        let skill = self.tracker.get_skill(skill_id)?;
        if self.selected_skill.as_ref().map(|s| s.id) == Some(skill_id) {
            self.subtopics.replace(skill.subtopics.clone());
        } else {
            self.subtopics = StatefulList::with_items(skill.subtopics.clone());
        }
        self.selected_skill = Some(skill);
        self.load_sessions()
    }

    fn load_sessions(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        self.sessions = match self.subtopics.selected_item() {
            Some(sub) => self.tracker.list_sessions(sub.id)?,
            None => Vec::new(),
        };
        Ok(())
    }

    fn open_skill(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(id) = self.skills.selected_item().map(|s| s.id) {
            self.load_skill(id)?;
            self.view = View::SkillDetail;
        }
        Ok(())
    }

    fn close_skill(&mut self) {
        self.view = View::Skills;
        self.selected_skill = None;
        self.subtopics = StatefulList::with_items(Vec::new());
        self.sessions.clear();
    }

    fn selected_subtopic_id(&self) -> Option<i64> {
        self.subtopics.selected_item().map(|s| s.id)
    }

    fn info(&mut self, text: impl Into<String>) {
        self.message = Some(StatusMessage {
            text: text.into(),
            is_error: false,
        });
    }

    fn fail(&mut self, text: impl Into<String>) {
        self.message = Some(StatusMessage {
            text: text.into(),
            is_error: true,
        });
    }

    fn report(&mut self, err: &TrackerError) {
        self.fail(err.user_message());
    }

    fn change_status(&mut self, status: Status) {
        let Some(id) = self.selected_subtopic_id() else {
            return;
        };
        match self.tracker.set_subtopic_status(id, status) {
            Ok(change) if !change.changed => self.info(format!(
                "'{}' is already {}",
                change.subtopic.title,
                change.subtopic.status.label()
            )),
            Ok(change) => self.info(format!(
                "'{}' is now {} ({}% of skill done)",
                change.subtopic.title,
                change.subtopic.status.label(),
                change.skill.progress
            )),
            Err(e) => self.report(&e),
        }
    }

    fn begin_input(&mut self, mode: InputMode) {
        self.input_mode = mode;
        self.input.clear();
    }

    fn begin_review(&mut self, skill_id: i64) {
        self.review_skill = Some(skill_id);
        self.review_rating = None;
        self.begin_input(InputMode::ReviewRating);
        self.info("Skill completed! Leave a review, or Esc to skip");
    }

    fn submit_input(&mut self) {
        let input = std::mem::take(&mut self.input);
        let mode = std::mem::replace(&mut self.input_mode, InputMode::Normal);
        let text = input.trim();

        match mode {
            InputMode::Normal => {}
            InputMode::LogMinutes => {
                let Some(id) = self.selected_subtopic_id() else {
                    return;
                };
                let Ok(minutes) = text.parse::<f64>() else {
                    self.fail("Enter the duration as a number of minutes");
                    return;
                };
                match self.tracker.record_session(id, minutes, None, None) {
                    Ok(sub) => self.info(format!(
                        "Logged {} min on '{}' ({:.1}h total)",
                        minutes, sub.title, sub.hours_spent
                    )),
                    Err(e) => self.report(&e),
                }
            }
            InputMode::PlanHours => {
                let Some(id) = self.selected_subtopic_id() else {
                    return;
                };
                let Ok(hours) = text.parse::<f64>() else {
                    self.fail("Enter the expected hours as a number");
                    return;
                };
                match self.tracker.set_expected_hours(id, hours) {
                    Ok(sub) => self.info(format!("'{}' planned at {}h", sub.title, hours)),
                    Err(e) => self.report(&e),
                }
            }
            InputMode::ReviewRating => {
                let parsed = if text.is_empty() {
                    Ok(None)
                } else {
                    text.parse::<i64>()
                        .map(Some)
                        .map_err(|_| TrackerError::validation("Rating must be a number from 1 to 5"))
                };
                // Check early so the prompt can stay open on a bad rating
                match parsed.and_then(|r| validate_rating(r).map(|_| r)) {
                    Ok(rating) => {
                        self.review_rating = rating;
                        self.input_mode = InputMode::ReviewNotes;
                    }
                    Err(e) => {
                        self.report(&e);
                        self.input_mode = InputMode::ReviewRating;
                    }
                }
            }
            InputMode::ReviewNotes => {
                let Some(skill_id) = self.review_skill.take() else {
                    return;
                };
                let rating = self.review_rating.take();
                match self.tracker.record_review(skill_id, rating, Some(text)) {
                    Ok(skill) => self.info(format!(
                        "Review saved for '{}' {}",
                        skill.name,
                        skill.rating_stars()
                    )),
                    Err(e) => self.report(&e),
                }
            }
        }
    }

    fn handle_input_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Esc => {
                if matches!(
                    self.input_mode,
                    InputMode::ReviewRating | InputMode::ReviewNotes
                ) {
                    self.review_skill = None;
                    self.review_rating = None;
                    self.info("Review skipped");
                }
                self.input_mode = InputMode::Normal;
                self.input.clear();
            }
            KeyCode::Enter => self.submit_input(),
            KeyCode::Backspace => {
                self.input.pop();
            }
            KeyCode::Char(c) => self.input.push(c),
            _ => {}
        }
    }

    fn handle_key(
        &mut self,
        key: KeyCode,
        modifiers: KeyModifiers,
    ) -> Result<(), Box<dyn std::error::Error>> {
        if self.input_mode != InputMode::Normal {
            self.handle_input_key(key);
            return Ok(());
        }

        self.message = None;

        match key {
            KeyCode::Char('q') => self.should_quit = true,

            KeyCode::Char('r') if modifiers.contains(KeyModifiers::CONTROL) => {
                self.refresh_data()?;
            }

            KeyCode::Esc if self.view == View::SkillDetail => self.close_skill(),

            KeyCode::Char('h') | KeyCode::Left => match self.view {
                View::SkillDetail => self.close_skill(),
                _ => self.view = self.view.prev(),
            },
            KeyCode::Char('l') | KeyCode::Right => match self.view {
                View::Skills => self.open_skill()?,
                View::SkillDetail => {}
                _ => self.view = self.view.next(),
            },

            KeyCode::Tab | KeyCode::BackTab => match self.view {
                View::SkillDetail => self.close_skill(),
                _ => self.view = self.view.next(),
            },

            KeyCode::Char('j') | KeyCode::Down => match self.view {
                View::Skills => self.skills.next(),
                View::SkillDetail => {
                    self.subtopics.next();
                    self.load_sessions()?;
                }
                View::Dashboard => {}
            },
            KeyCode::Char('k') | KeyCode::Up => match self.view {
                View::Skills => self.skills.previous(),
                View::SkillDetail => {
                    self.subtopics.previous();
                    self.load_sessions()?;
                }
                View::Dashboard => {}
            },

            KeyCode::Char('g') => match self.view {
                View::Skills => self.skills.first(),
                View::SkillDetail => {
                    self.subtopics.first();
                    self.load_sessions()?;
                }
                View::Dashboard => {}
            },
            KeyCode::Char('G') => match self.view {
                View::Skills => self.skills.last(),
                View::SkillDetail => {
                    self.subtopics.last();
                    self.load_sessions()?;
                }
                View::Dashboard => {}
            },

            KeyCode::Enter if self.view == View::Skills => self.open_skill()?,

            KeyCode::Char('s') if self.view == View::SkillDetail => {
                self.change_status(Status::InProgress)
            }
            KeyCode::Char('c') if self.view == View::SkillDetail => {
                self.change_status(Status::Completed)
            }
            KeyCode::Char('r') if self.view == View::SkillDetail => {
                self.change_status(Status::ToLearn)
            }
            KeyCode::Char('a') if self.view == View::SkillDetail => {
                if self.selected_subtopic_id().is_some() {
                    self.begin_input(InputMode::LogMinutes);
                }
            }
            KeyCode::Char('p') if self.view == View::SkillDetail => {
                if self.selected_subtopic_id().is_some() {
                    self.begin_input(InputMode::PlanHours);
                }
            }
            KeyCode::Char('R') if self.view == View::SkillDetail => {
                if let Some(id) = self.selected_skill.as_ref().map(|s| s.id) {
                    self.review_skill = Some(id);
                    self.review_rating = None;
                    self.begin_input(InputMode::ReviewRating);
                }
            }

            _ => {}
        }
        Ok(())
    }
}

impl Drop for App {
    fn drop(&mut self) {
        self.tracker.broadcaster().unsubscribe(self.subscription);
    }
}

pub fn run(tracker: Tracker<Database>) -> Result<(), Box<dyn std::error::Error>> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = App::new(tracker).and_then(|mut app| run_app(&mut terminal, &mut app));

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                app.handle_key(key.code, key.modifiers)?;
                app.apply_refreshes()?;
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::broadcast::RefreshBroadcaster;
    use crate::models::{ResourceType, SkillDraft, SubtopicDraft};

    fn setup_app(expected: &[f64]) -> App {
        let db = Database::open(":memory:").expect("Failed to create in-memory database");
        db.init().expect("Failed to initialize database");
        let tracker = Tracker::new(db, RefreshBroadcaster::new());
        tracker
            .create_skill(SkillDraft {
                name: "Rust for Beginners".into(),
                category: None,
                resource_type: ResourceType::Course,
                platform: None,
                target_hours: expected.iter().sum(),
                description: None,
                subtopics: expected
                    .iter()
                    .enumerate()
                    .map(|(i, h)| SubtopicDraft {
                        title: format!("Part {}", i + 1),
                        description: None,
                        expected_hours: Some(*h),
                    })
                    .collect(),
            })
            .unwrap();
        App::new(tracker).unwrap()
    }

    fn press(app: &mut App, key: KeyCode) {
        app.handle_key(key, KeyModifiers::NONE).unwrap();
        app.apply_refreshes().unwrap();
    }

    fn type_line(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
        press(app, KeyCode::Enter);
    }

    fn open_first_skill(app: &mut App) {
        app.view = View::Skills;
        press(app, KeyCode::Enter);
        assert_eq!(app.view, View::SkillDetail);
    }

    fn current_subtopic(app: &App) -> &Subtopic {
        app.subtopics.selected_item().unwrap()
    }

    mod stateful_list_tests {
        use super::*;

        #[test]
        fn next_and_previous_wrap() {
            let mut list = StatefulList::with_items(vec![1, 2, 3]);
            list.previous();
            assert_eq!(list.selected, Some(2));
            list.next();
            assert_eq!(list.selected, Some(0));
        }

        #[test]
        fn replace_clamps_selection() {
            let mut list = StatefulList::with_items(vec![1, 2, 3]);
            list.last();
            list.replace(vec![1]);
            assert_eq!(list.selected, Some(0));
            list.replace(vec![]);
            assert_eq!(list.selected, None);
            list.replace(vec![4, 5]);
            assert_eq!(list.selected, Some(0));
        }

        #[test]
        fn empty_list_has_no_selection() {
            let mut list: StatefulList<i32> = StatefulList::with_items(vec![]);
            list.next();
            assert!(list.selected_item().is_none());
        }
    }

    mod navigation_tests {
        use super::*;

        #[test]
        fn views_cycle() {
            let mut app = setup_app(&[1.0]);
            assert_eq!(app.view, View::Dashboard);
            press(&mut app, KeyCode::Char('l'));
            assert_eq!(app.view, View::Skills);
            press(&mut app, KeyCode::Tab);
            assert_eq!(app.view, View::Dashboard);
        }

        #[test]
        fn open_and_close_detail() {
            let mut app = setup_app(&[1.0, 2.0]);
            open_first_skill(&mut app);
            assert_eq!(app.subtopics.items.len(), 2);

            press(&mut app, KeyCode::Char('j'));
            assert_eq!(current_subtopic(&app).title, "Part 2");

            press(&mut app, KeyCode::Esc);
            assert_eq!(app.view, View::Skills);
            assert!(app.selected_skill.is_none());
        }

        #[test]
        fn quit() {
            let mut app = setup_app(&[]);
            press(&mut app, KeyCode::Char('q'));
            assert!(app.should_quit);
        }
    }

    mod action_tests {
        use super::*;

        #[test]
        fn complete_without_time_shows_error() {
            let mut app = setup_app(&[1.0]);
            open_first_skill(&mut app);

            press(&mut app, KeyCode::Char('c'));

            let msg = app.message.clone().unwrap();
            assert!(msg.is_error);
            assert_eq!(msg.text, "Log time for this subtopic before marking it complete");
            assert_eq!(current_subtopic(&app).status, Status::ToLearn);
        }

        #[test]
        fn logging_refreshes_detail_and_dashboard() {
            let mut app = setup_app(&[2.0]);
            open_first_skill(&mut app);

            press(&mut app, KeyCode::Char('a'));
            assert_eq!(app.input_mode, InputMode::LogMinutes);
            type_line(&mut app, "90");

            assert_eq!(app.input_mode, InputMode::Normal);
            assert_eq!(current_subtopic(&app).hours_spent, 1.5);
            assert_eq!(app.sessions.len(), 1);
            assert_eq!(app.dashboard.stats.total_learning_hours, 1.5);
            assert_eq!(app.dashboard.recent_activities.len(), 1);
        }

        #[test]
        fn bad_minutes_are_reported() {
            let mut app = setup_app(&[2.0]);
            open_first_skill(&mut app);

            press(&mut app, KeyCode::Char('a'));
            type_line(&mut app, "-5");

            assert!(app.message.as_ref().unwrap().is_error);
            assert!(app.sessions.is_empty());
        }

        #[test]
        fn start_and_reset() {
            let mut app = setup_app(&[1.0]);
            open_first_skill(&mut app);

            press(&mut app, KeyCode::Char('s'));
            assert_eq!(current_subtopic(&app).status, Status::InProgress);
            assert_eq!(app.skills.items[0].status, Status::InProgress);

            press(&mut app, KeyCode::Char('r'));
            assert_eq!(current_subtopic(&app).status, Status::ToLearn);
        }

        #[test]
        fn replanning_unblocks_completion() {
            let mut app = setup_app(&[0.0]);
            open_first_skill(&mut app);
            press(&mut app, KeyCode::Char('a'));
            type_line(&mut app, "30");

            press(&mut app, KeyCode::Char('c'));
            assert!(app.message.as_ref().unwrap().is_error);

            press(&mut app, KeyCode::Char('p'));
            type_line(&mut app, "1");
            assert_eq!(current_subtopic(&app).expected_hours, 1.0);

            press(&mut app, KeyCode::Char('c'));
            assert_eq!(current_subtopic(&app).status, Status::Completed);
        }
    }

    mod review_tests {
        use super::*;

        fn complete_only_subtopic(app: &mut App) {
            open_first_skill(app);
            press(app, KeyCode::Char('a'));
            type_line(app, "45");
            press(app, KeyCode::Char('c'));
        }

        #[test]
        fn completion_opens_review_prompt() {
            let mut app = setup_app(&[1.0]);
            complete_only_subtopic(&mut app);

            assert_eq!(app.input_mode, InputMode::ReviewRating);
            let skill_id = app.selected_skill.as_ref().unwrap().id;
            assert_eq!(app.review_skill, Some(skill_id));

            type_line(&mut app, "4");
            assert_eq!(app.input_mode, InputMode::ReviewNotes);
            type_line(&mut app, "clear and practical");

            let skill = app.selected_skill.as_ref().unwrap();
            assert_eq!(skill.rating, Some(4));
            assert_eq!(skill.completion_notes.as_deref(), Some("clear and practical"));
            assert_eq!(app.dashboard.stats.completed_skills, 1);
        }

        #[test]
        fn skipping_review_keeps_skill_completed() {
            let mut app = setup_app(&[1.0]);
            complete_only_subtopic(&mut app);

            press(&mut app, KeyCode::Esc);

            assert_eq!(app.input_mode, InputMode::Normal);
            let skill = app.selected_skill.as_ref().unwrap();
            assert_eq!(skill.status, Status::Completed);
            assert!(skill.rating.is_none());
        }

        #[test]
        fn invalid_rating_stays_in_prompt() {
            let mut app = setup_app(&[1.0]);
            complete_only_subtopic(&mut app);

            type_line(&mut app, "9");

            assert_eq!(app.input_mode, InputMode::ReviewRating);
            assert!(app.message.as_ref().unwrap().is_error);
        }

        #[test]
        fn manual_review_from_detail() {
            let mut app = setup_app(&[1.0]);
            open_first_skill(&mut app);

            press(&mut app, KeyCode::Char('R'));
            type_line(&mut app, "");
            type_line(&mut app, "still going");

            let skill = app.selected_skill.as_ref().unwrap();
            assert!(skill.rating.is_none());
            assert_eq!(skill.completion_notes.as_deref(), Some("still going"));
        }
    }

    mod subscription_tests {
        use super::*;

        #[test]
        fn drop_unsubscribes() {
            let app = setup_app(&[]);
            let bus = Rc::clone(app.tracker.broadcaster());
            assert_eq!(bus.subscriber_count(), 1);
            drop(app);
            assert_eq!(bus.subscriber_count(), 0);
        }

        #[test]
        fn external_mutation_refreshes_list() {
            let mut app = setup_app(&[]);
            app.tracker
                .create_skill(SkillDraft {
                    name: "Go".into(),
                    category: None,
                    resource_type: ResourceType::Book,
                    platform: None,
                    target_hours: 0.0,
                    description: None,
                    subtopics: vec![],
                })
                .unwrap();
            assert_eq!(app.skills.items.len(), 1);

            app.apply_refreshes().unwrap();

            assert_eq!(app.skills.items.len(), 2);
            assert_eq!(app.dashboard.stats.total_skills, 2);
        }
    }
}
