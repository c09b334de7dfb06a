// src/state/mod.rs
pub mod daily;
pub mod session;

pub use daily::DailyProtein;
pub use session::{MealAnalysisSession, SessionError, SessionState};

// Screen/tab tracking
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Upload,
    Result,
    History,
    Profile,
}

impl Screen {
    pub const ALL: [Screen; 4] = [Screen::Upload, Screen::Result, Screen::History, Screen::Profile];

    pub fn label(&self) -> &'static str {
        match self {
            Screen::Upload => "📷 Upload",
            Screen::Result => "📊 Analysis",
            Screen::History => "🕘 History",
            Screen::Profile => "👤 Profile",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Analyzing,
    Result,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub title: String,
    pub message: String,
}

impl Notification {
    pub fn new(level: NotificationLevel, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level,
            title: title.into(),
            message: message.into(),
        }
    }
}
