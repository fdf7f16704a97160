//! User-facing feedback values.
//!
//! Failure categories are `(subject, action)` pairs, one per entity kind and
//! operation, e.g. `create card` titled "Error creating card".

use std::error::Error;
use std::fmt::{Display, Formatter};

/// What a categorized operation acted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Subject {
    Organization,
    OrganizationPassword,
    Project,
    Column,
    Card,
    Team,
    TeamMember,
}

impl Subject {
    fn singular(self) -> &'static str {
        match self {
            Self::Organization => "organization",
            Self::OrganizationPassword => "organization password",
            Self::Project => "project",
            Self::Column => "column",
            Self::Card => "card",
            Self::Team => "team",
            Self::TeamMember => "team member",
        }
    }

    fn plural(self) -> &'static str {
        match self {
            Self::Organization => "organizations",
            Self::OrganizationPassword => "organization passwords",
            Self::Project => "projects",
            Self::Column => "columns",
            Self::Card => "cards",
            Self::Team => "teams",
            Self::TeamMember => "team members",
        }
    }
}

/// What was attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Load,
    Create,
    Update,
    Delete,
    Move,
    Verify,
}

impl Action {
    fn verb(self) -> &'static str {
        match self {
            Self::Load => "load",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Move => "move",
            Self::Verify => "verify",
        }
    }

    fn gerund(self) -> &'static str {
        match self {
            Self::Load => "loading",
            Self::Create => "creating",
            Self::Update => "updating",
            Self::Delete => "deleting",
            Self::Move => "moving",
            Self::Verify => "verifying",
        }
    }

    fn past(self) -> &'static str {
        match self {
            Self::Load => "loaded",
            Self::Create => "created",
            Self::Update => "updated",
            Self::Delete => "deleted",
            Self::Move => "moved",
            Self::Verify => "verified",
        }
    }
}

/// Category attached to every persisted operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Category {
    pub subject: Subject,
    pub action: Action,
}

impl Category {
    pub const fn new(subject: Subject, action: Action) -> Self {
        Self { subject, action }
    }

    fn noun(self) -> &'static str {
        match self.action {
            Action::Load => self.subject.plural(),
            _ => self.subject.singular(),
        }
    }

    /// Failure title, e.g. "Error loading organizations".
    pub fn failure_title(self) -> String {
        format!("Error {} {}", self.action.gerund(), self.noun())
    }

    /// Success title, e.g. "Card created".
    pub fn success_title(self) -> String {
        let noun = self.subject.singular();
        let mut title = String::with_capacity(noun.len() + 10);
        let mut chars = noun.chars();
        if let Some(first) = chars.next() {
            title.extend(first.to_uppercase());
            title.push_str(chars.as_str());
        }
        title.push(' ');
        title.push_str(self.action.past());
        title
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.action.verb(), self.noun())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Failure,
}

/// One user-facing notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub category: Category,
    pub title: String,
    pub detail: String,
}

impl Notice {
    pub fn success(category: Category) -> Self {
        Self {
            level: NoticeLevel::Success,
            category,
            title: category.success_title(),
            detail: String::new(),
        }
    }

    pub fn failure(category: Category) -> Self {
        Self {
            level: NoticeLevel::Failure,
            category,
            title: category.failure_title(),
            detail: format!("There was a problem trying to {category}. Please try again."),
        }
    }

    pub fn is_failure(&self) -> bool {
        self.level == NoticeLevel::Failure
    }
}

/// A store call rejected at the sync boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistenceFailure {
    pub category: Category,
    /// Diagnostic text from the store; logged, not shown.
    pub reason: String,
}

impl PersistenceFailure {
    pub fn notice(&self) -> Notice {
        Notice::failure(self.category)
    }
}

impl Display for PersistenceFailure {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "failed to {}: {}", self.category, self.reason)
    }
}

impl Error for PersistenceFailure {}
