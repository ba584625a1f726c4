//! Dialog value types: requests, user events, and outcomes.
//!
//! A request lives for exactly one interaction. It is created by a caller,
//! rendered by the host, and dropped once the outcome is delivered.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DialogKind {
    Alert,
    Confirm,
    Prompt,
}

/// Dismissal action identifier carried by a dialog button.
///
/// The DOM form is the `data-action` attribute value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DialogAction {
    Ok,
    Confirm,
    Cancel,
    Custom(String),
}

impl DialogAction {
    pub fn as_str(&self) -> &str {
        match self {
            DialogAction::Ok => "ok",
            DialogAction::Confirm => "confirm",
            DialogAction::Cancel => "cancel",
            DialogAction::Custom(s) => s,
        }
    }

    /// Parse a `data-action` attribute value.
    pub fn from_attr(value: &str) -> Self {
        match value {
            "ok" => DialogAction::Ok,
            "confirm" => DialogAction::Confirm,
            "cancel" => DialogAction::Cancel,
            other => DialogAction::Custom(other.to_string()),
        }
    }
}

impl fmt::Display for DialogAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the caller asks to be shown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogRequest {
    pub kind: DialogKind,
    pub title: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
}

impl DialogRequest {
    pub fn alert(message: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            kind: DialogKind::Alert,
            title: title.into(),
            message: message.into(),
            placeholder: None,
        }
    }

    pub fn confirm(message: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            kind: DialogKind::Confirm,
            title: title.into(),
            message: message.into(),
            placeholder: None,
        }
    }

    pub fn prompt(
        message: impl Into<String>,
        title: impl Into<String>,
        placeholder: impl Into<String>,
    ) -> Self {
        Self {
            kind: DialogKind::Prompt,
            title: title.into(),
            message: message.into(),
            placeholder: Some(placeholder.into()),
        }
    }

    pub fn has_input(&self) -> bool {
        self.kind == DialogKind::Prompt
    }
}

/// Keys the dialog reacts to. Everything else is `Other`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    Escape,
    Enter,
    Other(String),
}

impl Key {
    /// Map a `KeyboardEvent.key` value.
    pub fn from_dom(key: &str) -> Self {
        match key {
            "Escape" | "Esc" => Key::Escape,
            "Enter" => Key::Enter,
            other => Key::Other(other.to_string()),
        }
    }
}

/// User input routed to the active dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogEvent {
    /// A button carrying an action identifier was clicked.
    ActionClicked(DialogAction),
    /// The overlay outside the dialog body was clicked.
    OverlayClicked,
    KeyPressed(Key),
}

/// How a dialog ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogOutcome {
    /// Dismissed through an action (button, outside click, Enter).
    ///
    /// `input` holds the text field value for prompts dismissed with
    /// `confirm`, and is `None` otherwise.
    Action {
        action: DialogAction,
        input: Option<String>,
    },
    /// Closed with Escape: no result.
    Closed,
}

impl DialogOutcome {
    pub fn action(&self) -> Option<&DialogAction> {
        match self {
            DialogOutcome::Action { action, .. } => Some(action),
            DialogOutcome::Closed => None,
        }
    }

    pub fn is_confirmed(&self) -> bool {
        self.action() == Some(&DialogAction::Confirm)
    }

    /// Prompt value: only an affirmative dismissal carries one.
    pub fn into_input(self) -> Option<String> {
        match self {
            DialogOutcome::Action {
                action: DialogAction::Confirm,
                input,
            } => input,
            _ => None,
        }
    }
}
