//! ScriptedUser - ダイアログに順番どおり答える「ユーザー」
//!
//! テストと CLI のデモで、DOM イベントの代わりに使います。

use std::collections::VecDeque;

use crate::dialog::{DialogPhase, DialogService, DialogView};
use crate::domain::DialogEvent;
use crate::ports::Timer;

use super::RecordingDialogHost;

/// One answer: optionally type into the field, then send one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Answer {
    pub typed: Option<String>,
    pub event: DialogEvent,
}

/// Answers dialogs in the order they appear.
///
/// Each answer waits for a new dialog to become visible, so the number of
/// answers must match the number of dialogs the code under test opens.
#[derive(Debug, Clone, Default)]
pub struct ScriptedUser {
    answers: VecDeque<Answer>,
}

impl ScriptedUser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn then(mut self, event: DialogEvent) -> Self {
        self.answers.push_back(Answer { typed: None, event });
        self
    }

    pub fn then_type(mut self, text: impl Into<String>, event: DialogEvent) -> Self {
        self.answers.push_back(Answer {
            typed: Some(text.into()),
            event,
        });
        self
    }

    /// Play the script. Returns the views that were answered.
    pub async fn run<H, T>(mut self, service: &DialogService<H, T>) -> Vec<DialogView>
    where
        H: std::ops::Deref<Target = RecordingDialogHost> + crate::ports::DialogHost,
        T: Timer,
    {
        let mut rx = service.subscribe();
        let mut answered = Vec::new();
        let mut last = None;

        while let Some(answer) = self.answers.pop_front() {
            let visible = rx
                .wait_for(|s| {
                    s.is_some_and(|s| s.phase == DialogPhase::Visible && Some(s.id) != last)
                })
                .await
                .map(|s| (*s).map(|snapshot| snapshot.id));
            let Ok(Some(id)) = visible else {
                break;
            };
            last = Some(id);

            let host: &RecordingDialogHost = service.host();
            if let Some(text) = &answer.typed {
                host.type_text(text);
            }
            if let Some(view) = host.views().into_iter().find(|v| v.id == id) {
                answered.push(view);
            }
            service.dispatch(answer.event);
        }
        answered
    }
}
