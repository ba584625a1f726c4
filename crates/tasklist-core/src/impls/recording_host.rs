//! RecordingDialogHost - DOM を使わない DialogHost（テスト・CLI 用）

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::dialog::DialogView;
use crate::domain::DialogId;
use crate::ports::DialogHost;

/// One host call, in the order the service made it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostCall {
    Mount(DialogId),
    Show(DialogId),
    Hide(DialogId),
    Focus(DialogId),
    Unmount(DialogId),
}

#[derive(Debug)]
struct Mounted {
    input: Option<String>,
}

#[derive(Debug, Default)]
struct HostState {
    calls: Vec<HostCall>,
    views: Vec<DialogView>,
    mounted: HashMap<DialogId, Mounted>,
    /// Most recently mounted dialog with a text field.
    typing_target: Option<DialogId>,
}

/// Keeps overlays in memory and records every call.
///
/// `type_text` plays the user typing into the current prompt.
#[derive(Debug, Default)]
pub struct RecordingDialogHost {
    state: Mutex<HostState>,
}

impl RecordingDialogHost {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HostState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn calls(&self) -> Vec<HostCall> {
        self.lock().calls.clone()
    }

    /// Every view ever mounted, oldest first.
    pub fn views(&self) -> Vec<DialogView> {
        self.lock().views.clone()
    }

    pub fn mounted_count(&self) -> usize {
        self.lock().mounted.len()
    }

    /// Replace the text of the current prompt's input field.
    pub fn type_text(&self, text: &str) -> bool {
        let mut state = self.lock();
        let Some(target) = state.typing_target else {
            return false;
        };
        match state.mounted.get_mut(&target).and_then(|m| m.input.as_mut()) {
            Some(input) => {
                *input = text.to_string();
                true
            }
            None => false,
        }
    }
}

impl DialogHost for RecordingDialogHost {
    fn mount(&self, id: DialogId, view: &DialogView) {
        let mut state = self.lock();
        state.calls.push(HostCall::Mount(id));
        state.views.push(view.clone());
        let input = view.input_placeholder.as_ref().map(|_| String::new());
        if input.is_some() {
            state.typing_target = Some(id);
        }
        state.mounted.insert(id, Mounted { input });
    }

    fn set_visible(&self, id: DialogId, visible: bool) {
        let call = if visible {
            HostCall::Show(id)
        } else {
            HostCall::Hide(id)
        };
        self.lock().calls.push(call);
    }

    fn focus_input(&self, id: DialogId) {
        self.lock().calls.push(HostCall::Focus(id));
    }

    fn input_value(&self, id: DialogId) -> Option<String> {
        self.lock().mounted.get(&id).and_then(|m| m.input.clone())
    }

    fn unmount(&self, id: DialogId) {
        let mut state = self.lock();
        state.calls.push(HostCall::Unmount(id));
        state.mounted.remove(&id);
        if state.typing_target == Some(id) {
            state.typing_target = None;
        }
    }
}
