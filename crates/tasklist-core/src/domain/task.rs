//! Task model: the records persisted under the tasks key.
//!
//! Identity is positional. There is no task id: the order of the sequence is
//! the order of the rendered list, and every save writes the whole list.

use serde::{Deserialize, Serialize};

/// One task in the list.
///
/// Serialized as `{"text": "...", "checked": false}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub text: String,
    pub checked: bool,
}

impl TaskRecord {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            checked: false,
        }
    }

    pub fn checked(mut self, checked: bool) -> Self {
        self.checked = checked;
        self
    }
}

/// Ordered task collection.
///
/// `#[serde(transparent)]` なので JSON 上は素の配列になります。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskList {
    tasks: Vec<TaskRecord>,
}

impl TaskList {
    pub fn new() -> Self {
        Self { tasks: Vec::new() }
    }

    /// Append a task.
    ///
    /// Input that is blank after trimming is ignored and `false` is returned.
    /// Otherwise the raw text is stored as typed.
    pub fn add(&mut self, text: &str) -> bool {
        if text.trim().is_empty() {
            return false;
        }
        self.tasks.push(TaskRecord::new(text));
        true
    }

    /// Flip the checked state. Returns the new state, or `None` when out of range.
    pub fn toggle(&mut self, index: usize) -> Option<bool> {
        let task = self.tasks.get_mut(index)?;
        task.checked = !task.checked;
        Some(task.checked)
    }

    pub fn set_checked(&mut self, index: usize, checked: bool) -> bool {
        match self.tasks.get_mut(index) {
            Some(task) => {
                task.checked = checked;
                true
            }
            None => false,
        }
    }

    pub fn edit(&mut self, index: usize, text: impl Into<String>) -> bool {
        match self.tasks.get_mut(index) {
            Some(task) => {
                task.text = text.into();
                true
            }
            None => false,
        }
    }

    pub fn checked_count(&self) -> usize {
        self.tasks.iter().filter(|t| t.checked).count()
    }

    /// Remove every checked task, keeping the order of the rest.
    pub fn remove_checked(&mut self) -> usize {
        let before = self.tasks.len();
        self.tasks.retain(|t| !t.checked);
        before - self.tasks.len()
    }

    pub fn clear(&mut self) {
        self.tasks.clear();
    }

    pub fn get(&self, index: usize) -> Option<&TaskRecord> {
        self.tasks.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TaskRecord> {
        self.tasks.iter()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

impl From<Vec<TaskRecord>> for TaskList {
    fn from(tasks: Vec<TaskRecord>) -> Self {
        Self { tasks }
    }
}

impl FromIterator<TaskRecord> for TaskList {
    fn from_iter<I: IntoIterator<Item = TaskRecord>>(iter: I) -> Self {
        Self {
            tasks: iter.into_iter().collect(),
        }
    }
}
