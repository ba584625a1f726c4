//! TaskListController - 追加・トグル・削除と永続化

use std::rc::Rc;
use tracing::{info, warn};

use crate::config::TaskListConfig;
use crate::dialog::DialogService;
use crate::domain::{DialogError, TaskList};
use crate::ports::{DialogHost, Timer};
use crate::storage::StorageFacade;

/// Result of a destructive operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// Nothing was checked; the user was told so.
    NothingSelected,
    /// The user did not confirm.
    Declined,
    Deleted(usize),
}

/// Owns the task list and persists it after every mutation.
///
/// Mutating operations take `&mut self`, so a second delete cannot start
/// while the first one is waiting on a dialog.
pub struct TaskListController<H, T> {
    storage: StorageFacade,
    dialogs: Rc<DialogService<H, T>>,
    config: TaskListConfig,
    tasks: TaskList,
}

impl<H: DialogHost, T: Timer> TaskListController<H, T> {
    pub fn new(
        storage: StorageFacade,
        dialogs: Rc<DialogService<H, T>>,
        config: TaskListConfig,
    ) -> Self {
        Self {
            storage,
            dialogs,
            config,
            tasks: TaskList::new(),
        }
    }

    pub fn tasks(&self) -> &TaskList {
        &self.tasks
    }

    pub fn storage(&self) -> &StorageFacade {
        &self.storage
    }

    /// Replace the in-memory list with the persisted one.
    ///
    /// Absent or corrupt data loads as an empty list.
    pub fn load(&mut self) -> usize {
        self.tasks = self
            .storage
            .get::<TaskList>(&self.config.storage.tasks_key)
            .unwrap_or_default();
        info!(count = self.tasks.len(), method = %self.storage.method(), "tasks loaded");
        self.tasks.len()
    }

    /// Persist the whole list.
    pub fn save(&self) -> bool {
        let saved = self.storage.set(&self.config.storage.tasks_key, &self.tasks);
        if !saved {
            warn!(method = %self.storage.method(), "tasks were not persisted");
        }
        saved
    }

    /// Add a task from raw input. Blank input is ignored.
    pub fn add_task(&mut self, text: &str) -> bool {
        if !self.tasks.add(text) {
            return false;
        }
        self.save();
        true
    }

    pub fn toggle(&mut self, index: usize) -> Option<bool> {
        let checked = self.tasks.toggle(index)?;
        self.save();
        Some(checked)
    }

    pub fn edit(&mut self, index: usize, text: &str) -> bool {
        if !self.tasks.edit(index, text) {
            return false;
        }
        self.save();
        true
    }

    /// Delete checked tasks after confirmation.
    pub async fn delete_checked(&mut self) -> Result<DeleteOutcome, DialogError> {
        let count = self.tasks.checked_count();
        if count == 0 {
            self.dialogs.alert("No tasks are checked!", None).await?;
            return Ok(DeleteOutcome::NothingSelected);
        }

        let confirmed = self
            .dialogs
            .confirm(
                &format!("Do you really want to delete {count} checked task(s)?"),
                Some("Delete checked tasks"),
            )
            .await?;
        if !confirmed {
            return Ok(DeleteOutcome::Declined);
        }

        let removed = self.tasks.remove_checked();
        self.save();
        info!(removed, "checked tasks deleted");
        self.dialogs
            .alert(&format!("{removed} task(s) deleted."), Some("Done"))
            .await?;
        Ok(DeleteOutcome::Deleted(removed))
    }

    /// Delete every task once the user types the confirmation phrase.
    pub async fn delete_all(&mut self) -> Result<DeleteOutcome, DialogError> {
        let phrase = self.config.tasks.delete_all_phrase.clone();
        let typed = self
            .dialogs
            .prompt(
                &format!("Type '{phrase}' to delete all tasks:"),
                Some("Delete all tasks"),
                &phrase,
            )
            .await?;
        if typed.as_deref() != Some(phrase.as_str()) {
            return Ok(DeleteOutcome::Declined);
        }

        let removed = self.tasks.len();
        self.tasks.clear();
        self.save();
        info!(removed, "all tasks deleted");
        self.dialogs.alert("All tasks were deleted!", Some("Done")).await?;
        Ok(DeleteOutcome::Deleted(removed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DialogAction, DialogEvent, Key, TaskRecord};
    use crate::impls::{ImmediateTimer, MemoryBrowser, RecordingDialogHost, ScriptedUser};
    use crate::ports::SystemClock;

    type Controller = TaskListController<Rc<RecordingDialogHost>, ImmediateTimer>;
    type Dialogs = DialogService<Rc<RecordingDialogHost>, ImmediateTimer>;

    fn controller(browser: &MemoryBrowser) -> (Controller, Rc<Dialogs>) {
        let config = TaskListConfig::default();
        let storage = browser.selector(SystemClock, &config.storage).select();
        let dialogs = Rc::new(DialogService::new(
            Rc::new(RecordingDialogHost::new()),
            ImmediateTimer,
            config.dialog.clone(),
        ));
        (
            TaskListController::new(storage, dialogs.clone(), config),
            dialogs,
        )
    }

    fn click(action: DialogAction) -> DialogEvent {
        DialogEvent::ActionClicked(action)
    }

    #[tokio::test]
    async fn nothing_checked_shows_notice_and_keeps_list() {
        let browser = MemoryBrowser::new();
        let (mut c, dialogs) = controller(&browser);
        c.add_task("a");
        c.add_task("b");
        let before = c.tasks().clone();

        let user = ScriptedUser::new().then(click(DialogAction::Ok));
        let (outcome, views) = tokio::join!(c.delete_checked(), user.run(&dialogs));

        assert_eq!(outcome, Ok(DeleteOutcome::NothingSelected));
        assert_eq!(c.tasks(), &before);
        assert_eq!(views.len(), 1);
        assert_eq!(views[0].title, "Notice");
    }

    #[tokio::test]
    async fn confirmed_delete_removes_checked_and_persists() {
        let browser = MemoryBrowser::new();
        let (mut c, dialogs) = controller(&browser);
        c.add_task("a");
        c.add_task("b");
        c.add_task("c");
        c.toggle(0);
        c.toggle(2);

        let user = ScriptedUser::new()
            .then(click(DialogAction::Confirm))
            .then(click(DialogAction::Ok));
        let (outcome, views) = tokio::join!(c.delete_checked(), user.run(&dialogs));

        assert_eq!(outcome, Ok(DeleteOutcome::Deleted(2)));
        assert!(views[0].message.contains("2 checked task(s)"));
        assert_eq!(views[1].message, "2 task(s) deleted.");

        let (mut reloaded, _) = controller(&browser);
        reloaded.load();
        assert_eq!(reloaded.tasks(), &TaskList::from(vec![TaskRecord::new("b")]));
    }

    #[tokio::test]
    async fn declined_delete_keeps_everything() {
        let browser = MemoryBrowser::new();
        let (mut c, dialogs) = controller(&browser);
        c.add_task("a");
        c.toggle(0);

        let user = ScriptedUser::new().then(DialogEvent::KeyPressed(Key::Escape));
        let (outcome, _) = tokio::join!(c.delete_checked(), user.run(&dialogs));

        assert_eq!(outcome, Ok(DeleteOutcome::Declined));
        assert_eq!(c.tasks().len(), 1);
    }

    #[tokio::test]
    async fn delete_all_requires_exact_phrase() {
        let browser = MemoryBrowser::new();
        let (mut c, dialogs) = controller(&browser);
        c.add_task("a");
        c.add_task("b");

        let user = ScriptedUser::new().then_type("delete all", click(DialogAction::Confirm));
        let (outcome, _) = tokio::join!(c.delete_all(), user.run(&dialogs));
        assert_eq!(outcome, Ok(DeleteOutcome::Declined));
        assert_eq!(c.tasks().len(), 2);

        let user = ScriptedUser::new()
            .then_type("DELETE ALL", DialogEvent::KeyPressed(Key::Enter))
            .then(click(DialogAction::Ok));
        let (outcome, _) = tokio::join!(c.delete_all(), user.run(&dialogs));
        assert_eq!(outcome, Ok(DeleteOutcome::Deleted(2)));
        assert!(c.tasks().is_empty());

        let (mut reloaded, _) = controller(&browser);
        assert_eq!(reloaded.load(), 0);
    }

    #[tokio::test]
    async fn cancelled_delete_all_prompt_keeps_list() {
        let browser = MemoryBrowser::new();
        let (mut c, dialogs) = controller(&browser);
        c.add_task("a");

        let user = ScriptedUser::new().then_type("DELETE ALL", DialogEvent::OverlayClicked);
        let (outcome, _) = tokio::join!(c.delete_all(), user.run(&dialogs));
        assert_eq!(outcome, Ok(DeleteOutcome::Declined));
        assert_eq!(c.tasks().len(), 1);
    }

    #[test]
    fn blank_add_does_not_persist() {
        let browser = MemoryBrowser::new();
        let (mut c, _) = controller(&browser);
        assert!(!c.add_task("   "));
        assert!(browser.local.peek("todoTasks").is_none());
    }

    #[test]
    fn corrupt_storage_loads_empty() {
        let browser = MemoryBrowser::new();
        crate::ports::KeyValueArea::set_item(&browser.local, "todoTasks", "not json").unwrap();
        let (mut c, _) = controller(&browser);
        assert_eq!(c.load(), 0);
    }
}
