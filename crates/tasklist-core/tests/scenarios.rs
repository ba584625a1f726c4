//! End-to-end scenarios over the in-memory browser.

use std::rc::Rc;

use rstest::rstest;
use tasklist_core::app::{DeleteOutcome, TaskListController};
use tasklist_core::config::TaskListConfig;
use tasklist_core::dialog::DialogService;
use tasklist_core::domain::{DialogAction, DialogEvent, StorageMethod, TaskList, TaskRecord};
use tasklist_core::impls::{
    ImmediateTimer, MemoryArea, MemoryBrowser, RecordingDialogHost, ScriptedUser,
};
use tasklist_core::ports::SystemClock;

type Dialogs = DialogService<Rc<RecordingDialogHost>, ImmediateTimer>;
type Controller = TaskListController<Rc<RecordingDialogHost>, ImmediateTimer>;

/// One page load: fresh selection, fresh dialog service, then `load`.
fn open_page(browser: &MemoryBrowser) -> (Controller, Rc<Dialogs>) {
    let config = TaskListConfig::default();
    let storage = browser.selector(SystemClock, &config.storage).select();
    let dialogs = Rc::new(DialogService::new(
        Rc::new(RecordingDialogHost::new()),
        ImmediateTimer,
        config.dialog.clone(),
    ));
    let mut controller = TaskListController::new(storage, dialogs.clone(), config);
    controller.load();
    (controller, dialogs)
}

fn expected_milk_and_dog() -> TaskList {
    vec![
        TaskRecord::new("Buy milk").checked(true),
        TaskRecord::new("Walk dog"),
    ]
    .into()
}

#[rstest]
#[case::local_storage(MemoryBrowser::new(), StorageMethod::LocalStorage)]
#[case::session_storage(
    MemoryBrowser { local: MemoryArea::unavailable(), ..MemoryBrowser::new() },
    StorageMethod::SessionStorage
)]
#[case::cookies(MemoryBrowser::without_web_storage(), StorageMethod::Cookies)]
#[case::url_fragment(MemoryBrowser::fragment_only(), StorageMethod::UrlFragment)]
fn tasks_survive_reload(#[case] browser: MemoryBrowser, #[case] method: StorageMethod) {
    let (mut page, _) = open_page(&browser);
    assert_eq!(page.storage().method(), method);
    assert!(page.tasks().is_empty());

    page.add_task("Buy milk");
    page.add_task("Walk dog");
    page.toggle(0);
    assert!(page.save());

    let (reloaded, _) = open_page(&browser);
    assert_eq!(reloaded.tasks(), &expected_milk_and_dog());
}

#[test]
fn cookie_path_roundtrips_the_raw_array() {
    let browser = MemoryBrowser::without_web_storage();
    let config = TaskListConfig::default();
    let facade = browser.selector(SystemClock, &config.storage).select();
    assert_eq!(facade.method(), StorageMethod::Cookies);

    let value = serde_json::json!([
        {"text": "Buy milk", "checked": true},
        {"text": "Walk dog; then \"rest\"", "checked": false}
    ]);
    assert!(facade.set("todoTasks", &value));
    assert_eq!(facade.get::<serde_json::Value>("todoTasks"), Some(value));

    let assignment = &browser.cookies.assignments()[0];
    assert!(assignment.starts_with("todoTasks=%5B%7B%22"));
    assert!(assignment.ends_with(";path=/;SameSite=Lax"));
}

#[test]
fn nothing_available_still_runs_with_empty_list() {
    let browser = MemoryBrowser::fragment_only();
    let config = TaskListConfig::default();
    let facade = tasklist_core::storage::StorageSelector::new()
        .candidate(tasklist_core::impls::KeyValueBackend::local(
            browser.local.clone(),
            config.storage.probe_key.clone(),
        ))
        .select();
    assert_eq!(facade.method(), StorageMethod::None);
    assert!(!facade.set("todoTasks", &TaskList::new()));
    assert_eq!(facade.get::<TaskList>("todoTasks"), None);
}

#[tokio::test]
async fn mixed_operations_roundtrip_after_delete() {
    let browser = MemoryBrowser::new();
    let (mut page, dialogs) = open_page(&browser);

    for text in ["one", "two", "three", "four"] {
        page.add_task(text);
    }
    page.toggle(1);
    page.toggle(3);
    page.edit(0, "ONE");

    let user = ScriptedUser::new()
        .then(DialogEvent::ActionClicked(DialogAction::Confirm))
        .then(DialogEvent::ActionClicked(DialogAction::Ok));
    let (outcome, _) = tokio::join!(page.delete_checked(), user.run(&dialogs));
    assert_eq!(outcome, Ok(DeleteOutcome::Deleted(2)));

    page.toggle(1);
    let last_saved = page.tasks().clone();

    let (reloaded, _) = open_page(&browser);
    assert_eq!(reloaded.tasks(), &last_saved);
    let texts: Vec<_> = reloaded.tasks().iter().map(|t| t.text.as_str()).collect();
    assert_eq!(texts, vec!["ONE", "three"]);
}

#[test]
fn quota_exceeded_mid_session_degrades_to_cookie() {
    let browser = MemoryBrowser {
        local: MemoryArea::with_quota(64),
        ..MemoryBrowser::new()
    };
    let (mut page, _) = open_page(&browser);
    assert_eq!(page.storage().method(), StorageMethod::LocalStorage);

    page.add_task("short");
    assert!(browser.local.peek("todoTasks").is_some());

    page.add_task(&"x".repeat(100));
    assert!(!browser.cookies.assignments().is_empty());
    assert_eq!(page.storage().method(), StorageMethod::LocalStorage);
}
