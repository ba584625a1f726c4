use std::path::PathBuf;
use std::rc::Rc;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

use tasklist_core::app::TaskListController;
use tasklist_core::config::TaskListConfig;
use tasklist_core::dialog::DialogService;
use tasklist_core::domain::{DialogAction, DialogEvent, TaskList};
use tasklist_core::impls::{
    MemoryArea, MemoryBrowser, RecordingDialogHost, ScriptedUser, TokioTimer,
};
use tasklist_core::ports::SystemClock;

/// Which storage mechanisms the simulated browser offers.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum Environment {
    Full,
    SessionOnly,
    CookiesOnly,
    FragmentOnly,
}

impl Environment {
    fn browser(self) -> MemoryBrowser {
        match self {
            Environment::Full => MemoryBrowser::new(),
            Environment::SessionOnly => MemoryBrowser {
                local: MemoryArea::unavailable(),
                ..MemoryBrowser::new()
            },
            Environment::CookiesOnly => MemoryBrowser::without_web_storage(),
            Environment::FragmentOnly => MemoryBrowser::fragment_only(),
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "tasklist",
    about = "Run a scripted task list session against a simulated browser"
)]
struct Cli {
    #[arg(long, value_enum, env = "TASKLIST_ENV", default_value_t = Environment::Full)]
    environment: Environment,

    /// JSON config file; missing fields keep their defaults.
    #[arg(long, env = "TASKLIST_CONFIG", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Indexes of tasks to check before deleting checked tasks.
    #[arg(long = "check", value_name = "INDEX")]
    check: Vec<usize>,

    /// Answer the delete confirmation with Cancel.
    #[arg(long)]
    decline: bool,

    /// Skip the dialog show/hide delays.
    #[arg(long)]
    fast: bool,

    /// Tasks to add (default: "Buy milk" "Walk dog").
    #[arg(value_name = "TASK")]
    tasks: Vec<String>,
}

type Page = TaskListController<Rc<RecordingDialogHost>, TokioTimer>;
type Dialogs = DialogService<Rc<RecordingDialogHost>, TokioTimer>;

/// ページを 1 回開く（backend 選択 → load）
fn open_page(browser: &MemoryBrowser, config: &TaskListConfig) -> (Page, Rc<Dialogs>) {
    let storage = browser.selector(SystemClock, &config.storage).select();
    let dialogs = Rc::new(DialogService::new(
        Rc::new(RecordingDialogHost::new()),
        TokioTimer,
        config.dialog.clone(),
    ));
    let mut page = TaskListController::new(storage, dialogs.clone(), config.clone());
    page.load();
    (page, dialogs)
}

fn print_tasks(label: &str, tasks: &TaskList) {
    println!("{label}:");
    if tasks.is_empty() {
        println!("  (empty)");
    }
    for (i, task) in tasks.iter().enumerate() {
        let mark = if task.checked { 'x' } else { ' ' };
        println!("  {i}. [{mark}] {}", task.text);
    }
}

fn load_config(cli: &Cli) -> Result<TaskListConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("read config {}", path.display()))?;
            TaskListConfig::from_json_str(&raw)
                .with_context(|| format!("parse config {}", path.display()))?
        }
        None => TaskListConfig::default(),
    };
    if cli.fast {
        config.dialog.show_delay_ms = 0;
        config.dialog.transition_ms = 0;
    }
    Ok(config)
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).with_target(false).init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    // (A) ブラウザ環境を用意（clone すると同じ状態を共有する）
    let browser = cli.environment.browser();

    // (B) 1 回目のページ: タスク追加とチェック
    let (mut page, dialogs) = open_page(&browser, &config);
    info!(method = %page.storage().method(), "page opened");

    let tasks = if cli.tasks.is_empty() {
        vec!["Buy milk".to_string(), "Walk dog".to_string()]
    } else {
        cli.tasks.clone()
    };
    for text in &tasks {
        page.add_task(text);
    }
    let check = if cli.check.is_empty() && cli.tasks.is_empty() {
        vec![0]
    } else {
        cli.check.clone()
    };
    for index in check {
        if page.toggle(index).is_none() {
            println!("no task at index {index}; skipped");
        }
    }
    print_tasks("before delete", page.tasks());

    // (C) チェック済みを削除（ダイアログにはスクリプトのユーザーが答える）
    let user = if page.tasks().checked_count() == 0 {
        ScriptedUser::new().then(DialogEvent::ActionClicked(DialogAction::Ok))
    } else if cli.decline {
        ScriptedUser::new().then(DialogEvent::ActionClicked(DialogAction::Cancel))
    } else {
        ScriptedUser::new()
            .then(DialogEvent::ActionClicked(DialogAction::Confirm))
            .then(DialogEvent::ActionClicked(DialogAction::Ok))
    };
    let (outcome, answered) = tokio::join!(page.delete_checked(), user.run(&dialogs));
    for view in &answered {
        println!("dialog [{}] {}", view.title, view.message);
    }
    println!("delete outcome: {:?}", outcome?);

    // (D) 再読み込み: backend を選び直して保存済みの一覧を読む
    let (reloaded, _) = open_page(&browser, &config);
    println!("storage method: {}", reloaded.storage().method());
    print_tasks("after reload", reloaded.tasks());

    Ok(())
}
