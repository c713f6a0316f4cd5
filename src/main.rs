use std::cell::RefCell;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::rc::Rc;

use anyhow::{Context, Result};
use clap::Parser;
use futures::executor::block_on;
use tracing::{debug, info, warn};

use desktop_kit::app::AppServices;
use desktop_kit::console::{append_command, ConsoleCommand};
use desktop_kit::error::DesktopKitError;
use desktop_kit::logging;
use desktop_kit::shortcuts::{Platform, ShortcutBinding};
use desktop_kit::store::JsonFileStore;

/// Interactive harness over the history and shortcut services
#[derive(Parser, Debug)]
#[command(name = "desktop-kit", version, about)]
struct Args {
    /// Directory holding store.json and logs/ (default: ~/.desktop-kit)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Maximum undo depth; persisted to settings when given
    #[arg(long)]
    max_stack_size: Option<usize>,
}

fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(".desktop-kit"))
        .unwrap_or_else(|| std::env::temp_dir().join("desktop-kit"))
}

fn main() -> Result<()> {
    let args = Args::parse();
    let data_dir = args.data_dir.unwrap_or_else(default_data_dir);
    let _log_guard = logging::init(&data_dir.join("logs"));

    let store = Rc::new(JsonFileStore::new(data_dir.join("store.json")));
    info!(store = %store.path().display(), "Using settings store");

    let app = block_on(AppServices::bootstrap(store));
    if let Some(max_stack_size) = args.max_stack_size {
        block_on(app.set_max_stack_size(max_stack_size));
    }

    let document: Rc<RefCell<Vec<String>>> = Rc::new(RefCell::new(Vec::new()));
    register_document_shortcuts(&app, &document);

    let platform = Platform::current();
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    prompt(&mut stdout)?;

    for line in stdin.lock().lines() {
        let line = line.context("failed to read stdin")?;
        match ConsoleCommand::parse(&line, platform) {
            Ok(Some(ConsoleCommand::Quit)) => break,
            Ok(Some(command)) => run(&app, &document, command, platform)?,
            Ok(None) => {}
            Err(e) => println!("error: {}", e),
        }
        prompt(&mut stdout)?;
    }

    info!(event_type = "app_lifecycle", action = "stopped", "Exiting");
    Ok(())
}

fn prompt(stdout: &mut io::Stdout) -> Result<()> {
    write!(stdout, "> ")?;
    stdout.flush()?;
    Ok(())
}

/// App-level bindings that sit beside the history shortcuts.
fn register_document_shortcuts(app: &AppServices, document: &Rc<RefCell<Vec<String>>>) {
    let shown = Rc::clone(document);
    match ShortcutBinding::parse("document.print", "Mod+P", move || {
        println!("document: {:?}", shown.borrow());
    }) {
        Ok(binding) => {
            let registration = app
                .shortcuts()
                .register(binding.with_description("Print document"));
            if !registration.is_clean() {
                warn!(conflicts = ?registration.conflicts, "document.print overlaps another binding");
            }
        }
        Err(e) => warn!(error = %e, "Invalid built-in shortcut"),
    }
}

fn run(
    app: &AppServices,
    document: &Rc<RefCell<Vec<String>>>,
    command: ConsoleCommand,
    platform: Platform,
) -> Result<()> {
    debug!(command = ?command, "Console command");
    match command {
        ConsoleCommand::Exec(text) => match app.execute(append_command(document, text)) {
            Ok(()) => println!("document: {:?}", document.borrow()),
            Err(e) => report(e.into()),
        },
        ConsoleCommand::Key(mut event) => {
            let handled = app.handle_key_event(&mut event);
            println!(
                "{} (document: {:?})",
                if handled { "handled" } else { "not handled" },
                document.borrow()
            );
        }
        ConsoleCommand::Bind { id, keys } => {
            match block_on(app.shortcuts().update_shortcut(&id, &keys)) {
                Ok(combo) => println!("{} -> {}", id, combo.display_for_platform(platform)),
                Err(e) => report(e.into()),
            }
        }
        ConsoleCommand::Unbind(id) => match block_on(app.shortcuts().reset_shortcut(&id)) {
            Ok(true) => println!("{} reset to default", id),
            Ok(false) => println!("{} has no override", id),
            Err(e) => report(e.into()),
        },
        ConsoleCommand::Reset => match block_on(app.shortcuts().reset_to_defaults()) {
            Ok(()) => println!("all shortcuts reset"),
            Err(e) => report(e.into()),
        },
        ConsoleCommand::Import(overrides) => {
            let count = overrides.len();
            match block_on(app.shortcuts().import_overrides(overrides)) {
                Ok(()) => println!("imported {} overrides", count),
                Err(e) => report(e.into()),
            }
        }
        ConsoleCommand::Export => {
            let json = serde_json::to_string_pretty(&app.shortcuts().export_overrides())?;
            println!("{}", json);
        }
        ConsoleCommand::Show => show(app, document, platform),
        ConsoleCommand::Quit => {}
    }
    Ok(())
}

fn show(app: &AppServices, document: &Rc<RefCell<Vec<String>>>, platform: Platform) {
    for entry in app.shortcuts().entries() {
        println!(
            "{:<16} {:<14} {}{}",
            entry.id,
            entry.display(platform),
            entry.description.as_deref().unwrap_or(""),
            if entry.overridden { " (custom)" } else { "" }
        );
    }

    let history = app.history().borrow();
    println!(
        "history: {} undoable, {} redoable, limit {}",
        history.len_past(),
        history.len_future(),
        history.max_stack_size()
    );
    if let Some(label) = history.undo_label() {
        println!("next undo: {}", label);
    }
    if let Some(label) = history.redo_label() {
        println!("next redo: {}", label);
    }
    println!("document: {:?}", document.borrow());
}

fn report(error: DesktopKitError) {
    warn!(error = %error, severity = ?error.severity(), "Command failed");
    println!("error: {}", error.user_message());
}
