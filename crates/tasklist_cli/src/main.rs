use clap::{CommandFactory, Parser};
use std::io::{self, BufRead};
use tabled::{Table, Tabled};
use tasklist_cli::cli::{Cli, Command};
use tasklist_core::config::{self, Palette};
use tasklist_core::error::AppError;
use tasklist_core::model::Task;
use tasklist_core::store::{ListView, TaskStore};

fn status_label(done: bool) -> &'static str {
    if done { "completed" } else { "active" }
}

#[derive(Tabled)]
struct TaskRow<'a> {
    #[tabled(rename = "id")]
    id: &'a str,
    #[tabled(rename = "task")]
    text: &'a str,
    #[tabled(rename = "status")]
    status: &'static str,
    #[tabled(rename = "created")]
    created_at: &'a str,
}

fn print_list_plain(view: &ListView, palette: &Palette) {
    let header = format!("Tasks ({}/{})", view.tasks.len(), view.total);
    println!("{}", palette.accentize(&header));

    if view.tasks.is_empty() {
        println!("{}", palette.mutedize("No tasks to show."));
        return;
    }

    let rows: Vec<TaskRow<'_>> = view
        .tasks
        .iter()
        .map(|task| TaskRow {
            id: &task.id,
            text: &task.text,
            status: status_label(task.done),
            created_at: &task.created_at,
        })
        .collect();
    println!("{}", Table::new(rows));
}

fn print_list_json(view: &ListView) {
    let payload = serde_json::json!({
        "tasks": view.tasks,
        "total": view.total,
    });
    println!("{payload}");
}

fn print_task_json(task: &Task) {
    let json = serde_json::json!({
        "id": task.id,
        "text": task.text,
        "done": task.done,
        "created_at": task.created_at,
    });
    println!("{json}");
}

fn normalize_parse_error(err: clap::Error) -> AppError {
    let rendered = err.to_string();
    let first_line = rendered.lines().next().unwrap_or("invalid command").trim();
    let message = first_line
        .strip_prefix("error: ")
        .unwrap_or(first_line)
        .to_string();
    AppError::invalid_input(message)
}

fn split_command_line(line: &str) -> Result<Vec<String>, AppError> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut escape = false;

    for ch in line.chars() {
        if escape {
            if ch != '"' && ch != '\\' {
                current.push('\\');
            }
            current.push(ch);
            escape = false;
            continue;
        }

        if in_quotes && ch == '\\' {
            escape = true;
            continue;
        }

        if ch == '"' {
            in_quotes = !in_quotes;
            continue;
        }

        if ch.is_whitespace() && !in_quotes {
            if !current.is_empty() {
                args.push(current.clone());
                current.clear();
            }
            continue;
        }

        current.push(ch);
    }

    if in_quotes {
        return Err(AppError::invalid_input("unterminated quote in command"));
    }

    if !current.is_empty() {
        args.push(current);
    }

    Ok(args)
}

fn print_help() {
    let mut cmd = Cli::command();
    let help = cmd.render_help();
    println!("{help}");
}

fn run_command(cli: Cli, store: &mut TaskStore, palette: &Palette) -> Result<(), AppError> {
    match cli.command {
        Command::Add { text } => {
            let text = match text {
                Some(value) if !value.trim().is_empty() => value,
                _ => return Err(AppError::invalid_input("text is required")),
            };

            let task = store.add(&text)?;
            if cli.json {
                print_task_json(&task);
            } else {
                println!("Added task: {} ({})", palette.accentize(&task.text), task.id);
            }
        }
        Command::Edit { id, text } => {
            let task = store.update_text(&id, &text)?;
            if cli.json {
                print_task_json(&task);
            } else {
                println!("Updated task: {} ({})", task.text, task.id);
            }
        }
        Command::Done { id } => {
            let task = store.set_done(&id, true)?;
            if cli.json {
                print_task_json(&task);
            } else {
                println!("Completed task: {} ({})", task.text, task.id);
            }
        }
        Command::Undo { id } => {
            let task = store.set_done(&id, false)?;
            if cli.json {
                print_task_json(&task);
            } else {
                println!("Reactivated task: {} ({})", task.text, task.id);
            }
        }
        Command::Toggle { id } => {
            let task = store.toggle_done(&id)?;
            if cli.json {
                print_task_json(&task);
            } else {
                println!(
                    "Toggled task: {} ({}) is now {}",
                    task.text,
                    task.id,
                    status_label(task.done)
                );
            }
        }
        Command::Delete { id } => {
            let task = store.remove(&id)?;
            if cli.json {
                print_task_json(&task);
            } else {
                println!("Deleted task: {} ({})", task.text, task.id);
            }
        }
        Command::List { filter, search } => {
            let view = store.list(filter.into(), &search);
            if cli.json {
                print_list_json(&view);
            } else {
                print_list_plain(&view, palette);
            }
        }
        Command::MarkAll { active } => {
            let done = !active;
            let touched = store.mark_all(done)?;
            if cli.json {
                println!("{}", serde_json::json!({ "marked": touched, "done": done }));
            } else {
                println!("Marked {} tasks {}", touched, status_label(done));
            }
        }
        Command::Purge => {
            let removed = store.purge_completed()?;
            if cli.json {
                println!("{}", serde_json::json!({ "purged": removed }));
            } else {
                println!("Purged {removed} completed tasks");
            }
        }
        Command::Reload => {
            if let Some(err) = store.reload() {
                eprintln!("WARNING: starting with an empty list: {err}");
            }
            if cli.json {
                println!("{}", serde_json::json!({ "reloaded": store.tasks().len() }));
            } else {
                println!(
                    "Reloaded {} tasks from {}",
                    store.tasks().len(),
                    store.path().display()
                );
            }
        }
        Command::Save => {
            store.persist()?;
            if cli.json {
                println!("{}", serde_json::json!({ "saved": store.tasks().len() }));
            } else {
                println!(
                    "Saved {} tasks to {}",
                    store.tasks().len(),
                    store.path().display()
                );
            }
        }
    }

    Ok(())
}

fn run_interactive(store: &mut TaskStore, palette: &Palette) -> Result<(), AppError> {
    let mut input = String::new();
    let stdin = io::stdin();
    let mut stdin_lock = stdin.lock();

    loop {
        input.clear();
        let bytes = stdin_lock
            .read_line(&mut input)
            .map_err(|err| AppError::io(err.to_string()))?;

        if bytes == 0 {
            break;
        }

        let line = input.trim();
        if line.is_empty() {
            continue;
        }

        if line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit") {
            break;
        }

        if line == "help" || line == "?" {
            print_help();
            continue;
        }

        let args = match split_command_line(line) {
            Ok(args) => args,
            Err(err) => {
                eprintln!("ERROR: {err}");
                continue;
            }
        };

        if args.is_empty() {
            continue;
        }

        let mut argv = Vec::with_capacity(args.len() + 1);
        argv.push("tasklist".to_string());
        argv.extend(args);

        let cli = match Cli::try_parse_from(argv) {
            Ok(cli) => cli,
            Err(err) => {
                eprintln!("ERROR: {}", normalize_parse_error(err));
                continue;
            }
        };

        if let Err(err) = run_command(cli, store, palette) {
            eprintln!("ERROR: {err}");
        }
    }

    Ok(())
}

fn main() {
    let mut args = std::env::args_os();
    args.next();
    let interactive = args.next().is_none();

    let cli = if interactive {
        None
    } else {
        match Cli::try_parse() {
            Ok(cli) => Some(cli),
            Err(err) => {
                if err.use_stderr() {
                    eprintln!("ERROR: {}", normalize_parse_error(err));
                    std::process::exit(1);
                }
                // --help / --version render through clap itself.
                err.exit();
            }
        }
    };

    let config_load = config::load_config_with_fallback();
    let palette = config::palette_for_theme(config_load.config.theme.as_deref());
    if let Some(err) = config_load.error {
        eprintln!("WARNING: {err}");
    }

    let path = match config::resolve_store_path(&config_load.config) {
        Ok(path) => path,
        Err(err) => {
            eprintln!("ERROR: {err}");
            std::process::exit(1);
        }
    };

    let (mut store, load_error) = TaskStore::open(path);
    if let Some(err) = load_error {
        eprintln!("WARNING: starting with an empty list: {err}");
    }

    let result = match cli {
        Some(cli) => run_command(cli, &mut store, &palette),
        None => run_interactive(&mut store, &palette),
    };

    if let Err(err) = result {
        eprintln!("ERROR: {err}");
        std::process::exit(1);
    }
}
