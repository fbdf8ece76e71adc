//! Interactive chat dashboard.

use std::collections::HashMap;
use std::io::Write as _;
use std::path::Path;

use anyhow::{Result, anyhow, bail};
use tokio::sync::mpsc;

use crate::plugins::history::Message;
use crate::plugins::render::{REVEAL_INTERVAL, render, reveal, to_terminal};
use crate::services::dashboard::Dashboard;
use crate::services::events::SessionEvent;
use crate::services::gateway::{CHALLENGES, DispatchOutcome, JournalEntry, JournalSubmission};
use crate::services::upload::read_file;

use super::Context;
use super::prompt::Prompt;

const HELP: &str = "\
Type a message to send it to the current conversation.
  /new                 start a new conversation on the current challenge
  /topic [id|name]     list challenges, or switch (starts a new conversation)
  /list [query]        list conversations, filtered by title
  /open <id>           switch to a conversation and print it
  /show                print the current conversation
  /delete <id>         delete a conversation
  /upload <path>...    upload files (pdf, docx, txt, csv, xlsx)
  /uploads             show tracked uploads
  /remove <id>         stop tracking an upload
  /journal             enter journal entries for transaction analysis
  /quit                leave";

enum Flow {
    Continue,
    Quit,
}

pub(crate) async fn run(ctx: Context, topic: Option<&str>, animate: bool) -> Result<()> {
    let Context {
        config,
        events,
        event_rx,
        auth,
    } = ctx;
    if auth.restore().await.is_none() {
        bail!("Not logged in. Run `ifa login` first.");
    }

    let mut dash = Dashboard::new(&config, auth, events);
    match topic {
        Some(key) => dash.select_challenge(key)?,
        None => dash.start_new_chat()?,
    };
    let watcher = tokio::spawn(watch_uploads(event_rx));

    println!(
        "Challenge: {} ({}). Type /help for commands.",
        dash.selected_challenge().name,
        dash.selected_challenge().service
    );

    let mut prompt = Prompt::new();
    while let Some(line) = prompt.ask("> ").await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match handle(&mut dash, &mut prompt, line, animate).await {
            Ok(Flow::Continue) => {}
            Ok(Flow::Quit) => break,
            Err(e) => eprintln!("error: {e}"),
        }
        if !dash.auth().is_authenticated() {
            println!("Session ended. Log in again with `ifa login`.");
            break;
        }
    }

    watcher.abort();
    Ok(())
}

async fn handle(
    dash: &mut Dashboard,
    prompt: &mut Prompt,
    line: &str,
    animate: bool,
) -> Result<Flow> {
    if !line.starts_with('/') {
        let outcome = dash.send_message(line).await?;
        print_outcome(outcome, animate).await;
        return Ok(Flow::Continue);
    }

    let (command, arg) = match line.split_once(char::is_whitespace) {
        Some((command, arg)) => (command, arg.trim()),
        None => (line, ""),
    };
    match command {
        "/quit" | "/exit" => return Ok(Flow::Quit),
        "/help" => println!("{HELP}"),
        "/new" => {
            let conversation = dash.start_new_chat()?;
            println!("New conversation {} on {}.", conversation.id, conversation.topic);
        }
        "/topic" if arg.is_empty() => {
            let selected = dash.selected_challenge().id;
            for challenge in CHALLENGES.iter() {
                let marker = if challenge.id == selected { '*' } else { ' ' };
                println!(
                    "{marker} {:<22} {:<24} {}",
                    challenge.id, challenge.name, challenge.service
                );
            }
        }
        "/topic" => {
            let conversation = dash.select_challenge(arg)?;
            println!("Switched to {}. New conversation {}.", conversation.topic, conversation.id);
        }
        "/list" => {
            for summary in dash.search(arg)? {
                let marker = if summary.is_active { '*' } else { ' ' };
                println!(
                    "{marker} {}  {}  ({}, {} messages)",
                    summary.id, summary.title, summary.topic, summary.message_count
                );
            }
        }
        "/open" => {
            let conversation = dash
                .load_conversation(arg)?
                .ok_or_else(|| anyhow!("No conversation {arg}; nothing is selected now"))?;
            println!("{} ({})", conversation.title, conversation.topic);
            for message in &conversation.messages {
                print_message(message, false).await;
            }
        }
        "/show" => match dash.current()? {
            Some(conversation) => {
                println!("{} ({})", conversation.title, conversation.topic);
                for message in &conversation.messages {
                    print_message(message, false).await;
                }
            }
            None => println!("No conversation selected. Use /new or /open."),
        },
        "/delete" => match dash.delete_conversation(arg)? {
            Some(current) => println!("Deleted. Current conversation: {current}"),
            None => println!("Deleted. No conversation selected."),
        },
        "/upload" => upload(dash, arg, animate).await?,
        "/uploads" => {
            let files = dash.uploads();
            if files.is_empty() {
                println!("No uploads in progress.");
            }
            for file in files {
                println!(
                    "  {}  {} ({} bytes, {})  {}%",
                    file.id, file.name, file.size, file.mime_type, file.progress
                );
            }
        }
        "/remove" => {
            if dash.remove_file(arg) {
                println!("Stopped tracking {arg}.");
            } else {
                println!("No upload {arg}.");
            }
        }
        "/journal" => {
            let submission = read_journal(prompt).await?;
            let outcome = dash.submit_journal(submission).await?;
            print_outcome(outcome, animate).await;
        }
        other => println!("Unknown command {other}. Type /help."),
    }
    Ok(Flow::Continue)
}

async fn upload(dash: &Dashboard, arg: &str, animate: bool) -> Result<()> {
    if arg.is_empty() {
        bail!("Usage: /upload <path>...");
    }
    let mut files = Vec::new();
    for path in arg.split_whitespace() {
        match read_file(Path::new(path)).await {
            Ok(file) => files.push(file),
            Err(e) => eprintln!("  {e}"),
        }
    }
    if files.is_empty() {
        return Ok(());
    }

    let report = dash.upload_files(files).await?;
    for reason in &report.rejected {
        eprintln!("  rejected: {reason}");
    }
    for outcome in report.outcomes {
        println!("[{}]", outcome.file_name);
        match outcome.result {
            Ok(result) => print_outcome(result, animate).await,
            Err(e) => eprintln!("  error: {e}"),
        }
    }
    Ok(())
}

/// Read `account, debit, credit` lines until a blank one, then a description.
async fn read_journal(prompt: &mut Prompt) -> Result<JournalSubmission> {
    println!("Enter entries as `account, debit, credit`; blank line to finish.");
    let mut entries = Vec::new();
    loop {
        let line = prompt.require("  entry> ").await?;
        let line = line.trim();
        if line.is_empty() {
            break;
        }
        match parse_entry(line) {
            Some(entry) => entries.push(entry),
            None => eprintln!("  expected `account, debit, credit`"),
        }
    }
    let description = prompt.require("  description> ").await?;
    Ok(JournalSubmission {
        entries,
        description,
    })
}

fn parse_entry(line: &str) -> Option<JournalEntry> {
    let mut parts = line.rsplitn(3, ',').map(str::trim);
    let credit = parts.next()?.parse().ok()?;
    let debit = parts.next()?.parse().ok()?;
    let account = parts.next()?.to_string();
    Some(JournalEntry {
        account,
        debit,
        credit,
    })
}

async fn print_outcome(outcome: DispatchOutcome, animate: bool) {
    match outcome {
        DispatchOutcome::Replied(reply) => print_message(&reply, animate).await,
        DispatchOutcome::Failed { reply, error } => {
            log::debug!("Call failed: {}", error);
            print_message(&reply, false).await;
        }
        DispatchOutcome::Discarded => println!("(reply dropped: its conversation was deleted)"),
    }
}

async fn print_message(message: &Message, animate: bool) {
    if message.is_user {
        println!("you [{}]: {}", message.timestamp, message.content);
        return;
    }

    let text = to_terminal(&render(&message.content, None));
    println!("assistant [{}]:", message.timestamp);
    let mut printed = 0;
    reveal(&text, false, animate, REVEAL_INTERVAL, |shown| {
        print!("{}", &shown[printed..]);
        let _ = std::io::stdout().flush();
        printed = shown.len();
    })
    .await;
    println!();
}

/// Print upload progress in 10% steps while a batch is running.
async fn watch_uploads(mut rx: mpsc::UnboundedReceiver<SessionEvent>) {
    let mut names: HashMap<String, (String, u8)> = HashMap::new();
    while let Some(event) = rx.recv().await {
        match event {
            SessionEvent::UploadRegistered { file_id, name } => {
                println!("  [{name}] 0%");
                names.insert(file_id, (name, 0));
            }
            SessionEvent::UploadProgress { file_id, progress } => {
                if let Some((name, shown)) = names.get_mut(&file_id) {
                    if progress >= shown.saturating_add(10) || (progress == 100 && *shown < 100) {
                        println!("  [{name}] {progress}%");
                        *shown = progress;
                    }
                }
            }
            SessionEvent::UploadRemoved { file_id } => {
                names.remove(&file_id);
            }
            SessionEvent::UploadsCleared => names.clear(),
            other => log::trace!("{}", other.name()),
        }
    }
}
