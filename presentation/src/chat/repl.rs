//! REPL (Read-Eval-Print Loop) for interactive synergy chat

use crate::ConsoleFormatter;
use crate::progress::{ProgressReporter, SimpleProgress};
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::{DefaultEditor, Result as RlResult};
use std::sync::Arc;
use tandem_application::ports::conversation_store::ConversationStore;
use tandem_application::ports::progress::{NoProgress, ProgressSink};
use tandem_application::{RunSynergyError, RunSynergyInput, RunSynergyUseCase};
use tandem_domain::ConversationId;
use tokio_util::sync::CancellationToken;

/// Run one synergy loop for a message, cancelling at the next pass boundary
/// on ctrl-c. The in-flight provider call is allowed to complete; its
/// deliberation note stays in the store.
pub async fn run_once<S: ConversationStore + 'static>(
    use_case: Arc<RunSynergyUseCase<S>>,
    id: ConversationId,
    message: String,
    show_progress: bool,
    fancy_progress: bool,
) {
    let token = CancellationToken::new();
    let run_token = token.clone();

    let mut handle = tokio::spawn(async move {
        let progress: Box<dyn ProgressSink> = match (show_progress, fancy_progress) {
            (false, _) => Box::new(NoProgress),
            (true, true) => Box::new(ProgressReporter::new()),
            (true, false) => Box::new(SimpleProgress),
        };
        use_case
            .execute_with_progress(RunSynergyInput::new(id, message), progress.as_ref(), Some(run_token))
            .await
    });

    let joined = loop {
        tokio::select! {
            joined = &mut handle => break joined,
            _ = tokio::signal::ctrl_c() => {
                if !token.is_cancelled() {
                    println!(
                        "\n{}",
                        "Cancelling - the current pass will finish first.".yellow()
                    );
                    token.cancel();
                }
            }
        }
    };

    match joined {
        Ok(Ok(run)) => println!("\n{}", ConsoleFormatter::format_final(&run)),
        Ok(Err(RunSynergyError::Aborted)) => {
            println!("{}", "(run aborted; deliberation so far was kept)".yellow());
        }
        Ok(Err(e)) => eprintln!("{} {}", "Error:".red(), e),
        Err(e) => eprintln!("{} {}", "Task error:".red(), e),
    }
}

/// Interactive chat REPL over one conversation
pub struct ChatRepl<S: ConversationStore + 'static> {
    use_case: Arc<RunSynergyUseCase<S>>,
    store: Arc<S>,
    show_progress: bool,
}

impl<S: ConversationStore + 'static> ChatRepl<S> {
    pub fn new(use_case: Arc<RunSynergyUseCase<S>>, store: Arc<S>) -> Self {
        Self {
            use_case,
            store,
            show_progress: true,
        }
    }

    /// Set whether to show progress
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Run the interactive REPL on the given conversation
    pub async fn run(&self, id: ConversationId) -> RlResult<()> {
        let mut rl = DefaultEditor::new()?;

        let history_path = dirs::data_dir().map(|p| p.join("tandem").join("history.txt"));
        if let Some(ref path) = history_path {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            let _ = rl.load_history(path);
        }

        self.print_welcome(&id).await;

        loop {
            let readline = rl.readline(">>> ");

            match readline {
                Ok(line) => {
                    let line = line.trim();

                    if line.is_empty() {
                        continue;
                    }

                    if line.starts_with('/') {
                        if self.handle_command(line, &id).await {
                            break;
                        }
                        continue;
                    }

                    let _ = rl.add_history_entry(line);

                    run_once(
                        Arc::clone(&self.use_case),
                        id.clone(),
                        line.to_string(),
                        self.show_progress,
                        false,
                    )
                    .await;
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!("Bye!");
                    break;
                }
                Err(err) => {
                    eprintln!("Error: {:?}", err);
                    break;
                }
            }
        }

        if let Some(ref path) = history_path {
            let _ = rl.save_history(path);
        }

        Ok(())
    }

    async fn print_welcome(&self, id: &ConversationId) {
        println!();
        println!("╭─────────────────────────────────────────────╮");
        println!("│           Tandem - Synergy Chat             │");
        println!("╰─────────────────────────────────────────────╯");
        println!();
        if let Ok(conversation) = self.store.get(id).await {
            println!("Conversation: {} ({})", conversation.name(), id);
        }
        println!();
        println!("Commands:");
        println!("  /help        - Show this help");
        println!("  /transcript  - Show the conversation (with deliberation)");
        println!("  /quit        - Exit chat");
        println!();
        println!("Ctrl-c during a run cancels at the next pass boundary.");
        println!();
    }

    /// Handle slash commands. Returns true if the REPL should exit.
    async fn handle_command(&self, cmd: &str, id: &ConversationId) -> bool {
        match cmd {
            "/quit" | "/exit" | "/q" => {
                println!("Bye!");
                true
            }
            "/help" | "/h" | "/?" => {
                println!();
                println!("Commands:");
                println!("  /help, /h, /?    - Show this help");
                println!("  /transcript      - Show the conversation (with deliberation)");
                println!("  /quit, /exit, /q - Exit chat");
                println!();
                false
            }
            "/transcript" => {
                match self.store.get(id).await {
                    Ok(conversation) => {
                        println!();
                        println!("{}", ConsoleFormatter::format_conversation(&conversation, true));
                    }
                    Err(e) => eprintln!("Error: {e}"),
                }
                false
            }
            _ => {
                println!("Unknown command: {}", cmd);
                println!("Type /help for available commands");
                false
            }
        }
    }
}
