use clap::Parser;
use config::{PathManager, Settings, load_env_file};
use conversation::{ConversationPolicy, FileKeyValueStore};
use limera_core::{ActivityLogger, HostDocument, TutorSession};
use llm::CompletionConfig;
use llm::providers::openai::OpenAIProvider;
use rhyme::RhymeClient;
use std::io::{self, BufRead, Write};
use std::sync::Arc;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(author, version, about = "Socratic limerick tutor", long_about = None)]
struct Args {
    /// Document scope whose conversation history this session uses
    #[arg(long, default_value = "default")]
    document: String,

    /// Custom base URL for the completion provider (e.g., for a proxy)
    #[arg(long, env = "LIMERA_COMPLETIONS_URL")]
    completions_url: Option<String>,

    /// Custom base URL for the rhyme provider
    #[arg(long, env = "LIMERA_RHYME_URL")]
    rhyme_url: Option<String>,

    #[arg(long, short)]
    tracing: bool,
}

/// Terminal stand-in for the document host: replies "insert" as printed
/// verse, alerts go to stderr.
struct TerminalHost;

impl HostDocument for TerminalHost {
    fn show_panel(&self, title: &str) {
        println!("── {} ──", title);
    }

    fn append_text(&self, text: &str) {
        println!("{}", text);
    }

    fn alert(&self, message: &str) {
        eprintln!("{}", message);
    }
}

fn setup_tracing(enable: bool) {
    if enable {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::TRACE)
            .finish();
        tracing::subscriber::set_global_default(subscriber)
            .expect("Setting default subscriber failed");
    } else {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::ERROR)
            .with_writer(|| std::io::sink())
            .finish();
        tracing::subscriber::set_global_default(subscriber)
            .expect("Setting default subscriber failed");
    }
}

enum Command {
    Quit,
    Help,
    Clear,
    History,
    Rhyme(String),
}

impl Command {
    fn parse(input: &str) -> Result<Self, String> {
        let parts: Vec<&str> = input[1..].split_whitespace().collect();
        if parts.is_empty() {
            return Err("Empty command".to_string());
        }

        match parts[0] {
            "quit" | "exit" => Ok(Command::Quit),
            "help" => Ok(Command::Help),
            "clear" => Ok(Command::Clear),
            "history" => Ok(Command::History),
            "rhyme" => {
                if parts.len() < 2 {
                    return Err("Usage: /rhyme <word>".to_string());
                }
                Ok(Command::Rhyme(parts[1].to_string()))
            }
            _ => Err(format!(
                "Unknown command: /{}. Type /help for available commands.",
                parts[0]
            )),
        }
    }
}

fn print_help() {
    println!("Available commands:");
    println!("  /quit, /exit     - Exit the tutor");
    println!("  /clear           - Clear this document's chat history");
    println!("  /history         - Show the conversation so far");
    println!("  /rhyme <word>    - Suggest rhymes for a word");
    println!("  /help            - Show this help message");
    println!("  Ctrl+D           - Exit the tutor");
}

#[tokio::main]
async fn main() {
    load_env_file();
    let args = Args::parse();

    setup_tracing(args.tracing);

    if let Err(e) = PathManager::ensure_dirs_exist() {
        eprintln!("Warning: could not create data directories: {}", e);
    }

    let mut settings = Settings::load();
    if let Some(url) = args.completions_url {
        settings.completions_url = url;
    }
    if let Some(url) = args.rhyme_url {
        settings.rhyme_url = url;
    }

    // Configuration problems are fatal before any provider call.
    if let Err(e) = settings.validate() {
        eprintln!("Configuration error: {}", e);
        std::process::exit(1);
    }
    let api_key = settings.api_key.clone().unwrap_or_default();

    let provider = OpenAIProvider::new(&settings.completions_url, &api_key);
    let model = provider.create_chat_model(CompletionConfig {
        model: settings.model.clone(),
        temperature: settings.temperature,
        max_output_tokens: settings.max_output_tokens,
    });

    let store = FileKeyValueStore::new(
        PathManager::histories_dir().unwrap_or_else(|| "histories".into()),
    );
    let session = TutorSession::new(
        &args.document,
        store,
        ConversationPolicy::new(&settings.system_prompt, settings.max_history_turns),
        Arc::new(model),
        RhymeClient::new(&settings.rhyme_url),
        ActivityLogger::to_default_log(),
    );

    let host = TerminalHost;
    host.show_panel("Limerick Tutor");
    println!("Type /help for commands, Ctrl+D or /quit to exit.");
    println!();

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("> ");
        io::stdout().flush().expect("stdout unavailable");

        let line = match lines.next() {
            Some(Ok(line)) => line,
            Some(Err(e)) => {
                eprintln!("Error reading input: {}", e);
                break;
            }
            None => {
                println!();
                println!("Goodbye!");
                break;
            }
        };

        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        if input.starts_with('/') {
            match Command::parse(input) {
                Ok(Command::Quit) => {
                    println!("Goodbye!");
                    break;
                }
                Ok(Command::Help) => {
                    print_help();
                }
                Ok(Command::Clear) => {
                    if let Err(e) = session.clear_with_notice(&host).await {
                        eprintln!("Error: {}", e);
                    }
                }
                Ok(Command::History) => match session.transcript().await {
                    Ok(turns) if turns.is_empty() => println!("(no conversation yet)"),
                    Ok(turns) => {
                        for turn in turns {
                            println!("{:?}: {}", turn.role, turn.content);
                        }
                    }
                    Err(e) => eprintln!("Error: {}", e),
                },
                Ok(Command::Rhyme(word)) => {
                    let rhymes = session.find_rhymes(&word).await;
                    if rhymes.is_empty() {
                        println!("(no rhymes found)");
                    } else {
                        println!("{}", rhymes.join(", "));
                    }
                }
                Err(err) => {
                    println!("{}", err);
                }
            }
            println!();
            continue;
        }

        match session.ask(input).await {
            Ok(reply) => println!("{}", reply),
            Err(e) => eprintln!("Error: {}", e),
        }
        println!();
    }
}
