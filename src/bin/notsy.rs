use clap::{Parser, Subcommand};
use notsy::config::{self, EditorConfig};
use notsy::richtext::structured_document::StructuredDocument;
use notsy::richtext::structured_editor::StructuredEditor;
use notsy::script::{parse_script, run_script};
use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "notsy")]
#[command(about = "List and checklist formatting for notes", long_about = None)]
struct Args {
    /// Config file to use instead of the default location
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Replay an intent script and print the resulting note
    Replay {
        /// Script file, one command per line
        file: PathBuf,

        /// Start from this plain-text note instead of an empty one
        #[arg(short, long, value_name = "NOTE")]
        note: Option<PathBuf>,
    },
    /// Show the effective config path and values
    Config,
}

fn config_path(explicit: Option<PathBuf>) -> Option<PathBuf> {
    explicit.or_else(config::config_file_path)
}

fn cmd_replay(file: &Path, note: Option<&Path>, config: EditorConfig) -> Result<(), String> {
    let source = fs::read_to_string(file)
        .map_err(|e| format!("Failed to read script {}: {}", file.display(), e))?;
    let script = parse_script(&source).map_err(|e| format!("{}: {}", file.display(), e))?;

    let document = match note {
        Some(path) => {
            let text = fs::read_to_string(path)
                .map_err(|e| format!("Failed to read note {}: {}", path.display(), e))?;
            notsy::richtext::plain_text::document_from_plain_text(&text)
        }
        None => StructuredDocument::new(),
    };

    let mut editor = StructuredEditor::with_config(document, config);
    run_script(&mut editor, &script);
    tracing::debug!(steps = script.len(), "script replayed");

    println!("{}", editor.to_plain_text());
    let snapshot = editor.snapshot();
    eprintln!(
        "bold={} italic={} underline={} bullet={} checkbox={}",
        snapshot.bold, snapshot.italic, snapshot.underline, snapshot.bullet, snapshot.checkbox
    );
    Ok(())
}

fn cmd_config(path: Option<&Path>, config: &EditorConfig) -> Result<(), String> {
    match path {
        Some(path) => println!("# {}", path.display()),
        None => println!("# no config directory available"),
    }
    let toml = toml::to_string_pretty(config).map_err(|e| format!("Failed to render config: {}", e))?;
    print!("{}", toml);
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let path = config_path(args.config);
    let config = config::load_or_default(path.as_deref());

    let result = match args.command {
        Commands::Replay { file, note } => cmd_replay(&file, note.as_deref(), config),
        Commands::Config => cmd_config(path.as_deref(), &config),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
