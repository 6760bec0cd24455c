use std::io::BufRead;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;
use farmrag::audio::Transcriber;
use farmrag::audio::WhisperClient;
use farmrag::chat::ChatService;
use farmrag::config::AppConfig;
use farmrag::models::Transcript;
use farmrag::rag::ingest;
use farmrag::rag::KnowledgeBaseClient;
use farmrag::vision;
use farmrag::vision::Classifier;
use farmrag::vision::HttpClassifier;
use farmrag::Result;
use tracing::info;

/// Session key for the single interactive CLI session.
const CLI_SESSION: &str = "cli";

#[derive(Parser)]
#[command(name = "farmrag")]
#[command(about = "Farming assistant CLI for corpus-grounded Q&A and plant image analysis")]
#[command(version)]
struct Cli {
    /// Enable verbose debug logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start an interactive chat session (/clear resets, /quit exits)
    Chat,
    /// Ask a single question and print the answer
    Ask {
        /// The question to answer from the indexed corpus
        question: String,
    },
    /// Classify a plant image and ask the assistant about the result
    Classify {
        /// Path to the image file
        image: PathBuf,
        /// Use the fruit/vegetable classifier instead of the disease model
        #[arg(long)]
        produce: bool,
    },
    /// Transcribe an audio file to text
    Transcribe {
        /// Path to the audio file
        audio: PathBuf,
    },
    /// Index pre-chunked .txt documents into the knowledge base
    Ingest {
        /// A .txt file or a directory of .txt files, one passage per paragraph
        path: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load()?;
    if cli.verbose {
        config.logging.level = "debug".to_string();
    }
    farmrag::logging::init_logging_with_config(Some(&config))?;

    match cli.command {
        Commands::Chat => run_chat(&config).await,
        Commands::Ask { question } => run_ask(&config, &question).await,
        Commands::Classify { image, produce } => run_classify(&config, &image, produce).await,
        Commands::Transcribe { audio } => run_transcribe(&config, &audio).await,
        Commands::Ingest { path } => run_ingest(&config, &path).await,
    }
}

async fn run_chat(config: &AppConfig) -> Result<()> {
    let service = ChatService::from_config(config)?;
    let mut transcript: Transcript = Vec::new();

    println!("farmrag chat - ask about crops, soil, and plant diseases");
    println!("commands: /clear resets the conversation, /quit exits");

    let stdin = std::io::stdin();
    loop {
        print!("you> ");
        std::io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let message = line.trim();

        match message {
            "" => continue,
            "/quit" => break,
            "/clear" => {
                transcript = service.clear(CLI_SESSION);
                println!("(conversation cleared)");
            }
            _ => {
                transcript = service.respond(CLI_SESSION, message, transcript).await;
                print_last_reply(&transcript);
            }
        }
    }

    Ok(())
}

async fn run_ask(config: &AppConfig, question: &str) -> Result<()> {
    let service = ChatService::from_config(config)?;
    let transcript = service.respond(CLI_SESSION, question, Vec::new()).await;
    print_last_reply(&transcript);
    Ok(())
}

async fn run_classify(config: &AppConfig, image: &Path, produce: bool) -> Result<()> {
    let endpoint = if produce {
        &config.classifier.produce_endpoint
    } else {
        &config.classifier.disease_endpoint
    };
    let classifier = HttpClassifier::new(endpoint.clone())?;

    let prediction = classifier.classify(image).await?;
    let formatted = prediction.format();
    println!("{formatted}");

    let question = if produce {
        vision::produce_question(&prediction.label)
    } else {
        println!("\nTreatment tips:\n{}", vision::treatment_tips(&prediction.label));
        match vision::disease_question(&formatted) {
            Ok(question) => question,
            Err(e) => {
                // Never feed malformed classifier output into the chat
                println!("\nassistant> Could not read the classifier output ({e}). Please try another image.");
                return Ok(());
            }
        }
    };

    info!("Bridging classification into chat question: {question}");
    let service = ChatService::from_config(config)?;
    let transcript = service.respond(CLI_SESSION, &question, Vec::new()).await;
    print_last_reply(&transcript);
    Ok(())
}

async fn run_transcribe(config: &AppConfig, audio: &Path) -> Result<()> {
    let transcriber = WhisperClient::from_config(config)?;
    let text = transcriber.transcribe(audio).await?;
    println!("{text}");
    Ok(())
}

async fn run_ingest(config: &AppConfig, path: &Path) -> Result<()> {
    let (files, documents) = ingest::load_documents(path)?;
    if files.is_empty() {
        println!("No .txt files found in: {}", path.display());
        return Ok(());
    }

    let client = KnowledgeBaseClient::new(config.knowledge_base_endpoint())?;
    let indexed = client.ingest(&documents).await?;
    println!(
        "Indexed {} passages from {} files into the knowledge base",
        indexed,
        files.len()
    );
    Ok(())
}

fn print_last_reply(transcript: &Transcript) {
    if let Some(exchange) = transcript.last() {
        println!("assistant> {}", exchange.assistant);
    }
}
