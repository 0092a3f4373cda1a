use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use quiz_progress::config::DEFAULT_LOG_FILTER;
use quiz_progress::protocol::{DEFAULT_RANDOM_COUNT, FlagsUpdate, StartRequest};
use quiz_progress::{ClientConfig, HttpQuizApi, QuizApi, QuizError, Session, client};

#[derive(Parser, Debug)]
#[command(version, about = "Practise a question bank from the terminal", long_about = None)]
struct Args {
    /// Backend origin, e.g. http://127.0.0.1:5000
    #[arg(long)]
    url: Option<String>,

    /// Cookie header identifying the learner, e.g. "session=..."
    #[arg(long)]
    cookie: Option<String>,

    /// File that receives the client log
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Resume the list the learner was last working through (default)
    Resume,
    /// Work through the bank in order, optionally a single unit
    Sequential {
        #[arg(long)]
        unit: Option<String>,
        /// Study mode: answers are shown and answering is disabled
        #[arg(long)]
        reveal: bool,
    },
    /// Review the wrong-answer or starred list
    Tag {
        #[arg(value_parser = ["wrong", "star"])]
        tag: String,
        #[arg(long)]
        reveal: bool,
    },
    /// Practise a random sample of the bank
    Random {
        #[arg(long, default_value_t = DEFAULT_RANDOM_COUNT)]
        count: usize,
        #[arg(long)]
        reveal: bool,
    },
    /// Forget recorded answers for one unit
    ClearUnit { unit: String },
    /// Show the learner's flags, or change them
    Flags {
        #[arg(long)]
        show_explanations: Option<bool>,
        #[arg(long)]
        reveal_mode: Option<bool>,
    },
}

impl Args {
    fn config(&self) -> ClientConfig {
        let mut config = ClientConfig::from_env();
        if let Some(url) = &self.url {
            config = config.with_base_url(url.as_str());
        }
        if let Some(cookie) = &self.cookie {
            config = config.with_session_cookie(cookie.as_str());
        }
        if let Some(path) = &self.log_file {
            config = config.with_log_file(path.clone());
        }
        if let Some(secs) = self.timeout {
            config = config.with_request_timeout(Duration::from_secs(secs));
        }
        config
    }
}

fn start_request(request: StartRequest, reveal: bool) -> StartRequest {
    if reveal { request.with_reveal(true) } else { request }
}

fn init_logging(config: &ClientConfig) -> Result<(), QuizError> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_file)
        .map_err(|source| QuizError::LogFile {
            path: config.log_file.display().to_string(),
            source,
        })?;
    let filter =
        EnvFilter::try_new(&config.log_filter).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

async fn run(args: Args) -> Result<(), QuizError> {
    let config = args.config();
    init_logging(&config)?;
    let api = HttpQuizApi::new(&config)?;
    info!(base_url = %config.base_url, "client starting");

    let request = match args.command.unwrap_or(Commands::Resume) {
        Commands::Resume => None,
        Commands::Sequential { unit, reveal } => Some(start_request(StartRequest::sequential(unit), reveal)),
        Commands::Tag { tag, reveal } => Some(start_request(StartRequest::tag(tag), reveal)),
        Commands::Random { count, reveal } => Some(start_request(StartRequest::random(count), reveal)),
        Commands::ClearUnit { unit } => {
            api.clear_unit(&unit).await?;
            println!("Cleared recorded answers for unit {unit}");
            return Ok(());
        }
        Commands::Flags {
            show_explanations,
            reveal_mode,
        } => {
            let flags = if show_explanations.is_none() && reveal_mode.is_none() {
                api.flags().await?
            } else {
                api.update_flags(FlagsUpdate {
                    show_explanations,
                    reveal_mode,
                })
                .await?
            };
            println!("show_explanations = {}", flags.show_explanations);
            println!("reveal_mode = {}", flags.reveal_mode);
            return Ok(());
        }
    };

    let session = match request {
        Some(request) => Session::begin(api, &request).await?,
        None => Session::start(api).await?,
    };
    client::run(session).await
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    if let Err(e) = run(args).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
