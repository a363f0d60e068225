//! CLI binary for researchrot.
//!
//! A thin shim over the library crate: maps CLI flags to `ClientConfig`,
//! drives a `Session` and prints whatever the surfaces end up showing.

use anyhow::{anyhow, bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use researchrot::{
    Action, BrainRotStyle, ClientConfig, Dispatch, MediaData, PhraseList, RequestObserver,
    ResearchClient, Session, Summary, ViewState,
};
use serde::Serialize;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

// ── Spinner driven by request events ─────────────────────────────────────────

/// Shows a spinner while a request is pending and one log line per request.
struct CliObserver {
    bar: ProgressBar,
}

impl CliObserver {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}  {elapsed:.dim}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);
        bar.set_style(style);
        Arc::new(Self { bar })
    }

    fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl RequestObserver for CliObserver {
    fn on_request_start(&self, action: Action) {
        self.bar.reset_elapsed();
        self.bar.set_prefix("Waiting");
        self.bar.set_message(action.label());
        self.bar.enable_steady_tick(Duration::from_millis(80));
    }

    fn on_request_complete(&self, action: Action, elapsed: Duration) {
        self.bar.disable_steady_tick();
        self.bar.println(format!(
            "  {} {:<20} {}",
            green("✓"),
            action.label(),
            dim(&format!("{:.1}s", elapsed.as_secs_f64())),
        ));
        self.bar.set_message("");
    }

    fn on_request_error(&self, action: Action, message: &str) {
        self.bar.disable_steady_tick();
        // Truncate very long messages to keep output tidy.
        let msg = if message.chars().count() > 80 {
            let short: String = message.chars().take(79).collect();
            format!("{short}\u{2026}")
        } else {
            message.to_string()
        };
        self.bar
            .println(format!("  {} {:<20} {}", red("✗"), action.label(), red(&msg)));
        self.bar.set_message("");
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Summarise an arXiv paper (abs links are rewritten to the PDF)
  researchrot summarize https://arxiv.org/abs/1706.03762

  # Summarise a local PDF (uploaded first)
  researchrot summarize paper.pdf -o summary.txt

  # Podcast transcript plus MP3
  researchrot podcast https://arxiv.org/abs/1706.03762 -o attention.mp3

  # Flashcards from a fresh summary, then browse them
  researchrot flashcards paper.pdf --count 15 --browse

  # Mnemonics from a saved summary
  researchrot mnemonics --summary-file summary.txt --count 5

  # Captions over a background video
  researchrot brainrot --video clip.mp4 -p "attention is all you need" -p "no cap" -o out.mp4

  # Check the backend
  researchrot health

FLASHCARD BROWSER:
  n  next card      p  previous card    f  flip card
  r  regenerate     q  quit

ENVIRONMENT VARIABLES:
  RESEARCHROT_BASE_URL    Backend origin (default http://localhost:8000)
  RESEARCHROT_TIMEOUT     Per-request timeout in seconds (default: none)
  RUST_LOG                Overrides the log filter
"#;

/// Summaries, podcasts, flashcards, mnemonics and brain-rot videos from research papers.
#[derive(Parser, Debug)]
#[command(
    name = "researchrot",
    version,
    about = "Turn research papers into summaries, podcasts, flashcards, mnemonics and brain-rot videos",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Backend origin.
    #[arg(long, global = true, env = "RESEARCHROT_BASE_URL", default_value = researchrot::DEFAULT_BASE_URL)]
    base_url: String,

    /// Per-request timeout in seconds (default: wait indefinitely).
    #[arg(long, global = true, env = "RESEARCHROT_TIMEOUT")]
    timeout: Option<u64>,

    /// Print results as JSON.
    #[arg(long, global = true, env = "RESEARCHROT_JSON")]
    json: bool,

    /// Disable the spinner.
    #[arg(long, global = true, env = "RESEARCHROT_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, global = true, env = "RESEARCHROT_VERBOSE")]
    verbose: bool,

    /// Suppress all output except results and errors.
    #[arg(short, long, global = true, env = "RESEARCHROT_QUIET")]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Summarise a paper (URL, arXiv link or local PDF).
    Summarize {
        input: String,
        /// Also write the summary text to this file.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Generate a podcast transcript and MP3 audio.
    Podcast {
        input: String,
        /// Write the audio to this file.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Generate flashcards from a summary.
    Flashcards {
        #[command(flatten)]
        source: SummarySource,
        /// Number of cards (clamped to 5–20).
        #[arg(short, long, default_value_t = 10)]
        count: u32,
        /// Browse the deck interactively.
        #[arg(long)]
        browse: bool,
    },
    /// Generate mnemonics from a summary.
    Mnemonics {
        #[command(flatten)]
        source: SummarySource,
        /// Number of mnemonics (clamped to 3–10).
        #[arg(short, long, default_value_t = 5)]
        count: u32,
    },
    /// Render caption phrases over a background video.
    Brainrot {
        #[command(flatten)]
        args: BrainRotArgs,
    },
    /// Check that the backend is up.
    Health,
}

/// Where the summary for derived content comes from.
#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
struct SummarySource {
    /// Summarise this URL or PDF first.
    input: Option<String>,
    /// Use previously saved summary text instead.
    #[arg(long)]
    summary_file: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct BrainRotArgs {
    /// Background video (video/*, at most 100 MB).
    #[arg(long, conflicts_with = "pdf_url", required_unless_present = "pdf_url")]
    video: Option<PathBuf>,

    /// Caption phrase; repeat for several.
    #[arg(short = 'p', long = "phrase")]
    phrases: Vec<String>,

    /// Build the video from a PDF URL instead.
    #[arg(long)]
    pdf_url: Option<String>,

    /// Write the video here.
    #[arg(short, long, default_value = "brainrot.mp4")]
    output: PathBuf,

    #[arg(long, default_value = "white")]
    text_color: String,

    #[arg(long, default_value_t = 50)]
    font_size: u32,

    /// Seconds per phrase.
    #[arg(long, default_value_t = 2.0)]
    duration: f64,

    #[arg(long, default_value = "center")]
    position: String,
}

impl BrainRotArgs {
    fn style(&self) -> BrainRotStyle {
        BrainRotStyle {
            text_color: self.text_color.clone(),
            font_size: self.font_size,
            duration_per_phrase: self.duration,
            position: self.position.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The spinner already reports each request; keep library INFO logs
    // out of its way.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let observer = show_progress.then(CliObserver::new);
    let config = build_config(&cli, observer.clone())?;
    let client = ResearchClient::new(config).context("Failed to create HTTP client")?;
    let mut session = Session::new(client);

    let outcome = run(&cli, &mut session).await;
    if let Some(obs) = observer {
        obs.finish();
    }
    outcome
}

/// Map CLI args to `ClientConfig`.
fn build_config(cli: &Cli, observer: Option<Arc<CliObserver>>) -> Result<ClientConfig> {
    let mut builder = ClientConfig::builder().base_url(&cli.base_url);
    if let Some(secs) = cli.timeout {
        builder = builder.request_timeout_secs(secs);
    }
    if let Command::Brainrot { args } = &cli.command {
        builder = builder.brainrot_style(args.style());
    }
    if let Some(obs) = observer {
        builder = builder.observer(obs as Arc<dyn RequestObserver>);
    }
    builder.build().context("Invalid configuration")
}

async fn run(cli: &Cli, session: &mut Session) -> Result<()> {
    match &cli.command {
        Command::Summarize { input, output } => {
            session.summarize(input).await;
            let artifact = ready(session.query.view())?;
            print_result(cli, artifact)?;
            if let (Some(path), Some(summary)) = (output, artifact.as_summary()) {
                tokio::fs::write(path, summary.as_str())
                    .await
                    .with_context(|| format!("Failed to write summary to {}", path.display()))?;
                note(cli, &format!("summary saved to {}", bold(&path.display().to_string())));
            }
        }

        Command::Podcast { input, output } => {
            session.generate_podcast(input).await;
            let artifact = ready(session.query.view())?;
            print_result(cli, artifact)?;
            if let (Some(path), Some(audio)) = (output, artifact.media()) {
                save_media(cli, audio, path).await?;
            }
        }

        Command::Flashcards {
            source,
            count,
            browse,
        } => {
            obtain_summary(session, source).await?;
            session.set_flashcard_count(*count);
            session.generate_flashcards().await;
            let deck = ready(session.flashcards.view())?;
            if *browse {
                browse_deck(session).await?;
            } else if cli.json {
                print_result(cli, deck)?;
            } else {
                for (i, card) in deck.cards().iter().enumerate() {
                    println!("{}. {}", i + 1, bold(&card.question));
                    println!("   {}", card.answer);
                }
            }
        }

        Command::Mnemonics { source, count } => {
            obtain_summary(session, source).await?;
            session.set_mnemonic_count(*count);
            session.generate_mnemonics().await;
            print_result(cli, ready(session.mnemonics.view())?)?;
        }

        Command::Brainrot { args } => {
            if let Some(url) = &args.pdf_url {
                session.generate_brainrot_from_pdf(url).await;
            } else {
                if let Some(video) = &args.video {
                    session
                        .select_video(video)
                        .with_context(|| format!("Rejected background video {}", video.display()))?;
                }
                session.phrases = args.phrases.iter().cloned().collect::<PhraseList>();
                session.generate_brainrot().await;
            }
            let video = ready(session.brainrot.view())?;
            save_media(cli, video, &args.output).await?;
            if cli.json {
                print_result(cli, video)?;
            }
        }

        Command::Health => {
            let status = session
                .client()
                .health()
                .await
                .map_err(|e| anyhow!(e.user_message()))?;
            if cli.json {
                let json =
                    serde_json::to_string_pretty(&status).context("Failed to serialise output")?;
                println!("{json}");
            } else if status.is_healthy() {
                println!("{} backend is {}", green("✔"), status.status);
            } else {
                bail!("backend reported status {:?}", status.status);
            }
        }
    }
    Ok(())
}

/// The ready value of a surface, or its error message as an `anyhow` error.
fn ready<T>(view: &ViewState<T>) -> Result<&T> {
    match view {
        ViewState::Ready(v) => Ok(v),
        ViewState::Failed(msg) => Err(anyhow!("{msg}")),
        ViewState::Idle => bail!("no result was produced"),
    }
}

async fn obtain_summary(session: &mut Session, source: &SummarySource) -> Result<()> {
    if let Some(path) = &source.summary_file {
        let text = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read summary from {}", path.display()))?;
        session.set_summary(Summary::new(text)?);
    } else if let Some(input) = &source.input {
        session.summarize(input).await;
        ready(session.query.view()).context("Summarize failed")?;
    }
    if !session.can_generate_derived() {
        bail!("no summary available");
    }
    Ok(())
}

fn print_result<T: Serialize + std::fmt::Display>(cli: &Cli, value: &T) -> Result<()> {
    if cli.json {
        let json = serde_json::to_string_pretty(value).context("Failed to serialise output")?;
        println!("{json}");
    } else {
        println!("{value}");
    }
    Ok(())
}

async fn save_media(cli: &Cli, media: &MediaData, path: &Path) -> Result<()> {
    media
        .write_to(path)
        .await
        .with_context(|| format!("Failed to save media to {}", path.display()))?;
    note(cli, &format!("{media} saved to {}", bold(&path.display().to_string())));
    Ok(())
}

fn note(cli: &Cli, msg: &str) {
    if !cli.quiet && !cli.json {
        eprintln!("{} {msg}", green("✔"));
    }
}

/// Interactive flashcard browser over stdin.
async fn browse_deck(session: &mut Session) -> Result<()> {
    let stdin = io::stdin();
    loop {
        match session.flashcards.view() {
            ViewState::Ready(deck) => println!("\n{deck}"),
            other => println!("\n{other}"),
        }
        print!("{} ", dim("[n]ext [p]rev [f]lip [r]egenerate [q]uit >"));
        io::stdout().flush().ok();

        let mut line = String::new();
        if stdin.lock().read_line(&mut line).context("Failed to read stdin")? == 0 {
            return Ok(());
        }
        match line.trim() {
            "n" => {
                if let Some(deck) = session.deck_mut() {
                    deck.next();
                }
            }
            "p" => {
                if let Some(deck) = session.deck_mut() {
                    deck.previous();
                }
            }
            "f" | "" => {
                if let Some(deck) = session.deck_mut() {
                    deck.flip();
                }
            }
            "r" => {
                if session.generate_flashcards().await == Dispatch::Skipped {
                    println!("{}", red("no summary to regenerate from"));
                }
            }
            "q" => return Ok(()),
            other => println!("{}", red(&format!("unknown command {other:?}"))),
        }
    }
}
