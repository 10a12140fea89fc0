use std::{
    path::PathBuf,
    time::{Duration, Instant},
};

use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

use dooze_core::{
    CredentialSource, HistoryItem, HistoryStore, InferenceClient, ModelConfig, PresentationMode,
    ResultView, RetryPolicy, Session, StyleProfile, VideoPayload, format_history,
    format_result_readable, get_history_path, prompt::DEFAULT_LANGUAGE,
};

fn format_duration(d: Duration) -> String {
    let secs = d.as_secs_f64();
    if secs < 60.0 {
        format!("{:.1}s", secs)
    } else {
        format!("{:.0}m {:.0}s", (secs / 60.0).floor(), secs % 60.0)
    }
}

/// CLI wrapper for StyleProfile (needed for clap ValueEnum)
#[derive(Clone, Default, ValueEnum)]
enum CliStyle {
    #[default]
    Descriptive,
    Midjourney,
    Runway,
    StableDiffusion,
    Json,
}

impl From<CliStyle> for StyleProfile {
    fn from(cli: CliStyle) -> Self {
        match cli {
            CliStyle::Descriptive => StyleProfile::Descriptive,
            CliStyle::Midjourney => StyleProfile::Midjourney,
            CliStyle::Runway => StyleProfile::Runway,
            CliStyle::StableDiffusion => StyleProfile::StableDiffusion,
            CliStyle::Json => StyleProfile::JsonStructured,
        }
    }
}

#[derive(Clone, ValueEnum)]
enum CliView {
    Timeline,
    Builder,
    Raw,
}

impl From<CliView> for PresentationMode {
    fn from(cli: CliView) -> Self {
        match cli {
            CliView::Timeline => PresentationMode::Timeline,
            CliView::Builder => PresentationMode::Builder,
            CliView::Raw => PresentationMode::Raw,
        }
    }
}

#[derive(Parser)]
#[command(name = "dooze")]
#[command(about = "Reverse-engineer a short video into a generative AI prompt")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Print progress logs (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Analyze a video and print the generated prompt
    Analyze(AnalyzeArgs),

    /// Show or manage previously generated prompts
    History {
        #[command(subcommand)]
        action: Option<HistoryAction>,
    },
}

#[derive(Args)]
struct AnalyzeArgs {
    /// Video file (max 50 MB)
    video: PathBuf,

    /// Target prompt style
    #[arg(short, long, value_enum, default_value = "descriptive")]
    style: CliStyle,

    /// Include sound, music and dialogue in the analysis
    #[arg(short, long)]
    audio: bool,

    /// Output language for the generated prompt
    #[arg(short, long, default_value = DEFAULT_LANGUAGE)]
    lang: String,

    /// Model identifier
    #[arg(short, long)]
    model: Option<String>,

    /// Comma-separated API keys, tried in order
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    api_keys: Option<String>,

    /// Seconds to wait after a quota error before retrying the same key
    #[arg(long)]
    cooldown_secs: Option<u64>,

    /// Force a presentation mode instead of the detected one
    #[arg(long, value_enum)]
    view: Option<CliView>,

    /// Rebuild the final prompt from the subject/action/environment/lighting/camera breakdown
    #[arg(long)]
    resync: bool,

    /// Do not save the result to history
    #[arg(long)]
    no_history: bool,
}

#[derive(Subcommand)]
enum HistoryAction {
    /// List saved prompts, newest first
    List,
    /// Print one saved prompt
    Show { id: String },
    /// Delete all saved prompts
    Clear,
}

fn create_spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ "),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "info" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("{} {}", style("Error:").red().bold(), message);
    std::process::exit(1);
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Analyze(args) => analyze(args).await,
        Command::History { action } => history(action.unwrap_or(HistoryAction::List)).await,
    }
}

async fn analyze(args: AnalyzeArgs) -> Result<()> {
    let style_profile: StyleProfile = args.style.into();
    let credentials = match args.api_keys {
        Some(keys) => CredentialSource::Inline(keys),
        None => CredentialSource::default(),
    };

    // Validate API keys early
    if let Err(e) = credentials.resolve() {
        fail(e);
    }

    let mut model = ModelConfig::default();
    if let Some(id) = args.model {
        model = model.with_model(id);
    }
    let mut policy = RetryPolicy::default();
    if let Some(secs) = args.cooldown_secs {
        policy.cooldown = Duration::from_secs(secs);
    }
    let model_name = model.model.clone();
    let client = InferenceClient::gemini(credentials, model)
        .with_policy(policy)
        .with_language(args.lang);

    println!(
        "\n{}  {}\n",
        style("dooze").green().bold(),
        style("Video Prompt Analyzer").dim()
    );

    let mut session = Session::new(style_profile, args.audio);
    let total_start = Instant::now();

    // Step 1: Read video
    let spinner = create_spinner("Reading video...");
    let video = match VideoPayload::load(&args.video).await {
        Ok(video) => video,
        Err(e) => {
            spinner.finish_and_clear();
            fail(e);
        }
    };
    spinner.finish_with_message(format!(
        "{} Loaded: {} {}",
        style("✓").green().bold(),
        style(&video.name).dim(),
        style(format!("[{:.1} MB]", video.bytes.len() as f64 / (1024.0 * 1024.0))).dim()
    ));
    session.select_video(&video.name)?;

    // Step 2: Analyze
    session.begin()?;
    let step_start = Instant::now();
    let spinner = create_spinner(&format!(
        "Analyzing with {} ({} style{})...",
        model_name,
        style_profile.name(),
        if session.include_audio { ", with audio" } else { "" }
    ));
    match client
        .analyze(&video, session.style, session.include_audio)
        .await
    {
        Ok(raw) => session.complete(raw)?,
        Err(e) => session.fail(e.to_string())?,
    }
    spinner.finish_and_clear();

    let Some(raw) = session.result() else {
        fail(session.error().unwrap_or("Something went wrong during analysis."));
    };
    println!(
        "{} Analyzed {}",
        style("✓").green().bold(),
        style(format!("[{}]", format_duration(step_start.elapsed()))).dim()
    );

    // Step 3: Interpret
    let mut view = ResultView::new(raw);
    if let Some(mode) = args.view {
        view.set_mode(mode.into());
    }
    if args.resync {
        if view.breakdown().is_some() {
            view.resync();
        } else {
            eprintln!(
                "{} no prompt breakdown in this result, --resync ignored",
                style("Warning:").yellow().bold()
            );
        }
    }

    // Step 4: Save to history
    if !args.no_history {
        let mut store = HistoryStore::open(get_history_path()).await;
        let item = HistoryItem::new(&video.name, view.final_prompt(), style_profile);
        let id = item.id.clone();
        store.push(item);
        match store.save().await {
            Ok(()) => println!(
                "{} Saved to history: {}",
                style("✓").green().bold(),
                style(id).dim()
            ),
            Err(e) => tracing::warn!(error = %e, "could not save history"),
        }
    }

    println!(
        "\n{} {}\n",
        style("Total time:").dim(),
        style(format_duration(total_start.elapsed())).green().bold()
    );
    println!("{}", style("─".repeat(60)).dim());

    println!("{}", format_result_readable(&view));

    Ok(())
}

async fn history(action: HistoryAction) -> Result<()> {
    let mut store = HistoryStore::open(get_history_path()).await;

    match action {
        HistoryAction::List => print!("{}", format_history(store.items())),
        HistoryAction::Show { id } => {
            let Some(item) = store.get(&id) else {
                fail(format!("no history entry with id {}", id));
            };
            let mut session = Session::default();
            session.restore(item)?;
            println!(
                "{} {} {}\n",
                style(&item.video_name).green().bold(),
                style(item.style.name()).yellow(),
                style(dooze_core::format_timestamp(item.timestamp)).dim()
            );
            let view = ResultView::new(session.result().unwrap_or_default());
            println!("{}", format_result_readable(&view));
        }
        HistoryAction::Clear => {
            store.clear().await?;
            println!("{} History cleared", style("✓").green().bold());
        }
    }

    Ok(())
}
