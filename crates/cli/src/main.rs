mod session;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use engine::{EngineConfig, FeedEngine, FeedStatus, RefillOutcome, RefillPolicy};
use feed_client::{CandidateFetcher, DecisionReporter, HttpFeedClient, JsonFileSource, LogReporter};
use feed_model::{ActiveFilters, CandidateItem, Decision, Outcome, ProfileSnapshot};
use gesture::{AnimationPresenter, CardVisual, ReleaseOutcome};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use session::{Session, Step, StepReport};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// swipe-feed - drive the swipe feed engine from the terminal
#[derive(Parser)]
#[command(name = "swipe-feed")]
#[command(about = "Swipe through a candidate feed on a virtual clock", long_about = None)]
struct Cli {
    /// JSON file of candidate records to serve refills from
    #[arg(long, global = true, conflicts_with = "endpoint")]
    source: Option<PathBuf>,

    /// Base URL of the feed service (e.g. http://localhost:8080/api)
    #[arg(long, global = true)]
    endpoint: Option<String>,

    /// Card viewport width in logical pixels
    #[arg(long, global = true, default_value = "390")]
    viewport_width: f32,

    /// Queue length that triggers a refill
    #[arg(long, global = true, default_value = "5")]
    low_water_mark: usize,

    /// Candidates requested per refill
    #[arg(long, global = true, default_value = "5")]
    batch_size: usize,

    /// Refill trigger policy
    #[arg(long, global = true, value_enum, default_value = "cumulative")]
    policy: PolicyArg,

    /// Profile skills sent with refill requests (comma separated)
    #[arg(long, global = true, value_delimiter = ',')]
    skills: Vec<String>,

    /// Hide postings hosted off-platform
    #[arg(long, global = true)]
    no_external: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a JSON script of gesture steps
    Replay {
        /// Path to the script (a JSON array of steps)
        script: PathBuf,
    },

    /// Swipe randomly until the feed runs out or the swipe budget is spent
    Autoplay {
        /// Maximum number of interactions
        #[arg(long, default_value = "20")]
        swipes: usize,

        /// Seed for reproducible runs
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Print how the card is drawn at given offsets
    Preview {
        /// Offsets in px (repeatable); negative is toward reject
        #[arg(long = "offset", allow_negative_numbers = true)]
        offsets: Vec<f32>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum PolicyArg {
    /// Refill when the total queue length hits a multiple of the mark
    Cumulative,
    /// Refill when the cards left ahead drop to the mark
    Remaining,
}

impl From<PolicyArg> for RefillPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Cumulative => RefillPolicy::CumulativeMultiple,
            PolicyArg::Remaining => RefillPolicy::RemainingAhead,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = EngineConfig::default()
        .with_viewport_width(cli.viewport_width)
        .with_low_water_mark(cli.low_water_mark)
        .with_batch_size(cli.batch_size)
        .with_refill_policy(cli.policy.into());

    match &cli.command {
        Commands::Replay { script } => handle_replay(&cli, config, script).await?,
        Commands::Autoplay { swipes, seed } => handle_autoplay(&cli, config, *swipes, *seed).await?,
        Commands::Preview { offsets } => handle_preview(cli.viewport_width, offsets),
    }

    Ok(())
}

/// Build the engine from the collaborator flags.
async fn build_engine(cli: &Cli, config: EngineConfig) -> Result<FeedEngine> {
    let fetcher: Arc<dyn CandidateFetcher>;
    let reporter: Arc<dyn DecisionReporter>;
    match (&cli.source, &cli.endpoint) {
        (Some(path), _) => {
            let source = JsonFileSource::load(path)
                .await
                .with_context(|| format!("Failed to load candidates from {}", path.display()))?;
            println!("{} Loaded {} candidate records", "✓".green(), source.len());
            fetcher = Arc::new(source);
            reporter = Arc::new(LogReporter);
        }
        (None, Some(endpoint)) => {
            let client = Arc::new(
                HttpFeedClient::new(endpoint.as_str()).context("Failed to create feed client")?,
            );
            fetcher = client.clone();
            reporter = client;
        }
        (None, None) => bail!("either --source <FILE> or --endpoint <URL> is required"),
    }

    let profile = ProfileSnapshot::new()
        .with_skills(cli.skills.iter().cloned())
        .with_filters(ActiveFilters {
            include_external: !cli.no_external,
            ..ActiveFilters::default()
        });

    Ok(FeedEngine::new(config, fetcher, reporter).with_profile(profile))
}

/// Handle the 'replay' command
async fn handle_replay(cli: &Cli, config: EngineConfig, script: &Path) -> Result<()> {
    let text = tokio::fs::read_to_string(script)
        .await
        .with_context(|| format!("Failed to read script {}", script.display()))?;
    let steps: Vec<Step> = serde_json::from_str(&text)
        .with_context(|| format!("Invalid script {}", script.display()))?;

    let mut session = Session::new(build_engine(cli, config).await?);
    start(&mut session).await;

    for (i, step) in steps.iter().enumerate() {
        let report = session.run(step).await;
        print_step(i + 1, step, &report);
    }

    session.finish().await;
    print_summary(&session);
    Ok(())
}

/// Handle the 'autoplay' command
async fn handle_autoplay(
    cli: &Cli,
    config: EngineConfig,
    swipes: usize,
    seed: Option<u64>,
) -> Result<()> {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let mut session = Session::new(build_engine(cli, config).await?);
    start(&mut session).await;

    for i in 0..swipes {
        if session.engine().status() == FeedStatus::Exhausted {
            println!("{}", "Feed exhausted".yellow());
            break;
        }
        let step = random_step(&mut rng);
        let report = session.run(&step).await;
        print_step(i + 1, &step, &report);
    }

    session.finish().await;
    print_summary(&session);
    Ok(())
}

/// Handle the 'preview' command
fn handle_preview(viewport_width: f32, offsets: &[f32]) {
    let presenter = AnimationPresenter::default();
    let offsets = if offsets.is_empty() {
        let w = viewport_width;
        vec![-0.5 * w, -0.25 * w, -0.1 * w, 0.0, 0.1 * w, 0.25 * w, 0.5 * w]
    } else {
        offsets.to_vec()
    };

    println!("{}", format!("Card visuals at {}px viewport:", viewport_width).bold().blue());
    for offset in offsets {
        print_visual(&presenter.visual(offset, viewport_width));
    }
}

async fn start(session: &mut Session) {
    match session.start().await {
        Some(RefillOutcome::Appended { count }) => {
            println!("{} Primed feed with {} candidates", "✓".green(), count)
        }
        Some(other) => println!("{} Initial fetch: {:?}", "!".yellow(), other),
        None => {}
    }
    if let Some(item) = session.engine().current() {
        print_card(item);
    }
}

fn random_step(rng: &mut StdRng) -> Step {
    match rng.random_range(0..10) {
        0 => Step::Accept,
        1 => Step::Reject,
        2 => Step::Scroll {
            dy: rng.random_range(-300.0..300.0),
        },
        3 => Step::Fling {
            dx: rng.random_range(-80.0..80.0),
        },
        _ => Step::Drag {
            dx: rng.random_range(-250.0..250.0),
            duration_ms: rng.random_range(150..1200),
        },
    }
}

fn print_step(n: usize, step: &Step, report: &StepReport) {
    let release = match report.release {
        Some(ReleaseOutcome::Commit(direction)) => format!("commit {:?}", direction),
        Some(ReleaseOutcome::Cancel) => "spring back".to_string(),
        Some(ReleaseOutcome::Ignored) => "no drag".to_string(),
        None => match report.triggered {
            Some(true) => "button".to_string(),
            Some(false) => "refused".to_string(),
            None => "-".to_string(),
        },
    };
    println!("{:>3}. {:<40} {}", n, format!("{:?}", step).dimmed(), release);

    if let Some(decision) = &report.decision {
        print_decision(decision);
    }
    if let Some(refill) = report.refill {
        println!("     {} refill: {:?}", "↻".cyan(), refill);
    }
}

fn print_decision(decision: &Decision) {
    match decision.outcome {
        Outcome::Accept => println!("     {} accept {}", "✓".green(), decision.candidate_id),
        Outcome::Reject => println!("     {} reject {}", "✗".red(), decision.candidate_id),
    }
}

fn print_card(item: &CandidateItem) {
    let org = item.display.organization.as_deref().unwrap_or("-");
    println!(
        "  {} {} @ {} (score {:.2}{})",
        "▶".bold(),
        item.display.title.bold(),
        org,
        item.display_score(),
        if item.is_external { ", external" } else { "" }
    );
}

fn print_visual(visual: &CardVisual) {
    let swatch = "    ".on_truecolor(visual.tint.r, visual.tint.g, visual.tint.b);
    println!(
        "{:>8.1}px  {} rot {:>6.2}°  opacity {:.2}  accept {:.2}  reject {:.2}",
        visual.offset,
        swatch,
        visual.rotation_degrees,
        visual.opacity,
        visual.accept_badge_opacity,
        visual.reject_badge_opacity
    );
}

fn print_summary(session: &Session) {
    let engine = session.engine();
    let accepted = engine
        .decisions()
        .iter()
        .filter(|d| d.outcome == Outcome::Accept)
        .count();
    let rejected = engine.decisions().len() - accepted;

    println!("{}", "Session summary:".bold().blue());
    println!("{}Decisions: {} accepted, {} rejected", "• ".green(), accepted, rejected);
    println!("{}Queue: {} seen of {}", "• ".green(), engine.queue().cursor(), engine.queue().len());
    println!("{}Refills issued: {}", "• ".cyan(), engine.replenisher().fetches_issued());
    println!("{}Virtual time: {:.2?}", "• ".cyan(), session.now());
    match engine.status() {
        FeedStatus::Ready => {
            if let Some(item) = engine.current() {
                print_card(item);
            }
        }
        FeedStatus::Loading => println!("{}", "Waiting for more candidates...".yellow()),
        FeedStatus::Exhausted => println!("{}", "You're all caught up.".yellow()),
    }
}
