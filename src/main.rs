use anyhow::Context;
use brewmatch_core::LexiconSet;
use brewmatch_similarity::{
    simulation_rounds, FeedbackEvent, MatchConfig, MatchResult, MatchSession, ProfileFeatureBuilder,
};
use brewmatch_storage::{
    read_profiles, write_feature_table, write_matches, FeedbackLog, BIO_COLUMN, LOOKING_FOR_COLUMN,
};
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

/// Rank candidate matches from free-text profiles
#[derive(Parser, Debug)]
#[command(name = "brewmatch")]
#[command(about = "Profile matching from free-text bios", long_about = None)]
struct Args {
    /// CSV with `uid` and `bio` columns
    #[arg(long, default_value = "bio.csv")]
    bio: PathBuf,

    /// CSV with `uid` and `looking_for` columns
    #[arg(long, default_value = "looking_for.csv")]
    looking_for: PathBuf,

    /// Ranked match output
    #[arg(short, long, default_value = "final_matches.csv")]
    output: PathBuf,

    /// Also write the processed feature table here
    #[arg(long)]
    features_out: Option<PathBuf>,

    /// Feedback event log to replay and append to
    #[arg(long)]
    feedback_log: Option<PathBuf>,

    /// Run the two scripted feedback rounds
    #[arg(long)]
    simulate_feedback: bool,

    /// JSON lexicon file replacing the built-in tables
    #[arg(long)]
    lexicon: Option<PathBuf>,

    /// Matches kept per user
    #[arg(long, default_value_t = 5)]
    top_n: usize,

    /// Extract profiles on one thread
    #[arg(long)]
    sequential: bool,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting brewmatch v{}", env!("CARGO_PKG_VERSION"));

    let config = MatchConfig {
        top_n: args.top_n,
        parallel_extraction: !args.sequential,
    };
    config.validate()?;

    let lexicons = match &args.lexicon {
        Some(path) => LexiconSet::from_json_file(path)?,
        None => LexiconSet::builtin(),
    };
    let source = args
        .lexicon
        .as_ref()
        .map_or_else(|| "builtin".to_string(), |p| p.display().to_string());
    info!(
        %source,
        interests = lexicons.interests.len(),
        traits = lexicons.traits.len(),
        preferences = lexicons.preferences.len(),
        "lexicons loaded"
    );

    let bios = read_profiles(&args.bio, BIO_COLUMN)?;
    let wishes = read_profiles(&args.looking_for, LOOKING_FOR_COLUMN)?;
    info!(bios = bios.len(), looking_for = wishes.len(), "profiles read");

    let table = ProfileFeatureBuilder::new(&lexicons)
        .parallel(config.parallel_extraction)
        .build(&bios, &wishes)
        .context("building the feature table")?;

    if let Some(path) = &args.features_out {
        write_feature_table(path, &table)?;
    }

    let mut session = MatchSession::new(table, config)?;
    log_matches("Initial matches", &session.rank_all()?);

    let log = args.feedback_log.as_ref().map(FeedbackLog::open).transpose()?;
    if let Some(log) = &log {
        let replay = log.read_events()?;
        if !replay.is_empty() {
            let report = session.apply_feedback(&replay)?;
            info!(
                path = %log.path().display(),
                applied = report.applied,
                skipped = report.skipped,
                "feedback log replayed"
            );
        }
    }

    if args.simulate_feedback {
        let [first, second] = simulation_rounds(session.table())?;
        run_round(&mut session, log.as_ref(), &first)?;
        log_matches("Matches after first feedback round", &session.rank_all()?);
        run_round(&mut session, log.as_ref(), &second)?;
    }

    let results = session.rank_all()?;
    log_matches("Updated matches", &results);

    write_matches(&args.output, &results)?;
    info!("Matches saved to {}", args.output.display());
    Ok(())
}

fn run_round(
    session: &mut MatchSession,
    log: Option<&FeedbackLog>,
    events: &[FeedbackEvent],
) -> anyhow::Result<()> {
    session.apply_feedback(events)?;
    if let Some(log) = log {
        log.append_all(events)?;
        log.sync()?;
    }
    Ok(())
}

fn log_matches(title: &str, results: &[MatchResult]) {
    info!("{title}:");
    for result in results {
        if result.is_empty() {
            warn!(uid = %result.uid, "no candidates");
            continue;
        }
        let ranked: Vec<String> = result
            .matches
            .iter()
            .map(|m| format!("UID {} ({:.3})", m.uid, m.score))
            .collect();
        info!("UID {}: [{}]", result.uid, ranked.join(", "));
    }
}
