mod config;
mod engine;
mod error;
mod games;
mod scores;
mod words;

use clap::{Args, Parser, Subcommand};
use config::Settings;
use error::{Error, Result};
use games::minesweeper::Difficulty;
use games::typing::{MAX_WPM, MIN_WPM};
use games::PlayOptions;
use scores::{leaderboard, render_leaderboard, Profile, ScoreStore};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "kb-arcade", version, about = "Casual keyboard games for the terminal")]
struct Cli
{
    /// Settings file, defaults to the user config directory
    #[arg(long, global = true, env = "KB_ARCADE_CONFIG")]
    config: Option<PathBuf>,

    /// Name recorded with your scores
    #[arg(long, global = true)]
    player: Option<String>,

    /// Append logs to this file
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command
{
    /// List the available games
    List,
    /// Play a game
    Play(PlayArgs),
    /// Show the best scores
    Scores
    {
        /// Only this game
        #[arg(long)]
        game: Option<String>,
        /// Number of entries
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Show a player's history
    Profile
    {
        /// Player name, defaults to the current player
        #[arg(long)]
        user: Option<String>,
    },
}

#[derive(Args)]
struct PlayArgs
{
    game: String,

    /// Seed for a repeatable game
    #[arg(long)]
    seed: Option<u64>,

    /// Starting speed of the typing trainer (5-120)
    #[arg(long, value_parser = parse_wpm)]
    wpm: Option<f32>,

    /// Minesweeper board: beginner, intermediate or expert
    #[arg(long)]
    difficulty: Option<Difficulty>,

    /// Snake passes through the walls
    #[arg(long)]
    wrap: bool,
}

impl PlayArgs
{
    fn options(&self) -> PlayOptions
    {
        PlayOptions {
            seed: self.seed,
            wpm: self.wpm,
            difficulty: self.difficulty,
            wrap: self.wrap,
        }
    }
}

fn main()
{
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<()>
{
    let cli = Cli::parse();
    let mut settings = Settings::load(cli.config.as_deref())?;
    if let Some(player) = cli.player {
        settings.player = Some(player);
    }
    if let Some(path) = cli.log_file {
        settings.log_file = Some(path);
    }
    init_logging(settings.log_file.as_deref())?;

    match cli.command {
        None => interactive_menu(&settings),
        Some(Command::List) => {
            list_games();
            Ok(())
        }
        Some(Command::Play(args)) => {
            games::launch(&args.game, &args.options(), &settings)?;
            Ok(())
        }
        Some(Command::Scores { game, limit }) => show_scores(&settings, game.as_deref(), limit),
        Some(Command::Profile { user }) => show_profile(&settings, user),
    }
}

/// Logs go to a file because the games own the terminal while they run.
fn init_logging(log_file: Option<&Path>) -> Result<()>
{
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "kb_arcade=info".into());
    let file_layer = match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|err| Error::io(path, err))?;
            Some(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
        }
        None => None,
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .init();
    Ok(())
}

fn parse_wpm(value: &str) -> std::result::Result<f32, String>
{
    let parsed = value
        .parse::<f32>()
        .map_err(|_| "WPM must be a number".to_string())?;
    if !(MIN_WPM..=MAX_WPM).contains(&parsed) {
        return Err(format!("WPM must be between {MIN_WPM} and {MAX_WPM}"));
    }
    Ok(parsed)
}

fn interactive_menu(settings: &Settings) -> Result<()>
{
    let registry = games::registry();
    loop {
        println!("KB Arcade");
        println!();
        println!("Select a game:");
        for (idx, game) in registry.iter().enumerate() {
            println!("  {:>2}. {} - {}", idx + 1, game.name, game.description);
        }
        println!();
        print!("Enter number or name (default 1, q to quit): ");
        std::io::stdout().flush().map_err(Error::Terminal)?;

        let mut input = String::new();
        let read = std::io::stdin().read_line(&mut input).map_err(Error::Terminal)?;
        let choice = input.trim();
        if read == 0 || choice.eq_ignore_ascii_case("q") {
            return Ok(());
        }

        let selected = if choice.is_empty() {
            Some(registry[0])
        } else if let Ok(index) = choice.parse::<usize>() {
            (1..=registry.len()).contains(&index).then(|| registry[index - 1])
        } else {
            games::find(choice)
        };
        let Some(game) = selected else {
            return Err(Error::InvalidOption(format!("Invalid selection '{choice}'.")));
        };
        games::launch(game.name, &PlayOptions::default(), settings)?;
        println!();
    }
}

fn list_games()
{
    println!("Available games:");
    for game in games::registry() {
        println!("  {:<14} - {}", game.name, game.description);
    }
}

fn show_scores(settings: &Settings, game: Option<&str>, limit: Option<usize>) -> Result<()>
{
    let game = match game {
        Some(name) => Some(
            games::find(name)
                .ok_or_else(|| Error::UnknownGame(name.to_string()))?
                .name,
        ),
        None => None,
    };
    let records = ScoreStore::open(settings.scores_path()?).load()?;
    let limit = limit.unwrap_or_else(|| settings.leaderboard_size());
    let ranked = leaderboard(&records, game, limit);
    for line in render_leaderboard(&ranked, game) {
        println!("{line}");
    }
    Ok(())
}

fn show_profile(settings: &Settings, user: Option<String>) -> Result<()>
{
    let username = user.unwrap_or_else(|| settings.player());
    let records = ScoreStore::open(settings.scores_path()?).load()?;
    for line in Profile::build(&records, &username).render() {
        println!("{line}");
    }
    Ok(())
}
