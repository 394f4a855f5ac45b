//! CLI definition and dispatch: the terminal front end of the quiz.

use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{debug, info};

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::svg_chart_adapter::SvgChartAdapter;
use crate::adapters::text_chart::{self, DEFAULT_HEIGHT};
use crate::domain::archetype::Archetype;
use crate::domain::candle::{Candle, CandleSeries};
use crate::domain::classifier::{
    CONTEXT_WINDOW, Label, classify_with_threshold, explain_context, explain_label,
};
use crate::domain::config_validation::validate_game_config;
use crate::domain::error::QuizError;
use crate::domain::game_config::GameConfig;
use crate::domain::pattern::generate_pattern;
use crate::domain::question_bank::{PatternBehavior, QuestionBank};
use crate::domain::session::{PredictionRound, ScoreBoard};
use crate::domain::walk::{WalkParams, generate_walk_with};
use crate::ports::config_port::ConfigPort;
use crate::ports::export_port::ExportPort;

#[derive(Parser, Debug)]
#[command(name = "candlequiz", about = "Candlestick pattern recognition trainer")]
pub struct Cli {
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate one realization of a named pattern
    Pattern {
        /// Doji, Hammer, "Shooting Star", "Bullish Engulfing" or "Bearish Engulfing"
        name: String,
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long)]
        csv: Option<PathBuf>,
        #[arg(long)]
        svg: Option<PathBuf>,
    },
    /// Generate a random-walk candle sequence
    Walk {
        #[arg(short, long)]
        length: Option<usize>,
        #[arg(long)]
        seed: Option<u64>,
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(long)]
        csv: Option<PathBuf>,
        #[arg(long)]
        svg: Option<PathBuf>,
    },
    /// Classify a single candle, or the last candle of a CSV series
    Classify {
        #[arg(long, requires_all = ["high", "low", "close"], conflicts_with = "file")]
        open: Option<f64>,
        #[arg(long)]
        high: Option<f64>,
        #[arg(long)]
        low: Option<f64>,
        #[arg(long)]
        close: Option<f64>,
        #[arg(short, long)]
        file: Option<PathBuf>,
        #[arg(long)]
        threshold: Option<f64>,
    },
    /// Play the pattern meaning quiz
    Quiz {
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(short, long)]
        rounds: Option<u32>,
        #[arg(long)]
        seed: Option<u64>,
        /// Always quiz on this pattern instead of a random one
        #[arg(short, long)]
        pattern: Option<String>,
    },
    /// Play the next-candle prediction quiz
    Predict {
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(short, long)]
        rounds: Option<u32>,
        #[arg(short, long)]
        length: Option<usize>,
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Validate a quiz configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    let result = match cli.command {
        Command::Pattern {
            name,
            seed,
            csv,
            svg,
        } => run_pattern(&name, seed, csv.as_deref(), svg.as_deref()),
        Command::Walk {
            length,
            seed,
            config,
            csv,
            svg,
        } => run_walk(length, seed, config.as_deref(), csv.as_deref(), svg.as_deref()),
        Command::Classify {
            open,
            high,
            low,
            close,
            file,
            threshold,
        } => run_classify(open, high, low, close, file.as_deref(), threshold),
        Command::Quiz {
            config,
            rounds,
            seed,
            pattern,
        } => run_quiz(config.as_deref(), rounds, seed, pattern.as_deref()),
        Command::Predict {
            config,
            rounds,
            length,
            seed,
        } => run_predict(config.as_deref(), rounds, length, seed),
        Command::Validate { config } => run_validate(&config),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, QuizError> {
    info!(path = %path.display(), "loading config");
    FileConfigAdapter::from_file(path)
}

pub fn build_game_config(adapter: &dyn ConfigPort) -> Result<GameConfig, QuizError> {
    validate_game_config(adapter)?;

    let defaults = GameConfig::default();
    let seed = match adapter.get_string("game", "seed") {
        Some(s) => Some(s.trim().parse::<u64>().map_err(|_| QuizError::ConfigInvalid {
            section: "game".into(),
            key: "seed".into(),
            reason: "seed must be a non-negative integer".into(),
        })?),
        None => None,
    };
    let rounds = u32::try_from(adapter.get_int("game", "rounds", defaults.rounds as i64))
        .map_err(|_| QuizError::ConfigInvalid {
            section: "game".into(),
            key: "rounds".into(),
            reason: "rounds is out of range".into(),
        })?;
    let walk_length =
        usize::try_from(adapter.get_int("game", "walk_length", defaults.walk_length as i64))
            .map_err(|_| QuizError::ConfigInvalid {
                section: "game".into(),
                key: "walk_length".into(),
                reason: "walk_length is out of range".into(),
            })?;

    let d = defaults.walk;
    Ok(GameConfig {
        rounds,
        walk_length,
        seed,
        walk: WalkParams {
            start_price: adapter.get_double("walk", "start_price", d.start_price),
            sigma: adapter.get_double("walk", "sigma", d.sigma),
            shadow_min: adapter.get_double("walk", "shadow_min", d.shadow_min),
            shadow_max: adapter.get_double("walk", "shadow_max", d.shadow_max),
        },
        threshold: adapter.get_double("classifier", "threshold", defaults.threshold),
    })
}

/// Overlay `[distractors]` and `[pattern_<key>]` sections on the built-in bank.
pub fn build_question_bank(adapter: &dyn ConfigPort) -> QuestionBank {
    let mut bank = QuestionBank::default();
    if let Some(pool) = adapter.get_list("distractors", "pool", '|') {
        bank = bank.with_distractors(pool);
    }
    if let Some(filler) = adapter.get_string("distractors", "filler") {
        bank = bank.with_filler(filler);
    }
    for archetype in Archetype::ALL {
        let section = format!("pattern_{}", archetype.config_key());
        let Some(base) = bank.behavior(archetype).cloned() else {
            continue;
        };
        let behavior = PatternBehavior {
            expected: adapter
                .get_string(&section, "expected")
                .unwrap_or(base.expected),
            explanation: adapter
                .get_string(&section, "explanation")
                .unwrap_or(base.explanation),
            keywords: adapter
                .get_list(&section, "keywords", ',')
                .unwrap_or(base.keywords),
        };
        bank = bank.with_behavior(archetype, behavior);
    }
    bank
}

/// Load the game settings and question bank, falling back to built-in
/// defaults when no config file is given.
pub fn load_session(path: Option<&Path>) -> Result<(GameConfig, QuestionBank), QuizError> {
    match path {
        Some(p) => {
            let adapter = load_config(p)?;
            Ok((build_game_config(&adapter)?, build_question_bank(&adapter)))
        }
        None => Ok((GameConfig::default(), QuestionBank::default())),
    }
}

pub fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    }
}

pub fn format_series_table(series: &CandleSeries, threshold: f64) -> String {
    let mut out = format!(
        "{:>5}  {:>9}  {:>9}  {:>9}  {:>9}  {}\n",
        "#", "open", "high", "low", "close", "label"
    );
    for (i, c) in series.iter().enumerate() {
        out.push_str(&format!(
            "{:>5}  {:>9.2}  {:>9.2}  {:>9.2}  {:>9.2}  {}\n",
            i,
            c.open(),
            c.high(),
            c.low(),
            c.close(),
            classify_with_threshold(c, threshold)
        ));
    }
    out
}

fn export_series(
    series: &CandleSeries,
    title: &str,
    csv: Option<&Path>,
    svg: Option<&Path>,
) -> Result<(), QuizError> {
    let targets: [(Option<&Path>, &dyn ExportPort); 2] =
        [(csv, &CsvAdapter), (svg, &SvgChartAdapter)];
    for (path, port) in targets {
        if let Some(path) = path {
            port.export(series, title, path)?;
            eprintln!("Wrote {}", path.display());
        }
    }
    Ok(())
}

fn run_pattern(
    name: &str,
    seed: Option<u64>,
    csv: Option<&Path>,
    svg: Option<&Path>,
) -> Result<(), QuizError> {
    let archetype: Archetype = name.parse()?;
    let mut rng = make_rng(seed);
    let series = generate_pattern(archetype, &mut rng)?;

    let threshold = GameConfig::default().threshold;
    println!("{}", archetype);
    print!("{}", text_chart::render(&series, DEFAULT_HEIGHT));
    print!("{}", format_series_table(&series, threshold));
    export_series(&series, archetype.name(), csv, svg)
}

fn run_walk(
    length: Option<usize>,
    seed: Option<u64>,
    config: Option<&Path>,
    csv: Option<&Path>,
    svg: Option<&Path>,
) -> Result<(), QuizError> {
    let (game, _) = load_session(config)?;
    let length = length.unwrap_or(game.walk_length);
    let mut rng = make_rng(seed.or(game.seed));
    let series = generate_walk_with(length, &game.walk, &mut rng)?;

    print!("{}", text_chart::render(&series, DEFAULT_HEIGHT));
    print!("{}", format_series_table(&series, game.threshold));
    export_series(&series, "Random walk", csv, svg)
}

/// Label, candle narrative and (with enough history) context narrative for
/// the last candle of `series`.
pub fn describe_classification(series: &CandleSeries, threshold: f64) -> Result<String, QuizError> {
    let (visible, last) = series.split_last().ok_or(QuizError::InsufficientHistory {
        have: 0,
        need: 1,
    })?;
    let label = classify_with_threshold(&last, threshold);
    let mut out = format!("{}\n{}\n", label, explain_label(label));
    if visible.len() >= CONTEXT_WINDOW {
        out.push_str(&format!("Context: {}\n", explain_context(&visible)?));
    }
    Ok(out)
}

fn run_classify(
    open: Option<f64>,
    high: Option<f64>,
    low: Option<f64>,
    close: Option<f64>,
    file: Option<&Path>,
    threshold: Option<f64>,
) -> Result<(), QuizError> {
    let threshold = threshold.unwrap_or(GameConfig::default().threshold);
    if !(threshold > 0.0 && threshold < 1.0) {
        return Err(QuizError::InvalidParameter {
            name: "threshold".into(),
            reason: "must be between 0 and 1".into(),
        });
    }

    let series = match (file, open, high, low, close) {
        (Some(path), ..) => CsvAdapter::read_series(path)?,
        (None, Some(o), Some(h), Some(l), Some(c)) => {
            CandleSeries::new(vec![Candle::new(o, h, l, c)?])
        }
        _ => {
            return Err(QuizError::InvalidParameter {
                name: "candle".into(),
                reason: "pass --open/--high/--low/--close or --file".into(),
            });
        }
    };
    print!("{}", describe_classification(&series, threshold)?);
    Ok(())
}

fn run_validate(config_path: &Path) -> Result<(), QuizError> {
    let adapter = load_config(config_path)?;
    let game = build_game_config(&adapter)?;
    let bank = build_question_bank(&adapter);

    // Every archetype must be able to produce a question with this pool.
    let mut rng = StdRng::seed_from_u64(0);
    for archetype in Archetype::ALL {
        bank.build_question(archetype, &mut rng)?;
    }
    println!(
        "Config valid: {} rounds, walk length {}, threshold {}",
        game.rounds, game.walk_length, game.threshold
    );
    Ok(())
}

fn run_quiz(
    config: Option<&Path>,
    rounds: Option<u32>,
    seed: Option<u64>,
    pattern: Option<&str>,
) -> Result<(), QuizError> {
    let (mut game, bank) = load_session(config)?;
    if let Some(r) = rounds {
        game.rounds = r;
    }
    let fixed = pattern.map(str::parse::<Archetype>).transpose()?;
    let mut rng = make_rng(seed.or(game.seed));

    let stdin = io::stdin();
    let stdout = io::stdout();
    play_pattern_quiz(
        &mut stdin.lock(),
        &mut stdout.lock(),
        &bank,
        &game,
        fixed,
        &mut rng,
    )?;
    Ok(())
}

fn run_predict(
    config: Option<&Path>,
    rounds: Option<u32>,
    length: Option<usize>,
    seed: Option<u64>,
) -> Result<(), QuizError> {
    let (mut game, _) = load_session(config)?;
    if let Some(r) = rounds {
        game.rounds = r;
    }
    if let Some(l) = length {
        game.walk_length = l;
    }
    let mut rng = make_rng(seed.or(game.seed));

    let stdin = io::stdin();
    let stdout = io::stdout();
    play_prediction_quiz(&mut stdin.lock(), &mut stdout.lock(), &game, &mut rng)?;
    Ok(())
}

/// Prompt until a number in `1..=count` is entered. `None` on EOF or `q`.
pub fn read_choice<I: BufRead, O: Write>(
    input: &mut I,
    output: &mut O,
    count: usize,
) -> Result<Option<usize>, QuizError> {
    loop {
        write!(output, "Your answer (1-{count}, q to quit): ")?;
        output.flush()?;
        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            writeln!(output)?;
            return Ok(None);
        }
        let line = line.trim();
        if line.eq_ignore_ascii_case("q") {
            return Ok(None);
        }
        match line.parse::<usize>() {
            Ok(n) if (1..=count).contains(&n) => return Ok(Some(n)),
            _ => writeln!(output, "Please enter a number between 1 and {count}.")?,
        }
    }
}

fn write_score<O: Write>(output: &mut O, board: &ScoreBoard) -> Result<(), QuizError> {
    writeln!(
        output,
        "Score: {} correct, {} incorrect (streak {}, best {})",
        board.correct, board.incorrect, board.streak, board.best_streak
    )?;
    Ok(())
}

fn write_summary<O: Write>(output: &mut O, board: &ScoreBoard) -> Result<(), QuizError> {
    writeln!(output, "\n=== Session summary ===")?;
    write_score(output, board)?;
    if let Some(acc) = board.accuracy() {
        writeln!(output, "Accuracy: {:.0}%", acc * 100.0)?;
    }
    if let Some(weak) = board.weakest_pattern() {
        writeln!(
            output,
            "Most missed pattern: {} ({} misses)",
            weak,
            board.misses(weak)
        )?;
    }
    Ok(())
}

/// Pattern meaning quiz: show a generated pattern, ask what it implies.
pub fn play_pattern_quiz<I: BufRead, O: Write, R: Rng + ?Sized>(
    input: &mut I,
    output: &mut O,
    bank: &QuestionBank,
    game: &GameConfig,
    pattern: Option<Archetype>,
    rng: &mut R,
) -> Result<ScoreBoard, QuizError> {
    let mut board = ScoreBoard::new();

    for round in 1..=game.rounds {
        let archetype = match pattern {
            Some(a) => a,
            None => *Archetype::ALL.choose(rng).unwrap_or(&Archetype::Doji),
        };
        let series = generate_pattern(archetype, rng)?;
        let question = bank.build_question(archetype, rng)?;
        debug!(round, pattern = %archetype, "pattern round");

        writeln!(output, "\nRound {round}/{}: {archetype}", game.rounds)?;
        write!(output, "{}", text_chart::render(&series, DEFAULT_HEIGHT))?;
        writeln!(output, "{}", question.prompt)?;
        for (i, choice) in question.choices.iter().enumerate() {
            writeln!(output, "  {}. {}", i + 1, choice)?;
        }

        let Some(n) = read_choice(input, output, question.choices.len())? else {
            break;
        };
        let correct = question.is_correct(question.choice(n)?);
        if correct {
            writeln!(output, "Correct!")?;
        } else {
            writeln!(output, "Incorrect. The answer was: {}", question.correct_answer)?;
        }
        writeln!(output, "{}", question.explanation)?;
        board = board.record_pattern(archetype, correct);
        write_score(output, &board)?;
    }

    write_summary(output, &board)?;
    Ok(board)
}

/// Next-candle quiz: show a walk with its final candle hidden, ask for the
/// hidden candle's classification.
pub fn play_prediction_quiz<I: BufRead, O: Write, R: Rng + ?Sized>(
    input: &mut I,
    output: &mut O,
    game: &GameConfig,
    rng: &mut R,
) -> Result<ScoreBoard, QuizError> {
    let mut board = ScoreBoard::new();

    for round in 1..=game.rounds {
        let series = generate_walk_with(game.walk_length, &game.walk, rng)?;
        let prediction = PredictionRound::from_series(&series, game.threshold)?;
        debug!(round, answer = %prediction.answer, "prediction round");

        writeln!(output, "\nRound {round}/{}: what comes next?", game.rounds)?;
        write!(
            output,
            "{}",
            text_chart::render_with_placeholder(&prediction.visible, DEFAULT_HEIGHT)
        )?;
        if prediction.visible.len() >= CONTEXT_WINDOW {
            writeln!(output, "{}", explain_context(&prediction.visible)?)?;
        }
        for (i, label) in Label::ALL.iter().enumerate() {
            writeln!(output, "  {}. {}", i + 1, label)?;
        }

        let Some(n) = read_choice(input, output, Label::ALL.len())? else {
            break;
        };
        let guess = Label::ALL[n - 1];
        let correct = prediction.is_correct(guess);
        if correct {
            writeln!(output, "Correct! It was a {}.", prediction.answer)?;
        } else {
            writeln!(output, "Incorrect. It was a {}.", prediction.answer)?;
        }
        writeln!(output, "{}", explain_label(prediction.answer))?;
        board = board.record(correct);
        write_score(output, &board)?;
    }

    write_summary(output, &board)?;
    Ok(board)
}
