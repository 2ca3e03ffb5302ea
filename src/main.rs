use std::io::{self, BufRead, Write};
use std::thread;
use std::time::Duration;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use rand::Rng;
use thiserror::Error;
use tracing::warn;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use farkle_engine::game::{
    Decision, DiceRoller, Phase, TurnEnd, ACTION_CONTINUE, ACTION_ROLL, ANIMATION_FRAMES,
    ANIMATION_FRAME_MS, DICE_COUNT, FACE_COUNT, MAX_PLAYERS, MIN_PLAYERS,
};
use farkle_engine::service::{
    action_mask_from_session, create_session, observation_from_session, roll_statistics,
    GameSession, RollOutcome, Snapshot,
};

// ============================================================================
// 命令列參數
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "farkle", version, about = "Turn-based multiplayer dice scoring game")]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    #[command(flatten)]
    play: PlayArgs,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Roll many dice pools and report distribution / bust statistics
    Stats(StatsArgs),
}

#[derive(Args, Debug)]
struct PlayArgs {
    /// Seed for the game's dice (random when absent)
    #[arg(long, env = "FARKLE_SEED")]
    seed: Option<u64>,

    /// Number of players (2-8); prompted when absent
    #[arg(long, value_parser = parse_player_count)]
    players: Option<usize>,

    /// Player name, repeat once per player
    #[arg(long = "name")]
    names: Vec<String>,

    /// Skip the roll animation
    #[arg(long)]
    no_animation: bool,

    #[arg(long, default_value_t = ANIMATION_FRAMES)]
    animation_frames: u32,

    #[arg(long, default_value_t = ANIMATION_FRAME_MS)]
    frame_ms: u64,

    /// Print a JSON snapshot after every state change
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
struct StatsArgs {
    #[arg(long, default_value_t = 100_000)]
    rolls: u64,

    #[arg(long, default_value_t = DICE_COUNT)]
    dice: usize,

    #[arg(long, default_value_t = 0)]
    seed: u64,
}

/// 玩家輸入錯誤（只在呈現層處理，不進入核心）
#[derive(Debug, Error, PartialEq, Eq)]
enum InputError {
    #[error("please enter a number")]
    NotANumber,
    #[error(
        "the number of players must be between {min} and {max}",
        min = MIN_PLAYERS,
        max = MAX_PLAYERS
    )]
    PlayerCountOutOfRange(usize),
    #[error("{names} names given for {players} players")]
    TooManyNames { players: usize, names: usize },
    #[error("please answer y (roll again) or n (bank)")]
    UnknownDecision,
}

fn parse_player_count(input: &str) -> Result<usize, InputError> {
    let count: usize = input.trim().parse().map_err(|_| InputError::NotANumber)?;
    check_player_count(count)
}

fn check_player_count(count: usize) -> Result<usize, InputError> {
    if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&count) {
        return Err(InputError::PlayerCountOutOfRange(count));
    }
    Ok(count)
}

fn parse_decision(input: &str) -> Result<Decision, InputError> {
    match input.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" | "c" | "continue" => Ok(Decision::Continue),
        "n" | "no" | "b" | "bank" => Ok(Decision::Bank),
        _ => Err(InputError::UnknownDecision),
    }
}

// ============================================================================
// 終端機互動
// ============================================================================

struct Console<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// 讀一行；輸入結束或 `q` 代表離開
    fn prompt(&mut self, message: &str) -> Result<Option<String>> {
        write!(self.output, "{}", message)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let line = line.trim().to_string();
        if line.eq_ignore_ascii_case("q") {
            return Ok(None);
        }
        Ok(Some(line))
    }

    fn say(&mut self, message: &str) -> Result<()> {
        writeln!(self.output, "{}", message)?;
        Ok(())
    }
}

/// 擲骰動畫：只在畫面上顯示亂數骰面，不動用遊戲的亂數來源
struct Animation {
    frames: u32,
    frame: Duration,
}

impl Animation {
    fn from_args(args: &PlayArgs) -> Self {
        Self {
            frames: if args.no_animation { 0 } else { args.animation_frames },
            frame: Duration::from_millis(args.frame_ms),
        }
    }

    fn play<R: BufRead, W: Write>(&self, console: &mut Console<R, W>, dice: usize) -> Result<()> {
        if self.frames == 0 {
            return Ok(());
        }
        let mut rng = rand::thread_rng();
        for _ in 0..self.frames {
            let faces: Vec<u8> = (0..dice).map(|_| rng.gen_range(1..=FACE_COUNT as u8)).collect();
            write!(console.output, "\r  {}", format_faces(&faces, None))?;
            console.output.flush()?;
            thread::sleep(self.frame);
        }
        writeln!(console.output)?;
        Ok(())
    }
}

fn format_faces(faces: &[u8], scoring: Option<&[bool]>) -> String {
    faces
        .iter()
        .enumerate()
        .map(|(i, face)| match scoring {
            Some(flags) if flags.get(i).copied().unwrap_or(false) => format!("[{}]", face),
            _ => format!(" {} ", face),
        })
        .collect::<Vec<_>>()
        .join("")
}

fn default_name(index: usize) -> String {
    format!("Player {}", index + 1)
}

// ============================================================================
// 開局設定
// ============================================================================

fn prompt_player_count<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
) -> Result<Option<usize>> {
    loop {
        let message = format!("Enter the number of players ({}-{}): ", MIN_PLAYERS, MAX_PLAYERS);
        let Some(input) = console.prompt(&message)? else {
            return Ok(None);
        };
        match parse_player_count(&input) {
            Ok(count) => return Ok(Some(count)),
            Err(e) => {
                warn!(input = %input, error = %e, "rejected player count");
                console.say(&e.to_string())?;
            }
        }
    }
}

fn setup_players<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    args: &PlayArgs,
) -> Result<Option<Vec<String>>> {
    let count = match args.players {
        Some(count) if args.names.len() > count => {
            return Err(InputError::TooManyNames {
                players: count,
                names: args.names.len(),
            }
            .into());
        }
        Some(count) => count,
        None if !args.names.is_empty() => check_player_count(args.names.len())?,
        None => match prompt_player_count(console)? {
            Some(count) => count,
            None => return Ok(None),
        },
    };

    let mut names = Vec::with_capacity(count);
    for i in 0..count {
        if let Some(name) = args.names.get(i) {
            names.push(name.clone());
            continue;
        }
        let Some(input) = console.prompt(&format!("Enter the name of player {}: ", i + 1))? else {
            return Ok(None);
        };
        names.push(if input.is_empty() { default_name(i) } else { input });
    }
    Ok(Some(names))
}

// ============================================================================
// 遊戲迴圈
// ============================================================================

fn render<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    snap: &Snapshot,
    json: bool,
) -> Result<()> {
    if json {
        return console.say(&snap.to_json().to_string());
    }

    if snap.phase == Phase::TurnEnded {
        if let Some((name, end)) = &snap.last_turn {
            match end {
                TurnEnd::Bust { forfeited } => console.say(&format!(
                    "No scoring dice! {} loses {} points this turn.",
                    name, forfeited
                ))?,
                TurnEnd::Banked { amount } => {
                    console.say(&format!("{} banks {} points.", name, amount))?
                }
            }
        }
        let board: Vec<String> = snap
            .scoreboard
            .iter()
            .map(|line| format!("{}: {}", line.name, line.total_score))
            .collect();
        console.say(&format!("Scores: {}", board.join(", ")))?;
    }
    Ok(())
}

fn report_roll<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    outcome: &RollOutcome,
) -> Result<()> {
    console.say(&format!(
        "Rolled: {}  (gain {}, pool {})",
        format_faces(&outcome.faces, Some(&outcome.score.scoring_dice)),
        outcome.score.gained,
        outcome.score.pool_score
    ))
}

fn play<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    session: &mut GameSession,
    animation: &Animation,
    json: bool,
) -> Result<()> {
    loop {
        let snap = observation_from_session(session);
        render(console, &snap, json)?;

        if let Some(winner) = &snap.winner {
            console.say(&format!("{} wins with {} points!", winner.name, winner.total_score))?;
            return Ok(());
        }

        let mask = action_mask_from_session(session);
        if mask[ACTION_ROLL] {
            let message = format!(
                "{}'s turn (total {}). Press Enter to roll, q to quit: ",
                snap.current_player, snap.total_score
            );
            if console.prompt(&message)?.is_none() {
                return Ok(());
            }
            animation.play(console, session.turn().dice_to_roll())?;
            let outcome = session.roll()?;
            if !json {
                report_roll(console, &outcome)?;
            }
        } else if mask[ACTION_CONTINUE] {
            let message = format!(
                "{}, you have {} points this turn. Roll again? [y/n]: ",
                snap.current_player, snap.current_score
            );
            let Some(input) = console.prompt(&message)? else {
                return Ok(());
            };
            match parse_decision(&input) {
                Ok(decision) => {
                    session.submit_decision(decision)?;
                }
                Err(e) => {
                    warn!(input = %input, "rejected decision");
                    console.say(&e.to_string())?;
                }
            }
        }
    }
}

fn run_play(args: PlayArgs) -> Result<()> {
    let stdin = io::stdin();
    let mut console = Console::new(stdin.lock(), io::stdout());

    let Some(names) = setup_players(&mut console, &args)? else {
        return Ok(());
    };
    let roller = match args.seed {
        Some(seed) => DiceRoller::new(seed),
        None => DiceRoller::from_entropy(),
    };
    let mut session = create_session(names.len(), names, roller)?;
    let animation = Animation::from_args(&args);

    play(&mut console, &mut session, &animation, args.json)
}

fn run_stats(args: StatsArgs) -> Result<()> {
    let stats = roll_statistics(args.rolls, args.dice, args.seed);

    println!("Rolls:        {}", stats.rolls);
    println!("Bust rate:    {:.4}", stats.bust_rate());
    println!("Mean gain:    {:.2} (qualifying rolls)", stats.mean_gain());
    for (idx, count) in stats.face_counts.iter().enumerate() {
        println!("Face {}:       {}", idx + 1, count);
    }
    println!("Chi-square:   {:.3} (5 d.f.)", stats.chi_square());
    Ok(())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(true).with_writer(io::stderr))
        .init();
}

fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    match cli.command {
        Some(Command::Stats(args)) => run_stats(args),
        None => run_play(cli.play),
    }
}

// ============================================================================
// 單元測試
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn console(input: &str) -> Console<Cursor<Vec<u8>>, Vec<u8>> {
        Console::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    fn quiet_args() -> PlayArgs {
        PlayArgs {
            seed: Some(7),
            players: None,
            names: Vec::new(),
            no_animation: true,
            animation_frames: ANIMATION_FRAMES,
            frame_ms: 0,
            json: false,
        }
    }

    #[test]
    fn test_parse_player_count() {
        assert_eq!(parse_player_count("3"), Ok(3));
        assert_eq!(parse_player_count(" 8 "), Ok(8));
        assert_eq!(parse_player_count("1"), Err(InputError::PlayerCountOutOfRange(1)));
        assert_eq!(parse_player_count("9"), Err(InputError::PlayerCountOutOfRange(9)));
        assert_eq!(parse_player_count("two"), Err(InputError::NotANumber));
    }

    #[test]
    fn test_parse_decision() {
        assert_eq!(parse_decision("y"), Ok(Decision::Continue));
        assert_eq!(parse_decision("Bank"), Ok(Decision::Bank));
        assert_eq!(parse_decision("maybe"), Err(InputError::UnknownDecision));
    }

    #[test]
    fn test_player_count_prompt_retries() {
        let mut c = console("abc\n12\n3\n");
        assert_eq!(prompt_player_count(&mut c).unwrap(), Some(3));
        let out = String::from_utf8(c.output).unwrap();
        assert!(out.contains("please enter a number"));
        assert!(out.contains("between 2 and 8"));
    }

    #[test]
    fn test_setup_players_defaults_blank_names() {
        let mut c = console("2\nAnn\n\n");
        let names = setup_players(&mut c, &quiet_args()).unwrap();
        assert_eq!(names, Some(vec!["Ann".to_string(), "Player 2".to_string()]));
    }

    #[test]
    fn test_setup_players_from_flags() {
        let mut args = quiet_args();
        args.names = vec!["X".into(), "Y".into(), "Z".into()];
        let mut c = console("");
        let names = setup_players(&mut c, &args).unwrap();
        assert_eq!(names.map(|n| n.len()), Some(3));
    }

    #[test]
    fn test_setup_players_rejects_extra_names() {
        let mut args = quiet_args();
        args.players = Some(2);
        args.names = vec!["X".into(), "Y".into(), "Z".into()];
        let mut c = console("");
        let err = setup_players(&mut c, &args).unwrap_err();
        assert_eq!(
            err.downcast_ref::<InputError>(),
            Some(&InputError::TooManyNames {
                players: 2,
                names: 3
            })
        );

        // 名字少於人數時其餘照常詢問
        args.players = Some(3);
        args.names = vec!["X".into()];
        let mut c = console("Y\n\n");
        let names = setup_players(&mut c, &args).unwrap();
        assert_eq!(
            names,
            Some(vec!["X".to_string(), "Y".to_string(), "Player 3".to_string()])
        );
    }

    #[test]
    fn test_setup_players_flag_count_out_of_range() {
        let mut args = quiet_args();
        args.names = vec!["Solo".into()];
        let mut c = console("");
        let err = setup_players(&mut c, &args).unwrap_err();
        assert_eq!(
            err.downcast_ref::<InputError>(),
            Some(&InputError::PlayerCountOutOfRange(1))
        );
    }

    #[test]
    fn test_quit_during_setup() {
        let mut c = console("q\n");
        assert_eq!(setup_players(&mut c, &quiet_args()).unwrap(), None);
    }

    #[test]
    fn test_play_until_input_ends() {
        let mut session = create_session(
            2,
            vec!["Ann".into(), "Ben".into()],
            DiceRoller::new(3),
        )
        .unwrap();
        let animation = Animation::from_args(&quiet_args());
        let mut c = console(&"\nn\n".repeat(10));

        play(&mut c, &mut session, &animation, false).unwrap();
        let out = String::from_utf8(c.output).unwrap();
        assert!(out.contains("Ann's turn"));
        assert!(out.contains("Rolled:"));
    }

    #[test]
    fn test_json_output_lines() {
        let mut session = create_session(
            2,
            vec!["Ann".into(), "Ben".into()],
            DiceRoller::new(3),
        )
        .unwrap();
        let animation = Animation::from_args(&quiet_args());
        let mut c = console("\n");

        play(&mut c, &mut session, &animation, true).unwrap();
        let out = String::from_utf8(c.output).unwrap();
        assert!(out.lines().next().unwrap().starts_with("{\"active_dice\""));
    }

    #[test]
    fn test_format_faces_marks_scoring_dice() {
        assert_eq!(
            format_faces(&[1, 2, 5], Some(&[true, false, true])),
            "[1] 2 [5]"
        );
        assert_eq!(format_faces(&[3, 4], None), " 3  4 ");
    }
}
