use anyhow::Result;
use sideline::config::Config;
use sideline::engine::clock::{self, Half, Team};
use sideline::engine::ledger::{Field, FieldEdit, PlayRecord, Side};
use sideline::pipeline::StatsPipeline;
use sideline::GameSession;
use std::path::Path;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};

/// One line of operator input.
#[derive(Debug, Clone, PartialEq)]
enum Command {
    Score { own: String, opp: String },
    Set { side: Side, row: usize, edit: FieldEdit },
    Clear(Side),
    Show(Side),
    Stats,
    Clock(String),
    Nudge(i32),
    Ball(Team),
    Half(Half),
    Timeout(Team),
    Advise {
        snaps: Option<u32>,
        play_clock: Option<u32>,
        play_time: Option<u32>,
    },
    Kickoff(Team),
    Opponent(String),
    Officials(Crew),
    Reset,
    Help,
    Quit,
}

/// `officials` subcommands.
#[derive(Debug, Clone, PartialEq)]
enum Crew {
    Show,
    HeadRef(String),
    SideJudge(String),
    Clear,
}

const HELP: &str = "\
  score <us> <them>             set both scores
  set <off|def> <row> <field> <value...>
                                fields: yard, down, dist, call, gain, nd
  clear <off|def>               wipe one side's ledger
  show <off|def>                list filled rows
  stats                         latest analytics (JSON)
  clock <m:ss> | clock <+/-s>   set or nudge the game clock
  ball <us|them>                who has possession
  half <1|2>                    current half
  timeout <us|them>             charge a timeout
  advise [snaps] [pc] [pt]      clock management advice
  kickoff <us|them>             opening kickoff receiver
  opp <name>                    opponent name
  officials [ref|judge <name>]  show or set the crew (officials clear)
  reset                         new game
  quit";

fn parse_command(line: &str) -> Result<Command, String> {
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Err("empty command".to_string());
    };
    let rest: Vec<&str> = words.collect();

    match head.to_ascii_lowercase().as_str() {
        "score" => match rest.as_slice() {
            [own, opp] => Ok(Command::Score {
                own: own.to_string(),
                opp: opp.to_string(),
            }),
            // a single value means the opponent cell is blank
            [own] => Ok(Command::Score {
                own: own.to_string(),
                opp: String::new(),
            }),
            _ => Err("usage: score <us> <them>".to_string()),
        },
        "set" => {
            if rest.len() < 3 {
                return Err("usage: set <off|def> <row> <field> <value...>".to_string());
            }
            let side: Side = rest[0].parse()?;
            let row: usize = rest[1]
                .parse()
                .map_err(|_| format!("bad row '{}'", rest[1]))?;
            if row == 0 {
                return Err("rows start at 1".to_string());
            }
            let field: Field = rest[2].parse()?;
            let value = rest[3..].join(" ");
            Ok(Command::Set {
                side,
                row: row - 1,
                edit: FieldEdit::parse(field, &value),
            })
        }
        "clear" => Ok(Command::Clear(one_arg(&rest, "clear <off|def>")?.parse()?)),
        "show" => Ok(Command::Show(one_arg(&rest, "show <off|def>")?.parse()?)),
        "stats" => Ok(Command::Stats),
        "clock" => {
            let arg = one_arg(&rest, "clock <m:ss> | clock <+/-secs>")?;
            if arg.starts_with('+') || arg.starts_with('-') {
                let delta: i32 = arg.parse().map_err(|_| format!("bad delta '{}'", arg))?;
                Ok(Command::Nudge(delta))
            } else {
                Ok(Command::Clock(arg.to_string()))
            }
        }
        "ball" => Ok(Command::Ball(one_arg(&rest, "ball <us|them>")?.parse()?)),
        "half" => Ok(Command::Half(one_arg(&rest, "half <1|2>")?.parse()?)),
        "timeout" | "to" => Ok(Command::Timeout(one_arg(&rest, "timeout <us|them>")?.parse()?)),
        "advise" => {
            if rest.len() > 3 {
                return Err("usage: advise [snaps] [play_clock] [play_time]".to_string());
            }
            let nums = rest
                .iter()
                .map(|w| w.parse::<u32>().map_err(|_| format!("bad number '{}'", w)))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Command::Advise {
                snaps: nums.first().copied(),
                play_clock: nums.get(1).copied(),
                play_time: nums.get(2).copied(),
            })
        }
        "kickoff" => Ok(Command::Kickoff(one_arg(&rest, "kickoff <us|them>")?.parse()?)),
        "opp" | "opponent" => Ok(Command::Opponent(rest.join(" "))),
        "officials" | "crew" => {
            let name = rest.get(1..).unwrap_or_default().join(" ");
            match rest.first().map(|w| w.to_ascii_lowercase()).as_deref() {
                None => Ok(Command::Officials(Crew::Show)),
                Some("ref" | "referee" | "head") => Ok(Command::Officials(Crew::HeadRef(name))),
                Some("judge" | "sj" | "side") => Ok(Command::Officials(Crew::SideJudge(name))),
                Some("clear") => Ok(Command::Officials(Crew::Clear)),
                Some(other) => Err(format!("unknown officials role '{}'", other)),
            }
        }
        "reset" => Ok(Command::Reset),
        "help" | "?" => Ok(Command::Help),
        "quit" | "exit" | "q" => Ok(Command::Quit),
        other => Err(format!("unknown command '{}' (try help)", other)),
    }
}

fn one_arg<'a>(rest: &[&'a str], usage: &str) -> Result<&'a str, String> {
    match rest {
        [arg] => Ok(*arg),
        _ => Err(format!("usage: {}", usage)),
    }
}

fn format_row(index: usize, record: &PlayRecord) -> String {
    let cell = |v: Option<i32>| v.map(|n| n.to_string()).unwrap_or_else(|| "-".to_string());
    let yard = record
        .yard_line
        .map(|y| if y.abs() == 50 { "50".to_string() } else { format!("{:+}", y) })
        .unwrap_or_else(|| "-".to_string());
    let gain = record
        .gain
        .map(|g| g.to_string())
        .unwrap_or_else(|| "-".to_string());
    format!(
        "  {:>3} | {:>4} | {}&{:<3} | {:>4} | {}{}",
        index + 1,
        yard,
        cell(record.down),
        cell(record.distance),
        gain,
        record.call_text,
        if record.new_drive { "  [new drive]" } else { "" },
    )
}

/// Run one command. Returns `false` when the loop should stop.
fn execute(command: Command, session: &mut GameSession, pipeline: &StatsPipeline) -> Result<bool> {
    match command {
        Command::Score { own, opp } => {
            let report = session.set_scores(&own, &opp);
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Command::Set { side, row, edit } => {
            if row >= session.ledger().capacity() {
                println!("  ? row {} is past the end of the ledger", row + 1);
                return Ok(true);
            }
            let ledger = session.edit_play(side, row, edit);
            pipeline.submit(ledger);
            if let Some(record) = ledger.record(side, row) {
                println!("{}", format_row(row, record));
            }
            if let Some(next) = ledger.record(side, row + 1).filter(|r| !r.is_empty()) {
                println!("{}", format_row(row + 1, next));
            }
        }
        Command::Clear(side) => {
            session.clear_side(side);
            pipeline.submit(session.ledger());
            println!("  {} cleared", side);
        }
        Command::Show(side) => {
            let filled: Vec<_> = session
                .ledger()
                .records(side)
                .iter()
                .enumerate()
                .filter(|(_, r)| !r.is_empty())
                .collect();
            if filled.is_empty() {
                println!("  ({} ledger is empty)", side);
            }
            for (i, record) in filled {
                println!("{}", format_row(i, record));
            }
        }
        Command::Stats => {
            let report = pipeline.latest();
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Command::Clock(text) => {
            session.set_clock(&text);
            println!("  clock {}", clock::format_mmss(session.time_left()));
        }
        Command::Nudge(delta) => {
            session.adjust_clock(delta);
            println!("  clock {}", clock::format_mmss(session.time_left()));
        }
        Command::Ball(team) => {
            session.set_ball(team);
            println!("  ball: {}", team);
        }
        Command::Half(half) => {
            session.set_half(half);
            println!(
                "  half {:?}; timeouts us {} / them {}",
                half,
                session.timeouts_left(Team::Us),
                session.timeouts_left(Team::Them)
            );
        }
        Command::Timeout(team) => {
            if session.use_timeout(team) {
                println!("  {} timeout, {} left", team, session.timeouts_left(team));
            } else {
                println!("  {} has no timeouts left this half", team);
            }
        }
        Command::Advise {
            snaps,
            play_clock,
            play_time,
        } => {
            let advice = session.clock_advice(snaps, play_clock, play_time);
            println!("{}", serde_json::to_string_pretty(&advice)?);
        }
        Command::Kickoff(team) => {
            session.set_opening_receiver(team);
            if let Some(receiver) = session.second_half_receiver() {
                println!("  {} receives the second-half kickoff", receiver);
            }
        }
        Command::Opponent(name) => {
            session.set_opponent_name(&name);
            println!("  opponent set");
        }
        Command::Officials(crew) => {
            match crew {
                Crew::Show => {}
                Crew::HeadRef(name) => session.set_head_ref(&name),
                Crew::SideJudge(name) => session.set_side_judge(&name),
                Crew::Clear => session.clear_officials(),
            }
            let lines = session.officials().lines();
            if lines.is_empty() {
                println!("  (no officials entered)");
            }
            for line in lines {
                println!("  {}", line);
            }
        }
        Command::Reset => {
            session.reset();
            pipeline.submit(session.ledger());
            println!("  new game");
        }
        Command::Help => println!("{}", HELP),
        Command::Quit => return Ok(false),
    }
    Ok(true)
}

#[tokio::main]
async fn main() -> Result<()> {
    let log_file = std::fs::File::create("sideline.log")?;
    tracing_subscriber::fmt()
        .with_env_filter("sideline=info")
        .with_writer(log_file)
        .init();

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.toml".to_string());
    let config = Config::load_or_default(Path::new(&config_path))?;

    let mut session = GameSession::new(&config);
    let pipeline = StatsPipeline::spawn(
        session.classifier(),
        session.analytics_config().clone(),
        Duration::from_millis(config.pipeline.debounce_ms),
    );

    println!();
    println!("  Sideline v0.1.0  ({} vs {})", config.team.name, config.team.opponent);
    println!("  ========================");
    println!("  type 'help' for commands");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        match parse_command(&line) {
            Ok(command) => {
                if !execute(command, &mut session, &pipeline)? {
                    break;
                }
            }
            Err(e) => println!("  ? {}", e),
        }
    }

    pipeline.shutdown().await;
    tracing::info!("driver exited");
    Ok(())
}
