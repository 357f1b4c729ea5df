use std::path::PathBuf;

use anyhow::Context;
use chrono::{Local, Utc};
use colored::Colorize;
use serde::Serialize;
use tally_sdk::{
    BountyTask, DailyEntry, Direction, EntityId, FileKvStore, Lifecycle, LocalDate,
    PointsProjection, Standing, Tally, TallyConfig, Task, TierPatch,
};
use tally_types::date::{format_date, parse_date, today_local};
use tally_types::DAILY_POINTS_CAP;

use crate::cli::*;

/// Everything a command needs: the opened ledger and how to print.
struct Session {
    tally: Tally<FileKvStore>,
    config: TallyConfig,
    format: OutputFormat,
}

impl Session {
    fn open(cli: &Cli) -> anyhow::Result<Self> {
        let config = TallyConfig::discover(cli.config.as_deref())?;
        let data_file = cli.data_file.clone().unwrap_or_else(|| config.data_file.clone());
        let tally = Tally::open(&data_file)
            .with_context(|| format!("opening data file {}", data_file.display()))?;
        Ok(Self {
            tally,
            config,
            format: cli.format,
        })
    }

    /// Print `value` as JSON, or run `text` for the human format.
    fn emit<T: Serialize>(&self, value: &T, text: impl FnOnce(&T)) -> anyhow::Result<()> {
        match self.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(value)?),
            OutputFormat::Text => text(value),
        }
        Ok(())
    }

    fn done(&self, message: String) -> anyhow::Result<()> {
        self.emit(&serde_json::json!({ "ok": true, "message": message }), |_| {
            println!("{} {}", "✓".green().bold(), message)
        })
    }
}

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let session = Session::open(&cli)?;
    match cli.command {
        Command::Init => cmd_init(&session),
        Command::Status(args) => cmd_status(&session, args),
        Command::Task(args) => cmd_task(&session, args),
        Command::Reward(args) => cmd_reward(&session, args),
        Command::Bounty(args) => cmd_bounty(&session, args),
        Command::Level(args) => cmd_level(&session, args),
        Command::History(args) => cmd_history(&session, args),
        Command::Export(args) => cmd_export(&session, args),
        Command::Import(args) => cmd_import(&session, args),
    }
}

fn day(arg: Option<&str>) -> anyhow::Result<LocalDate> {
    match arg {
        Some(s) => Ok(parse_date(s)?),
        None => Ok(today_local()),
    }
}

fn entity(id: &str) -> anyhow::Result<EntityId> {
    Ok(EntityId::parse(id)?)
}

fn state_word(state: Lifecycle) -> &'static str {
    match state {
        Lifecycle::Active => "active",
        Lifecycle::Disabled => "shelved",
        Lifecycle::Deleted => "deleted",
    }
}

fn state_label(state: Lifecycle) -> colored::ColoredString {
    match state {
        Lifecycle::Active => state_word(state).green(),
        Lifecycle::Disabled => state_word(state).yellow(),
        Lifecycle::Deleted => state_word(state).red(),
    }
}

fn cmd_init(s: &Session) -> anyhow::Result<()> {
    let seeded = s.tally.ensure_defaults()?;
    let names: Vec<&str> = seeded.iter().map(|k| k.name()).collect();
    s.emit(&names, |names| {
        println!(
            "{} Ledger ready at {}",
            "✓".green().bold(),
            s.tally.store().path().display().to_string().bold()
        );
        if names.is_empty() {
            println!("  Existing data kept.");
        } else {
            println!("  Seeded: {}", names.join(", ").cyan());
        }
    })
}

#[derive(Serialize)]
struct StatusView {
    date: LocalDate,
    points: PointsProjection,
    level: Standing,
}

fn cmd_status(s: &Session, args: StatusArgs) -> anyhow::Result<()> {
    let date = day(args.date.as_deref())?;
    let view = StatusView {
        date,
        points: s.tally.projection(date),
        level: s.tally.standing(),
    };
    s.emit(&view, |v| {
        let p = &v.points;
        println!(
            "{} {}: {} / {}",
            "Earned".bold(),
            format_date(v.date),
            p.today_earned.to_string().green().bold(),
            DAILY_POINTS_CAP
        );
        println!("{} {}", "Balance:".bold(), p.balance.to_string().yellow().bold());
        println!(
            "Lifetime: earned {} (daily {}, bounty {}), spent {}",
            p.lifetime_earned, p.lifetime_daily, p.lifetime_bounty, p.lifetime_spent
        );
        match &v.level {
            Standing::Unconfigured { .. } => println!("Level: {}", v.level.label().dimmed()),
            Standing::Ranked(status) => println!(
                "Level: {}  ({:.0}/{:.0} into sub-level, {}/{} into tier)",
                status.label.cyan().bold(),
                status.sub_progress,
                status.sub_span,
                status.tier_progress,
                status.tier_span
            ),
        }
    })
}

#[derive(Serialize)]
struct TaskRow {
    #[serde(flatten)]
    task: Task,
    completed: bool,
}

fn cmd_task(s: &Session, args: TaskArgs) -> anyhow::Result<()> {
    match args.action.unwrap_or(TaskAction::List { date: None }) {
        TaskAction::List { date } => {
            let date = day(date.as_deref())?;
            let completions = s.tally.completions();
            let rows: Vec<TaskRow> = s
                .tally
                .tasks()
                .into_iter()
                .filter(Task::is_visible)
                .map(|task| TaskRow {
                    completed: completions.is_completed(date, &task.id),
                    task,
                })
                .collect();
            s.emit(&rows, |rows| {
                println!("Tasks for {}", format_date(date).bold());
                for row in rows.iter().filter(|r| r.task.lifecycle.is_active()) {
                    let mark = if row.completed { "[x]".green() } else { "[ ]".normal() };
                    println!("  {} {}  {}  +{}", mark, row.task.id.as_str().dimmed(), row.task.title, row.task.points);
                }
                let shelved: Vec<_> = rows.iter().filter(|r| !r.task.lifecycle.is_active()).collect();
                if !shelved.is_empty() {
                    println!("Shelved");
                    for row in shelved {
                        println!("      {}  {}  +{}", row.task.id.as_str().dimmed(), row.task.title.dimmed(), row.task.points);
                    }
                }
            })
        }
        TaskAction::Add { title, points } => {
            let task = s.tally.add_task(&title, &points)?;
            s.done(format!("Added task {} ({})", task.title, task.id))
        }
        TaskAction::Done { id, date } => {
            let date = day(date.as_deref())?;
            let completed = s.tally.toggle_completion(&entity(&id)?, date)?;
            let earned = s.tally.projection(date).today_earned;
            let verb = if completed { "Checked" } else { "Unchecked" };
            s.done(format!("{verb} {id} on {date}; earned {earned}/{DAILY_POINTS_CAP}"))
        }
        TaskAction::Toggle { id } => {
            let state = s.tally.toggle_task(&entity(&id)?)?;
            s.done(format!("Task {id} is now {}", state_word(state)))
        }
        TaskAction::Delete { id } => {
            s.tally.delete_task(&entity(&id)?)?;
            s.done(format!("Deleted task {id}"))
        }
    }
}

fn cmd_reward(s: &Session, args: RewardArgs) -> anyhow::Result<()> {
    match args.action.unwrap_or(RewardAction::List) {
        RewardAction::List => {
            let rewards: Vec<_> = s.tally.rewards().into_iter().filter(|r| !r.lifecycle.is_deleted()).collect();
            let balance = s.tally.projection(today_local()).balance;
            s.emit(&rewards, |rewards| {
                println!("Balance: {}", balance.to_string().yellow().bold());
                for r in rewards {
                    let cost = if i64::try_from(r.cost).is_ok_and(|c| c <= balance) {
                        r.cost.to_string().green()
                    } else {
                        r.cost.to_string().red()
                    };
                    println!("  {}  {}  {}  [{}]", r.id.as_str().dimmed(), r.name, cost, state_label(r.lifecycle));
                    if let Some(description) = &r.description {
                        println!("      {}", description.dimmed());
                    }
                }
            })
        }
        RewardAction::Add { name, cost, description } => {
            let reward = s.tally.add_reward(&name, &cost, description.as_deref())?;
            s.done(format!("Added reward {} ({})", reward.name, reward.id))
        }
        RewardAction::Redeem { id } => {
            let redemption = s.tally.redeem(&entity(&id)?, Utc::now())?;
            let balance = s.tally.projection(today_local()).balance;
            s.done(format!(
                "Redeemed {} for {}; balance {balance}",
                redemption.reward_name, redemption.cost
            ))
        }
        RewardAction::Toggle { id } => {
            let state = s.tally.toggle_reward(&entity(&id)?)?;
            s.done(format!("Reward {id} is now {}", state_word(state)))
        }
        RewardAction::Delete { id } => {
            s.tally.delete_reward(&entity(&id)?)?;
            s.done(format!("Deleted reward {id}"))
        }
    }
}

fn bounty_status(b: &BountyTask, today: LocalDate) -> colored::ColoredString {
    if b.is_completed() {
        "done".green()
    } else if b.is_expired(today) {
        "expired".red()
    } else {
        state_label(b.lifecycle)
    }
}

fn cmd_bounty(s: &Session, args: BountyArgs) -> anyhow::Result<()> {
    let today = today_local();
    match args.action.unwrap_or(BountyAction::List) {
        BountyAction::List => {
            let bounties: Vec<_> = s.tally.bounties().into_iter().filter(|b| !b.lifecycle.is_deleted()).collect();
            s.emit(&bounties, |bounties| {
                for b in bounties {
                    println!(
                        "  {}  {}  +{}  due {}  [{}]",
                        b.id.as_str().dimmed(),
                        b.title,
                        b.points,
                        format_date(b.deadline),
                        bounty_status(b, today)
                    );
                }
            })
        }
        BountyAction::Add { title, points, deadline } => {
            let bounty = s.tally.add_bounty(&title, &points, &deadline)?;
            s.done(format!("Added bounty {} ({}), due {}", bounty.title, bounty.id, format_date(bounty.deadline)))
        }
        BountyAction::Complete { id } => {
            let record = s.tally.complete_bounty(&entity(&id)?, today, Utc::now())?;
            s.done(format!("Completed {} for +{}", record.title, record.points))
        }
        BountyAction::Toggle { id } => {
            let state = s.tally.toggle_bounty(&entity(&id)?)?;
            s.done(format!("Bounty {id} is now {}", state_word(state)))
        }
        BountyAction::Delete { id } => {
            s.tally.delete_bounty(&entity(&id)?)?;
            s.done(format!("Deleted bounty {id}"))
        }
    }
}

#[derive(Serialize)]
struct LevelRow {
    #[serde(flatten)]
    tier: tally_sdk::LevelTier,
    advice: Option<String>,
    current: bool,
}

fn cmd_level(s: &Session, args: LevelArgs) -> anyhow::Result<()> {
    match args.action.unwrap_or(LevelAction::List) {
        LevelAction::List => {
            let standing = s.tally.standing();
            let current = standing.status().map(|st| st.tier_index);
            let mut usable = 0;
            let rows: Vec<LevelRow> = s
                .tally
                .level_advice()
                .into_iter()
                .map(|(tier, advice)| {
                    let is_current = tier.is_usable() && {
                        usable += 1;
                        current == Some(usable - 1)
                    };
                    LevelRow {
                        advice: advice.map(|a| a.to_string()),
                        current: is_current,
                        tier,
                    }
                })
                .collect();
            s.emit(&rows, |rows| {
                println!("Level: {}", standing.label().cyan().bold());
                for row in rows {
                    let marker = if row.current { "*".green().bold() } else { " ".normal() };
                    println!(
                        "{} {}  {}  span {}  segments {}",
                        marker,
                        row.tier.id.as_str().dimmed(),
                        row.tier.name,
                        row.tier.span,
                        row.tier.segments
                    );
                    if let Some(advice) = &row.advice {
                        println!("      {}", advice.yellow());
                    }
                }
            })
        }
        LevelAction::Add => {
            let tier = s.tally.add_level()?;
            s.done(format!("Added level {} ({})", tier.name, tier.id))
        }
        LevelAction::Set { id, name, span, segments } => {
            let patch = TierPatch { name, span, segments };
            match s.tally.update_level(&entity(&id)?, patch)? {
                Some(advice) if !advice.is_warning() => {
                    s.done(format!("Updated level {id}; it is ignored until fixed: {advice}"))
                }
                Some(advice) => s.done(format!("Updated level {id} ({advice})")),
                None => s.done(format!("Updated level {id}")),
            }
        }
        LevelAction::Move { id, direction } => {
            let direction = match direction {
                MoveDirection::Up => Direction::Up,
                MoveDirection::Down => Direction::Down,
            };
            if s.tally.move_level(&entity(&id)?, direction)? {
                s.done(format!("Moved level {id}; now {}", s.tally.standing().label()))
            } else {
                s.done(format!("Level {id} is already at the end of the list"))
            }
        }
        LevelAction::Delete { id } => {
            s.tally.delete_level(&entity(&id)?)?;
            s.done(format!("Deleted level {id}"))
        }
    }
}

#[derive(Serialize)]
struct HistoryView {
    days: Vec<DailyEntry>,
    bounties: Vec<tally_sdk::BountyCompletion>,
    redemptions: Vec<tally_sdk::Redemption>,
}

fn cmd_history(s: &Session, args: HistoryArgs) -> anyhow::Result<()> {
    let mut bounties = s.tally.bounty_completions();
    bounties.sort_by(|a, b| b.completed_at.cmp(&a.completed_at));
    let mut redemptions = s.tally.redemptions();
    redemptions.sort_by(|a, b| b.date_time.cmp(&a.date_time));
    let view = HistoryView {
        days: s.tally.history().into_iter().take(args.limit).collect(),
        bounties: bounties.into_iter().take(args.limit).collect(),
        redemptions: redemptions.into_iter().take(args.limit).collect(),
    };
    s.emit(&view, |v| {
        println!("{}", "Daily".bold());
        for entry in &v.days {
            println!("  {}  {:>3}/{}  ({} tasks)", format_date(entry.date), entry.earned, DAILY_POINTS_CAP, entry.completed);
        }
        println!("{}", "Bounties".bold());
        for b in &v.bounties {
            let at = b.completed_at.with_timezone(&Local).format("%Y-%m-%d %H:%M");
            println!("  {}  {}  {}", at, b.title, format!("+{}", b.points).green());
        }
        println!("{}", "Redemptions".bold());
        for r in &v.redemptions {
            let at = r.date_time.with_timezone(&Local).format("%Y-%m-%d %H:%M");
            println!("  {}  {}  {}", at, r.reward_name, format!("-{}", r.cost).red());
        }
    })
}

fn cmd_export(s: &Session, args: ExportArgs) -> anyhow::Result<()> {
    let now = Utc::now();
    let path = args
        .output
        .unwrap_or_else(|| PathBuf::from(tally_backup::backup_file_name(now.with_timezone(&Local).naive_local())));
    let backup = s.tally.export_backup(&s.config.app_info(), now)?;
    std::fs::write(&path, backup).with_context(|| format!("writing {}", path.display()))?;
    s.done(format!("Exported backup to {}", path.display()))
}

fn cmd_import(s: &Session, args: ImportArgs) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(&args.path)
        .with_context(|| format!("reading {}", args.path.display()))?;
    let meta = s.tally.import_backup(&text)?;
    let exported = meta.exported_at.unwrap_or_else(|| "unknown time".into());
    s.done(format!("Restored backup exported at {exported}"))
}
