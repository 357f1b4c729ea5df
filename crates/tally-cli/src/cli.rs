use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "tally",
    about = "Tally: a local points ledger for daily tasks, bounties, and rewards",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Config file (defaults to ./tally.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Data file, overriding the config
    #[arg(long, global = true)]
    pub data_file: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create the data file and seed starter content
    Init,
    /// Show today's points, balance, and level
    Status(StatusArgs),
    /// Manage daily tasks
    Task(TaskArgs),
    /// Manage rewards and redeem them
    Reward(RewardArgs),
    /// Manage one-off bounties
    Bounty(BountyArgs),
    /// Edit the level tiers
    Level(LevelArgs),
    /// Show daily earnings, bounty awards, and redemptions
    History(HistoryArgs),
    /// Write a backup of every collection
    Export(ExportArgs),
    /// Restore every collection from a backup
    Import(ImportArgs),
}

#[derive(Args)]
pub struct StatusArgs {
    /// Day to report on (YYYY-MM-DD, defaults to today)
    #[arg(long)]
    pub date: Option<String>,
}

#[derive(Args)]
pub struct TaskArgs {
    #[command(subcommand)]
    pub action: Option<TaskAction>,
}

#[derive(Subcommand)]
pub enum TaskAction {
    /// List tasks with today's check marks
    List {
        #[arg(long)]
        date: Option<String>,
    },
    Add { title: String, points: String },
    /// Check or uncheck a task for a day
    Done {
        id: String,
        #[arg(long)]
        date: Option<String>,
    },
    /// Shelve an active task or put a shelved one back
    Toggle { id: String },
    /// Delete a shelved task
    Delete { id: String },
}

#[derive(Args)]
pub struct RewardArgs {
    #[command(subcommand)]
    pub action: Option<RewardAction>,
}

#[derive(Subcommand)]
pub enum RewardAction {
    List,
    Add {
        name: String,
        cost: String,
        #[arg(short, long)]
        description: Option<String>,
    },
    Redeem { id: String },
    Toggle { id: String },
    Delete { id: String },
}

#[derive(Args)]
pub struct BountyArgs {
    #[command(subcommand)]
    pub action: Option<BountyAction>,
}

#[derive(Subcommand)]
pub enum BountyAction {
    List,
    Add {
        title: String,
        points: String,
        /// Last day the bounty can be completed (YYYY-MM-DD)
        #[arg(long)]
        deadline: String,
    },
    Complete { id: String },
    Toggle { id: String },
    Delete { id: String },
}

#[derive(Args)]
pub struct LevelArgs {
    #[command(subcommand)]
    pub action: Option<LevelAction>,
}

#[derive(Subcommand)]
pub enum LevelAction {
    List,
    /// Append a tier with default settings
    Add,
    Set {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long, allow_hyphen_values = true)]
        span: Option<i64>,
        #[arg(long, allow_hyphen_values = true)]
        segments: Option<i64>,
    },
    Move { id: String, direction: MoveDirection },
    Delete { id: String },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum MoveDirection {
    Up,
    Down,
}

#[derive(Args)]
pub struct HistoryArgs {
    #[arg(short = 'n', long, default_value = "30")]
    pub limit: usize,
}

#[derive(Args)]
pub struct ExportArgs {
    /// Output file (defaults to a timestamped name in the current directory)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Args)]
pub struct ImportArgs {
    pub path: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_init() {
        let cli = Cli::try_parse_from(["tally", "init"]).unwrap();
        assert!(matches!(cli.command, Command::Init));
    }

    #[test]
    fn parse_task_add() {
        let cli = Cli::try_parse_from(["tally", "task", "add", "Read", "20"]).unwrap();
        if let Command::Task(TaskArgs { action: Some(TaskAction::Add { title, points }) }) = cli.command {
            assert_eq!(title, "Read");
            assert_eq!(points, "20");
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_task_done_with_date() {
        let cli = Cli::try_parse_from(["tally", "task", "done", "t_read", "--date", "2024-06-01"]).unwrap();
        if let Command::Task(TaskArgs { action: Some(TaskAction::Done { id, date }) }) = cli.command {
            assert_eq!(id, "t_read");
            assert_eq!(date, Some("2024-06-01".into()));
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_bare_task_lists() {
        let cli = Cli::try_parse_from(["tally", "task"]).unwrap();
        assert!(matches!(cli.command, Command::Task(TaskArgs { action: None })));
    }

    #[test]
    fn parse_reward_add_with_description() {
        let cli = Cli::try_parse_from(["tally", "reward", "add", "Cake", "90", "-d", "Slice"]).unwrap();
        if let Command::Reward(RewardArgs { action: Some(RewardAction::Add { description, .. }) }) = cli.command {
            assert_eq!(description, Some("Slice".into()));
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_bounty_requires_deadline() {
        assert!(Cli::try_parse_from(["tally", "bounty", "add", "Taxes", "200"]).is_err());
        let cli = Cli::try_parse_from(["tally", "bounty", "add", "Taxes", "200", "--deadline", "2024-06-30"]).unwrap();
        assert!(matches!(cli.command, Command::Bounty(_)));
    }

    #[test]
    fn parse_level_set_negative_span() {
        let cli = Cli::try_parse_from(["tally", "level", "set", "lv_a", "--span", "-5"]).unwrap();
        if let Command::Level(LevelArgs { action: Some(LevelAction::Set { span, name, .. }) }) = cli.command {
            assert_eq!(span, Some(-5));
            assert_eq!(name, None);
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_level_move() {
        let cli = Cli::try_parse_from(["tally", "level", "move", "lv_a", "down"]).unwrap();
        if let Command::Level(LevelArgs { action: Some(LevelAction::Move { direction, .. }) }) = cli.command {
            assert_eq!(direction, MoveDirection::Down);
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_export_output() {
        let cli = Cli::try_parse_from(["tally", "export", "-o", "/tmp/b.json"]).unwrap();
        if let Command::Export(args) = cli.command {
            assert_eq!(args.output, Some(PathBuf::from("/tmp/b.json")));
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_verbose() {
        let cli = Cli::try_parse_from(["tally", "--verbose", "status"]).unwrap();
        assert!(cli.verbose);
    }

    #[test]
    fn parse_json_format() {
        let cli = Cli::try_parse_from(["tally", "--format", "json", "status"]).unwrap();
        assert_eq!(cli.format, OutputFormat::Json);
    }

    #[test]
    fn parse_global_paths() {
        let cli = Cli::try_parse_from(["tally", "history", "--config", "a.toml", "--data-file", "d.json"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("a.toml")));
        assert_eq!(cli.data_file, Some(PathBuf::from("d.json")));
    }
}
