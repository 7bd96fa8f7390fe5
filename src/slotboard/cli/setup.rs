use clap::{CommandFactory, Parser, Subcommand};
use slotboard::model::CardType;
use std::path::PathBuf;

/// Returns the version string, including git hash and commit date for non-release builds.
/// Format: "0.3.2" for releases, "0.3.2@abc1234 2024-01-15 14:30" for dev builds
fn get_version() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("GIT_HASH");
    const GIT_COMMIT_DATE: &str = env!("GIT_COMMIT_DATE");
    const IS_RELEASE: &str = env!("IS_RELEASE");

    use std::sync::OnceLock;
    static VERSION_STRING: OnceLock<String> = OnceLock::new();

    VERSION_STRING.get_or_init(|| {
        if IS_RELEASE == "true" || GIT_HASH.is_empty() {
            VERSION.to_string()
        } else {
            format!("{}@{} {}", VERSION, GIT_HASH, GIT_COMMIT_DATE)
        }
    })
}

#[derive(Parser, Debug)]
#[command(
    name = "slotboard",
    bin_name = "slotboard",
    version = get_version(),
    disable_help_flag = true,
    disable_help_subcommand = true
)]
#[command(about = "Plan posts, promos and reels on a weekly slot board", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Data directory (defaults to $SLOTBOARD_HOME, then the platform data dir)
    #[arg(long, global = true, value_name = "PATH", help_heading = "Options")]
    pub data_dir: Option<PathBuf>,

    /// Shared board document to sync with (overrides the remote-path config)
    #[arg(long, global = true, value_name = "PATH", help_heading = "Options")]
    pub remote: Option<PathBuf>,

    /// More detailed logs (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count, help_heading = "Options")]
    pub verbose: u8,

    /// Print help
    #[arg(short, long, global = true)]
    pub help: bool,
}

/// Command group definitions for help output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandGroup {
    Card,
    View,
    Data,
    Misc,
}

impl CommandGroup {
    pub fn heading(&self) -> &'static str {
        match self {
            CommandGroup::Card => "Card Commands:",
            CommandGroup::View => "Board Views:",
            CommandGroup::Data => "Data Commands:",
            CommandGroup::Misc => "Miscellaneous:",
        }
    }

    /// Returns the group for a given command name
    pub fn for_command(name: &str) -> Option<Self> {
        match name {
            "add" | "rm" | "describe" | "toggle" | "move" | "show" => Some(CommandGroup::Card),
            "pool" | "week" | "calendar" | "stats" => Some(CommandGroup::View),
            "notes" | "export" | "import" => Some(CommandGroup::Data),
            "config" | "help" => Some(CommandGroup::Misc),
            _ => None,
        }
    }

    /// Returns all groups in display order
    pub fn all() -> &'static [CommandGroup] {
        &[
            CommandGroup::Card,
            CommandGroup::View,
            CommandGroup::Data,
            CommandGroup::Misc,
        ]
    }
}

/// Returns the custom grouped help output as a string
pub fn get_grouped_help() -> String {
    let cmd = Cli::command();
    let version = cmd.get_version().unwrap_or("unknown");

    let mut output = String::new();
    output.push_str(&format!("slotboard {version}\n"));
    output.push_str("Plan posts, promos and reels on a weekly slot board\n");
    output.push('\n');
    output.push_str("Usage: slotboard [OPTIONS] [COMMAND]\n");

    let subcommands: Vec<_> = cmd.get_subcommands().collect();

    for group in CommandGroup::all() {
        let group_cmds: Vec<_> = subcommands
            .iter()
            .filter(|sc| {
                !sc.is_hide_set() && CommandGroup::for_command(sc.get_name()) == Some(*group)
            })
            .collect();

        if !group_cmds.is_empty() {
            output.push('\n');
            output.push_str(&format!("{}\n", group.heading()));
            for sc in group_cmds {
                let name = sc.get_name();
                let about = sc.get_about().map(|s| s.to_string()).unwrap_or_default();
                output.push_str(&format!("  {:<12} {}\n", name, about));
            }
        }
    }

    output.push('\n');
    output.push_str("Options:\n");
    output.push_str("      --data-dir <PATH>  Data directory\n");
    output.push_str("      --remote <PATH>    Shared board document to sync with\n");
    output.push_str("  -v, --verbose          More detailed logs\n");
    output.push_str("  -h, --help             Print help\n");
    output.push_str("  -V, --version          Print version\n");

    output
}

pub fn print_grouped_help() {
    print!("{}", get_grouped_help());
}

/// Prints help for a command by name, falling back to the grouped listing
pub fn print_help_for_command(name: &str) {
    let mut cmd = Cli::command();

    for subcmd in cmd.get_subcommands_mut() {
        if subcmd.get_name() == name || subcmd.get_all_aliases().any(|a| a == name) {
            let help = subcmd.render_help();
            print!("{}", help);
            return;
        }
    }

    eprintln!("Unknown command: {}", name);
    eprintln!();
    print_grouped_help();
}

/// Name of the subcommand, for `<command> --help`
pub fn subcommand_name(command: &Commands) -> &'static str {
    match command {
        Commands::Card(c) => match c {
            CardCommands::Add { .. } => "add",
            CardCommands::Rm { .. } => "rm",
            CardCommands::Describe { .. } => "describe",
            CardCommands::Toggle { .. } => "toggle",
            CardCommands::Move { .. } => "move",
            CardCommands::Show { .. } => "show",
        },
        Commands::View(c) => match c {
            ViewCommands::Pool => "pool",
            ViewCommands::Week { .. } => "week",
            ViewCommands::Calendar { .. } => "calendar",
            ViewCommands::Stats { .. } => "stats",
        },
        Commands::Data(c) => match c {
            DataCommands::Notes { .. } => "notes",
            DataCommands::Export { .. } => "export",
            DataCommands::Import { .. } => "import",
        },
        Commands::Misc(c) => match c {
            MiscCommands::Config { .. } => "config",
            MiscCommands::Help { .. } => "help",
        },
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(flatten)]
    Card(CardCommands),

    #[command(flatten)]
    View(ViewCommands),

    #[command(flatten)]
    Data(DataCommands),

    #[command(flatten)]
    Misc(MiscCommands),
}

#[derive(Subcommand, Debug)]
pub enum CardCommands {
    /// Add a card to the pool
    #[command(alias = "new", display_order = 1)]
    Add {
        /// Card type: post, promo or reel
        #[arg(value_parser = parse_card_type)]
        kind: CardType,

        /// Description words (joined with spaces)
        #[arg(trailing_var_arg = true)]
        description: Vec<String>,
    },

    /// Delete a card from the board
    #[command(alias = "delete", display_order = 2)]
    Rm {
        /// Card id or unique id prefix
        id: String,
    },

    /// Replace a card's description
    #[command(display_order = 3)]
    Describe {
        /// Card id or unique id prefix
        id: String,

        /// Description words (joined with spaces; empty clears it)
        #[arg(trailing_var_arg = true)]
        text: Vec<String>,
    },

    /// Flip a scheduled card between scheduled and posted
    #[command(display_order = 4)]
    Toggle {
        /// Card id or unique id prefix
        id: String,
    },

    /// Move a card to the pool or a day slot
    #[command(alias = "mv", display_order = 5)]
    Move {
        /// Card id or unique id prefix
        id: String,

        /// `pool`, `YYYY-MM-DD` (first open slot) or `YYYY-MM-DD:N` (slot N, from 1)
        destination: String,
    },

    /// Show a single card and where it sits
    #[command(display_order = 6)]
    Show {
        /// Card id or unique id prefix
        id: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum ViewCommands {
    /// List unscheduled cards
    #[command(display_order = 10)]
    Pool,

    /// Show the slot grid for a range of days (default command)
    #[command(display_order = 11)]
    Week {
        /// First day to show (YYYY-MM-DD, default today)
        #[arg(long, value_name = "DATE")]
        from: Option<String>,

        /// Number of days to show (default: the configured window)
        #[arg(long)]
        days: Option<usize>,
    },

    /// Show a month with per-day counts
    #[command(alias = "cal", display_order = 12)]
    Calendar {
        /// Month to show (YYYY-MM, default this month)
        #[arg(long)]
        month: Option<String>,
    },

    /// Weekly progress, month KPIs, content mix and trend
    #[command(display_order = 13)]
    Stats {
        /// Day to compute against (YYYY-MM-DD, default today)
        #[arg(long, value_name = "DATE")]
        today: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum DataCommands {
    /// Print the notes, or replace them with the given text
    #[command(display_order = 20)]
    Notes {
        #[arg(trailing_var_arg = true)]
        text: Vec<String>,
    },

    /// Export the board to a JSON file
    #[command(display_order = 21)]
    Export {
        /// Output file or directory (default: current directory)
        path: Option<PathBuf>,
    },

    /// Replace the board with an exported JSON file
    #[command(display_order = 22)]
    Import {
        /// File to import
        path: PathBuf,
    },
}

#[derive(Subcommand, Debug)]
pub enum MiscCommands {
    /// Get or set configuration
    #[command(display_order = 30)]
    Config {
        /// Configuration key (e.g. daily-goal)
        key: Option<String>,

        /// Value to set (if omitted, prints current value)
        value: Option<String>,
    },

    /// Print help for slotboard or a subcommand
    #[command(display_order = 31)]
    Help {
        /// Subcommand to get help for
        command: Option<String>,
    },
}

fn parse_card_type(s: &str) -> Result<CardType, String> {
    s.parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_command_has_a_group() {
        let cmd = Cli::command();
        for sc in cmd.get_subcommands() {
            assert!(
                CommandGroup::for_command(sc.get_name()).is_some(),
                "{} has no help group",
                sc.get_name()
            );
        }
    }

    #[test]
    fn parses_add_with_description_words() {
        let cli = Cli::try_parse_from(["slotboard", "add", "reel", "Behind", "the", "scenes"]).unwrap();
        match cli.command {
            Some(Commands::Card(CardCommands::Add { kind, description })) => {
                assert_eq!(kind, CardType::Reel);
                assert_eq!(description.join(" "), "Behind the scenes");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn rejects_unknown_card_type() {
        assert!(Cli::try_parse_from(["slotboard", "add", "story"]).is_err());
    }

    #[test]
    fn global_options_follow_subcommands() {
        let cli = Cli::try_parse_from([
            "slotboard", "week", "--days", "3", "--data-dir", "/tmp/board", "-vv",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/board")));
        assert!(matches!(
            cli.command,
            Some(Commands::View(ViewCommands::Week { days: Some(3), .. }))
        ));
    }

    #[test]
    fn grouped_help_lists_all_groups() {
        let help = get_grouped_help();
        for group in CommandGroup::all() {
            assert!(help.contains(group.heading()));
        }
        assert!(help.contains("calendar"));
    }
}
