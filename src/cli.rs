use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use std::io;

#[derive(Parser)]
#[command(name = "buzz")]
#[command(about = "Terminal client for Beeminder")]
#[command(version)]
pub struct Cli {
    /// Run a report or action; without one, open the interactive goal browser
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Verify and save Beeminder credentials
    Auth {
        /// Beeminder username
        username: String,

        /// Personal auth token (https://www.beeminder.com/api/v1/auth_token.json)
        auth_token: String,
    },

    /// List all goals, most urgent first
    #[command(visible_alias = "ls")]
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the most urgent goal
    Next {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Goals due by the end of today
    Today {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Goals due by the end of tomorrow
    Tomorrow {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Goals due within a duration (e.g. 45m, 4h, 2d, 1w)
    Due {
        /// How far ahead to look
        duration: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show a goal with its recent datapoints
    #[command(visible_alias = "s")]
    View {
        /// Goal slug
        slug: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Add a datapoint to a goal
    Add {
        /// Goal slug
        slug: String,

        /// Value; decimals or H:MM[:SS] (converted to hours)
        #[arg(allow_hyphen_values = true)]
        value: String,

        /// Comment (default: "Added via buzz")
        comment: Option<String>,

        /// Day the datapoint counts towards (YYYY-MM-DD, default: today)
        #[arg(short, long)]
        date: Option<String>,
    },

    /// Ask a running goal browser to reload
    Refresh,

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for [possible values: bash, zsh, fish, powershell, elvish]
        shell: Shell,
    },
}

impl Cli {
    /// Execute the command, dispatching to the appropriate handler.
    pub fn run(self) -> crate::error::Result<()> {
        use crate::commands::{
            cmd_add, cmd_auth, cmd_due, cmd_list, cmd_next, cmd_refresh, cmd_today,
            cmd_tomorrow, cmd_tui, cmd_view,
        };

        let Some(command) = self.command else {
            return cmd_tui();
        };

        match command {
            Commands::Auth {
                username,
                auth_token,
            } => cmd_auth(&username, &auth_token),
            Commands::List { json } => cmd_list(json),
            Commands::Next { json } => cmd_next(json),
            Commands::Today { json } => cmd_today(json),
            Commands::Tomorrow { json } => cmd_tomorrow(json),
            Commands::Due { duration, json } => cmd_due(&duration, json),
            Commands::View { slug, json } => cmd_view(&slug, json),
            Commands::Add {
                slug,
                value,
                comment,
                date,
            } => cmd_add(&slug, &value, comment.as_deref(), date.as_deref()),
            Commands::Refresh => cmd_refresh(),
            Commands::Completions { shell } => {
                generate_completions(shell);
                Ok(())
            }
        }
    }
}

pub fn generate_completions(shell: Shell) {
    let mut cmd = Cli::command();
    clap_complete::generate(shell, &mut cmd, "buzz", &mut io::stdout());
}
