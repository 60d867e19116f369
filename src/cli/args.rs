//! Command-line argument definitions.

use crate::constants::DEFAULT_TICK_RATE;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Timor App - terminal dashboard for the Timor private internet service
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Directory holding the persisted session flag (defaults to ~/.config/timor)
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Log file path
    #[arg(long, default_value = "/tmp/timor.log")]
    pub log_file: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// UI refresh interval in milliseconds
    #[arg(long, default_value_t = DEFAULT_TICK_RATE)]
    pub tick_rate: u64,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the VPN server catalog
    Servers {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Show whether the next start is signed in
    AuthStatus,
    /// Sign out without opening the dashboard
    Logout,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_args_are_well_formed() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["timor"]);
        assert!(args.command.is_none());
        assert!(args.data_dir.is_none());
        assert_eq!(args.verbose, 0);
        assert_eq!(args.tick_rate, DEFAULT_TICK_RATE);
    }

    #[test]
    fn test_subcommands_and_flags() {
        let args = Args::parse_from(["timor", "-vv", "--data-dir", "/tmp/x", "servers", "--json"]);
        assert_eq!(args.verbose, 2);
        assert_eq!(args.data_dir, Some(PathBuf::from("/tmp/x")));
        assert!(matches!(args.command, Some(Commands::Servers { json: true })));

        let args = Args::parse_from(["timor", "auth-status"]);
        assert!(matches!(args.command, Some(Commands::AuthStatus)));
    }
}
