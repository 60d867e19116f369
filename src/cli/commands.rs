//! CLI command handlers.

use crate::catalog::{self, ServerNode};
use crate::cli::args::Commands;
use crate::store::KvStore;
use color_eyre::Result;
use std::io::Write;

/// Handles CLI commands that don't require the TUI.
///
/// Returns `true` if the command was handled and the program should exit,
/// or `false` if the TUI should be started.
pub fn handle_command(command: &Commands, store: &mut KvStore) -> Result<bool> {
    let mut out = std::io::stdout().lock();
    match command {
        Commands::Servers { json } => {
            print_servers(&mut out, &catalog::default_catalog(), *json)?;
        }
        Commands::AuthStatus => print_auth_status(&mut out, store)?,
        Commands::Logout => {
            store.save_authenticated(false)?;
            tracing::info!("signed out from the command line");
            writeln!(out, "✅ Signed out. The next start shows the login screen.")?;
        }
    }
    Ok(true)
}

fn print_servers(out: &mut impl Write, servers: &[ServerNode], json: bool) -> Result<()> {
    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(servers)?)?;
        return Ok(());
    }

    writeln!(
        out,
        "{:>3}  {:<4} {:<24} {:>7}  {:<8} ACCESS",
        "ID", "CODE", "LOCATION", "LATENCY", "TIER"
    )?;
    for server in servers {
        writeln!(
            out,
            "{:>3}  {:<4} {:<24} {:>7}  {:<8} {}",
            server.id,
            server.code,
            format!("{}, {}", server.city, server.country),
            server.latency,
            server.tier.to_string(),
            if server.vip_only { "VIP" } else { "Free" }
        )?;
    }
    Ok(())
}

fn print_auth_status(out: &mut impl Write, store: &KvStore) -> Result<()> {
    let state = if store.load_authenticated() {
        "signed in"
    } else {
        "signed out"
    };
    writeln!(out, "Session: {state}")?;
    if let Some(path) = store.path() {
        writeln!(out, "Stored in: {}", path.display())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(f: impl FnOnce(&mut Vec<u8>) -> Result<()>) -> String {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_server_table_lists_catalog() {
        let table = render(|out| print_servers(out, &catalog::default_catalog(), false));
        assert_eq!(table.lines().count(), 5);
        assert!(table.contains("Dili, Timor-Leste"));
        assert!(table.lines().nth(2).is_some_and(|l| l.ends_with("VIP")));
    }

    #[test]
    fn test_server_json_is_parseable() {
        let json = render(|out| print_servers(out, &catalog::default_catalog(), true));
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value.as_array().map(Vec::len), Some(4));
        assert_eq!(value[0]["city"], "Dili");
    }

    #[test]
    fn test_auth_status_after_logout() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = KvStore::open(dir.path().join("storage.json")).unwrap();
        store.save_authenticated(false).unwrap();

        let status = render(|out| print_auth_status(out, &store));
        assert!(status.starts_with("Session: signed out"));
        assert!(status.contains("storage.json"));
    }
}
