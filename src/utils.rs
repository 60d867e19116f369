//! Formatting helpers (uptime, money, clock) and data directory lookup.

use std::path::PathBuf;
use std::time::Duration;

/// Formats a duration as `HH:MM:SS`.
///
/// Hours keep counting past a day, so a long session reads `27:03:10`
/// instead of wrapping.
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    format!(
        "{:02}:{:02}:{:02}",
        secs / 3600,
        (secs % 3600) / 60,
        secs % 60
    )
}

/// Inserts `,` thousands separators into a formatted number.
///
/// Accepts an optional leading `-` and an optional fractional part, which is
/// kept as is.
///
/// # Example
///
/// ```ignore
/// assert_eq!(group_thousands("7312500"), "7,312,500");
/// assert_eq!(group_thousands("2137.50"), "2,137.50");
/// ```
pub fn group_thousands(number: &str) -> String {
    let (sign, rest) = match number.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", number),
    };
    let (int, frac) = match rest.split_once('.') {
        Some((int, frac)) => (int, Some(frac)),
        None => (rest, None),
    };

    let mut grouped = String::with_capacity(int.len() + int.len() / 3);
    for (i, c) in int.chars().enumerate() {
        if i > 0 && (int.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    match frac {
        Some(frac) => format!("{sign}{grouped}.{frac}"),
        None => format!("{sign}{grouped}"),
    }
}

/// Formats a USD amount with two decimals, e.g. `$1,024.50`.
pub fn format_usd(amount: f64) -> String {
    if amount < 0.0 {
        format!("-${}", group_thousands(&format!("{:.2}", -amount)))
    } else {
        format!("${}", group_thousands(&format!("{amount:.2}")))
    }
}

/// Shortens `s` to at most `max_chars` characters, ending in `...` when cut.
pub fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    let kept: String = s.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{kept}...")
}

/// Event log timestamp, `HH:MM:SS` local time.
pub fn format_local_time() -> String {
    chrono::Local::now().format("%H:%M:%S").to_string()
}

/// Today's calendar date in the local time zone.
pub fn today() -> chrono::NaiveDate {
    chrono::Local::now().date_naive()
}

/// `$HOME`, if set.
pub fn home_dir() -> Option<PathBuf> {
    std::env::var("HOME").ok().map(PathBuf::from)
}

/// Expands a leading `~/` to the home directory.
pub fn expand_tilde(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), home_dir()) {
        (Some(stripped), Some(home)) => home.join(stripped),
        _ => PathBuf::from(path),
    }
}

/// `~/.config/timor`, created on first use.
///
/// # Errors
///
/// Fails when `$HOME` is unset or the directory cannot be created.
pub fn get_app_config_dir() -> std::io::Result<PathBuf> {
    let home = home_dir().ok_or_else(|| {
        std::io::Error::new(std::io::ErrorKind::NotFound, "HOME is not set")
    })?;
    let path = home.join(".config").join(crate::constants::CONFIG_DIR_NAME);

    if !path.exists() {
        std::fs::create_dir_all(&path)?;
    }

    Ok(path)
}
