use std::time::Duration;

use chrono::{TimeZone, Utc};
use console::{Style, StyledObject};
use indicatif::{ProgressBar, ProgressStyle};
use rawtrade_client::Verification;
use rawtrade_types::{Address, OrderStatus, Timestamp};

// ── Styles ──────────────────────────────────────────────────────────────────

pub fn style_success() -> Style {
    Style::new().green()
}

pub fn style_error() -> Style {
    Style::new().red()
}

pub fn style_warn() -> Style {
    Style::new().yellow()
}

pub fn style_info() -> Style {
    Style::new().cyan()
}

pub fn style_bold() -> Style {
    Style::new().bold()
}

pub fn style_dim() -> Style {
    Style::new().dim()
}

// ── Value formatting ────────────────────────────────────────────────────────

/// Truncated address: 0x1234...abcd
pub fn format_address_short(addr: &Address) -> String {
    let full = addr.to_string();
    format!("{}...{}", &full[..6], &full[full.len() - 4..])
}

/// Unix seconds as a UTC date and time. Zero reads as "-".
pub fn format_timestamp(ts: Timestamp) -> String {
    if ts == 0 {
        return "-".to_string();
    }
    i64::try_from(ts)
        .ok()
        .and_then(|secs| Utc.timestamp_opt(secs, 0).single())
        .map(|dt| dt.format("%Y-%m-%d %H:%M UTC").to_string())
        .unwrap_or_else(|| ts.to_string())
}

pub fn format_days(days: u64) -> String {
    if days == 1 {
        "1 day".to_string()
    } else {
        format!("{} days", days)
    }
}

pub fn format_status(status: OrderStatus) -> StyledObject<&'static str> {
    let style = match status {
        OrderStatus::Pending => style_warn(),
        OrderStatus::Matched => style_info(),
        OrderStatus::Completed => style_success(),
        OrderStatus::Cancelled => style_dim(),
    };
    style.apply_to(status.name())
}

pub fn format_verification(v: &Verification) -> StyledObject<String> {
    let style = match v {
        Verification::Verified => style_success(),
        Verification::Unverified => style_dim(),
        Verification::CheckFailed(_) => style_error(),
    };
    style.apply_to(v.to_string())
}

pub fn format_active(active: bool) -> StyledObject<&'static str> {
    if active {
        style_success().apply_to("active")
    } else {
        style_dim().apply_to("inactive")
    }
}

// ── Display helpers ─────────────────────────────────────────────────────────

/// Spinner shown while waiting on the network.
pub fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    let style = ProgressStyle::default_spinner()
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
        .template("  {spinner} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    pb.set_style(style);
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

pub fn print_success(msg: &str) {
    println!("  {} {}", style_success().apply_to("✓"), msg);
}

/// Print an error message with an optional hint.
pub fn print_error(msg: &str, hint: Option<&str>) {
    eprintln!("  {} {}", style_error().apply_to("Error:"), msg);
    if let Some(h) = hint {
        eprintln!(
            "  {} {}",
            style_dim().apply_to("Hint:"),
            style_dim().apply_to(h)
        );
    }
}

pub fn print_divider() {
    println!(
        "  {}",
        style_dim().apply_to("────────────────────────────────")
    );
}

pub fn print_heading(title: &str) {
    println!();
    println!("  {}", style_bold().apply_to(title));
}

/// Print `value` as pretty JSON.
pub fn print_json<T: serde::Serialize>(value: &T) -> Result<(), crate::error::CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rawtrade_types::constants::DEFAULT_CONTRACT_ADDRESS;

    #[test]
    fn test_format_address_short() {
        let short = format_address_short(&DEFAULT_CONTRACT_ADDRESS);
        assert_eq!(short, "0x5719...8827");
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(0), "-");
        assert_eq!(format_timestamp(1_700_000_000), "2023-11-14 22:13 UTC");
    }

    #[test]
    fn test_format_days() {
        assert_eq!(format_days(1), "1 day");
        assert_eq!(format_days(14), "14 days");
    }

    #[test]
    fn test_status_keeps_name() {
        console::set_colors_enabled(false);
        assert_eq!(format_status(OrderStatus::Matched).to_string(), "Matched");
        assert_eq!(
            format_verification(&Verification::Unverified).to_string(),
            "not verified"
        );
    }
}
