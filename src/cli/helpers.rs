//! Shared helper functions for CLI commands

use console::style;
use miette::{IntoDiagnostic, Result};
use std::io::{self, IsTerminal};

use crate::cli::GlobalOpts;
use crate::core::{Config, Console, HttpGateway, Notification, Severity};

/// Effective configuration: file, then environment, then flags
pub fn load_config(global: &GlobalOpts) -> Result<Config> {
    let config = Config::load().into_diagnostic()?;
    Ok(config.with_overrides(global.api_url.as_deref(), global.timeout))
}

/// Console over an HTTP gateway built from the effective configuration
pub fn connect(global: &GlobalOpts) -> Result<(Config, Console<HttpGateway>)> {
    let config = load_config(global)?;
    tracing::debug!(api_url = %config.api_url, timeout = config.timeout_secs, "connecting");
    let gateway = HttpGateway::new(&config.api_url, config.timeout()).into_diagnostic()?;
    Ok((config, Console::new(gateway)))
}

/// Print a success notification, or turn an error notification into a failure
pub fn report(notification: Option<&Notification>) -> Result<()> {
    match notification {
        Some(n) if n.severity == Severity::Success => {
            eprintln!("{} {}", style("✓").green(), n.message);
            Ok(())
        }
        Some(n) => Err(miette::miette!("{}", n.message)),
        None => Ok(()),
    }
}

/// Truncate a string to `max_len` characters, adding "..." if truncated
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Whether prompts can be shown
pub fn is_interactive() -> bool {
    io::stdin().is_terminal() && io::stderr().is_terminal()
}

/// Split a `field=value` assignment
pub fn parse_assignment(raw: &str) -> Result<(&str, &str)> {
    raw.split_once('=')
        .map(|(k, v)| (k.trim(), v))
        .filter(|(k, _)| !k.is_empty())
        .ok_or_else(|| miette::miette!("expected field=value, got '{}'", raw))
}
