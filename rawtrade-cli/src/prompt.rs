use dialoguer::{Confirm, Password};

use crate::error::CliError;

/// Prompt for a private key (hidden input).
pub fn prompt_private_key() -> Result<String, CliError> {
    Password::new()
        .with_prompt("Private key (hex)")
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))
}

/// Ask the user to confirm an action.
pub fn confirm(prompt: &str) -> Result<bool, CliError> {
    Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))
}
