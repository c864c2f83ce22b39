use anyhow::{Context, Result};
use colored::Colorize;
use rcap_application::AppContext;
use std::io::{self, BufRead, Write};

/// Restores the persisted session or fails with a sign-in hint.
pub async fn require_session(ctx: &AppContext) -> Result<()> {
    if ctx.auth.restore().await {
        Ok(())
    } else {
        anyhow::bail!("Not signed in. Run `rcap login` first.")
    }
}

/// Reads one line from stdin after printing `label`.
pub fn prompt(label: &str) -> Result<String> {
    prompt_from(label, &mut io::stdin().lock(), &mut io::stderr())
}

fn prompt_from(label: &str, input: &mut impl BufRead, output: &mut impl Write) -> Result<String> {
    write!(output, "{}: ", label).context("Failed to write prompt")?;
    output.flush().context("Failed to flush prompt")?;

    let mut line = String::new();
    input.read_line(&mut line).context("Failed to read from stdin")?;
    let value = line.trim_end_matches(['\r', '\n']).to_string();
    if value.is_empty() {
        anyhow::bail!("{} must not be empty", label);
    }
    Ok(value)
}

pub fn heading(title: &str) {
    println!("{}", title.bold());
}

pub fn field(label: &str, value: impl std::fmt::Display) {
    println!("  {:<14} {}", format!("{}:", label).dimmed(), value);
}

pub fn success(message: &str) {
    println!("{} {}", "✓".green(), message);
}

pub fn empty(what: &str) {
    println!("{}", format!("No {} found.", what).dimmed());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_trims_line_ending() {
        let mut input = io::Cursor::new(b"s3cret\r\n".to_vec());
        let mut output = Vec::new();

        let value = prompt_from("Password", &mut input, &mut output).unwrap();

        assert_eq!(value, "s3cret");
        assert_eq!(String::from_utf8(output).unwrap(), "Password: ");
    }

    #[test]
    fn test_prompt_rejects_empty_input() {
        let mut input = io::Cursor::new(b"\n".to_vec());
        let err = prompt_from("Password", &mut input, &mut Vec::new()).unwrap_err();

        assert_eq!(err.to_string(), "Password must not be empty");
    }
}
