//! Interactive prompts on stdin.

use std::io::{self, BufRead, IsTerminal, Write};

use anyhow::{Context, bail};
use console::Term;

/// Asks a yes/no question; anything but `y` or `yes` is a no.
///
/// Returns true without asking when `assume_yes` is set.
pub fn confirm(question: &str, assume_yes: bool) -> anyhow::Result<bool> {
    if assume_yes {
        return Ok(true);
    }

    let stdin = io::stdin();
    confirm_with(&mut stdin.lock(), &mut io::stderr(), question)
}

fn confirm_with(
    input: &mut impl BufRead,
    output: &mut impl Write,
    question: &str,
) -> anyhow::Result<bool> {
    write!(output, "{question} [y/N] ")?;
    output.flush()?;

    let mut answer = String::new();
    input
        .read_line(&mut answer)
        .context("failed to read confirmation")?;

    Ok(matches!(
        answer.trim().to_ascii_lowercase().as_str(),
        "y" | "yes"
    ))
}

/// Returns `value`, or reads one from stdin after printing `label`.
///
/// Typed text is not echoed on a terminal. Piped stdin is read line by line.
pub fn secret_or_prompt(value: Option<String>, label: &str) -> anyhow::Result<String> {
    if let Some(value) = value {
        return Ok(value);
    }

    let stdin = io::stdin();
    if !stdin.is_terminal() {
        return read_line_with(&mut stdin.lock(), &mut io::stderr(), label);
    }

    let term = Term::stderr();
    term.write_str(&format!("{label}: "))?;
    term.read_secure_line().context("failed to read input")
}

fn read_line_with(
    input: &mut impl BufRead,
    output: &mut impl Write,
    label: &str,
) -> anyhow::Result<String> {
    write!(output, "{label}: ")?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line).context("failed to read input")? == 0 {
        bail!("no input for {label}");
    }

    Ok(line.trim_end_matches(['\r', '\n']).to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ask(answer: &str) -> bool {
        let mut output = Vec::new();
        confirm_with(&mut answer.as_bytes(), &mut output, "Delete?").unwrap()
    }

    #[test]
    fn test_confirm_accepts_yes() {
        assert!(ask("y\n"));
        assert!(ask("YES\n"));
        assert!(ask("  yes  \n"));
    }

    #[test]
    fn test_confirm_defaults_to_no() {
        assert!(!ask("\n"));
        assert!(!ask("n\n"));
        assert!(!ask("sure\n"));
        assert!(!ask(""));
    }

    #[test]
    fn test_confirm_prints_question() {
        let mut output = Vec::new();
        confirm_with(&mut "n\n".as_bytes(), &mut output, "Delete 'a'?").unwrap();
        assert_eq!(String::from_utf8(output).unwrap(), "Delete 'a'? [y/N] ");
    }

    #[test]
    fn test_assume_yes_skips_prompt() {
        assert!(confirm("anything", true).unwrap());
    }

    #[test]
    fn test_read_line() {
        let mut output = Vec::new();
        let line = read_line_with(&mut "Secret1!\r\n".as_bytes(), &mut output, "Password").unwrap();
        assert_eq!(line, "Secret1!");

        assert!(read_line_with(&mut "".as_bytes(), &mut output, "Password").is_err());
    }

    #[test]
    fn test_secret_uses_given_value() {
        let secret = secret_or_prompt(Some("Secret1!".to_owned()), "Password").unwrap();
        assert_eq!(secret, "Secret1!");
    }
}
