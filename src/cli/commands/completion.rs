//! completion command - Print a shell completion script for stackwatch

use std::io::Write;

use anyhow::{Context, Result};
use clap::CommandFactory;

use crate::cli::args::{Cli, Shell};

impl From<Shell> for clap_complete::Shell {
    fn from(shell: Shell) -> Self {
        match shell {
            Shell::Bash => clap_complete::Shell::Bash,
            Shell::Zsh => clap_complete::Shell::Zsh,
            Shell::Fish => clap_complete::Shell::Fish,
            Shell::PowerShell => clap_complete::Shell::PowerShell,
        }
    }
}

/// Render the completion script for `shell`.
///
/// Generated in memory so a closed pipe surfaces as an error instead of a
/// panic inside the generator.
pub fn render(shell: Shell) -> Vec<u8> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    let mut script = Vec::new();
    clap_complete::generate(clap_complete::Shell::from(shell), &mut cmd, name, &mut script);
    script
}

/// Print the completion script for `shell` to stdout.
pub fn completion(shell: Shell) -> Result<()> {
    let mut out = std::io::stdout().lock();
    out.write_all(&render(shell))
        .and_then(|()| out.flush())
        .context("failed to write completion script")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_shell_mentions_binary_and_subcommands() {
        for shell in [Shell::Bash, Shell::Zsh, Shell::Fish, Shell::PowerShell] {
            let script = String::from_utf8(render(shell)).unwrap();
            assert!(script.contains("stackwatch"), "{:?}", shell);
            assert!(script.contains("list-locales"), "{:?}", shell);
        }
    }

    #[test]
    fn value_names_map_to_generators() {
        assert_eq!(
            clap_complete::Shell::from(Shell::PowerShell),
            clap_complete::Shell::PowerShell
        );
        assert_eq!(
            clap_complete::Shell::from(Shell::Zsh),
            clap_complete::Shell::Zsh
        );
    }
}
