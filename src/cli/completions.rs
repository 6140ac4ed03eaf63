//! Shell completions for netform

use clap::{CommandFactory, Parser};
use clap_complete::{generate, Shell};
use std::io;

use crate::cli::Cli;

/// Arguments for the completions command
#[derive(Parser, Debug, Clone)]
pub struct CompletionsArgs {
    /// Target shell
    #[arg(value_enum)]
    pub shell: Shell,

    /// Print installation instructions instead of the script
    #[arg(long)]
    pub install: bool,
}

impl CompletionsArgs {
    pub fn execute(&self) -> anyhow::Result<i32> {
        if self.install {
            print_installation_instructions(self.shell);
        } else {
            generate_completions(self.shell);
        }
        Ok(0)
    }
}

/// Generate shell completions and write to stdout
pub fn generate_completions(shell: Shell) {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "netform", &mut io::stdout());
}

/// Get completions as a string
pub fn get_completions(shell: Shell) -> String {
    let mut cmd = Cli::command();
    let mut buf = Vec::new();
    generate(shell, &mut cmd, "netform", &mut buf);
    String::from_utf8(buf).unwrap_or_default()
}

/// Print installation instructions for completions
pub fn print_installation_instructions(shell: Shell) {
    match shell {
        Shell::Bash => {
            println!("# Add to ~/.bashrc:");
            println!("eval \"$(netform completions bash)\"");
            println!();
            println!("# Or save to file:");
            println!("netform completions bash > ~/.local/share/bash-completion/completions/netform");
        }
        Shell::Zsh => {
            println!("# Save to a directory in your fpath:");
            println!("mkdir -p ~/.zsh/completions");
            println!("netform completions zsh > ~/.zsh/completions/_netform");
        }
        Shell::Fish => {
            println!("netform completions fish > ~/.config/fish/completions/netform.fish");
        }
        Shell::PowerShell => {
            println!("# Add to your PowerShell profile:");
            println!("Invoke-Expression (& netform completions powershell | Out-String)");
        }
        Shell::Elvish => {
            println!("# Add to ~/.elvish/rc.elv:");
            println!("eval (netform completions elvish | slurp)");
        }
        _ => {
            println!("# Unknown shell. Please refer to your shell's documentation for completion installation.");
        }
    }
}
