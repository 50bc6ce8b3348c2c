use crate::cli::{App, CompletionArgs, CompletionShell};
use clap::CommandFactory;

pub fn run(args: &CompletionArgs) -> i32 {
    let mut command = App::command();
    let bin_name = command.get_name().to_string();
    match args.shell {
        CompletionShell::Bash => {
            clap_complete::generate(
                clap_complete::shells::Bash,
                &mut command,
                bin_name,
                &mut std::io::stdout(),
            );
        }
        CompletionShell::Zsh => {
            clap_complete::generate(
                clap_complete::shells::Zsh,
                &mut command,
                bin_name,
                &mut std::io::stdout(),
            );
        }
        CompletionShell::Fish => {
            clap_complete::generate(
                clap_complete::shells::Fish,
                &mut command,
                bin_name,
                &mut std::io::stdout(),
            );
        }
        CompletionShell::Powershell => {
            clap_complete::generate(
                clap_complete::shells::PowerShell,
                &mut command,
                bin_name,
                &mut std::io::stdout(),
            );
        }
        CompletionShell::Elvish => {
            clap_complete::generate(
                clap_complete::shells::Elvish,
                &mut command,
                bin_name,
                &mut std::io::stdout(),
            );
        }
        CompletionShell::Nushell => {
            clap_complete::generate(
                clap_complete_nushell::Nushell,
                &mut command,
                bin_name,
                &mut std::io::stdout(),
            );
        }
    }
    0
}
