use clap::Parser;
use clap_complete::Shell;

/// Arguments for completions command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Generate bash completions:\n    assetpack completions bash > ~/.bash_completion.d/assetpack\n\n\
                  Generate zsh completions:\n    assetpack completions zsh > ~/.zfunc/_assetpack\n\n\
                  Generate fish completions:\n    assetpack completions fish > ~/.config/fish/completions/assetpack.fish\n\n\
                  Generate PowerShell completions:\n    assetpack completions powershell")]
pub struct CompletionsArgs {
    /// Shell type
    #[arg(value_enum, ignore_case = true)]
    pub shell: Shell,
}
