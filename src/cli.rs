use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "pyeval",
    version,
    about = "Evaluate Python from stdin or an interactive page",
    long_about = "Starts a Python interpreter, installs one package into it, and evaluates \
                  every chunk read from stdin in one shared namespace. With --ui, opens a \
                  terminal page with an input field and an output field instead."
)]
pub struct Cli {
    /// Open the interactive page instead of reading stdin.
    #[arg(long)]
    pub ui: bool,

    /// Python executable to launch.
    #[arg(long, value_name = "PATH")]
    pub python: Option<String>,

    /// Package to install before evaluating anything.
    #[arg(long, value_name = "NAME")]
    pub package: Option<String>,

    /// Do not install any package.
    #[arg(long = "skip-install")]
    pub skip_install: bool,

    /// Log filter, e.g. `info` or `pyeval=debug`.
    #[arg(long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }
}
