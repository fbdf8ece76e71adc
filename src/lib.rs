pub mod plugins;
pub mod services;
mod shell;

use clap::Parser;

/// Entry point of the `ifa` binary: parse arguments, start logging and
/// drive the selected command on a multi-thread runtime.
pub fn run() -> anyhow::Result<()> {
    let cli = shell::Cli::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(shell::run(cli))
}
