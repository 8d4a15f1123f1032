use clap::Parser;
use snapscout::library::cli::{Cli, run};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init_from_env(
        env_logger::Env::default().filter_or(env_logger::DEFAULT_FILTER_ENV, "warn"),
    );

    run(Cli::parse()).await
}
