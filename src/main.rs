use clap::Parser;
use rbuild::cli::Cli;
use rbuild::{BuildSupervisor, LogObserver};
use std::sync::Arc;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    env_logger::Builder::from_default_env()
        .filter_level(cli.log_level())
        .format_timestamp(None)
        .init();

    let config = cli.build_config()?;

    let mut supervisor = BuildSupervisor::new(config)?;
    supervisor.add_observer(Arc::new(LogObserver));

    // a partial build is a normal outcome; only setup failures end up in Err
    let report = supervisor.run()?;
    println!("{}", report);
    Ok(())
}
