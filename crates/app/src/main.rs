mod agent_mode;
mod cli;
mod run_mode;

use bevy::prelude::*;
use clap::Parser;

fn main() -> AppExit {
    let options = match cli::CliArgs::parse().into_options() {
        Ok(options) => options,
        Err(e) => {
            eprintln!("error: {e}");
            return AppExit::error();
        }
    };

    if options.agent {
        return agent_mode::run_agent_mode(options.seed, options.config);
    }

    run_mode::run(options)
}
