// SPDX-License-Identifier: AGPL-3.0-or-later
use std::env;
use std::io::{self, BufReader};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    // By default show delivery reports
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info")
    ).init();

    let status = kpipe::app::start(env::args_os(), BufReader::new(io::stdin())).await;
    ExitCode::from(status)
}
