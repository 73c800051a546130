#![forbid(unsafe_code)]

//! MSA POS demo walkthrough binary entry point.

use std::io::{self, Write};

use msapos_demo::cli::{self, Command, Opts};
use msapos_demo::walkthrough;
use msapos_session::SessionConfig;
use tracing_subscriber::EnvFilter;

fn main() {
    let opts = match Opts::parse() {
        Ok(Command::Run(opts)) => opts,
        Ok(Command::Help) => {
            println!("{}", cli::HELP_TEXT);
            return;
        }
        Ok(Command::Version) => {
            println!("{}", cli::version_line());
            return;
        }
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    // RUST_LOG wins over --log-level / MSAPOS_LOG.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&opts.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let config = SessionConfig::from_env();
    let result = walkthrough::prepare(&opts, config).and_then(|(mut session, mut api)| {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        walkthrough::run(&mut session, &mut api, &mut out)?;
        out.flush()?;
        Ok(())
    });

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
