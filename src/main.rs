mod cli;
mod prompt;

use anyhow::Result;
use percent_gauge::Gauge;
use std::io;
use tracing::Level;

fn main() -> Result<()> {
    let args = cli::Args::parse_args()?;
    init_tracing(args.log_level());

    let config = args.to_config();
    let gauge = if args.prompt {
        let submission = prompt::prompt_submission(&mut io::stdin().lock(), &mut io::stdout())?;
        Gauge::with_submission(config, submission)
    } else if let Some(submission) = args.submission()? {
        Gauge::with_submission(config, submission)
    } else {
        Gauge::new(config)
    };

    gauge.show()
}

fn init_tracing(level: Level) {
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}
