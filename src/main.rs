use std::process::ExitCode;

use clap::Parser;
use kouch::{Cli, Command, KouchError, logging};

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::from(u8::try_from(err.exit_code()).unwrap_or(1))
        }
    }
}

fn run(cli: Cli) -> Result<(), KouchError> {
    logging::init(cli.global.verbose)?;
    let builder = cli.global.builder();
    match cli.command {
        Command::Get(get) => {
            let (op, args) = get.into_request();
            let session = builder.load()?;
            let plan = session.plan(op, &args)?;
            println!("{}", serde_json::to_string_pretty(&plan)?);
            Ok(())
        }
        Command::Config(args) => builder.handle_and_print(&args.into_action(&cli.global)),
    }
}
