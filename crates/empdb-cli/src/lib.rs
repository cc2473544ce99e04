mod cli;
mod config;
mod demo;
mod logger;

pub async fn run(args: Vec<String>) -> anyhow::Result<()> {
    let cmd = cli::parse_args(&args)?;
    match cmd {
        cli::Command::Help => {
            cli::print_help();
            Ok(())
        }
        cli::Command::Run(args) => {
            logger::init_cli_logger(args.verbose);
            demo::run(args).await
        }
    }
}
