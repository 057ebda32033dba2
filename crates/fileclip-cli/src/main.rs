use anyhow::Result;
use fileclip_cli::{Cli, Commands, Parser};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::List(args) => args.run(),
        Commands::Get(args) => args.run(),
        Commands::Set(args) => args.run(),
        Commands::Add(args) => args.run(),
        Commands::Remove(args) => args.run(),
    }
}
