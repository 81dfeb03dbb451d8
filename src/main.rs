use clap::Parser;
use clearops::cli::{commands, Cli, Commands};
use miette::Result;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Install miette's fancy error handler for readable diagnostics
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Init(args) => commands::init(&cli, args),
        Commands::New(args) => commands::new(&cli, args),
        Commands::List(args) => commands::list(&cli, args),
        Commands::Show(args) => commands::show(&cli, args),
        Commands::Alerts(args) => commands::alerts(&cli, args),
        Commands::AddDoc(args) => commands::add_doc(&cli, args),
        Commands::AddExpense(args) => commands::add_expense(&cli, args),
        Commands::PayExpense(args) => commands::pay_expense(&cli, args),
        Commands::Duty(args) => commands::duty(&cli, args),
    }
}
