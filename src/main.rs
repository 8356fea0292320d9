use barista::console::Console;
use barista::engine::CoffeeMachine;
use barista::menu::Menu;
use barista::snapshot::MachineState;
use barista::stock::StockLedger;
use clap::Parser;
use miette::{IntoDiagnostic, Result};
use std::io;
use std::path::PathBuf;
use tracing::warn;

/// Stock levels the machine starts with when no snapshot exists.
const DEFAULT_STOCK: [(&str, u32); 3] = [("water", 300), ("milk", 200), ("coffee", 100)];

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Drink menu CSV file
    #[arg(long, default_value = "menu.csv")]
    menu: PathBuf,

    /// Where ledger state is persisted across runs
    #[arg(long, default_value = "machine_state.json")]
    state: PathBuf,

    /// Fraction of capacity below which an ingredient is reported low
    #[arg(long, default_value_t = 0.2)]
    low_stock_threshold: f64,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "barista=info".to_string()),
        )
        .with_writer(io::stderr)
        .init();

    let menu = Menu::from_path(&cli.menu).into_diagnostic()?;
    let stock = StockLedger::new(DEFAULT_STOCK.map(|(name, quantity)| (name.to_string(), quantity)));
    let mut machine = CoffeeMachine::new(menu, stock);

    match MachineState::load(&cli.state) {
        Ok(Some(state)) => machine.restore(&state),
        Ok(None) => {}
        Err(err) => warn!(%err, "ignoring unreadable machine state, keeping defaults"),
    }

    let mut console = Console::new(io::stdin().lock(), io::stdout());
    console
        .run(&mut machine, &cli.state, cli.low_stock_threshold)
        .into_diagnostic()?;
    Ok(())
}
