use crate::engine::{CoffeeMachine, Rejection};
use crate::error::Result;
use crate::payment::{CoinInput, Denomination};
use indexmap::IndexMap;
use rust_decimal::Decimal;
use std::io::{BufRead, Write};
use std::path::Path;
use tracing::error;

/// One parsed line of console input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Off,
    Report,
    Maintenance,
    Order(String),
}

impl Command {
    /// Input is trimmed and lowercased; anything that is not a control
    /// command is treated as a drink order.
    pub fn parse(input: &str) -> Command {
        match input.trim().to_lowercase().as_str() {
            "off" => Command::Off,
            "report" => Command::Report,
            "maintenance" => Command::Maintenance,
            order => Command::Order(order.to_string()),
        }
    }
}

/// The interactive front of the machine: reads commands and coin counts,
/// prints reports and rejections. Generic over its streams so sessions can
/// be scripted in tests.
pub struct Console<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Runs the command loop until `off` or end of input. The final snapshot
    /// write is attempted on every exit path; a write failure is logged and
    /// does not block shutdown.
    pub fn run(
        &mut self,
        machine: &mut CoffeeMachine,
        state_path: &Path,
        low_stock_threshold: f64,
    ) -> Result<()> {
        loop {
            let options: Vec<&str> = machine.menu().drinks().map(|d| d.name()).collect();
            if options.is_empty() {
                writeln!(self.output, "No drinks are available today.")?;
            }
            write!(self.output, "What would you like? ({}): ", options.join("/"))?;
            self.output.flush()?;

            let Some(line) = self.read_line() else {
                break;
            };
            match Command::parse(&line) {
                Command::Off => break,
                Command::Report => self.print_report(machine)?,
                Command::Maintenance => self.maintenance(machine, low_stock_threshold)?,
                Command::Order(drink_id) => {
                    self.order(machine, &drink_id, low_stock_threshold)?;
                }
            }
        }

        if let Err(err) = machine.snapshot().save(state_path) {
            error!(%err, "machine state could not be saved at shutdown");
        }
        writeln!(self.output, "Powering down. Goodbye!")?;
        Ok(())
    }

    fn order(
        &mut self,
        machine: &mut CoffeeMachine,
        drink_id: &str,
        low_stock_threshold: f64,
    ) -> Result<()> {
        match machine.fulfill(drink_id, self) {
            Ok(receipt) => {
                if receipt.change > Decimal::ZERO {
                    writeln!(self.output, "Here is ${:.2} in change.", receipt.change)?;
                }
                writeln!(self.output, "Here is your {}. Enjoy!", receipt.drink)?;
                for ingredient in machine.stock().low_stock(low_stock_threshold) {
                    writeln!(self.output, "Warning: {ingredient} is running low.")?;
                }
            }
            Err(Rejection::UnknownDrink(name)) => {
                writeln!(self.output, "Sorry, {name:?} is not on the menu.")?;
            }
            Err(Rejection::OutOfStock(ingredient)) => {
                writeln!(self.output, "Sorry, there is not enough {ingredient}.")?;
            }
            Err(Rejection::ShortPaid { tendered, .. }) => {
                writeln!(
                    self.output,
                    "Sorry, that's not enough money. ${tendered:.2} refunded."
                )?;
            }
            Err(Rejection::Cancelled { refunded }) => {
                writeln!(self.output, "Order cancelled. ${refunded:.2} refunded.")?;
            }
            Err(Rejection::StockRaceLost {
                ingredient,
                refunded,
            }) => {
                writeln!(
                    self.output,
                    "Sorry, {ingredient} ran out. ${refunded:.2} refunded."
                )?;
            }
        }
        Ok(())
    }

    fn print_report(&mut self, machine: &CoffeeMachine) -> Result<()> {
        writeln!(self.output, "--- Machine report ---")?;
        for (ingredient, level) in machine.stock().levels() {
            writeln!(
                self.output,
                "{}: {}{}",
                capitalize(ingredient),
                level.quantity,
                unit(ingredient)
            )?;
        }
        let till = machine.till();
        writeln!(self.output, "Earnings: ${:.2}", till.earnings())?;
        writeln!(self.output, "Transactions: {}", till.transactions())?;
        if let Some(average) = till.average_sale() {
            writeln!(self.output, "Average sale: ${average:.2}")?;
        }
        Ok(())
    }

    fn maintenance(&mut self, machine: &mut CoffeeMachine, low_stock_threshold: f64) -> Result<()> {
        writeln!(self.output, "Entering maintenance mode.")?;

        let low = machine.stock().low_stock(low_stock_threshold);
        if low.is_empty() {
            writeln!(self.output, "Low stock: none")?;
        } else {
            writeln!(self.output, "Low stock: {}", low.join(", "))?;
        }
        for (drink, servings) in machine.servings_available() {
            writeln!(self.output, "{}: {} servings left", capitalize(&drink), servings)?;
        }

        writeln!(
            self.output,
            "Refill with \"<ingredient> <amount>\"; \"done\" to finish."
        )?;
        loop {
            write!(self.output, "refill> ")?;
            self.output.flush()?;
            let Some(line) = self.read_line() else {
                break;
            };
            let line = line.trim();
            if line.is_empty() || line == "done" {
                break;
            }

            let mut parts = line.split_whitespace();
            let (Some(ingredient), Some(amount), None) =
                (parts.next(), parts.next(), parts.next())
            else {
                writeln!(self.output, "Expected \"<ingredient> <amount>\".")?;
                continue;
            };
            let Ok(amount) = amount.parse::<i64>() else {
                writeln!(
                    self.output,
                    "Invalid quantity {amount:?} for {ingredient}: must be a whole number."
                )?;
                continue;
            };

            let request = IndexMap::from([(ingredient.to_string(), amount)]);
            match machine.replenish(&request) {
                Ok(()) => writeln!(
                    self.output,
                    "{} topped up by {amount}.",
                    capitalize(ingredient)
                )?,
                Err(err) => writeln!(self.output, "{err}")?,
            }
        }
        writeln!(self.output, "Leaving maintenance mode.")?;
        Ok(())
    }

    fn read_line(&mut self) -> Option<String> {
        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line),
        }
    }
}

impl<R: BufRead, W: Write> CoinInput for Console<R, W> {
    fn announce_price(&mut self, drink: &str, price: Decimal) {
        // Prompt output is best-effort.
        let _ = writeln!(
            self.output,
            "A {drink} costs ${price:.2}. Please insert coins (\"cancel\" to abort)."
        );
    }

    fn insert(&mut self, denomination: Denomination) -> Option<u64> {
        loop {
            let _ = write!(self.output, "How many {}?: ", denomination.label());
            let _ = self.output.flush();
            let line = self.read_line()?;
            let line = line.trim();
            if line == "cancel" {
                return None;
            }
            match line.parse::<u64>() {
                Ok(count) => return Some(count),
                Err(_) => {
                    let _ = writeln!(self.output, "Please enter a non-negative whole number.");
                }
            }
        }
    }
}

fn unit(ingredient: &str) -> &'static str {
    match ingredient {
        "coffee" => "g",
        "water" | "milk" => "ml",
        _ => "",
    }
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
