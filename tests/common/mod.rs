use barista::engine::CoffeeMachine;
use barista::menu::Menu;
use barista::payment::{CoinInput, Denomination};
use barista::stock::StockLedger;
use rust_decimal::Decimal;

pub const MENU_CSV: &str = "\
drink,price,water,milk,coffee
espresso,1.50,50,,18
latte,2.50,200,150,24
cappuccino,3.00,250,100,24
";

/// Feeds a fixed sequence of coin counts; an exhausted script or an explicit
/// `None` behaves like the customer cancelling.
pub struct ScriptedCoins {
    counts: Vec<Option<u64>>,
    pub announced: Vec<(String, Decimal)>,
}

impl ScriptedCoins {
    pub fn new(counts: &[Option<u64>]) -> Self {
        Self {
            counts: counts.to_vec(),
            announced: Vec::new(),
        }
    }

    /// Convenience for a complete quarter/dime/nickel/penny sequence.
    pub fn coins(quarters: u64, dimes: u64, nickels: u64, pennies: u64) -> Self {
        Self::new(&[Some(quarters), Some(dimes), Some(nickels), Some(pennies)])
    }
}

impl CoinInput for ScriptedCoins {
    fn announce_price(&mut self, drink: &str, price: Decimal) {
        self.announced.push((drink.to_string(), price));
    }

    fn insert(&mut self, _denomination: Denomination) -> Option<u64> {
        if self.counts.is_empty() {
            return None;
        }
        self.counts.remove(0)
    }
}

pub fn machine() -> CoffeeMachine {
    machine_with_stock(&[("water", 300), ("milk", 200), ("coffee", 100)])
}

pub fn machine_with_stock(stock: &[(&str, u32)]) -> CoffeeMachine {
    let menu = Menu::from_reader(MENU_CSV.as_bytes()).expect("fixture menu parses");
    let stock = StockLedger::new(
        stock
            .iter()
            .map(|(ingredient, quantity)| (ingredient.to_string(), *quantity)),
    );
    CoffeeMachine::new(menu, stock)
}
