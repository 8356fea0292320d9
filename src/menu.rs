use crate::drink::Drink;
use crate::error::{MachineError, Result};
use indexmap::IndexMap;
use rust_decimal::Decimal;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::warn;

/// The drink catalog, loaded once from a CSV source and read-only afterwards.
///
/// The source is tabular: a `drink` column, a `price` column, and one column
/// per ingredient holding the quantity that drink requires (empty or zero
/// means the ingredient is not used). A malformed record is skipped with a
/// warning; an unreadable source fails the whole load.
#[derive(Debug, Default)]
pub struct Menu {
    drinks: IndexMap<String, Drink>,
}

impl Menu {
    pub fn from_path(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|source| MachineError::MenuUnavailable {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(source: R) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);

        let headers = reader.headers()?.clone();
        if headers.len() < 2 {
            return Err(MachineError::MalformedMenuEntry {
                name: String::new(),
                reason: "header must contain at least drink and price columns".to_string(),
            });
        }

        let mut drinks = IndexMap::new();
        for record in reader.records() {
            let record = match record {
                Ok(record) => record,
                Err(err) => {
                    warn!(%err, "skipping unreadable menu record");
                    continue;
                }
            };
            match parse_entry(&headers, &record) {
                Ok(drink) => {
                    if drinks.contains_key(drink.name()) {
                        warn!(drink = drink.name(), "skipping duplicate menu entry");
                        continue;
                    }
                    drinks.insert(drink.name().to_string(), drink);
                }
                Err(err) => warn!(%err, "skipping malformed menu entry"),
            }
        }

        if drinks.is_empty() {
            warn!("menu is empty: no drink can be ordered");
        }
        Ok(Self { drinks })
    }

    pub fn lookup(&self, name: &str) -> Option<&Drink> {
        self.drinks.get(name)
    }

    /// Drinks in the order the source listed them.
    pub fn drinks(&self) -> impl Iterator<Item = &Drink> {
        self.drinks.values()
    }

    pub fn len(&self) -> usize {
        self.drinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drinks.is_empty()
    }
}

fn parse_entry(headers: &csv::StringRecord, record: &csv::StringRecord) -> Result<Drink> {
    let name = record
        .get(0)
        .filter(|name| !name.is_empty())
        .ok_or_else(|| MachineError::MalformedMenuEntry {
            name: String::new(),
            reason: "missing drink name".to_string(),
        })?;

    let price_field =
        record
            .get(1)
            .filter(|p| !p.is_empty())
            .ok_or_else(|| MachineError::MalformedMenuEntry {
                name: name.to_string(),
                reason: "missing price".to_string(),
            })?;
    let price: Decimal =
        price_field
            .parse()
            .map_err(|_| MachineError::MalformedMenuEntry {
                name: name.to_string(),
                reason: format!("unparsable price {price_field:?}"),
            })?;

    let mut ingredients = IndexMap::new();
    for (column, header) in headers.iter().enumerate().skip(2) {
        let field = record.get(column).unwrap_or("");
        if field.is_empty() {
            continue;
        }
        let quantity: u32 = field.parse().map_err(|_| MachineError::MalformedMenuEntry {
            name: name.to_string(),
            reason: format!("unparsable quantity {field:?} for {header}"),
        })?;
        if quantity > 0 {
            ingredients.insert(header.to_string(), quantity);
        }
    }

    Drink::new(name, ingredients, price)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const MENU: &str = "\
drink,price,water,milk,coffee
espresso,1.50,50,,18
latte,2.50,200,150,24
cappuccino,3.00,250,100,24
";

    #[test]
    fn test_load_full_menu() {
        let menu = Menu::from_reader(MENU.as_bytes()).unwrap();
        assert_eq!(menu.len(), 3);

        let espresso = menu.lookup("espresso").unwrap();
        assert_eq!(espresso.price(), dec!(1.50));
        assert_eq!(espresso.ingredients().get("water"), Some(&50));
        assert_eq!(espresso.ingredients().get("coffee"), Some(&18));
        assert!(!espresso.ingredients().contains_key("milk"));
    }

    #[test]
    fn test_menu_preserves_source_order() {
        let menu = Menu::from_reader(MENU.as_bytes()).unwrap();
        let names: Vec<&str> = menu.drinks().map(Drink::name).collect();
        assert_eq!(names, vec!["espresso", "latte", "cappuccino"]);
    }

    #[test]
    fn test_lookup_miss_is_none() {
        let menu = Menu::from_reader(MENU.as_bytes()).unwrap();
        assert!(menu.lookup("mocha").is_none());
    }

    #[test]
    fn test_malformed_entries_are_skipped() {
        let data = "\
drink,price,water,coffee
espresso,1.50,50,18
,2.00,100,10
no-price,,100,10
bad-price,cheap,100,10
bad-quantity,2.00,lots,10
no-ingredients,2.00,,
";
        let menu = Menu::from_reader(data.as_bytes()).unwrap();
        assert_eq!(menu.len(), 1);
        assert!(menu.lookup("espresso").is_some());
    }

    #[test]
    fn test_duplicate_entry_keeps_first() {
        let data = "\
drink,price,water
tea,1.00,200
tea,9.99,300
";
        let menu = Menu::from_reader(data.as_bytes()).unwrap();
        assert_eq!(menu.len(), 1);
        assert_eq!(menu.lookup("tea").unwrap().price(), dec!(1.00));
    }

    #[test]
    fn test_empty_menu_is_valid() {
        let menu = Menu::from_reader("drink,price,water\n".as_bytes()).unwrap();
        assert!(menu.is_empty());
        assert!(menu.lookup("espresso").is_none());
    }

    #[test]
    fn test_missing_file_is_unavailable() {
        let result = Menu::from_path(Path::new("no/such/menu.csv"));
        assert!(matches!(result, Err(MachineError::MenuUnavailable { .. })));
    }
}
