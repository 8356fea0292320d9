pub mod console;
pub mod drink;
pub mod engine;
pub mod error;
pub mod menu;
pub mod payment;
pub mod snapshot;
pub mod stock;
pub mod till;
