pub mod dashboard;
pub mod prices;
pub mod products;
pub mod session;
pub mod setup;
pub mod transactions;
pub mod ui;
