//! Records served by the bookkeeping API.
//!
//! Field names on the wire follow the backend (`_id`, `nama_produk`, `harga`, ...),
//! the Rust side uses plain English names.

use anyhow::anyhow;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

/// Polarity of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Kind {
    #[serde(rename = "pemasukan")]
    Income,
    #[serde(rename = "pengeluaran")]
    Expense,
}

impl Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Kind::Income => "income",
                Kind::Expense => "expense",
            }
        )
    }
}

impl FromStr for Kind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "income" | "in" | "pemasukan" => Ok(Kind::Income),
            "expense" | "out" | "pengeluaran" => Ok(Kind::Expense),
            _ => Err(anyhow!("Invalid transaction kind: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(rename = "_id")]
    pub id: String,
    pub description: String,
    pub amount: Decimal,
    #[serde(rename = "type")]
    pub kind: Kind,
    pub category: String,
    /// Raw date as stored upstream; parsed on demand since it may be malformed.
    pub date: String,
}

impl Transaction {
    /// Amount with the sign of its kind: positive for income, negative for expense.
    pub fn signed_amount(&self) -> Decimal {
        match self.kind {
            Kind::Income => self.amount,
            Kind::Expense => -self.amount,
        }
    }
}

/// Selling unit of a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    #[default]
    Kg,
    Dus,
}

impl Display for Unit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Unit::Kg => "kg",
                Unit::Dus => "dus",
            }
        )
    }
}

impl FromStr for Unit {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "kg" => Ok(Unit::Kg),
            "dus" => Ok(Unit::Dus),
            _ => Err(anyhow!("Invalid unit: {} (expected kg or dus)", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "nama_produk")]
    pub name: String,
    #[serde(rename = "satuan_default")]
    pub default_unit: Unit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    #[serde(rename = "naik")]
    Up,
    #[serde(rename = "turun")]
    Down,
    #[serde(rename = "stabil")]
    Flat,
}

/// Change of a price record relative to the record before it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    #[serde(rename = "selisih")]
    pub delta: Decimal,
    /// Whole percentage points. `None` when the previous price was zero and
    /// the price moved, so no finite percentage exists.
    #[serde(rename = "persentase")]
    pub percent: Option<Decimal>,
    #[serde(rename = "status")]
    pub direction: Direction,
    #[serde(rename = "harga_sebelumnya")]
    pub previous_price: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRecord {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "product_id")]
    pub product: Product,
    #[serde(rename = "harga")]
    pub price: Decimal,
    #[serde(rename = "satuan")]
    pub unit: Unit,
    #[serde(rename = "tanggal")]
    pub recorded_at: String,
    #[serde(default)]
    pub comparison: Option<Comparison>,
}

impl PriceRecord {
    pub fn product_id(&self) -> &str {
        &self.product.id
    }
}
