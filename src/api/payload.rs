//! Request bodies, with the checks the forms apply before submitting.

use crate::core::model::{Kind, Unit};
use anyhow::{Result, bail};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewTransaction {
    pub description: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    #[serde(rename = "type")]
    pub kind: Kind,
    pub category: String,
    pub date: NaiveDate,
}

impl NewTransaction {
    pub fn validate(&self) -> Result<()> {
        if self.description.trim().is_empty() {
            bail!("Description must not be empty");
        }
        if self.category.trim().is_empty() {
            bail!("Category must not be empty");
        }
        if self.amount.is_sign_negative() && !self.amount.is_zero() {
            bail!("Amount must not be negative: {}", self.amount);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductDraft {
    #[serde(rename = "nama_produk")]
    pub name: String,
    #[serde(rename = "satuan_default")]
    pub default_unit: Unit,
}

impl ProductDraft {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            bail!("Product name must not be empty");
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewPriceRecord {
    pub product_id: String,
    #[serde(rename = "harga", with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(rename = "satuan")]
    pub unit: Unit,
    #[serde(rename = "tanggal")]
    pub recorded_at: NaiveDate,
}

impl NewPriceRecord {
    pub fn validate(&self) -> Result<()> {
        if self.product_id.trim().is_empty() {
            bail!("A product must be selected");
        }
        if self.price <= Decimal::ZERO {
            bail!("Price must be positive: {}", self.price);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl NewUser {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            bail!("Name must not be empty");
        }
        if !self.email.contains('@') {
            bail!("Invalid email address: {}", self.email);
        }
        if self.password.is_empty() {
            bail!("Password must not be empty");
        }
        Ok(())
    }
}
