//! # Invoice
//!
//! An in-memory invoice: who did the work, for whom, and the billable line
//! items. Invoices live only for the session that builds them.
//!
//! ## Structure
//!
//! ```text
//! Invoice
//! ├── header: InvoiceHeader (welder, client, job, issue date)
//! └── items: Vec<LineItem> (ordered, each with a stable UUID)
//! ```
//!
//! ## Line Amounts
//!
//! A line is billed by weight when a positive weight is given, otherwise by
//! quantity: `amount = unit_price × (weight_kg if > 0 else quantity)`.
//!
//! ## Example
//!
//! ```rust
//! use weld_core::invoice::{subtotal, Invoice, LineItem};
//!
//! let mut invoice = Invoice::new("A. Welder", "Harbor Fabrication", "Gate repair");
//! invoice.add_item(LineItem::new("Labour (hours)", 2.0, 100.0));
//! invoice.add_item(LineItem::new("MS flat bar", 1.0, 20.0).with_weight(5.0));
//!
//! assert_eq!(invoice.total(), 300.0);
//! assert_eq!(subtotal(&invoice.items), 300.0);
//! ```

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{CalcError, CalcResult};

/// A single billable line.
///
/// ## JSON Example
///
/// ```json
/// {
///   "description": "MS flat bar",
///   "quantity": 1.0,
///   "weight_kg": 5.0,
///   "unit_price": 20.0
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// Stable identity for editing/removal; generated when omitted
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,

    pub description: String,

    /// Count of units (must be > 0)
    pub quantity: f64,

    /// Billable weight in kg; takes precedence over quantity when > 0
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight_kg: Option<f64>,

    /// Price per unit or per kg (must be >= 0)
    pub unit_price: f64,
}

impl LineItem {
    pub fn new(description: impl Into<String>, quantity: f64, unit_price: f64) -> Self {
        LineItem {
            id: Uuid::new_v4(),
            description: description.into(),
            quantity,
            weight_kg: None,
            unit_price,
        }
    }

    /// Bill this line by weight
    pub fn with_weight(mut self, weight_kg: f64) -> Self {
        self.weight_kg = Some(weight_kg);
        self
    }

    /// Weight when it drives the amount, else `None`
    pub fn billed_weight(&self) -> Option<f64> {
        self.weight_kg.filter(|w| *w > 0.0)
    }

    /// Check field constraints. `index` is the 1-based position used in the error.
    pub fn validate(&self, index: usize) -> CalcResult<()> {
        if self.description.trim().is_empty() {
            return Err(CalcError::invalid_line_item(index, "description", "Description is required"));
        }
        if !self.quantity.is_finite() || self.quantity <= 0.0 {
            return Err(CalcError::invalid_line_item(
                index,
                "quantity",
                "Quantity must be greater than 0",
            ));
        }
        if let Some(weight) = self.weight_kg {
            if !weight.is_finite() || weight < 0.0 {
                return Err(CalcError::invalid_line_item(
                    index,
                    "weight_kg",
                    "Weight cannot be negative",
                ));
            }
        }
        if !self.unit_price.is_finite() || self.unit_price < 0.0 {
            return Err(CalcError::invalid_line_item(
                index,
                "unit_price",
                "Unit price cannot be negative",
            ));
        }
        Ok(())
    }
}

/// Amount for one line: price × (weight if > 0, else quantity)
pub fn line_amount(item: &LineItem) -> f64 {
    item.unit_price * item.billed_weight().unwrap_or(item.quantity)
}

/// Sum of line amounts; 0 for an empty list
pub fn subtotal(items: &[LineItem]) -> f64 {
    items.iter().map(line_amount).sum()
}

/// Who, for whom, what and when
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceHeader {
    /// Empty when omitted; front ends fill it from settings
    #[serde(default)]
    pub welder_name: String,
    pub client_name: String,
    pub job_description: String,
    /// Issue date; today when omitted
    #[serde(default = "today")]
    pub issued: NaiveDate,
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Root invoice container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    pub header: InvoiceHeader,
    #[serde(default)]
    pub items: Vec<LineItem>,
}

impl Invoice {
    /// Create an empty invoice dated today.
    pub fn new(
        welder_name: impl Into<String>,
        client_name: impl Into<String>,
        job_description: impl Into<String>,
    ) -> Self {
        Invoice {
            header: InvoiceHeader {
                welder_name: welder_name.into(),
                client_name: client_name.into(),
                job_description: job_description.into(),
                issued: today(),
            },
            items: Vec::new(),
        }
    }

    /// Parse an invoice from JSON.
    pub fn from_json(json: &str) -> CalcResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Append a line item, returning its id.
    pub fn add_item(&mut self, item: LineItem) -> Uuid {
        let id = item.id;
        self.items.push(item);
        id
    }

    /// Remove a line item by id. Returns the removed item if it existed.
    pub fn remove_item(&mut self, id: &Uuid) -> Option<LineItem> {
        let pos = self.items.iter().position(|item| item.id == *id)?;
        Some(self.items.remove(pos))
    }

    /// Get a line item by id.
    pub fn item(&self, id: &Uuid) -> Option<&LineItem> {
        self.items.iter().find(|item| item.id == *id)
    }

    /// Get a mutable line item by id for editing.
    pub fn item_mut(&mut self, id: &Uuid) -> Option<&mut LineItem> {
        self.items.iter_mut().find(|item| item.id == *id)
    }

    /// Line amounts in item order
    pub fn amounts(&self) -> Vec<f64> {
        self.items.iter().map(line_amount).collect()
    }

    /// Invoice total
    pub fn total(&self) -> f64 {
        subtotal(&self.items)
    }

    /// Every problem with the invoice, one error per failing field or item.
    pub fn validation_errors(&self) -> Vec<CalcError> {
        let mut errors = Vec::new();

        let header = &self.header;
        for (field, value) in [
            ("welder_name", &header.welder_name),
            ("client_name", &header.client_name),
            ("job_description", &header.job_description),
        ] {
            if value.trim().is_empty() {
                errors.push(CalcError::missing_field(field));
            }
        }

        if self.items.is_empty() {
            errors.push(CalcError::invalid_input("items", "[]", "Please add at least one item"));
        }

        errors.extend(
            self.items
                .iter()
                .enumerate()
                .filter_map(|(i, item)| item.validate(i + 1).err()),
        );

        errors
    }

    /// Validate, returning the first problem found.
    pub fn validate(&self) -> CalcResult<()> {
        match self.validation_errors().into_iter().next() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_invoice() -> Invoice {
        let mut invoice = Invoice::new("A. Welder", "Harbor Fabrication", "Gate repair");
        invoice.add_item(LineItem::new("Labour", 2.0, 100.0));
        invoice.add_item(LineItem::new("Flat bar", 1.0, 20.0).with_weight(5.0));
        invoice
    }

    #[test]
    fn test_amounts_and_subtotal() {
        let invoice = sample_invoice();
        assert_eq!(invoice.amounts(), vec![200.0, 100.0]);
        assert_eq!(invoice.total(), 300.0);
    }

    #[test]
    fn test_empty_subtotal_is_zero() {
        assert_eq!(subtotal(&[]), 0.0);
    }

    #[test]
    fn test_zero_weight_falls_back_to_quantity() {
        let item = LineItem::new("Rods", 3.0, 10.0).with_weight(0.0);
        assert_eq!(line_amount(&item), 30.0);
        assert!(item.validate(1).is_ok());
    }

    #[test]
    fn test_add_edit_remove() {
        let mut invoice = sample_invoice();
        let id = invoice.add_item(LineItem::new("Grinding discs", 4.0, 35.0));
        assert_eq!(invoice.items.len(), 3);

        invoice.item_mut(&id).unwrap().quantity = 2.0;
        assert_eq!(line_amount(invoice.item(&id).unwrap()), 70.0);

        let removed = invoice.remove_item(&id).unwrap();
        assert_eq!(removed.description, "Grinding discs");
        assert!(invoice.remove_item(&id).is_none());
        assert_eq!(invoice.total(), 300.0);
    }

    #[test]
    fn test_item_validation_reports_field() {
        let bad = [
            (LineItem::new("  ", 1.0, 1.0), "description"),
            (LineItem::new("x", 0.0, 1.0), "quantity"),
            (LineItem::new("x", 1.0, 1.0).with_weight(-2.0), "weight_kg"),
            (LineItem::new("x", 1.0, -0.5), "unit_price"),
        ];
        for (item, expected) in bad {
            match item.validate(3).unwrap_err() {
                CalcError::InvalidLineItem { index, field, .. } => {
                    assert_eq!(index, 3);
                    assert_eq!(field, expected);
                }
                other => panic!("unexpected error {:?}", other),
            }
        }
    }

    #[test]
    fn test_invoice_collects_every_error() {
        let mut invoice = Invoice::new("A. Welder", "", "Gate repair");
        invoice.add_item(LineItem::new("ok", 1.0, 5.0));
        invoice.add_item(LineItem::new("", 1.0, 5.0));
        invoice.add_item(LineItem::new("free", 1.0, -1.0));

        let errors = invoice.validation_errors();
        assert_eq!(errors.len(), 3);
        assert_eq!(errors[0], CalcError::missing_field("client_name"));
        assert!(matches!(errors[1], CalcError::InvalidLineItem { index: 2, .. }));
        assert!(matches!(errors[2], CalcError::InvalidLineItem { index: 3, .. }));
        assert_eq!(invoice.validate().unwrap_err(), errors[0]);
    }

    #[test]
    fn test_invoice_needs_items() {
        let invoice = Invoice::new("A. Welder", "Client", "Job");
        assert_eq!(invoice.validate().unwrap_err().error_code(), "INVALID_INPUT");
        assert!(sample_invoice().validate().is_ok());
    }

    #[test]
    fn test_from_json_fills_defaults() {
        let json = r#"{
            "header": {
                "welder_name": "A. Welder",
                "client_name": "Harbor Fabrication",
                "job_description": "Railing",
                "issued": "2026-03-14"
            },
            "items": [
                { "description": "Labour", "quantity": 2, "unit_price": 100 },
                { "description": "Pipe", "quantity": 1, "weight_kg": 5, "unit_price": 20 }
            ]
        }"#;
        let invoice = Invoice::from_json(json).unwrap();
        assert_eq!(invoice.header.issued, NaiveDate::from_ymd_opt(2026, 3, 14).unwrap());
        assert_ne!(invoice.items[0].id, invoice.items[1].id);
        assert_eq!(invoice.total(), 300.0);

        let err = Invoice::from_json("{ not json").unwrap_err();
        assert_eq!(err.error_code(), "SERIALIZATION_ERROR");
    }

    #[test]
    fn test_missing_welder_name_parses_as_empty() {
        let json = r#"{
            "header": { "client_name": "Dock Co", "job_description": "Bollard" },
            "items": [{ "description": "Labour", "quantity": 1, "unit_price": 80 }]
        }"#;
        let invoice = Invoice::from_json(json).unwrap();
        assert_eq!(invoice.header.welder_name, "");
        assert_eq!(invoice.validate().unwrap_err(), CalcError::missing_field("welder_name"));

        let err = Invoice::from_json(r#"{"header": {"welder_name": "W", "job_description": "J"}}"#).unwrap_err();
        assert_eq!(err.error_code(), "SERIALIZATION_ERROR");
    }
}
