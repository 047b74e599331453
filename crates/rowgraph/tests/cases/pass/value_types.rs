// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Every supported scalar type, plus mapped and skipped fields.

use chrono::{DateTime, NaiveDate, Utc};
use rowgraph::prelude::*;
use rust_decimal::Decimal;
use uuid::Uuid;

#[derive(Debug, Default, Entity)]
pub(crate) struct Invoice {
    /// Invoice number.
    #[id]
    pub id: Uuid,
    pub flag: bool,
    pub small: i16,
    pub count: i32,
    pub total_cents: i64,
    pub ratio: f32,
    pub weight: f64,
    pub amount: Decimal,
    pub issued_on: NaiveDate,
    pub created_at: Option<DateTime<Utc>>,
    pub payload: Vec<u8>,

    #[mapped]
    pub revision: i32,

    #[field(skip)]
    pub scratch: std::collections::HashMap<String, String>,
}

fn main() {
    let _ = Invoice::ID;
    let _ = Invoice::CREATED_AT;
    let info = <Invoice as rowgraph::Entity>::entity_info();
    assert!(info.property("revision").is_some());
    assert!(info.property("scratch").is_none());
}
