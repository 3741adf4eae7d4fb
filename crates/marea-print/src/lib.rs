// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub mod client_quote;
pub mod html;
pub mod spool;
pub mod work_order;

pub use client_quote::client_quote;
pub use spool::*;
pub use work_order::work_order;

use marea_app::{Quote, QuoteId};

pub const APP_NAME: &str = "marea";

pub const DEFAULT_COMPANY_NAME: &str = "Maremotors Waverunners";
pub const DEFAULT_TAGLINE: &str = "Servicio Especializado en Motos Acuáticas";
pub const DEFAULT_PHONE: &str = "(123) 456-7890";
pub const DEFAULT_TAX_RATE_PERCENT: u32 = 16;
pub const DEFAULT_VALIDITY_DAYS: u32 = 15;

/// Shop identity and commercial terms printed on every document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShopProfile {
    pub name: String,
    pub tagline: String,
    pub phone: String,
    pub tax_rate_percent: u32,
    pub validity_days: u32,
}

impl Default for ShopProfile {
    fn default() -> Self {
        Self {
            name: DEFAULT_COMPANY_NAME.to_owned(),
            tagline: DEFAULT_TAGLINE.to_owned(),
            phone: DEFAULT_PHONE.to_owned(),
            tax_rate_percent: DEFAULT_TAX_RATE_PERCENT,
            validity_days: DEFAULT_VALIDITY_DAYS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    ClientQuote,
    WorkOrder,
}

impl DocumentKind {
    pub const ALL: [Self; 2] = [Self::ClientQuote, Self::WorkOrder];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ClientQuote => "client-quote",
            Self::WorkOrder => "work-order",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::ClientQuote => "client quote",
            Self::WorkOrder => "work order",
        }
    }
}

/// A rendered, self-contained HTML document ready for a print surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintDocument {
    pub kind: DocumentKind,
    pub quote_id: QuoteId,
    pub title: String,
    pub html: String,
}

pub fn render(kind: DocumentKind, quote: &Quote, shop: &ShopProfile) -> PrintDocument {
    match kind {
        DocumentKind::ClientQuote => client_quote(quote, shop),
        DocumentKind::WorkOrder => work_order(quote, shop),
    }
}

pub fn format_money(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let absolute = cents.unsigned_abs();
    let dollars = absolute / 100;
    let cents_component = absolute % 100;
    format!("{sign}${dollars}.{cents_component:02}")
}
