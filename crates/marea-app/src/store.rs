// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use log::{info, warn};

use crate::{Quote, QuoteFields, QuoteId, QuoteStatus};

/// In-memory, insertion-ordered collection of committed quotes.
///
/// Ids come from a counter owned by the store, so they stay unique for the
/// store's lifetime even after removals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteStore {
    quotes: Vec<Quote>,
    next_id: u64,
}

impl Default for QuoteStore {
    fn default() -> Self {
        Self {
            quotes: Vec::new(),
            next_id: 1,
        }
    }
}

impl QuoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, fields: QuoteFields) -> QuoteId {
        let id = QuoteId::new(self.next_id);
        self.next_id += 1;
        self.quotes.push(Quote::from_fields(id, fields));
        info!("quote {id} created");
        id
    }

    pub fn update(&mut self, id: QuoteId, fields: QuoteFields) -> Option<&Quote> {
        let Some(quote) = self.quotes.iter_mut().find(|quote| quote.id == id) else {
            warn!("update skipped: quote {id} not found");
            return None;
        };
        quote.apply(fields);
        info!("quote {id} updated");
        Some(quote)
    }

    pub fn archive(&mut self, id: QuoteId) -> Option<&Quote> {
        let Some(quote) = self.quotes.iter_mut().find(|quote| quote.id == id) else {
            warn!("archive skipped: quote {id} not found");
            return None;
        };
        quote.status = QuoteStatus::Archived;
        info!("quote {id} archived");
        Some(quote)
    }

    pub fn remove(&mut self, id: QuoteId) -> Option<Quote> {
        let Some(index) = self.quotes.iter().position(|quote| quote.id == id) else {
            warn!("delete skipped: quote {id} not found");
            return None;
        };
        info!("quote {id} deleted");
        Some(self.quotes.remove(index))
    }

    pub fn get(&self, id: QuoteId) -> Option<&Quote> {
        self.quotes.iter().find(|quote| quote.id == id)
    }

    pub fn list(&self) -> &[Quote] {
        &self.quotes
    }

    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }
}

/// Case-insensitive substring match on the client name. An empty term keeps
/// every record; order follows `records`.
pub fn filter_by_client<'a>(records: &'a [Quote], term: &str) -> Vec<&'a Quote> {
    let needle = term.to_lowercase();
    records
        .iter()
        .filter(|quote| needle.is_empty() || quote.client.to_lowercase().contains(&needle))
        .collect()
}
