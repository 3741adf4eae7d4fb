// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};

use crate::ids::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum QuoteStatus {
    #[default]
    Pending,
    Approved,
    Archived,
}

impl QuoteStatus {
    pub const ALL: [Self; 3] = [Self::Pending, Self::Approved, Self::Archived];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Archived => "archived",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(Self::Pending),
            "approved" => Some(Self::Approved),
            "archived" => Some(Self::Archived),
            _ => None,
        }
    }

    /// Label shown in the status picker.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pendiente",
            Self::Approved => "Aprobado",
            Self::Archived => "Archivado",
        }
    }

    pub fn cycle(self, delta: isize) -> Self {
        let all = Self::ALL;
        let current = all.iter().position(|status| *status == self).unwrap_or(0) as isize;
        let next = (current + delta).rem_euclid(all.len() as isize) as usize;
        all[next]
    }
}

/// The editable columns of a quote, in form order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuoteField {
    Reception,
    Date,
    Client,
    Unit,
    Document,
    Status,
}

impl QuoteField {
    pub const ALL: [Self; 6] = [
        Self::Reception,
        Self::Date,
        Self::Client,
        Self::Unit,
        Self::Document,
        Self::Status,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Reception => "Recepción",
            Self::Date => "Fecha",
            Self::Client => "Cliente",
            Self::Unit => "Unidad",
            Self::Document => "Documento",
            Self::Status => "Estatus",
        }
    }

    pub const fn is_text(self) -> bool {
        !matches!(self, Self::Status)
    }
}

/// Everything about a quote except its identity.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct QuoteFields {
    pub reception: String,
    pub date: String,
    pub client: String,
    pub unit: String,
    pub document: String,
    pub status: QuoteStatus,
}

impl QuoteFields {
    pub fn text(&self, field: QuoteField) -> &str {
        match field {
            QuoteField::Reception => &self.reception,
            QuoteField::Date => &self.date,
            QuoteField::Client => &self.client,
            QuoteField::Unit => &self.unit,
            QuoteField::Document => &self.document,
            QuoteField::Status => self.status.as_str(),
        }
    }

    /// Mutable access to a free-text field; `None` for the status enum.
    pub fn text_mut(&mut self, field: QuoteField) -> Option<&mut String> {
        match field {
            QuoteField::Reception => Some(&mut self.reception),
            QuoteField::Date => Some(&mut self.date),
            QuoteField::Client => Some(&mut self.client),
            QuoteField::Unit => Some(&mut self.unit),
            QuoteField::Document => Some(&mut self.document),
            QuoteField::Status => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub id: QuoteId,
    pub reception: String,
    pub date: String,
    pub client: String,
    pub unit: String,
    pub document: String,
    pub status: QuoteStatus,
}

impl Quote {
    pub fn from_fields(id: QuoteId, fields: QuoteFields) -> Self {
        Self {
            id,
            reception: fields.reception,
            date: fields.date,
            client: fields.client,
            unit: fields.unit,
            document: fields.document,
            status: fields.status,
        }
    }

    pub fn fields(&self) -> QuoteFields {
        QuoteFields {
            reception: self.reception.clone(),
            date: self.date.clone(),
            client: self.client.clone(),
            unit: self.unit.clone(),
            document: self.document.clone(),
            status: self.status,
        }
    }

    pub fn apply(&mut self, fields: QuoteFields) {
        self.reception = fields.reception;
        self.date = fields.date;
        self.client = fields.client;
        self.unit = fields.unit;
        self.document = fields.document;
        self.status = fields.status;
    }
}
