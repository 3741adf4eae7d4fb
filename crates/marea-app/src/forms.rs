// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, anyhow, bail};
use time::Date;
use time::macros::format_description;

use crate::{Quote, QuoteField, QuoteFields, QuoteId, QuoteStatus, QuoteStore};

/// In-progress quote held by the modal. `id` is `None` until the draft has
/// been committed to the store.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QuoteDraft {
    pub id: Option<QuoteId>,
    pub fields: QuoteFields,
}

impl QuoteDraft {
    pub fn blank() -> Self {
        Self::default()
    }

    pub fn from_quote(quote: &Quote) -> Self {
        Self {
            id: Some(quote.id),
            fields: quote.fields(),
        }
    }

    pub fn set_field(&mut self, field: QuoteField, value: &str) -> Result<()> {
        match self.fields.text_mut(field) {
            Some(text) => {
                *text = value.to_owned();
            }
            None => {
                self.fields.status = QuoteStatus::parse(value).ok_or_else(|| {
                    anyhow!("unknown quote status {value:?} -- use pending, approved, or archived")
                })?;
            }
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        let date = self.fields.date.trim();
        if !date.is_empty() {
            parse_quote_date(date)?;
        }
        Ok(())
    }
}

pub fn parse_quote_date(raw: &str) -> Result<Date> {
    Date::parse(raw, format_description!("[year]-[month]-[day]")).map_err(|_| {
        anyhow!("quote date {raw:?} is not a calendar date -- use YYYY-MM-DD or leave it blank")
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalMode {
    Closed,
    Creating,
    Editing(QuoteId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Created(QuoteId),
    Updated(QuoteId),
    /// The quote being edited was deleted while the form was open.
    Missing(QuoteId),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QuoteModal {
    open: bool,
    draft: QuoteDraft,
}

impl QuoteModal {
    pub fn mode(&self) -> ModalMode {
        match (self.open, self.draft.id) {
            (false, _) => ModalMode::Closed,
            (true, None) => ModalMode::Creating,
            (true, Some(id)) => ModalMode::Editing(id),
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn draft(&self) -> &QuoteDraft {
        &self.draft
    }

    pub fn open_for_create(&mut self) {
        self.draft = QuoteDraft::blank();
        self.open = true;
    }

    pub fn open_for_edit(&mut self, quote: &Quote) {
        self.draft = QuoteDraft::from_quote(quote);
        self.open = true;
    }

    pub fn set_field(&mut self, field: QuoteField, value: &str) -> Result<()> {
        self.draft.set_field(field, value)
    }

    pub fn cycle_status(&mut self, delta: isize) -> QuoteStatus {
        self.draft.fields.status = self.draft.fields.status.cycle(delta);
        self.draft.fields.status
    }

    /// Commits the draft. A validation failure keeps the modal open with the
    /// draft intact; every other path closes and resets it.
    pub fn submit(&mut self, store: &mut QuoteStore) -> Result<SubmitOutcome> {
        if !self.open {
            bail!("no quote form is open -- press a to start a new quote");
        }
        self.draft.validate()?;

        let mut draft = std::mem::take(&mut self.draft);
        self.open = false;
        draft.fields.date = draft.fields.date.trim().to_owned();
        let outcome = match draft.id {
            Some(id) => match store.update(id, draft.fields) {
                Some(_) => SubmitOutcome::Updated(id),
                None => SubmitOutcome::Missing(id),
            },
            None => SubmitOutcome::Created(store.add(draft.fields)),
        };
        Ok(outcome)
    }

    pub fn cancel(&mut self) {
        self.open = false;
        self.draft = QuoteDraft::blank();
    }
}

#[cfg(test)]
mod tests {
    use super::{ModalMode, QuoteDraft, QuoteModal, SubmitOutcome, parse_quote_date};
    use crate::{QuoteField, QuoteFields, QuoteId, QuoteStatus, QuoteStore};
    use anyhow::Result;

    fn store_with_one() -> (QuoteStore, QuoteId) {
        let mut store = QuoteStore::new();
        let id = store.add(QuoteFields {
            reception: "R-7".to_owned(),
            date: "2026-02-01".to_owned(),
            client: "Ana Pérez".to_owned(),
            unit: "Seadoo GTX".to_owned(),
            document: "COT-7".to_owned(),
            status: QuoteStatus::Pending,
        });
        (store, id)
    }

    #[test]
    fn blank_draft_is_pending_with_empty_fields() {
        let draft = QuoteDraft::blank();
        assert!(draft.id.is_none());
        assert_eq!(draft.fields.status, QuoteStatus::Pending);
        for field in QuoteField::ALL.into_iter().filter(|field| field.is_text()) {
            assert_eq!(draft.fields.text(field), "");
        }
    }

    #[test]
    fn set_field_touches_exactly_one_field() -> Result<()> {
        let mut draft = QuoteDraft::blank();
        draft.set_field(QuoteField::Client, "Luis Gómez")?;
        assert_eq!(
            draft.fields,
            QuoteFields {
                client: "Luis Gómez".to_owned(),
                ..QuoteFields::default()
            }
        );

        draft.set_field(QuoteField::Status, "approved")?;
        assert_eq!(draft.fields.status, QuoteStatus::Approved);
        assert_eq!(draft.fields.client, "Luis Gómez");
        Ok(())
    }

    #[test]
    fn unknown_status_is_rejected_and_draft_kept() {
        let mut draft = QuoteDraft::blank();
        let error = draft
            .set_field(QuoteField::Status, "rejected")
            .expect_err("unknown status should fail");
        assert!(error.to_string().contains("unknown quote status"));
        assert_eq!(draft.fields.status, QuoteStatus::Pending);
    }

    #[test]
    fn validation_accepts_blank_and_iso_dates_only() {
        let mut draft = QuoteDraft::blank();
        assert!(draft.validate().is_ok());

        draft.fields.date = "2026-03-14".to_owned();
        assert!(draft.validate().is_ok());

        draft.fields.date = "14/03/2026".to_owned();
        assert!(draft.validate().is_err());

        assert!(parse_quote_date("2026-02-30").is_err());
    }

    #[test]
    fn modal_modes_follow_draft_identity() {
        let (store, id) = store_with_one();
        let mut modal = QuoteModal::default();
        assert_eq!(modal.mode(), ModalMode::Closed);

        modal.open_for_create();
        assert_eq!(modal.mode(), ModalMode::Creating);

        modal.open_for_edit(store.get(id).expect("quote exists"));
        assert_eq!(modal.mode(), ModalMode::Editing(id));
        assert_eq!(modal.draft().fields.client, "Ana Pérez");
    }

    #[test]
    fn submit_without_id_creates_pending_quote() -> Result<()> {
        let mut store = QuoteStore::new();
        let mut modal = QuoteModal::default();
        modal.open_for_create();
        modal.set_field(QuoteField::Client, "Ana Pérez")?;
        modal.set_field(QuoteField::Unit, "Seadoo GTX")?;

        let outcome = modal.submit(&mut store)?;
        let SubmitOutcome::Created(id) = outcome else {
            panic!("expected a created outcome, got {outcome:?}");
        };
        let quote = store.get(id).expect("created quote");
        assert_eq!(quote.status, QuoteStatus::Pending);
        assert_eq!(quote.client, "Ana Pérez");
        assert_eq!(modal.mode(), ModalMode::Closed);
        assert_eq!(modal.draft(), &QuoteDraft::blank());
        Ok(())
    }

    #[test]
    fn submit_commits_trimmed_date() -> Result<()> {
        let mut store = QuoteStore::new();
        let mut modal = QuoteModal::default();
        modal.open_for_create();
        modal.set_field(QuoteField::Date, " 2026-03-14 ")?;

        let SubmitOutcome::Created(id) = modal.submit(&mut store)? else {
            panic!("expected a created outcome");
        };
        assert_eq!(
            store.get(id).map(|quote| quote.date.as_str()),
            Some("2026-03-14")
        );
        Ok(())
    }

    #[test]
    fn submit_with_id_updates_in_place() -> Result<()> {
        let (mut store, id) = store_with_one();
        let mut modal = QuoteModal::default();
        modal.open_for_edit(store.get(id).expect("quote exists"));
        modal.set_field(QuoteField::Unit, "Yamaha VX")?;

        assert_eq!(modal.submit(&mut store)?, SubmitOutcome::Updated(id));
        assert_eq!(store.len(), 1);
        let quote = store.get(id).expect("quote kept its id");
        assert_eq!(quote.unit, "Yamaha VX");
        assert_eq!(quote.client, "Ana Pérez");
        Ok(())
    }

    #[test]
    fn submit_reports_missing_edit_target() -> Result<()> {
        let (mut store, id) = store_with_one();
        let mut modal = QuoteModal::default();
        modal.open_for_edit(store.get(id).expect("quote exists"));
        store.remove(id);

        assert_eq!(modal.submit(&mut store)?, SubmitOutcome::Missing(id));
        assert!(store.is_empty());
        assert!(!modal.is_open());
        Ok(())
    }

    #[test]
    fn invalid_submit_keeps_modal_open() -> Result<()> {
        let mut store = QuoteStore::new();
        let mut modal = QuoteModal::default();
        modal.open_for_create();
        modal.set_field(QuoteField::Date, "mañana")?;

        assert!(modal.submit(&mut store).is_err());
        assert!(modal.is_open());
        assert_eq!(modal.draft().fields.date, "mañana");
        assert!(store.is_empty());
        Ok(())
    }

    #[test]
    fn submit_when_closed_fails() {
        let mut store = QuoteStore::new();
        let mut modal = QuoteModal::default();
        assert!(modal.submit(&mut store).is_err());
        assert!(store.is_empty());
    }

    #[test]
    fn cancel_discards_edits_without_touching_store() -> Result<()> {
        let (store, id) = store_with_one();
        let before = store.clone();
        let mut modal = QuoteModal::default();
        modal.open_for_edit(store.get(id).expect("quote exists"));
        modal.set_field(QuoteField::Client, "Somebody Else")?;
        modal.cycle_status(1);

        modal.cancel();
        assert_eq!(store, before);
        assert_eq!(modal.mode(), ModalMode::Closed);
        assert_eq!(modal.draft(), &QuoteDraft::blank());
        assert_eq!(
            store.get(id).map(|quote| quote.client.as_str()),
            Some("Ana Pérez")
        );
        Ok(())
    }
}
