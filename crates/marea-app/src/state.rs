// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::{
    ModalMode, Quote, QuoteField, QuoteId, QuoteModal, QuoteStore, SubmitOutcome, filter_by_client,
};

/// State of the quotes view. Commands are the only way to mutate it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QuotesState {
    pub store: QuoteStore,
    pub modal: QuoteModal,
    pub search: String,
    pub status_line: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuoteCommand {
    OpenCreate,
    OpenEdit(QuoteId),
    SetField(QuoteField, String),
    CycleStatus(isize),
    Submit,
    Cancel,
    Delete(QuoteId),
    Archive(QuoteId),
    SetSearch(String),
    SetStatus(String),
    ClearStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuoteEvent {
    ModalOpened(ModalMode),
    ModalClosed,
    DraftChanged(QuoteField),
    QuoteCreated(QuoteId),
    QuoteUpdated(QuoteId),
    QuoteArchived(QuoteId),
    QuoteDeleted(QuoteId),
    TargetMissing(QuoteId),
    Rejected(String),
    SearchChanged(String),
    StatusUpdated(String),
    StatusCleared,
}

impl QuotesState {
    pub fn with_store(store: QuoteStore) -> Self {
        Self {
            store,
            ..Self::default()
        }
    }

    /// Quotes that pass the current client search, in store order.
    pub fn visible(&self) -> Vec<&Quote> {
        filter_by_client(self.store.list(), &self.search)
    }

    pub fn dispatch(&mut self, command: QuoteCommand) -> Vec<QuoteEvent> {
        match command {
            QuoteCommand::OpenCreate => {
                self.modal.open_for_create();
                vec![QuoteEvent::ModalOpened(self.modal.mode())]
            }
            QuoteCommand::OpenEdit(id) => {
                let Some(quote) = self.store.get(id).cloned() else {
                    return self.missing(id);
                };
                self.modal.open_for_edit(&quote);
                vec![QuoteEvent::ModalOpened(self.modal.mode())]
            }
            QuoteCommand::SetField(field, value) => match self.modal.set_field(field, &value) {
                Ok(()) => vec![QuoteEvent::DraftChanged(field)],
                Err(error) => self.reject(error.to_string()),
            },
            QuoteCommand::CycleStatus(delta) => {
                let status = self.modal.cycle_status(delta);
                vec![
                    QuoteEvent::DraftChanged(QuoteField::Status),
                    self.set_status(&format!("status {}", status.as_str())),
                ]
            }
            QuoteCommand::Submit => match self.modal.submit(&mut self.store) {
                Ok(SubmitOutcome::Created(id)) => vec![
                    QuoteEvent::QuoteCreated(id),
                    QuoteEvent::ModalClosed,
                    self.set_status(&format!("quote {id} created")),
                ],
                Ok(SubmitOutcome::Updated(id)) => vec![
                    QuoteEvent::QuoteUpdated(id),
                    QuoteEvent::ModalClosed,
                    self.set_status(&format!("quote {id} saved")),
                ],
                Ok(SubmitOutcome::Missing(id)) => {
                    let mut events = vec![QuoteEvent::ModalClosed];
                    events.extend(self.missing(id));
                    events
                }
                Err(error) => self.reject(error.to_string()),
            },
            QuoteCommand::Cancel => {
                self.modal.cancel();
                vec![QuoteEvent::ModalClosed, self.set_status("edit discarded")]
            }
            QuoteCommand::Delete(id) => match self.store.remove(id) {
                Some(_) => vec![
                    QuoteEvent::QuoteDeleted(id),
                    self.set_status(&format!("quote {id} deleted")),
                ],
                None => self.missing(id),
            },
            QuoteCommand::Archive(id) => {
                if self.store.archive(id).is_none() {
                    return self.missing(id);
                }
                vec![
                    QuoteEvent::QuoteArchived(id),
                    self.set_status(&format!("quote {id} archived")),
                ]
            }
            QuoteCommand::SetSearch(term) => {
                self.search = term;
                vec![QuoteEvent::SearchChanged(self.search.clone())]
            }
            QuoteCommand::SetStatus(message) => vec![self.set_status(&message)],
            QuoteCommand::ClearStatus => {
                self.status_line = None;
                vec![QuoteEvent::StatusCleared]
            }
        }
    }

    fn missing(&mut self, id: QuoteId) -> Vec<QuoteEvent> {
        vec![
            QuoteEvent::TargetMissing(id),
            self.set_status(&format!("quote {id} no longer exists")),
        ]
    }

    fn reject(&mut self, message: String) -> Vec<QuoteEvent> {
        self.status_line = Some(message.clone());
        vec![QuoteEvent::Rejected(message)]
    }

    fn set_status(&mut self, message: &str) -> QuoteEvent {
        self.status_line = Some(message.to_owned());
        QuoteEvent::StatusUpdated(message.to_owned())
    }
}
