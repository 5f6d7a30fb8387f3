use super::error::ScreenError;
use super::form::Form;
use super::status::{InFlight, Notification, ScreenState, Slot, Ticket};
use crate::api::{ApiError, Entity, RecordId};
use crate::events::network::{Event as NetworkEvent, NetworkEventSender};
use crate::session::Session;
use crate::store::CollectionStore;
use log::*;

/// Houses the state of one entity screen: the fetched list, the open form,
/// the record targeted by edit or delete and the pending requests.
///
pub struct Screen<E: Entity> {
    session: Session,
    net_sender: NetworkEventSender<E>,
    state: ScreenState,
    store: CollectionStore<E>,
    form: Form,
    selected: Option<E>, // Target of the open edit form or delete confirmation
    form_ticket: Option<Ticket>, // Save submitted from the currently open form
    notification: Option<Notification>,
    in_flight: InFlight,
    next_generation: u64,
}

impl<E: Entity> Screen<E> {
    pub fn new(session: Session, net_sender: NetworkEventSender<E>) -> Self {
        Screen {
            session,
            net_sender,
            state: ScreenState::Viewing,
            store: CollectionStore::default(),
            form: Form::new(E::SCHEMA),
            selected: None,
            form_ticket: None,
            notification: None,
            in_flight: InFlight::default(),
            next_generation: 0,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn state(&self) -> ScreenState {
        self.state
    }

    pub fn store(&self) -> &CollectionStore<E> {
        &self.store
    }

    pub fn records(&self) -> &[E] {
        self.store.records()
    }

    pub fn form(&self) -> &Form {
        &self.form
    }

    /// Return the record targeted by the open edit form or delete
    /// confirmation.
    ///
    pub fn selected(&self) -> Option<&E> {
        self.selected.as_ref()
    }

    pub fn notification(&self) -> Option<&Notification> {
        self.notification.as_ref()
    }

    /// Dismiss the current notification, returning it.
    ///
    pub fn acknowledge_notification(&mut self) -> Option<Notification> {
        self.notification.take()
    }

    pub fn is_in_flight(&self, slot: Slot) -> bool {
        self.in_flight.get(slot).is_some()
    }

    /// Fetch the list for the first time.
    ///
    pub fn mount(&mut self) -> &mut Self {
        info!("Mounting {} screen...", E::COLLECTION);
        self.refresh()
    }

    /// Request a fresh copy of the list.
    ///
    pub fn refresh(&mut self) -> &mut Self {
        let ticket = self.begin_refresh();
        if let Err(e) = self.dispatch(NetworkEvent::Refresh { ticket }) {
            self.on_list_loaded(ticket, Err(e));
        }
        self
    }

    /// Issue a fetch ticket, superseding any fetch still in flight.
    ///
    pub fn begin_refresh(&mut self) -> Ticket {
        let ticket = self.issue(Slot::Fetch);
        if let Some(previous) = self.in_flight.replace(Slot::Fetch, ticket.generation) {
            debug!(
                "Fetch {} for {} superseded by fetch {}",
                previous,
                E::COLLECTION,
                ticket.generation
            );
        }
        self.store.begin_loading();
        if self.state == ScreenState::Viewing {
            self.state = ScreenState::Loading;
        }
        ticket
    }

    /// Apply the outcome of a list fetch. Returns false if the ticket was
    /// stale and the outcome discarded.
    ///
    pub fn on_list_loaded(&mut self, ticket: Ticket, result: Result<Vec<E>, ApiError>) -> bool {
        if !self.in_flight.settle(ticket) {
            warn!(
                "Discarding stale {} list (fetch {})",
                E::COLLECTION,
                ticket.generation
            );
            return false;
        }
        match result {
            Ok(records) => {
                let user_id = self.session.user_id;
                let (owned, foreign): (Vec<E>, Vec<E>) = records
                    .into_iter()
                    .partition(|record| record.user_id() == user_id);
                if !foreign.is_empty() {
                    warn!(
                        "Dropping {} {} records not owned by user {}",
                        foreign.len(),
                        E::COLLECTION,
                        user_id
                    );
                }
                self.store.replace(owned);
            }
            Err(e) => {
                self.store.fail(e.kind());
            }
        }
        if self.state == ScreenState::Loading {
            self.state = ScreenState::Viewing;
        }
        true
    }

    /// Open the create form with every field empty.
    ///
    pub fn request_add(&mut self) -> Result<(), ScreenError> {
        self.expect_viewing("add")?;
        self.reset_form();
        self.state = ScreenState::CreateForm;
        Ok(())
    }

    /// Open the edit form pre-populated from the current copy of a record.
    ///
    pub fn select_for_edit(&mut self, id: RecordId) -> Result<(), ScreenError> {
        self.expect_viewing("edit")?;
        let record = self.find(id)?;
        self.form = record.to_form();
        self.selected = Some(record);
        self.form_ticket = None;
        self.state = ScreenState::EditForm;
        Ok(())
    }

    /// Set a field of the open form.
    ///
    pub fn set_field(&mut self, name: &str, value: impl Into<String>) -> Result<(), ScreenError> {
        if !self.state.is_form() {
            return Err(ScreenError::InvalidTransition {
                state: self.state,
                action: "edit a field",
            });
        }
        self.form.set(name, value)?;
        Ok(())
    }

    /// Submit the open form as a create or update request. The form stays
    /// open until the outcome arrives.
    ///
    pub fn save(&mut self) -> Result<Ticket, ScreenError> {
        let target = match self.state {
            ScreenState::CreateForm => None,
            ScreenState::EditForm => Some(
                self.selected
                    .as_ref()
                    .map(Entity::id)
                    .ok_or(ScreenError::NoSelection)?,
            ),
            state => {
                return Err(ScreenError::InvalidTransition {
                    state,
                    action: "save",
                })
            }
        };
        if self.is_in_flight(Slot::Save) {
            warn!("Ignoring save of {}: previous save still in flight", E::LABEL);
            return Err(ScreenError::ActionInFlight(Slot::Save));
        }
        let fields = E::fields_from_form(&self.form)?;
        debug!(
            "Submitting {}: {}",
            E::LABEL,
            self.form
                .entries()
                .map(|(spec, value)| format!("{}='{}'", spec.label, value))
                .collect::<Vec<_>>()
                .join(", ")
        );

        let ticket = self.issue(Slot::Save);
        self.in_flight.replace(Slot::Save, ticket.generation);
        self.form_ticket = Some(ticket);
        let sent = match target {
            None => self.dispatch(NetworkEvent::Create { ticket, fields }),
            Some(id) => self.dispatch(NetworkEvent::Update { ticket, id, fields }),
        };
        if let Err(e) = sent {
            self.on_saved(ticket, Err(e));
        }
        Ok(ticket)
    }

    /// Apply the outcome of a create or update. Returns true if the list
    /// needs to be refreshed.
    ///
    pub fn on_saved(&mut self, ticket: Ticket, result: Result<E, ApiError>) -> bool {
        if !self.in_flight.settle(ticket) {
            warn!("Discarding stale {} save (save {})", E::LABEL, ticket.generation);
            return false;
        }
        let owns_form = self.form_ticket == Some(ticket);
        if owns_form {
            self.form_ticket = None;
        }
        match result {
            Ok(_) => {
                if owns_form && self.state.is_form() {
                    self.state = ScreenState::Viewing;
                    self.reset_form();
                }
                true
            }
            Err(e) => {
                self.notification = Some(Notification::failure(
                    format!("Could not save {}", E::LABEL),
                    &e,
                ));
                false
            }
        }
    }

    /// Ask for confirmation before deleting a record.
    ///
    pub fn request_delete(&mut self, id: RecordId) -> Result<(), ScreenError> {
        self.expect_viewing("delete")?;
        let record = self.find(id)?;
        self.selected = Some(record);
        self.state = ScreenState::ConfirmingDelete;
        Ok(())
    }

    /// Send the delete for the record awaiting confirmation.
    ///
    pub fn confirm_delete(&mut self) -> Result<Ticket, ScreenError> {
        if self.state != ScreenState::ConfirmingDelete {
            return Err(ScreenError::InvalidTransition {
                state: self.state,
                action: "confirm a delete",
            });
        }
        if self.is_in_flight(Slot::Delete) {
            warn!("Ignoring delete of {}: previous delete still in flight", E::LABEL);
            return Err(ScreenError::ActionInFlight(Slot::Delete));
        }
        let id = self
            .selected
            .take()
            .map(|record| record.id())
            .ok_or(ScreenError::NoSelection)?;

        let ticket = self.issue(Slot::Delete);
        self.in_flight.replace(Slot::Delete, ticket.generation);
        self.state = ScreenState::Viewing;
        if let Err(e) = self.dispatch(NetworkEvent::Delete { ticket, id }) {
            self.on_deleted(ticket, Err(e));
        }
        Ok(ticket)
    }

    /// Apply the outcome of a delete. Returns true if the list needs to be
    /// refreshed.
    ///
    pub fn on_deleted(&mut self, ticket: Ticket, result: Result<(), ApiError>) -> bool {
        if !self.in_flight.settle(ticket) {
            warn!(
                "Discarding stale {} delete (delete {})",
                E::LABEL,
                ticket.generation
            );
            return false;
        }
        match result {
            Ok(()) => true,
            Err(e) => {
                self.notification = Some(Notification::failure(
                    format!("Could not delete {}", E::LABEL),
                    &e,
                ));
                false
            }
        }
    }

    /// Leave the open form or delete confirmation without any network call.
    ///
    pub fn cancel(&mut self) -> Result<(), ScreenError> {
        match self.state {
            ScreenState::CreateForm | ScreenState::EditForm | ScreenState::ConfirmingDelete => {
                debug!("Cancelled {} while {}", E::LABEL, self.state);
                self.state = ScreenState::Viewing;
                self.reset_form();
                Ok(())
            }
            state => Err(ScreenError::InvalidTransition {
                state,
                action: "cancel",
            }),
        }
    }

    fn expect_viewing(&self, action: &'static str) -> Result<(), ScreenError> {
        if self.state == ScreenState::Viewing {
            Ok(())
        } else {
            Err(ScreenError::InvalidTransition {
                state: self.state,
                action,
            })
        }
    }

    fn find(&self, id: RecordId) -> Result<E, ScreenError> {
        self.store
            .get(id)
            .cloned()
            .ok_or(ScreenError::RecordNotFound { id })
    }

    fn reset_form(&mut self) {
        self.form = Form::new(E::SCHEMA);
        self.selected = None;
        self.form_ticket = None;
    }

    fn issue(&mut self, slot: Slot) -> Ticket {
        self.next_generation += 1;
        Ticket {
            slot,
            generation: self.next_generation,
        }
    }

    /// Send a network event to the handler.
    ///
    fn dispatch(&self, event: NetworkEvent<E>) -> Result<(), ApiError> {
        self.net_sender.send(event).map_err(|err| {
            error!("Received error from network dispatch: {}", err);
            ApiError::Disconnected
        })
    }
}
