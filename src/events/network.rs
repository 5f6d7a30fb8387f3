use crate::api::{ApiError, Entity, EntityClient, RecordId};
use crate::screen::{Screen, Ticket};
use log::*;
use std::error::Error;
use std::sync::{mpsc, Arc};
use tokio::sync::Mutex;

/// Specify different network event types.
///
#[derive(Debug, Clone)]
pub enum Event<E: Entity> {
    Refresh {
        ticket: Ticket,
    },
    Create {
        ticket: Ticket,
        fields: E::Fields,
    },
    Update {
        ticket: Ticket,
        id: RecordId,
        fields: E::Fields,
    },
    Delete {
        ticket: Ticket,
        id: RecordId,
    },
}

pub type NetworkEventSender<E> = mpsc::Sender<Event<E>>;
pub type NetworkEventReceiver<E> = mpsc::Receiver<Event<E>>;

/// Specify struct for managing screen state with network events.
///
pub struct Handler<'a, E: Entity> {
    screen: &'a Arc<Mutex<Screen<E>>>,
    client: &'a EntityClient<E>,
}

impl<'a, E: Entity> Handler<'a, E> {
    /// Return new instance with reference to screen.
    ///
    pub fn new(screen: &'a Arc<Mutex<Screen<E>>>, client: &'a EntityClient<E>) -> Self {
        Handler { screen, client }
    }

    /// Handle every event currently queued on the receiver, in order.
    ///
    pub async fn drain(&mut self, receiver: &NetworkEventReceiver<E>) -> usize {
        let mut handled = 0;
        while let Ok(event) = receiver.try_recv() {
            self.handle(event).await;
            handled += 1;
        }
        handled
    }

    /// Handle network events by type.
    ///
    pub async fn handle(&mut self, event: Event<E>) {
        debug!("Processing network event '{:?}'...", event);
        match event {
            Event::Refresh { ticket } => self.fetch(ticket).await,
            Event::Create { ticket, fields } => self.create(ticket, fields).await,
            Event::Update { ticket, id, fields } => self.update(ticket, id, fields).await,
            Event::Delete { ticket, id } => self.delete(ticket, id).await,
        }
    }

    /// Update screen with the list of records for the session user.
    ///
    async fn fetch(&mut self, ticket: Ticket) {
        let session = self.screen.lock().await.session().clone();
        info!(
            "Fetching {} for user {}...",
            E::COLLECTION,
            session.user_id
        );
        let result = self.client.list(&session).await;
        match &result {
            Ok(records) => info!("Received {} {} records.", records.len(), E::COLLECTION),
            Err(e) => log_failure(&format!("Failed to fetch {}", E::COLLECTION), e),
        }
        let mut screen = self.screen.lock().await;
        screen.on_list_loaded(ticket, result);
    }

    /// Re-read the list after a successful mutation.
    ///
    async fn refresh(&mut self) {
        let ticket = self.screen.lock().await.begin_refresh();
        self.fetch(ticket).await;
    }

    async fn create(&mut self, ticket: Ticket, fields: E::Fields) {
        let session = self.screen.lock().await.session().clone();
        info!("Creating new {}...", E::LABEL);
        let result = self.client.create(&fields, &session).await;
        match &result {
            Ok(record) => info!("Created {} {}.", E::LABEL, record.id()),
            Err(e) => log_failure(&format!("Failed to create {}", E::LABEL), e),
        }
        self.after_save(ticket, result).await;
    }

    async fn update(&mut self, ticket: Ticket, id: RecordId, fields: E::Fields) {
        let session = self.screen.lock().await.session().clone();
        info!("Updating {} {}...", E::LABEL, id);
        let result = self.client.update(id, &fields, &session).await;
        match &result {
            Ok(_) => info!("{} {} updated successfully.", E::LABEL, id),
            Err(e) => log_failure(&format!("Failed to update {} {}", E::LABEL, id), e),
        }
        self.after_save(ticket, result).await;
    }

    async fn after_save(&mut self, ticket: Ticket, result: Result<E, ApiError>) {
        let needs_refresh = self.screen.lock().await.on_saved(ticket, result);
        if needs_refresh {
            self.refresh().await;
        }
    }

    async fn delete(&mut self, ticket: Ticket, id: RecordId) {
        info!("Deleting {} {}...", E::LABEL, id);
        let result = self.client.delete(id).await;
        match &result {
            Ok(()) => info!("{} {} deleted successfully.", E::LABEL, id),
            Err(e) => log_failure(&format!("Failed to delete {} {}", E::LABEL, id), e),
        }
        let needs_refresh = self.screen.lock().await.on_deleted(ticket, result);
        if needs_refresh {
            self.refresh().await;
        }
    }
}

/// Log an API failure with its full error chain.
///
fn log_failure(context: &str, error: &ApiError) {
    error!("{}: {}", context, error);
    let mut source = error.source();
    while let Some(err) = source {
        error!("  Caused by: {}", err);
        source = err.source();
    }
}
