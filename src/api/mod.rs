//! REST access to the organizer service.
//!
//! [`EntityClient`] is the per-collection accessor used by the screens and is
//! generic over the [`Entity`] descriptor. [`UserClient`] covers the user
//! directory.

mod client;
pub mod datetime;
mod entity;
mod error;
mod resource;

pub use client::Client;
pub use entity::{Entity, RecordId};
pub use error::{ApiError, ErrorKind};
pub use resource::*;

use crate::session::{Session, UserId};
use log::*;
use reqwest::Method;
use serde::Serialize;
use std::marker::PhantomData;

/// Request body for create and update: the entity fields plus the owner.
///
#[derive(Serialize)]
struct Payload<'a, F: Serialize> {
    #[serde(flatten)]
    fields: &'a F,
    user_id: UserId,
}

/// Responsible for asynchronous list, create, update and delete calls against
/// one entity collection.
///
pub struct EntityClient<E: Entity> {
    client: Client,
    entity: PhantomData<fn() -> E>,
}

impl<E: Entity> Clone for EntityClient<E> {
    fn clone(&self) -> Self {
        EntityClient {
            client: self.client.clone(),
            entity: PhantomData,
        }
    }
}

impl<E: Entity> EntityClient<E> {
    /// Returns a new instance for the given base URL.
    ///
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        debug!(
            "Initializing {} client for base URL {}...",
            E::COLLECTION,
            base_url
        );
        Ok(Self::from_client(Client::new(base_url)?))
    }

    /// Returns a new instance sharing an existing HTTP client.
    ///
    pub fn from_client(client: Client) -> Self {
        EntityClient {
            client,
            entity: PhantomData,
        }
    }

    /// Returns every record of the collection owned by the session user, in
    /// service order.
    ///
    pub async fn list(&self, session: &Session) -> Result<Vec<E>, ApiError> {
        debug!(
            "Requesting {} for user {}...",
            E::COLLECTION,
            session.user_id
        );
        let records: Vec<E> = self
            .client
            .get(
                &collection_path::<E>(),
                &[("user_id", session.user_id.to_string())],
            )
            .await?;
        debug!(
            "Retrieved {} {} records for user {}",
            records.len(),
            E::COLLECTION,
            session.user_id
        );
        Ok(records)
    }

    /// Create a record owned by the session user and return it with its
    /// service-assigned id.
    ///
    pub async fn create(&self, fields: &E::Fields, session: &Session) -> Result<E, ApiError> {
        debug!("Creating {} for user {}...", E::LABEL, session.user_id);
        let payload = Payload {
            fields,
            user_id: session.user_id,
        };
        let record: E = self
            .client
            .send(Method::POST, &collection_path::<E>(), &payload)
            .await?;
        debug!("Created {} with id {}", E::LABEL, record.id());
        Ok(record)
    }

    /// Replace the editable fields of the record with the given id.
    ///
    pub async fn update(
        &self,
        id: RecordId,
        fields: &E::Fields,
        session: &Session,
    ) -> Result<E, ApiError> {
        debug!("Updating {} {}...", E::LABEL, id);
        let payload = Payload {
            fields,
            user_id: session.user_id,
        };
        self.client
            .send(Method::PUT, &record_path::<E>(id), &payload)
            .await
            .map_err(|e| not_found::<E>(e, id))
    }

    /// Delete the record with the given id.
    ///
    pub async fn delete(&self, id: RecordId) -> Result<(), ApiError> {
        debug!("Deleting {} {}...", E::LABEL, id);
        self.client
            .delete(&record_path::<E>(id))
            .await
            .map_err(|e| not_found::<E>(e, id))
    }
}

/// Responsible for the user directory.
///
#[derive(Clone)]
pub struct UserClient {
    client: Client,
}

impl UserClient {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        Ok(UserClient {
            client: Client::new(base_url)?,
        })
    }

    /// Returns every registered user.
    ///
    pub async fn list(&self) -> Result<Vec<User>, ApiError> {
        debug!("Requesting users...");
        self.client.get("users/", &[]).await
    }

    /// Register a user and return it with its service-assigned id.
    ///
    pub async fn create(&self, user: &NewUser) -> Result<User, ApiError> {
        debug!("Registering user {}...", user.email);
        self.client.send(Method::POST, "users/", user).await
    }
}

fn collection_path<E: Entity>() -> String {
    format!("{}/", E::COLLECTION)
}

fn record_path<E: Entity>(id: RecordId) -> String {
    format!("{}/{}", E::COLLECTION, id)
}

fn not_found<E: Entity>(error: ApiError, id: RecordId) -> ApiError {
    match error {
        ApiError::Server { status: 404, .. } => ApiError::NotFound {
            collection: E::COLLECTION,
            id,
        },
        other => other,
    }
}
