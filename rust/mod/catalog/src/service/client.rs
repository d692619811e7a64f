use catalog_core::{next_id, now_rfc3339, ServiceError};
use tracing::info;

use super::{files, CatalogService};
use crate::model::Client;

impl CatalogService {
    pub async fn list_clients(&self) -> Vec<Client> {
        self.state.read().await.clients.clone()
    }

    pub async fn get_client(&self, id: i64) -> Result<Client, ServiceError> {
        self.state
            .read()
            .await
            .clients
            .iter()
            .find(|c| c.client_id == id)
            .cloned()
            .ok_or_else(|| ServiceError::not_found("Client"))
    }

    pub async fn create_client(&self, mut client: Client) -> Result<Client, ServiceError> {
        let client = self
            .commit(&[files::CLIENTS], |state| {
                let now = now_rfc3339();
                client.client_id = next_id(state.clients.iter().map(|c| c.client_id));
                client.created_at = Some(now.clone());
                client.last_modified = Some(now);
                state.clients.push(client.clone());
                Ok(client)
            })
            .await?;

        info!(id = client.client_id, name = %client.name, "Client created");
        Ok(client)
    }

    /// Replace the whole record. `createdAt` is kept from the stored client.
    pub async fn replace_client(&self, id: i64, mut client: Client) -> Result<Client, ServiceError> {
        self.commit(&[files::CLIENTS], |state| {
            let slot = state
                .clients
                .iter_mut()
                .find(|c| c.client_id == id)
                .ok_or_else(|| ServiceError::not_found("Client"))?;

            let now = now_rfc3339();
            client.client_id = id;
            client.created_at = slot.created_at.clone().or_else(|| Some(now.clone()));
            client.last_modified = Some(now);
            *slot = client.clone();
            Ok(client)
        })
        .await
    }

    pub async fn delete_client(&self, id: i64) -> Result<(), ServiceError> {
        self.commit(&[files::CLIENTS], |state| {
            let before = state.clients.len();
            state.clients.retain(|c| c.client_id != id);
            if state.clients.len() == before {
                return Err(ServiceError::not_found("Client"));
            }
            Ok(())
        })
        .await?;
        info!(id, "Client deleted");
        Ok(())
    }
}
