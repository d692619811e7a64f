use catalog::model::{Client, ClientLocation};
use catalog_mirror::{Alert, Alerts, SyncError};
use catalog_types::EntityId;

use super::{drain, generated_id, report, List};
use crate::view;
use crate::AppContext;

/// Address fields of the client form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocationForm {
    pub address: String,
    pub city: String,
    pub country: String,
}

impl LocationForm {
    /// No address means no location.
    pub fn is_blank(&self) -> bool {
        self.address.trim().is_empty()
    }

    fn from_location(loc: &ClientLocation) -> Self {
        Self {
            address: loc.address.clone(),
            city: loc.city.clone(),
            country: loc.country.clone(),
        }
    }

    fn same_as(&self, loc: &ClientLocation) -> bool {
        self.address.trim() == loc.address.trim()
            && self.city.trim() == loc.city.trim()
            && self.country.trim() == loc.country.trim()
    }

    fn to_location(&self, client_location_id: EntityId) -> ClientLocation {
        ClientLocation {
            client_location_id,
            address: self.address.trim().to_string(),
            city: self.city.trim().to_string(),
            country: self.country.trim().to_string(),
        }
    }
}

/// Typed client form.
///
/// The three linked-id lists are edited as rows: row `i` is
/// `(product_ids[i], release_ids[i], update_log_ids[i])`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientForm {
    pub name: String,
    pub primary_contact: String,
    pub email: String,
    pub billing_info: Option<String>,
    pub location: LocationForm,
    pub product_ids: Vec<EntityId>,
    pub release_ids: Vec<EntityId>,
    pub update_log_ids: Vec<EntityId>,
}

impl ClientForm {
    pub fn new(name: &str, primary_contact: &str, email: &str) -> Self {
        Self {
            name: name.to_string(),
            primary_contact: primary_contact.to_string(),
            email: email.to_string(),
            ..Default::default()
        }
    }

    /// Form prefilled from a client; the location fields show its first
    /// location.
    pub fn from_client(client: &Client) -> Self {
        Self {
            name: client.name.clone(),
            primary_contact: client.primary_contact.clone(),
            email: client.email.clone(),
            billing_info: client.billing_info.clone(),
            location: client
                .locations
                .first()
                .map(LocationForm::from_location)
                .unwrap_or_default(),
            product_ids: client.product_ids.clone(),
            release_ids: client.release_ids.clone(),
            update_log_ids: client.update_log_ids.clone(),
        }
    }

    pub fn add_linked_row(&mut self, product_id: EntityId, release_id: EntityId, update_log_id: EntityId) {
        self.product_ids.push(product_id);
        self.release_ids.push(release_id);
        self.update_log_ids.push(update_log_id);
    }

    /// Drop row `index` from all three lists. Lists shorter than `index`
    /// are left alone.
    pub fn remove_linked_row(&mut self, index: usize) {
        for ids in [
            &mut self.product_ids,
            &mut self.release_ids,
            &mut self.update_log_ids,
        ] {
            if index < ids.len() {
                ids.remove(index);
            }
        }
    }

    /// A new client. `locations` is empty without an address, otherwise
    /// one location with `location_id`.
    pub fn to_new_client(&self, location_id: EntityId) -> Client {
        let locations = if self.location.is_blank() {
            Vec::new()
        } else {
            vec![self.location.to_location(location_id)]
        };
        Client {
            locations,
            ..self.fields_onto(Client::default())
        }
    }

    /// `existing` with the form applied. An address that differs from
    /// the first location replaces all locations with a new one under
    /// `location_id`; otherwise the locations are kept.
    pub fn apply_to(&self, existing: &Client, location_id: EntityId) -> Client {
        let keep = self.location.is_blank()
            || existing
                .locations
                .first()
                .is_some_and(|loc| self.location.same_as(loc));
        let locations = if keep {
            existing.locations.clone()
        } else {
            vec![self.location.to_location(location_id)]
        };
        Client {
            locations,
            ..self.fields_onto(existing.clone())
        }
    }

    fn fields_onto(&self, client: Client) -> Client {
        Client {
            name: self.name.trim().to_string(),
            primary_contact: self.primary_contact.trim().to_string(),
            email: self.email.trim().to_string(),
            billing_info: self
                .billing_info
                .as_deref()
                .map(str::trim)
                .filter(|b| !b.is_empty())
                .map(str::to_string),
            product_ids: self.product_ids.clone(),
            release_ids: self.release_ids.clone(),
            update_log_ids: self.update_log_ids.clone(),
            ..client
        }
    }
}

#[derive(Debug, Clone)]
struct OpenForm {
    editing: Option<EntityId>,
    form: ClientForm,
}

/// Searchable client list with add and edit forms.
pub struct ClientsPage {
    clients: List<Client>,
    open: Option<OpenForm>,
    alerts: Alerts,
    pub search: String,
}

impl ClientsPage {
    pub fn new(ctx: &AppContext) -> Self {
        Self {
            clients: List::new(ctx.api().clients()),
            open: None,
            alerts: Alerts::default(),
            search: String::new(),
        }
    }

    pub async fn load(&mut self) -> Result<usize, SyncError> {
        self.clients.load().await
    }

    pub fn clients(&self) -> &[Client] {
        self.clients.items()
    }

    /// Clients matching the search box on name, contact or email.
    pub fn filtered(&self) -> Vec<&Client> {
        view::search(self.clients.items(), &self.search)
    }

    pub fn select(&mut self, id: EntityId) -> Option<&Client> {
        self.clients.select(id)
    }

    pub fn selected(&self) -> Option<&Client> {
        self.clients.selected()
    }

    // ── Form ──

    pub fn open_new(&mut self) -> &mut ClientForm {
        &mut self
            .open
            .insert(OpenForm {
                editing: None,
                form: ClientForm::default(),
            })
            .form
    }

    pub fn open_edit(&mut self, id: EntityId) -> Result<&mut ClientForm, SyncError> {
        let client = self.clients.get(id).ok_or(SyncError::NotLoaded {
            entity: "client",
            id,
        })?;
        let form = ClientForm::from_client(client);
        Ok(&mut self
            .open
            .insert(OpenForm {
                editing: Some(id),
                form,
            })
            .form)
    }

    pub fn form(&self) -> Option<&ClientForm> {
        self.open.as_ref().map(|o| &o.form)
    }

    pub fn form_mut(&mut self) -> Option<&mut ClientForm> {
        self.open.as_mut().map(|o| &mut o.form)
    }

    /// Id of the client being edited; `None` for the add form or when
    /// closed.
    pub fn editing_id(&self) -> Option<EntityId> {
        self.open.as_ref().and_then(|o| o.editing)
    }

    pub fn cancel(&mut self) {
        self.open = None;
    }

    /// Submit the open form. It closes on success and stays open with
    /// its input on failure.
    pub async fn save(&mut self) -> Result<Client, SyncError> {
        let Some(open) = self.open.clone() else {
            return Err(SyncError::NothingOpen("client"));
        };
        let stored = match open.editing {
            None => {
                let client = open.form.to_new_client(generated_id());
                self.clients.create(&client).await?
            }
            Some(id) => {
                let Some(existing) = self.clients.get(id).cloned() else {
                    return Err(report(
                        &mut self.alerts,
                        "save client",
                        SyncError::NotLoaded { entity: "client", id },
                    ));
                };
                let client = open.form.apply_to(&existing, generated_id());
                self.clients.update(id, &client).await?
            }
        };
        self.open = None;
        Ok(stored)
    }

    /// Delete a client; a form or detail panel showing it is closed.
    pub async fn delete(&mut self, id: EntityId) -> Result<(), SyncError> {
        self.clients.remove(id).await?;
        if self.editing_id() == Some(id) {
            self.open = None;
        }
        Ok(())
    }

    pub fn take_alerts(&mut self) -> Vec<Alert> {
        drain(&mut self.alerts, [self.clients.take_alerts()])
    }
}
