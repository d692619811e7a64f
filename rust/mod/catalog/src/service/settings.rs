use catalog_core::{next_id, now_rfc3339, ServiceError};
use tracing::info;

use super::{files, CatalogService};
use crate::model::{Notification, Settings, User};

impl CatalogService {
    pub async fn get_settings(&self) -> Result<Settings, ServiceError> {
        self.state
            .read()
            .await
            .settings
            .clone()
            .ok_or_else(|| ServiceError::not_found("Settings"))
    }

    pub async fn save_user(&self, user: User) -> Result<User, ServiceError> {
        let user = self
            .commit(&[files::SETTINGS], |state| {
                let settings = state
                    .settings
                    .as_mut()
                    .ok_or_else(|| ServiceError::not_found("Settings"))?;
                settings.user = user.clone();
                Ok(user)
            })
            .await?;

        info!(user_id = user.user_id, "User settings saved");
        Ok(user)
    }

    /// Add a notification at the front of the list.
    pub async fn add_notification(
        &self,
        mut notification: Notification,
    ) -> Result<Notification, ServiceError> {
        let notification = self
            .commit(&[files::SETTINGS], |state| {
                let settings = state
                    .settings
                    .as_mut()
                    .ok_or_else(|| ServiceError::not_found("Settings"))?;

                notification.notification_id =
                    next_id(settings.notifications.iter().map(|n| n.notification_id));
                notification.created_at = now_rfc3339();
                settings.notifications.insert(0, notification.clone());
                Ok(notification)
            })
            .await?;

        info!(id = notification.notification_id, kind = notification.kind.as_str(), "Notification added");
        Ok(notification)
    }

    pub async fn delete_notification(&self, id: i64) -> Result<(), ServiceError> {
        self.commit(&[files::SETTINGS], |state| {
            let settings = state
                .settings
                .as_mut()
                .ok_or_else(|| ServiceError::not_found("Settings"))?;
            let before = settings.notifications.len();
            settings.notifications.retain(|n| n.notification_id != id);
            if settings.notifications.len() == before {
                return Err(ServiceError::not_found("Notification"));
            }
            Ok(())
        })
        .await
    }
}
