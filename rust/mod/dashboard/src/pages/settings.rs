use catalog::model::{Notification, NotificationType, User, UserSummary};
use catalog_client::CatalogApi;
use catalog_mirror::{Alert, Alerts, Mirror, SyncError};
use catalog_types::{now_rfc3339, parse_instant, EntityId, Validate};
use tracing::debug;

use super::report;
use crate::view;
use crate::AppContext;

/// Current user and the notification feed.
///
/// Notifications are kept newest first. Marking one as read is local
/// only; the server has no call for it.
pub struct SettingsPage {
    api: CatalogApi,
    user: Option<User>,
    user_draft: Option<User>,
    notifications: Mirror<Notification>,
    alerts: Alerts,
}

impl SettingsPage {
    pub fn new(ctx: &AppContext) -> Self {
        Self {
            api: ctx.api().clone(),
            user: None,
            user_draft: None,
            notifications: Mirror::new(),
            alerts: Alerts::default(),
        }
    }

    pub async fn load(&mut self) -> Result<(), SyncError> {
        let settings = match self.api.settings().await {
            Ok(s) => s,
            Err(e) => return Err(report(&mut self.alerts, "load settings", e.into())),
        };
        let summary = UserSummary::from(&settings.user);
        let mut feed = settings.notifications;
        for n in feed.iter_mut().filter(|n| n.user.is_none()) {
            n.user = Some(summary.clone());
        }
        // Stable, so equal timestamps keep the server's order.
        feed.sort_by_cached_key(|n| std::cmp::Reverse(parse_instant(&n.created_at)));
        self.notifications.replace_all(feed);
        self.user = Some(settings.user);
        self.user_draft = None;
        Ok(())
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn notifications(&self) -> &[Notification] {
        self.notifications.items()
    }

    pub fn notifications_mirror_mut(&mut self) -> &mut Mirror<Notification> {
        &mut self.notifications
    }

    pub fn unread_count(&self) -> usize {
        view::unread_count(self.notifications.items())
    }

    // ── User ──

    /// Open the user form on a copy of the loaded user.
    pub fn edit_user(&mut self) -> Option<&mut User> {
        let user = self.user.clone()?;
        Some(self.user_draft.insert(user))
    }

    pub fn user_draft_mut(&mut self) -> Option<&mut User> {
        self.user_draft.as_mut()
    }

    pub fn cancel_user(&mut self) {
        self.user_draft = None;
    }

    /// Save the open user form. The user the server echoes replaces the
    /// loaded one.
    pub async fn save_user(&mut self) -> Result<User, SyncError> {
        let Some(draft) = self.user_draft.clone() else {
            return Err(SyncError::NothingOpen("user"));
        };
        let saved = match self.api.save_user(&draft).await {
            Ok(u) => u,
            Err(e) => return Err(report(&mut self.alerts, "save user", e.into())),
        };
        self.user = Some(saved.clone());
        self.user_draft = None;
        self.alerts.info("User settings saved.");
        Ok(saved)
    }

    // ── Notifications ──

    /// Send a notification for the current user and prepend the stored
    /// record. Blank messages are rejected before any call.
    pub async fn add_notification(
        &mut self,
        kind: NotificationType,
        message: &str,
    ) -> Result<Notification, SyncError> {
        let Some(user) = self.user.clone() else {
            return Err(report(
                &mut self.alerts,
                "add notification",
                SyncError::NothingOpen("user"),
            ));
        };
        let draft = Notification {
            user_id: user.user_id,
            kind,
            message: message.trim().to_string(),
            is_read: false,
            created_at: now_rfc3339(),
            ..Default::default()
        };
        if let Err(e) = draft.validate() {
            return Err(report(&mut self.alerts, "add notification", e.into()));
        }
        let mut stored = match self.api.add_notification(&draft).await {
            Ok(n) => n,
            Err(e) => return Err(report(&mut self.alerts, "add notification", e.into())),
        };
        if stored.user.is_none() {
            stored.user = Some(UserSummary::from(&user));
        }
        self.notifications.prepend(stored.clone());
        self.alerts.info("Notification sent.");
        Ok(stored)
    }

    /// Mark as read locally. Returns false for an unknown id.
    pub fn mark_read(&mut self, id: EntityId) -> bool {
        let marked = self.notifications.modify(id, |n| n.is_read = true).is_some();
        debug!(notification_id = id, marked, "marked read");
        marked
    }

    pub async fn delete_notification(&mut self, id: EntityId) -> Result<(), SyncError> {
        if let Err(e) = self.api.delete_notification(id).await {
            return Err(report(&mut self.alerts, "delete notification", e.into()));
        }
        self.notifications.remove(id);
        Ok(())
    }

    pub fn take_alerts(&mut self) -> Vec<Alert> {
        self.alerts.take()
    }
}
