use catalog_types::{EntityId, RequiredFields, Resource, Validate, ValidationError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Admin,
    ReleaseManager,
    Approver,
    #[default]
    User,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    #[default]
    UpdateAvailable,
    LicenseExpired,
    ReleasePublished,
    SystemAlert,
    UserMention,
}

impl NotificationType {
    pub const ALL: [NotificationType; 5] = [
        NotificationType::UpdateAvailable,
        NotificationType::LicenseExpired,
        NotificationType::ReleasePublished,
        NotificationType::SystemAlert,
        NotificationType::UserMention,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            NotificationType::UpdateAvailable => "update_available",
            NotificationType::LicenseExpired => "license_expired",
            NotificationType::ReleasePublished => "release_published",
            NotificationType::SystemAlert => "system_alert",
            NotificationType::UserMention => "user_mention",
        }
    }

    /// Parse the wire name, as typed on the command line.
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == s)
    }
}

/// The signed-in dashboard user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(default)]
    pub user_id: EntityId,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<EntityId>,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub email: String,

    #[serde(default)]
    pub password_hash: String,

    #[serde(default)]
    pub role: UserRole,
}

/// A user as embedded in a notification.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    #[serde(default)]
    pub user_id: EntityId,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<EntityId>,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub email: String,

    #[serde(default)]
    pub role: UserRole,
}

impl From<&User> for UserSummary {
    fn from(u: &User) -> Self {
        UserSummary {
            user_id: u.user_id,
            client_id: u.client_id,
            name: u.name.clone(),
            email: u.email.clone(),
            role: u.role,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    #[serde(default)]
    pub notification_id: EntityId,

    #[serde(default)]
    pub user_id: EntityId,

    #[serde(rename = "type", default)]
    pub kind: NotificationType,

    #[serde(default)]
    pub message: String,

    #[serde(default)]
    pub is_read: bool,

    #[serde(default)]
    pub created_at: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<UserSummary>,
}

impl Resource for Notification {
    const NAME: &'static str = "notification";
    const PATH: &'static str = "notifications";

    fn id(&self) -> EntityId {
        self.notification_id
    }
}

impl Validate for Notification {
    fn validate(&self) -> Result<(), ValidationError> {
        RequiredFields::new(Self::NAME)
            .text("message", &self.message)
            .finish()
    }
}

/// `GET /api/settings` document. Notifications are newest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default)]
    pub user: User,

    #[serde(default)]
    pub notifications: Vec<Notification>,
}

impl Settings {
    /// Seed document for a fresh server.
    pub fn seed() -> Self {
        Settings {
            user: User {
                user_id: 1,
                client_id: None,
                name: "Administrator".to_string(),
                email: "admin@example.com".to_string(),
                password_hash: String::new(),
                role: UserRole::Admin,
            },
            notifications: Vec::new(),
        }
    }
}

/// Response of `POST /api/settings/user`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSaved {
    pub message: String,
    pub user: User,
}

/// Response of `POST /api/settings/notifications`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationAdded {
    pub message: String,
    pub notification: Notification,
}

/// Plain `{ "message": ... }` acknowledgement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ack {
    pub message: String,
}
