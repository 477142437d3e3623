//! User Aggregate

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Vendor,
    Supplier,
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Vendor => write!(f, "vendor"),
            Self::Supplier => write!(f, "supplier"),
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct User {
    uid: String,
    name: String,
    email: String,
    phone: String,
    role: UserRole,
    location: String,
    verified: bool,
    created_at: DateTime<Utc>,
}

impl User {
    /// Seed constructor for the mock directory.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        uid: impl Into<String>,
        name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
        role: UserRole,
        location: impl Into<String>,
        verified: bool,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            uid: uid.into(),
            name: name.into(),
            email: email.into(),
            phone: phone.into(),
            role,
            location: location.into(),
            verified,
            created_at,
        }
    }

    /// A fresh sign-up: generated uid, unverified until reviewed.
    pub fn register(
        name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
        role: UserRole,
        location: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self::new(
            format!("user_{}", Uuid::new_v4()),
            name,
            email,
            phone,
            role,
            location,
            false,
            now,
        )
    }

    pub fn uid(&self) -> &str {
        &self.uid
    }
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn email(&self) -> &str {
        &self.email
    }
    pub fn phone(&self) -> &str {
        &self.phone
    }
    pub fn role(&self) -> UserRole {
        self.role
    }
    pub fn location(&self) -> &str {
        &self.location
    }
    pub fn verified(&self) -> bool {
        self.verified
    }
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn is_vendor(&self) -> bool {
        self.role == UserRole::Vendor
    }
    pub fn is_supplier(&self) -> bool {
        self.role == UserRole::Supplier
    }
}
