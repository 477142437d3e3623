//! Mock authentication
//!
//! There is no real credential check: sign-in is an email lookup against
//! the in-memory directory and the password is ignored. Sign-up validates
//! the details, rejects duplicate emails and appends an unverified user.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use validator::Validate;

use crate::domain::aggregates::{User, UserRole};
use crate::store::MarketStore;
use crate::{MarketError, Result};

#[derive(Clone, Debug, Deserialize, Validate)]
pub struct SignupDetails {
    #[validate(length(min = 2, max = 80))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8, max = 15))]
    pub phone: String,
    pub role: UserRole,
    #[validate(length(min = 2, max = 120))]
    pub location: String,
}

pub fn sign_in(store: &MarketStore, email: &str, _password: &str) -> Result<User> {
    store.find_user_by_email(email).ok_or(MarketError::InvalidCredentials)
}

pub fn sign_up(store: &MarketStore, details: &SignupDetails, now: DateTime<Utc>) -> Result<User> {
    details
        .validate()
        .map_err(|e| MarketError::InvalidSignup(e.to_string()))?;
    let user = User::register(
        details.name.clone(),
        details.email.clone(),
        details.phone.clone(),
        details.role,
        details.location.clone(),
        now,
    );
    store.try_add_user(user.clone())?;
    Ok(user)
}
