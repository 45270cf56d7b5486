//! Registration and login inputs.
//!
//! Inbound adapters hand over raw optional strings; the constructors here
//! validate them before the account service touches any port.

use serde::Serialize;
use serde_json::json;

use super::{
    DisplayName, EmailAddress, Error, PasswordValidationError, PlaintextPassword,
    UserValidationError,
};

/// Request field named in validation failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CredentialField {
    Name,
    Email,
    Password,
}

/// Reasons a registration or login payload is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CredentialValidationError {
    #[error("missing required fields")]
    MissingFields(Vec<CredentialField>),
    #[error("{0}")]
    InvalidEmail(UserValidationError),
    #[error("{0}")]
    InvalidName(UserValidationError),
    #[error("{0}")]
    InvalidPassword(PasswordValidationError),
}

impl From<CredentialValidationError> for Error {
    fn from(value: CredentialValidationError) -> Self {
        let message = value.to_string();
        let details = match &value {
            CredentialValidationError::MissingFields(fields) => {
                json!({ "fields": fields, "code": "missing_field" })
            }
            CredentialValidationError::InvalidEmail(_) => {
                json!({ "field": CredentialField::Email, "code": "invalid_email" })
            }
            CredentialValidationError::InvalidName(_) => {
                json!({ "field": CredentialField::Name, "code": "invalid_name" })
            }
            CredentialValidationError::InvalidPassword(_) => {
                json!({ "field": CredentialField::Password, "code": "invalid_password" })
            }
        };
        Error::invalid_request(message).with_details(details)
    }
}

/// Raw registration payload as received by an inbound adapter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Raw login payload as received by an inbound adapter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

fn require_credentials<'a>(
    email: Option<&'a str>,
    password: Option<&'a str>,
) -> Result<(&'a str, &'a str), CredentialValidationError> {
    match (present(email), password.filter(|p| !p.is_empty())) {
        (Some(email), Some(password)) => Ok((email, password)),
        (email, password) => {
            let mut missing = Vec::with_capacity(2);
            if email.is_none() {
                missing.push(CredentialField::Email);
            }
            if password.is_none() {
                missing.push(CredentialField::Password);
            }
            Err(CredentialValidationError::MissingFields(missing))
        }
    }
}

/// Validated registration input.
///
/// ## Invariants
/// - Email is normalised.
/// - The display name falls back to the email local part when omitted.
///
/// # Examples
/// ```
/// use accounts::domain::{Registration, RegistrationRequest};
///
/// let request = RegistrationRequest {
///     name: None,
///     email: Some("mercury.freddy@mail.com".into()),
///     password: Some("somePassword".into()),
/// };
/// let registration = Registration::try_from_request(&request).expect("valid");
/// assert_eq!(registration.display_name().as_ref(), "mercury.freddy");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    display_name: DisplayName,
    email: EmailAddress,
    password: PlaintextPassword,
}

impl Registration {
    /// Validate a raw registration payload.
    pub fn try_from_request(
        request: &RegistrationRequest,
    ) -> Result<Self, CredentialValidationError> {
        let (email, password) =
            require_credentials(request.email.as_deref(), request.password.as_deref())?;
        let email = EmailAddress::new(email).map_err(CredentialValidationError::InvalidEmail)?;
        let password =
            PlaintextPassword::new(password).map_err(CredentialValidationError::InvalidPassword)?;
        let display_name = match present(request.name.as_deref()) {
            Some(name) => DisplayName::new(name),
            None => DisplayName::new(email.local_part()),
        }
        .map_err(CredentialValidationError::InvalidName)?;

        Ok(Self {
            display_name,
            email,
            password,
        })
    }

    pub fn display_name(&self) -> &DisplayName {
        &self.display_name
    }

    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    pub fn password(&self) -> &PlaintextPassword {
        &self.password
    }
}

/// Validated login credentials.
///
/// An email that fails format checks is still accepted here and simply
/// never matches a stored account, so login cannot be used to probe the
/// validation rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: String,
    password: PlaintextPassword,
}

impl LoginCredentials {
    /// Validate a raw login payload.
    pub fn try_from_request(request: &LoginRequest) -> Result<Self, CredentialValidationError> {
        let (email, password) =
            require_credentials(request.email.as_deref(), request.password.as_deref())?;
        let password =
            PlaintextPassword::new(password).map_err(CredentialValidationError::InvalidPassword)?;
        Ok(Self {
            email: email.trim().to_lowercase(),
            password,
        })
    }

    /// Normalised email used for the lookup.
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    pub fn password(&self) -> &PlaintextPassword {
        &self.password
    }
}
