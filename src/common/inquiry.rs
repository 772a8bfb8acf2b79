use std::sync::LazyLock;

use chrono::{DateTime, Local, TimeZone};
use regex::Regex;
use serde::Serialize;

use crate::common::{ValidationError, ValidationResult};

// Shape check only: something@something.tld with no whitespace.
static EMAIL_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_SHAPE.is_match(email)
}

/// Unsent contact-form input.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InquiryDraft {
    pub name: String,
    pub email: String,
    pub message: String,
}

/// A validated inquiry ready for the mailer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inquiry {
    pub name: String,
    pub email: String,
    pub message: String,
}

/// Template variables expected by the email template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateParams {
    pub name: String,
    pub email: String,
    pub message: String,
    pub time: String,
}

impl InquiryDraft {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            message: message.into(),
        }
    }

    pub fn validate(&self) -> ValidationResult<Inquiry> {
        let name = self.name.trim();
        let email = self.email.trim();
        let message = self.message.trim();

        if name.is_empty() || email.is_empty() || message.is_empty() {
            return Err(ValidationError::MissingInquiryFields);
        }

        if !is_valid_email(email) {
            return Err(ValidationError::InvalidEmail);
        }

        Ok(Inquiry {
            name: name.to_string(),
            email: email.to_string(),
            message: message.to_string(),
        })
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

impl Inquiry {
    pub fn template_params<Tz: TimeZone>(&self, now: DateTime<Tz>) -> TemplateParams
    where
        Tz::Offset: std::fmt::Display,
    {
        TemplateParams {
            name: self.name.clone(),
            email: self.email.clone(),
            message: self.message.clone(),
            time: now.format("%b %-d, %Y, %I:%M %p").to_string(),
        }
    }

    pub fn template_params_now(&self) -> TemplateParams {
        self.template_params(Local::now())
    }
}
