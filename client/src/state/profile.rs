//! Profile model and form mappers for the `users/{uid}` document.
//!
//! SYSTEM CONTEXT
//! ==============
//! The profile document is written by signup and the settings tab and read by
//! the home page and the navbar. Field names on the wire are camelCase and
//! fixed; this module is the only place that knows them.

#[cfg(test)]
#[path = "profile_test.rs"]
mod profile_test;

use platform::Document;
use platform::document::string_field;
use time::OffsetDateTime;

/// Collection holding one profile document per user id.
pub const USERS_COLLECTION: &str = "users";

/// Countries offered by the signup and settings forms.
pub const COUNTRIES: &[&str] = &["Turkey", "USA", "Germany", "France", "United Kingdom"];

/// Shown in place of an absent profile field.
pub const NOT_AVAILABLE: &str = "N/A";

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{0} cannot be empty.")]
    Required(&'static str),
    #[error("Enter both email and password.")]
    MissingCredentials,
}

/// Stored profile as read from the document store.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Profile {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub country: Option<String>,
    pub date_of_birth: Option<String>,
    pub passport_number: Option<String>,
    pub phone: Option<String>,
    pub profile_image: Option<String>,
}

impl Profile {
    pub fn from_document(doc: &Document) -> Self {
        Self {
            first_name: string_field(doc, "firstName"),
            last_name: string_field(doc, "lastName"),
            email: string_field(doc, "email"),
            country: string_field(doc, "country"),
            date_of_birth: string_field(doc, "dateOfBirth"),
            passport_number: string_field(doc, "passportNumber"),
            phone: string_field(doc, "phone"),
            profile_image: string_field(doc, "profileImage"),
        }
    }

    /// "First Last", skipping missing parts.
    pub fn display_name(&self) -> String {
        [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .filter(|part| !part.trim().is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Display text for an optional field.
pub fn or_not_available(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v.to_owned(),
        _ => NOT_AVAILABLE.to_owned(),
    }
}

/// Editable copy of the profile used by the settings tab.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProfileForm {
    pub first_name: String,
    pub last_name: String,
    pub country: String,
    pub date_of_birth: String,
    pub passport_number: String,
    pub phone: String,
}

impl From<&Profile> for ProfileForm {
    fn from(profile: &Profile) -> Self {
        let owned = |v: &Option<String>| v.clone().unwrap_or_default();
        Self {
            first_name: owned(&profile.first_name),
            last_name: owned(&profile.last_name),
            country: owned(&profile.country),
            date_of_birth: owned(&profile.date_of_birth),
            passport_number: owned(&profile.passport_number),
            phone: owned(&profile.phone),
        }
    }
}

impl ProfileForm {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require(&self.first_name, "First name")?;
        require(&self.last_name, "Last name")?;
        Ok(())
    }

    /// Partial update for the profile document.
    ///
    /// Passport number and phone are always written (blank when cleared);
    /// blank country and date of birth are left untouched.
    pub fn to_document(&self) -> Document {
        let mut doc = Document::new();
        doc.insert("firstName".to_owned(), self.first_name.trim().into());
        doc.insert("lastName".to_owned(), self.last_name.trim().into());
        insert_non_empty(&mut doc, "country", &self.country);
        insert_non_empty(&mut doc, "dateOfBirth", &self.date_of_birth);
        doc.insert("passportNumber".to_owned(), self.passport_number.trim().into());
        doc.insert("phone".to_owned(), self.phone.trim().into());
        doc
    }

    /// Apply a saved form back onto the displayed profile.
    pub fn apply_to(&self, profile: &mut Profile) {
        let doc = self.to_document();
        let merged = Profile::from_document(&doc);
        profile.first_name = merged.first_name;
        profile.last_name = merged.last_name;
        profile.passport_number = merged.passport_number;
        profile.phone = merged.phone;
        if merged.country.is_some() {
            profile.country = merged.country;
        }
        if merged.date_of_birth.is_some() {
            profile.date_of_birth = merged.date_of_birth;
        }
    }
}

/// Fields collected by the signup page.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SignupForm {
    pub first_name: String,
    pub last_name: String,
    pub country: String,
    pub date_of_birth: String,
    pub phone: String,
    pub email: String,
    pub password: String,
}

impl SignupForm {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require(&self.first_name, "First name")?;
        require(&self.last_name, "Last name")?;
        require(&self.country, "Country")?;
        require(&self.date_of_birth, "Date of birth")?;
        require(&self.email, "Email")?;
        if self.password.is_empty() {
            return Err(ValidationError::Required("Password"));
        }
        Ok(())
    }

    pub fn to_document(&self, created_at: OffsetDateTime) -> Document {
        let mut doc = Document::new();
        doc.insert("email".to_owned(), self.email.trim().into());
        doc.insert("firstName".to_owned(), self.first_name.trim().into());
        doc.insert("lastName".to_owned(), self.last_name.trim().into());
        doc.insert("country".to_owned(), self.country.trim().into());
        doc.insert("dateOfBirth".to_owned(), self.date_of_birth.trim().into());
        doc.insert("phone".to_owned(), self.phone.trim().into());
        doc.insert("createdAt".to_owned(), created_at.into());
        doc
    }
}

/// Image picked in the settings tab, read into memory before upload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingImage {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

fn require(value: &str, label: &'static str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::Required(label))
    } else {
        Ok(())
    }
}

fn insert_non_empty(doc: &mut Document, key: &str, value: &str) {
    let value = value.trim();
    if !value.is_empty() {
        doc.insert(key.to_owned(), value.into());
    }
}
