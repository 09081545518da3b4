use platform::Value;

use super::*;

fn stored_profile() -> Document {
    let mut doc = Document::new();
    doc.insert("firstName".to_owned(), Value::from("Ada"));
    doc.insert("lastName".to_owned(), Value::from("Lovelace"));
    doc.insert("email".to_owned(), Value::from("ada@example.com"));
    doc.insert("country".to_owned(), Value::from("Turkey"));
    doc.insert("createdAt".to_owned(), Value::from(OffsetDateTime::UNIX_EPOCH));
    doc
}

#[test]
fn from_document_reads_known_fields() {
    let profile = Profile::from_document(&stored_profile());
    assert_eq!(profile.first_name.as_deref(), Some("Ada"));
    assert_eq!(profile.email.as_deref(), Some("ada@example.com"));
    assert_eq!(profile.phone, None);
    assert_eq!(profile.profile_image, None);
    assert_eq!(profile.display_name(), "Ada Lovelace");
}

#[test]
fn absent_fields_render_as_not_available() {
    assert_eq!(or_not_available(None), "N/A");
    assert_eq!(or_not_available(Some("  ")), "N/A");
    assert_eq!(or_not_available(Some("+90 555")), "+90 555");
}

#[test]
fn profile_form_requires_names() {
    let form = ProfileForm { last_name: "Lovelace".to_owned(), ..ProfileForm::default() };
    assert_eq!(form.validate(), Err(ValidationError::Required("First name")));
    assert_eq!(
        ValidationError::Required("First name").to_string(),
        "First name cannot be empty."
    );

    let form = ProfileForm { first_name: "Ada".to_owned(), last_name: " ".to_owned(), ..ProfileForm::default() };
    assert_eq!(form.validate(), Err(ValidationError::Required("Last name")));
}

#[test]
fn profile_form_defaults_passport_and_phone_to_blank() {
    let form = ProfileForm {
        first_name: " Ada ".to_owned(),
        last_name: "Lovelace".to_owned(),
        ..ProfileForm::default()
    };
    let doc = form.to_document();

    assert_eq!(doc.get("firstName"), Some(&Value::from("Ada")));
    assert_eq!(doc.get("passportNumber"), Some(&Value::from("")));
    assert_eq!(doc.get("phone"), Some(&Value::from("")));
    assert!(!doc.contains_key("country"));
    assert!(!doc.contains_key("dateOfBirth"));
    assert!(!doc.contains_key("profileImage"));
}

#[test]
fn profile_form_round_trips_through_profile() {
    let profile = Profile::from_document(&stored_profile());
    let mut form = ProfileForm::from(&profile);
    assert_eq!(form.country, "Turkey");

    form.phone = "+90 555".to_owned();
    form.country = String::new();
    let mut shown = profile.clone();
    form.apply_to(&mut shown);

    assert_eq!(shown.phone.as_deref(), Some("+90 555"));
    assert_eq!(shown.country.as_deref(), Some("Turkey"));
    assert_eq!(shown.email, profile.email);
}

#[test]
fn signup_form_requires_everything_but_phone() {
    let complete = SignupForm {
        first_name: "Ada".to_owned(),
        last_name: "Lovelace".to_owned(),
        country: "France".to_owned(),
        date_of_birth: "1990-12-10".to_owned(),
        phone: String::new(),
        email: "ada@example.com".to_owned(),
        password: "secret1".to_owned(),
    };
    assert_eq!(complete.validate(), Ok(()));

    let no_country = SignupForm { country: String::new(), ..complete.clone() };
    assert_eq!(no_country.validate(), Err(ValidationError::Required("Country")));

    let no_password = SignupForm { password: String::new(), ..complete };
    assert_eq!(no_password.validate(), Err(ValidationError::Required("Password")));
}

#[test]
fn signup_document_carries_creation_time() {
    let form = SignupForm {
        first_name: "Ada".to_owned(),
        last_name: "Lovelace".to_owned(),
        country: "France".to_owned(),
        date_of_birth: "1990-12-10".to_owned(),
        phone: String::new(),
        email: " ada@example.com ".to_owned(),
        password: "secret1".to_owned(),
    };
    let doc = form.to_document(OffsetDateTime::UNIX_EPOCH);

    assert_eq!(doc.get("email"), Some(&Value::from("ada@example.com")));
    assert_eq!(doc.get("phone"), Some(&Value::from("")));
    assert_eq!(doc.get("createdAt"), Some(&Value::Timestamp(OffsetDateTime::UNIX_EPOCH)));
    assert!(!doc.contains_key("password"));
    assert_eq!(doc.len(), 7);
}
