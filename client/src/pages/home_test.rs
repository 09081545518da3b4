use super::*;

#[test]
fn tabs_are_listed_in_display_order() {
    let labels: Vec<_> = Tab::ALL.iter().map(|t| t.label()).collect();
    assert_eq!(labels, ["Personal", "Bookings", "Reviews", "Settings", "Notifications"]);
}

#[test]
fn personal_rows_fill_missing_values_with_not_available() {
    let profile = Profile {
        first_name: Some("Ada".to_owned()),
        phone: Some(String::new()),
        ..Profile::default()
    };
    let rows = personal_rows(Some(&profile));

    assert_eq!(rows[0], ("Name", "Ada".to_owned()));
    assert_eq!(rows[1], ("Surname", "N/A".to_owned()));
    assert_eq!(rows[5], ("Phone Number", "N/A".to_owned()));
}

#[test]
fn passenger_card_is_all_placeholders() {
    let rows = passenger_rows();
    assert_eq!(rows.len(), 6);
    assert!(rows.iter().all(|(_, value)| value == "N/A"));
}
