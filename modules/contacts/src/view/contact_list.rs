use std::fmt;

use crate::contract::model::Contact;

const COLUMNS: [&str; 4] = ["Picture", "First Name", "Last Name", "Phone Number"];

/// Read-only table of contacts in display order.
#[derive(Debug, Clone, Copy)]
pub struct ContactList<'a> {
    contacts: &'a [Contact],
}

impl<'a> ContactList<'a> {
    pub fn new(contacts: &'a [Contact]) -> Self {
        Self { contacts }
    }

    fn rows(&self) -> Vec<Vec<String>> {
        self.contacts
            .iter()
            .map(|c| {
                vec![
                    c.thumbnail_url.clone().unwrap_or_else(|| "-".to_string()),
                    c.first_name.clone(),
                    c.last_name.clone(),
                    c.phone.clone(),
                ]
            })
            .collect()
    }
}

impl fmt::Display for ContactList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        super::write_table(f, &COLUMNS, &self.rows())
    }
}
