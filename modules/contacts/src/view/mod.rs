//! Text rendering of the application state.

pub mod add_contact_form;
pub mod contact_list;

use std::fmt;

use crate::domain::state::AppState;

pub use add_contact_form::AddContactForm;
pub use contact_list::ContactList;

pub const HEADER: &str = "Contact List Application";
pub const LOADING: &str = "Loading...";
pub const NO_CONTACTS: &str = "There are no contacts to display.";

/// What the user sees for a given state.
#[derive(Debug, Clone, Copy)]
pub enum Screen<'a> {
    Loading,
    Main {
        error: Option<&'a str>,
        form: AddContactForm<'a>,
        /// `None` when the collection is empty.
        contacts: Option<ContactList<'a>>,
    },
}

pub fn screen(state: &AppState) -> Screen<'_> {
    if state.is_loading() {
        return Screen::Loading;
    }
    Screen::Main {
        error: state.error_message.as_deref(),
        form: AddContactForm::new(&state.form, state.pending_image.as_ref(), state.data_sent),
        contacts: (!state.contacts.is_empty()).then(|| ContactList::new(&state.contacts)),
    }
}

impl fmt::Display for Screen<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Screen::Loading => writeln!(f, "{LOADING}"),
            Screen::Main {
                error,
                form,
                contacts,
            } => {
                writeln!(f, "{HEADER}")?;
                writeln!(f, "{}", "=".repeat(HEADER.len()))?;
                // Banner line is always there, empty when there is no error.
                writeln!(f, "{}", error.unwrap_or_default())?;
                write!(f, "{form}")?;
                writeln!(f)?;
                match contacts {
                    Some(list) => write!(f, "{list}"),
                    None => writeln!(f, "{NO_CONTACTS}"),
                }
            }
        }
    }
}

/// Lay out rows as a left-aligned text table with a header separator.
pub(crate) fn write_table(
    f: &mut fmt::Formatter<'_>,
    header: &[&str],
    rows: &[Vec<String>],
) -> fmt::Result {
    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    write_row(f, header.iter().copied(), &widths)?;
    let total = widths.iter().sum::<usize>() + 3 * widths.len().saturating_sub(1);
    writeln!(f, "{}", "-".repeat(total))?;
    for row in rows {
        write_row(f, row.iter().map(String::as_str), &widths)?;
    }
    Ok(())
}

fn write_row<'c>(
    f: &mut fmt::Formatter<'_>,
    cells: impl Iterator<Item = &'c str>,
    widths: &[usize],
) -> fmt::Result {
    let mut out = String::new();
    for (i, (cell, w)) in cells.zip(widths).enumerate() {
        if i > 0 {
            out.push_str(" | ");
        }
        out.push_str(cell);
        out.push_str(&" ".repeat(w.saturating_sub(cell.chars().count())));
    }
    writeln!(f, "{}", out.trim_end())
}
