//! View model for the user detail page.
//!
//! [`render_user_detail`] is a pure function of the fetch snapshot. The HTML
//! adapter turns the resulting tree into markup; nothing here knows about
//! HTTP.

use std::fmt::Display;

use crate::domain::{FetchSnapshot, UserRecord};

/// Document title supplied to the layout.
pub const PAGE_TITLE: &str = "User Details";
/// Heading of the detail panel, kept as shipped by the admin template.
pub const PANEL_TITLE: &str = "Menu Item Details";

/// Field labels in display order. The third entry shows `lastName` but is
/// labelled "First Name:", exactly as the admin template ships it.
pub const FIELD_LABELS: [&str; 5] = [
    "Email:",
    "First Name:",
    "First Name:",
    "Created At:",
    "Updated At:",
];

/// One entry of the breadcrumb trail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Breadcrumb {
    /// Visible text.
    pub label: &'static str,
    /// Target, absent for the current page.
    pub link: Option<&'static str>,
    /// Whether this entry is the page being shown.
    pub is_current: bool,
}

/// Labeled value in the detail list. Missing attributes render as empty text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailField {
    /// Label including the trailing colon.
    pub label: &'static str,
    /// Attribute text, empty when absent.
    pub text: String,
}

/// Titled panel listing the record's fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailPanel {
    /// Panel heading.
    pub title: &'static str,
    /// Ordered field list.
    pub fields: Vec<DetailField>,
}

/// Main content of the page; loading and data are mutually exclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailBody {
    /// Centered progress indicator only.
    Loading,
    /// Nothing to show: no identifier, or the fetch failed without data.
    Empty,
    /// The record's fields.
    Panel(DetailPanel),
}

/// Full page tree handed to the layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserDetailPage {
    /// Document title.
    pub title: &'static str,
    /// Trail shown by the layout chrome.
    pub breadcrumbs: Vec<Breadcrumb>,
    /// Error banner text, shown alongside whichever body applies.
    pub error: Option<String>,
    /// Loading indicator, empty body, or field panel.
    pub body: DetailBody,
}

impl UserDetailPage {
    /// Whether the page is waiting on the fetch.
    pub fn is_loading(&self) -> bool {
        self.body == DetailBody::Loading
    }
}

/// Breadcrumbs supplied to the layout: `Users` then `User Details`.
pub fn breadcrumbs() -> Vec<Breadcrumb> {
    vec![
        Breadcrumb {
            label: "Users",
            link: Some("/Users"),
            is_current: false,
        },
        Breadcrumb {
            label: "User Details",
            link: None,
            is_current: true,
        },
    ]
}

/// Build the page tree for `snapshot`.
///
/// # Examples
/// ```
/// use user_console::domain::{render_user_detail, DetailBody, FetchSnapshot, UserRecord};
///
/// let pending: FetchSnapshot<'_, UserRecord, String> = FetchSnapshot {
///     data: None,
///     error: None,
///     is_loading: true,
/// };
/// assert_eq!(render_user_detail(&pending).body, DetailBody::Loading);
/// ```
pub fn render_user_detail<E: Display>(snapshot: &FetchSnapshot<'_, UserRecord, E>) -> UserDetailPage {
    let body = if snapshot.is_loading {
        DetailBody::Loading
    } else {
        match snapshot.data {
            Some(record) => DetailBody::Panel(detail_panel(record)),
            None => DetailBody::Empty,
        }
    };

    UserDetailPage {
        title: PAGE_TITLE,
        breadcrumbs: breadcrumbs(),
        error: snapshot.error.map(ToString::to_string),
        body,
    }
}

fn detail_panel(record: &UserRecord) -> DetailPanel {
    let values = [
        &record.email,
        &record.first_name,
        &record.last_name,
        &record.created_at,
        &record.updated_at,
    ];
    let fields = FIELD_LABELS
        .iter()
        .zip(values)
        .map(|(label, value)| DetailField {
            label,
            text: value.clone().unwrap_or_default(),
        })
        .collect();
    DetailPanel {
        title: PANEL_TITLE,
        fields,
    }
}
