//! HTML projections of the page view-models. Pure functions of their input.

use shared::domain::{Bod, Club};

use crate::{
    admin_page::{AdminPageView, FormMode, FormState},
    draft::{BodDraft, BodField},
};

const TABLE_COLUMNS: [&str; 9] = [
    "ID",
    "First Name",
    "Last Name",
    "Email",
    "Phone No",
    "Branch",
    "USN",
    "Club ID",
    "Actions",
];

pub fn render_admin_page(view: &AdminPageView<'_>) -> String {
    let mut html = String::new();
    html.push_str("<div class=\"bod-admin\">\n");
    html.push_str("<h1>BOD Management</h1>\n");
    html.push_str("<button type=\"button\" data-action=\"open-create\">Add New BOD</button>\n");
    if !view.message.is_empty() {
        html.push_str(&format!(
            "<p class=\"message\">{}</p>\n",
            escape_html(view.message)
        ));
    }

    html.push_str("<table>\n<thead><tr>");
    for column in TABLE_COLUMNS {
        html.push_str(&format!("<th>{column}</th>"));
    }
    html.push_str("</tr></thead>\n<tbody>\n");
    for bod in view.bods {
        html.push_str(&render_bod_row(bod));
    }
    html.push_str("</tbody>\n</table>\n");

    if let FormState::Open { mode, draft } = view.form {
        html.push_str(&render_form(*mode, draft, view.loading));
    }
    html.push_str("</div>\n");
    html
}

fn render_bod_row(bod: &Bod) -> String {
    let cells = [
        bod.id.to_string(),
        escape_html(&bod.first_name),
        escape_html(&bod.last_name),
        escape_html(&bod.email),
        escape_html(&bod.phone_no),
        escape_html(&bod.branch),
        escape_html(&bod.usn),
        bod.club_id.to_string(),
    ];
    let mut row = format!("<tr data-bod-id=\"{}\">", bod.id);
    for cell in cells {
        row.push_str(&format!("<td>{cell}</td>"));
    }
    row.push_str(&format!(
        "<td><button type=\"button\" data-action=\"edit\" data-bod-id=\"{}\">Edit</button></td></tr>\n",
        bod.id
    ));
    row
}

fn render_form(mode: FormMode, draft: &BodDraft, loading: bool) -> String {
    let (title, submit_label) = match mode {
        FormMode::Create => ("Add New BOD", "Add BOD"),
        FormMode::Edit(_) => ("Edit BOD", "Update BOD"),
    };
    let mut html = String::from("<div class=\"modal\">\n");
    html.push_str(&format!("<h2>{title}</h2>\n<form>\n"));
    for field in BodField::ALL {
        html.push_str(&render_input(field, mode, draft));
    }

    let button_text = if loading { "Submitting..." } else { submit_label };
    let disabled = if loading { " disabled" } else { "" };
    html.push_str(&format!(
        "<button type=\"submit\"{disabled}>{button_text}</button>\n"
    ));
    html.push_str("<button type=\"button\" data-action=\"cancel\">Cancel</button>\n");
    html.push_str("</form>\n</div>\n");
    html
}

fn render_input(field: BodField, mode: FormMode, draft: &BodDraft) -> String {
    let mut input = format!(
        "<input type=\"{}\" name=\"{}\" placeholder=\"{}\"",
        field.input_type(),
        field.name(),
        field.label()
    );
    // password values are never echoed back into markup
    if field != BodField::Password {
        input.push_str(&format!(
            " value=\"{}\"",
            escape_html(&draft.value_of(field))
        ));
    }
    let required = match (field, mode) {
        (BodField::Id, _) => false,
        (BodField::Password, FormMode::Edit(_)) => false,
        _ => true,
    };
    if required {
        input.push_str(" required");
    }
    if field == BodField::Id && matches!(mode, FormMode::Edit(_)) {
        input.push_str(" disabled");
    }
    input.push_str(">\n");
    input
}

pub fn render_club_listing(clubs: &[Club]) -> String {
    let mut html = String::from("<div class=\"club-grid\">\n");
    for club in clubs {
        html.push_str(&format!(
            "<a href=\"/student/clubs/{}\"><div class=\"club-card\">",
            club.id
        ));
        if let Some(logo_url) = &club.logo_url {
            html.push_str(&format!(
                "<img src=\"{}\" alt=\"{}\">",
                escape_html(logo_url),
                escape_html(&club.name)
            ));
        }
        html.push_str(&format!(
            "<h3>{}</h3><p>{}</p></div></a>\n",
            escape_html(&club.name),
            escape_html(&club.tagline)
        ));
    }
    html.push_str("</div>\n");
    html
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
#[path = "tests/render_tests.rs"]
mod tests;
