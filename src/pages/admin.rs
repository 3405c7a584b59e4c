use axum::{
    extract::{Path, Query, State},
    response::Html,
    Extension,
};
use serde_json::Value;

use super::layout::{page, Area, PageError};
use crate::auth::AdminSession;
use crate::database::models::{ClientRequest, Form, Project, ReplySender, RequestStatus, TeamMember};
use crate::database::DocumentFilter;
use crate::handlers::protected::requests::RequestQuery;
use crate::html::{escape, paragraphs};
use crate::state::AppState;

type PageResult = Result<Html<String>, PageError>;

fn status_label(status: RequestStatus) -> String {
    format!(r#"<span class="status-{0}">{0}</span>"#, status.as_str())
}

fn answer_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(answer_text).collect::<Vec<_>>().join(", "),
        other => other.to_string(),
    }
}

/// GET /admin - inbox and record counts
pub async fn dashboard(
    State(state): State<AppState>,
    Extension(session): Extension<AdminSession>,
    Query(query): Query<RequestQuery>,
) -> PageResult {
    let all = DocumentFilter::new();
    let requests = state.repository::<ClientRequest>().select_any(&query.to_filter()).await?;
    let forms = state.repository::<Form>().select_any(&all).await?;
    let projects = state.repository::<Project>().select_any(&all).await?.len();
    let team = state.repository::<TeamMember>().select_any(&all).await?.len();
    let unanswered = state
        .repository::<ClientRequest>()
        .select_any(&DocumentFilter::new().eq("status", RequestStatus::New.as_str()))
        .await?
        .len();

    let rows: String = requests
        .iter()
        .map(|r| {
            format!(
                r#"<tr><td><a href="/admin/requests/{}">{}</a></td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>"#,
                escape(&r.id),
                escape(&r.display_subject()),
                r.request_type.as_str().replace('_', " "),
                escape(if r.email.is_empty() { "-" } else { r.email.as_str() }),
                status_label(r.status),
                r.created_at.format("%Y-%m-%d %H:%M"),
            )
        })
        .collect();
    let inbox = if requests.is_empty() {
        r#"<p class="notice">No requests yet.</p>"#.to_string()
    } else {
        format!(
            "<table><tr><th>Subject</th><th>Type</th><th>Email</th><th>Status</th><th>Received</th></tr>{}</table>",
            rows
        )
    };

    let form_rows: String = forms
        .iter()
        .map(|f| {
            format!(
                r#"<li><a href="/forms/{id}">{title}</a> ({state}, {fields} fields) <a href="/admin?form_id={id}">responses</a></li>"#,
                id = escape(&f.id),
                title = escape(&f.title),
                state = if f.is_active { "active" } else { "inactive" },
                fields = f.fields.len(),
            )
        })
        .collect();

    let filters = r#"<p><a href="/admin">All</a> &middot; <a href="/admin?status=new">New</a> &middot; <a href="/admin?status=replied">Replied</a> &middot; <a href="/admin?status=closed">Closed</a></p>"#;

    let body = format!(
        r#"<h1>Dashboard</h1><p>Signed in as {email}.</p>
<div class="grid">
<div class="card"><h3>{unanswered}</h3><p>new requests</p></div>
<div class="card"><h3>{projects}</h3><p>projects</p></div>
<div class="card"><h3>{team}</h3><p>team members</p></div>
<div class="card"><h3>{form_count}</h3><p>forms</p></div>
</div>
<h2>Requests</h2>{filters}{inbox}
<h2>Forms</h2><ul>{form_rows}</ul>"#,
        email = escape(&session.email),
        unanswered = unanswered,
        projects = projects,
        team = team,
        form_count = forms.len(),
        filters = filters,
        inbox = inbox,
        form_rows = form_rows,
    );

    Ok(page(&state.config.server.site_name, Area::Admin, "Dashboard", &body))
}

/// GET /admin/requests/:id - full thread with a reply box
pub async fn request_detail(State(state): State<AppState>, Path(id): Path<String>) -> PageResult {
    let request = state.repository::<ClientRequest>().select_404(&id).await?;
    let form = match request.form_id.as_deref() {
        Some(form_id) => state.repository::<Form>().select_one(form_id).await?,
        None => None,
    };

    let mut details = String::new();
    for (label, value) in [("Name", &request.name), ("Email", &request.email), ("Subject", &request.subject)] {
        if !value.is_empty() {
            details.push_str(&format!("<tr><th>{}</th><td>{}</td></tr>", label, escape(value)));
        }
    }
    if !request.message.is_empty() {
        details.push_str(&format!("<tr><th>Message</th><td>{}</td></tr>", paragraphs(&request.message)));
    }
    // Answers follow the form's field order; orphaned answers keep their raw key
    let mut answers: Vec<(String, String)> = match &form {
        Some(form) => form
            .fields
            .iter()
            .filter_map(|f| request.submission.get(&f.id).map(|v| (f.label.clone(), answer_text(v))))
            .collect(),
        None => Vec::new(),
    };
    for (key, value) in &request.submission {
        let known = form.as_ref().map_or(false, |f| f.fields.iter().any(|field| &field.id == key));
        if !known {
            answers.push((key.clone(), answer_text(value)));
        }
    }
    for (label, value) in &answers {
        details.push_str(&format!("<tr><th>{}</th><td>{}</td></tr>", escape(label), paragraphs(value)));
    }
    for url in &request.attachments {
        details.push_str(&format!(
            r#"<tr><th>Attachment</th><td><a href="{0}" rel="noopener">{0}</a></td></tr>"#,
            escape(url)
        ));
    }

    let thread: String = request
        .replies
        .iter()
        .map(|reply| {
            let who = match reply.sender {
                ReplySender::Admin => "Studio",
                ReplySender::Client => "Client",
            };
            format!(
                r#"<div class="card"><p><strong>{}</strong> &middot; {}</p><p>{}</p></div>"#,
                who,
                reply.sent_at.format("%Y-%m-%d %H:%M"),
                paragraphs(&reply.message)
            )
        })
        .collect();

    let reply_box = if request.reply_address().is_some() {
        format!(
            r#"<form data-json-action="/api/admin/requests/{0}/reply" data-redirect="/admin/requests/{0}">
<label class="field"><span>Reply to {1}</span><textarea name="message" rows="6" required></textarea></label>
<button type="submit">Send reply</button>
<p class="form-status"></p>
</form>"#,
            escape(&request.id),
            escape(&request.email)
        )
    } else {
        r#"<p class="notice">This request has no email address, so it cannot be answered from here.</p>"#.to_string()
    };

    let form_note = match (&form, &request.form_id) {
        (Some(form), _) => format!("<p>Response to <strong>{}</strong></p>", escape(&form.title)),
        (None, Some(_)) => "<p>Response to a form that no longer exists</p>".to_string(),
        (None, None) => String::new(),
    };

    let body = format!(
        r#"<p><a href="/admin">&larr; Dashboard</a></p>
<h1>{subject}</h1>{form_note}<p>Status: {status} &middot; received {received}</p>
<table>{details}</table>
<h2>Conversation</h2>{thread}
{reply_box}"#,
        subject = escape(&request.display_subject()),
        form_note = form_note,
        status = status_label(request.status),
        received = request.created_at.format("%Y-%m-%d %H:%M"),
        details = details,
        thread = if thread.is_empty() { "<p>No replies yet.</p>".to_string() } else { thread },
        reply_box = reply_box,
    );

    Ok(page(&state.config.server.site_name, Area::Admin, &request.display_subject(), &body))
}

/// Unknown paths under `/admin`; routed so the session guard still runs first
pub async fn not_found() -> PageError {
    PageError::NotFound
}
