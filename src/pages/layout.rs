use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::database::DatabaseError;
use crate::html::escape;

const STYLE: &str = r#"<style>
body { font-family: system-ui, sans-serif; margin: 0; color: #111827; background: #ffffff; line-height: 1.6; }
header, footer { padding: 16px 32px; display: flex; gap: 24px; align-items: center; }
header { border-bottom: 1px solid #e5e7eb; }
footer { border-top: 1px solid #e5e7eb; margin-top: 64px; font-size: 14px; color: #6b7280; }
header .brand { font-weight: 700; margin-right: auto; text-decoration: none; color: inherit; }
nav a { color: #374151; text-decoration: none; margin-left: 16px; }
main { max-width: 960px; margin: 0 auto; padding: 32px; }
.grid { display: grid; grid-template-columns: repeat(auto-fill, minmax(260px, 1fr)); gap: 24px; }
.card { border: 1px solid #e5e7eb; border-radius: 8px; padding: 20px; }
.card img { width: 100%; border-radius: 6px; }
.tag { display: inline-block; background: #f3f4f6; border-radius: 999px; padding: 2px 10px; font-size: 13px; margin: 2px; }
.tech-icon { display: inline-flex; align-items: center; justify-content: center; width: 28px; height: 28px; border-radius: 6px; color: #ffffff; font-size: 11px; font-weight: 700; margin-right: 6px; }
.field { display: flex; flex-direction: column; margin-bottom: 16px; }
.field input, .field textarea, .field select { padding: 8px; border: 1px solid #d1d5db; border-radius: 6px; font: inherit; }
.choices label { display: block; }
.notice { padding: 12px 16px; border-radius: 6px; background: #f3f4f6; }
.notice.error { background: #fee2e2; }
table { width: 100%; border-collapse: collapse; }
td, th { text-align: left; padding: 8px; border-bottom: 1px solid #e5e7eb; vertical-align: top; }
.status-new { color: #b45309; } .status-replied { color: #047857; } .status-closed { color: #6b7280; }
</style>"#;

/// Posts any `form[data-json-action]` as JSON. Checkbox groups become arrays,
/// fields named `answers.<id>` are collected into an `answers` object, and
/// file inputs are uploaded to the image host first when it is configured.
const SCRIPT: &str = r#"<script>
async function uploadFiles(input) {
  const urls = [];
  if (!input.files.length) return urls;
  const cfg = (await (await fetch('/api/uploads/config')).json()).data;
  if (!cfg.enabled) throw new Error('File uploads are not available');
  for (const file of input.files) {
    const body = new FormData();
    body.append('file', file);
    body.append('upload_preset', cfg.upload_preset);
    if (cfg.folder) body.append('folder', cfg.folder);
    const res = await fetch('https://api.cloudinary.com/v1_1/' + cfg.cloud_name + '/auto/upload', { method: 'POST', body });
    if (!res.ok) throw new Error('Upload failed');
    urls.push((await res.json()).secure_url);
  }
  return urls;
}
document.querySelectorAll('form[data-json-action]').forEach((form) => {
  form.addEventListener('submit', async (event) => {
    event.preventDefault();
    const status = form.querySelector('.form-status');
    const payload = { attachments: [] };
    try {
      for (const el of form.elements) {
        if (!el.name) continue;
        let value;
        if (el.type === 'file') {
          value = await uploadFiles(el);
          payload.attachments.push(...value);
        } else if (el.type === 'checkbox') {
          if (el.dataset.group === undefined) { value = el.checked; }
          else { value = Array.from(form.querySelectorAll('input[name="' + el.name + '"]:checked')).map((c) => c.value); }
        } else if (el.type === 'radio') {
          if (!el.checked) continue;
          value = el.value;
        } else { value = el.value; }
        if (el.name.startsWith('answers.')) {
          payload.answers = payload.answers || {};
          payload.answers[el.name.slice(8)] = value;
        } else { payload[el.name] = value; }
      }
      const res = await fetch(form.dataset.jsonAction, {
        method: 'POST', headers: { 'content-type': 'application/json' }, credentials: 'same-origin', body: JSON.stringify(payload),
      });
      const body = await res.json();
      if (!res.ok) throw new Error(body.message || 'Something went wrong');
      if (form.dataset.redirect) { window.location = form.dataset.redirect; return; }
      form.reset();
      status.className = 'form-status notice';
      status.textContent = form.dataset.success || 'Sent.';
    } catch (err) {
      status.className = 'form-status notice error';
      status.textContent = err.message;
    }
  });
});
</script>"#;

/// Navigation flavour for a page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Area {
    Public,
    Admin,
}

/// Wrap a page body in the shared document shell
pub fn page(site_name: &str, area: Area, title: &str, body: &str) -> Html<String> {
    let nav = match area {
        Area::Public => {
            r#"<a href="/about">About</a><a href="/projects">Projects</a><a href="/contact">Contact</a>"#
        }
        Area::Admin => {
            r#"<a href="/admin">Dashboard</a><a href="/">View site</a><form data-json-action="/api/auth/logout" data-redirect="/login" style="display:inline"><button type="submit">Log out</button><span class="form-status"></span></form>"#
        }
    };
    let home = match area {
        Area::Public => "/",
        Area::Admin => "/admin",
    };

    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title} | {site}</title>
{style}
</head>
<body>
<header><a class="brand" href="{home}">{site}</a><nav>{nav}</nav></header>
<main>
{body}
</main>
<footer><span>&copy; {site}</span><a href="/privacy">Privacy</a><a href="/terms">Terms</a></footer>
{script}
</body>
</html>"#,
        title = escape(title),
        site = escape(site_name),
        style = STYLE,
        home = home,
        nav = nav,
        body = body,
        script = SCRIPT,
    ))
}

/// Failure while rendering a page, shown as a minimal HTML error document
#[derive(Debug)]
pub enum PageError {
    NotFound,
    Internal,
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            PageError::NotFound => (StatusCode::NOT_FOUND, "We couldn't find that page."),
            PageError::Internal => (StatusCode::INTERNAL_SERVER_ERROR, "Something went wrong on our side."),
        };
        let body = format!(
            r#"<h1>{}</h1><p>{}</p><p><a href="/">Back to the home page</a></p>"#,
            status.as_u16(),
            message
        );
        (status, page("", Area::Public, status.canonical_reason().unwrap_or("Error"), &body)).into_response()
    }
}

impl From<DatabaseError> for PageError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::NotFound(_) => PageError::NotFound,
            other => {
                tracing::error!("Page render failed: {}", other);
                PageError::Internal
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn titles_are_escaped() {
        let Html(html) = page("Studio", Area::Public, "<b>Projects</b>", "<p>ok</p>");
        assert!(html.contains("<title>&lt;b&gt;Projects&lt;/b&gt; | Studio</title>"));
        assert!(html.contains("<p>ok</p>"));
    }

    #[test]
    fn admin_pages_offer_logout() {
        let Html(html) = page("Studio", Area::Admin, "Dashboard", "");
        assert!(html.contains(r#"data-json-action="/api/auth/logout""#));
    }

    #[test]
    fn missing_records_render_404() {
        let err = PageError::from(DatabaseError::NotFound("Project 'x' not found".into()));
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }
}
