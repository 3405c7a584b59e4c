//! HTML bodies for transactional email. Every interpolated value is escaped.

use serde_json::Value;

use crate::database::models::{ClientRequest, Form};
use crate::html::{escape, paragraphs};

/// Site identity stamped into every email
#[derive(Debug, Clone)]
pub struct SiteInfo {
    pub name: String,
    pub url: String,
}

impl SiteInfo {
    /// Absolute link to a path on the site
    pub fn link(&self, path: &str) -> String {
        match url::Url::parse(&self.url).and_then(|base| base.join(path)) {
            Ok(url) => url.to_string(),
            Err(_) => format!("{}{}", self.url.trim_end_matches('/'), path),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderedEmail {
    pub subject: String,
    pub html: String,
}

fn layout(site: &SiteInfo, heading: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<body style="font-family: Helvetica, Arial, sans-serif; color: #1f2937; background: #f9fafb; padding: 24px;">
  <div style="max-width: 600px; margin: 0 auto; background: #ffffff; border-radius: 8px; padding: 32px;">
    <h2 style="margin-top: 0;">{heading}</h2>
    {body}
    <hr style="border: none; border-top: 1px solid #e5e7eb; margin: 32px 0 16px;">
    <p style="font-size: 12px; color: #6b7280;"><a href="{url}">{name}</a></p>
  </div>
</body>
</html>"#,
        heading = escape(heading),
        body = body,
        url = escape(&site.url),
        name = escape(&site.name),
    )
}

fn detail_row(label: &str, value: &str) -> String {
    format!(
        r#"<tr><td style="padding: 4px 12px 4px 0; color: #6b7280; vertical-align: top;">{}</td><td style="padding: 4px 0;">{}</td></tr>"#,
        escape(label),
        paragraphs(value)
    )
}

fn attachment_list(request: &ClientRequest) -> String {
    if request.attachments.is_empty() {
        return String::new();
    }
    let items: String = request
        .attachments
        .iter()
        .map(|url| format!(r#"<li><a href="{0}">{0}</a></li>"#, escape(url)))
        .collect();
    format!("<p><strong>Attachments</strong></p><ul>{}</ul>", items)
}

fn answer_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(answer_text).collect::<Vec<_>>().join(", "),
        other => other.to_string(),
    }
}

fn admin_link(site: &SiteInfo, request: &ClientRequest) -> String {
    format!(
        r#"<p><a href="{}" style="display: inline-block; background: #111827; color: #ffffff; padding: 10px 16px; border-radius: 6px; text-decoration: none;">Open in admin</a></p>"#,
        escape(&site.link(&format!("/admin/requests/{}", request.id)))
    )
}

/// Admin notification for a contact-form inquiry
pub fn inquiry_notification(site: &SiteInfo, request: &ClientRequest) -> RenderedEmail {
    let rows = [
        detail_row("Name", &request.name),
        detail_row("Email", &request.email),
        detail_row("Subject", &request.subject),
        detail_row("Message", &request.message),
    ]
    .concat();

    let body = format!(
        "<table>{}</table>{}{}",
        rows,
        attachment_list(request),
        admin_link(site, request)
    );

    RenderedEmail {
        subject: format!("[{}] {}", site.name, request.display_subject()),
        html: layout(site, "New inquiry", &body),
    }
}

/// Admin notification for answers to a custom form
pub fn submission_notification(site: &SiteInfo, request: &ClientRequest, form: &Form) -> RenderedEmail {
    let mut rows = String::new();
    if !request.name.is_empty() {
        rows.push_str(&detail_row("Name", &request.name));
    }
    if !request.email.is_empty() {
        rows.push_str(&detail_row("Email", &request.email));
    }
    for field in &form.fields {
        let answer = request
            .submission
            .get(&field.id)
            .map(answer_text)
            .unwrap_or_default();
        rows.push_str(&detail_row(&field.label, &answer));
    }

    let body = format!(
        "<p>A new response was submitted to <strong>{}</strong>.</p><table>{}</table>{}{}",
        escape(&form.title),
        rows,
        attachment_list(request),
        admin_link(site, request)
    );

    RenderedEmail {
        subject: format!("[{}] New response: {}", site.name, form.title),
        html: layout(site, "New form submission", &body),
    }
}

/// Receipt sent to the person who got in touch
pub fn acknowledgement(site: &SiteInfo, request: &ClientRequest) -> RenderedEmail {
    let greeting = if request.name.is_empty() {
        "Hello,".to_string()
    } else {
        format!("Hi {},", request.name)
    };

    let body = format!(
        "<p>{}</p><p>Thanks for reaching out to {}. We received your message and will get back to you shortly.</p>",
        escape(&greeting),
        escape(&site.name)
    );

    RenderedEmail {
        subject: format!("We received your message - {}", site.name),
        html: layout(site, "Thanks for getting in touch", &body),
    }
}

/// An admin's answer to a client request, quoting the original message
pub fn admin_reply(site: &SiteInfo, request: &ClientRequest, message: &str) -> RenderedEmail {
    let original = if request.message.is_empty() {
        String::new()
    } else {
        format!(
            r#"<blockquote style="border-left: 3px solid #e5e7eb; margin: 24px 0 0; padding-left: 12px; color: #6b7280;">{}</blockquote>"#,
            paragraphs(&request.message)
        )
    };

    let body = format!("<p>{}</p>{}", paragraphs(message), original);
    let subject = if request.subject.is_empty() {
        format!("Re: your message to {}", site.name)
    } else {
        format!("Re: {}", request.subject)
    };

    RenderedEmail {
        html: layout(site, &subject, &body),
        subject,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::{FieldType, FormField, NewClientRequest, NewForm, RequestType};
    use serde_json::json;

    fn site() -> SiteInfo {
        SiteInfo {
            name: "Studio".to_string(),
            url: "https://studio.test".to_string(),
        }
    }

    fn inquiry() -> ClientRequest {
        ClientRequest::create(NewClientRequest {
            name: "Eve <script>".to_string(),
            email: "eve@example.com".to_string(),
            subject: "Quote".to_string(),
            message: "line one\nline two".to_string(),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn inquiry_escapes_user_content() {
        let email = inquiry_notification(&site(), &inquiry());
        assert!(email.html.contains("Eve &lt;script&gt;"));
        assert!(!email.html.contains("<script>"));
        assert!(email.html.contains("line one<br>line two"));
        assert_eq!(email.subject, "[Studio] Quote");
    }

    #[test]
    fn inquiry_links_to_admin_detail() {
        let request = inquiry();
        let email = inquiry_notification(&site(), &request);
        assert!(email.html.contains(&format!("https://studio.test/admin/requests/{}", request.id)));
    }

    #[test]
    fn submission_lists_answers_in_field_order() {
        let form = Form::create(NewForm {
            title: "Brief".to_string(),
            fields: vec![
                FormField { id: "b".into(), label: "Budget".into(), field_type: FieldType::Number, ..Default::default() },
                FormField {
                    id: "s".into(),
                    label: "Services".into(),
                    field_type: FieldType::Checkbox,
                    options: vec!["web".into(), "app".into()],
                    ..Default::default()
                },
            ],
            ..Default::default()
        })
        .unwrap();
        let request = ClientRequest::create(NewClientRequest {
            request_type: RequestType::FormSubmission,
            form_id: Some(form.id.clone()),
            submission: json!({"b": 5000, "s": ["web", "app"]}).as_object().unwrap().clone(),
            ..Default::default()
        })
        .unwrap();

        let email = submission_notification(&site(), &request, &form);
        let budget = email.html.find("Budget").unwrap();
        let services = email.html.find("Services").unwrap();
        assert!(budget < services);
        assert!(email.html.contains("web, app"));
        assert!(email.html.contains("5000"));
    }

    #[test]
    fn reply_quotes_the_original() {
        let email = admin_reply(&site(), &inquiry(), "Happy to help");
        assert_eq!(email.subject, "Re: Quote");
        assert!(email.html.contains("Happy to help"));
        assert!(email.html.contains("<blockquote"));
    }

    #[test]
    fn links_are_joined_onto_the_site_url() {
        let site = SiteInfo { name: "S".into(), url: "https://studio.test/".into() };
        assert_eq!(site.link("/admin"), "https://studio.test/admin");
    }
}
