use axum::{
    extract::{Path, Query, State},
    response::Html,
};

use super::layout::{page, Area, PageError};
use super::widgets::{form_field, tech_badge};
use crate::database::models::{Project, TeamMember};
use crate::database::DocumentFilter;
use crate::handlers::public::catalog::{load_team, ProjectQuery};
use crate::handlers::public::forms::load_active;
use crate::html::{escape, paragraphs};
use crate::state::AppState;

type PageResult = Result<Html<String>, PageError>;

fn site_name(state: &AppState) -> &str {
    &state.config.server.site_name
}

fn project_card(project: &Project) -> String {
    let image = project
        .images
        .first()
        .map(|src| format!(r#"<img src="{}" alt="">"#, escape(src)))
        .unwrap_or_default();
    let tags: String = project
        .categories
        .iter()
        .map(|c| format!(r#"<span class="tag">{}</span>"#, escape(c)))
        .collect();

    format!(
        r#"<article class="card">{image}<h3><a href="/projects/{id}">{title}</a></h3><p>{summary}</p>{tags}</article>"#,
        image = image,
        id = escape(&project.id),
        title = escape(&project.title),
        summary = escape(&project.short_description),
        tags = tags,
    )
}

fn member_card(member: &TeamMember) -> String {
    let image = if member.image.is_empty() {
        String::new()
    } else {
        format!(r#"<img src="{}" alt="{}">"#, escape(&member.image), escape(&member.name))
    };
    let mut links: Vec<String> = member
        .socials
        .iter()
        .map(|s| format!(r#"<a href="{}" rel="noopener">{}</a>"#, escape(&s.url), escape(&s.platform)))
        .collect();
    if !member.portfolio.is_empty() {
        links.insert(0, format!(r#"<a href="{}" rel="noopener">Portfolio</a>"#, escape(&member.portfolio)));
    }

    format!(
        r#"<article class="card">{}<h3>{}</h3><p><strong>{}</strong></p><p>{}</p><p>{}</p></article>"#,
        image,
        escape(&member.name),
        escape(&member.role),
        paragraphs(&member.description),
        links.join(" &middot; ")
    )
}

fn list_section(items: &[String], empty: &str) -> String {
    if items.is_empty() {
        format!(r#"<p class="notice">{}</p>"#, escape(empty))
    } else {
        format!(r#"<div class="grid">{}</div>"#, items.concat())
    }
}

/// GET /
pub async fn home(State(state): State<AppState>) -> PageResult {
    let projects = state.repository::<Project>();
    let mut featured = projects
        .select_any(&DocumentFilter::new().eq("featured", true))
        .await?;
    if featured.is_empty() {
        featured = projects.select_any(&DocumentFilter::new()).await?;
    }
    featured.truncate(3);

    let cards: Vec<String> = featured.iter().map(project_card).collect();
    let body = format!(
        r#"<section><h1>We design and build software that ships.</h1>
<p>{name} is a small studio partnering with founders and teams on web, mobile and cloud products.</p>
<p><a href="/contact">Start a project</a> &middot; <a href="/projects">See our work</a></p></section>
<section><h2>Selected work</h2>{cards}</section>"#,
        name = escape(site_name(&state)),
        cards = list_section(&cards, "Our portfolio is being updated."),
    );

    Ok(page(site_name(&state), Area::Public, "Home", &body))
}

/// GET /about
pub async fn about(State(state): State<AppState>) -> PageResult {
    let team = load_team(&state).await?;
    let cards: Vec<String> = team.iter().map(member_card).collect();

    let body = format!(
        r#"<h1>About us</h1>
<p>We are engineers and designers who care about craft, clear communication and products that last.</p>
<h2>The team</h2>{}"#,
        list_section(&cards, "Team profiles are coming soon.")
    );

    Ok(page(site_name(&state), Area::Public, "About", &body))
}

/// GET /projects
pub async fn projects(State(state): State<AppState>, Query(query): Query<ProjectQuery>) -> PageResult {
    let projects = state.repository::<Project>().select_any(&query.to_filter()).await?;
    let cards: Vec<String> = projects.iter().map(project_card).collect();

    let heading = match query.category.as_deref().filter(|c| !c.trim().is_empty()) {
        Some(category) => format!("Projects: {}", escape(category)),
        None => "Projects".to_string(),
    };
    let body = format!("<h1>{}</h1>{}", heading, list_section(&cards, "No projects match."));

    Ok(page(site_name(&state), Area::Public, "Projects", &body))
}

fn text_list(heading: &str, items: &[String]) -> String {
    if items.is_empty() {
        return String::new();
    }
    let items: String = items.iter().map(|i| format!("<li>{}</li>", escape(i))).collect();
    format!("<h2>{}</h2><ul>{}</ul>", heading, items)
}

/// GET /projects/:id
pub async fn project_detail(State(state): State<AppState>, Path(id): Path<String>) -> PageResult {
    let project = state.repository::<Project>().select_404(&id).await?;

    let gallery: String = project
        .images
        .iter()
        .map(|src| format!(r#"<img src="{}" alt="">"#, escape(src)))
        .collect();
    let stack: String = project.tech_stack.iter().map(tech_badge).collect();

    let mut facts = vec![format!("<li>Status: {}</li>", project.status.as_str().replace('_', " "))];
    if !project.timeline.is_empty() {
        facts.push(format!("<li>Timeline: {}</li>", escape(&project.timeline)));
    }
    if let Some(size) = project.team_size {
        facts.push(format!("<li>Team size: {}</li>", size));
    }
    if !project.live_url.is_empty() {
        facts.push(format!(r#"<li><a href="{}" rel="noopener">Live site</a></li>"#, escape(&project.live_url)));
    }
    if !project.repo_url.is_empty() {
        facts.push(format!(r#"<li><a href="{}" rel="noopener">Source</a></li>"#, escape(&project.repo_url)));
    }

    let body = format!(
        r#"<p><a href="/projects">&larr; All projects</a></p>
<h1>{title}</h1><p><em>{summary}</em></p>
<div class="grid">{gallery}</div>
<p>{description}</p>
<ul>{facts}</ul>
{stack}{features}{challenges}{solutions}"#,
        title = escape(&project.title),
        summary = escape(&project.short_description),
        gallery = gallery,
        description = paragraphs(&project.description),
        facts = facts.concat(),
        stack = if stack.is_empty() { String::new() } else { format!("<h2>Tech stack</h2><p>{}</p>", stack) },
        features = text_list("Features", &project.features),
        challenges = text_list("Challenges", &project.challenges),
        solutions = text_list("Solutions", &project.solutions),
    );

    Ok(page(site_name(&state), Area::Public, &project.title, &body))
}

/// GET /contact
pub async fn contact(State(state): State<AppState>) -> Html<String> {
    let body = r#"<h1>Contact us</h1>
<p>Tell us about your project and we'll get back to you within two business days.</p>
<form data-json-action="/api/contact" data-success="Thanks! We received your message.">
<label class="field"><span>Name *</span><input name="name" required></label>
<label class="field"><span>Email *</span><input type="email" name="email" required></label>
<label class="field"><span>Subject</span><input name="subject"></label>
<label class="field"><span>Message *</span><textarea name="message" rows="6" required></textarea></label>
<button type="submit">Send</button>
<p class="form-status"></p>
</form>"#;

    page(site_name(&state), Area::Public, "Contact", body)
}

/// GET /forms/:id - a published custom form
pub async fn form(State(state): State<AppState>, Path(id): Path<String>) -> PageResult {
    let form = load_active(&state, &id).await?;
    let fields: String = form.fields.iter().map(form_field).collect();

    let body = format!(
        r#"<h1>{title}</h1><p>{description}</p>
<form data-json-action="/api/forms/{id}/submit" data-success="Thanks! Your response was submitted.">
{fields}
<button type="submit">Submit</button>
<p class="form-status"></p>
</form>"#,
        title = escape(&form.title),
        description = paragraphs(&form.description),
        id = escape(&form.id),
        fields = fields,
    );

    Ok(page(site_name(&state), Area::Public, &form.title, &body))
}

/// GET /login
pub async fn login(State(state): State<AppState>) -> Html<String> {
    let body = r#"<h1>Admin login</h1>
<form data-json-action="/api/auth/login" data-redirect="/admin">
<label class="field"><span>Email</span><input type="email" name="email" autocomplete="username" required></label>
<label class="field"><span>Password</span><input type="password" name="password" autocomplete="current-password" required></label>
<button type="submit">Log in</button>
<p class="form-status"></p>
</form>"#;

    page(site_name(&state), Area::Public, "Log in", body)
}

/// GET /privacy
pub async fn privacy(State(state): State<AppState>) -> Html<String> {
    let name = escape(site_name(&state));
    let body = format!(
        r#"<h1>Privacy policy</h1>
<p>{name} collects the details you send through our contact and project forms: your name, email address, message and any files you attach. We use them only to respond to you and to scope potential work.</p>
<p>Form submissions are stored in our project database and processed by our email provider to deliver notifications and replies. Uploaded files are hosted by our media provider.</p>
<p>We do not sell your data or use it for advertising. To have your information removed, contact us and we will delete your requests and replies.</p>"#
    );
    page(site_name(&state), Area::Public, "Privacy", &body)
}

/// GET /terms
pub async fn terms(State(state): State<AppState>) -> Html<String> {
    let name = escape(site_name(&state));
    let body = format!(
        r#"<h1>Terms of use</h1>
<p>This website is provided by {name} for information about our services. Portfolio content is shown with our clients' permission and remains their property.</p>
<p>Sending an inquiry does not create an agreement. Any engagement is governed by a separate written contract.</p>
<p>The site is provided as is. We may update these terms at any time.</p>"#
    );
    page(site_name(&state), Area::Public, "Terms", &body)
}
