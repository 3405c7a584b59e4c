//! Rendering for the two places records carry presentation hints: form field
//! types and tech-stack icon names. Both resolve to closed enums here; the
//! stored records only ever hold the opaque strings.

use crate::database::models::{FieldType, FormField, TechStackEntry};
use crate::html::escape;

/// Known technology badges. Unrecognised icon names fall back to `Generic`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TechIcon {
    React,
    NextJs,
    Vue,
    Angular,
    NodeJs,
    TypeScript,
    JavaScript,
    Python,
    Rust,
    Go,
    Java,
    Swift,
    Kotlin,
    Flutter,
    Postgres,
    MongoDb,
    Redis,
    Docker,
    Kubernetes,
    Aws,
    Firebase,
    Tailwind,
    Figma,
    Generic,
}

impl TechIcon {
    /// Resolve an icon identifier, case-insensitively and ignoring separators
    pub fn parse(name: &str) -> Self {
        let key: String = name
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();
        // Icon-library prefixes ("si", "fa") are common in stored data
        let key = key
            .strip_prefix("si")
            .or_else(|| key.strip_prefix("fa"))
            .filter(|rest| Self::lookup(rest) != TechIcon::Generic)
            .unwrap_or(key.as_str());
        Self::lookup(key)
    }

    fn lookup(key: &str) -> Self {
        match key {
            "react" | "reactjs" => TechIcon::React,
            "next" | "nextjs" | "nextdotjs" => TechIcon::NextJs,
            "vue" | "vuejs" | "vuedotjs" => TechIcon::Vue,
            "angular" => TechIcon::Angular,
            "node" | "nodejs" | "nodedotjs" => TechIcon::NodeJs,
            "ts" | "typescript" => TechIcon::TypeScript,
            "js" | "javascript" => TechIcon::JavaScript,
            "python" | "py" => TechIcon::Python,
            "rust" => TechIcon::Rust,
            "go" | "golang" => TechIcon::Go,
            "java" => TechIcon::Java,
            "swift" => TechIcon::Swift,
            "kotlin" => TechIcon::Kotlin,
            "flutter" | "dart" => TechIcon::Flutter,
            "postgres" | "postgresql" => TechIcon::Postgres,
            "mongo" | "mongodb" => TechIcon::MongoDb,
            "redis" => TechIcon::Redis,
            "docker" => TechIcon::Docker,
            "kubernetes" | "k8s" => TechIcon::Kubernetes,
            "aws" | "amazonaws" | "amazonwebservices" => TechIcon::Aws,
            "firebase" => TechIcon::Firebase,
            "tailwind" | "tailwindcss" => TechIcon::Tailwind,
            "figma" => TechIcon::Figma,
            _ => TechIcon::Generic,
        }
    }

    /// Short badge text and brand colour
    fn badge(&self) -> (&'static str, &'static str) {
        match self {
            TechIcon::React => ("Re", "#149eca"),
            TechIcon::NextJs => ("N", "#000000"),
            TechIcon::Vue => ("V", "#42b883"),
            TechIcon::Angular => ("A", "#dd0031"),
            TechIcon::NodeJs => ("No", "#5fa04e"),
            TechIcon::TypeScript => ("TS", "#3178c6"),
            TechIcon::JavaScript => ("JS", "#c9a800"),
            TechIcon::Python => ("Py", "#3776ab"),
            TechIcon::Rust => ("Rs", "#b7410e"),
            TechIcon::Go => ("Go", "#00add8"),
            TechIcon::Java => ("J", "#e76f00"),
            TechIcon::Swift => ("Sw", "#f05138"),
            TechIcon::Kotlin => ("Kt", "#7f52ff"),
            TechIcon::Flutter => ("Fl", "#02569b"),
            TechIcon::Postgres => ("Pg", "#4169e1"),
            TechIcon::MongoDb => ("Mg", "#47a248"),
            TechIcon::Redis => ("Rd", "#dc382d"),
            TechIcon::Docker => ("Dk", "#2496ed"),
            TechIcon::Kubernetes => ("K8", "#326ce5"),
            TechIcon::Aws => ("AWS", "#ff9900"),
            TechIcon::Firebase => ("Fb", "#dd2c00"),
            TechIcon::Tailwind => ("Tw", "#06b6d4"),
            TechIcon::Figma => ("Fg", "#f24e1e"),
            TechIcon::Generic => ("", "#6b7280"),
        }
    }

    pub fn render(&self, fallback_label: &str) -> String {
        let (text, colour) = self.badge();
        let text = if text.is_empty() {
            fallback_label.chars().next().map(|c| c.to_uppercase().to_string()).unwrap_or_default()
        } else {
            text.to_string()
        };
        format!(
            r#"<span class="tech-icon" style="background: {}" aria-hidden="true">{}</span>"#,
            colour,
            escape(&text)
        )
    }
}

/// One tech-stack entry as a labelled badge
pub fn tech_badge(entry: &TechStackEntry) -> String {
    let icon = if entry.icon.is_empty() { &entry.name } else { &entry.icon };
    let category = if entry.category.is_empty() {
        String::new()
    } else {
        format!(r#" <small>{}</small>"#, escape(&entry.category))
    };
    format!(
        r#"<span class="tag">{}{}{}</span>"#,
        TechIcon::parse(icon).render(&entry.name),
        escape(&entry.name),
        category
    )
}

/// Input control for one form field, named `answers.<field id>`
pub fn form_field(field: &FormField) -> String {
    let name = format!("answers.{}", field.id);
    let required = if field.required { " required" } else { "" };
    let marker = if field.required { " *" } else { "" };
    let label = format!("{}{}", escape(&field.label), marker);
    let placeholder = escape(&field.placeholder);
    let name = escape(&name);

    let control = match field.field_type {
        FieldType::Textarea => format!(
            r#"<textarea name="{}" rows="5" placeholder="{}"{}></textarea>"#,
            name, placeholder, required
        ),
        FieldType::Select => {
            let options: String = field
                .options
                .iter()
                .map(|o| format!(r#"<option value="{0}">{0}</option>"#, escape(o)))
                .collect();
            format!(
                r#"<select name="{}"{}><option value="">{}</option>{}</select>"#,
                name,
                required,
                if placeholder.is_empty() { "Choose..." } else { placeholder.as_str() },
                options
            )
        }
        FieldType::Radio | FieldType::Checkbox => {
            let (kind, group) = if field.field_type == FieldType::Radio {
                ("radio", "")
            } else {
                ("checkbox", r#" data-group="""#)
            };
            // A required checkbox group is enforced server-side only
            let input_required = if kind == "radio" { required } else { "" };
            let options: String = field
                .options
                .iter()
                .map(|o| {
                    format!(
                        r#"<label><input type="{}" name="{}" value="{}"{}{}> {}</label>"#,
                        kind,
                        name,
                        escape(o),
                        group,
                        input_required,
                        escape(o)
                    )
                })
                .collect();
            return format!(
                r#"<fieldset class="field choices"><legend>{}</legend>{}</fieldset>"#,
                label, options
            );
        }
        FieldType::File => format!(r#"<input type="file" name="{}" multiple{}>"#, name, required),
        other => format!(
            r#"<input type="{}" name="{}" placeholder="{}"{}>"#,
            input_type(other),
            name,
            placeholder,
            required
        ),
    };

    format!(r#"<label class="field"><span>{}</span>{}</label>"#, label, control)
}

fn input_type(field_type: FieldType) -> &'static str {
    match field_type {
        FieldType::Email => "email",
        FieldType::Tel => "tel",
        FieldType::Number => "number",
        FieldType::Date => "date",
        FieldType::Url => "url",
        _ => "text",
    }
}
