use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;

use super::{merge, new_id, require, ValidationError};
use crate::database::{Collection, Document};

/// Input kinds a form field can ask for
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    #[default]
    Text,
    Email,
    Tel,
    Number,
    Textarea,
    Select,
    Radio,
    Checkbox,
    Date,
    Url,
    File,
}

impl FieldType {
    /// Field types whose answer must be one of `options`
    pub fn is_choice(&self) -> bool {
        matches!(self, FieldType::Select | FieldType::Radio | FieldType::Checkbox)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormField {
    /// Stable key for answers; generated when the admin leaves it blank
    pub id: String,
    pub field_type: FieldType,
    pub label: String,
    pub required: bool,
    pub placeholder: String,
    pub options: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Form {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub fields: Vec<FormField>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct NewForm {
    pub title: String,
    pub description: String,
    pub fields: Vec<FormField>,
    pub is_active: bool,
}

impl Default for NewForm {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            fields: Vec::new(),
            is_active: true,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FormPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub fields: Option<Vec<FormField>>,
    pub is_active: Option<bool>,
}

impl Form {
    pub fn create(input: NewForm) -> Result<Self, ValidationError> {
        let now = Utc::now();
        let mut form = Self {
            id: new_id(),
            title: input.title.trim().to_string(),
            description: input.description,
            fields: input.fields,
            is_active: input.is_active,
            created_at: now,
            updated_at: now,
        };
        form.assign_field_ids();
        form.validate()?;
        Ok(form)
    }

    pub fn apply(&mut self, patch: FormPatch) -> Result<(), ValidationError> {
        merge(&mut self.title, patch.title);
        merge(&mut self.description, patch.description);
        if let Some(fields) = patch.fields {
            self.fields = carry_field_ids(&self.fields, fields);
        }
        merge(&mut self.is_active, patch.is_active);
        self.assign_field_ids();
        self.updated_at = Utc::now();
        self.validate()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require("title", &self.title)?;

        let mut seen = HashSet::new();
        for (i, field) in self.fields.iter().enumerate() {
            require(&format!("fields[{}].label", i), &field.label)?;
            if field.field_type.is_choice() && field.options.iter().all(|o| o.trim().is_empty()) {
                return Err(ValidationError::invalid(
                    format!("fields[{}].options", i),
                    "choice fields need at least one option",
                ));
            }
            if !seen.insert(field.id.as_str()) {
                return Err(ValidationError::invalid(
                    format!("fields[{}].id", i),
                    format!("duplicate field id '{}'", field.id),
                ));
            }
        }
        Ok(())
    }

    fn assign_field_ids(&mut self) {
        for field in self.fields.iter_mut() {
            if field.id.trim().is_empty() {
                field.id = new_id();
            }
        }
    }

    /// Check that every required field has a non-empty answer
    pub fn validate_submission(&self, answers: &Map<String, Value>) -> Result<(), ValidationError> {
        for field in self.fields.iter().filter(|f| f.required) {
            if !answers.get(&field.id).map_or(false, is_answered) {
                return Err(ValidationError::MissingRequiredField(field.label.clone()));
            }
        }
        Ok(())
    }

    /// First answer given to an email-typed field
    pub fn requester_email(&self, answers: &Map<String, Value>) -> Option<String> {
        self.answer_where(answers, |f| f.field_type == FieldType::Email)
    }

    /// First answer given to a text field labelled as a name
    pub fn requester_name(&self, answers: &Map<String, Value>) -> Option<String> {
        self.answer_where(answers, |f| {
            f.field_type == FieldType::Text && f.label.to_lowercase().contains("name")
        })
    }

    fn answer_where(&self, answers: &Map<String, Value>, pred: impl Fn(&FormField) -> bool) -> Option<String> {
        self.fields
            .iter()
            .filter(|f| pred(f))
            .filter_map(|f| answers.get(&f.id).and_then(Value::as_str))
            .map(str::trim)
            .find(|s| !s.is_empty())
            .map(str::to_string)
    }
}

/// Blank ids in a replacement field list take the id of the stored field with
/// the same label, so stored answers stay attached to their field
fn carry_field_ids(existing: &[FormField], mut fields: Vec<FormField>) -> Vec<FormField> {
    let mut taken: HashSet<String> = fields
        .iter()
        .filter(|f| !f.id.trim().is_empty())
        .map(|f| f.id.clone())
        .collect();

    for field in fields.iter_mut().filter(|f| f.id.trim().is_empty()) {
        let label = field.label.trim().to_lowercase();
        let previous = existing
            .iter()
            .find(|old| !taken.contains(&old.id) && old.label.trim().to_lowercase() == label);
        if let Some(old) = previous {
            field.id = old.id.clone();
            taken.insert(old.id.clone());
        }
    }
    fields
}

fn is_answered(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.trim().is_empty(),
        Value::Array(items) => !items.is_empty(),
        _ => true,
    }
}

impl Document for Form {
    const COLLECTION: Collection = Collection::Forms;
    const LABEL: &'static str = "Form";

    fn id(&self) -> &str {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn field(id: &str, field_type: FieldType, label: &str, required: bool) -> FormField {
        FormField {
            id: id.to_string(),
            field_type,
            label: label.to_string(),
            required,
            ..Default::default()
        }
    }

    fn form() -> Form {
        Form::create(NewForm {
            title: "Project brief".to_string(),
            fields: vec![
                field("name", FieldType::Text, "Your name", true),
                field("email", FieldType::Email, "Email", false),
                field("budget", FieldType::Number, "Budget", true),
            ],
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn blank_field_ids_are_generated() {
        let form = Form::create(NewForm {
            title: "Survey".to_string(),
            fields: vec![field("", FieldType::Text, "Question", false)],
            ..Default::default()
        })
        .unwrap();
        assert!(!form.fields[0].id.is_empty());
        assert!(form.is_active);
    }

    #[test]
    fn replacing_fields_keeps_ids_by_label() {
        let mut form = form();
        let budget_id = form.fields[2].id.clone();
        let fields = vec![
            field("", FieldType::Number, "Budget", true),
            field("", FieldType::Text, "Timeline", false),
        ];

        form.apply(FormPatch { fields: Some(fields.clone()), ..Default::default() }).unwrap();
        assert_eq!(form.fields[0].id, budget_id);
        let timeline_id = form.fields[1].id.clone();
        assert!(!timeline_id.is_empty());

        form.apply(FormPatch { fields: Some(fields), ..Default::default() }).unwrap();
        assert_eq!(form.fields[0].id, budget_id);
        assert_eq!(form.fields[1].id, timeline_id);
    }

    #[test]
    fn repeated_labels_get_distinct_ids() {
        let mut form = form();
        let fields = vec![
            field("", FieldType::Text, "Budget", false),
            field("", FieldType::Text, "Budget", false),
        ];
        form.apply(FormPatch { fields: Some(fields), ..Default::default() }).unwrap();
        assert_eq!(form.fields[0].id, "budget");
        assert_ne!(form.fields[1].id, "budget");
    }

    #[test]
    fn choice_fields_need_options() {
        let err = Form::create(NewForm {
            title: "Survey".to_string(),
            fields: vec![field("q", FieldType::Radio, "Pick one", true)],
            ..Default::default()
        })
        .unwrap_err();
        assert!(matches!(err, ValidationError::InvalidField { .. }));
    }

    #[test]
    fn duplicate_field_ids_are_rejected() {
        let err = Form::create(NewForm {
            title: "Survey".to_string(),
            fields: vec![
                field("q", FieldType::Text, "One", false),
                field("q", FieldType::Text, "Two", false),
            ],
            ..Default::default()
        })
        .unwrap_err();
        assert!(matches!(err, ValidationError::InvalidField { .. }));
    }

    #[test]
    fn submission_requires_required_answers() {
        let form = form();
        let answers = json!({"name": "Ada", "budget": ""});
        let err = form.validate_submission(answers.as_object().unwrap()).unwrap_err();
        assert_eq!(err, ValidationError::MissingRequiredField("Budget".to_string()));

        let answers = json!({"name": "Ada", "budget": 5000});
        assert!(form.validate_submission(answers.as_object().unwrap()).is_ok());
    }

    #[test]
    fn extracts_requester_details() {
        let form = form();
        let answers = json!({"name": " Ada ", "email": "ada@example.com", "budget": 1});
        let answers = answers.as_object().unwrap();
        assert_eq!(form.requester_name(answers).as_deref(), Some("Ada"));
        assert_eq!(form.requester_email(answers).as_deref(), Some("ada@example.com"));
    }

    #[test]
    fn unknown_field_types_do_not_deserialize() {
        let result: Result<FormField, _> = serde_json::from_value(json!({"field_type": "slider", "label": "x"}));
        assert!(result.is_err());
    }
}
