use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{merge, new_id, nullable, optional_url, require, ValidationError};
use crate::database::{Collection, Document};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    Planned,
    InProgress,
    #[default]
    Completed,
}

impl ProjectStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Planned => "planned",
            ProjectStatus::InProgress => "in_progress",
            ProjectStatus::Completed => "completed",
        }
    }
}

/// One technology used by a project. `icon` is an opaque identifier that
/// only the page renderer interprets.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TechStackEntry {
    pub name: String,
    pub category: String,
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub title: String,
    pub short_description: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub tech_stack: Vec<TechStackEntry>,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub challenges: Vec<String>,
    #[serde(default)]
    pub solutions: Vec<String>,
    #[serde(default)]
    pub status: ProjectStatus,
    #[serde(default)]
    pub timeline: String,
    #[serde(default)]
    pub team_size: Option<u32>,
    #[serde(default)]
    pub live_url: String,
    #[serde(default)]
    pub repo_url: String,
    #[serde(default)]
    pub featured: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct NewProject {
    pub title: String,
    pub short_description: String,
    pub description: String,
    pub categories: Vec<String>,
    pub images: Vec<String>,
    pub tech_stack: Vec<TechStackEntry>,
    pub features: Vec<String>,
    pub challenges: Vec<String>,
    pub solutions: Vec<String>,
    pub status: ProjectStatus,
    pub timeline: String,
    pub team_size: Option<u32>,
    pub live_url: String,
    pub repo_url: String,
    pub featured: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProjectPatch {
    pub title: Option<String>,
    pub short_description: Option<String>,
    pub description: Option<String>,
    pub categories: Option<Vec<String>>,
    pub images: Option<Vec<String>>,
    pub tech_stack: Option<Vec<TechStackEntry>>,
    pub features: Option<Vec<String>>,
    pub challenges: Option<Vec<String>>,
    pub solutions: Option<Vec<String>>,
    pub status: Option<ProjectStatus>,
    pub timeline: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub team_size: Option<Option<u32>>,
    pub live_url: Option<String>,
    pub repo_url: Option<String>,
    pub featured: Option<bool>,
}

impl Project {
    pub fn create(input: NewProject) -> Result<Self, ValidationError> {
        let now = Utc::now();
        let project = Self {
            id: new_id(),
            title: input.title.trim().to_string(),
            short_description: input.short_description,
            description: input.description,
            categories: normalize_tags(input.categories),
            images: input.images,
            tech_stack: input.tech_stack,
            features: input.features,
            challenges: input.challenges,
            solutions: input.solutions,
            status: input.status,
            timeline: input.timeline,
            team_size: input.team_size,
            live_url: input.live_url,
            repo_url: input.repo_url,
            featured: input.featured,
            created_at: now,
            updated_at: now,
        };
        project.validate()?;
        Ok(project)
    }

    pub fn apply(&mut self, patch: ProjectPatch) -> Result<(), ValidationError> {
        merge(&mut self.title, patch.title);
        merge(&mut self.short_description, patch.short_description);
        merge(&mut self.description, patch.description);
        merge(&mut self.categories, patch.categories.map(normalize_tags));
        merge(&mut self.images, patch.images);
        merge(&mut self.tech_stack, patch.tech_stack);
        merge(&mut self.features, patch.features);
        merge(&mut self.challenges, patch.challenges);
        merge(&mut self.solutions, patch.solutions);
        merge(&mut self.status, patch.status);
        merge(&mut self.timeline, patch.timeline);
        merge(&mut self.team_size, patch.team_size);
        merge(&mut self.live_url, patch.live_url);
        merge(&mut self.repo_url, patch.repo_url);
        merge(&mut self.featured, patch.featured);
        self.updated_at = Utc::now();
        self.validate()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require("title", &self.title)?;
        require("short_description", &self.short_description)?;
        for (i, tech) in self.tech_stack.iter().enumerate() {
            require(&format!("tech_stack[{}].name", i), &tech.name)?;
        }
        if self.team_size == Some(0) {
            return Err(ValidationError::invalid("team_size", "must be at least 1"));
        }
        optional_url("live_url", &self.live_url)?;
        optional_url("repo_url", &self.repo_url)?;
        Ok(())
    }
}

/// Category tags are matched exactly by list filters, so store them trimmed,
/// lowercased and without duplicates
fn normalize_tags(tags: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim().to_lowercase();
        if !tag.is_empty() && !out.contains(&tag) {
            out.push(tag);
        }
    }
    out
}

impl Document for Project {
    const COLLECTION: Collection = Collection::Projects;
    const LABEL: &'static str = "Project";

    fn id(&self) -> &str {
        &self.id
    }
}
