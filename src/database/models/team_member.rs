use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{merge, new_id, optional_url, require, ValidationError};
use crate::database::{Collection, Document};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamMember {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub image: String,
    pub role: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub portfolio: String,
    #[serde(default)]
    pub socials: Vec<SocialLink>,
    /// Position on the team page, ascending
    #[serde(default)]
    pub order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SocialLink {
    pub platform: String,
    pub url: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct NewTeamMember {
    pub name: String,
    pub image: String,
    pub role: String,
    pub description: String,
    pub portfolio: String,
    pub socials: Vec<SocialLink>,
    pub order: i32,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TeamMemberPatch {
    pub name: Option<String>,
    pub image: Option<String>,
    pub role: Option<String>,
    pub description: Option<String>,
    pub portfolio: Option<String>,
    pub socials: Option<Vec<SocialLink>>,
    pub order: Option<i32>,
}

impl TeamMember {
    pub fn create(input: NewTeamMember) -> Result<Self, ValidationError> {
        let now = Utc::now();
        let member = Self {
            id: new_id(),
            name: input.name.trim().to_string(),
            image: input.image,
            role: input.role.trim().to_string(),
            description: input.description,
            portfolio: input.portfolio,
            socials: input.socials,
            order: input.order,
            created_at: now,
            updated_at: now,
        };
        member.validate()?;
        Ok(member)
    }

    pub fn apply(&mut self, patch: TeamMemberPatch) -> Result<(), ValidationError> {
        merge(&mut self.name, patch.name);
        merge(&mut self.image, patch.image);
        merge(&mut self.role, patch.role);
        merge(&mut self.description, patch.description);
        merge(&mut self.portfolio, patch.portfolio);
        merge(&mut self.socials, patch.socials);
        merge(&mut self.order, patch.order);
        self.updated_at = Utc::now();
        self.validate()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require("name", &self.name)?;
        require("role", &self.role)?;
        optional_url("portfolio", &self.portfolio)?;
        for (i, social) in self.socials.iter().enumerate() {
            require(&format!("socials[{}].platform", i), &social.platform)?;
            require(&format!("socials[{}].url", i), &social.url)?;
        }
        Ok(())
    }
}

impl Document for TeamMember {
    const COLLECTION: Collection = Collection::TeamMembers;
    const LABEL: &'static str = "Team member";

    fn id(&self) -> &str {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> NewTeamMember {
        NewTeamMember {
            name: "Ada Lovelace".to_string(),
            role: "Engineer".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn creates_with_generated_id_and_defaults() {
        let member = TeamMember::create(input()).unwrap();
        assert!(!member.id.is_empty());
        assert_eq!(member.order, 0);
        assert!(member.socials.is_empty());
    }

    #[test]
    fn role_is_required() {
        let err = TeamMember::create(NewTeamMember { role: String::new(), ..input() }).unwrap_err();
        assert_eq!(err, ValidationError::MissingRequiredField("role".to_string()));
    }

    #[test]
    fn patch_revalidates_required_fields() {
        let mut member = TeamMember::create(input()).unwrap();
        let patch = TeamMemberPatch {
            name: Some(" ".to_string()),
            ..Default::default()
        };
        assert!(member.apply(patch).is_err());
    }

    #[test]
    fn social_links_need_both_parts() {
        let err = TeamMember::create(NewTeamMember {
            socials: vec![SocialLink { platform: "github".to_string(), url: String::new() }],
            ..input()
        })
        .unwrap_err();
        assert_eq!(err, ValidationError::MissingRequiredField("socials[0].url".to_string()));
    }
}
