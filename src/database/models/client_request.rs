use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{merge, new_id, require, ValidationError};
use crate::database::{Collection, Document};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestType {
    /// Sent through the generic contact form
    #[default]
    Inquiry,
    /// Answers to an admin-defined form
    FormSubmission,
}

impl RequestType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestType::Inquiry => "inquiry",
            RequestType::FormSubmission => "form_submission",
        }
    }
}

/// `new -> replied -> closed`; a client reply moves any state back to `replied`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    #[default]
    New,
    Replied,
    Closed,
}

impl RequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::New => "new",
            RequestStatus::Replied => "replied",
            RequestStatus::Closed => "closed",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplySender {
    #[default]
    Admin,
    Client,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reply {
    #[serde(default)]
    pub sender: ReplySender,
    pub message: String,
    pub sent_at: DateTime<Utc>,
}

/// Thread entry as sent in an update; `sent_at` may be left out
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ReplyInput {
    pub sender: ReplySender,
    pub message: String,
    pub sent_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientRequest {
    pub id: String,
    #[serde(rename = "type")]
    pub request_type: RequestType,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub form_id: Option<String>,
    #[serde(default)]
    pub submission: Map<String, Value>,
    #[serde(default)]
    pub status: RequestStatus,
    #[serde(default)]
    pub replies: Vec<Reply>,
    #[serde(default)]
    pub attachments: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct NewClientRequest {
    #[serde(rename = "type")]
    pub request_type: RequestType,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub form_id: Option<String>,
    pub submission: Map<String, Value>,
    pub attachments: Vec<String>,
}

/// Partial update. `replies`, when present, replaces the whole thread.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ClientRequestPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub subject: Option<String>,
    pub message: Option<String>,
    pub status: Option<RequestStatus>,
    pub replies: Option<Vec<ReplyInput>>,
    pub attachments: Option<Vec<String>>,
}

impl ClientRequest {
    pub fn create(input: NewClientRequest) -> Result<Self, ValidationError> {
        let now = Utc::now();
        let request = Self {
            id: new_id(),
            request_type: input.request_type,
            name: input.name.trim().to_string(),
            email: input.email.trim().to_string(),
            subject: input.subject.trim().to_string(),
            message: input.message,
            form_id: input.form_id.filter(|id| !id.trim().is_empty()),
            submission: input.submission,
            status: RequestStatus::New,
            replies: Vec::new(),
            attachments: input.attachments,
            created_at: now,
            updated_at: now,
        };
        request.validate()?;
        Ok(request)
    }

    pub fn apply(&mut self, patch: ClientRequestPatch) -> Result<(), ValidationError> {
        merge(&mut self.name, patch.name);
        merge(&mut self.email, patch.email.map(|e| e.trim().to_string()));
        merge(&mut self.subject, patch.subject);
        merge(&mut self.message, patch.message);
        merge(&mut self.status, patch.status);
        merge(&mut self.attachments, patch.attachments);
        let now = Utc::now();
        if let Some(replies) = patch.replies {
            self.replies = self.resolve_replies(replies, now);
        }
        self.updated_at = now;
        self.validate()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        match self.request_type {
            RequestType::Inquiry => {
                require("name", &self.name)?;
                require("email", &self.email)?;
                require("message", &self.message)?;
            }
            RequestType::FormSubmission => {
                require("form_id", self.form_id.as_deref().unwrap_or_default())?;
            }
        }
        if !self.email.is_empty() && !self.email.contains('@') {
            return Err(ValidationError::invalid("email", "not an email address"));
        }
        for (i, reply) in self.replies.iter().enumerate() {
            require(&format!("replies[{}].message", i), &reply.message)?;
        }
        Ok(())
    }

    /// Entries without a timestamp keep the one already stored at the same
    /// position when sender and message are unchanged; otherwise they get `now`
    fn resolve_replies(&self, replies: Vec<ReplyInput>, now: DateTime<Utc>) -> Vec<Reply> {
        replies
            .into_iter()
            .enumerate()
            .map(|(i, input)| {
                let sent_at = input.sent_at.unwrap_or_else(|| {
                    self.replies
                        .get(i)
                        .filter(|old| old.sender == input.sender && old.message == input.message)
                        .map_or(now, |old| old.sent_at)
                });
                Reply {
                    sender: input.sender,
                    message: input.message,
                    sent_at,
                }
            })
            .collect()
    }

    /// Append a message to the thread. Any reply leaves the request `replied`.
    pub fn add_reply(&mut self, sender: ReplySender, message: impl Into<String>) {
        let now = Utc::now();
        self.replies.push(Reply {
            sender,
            message: message.into(),
            sent_at: now,
        });
        self.status = RequestStatus::Replied;
        self.updated_at = now;
    }

    /// Address replies go to, if the requester left one
    pub fn reply_address(&self) -> Option<&str> {
        let email = self.email.trim();
        if email.is_empty() {
            None
        } else {
            Some(email)
        }
    }

    /// Subject line shown in lists and notification emails
    pub fn display_subject(&self) -> String {
        if !self.subject.is_empty() {
            self.subject.clone()
        } else if self.name.is_empty() {
            format!("New {}", self.request_type.as_str().replace('_', " "))
        } else {
            format!("New {} from {}", self.request_type.as_str().replace('_', " "), self.name)
        }
    }
}

impl Document for ClientRequest {
    const COLLECTION: Collection = Collection::ClientRequests;
    const LABEL: &'static str = "Client request";

    fn id(&self) -> &str {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inquiry() -> NewClientRequest {
        NewClientRequest {
            name: "Grace".to_string(),
            email: "grace@example.com".to_string(),
            message: "We need an app".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn inquiries_start_new() {
        let request = ClientRequest::create(inquiry()).unwrap();
        assert_eq!(request.status, RequestStatus::New);
        assert_eq!(request.request_type, RequestType::Inquiry);
        assert!(request.replies.is_empty());
    }

    #[test]
    fn inquiries_need_a_message() {
        let err = ClientRequest::create(NewClientRequest { message: String::new(), ..inquiry() }).unwrap_err();
        assert_eq!(err, ValidationError::MissingRequiredField("message".to_string()));
    }

    #[test]
    fn submissions_need_a_form_but_not_an_email() {
        let err = ClientRequest::create(NewClientRequest {
            request_type: RequestType::FormSubmission,
            ..Default::default()
        })
        .unwrap_err();
        assert_eq!(err, ValidationError::MissingRequiredField("form_id".to_string()));

        let ok = ClientRequest::create(NewClientRequest {
            request_type: RequestType::FormSubmission,
            form_id: Some("f1".to_string()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(ok.reply_address(), None);
    }

    #[test]
    fn replies_move_status_to_replied() {
        let mut request = ClientRequest::create(inquiry()).unwrap();
        request.status = RequestStatus::Closed;
        request.add_reply(ReplySender::Client, "Any news?");
        assert_eq!(request.status, RequestStatus::Replied);
        assert_eq!(request.replies.len(), 1);
        assert_eq!(request.replies[0].sender, ReplySender::Client);
    }

    #[test]
    fn replaying_a_thread_keeps_timestamps() {
        let mut request = ClientRequest::create(inquiry()).unwrap();
        let thread = vec![ReplyInput {
            message: "hello".to_string(),
            ..Default::default()
        }];

        request.apply(ClientRequestPatch { replies: Some(thread.clone()), ..Default::default() }).unwrap();
        let first = request.replies.clone();
        request.apply(ClientRequestPatch { replies: Some(thread), ..Default::default() }).unwrap();
        assert_eq!(request.replies, first);

        let edited = vec![ReplyInput {
            message: "hello again".to_string(),
            ..Default::default()
        }];
        request.apply(ClientRequestPatch { replies: Some(edited), ..Default::default() }).unwrap();
        assert_eq!(request.replies[0].message, "hello again");
        assert!(request.replies[0].sent_at >= first[0].sent_at);
    }

    #[test]
    fn type_is_serialized_under_type_key() {
        let request = ClientRequest::create(inquiry()).unwrap();
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["type"], "inquiry");
        assert_eq!(value["status"], "new");
    }

    #[test]
    fn display_subject_falls_back_to_type_and_name() {
        let request = ClientRequest::create(inquiry()).unwrap();
        assert_eq!(request.display_subject(), "New inquiry from Grace");
    }
}
