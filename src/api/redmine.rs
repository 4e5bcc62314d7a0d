use super::{Activity, ActivityLookup, Integration, TimeEntry};
use crate::libs::error::IntegrationError;
use crate::libs::messages::prompts::{PROMPT_REDMINE_DEFAULT_ACTIVITY, PROMPT_REDMINE_TOKEN, PROMPT_REDMINE_URL};
use crate::libs::messages::Message;
use crate::msg_error_anyhow;
use anyhow::Result;
use dialoguer::{theme::ColorfulTheme, Input};
use reqwest::{Client, Response, StatusCode};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;
use tracing::{debug, error};

const API_KEY_HEADER: &str = "X-Redmine-API-Key";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Deserialize, Debug)]
struct IssueResponse {
    issue: Issue,
}

#[derive(Deserialize, Debug)]
struct Issue {
    project: ProjectRef,
}

#[derive(Deserialize, Debug)]
struct ProjectRef {
    id: i64,
}

#[derive(Deserialize, Debug)]
struct ProjectResponse {
    project: Project,
}

#[derive(Deserialize, Debug)]
struct Project {
    #[serde(default)]
    time_entry_activities: Vec<ProjectActivity>,
}

#[derive(Deserialize, Debug)]
struct ProjectActivity {
    id: i64,
    name: String,
}

#[derive(Deserialize, Debug, Default)]
struct ErrorResponse {
    #[serde(default)]
    errors: Vec<String>,
}

/// Redmine credentials kept in the settings row's `integration_config`.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(default)]
pub struct RedmineConfig {
    pub url: String,
    pub token: String,
    /// Accepts both `7` and `"7"`.
    #[serde(deserialize_with = "int_from_string")]
    pub default_activity: i64,
}

fn int_from_string<'de, D>(deserializer: D) -> std::result::Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum IntOrString {
        Int(i64),
        String(String),
    }

    match IntOrString::deserialize(deserializer)? {
        IntOrString::Int(value) => Ok(value),
        IntOrString::String(value) if value.trim().is_empty() => Ok(0),
        IntOrString::String(value) => value.trim().parse().map_err(de::Error::custom),
    }
}

impl RedmineConfig {
    /// Parses the settings blob. An empty blob means "not configured".
    pub fn from_settings_blob(blob: &str) -> Result<Self> {
        if blob.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_str(blob).map_err(|e| msg_error_anyhow!(Message::IntegrationConfigParseError(e.to_string())))
    }

    pub fn to_settings_blob(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn is_configured(&self) -> bool {
        !self.url.trim().is_empty() && !self.token.trim().is_empty()
    }

    fn base_url(&self) -> &str {
        self.url.trim_end_matches('/')
    }

    pub fn init(config: &Option<Self>) -> Result<Self> {
        let config = config.clone().unwrap_or_default();
        println!("{}", Message::RedmineHeader);
        Ok(Self {
            url: Input::with_theme(&ColorfulTheme::default())
                .with_prompt(PROMPT_REDMINE_URL)
                .default(config.url)
                .interact_text()?,
            token: Input::with_theme(&ColorfulTheme::default())
                .with_prompt(PROMPT_REDMINE_TOKEN)
                .default(config.token)
                .interact_text()?,
            default_activity: Input::with_theme(&ColorfulTheme::default())
                .with_prompt(PROMPT_REDMINE_DEFAULT_ACTIVITY)
                .default(config.default_activity)
                .interact_text()?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct Redmine {
    client: Client,
    config: RedmineConfig,
}

impl Redmine {
    pub fn new(config: &RedmineConfig) -> Self {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build().unwrap_or_else(|_| Client::new());
        Self {
            client,
            config: config.clone(),
        }
    }

    pub fn config(&self) -> &RedmineConfig {
        &self.config
    }

    fn ensure_configured(&self) -> Result<(), IntegrationError> {
        if self.config.is_configured() {
            Ok(())
        } else {
            Err(IntegrationError::NotConfigured)
        }
    }

    async fn get_json<T: for<'de> Deserialize<'de>>(&self, url: &str) -> Result<T, IntegrationError> {
        debug!(url, "redmine GET");
        let response = self.client.get(url).header(API_KEY_HEADER, &self.config.token).send().await?;

        match response.status() {
            StatusCode::OK => Ok(response.json::<T>().await?),
            StatusCode::UNAUTHORIZED => Err(IntegrationError::Unauthorized),
            status => Err(IntegrationError::UnexpectedStatus(status.as_u16())),
        }
    }

    pub fn time_entry_body(entry: &TimeEntry) -> serde_json::Value {
        json!({
            "time_entry": {
                "issue_id": entry.external_id,
                "hours": entry.hours,
                "comments": entry.description,
                "spent_on": entry.date.format("%Y-%m-%d").to_string(),
                "activity_id": entry.activity_id,
            }
        })
    }

    async fn submission_error(response: Response) -> IntegrationError {
        let status = response.status();
        let errors = response.json::<ErrorResponse>().await.unwrap_or_default().errors;

        if errors.is_empty() {
            IntegrationError::UnexpectedStatus(status.as_u16())
        } else {
            IntegrationError::Rejected(errors)
        }
    }
}

impl Integration for Redmine {
    async fn resolve_activities(&self, external_id: &str) -> Result<ActivityLookup, IntegrationError> {
        self.ensure_configured()?;

        let issue_url = format!("{}/issues/{}.json", self.config.base_url(), external_id.trim());
        let issue = self.get_json::<IssueResponse>(&issue_url).await?.issue;

        let project_url = format!(
            "{}/projects/{}.json?include=time_entry_activities",
            self.config.base_url(),
            issue.project.id
        );
        let project = self.get_json::<ProjectResponse>(&project_url).await?.project;

        let activities: Vec<Activity> = project
            .time_entry_activities
            .into_iter()
            .map(|activity| Activity {
                id: activity.id,
                name: activity.name,
            })
            .collect();
        let default = activities.iter().find(|activity| activity.id == self.config.default_activity).cloned();

        Ok(ActivityLookup { activities, default })
    }

    async fn submit_time_entry(&self, entry: &TimeEntry) -> Result<(), IntegrationError> {
        self.ensure_configured()?;

        let url = format!("{}/time_entries.json", self.config.base_url());
        let response = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, &self.config.token)
            .json(&Self::time_entry_body(entry))
            .send()
            .await?;

        match response.status() {
            StatusCode::CREATED => Ok(()),
            StatusCode::UNAUTHORIZED => Err(IntegrationError::Unauthorized),
            _ => {
                let error = Self::submission_error(response).await;
                error!(external_id = %entry.external_id, %error, "time entry rejected");
                Err(error)
            }
        }
    }
}
