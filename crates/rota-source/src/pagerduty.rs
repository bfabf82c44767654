use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use rota_core::types::{Period, ScheduleId, ScheduleMetadata};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::{Result, SourceError};
use crate::source::{Assignment, ScheduleSource, SourcedSchedule};

const ACCEPT: &str = "application/vnd.pagerduty+json;version=2";

/// Reads rendered on-call entries from the PagerDuty REST API.
pub struct PagerDutySource {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl PagerDutySource {
    pub fn new(base_url: Option<String>, api_key: String, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        let base_url = base_url
            .unwrap_or_else(|| rota_core::config::DEFAULT_PAGERDUTY_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        Ok(Self {
            client,
            base_url,
            api_key,
        })
    }
}

#[async_trait]
impl ScheduleSource for PagerDutySource {
    fn name(&self) -> &str {
        "pagerduty"
    }

    async fn fetch_schedule(&self, id: &ScheduleId, window: Period) -> Result<SourcedSchedule> {
        let url = format!("{}/schedules/{}", self.base_url, id);
        let since = window.start.to_rfc3339_opts(SecondsFormat::Secs, true);
        let until = window.end.to_rfc3339_opts(SecondsFormat::Secs, true);

        debug!(schedule_id = %id, %since, %until, "fetching PagerDuty schedule");

        let resp = self
            .client
            .get(&url)
            .header("authorization", format!("Token token={}", self.api_key))
            .header("accept", ACCEPT)
            .query(&[
                ("since", since.as_str()),
                ("until", until.as_str()),
                ("time_zone", "UTC"),
            ])
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() || e.is_timeout() {
                    SourceError::Unavailable(e.to_string())
                } else {
                    SourceError::Http(e)
                }
            })?;

        let status = resp.status().as_u16();
        if status == 404 {
            return Err(SourceError::NotFound { id: id.to_string() });
        }
        if !resp.status().is_success() {
            let text = resp.text().await.unwrap_or_default();
            warn!(status, schedule_id = %id, body = %text, "PagerDuty API error");
            return Err(SourceError::Api {
                status,
                message: text,
            });
        }

        let api_resp: ApiResponse = resp
            .json()
            .await
            .map_err(|e| SourceError::Parse(e.to_string()))?;

        Ok(parse_response(api_resp))
    }
}

#[derive(Deserialize)]
struct ApiResponse {
    schedule: ApiSchedule,
}

#[derive(Deserialize)]
struct ApiSchedule {
    id: String,
    name: Option<String>,
    summary: Option<String>,
    #[serde(default)]
    html_url: String,
    #[serde(default = "utc_name")]
    time_zone: String,
    final_schedule: Option<ApiLayer>,
}

#[derive(Deserialize)]
struct ApiLayer {
    #[serde(default)]
    rendered_schedule_entries: Vec<ApiEntry>,
}

#[derive(Deserialize)]
struct ApiEntry {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    user: ApiUser,
}

#[derive(Deserialize)]
struct ApiUser {
    id: String,
    summary: Option<String>,
}

fn utc_name() -> String {
    "UTC".to_string()
}

fn parse_response(resp: ApiResponse) -> SourcedSchedule {
    let s = resp.schedule;
    let display_name = s
        .name
        .or(s.summary)
        .unwrap_or_else(|| s.id.clone());
    let assignments = s
        .final_schedule
        .map(|layer| layer.rendered_schedule_entries)
        .unwrap_or_default()
        .into_iter()
        .map(|e| Assignment {
            person_display_name: e.user.summary.unwrap_or_else(|| e.user.id.clone()),
            person_id: e.user.id.into(),
            start: e.start,
            end: e.end,
        })
        .collect();

    SourcedSchedule {
        metadata: ScheduleMetadata {
            id: s.id.into(),
            display_name,
            external_url: s.html_url,
            timezone: s.time_zone,
        },
        assignments,
    }
}
