//! Chat assistant backed by the Gemini generative language API
//!
//! The assistant never fails a request: missing configuration and upstream
//! errors both turn into a friendly canned reply.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::models::Student;
use crate::services::risk_engine::RiskAssessment;

pub const NOT_CONFIGURED_REPLY: &str =
    "I'm sorry, my connection to the AI service is not configured.";
pub const UPSTREAM_FAILURE_REPLY: &str =
    "I'm having a little trouble thinking right now. Can we try again later?";

/// Marker the client turns into a "schedule focus block" button
pub const FOCUS_BLOCK_ACTION: &str = "<Action:FocusBlock>";

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

/// Thin HTTP client for `models/{model}:generateContent`
#[derive(Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl GeminiClient {
    pub fn new(base_url: String, model: String, api_key: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
            api_key,
        }
    }

    /// Send a single-turn prompt and return the first candidate's text
    pub async fn generate(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        };

        let response: GenerateContentResponse = self
            .http
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .context("Failed to reach generative language API")?
            .error_for_status()
            .context("Generative language API returned an error status")?
            .json()
            .await
            .context("Failed to decode generateContent response")?;

        response
            .candidates
            .into_iter()
            .filter_map(|c| c.content)
            .flat_map(|c| c.parts)
            .find_map(|p| p.text)
            .context("generateContent response had no text candidate")
    }
}

/// Student-facing assistant ("Sathi")
#[derive(Clone)]
pub struct AssistantService {
    client: Option<GeminiClient>,
}

impl AssistantService {
    pub fn new(client: Option<GeminiClient>) -> Self {
        if client.is_none() {
            tracing::warn!("GEMINI_API_KEY not set, chat assistant replies are disabled");
        }
        Self { client }
    }

    pub fn is_configured(&self) -> bool {
        self.client.is_some()
    }

    /// Reply to a student message using the given context summary
    pub async fn reply(&self, message: &str, context: Option<&str>) -> String {
        let Some(client) = &self.client else {
            return NOT_CONFIGURED_REPLY.to_string();
        };

        let prompt = build_prompt(message, context);

        match client.generate(&prompt).await {
            Ok(text) => text,
            Err(e) => {
                tracing::error!(error = %format!("{:#}", e), "Gemini API error");
                UPSTREAM_FAILURE_REPLY.to_string()
            }
        }
    }
}

/// Persona prompt wrapping the student context and message
pub fn build_prompt(message: &str, context: Option<&str>) -> String {
    format!(
        "You are Sathi, a supportive, motivational, and analytical friend to a student.\n\
         Your goal is to help them succeed academically and mentally, preventing burnout.\n\
         \n\
         CONTEXT DATA ABOUT THE STUDENT:\n\
         {context}\n\
         \n\
         USER MESSAGE:\n\
         {message}\n\
         \n\
         INSTRUCTIONS:\n\
         - Be friendly and empathetic.\n\
         - Use the context data to give specific advice (e.g., if grades are low, ask about study habits; if risk is high, suggest a break).\n\
         - Keep responses concise (under 3 sentences usually) unless a deep explanation is asked for.\n\
         - Don't sound like a generic robot, sound like a caring peer.\n\
         - If the user seems overwhelmed or asks for help focusing, suggest scheduling a \"Focus Block\".\n\
         - IMPORTANT: If you suggest a Focus Block, append the string \"{action}\" to the end of your message.\n",
        context = context.unwrap_or("No specific data available."),
        message = message,
        action = FOCUS_BLOCK_ACTION,
    )
}

/// Free-text summary of a student fed to the assistant
pub fn student_context(student: &Student, assessment: &RiskAssessment) -> String {
    let last_activity = student
        .last_activity()
        .map(|d| d.to_string())
        .unwrap_or_else(|| "Unknown".to_string());

    format!(
        "Name: {}\n\
         ID: {}\n\
         Current Average Grade: {}%\n\
         Engagement Score: {}/100\n\
         Risk Level: {} ({}/100)\n\
         Risk Factors: {}\n\
         Last Activity: {}",
        student.name,
        student.student_id,
        student.average_grade(),
        assessment.insights.engagement_score,
        assessment.profile.risk_level.as_str(),
        assessment.profile.risk_score,
        assessment.profile.red_flags.join(", "),
        last_activity,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::risk_engine::RiskEngine;

    fn empty_student() -> Student {
        Student {
            student_id: "STD2506".to_string(),
            name: "Priyanshu Bakshi".to_string(),
            email: "bakshi@gmail.com".to_string(),
            activity_logs: vec![],
            assignments: vec![],
            grades: vec![],
        }
    }

    #[tokio::test]
    async fn test_unconfigured_assistant_replies_with_notice() {
        let assistant = AssistantService::new(None);
        assert!(!assistant.is_configured());
        assert_eq!(assistant.reply("hi", None).await, NOT_CONFIGURED_REPLY);
    }

    #[test]
    fn test_prompt_includes_context_and_message() {
        let prompt = build_prompt("I feel tired", Some("Name: Riya Shah"));
        assert!(prompt.contains("You are Sathi"));
        assert!(prompt.contains("Name: Riya Shah"));
        assert!(prompt.contains("I feel tired"));
        assert!(prompt.contains(FOCUS_BLOCK_ACTION));

        let prompt = build_prompt("hello", None);
        assert!(prompt.contains("No specific data available."));
    }

    #[test]
    fn test_context_for_student_without_history() {
        let student = empty_student();
        let assessment = RiskEngine::new().assess(&student).unwrap();
        let context = student_context(&student, &assessment);

        assert!(context.contains("Name: Priyanshu Bakshi"));
        assert!(context.contains("Current Average Grade: 0%"));
        assert!(context.contains("Risk Level: LOW (0/100)"));
        assert!(context.contains("Last Activity: Unknown"));
    }

    #[test]
    fn test_response_text_extraction_shape() {
        let raw = r#"{"candidates":[{"content":{"parts":[{"text":"Take a short break!"}],"role":"model"}}]}"#;
        let parsed: GenerateContentResponse = serde_json::from_str(raw).unwrap();
        let text = parsed
            .candidates
            .into_iter()
            .filter_map(|c| c.content)
            .flat_map(|c| c.parts)
            .find_map(|p| p.text);
        assert_eq!(text.as_deref(), Some("Take a short break!"));
    }
}
