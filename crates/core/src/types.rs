use serde::{Deserialize, Serialize};

use crate::style::StyleProfile;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Breakdown {
    pub subject: String,
    pub action: String,
    pub environment: String,
    pub lighting: String,
    pub camera: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakdownField {
    Subject,
    Action,
    Environment,
    Lighting,
    Camera,
}

impl BreakdownField {
    pub const ORDER: [BreakdownField; 5] = [
        BreakdownField::Subject,
        BreakdownField::Action,
        BreakdownField::Environment,
        BreakdownField::Lighting,
        BreakdownField::Camera,
    ];

    /// Key inside the model's `breakdown` object.
    pub fn key(&self) -> &'static str {
        match self {
            BreakdownField::Subject => "subject",
            BreakdownField::Action => "action",
            BreakdownField::Environment => "environment",
            BreakdownField::Lighting => "lighting",
            BreakdownField::Camera => "camera",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BreakdownField::Subject => "Subject",
            BreakdownField::Action => "Action",
            BreakdownField::Environment => "Environment",
            BreakdownField::Lighting => "Lighting",
            BreakdownField::Camera => "Camera",
        }
    }
}

impl Breakdown {
    pub fn get(&self, field: BreakdownField) -> &str {
        match field {
            BreakdownField::Subject => &self.subject,
            BreakdownField::Action => &self.action,
            BreakdownField::Environment => &self.environment,
            BreakdownField::Lighting => &self.lighting,
            BreakdownField::Camera => &self.camera,
        }
    }

    pub fn set(&mut self, field: BreakdownField, value: String) {
        let slot = match field {
            BreakdownField::Subject => &mut self.subject,
            BreakdownField::Action => &mut self.action,
            BreakdownField::Environment => &mut self.environment,
            BreakdownField::Lighting => &mut self.lighting,
            BreakdownField::Camera => &mut self.camera,
        };
        *slot = value;
    }

    /// Join the non-empty fields with ", " in fixed field order.
    pub fn compose(&self) -> String {
        BreakdownField::ORDER
            .iter()
            .map(|f| self.get(*f))
            .filter(|v| !v.trim().is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineEntry {
    pub id: u32,
    pub time: String,
    pub title: String,
    pub content: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresentationMode {
    Timeline,
    Builder,
    Raw,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParsedResult {
    pub breakdown: Option<Breakdown>,
    pub final_prompt: String,
    pub timeline: Option<Vec<TimelineEntry>>,
}

impl ParsedResult {
    pub fn presentation_mode(&self) -> PresentationMode {
        if self.timeline.as_ref().is_some_and(|t| !t.is_empty()) {
            PresentationMode::Timeline
        } else if self.breakdown.is_some() {
            PresentationMode::Builder
        } else {
            PresentationMode::Raw
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryItem {
    pub id: String,
    /// Milliseconds since the Unix epoch.
    pub timestamp: u64,
    pub video_name: String,
    pub prompt: String,
    pub style: StyleProfile,
}
