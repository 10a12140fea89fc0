//! Turns free-form model output into a [`ParsedResult`].
//!
//! Interpretations are tried in order, the first one that recognizes the
//! text wins:
//! 1. the whole text is a JSON array of scenes,
//! 2. Markdown scene headings and/or a fenced `{"breakdown": ...}` block,
//! 3. plain text.
//!
//! Parsing never fails; unknown shapes degrade to the plain text view.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::types::{Breakdown, BreakdownField, ParsedResult, TimelineEntry};

static FENCED_OBJECT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```(?:json)?\s*(\{.*?\})\s*```").expect("fenced object regex is valid")
});

static SCENE_HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"###[ \t]*(?i:scene)[ \t]*(\d+)[ \t]*\(([^)\n]+)\)[ \t]*(?:-[ \t]*([^\n]*?))?[ \t]*\r?\n",
    )
    .expect("scene heading regex is valid")
});

static SCENE_BOUNDARY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"###[ \t]*(?i:scene)").expect("scene boundary regex is valid"));

const SCENE_SPACING_SECS: usize = 8;

type Strategy = fn(&str) -> Option<ParsedResult>;

const STRATEGIES: [Strategy; 2] = [parse_scene_array, parse_markdown_sections];

pub fn parse(raw: &str) -> ParsedResult {
    STRATEGIES
        .iter()
        .find_map(|strategy| strategy(raw))
        .unwrap_or_else(|| ParsedResult {
            breakdown: None,
            final_prompt: raw.trim().to_string(),
            timeline: None,
        })
}

fn parse_scene_array(raw: &str) -> Option<ParsedResult> {
    let trimmed = raw.trim();
    let scenes = std::iter::once(trimmed)
        .chain(strip_outer_fence(trimmed))
        .find_map(|candidate| match serde_json::from_str::<Value>(candidate) {
            Ok(Value::Array(items)) => Some(items),
            _ => None,
        })?;

    let timeline = scenes
        .iter()
        .enumerate()
        .map(|(index, scene)| TimelineEntry {
            id: index as u32 + 1,
            time: text_field(scene, "time_range")
                .unwrap_or_else(|| format!("00:{:02}", index * SCENE_SPACING_SECS)),
            title: text_field(scene, "title").unwrap_or_else(|| format!("Scene {}", index + 1)),
            content: text_field(scene, "visual_description")
                .or_else(|| text_field(scene, "description"))
                .unwrap_or_else(|| scene.to_string()),
        })
        .collect();

    Some(ParsedResult {
        breakdown: None,
        final_prompt: serde_json::to_string_pretty(&Value::Array(scenes)).ok()?,
        timeline: Some(timeline),
    })
}

fn parse_markdown_sections(raw: &str) -> Option<ParsedResult> {
    let block = FENCED_OBJECT.captures(raw);
    let breakdown = block
        .as_ref()
        .and_then(|caps| caps.get(1))
        .and_then(|object| extract_breakdown(object.as_str()));
    let timeline = parse_scene_headings(raw);

    // A fenced object is always cut from the prompt, even when it carries no breakdown.
    if block.is_none() && timeline.is_empty() {
        return None;
    }

    let final_prompt = match block.as_ref().and_then(|caps| caps.get(0)) {
        Some(whole) => format!("{}{}", &raw[..whole.start()], &raw[whole.end()..]),
        None => raw.to_string(),
    };

    Some(ParsedResult {
        breakdown,
        final_prompt: final_prompt.trim().to_string(),
        timeline: (!timeline.is_empty()).then_some(timeline),
    })
}

fn extract_breakdown(object: &str) -> Option<Breakdown> {
    let value: Value = match serde_json::from_str(object) {
        Ok(value) => value,
        Err(e) => {
            tracing::debug!(error = %e, "ignoring unparseable builder block");
            return None;
        }
    };
    let fields = value.get("breakdown").filter(|b| !b.is_null())?;

    // Null, array or object fields read as empty instead of dropping the block.
    let mut breakdown = Breakdown::default();
    for field in BreakdownField::ORDER {
        if let Some(text) = text_field(fields, field.key()) {
            breakdown.set(field, text);
        }
    }
    Some(breakdown)
}

fn parse_scene_headings(raw: &str) -> Vec<TimelineEntry> {
    let mut entries: Vec<TimelineEntry> = Vec::new();
    let mut cursor = 0;

    while let Some(caps) = SCENE_HEADING.captures_at(raw, cursor) {
        let Some(heading) = caps.get(0) else { break };
        let body_end = next_boundary(raw, heading.end());
        let id = entries.len() as u32 + 1;

        let number = &caps[1];
        let number = number
            .parse::<u32>()
            .map_or_else(|_| number.to_string(), |n| n.to_string());
        if number != id.to_string() {
            tracing::debug!(heading = %number, position = id, "scene numbering out of sequence");
        }

        let title = caps
            .get(3)
            .map(|t| t.as_str().trim())
            .filter(|t| !t.is_empty())
            .map_or_else(|| format!("Scene {}", number), str::to_string);

        entries.push(TimelineEntry {
            id,
            time: caps[2].trim().to_string(),
            title,
            content: raw[heading.end()..body_end].trim().to_string(),
        });
        cursor = body_end;
    }

    entries
}

/// Scene text runs until the next scene heading, a code fence, or the end.
fn next_boundary(raw: &str, from: usize) -> usize {
    let heading = SCENE_BOUNDARY.find_at(raw, from).map(|m| m.start());
    let fence = raw[from..].find("```").map(|offset| from + offset);
    [heading, fence]
        .into_iter()
        .flatten()
        .min()
        .unwrap_or(raw.len())
}

fn strip_outer_fence(text: &str) -> Option<&str> {
    let inner = text.strip_prefix("```")?.strip_suffix("```")?;
    let (_language, body) = inner.split_once('\n')?;
    Some(body.trim())
}

fn text_field(scene: &Value, key: &str) -> Option<String> {
    match scene.get(key)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PresentationMode;

    #[test]
    fn json_array_becomes_timeline() {
        let raw = r#"[{"time_range":"00:00-00:08","title":"Intro","visual_description":"A car drives by"}]"#;
        let result = parse(raw);

        assert_eq!(
            result.timeline,
            Some(vec![TimelineEntry {
                id: 1,
                time: "00:00-00:08".into(),
                title: "Intro".into(),
                content: "A car drives by".into(),
            }])
        );
        assert!(result.breakdown.is_none());
        assert!(result.final_prompt.starts_with("[\n  {\n    \"time_range\""));
        assert_eq!(result.presentation_mode(), PresentationMode::Timeline);
    }

    #[test]
    fn json_array_fills_defaults() {
        let raw = r#"[{"description":"fallback text"},{"mood":"calm"},"bare"]"#;
        let timeline = parse(raw).timeline.unwrap();

        assert_eq!(timeline[0].time, "00:00");
        assert_eq!(timeline[0].title, "Scene 1");
        assert_eq!(timeline[0].content, "fallback text");
        assert_eq!(timeline[1].time, "00:08");
        assert_eq!(timeline[1].content, r#"{"mood":"calm"}"#);
        assert_eq!(timeline[2].id, 3);
        assert_eq!(timeline[2].time, "00:16");
        assert_eq!(timeline[2].content, "\"bare\"");
    }

    #[test]
    fn fenced_json_array_is_accepted() {
        let raw = "```json\n[{\"title\":\"Only\",\"visual_description\":\"x\"}]\n```";
        let result = parse(raw);
        assert_eq!(result.timeline.unwrap()[0].title, "Only");
    }

    #[test]
    fn scene_headings_become_timeline() {
        let raw = "### Scene 1 (00:00-00:08) - Opening\nA quiet street.\n### Scene 2 (00:08-00:16)\nA car appears.";
        let timeline = parse(raw).timeline.unwrap();

        assert_eq!(timeline.len(), 2);
        assert_eq!(timeline[0].id, 1);
        assert_eq!(timeline[0].time, "00:00-00:08");
        assert_eq!(timeline[0].title, "Opening");
        assert_eq!(timeline[0].content, "A quiet street.");
        assert_eq!(timeline[1].id, 2);
        assert_eq!(timeline[1].title, "Scene 2");
        assert_eq!(timeline[1].content, "A car appears.");
    }

    #[test]
    fn builder_block_is_extracted_and_removed() {
        let raw = r#"### Scene 1 (00:00 - 00:08) - Rooftop
Neon rain over the city.

```json
{"breakdown": {"subject": "A runner", "action": "sprinting", "environment": "rooftop", "lighting": "neon"}}
```"#;
        let result = parse(raw);

        let breakdown = result.breakdown.clone().unwrap();
        assert_eq!(breakdown.subject, "A runner");
        assert_eq!(breakdown.camera, "");
        assert_eq!(result.timeline.as_ref().unwrap()[0].content, "Neon rain over the city.");
        assert_eq!(
            result.final_prompt,
            "### Scene 1 (00:00 - 00:08) - Rooftop\nNeon rain over the city."
        );
        assert_eq!(result.presentation_mode(), PresentationMode::Timeline);
    }

    #[test]
    fn breakdown_without_scenes_selects_builder() {
        let raw = "A moody alley.\n```json\n{\"breakdown\": {\"subject\": \"cat\"}}\n```\n";
        let result = parse(raw);

        assert!(result.timeline.is_none());
        assert_eq!(result.final_prompt, "A moody alley.");
        assert_eq!(result.presentation_mode(), PresentationMode::Builder);
    }

    #[test]
    fn plain_text_falls_back_to_raw() {
        let raw = "  Just a sunset over the sea.\n";
        let result = parse(raw);

        assert_eq!(result.timeline, None);
        assert_eq!(result.breakdown, None);
        assert_eq!(result.final_prompt, "Just a sunset over the sea.");
        assert_eq!(result.presentation_mode(), PresentationMode::Raw);
    }

    #[test]
    fn broken_block_degrades_without_error() {
        let raw = "Text\n```json\n{\"breakdown\": {\"subject\": }\n```";
        let result = parse(raw);
        assert_eq!(result.presentation_mode(), PresentationMode::Raw);
        assert_eq!(result.breakdown, None);
        assert_eq!(result.final_prompt, "Text");
    }

    #[test]
    fn null_and_non_string_fields_read_as_empty() {
        let raw = "A moody alley.\n```json\n{\"breakdown\": {\"subject\": \"cat\", \"action\": [\"x\"], \"camera\": null}}\n```";
        let result = parse(raw);

        let breakdown = result.breakdown.clone().unwrap();
        assert_eq!(breakdown.subject, "cat");
        assert_eq!(breakdown.action, "");
        assert_eq!(breakdown.camera, "");
        assert_eq!(breakdown.compose(), "cat");
        assert_eq!(result.final_prompt, "A moody alley.");
        assert_eq!(result.presentation_mode(), PresentationMode::Builder);
    }

    #[test]
    fn fenced_object_without_breakdown_is_removed() {
        let raw = "A moody alley.\n```json\n{\"note\": \"x\"}\n```";
        let result = parse(raw);

        assert_eq!(result.breakdown, None);
        assert_eq!(result.timeline, None);
        assert_eq!(result.final_prompt, "A moody alley.");
        assert_eq!(result.presentation_mode(), PresentationMode::Raw);
    }

    #[test]
    fn ids_follow_scene_order() {
        let raw = "### Scene 1 (00:00)\na\n### Scene 3 (00:16)\nb\n";
        let timeline = parse(raw).timeline.unwrap();
        assert_eq!(timeline.iter().map(|e| e.id).collect::<Vec<_>>(), [1, 2]);
        assert_eq!(timeline[1].title, "Scene 3");
    }

    #[test]
    fn parse_is_pure() {
        let raw = "### Scene 1 (00:00-00:08) - A\nx\n```json\n{\"breakdown\":{\"subject\":\"s\"}}\n```";
        assert_eq!(parse(raw), parse(raw));
    }
}
