use crate::style::StyleProfile;

pub const DEFAULT_LANGUAGE: &str = "English";

static AUDIO_INCLUDED: &str = "**AUDIO:** Analyze sound, music mood and dialogue.";
static AUDIO_EXCLUDED: &str = "**VISUAL:** Focus on visuals only.";

static JSON_OUTPUT: &str =
    "**Output format:** Return ONLY valid JSON, nothing else. Keys in English, values in the output language.";

static MARKDOWN_OUTPUT: &str = r#"**Output format:** Markdown. Start every scene with a heading on its own line, exactly:
### Scene <number> (<start> - <end>) - <title>
followed by the scene prompt.
At the very end add one "Builder" block:
```json
{"breakdown": {"subject": "...", "action": "...", "environment": "...", "lighting": "...", "camera": "..."}}
```"#;

/// Compose the instruction text sent alongside the video.
pub fn compose_instructions(style: StyleProfile, include_audio: bool, language: &str) -> String {
    let audio = if include_audio {
        AUDIO_INCLUDED
    } else {
        AUDIO_EXCLUDED
    };
    let output_format = if style.is_json() {
        JSON_OUTPUT
    } else {
        MARKDOWN_OUTPUT
    };

    format!(
        r#"Role: Film director & AI engineer.
Task: Reverse-engineer this video into an AI generation prompt.
Language: {language}.

{style}

{audio}

{output_format}

Analyze the video in detail, one segment per 8 seconds."#,
        language = language,
        style = style.template(),
        audio = audio,
        output_format = output_format,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_style_asks_for_json_only() {
        let text = compose_instructions(StyleProfile::JsonStructured, false, DEFAULT_LANGUAGE);
        assert!(text.contains("Return ONLY valid JSON"));
        assert!(!text.contains("### Scene"));
        assert!(text.contains("STRICT JSON ARRAY"));
    }

    #[test]
    fn markdown_styles_request_headings_and_builder_block() {
        let text = compose_instructions(StyleProfile::Runway, false, DEFAULT_LANGUAGE);
        assert!(text.contains("### Scene <number>"));
        assert!(text.contains("\"breakdown\""));
        assert!(text.contains("CAMERA MOVEMENT"));
    }

    #[test]
    fn audio_clause_follows_flag() {
        let with_audio = compose_instructions(StyleProfile::Descriptive, true, "Indonesian");
        let without = compose_instructions(StyleProfile::Descriptive, false, "Indonesian");

        assert!(with_audio.contains(AUDIO_INCLUDED));
        assert!(!with_audio.contains(AUDIO_EXCLUDED));
        assert!(without.contains(AUDIO_EXCLUDED));
        assert!(with_audio.contains("Language: Indonesian."));
    }
}
