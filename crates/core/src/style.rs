use serde::{Deserialize, Serialize};

/// Target prompt vocabulary requested from the model.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StyleProfile {
    #[default]
    Descriptive,
    Midjourney,
    Runway,
    StableDiffusion,
    #[serde(rename = "JSON")]
    JsonStructured,
}

impl StyleProfile {
    pub const ALL: [StyleProfile; 5] = [
        StyleProfile::Descriptive,
        StyleProfile::Midjourney,
        StyleProfile::Runway,
        StyleProfile::StableDiffusion,
        StyleProfile::JsonStructured,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            StyleProfile::Descriptive => "Descriptive",
            StyleProfile::Midjourney => "Midjourney",
            StyleProfile::Runway => "Runway",
            StyleProfile::StableDiffusion => "Stable Diffusion",
            StyleProfile::JsonStructured => "JSON",
        }
    }

    pub fn is_json(&self) -> bool {
        matches!(self, StyleProfile::JsonStructured)
    }

    /// Instruction block appended to every request for this style.
    pub fn template(&self) -> &'static str {
        match self {
            StyleProfile::Descriptive => {
                r#"**Target style:** General video description.
**Focus:** Balance between action, subject and atmosphere.
**Format:** Detailed, flowing narrative."#
            }
            StyleProfile::Midjourney => {
                r#"**Target style:** Midjourney v6.
**Focus:** Artistic composition, dramatic lighting, texture and camera parameters (--ar 16:9, --stylize).
**Format:** Comma-separated descriptive phrases. Use visual aesthetic keywords (e.g. "cinematic lighting", "photorealistic", "8k", "unreal engine 5 render").
**IMPORTANT:** Do not put timestamps inside the final prompt. Write one cohesive prompt per scene."#
            }
            StyleProfile::Runway => {
                r#"**Target style:** Runway Gen-3 Alpha / Kling.
**Focus:** PHYSICS and CAMERA MOVEMENT.
**Required:** ALWAYS describe the camera movement (e.g. "camera pans right", "slow zoom in", "drone tracking shot"). Describe the speed of motion and how objects physically interact.
**Format:** Narrative paragraph focused on change over time."#
            }
            StyleProfile::StableDiffusion => {
                r#"**Target style:** Stable Diffusion / PonyXL.
**Focus:** Tag-based description.
**Format:** (subject), (action), (environment), (lighting), (camera), (quality tags). Use Danbooru tagging.
Example: "1girl, running, cyberpunk city, neon lights, motion blur, masterpiece, best quality, 4k"."#
            }
            StyleProfile::JsonStructured => {
                r#"**Target style:** JSON structure.
**Focus:** Structured analysis for developers.
**Format:** STRICT JSON ARRAY.
Structure:
[
  {
    "scene_id": 1,
    "time_range": "00:00 - 00:08",
    "title": "Creative title",
    "visual_description": "...",
    "camera_movement": "...",
    "mood": "...",
    "subjects": ["..."]
  }
]"#
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serialized_names_are_stable() {
        let names: Vec<String> = StyleProfile::ALL
            .iter()
            .map(|s| serde_json::to_string(s).unwrap())
            .collect();
        assert_eq!(
            names,
            [
                "\"DESCRIPTIVE\"",
                "\"MIDJOURNEY\"",
                "\"RUNWAY\"",
                "\"STABLE_DIFFUSION\"",
                "\"JSON\""
            ]
        );
    }

    #[test]
    fn only_json_style_is_json() {
        let json: Vec<_> = StyleProfile::ALL.iter().filter(|s| s.is_json()).collect();
        assert_eq!(json, [&StyleProfile::JsonStructured]);
    }
}
