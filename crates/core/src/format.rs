use chrono::DateTime;

use crate::{
    editor::ResultView,
    types::{BreakdownField, HistoryItem, PresentationMode},
};

/// Format milliseconds since the epoch as `YYYY-MM-DD HH:MM` (UTC)
pub fn format_timestamp(millis: u64) -> String {
    i64::try_from(millis)
        .ok()
        .and_then(DateTime::from_timestamp_millis)
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "unknown time".to_string())
}

/// Render the active view of a result as human-readable text
pub fn format_result_readable(view: &ResultView) -> String {
    let mut output = String::new();

    match view.mode() {
        PresentationMode::Timeline => {
            let timeline = view.parsed().timeline.as_deref().unwrap_or_default();
            if timeline.is_empty() {
                output.push_str("Timeline view unavailable for this format.\n");
            }
            for entry in timeline {
                output.push_str(&format!("### {}. {} [{}]\n\n", entry.id, entry.title, entry.time));
                output.push_str(&format!("{}\n\n", entry.content));
            }
        }
        PresentationMode::Builder => match view.breakdown() {
            Some(breakdown) => {
                for field in BreakdownField::ORDER {
                    output.push_str(&format!("{:<12} {}\n", field.label(), breakdown.get(field)));
                }
                output.push_str("\n## Prompt\n\n");
                output.push_str(view.final_prompt());
                output.push('\n');
            }
            None => output.push_str("Builder view unavailable for this format.\n"),
        },
        PresentationMode::Raw => {
            output.push_str(view.raw().trim());
            output.push('\n');
        }
    }

    output
}

pub fn format_history(items: &[HistoryItem]) -> String {
    if items.is_empty() {
        return "History is empty.\n".to_string();
    }

    let mut output = String::new();
    for item in items {
        let preview: String = item.prompt.chars().take(60).collect();
        let preview = preview.replace('\n', " ");
        output.push_str(&format!(
            "{}  {}  {:<16} {}\n    {}\n",
            item.id,
            format_timestamp(item.timestamp),
            item.style.name(),
            item.video_name,
            preview
        ));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::StyleProfile;

    #[test]
    fn timestamp_is_utc_calendar_time() {
        assert_eq!(format_timestamp(0), "1970-01-01 00:00");
        assert_eq!(format_timestamp(1_709_210_096_000), "2024-02-29 12:34");
    }

    #[test]
    fn timeline_view_lists_scenes() {
        let view = ResultView::new("### Scene 1 (00:00-00:08) - Opening\nA quiet street.\n");
        let text = format_result_readable(&view);
        assert!(text.starts_with("### 1. Opening [00:00-00:08]\n\nA quiet street."));
    }

    #[test]
    fn builder_view_without_breakdown_says_so() {
        let mut view = ResultView::new("plain");
        view.set_mode(PresentationMode::Builder);
        assert_eq!(
            format_result_readable(&view),
            "Builder view unavailable for this format.\n"
        );
    }

    #[test]
    fn history_lists_entries() {
        let item = HistoryItem {
            id: "abc".into(),
            timestamp: 0,
            video_name: "clip.mp4".into(),
            prompt: "line one\nline two".into(),
            style: StyleProfile::Midjourney,
        };
        let text = format_history(&[item]);
        assert!(text.contains("abc  1970-01-01 00:00  Midjourney"));
        assert!(text.contains("line one line two"));
        assert_eq!(format_history(&[]), "History is empty.\n");
    }
}
