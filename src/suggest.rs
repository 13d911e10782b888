//! Keyword-based suggestions attached to tasks at creation.

/// Returned when no rule matches.
pub const FALLBACK_SUGGESTION: &str = "💡 Add more details for better suggestions";

/// Descriptions longer than this, in UTF-16 code units, get a subtask hint.
///
/// Matches the length the browser build measured, so an emoji counts twice.
pub const LONG_DESCRIPTION_UTF16_UNITS: usize = 50;

pub const MEETING_SUGGESTIONS: [&str; 2] = [
    "📅 Schedule follow-up reminder",
    "📝 Prepare agenda template",
];

pub const PROJECT_SUGGESTIONS: [&str; 2] = [
    "🎯 Break down into smaller tasks",
    "📊 Create progress tracker",
];

pub const EMAIL_SUGGESTIONS: [&str; 2] = [
    "📧 Draft response template",
    "⏰ Set follow-up reminder",
];

pub const LONG_DESCRIPTION_SUGGESTION: &str = "✂️ Consider breaking into subtasks";

const TITLE_RULES: [(&str, [&str; 2]); 3] = [
    ("meeting", MEETING_SUGGESTIONS),
    ("project", PROJECT_SUGGESTIONS),
    ("email", EMAIL_SUGGESTIONS),
];

/// Suggestions for a task with the given title and description.
///
/// Title rules match case-insensitively and are not exclusive; every
/// matching rule contributes in table order. Never returns an empty list.
pub fn generate(title: &str, description: &str) -> Vec<String> {
    let title = title.to_lowercase();
    let mut suggestions: Vec<String> = TITLE_RULES
        .iter()
        .filter(|(keyword, _)| title.contains(keyword))
        .flat_map(|(_, hints)| hints.iter().map(|hint| hint.to_string()))
        .collect();

    if description.encode_utf16().count() > LONG_DESCRIPTION_UTF16_UNITS {
        suggestions.push(LONG_DESCRIPTION_SUGGESTION.to_string());
    }

    if suggestions.is_empty() {
        suggestions.push(FALLBACK_SUGGESTION.to_string());
    }
    suggestions
}
