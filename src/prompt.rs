//! Prompt construction for the schedule generator.

use crate::duration::parse_duration_days;
use crate::granularity::select_granularity;
use crate::models::ScheduleRequest;

/// How the generator should lay out the schedule entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// One JSON array holding every entry.
    JsonArray,
    /// One JSON object per line, no enclosing array.
    Ndjson,
}

/// Build the full instruction block sent to the generator.
pub fn build_prompt(request: &ScheduleRequest, format: OutputFormat) -> String {
    let granularity = select_granularity(parse_duration_days(&request.total_duration));

    let output_rules = match format {
        OutputFormat::JsonArray => {
            "Your output MUST be a valid JSON array of objects. Do not include any text, explanations, \
             or markdown formatting (like ```json) before or after the JSON array."
        }
        OutputFormat::Ndjson => {
            "Your output MUST be a sequence of JSON objects, one complete object per line, separated by \
             newlines. Do NOT wrap the objects in a JSON array. Do not include any text, explanations, \
             or markdown formatting (like ```json) before, between, or after the objects."
        }
    };

    let entry_noun = match format {
        OutputFormat::JsonArray => "object in the array",
        OutputFormat::Ndjson => "line",
    };

    format!(
        r#"
You are an expert learning planner. Your task is to create a detailed, structured study schedule based on the user's request.

The user wants to learn: "{topic}"
They want to complete it in: "{duration}"
They will study for: "{commitment}" per day.

{instruction}

Break down the main topic into logical, sequential sub-topics. For each entry, provide 3-5 specific, actionable to-do list items and one practical, hands-on exercise.

{output_rules}

The JSON structure for each {entry_noun} must be:
{{
  "day": {placeholder},
  "topic_of_the_day": "<string>",
  "tasks": ["<string>", "<string>", ...],
  "exercise": "<string>"
}}

For example, the "day" field of the first entry is: {example}
"#,
        topic = request.topic,
        duration = request.total_duration,
        commitment = request.daily_commitment,
        instruction = granularity.instruction,
        placeholder = granularity.field_shape.placeholder(),
        example = granularity.example_json(),
    )
}

/// Strip whitespace and markdown code fences from a complete generator reply.
pub fn clean_json_response(text: &str) -> String {
    text.trim().replace("```json", "").replace("```", "").trim().to_string()
}
