/// Instruction template sent to the model.
///
/// Loaded from `prompt.txt` at compile time. Contains a `{{CONTENT}}`
/// placeholder that `build_prompt` replaces with the gathered recipe input.
pub const RECIPE_FLOWCHART_PROMPT: &str = include_str!("prompt.txt");

/// Assemble the full prompt from optional user text and optional scraped page text.
///
/// The website section comes first, then the user section, each followed by a
/// blank line, and the result is injected into the instruction template.
pub fn build_prompt(user_input: Option<&str>, website_content: Option<&str>) -> String {
    let mut content = String::new();

    if let Some(website) = website_content {
        content.push_str(&format!("Website Content: {}\n\n", website));
    }

    if let Some(input) = user_input {
        content.push_str(&format!("User Input: {}\n\n", input));
    }

    RECIPE_FLOWCHART_PROMPT.replace("{{CONTENT}}", &content)
}
