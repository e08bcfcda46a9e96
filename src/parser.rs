//! Extraction of the recipe name, ingredients and Mermaid flowchart from a
//! model reply.
//!
//! The model is asked to answer in the shape
//!
//! ~~~text
//! Recipe Name:
//! Pasta
//!
//! Ingredients:
//! - 1 lb pasta
//!
//! Steps:
//! ```mermaid
//! graph TD
//! A-->|10 minutes| B
//! ```
//! ~~~
//!
//! but nothing guarantees it does, so every fragment is optional.

use regex::Regex;
use serde::{Serialize, Serializer};
use std::sync::LazyLock;

/// Body returned when no usable fragment could be extracted.
pub const NO_RECIPE_FOUND: &str = "No recipe found.";

static MERMAID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```mermaid\n(.*?)\n```").unwrap());
static INGREDIENTS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)Ingredients:\n(.*?)\nSteps:").unwrap());
// `\s*` may run over the line break, so a name on the next line is picked up too.
static RECIPE_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Recipe Name:\s*(.*?)\n").unwrap());

/// Fragments recovered from a model reply
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedRecipe {
    pub recipe_name: Option<String>,
    /// `Ingredients:` block, suffixed with `Steps:` when a flowchart follows
    pub ingredients: Option<String>,
    /// Mermaid code with statement separators turned into line breaks
    pub flowchart: Option<String>,
}

/// JSON body sent back for a parsed reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecipeReply {
    /// Two or three fragments, in name/ingredients/steps order
    Fragments(Vec<String>),
    /// Exactly one fragment, sent unwrapped
    Fragment(String),
    NotFound,
}

/// Extract the recipe fragments from `reply`.
///
/// A recipe name on its own is discarded: without ingredients or a flowchart
/// the reply counts as "no recipe found".
pub fn parse_reply(reply: &str) -> ParsedRecipe {
    let ingredients = INGREDIENTS_RE
        .captures(reply)
        .map(|caps| caps[1].trim().to_string());
    let recipe_name = RECIPE_NAME_RE
        .captures(reply)
        .map(|caps| caps[1].trim().to_string());

    match MERMAID_RE.captures(reply) {
        Some(caps) => {
            let flowchart = normalize_flowchart(caps[1].trim());
            let steps = match ingredients {
                Some(ingredients) => format!("Ingredients:\n{}\n\nSteps:", ingredients),
                None => "Steps:".to_string(),
            };
            ParsedRecipe {
                recipe_name,
                ingredients: Some(steps),
                flowchart: Some(flowchart),
            }
        }
        None => match ingredients {
            Some(ingredients) => ParsedRecipe {
                recipe_name,
                ingredients: Some(format!("Ingredients:\n{}", ingredients)),
                flowchart: None,
            },
            None => ParsedRecipe::default(),
        },
    }
}

/// Turn `;` statement separators into line breaks, collapsing the blank
/// lines this produces.
pub fn normalize_flowchart(code: &str) -> String {
    code.replace(';', "\n").replace("\n\n", "\n")
}

impl ParsedRecipe {
    /// True when no fragment holds any text.
    pub fn is_empty(&self) -> bool {
        self.fragments().is_empty()
    }

    fn fragments(&self) -> Vec<&str> {
        [&self.recipe_name, &self.ingredients, &self.flowchart]
            .into_iter()
            .filter_map(|fragment| fragment.as_deref())
            .filter(|fragment| !fragment.is_empty())
            .collect()
    }

    /// Which fragments were recovered, used for logging.
    pub fn describe(&self) -> &'static str {
        let present =
            |fragment: &Option<String>| fragment.as_deref().is_some_and(|f| !f.is_empty());
        match (
            present(&self.recipe_name),
            present(&self.ingredients),
            present(&self.flowchart),
        ) {
            (true, true, true) => "Recipe Name, Ingredients and Steps found.",
            (true, true, false) => "Only Recipe Name and Ingredients found.",
            (true, false, true) => "Only Recipe Name and Steps found.",
            (false, true, true) => "Only Ingredients and Steps found.",
            (false, true, false) => "Only Ingredients found.",
            (false, false, true) => "Only steps found.",
            (true, false, false) => "Only Recipe Name found.",
            (false, false, false) => NO_RECIPE_FOUND,
        }
    }

    /// Shape the non-empty fragments into the response body.
    pub fn into_reply(self) -> RecipeReply {
        let mut fragments: Vec<String> =
            self.fragments().into_iter().map(String::from).collect();
        match fragments.len() {
            0 => RecipeReply::NotFound,
            1 => RecipeReply::Fragment(fragments.remove(0)),
            _ => RecipeReply::Fragments(fragments),
        }
    }
}

impl Serialize for RecipeReply {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            RecipeReply::Fragments(fragments) => fragments.serialize(serializer),
            RecipeReply::Fragment(fragment) => serializer.serialize_str(fragment),
            RecipeReply::NotFound => serializer.serialize_str(NO_RECIPE_FOUND),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const FULL_REPLY: &str = "Recipe Name: \nPasta\n\nIngredients:\n- 1 lb spaghetti\n- 4 quarts water\n\nSteps:\n```mermaid\ngraph TD;\nA[Boil water]-->|Temperature: 212°F for 10 minutes| B[Cook pasta];\n```\n";

    #[test]
    fn test_full_reply_yields_three_fragments() {
        let parsed = parse_reply(FULL_REPLY);
        assert_eq!(parsed.recipe_name.as_deref(), Some("Pasta"));
        assert_eq!(
            parsed.ingredients.as_deref(),
            Some("Ingredients:\n- 1 lb spaghetti\n- 4 quarts water\n\nSteps:")
        );
        assert_eq!(
            parsed.flowchart.as_deref(),
            Some("graph TD\nA[Boil water]-->|Temperature: 212°F for 10 minutes| B[Cook pasta]\n")
        );

        match parsed.into_reply() {
            RecipeReply::Fragments(fragments) => {
                assert_eq!(fragments.len(), 3);
                assert_eq!(fragments[0], "Pasta");
                assert!(fragments[1].ends_with("Steps:"));
                assert!(fragments[2].starts_with("graph TD"));
            }
            other => panic!("expected three fragments, got {:?}", other),
        }
    }

    #[test]
    fn test_name_on_same_line() {
        let reply = "Recipe Name: Omelette\nIngredients:\n- 2 eggs\nSteps:\n";
        let parsed = parse_reply(reply);
        assert_eq!(parsed.recipe_name.as_deref(), Some("Omelette"));
    }

    #[test]
    fn test_ingredients_without_flowchart_are_returned_alone() {
        let reply = "Ingredients:\n- 2 eggs\n- 1 tbsp butter\nSteps:\nWhisk and fry.";
        let parsed = parse_reply(reply);
        assert_eq!(parsed.recipe_name, None);
        assert_eq!(
            parsed.ingredients.as_deref(),
            Some("Ingredients:\n- 2 eggs\n- 1 tbsp butter")
        );
        assert_eq!(parsed.flowchart, None);
        assert_eq!(
            parsed.into_reply(),
            RecipeReply::Fragment("Ingredients:\n- 2 eggs\n- 1 tbsp butter".to_string())
        );
    }

    #[test]
    fn test_name_and_ingredients_without_flowchart() {
        let reply = "Recipe Name: Toast\nIngredients:\n- 1 slice bread\nSteps:\nToast it.";
        assert_eq!(
            parse_reply(reply).into_reply(),
            RecipeReply::Fragments(vec![
                "Toast".to_string(),
                "Ingredients:\n- 1 slice bread".to_string()
            ])
        );
    }

    #[test]
    fn test_flowchart_without_ingredients_uses_steps_placeholder() {
        let reply = "Recipe Name: Rice\n```mermaid\ngraph TD\nA-->|20 minutes| B\n```";
        let parsed = parse_reply(reply);
        assert_eq!(parsed.ingredients.as_deref(), Some("Steps:"));
        assert_eq!(
            parsed.into_reply(),
            RecipeReply::Fragments(vec![
                "Rice".to_string(),
                "Steps:".to_string(),
                "graph TD\nA-->|20 minutes| B".to_string()
            ])
        );
    }

    #[test]
    fn test_name_only_is_discarded() {
        let parsed = parse_reply("Recipe Name: Mystery Dish\nNo idea, sorry.");
        assert_eq!(parsed, ParsedRecipe::default());
        assert!(parsed.is_empty());
        assert_eq!(parsed.into_reply(), RecipeReply::NotFound);
    }

    #[test]
    fn test_ingredients_need_steps_terminator() {
        let parsed = parse_reply("Ingredients:\n- 1 cup rice\n- 2 cups water\n");
        assert_eq!(parsed.into_reply(), RecipeReply::NotFound);
    }

    #[test]
    fn test_unlabelled_code_fence_is_ignored() {
        let parsed = parse_reply("```\ngraph TD\nA-->B\n```");
        assert_eq!(parsed.flowchart, None);
    }

    #[test]
    fn test_empty_reply() {
        assert_eq!(parse_reply("").into_reply(), RecipeReply::NotFound);
    }

    #[test]
    fn test_normalize_flowchart_splits_statements() {
        assert_eq!(normalize_flowchart("A-->B;C-->D"), "A-->B\nC-->D");
        assert_eq!(normalize_flowchart("A-->B;\nC-->D"), "A-->B\nC-->D");
        assert_eq!(normalize_flowchart("A-->B"), "A-->B");
    }

    #[test]
    fn test_parse_is_pure() {
        assert_eq!(parse_reply(FULL_REPLY), parse_reply(FULL_REPLY));
    }

    #[test]
    fn test_empty_flowchart_is_dropped_from_reply() {
        let reply = "Recipe Name: Tea\nIngredients:\n- 1 bag tea\nSteps:\n```mermaid\n\n```";
        let parsed = parse_reply(reply);
        assert_eq!(parsed.flowchart.as_deref(), Some(""));
        assert_eq!(
            parsed.into_reply(),
            RecipeReply::Fragments(vec![
                "Tea".to_string(),
                "Ingredients:\n- 1 bag tea\n\nSteps:".to_string()
            ])
        );
    }

    #[test]
    fn test_describe_names_recovered_fragments() {
        assert_eq!(
            parse_reply(FULL_REPLY).describe(),
            "Recipe Name, Ingredients and Steps found."
        );
        assert_eq!(
            parse_reply("Recipe Name: Toast\nIngredients:\n- 1 slice bread\nSteps:\n").describe(),
            "Only Recipe Name and Ingredients found."
        );
        assert_eq!(
            parse_reply("Ingredients:\n- 2 eggs\nSteps:\n").describe(),
            "Only Ingredients found."
        );
        assert_eq!(
            parse_reply("Ingredients:\n- 1 bag tea\nSteps:\n```mermaid\n\n```").describe(),
            "Only Ingredients found."
        );
        assert_eq!(
            parse_reply("```mermaid\ngraph TD\nA-->B\n```").describe(),
            "Only Ingredients and Steps found."
        );
        assert_eq!(
            parse_reply("Recipe Name: Soup\nnothing else").describe(),
            "No recipe found."
        );
    }

    #[test]
    fn test_describe_flowchart_only() {
        let parsed = ParsedRecipe {
            flowchart: Some("graph TD".to_string()),
            ..ParsedRecipe::default()
        };
        assert_eq!(parsed.describe(), "Only steps found.");
    }

    #[test]
    fn test_reply_serialization() {
        assert_eq!(
            serde_json::to_value(RecipeReply::Fragments(vec!["a".into(), "b".into()])).unwrap(),
            json!(["a", "b"])
        );
        assert_eq!(
            serde_json::to_value(RecipeReply::Fragment("a".into())).unwrap(),
            json!("a")
        );
        assert_eq!(
            serde_json::to_value(RecipeReply::NotFound).unwrap(),
            json!("No recipe found.")
        );
    }
}
