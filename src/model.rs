use serde::Deserialize;

/// Body of `POST /api/gemini`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeRequest {
    pub user_input: Option<String>,
    pub website_url: Option<String>,
}

impl RecipeRequest {
    /// Free-text recipe input, if a non-empty one was sent
    pub fn user_input(&self) -> Option<&str> {
        self.user_input.as_deref().filter(|s| !s.is_empty())
    }

    /// Page to scrape, if a non-empty URL was sent
    pub fn website_url(&self) -> Option<&str> {
        self.website_url.as_deref().filter(|s| !s.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.user_input().is_none() && self.website_url().is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_camel_case_fields() {
        let request: RecipeRequest = serde_json::from_str(
            r#"{"userInput": "Boil pasta", "websiteUrl": "https://example.com/pasta"}"#,
        )
        .unwrap();
        assert_eq!(request.user_input(), Some("Boil pasta"));
        assert_eq!(request.website_url(), Some("https://example.com/pasta"));
        assert!(!request.is_empty());
    }

    #[test]
    fn test_missing_and_empty_fields_count_as_absent() {
        let request: RecipeRequest = serde_json::from_str("{}").unwrap();
        assert!(request.is_empty());

        let request: RecipeRequest =
            serde_json::from_str(r#"{"userInput": "", "websiteUrl": null}"#).unwrap();
        assert!(request.is_empty());
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let request: RecipeRequest =
            serde_json::from_str(r#"{"userInput": "Toast", "servings": 2}"#).unwrap();
        assert_eq!(request.user_input(), Some("Toast"));
        assert_eq!(request.website_url(), None);
    }
}
