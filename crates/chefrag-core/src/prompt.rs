//! Grounding prompt construction

use crate::retrieval::RetrievalMatch;

/// Render one match as `key: value` lines, skipping empty values
pub fn format_dish_info(dish: &RetrievalMatch) -> String {
    dish.metadata
        .iter()
        .filter(|(_, value)| value.is_present())
        .map(|(key, value)| format!("{}: {}", key, value))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Build the prompt that asks the model to answer `question` from `matches` only.
///
/// Output depends on nothing but the arguments, so identical inputs give
/// byte-identical prompts.
pub fn build_grounding_prompt(question: &str, matches: &[RetrievalMatch]) -> String {
    let dish_info = matches
        .iter()
        .map(format_dish_info)
        .collect::<Vec<_>>()
        .join("\n\n");

    format!(
        r#"Based on the following information about a dish, please answer the question: {}
Use only the dish information below. If it does not contain the answer, say that you don't know.

Dish information:
{}

Answer:"#,
        question, dish_info
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::retrieval::MetadataValue;
    use crate::testing::dish;

    #[test]
    fn test_prompt_contains_metadata_and_question() {
        let matches = vec![dish("d1", 0.81, &[("ingredients", "cumin, paprika")])];
        let prompt = build_grounding_prompt("What spices are in dish X?", &matches);

        assert!(prompt.contains("ingredients: cumin, paprika"));
        assert!(prompt.contains("What spices are in dish X?"));
        assert!(prompt.trim_end().ends_with("Answer:"));
    }

    #[test]
    fn test_prompt_is_deterministic() {
        let matches = vec![
            dish("d1", 0.9, &[("name", "Doro Wat"), ("cuisine", "Ethiopian")]),
            dish("d2", 0.5, &[("name", "Misir Wat"), ("diet", "vegan")]),
        ];
        let first = build_grounding_prompt("Which stew is vegan?", &matches);
        let second = build_grounding_prompt("Which stew is vegan?", &matches.clone());
        assert_eq!(first.as_bytes(), second.as_bytes());
    }

    #[test]
    fn test_empty_values_are_skipped() {
        let mut d = dish("d1", 0.9, &[("name", "Injera"), ("notes", "")]);
        d.metadata.insert("calories".into(), MetadataValue::Number(0.into()));
        d.metadata.insert("origin".into(), MetadataValue::Null);
        d.metadata.insert("gluten_free".into(), MetadataValue::Bool(false));
        d.metadata.insert("tags".into(), MetadataValue::List(vec![]));

        let rendered = format_dish_info(&d);
        assert_eq!(rendered, "name: Injera");
    }

    #[test]
    fn test_matches_separated_by_blank_line() {
        let matches = vec![
            dish("d1", 0.9, &[("name", "Tibs"), ("protein", "beef")]),
            dish("d2", 0.8, &[("name", "Kitfo")]),
        ];
        let prompt = build_grounding_prompt("q", &matches);
        assert!(prompt.contains("name: Tibs\nprotein: beef\n\nname: Kitfo"));
    }

    #[test]
    fn test_keys_render_in_sorted_order() {
        let d = dish("d1", 0.9, &[("z_last", "1"), ("a_first", "2")]);
        assert_eq!(format_dish_info(&d), "a_first: 2\nz_last: 1");
    }
}
