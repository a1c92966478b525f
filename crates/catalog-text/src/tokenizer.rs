/// Lowercase `text`, turn everything except `[a-z0-9_-]` into separators and
/// split. Indexing and querying share this so tokens compare by plain equality.
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .chars()
        .map(|c| if is_token_char(c) { c } else { ' ' })
        .collect::<String>()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

fn is_token_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

#[cfg(test)]
mod tests {
    use super::tokenize;

    #[test]
    fn lowercases_and_splits_on_punctuation() {
        assert_eq!(tokenize("Alert Dialog, (modal)!"), vec!["alert", "dialog", "modal"]);
    }

    #[test]
    fn keeps_hyphens_and_underscores() {
        assert_eq!(tokenize("@radix-ui/react-dialog"), vec!["radix-ui", "react-dialog"]);
        assert_eq!(tokenize("snake_case v2"), vec!["snake_case", "v2"]);
    }

    #[test]
    fn blank_input_has_no_tokens() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("  \t ... ").is_empty());
    }

    #[test]
    fn non_ascii_letters_are_separators() {
        assert_eq!(tokenize("café menü"), vec!["caf", "men"]);
    }

    #[test]
    fn tokenizing_is_idempotent() {
        for text in ["Data Table (sortable)", "@tanstack/react-table", "  Date-Picker_v2 ", "ÅngstrÖm"] {
            let once = tokenize(text);
            assert_eq!(tokenize(&once.join(" ")), once, "input: {text}");
        }
    }
}
