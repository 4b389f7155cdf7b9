//! Prompt construction for theme-to-songlist generation

/// Build the songlist prompt for one generation attempt
///
/// Pure function of its inputs. The "avoid" block appears only when
/// `exclusion_keys` is non-empty.
pub fn build(theme: &str, target_size: usize, exclusion_keys: &[String]) -> String {
    let mut prompt = format!(
        "You are a music curator. Create a playlist of exactly {target_size} songs for this theme:\n\
         \"{theme}\"\n\
         \n\
         Requirements:\n\
         - Every song must be a real, released recording that is playable on major streaming catalogs.\n\
         - Every song must fit the theme's mood and style. If the theme names an artist, \
         only include that artist or artists with a near-identical style; generic popular hits are not acceptable.\n\
         - Do not repeat songs.\n\
         \n\
         Output format:\n\
         Respond with a numbered list only, one song per line, exactly in this form:\n\
         1. Song Title - Artist\n\
         2. Song Title - Artist\n\
         Do not add headers, commentary, explanations, or blank lines.\n"
    );

    if !exclusion_keys.is_empty() {
        prompt.push_str("\nAvoid these songs, they have already been tried:\n");
        for key in exclusion_keys {
            prompt.push_str("- ");
            prompt.push_str(key);
            prompt.push('\n');
        }
    }

    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_embeds_theme_and_contract() {
        let prompt = build("Rainy Sunday like Nick Drake", 7, &[]);
        assert!(prompt.contains("\"Rainy Sunday like Nick Drake\""));
        assert!(prompt.contains("exactly 7 songs"));
        assert!(prompt.contains("1. Song Title - Artist"));
        assert!(prompt.contains("real, released recording"));
        assert!(prompt.contains("near-identical style"));
    }

    #[test]
    fn test_avoid_block_only_with_exclusions() {
        let without = build("Focus", 3, &[]);
        assert!(!without.contains("Avoid these songs"));

        let keys = vec!["Clair de Lune - Debussy".to_string(), "Weightless - Marconi Union".to_string()];
        let with = build("Focus", 3, &keys);
        assert!(with.contains("Avoid these songs"));
        assert!(with.contains("- Clair de Lune - Debussy\n"));
        assert!(with.contains("- Weightless - Marconi Union\n"));
    }

    #[test]
    fn test_prompt_is_deterministic() {
        let keys = vec!["A - B".to_string()];
        assert_eq!(build("x", 2, &keys), build("x", 2, &keys));
    }
}
