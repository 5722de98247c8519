//! Case conversion for display: repository slugs become human-readable titles.

/// Convert a slug to a title, e.g. "face-recognition-attendance" -> "Face Recognition Attendance".
/// Hyphens become spaces; the first letter of every word is upper-cased, the rest kept as is.
pub fn slug_to_title(slug: &str) -> String {
    let mut out = String::with_capacity(slug.len());
    let mut at_word_start = true;
    for c in slug.chars() {
        let c = if c == '-' { ' ' } else { c };
        if at_word_start && c.is_alphanumeric() {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
        at_word_start = !(c.is_alphanumeric() || c == '_');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hyphens_become_spaces_and_words_are_capitalised() {
        assert_eq!(slug_to_title("face-recognition-attendance"), "Face Recognition Attendance");
    }

    #[test]
    fn keeps_existing_casing_and_underscores() {
        assert_eq!(slug_to_title("myAPI-v2"), "MyAPI V2");
        assert_eq!(slug_to_title("snake_case"), "Snake_case");
    }

    #[test]
    fn dots_start_new_words() {
        assert_eq!(slug_to_title("user.github.io"), "User.Github.Io");
    }
}
