//! Filename sanitization for output artifacts and archive entries.
//!
//! Subject names are free text and may contain anything; only the derived
//! file/entry names are sanitized, never the document content itself.

/// Keep alphanumerics, spaces, underscores and hyphens; drop everything else
/// and trim surrounding whitespace.
pub fn sanitize(input: &str) -> String {
    let kept: String = input
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | '_' | '-'))
        .collect();
    kept.trim().to_string()
}

/// Sanitize and collapse inner whitespace runs to a single underscore, so the
/// result can be joined into a file name.
pub fn filename_part(input: &str) -> String {
    let mut out = String::new();
    let mut in_ws = false;
    for ch in sanitize(input).chars() {
        if ch.is_whitespace() {
            if !in_ws {
                out.push('_');
                in_ws = true;
            }
        } else {
            out.push(ch);
            in_ws = false;
        }
    }
    out
}

/// Join the non-empty sanitized parts with underscores.
pub fn join_parts(parts: &[&str]) -> String {
    parts
        .iter()
        .map(|p| filename_part(p))
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join("_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_punctuation_and_trims() {
        assert_eq!(sanitize("  Gr. 10-A!?  "), "Gr 10-A");
    }

    #[test]
    fn output_alphabet_is_closed_for_arbitrary_input() {
        for input in ["a/b\\c", "Ωmega £5", "..", "\t name \n", "{{Subject}}"] {
            let out = sanitize(input);
            assert!(
                out.chars()
                    .all(|c| c.is_alphanumeric() || matches!(c, ' ' | '_' | '-')),
                "unexpected char in {out:?}"
            );
            assert_eq!(out, out.trim());
        }
    }

    #[test]
    fn filename_part_collapses_whitespace() {
        assert_eq!(filename_part("Grade  10 A"), "Grade_10_A");
        assert_eq!(filename_part("Math!"), "Math");
    }

    #[test]
    fn join_skips_empty_parts() {
        assert_eq!(join_parts(&["Jo", "", "Smith"]), "Jo_Smith");
        assert_eq!(join_parts(&["??", "Math"]), "Math");
    }
}
