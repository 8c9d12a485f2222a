//! Placeholder substitution engine.
//!
//! Tokens look like `{{Name}}`. Replacement prefers touching single runs so
//! their formatting is left alone; only when editing has split a token across
//! run boundaries does the engine rewrite the whole paragraph, reapplying the
//! first run's properties to the collapsed result.

use regex::Regex;

use crate::document::{DocxDocument, Inline, Paragraph, Run};

/// The five recognized placeholder fields.
pub const FIELDS: [&str; 5] = ["Name", "Surname", "Class", "Year", "Subject"];

pub fn token(field: &str) -> String {
    format!("{{{{{field}}}}}")
}

/// Constant per-batch student fields. `Class` may be empty; a field the
/// template does not use is simply never matched.
#[derive(Debug, Clone)]
pub struct StudentData {
    pub name: String,
    pub surname: String,
    pub class: String,
    pub year: u16,
}

impl StudentData {
    /// The full five-entry replacement set for one subject. Year is
    /// stringified with plain formatting, no locale separators.
    pub fn replacements(&self, subject: &str) -> Vec<(String, String)> {
        vec![
            (token("Name"), self.name.clone()),
            (token("Surname"), self.surname.clone()),
            (token("Class"), self.class.clone()),
            (token("Year"), self.year.to_string()),
            (token("Subject"), subject.to_string()),
        ]
    }
}

/// Replace every occurrence of every token, in the body and inside every
/// table cell. The document is mutated in place; tokens absent from the
/// document are ignored.
pub fn apply_replacements(doc: &mut DocxDocument, replacements: &[(String, String)]) {
    let mut rewritten = 0usize;
    doc.body.for_each_paragraph_mut(&mut |para| {
        for (tok, value) in replacements {
            if replace_in_paragraph(para, tok, value) {
                rewritten += 1;
            }
        }
    });
    log::debug!("substitution touched {rewritten} paragraph/token pairs");
}

/// Returns true when the paragraph was modified.
fn replace_in_paragraph(para: &mut Paragraph, token: &str, value: &str) -> bool {
    if !para.text().contains(token) {
        return false;
    }

    let mut replaced_in_run = false;
    for inline in &mut para.inlines {
        if let Inline::Run(run) = inline {
            if run.text.contains(token) {
                run.text = run.text.replace(token, value);
                replaced_in_run = true;
            }
        }
    }
    if replaced_in_run {
        return true;
    }

    // The token is split across run boundaries. Rewrite the reconstructed
    // text as a whole and collapse to one run styled like the first, so the
    // paragraph keeps its original look.
    let captured = para.inlines.iter().find_map(|inline| match inline {
        Inline::Run(run) => Some(run.props.clone()),
        Inline::Raw(_) => None,
    });
    let text = para.text().replace(token, value);
    para.inlines = vec![Inline::Run(Run {
        props: captured.flatten(),
        text,
    })];
    true
}

/// Distinct `{{Token}}` strings present anywhere searchable, in first-seen
/// order. Drives the inspect command.
pub fn scan_tokens(doc: &mut DocxDocument) -> Vec<String> {
    let pattern = Regex::new(r"\{\{[A-Za-z0-9_]+\}\}").expect("invalid regex");
    let mut found: Vec<String> = Vec::new();
    doc.body.for_each_paragraph_mut(&mut |para| {
        let text = para.text();
        for m in pattern.find_iter(&text) {
            if !found.iter().any(|t| t == m.as_str()) {
                found.push(m.as_str().to_string());
            }
        }
    });
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Block;

    const NS: &str = r#"xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main""#;

    fn doc(body: &str) -> DocxDocument {
        let xml = format!("<w:document {NS}><w:body>{body}</w:body></w:document>");
        DocxDocument::parse(&xml).unwrap()
    }

    fn student() -> StudentData {
        StudentData {
            name: "Jo".into(),
            surname: "Smith".into(),
            class: "Grade 10A".into(),
            year: 2026,
        }
    }

    fn first_paragraph(doc: &DocxDocument) -> &Paragraph {
        match &doc.body.blocks[0] {
            Block::Paragraph(p) => p,
            _ => panic!("expected paragraph"),
        }
    }

    #[test]
    fn single_run_token_keeps_sibling_runs_untouched() {
        let mut d = doc(concat!(
            "<w:p><w:r><w:rPr><w:i/></w:rPr><w:t>Student: </w:t></w:r>",
            "<w:r><w:rPr><w:b/></w:rPr><w:t>{{Name}}</w:t></w:r></w:p>"
        ));
        apply_replacements(&mut d, &student().replacements("Math"));
        let p = first_paragraph(&d);
        assert_eq!(p.text(), "Student: Jo");
        assert_eq!(p.inlines.len(), 2);
        let Inline::Run(first) = &p.inlines[0] else {
            panic!("expected run");
        };
        assert_eq!(first.props.as_deref(), Some("<w:rPr><w:i/></w:rPr>"));
    }

    #[test]
    fn split_token_collapses_with_first_run_props() {
        let mut d = doc(concat!(
            "<w:p><w:r><w:rPr><w:b/><w:sz w:val=\"72\"/><w:color w:val=\"003366\"/></w:rPr>",
            "<w:t>{{Sub</w:t></w:r><w:r><w:t>ject}}</w:t></w:r></w:p>"
        ));
        apply_replacements(&mut d, &student().replacements("Science"));
        let p = first_paragraph(&d);
        assert_eq!(p.text(), "Science");
        assert_eq!(p.inlines.len(), 1);
        let Inline::Run(run) = &p.inlines[0] else {
            panic!("expected run");
        };
        let props = run.props.as_deref().unwrap();
        assert!(props.contains("<w:b/>"));
        assert!(props.contains("w:sz w:val=\"72\""));
        assert!(props.contains("w:color w:val=\"003366\""));
    }

    #[test]
    fn replaces_all_occurrences_in_one_pass() {
        let mut d = doc("<w:p><w:r><w:t>{{Name}} and {{Name}}</w:t></w:r></w:p>");
        apply_replacements(&mut d, &student().replacements("Math"));
        assert_eq!(first_paragraph(&d).text(), "Jo and Jo");
    }

    #[test]
    fn second_pass_is_a_no_op() {
        let mut d = doc("<w:p><w:r><w:t>{{Year}} cover</w:t></w:r></w:p>");
        let repl = student().replacements("Math");
        apply_replacements(&mut d, &repl);
        let once = d.to_xml();
        apply_replacements(&mut d, &repl);
        assert_eq!(d.to_xml(), once);
        assert!(once.contains("2026 cover"));
    }

    #[test]
    fn unknown_tokens_are_left_alone() {
        let mut d = doc("<w:p><w:r><w:t>{{Teacher}} for {{Subject}}</w:t></w:r></w:p>");
        apply_replacements(&mut d, &student().replacements("Art"));
        assert_eq!(first_paragraph(&d).text(), "{{Teacher}} for Art");
    }

    #[test]
    fn empty_field_value_substitutes_as_empty_string() {
        let mut data = student();
        data.class = String::new();
        let mut d = doc("<w:p><w:r><w:t>Class: {{Class}}.</w:t></w:r></w:p>");
        apply_replacements(&mut d, &data.replacements("Math"));
        assert_eq!(first_paragraph(&d).text(), "Class: .");
    }

    #[test]
    fn substitutes_inside_table_cells() {
        let mut d = doc(concat!(
            "<w:tbl><w:tr><w:tc><w:tcPr/><w:p><w:r><w:t>{{Surname}}</w:t></w:r></w:p>",
            "</w:tc></w:tr></w:tbl>"
        ));
        apply_replacements(&mut d, &student().replacements("Math"));
        assert!(d.to_xml().contains(">Smith</w:t>"));
        assert!(!d.to_xml().contains("{{Surname}}"));
    }

    #[test]
    fn scan_reports_tokens_including_unknown_ones() {
        let mut d = doc(concat!(
            "<w:p><w:r><w:t>{{Name}}</w:t></w:r></w:p>",
            "<w:tbl><w:tr><w:tc><w:p><w:r><w:t>{{Teacher}}</w:t></w:r></w:p></w:tc></w:tr></w:tbl>"
        ));
        assert_eq!(scan_tokens(&mut d), vec!["{{Name}}", "{{Teacher}}"]);
    }
}
