//! Batch assembly: one substituted template copy per subject, delivered as a
//! single merged document or as a ZIP archive of per-subject documents.

use std::io::{Cursor, Write};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::document::DocxDocument;
use crate::error::CoverError;
use crate::package::TemplateSource;
use crate::sanitize::join_parts;
use crate::substitute::{apply_replacements, StudentData};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// One document, page break between subjects.
    Merged,
    /// One DOCX entry per subject inside a ZIP.
    Archive,
}

/// A finished output: derived file name plus the fully written bytes.
#[derive(Debug, Clone)]
pub struct Artifact {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Drop duplicate and blank subjects, keeping first-occurrence order.
pub fn dedup_subjects<I, S>(subjects: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out: Vec<String> = Vec::new();
    for subject in subjects {
        let subject = subject.as_ref().trim();
        if !subject.is_empty() && !out.iter().any(|s| s == subject) {
            out.push(subject.to_string());
        }
    }
    out
}

/// Request-level checks, run before any document work. Name and surname are
/// required; so is at least one subject.
pub fn validate(student: &StudentData, subjects: &[String]) -> Result<(), CoverError> {
    if student.name.trim().is_empty() || student.surname.trim().is_empty() {
        return Err(CoverError::IncompleteInput(
            "name and surname are required".into(),
        ));
    }
    if subjects.is_empty() {
        return Err(CoverError::IncompleteInput("no subjects selected".into()));
    }
    Ok(())
}

/// Produce the output artifact for the batch. Every subject gets a fresh
/// template copy; any failure aborts the whole batch with no partial output.
/// An empty subject list yields `Ok(None)`.
pub fn generate(
    source: &TemplateSource,
    student: &StudentData,
    subjects: &[String],
    mode: OutputMode,
) -> Result<Option<Artifact>, CoverError> {
    let artifact = match mode {
        OutputMode::Merged => merged(source, student, subjects)?,
        OutputMode::Archive => archive(source, student, subjects)?,
    };
    if let Some(artifact) = &artifact {
        log::info!(
            "generated {} ({} subjects, {} bytes)",
            artifact.file_name,
            subjects.len(),
            artifact.bytes.len()
        );
    }
    Ok(artifact)
}

fn substituted_copy(
    source: &TemplateSource,
    student: &StudentData,
    subject: &str,
) -> Result<DocxDocument, CoverError> {
    let mut doc = source.open()?;
    apply_replacements(&mut doc, &student.replacements(subject));
    Ok(doc)
}

fn merged(
    source: &TemplateSource,
    student: &StudentData,
    subjects: &[String],
) -> Result<Option<Artifact>, CoverError> {
    let mut master: Option<DocxDocument> = None;
    for subject in subjects {
        let copy = substituted_copy(source, student, subject)?;
        match &mut master {
            None => master = Some(copy),
            Some(m) => m.append_page(copy),
        }
    }
    let Some(master) = master else {
        return Ok(None);
    };
    let bytes = source.package().to_bytes(&master.to_xml())?;
    let stem = join_parts(&[&student.name, &student.surname, &student.class]);
    Ok(Some(Artifact {
        file_name: format!("{stem}_CoverPages.docx"),
        bytes,
    }))
}

fn archive(
    source: &TemplateSource,
    student: &StudentData,
    subjects: &[String],
) -> Result<Option<Artifact>, CoverError> {
    if subjects.is_empty() {
        return Ok(None);
    }
    let mut buf = Vec::new();
    {
        let mut zip = ZipWriter::new(Cursor::new(&mut buf));
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        let mut used: Vec<String> = Vec::new();
        for subject in subjects {
            let copy = substituted_copy(source, student, subject)?;
            let bytes = source.package().to_bytes(&copy.to_xml())?;
            let name = entry_name(&student.name, subject, &mut used);
            zip.start_file(name.as_str(), options)?;
            zip.write_all(&bytes)?;
        }
        zip.finish()?;
    }
    let stem = join_parts(&[&student.name, &student.surname]);
    Ok(Some(Artifact {
        file_name: format!("{stem}_Covers.zip"),
        bytes: buf,
    }))
}

/// `{SanitizedName}_{SanitizedSubject}_Cover.docx`, with a numeric suffix
/// when two subjects sanitize to the same entry name.
fn entry_name(name: &str, subject: &str, used: &mut Vec<String>) -> String {
    let stem = join_parts(&[name, subject]);
    let mut candidate = format!("{stem}_Cover.docx");
    let mut n = 1;
    while used.contains(&candidate) {
        n += 1;
        candidate = format!("{stem}_Cover_{n}.docx");
    }
    used.push(candidate.clone());
    candidate
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::sample_template_bytes;
    use std::io::Read;
    use zip::ZipArchive;

    fn source() -> TemplateSource {
        TemplateSource::from_bytes(&sample_template_bytes().unwrap()).unwrap()
    }

    fn student() -> StudentData {
        StudentData {
            name: "Jo".into(),
            surname: "Smith".into(),
            class: "Grade 10A".into(),
            year: 2026,
        }
    }

    fn document_xml_of(docx: &[u8]) -> String {
        let mut archive = ZipArchive::new(Cursor::new(docx)).unwrap();
        let mut entry = archive.by_name("word/document.xml").unwrap();
        let mut xml = String::new();
        entry.read_to_string(&mut xml).unwrap();
        xml
    }

    #[test]
    fn dedup_keeps_first_occurrence_order() {
        let subjects = dedup_subjects(["Math", "Science", " Math ", "", "Art"]);
        assert_eq!(subjects, vec!["Math", "Science", "Art"]);
    }

    #[test]
    fn validate_rejects_blank_names_and_empty_subjects() {
        let mut data = student();
        data.surname = "  ".into();
        assert!(matches!(
            validate(&data, &["Math".into()]),
            Err(CoverError::IncompleteInput(_))
        ));
        assert!(matches!(
            validate(&student(), &[]),
            Err(CoverError::IncompleteInput(_))
        ));
        assert!(validate(&student(), &["Math".into()]).is_ok());
    }

    #[test]
    fn merged_three_subjects_has_two_page_breaks_in_order() {
        let subjects = vec!["Alpha".to_string(), "Beta".to_string(), "Gamma".to_string()];
        let artifact = generate(&source(), &student(), &subjects, OutputMode::Merged)
            .unwrap()
            .unwrap();
        assert_eq!(artifact.file_name, "Jo_Smith_Grade_10A_CoverPages.docx");
        let xml = document_xml_of(&artifact.bytes);
        assert_eq!(xml.matches("w:type=\"page\"").count(), 2);
        let a = xml.find("Alpha").unwrap();
        let b = xml.find("Beta").unwrap();
        let c = xml.find("Gamma").unwrap();
        assert!(a < b && b < c);
        assert!(!xml.contains("{{Sub"));
        // section properties appear once, at the end
        assert_eq!(xml.matches("<w:sectPr>").count(), 1);
    }

    #[test]
    fn archive_entries_are_named_and_substituted() {
        let subjects = vec!["Math".to_string(), "Science".to_string()];
        let artifact = generate(&source(), &student(), &subjects, OutputMode::Archive)
            .unwrap()
            .unwrap();
        assert_eq!(artifact.file_name, "Jo_Smith_Covers.zip");

        let mut outer = ZipArchive::new(Cursor::new(artifact.bytes.as_slice())).unwrap();
        let names: Vec<String> = (0..outer.len())
            .map(|i| outer.by_index(i).unwrap().name().to_string())
            .collect();
        assert_eq!(names, vec!["Jo_Math_Cover.docx", "Jo_Science_Cover.docx"]);

        for name in names {
            let mut inner = Vec::new();
            outer.by_name(&name).unwrap().read_to_end(&mut inner).unwrap();
            let xml = document_xml_of(&inner);
            assert!(!xml.contains("{{Subject}}"));
            assert!(!xml.contains("{{Name}}"));
        }
    }

    #[test]
    fn colliding_entry_names_get_suffixes() {
        let subjects = vec!["Math!".to_string(), "Math?".to_string()];
        let artifact = generate(&source(), &student(), &subjects, OutputMode::Archive)
            .unwrap()
            .unwrap();
        let mut outer = ZipArchive::new(Cursor::new(artifact.bytes.as_slice())).unwrap();
        let names: Vec<String> = (0..outer.len())
            .map(|i| outer.by_index(i).unwrap().name().to_string())
            .collect();
        assert_eq!(names, vec!["Jo_Math_Cover.docx", "Jo_Math_Cover_2.docx"]);
    }

    #[test]
    fn punctuation_heavy_subjects_survive_in_content() {
        let subjects = vec!["C++ & <Logic> \"Lab\"".to_string()];
        let artifact = generate(&source(), &student(), &subjects, OutputMode::Merged)
            .unwrap()
            .unwrap();
        let xml = document_xml_of(&artifact.bytes);
        assert!(xml.contains("C++ &amp; &lt;Logic&gt; &quot;Lab&quot;"));
    }

    #[test]
    fn empty_subject_list_produces_no_artifact() {
        assert!(generate(&source(), &student(), &[], OutputMode::Merged)
            .unwrap()
            .is_none());
        assert!(generate(&source(), &student(), &[], OutputMode::Archive)
            .unwrap()
            .is_none());
    }
}
