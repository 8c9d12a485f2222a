//! Builds the sample cover-page template.
//!
//! Mirrors the school's standard layout: page border, centered header, a
//! large subject title, a details table and a comments box. The subject
//! token is deliberately split across two runs, the way editors tend to
//! leave it, so the cross-run replacement path is exercised by default.

use std::io::{Cursor, Write};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::CoverError;

const NS_W: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
const NS_CT: &str = "http://schemas.openxmlformats.org/package/2006/content-types";
const NS_RELS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";

fn content_types_xml() -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="{NS_CT}">
    <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
    <Default Extension="xml" ContentType="application/xml"/>
    <Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>
</Types>"#
    )
}

fn rels_xml() -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="{NS_RELS}">
    <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/>
</Relationships>"#
    )
}

fn document_rels_xml() -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="{NS_RELS}">
</Relationships>"#
    )
}

fn centered(runs: &str) -> String {
    format!("<w:p><w:pPr><w:jc w:val=\"center\"/></w:pPr>{runs}</w:p>")
}

fn spacer() -> &'static str {
    "<w:p/>"
}

fn label_cell(label: &str) -> String {
    format!(
        concat!(
            "<w:tc><w:tcPr><w:tcW w:w=\"2880\" w:type=\"dxa\"/></w:tcPr>",
            "<w:p><w:r><w:rPr><w:b/></w:rPr><w:t xml:space=\"preserve\">{}</w:t></w:r></w:p></w:tc>"
        ),
        label
    )
}

fn value_cell(token: &str) -> String {
    format!(
        concat!(
            "<w:tc><w:tcPr><w:tcW w:w=\"5760\" w:type=\"dxa\"/></w:tcPr>",
            "<w:p><w:r><w:t>{}</w:t></w:r></w:p></w:tc>"
        ),
        token
    )
}

fn details_table() -> String {
    let borders = concat!(
        "<w:tblBorders>",
        "<w:top w:val=\"single\" w:sz=\"4\" w:color=\"auto\"/>",
        "<w:left w:val=\"single\" w:sz=\"4\" w:color=\"auto\"/>",
        "<w:bottom w:val=\"single\" w:sz=\"4\" w:color=\"auto\"/>",
        "<w:right w:val=\"single\" w:sz=\"4\" w:color=\"auto\"/>",
        "<w:insideH w:val=\"single\" w:sz=\"4\" w:color=\"auto\"/>",
        "<w:insideV w:val=\"single\" w:sz=\"4\" w:color=\"auto\"/>",
        "</w:tblBorders>"
    );
    let rows = [
        ("Student Name:", "{{Name}}"),
        ("Student Surname:", "{{Surname}}"),
        ("Class:", "{{Class}}"),
        ("Academic Year:", "{{Year}}"),
    ];
    let mut out = format!(
        concat!(
            "<w:tbl><w:tblPr>{}</w:tblPr>",
            "<w:tblGrid><w:gridCol w:w=\"2880\"/><w:gridCol w:w=\"5760\"/></w:tblGrid>"
        ),
        borders
    );
    for (label, token) in rows {
        out.push_str("<w:tr>");
        out.push_str(&label_cell(label));
        out.push_str(&value_cell(token));
        out.push_str("</w:tr>");
    }
    out.push_str("</w:tbl>");
    out
}

fn comments_box() -> String {
    concat!(
        "<w:tbl><w:tblPr><w:tblBorders>",
        "<w:top w:val=\"single\" w:sz=\"4\" w:color=\"auto\"/>",
        "<w:left w:val=\"single\" w:sz=\"4\" w:color=\"auto\"/>",
        "<w:bottom w:val=\"single\" w:sz=\"4\" w:color=\"auto\"/>",
        "<w:right w:val=\"single\" w:sz=\"4\" w:color=\"auto\"/>",
        "</w:tblBorders></w:tblPr>",
        "<w:tblGrid><w:gridCol w:w=\"8640\"/></w:tblGrid>",
        "<w:tr><w:trPr><w:trHeight w:val=\"3600\"/></w:trPr>",
        "<w:tc><w:tcPr><w:tcW w:w=\"8640\" w:type=\"dxa\"/></w:tcPr><w:p/></w:tc></w:tr>",
        "</w:tbl>"
    )
    .to_string()
}

fn sect_pr() -> &'static str {
    concat!(
        "<w:sectPr>",
        "<w:pgSz w:w=\"11906\" w:h=\"16838\"/>",
        "<w:pgMar w:top=\"1440\" w:right=\"1440\" w:bottom=\"1440\" w:left=\"1440\"/>",
        "<w:pgBorders w:offsetFrom=\"page\">",
        "<w:top w:val=\"single\" w:sz=\"24\" w:space=\"24\" w:color=\"003366\"/>",
        "<w:left w:val=\"single\" w:sz=\"24\" w:space=\"24\" w:color=\"003366\"/>",
        "<w:bottom w:val=\"single\" w:sz=\"24\" w:space=\"24\" w:color=\"003366\"/>",
        "<w:right w:val=\"single\" w:sz=\"24\" w:space=\"24\" w:color=\"003366\"/>",
        "</w:pgBorders>",
        "</w:sectPr>"
    )
}

pub fn sample_document_xml() -> String {
    let header = centered(concat!(
        "<w:r><w:rPr><w:b/><w:sz w:val=\"48\"/>",
        "<w:rFonts w:ascii=\"Arial\" w:hAnsi=\"Arial\"/>",
        "<w:color w:val=\"003366\"/></w:rPr>",
        "<w:t>ACADEMIC ASSESSMENT COVER</w:t></w:r>"
    ));
    // Two runs sharing one style: "{{Sub" + "ject}}".
    let subject_title = centered(concat!(
        "<w:r><w:rPr><w:b/><w:sz w:val=\"72\"/><w:color w:val=\"000000\"/></w:rPr>",
        "<w:t>{{Sub</w:t></w:r>",
        "<w:r><w:rPr><w:b/><w:sz w:val=\"72\"/><w:color w:val=\"000000\"/></w:rPr>",
        "<w:t>ject}}</w:t></w:r>"
    ));
    let comments_header = concat!(
        "<w:p><w:r><w:rPr><w:b/><w:sz w:val=\"28\"/><w:u w:val=\"single\"/></w:rPr>",
        "<w:t>Teacher's Comments / Grade:</w:t></w:r></w:p>"
    );

    let mut body = String::new();
    body.push_str(&header);
    body.push_str(spacer());
    body.push_str(&subject_title);
    body.push_str(spacer());
    body.push_str(spacer());
    body.push_str(&details_table());
    body.push_str(spacer());
    body.push_str(spacer());
    body.push_str(comments_header);
    body.push_str(&comments_box());
    body.push_str(sect_pr());

    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n<w:document xmlns:w=\"{NS_W}\"><w:body>{body}</w:body></w:document>"
    )
}

/// The complete sample template as DOCX bytes.
pub fn sample_template_bytes() -> Result<Vec<u8>, CoverError> {
    let mut buf = Vec::new();
    {
        let mut zip = ZipWriter::new(Cursor::new(&mut buf));
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        zip.start_file("[Content_Types].xml", options)?;
        zip.write_all(content_types_xml().as_bytes())?;

        zip.start_file("_rels/.rels", options)?;
        zip.write_all(rels_xml().as_bytes())?;

        zip.start_file("word/document.xml", options)?;
        zip.write_all(sample_document_xml().as_bytes())?;

        zip.start_file("word/_rels/document.xml.rels", options)?;
        zip.write_all(document_rels_xml().as_bytes())?;

        zip.finish()?;
    }
    Ok(buf)
}
