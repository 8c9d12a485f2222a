//! WordprocessingML document model.
//!
//! `word/document.xml` is parsed into a block tree just deep enough for
//! placeholder substitution: paragraphs and their runs are typed, tables are
//! descended into cell by cell, and everything else (section properties,
//! drawings, bookmarks, field codes) is carried as verbatim XML slices so the
//! template's formatting survives the round trip untouched. Serialization
//! rebuilds the part by string concatenation, the same way the docx writer
//! side of this crate emits XML.

use crate::error::CoverError;

/// Paragraph inserted between appended copies in merge mode.
pub const PAGE_BREAK_XML: &str = r#"<w:p><w:r><w:br w:type="page"/></w:r></w:p>"#;

/// One parsed `word/document.xml` part. Owns all of its data, so every parse
/// is an independent deep copy of the template.
#[derive(Debug, Clone)]
pub struct DocxDocument {
    /// XML declaration plus the `<w:document ...><w:body>` open tags,
    /// verbatim, so namespace declarations the template relies on are kept.
    header: String,
    pub body: Body,
}

#[derive(Debug, Clone, Default)]
pub struct Body {
    pub blocks: Vec<Block>,
    /// Body-level `<w:sectPr>`, kept apart from the blocks because it must
    /// stay the last body element when documents are appended.
    pub sect_pr: Option<String>,
}

#[derive(Debug, Clone)]
pub enum Block {
    Paragraph(Paragraph),
    Table(Table),
    Raw(String),
}

#[derive(Debug, Clone, Default)]
pub struct Paragraph {
    /// Raw `<w:pPr>` XML, if present.
    pub props: Option<String>,
    pub inlines: Vec<Inline>,
}

#[derive(Debug, Clone)]
pub enum Inline {
    Run(Run),
    /// Hyperlinks, bookmarks, runs with drawings or breaks — preserved
    /// verbatim, not searched for tokens.
    Raw(String),
}

/// A run holding only properties and text. Anything richer stays opaque.
#[derive(Debug, Clone, Default)]
pub struct Run {
    /// Raw `<w:rPr>` XML, if present.
    pub props: Option<String>,
    pub text: String,
}

#[derive(Debug, Clone, Default)]
pub struct Table {
    /// `tblPr`, `tblGrid` and any other non-row children, in order.
    pub props: Vec<String>,
    pub rows: Vec<Row>,
}

#[derive(Debug, Clone, Default)]
pub struct Row {
    pub props: Vec<String>,
    pub cells: Vec<Cell>,
}

#[derive(Debug, Clone, Default)]
pub struct Cell {
    pub props: Vec<String>,
    pub blocks: Vec<Block>,
}

impl Paragraph {
    /// Concatenated text of the typed runs, the string token matching runs
    /// against.
    pub fn text(&self) -> String {
        let mut out = String::new();
        for inline in &self.inlines {
            if let Inline::Run(run) = inline {
                out.push_str(&run.text);
            }
        }
        out
    }
}

impl Body {
    /// Visit every paragraph in document order: top-level ones and those
    /// nested inside table cells, recursively. One traversal serves the body
    /// and every cell alike.
    pub fn for_each_paragraph_mut<F>(&mut self, f: &mut F)
    where
        F: FnMut(&mut Paragraph),
    {
        visit_blocks(&mut self.blocks, f);
    }
}

fn visit_blocks<F>(blocks: &mut [Block], f: &mut F)
where
    F: FnMut(&mut Paragraph),
{
    for block in blocks {
        match block {
            Block::Paragraph(p) => f(p),
            Block::Table(table) => {
                for row in &mut table.rows {
                    for cell in &mut row.cells {
                        visit_blocks(&mut cell.blocks, f);
                    }
                }
            }
            Block::Raw(_) => {}
        }
    }
}

impl DocxDocument {
    pub fn parse(xml: &str) -> Result<Self, CoverError> {
        let tree = roxmltree::Document::parse(xml)
            .map_err(|e| CoverError::MalformedTemplate(format!("document.xml: {e}")))?;
        let body = tree
            .root_element()
            .children()
            .find(|n| n.is_element() && n.tag_name().name() == "body")
            .ok_or_else(|| CoverError::MalformedTemplate("missing <w:body>".into()))?;

        let first_child = body
            .children()
            .next()
            .ok_or_else(|| CoverError::MalformedTemplate("empty <w:body>".into()))?;
        let header = xml[..first_child.range().start].to_string();

        let mut blocks = Vec::new();
        let mut sect_pr = None;
        for child in body.children().filter(|n| n.is_element()) {
            match child.tag_name().name() {
                "p" => blocks.push(Block::Paragraph(parse_paragraph(xml, child))),
                "tbl" => blocks.push(Block::Table(parse_table(xml, child))),
                "sectPr" => sect_pr = Some(raw(xml, child)),
                _ => blocks.push(Block::Raw(raw(xml, child))),
            }
        }

        Ok(DocxDocument {
            header,
            body: Body { blocks, sect_pr },
        })
    }

    /// Append another substituted copy after an explicit page break. The
    /// appended copy's body-level `sectPr` is dropped; section properties
    /// come from this document, and both copies stem from the same template.
    pub fn append_page(&mut self, other: DocxDocument) {
        self.body.blocks.push(Block::Raw(PAGE_BREAK_XML.to_string()));
        self.body.blocks.extend(other.body.blocks);
    }

    pub fn to_xml(&self) -> String {
        let mut out = String::with_capacity(self.header.len() + 1024);
        out.push_str(&self.header);
        for block in &self.body.blocks {
            write_block(&mut out, block);
        }
        if let Some(sect_pr) = &self.body.sect_pr {
            out.push_str(sect_pr);
        }
        out.push_str("</w:body></w:document>");
        out
    }
}

fn raw(xml: &str, node: roxmltree::Node) -> String {
    xml[node.range()].to_string()
}

fn element_text(node: roxmltree::Node) -> String {
    node.children()
        .filter(|n| n.is_text())
        .filter_map(|n| n.text())
        .collect()
}

fn parse_paragraph(xml: &str, node: roxmltree::Node) -> Paragraph {
    let mut para = Paragraph::default();
    for child in node.children().filter(|n| n.is_element()) {
        match child.tag_name().name() {
            "pPr" => para.props = Some(raw(xml, child)),
            "r" => para.inlines.push(parse_run(xml, child)),
            _ => para.inlines.push(Inline::Raw(raw(xml, child))),
        }
    }
    para
}

fn parse_run(xml: &str, node: roxmltree::Node) -> Inline {
    let mut run = Run::default();
    for child in node.children().filter(|n| n.is_element()) {
        match child.tag_name().name() {
            "rPr" => run.props = Some(raw(xml, child)),
            "t" => run.text.push_str(&element_text(child)),
            // A break, tab, drawing or field makes the run opaque.
            _ => return Inline::Raw(raw(xml, node)),
        }
    }
    Inline::Run(run)
}

fn parse_table(xml: &str, node: roxmltree::Node) -> Table {
    let mut table = Table::default();
    for child in node.children().filter(|n| n.is_element()) {
        match child.tag_name().name() {
            "tr" => table.rows.push(parse_row(xml, child)),
            _ => table.props.push(raw(xml, child)),
        }
    }
    table
}

fn parse_row(xml: &str, node: roxmltree::Node) -> Row {
    let mut row = Row::default();
    for child in node.children().filter(|n| n.is_element()) {
        match child.tag_name().name() {
            "tc" => row.cells.push(parse_cell(xml, child)),
            _ => row.props.push(raw(xml, child)),
        }
    }
    row
}

fn parse_cell(xml: &str, node: roxmltree::Node) -> Cell {
    let mut cell = Cell::default();
    for child in node.children().filter(|n| n.is_element()) {
        match child.tag_name().name() {
            "p" => cell.blocks.push(Block::Paragraph(parse_paragraph(xml, child))),
            "tbl" => cell.blocks.push(Block::Table(parse_table(xml, child))),
            _ => cell.props.push(raw(xml, child)),
        }
    }
    cell
}

pub(crate) fn escape_xml_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

fn write_block(out: &mut String, block: &Block) {
    match block {
        Block::Paragraph(p) => write_paragraph(out, p),
        Block::Table(t) => write_table(out, t),
        Block::Raw(xml) => out.push_str(xml),
    }
}

fn write_paragraph(out: &mut String, para: &Paragraph) {
    out.push_str("<w:p>");
    if let Some(props) = &para.props {
        out.push_str(props);
    }
    for inline in &para.inlines {
        match inline {
            Inline::Run(run) => write_run(out, run),
            Inline::Raw(xml) => out.push_str(xml),
        }
    }
    out.push_str("</w:p>");
}

fn write_run(out: &mut String, run: &Run) {
    out.push_str("<w:r>");
    if let Some(props) = &run.props {
        out.push_str(props);
    }
    out.push_str("<w:t xml:space=\"preserve\">");
    out.push_str(&escape_xml_text(&run.text));
    out.push_str("</w:t></w:r>");
}

fn write_table(out: &mut String, table: &Table) {
    out.push_str("<w:tbl>");
    for props in &table.props {
        out.push_str(props);
    }
    for row in &table.rows {
        out.push_str("<w:tr>");
        for props in &row.props {
            out.push_str(props);
        }
        for cell in &row.cells {
            out.push_str("<w:tc>");
            for props in &cell.props {
                out.push_str(props);
            }
            for block in &cell.blocks {
                write_block(out, block);
            }
            out.push_str("</w:tc>");
        }
        out.push_str("</w:tr>");
    }
    out.push_str("</w:tbl>");
}
