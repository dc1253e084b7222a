//! Fixed and parameterized package parts.

use std::fmt::Write;

use quick_xml::escape::escape;

const XML_DECL: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

/// `[Content_Types].xml`.
pub(crate) const CONTENT_TYPES: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#,
    r#"<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#,
    r#"<Default Extension="xml" ContentType="application/xml"/>"#,
    r#"<Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>"#,
    r#"<Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/>"#,
    r#"</Types>"#,
);

/// `_rels/.rels`: the package entry point.
pub(crate) const PACKAGE_RELS: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    r#"<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/>"#,
    r#"</Relationships>"#,
);

/// `word/_rels/document.xml.rels`: styles part plus one external relationship
/// per distinct hyperlink target. Hyperlink ids start at `rId2` and match the
/// references written into `word/document.xml`.
pub(crate) fn document_rels(hyperlinks: &[String]) -> String {
    let mut out = String::with_capacity(512);
    out.push_str(XML_DECL);
    out.push_str(
        r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    );
    out.push_str(
        r#"<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>"#,
    );
    for (index, target) in hyperlinks.iter().enumerate() {
        write!(
            out,
            r#"<Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/hyperlink" Target="{}" TargetMode="External"/>"#,
            index + 2,
            escape(target.as_str()),
        )
        .expect("writing to a String cannot fail");
    }
    out.push_str("</Relationships>");
    out
}

/// Heading font sizes in half-points, level 1 first.
const HEADING_SIZES: [u32; 6] = [48, 40, 32, 28, 26, 24];

/// `word/styles.xml`: document defaults plus `Normal` and `Heading1`..`Heading6`.
pub(crate) fn styles_xml(font: &str) -> String {
    let font = escape(font);
    let mut out = String::with_capacity(2048);
    out.push_str(XML_DECL);
    out.push_str(
        r#"<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">"#,
    );
    write!(
        out,
        r#"<w:docDefaults><w:rPrDefault><w:rPr><w:rFonts w:ascii="{font}" w:hAnsi="{font}"/><w:sz w:val="22"/><w:szCs w:val="22"/></w:rPr></w:rPrDefault></w:docDefaults>"#,
    )
    .expect("writing to a String cannot fail");
    out.push_str(
        r#"<w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/></w:style>"#,
    );
    for (index, size) in HEADING_SIZES.iter().enumerate() {
        let level = index + 1;
        write!(
            out,
            concat!(
                r#"<w:style w:type="paragraph" w:styleId="Heading{level}">"#,
                r#"<w:name w:val="heading {level}"/>"#,
                r#"<w:basedOn w:val="Normal"/>"#,
                r#"<w:pPr><w:outlineLvl w:val="{outline}"/></w:pPr>"#,
                r#"<w:rPr><w:b/><w:sz w:val="{size}"/><w:szCs w:val="{size}"/></w:rPr>"#,
                r#"</w:style>"#,
            ),
            level = level,
            outline = index,
            size = size,
        )
        .expect("writing to a String cannot fail");
    }
    out.push_str("</w:styles>");
    out
}
