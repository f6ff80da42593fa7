//! Element classes the tokenizer and tree builder switch on.
//!
//! All names are expected in ASCII lower case, as the tokenizer produces them.

/// Elements that never have content. A self-closing flag is kept only for
/// these (and `script`).
pub fn is_void(name: &str) -> bool {
    matches!(
        name,
        "area"
            | "base"
            | "basefont"
            | "br"
            | "col"
            | "embed"
            | "frame"
            | "hr"
            | "img"
            | "input"
            | "isindex"
            | "keygen"
            | "link"
            | "meta"
            | "param"
            | "source"
            | "track"
            | "wbr"
    )
}

/// Block-level start tags that implicitly close an open `p`.
pub fn closes_paragraph(name: &str) -> bool {
    matches!(
        name,
        "address"
            | "article"
            | "aside"
            | "blockquote"
            | "center"
            | "dd"
            | "details"
            | "dir"
            | "div"
            | "dl"
            | "dt"
            | "fieldset"
            | "figcaption"
            | "figure"
            | "footer"
            | "form"
            | "h1"
            | "h2"
            | "h3"
            | "h4"
            | "h5"
            | "h6"
            | "header"
            | "hr"
            | "li"
            | "listing"
            | "main"
            | "menu"
            | "nav"
            | "ol"
            | "p"
            | "plaintext"
            | "pre"
            | "section"
            | "summary"
            | "table"
            | "ul"
            | "xmp"
    )
}

/// Content model of elements whose text is not tokenized as markup.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RawKind {
    Script,
    Style,
    Textarea,
    Title,
    Xmp,
}

impl RawKind {
    pub fn for_element(name: &str) -> Option<Self> {
        Some(match name {
            "script" => Self::Script,
            "style" => Self::Style,
            "textarea" => Self::Textarea,
            "title" => Self::Title,
            "xmp" => Self::Xmp,
            _ => return None,
        })
    }

    pub fn tag_name(self) -> &'static str {
        match self {
            Self::Script => "script",
            Self::Style => "style",
            Self::Textarea => "textarea",
            Self::Title => "title",
            Self::Xmp => "xmp",
        }
    }

    /// `textarea` and `title` content decodes character references.
    pub fn decodes_entities(self) -> bool {
        matches!(self, Self::Textarea | Self::Title)
    }

    /// `<!-- ... -->` inside `script` and `style` hides a closing tag.
    pub fn hides_comments(self) -> bool {
        matches!(self, Self::Script | Self::Style)
    }
}

/// Elements after whose start tag one newline is dropped.
pub fn drops_leading_newline(name: &str) -> bool {
    matches!(name, "pre" | "listing" | "textarea")
}
