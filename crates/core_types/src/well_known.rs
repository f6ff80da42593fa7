//! Names with ids fixed at compile time.
//!
//! Id 0 of every table is the empty "no name" entry. Wildcards (`*`) are hidden
//! mappings so that a query for `"*"` never matches an element literally named
//! `*`.

use crate::id_string::NameTables;

pub mod local {
    pub const EMPTY: u16 = 0;
    pub const HTML: u16 = 1;
    pub const HEAD: u16 = 2;
    pub const BODY: u16 = 3;
    pub const TITLE: u16 = 4;
    pub const SCRIPT: u16 = 5;
    pub const STYLE: u16 = 6;
    pub const TEXTAREA: u16 = 7;
    pub const XMP: u16 = 8;
    pub const PLAINTEXT: u16 = 9;
    pub const PRE: u16 = 10;
    pub const LISTING: u16 = 11;
    pub const P: u16 = 12;
    pub const DIV: u16 = 13;
    pub const SPAN: u16 = 14;
    pub const A: u16 = 15;
    pub const B: u16 = 16;
    pub const I: u16 = 17;
    pub const BR: u16 = 18;
    pub const IMG: u16 = 19;
    pub const INPUT: u16 = 20;
    pub const META: u16 = 21;
    pub const LINK: u16 = 22;
    pub const HR: u16 = 23;
    pub const AREA: u16 = 24;
    pub const BASE: u16 = 25;
    pub const COL: u16 = 26;
    pub const EMBED: u16 = 27;
    pub const PARAM: u16 = 28;
    pub const SOURCE: u16 = 29;
    pub const TRACK: u16 = 30;
    pub const WBR: u16 = 31;
    pub const BASEFONT: u16 = 32;
    pub const FRAME: u16 = 33;
    pub const ISINDEX: u16 = 34;
    pub const TABLE: u16 = 35;
    pub const UL: u16 = 36;
    pub const OL: u16 = 37;
    pub const LI: u16 = 38;
    pub const DL: u16 = 39;
    pub const DD: u16 = 40;
    pub const DT: u16 = 41;
    pub const H1: u16 = 42;
    pub const H2: u16 = 43;
    pub const H3: u16 = 44;
    pub const H4: u16 = 45;
    pub const H5: u16 = 46;
    pub const H6: u16 = 47;
    pub const FORM: u16 = 48;
    pub const BLOCKQUOTE: u16 = 49;
    pub const ADDRESS: u16 = 50;
    pub const CENTER: u16 = 51;
    pub const SECTION: u16 = 52;
    pub const ARTICLE: u16 = 53;
    pub const NAV: u16 = 54;
    pub const HEADER: u16 = 55;
    pub const FOOTER: u16 = 56;
    pub const FIELDSET: u16 = 57;
    pub const FRAMESET: u16 = 58;
    pub const NOSCRIPT: u16 = 59;
    pub const SELECT: u16 = 60;
    pub const OPTION: u16 = 61;
    pub const SVG: u16 = 62;
    pub const MATH: u16 = 63;
    pub const ID: u16 = 64;
    pub const CLASS: u16 = 65;
    pub const NAME: u16 = 66;
    pub const HREF: u16 = 67;
    pub const SRC: u16 = 68;
    pub const TYPE: u16 = 69;
    pub const CHARSET: u16 = 70;
    pub const LANG: u16 = 71;
    pub const VALUE: u16 = 72;
    pub const DEFER: u16 = 73;
    pub const ASYNC: u16 = 74;
    pub const LANGUAGE: u16 = 75;
    pub const XMLNS: u16 = 76;
    /// Hidden wildcard.
    pub const ANY: u16 = 77;
    pub const BUTTON: u16 = 78;
    pub const TD: u16 = 79;
    pub const TH: u16 = 80;
    pub const CAPTION: u16 = 81;

    pub(crate) const NAMES: &[(u16, &str)] = &[
        (HTML, "html"),
        (HEAD, "head"),
        (BODY, "body"),
        (TITLE, "title"),
        (SCRIPT, "script"),
        (STYLE, "style"),
        (TEXTAREA, "textarea"),
        (XMP, "xmp"),
        (PLAINTEXT, "plaintext"),
        (PRE, "pre"),
        (LISTING, "listing"),
        (P, "p"),
        (DIV, "div"),
        (SPAN, "span"),
        (A, "a"),
        (B, "b"),
        (I, "i"),
        (BR, "br"),
        (IMG, "img"),
        (INPUT, "input"),
        (META, "meta"),
        (LINK, "link"),
        (HR, "hr"),
        (AREA, "area"),
        (BASE, "base"),
        (COL, "col"),
        (EMBED, "embed"),
        (PARAM, "param"),
        (SOURCE, "source"),
        (TRACK, "track"),
        (WBR, "wbr"),
        (BASEFONT, "basefont"),
        (FRAME, "frame"),
        (ISINDEX, "isindex"),
        (TABLE, "table"),
        (UL, "ul"),
        (OL, "ol"),
        (LI, "li"),
        (DL, "dl"),
        (DD, "dd"),
        (DT, "dt"),
        (H1, "h1"),
        (H2, "h2"),
        (H3, "h3"),
        (H4, "h4"),
        (H5, "h5"),
        (H6, "h6"),
        (FORM, "form"),
        (BLOCKQUOTE, "blockquote"),
        (ADDRESS, "address"),
        (CENTER, "center"),
        (SECTION, "section"),
        (ARTICLE, "article"),
        (NAV, "nav"),
        (HEADER, "header"),
        (FOOTER, "footer"),
        (FIELDSET, "fieldset"),
        (FRAMESET, "frameset"),
        (NOSCRIPT, "noscript"),
        (SELECT, "select"),
        (OPTION, "option"),
        (SVG, "svg"),
        (MATH, "math"),
        (ID, "id"),
        (CLASS, "class"),
        (NAME, "name"),
        (HREF, "href"),
        (SRC, "src"),
        (TYPE, "type"),
        (CHARSET, "charset"),
        (LANG, "lang"),
        (VALUE, "value"),
        (DEFER, "defer"),
        (ASYNC, "async"),
        (LANGUAGE, "language"),
        (XMLNS, "xmlns"),
        (BUTTON, "button"),
        (TD, "td"),
        (TH, "th"),
        (CAPTION, "caption"),
    ];
}

pub mod prefix {
    pub const EMPTY: u16 = 0;
    pub const XML: u16 = 1;
    pub const XMLNS: u16 = 2;

    pub(crate) const NAMES: &[(u16, &str)] = &[(XML, "xml"), (XMLNS, "xmlns")];
}

pub mod namespace {
    pub const EMPTY: u16 = 0;
    pub const XHTML: u16 = 1;
    pub const SVG: u16 = 2;
    pub const MATHML: u16 = 3;
    pub const XML: u16 = 4;
    pub const XMLNS: u16 = 5;
    /// Hidden wildcard.
    pub const ANY: u16 = 6;

    pub const XHTML_URI: &str = "http://www.w3.org/1999/xhtml";

    pub(crate) const NAMES: &[(u16, &str)] = &[
        (XHTML, XHTML_URI),
        (SVG, "http://www.w3.org/2000/svg"),
        (MATHML, "http://www.w3.org/1998/Math/MathML"),
        (XML, "http://www.w3.org/XML/1998/namespace"),
        (XMLNS, "http://www.w3.org/2000/xmlns/"),
    ];
}

pub(crate) fn register(tables: &NameTables) {
    {
        let mut table = tables.local().borrow_mut();
        for &(id, name) in local::NAMES {
            table.add_static_mapping(id, name);
        }
        table.add_hidden_mapping(local::ANY, "*");
    }
    {
        let mut table = tables.prefix().borrow_mut();
        for &(id, name) in prefix::NAMES {
            table.add_static_mapping(id, name);
        }
    }
    let mut table = tables.namespace().borrow_mut();
    for &(id, name) in namespace::NAMES {
        table.add_static_mapping(id, name);
    }
    table.add_hidden_mapping(namespace::ANY, "*");
}
