//! Tokenizer state machine definitions.

use crate::elements::RawKind;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Mode {
    Data,
    /// After `<`.
    TagOpen,
    Tag(TagState),
    /// After `<!`, matching `--`, `doctype` or `[CDATA[`.
    MarkupDeclaration,
    Comment,
    Doctype(DoctypeState),
    ProcessingInstruction,
    Cdata,
    BogusDeclaration,
    RawText(RawKind),
    Plaintext,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum TagState {
    TagName,
    SearchAttribute,
    AttributeName,
    SearchEqual,
    SearchValue,
    QuotedValue(char),
    Value,
    SearchEnd,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum DoctypeState {
    Begin,
    BeforeName,
    Name,
    AfterName,
    BeforePublicId,
    PublicId(char),
    AfterPublicId,
    BeforeSystemId,
    SystemId(char),
    AfterSystemId,
    InternalSubset,
    AfterInternalSubset,
    Bogus,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum EntityPhase {
    SearchEntity,
    NumericSearch,
    Hexadecimal,
    Decimal,
    EntityName,
    /// A name or digit run hit its length cap; only `;` may follow.
    SearchSemicolon,
}

/// Where decoded entity output goes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum EntityContext {
    Text,
    Attribute,
    Raw,
}

/// What a handler did with the character it was given.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Flow {
    /// The character belongs to the current state; advance past it.
    Consume,
    /// The state changed; give the same character to the new state.
    Reprocess,
    /// The handler already advanced the input itself.
    Advanced,
}
