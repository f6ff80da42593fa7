//! Incremental HTML parsing: a resumable tokenizer, a shallow tree builder
//! and the session that drives them with a script host.

pub mod chunker;
pub mod elements;
pub mod entities;
pub mod script;
pub mod session;
pub mod tokenizer;
pub mod tree_builder;

pub use crate::script::{NoScripts, ScriptContext, ScriptFetch, ScriptHost, ScriptSource};
pub use crate::session::{ParseSession, PumpStatus, SessionError, parse_document};
pub use crate::tokenizer::{Token, Tokenizer, TokenizerConfig, TokenizerStats, WriteMode};
pub use crate::tree_builder::{
    SuspendReason, TreeBuilder, TreeBuilderConfig, TreeBuilderError, TreeBuilderStepResult,
};
