#![no_main]

use core_types::NameTables;
use html::chunker::{ChunkPlan, tokenize_chunked};
use html::tokenizer::TokenFmt;
use html::{Tokenizer, TokenizerConfig};
use libfuzzer_sys::fuzz_target;

// First byte picks the chunk size; the rest is the document.
fuzz_target!(|data: &[u8]| {
    let Some((&size, rest)) = data.split_first() else {
        return;
    };
    let input = String::from_utf8_lossy(rest);
    let names = NameTables::with_well_known();
    let fmt = TokenFmt::new(&names);

    let whole = Tokenizer::tokenize(&names, &input);
    let chunked = tokenize_chunked(
        &names,
        TokenizerConfig::default(),
        &input,
        &ChunkPlan::fixed_unaligned(usize::from(size.max(1))),
    );
    let whole = fmt.format_all(&whole).expect("whole tokens format");
    let chunked = fmt.format_all(&chunked).expect("chunked tokens format");
    assert_eq!(whole, chunked, "chunk size {size}");
    assert_eq!(whole.last().map(String::as_str), Some("EOF"));
});
