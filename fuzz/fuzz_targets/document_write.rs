#![no_main]

use dom::DomSnapshot;
use html::{ParseSession, PumpStatus, ScriptContext, ScriptFetch, ScriptHost, ScriptSource};
use libfuzzer_sys::fuzz_target;

/// Echoes each script's text back through `document.write`, at most a few
/// levels deep.
struct EchoHost {
    budget: u32,
}

impl ScriptHost for EchoHost {
    fn fetch(&mut self, _url: &str) -> ScriptFetch {
        ScriptFetch::Unavailable
    }

    fn execute(&mut self, source: &ScriptSource, cx: &mut ScriptContext<'_>) {
        if self.budget == 0 {
            return;
        }
        self.budget -= 1;
        cx.document_write(&source.text);
    }
}

fn parse(input: &[u8], chunk: usize) -> Vec<String> {
    let mut session = ParseSession::new(EchoHost { budget: 8 });
    for piece in input.chunks(chunk) {
        session.write_bytes(piece).expect("write");
    }
    assert_eq!(session.finish(), Ok(PumpStatus::Finished));
    let doc = session.into_document();
    DomSnapshot::new(&doc, doc.root()).as_lines().to_vec()
}

fuzz_target!(|data: &[u8]| {
    let Some((&size, rest)) = data.split_first() else {
        return;
    };
    let whole = parse(rest, rest.len().max(1));
    let chunked = parse(rest, usize::from(size.max(1)));
    assert_eq!(whole, chunked, "chunk size {size}");
});
