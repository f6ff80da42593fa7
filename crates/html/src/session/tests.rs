use std::collections::HashMap;

use dom::{DomSnapshot, Document};

use super::{ParseSession, PumpStatus, SessionError, parse_document};
use crate::script::{ScriptContext, ScriptFetch, ScriptHost, ScriptSource};
use crate::tokenizer::TokenizerConfig;
use crate::tree_builder::TreeBuilderConfig;

/// Runs `document.write('...')` literally and writes canned output for
/// known script texts.
#[derive(Default)]
struct WritingHost {
    externals: HashMap<String, ScriptFetch>,
    canned: HashMap<String, String>,
    ran: Vec<ScriptSource>,
}

impl ScriptHost for WritingHost {
    fn fetch(&mut self, url: &str) -> ScriptFetch {
        self.externals
            .get(url)
            .cloned()
            .unwrap_or(ScriptFetch::Unavailable)
    }

    fn execute(&mut self, source: &ScriptSource, cx: &mut ScriptContext<'_>) {
        self.ran.push(source.clone());
        if let Some(output) = self.canned.get(&source.text) {
            cx.document_write(output);
            return;
        }
        for statement in source.text.split(';') {
            if let Some(markup) = statement
                .trim()
                .strip_prefix("document.write('")
                .and_then(|rest| rest.strip_suffix("')"))
            {
                cx.document_write(markup);
            }
        }
    }
}

fn render(doc: &Document) -> Vec<String> {
    DomSnapshot::new(doc, doc.root()).as_lines().to_vec()
}

#[test]
fn document_write_lands_where_the_script_was() {
    let input = "<p>Hi &amp; bye<script>document.write('<b>X</b>')</script> tail</p>";
    let expected = render(&parse_document(
        "<p>Hi &amp; bye<script>document.write('<b>X</b>')</script><b>X</b> tail</p>",
    ));

    for split in 0..=input.len() {
        let mut session = ParseSession::new(WritingHost::default());
        session.write(&input[..split]).expect("first chunk");
        session.write(&input[split..]).expect("second chunk");
        assert_eq!(session.finish(), Ok(PumpStatus::Finished));
        assert_eq!(session.scripts_run(), 1, "split at {split}");
        assert_eq!(render(session.document()), expected, "split at {split}");
    }
}

#[test]
fn pending_external_script_blocks_network_input() {
    let mut host = WritingHost::default();
    host.externals
        .insert("a.js".to_string(), ScriptFetch::Pending);
    let mut session = ParseSession::new(host);

    assert_eq!(
        session.write("<script src=a.js></script>after"),
        Ok(PumpStatus::BlockedOnScript)
    );
    assert_eq!(session.write("more"), Ok(PumpStatus::BlockedOnScript));
    assert_eq!(session.finish(), Ok(PumpStatus::BlockedOnScript));
    assert!(session.is_blocked());
    assert!(!session.document().text_content(session.document().root()).contains("after"));

    let status = session
        .script_fetched(Some("document.write('<i>w</i>')".to_string()))
        .expect("resume");
    assert_eq!(status, PumpStatus::Finished);
    assert_eq!(
        render(session.document()),
        vec![
            "#document",
            "  <html>",
            "    <script src=\"a.js\">",
            "    <i>",
            "      \"w\"",
            "    \"aftermore\"",
        ]
    );
    let ran = &session.host().ran;
    assert_eq!(ran.len(), 1);
    assert_eq!(ran[0].url.as_deref(), Some("a.js"));
}

#[test]
fn failed_fetch_skips_the_script() {
    let mut host = WritingHost::default();
    host.externals
        .insert("gone.js".to_string(), ScriptFetch::Pending);
    let mut session = ParseSession::new(host);
    session
        .write("<script src=gone.js></script><p>x")
        .expect("write");
    assert_eq!(session.script_fetched(None), Ok(PumpStatus::NeedMoreInput));
    assert_eq!(session.finish(), Ok(PumpStatus::Finished));
    assert!(session.host().ran.is_empty());
    assert_eq!(session.document().text_content(session.document().root()), "x");
}

#[test]
fn ready_external_script_runs_immediately() {
    let mut host = WritingHost::default();
    host.externals.insert(
        "now.js".to_string(),
        ScriptFetch::Ready("document.write('!')".to_string()),
    );
    let mut session = ParseSession::new(host);
    session.write("a<script src=now.js></script>b").expect("write");
    session.finish().expect("finish");
    assert_eq!(session.document().text_content(session.document().root()), "a!b");
}

#[test]
fn script_source_carries_text_and_start_line() {
    let mut session = ParseSession::new(WritingHost::default());
    session
        .write("<p>\n\n<script>\nlet x;\n</script>")
        .expect("write");
    session.finish().expect("finish");
    let ran = &session.host().ran;
    assert_eq!(ran.len(), 1);
    assert_eq!(ran[0].text, "\nlet x;\n");
    assert_eq!(ran[0].url, None);
    assert_eq!(ran[0].base_line, 3);
}

#[test]
fn scripts_written_by_scripts_run_in_order() {
    let mut host = WritingHost::default();
    host.canned
        .insert("outer".to_string(), "<script>inner</script>1".to_string());
    host.canned.insert("inner".to_string(), "2".to_string());
    let mut session = ParseSession::new(host);
    session.write("<script>outer</script>0").expect("write");
    session.finish().expect("finish");

    let texts: Vec<_> = session.host().ran.iter().map(|s| s.text.as_str()).collect();
    assert_eq!(texts, ["outer", "inner"]);
    assert_eq!(
        session.document().text_content(session.document().root()),
        "outerinner210"
    );
    assert_eq!(session.tokenizer_stats().frames_pushed, 2);
}

#[test]
fn scripting_disabled_runs_nothing() {
    let config = TreeBuilderConfig {
        scripting: false,
        ..TreeBuilderConfig::default()
    };
    let mut session =
        ParseSession::with_config(TokenizerConfig::default(), config, WritingHost::default());
    session
        .write("<script>document.write('x')</script>y")
        .expect("write");
    assert_eq!(session.finish(), Ok(PumpStatus::Finished));
    assert!(session.host().ran.is_empty());
}

#[test]
fn writes_after_finish_or_abort_are_rejected() {
    let mut session = ParseSession::new(WritingHost::default());
    session.finish().expect("finish");
    assert_eq!(session.write("x"), Err(SessionError::Finished));

    let mut session = ParseSession::new(WritingHost::default());
    session.write("<p>a").expect("write");
    session.abort();
    assert_eq!(session.pump(), Ok(PumpStatus::Aborted));
    assert_eq!(session.write("b"), Err(SessionError::Aborted));
    assert_eq!(session.write_bytes(b"b"), Err(SessionError::Aborted));
    assert!(!session.is_finished());
}

#[test]
fn hold_defers_tree_construction() {
    let mut session = ParseSession::new(WritingHost::default());
    session.set_on_hold(true);
    assert_eq!(session.write("<p>a"), Ok(PumpStatus::OnHold));
    assert!(session.document().document_element().is_none());

    session.set_on_hold(false);
    assert_eq!(session.pump(), Ok(PumpStatus::NeedMoreInput));
    assert!(session.document().document_element().is_some());
}

#[test]
fn bytes_split_inside_a_character() {
    let bytes = "<p>caf\u{e9}</p>".as_bytes();
    let mut session = ParseSession::new(WritingHost::default());
    for byte in bytes {
        session.write_bytes(std::slice::from_ref(byte)).expect("write");
    }
    session.finish().expect("finish");
    assert_eq!(
        session.document().text_content(session.document().root()),
        "caf\u{e9}"
    );
}

#[test]
fn abort_builds_consumed_text_and_never_reports_finished() {
    let input = "<p>a";
    for split in 0..=input.len() {
        let mut session = ParseSession::new(WritingHost::default());
        session.write(&input[..split]).expect("first chunk");
        session.write(&input[split..]).expect("second chunk");
        session.abort();
        assert_eq!(session.pump(), Ok(PumpStatus::Aborted), "split at {split}");
        assert!(session.is_aborted());
        assert!(!session.is_finished(), "split at {split}");
        assert_eq!(
            render(session.document()),
            vec!["#document", "  <html>", "    <p>", "      \"a\""],
            "split at {split}"
        );
    }
}

#[test]
fn abort_after_completion_keeps_the_session_finished() {
    let mut session = ParseSession::new(WritingHost::default());
    session.write("<p>a").expect("write");
    assert_eq!(session.finish(), Ok(PumpStatus::Finished));
    session.abort();
    assert!(!session.is_aborted());
    assert!(session.is_finished());
    assert_eq!(session.pump(), Ok(PumpStatus::Finished));
}
