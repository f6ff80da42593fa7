//! TOML fixture files.
//!
//! A fixture file holds any number of `[[case]]` tables:
//!
//! ```toml
//! [[case]]
//! name = "simple-tag"
//! input = "<p>x</p>"
//! tokens = ['START name=p attrs=[] self_closing=false', 'CHAR text="x"', 'END name=p', 'EOF']
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FixtureStatus {
    #[default]
    Active,
    /// Expected to mismatch; a match is reported as a failure.
    Xfail,
    Skip,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TokenCase {
    pub name: String,
    pub input: String,
    pub tokens: Vec<String>,
    #[serde(default)]
    pub status: FixtureStatus,
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TokenFixtureFile {
    #[serde(default)]
    case: Vec<TokenCase>,
}

/// A case together with the file it came from.
#[derive(Clone, Debug)]
pub struct LoadedCase {
    pub path: PathBuf,
    pub case: TokenCase,
}

/// Parse one fixture file's contents.
pub fn parse_token_cases(source: &str) -> Result<Vec<TokenCase>, String> {
    let file: TokenFixtureFile = toml::from_str(source).map_err(|err| err.to_string())?;
    for case in &file.case {
        if case.status != FixtureStatus::Active
            && case.reason.as_deref().unwrap_or("").trim().is_empty()
        {
            return Err(format!("case '{}' is not active but has no reason", case.name));
        }
    }
    Ok(file.case)
}

/// Load every `*.toml` file under `dir`, sorted by file name. Case names must
/// be unique across files.
pub fn load_token_cases(dir: &Path) -> Result<Vec<LoadedCase>, String> {
    let mut paths: Vec<PathBuf> = fs::read_dir(dir)
        .map_err(|err| format!("failed to read fixture dir {dir:?}: {err}"))?
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "toml"))
        .collect();
    paths.sort();

    let mut loaded: Vec<LoadedCase> = Vec::new();
    for path in paths {
        let source = fs::read_to_string(&path)
            .map_err(|err| format!("failed to read fixture {path:?}: {err}"))?;
        let cases = parse_token_cases(&source).map_err(|err| format!("{path:?}: {err}"))?;
        for case in cases {
            if loaded.iter().any(|seen| seen.case.name == case.name) {
                return Err(format!("duplicate case name '{}' in {path:?}", case.name));
            }
            loaded.push(LoadedCase {
                path: path.clone(),
                case,
            });
        }
    }
    Ok(loaded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_cases_with_default_status() {
        let cases = parse_token_cases(
            r#"
            [[case]]
            name = "a"
            input = "<p>"
            tokens = ["START name=p attrs=[] self_closing=false", "EOF"]

            [[case]]
            name = "b"
            input = ""
            tokens = ["EOF"]
            status = "xfail"
            reason = "known gap"
            "#,
        )
        .expect("valid fixture");
        assert_eq!(cases.len(), 2);
        assert_eq!(cases[0].status, FixtureStatus::Active);
        assert_eq!(cases[1].status, FixtureStatus::Xfail);
    }

    #[test]
    fn rejects_unknown_fields_and_missing_reasons() {
        assert!(parse_token_cases("[[case]]\nname='a'\ninput=''\ntokens=[]\nextra=1\n").is_err());
        assert!(
            parse_token_cases("[[case]]\nname='a'\ninput=''\ntokens=[]\nstatus='skip'\n").is_err()
        );
    }
}
