//! Persistent seen-identifier state.
//!
//! The only thing that survives between runs is a small JSON file mapping
//! each feed URL to the ordered list of identifiers already processed for
//! that feed (oldest first). It is loaded once at run start, mutated in
//! memory, and written back exactly once at run end.
//!
//! Load is deliberately forgiving: a missing file or malformed contents
//! yield an empty map so a damaged state file costs one round of
//! re-learning rather than blocking every subsequent run. Only genuine I/O
//! faults (e.g. permission errors) propagate.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;

/// Per-feed identifier history, keyed by feed URL.
pub type SeenState = BTreeMap<String, Vec<String>>;

/// Load the state file, returning an empty map when the file is absent or
/// its contents do not deserialize to a string-to-string-list mapping.
pub fn load(path: &Path) -> io::Result<SeenState> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(SeenState::new()),
        Err(err) => return Err(err),
    };

    Ok(serde_json::from_str(&raw).unwrap_or_default())
}

/// Write the state file: pretty-printed JSON with a trailing newline, in a
/// single write call. No partial-write recovery is attempted; a crash
/// mid-write is repaired by the forgiving [`load`] on the next run.
pub fn save(path: &Path, state: &SeenState) -> io::Result<()> {
    let mut body = serde_json::to_string_pretty(state).map_err(io::Error::other)?;
    body.push('\n');
    fs::write(path, body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn sample() -> SeenState {
        let mut state = SeenState::new();
        state.insert(
            "https://example.com/feed.xml".into(),
            vec!["u1".into(), "u2".into()],
        );
        state.insert("https://other.example/atom".into(), vec![]);
        state
    }

    #[test]
    fn missing_file_loads_as_empty() {
        let dir = tempdir().unwrap();
        let loaded = load(&dir.path().join("absent.json")).unwrap();
        assert!(loaded.is_empty());
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("seen.json");

        let state = sample();
        save(&path, &state).unwrap();
        assert_eq!(load(&path).unwrap(), state);
    }

    #[test]
    fn saved_file_is_stable_across_rewrite() {
        // save(load(save(X))) == save(X)
        let dir = tempdir().unwrap();
        let path = dir.path().join("seen.json");

        save(&path, &sample()).unwrap();
        let first = fs::read_to_string(&path).unwrap();

        let reloaded = load(&path).unwrap();
        save(&path, &reloaded).unwrap();
        let second = fs::read_to_string(&path).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn saved_file_ends_with_newline() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("seen.json");
        save(&path, &sample()).unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.ends_with('\n'));
        assert!(!raw.ends_with("\n\n"));
    }

    #[test]
    fn non_mapping_json_loads_as_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("seen.json");
        fs::write(&path, "[\"u1\", \"u2\"]\n").unwrap();

        assert!(load(&path).unwrap().is_empty());
    }

    #[test]
    fn invalid_json_loads_as_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("seen.json");
        fs::write(&path, "{not json at all").unwrap();

        assert!(load(&path).unwrap().is_empty());
    }

    #[test]
    fn mapping_with_wrong_value_shape_loads_as_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("seen.json");
        fs::write(&path, "{\"feed\": 42}\n").unwrap();

        assert!(load(&path).unwrap().is_empty());
    }
}
