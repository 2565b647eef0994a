//! Test Fixture Discovery
//!
//! A test group is a directory under the cases root holding one entry program
//! (`main.<ext>`) and its cases in one of two conventions, tried in order:
//!
//! ```text
//! flat                      indexed
//! {group}/main.lico         {group}/main.lico
//! {group}/input.txt         {group}/input/<name>.txt
//! {group}/output.txt        {group}/output/<name>.txt
//! ```
//!
//! The flat convention yields one anonymous case. The indexed convention
//! yields one case per name found in either directory; a missing side is
//! simply absent (no input, or expected empty output).

use crate::error::LoadError;
use crate::shuffle::Shuffler;
use crate::{TestCase, TestGroup};
use std::collections::BTreeSet;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

const FLAT_INPUT: &str = "input.txt";
const FLAT_OUTPUT: &str = "output.txt";
const INPUT_DIR: &str = "input";
const OUTPUT_DIR: &str = "output";
const CASE_EXTENSION: &str = "txt";

/// How the entry program of a group is recognised
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixtureLayout {
    /// File stem of the entry program
    pub entry_stem: String,
    /// Required extension; any extension is accepted when `None`
    pub entry_extension: Option<String>,
}

impl Default for FixtureLayout {
    fn default() -> Self {
        Self {
            entry_stem: "main".to_string(),
            entry_extension: None,
        }
    }
}

/// Loads test groups from a cases root
#[derive(Debug, Clone)]
pub struct FixtureLoader<S> {
    cases_root: PathBuf,
    layout: FixtureLayout,
    shuffler: S,
}

impl<S: Shuffler> FixtureLoader<S> {
    /// Create a loader over `cases_root`
    pub fn new(cases_root: impl Into<PathBuf>, layout: FixtureLayout, shuffler: S) -> Self {
        Self {
            cases_root: cases_root.into(),
            layout,
            shuffler,
        }
    }

    /// Directory the groups live in
    pub fn cases_root(&self) -> &Path {
        &self.cases_root
    }

    /// Names of all group directories under the cases root, shuffled.
    pub fn discover(&self) -> Result<Vec<String>, LoadError> {
        if !self.cases_root.is_dir() {
            return Err(LoadError::NotFound {
                name: self.cases_root.display().to_string(),
                path: self.cases_root.clone(),
            });
        }

        let mut names: Vec<String> = list_dir(&self.cases_root)?
            .into_iter()
            .filter(|p| p.is_dir())
            .filter_map(|p| p.file_name().and_then(|n| n.to_str()).map(str::to_string))
            .filter(|n| !n.starts_with('.'))
            .collect();
        names.sort();
        self.shuffler.shuffle(&mut names);
        Ok(names)
    }

    /// Load one group, with its cases shuffled once.
    pub fn load(&self, name: &str) -> Result<TestGroup, LoadError> {
        let root = self.cases_root.join(name);
        if !root.is_dir() {
            return Err(LoadError::NotFound {
                name: name.to_string(),
                path: root,
            });
        }

        let entry = self.find_entry(name, &root)?;

        let mut cases = match read_flat(&root)? {
            Some(case) => vec![case],
            None => read_indexed(&root)?,
        };
        if cases.is_empty() {
            return Err(LoadError::NoCases {
                name: name.to_string(),
            });
        }
        self.shuffler.shuffle(&mut cases);

        debug!(group = name, cases = cases.len(), entry = %entry.display(), "loaded test group");

        Ok(TestGroup {
            name: name.to_string(),
            root,
            entry,
            cases,
        })
    }

    fn find_entry(&self, name: &str, root: &Path) -> Result<PathBuf, LoadError> {
        let mut candidates: Vec<PathBuf> = list_dir(root)?
            .into_iter()
            .filter(|p| p.is_file())
            .filter(|p| {
                p.file_stem().and_then(|s| s.to_str()) == Some(self.layout.entry_stem.as_str())
            })
            .filter(|p| {
                let ext = p.extension().and_then(|e| e.to_str());
                match &self.layout.entry_extension {
                    Some(wanted) => ext == Some(wanted.as_str()),
                    None => ext.is_some(),
                }
            })
            .collect();
        candidates.sort();

        match candidates.len() {
            0 => Err(LoadError::MissingEntry {
                name: name.to_string(),
                stem: self.layout.entry_stem.clone(),
                root: root.to_path_buf(),
            }),
            1 => Ok(candidates.remove(0)),
            _ => Err(LoadError::AmbiguousEntry {
                name: name.to_string(),
                candidates: candidates
                    .iter()
                    .filter_map(|p| p.file_name().and_then(|n| n.to_str()))
                    .map(str::to_string)
                    .collect(),
            }),
        }
    }
}

fn list_dir(dir: &Path) -> Result<Vec<PathBuf>, LoadError> {
    let entries = std::fs::read_dir(dir).map_err(|e| LoadError::io(dir, e))?;
    let mut paths = Vec::new();
    for entry in entries {
        paths.push(entry.map_err(|e| LoadError::io(dir, e))?.path());
    }
    Ok(paths)
}

/// Read a fixture file, treating absence as `None`
fn read_optional(path: &Path) -> Result<Option<String>, LoadError> {
    match std::fs::read_to_string(path) {
        Ok(text) => Ok(Some(text)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(LoadError::io(path, e)),
    }
}

/// Read an expected-output file as raw bytes, treating absence as `None`
fn read_optional_bytes(path: &Path) -> Result<Option<Vec<u8>>, LoadError> {
    match std::fs::read(path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(LoadError::io(path, e)),
    }
}

fn read_flat(root: &Path) -> Result<Option<TestCase>, LoadError> {
    let input = read_optional(&root.join(FLAT_INPUT))?;
    let expected = read_optional_bytes(&root.join(FLAT_OUTPUT))?;
    if input.is_none() && expected.is_none() {
        return Ok(None);
    }
    Ok(Some(TestCase {
        name: None,
        input,
        expected,
    }))
}

fn read_indexed(root: &Path) -> Result<Vec<TestCase>, LoadError> {
    let input_dir = root.join(INPUT_DIR);
    let output_dir = root.join(OUTPUT_DIR);

    let mut names = case_names(&input_dir)?;
    names.extend(case_names(&output_dir)?);

    let mut cases = Vec::with_capacity(names.len());
    for name in names {
        let file = format!("{}.{}", name, CASE_EXTENSION);
        cases.push(TestCase {
            input: read_optional(&input_dir.join(&file))?,
            expected: read_optional_bytes(&output_dir.join(&file))?,
            name: Some(name),
        });
    }
    Ok(cases)
}

/// Stems of the `*.txt` files in `dir`; an absent directory has none
fn case_names(dir: &Path) -> Result<BTreeSet<String>, LoadError> {
    if !dir.is_dir() {
        return Ok(BTreeSet::new());
    }
    Ok(list_dir(dir)?
        .into_iter()
        .filter(|p| p.is_file())
        .filter(|p| p.extension().and_then(|e| e.to_str()) == Some(CASE_EXTENSION))
        .filter_map(|p| p.file_stem().and_then(|s| s.to_str()).map(str::to_string))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shuffle::ShuffleOrder;
    use std::fs;
    use tempfile::TempDir;

    fn loader(root: &Path) -> FixtureLoader<ShuffleOrder> {
        FixtureLoader::new(root, FixtureLayout::default(), ShuffleOrder::Preserve)
    }

    fn write(path: PathBuf, text: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, text).unwrap();
    }

    #[test]
    fn test_flat_group() {
        let dir = TempDir::new().unwrap();
        let group = dir.path().join("echo");
        write(group.join("main.lico"), "print(read())");
        write(group.join("input.txt"), "5\n");
        write(group.join("output.txt"), "5\n");

        let loaded = loader(dir.path()).load("echo").unwrap();
        assert_eq!(loaded.entry, group.join("main.lico"));
        assert_eq!(
            loaded.cases,
            vec![TestCase {
                name: None,
                input: Some("5\n".to_string()),
                expected: Some(b"5\n".to_vec()),
            }]
        );
    }

    #[test]
    fn test_flat_wins_over_indexed() {
        let dir = TempDir::new().unwrap();
        let group = dir.path().join("g");
        write(group.join("main.lico"), "");
        write(group.join("output.txt"), "x\n");
        write(group.join("input").join("a.txt"), "1\n");

        let loaded = loader(dir.path()).load("g").unwrap();
        assert_eq!(loaded.cases.len(), 1);
        assert_eq!(loaded.cases[0].name, None);
        assert_eq!(loaded.cases[0].input, None);
    }

    #[test]
    fn test_indexed_union_of_names() {
        let dir = TempDir::new().unwrap();
        let group = dir.path().join("random");
        write(group.join("main.lico"), "");
        write(group.join("input").join("a.txt"), "1\n");
        write(group.join("input").join("b.txt"), "2\n");
        write(group.join("output").join("b.txt"), "4\n");
        write(group.join("output").join("c.txt"), "9\n");
        write(group.join("output").join("notes.md"), "ignored");

        let loaded = loader(dir.path()).load("random").unwrap();
        let names: Vec<_> = loaded.cases.iter().map(|c| c.label().to_string()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);

        let a = loaded.case("a").unwrap();
        assert_eq!(a.input.as_deref(), Some("1\n"));
        assert_eq!(a.expected, None);
        assert_eq!(a.expected_output(), b"");

        let c = loaded.case("c").unwrap();
        assert_eq!(c.input, None);
        assert_eq!(c.expected_output(), b"9\n");
    }

    #[test]
    fn test_missing_group() {
        let dir = TempDir::new().unwrap();
        let err = loader(dir.path()).load("nope").unwrap_err();
        assert!(matches!(err, LoadError::NotFound { ref name, .. } if name == "nope"));
    }

    #[test]
    fn test_missing_entry() {
        let dir = TempDir::new().unwrap();
        write(dir.path().join("g").join("input.txt"), "1\n");
        let err = loader(dir.path()).load("g").unwrap_err();
        assert!(matches!(err, LoadError::MissingEntry { .. }));
    }

    #[test]
    fn test_entry_extension_filter() {
        let dir = TempDir::new().unwrap();
        let group = dir.path().join("g");
        write(group.join("main.lico"), "");
        write(group.join("main.lua"), "");
        write(group.join("output.txt"), "");

        let err = loader(dir.path()).load("g").unwrap_err();
        assert!(matches!(err, LoadError::AmbiguousEntry { ref candidates, .. } if candidates.len() == 2));

        let layout = FixtureLayout {
            entry_stem: "main".to_string(),
            entry_extension: Some("lua".to_string()),
        };
        let loaded = FixtureLoader::new(dir.path(), layout, ShuffleOrder::Preserve)
            .load("g")
            .unwrap();
        assert_eq!(loaded.entry, group.join("main.lua"));
    }

    #[test]
    fn test_expected_output_kept_as_raw_bytes() {
        let dir = TempDir::new().unwrap();
        let group = dir.path().join("bytes");
        write(group.join("main.lico"), "");
        fs::create_dir_all(group.join("output")).unwrap();
        fs::write(group.join("output").join("a.txt"), [0xFF, b'\n']).unwrap();

        let loaded = loader(dir.path()).load("bytes").unwrap();
        assert_eq!(loaded.cases[0].expected_output(), [0xFF, b'\n']);
    }

    #[test]
    fn test_group_without_cases() {
        let dir = TempDir::new().unwrap();
        write(dir.path().join("g").join("main.lico"), "");
        let err = loader(dir.path()).load("g").unwrap_err();
        assert!(matches!(err, LoadError::NoCases { .. }));
    }

    #[test]
    fn test_discover_groups() {
        let dir = TempDir::new().unwrap();
        write(dir.path().join("b").join("main.lico"), "");
        write(dir.path().join("a").join("main.lico"), "");
        write(dir.path().join(".hidden").join("main.lico"), "");
        write(dir.path().join("README.md"), "");

        let names = loader(dir.path()).discover().unwrap();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn test_cases_are_shuffled_by_injected_order() {
        struct Reverse;
        impl Shuffler for Reverse {
            fn shuffle<T>(&self, items: &mut [T]) {
                items.reverse();
            }
        }

        let dir = TempDir::new().unwrap();
        let group = dir.path().join("g");
        write(group.join("main.lico"), "");
        for name in ["a", "b", "c"] {
            write(group.join("output").join(format!("{name}.txt")), "");
        }

        let loaded = FixtureLoader::new(dir.path(), FixtureLayout::default(), Reverse)
            .load("g")
            .unwrap();
        let names: Vec<_> = loaded.cases.iter().map(|c| c.label()).collect();
        assert_eq!(names, vec!["c", "b", "a"]);
    }
}
