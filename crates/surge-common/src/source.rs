//! Source file registry.
//!
//! Files are addressed by a small integer `FileId`; id 0 is reserved for
//! "no file" so that the zero-valued span stays absent. The registry keeps
//! the file path, its full text, and a lazily consistent line map so that
//! diagnostics can render line/column positions without reparsing bytes.

use serde::{Deserialize, Serialize};

use crate::position::{LineMap, Position};

/// Identifier of a registered source file. Id 0 means "no file".
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FileId(pub u32);

impl FileId {
    /// The absent file.
    pub const NONE: FileId = FileId(0);

    #[inline]
    #[must_use]
    pub const fn is_none(self) -> bool {
        self.0 == 0
    }
}

/// One registered source file.
#[derive(Debug)]
pub struct SourceFile {
    pub id: FileId,
    pub path: String,
    pub text: String,
    line_map: LineMap,
}

impl SourceFile {
    /// Convert a byte offset in this file to a line/column position.
    #[must_use]
    pub fn position_of(&self, offset: u32) -> Position {
        self.line_map.position_of(offset)
    }

    #[must_use]
    pub fn line_map(&self) -> &LineMap {
        &self.line_map
    }
}

/// Registry of source files for one compilation.
///
/// Index 0 is a sentinel; the first registered file gets id 1.
#[derive(Debug, Default)]
pub struct SourceSet {
    files: Vec<SourceFile>,
}

impl SourceSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a file and return its id.
    pub fn add(&mut self, path: impl Into<String>, text: impl Into<String>) -> FileId {
        let id = FileId(self.files.len() as u32 + 1);
        let text = text.into();
        let line_map = LineMap::build(&text);
        self.files.push(SourceFile {
            id,
            path: path.into(),
            text,
            line_map,
        });
        id
    }

    /// Look up a file by id. Returns `None` for the sentinel id 0.
    #[must_use]
    pub fn get(&self, id: FileId) -> Option<&SourceFile> {
        if id.is_none() {
            return None;
        }
        self.files.get(id.0 as usize - 1)
    }

    /// Number of registered files.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SourceFile> {
        self.files.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_start_at_one() {
        let mut set = SourceSet::new();
        let a = set.add("a.sg", "let x = 1;\n");
        let b = set.add("b.sg", "");
        assert_eq!(a, FileId(1));
        assert_eq!(b, FileId(2));
        assert!(set.get(FileId::NONE).is_none());
        assert_eq!(set.get(a).unwrap().path, "a.sg");
        assert_eq!(set.get(b).unwrap().text, "");
        assert!(set.get(FileId(3)).is_none());
    }
}
