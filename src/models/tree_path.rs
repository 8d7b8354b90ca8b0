use serde::Serialize;
use std::fmt;
use std::ops::Deref;

/// Names from the root of the listing down to an entry. The empty path is the root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct TreePath(Vec<String>);

impl TreePath {
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Splits a `/`-joined path, ignoring empty segments.
    pub fn parse(joined: &str) -> Self {
        joined
            .split('/')
            .filter(|segment| !segment.is_empty())
            .collect()
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Last component, `None` at the root.
    pub fn name(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    pub fn child(&self, name: impl Into<String>) -> Self {
        let mut next = self.clone();
        next.push(name);
        next
    }

    pub fn parent(&self) -> Option<Self> {
        if self.is_root() {
            return None;
        }
        Some(Self(self.0[..self.0.len() - 1].to_vec()))
    }

    pub fn push(&mut self, name: impl Into<String>) {
        self.0.push(name.into());
    }

    pub fn pop(&mut self) -> Option<String> {
        self.0.pop()
    }

    pub fn truncate(&mut self, depth: usize) {
        self.0.truncate(depth);
    }
}

impl Deref for TreePath {
    type Target = [String];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl fmt::Display for TreePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("/"))
    }
}

impl From<Vec<String>> for TreePath {
    fn from(segments: Vec<String>) -> Self {
        Self(segments)
    }
}

impl<S: Into<String>> FromIterator<S> for TreePath {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}
