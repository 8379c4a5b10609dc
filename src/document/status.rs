//! Document name and modification state

/// Name and modified flag shared by every kind of document
///
/// The setters return `true` when the status actually changed, which is the
/// signal a front-end uses to refresh a title or status line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentStatus {
    name: Option<String>,
    modified: bool,
}

impl DocumentStatus {
    /// An unnamed, unmodified document
    pub fn new() -> Self {
        Self::default()
    }

    /// A named, unmodified document
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            modified: false,
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// Rename the document. Renaming never marks it modified.
    pub fn set_name(&mut self, name: impl Into<Option<String>>) -> bool {
        let name = name.into();
        if self.name == name {
            return false;
        }
        self.name = name;
        true
    }

    pub fn set_modified(&mut self, modified: bool) -> bool {
        if self.modified == modified {
            return false;
        }
        self.modified = modified;
        true
    }
}

/// A document that can be created, loaded, modified and saved
pub trait Document {
    fn status(&self) -> &DocumentStatus;

    fn status_mut(&mut self) -> &mut DocumentStatus;

    fn name(&self) -> Option<&str> {
        self.status().name()
    }

    fn is_modified(&self) -> bool {
        self.status().is_modified()
    }
}
