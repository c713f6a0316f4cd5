use std::fmt;

type Action = Box<dyn FnMut() -> anyhow::Result<()>>;

/// An undoable unit of work: a forward action and its inverse.
///
/// The history trusts that `undo` reverses `execute`; nothing checks it.
pub struct Command {
    label: Option<String>,
    execute: Action,
    undo: Action,
}

impl Command {
    pub fn new(
        execute: impl FnMut() -> anyhow::Result<()> + 'static,
        undo: impl FnMut() -> anyhow::Result<()> + 'static,
    ) -> Self {
        Self {
            label: None,
            execute: Box::new(execute),
            undo: Box::new(undo),
        }
    }

    pub fn labeled(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub(crate) fn run_execute(&mut self) -> anyhow::Result<()> {
        (self.execute)()
    }

    pub(crate) fn run_undo(&mut self) -> anyhow::Result<()> {
        (self.undo)()
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}
