/// Panel that receives key events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Focus {
    Logs,
    Search,
    Inspect,
}

/// Text typed into the search bar.
///
/// Every edit reports whether the text changed, so unchanged keystrokes do
/// not refilter or start a load.
#[derive(Debug, Default)]
pub(crate) struct SearchInput {
    text: String,
}

impl SearchInput {
    pub(crate) fn as_str(&self) -> &str {
        &self.text
    }

    pub(crate) fn push(&mut self, c: char) -> bool {
        if c.is_control() {
            return false;
        }
        self.text.push(c);
        true
    }

    pub(crate) fn pop(&mut self) -> bool {
        self.text.pop().is_some()
    }

    pub(crate) fn clear(&mut self) -> bool {
        let changed = !self.text.is_empty();
        self.text.clear();
        changed
    }
}
