//! Rate limiting for repeated polling errors.

/// Remembers the last reported error so an identical one is not logged on
/// every tick.
#[derive(Debug, Default)]
pub struct ErrorMemo {
    last: Option<String>,
}

impl ErrorMemo {
    /// Log `text` at error level unless it matches the last reported text.
    ///
    /// Returns whether the error was actually reported.
    pub fn report(&mut self, text: impl Into<String>) -> bool {
        let text = text.into();
        if self.last.as_deref() == Some(text.as_str()) {
            tracing::debug!(error = %text, "suppressing repeated error");
            return false;
        }
        tracing::error!("{text}");
        self.last = Some(text);
        true
    }

    /// Forget the last reported error.
    pub fn clear(&mut self) {
        self.last = None;
    }

    #[must_use]
    pub fn last(&self) -> Option<&str> {
        self.last.as_deref()
    }
}
