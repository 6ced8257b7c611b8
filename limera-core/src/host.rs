/// Capabilities the host document exposes to the tutoring core.
///
/// The core never depends on a concrete UI toolkit; a Docs-style add-on, a
/// desktop app, or a terminal front end each supply their own
/// implementation.
pub trait HostDocument: Send + Sync {
    /// Open the assistant panel with the given title.
    fn show_panel(&self, title: &str);

    /// Append text to the end of the document body.
    fn append_text(&self, text: &str);

    /// Show a message to the writer.
    fn alert(&self, message: &str);
}
