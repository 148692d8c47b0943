/// Parameters of a single thread start.
///
/// The default requests the platform's default stack size and no name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ThreadOptions {
    /// Requested stack size in bytes, 0 for the platform default.
    pub stack_size: usize,

    /// Name shown by debuggers and profilers.
    pub name: Option<String>,
}

impl ThreadOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the requested stack size in bytes.
    pub fn stack_size(mut self, stack_size: usize) -> Self {
        self.stack_size = stack_size;
        self
    }

    /// Sets the thread name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}
