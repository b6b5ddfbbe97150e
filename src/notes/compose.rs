use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ComposeError {
    #[error("Note title cannot be empty")]
    MissingTitle,

    #[error("Note content cannot be empty")]
    MissingContent,
}

/// A title and content pair that passed validation
///
/// The only way to obtain one is [`Submission::new`] (or
/// [`ComposeForm::submission`]), so a submitted note can never lack either
/// field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    title: String,
    content: String,
}

impl Submission {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Result<Self, ComposeError> {
        let title = title.into();
        let content = content.into();

        if title.trim().is_empty() {
            return Err(ComposeError::MissingTitle);
        }
        if content.trim().is_empty() {
            return Err(ComposeError::MissingContent);
        }

        Ok(Self {
            title: title.trim().to_string(),
            content,
        })
    }

    pub fn into_parts(self) -> (String, String) {
        (self.title, self.content)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ComposeField {
    #[default]
    Title,
    Content,
}

/// Uncommitted drafts of the new-note form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComposeForm {
    pub title: String,
    pub content: String,
    pub focus: ComposeField,
}

impl ComposeForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            ComposeField::Title => ComposeField::Content,
            ComposeField::Content => ComposeField::Title,
        };
    }

    fn focused_mut(&mut self) -> &mut String {
        match self.focus {
            ComposeField::Title => &mut self.title,
            ComposeField::Content => &mut self.content,
        }
    }

    pub fn insert_char(&mut self, c: char) {
        self.focused_mut().push(c);
    }

    pub fn backspace(&mut self) {
        self.focused_mut().pop();
    }

    /// Enter moves from the single-line title to the content, where it breaks lines
    pub fn newline(&mut self) {
        match self.focus {
            ComposeField::Title => self.focus = ComposeField::Content,
            ComposeField::Content => self.content.push('\n'),
        }
    }

    pub fn submission(&self) -> Result<Submission, ComposeError> {
        Submission::new(self.title.clone(), self.content.clone())
    }
}
