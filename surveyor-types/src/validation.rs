use std::fmt;

/// The part of a survey or response a validation issue refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// The survey as a whole (e.g. it has no questions).
    Survey,

    /// The survey title.
    SurveyTitle,

    /// The question at the given position.
    Question(u32),

    /// An option of the question at `question`, by option position.
    Option { question: u32, option: u32 },

    /// The respondent's name.
    RespondentName,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Survey => write!(f, "survey"),
            Self::SurveyTitle => write!(f, "survey title"),
            Self::Question(position) => write!(f, "question {position}"),
            Self::Option { question, option } => write!(f, "question {question} option #{option}"),
            Self::RespondentName => write!(f, "name"),
        }
    }
}

/// A single violated clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    pub field: Field,
    pub message: String,
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Every violated clause found in one validation pass, in discovery order.
///
/// Validation never stops at the first problem; the report renders as one
/// issue per line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self { issues: Vec::new() }
    }

    /// Record a violated clause.
    pub fn push(&mut self, field: Field, message: impl Into<String>) {
        self.issues.push(ValidationIssue {
            field,
            message: message.into(),
        });
    }

    /// Append every issue of another report.
    pub fn extend(&mut self, other: ValidationReport) {
        self.issues.extend(other.issues);
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    pub fn issues(&self) -> &[ValidationIssue] {
        &self.issues
    }

    /// Issues recorded against one field.
    pub fn for_field(&self, field: Field) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(move |issue| issue.field == field)
    }

    /// Check whether any issue refers to `field`.
    pub fn mentions(&self, field: Field) -> bool {
        self.for_field(field).next().is_some()
    }

    /// `Ok(())` when nothing was recorded, the report itself otherwise.
    pub fn into_result(self) -> Result<(), ValidationReport> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, issue) in self.issues.iter().enumerate() {
            if index > 0 {
                writeln!(f)?;
            }
            write!(f, "{issue}")?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a ValidationReport {
    type Item = &'a ValidationIssue;
    type IntoIter = std::slice::Iter<'a, ValidationIssue>;

    fn into_iter(self) -> Self::IntoIter {
        self.issues.iter()
    }
}
