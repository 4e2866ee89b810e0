use crate::{Field, Limits, OptionSet, ValidationReport, limits};

/// A single survey question.
///
/// `min` is the fewest options a respondent must pick (closed questions) or a
/// mandatory flag (open questions, 0 or 1). Constructors accept any values so
/// that an author can pass through inconsistent intermediate states; use
/// [`Question::validate`] to check the question before it is submitted.
#[derive(Debug, Clone, PartialEq)]
pub struct Question {
    /// The text shown to the respondent.
    title: String,

    /// Lower bound on selections, or the mandatory flag for open questions.
    min: u32,

    /// Open (free text) or closed (pick from options).
    kind: QuestionKind,
}

impl Question {
    /// Create an open (free text) question.
    pub fn open(title: impl Into<String>, min: u32) -> Self {
        Self {
            title: title.into(),
            min,
            kind: QuestionKind::Open,
        }
    }

    /// Create a closed question with no options yet.
    pub fn closed(title: impl Into<String>, min: u32, max: u32) -> Self {
        Self::closed_with_options(title, min, max, OptionSet::new())
    }

    /// Create a closed question with the given options.
    pub fn closed_with_options(
        title: impl Into<String>,
        min: u32,
        max: u32,
        options: OptionSet,
    ) -> Self {
        Self {
            title: title.into(),
            min,
            kind: QuestionKind::Closed(ClosedQuestion { max, options }),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn min(&self) -> u32 {
        self.min
    }

    pub fn set_min(&mut self, min: u32) {
        self.min = min;
    }

    /// Upper bound on selections; `None` for open questions.
    pub fn max(&self) -> Option<u32> {
        match &self.kind {
            QuestionKind::Open => None,
            QuestionKind::Closed(closed) => Some(closed.max),
        }
    }

    /// Set the upper bound. Returns `false` for open questions, which have none.
    pub fn set_max(&mut self, max: u32) -> bool {
        match &mut self.kind {
            QuestionKind::Open => false,
            QuestionKind::Closed(closed) => {
                closed.max = max;
                true
            }
        }
    }

    pub fn kind(&self) -> &QuestionKind {
        &self.kind
    }

    /// The options of a closed question.
    pub fn options(&self) -> Option<&OptionSet> {
        match &self.kind {
            QuestionKind::Open => None,
            QuestionKind::Closed(closed) => Some(&closed.options),
        }
    }

    /// The options of a closed question, for editing.
    pub fn options_mut(&mut self) -> Option<&mut OptionSet> {
        match &mut self.kind {
            QuestionKind::Open => None,
            QuestionKind::Closed(closed) => Some(&mut closed.options),
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self.kind, QuestionKind::Open)
    }

    pub fn is_closed(&self) -> bool {
        !self.is_open()
    }

    /// Check if a respondent has to answer this question.
    pub fn is_mandatory(&self) -> bool {
        self.min > 0
    }

    /// Closed questions allowing at most one selection are presented as a
    /// single choice (radio buttons) rather than a multi-select.
    pub fn is_single_choice(&self) -> bool {
        self.max() == Some(1)
    }

    /// Submission-time checks for a question sitting at `position`.
    ///
    /// All violated clauses are reported, not just the first.
    pub fn validate(&self, position: u32, limits: &Limits) -> ValidationReport {
        let mut report = ValidationReport::new();
        let field = Field::Question(position);

        if self.title.trim().is_empty() {
            report.push(field, "title cannot be empty");
        }
        if limits::exceeds(&self.title, limits.question_title_max) {
            report.push(
                field,
                format!(
                    "title is too long (max {} characters)",
                    limits.question_title_max
                ),
            );
        }

        match &self.kind {
            QuestionKind::Open => {
                if self.min > 1 {
                    report.push(field, "min must be 0 (optional) or 1 (mandatory)");
                }
            }
            QuestionKind::Closed(closed) => {
                let count = u32::try_from(closed.options.count()).unwrap_or(u32::MAX);
                if closed.max == 0 {
                    report.push(field, "max value cannot be 0");
                }
                if self.min > closed.max {
                    report.push(field, "min value cannot be greater than max value");
                }
                if count == 0 {
                    report.push(field, "number of options cannot be 0");
                }
                if count < self.min {
                    report.push(field, "number of options cannot be less than the min value");
                }
                if count < closed.max {
                    report.push(field, "number of options cannot be less than the max value");
                }
                for choice in &closed.options {
                    if choice.text().trim().is_empty() {
                        report.push(
                            Field::Option {
                                question: position,
                                option: choice.position(),
                            },
                            "cannot be empty",
                        );
                    }
                }
            }
        }

        report
    }

    /// Check the submission-time predicate.
    pub fn is_valid(&self, limits: &Limits) -> bool {
        self.validate(1, limits).is_empty()
    }
}

/// The kind of question, determining how it is answered.
#[derive(Debug, Clone, PartialEq)]
pub enum QuestionKind {
    /// Free text; a single text value.
    Open,

    /// Pick between `min` and `max` of the options.
    Closed(ClosedQuestion),
}

/// Configuration for a closed question.
#[derive(Debug, Clone, PartialEq)]
pub struct ClosedQuestion {
    /// The most options a respondent may pick.
    pub max: u32,

    /// The options, in presentation order.
    pub options: OptionSet,
}
