use crate::{NotFound, OptionId, Positioned, Ranked};

/// One selectable answer of a closed question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    id: OptionId,
    text: String,
    position: u32,
}

impl Choice {
    pub fn id(&self) -> OptionId {
        self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn position(&self) -> u32 {
        self.position
    }
}

impl Positioned for Choice {
    fn position(&self) -> u32 {
        self.position
    }

    fn set_position(&mut self, position: u32) {
        self.position = position;
    }
}

/// The ordered options of a closed question.
///
/// Positions are always `1..=count()`. Option text is not checked here:
/// empty text is a legal intermediate editing state and is only rejected
/// when the survey is submitted.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OptionSet {
    choices: Ranked<Choice>,
    next_id: u32,
}

impl OptionSet {
    /// Create an empty option set.
    pub fn new() -> Self {
        Self {
            choices: Ranked::new(),
            next_id: 1,
        }
    }

    /// Create an option set with one option per text, in order.
    pub fn from_texts<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut set = Self::new();
        for text in texts {
            set.add(text);
        }
        set
    }

    /// Append an option at the next position.
    pub fn add(&mut self, text: impl Into<String>) -> OptionId {
        // `Default` leaves the counter at zero.
        let id = OptionId::new(self.next_id.max(1));
        self.next_id = id.get() + 1;
        self.choices.push(Choice {
            id,
            text: text.into(),
            position: 0,
        });
        id
    }

    /// Replace the text of an option.
    ///
    /// Ids are handed out by this set, so a miss is ignored; the return value
    /// reports whether anything was changed.
    pub fn edit(&mut self, id: OptionId, text: impl Into<String>) -> bool {
        match self.choices.find_mut(|choice| choice.id == id) {
            Some(choice) => {
                choice.text = text.into();
                true
            }
            None => false,
        }
    }

    /// Remove an option; every later option moves up one position.
    pub fn remove(&mut self, id: OptionId) -> Result<Choice, NotFound> {
        self.choices
            .remove_first(|choice| choice.id == id)
            .ok_or(NotFound::Option(id))
    }

    pub fn count(&self) -> usize {
        self.choices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.choices.is_empty()
    }

    /// Get an option by id.
    pub fn get(&self, id: OptionId) -> Option<&Choice> {
        self.choices.find(|choice| choice.id == id)
    }

    /// Get an option by its 1-based position.
    pub fn at(&self, position: u32) -> Option<&Choice> {
        self.choices.get(position)
    }

    /// Iterate in position order.
    pub fn iter(&self) -> std::slice::Iter<'_, Choice> {
        self.choices.iter()
    }

    /// Check the positions invariant.
    pub fn is_contiguous(&self) -> bool {
        self.choices.is_contiguous()
    }
}

impl<'a> IntoIterator for &'a OptionSet {
    type Item = &'a Choice;
    type IntoIter = std::slice::Iter<'a, Choice>;

    fn into_iter(self) -> Self::IntoIter {
        self.choices.iter()
    }
}
