//! Interactive prompts for authoring, answering and browsing.

use dialoguer::{
    Confirm, FuzzySelect, Input, MultiSelect, Password, Select,
    theme::{ColorfulTheme, SimpleTheme, Theme},
};
use surveyor::{
    AnswerValue, AnsweringSession, Credentials, DraftError, OptionId, OptionSet, Question,
    QuestionId, QuestionKind, ResponseBrowser, SurveyDraft, SurveyError, SurveyId, SurveyListing,
};
use thiserror::Error;

use crate::render;

/// Error type for the Dialoguer frontend.
#[derive(Debug, Error)]
pub enum DialoguerError {
    /// User cancelled (e.g., pressed Ctrl+C or Escape).
    #[error("cancelled by user")]
    Cancelled,

    /// An I/O error occurred during prompting.
    #[error("dialoguer error: {0}")]
    Dialoguer(#[from] dialoguer::Error),

    /// The session refused an operation for a reason the user cannot fix here.
    #[error(transparent)]
    Survey(#[from] SurveyError),
}

impl DialoguerError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

/// Helper to check if a dialoguer error is a cancellation (Ctrl+C / Escape)
fn is_cancelled(err: &dialoguer::Error) -> bool {
    matches!(err, dialoguer::Error::IO(io_err) if io_err.kind() == std::io::ErrorKind::Interrupted)
}

fn prompt_result<T>(result: Result<T, dialoguer::Error>) -> Result<T, DialoguerError> {
    match result {
        Ok(value) => Ok(value),
        Err(e) if is_cancelled(&e) => Err(DialoguerError::Cancelled),
        Err(e) => Err(DialoguerError::Dialoguer(e)),
    }
}

/// What the author chose to do with the draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftAction {
    Submit,
    Discard,
}

const MENU: [&str; 9] = [
    "Set survey title",
    "Add open question",
    "Add closed question",
    "Edit options of a question",
    "Move a question up",
    "Move a question down",
    "Delete a question",
    "Submit survey",
    "Discard survey",
];

/// Dialoguer frontend for the surveyor command line.
#[derive(Debug, Default, Clone)]
pub struct DialoguerBackend {
    /// Use colorful theme for prompts.
    colorful: bool,
}

impl DialoguerBackend {
    /// Create a new Dialoguer backend with default (colorful) theme.
    pub fn new() -> Self {
        Self { colorful: true }
    }

    /// Create a backend with plain (no color) theme.
    pub fn plain() -> Self {
        Self { colorful: false }
    }

    fn theme(&self) -> Box<dyn Theme> {
        if self.colorful {
            Box::new(ColorfulTheme::default())
        } else {
            Box::new(SimpleTheme)
        }
    }

    /// Print an error the way every prompt reports problems.
    pub fn show_error(&self, err: &SurveyError) {
        match err.report() {
            Some(report) => {
                println!("Error/s in the survey form:");
                for issue in report {
                    println!("  {issue}");
                }
            }
            None => println!("Error: {err}"),
        }
    }

    fn ask_text(&self, prompt: &str, allow_empty: bool) -> Result<String, DialoguerError> {
        let theme = self.theme();
        prompt_result(
            Input::<String>::with_theme(&*theme)
                .with_prompt(prompt)
                .allow_empty(allow_empty)
                .interact_text(),
        )
    }

    fn ask_count(&self, prompt: &str, default: u32) -> Result<u32, DialoguerError> {
        let theme = self.theme();
        prompt_result(
            Input::<u32>::with_theme(&*theme)
                .with_prompt(prompt)
                .default(default)
                .interact_text(),
        )
    }

    fn confirm(&self, prompt: &str, default: bool) -> Result<bool, DialoguerError> {
        let theme = self.theme();
        prompt_result(
            Confirm::with_theme(&*theme)
                .with_prompt(prompt)
                .default(default)
                .interact(),
        )
    }

    fn select(&self, prompt: &str, items: &[String]) -> Result<Option<usize>, DialoguerError> {
        let theme = self.theme();
        prompt_result(
            Select::with_theme(&*theme)
                .with_prompt(prompt)
                .items(items)
                .default(0)
                .interact_opt(),
        )
    }

    /// Collect option texts one per line until an empty line.
    fn ask_options(&self) -> Result<OptionSet, DialoguerError> {
        println!("  (Enter options one per line, empty line to finish)");
        let mut options = OptionSet::new();
        loop {
            let text = self.ask_text(&format!("  [{}]", options.count() + 1), true)?;
            if text.is_empty() {
                return Ok(options);
            }
            options.add(text);
        }
    }

    /// Pick a question of the draft, optionally only closed ones.
    fn pick_question(
        &self,
        draft: &SurveyDraft,
        prompt: &str,
        closed_only: bool,
    ) -> Result<Option<QuestionId>, DialoguerError> {
        let candidates: Vec<_> = draft
            .questions()
            .filter(|q| !closed_only || q.question().is_closed())
            .collect();
        if candidates.is_empty() {
            println!("No questions to choose from.");
            return Ok(None);
        }
        let items: Vec<String> = candidates.iter().map(|q| render::question_label(q)).collect();
        Ok(self.select(prompt, &items)?.map(|index| candidates[index].id()))
    }

    /// Run the authoring menu until the author submits or discards.
    ///
    /// Edits are applied to `draft` directly; submitting is up to the caller.
    pub fn edit_draft(&self, draft: &mut SurveyDraft) -> Result<DraftAction, DialoguerError> {
        loop {
            println!();
            print!("{}", render::draft_overview(draft));

            let items: Vec<String> = MENU.iter().map(|s| s.to_string()).collect();
            let Some(choice) = self.select("What next?", &items)? else {
                return Ok(DraftAction::Discard);
            };

            let outcome = match choice {
                0 => {
                    let title = self.ask_text("Survey title (max 100 characters)", true)?;
                    draft.set_title(title)
                }
                1 => {
                    let title = self.ask_text("Question", true)?;
                    let mandatory = self.confirm("Mandatory?", false)?;
                    draft
                        .add_question(Question::open(title, u32::from(mandatory)))
                        .map(|_| ())
                }
                2 => {
                    let title = self.ask_text("Question", true)?;
                    let min = self.ask_count("Minimum number of choices", 0)?;
                    let max = self.ask_count("Maximum number of choices", 1)?;
                    let options = self.ask_options()?;
                    draft
                        .add_question(Question::closed_with_options(title, min, max, options))
                        .map(|_| ())
                }
                3 => match self.pick_question(draft, "Which question?", true)? {
                    Some(id) => self.edit_options(draft, id)?,
                    None => Ok(()),
                },
                4 | 5 => match self.pick_question(draft, "Which question?", false)? {
                    Some(id) => {
                        let position = draft.question(id).map_or(0, |q| q.position());
                        let moved = if choice == 4 {
                            draft.move_up(position)
                        } else {
                            draft.move_down(position)
                        };
                        if let Ok(false) = moved {
                            println!("That question cannot move further.");
                        }
                        moved.map(|_| ())
                    }
                    None => Ok(()),
                },
                6 => match self.pick_question(draft, "Delete which question?", false)? {
                    Some(id) => {
                        if self.confirm("Really delete?", false)? {
                            draft.delete_question(id).map(|_| ())
                        } else {
                            Ok(())
                        }
                    }
                    None => Ok(()),
                },
                7 => return Ok(DraftAction::Submit),
                _ => {
                    if self.confirm("Discard this survey?", false)? {
                        return Ok(DraftAction::Discard);
                    }
                    Ok(())
                }
            };

            if let Err(err) = outcome {
                println!("Error: {err}");
            }
        }
    }

    fn edit_options(
        &self,
        draft: &mut SurveyDraft,
        id: QuestionId,
    ) -> Result<Result<(), DraftError>, DialoguerError> {
        let items: Vec<String> = ["Add option", "Edit option", "Remove option"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let Some(action) = self.select("Options", &items)? else {
            return Ok(Ok(()));
        };

        if action == 0 {
            let text = self.ask_text("Option text", true)?;
            return Ok(draft.add_option(id, text).map(|_| ()));
        }

        let choices: Vec<(OptionId, String)> = draft
            .question(id)
            .and_then(|q| q.question().options())
            .map(|options| {
                options
                    .iter()
                    .map(|c| (c.id(), format!("{}) {}", c.position(), c.text())))
                    .collect()
            })
            .unwrap_or_default();
        if choices.is_empty() {
            println!("This question has no options yet.");
            return Ok(Ok(()));
        }
        let labels: Vec<String> = choices.iter().map(|(_, label)| label.clone()).collect();
        let Some(index) = self.select("Which option?", &labels)? else {
            return Ok(Ok(()));
        };
        let option = choices[index].0;

        if action == 1 {
            let text = self.ask_text("New text", true)?;
            Ok(draft.edit_option(id, option, text).map(|_| ()))
        } else {
            Ok(draft.remove_option(id, option).map(|_| ()))
        }
    }

    fn ask_closed(&self, prompt: &str, question: &Question) -> Result<Vec<u32>, DialoguerError> {
        let theme = self.theme();
        let items: Vec<String> = question
            .options()
            .into_iter()
            .flatten()
            .map(|choice| choice.text().to_string())
            .collect();

        if question.is_single_choice() {
            let mut select = Select::with_theme(&*theme).with_prompt(prompt).items(&items);
            if !question.is_mandatory() {
                select = select.item("(no answer)");
            }
            let index = prompt_result(select.default(0).interact())?;
            if index >= items.len() {
                return Ok(Vec::new());
            }
            return Ok(vec![position_of(index)]);
        }

        let indices = prompt_result(
            MultiSelect::with_theme(&*theme)
                .with_prompt(prompt)
                .items(&items)
                .interact(),
        )?;
        Ok(indices.into_iter().map(position_of).collect())
    }

    /// Walk a loaded session through every question.
    ///
    /// Invalid answers are reported and the same question is asked again.
    pub fn answer(&self, session: &mut AnsweringSession) -> Result<(), DialoguerError> {
        println!("You cannot go back to previous questions!");
        while let Some(current) = session.current().cloned() {
            let total = session.questions().len();
            let marker = if current.question.is_mandatory() { " *" } else { "" };
            println!();
            println!(
                "#{} of {total}: {}{marker}",
                current.position,
                current.question.title()
            );
            println!("{}", render::answer_hint(&current.question));

            let value = match current.question.kind() {
                QuestionKind::Open => AnswerValue::Text(self.ask_text("Answer", true)?),
                QuestionKind::Closed(_) => {
                    AnswerValue::Choices(self.ask_closed("Choose", &current.question)?)
                }
            };

            match session.answer(value) {
                Ok(()) => {}
                Err(err) if err.is_validation() => self.show_error(&err),
                Err(err) => return Err(err.into()),
            }
        }
        Ok(())
    }

    /// Ask for the respondent's name.
    pub fn ask_name(&self) -> Result<String, DialoguerError> {
        self.ask_text("Your name (max 25 characters)", true)
    }

    /// Ask for administrator credentials.
    pub fn login(&self) -> Result<Credentials, DialoguerError> {
        let username = self.ask_text("Username", false)?;
        let theme = self.theme();
        let password = prompt_result(
            Password::with_theme(&*theme)
                .with_prompt("Password")
                .interact(),
        )?;
        Ok(Credentials::new(username, password))
    }

    /// Print a listing without asking anything.
    pub fn show_listing(&self, listing: &SurveyListing) {
        if listing.is_empty() {
            println!("No surveys yet.");
        }
        for (id, item) in listing.ids().into_iter().zip(render::listing_items(listing)) {
            println!("{id:>4}  {item}");
        }
    }

    /// Let the user pick a survey. `None` if they escaped or there is nothing.
    pub fn pick_survey(&self, listing: &SurveyListing) -> Result<Option<SurveyId>, DialoguerError> {
        if listing.is_empty() {
            println!("No surveys yet.");
            return Ok(None);
        }
        let theme = self.theme();
        let items = render::listing_items(listing);
        let index = prompt_result(
            FuzzySelect::with_theme(&*theme)
                .with_prompt("Survey")
                .items(&items)
                .default(0)
                .interact_opt(),
        )?;
        Ok(index.and_then(|index| listing.ids().get(index).copied()))
    }

    /// Page through responses until the user goes back.
    pub fn browse_responses(&self, browser: &mut ResponseBrowser) -> Result<(), DialoguerError> {
        loop {
            println!();
            print!("{}", render::response_page(browser));

            let mut items = Vec::new();
            if browser.has_previous() {
                items.push("Previous response".to_string());
            }
            if browser.has_next() {
                items.push("Next response".to_string());
            }
            items.push("Back".to_string());

            let Some(index) = self.select("Navigate", &items)? else {
                return Ok(());
            };
            match items[index].as_str() {
                "Previous response" => {
                    browser.previous_response();
                }
                "Next response" => {
                    browser.next_response();
                }
                _ => return Ok(()),
            }
        }
    }
}

/// Menu index to 1-based option position.
fn position_of(index: usize) -> u32 {
    u32::try_from(index + 1).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_creation() {
        let _backend = DialoguerBackend::new();
        let _plain = DialoguerBackend::plain();
    }

    #[test]
    fn error_types() {
        let err = DialoguerError::Cancelled;
        assert!(err.is_cancelled());
        assert_eq!(err.to_string(), "cancelled by user");

        let err = DialoguerError::from(SurveyError::InFlight);
        assert!(!err.is_cancelled());
        assert_eq!(err.to_string(), "a submission is already in flight");
    }

    #[test]
    fn interrupted_io_is_a_cancellation() {
        let err = dialoguer::Error::IO(std::io::Error::from(std::io::ErrorKind::Interrupted));
        assert!(matches!(prompt_result::<()>(Err(err)), Err(DialoguerError::Cancelled)));

        let err = dialoguer::Error::IO(std::io::Error::from(std::io::ErrorKind::BrokenPipe));
        assert!(matches!(
            prompt_result::<()>(Err(err)),
            Err(DialoguerError::Dialoguer(_))
        ));
    }

    #[test]
    fn menu_positions_are_one_based() {
        assert_eq!(position_of(0), 1);
        assert_eq!(position_of(2), 3);
    }
}
