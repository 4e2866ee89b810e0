//! Plain-text rendering shared by the prompts.

use std::fmt::Write;

use surveyor::{
    DraftQuestion, Question, QuestionKind, ResponseBrowser, RowAnswer, SurveyDraft,
    SurveyListing,
};

/// One-line description of how a question is answered.
pub fn answer_hint(question: &Question) -> String {
    match question.kind() {
        QuestionKind::Open if question.is_mandatory() => "Open question (mandatory)".to_string(),
        QuestionKind::Open => "Open question (optional)".to_string(),
        QuestionKind::Closed(closed) => format!(
            "You {} choose a min of {} to a max of {} option/s",
            if question.is_mandatory() { "must" } else { "may" },
            question.min(),
            closed.max
        ),
    }
}

/// Menu label for a question in a draft.
pub fn question_label(question: &DraftQuestion) -> String {
    let inner = question.question();
    let title = if inner.title().is_empty() {
        "(untitled)"
    } else {
        inner.title()
    };
    let kind = match inner.max() {
        None => "open".to_string(),
        Some(max) => format!("closed {}..{}", inner.min(), max),
    };
    format!("{}. {title} [{kind}]", question.position())
}

/// The whole draft, for display between edits.
pub fn draft_overview(draft: &SurveyDraft) -> String {
    let mut out = String::new();
    let title = if draft.title().is_empty() {
        "(untitled survey)"
    } else {
        draft.title()
    };
    let _ = writeln!(out, "{title}");
    if draft.is_empty() {
        let _ = writeln!(out, "  no questions yet");
    }
    for question in draft.questions() {
        let _ = writeln!(out, "  {}", question_label(question));
        for choice in question.question().options().into_iter().flatten() {
            let _ = writeln!(out, "     {}) {}", choice.position(), choice.text());
        }
    }
    out
}

/// Menu items for a survey listing, in listing order.
pub fn listing_items(listing: &SurveyListing) -> Vec<String> {
    match listing {
        SurveyListing::Public(surveys) => surveys
            .iter()
            .map(|s| format!("{} (by {})", s.title, s.admin_name))
            .collect(),
        SurveyListing::Owned(surveys) => surveys
            .iter()
            .map(|s| {
                let noun = if s.num_answers == 1 { "response" } else { "responses" };
                format!("{} ({} {noun})", s.title, s.num_answers)
            })
            .collect(),
    }
}

/// The current response of a browser.
pub fn response_page(browser: &ResponseBrowser) -> String {
    let mut out = String::new();
    let current = browser.current();
    let _ = writeln!(
        out,
        "Response #{}/{} by {}",
        browser.index() + 1,
        browser.len(),
        current.response.name
    );
    for row in browser.rows() {
        let _ = writeln!(
            out,
            "  #{} {}",
            row.question.position,
            row.question.question.title()
        );
        match row.answer {
            RowAnswer::Skipped => {
                let _ = writeln!(out, "     (did not answer)");
            }
            RowAnswer::Text(text) => {
                let _ = writeln!(out, "     {text}");
            }
            RowAnswer::Choices(choices) => {
                for (choice, selected) in choices {
                    let mark = if selected { "x" } else { " " };
                    let _ = writeln!(out, "     [{mark}] {}", choice.text());
                }
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use surveyor::{
        Answer, OptionSet, OwnedSurveySummary, PublishedQuestion, PublishedResponse, Response,
        SurveyId, SurveySummary,
    };

    #[test]
    fn hints() {
        assert_eq!(answer_hint(&Question::open("Why?", 1)), "Open question (mandatory)");
        assert_eq!(
            answer_hint(&Question::closed("Pick", 0, 2)),
            "You may choose a min of 0 to a max of 2 option/s"
        );
        assert_eq!(
            answer_hint(&Question::closed("Pick", 1, 1)),
            "You must choose a min of 1 to a max of 1 option/s"
        );
    }

    #[test]
    fn overview_lists_questions_and_options() {
        let mut draft = SurveyDraft::new();
        draft.set_title("Pets").unwrap();
        draft
            .add_question(Question::closed_with_options(
                "Favorite animal?",
                1,
                1,
                OptionSet::from_texts(["Cat", "Dog"]),
            ))
            .unwrap();
        draft.add_question(Question::open("", 0)).unwrap();

        assert_eq!(
            draft_overview(&draft),
            "Pets\n  1. Favorite animal? [closed 1..1]\n     1) Cat\n     2) Dog\n  2. (untitled) [open]\n"
        );
    }

    #[test]
    fn listings() {
        let public = SurveyListing::Public(vec![SurveySummary {
            id: SurveyId::new(1),
            title: "Pets".into(),
            admin_name: "Ann".into(),
        }]);
        assert_eq!(listing_items(&public), vec!["Pets (by Ann)"]);

        let owned = SurveyListing::Owned(vec![OwnedSurveySummary {
            id: SurveyId::new(1),
            title: "Pets".into(),
            num_answers: 1,
        }]);
        assert_eq!(listing_items(&owned), vec!["Pets (1 response)"]);
    }

    #[test]
    fn response_page_marks_selections() {
        let browser = ResponseBrowser::from_parts(
            vec![
                PublishedQuestion {
                    id: 1,
                    position: 1,
                    question: Question::closed_with_options(
                        "Pet?",
                        1,
                        1,
                        OptionSet::from_texts(["Cat", "Dog"]),
                    ),
                },
                PublishedQuestion {
                    id: 2,
                    position: 2,
                    question: Question::open("Why?", 0),
                },
            ],
            vec![PublishedResponse {
                id: 3,
                response: Response::new("Bob", vec![Answer::new(1, vec![2])]),
            }],
        )
        .unwrap();

        assert_eq!(
            response_page(&browser),
            "Response #1/1 by Bob\n  #1 Pet?\n     [ ] Cat\n     [x] Dog\n  #2 Why?\n     (did not answer)\n"
        );
    }
}
