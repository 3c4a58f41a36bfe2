//! The project form (input controller).

use std::sync::{Arc, Mutex};

use thiserror::Error;

use projboard_core::Validatable;
use projboard_projects::ProjectId;
use projboard_state::ProjectState;

use crate::component::Component;
use crate::error::BoardError;
use crate::host::{ElementRef, HostError, InsertPosition, RenderHost};

/// Message shown when a submission is rejected.
pub const INVALID_INPUT_MESSAGE: &str = "Invalid input, please try again!";

const MIN_TEXT_LENGTH: usize = 5;
const MIN_PEOPLE: f64 = 1.0;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum InputField {
    Title,
    Description,
    People,
}

impl InputField {
    pub fn as_str(&self) -> &'static str {
        match self {
            InputField::Title => "title",
            InputField::Description => "description",
            InputField::People => "people",
        }
    }
}

impl core::fmt::Display for InputField {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("invalid input in {}", join_fields(fields))]
    Invalid { fields: Vec<InputField> },
}

fn join_fields(fields: &[InputField]) -> String {
    fields
        .iter()
        .map(InputField::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Field values exactly as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawInput {
    pub title: String,
    pub description: String,
    pub people: String,
}

/// Input that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserInput {
    pub title: String,
    pub description: String,
    pub people: u32,
}

/// Numeric reading of a form field: blank is 0, garbage is NaN.
fn parse_number(raw: &str) -> f64 {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    trimmed.parse().unwrap_or(f64::NAN)
}

fn whole_count(n: f64) -> Option<u32> {
    (n.is_finite() && n.fract() == 0.0 && n >= 0.0 && n <= f64::from(u32::MAX)).then_some(n as u32)
}

impl RawInput {
    /// Check every field; on success the people count is converted to a number.
    ///
    /// All three fields are checked so the error names each failing one.
    pub fn validate(&self) -> Result<UserInput, InputError> {
        let people = parse_number(&self.people);

        let checks = [
            (
                InputField::Title,
                Validatable::text(self.title.as_str())
                    .required()
                    .min_length(MIN_TEXT_LENGTH),
            ),
            (
                InputField::Description,
                Validatable::text(self.description.as_str())
                    .required()
                    .min_length(MIN_TEXT_LENGTH),
            ),
            (
                InputField::People,
                Validatable::number(people).required().min(MIN_PEOPLE),
            ),
        ];

        let mut fields: Vec<InputField> = checks
            .iter()
            .filter(|(_, check)| !check.is_valid())
            .map(|(field, _)| *field)
            .collect();

        let count = whole_count(people);
        if count.is_none() && !fields.contains(&InputField::People) {
            fields.push(InputField::People);
        }

        match count {
            Some(people) if fields.is_empty() => Ok(UserInput {
                title: self.title.clone(),
                description: self.description.clone(),
                people,
            }),
            _ => Err(InputError::Invalid { fields }),
        }
    }
}

/// The form: three fields and a submit gesture.
pub struct ProjectInput<H> {
    host: Arc<Mutex<H>>,
    state: Arc<ProjectState>,
    component: Component,
    title: ElementRef,
    description: ElementRef,
    people: ElementRef,
}

impl<H> ProjectInput<H>
where
    H: RenderHost,
{
    /// Mount the form at the start of `app` as `#user-input`.
    pub fn new(host: Arc<Mutex<H>>, state: Arc<ProjectState>) -> Result<Self, BoardError> {
        let (component, title, description, people) = {
            let mut h = host.lock().map_err(|_| HostError::Poisoned)?;
            let component = Component::mount(
                &mut *h,
                "project-input",
                "app",
                InsertPosition::AfterBegin,
                Some("user-input"),
            )?;
            let root = component.element();
            (
                component,
                h.require_id(root, "title")?,
                h.require_id(root, "description")?,
                h.require_id(root, "people")?,
            )
        };

        Ok(Self {
            host,
            state,
            component,
            title,
            description,
            people,
        })
    }

    pub fn component(&self) -> &Component {
        &self.component
    }

    /// Type into the three fields.
    pub fn fill(&self, title: &str, description: &str, people: &str) -> Result<(), BoardError> {
        let mut host = self.host.lock().map_err(|_| HostError::Poisoned)?;
        host.set_value(self.title, title)?;
        host.set_value(self.description, description)?;
        host.set_value(self.people, people)?;
        Ok(())
    }

    pub fn raw_input(&self) -> Result<RawInput, BoardError> {
        let host = self.host.lock().map_err(|_| HostError::Poisoned)?;
        Ok(self.read_fields(&*host)?)
    }

    fn read_fields(&self, host: &H) -> Result<RawInput, HostError> {
        Ok(RawInput {
            title: host.value(self.title)?,
            description: host.value(self.description)?,
            people: host.value(self.people)?,
        })
    }

    fn clear_inputs(&self) -> Result<(), BoardError> {
        self.fill("", "", "")
    }

    /// Validate the fields and add the project.
    ///
    /// On invalid input the user is alerted, the fields are left as typed and
    /// nothing reaches the store. On success the fields are cleared.
    pub fn submit(&self) -> Result<ProjectId, BoardError> {
        let input = {
            let mut host = self.host.lock().map_err(|_| HostError::Poisoned)?;
            let raw = self.read_fields(&*host)?;
            match raw.validate() {
                Ok(input) => input,
                Err(err) => {
                    tracing::warn!(error = %err, "project submission rejected");
                    host.alert(INVALID_INPUT_MESSAGE);
                    return Err(err.into());
                }
            }
        };

        let id = self
            .state
            .add_project(input.title, input.description, input.people)?;
        self.clear_inputs()?;
        Ok(id)
    }
}

impl<H> core::fmt::Debug for ProjectInput<H> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ProjectInput")
            .field("component", &self.component)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;
    use proptest::prelude::*;

    fn raw(title: &str, description: &str, people: &str) -> RawInput {
        RawInput {
            title: title.into(),
            description: description.into(),
            people: people.into(),
        }
    }

    fn setup() -> (Arc<Mutex<Document>>, Arc<ProjectState>, ProjectInput<Document>) {
        let host = Arc::new(Mutex::new(Document::with_board_templates()));
        let state = ProjectState::shared();
        let input = ProjectInput::new(host.clone(), state.clone()).unwrap();
        (host, state, input)
    }

    #[test]
    fn valid_input_converts_people() {
        let input = raw("Build API", "Design REST endpoints", " 3 ").validate().unwrap();
        assert_eq!(input.people, 3);
        assert_eq!(input.title, "Build API");
    }

    #[test]
    fn every_failing_field_is_named() {
        let err = raw("abcd", "    ", "0").validate().unwrap_err();
        assert_eq!(
            err,
            InputError::Invalid {
                fields: vec![InputField::Title, InputField::Description, InputField::People]
            }
        );
        assert_eq!(err.to_string(), "invalid input in title, description, people");
    }

    #[test]
    fn people_must_be_a_whole_positive_number() {
        for people in ["", "   ", "abc", "0", "-2", "2.5", "inf", "NaN", "1e12"] {
            let err = raw("Build API", "Design REST endpoints", people).validate().unwrap_err();
            assert_eq!(
                err,
                InputError::Invalid { fields: vec![InputField::People] },
                "people = {people:?}"
            );
        }
        assert_eq!(raw("Build API", "Design REST endpoints", "1").validate().unwrap().people, 1);
        assert_eq!(raw("Build API", "Design REST endpoints", "4.0").validate().unwrap().people, 4);
    }

    #[test]
    fn new_mounts_form_first_in_app() {
        let (host, _state, input) = setup();
        let doc = host.lock().unwrap();
        let app = doc.element_by_id("app").unwrap();
        assert_eq!(doc.children(app).first(), Some(&input.component().element()));
        assert_eq!(doc.element_by_id("user-input"), Some(input.component().element()));
    }

    #[test]
    fn submit_adds_project_and_clears_fields() {
        let (host, state, input) = setup();
        input.fill("Build API", "Design REST endpoints", "3").unwrap();

        let id = input.submit().unwrap();

        let project = state.get(id).unwrap().unwrap();
        assert_eq!(project.people(), 3);
        assert_eq!(input.raw_input().unwrap(), RawInput::default());
        assert!(host.lock().unwrap().alerts().is_empty());
    }

    #[test]
    fn rejected_submit_alerts_and_keeps_fields() {
        let (host, state, input) = setup();
        input.fill("Build", "Tiny", "2").unwrap();

        let err = input.submit().unwrap_err();

        assert!(matches!(
            err,
            BoardError::Input(InputError::Invalid { ref fields }) if fields == &[InputField::Description]
        ));
        assert!(state.is_empty());
        assert_eq!(input.raw_input().unwrap(), raw("Build", "Tiny", "2"));
        assert_eq!(
            host.lock().unwrap().alerts(),
            &[INVALID_INPUT_MESSAGE.to_string()]
        );
    }

    proptest! {
        /// Property: any title/description of at least five non-blank
        /// characters with a positive count is accepted unchanged.
        #[test]
        fn long_enough_input_is_accepted(
            title in "[A-Za-z][A-Za-z ]{3,20}[A-Za-z]",
            description in "[a-z]{5,30}",
            people in 1u32..10_000,
        ) {
            let input = raw(&title, &description, &people.to_string()).validate().unwrap();
            prop_assert_eq!(input.title, title);
            prop_assert_eq!(input.description, description);
            prop_assert_eq!(input.people, people);
        }
    }
}
