//! Prompt templates for the supported generation tasks

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Substitution marker each template must contain exactly once.
pub const PLACEHOLDER: &str = "{prompt}";

const TESTCASE_TEMPLATE: &str = "Write detailed test cases for the following functionality: {prompt}\n\nEach test case must include: ID, title, preconditions, steps, expected result.";

const BUGREPORT_TEMPLATE: &str = "Write a detailed bug report for the following problem: {prompt}\n\nThe bug report must include: ID, title, description, steps to reproduce, expected result, actual result, priority, severity.";

#[derive(Error, Debug)]
pub enum PromptError {
    #[error("no such task: {0}")]
    UnknownTask(String),
    #[error("the {0} generator is currently disabled")]
    FeatureDisabled(TaskKind),
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum TemplateError {
    #[error("template is missing the {{prompt}} placeholder")]
    MissingPlaceholder,
    #[error("template contains more than one {{prompt}} placeholder")]
    DuplicatePlaceholder,
}

/// The two generation tasks the assistant supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskKind {
    TestCase,
    BugReport,
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TaskKind::TestCase => "test case",
            TaskKind::BugReport => "bug report",
        })
    }
}

impl FromStr for TaskKind {
    type Err = PromptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "testcase" => Ok(TaskKind::TestCase),
            "bugreport" => Ok(TaskKind::BugReport),
            other => Err(PromptError::UnknownTask(other.to_string())),
        }
    }
}

/// A prompt template holding exactly one `{prompt}` placeholder.
///
/// The invariant is checked at construction so rendering can never drop
/// the user's text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate(String);

impl PromptTemplate {
    pub fn new(text: impl Into<String>) -> Result<Self, TemplateError> {
        let text = text.into();
        match text.matches(PLACEHOLDER).count() {
            0 => Err(TemplateError::MissingPlaceholder),
            1 => Ok(Self(text)),
            _ => Err(TemplateError::DuplicatePlaceholder),
        }
    }

    /// The built-in template shipped for a task.
    pub fn builtin(task: TaskKind) -> Self {
        let text = match task {
            TaskKind::TestCase => TESTCASE_TEMPLATE,
            TaskKind::BugReport => BUGREPORT_TEMPLATE,
        };
        Self(text.to_string())
    }

    /// Substitute `user_text` verbatim for the placeholder.
    pub fn render(&self, user_text: &str) -> String {
        self.0.replacen(PLACEHOLDER, user_text, 1)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// One task's generation feature: an on/off switch and its template.
#[derive(Debug, Clone)]
pub struct TaskFeature {
    pub enabled: bool,
    pub template: PromptTemplate,
}

impl TaskFeature {
    pub fn builtin(task: TaskKind) -> Self {
        Self {
            enabled: true,
            template: PromptTemplate::builtin(task),
        }
    }
}

/// Template set for all tasks, usually built from the config document.
#[derive(Debug, Clone)]
pub struct TaskTemplates {
    pub testcase: TaskFeature,
    pub bugreport: TaskFeature,
}

impl Default for TaskTemplates {
    fn default() -> Self {
        Self {
            testcase: TaskFeature::builtin(TaskKind::TestCase),
            bugreport: TaskFeature::builtin(TaskKind::BugReport),
        }
    }
}

impl TaskTemplates {
    pub fn get(&self, task: TaskKind) -> &TaskFeature {
        match task {
            TaskKind::TestCase => &self.testcase,
            TaskKind::BugReport => &self.bugreport,
        }
    }

    /// Render the final prompt for `task`, or refuse if the task is
    /// switched off.
    pub fn render(&self, task: TaskKind, user_text: &str) -> Result<String, PromptError> {
        let feature = self.get(task);
        if !feature.enabled {
            return Err(PromptError::FeatureDisabled(task));
        }
        Ok(feature.template.render(user_text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_substitutes_user_text() {
        let templates = TaskTemplates::default();
        let rendered = templates
            .render(TaskKind::TestCase, "login form with 2FA")
            .unwrap();

        assert!(rendered.contains("login form with 2FA"));
        assert_ne!(rendered, templates.testcase.template.as_str());
        assert!(!rendered.contains(PLACEHOLDER));
    }

    #[test]
    fn test_render_is_verbatim() {
        let template = PromptTemplate::new("Check this: {prompt}").unwrap();
        let rendered = template.render("a \"quoted\" <tag> & {prompt}");
        assert_eq!(rendered, "Check this: a \"quoted\" <tag> & {prompt}");
    }

    #[test]
    fn test_render_disabled_task() {
        let mut templates = TaskTemplates::default();
        templates.bugreport.enabled = false;

        let err = templates.render(TaskKind::BugReport, "crash on save").unwrap_err();
        assert!(matches!(err, PromptError::FeatureDisabled(TaskKind::BugReport)));
        assert!(err.to_string().contains("disabled"));
    }

    #[test]
    fn test_unknown_task_name() {
        let err = "regression".parse::<TaskKind>().unwrap_err();
        assert!(matches!(err, PromptError::UnknownTask(_)));
        assert_eq!(err.to_string(), "no such task: regression");

        assert_eq!("testcase".parse::<TaskKind>().unwrap(), TaskKind::TestCase);
        assert_eq!("bugreport".parse::<TaskKind>().unwrap(), TaskKind::BugReport);
    }

    #[test]
    fn test_task_kind_wire_names() {
        assert_eq!(serde_json::to_string(&TaskKind::TestCase).unwrap(), "\"testcase\"");
        assert_eq!(serde_json::to_string(&TaskKind::BugReport).unwrap(), "\"bugreport\"");
    }

    #[test]
    fn test_template_requires_single_placeholder() {
        assert_eq!(
            PromptTemplate::new("no placeholder here").unwrap_err(),
            TemplateError::MissingPlaceholder
        );
        assert_eq!(
            PromptTemplate::new("{prompt} and {prompt}").unwrap_err(),
            TemplateError::DuplicatePlaceholder
        );
        assert!(PromptTemplate::new("once: {prompt}").is_ok());
    }

    #[test]
    fn test_builtin_templates_hold_invariant() {
        for task in [TaskKind::TestCase, TaskKind::BugReport] {
            let template = PromptTemplate::builtin(task);
            assert!(PromptTemplate::new(template.as_str().to_string()).is_ok());
        }
    }
}
