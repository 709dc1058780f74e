use crate::models::{Project, Rule, Standard};

/// Selection state and list caches shared by the workflows.
///
/// Caches are replaced wholesale after each successful list fetch and never
/// patched in place.
#[derive(Debug, Clone, Default)]
pub struct Session {
    current_project_id: Option<i64>,
    current_review_id: Option<i64>,
    current_standard_id: Option<i64>,
    projects: Vec<Project>,
    standards: Vec<Standard>,
    rules: Vec<Rule>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_project_id(&self) -> Option<i64> {
        self.current_project_id
    }

    pub fn select_project(&mut self, project_id: i64) {
        self.current_project_id = Some(project_id);
    }

    pub fn current_review_id(&self) -> Option<i64> {
        self.current_review_id
    }

    /// Clears the previous review result at pipeline start.
    pub fn begin_review(&mut self) {
        self.current_review_id = None;
    }

    pub fn complete_review(&mut self, review_id: i64) {
        self.current_review_id = Some(review_id);
    }

    pub fn current_standard_id(&self) -> Option<i64> {
        self.current_standard_id
    }

    /// Switches the standard whose rules are on display; `None` goes back to
    /// the standards overview.
    pub fn select_standard(&mut self, standard_id: Option<i64>) {
        if self.current_standard_id != standard_id {
            self.rules.clear();
        }
        self.current_standard_id = standard_id;
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn replace_projects(&mut self, projects: Vec<Project>) {
        self.projects = projects;
    }

    pub fn standards(&self) -> &[Standard] {
        &self.standards
    }

    pub fn replace_standards(&mut self, standards: Vec<Standard>) {
        self.standards = standards;
    }

    /// Rules of the current standard.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn replace_rules(&mut self, rules: Vec<Rule>) {
        self.rules = rules;
    }
}
