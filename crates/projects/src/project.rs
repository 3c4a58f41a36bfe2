use core::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use projboard_core::{Aggregate, AggregateId, AggregateRoot, DomainError, DomainResult};
use projboard_events::{Command, Event};

/// Project identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectId(pub AggregateId);

impl ProjectId {
    pub fn new(id: AggregateId) -> Self {
        Self(id)
    }

    /// Mint a fresh, process-unique identifier.
    pub fn generate() -> Self {
        Self(AggregateId::new())
    }
}

impl core::fmt::Display for ProjectId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for ProjectId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AggregateId::from_str(s).map(Self)
    }
}

/// Project status lifecycle (the board's two partitions).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    Active,
    Finished,
}

impl ProjectStatus {
    pub const ALL: [ProjectStatus; 2] = [ProjectStatus::Active, ProjectStatus::Finished];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Active => "active",
            ProjectStatus::Finished => "finished",
        }
    }
}

impl core::fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProjectStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(ProjectStatus::Active),
            "finished" => Ok(ProjectStatus::Finished),
            other => Err(DomainError::validation(format!(
                "unknown project status '{other}' (expected 'active' or 'finished')"
            ))),
        }
    }
}

/// Aggregate root: Project.
///
/// Field constraints (title/description length, people >= 1) are enforced at the
/// input boundary, not here: the aggregate records whatever it is told to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Project {
    id: ProjectId,
    title: String,
    description: String,
    people: u32,
    status: ProjectStatus,
    #[serde(skip)]
    version: u64,
    #[serde(skip)]
    created: bool,
}

impl Project {
    /// Create an empty, not-yet-created aggregate instance.
    pub fn empty(id: ProjectId) -> Self {
        Self {
            id,
            title: String::new(),
            description: String::new(),
            people: 0,
            status: ProjectStatus::Active,
            version: 0,
            created: false,
        }
    }

    pub fn id_typed(&self) -> ProjectId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn people(&self) -> u32 {
        self.people
    }

    pub fn status(&self) -> ProjectStatus {
        self.status
    }

    pub fn is_created(&self) -> bool {
        self.created
    }
}

impl AggregateRoot for Project {
    type Id = ProjectId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// Command: CreateProject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateProject {
    pub project_id: ProjectId,
    pub title: String,
    pub description: String,
    pub people: u32,
    pub occurred_at: DateTime<Utc>,
}

/// Command: MoveProject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveProject {
    pub project_id: ProjectId,
    pub status: ProjectStatus,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectCommand {
    CreateProject(CreateProject),
    MoveProject(MoveProject),
}

impl Command for ProjectCommand {
    fn target_aggregate_id(&self) -> AggregateId {
        match self {
            ProjectCommand::CreateProject(cmd) => cmd.project_id.0,
            ProjectCommand::MoveProject(cmd) => cmd.project_id.0,
        }
    }
}

/// Event: ProjectCreated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectCreated {
    pub project_id: ProjectId,
    pub title: String,
    pub description: String,
    pub people: u32,
    pub occurred_at: DateTime<Utc>,
}

/// Event: ProjectMoved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectMoved {
    pub project_id: ProjectId,
    pub from: ProjectStatus,
    pub to: ProjectStatus,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectEvent {
    ProjectCreated(ProjectCreated),
    ProjectMoved(ProjectMoved),
}

impl Event for ProjectEvent {
    fn event_type(&self) -> &'static str {
        match self {
            ProjectEvent::ProjectCreated(_) => "projects.project.created",
            ProjectEvent::ProjectMoved(_) => "projects.project.moved",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            ProjectEvent::ProjectCreated(e) => e.occurred_at,
            ProjectEvent::ProjectMoved(e) => e.occurred_at,
        }
    }
}

impl Aggregate for Project {
    type Command = ProjectCommand;
    type Event = ProjectEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            ProjectEvent::ProjectCreated(e) => {
                self.id = e.project_id;
                self.title = e.title.clone();
                self.description = e.description.clone();
                self.people = e.people;
                self.status = ProjectStatus::Active;
                self.created = true;
            }
            ProjectEvent::ProjectMoved(e) => {
                self.status = e.to;
            }
        }

        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            ProjectCommand::CreateProject(cmd) => self.handle_create(cmd),
            ProjectCommand::MoveProject(cmd) => self.handle_move(cmd),
        }
    }
}

impl Project {
    fn ensure_project_id(&self, project_id: ProjectId) -> DomainResult<()> {
        if self.id != project_id {
            return Err(DomainError::invariant("project_id mismatch"));
        }
        Ok(())
    }

    fn handle_create(&self, cmd: &CreateProject) -> DomainResult<Vec<ProjectEvent>> {
        if self.created {
            return Err(DomainError::conflict(format!("project {}", cmd.project_id)));
        }

        Ok(vec![ProjectEvent::ProjectCreated(ProjectCreated {
            project_id: cmd.project_id,
            title: cmd.title.clone(),
            description: cmd.description.clone(),
            people: cmd.people,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_move(&self, cmd: &MoveProject) -> DomainResult<Vec<ProjectEvent>> {
        if !self.created {
            return Err(DomainError::not_found("project", cmd.project_id));
        }
        self.ensure_project_id(cmd.project_id)?;

        // Same-status moves are accepted but change nothing.
        if self.status == cmd.status {
            return Ok(Vec::new());
        }

        Ok(vec![ProjectEvent::ProjectMoved(ProjectMoved {
            project_id: cmd.project_id,
            from: self.status,
            to: cmd.status,
            occurred_at: cmd.occurred_at,
        })])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn test_time() -> DateTime<Utc> {
        Utc::now()
    }

    fn create_cmd(project_id: ProjectId) -> CreateProject {
        CreateProject {
            project_id,
            title: "Build API".to_string(),
            description: "Design REST endpoints".to_string(),
            people: 3,
            occurred_at: test_time(),
        }
    }

    fn created_project() -> Project {
        let project_id = ProjectId::generate();
        let mut project = Project::empty(project_id);
        let events = project
            .handle(&ProjectCommand::CreateProject(create_cmd(project_id)))
            .unwrap();
        for e in &events {
            project.apply(e);
        }
        project
    }

    fn move_cmd(project: &Project, status: ProjectStatus) -> ProjectCommand {
        ProjectCommand::MoveProject(MoveProject {
            project_id: project.id_typed(),
            status,
            occurred_at: test_time(),
        })
    }

    #[test]
    fn create_project_emits_created_event_and_starts_active() {
        let project_id = ProjectId::generate();
        let mut project = Project::empty(project_id);
        let events = project
            .handle(&ProjectCommand::CreateProject(create_cmd(project_id)))
            .unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type(), "projects.project.created");

        project.apply(&events[0]);
        assert!(project.is_created());
        assert_eq!(project.title(), "Build API");
        assert_eq!(project.description(), "Design REST endpoints");
        assert_eq!(project.people(), 3);
        assert_eq!(project.status(), ProjectStatus::Active);
        assert_eq!(project.version(), 1);
    }

    #[test]
    fn create_project_does_not_validate_fields() {
        let project_id = ProjectId::generate();
        let project = Project::empty(project_id);
        let cmd = CreateProject {
            title: "x".to_string(),
            description: String::new(),
            people: 0,
            ..create_cmd(project_id)
        };
        let events = project.handle(&ProjectCommand::CreateProject(cmd)).unwrap();
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn create_project_rejects_duplicate_creation() {
        let project = created_project();
        let err = project
            .handle(&ProjectCommand::CreateProject(create_cmd(project.id_typed())))
            .unwrap_err();
        match err {
            DomainError::Conflict(_) => {}
            _ => panic!("Expected Conflict error for duplicate creation"),
        }
    }

    #[test]
    fn move_to_other_status_emits_moved_event() {
        let mut project = created_project();
        let events = project
            .handle(&move_cmd(&project, ProjectStatus::Finished))
            .unwrap();
        match &events[..] {
            [ProjectEvent::ProjectMoved(e)] => {
                assert_eq!(e.from, ProjectStatus::Active);
                assert_eq!(e.to, ProjectStatus::Finished);
            }
            other => panic!("Expected a single ProjectMoved event, got {other:?}"),
        }

        project.apply(&events[0]);
        assert_eq!(project.status(), ProjectStatus::Finished);
        assert_eq!(project.version(), 2);
    }

    #[test]
    fn move_to_same_status_emits_nothing() {
        let project = created_project();
        let events = project
            .handle(&move_cmd(&project, ProjectStatus::Active))
            .unwrap();
        assert!(events.is_empty());
    }

    #[test]
    fn move_before_creation_is_not_found() {
        let project = Project::empty(ProjectId::generate());
        let err = project
            .handle(&move_cmd(&project, ProjectStatus::Finished))
            .unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), format!("project {} does not exist", project.id_typed()));
    }

    #[test]
    fn move_with_foreign_id_is_rejected() {
        let project = created_project();
        let cmd = ProjectCommand::MoveProject(MoveProject {
            project_id: ProjectId::generate(),
            status: ProjectStatus::Finished,
            occurred_at: test_time(),
        });
        match project.handle(&cmd).unwrap_err() {
            DomainError::InvariantViolation(msg) => assert!(msg.contains("project_id")),
            other => panic!("Expected InvariantViolation, got {other:?}"),
        }
    }

    #[test]
    fn command_targets_its_project() {
        let project = created_project();
        let cmd = move_cmd(&project, ProjectStatus::Finished);
        assert_eq!(cmd.target_aggregate_id(), project.id_typed().0);
    }

    #[test]
    fn status_parses_case_insensitively() {
        assert_eq!("Active".parse::<ProjectStatus>().unwrap(), ProjectStatus::Active);
        assert_eq!(" FINISHED ".parse::<ProjectStatus>().unwrap(), ProjectStatus::Finished);
        assert!("done".parse::<ProjectStatus>().is_err());
    }

    #[test]
    fn project_serializes_without_bookkeeping_fields() {
        let project = created_project();
        let json = serde_json::to_value(&project).unwrap();
        assert_eq!(json["status"], "active");
        assert_eq!(json["people"], 3);
        assert!(json.get("version").is_none());
        assert!(json.get("created").is_none());
    }

    proptest! {
        /// Property: after any sequence of moves the status equals the last
        /// requested status, and version counts only real transitions.
        #[test]
        fn status_follows_last_move(moves in prop::collection::vec(any::<bool>(), 0..20)) {
            let mut project = created_project();
            let mut transitions = 0u64;
            let mut expected = ProjectStatus::Active;

            for finished in moves {
                let target = if finished { ProjectStatus::Finished } else { ProjectStatus::Active };
                let events = project.handle(&move_cmd(&project, target)).unwrap();
                if target != expected {
                    prop_assert_eq!(events.len(), 1);
                    transitions += 1;
                } else {
                    prop_assert!(events.is_empty());
                }
                for e in &events {
                    project.apply(e);
                }
                expected = target;
            }

            prop_assert_eq!(project.status(), expected);
            prop_assert_eq!(project.version(), 1 + transitions);
        }
    }
}
