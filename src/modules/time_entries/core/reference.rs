// Reference data the time entries point at. Read-only from the projection's point of view.

use crate::shared::core::primitives::EntityId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspaceData {
    pub id: EntityId,
    pub name: String,
    pub is_premium: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectData {
    pub id: EntityId,
    pub workspace_id: EntityId,
    pub client_id: Option<EntityId>,
    pub name: String,
    pub color: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientData {
    pub id: EntityId,
    pub workspace_id: EntityId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskData {
    pub id: EntityId,
    pub project_id: EntityId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagData {
    pub id: EntityId,
    pub workspace_id: EntityId,
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TrackingMode {
    #[default]
    StartNew,
    Continue,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserData {
    pub id: EntityId,
    pub name: String,
    pub email: String,
    pub default_workspace_id: EntityId,
    pub tracking_mode: TrackingMode,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceData {
    pub workspaces: BTreeMap<EntityId, WorkspaceData>,
    pub projects: BTreeMap<EntityId, ProjectData>,
    pub clients: BTreeMap<EntityId, ClientData>,
    pub tasks: BTreeMap<EntityId, TaskData>,
    pub tags: BTreeMap<EntityId, TagData>,
}

impl ReferenceData {
    /// Later values replace earlier ones with the same id.
    pub fn merge(&mut self, other: ReferenceData) {
        self.workspaces.extend(other.workspaces);
        self.projects.extend(other.projects);
        self.clients.extend(other.clients);
        self.tasks.extend(other.tasks);
        self.tags.extend(other.tags);
    }
}
