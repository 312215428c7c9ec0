use crate::shared::core::primitives::EntityId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoveTimeEntry {
    pub id: EntityId,
}
