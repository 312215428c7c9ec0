// Capability every display row implements so that lists can be diffed by identity.
//
// Responsibilities
// - `identity` names the thing a row represents. Two rows with equal identities are the same row,
//   possibly with different contents.
// - `same_content_as` is only consulted when identities match.
//
// Boundaries
// - Identities of different row kinds must never compare equal. Sum types discriminate the kind
//   in their identity type.

use std::fmt::Debug;
use std::hash::Hash;

pub trait Diffable {
    type Identity: Eq + Hash + Clone + Debug;

    fn identity(&self) -> Self::Identity;

    fn same_content_as(&self, other: &Self) -> bool;

    fn same_identity_as(&self, other: &Self) -> bool {
        self.identity() == other.identity()
    }
}
