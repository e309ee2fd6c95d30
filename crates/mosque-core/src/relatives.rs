//! The immediate family of an individual, derived from family joins.
//!
//! Nothing here is stored. Parents and siblings come from the families the
//! individual is a child of; spouses and children from the families they
//! head.

use serde::{Deserialize, Serialize};

use crate::{
  enums::RelationshipType,
  gedcom::Individual,
  store::MosqueStore,
  tenant::TenantScope,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spouse {
  pub family_id:  String,
  pub individual: Individual,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Child {
  pub family_id:         String,
  pub individual:        Individual,
  pub relationship_type: RelationshipType,
  pub birth_order:       Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relatives {
  pub individual: Individual,
  pub parents:    Vec<Individual>,
  pub spouses:    Vec<Spouse>,
  pub children:   Vec<Child>,
  pub siblings:   Vec<Individual>,
}

/// Assemble the [`Relatives`] of `id` as visible in `scope`.
///
/// Returns `None` if the individual is not visible. References to
/// individuals outside the scope are skipped, and each relative appears at
/// most once per list.
pub async fn relatives<S: MosqueStore>(
  store: &S,
  scope: TenantScope,
  id: &str,
) -> Result<Option<Relatives>, S::Error> {
  let Some(individual) = store.get_individual(scope, id).await? else {
    return Ok(None);
  };

  let mut seen = Seen::new(id);
  let mut parents = Vec::new();
  let mut siblings = Vec::new();
  for family in store.parent_families(scope, id).await? {
    for parent_id in family.partner_ids() {
      if seen.first(Kind::Parent, parent_id)
        && let Some(parent) = store.get_individual(scope, parent_id).await?
      {
        parents.push(parent);
      }
    }
    for link in store.family_children(scope, &family.id).await? {
      if seen.first(Kind::Sibling, &link.child_id)
        && let Some(sibling) = store.get_individual(scope, &link.child_id).await?
      {
        siblings.push(sibling);
      }
    }
  }

  let mut spouses = Vec::new();
  let mut children = Vec::new();
  for family in store.spouse_families(scope, id).await? {
    if let Some(partner_id) = family.partner_of(id)
      && seen.first(Kind::Spouse, partner_id)
      && let Some(partner) = store.get_individual(scope, partner_id).await?
    {
      spouses.push(Spouse { family_id: family.id.clone(), individual: partner });
    }
    for link in store.family_children(scope, &family.id).await? {
      if seen.first(Kind::Child, &link.child_id)
        && let Some(child) = store.get_individual(scope, &link.child_id).await?
      {
        children.push(Child {
          family_id:         family.id.clone(),
          individual:        child,
          relationship_type: link.relationship_type,
          birth_order:       link.birth_order,
        });
      }
    }
  }

  Ok(Some(Relatives { individual, parents, spouses, children, siblings }))
}

// ─── Dedup ───────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, PartialEq, Eq)]
enum Kind {
  Parent,
  Sibling,
  Spouse,
  Child,
}

/// Tracks which ids have been emitted per relation. The subject itself is
/// never emitted.
struct Seen<'a> {
  subject: &'a str,
  ids:     Vec<(Kind, String)>,
}

impl<'a> Seen<'a> {
  fn new(subject: &'a str) -> Self { Self { subject, ids: Vec::new() } }

  fn first(&mut self, kind: Kind, id: &str) -> bool {
    if id == self.subject || self.ids.iter().any(|(k, i)| *k == kind && i == id) {
      return false;
    }
    self.ids.push((kind, id.to_owned()));
    true
  }
}
