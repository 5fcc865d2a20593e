//! The entity registry.
//!
//! [`Model`] owns every element of a workspace and enforces the structural
//! invariants of the architecture graph:
//!
//! - element names are unique across people, software systems and containers,
//! - a container always belongs to exactly one existing software system,
//! - both endpoints of a relationship exist before the relationship does.
//!
//! Elements are never removed or renamed once created. Callers receive
//! [`ElementId`] handles and resolve previously created elements through the
//! fallible [`Model::lookup`] family instead of assuming presence.

mod element;
mod relationship;

pub use element::{Element, ElementId, ElementKind, ElementType, Location};
pub use relationship::{Relationship, RelationshipId};

use std::sync::atomic::{AtomicU32, Ordering};

use indexmap::IndexMap;
use log::debug;

use crate::error::ModelError;

/// Identity of one [`Model`] instance, carried by every handle it issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct ModelId(u32);

impl ModelId {
    fn next() -> Self {
        static NEXT: AtomicU32 = AtomicU32::new(0);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// Registry of all elements and relationships in one workspace.
///
/// Clones keep the identity of the original, so handles stay valid in both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Model {
    id: ModelId,
    elements: Vec<Element>,
    names: IndexMap<String, ElementId>,
    relationships: Vec<relationship::Relationship>,
    sequence: u32,
}

impl Default for Model {
    fn default() -> Self {
        Self {
            id: ModelId::next(),
            elements: Vec::new(),
            names: IndexMap::new(),
            relationships: Vec::new(),
            sequence: 0,
        }
    }
}

impl Model {
    /// Creates an empty model with a fresh identity.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a person.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::DuplicateName`] if any element already uses `name`.
    pub fn add_person(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<ElementId, ModelError> {
        self.insert(name.into(), description.into(), ElementKind::Person)
    }

    /// Registers an internal software system.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::DuplicateName`] if any element already uses `name`.
    pub fn add_software_system(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<ElementId, ModelError> {
        self.add_software_system_with_location(name, description, Location::Internal)
    }

    /// Registers a software system at the given location.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::DuplicateName`] if any element already uses `name`.
    pub fn add_software_system_with_location(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        location: Location,
    ) -> Result<ElementId, ModelError> {
        self.insert(
            name.into(),
            description.into(),
            ElementKind::SoftwareSystem {
                location,
                containers: Vec::new(),
            },
        )
    }

    /// Registers a container owned by `parent`.
    ///
    /// # Errors
    ///
    /// - [`ModelError::UnknownElement`] if `parent` is not part of this model.
    /// - [`ModelError::WrongKind`] if `parent` is not a software system.
    /// - [`ModelError::DuplicateName`] if any element already uses `name`.
    pub fn add_container(
        &mut self,
        parent: ElementId,
        name: impl Into<String>,
        description: impl Into<String>,
        technology: impl Into<String>,
    ) -> Result<ElementId, ModelError> {
        self.expect_type(parent, ElementType::SoftwareSystem)?;

        let container = self.insert(
            name.into(),
            description.into(),
            ElementKind::Container {
                parent,
                technology: technology.into(),
            },
        )?;
        self.elements[parent.index].push_container(container);

        Ok(container)
    }

    /// Returns the element for a handle.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::UnknownElement`] if the handle was issued by
    /// another model.
    pub fn element(&self, id: ElementId) -> Result<&Element, ModelError> {
        if id.model != self.id {
            return Err(ModelError::UnknownElement(id));
        }
        self.elements
            .get(id.index)
            .ok_or(ModelError::UnknownElement(id))
    }

    /// Looks up an element of any kind by name.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::NotFound`] if no element uses `name`.
    pub fn lookup(&self, name: &str) -> Result<&Element, ModelError> {
        self.names
            .get(name)
            .map(|id| &self.elements[id.index])
            .ok_or_else(|| ModelError::NotFound(name.to_string()))
    }

    /// Looks up a person by name.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::NotFound`] or [`ModelError::WrongKind`].
    pub fn person(&self, name: &str) -> Result<ElementId, ModelError> {
        self.lookup_typed(name, ElementType::Person)
    }

    /// Looks up a software system by name.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::NotFound`] or [`ModelError::WrongKind`].
    pub fn software_system(&self, name: &str) -> Result<ElementId, ModelError> {
        self.lookup_typed(name, ElementType::SoftwareSystem)
    }

    /// Looks up a container by name.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::NotFound`] or [`ModelError::WrongKind`].
    pub fn container(&self, name: &str) -> Result<ElementId, ModelError> {
        self.lookup_typed(name, ElementType::Container)
    }

    /// Returns all elements in creation order.
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Returns all people in creation order.
    pub fn people(&self) -> impl Iterator<Item = &Element> {
        self.of_type(ElementType::Person)
    }

    /// Returns all software systems in creation order.
    pub fn software_systems(&self) -> impl Iterator<Item = &Element> {
        self.of_type(ElementType::SoftwareSystem)
    }

    /// Returns the containers owned by `system`, in creation order.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::UnknownElement`] or [`ModelError::WrongKind`] if
    /// `system` is not a software system of this model.
    pub fn containers_of(&self, system: ElementId) -> Result<Vec<&Element>, ModelError> {
        let system = self.expect_type(system, ElementType::SoftwareSystem)?;
        Ok(system
            .containers()
            .iter()
            .map(|container| &self.elements[container.index])
            .collect())
    }

    /// Returns `true` if no elements have been registered.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Returns the element for `id` after checking its type.
    pub(crate) fn expect_type(
        &self,
        id: ElementId,
        expected: ElementType,
    ) -> Result<&Element, ModelError> {
        let element = self.element(id)?;
        if element.element_type() == expected {
            Ok(element)
        } else {
            Err(ModelError::WrongKind {
                name: element.name().to_string(),
                expected,
                actual: element.element_type(),
            })
        }
    }

    fn lookup_typed(&self, name: &str, expected: ElementType) -> Result<ElementId, ModelError> {
        let element = self.lookup(name)?;
        self.expect_type(element.id(), expected).map(Element::id)
    }

    fn of_type(&self, element_type: ElementType) -> impl Iterator<Item = &Element> {
        self.elements
            .iter()
            .filter(move |element| element.element_type() == element_type)
    }

    fn insert(
        &mut self,
        name: String,
        description: String,
        kind: ElementKind,
    ) -> Result<ElementId, ModelError> {
        if name.trim().is_empty() {
            return Err(ModelError::EmptyName);
        }
        if let Some(existing) = self.names.get(&name) {
            return Err(ModelError::DuplicateName {
                name,
                existing: self.elements[existing.index].element_type(),
            });
        }

        let id = ElementId {
            model: self.id,
            index: self.elements.len(),
        };
        let sequence = self.next_sequence();
        let element = Element::new(id, sequence, name.clone(), description, kind);
        debug!(element:% = element, id:% = id; "Element registered");

        self.elements.push(element);
        self.names.insert(name, id);
        Ok(id)
    }

    /// Hands out identifiers shared by elements and relationships.
    fn next_sequence(&mut self) -> u32 {
        self.sequence += 1;
        self.sequence
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_and_lookup_person() {
        let mut model = Model::new();
        let id = model
            .add_person("Creator", "A user who adds publications")
            .unwrap();

        let person = model.lookup("Creator").unwrap();
        assert_eq!(person.id(), id);
        assert_eq!(person.element_type(), ElementType::Person);
        assert_eq!(person.description(), "A user who adds publications");
        assert_eq!(model.person("Creator"), Ok(id));
    }

    #[test]
    fn test_duplicate_name_rejected_across_kinds() {
        let mut model = Model::new();
        model.add_person("Orcid", "A person").unwrap();

        let err = model
            .add_software_system("Orcid", "The Orcid application")
            .unwrap_err();

        assert_eq!(
            err,
            ModelError::DuplicateName {
                name: "Orcid".to_string(),
                existing: ElementType::Person,
            }
        );
        assert_eq!(model.elements().len(), 1);
        assert_eq!(model.lookup("Orcid").unwrap().description(), "A person");
    }

    #[test]
    fn test_duplicate_container_name_rejected() {
        let mut model = Model::new();
        let core = model.add_software_system("Core", "Core").unwrap();
        let other = model.add_software_system("Other", "Other").unwrap();
        model
            .add_container(core, "API", "Public API", "AWS API Gateway")
            .unwrap();

        let err = model
            .add_container(other, "API", "Another API", "nginx")
            .unwrap_err();

        assert!(matches!(err, ModelError::DuplicateName { .. }));
        assert!(model.containers_of(other).unwrap().is_empty());
    }

    #[test]
    fn test_empty_name_rejected() {
        let mut model = Model::new();
        assert_eq!(model.add_person("  ", "nobody"), Err(ModelError::EmptyName));
    }

    #[test]
    fn test_container_belongs_to_single_parent() {
        let mut model = Model::new();
        let core = model.add_software_system("Core", "Core").unwrap();
        let other = model.add_software_system("Other", "Other").unwrap();

        let api = model
            .add_container(core, "API", "Public API", "AWS API Gateway")
            .unwrap();

        let core_containers: Vec<_> = model
            .containers_of(core)
            .unwrap()
            .iter()
            .map(|c| c.id())
            .collect();
        assert_eq!(core_containers, vec![api]);
        assert!(model.containers_of(other).unwrap().is_empty());
        assert_eq!(model.element(api).unwrap().parent(), Some(core));
        assert_eq!(
            model.element(api).unwrap().technology(),
            Some("AWS API Gateway")
        );
    }

    #[test]
    fn test_container_under_unknown_parent_fails() {
        let mut model = Model::new();
        let mut other = Model::new();
        let foreign = other.add_software_system("Ghost", "Elsewhere").unwrap();

        let err = model
            .add_container(foreign, "API", "Public API", "AWS API Gateway")
            .unwrap_err();

        assert_eq!(err, ModelError::UnknownElement(foreign));
        assert!(model.lookup("API").is_err());
    }

    #[test]
    fn test_foreign_handle_at_same_position_is_unknown() {
        let mut model = Model::new();
        let local = model.add_software_system("Core", "Core").unwrap();
        let mut other = Model::new();
        let foreign = other.add_software_system("Ghost", "Elsewhere").unwrap();

        assert_eq!(local.to_string(), foreign.to_string());
        assert_eq!(model.element(foreign), Err(ModelError::UnknownElement(foreign)));
        assert!(model.containers_of(foreign).is_err());

        let err = model
            .add_container(foreign, "API", "Public API", "AWS API Gateway")
            .unwrap_err();
        assert_eq!(err, ModelError::UnknownElement(foreign));
        assert!(model.containers_of(local).unwrap().is_empty());
        assert_eq!(model.elements().len(), 1);
    }

    #[test]
    fn test_clone_keeps_handles_valid() {
        let mut model = Model::new();
        let core = model.add_software_system("Core", "Core").unwrap();

        let copy = model.clone();
        assert_eq!(copy.element(core).unwrap().name(), "Core");
    }

    #[test]
    fn test_container_under_person_fails() {
        let mut model = Model::new();
        let person = model.add_person("Editor", "Edits").unwrap();

        let err = model
            .add_container(person, "API", "Public API", "AWS API Gateway")
            .unwrap_err();

        assert_eq!(
            err,
            ModelError::WrongKind {
                name: "Editor".to_string(),
                expected: ElementType::SoftwareSystem,
                actual: ElementType::Person,
            }
        );
    }

    #[test]
    fn test_lookup_missing_is_not_found() {
        let model = Model::new();
        assert_eq!(
            model.lookup("Datacite").unwrap_err(),
            ModelError::NotFound("Datacite".to_string())
        );
        assert_eq!(
            model.software_system("Datacite"),
            Err(ModelError::NotFound("Datacite".to_string()))
        );
    }

    #[test]
    fn test_typed_lookup_checks_kind() {
        let mut model = Model::new();
        model.add_person("Curator", "Curates").unwrap();

        let err = model.software_system("Curator").unwrap_err();
        assert!(matches!(err, ModelError::WrongKind { .. }));
    }

    #[test]
    fn test_iterators_preserve_creation_order() {
        let mut model = Model::new();
        model.add_software_system("Core", "Core").unwrap();
        model.add_person("B", "b").unwrap();
        model
            .add_software_system_with_location("Orcid", "Orcid", Location::External)
            .unwrap();
        model.add_person("A", "a").unwrap();

        let systems: Vec<_> = model.software_systems().map(Element::name).collect();
        let people: Vec<_> = model.people().map(Element::name).collect();

        assert_eq!(systems, vec!["Core", "Orcid"]);
        assert_eq!(people, vec!["B", "A"]);
        assert_eq!(
            model.lookup("Orcid").unwrap().location(),
            Some(Location::External)
        );
    }
}

#[cfg(test)]
mod proptest_tests {
    use proptest::prelude::*;

    use super::*;

    fn name_strategy() -> impl Strategy<Value = String> {
        "[A-Za-z][A-Za-z ]{0,11}"
    }

    proptest! {
        #[test]
        fn second_registration_never_overwrites(
            name in name_strategy(),
            first in 0usize..3,
            second in 0usize..3,
        ) {
            let mut model = Model::new();
            let core = model.add_software_system("__core", "core").unwrap();

            let add = |model: &mut Model, kind: usize, description: &str| match kind {
                0 => model.add_person(name.clone(), description),
                1 => model.add_software_system(name.clone(), description),
                _ => model.add_container(core, name.clone(), description, "tech"),
            };

            let original = add(&mut model, first, "first").unwrap();
            let count = model.elements().len();

            prop_assert!(add(&mut model, second, "second").is_err());
            prop_assert_eq!(model.elements().len(), count);
            prop_assert_eq!(model.lookup(&name).unwrap().id(), original);
            prop_assert_eq!(model.lookup(&name).unwrap().description(), "first");
        }
    }
}
