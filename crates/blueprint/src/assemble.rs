//! Turns a [`Topology`] into a populated [`Workspace`].

use log::{debug, info};

use blueprint_core::{
    ModelError,
    model::{ElementId, Model},
    workspace::Workspace,
};

use crate::{
    error::BlueprintError,
    topology::{ContainerSpec, Link, Topology},
};

/// Builds a workspace from a topology in a fixed order.
///
/// The core system comes first, then the external systems it depends on,
/// then the actors using it and finally its containers. Container links are
/// resolved by name against everything added before them, so a container can
/// reference any system, actor or earlier container. Both views are derived
/// once the model is complete.
pub struct Assembler<'a> {
    topology: &'a Topology,
}

impl<'a> Assembler<'a> {
    pub fn new(topology: &'a Topology) -> Self {
        Self { topology }
    }

    /// Runs the assembly.
    ///
    /// # Errors
    ///
    /// Returns [`BlueprintError::Assembly`] naming the element whose
    /// registration or link failed.
    pub fn assemble(&self) -> Result<Workspace, BlueprintError> {
        let topology = self.topology;
        info!(workspace = topology.workspace.name.as_str(); "Assembling workspace");

        let mut workspace = Workspace::new(
            topology.workspace.name.clone(),
            topology.workspace.description.clone(),
        );
        let model = workspace.model_mut();

        let core = model
            .add_software_system(topology.core.name.clone(), topology.core.description.clone())
            .map_err(|err| BlueprintError::assembly(&topology.core.name, err))?;

        for system in &topology.systems {
            let id = model
                .add_software_system_with_location(
                    system.name.clone(),
                    system.description.clone(),
                    system.location,
                )
                .and_then(|id| model.connect(core, id, system.label.clone()).map(|_| id))
                .map_err(|err| BlueprintError::assembly(&system.name, err))?;
            debug!(
                name = system.name.as_str(),
                id:% = id,
                location:? = system.location;
                "Upstream system added",
            );
        }

        for actor in &topology.actors {
            let id = model
                .add_person(actor.name.clone(), actor.description.clone())
                .and_then(|id| model.connect(id, core, actor.label.clone()).map(|_| id))
                .map_err(|err| BlueprintError::assembly(&actor.name, err))?;
            debug!(name = actor.name.as_str(), id:% = id; "Actor added");
        }

        for container in &topology.containers {
            Self::add_container(model, core, container)?;
        }

        let views = &topology.views;
        workspace
            .create_system_context_view(
                core,
                views.system_context.key.clone(),
                views.system_context.description.clone(),
            )
            .map_err(|err| BlueprintError::assembly(&views.system_context.key, err))?;
        workspace
            .create_container_view(
                core,
                views.container.key.clone(),
                views.container.description.clone(),
            )
            .map_err(|err| BlueprintError::assembly(&views.container.key, err))?;

        info!(
            elements = workspace.model().elements().len(),
            relationships = workspace.model().relationships().len(),
            views = workspace.views().len();
            "Workspace assembled",
        );
        Ok(workspace)
    }

    fn add_container(
        model: &mut Model,
        core: ElementId,
        spec: &ContainerSpec,
    ) -> Result<ElementId, BlueprintError> {
        let wrap = |err: ModelError| BlueprintError::assembly(&spec.name, err);

        let id = model
            .add_container(
                core,
                spec.name.clone(),
                spec.description.clone(),
                spec.technology.clone(),
            )
            .map_err(wrap)?;

        for Link { element, label } in &spec.used_by {
            let source = model.lookup(element).map_err(wrap)?.id();
            model.connect(source, id, label.clone()).map_err(wrap)?;
        }
        for Link { element, label } in &spec.uses {
            let destination = model.lookup(element).map_err(wrap)?.id();
            model.connect(id, destination, label.clone()).map_err(wrap)?;
        }

        debug!(
            name = spec.name.as_str(),
            uses = spec.uses.len(),
            used_by = spec.used_by.len();
            "Container added",
        );
        Ok(id)
    }
}


#[cfg(test)]
mod proptest_tests {
    use proptest::prelude::*;

    use super::*;
    use crate::topology::{SystemSpec, WorkspaceSpec};

    fn container_name(index: usize) -> String {
        format!("Service {index}")
    }

    /// Container `i` uses container `targets[i]`.
    fn chain(targets: &[usize]) -> Topology {
        targets.iter().enumerate().fold(
            Topology::new(
                WorkspaceSpec::new("NVA", "NVA"),
                SystemSpec::new("NvaCore", "Core"),
            ),
            |topology, (index, &target)| {
                topology.with_container(
                    ContainerSpec::new(container_name(index), "A service", "AWS Lambda")
                        .uses(container_name(target), "Calls"),
                )
            },
        )
    }

    fn targets_strategy() -> impl Strategy<Value = Vec<usize>> {
        (1usize..8).prop_flat_map(|len| proptest::collection::vec(0..len, len))
    }

    proptest! {
        #[test]
        fn links_resolve_only_against_earlier_containers(targets in targets_strategy()) {
            let result = Assembler::new(&chain(&targets)).assemble();
            let forward = targets.iter().enumerate().find(|&(index, &target)| target > index);

            match forward {
                None => {
                    let workspace = result.unwrap();
                    prop_assert_eq!(workspace.model().relationships().len(), targets.len());
                }
                Some((index, &target)) => match result {
                    Err(BlueprintError::Assembly { element, source }) => {
                        prop_assert_eq!(element, container_name(index));
                        prop_assert_eq!(source, ModelError::NotFound(container_name(target)));
                    }
                    other => prop_assert!(false, "unexpected result: {:?}", other.map(|_| ())),
                },
            }
        }
    }
}
