//! Declarative description of a system landscape.
//!
//! A [`Topology`] lists the core system, its upstream systems, the actors
//! using it and its containers with their links. It is plain data: the
//! [`Assembler`](crate::assemble::Assembler) turns it into a
//! [`Workspace`](blueprint_core::workspace::Workspace).
//!
//! Topologies are usually written in TOML:
//!
//! ```toml
//! [workspace]
//! name = "NVA"
//! description = "The NVA application landscape"
//!
//! [core]
//! name = "NvaCore"
//! description = "The NVA core application"
//!
//! [[systems]]
//! name = "Orcid"
//! description = "The Orcid application"
//! label = "Gets and creates ORCID identifier in"
//!
//! [[systems]]
//! name = "Archive"
//! description = "The in-house archive"
//! label = "Deposits publications in"
//! location = "internal"
//!
//! [[containers]]
//! name = "Public API"
//! description = "The public API for NVA"
//! technology = "AWS API Gateway"
//! uses = [{ element = "Orcid", label = "Integrates with" }]
//! ```

use serde::Deserialize;

use blueprint_core::model::Location;

/// The whole landscape, in assembly order.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Topology {
    pub workspace: WorkspaceSpec,
    pub core: SystemSpec,

    /// Systems the core depends on. Each gets a `core -> system`
    /// relationship carrying `label`.
    #[serde(default)]
    pub systems: Vec<UpstreamSpec>,

    /// People and feeds using the core. Each gets an `actor -> core`
    /// relationship carrying `label`.
    #[serde(default)]
    pub actors: Vec<LinkedSpec>,

    /// Containers of the core, added in order. Links may only name elements
    /// declared earlier.
    #[serde(default)]
    pub containers: Vec<ContainerSpec>,

    #[serde(default)]
    pub views: ViewsSpec,
}

impl Topology {
    pub fn new(workspace: WorkspaceSpec, core: SystemSpec) -> Self {
        Self {
            workspace,
            core,
            systems: Vec::new(),
            actors: Vec::new(),
            containers: Vec::new(),
            views: ViewsSpec::default(),
        }
    }

    pub fn with_system(
        mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        label: impl Into<String>,
    ) -> Self {
        self.systems.push(UpstreamSpec::new(name, description, label));
        self
    }

    pub fn with_upstream(mut self, system: UpstreamSpec) -> Self {
        self.systems.push(system);
        self
    }

    pub fn with_actor(
        mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        label: impl Into<String>,
    ) -> Self {
        self.actors.push(LinkedSpec::new(name, description, label));
        self
    }

    pub fn with_container(mut self, container: ContainerSpec) -> Self {
        self.containers.push(container);
        self
    }

    pub fn with_views(mut self, views: ViewsSpec) -> Self {
        self.views = views;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WorkspaceSpec {
    pub name: String,
    pub description: String,
}

impl WorkspaceSpec {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SystemSpec {
    pub name: String,
    pub description: String,
}

impl SystemSpec {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

/// An element together with the label of its relationship to the core.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LinkedSpec {
    pub name: String,
    pub description: String,
    pub label: String,
}

impl LinkedSpec {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        label: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            label: label.into(),
        }
    }
}

/// A system the core depends on. Upstream systems are external unless
/// stated otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpstreamSpec {
    pub name: String,
    pub description: String,
    pub label: String,

    #[serde(default = "UpstreamSpec::default_location")]
    pub location: Location,
}

impl UpstreamSpec {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        label: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            label: label.into(),
            location: Self::default_location(),
        }
    }

    pub fn located(mut self, location: Location) -> Self {
        self.location = location;
        self
    }

    fn default_location() -> Location {
        Location::External
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContainerSpec {
    pub name: String,
    pub description: String,
    pub technology: String,

    /// Elements this container depends on.
    #[serde(default)]
    pub uses: Vec<Link>,

    /// Elements depending on this container.
    #[serde(default)]
    pub used_by: Vec<Link>,
}

impl ContainerSpec {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        technology: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            technology: technology.into(),
            uses: Vec::new(),
            used_by: Vec::new(),
        }
    }

    pub fn uses(mut self, element: impl Into<String>, label: impl Into<String>) -> Self {
        self.uses.push(Link::new(element, label));
        self
    }

    pub fn used_by(mut self, element: impl Into<String>, label: impl Into<String>) -> Self {
        self.used_by.push(Link::new(element, label));
        self
    }
}

/// A labelled reference to another element by name.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Link {
    pub element: String,
    pub label: String,
}

impl Link {
    pub fn new(element: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            element: element.into(),
            label: label.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ViewSpec {
    pub key: String,
    pub description: String,
}

impl ViewSpec {
    pub fn new(key: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            description: description.into(),
        }
    }
}

/// The two views derived for the core system.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ViewsSpec {
    #[serde(default = "ViewsSpec::default_system_context")]
    pub system_context: ViewSpec,

    #[serde(default = "ViewsSpec::default_container")]
    pub container: ViewSpec,
}

impl ViewsSpec {
    fn default_system_context() -> ViewSpec {
        ViewSpec::new("SystemContext", "System Context diagram")
    }

    fn default_container() -> ViewSpec {
        ViewSpec::new("Containers", "Container diagram")
    }
}

impl Default for ViewsSpec {
    fn default() -> Self {
        Self {
            system_context: Self::default_system_context(),
            container: Self::default_container(),
        }
    }
}
