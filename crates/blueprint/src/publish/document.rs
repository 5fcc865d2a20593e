//! The Structurizr JSON workspace document.
//!
//! Element and relationship ids are the model's sequence numbers rendered as
//! strings. Relationships are nested under their source element and every
//! container is nested under its software system.

use serde::Serialize;

use blueprint_core::{
    model::{Element, ElementId, Location, Model, Relationship},
    view::{View, ViewKind},
    workspace::Workspace,
};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceDocument {
    pub id: u64,
    pub name: String,
    pub description: String,
    pub model: ModelDocument,
    pub views: ViewsDocument,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelDocument {
    pub people: Vec<ElementDocument>,
    pub software_systems: Vec<ElementDocument>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementDocument {
    pub id: String,
    pub tags: &'static str,
    pub name: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub technology: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub containers: Vec<ElementDocument>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub relationships: Vec<RelationshipDocument>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationshipDocument {
    pub id: String,
    pub tags: &'static str,
    pub source_id: String,
    pub destination_id: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub technology: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewsDocument {
    pub system_context_views: Vec<ViewDocument>,
    pub container_views: Vec<ViewDocument>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewDocument {
    pub key: String,
    pub description: String,
    pub software_system_id: String,
    pub elements: Vec<Reference>,
    pub relationships: Vec<Reference>,
    pub automatic_layout: AutomaticLayout,
}

#[derive(Debug, Serialize)]
pub struct Reference {
    pub id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AutomaticLayout {
    pub implementation: &'static str,
    pub rank_direction: &'static str,
    pub rank_separation: u32,
    pub node_separation: u32,
    pub edge_separation: u32,
    pub vertices: bool,
}

impl Default for AutomaticLayout {
    fn default() -> Self {
        Self {
            implementation: "Graphviz",
            rank_direction: "TopBottom",
            rank_separation: 300,
            node_separation: 300,
            edge_separation: 0,
            vertices: false,
        }
    }
}

impl WorkspaceDocument {
    pub fn new(id: u64, workspace: &Workspace) -> Self {
        let model = workspace.model();
        let views = workspace.views();

        Self {
            id,
            name: workspace.name().to_string(),
            description: workspace.description().to_string(),
            model: ModelDocument {
                people: model.people().map(|p| element(model, p)).collect(),
                software_systems: model
                    .software_systems()
                    .map(|s| element(model, s))
                    .collect(),
            },
            views: ViewsDocument {
                system_context_views: views
                    .of_kind(ViewKind::SystemContext)
                    .map(|v| view(model, v))
                    .collect(),
                container_views: views
                    .of_kind(ViewKind::Container)
                    .map(|v| view(model, v))
                    .collect(),
            },
        }
    }
}

fn reference(model: &Model, id: ElementId) -> String {
    model
        .element(id)
        .map(|e| e.sequence().to_string())
        .unwrap_or_default()
}

fn element(model: &Model, element: &Element) -> ElementDocument {
    let (tags, location) = match element.location() {
        Some(Location::Internal) => ("Element,Software System", Some("Internal")),
        Some(Location::External) => ("Element,Software System", Some("External")),
        None if element.parent().is_some() => ("Element,Container", None),
        None => ("Element,Person", None),
    };

    let containers = element
        .containers()
        .iter()
        .filter_map(|&id| model.element(id).ok())
        .map(|c| self::element(model, c))
        .collect();

    ElementDocument {
        id: element.sequence().to_string(),
        tags,
        name: element.name().to_string(),
        description: element.description().to_string(),
        location,
        technology: element.technology().map(str::to_string),
        containers,
        relationships: model
            .relationships_from(element.id())
            .map(|r| relationship(model, r))
            .collect(),
    }
}

fn relationship(model: &Model, relationship: &Relationship) -> RelationshipDocument {
    RelationshipDocument {
        id: relationship.sequence().to_string(),
        tags: "Relationship",
        source_id: reference(model, relationship.source()),
        destination_id: reference(model, relationship.destination()),
        description: relationship.description().to_string(),
        technology: relationship.technology().map(str::to_string),
    }
}

fn view(model: &Model, view: &View) -> ViewDocument {
    ViewDocument {
        key: view.key().to_string(),
        description: view.description().to_string(),
        software_system_id: reference(model, view.scope()),
        elements: view
            .elements()
            .iter()
            .map(|&id| Reference {
                id: reference(model, id),
            })
            .collect(),
        relationships: view
            .relationships()
            .iter()
            .filter_map(|&id| model.relationship(id))
            .map(|r| Reference {
                id: r.sequence().to_string(),
            })
            .collect(),
        automatic_layout: AutomaticLayout::default(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::*;

    fn workspace() -> Workspace {
        let mut workspace = Workspace::new("NVA", "The NVA landscape");
        let model = workspace.model_mut();
        let core = model.add_software_system("NvaCore", "Core").unwrap();
        let orcid = model
            .add_software_system_with_location("Orcid", "Orcid", Location::External)
            .unwrap();
        let user = model.add_person("Creator", "A user").unwrap();
        let api = model.add_container(core, "Public API", "API", "AWS API Gateway").unwrap();
        model.connect(user, core, "Creates publications in").unwrap();
        model.connect(api, orcid, "Integrates with").unwrap();
        workspace
            .create_system_context_view(core, "SystemContext", "Context")
            .unwrap();
        workspace
            .create_container_view(core, "Container view", "Containers")
            .unwrap();
        workspace
    }

    #[test]
    fn test_document_shape() {
        let document = WorkspaceDocument::new(42, &workspace());
        let value = serde_json::to_value(&document).unwrap();

        assert_eq!(value["id"], json!(42));
        assert_eq!(value["name"], json!("NVA"));

        let people = value["model"]["people"].as_array().unwrap();
        assert_eq!(people.len(), 1);
        assert_eq!(people[0]["id"], json!("3"));
        assert_eq!(people[0]["tags"], json!("Element,Person"));
        assert_eq!(people[0]["relationships"][0]["sourceId"], json!("3"));
        assert_eq!(people[0]["relationships"][0]["destinationId"], json!("1"));
        assert!(people[0].get("location").is_none());

        let systems = value["model"]["softwareSystems"].as_array().unwrap();
        assert_eq!(systems.len(), 2);
        assert_eq!(systems[0]["location"], json!("Internal"));
        assert_eq!(systems[1]["location"], json!("External"));

        let container = &systems[0]["containers"][0];
        assert_eq!(container["name"], json!("Public API"));
        assert_eq!(container["technology"], json!("AWS API Gateway"));
        assert_eq!(container["relationships"][0]["destinationId"], json!("2"));
        assert!(systems[1].get("containers").is_none());
    }

    #[test]
    fn test_views() {
        let document = WorkspaceDocument::new(1, &workspace());
        let value = serde_json::to_value(&document).unwrap();

        let context = &value["views"]["systemContextViews"][0];
        assert_eq!(context["key"], json!("SystemContext"));
        assert_eq!(context["softwareSystemId"], json!("1"));
        assert_eq!(context["elements"].as_array().unwrap().len(), 3);
        assert_eq!(
            context["relationships"],
            Value::Array(vec![json!({ "id": "5" })])
        );

        let containers = &value["views"]["containerViews"][0];
        assert_eq!(containers["key"], json!("Container view"));
        assert_eq!(containers["elements"], json!([{ "id": "4" }]));
        assert_eq!(containers["automaticLayout"]["rankDirection"], json!("TopBottom"));
    }
}
