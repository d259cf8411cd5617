use indexmap::IndexMap;
use ontoview::graph::{build, GraphOptions};
use ontoview::model::{ClassNode, ClassTable, DescriptionIndex};
use ontoview::property::PropertySummary;
use ontoview::view;
use pretty_assertions::assert_eq;
use serde_json::{from_value, json};
use std::collections::HashMap;

fn table() -> ClassTable {
    let nodes: Vec<ClassNode> = from_value(json!([
        {
            "label": "Agent",
            "cls": "http://example.org/onto#Agent",
            "lang": "en",
            "leaf": false,
            "children": [
                {
                    "label": "Person",
                    "cls": "http://example.org/onto#Person",
                    "lang": "en",
                    "leaf": true
                },
                {
                    "label": "Organisation",
                    "cls": "http://example.org/onto#Organisation",
                    "lang": "en",
                    "leaf": true
                }
            ]
        }
    ]))
    .unwrap();

    ClassTable::from_tree(&nodes, &DescriptionIndex::new())
}

fn focus() -> Vec<String> {
    vec![String::from("http://example.org/onto#Agent")]
}

fn rows() -> Vec<serde_json::Map<String, serde_json::Value>> {
    view::classes_by_iris(&table(), &focus(), true, true, "en")
}

#[test]
fn test_build_nodes_and_edges() {
    let graph = build(
        &rows(),
        &focus(),
        &DescriptionIndex::new(),
        &HashMap::new(),
        &GraphOptions::default(),
    );

    //one node per class, deduplicated by id
    assert_eq!(graph.nodes.len(), 3);

    let agent = graph
        .nodes
        .iter()
        .find(|node| node.id == "http://example.org/onto#Agent")
        .expect("Agent node");
    assert_eq!(agent.label, "Agent");
    assert_eq!(agent.color, "#ABEBC6"); //non-leaf
    assert_eq!(agent.shape, "dot");
    assert_eq!(agent.size, 40);
    assert_eq!(agent.border_width, 3); //focused

    let person = graph
        .nodes
        .iter()
        .find(|node| node.id == "http://example.org/onto#Person")
        .expect("Person node");
    assert_eq!(person.color, "#ACF"); //leaf
    assert_eq!(person.border_width, 1);

    //one edge per class->superclass pair
    assert_eq!(graph.edges.len(), 2);
    for edge in &graph.edges {
        assert_eq!(edge.to, "http://example.org/onto#Agent");
        assert_eq!(edge.color, "#AEB6BF");
    }
}

#[test]
fn test_build_skips_edges_without_both_ends() {
    //a lone subclass row whose superclass has no node of its own
    let nodes: Vec<ClassNode> = from_value(json!([
        {
            "label": "Agent",
            "cls": "http://example.org/onto#Agent",
            "lang": "en",
            "leaf": false,
            "children": [
                {
                    "label": "Person",
                    "cls": "http://example.org/onto#Person",
                    "lang": "en",
                    "leaf": true
                }
            ]
        }
    ]))
    .unwrap();
    let table = ClassTable::from_tree(&nodes, &DescriptionIndex::new());
    let person = vec![String::from("http://example.org/onto#Person")];
    let rows = view::classes_by_iris(&table, &person, false, false, "en");

    let graph = build(
        &rows,
        &person,
        &DescriptionIndex::new(),
        &HashMap::new(),
        &GraphOptions::default(),
    );

    assert_eq!(graph.nodes.len(), 1);
    assert_eq!(graph.edges.len(), 0);
}

#[test]
fn test_tooltip_wraps_and_truncates() {
    let mut descriptions = DescriptionIndex::new();
    descriptions.insert(
        String::from("http://example.org/onto#Agent"),
        IndexMap::from([(String::from("en"), "x".repeat(250))]),
    );

    let graph = build(
        &rows(),
        &focus(),
        &descriptions,
        &HashMap::new(),
        &GraphOptions {
            verbose: false,
            ..GraphOptions::default()
        },
    );

    let agent = graph
        .nodes
        .iter()
        .find(|node| node.id == "http://example.org/onto#Agent")
        .expect("Agent node");

    //200 characters shown, wrapped every 50, then the marker
    assert!(agent.tooltip.starts_with("Description:\n"));
    assert!(agent.tooltip.ends_with("...(see complete in visualization)"));
    assert_eq!(agent.tooltip.matches('x').count(), 200);
    assert_eq!(agent.tooltip.matches('\n').count(), 5);

    //classes without a description get the placeholder
    let person = graph
        .nodes
        .iter()
        .find(|node| node.id == "http://example.org/onto#Person")
        .expect("Person node");
    assert_eq!(person.tooltip, "Not available...");
}

#[test]
fn test_tooltip_lists_at_most_three_properties_per_kind() {
    let summaries: Vec<PropertySummary> = (0..5)
        .map(|n| PropertySummary {
            property: format!("http://example.org/onto#has{}", n),
            range: String::from("http://www.w3.org/2001/XMLSchema#string"),
            kind: String::from("datatypeproperty"),
        })
        .collect();
    let properties = HashMap::from([(String::from("http://example.org/onto#Agent"), summaries)]);

    let graph = build(
        &rows(),
        &focus(),
        &DescriptionIndex::new(),
        &properties,
        &GraphOptions::default(),
    );

    let agent = graph
        .nodes
        .iter()
        .find(|node| node.id == "http://example.org/onto#Agent")
        .expect("Agent node");

    assert!(agent.tooltip.contains("Datatype Properties [3/5]:"));
    assert!(agent.tooltip.contains("• has0"));
    assert!(agent.tooltip.contains("• has2"));
    assert!(!agent.tooltip.contains("• has3"));
    assert!(agent.tooltip.contains("...(see complete in visualization)"));
    assert!(agent.tooltip.contains("Object Properties [0/0]:"));
}

#[test]
fn test_tooltip_brief_mode_skips_properties() {
    let properties = HashMap::from([(
        String::from("http://example.org/onto#Agent"),
        vec![PropertySummary {
            property: String::from("http://example.org/onto#hasName"),
            range: String::from("http://www.w3.org/2001/XMLSchema#string"),
            kind: String::from("datatypeproperty"),
        }],
    )]);

    let graph = build(
        &rows(),
        &focus(),
        &DescriptionIndex::new(),
        &properties,
        &GraphOptions {
            verbose: false,
            ..GraphOptions::default()
        },
    );

    let agent = graph
        .nodes
        .iter()
        .find(|node| node.id == "http://example.org/onto#Agent")
        .expect("Agent node");
    assert!(!agent.tooltip.contains("Datatype Properties"));
}

#[test]
fn test_build_with_property_nodes() {
    let properties = HashMap::from([(
        String::from("http://example.org/onto#Person"),
        vec![
            PropertySummary {
                property: String::from("http://example.org/onto#hasName"),
                range: String::from("http://www.w3.org/2001/XMLSchema#string"),
                kind: String::from("datatypeproperty"),
            },
            PropertySummary {
                property: String::from("http://example.org/onto#memberOf"),
                range: String::from("http://example.org/onto#Organisation"),
                kind: String::from("objectproperty"),
            },
            PropertySummary {
                property: String::from("http://example.org/onto#basedIn"),
                range: String::from("http://example.org/onto#Place"),
                kind: String::from("objectproperty"),
            },
        ],
    )]);

    let graph = build(
        &rows(),
        &focus(),
        &DescriptionIndex::new(),
        &properties,
        &GraphOptions {
            with_properties: true,
            ..GraphOptions::default()
        },
    );

    //3 classes + 1 datatype box + 1 external object range;
    //Organisation is already a class node and is reused
    assert_eq!(graph.nodes.len(), 5);

    let datatype = graph
        .nodes
        .iter()
        .find(|node| node.shape == "box")
        .expect("datatype range box");
    assert_eq!(datatype.label, "string");
    assert_eq!(datatype.color, "#FC3");

    let place = graph
        .nodes
        .iter()
        .find(|node| node.id == "http://example.org/onto#Place")
        .expect("external range node");
    assert_eq!(place.label, "Place");
    assert_eq!(place.shape, "dot");

    let member_of = graph
        .edges
        .iter()
        .find(|edge| edge.label == "memberOf")
        .expect("labelled property edge");
    assert_eq!(member_of.from, "http://example.org/onto#Person");
    assert_eq!(member_of.to, "http://example.org/onto#Organisation");
    assert_eq!(member_of.color, "#000");

    let has_name = graph
        .edges
        .iter()
        .find(|edge| edge.label == "hasName")
        .expect("datatype property edge");
    assert_eq!(
        has_name.to,
        "http://example.org/onto#Person::http://example.org/onto#hasName"
    );
}
