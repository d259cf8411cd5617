use crate::model::{label_from_iri, DescriptionIndex};
use crate::property::PropertySummary;
use crate::view;
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::HashMap;

static NON_LEAF_COLOR: &str = "#ABEBC6";
static LEAF_COLOR: &str = "#ACF";
static RANGE_COLOR: &str = "#FC3";
static CLASS_EDGE_COLOR: &str = "#AEB6BF";
static PROPERTY_EDGE_COLOR: &str = "#000";
static CLASS_SHAPE: &str = "dot";
static RANGE_SHAPE: &str = "box";
static NODE_SIZE: u32 = 40;
static TOOLTIP_BUDGET: usize = 200;
static TOOLTIP_LINE: usize = 50;
static LISTED_PROPERTIES: usize = 3;

/// One node of the widget-ready graph. Ids are IRIs, except for
/// datatype-range boxes which get one node per (class, property).
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GraphNode {
    pub id: String,
    pub label: String,
    pub color: String,
    pub shape: String,
    pub size: u32,
    pub tooltip: String,
    pub border_width: u32,
}

/// A directed edge; class edges run from a class to its superclass.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GraphEdge {
    pub from: String,
    pub to: String,
    pub label: String,
    pub color: String,
}

/// The node/edge lists handed to an external force-directed widget.
/// No layout is computed here.
#[derive(Clone, Debug, Serialize)]
pub struct Graph {
    pub title: String,
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

#[derive(Clone, Debug)]
pub struct GraphOptions {
    pub title: String,
    pub with_properties: bool,
    pub subclasses: bool,
    pub superclasses: bool,
    pub verbose: bool,
    pub language: String,
}

impl Default for GraphOptions {
    fn default() -> GraphOptions {
        GraphOptions {
            title: String::from("Network Graph"),
            with_properties: false,
            subclasses: true,
            superclasses: true,
            verbose: true,
            language: String::from("en"),
        }
    }
}

///Given hierarchy rows (see [`view::classes_by_iris`]), the focused IRIs,
///a description index and per-class property summaries, build the graph:
///one node per class colored by its leaf flag, one edge per
///class->superclass pair, and (optionally) one node per property range
///plus one labelled edge per property. Nodes are deduplicated by id;
///class edges are only kept when both of their ends have nodes.
pub fn build(
    rows: &[Map<String, Value>],
    focus: &[String],
    descriptions: &DescriptionIndex,
    properties: &HashMap<String, Vec<PropertySummary>>,
    opts: &GraphOptions,
) -> Graph {
    let mut nodes: IndexMap<String, GraphNode> = IndexMap::new();
    let mut class_edges: Vec<GraphEdge> = Vec::new();
    let mut property_edges: Vec<GraphEdge> = Vec::new();

    //class nodes and subsumption edges
    for row in rows {
        let iri = get_str(row, view::CLASS_IRI);
        if iri.is_empty() {
            continue;
        }

        let superclass_iri = get_str(row, view::SUPERCLASS_IRI);
        if !superclass_iri.is_empty() {
            class_edges.push(GraphEdge {
                from: iri.clone(),
                to: superclass_iri,
                label: String::new(),
                color: String::from(CLASS_EDGE_COLOR),
            });
        }

        if nodes.contains_key(&iri) {
            continue;
        }

        let is_leaf = row
            .get(view::IS_LEAF)
            .and_then(Value::as_bool)
            .unwrap_or(false);
        let mut tooltip = format_description(lookup(descriptions, &iri, &opts.language));
        if opts.verbose {
            tooltip += &format_properties(summaries(properties, &iri));
        }

        nodes.insert(
            iri.clone(),
            GraphNode {
                id: iri.clone(),
                label: get_str(row, view::CLASS_LABEL),
                color: String::from(if is_leaf { LEAF_COLOR } else { NON_LEAF_COLOR }),
                shape: String::from(CLASS_SHAPE),
                size: NODE_SIZE,
                tooltip,
                border_width: if focus.contains(&iri) { 3 } else { 1 },
            },
        );
    }

    //property nodes and edges, once the class nodes are in place
    if opts.with_properties {
        let class_ids: Vec<String> = nodes.keys().cloned().collect();
        for iri in class_ids {
            for summary in summaries(properties, &iri) {
                let property_label = String::from(label_from_iri(&summary.property));

                if summary.kind == "objectproperty" {
                    let range = summary.range.clone();
                    if !nodes.contains_key(&range) {
                        let mut tooltip =
                            format_description(lookup(descriptions, &range, &opts.language));
                        if opts.verbose {
                            tooltip += &format_properties(summaries(properties, &range));
                        }
                        nodes.insert(
                            range.clone(),
                            GraphNode {
                                id: range.clone(),
                                label: String::from(label_from_iri(&range)),
                                color: String::from(NON_LEAF_COLOR),
                                shape: String::from(CLASS_SHAPE),
                                size: NODE_SIZE,
                                tooltip,
                                border_width: 1,
                            },
                        );
                    }
                    property_edges.push(GraphEdge {
                        from: iri.clone(),
                        to: range,
                        label: property_label,
                        color: String::from(PROPERTY_EDGE_COLOR),
                    });
                } else {
                    //one box per (class, property) so shared datatype
                    //ranges stay separate nodes
                    let node_id = format!("{}::{}", iri, summary.property);
                    if !nodes.contains_key(&node_id) {
                        nodes.insert(
                            node_id.clone(),
                            GraphNode {
                                id: node_id.clone(),
                                label: String::from(label_from_iri(&summary.range)),
                                color: String::from(RANGE_COLOR),
                                shape: String::from(RANGE_SHAPE),
                                size: NODE_SIZE,
                                tooltip: String::new(),
                                border_width: 1,
                            },
                        );
                    }
                    property_edges.push(GraphEdge {
                        from: iri.clone(),
                        to: node_id,
                        label: property_label,
                        color: String::from(PROPERTY_EDGE_COLOR),
                    });
                }
            }
        }
    }

    let edges: Vec<GraphEdge> = class_edges
        .into_iter()
        .filter(|edge| nodes.contains_key(&edge.from) && nodes.contains_key(&edge.to))
        .chain(property_edges)
        .collect();

    Graph {
        title: opts.title.clone(),
        nodes: nodes.into_values().collect(),
        edges,
    }
}

fn get_str(row: &Map<String, Value>, key: &str) -> String {
    String::from(row.get(key).and_then(Value::as_str).unwrap_or(""))
}

fn lookup<'a>(descriptions: &'a DescriptionIndex, iri: &str, language: &str) -> Option<&'a str> {
    descriptions
        .get(iri)
        .and_then(|languages| languages.get(language))
        .map(String::as_str)
}

fn summaries<'a>(
    properties: &'a HashMap<String, Vec<PropertySummary>>,
    iri: &str,
) -> &'a [PropertySummary] {
    properties.get(iri).map(Vec::as_slice).unwrap_or(&[])
}

///Render a tooltip body for a description: at most 200 characters,
///hard-wrapped every 50, with a marker when the text was cut.
fn format_description(description: Option<&str>) -> String {
    match description {
        Some(text) if !text.is_empty() => {
            let mut formatted = String::from("Description:\n");
            for (index, character) in text.chars().enumerate() {
                if index >= TOOLTIP_BUDGET {
                    formatted += "...(see complete in visualization)";
                    break;
                }
                formatted.push(character);
                if (index + 1) % TOOLTIP_LINE == 0 {
                    formatted.push('\n');
                }
            }
            formatted
        }
        _ => String::from("Not available..."),
    }
}

///Render the property section of a tooltip: up to three names per kind
///with a shown/total counter.
fn format_properties(properties: &[PropertySummary]) -> String {
    let datatype: Vec<&PropertySummary> = properties
        .iter()
        .filter(|summary| summary.kind == "datatypeproperty")
        .collect();
    let object: Vec<&PropertySummary> = properties
        .iter()
        .filter(|summary| summary.kind == "objectproperty")
        .collect();

    format!(
        "{}{}",
        format_property_list("\n\nDatatype Properties", &datatype),
        format_property_list("\nObject Properties", &object)
    )
}

fn format_property_list(heading: &str, properties: &[&PropertySummary]) -> String {
    let mut listed = String::new();
    let mut shown = 0;
    for (count, property) in properties.iter().enumerate() {
        if count < LISTED_PROPERTIES {
            listed += &format!("• {}\n", label_from_iri(&property.property));
            shown = count + 1;
        } else {
            listed += "...(see complete in visualization)";
            break;
        }
    }
    format!("{} [{}/{}]:\n{}", heading, shown, properties.len(), listed)
}
