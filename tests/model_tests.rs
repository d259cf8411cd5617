use indexmap::IndexMap;
use ontoview::model::{
    description_column, flatten, label_from_iri, ClassNode, ClassTable, DescriptionIndex,
};
use pretty_assertions::assert_eq;
use serde_json::{from_value, json};

fn tree() -> Vec<ClassNode> {
    from_value(json!([
        {
            "label": "Resource",
            "cls": "http://example.org/onto#Resource",
            "lang": "en",
            "leaf": false,
            "children": [
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
                },
                {
                    "label": "Document",
                    "cls": "http://example.org/onto#Document",
                    "lang": "en",
                    "leaf": true
                }
            ]
        }
    ]))
    .unwrap()
}

#[test]
fn test_flatten_single_root_leaf() {
    let nodes: Vec<ClassNode> = from_value(json!([
        {
            "label": "Thing",
            "cls": "http://example.org/onto#Thing",
            "lang": "en",
            "leaf": true
        }
    ]))
    .unwrap();

    let rows = flatten(&nodes);

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].label, "Thing");
    assert_eq!(rows[0].iri, "http://example.org/onto#Thing");
    assert!(rows[0].is_leaf);
    assert_eq!(rows[0].superclass_label, "");
    assert_eq!(rows[0].superclass_iri, "");
    assert_eq!(rows[0].superclass_language, "");
}

#[test]
fn test_flatten_root_with_two_children() {
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

    let rows = flatten(&nodes);

    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].superclass_iri, "");
    assert_eq!(rows[1].superclass_iri, "http://example.org/onto#Agent");
    assert_eq!(rows[1].superclass_label, "Agent");
    assert_eq!(rows[2].superclass_iri, "http://example.org/onto#Agent");
}

#[test]
fn test_flatten_carries_immediate_parent_only() {
    let rows = flatten(&tree());

    //one row per node, depth-first
    assert_eq!(rows.len(), 5);

    let person = rows
        .iter()
        .find(|row| row.label == "Person")
        .expect("Person row");
    //the immediate parent, not the root of the branch
    assert_eq!(person.superclass_iri, "http://example.org/onto#Agent");
    assert_eq!(person.superclass_label, "Agent");
}

#[test]
fn test_flatten_one_row_per_superclass_edge() {
    //the same class sitting under two parents appears once per edge
    let nodes: Vec<ClassNode> = from_value(json!([
        {
            "label": "Agent",
            "cls": "http://example.org/onto#Agent",
            "lang": "en",
            "leaf": false,
            "children": [
                {
                    "label": "Organisation",
                    "cls": "http://example.org/onto#Organisation",
                    "lang": "en",
                    "leaf": true
                }
            ]
        },
        {
            "label": "LegalEntity",
            "cls": "http://example.org/onto#LegalEntity",
            "lang": "en",
            "leaf": false,
            "children": [
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

    let rows = flatten(&nodes);
    let edges: Vec<&str> = rows
        .iter()
        .filter(|row| row.label == "Organisation")
        .map(|row| row.superclass_label.as_str())
        .collect();

    assert_eq!(rows.len(), 4);
    assert_eq!(edges, vec!["Agent", "LegalEntity"]);
}

#[test]
fn test_flatten_defaults_missing_fields() {
    let nodes: Vec<ClassNode> = from_value(json!([
        {
            "label": "Thing",
            "cls": "http://example.org/onto#Thing"
        }
    ]))
    .unwrap();

    let rows = flatten(&nodes);

    assert_eq!(rows[0].language, "");
    assert!(!rows[0].is_leaf);
}

#[test]
fn test_merge_and_normalize_descriptions() {
    let mut index = DescriptionIndex::new();
    index.insert(
        String::from("http://example.org/onto#Person"),
        IndexMap::from([(String::from("en"), String::from("A human being"))]),
    );

    let table = ClassTable::from_tree(&tree(), &index);

    let person = table
        .rows
        .iter()
        .find(|row| row.label == "Person")
        .expect("Person row");
    assert_eq!(
        person.descriptions.get("Description(English)"),
        Some(&String::from("A human being"))
    );

    //unmatched rows get the column filled with the empty string
    let document = table
        .rows
        .iter()
        .find(|row| row.label == "Document")
        .expect("Document row");
    assert_eq!(
        document.descriptions.get("Description(English)"),
        Some(&String::from(""))
    );
}

#[test]
fn test_merge_keeps_unknown_language_tags() {
    let mut index = DescriptionIndex::new();
    index.insert(
        String::from("http://example.org/onto#Document"),
        IndexMap::from([
            (String::from("de"), String::from("Ein Dokument")),
            (String::from("es"), String::from("Un documento")),
        ]),
    );

    let table = ClassTable::from_tree(&tree(), &index);

    assert_eq!(
        table.description_columns(),
        vec![
            String::from("Description(German)"),
            String::from("Description(es)")
        ]
    );
}

#[test]
fn test_description_column_names() {
    assert_eq!(description_column("en"), "Description(English)");
    assert_eq!(description_column("de"), "Description(German)");
    assert_eq!(description_column("fr"), "Description(French)");
    assert_eq!(description_column("nl"), "Description(nl)");
}

#[test]
fn test_label_from_iri() {
    assert_eq!(label_from_iri("http://example.org/onto#Person"), "Person");
    assert_eq!(label_from_iri("Person"), "Person");
    assert_eq!(
        label_from_iri("http://www.w3.org/2001/XMLSchema#string"),
        "string"
    );
}
