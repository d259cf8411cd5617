use indexmap::IndexMap;
use lazy_static::lazy_static;
use serde::Deserialize;
use std::collections::HashMap;

lazy_static! {
    static ref LANGUAGE_NAMES: HashMap<&'static str, &'static str> =
        HashMap::from([("en", "English"), ("de", "German"), ("fr", "French")]);
}

/// One node of the nested class tree as the ontology-management service
/// returns it. A node whose `leaf` flag is set has no `children`.
#[derive(Clone, Debug, Deserialize)]
pub struct ClassNode {
    pub label: String,
    pub cls: String,
    #[serde(default)]
    pub lang: String,
    #[serde(default)]
    pub leaf: bool,
    #[serde(default)]
    pub children: Vec<ClassNode>,
}

/// One row of the flattened class table: a class together with one of its
/// superclass edges. A class with N superclasses appears as N rows; a root
/// class has empty superclass fields.
#[derive(Clone, Debug, PartialEq)]
pub struct ClassRow {
    pub label: String,
    pub iri: String,
    pub language: String,
    pub is_leaf: bool,
    pub superclass_label: String,
    pub superclass_iri: String,
    pub superclass_language: String,
    pub descriptions: IndexMap<String, String>,
}

/// Entity IRI -> language tag -> description text.
pub type DescriptionIndex = HashMap<String, IndexMap<String, String>>;

/// The flattened class model that all views derive from.
#[derive(Clone, Debug, Default)]
pub struct ClassTable {
    pub rows: Vec<ClassRow>,
}

impl ClassTable {
    pub fn new(rows: Vec<ClassRow>) -> ClassTable {
        ClassTable { rows }
    }

    /// Flatten a class tree, fold in descriptions, and fill the gaps,
    /// yielding a ready-to-query table.
    pub fn from_tree(nodes: &[ClassNode], descriptions: &DescriptionIndex) -> ClassTable {
        let mut rows = flatten(nodes);
        merge_descriptions(&mut rows, descriptions);
        normalize(&mut rows);
        ClassTable::new(rows)
    }

    /// The description column names present anywhere in the table,
    /// in first-seen order.
    pub fn description_columns(&self) -> Vec<String> {
        let mut columns: Vec<String> = Vec::new();
        for row in &self.rows {
            for key in row.descriptions.keys() {
                if !columns.contains(key) {
                    columns.push(key.clone());
                }
            }
        }
        columns
    }
}

///Given the nested class tree, return one flat row per (class, superclass)
///edge via a depth-first descent. Each row carries its immediate parent's
///label/IRI/language only; roots carry empty strings. The row count equals
///the node count of the tree.
pub fn flatten(nodes: &[ClassNode]) -> Vec<ClassRow> {
    let mut rows = Vec::new();
    flatten_into(nodes, None, &mut rows);
    rows
}

fn flatten_into(nodes: &[ClassNode], parent: Option<&ClassNode>, rows: &mut Vec<ClassRow>) {
    for node in nodes {
        rows.push(ClassRow {
            label: node.label.clone(),
            iri: node.cls.clone(),
            language: node.lang.clone(),
            is_leaf: node.leaf,
            superclass_label: parent.map(|p| p.label.clone()).unwrap_or_default(),
            superclass_iri: parent.map(|p| p.cls.clone()).unwrap_or_default(),
            superclass_language: parent.map(|p| p.lang.clone()).unwrap_or_default(),
            descriptions: IndexMap::new(),
        });
        if !node.leaf {
            flatten_into(&node.children, Some(node), rows);
        }
    }
}

///Given flattened class rows and a description index, add one
///`Description(<language>)` column per language to every row whose IRI the
///index knows. Rows without an index entry are left untouched here and
///filled by [`normalize`].
pub fn merge_descriptions(rows: &mut [ClassRow], index: &DescriptionIndex) {
    for row in rows.iter_mut() {
        if let Some(languages) = index.get(&row.iri) {
            for (tag, text) in languages {
                row.descriptions
                    .insert(description_column(tag), text.clone());
            }
        }
    }
}

///Ensure every row carries every description column seen anywhere in the
///table, with the empty string standing in for missing text.
pub fn normalize(rows: &mut [ClassRow]) {
    let mut columns: Vec<String> = Vec::new();
    for row in rows.iter() {
        for key in row.descriptions.keys() {
            if !columns.contains(key) {
                columns.push(key.clone());
            }
        }
    }
    for row in rows.iter_mut() {
        for column in &columns {
            row.descriptions.entry(column.clone()).or_default();
        }
    }
}

///Given a language tag, return the description column name for it.
///Known tags map to their English names; unknown tags are used verbatim.
pub fn description_column(tag: &str) -> String {
    format!("Description({})", language_name(tag))
}

pub fn language_name(tag: &str) -> &str {
    LANGUAGE_NAMES.get(tag).copied().unwrap_or(tag)
}

///Given an IRI, return its fragment: the substring after the last `#`,
///or the whole IRI when it has none.
pub fn label_from_iri(iri: &str) -> &str {
    match iri.rsplit_once('#') {
        Some((_namespace, fragment)) => fragment,
        None => iri,
    }
}
