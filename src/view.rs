use crate::model::{description_column, ClassRow, ClassTable};
use itertools::Itertools;
use serde_json::{json, Map, Value};

pub static CLASS_LABEL: &str = "Class Label";
pub static CLASS_IRI: &str = "Class IRI";
pub static IS_LEAF: &str = "IsLeafClass";
pub static SUPERCLASS_LABEL: &str = "Superclass Label";
pub static SUPERCLASS_IRI: &str = "Superclass IRI";
pub static DESCRIPTION: &str = "Description";

enum Target {
    Iri,
    Label,
}

// ################################################
// ######## class listings ########################
// ################################################

///Given the class table and a language, return the unique classes for that
///language with columns {Class Label, Class IRI, IsLeafClass}. A class IRI
///never appears twice in the result.
pub fn all_classes(table: &ClassTable, language: &str) -> Vec<Map<String, Value>> {
    table
        .rows
        .iter()
        .filter(|row| row.language == language)
        .unique_by(|row| row.iri.clone())
        .map(class_row)
        .collect()
}

///The classes without subclasses, in the shape of [`all_classes`].
pub fn leaves(table: &ClassTable, language: &str) -> Vec<Map<String, Value>> {
    table
        .rows
        .iter()
        .filter(|row| row.language == language && row.is_leaf)
        .unique_by(|row| row.iri.clone())
        .map(class_row)
        .collect()
}

///The classes with subclasses, in the shape of [`all_classes`].
pub fn non_leaves(table: &ClassTable, language: &str) -> Vec<Map<String, Value>> {
    table
        .rows
        .iter()
        .filter(|row| row.language == language && !row.is_leaf)
        .unique_by(|row| row.iri.clone())
        .map(class_row)
        .collect()
}

///Every subclass edge of the model: rows with a non-empty superclass,
///deduplicated on (class IRI, superclass IRI).
pub fn subclasses(table: &ClassTable, language: &str) -> Vec<Map<String, Value>> {
    table
        .rows
        .iter()
        .filter(|row| row.language == language && !row.superclass_label.is_empty())
        .unique_by(|row| (row.iri.clone(), row.superclass_iri.clone()))
        .map(hierarchy_row)
        .collect()
}

// ################################################
// ######## hierarchy selection ###################
// ################################################

///Given a list of class IRIs, return the matching rows of the class table
///along with their relations: when `with_subclasses`, rows whose superclass
///is a target; when `with_superclasses`, the direct superclass row of every
///row already selected. The superclass walk is a single pass, not a
///transitive closure, so ancestors more than one level above a selected row
///are not collected.
///
///Panics when `iris` is empty.
pub fn classes_by_iris(
    table: &ClassTable,
    iris: &[String],
    with_subclasses: bool,
    with_superclasses: bool,
    language: &str,
) -> Vec<Map<String, Value>> {
    select_hierarchy(
        table,
        iris,
        Target::Iri,
        with_subclasses,
        with_superclasses,
        language,
    )
}

///The label-addressed variant of [`classes_by_iris`]: targets match on the
///class label instead of the IRI. Panics when `labels` is empty.
pub fn classes_by_labels(
    table: &ClassTable,
    labels: &[String],
    with_subclasses: bool,
    with_superclasses: bool,
    language: &str,
) -> Vec<Map<String, Value>> {
    select_hierarchy(
        table,
        labels,
        Target::Label,
        with_subclasses,
        with_superclasses,
        language,
    )
}

fn select_hierarchy(
    table: &ClassTable,
    targets: &[String],
    by: Target,
    with_subclasses: bool,
    with_superclasses: bool,
    language: &str,
) -> Vec<Map<String, Value>> {
    if targets.is_empty() {
        panic!("No classes given to select");
    }

    //rows in the requested language; the superclass side may also be empty
    //because root rows carry no superclass language
    let pool: Vec<&ClassRow> = table
        .rows
        .iter()
        .filter(|row| {
            row.language == language
                && (row.superclass_language == language || row.superclass_language.is_empty())
        })
        .collect();

    let mut selected: Vec<&ClassRow> = Vec::new();
    for target in targets {
        let matches = |row: &ClassRow| match by {
            Target::Iri => row.iri == *target,
            Target::Label => row.label == *target,
        };
        let matches_superclass = |row: &ClassRow| match by {
            Target::Iri => row.superclass_iri == *target,
            Target::Label => row.superclass_label == *target,
        };

        selected.extend(pool.iter().copied().filter(|row| matches(row)));

        if with_subclasses {
            selected.extend(pool.iter().copied().filter(|row| matches_superclass(row)));
        }
        if with_superclasses {
            //one level up from everything selected so far
            let parents: Vec<String> = selected
                .iter()
                .map(|row| row.superclass_iri.clone())
                .filter(|iri| !iri.is_empty())
                .collect();
            for parent in parents {
                selected.extend(pool.iter().copied().filter(|row| row.iri == parent));
            }
        }
    }

    selected.sort_by(|a, b| a.label.cmp(&b.label));
    selected
        .into_iter()
        .unique_by(|row| (row.iri.clone(), row.superclass_iri.clone()))
        .map(hierarchy_row)
        .collect()
}

// ################################################
// ######## single-entity lookup ##################
// ################################################

///Given an IRI or a label, return the matching class with its description
///for the given language under a fixed `Description` column.
pub fn description(table: &ClassTable, target: &str, language: &str) -> Vec<Map<String, Value>> {
    let column = description_column(language);
    table
        .rows
        .iter()
        .filter(|row| row.language == language && (row.iri == target || row.label == target))
        .unique_by(|row| row.iri.clone())
        .map(|row| {
            let text = row.descriptions.get(&column).cloned().unwrap_or_default();
            let mut result = Map::new();
            result.insert(String::from(CLASS_LABEL), json!(row.label));
            result.insert(String::from(CLASS_IRI), json!(row.iri));
            result.insert(String::from(DESCRIPTION), json!(text));
            result
        })
        .collect()
}

fn class_row(row: &ClassRow) -> Map<String, Value> {
    let mut result = Map::new();
    result.insert(String::from(CLASS_LABEL), json!(row.label));
    result.insert(String::from(CLASS_IRI), json!(row.iri));
    result.insert(String::from(IS_LEAF), json!(row.is_leaf));
    result
}

fn hierarchy_row(row: &ClassRow) -> Map<String, Value> {
    let mut result = class_row(row);
    result.insert(String::from(SUPERCLASS_LABEL), json!(row.superclass_label));
    result.insert(String::from(SUPERCLASS_IRI), json!(row.superclass_iri));
    result
}
