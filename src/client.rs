use crate::config::Config;
use crate::error::OntoviewError;
use crate::graph::{self, Graph, GraphOptions};
use crate::model::{ClassNode, ClassTable, DescriptionIndex};
use crate::property::{self, PropertyRecord, PropertySummary};
use crate::view;
use serde_json::{json, Map, Value};
use std::collections::HashMap;
use std::time::Duration;

/// Blocking client for the ontology-management service. Every public
/// operation is one request/response round trip with the configured
/// timeout; transport and HTTP failures are logged and surfaced as `None`
/// so that callers can treat "no model" as a normal result. Calls are
/// attempted exactly once: no retries, no backoff, no caching.
pub struct OntologyClient {
    config: Config,
    http: reqwest::blocking::Client,
}

impl OntologyClient {
    pub fn new(config: Config) -> Result<OntologyClient, OntoviewError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.service.timeout))
            .build()?;

        Ok(OntologyClient { config, http })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    // ################################################
    // ######## authentication ########################
    // ################################################

    ///Request a bearer token for the given credentials via the password
    ///grant. Returns `None` on any transport or HTTP failure.
    pub fn login(&self, username: &str, password: &str) -> Option<String> {
        match self.request_token(username, password) {
            Ok(token) => Some(token),
            Err(e) => {
                tracing::warn!("token request failed: {}", e);
                None
            }
        }
    }

    fn request_token(&self, username: &str, password: &str) -> Result<String, OntoviewError> {
        let url = format!(
            "{}/auth/realms/{}/protocol/openid-connect/token",
            self.config.service.base_url, self.config.service.tenant
        );
        let body = [
            ("grant_type", "password"),
            ("client_id", self.config.service.client_id.as_str()),
            ("username", username),
            ("password", password),
        ];

        let response = self.http.post(&url).form(&body).send()?.error_for_status()?;
        let payload: Value = response.json()?;

        match payload.get("access_token").and_then(Value::as_str) {
            Some(token) => Ok(String::from(token)),
            None => Err(OntoviewError::Response(String::from(
                "token response carries no access_token",
            ))),
        }
    }

    // ################################################
    // ######## service endpoints #####################
    // ################################################

    ///Fetch the nested class tree of the configured graph.
    pub fn class_tree(&self, token: &str) -> Option<Vec<ClassNode>> {
        let url = self.ontology_url("get-all-classes");
        let body = json!({ "graph": self.config.service.graph });

        let nodes = self
            .post_records(&url, token, &body)
            .and_then(|records| Ok(serde_json::from_value::<Vec<ClassNode>>(records)?));
        match nodes {
            Ok(nodes) => Some(nodes),
            Err(e) => {
                tracing::warn!("get-all-classes failed: {}", e);
                None
            }
        }
    }

    ///Fetch the class descriptions of the configured graph, folded into
    ///an index from entity IRI to per-language text. Records that carry
    ///neither a language nor a text are skipped.
    pub fn descriptions(&self, token: &str) -> Option<DescriptionIndex> {
        let url = self.ontology_url("get-classes-description");
        let body = json!({ "graph": self.config.service.graph });

        match self.post_records(&url, token, &body) {
            Ok(records) => {
                let mut index = DescriptionIndex::new();
                let empty = vec![];
                for record in records.as_array().unwrap_or(&empty) {
                    let entity = record.get("entity").and_then(Value::as_str).unwrap_or("");
                    let language = record
                        .get("descriptionLang")
                        .and_then(Value::as_str)
                        .unwrap_or("");
                    let text = record
                        .get("description")
                        .and_then(Value::as_str)
                        .unwrap_or("");
                    if entity.is_empty() || (language.is_empty() && text.is_empty()) {
                        continue;
                    }
                    index
                        .entry(String::from(entity))
                        .or_default()
                        .insert(String::from(language), String::from(text));
                }
                Some(index)
            }
            Err(e) => {
                tracing::warn!("get-classes-description failed: {}", e);
                None
            }
        }
    }

    ///Fetch the properties owned by the given class.
    pub fn class_properties(&self, token: &str, cls: &str) -> Option<Vec<PropertyRecord>> {
        let url = self.ontology_url("get-class-own-properties");
        let body = json!({ "cls": cls });

        let records = self
            .post_records(&url, token, &body)
            .and_then(|records| Ok(serde_json::from_value::<Vec<PropertyRecord>>(records)?));
        match records {
            Ok(records) => Some(records),
            Err(e) => {
                tracing::warn!("get-class-own-properties failed for {}: {}", cls, e);
                None
            }
        }
    }

    ///Fetch the individuals of the given class. Rows are free-form
    ///key/value maps; the service fixes no schema beyond an IRI column.
    pub fn individuals(&self, token: &str, cls: &str) -> Option<Vec<Map<String, Value>>> {
        let url = format!(
            "{}{}/v1/read-individual",
            self.config.service.base_url, self.config.service.individual_namespace
        );
        let body = json!({ "cls": cls });

        let records = self
            .post_records(&url, token, &body)
            .and_then(|records| Ok(serde_json::from_value::<Vec<Map<String, Value>>>(records)?));
        match records {
            Ok(records) => Some(records),
            Err(e) => {
                tracing::warn!("read-individual failed for {}: {}", cls, e);
                None
            }
        }
    }

    // ################################################
    // ######## composite operations ##################
    // ################################################

    ///Log in, fetch the class tree and the descriptions, and build the
    ///flattened class table. A failed description fetch degrades to a
    ///table without description columns; a failed login or tree fetch
    ///yields `None`.
    pub fn load_model(&self, username: &str, password: &str) -> Option<ClassTable> {
        let token = self.login(username, password)?;
        let nodes = self.class_tree(&token)?;
        let descriptions = self.descriptions(&token).unwrap_or_default();

        Some(ClassTable::from_tree(&nodes, &descriptions))
    }

    ///Build the network-graph data for the given IRIs: the hierarchy view
    ///around them plus, per involved class, its descriptions and property
    ///summaries. When properties are requested, object-property ranges get
    ///one extra level of property lookups for their tooltips.
    pub fn graph(
        &self,
        username: &str,
        password: &str,
        table: &ClassTable,
        iris: &[String],
        opts: &GraphOptions,
    ) -> Option<Graph> {
        let token = self.login(username, password)?;
        let rows = view::classes_by_iris(
            table,
            iris,
            opts.subclasses,
            opts.superclasses,
            &opts.language,
        );
        let descriptions = self.descriptions(&token).unwrap_or_default();

        let mut properties: HashMap<String, Vec<PropertySummary>> = HashMap::new();
        for row in &rows {
            let iri = row
                .get(view::CLASS_IRI)
                .and_then(Value::as_str)
                .unwrap_or("");
            if iri.is_empty() || properties.contains_key(iri) {
                continue;
            }
            let records = self.class_properties(&token, iri).unwrap_or_default();
            properties.insert(String::from(iri), property::summarize(&records));
        }

        if opts.with_properties {
            let ranges: Vec<String> = properties
                .values()
                .flatten()
                .filter(|summary| summary.kind == "objectproperty")
                .map(|summary| summary.range.clone())
                .collect();
            for range in ranges {
                if !properties.contains_key(&range) {
                    let records = self.class_properties(&token, &range).unwrap_or_default();
                    properties.insert(range, property::summarize(&records));
                }
            }
        }

        Some(graph::build(&rows, iris, &descriptions, &properties, opts))
    }

    fn ontology_url(&self, operation: &str) -> String {
        format!(
            "{}{}/v1/{}",
            self.config.service.base_url, self.config.service.ontology_namespace, operation
        )
    }

    ///POST the given JSON body with the auth header and return the
    ///`records` member of the JSON response.
    fn post_records(&self, url: &str, token: &str, body: &Value) -> Result<Value, OntoviewError> {
        tracing::debug!("POST {}", url);
        let response = self
            .http
            .post(url)
            .header("x-enapso-auth", token)
            .json(body)
            .send()?
            .error_for_status()?;
        let payload: Value = response.json()?;

        match payload.get("records") {
            Some(records) => Ok(records.clone()),
            None => Err(OntoviewError::Response(format!(
                "response from {} carries no records",
                url
            ))),
        }
    }
}
