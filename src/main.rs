use anyhow::{anyhow, Result};
use clap::{arg, command, ArgMatches, Command};
use ontoview::client::OntologyClient;
use ontoview::config::{self, Config};
use ontoview::graph::GraphOptions;
use ontoview::model::ClassTable;
use ontoview::property;
use ontoview::render;
use ontoview::view;
use serde_json::{Map, Value};
use tracing_subscriber::EnvFilter;

fn credentials(command: Command) -> Command {
    command
        .arg(arg!(-u --username <USERNAME> "Username to access the service"))
        .arg(arg!(-p --password <PASSWORD> "Password to access the service"))
}

fn view_args(command: Command) -> Command {
    credentials(command)
        .arg(arg!(-l --language [LANGUAGE] "Language to query for").default_value("en"))
        .arg(
            arg!(-f --format [FORMAT] "Output format: text, csv, json or pretty.json")
                .default_value("text"),
        )
}

fn required<'a>(matches: &'a ArgMatches, name: &str) -> Result<&'a String> {
    matches
        .get_one::<String>(name)
        .ok_or_else(|| anyhow!("No {} given", name))
}

fn targets(matches: &ArgMatches) -> Vec<String> {
    match matches.get_many::<String>("CLASS") {
        Some(values) => values.cloned().collect(),
        None => vec![],
    }
}

fn connect() -> Result<OntologyClient> {
    let config = Config::load()?;
    Ok(OntologyClient::new(config)?)
}

fn load_table(matches: &ArgMatches) -> Result<(OntologyClient, ClassTable)> {
    let client = connect()?;
    let username = required(matches, "username")?;
    let password = required(matches, "password")?;
    let table = client
        .load_model(username, password)
        .ok_or_else(|| anyhow!("Could not load the class model"))?;

    Ok((client, table))
}

fn login(client: &OntologyClient, matches: &ArgMatches) -> Result<String> {
    let username = required(matches, "username")?;
    let password = required(matches, "password")?;
    client
        .login(username, password)
        .ok_or_else(|| anyhow!("Could not authenticate against the service"))
}

fn listing(
    matches: &ArgMatches,
    pick: fn(&ClassTable, &str) -> Vec<Map<String, Value>>,
) -> Result<String> {
    let (_client, table) = load_table(matches)?;
    let rows = pick(&table, required(matches, "language")?);

    Ok(render::render(&rows, required(matches, "format")?)?)
}

fn hierarchy(matches: &ArgMatches) -> Result<String> {
    let (_client, table) = load_table(matches)?;
    let targets = targets(matches);
    let language = required(matches, "language")?;
    let with_subclasses = !matches.get_flag("no-subclasses");
    let with_superclasses = !matches.get_flag("no-superclasses");

    let rows = if matches.get_flag("labels") {
        view::classes_by_labels(&table, &targets, with_subclasses, with_superclasses, language)
    } else {
        view::classes_by_iris(&table, &targets, with_subclasses, with_superclasses, language)
    };

    Ok(render::render(&rows, required(matches, "format")?)?)
}

fn describe(matches: &ArgMatches) -> Result<String> {
    let (_client, table) = load_table(matches)?;
    let rows = view::description(
        &table,
        required(matches, "CLASS")?,
        required(matches, "language")?,
    );

    Ok(render::render(&rows, required(matches, "format")?)?)
}

fn properties(matches: &ArgMatches) -> Result<String> {
    let client = connect()?;
    let token = login(&client, matches)?;
    let iri = required(matches, "IRI")?;
    let records = client
        .class_properties(&token, iri)
        .ok_or_else(|| anyhow!("Could not fetch the properties of {}", iri))?;

    if matches.get_flag("raw") {
        return Ok(serde_json::to_string_pretty(&records)?);
    }

    let rows = property::property_table(&records, &client.config().prefixes);
    Ok(render::render(&rows, required(matches, "format")?)?)
}

fn individuals(matches: &ArgMatches) -> Result<String> {
    let client = connect()?;
    let token = login(&client, matches)?;
    let iri = required(matches, "IRI")?;
    let rows = client
        .individuals(&token, iri)
        .ok_or_else(|| anyhow!("Could not read the individuals of {}", iri))?;

    Ok(render::render(&rows, required(matches, "format")?)?)
}

fn graph_data(matches: &ArgMatches) -> Result<String> {
    let (client, table) = load_table(matches)?;
    let opts = GraphOptions {
        title: required(matches, "title")?.clone(),
        with_properties: matches.get_flag("properties"),
        subclasses: !matches.get_flag("no-subclasses"),
        superclasses: !matches.get_flag("no-superclasses"),
        verbose: !matches.get_flag("brief"),
        language: required(matches, "language")?.clone(),
    };
    let username = required(matches, "username")?;
    let password = required(matches, "password")?;

    let iris: Vec<String> = match matches.get_many::<String>("IRI") {
        Some(values) => values.cloned().collect(),
        None => vec![],
    };
    let graph = client
        .graph(username, password, &table, &iris, &opts)
        .ok_or_else(|| anyhow!("Could not build the graph"))?;

    Ok(serde_json::to_string_pretty(&graph)?)
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let matches = command!() // requires `cargo` feature
        .propagate_version(true)
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(Command::new("init").about("Write a starter ontoview.toml"))
        .subcommand(view_args(
            Command::new("classes").about("List all classes of the model"),
        ))
        .subcommand(view_args(
            Command::new("leaves").about("List the classes without subclasses"),
        ))
        .subcommand(view_args(
            Command::new("non-leaves").about("List the classes with subclasses"),
        ))
        .subcommand(view_args(
            Command::new("subclasses").about("List every subclass edge of the model"),
        ))
        .subcommand(
            view_args(Command::new("hierarchy").about("Select classes and their relations"))
                .arg(arg!(<CLASS> ... "Class IRIs (or labels with --labels) to select"))
                .arg(arg!(--labels "Match against labels instead of IRIs"))
                .arg(arg!(--"no-subclasses" "Leave out the subclasses of the targets"))
                .arg(arg!(--"no-superclasses" "Leave out the direct superclasses of the selection")),
        )
        .subcommand(
            view_args(Command::new("describe").about("Show the description of one class"))
                .arg(arg!(<CLASS> "Class IRI or label")),
        )
        .subcommand(
            view_args(Command::new("properties").about("List the properties a class owns"))
                .arg(arg!(<IRI> "Class IRI"))
                .arg(arg!(--raw "Print the raw records instead of the compacted table")),
        )
        .subcommand(
            view_args(Command::new("individuals").about("Read the individuals of a class"))
                .arg(arg!(<IRI> "Class IRI")),
        )
        .subcommand(
            credentials(Command::new("graph").about("Build graph data for a network widget"))
                .arg(arg!(<IRI> ... "Class IRIs to focus on"))
                .arg(arg!(-l --language [LANGUAGE] "Language to query for").default_value("en"))
                .arg(arg!(-t --title [TITLE] "Graph title").default_value("Network Graph"))
                .arg(arg!(--properties "Add property nodes and edges"))
                .arg(arg!(--brief "Leave property summaries out of the tooltips"))
                .arg(arg!(--"no-subclasses" "Leave out the subclasses of the targets"))
                .arg(arg!(--"no-superclasses" "Leave out the direct superclasses of the selection")),
        )
        .get_matches();

    let exit_result = match matches.subcommand() {
        Some(("init", _sub_matches)) => config::init().map_err(anyhow::Error::from),
        Some(("classes", sub_matches)) => listing(sub_matches, view::all_classes),
        Some(("leaves", sub_matches)) => listing(sub_matches, view::leaves),
        Some(("non-leaves", sub_matches)) => listing(sub_matches, view::non_leaves),
        Some(("subclasses", sub_matches)) => listing(sub_matches, view::subclasses),
        Some(("hierarchy", sub_matches)) => hierarchy(sub_matches),
        Some(("describe", sub_matches)) => describe(sub_matches),
        Some(("properties", sub_matches)) => properties(sub_matches),
        Some(("individuals", sub_matches)) => individuals(sub_matches),
        Some(("graph", sub_matches)) => graph_data(sub_matches),
        _ => unreachable!("Exhausted list of subcommands and subcommand_required prevents `None`"),
    };

    //print exit message
    match exit_result {
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1)
        }
        Ok(x) => println!("{}", x),
    }
}
