//! Clap command tree definition.

use clap::{Arg, ArgAction, ArgGroup, Command};

/// Build the complete CLI command tree.
pub fn build_cli() -> Command {
    Command::new("docdesk")
        .about("Browse and edit a document database from the command line")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("uri")
                .long("uri")
                .env("DOCDESK_URI")
                .value_name("URI")
                .help("Connection string, e.g. mongodb://user:pw@host:27017")
                .hide_env_values(true)
                .global(true),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .help("Config file (default: ./docdesk.toml when present)")
                .global(true),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("More log output on stderr (-v info, -vv debug, -vvv trace)")
                .action(ArgAction::Count)
                .global(true),
        )
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .value_name("FILTER")
                .help("Log filter directive, e.g. docdesk=debug (overrides -v)")
                .global(true),
        )
        .arg(
            Arg::new("compact")
                .long("compact")
                .help("Print the result on one line")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(Command::new("connect").about("Check that the server is reachable"))
        .subcommand(Command::new("databases").about("List databases"))
        .subcommand(
            Command::new("collections")
                .about("Database statistics and its collections")
                .arg(database_arg()),
        )
        .subcommand(build_info())
        .subcommand(build_find())
        .subcommand(
            Command::new("get")
                .about("Print one document as editable text")
                .arg(database_arg())
                .arg(collection_arg())
                .arg(Arg::new("id").required(true).help("24-digit hex _id")),
        )
        .subcommand(build_update())
        .subcommand(build_delete())
        .subcommand(
            Command::new("new-collection")
                .about("Create an empty collection")
                .arg(database_arg())
                .arg(collection_arg()),
        )
        .subcommand(
            Command::new("drop-collection")
                .about("Drop a collection")
                .arg(database_arg())
                .arg(collection_arg()),
        )
        .subcommand(
            Command::new("new-database")
                .about("Create a database, optionally with a first collection")
                .arg(database_arg())
                .arg(Arg::new("collection").help("First collection")),
        )
        .subcommand(
            Command::new("drop-database")
                .about("Drop a database")
                .arg(database_arg()),
        )
        .subcommand(
            Command::new("exec")
                .about("Run a JSON command, e.g. {\"Connect\": {\"uri\": \"...\"}}")
                .arg(
                    Arg::new("source")
                        .value_name("PATH")
                        .default_value("-")
                        .help("File holding the command ('-' for stdin)"),
                ),
        )
        .subcommand(
            Command::new("init-config")
                .about("Write a default docdesk.toml if none exists")
                .arg(
                    Arg::new("path")
                        .value_name("PATH")
                        .default_value("docdesk.toml"),
                ),
        )
}

fn database_arg() -> Arg {
    Arg::new("database").required(true).help("Database name")
}

fn collection_arg() -> Arg {
    Arg::new("collection").required(true).help("Collection name")
}

fn page_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("page")
            .long("page")
            .value_name("N")
            .value_parser(clap::value_parser!(u64))
            .help("Zero-based page index"),
    )
    .arg(
        Arg::new("page-size")
            .long("page-size")
            .value_name("M")
            .value_parser(clap::value_parser!(u64))
            .help("Documents per page (default: 10)"),
    )
}

fn build_info() -> Command {
    page_args(
        Command::new("info")
            .about("Collection statistics and documents (all of them unless paged)")
            .arg(database_arg())
            .arg(collection_arg()),
    )
}

fn build_find() -> Command {
    page_args(
        Command::new("find")
            .about("One page of documents where FIELD equals VALUE")
            .arg(database_arg())
            .arg(collection_arg())
            .arg(Arg::new("field").long("field").value_name("FIELD"))
            .arg(
                Arg::new("value")
                    .long("value")
                    .value_name("VALUE")
                    .requires("field"),
            )
            .arg(
                Arg::new("type")
                    .long("type")
                    .value_name("TYPE")
                    .help("How to read VALUE: string, number or identifier")
                    .requires("value"),
            ),
    )
}

fn build_update() -> Command {
    Command::new("update")
        .about("Apply edited document text (inserted when the _id is new)")
        .arg(database_arg())
        .arg(collection_arg())
        .arg(Arg::new("document").help("Document text"))
        .arg(
            Arg::new("file")
                .long("file")
                .short('f')
                .value_name("PATH")
                .help("Read document text from a file ('-' for stdin)")
                .conflicts_with("document"),
        )
        .group(
            ArgGroup::new("text")
                .args(["document", "file"])
                .required(true),
        )
}

fn build_delete() -> Command {
    Command::new("delete")
        .about("Delete one document, or every document with --all")
        .arg(database_arg())
        .arg(collection_arg())
        .arg(Arg::new("id").help("24-digit hex _id"))
        .arg(
            Arg::new("all")
                .long("all")
                .help("Delete every document in the collection")
                .action(ArgAction::SetTrue)
                .conflicts_with("id"),
        )
        .group(ArgGroup::new("target").args(["id", "all"]).required(true))
}
