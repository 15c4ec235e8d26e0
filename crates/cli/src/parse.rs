//! ArgMatches → Command conversion.
//!
//! Translates clap's parsed arguments into a [`CliAction`]. Failures here
//! are usage errors and never reach the executor.

use std::io::Read;
use std::path::PathBuf;

use clap::ArgMatches;
use docdesk_executor::{Command, Descriptor, PageRequest, ValueType};

/// The result of parsing the command line.
#[derive(Debug)]
pub enum CliAction {
    /// A command to run through the executor.
    Execute(Command),
    /// A JSON command body to run through the executor.
    Exec(String),
    /// Write the default config file.
    InitConfig(PathBuf),
}

/// Convert clap ArgMatches into a CliAction.
pub fn matches_to_action(matches: &ArgMatches) -> Result<CliAction, String> {
    let (sub_name, m) = matches
        .subcommand()
        .ok_or_else(|| "No command provided".to_string())?;

    match sub_name {
        "exec" => {
            let source = m.get_one::<String>("source").map(String::as_str).unwrap_or("-");
            return read_text_from_source(source).map(CliAction::Exec);
        }
        "init-config" => {
            let path = m
                .get_one::<String>("path")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(docdesk_executor::CONFIG_FILE_NAME));
            return Ok(CliAction::InitConfig(path));
        }
        _ => {}
    }

    let uri = uri(matches)?;
    let cmd = match sub_name {
        "connect" => Command::Connect { uri },
        "databases" => Command::ListDatabases { uri },
        "collections" => Command::ListCollections {
            uri,
            database: required(m, "database")?,
        },
        "info" => Command::CollectionInfo {
            uri,
            database: required(m, "database")?,
            collection: required(m, "collection")?,
            page: page(m),
        },
        "find" => Command::FindDocuments {
            uri,
            database: required(m, "database")?,
            collection: required(m, "collection")?,
            field: m.get_one::<String>("field").cloned(),
            value: m.get_one::<String>("value").cloned(),
            value_type: m
                .get_one::<String>("type")
                .map(|t| t.parse::<ValueType>().map_err(|e| e.to_string()))
                .transpose()?,
            page: page(m).unwrap_or_default(),
        },
        "get" => Command::GetDocument {
            uri,
            database: required(m, "database")?,
            collection: required(m, "collection")?,
            id: required(m, "id")?,
        },
        "update" => {
            let document = match m.get_one::<String>("file") {
                Some(source) => read_text_from_source(source)?,
                None => required(m, "document")?,
            };
            Command::UpdateDocument {
                uri,
                database: required(m, "database")?,
                collection: required(m, "collection")?,
                document,
            }
        }
        "delete" => Command::DeleteDocument {
            uri,
            database: required(m, "database")?,
            collection: required(m, "collection")?,
            id: m.get_one::<String>("id").cloned(),
        },
        "new-collection" => Command::NewCollection {
            uri,
            database: required(m, "database")?,
            collection: required(m, "collection")?,
        },
        "drop-collection" => Command::DropCollection {
            uri,
            database: required(m, "database")?,
            collection: required(m, "collection")?,
        },
        "new-database" => Command::NewDatabase {
            uri,
            database: required(m, "database")?,
            collection: m.get_one::<String>("collection").cloned(),
        },
        "drop-database" => Command::DropDatabase {
            uri,
            database: required(m, "database")?,
        },
        other => return Err(format!("Unknown command: {}", other)),
    };
    Ok(CliAction::Execute(cmd))
}

fn uri(matches: &ArgMatches) -> Result<Descriptor, String> {
    matches
        .get_one::<String>("uri")
        .filter(|s| !s.trim().is_empty())
        .map(|s| Descriptor::new(s.trim()))
        .ok_or_else(|| "A connection string is required (--uri or DOCDESK_URI)".to_string())
}

fn required(m: &ArgMatches, name: &str) -> Result<String, String> {
    m.get_one::<String>(name)
        .cloned()
        .ok_or_else(|| format!("Missing argument: {}", name))
}

/// A page request when either paging flag is present.
fn page(m: &ArgMatches) -> Option<PageRequest> {
    let index = m.get_one::<u64>("page").copied();
    let size = m.get_one::<u64>("page-size").copied();
    if index.is_none() && size.is_none() {
        return None;
    }
    let default = PageRequest::default();
    Some(PageRequest::new(
        index.unwrap_or(default.page_index),
        size.unwrap_or(default.page_size),
    ))
}

/// Read text from a file or stdin.
///
/// If `source` is "-", reads from stdin.
fn read_text_from_source(source: &str) -> Result<String, String> {
    if source == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .map_err(|e| format!("Failed to read stdin: {}", e))?;
        Ok(buf)
    } else {
        std::fs::read_to_string(source).map_err(|e| format!("Failed to read '{}': {}", source, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::build_cli;

    const URI: &str = "mongodb://localhost:27017";

    fn parse(args: &[&str]) -> Result<CliAction, String> {
        let matches = build_cli()
            .try_get_matches_from(args)
            .map_err(|e| e.to_string())?;
        matches_to_action(&matches)
    }

    fn command(args: &[&str]) -> Command {
        match parse(args).unwrap() {
            CliAction::Execute(cmd) => cmd,
            other => panic!("expected a command, got {:?}", other),
        }
    }

    #[test]
    fn test_find_with_filter_and_page() {
        let cmd = command(&[
            "docdesk", "--uri", URI, "find", "shop", "users", "--field", "age", "--value", "30",
            "--type", "number", "--page", "2", "--page-size", "5",
        ]);
        assert_eq!(
            cmd,
            Command::FindDocuments {
                uri: URI.into(),
                database: "shop".into(),
                collection: "users".into(),
                field: Some("age".into()),
                value: Some("30".into()),
                value_type: Some(ValueType::Number),
                page: PageRequest::new(2, 5),
            }
        );
    }

    #[test]
    fn test_find_rejects_unknown_type() {
        let err = parse(&[
            "docdesk", "--uri", URI, "find", "shop", "users", "--field", "a", "--value", "1",
            "--type", "regex",
        ])
        .unwrap_err();
        assert!(err.contains("regex"));
    }

    #[test]
    fn test_info_is_unpaged_without_flags() {
        match command(&["docdesk", "info", "shop", "users", "--uri", URI]) {
            Command::CollectionInfo { page, .. } => assert_eq!(page, None),
            other => panic!("unexpected {:?}", other),
        }
        match command(&["docdesk", "--uri", URI, "info", "shop", "users", "--page", "3"]) {
            Command::CollectionInfo { page, .. } => {
                assert_eq!(page, Some(PageRequest::new(3, 10)))
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_delete_requires_id_or_all() {
        assert!(parse(&["docdesk", "--uri", URI, "delete", "shop", "users"]).is_err());
        assert!(parse(&["docdesk", "--uri", URI, "delete", "shop", "users", "abc", "--all"]).is_err());

        match command(&["docdesk", "--uri", URI, "delete", "shop", "users", "--all"]) {
            Command::DeleteDocument { id, .. } => assert_eq!(id, None),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_update_reads_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("doc.txt");
        std::fs::write(&path, "{_id: IDENT(507f191e810c19729de860ea)}").unwrap();
        let path = path.to_string_lossy().to_string();

        match command(&["docdesk", "--uri", URI, "update", "shop", "users", "-f", &path]) {
            Command::UpdateDocument { document, .. } => {
                assert!(document.starts_with("{_id: IDENT("))
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_missing_uri_is_a_usage_error() {
        let matches = build_cli()
            .try_get_matches_from(["docdesk", "databases"])
            .unwrap();
        // DOCDESK_URI may be set in the environment running the tests
        if matches.get_one::<String>("uri").is_none() {
            assert!(matches_to_action(&matches).unwrap_err().contains("DOCDESK_URI"));
        }
    }

    #[test]
    fn test_init_config_needs_no_uri() {
        match parse(&["docdesk", "init-config", "/tmp/x.toml"]).unwrap() {
            CliAction::InitConfig(path) => assert_eq!(path, PathBuf::from("/tmp/x.toml")),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_new_database_optional_collection() {
        match command(&["docdesk", "--uri", URI, "new-database", "shop"]) {
            Command::NewDatabase { collection, .. } => assert_eq!(collection, None),
            other => panic!("unexpected {:?}", other),
        }
    }
}
