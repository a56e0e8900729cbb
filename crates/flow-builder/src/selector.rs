//! Stage selection from free-text descriptions
//!
//! A shallow keyword heuristic, not a parser. Each role has an ordered rule
//! table evaluated top to bottom against the lower-cased text; the first rule
//! whose keywords match picks the archetype, otherwise the role's fallback
//! applies (or the role is omitted when it has none).

use serde_json::{json, Value};

const STANDARD: &str = "org.apache.nifi.processors.standard";

/// Position of a stage in a linear flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Role {
    Source,
    Transform,
    Filter,
    Destination,
}

impl Role {
    pub fn label(&self) -> &'static str {
        match self {
            Role::Source => "source",
            Role::Transform => "transform",
            Role::Filter => "filter",
            Role::Destination => "destination",
        }
    }
}

/// Catalog of stage implementations with fixed default configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Archetype {
    FileReader,
    Generator,
    HttpListener,
    Transformer,
    Filter,
    Logger,
    FileWriter,
    DatabaseWriter,
}

impl Archetype {
    pub fn label(&self) -> &'static str {
        match self {
            Archetype::FileReader => "file-reader",
            Archetype::Generator => "generator",
            Archetype::HttpListener => "http-listener",
            Archetype::Transformer => "transformer",
            Archetype::Filter => "filter",
            Archetype::Logger => "logger",
            Archetype::FileWriter => "file-writer",
            Archetype::DatabaseWriter => "database-writer",
        }
    }

    /// Fully-qualified processor type
    pub fn processor_type(&self) -> &'static str {
        match self {
            Archetype::FileReader => "org.apache.nifi.processors.standard.GetFile",
            Archetype::Generator => "org.apache.nifi.processors.standard.GenerateFlowFile",
            Archetype::HttpListener => "org.apache.nifi.processors.standard.ListenHTTP",
            Archetype::Transformer => "org.apache.nifi.processors.standard.ReplaceText",
            Archetype::Filter => "org.apache.nifi.processors.standard.RouteOnAttribute",
            Archetype::Logger => "org.apache.nifi.processors.standard.LogAttribute",
            Archetype::FileWriter => "org.apache.nifi.processors.standard.PutFile",
            Archetype::DatabaseWriter => "org.apache.nifi.processors.standard.PutDatabaseRecord",
        }
    }

    pub fn default_config(&self) -> Value {
        match self {
            Archetype::FileReader => json!({
                "properties": {
                    "Input Directory": "/tmp/input",
                    "File Filter": ".*\\.txt$",
                    "Recurse Subdirectories": "true"
                },
                "schedulingPeriod": "1 sec"
            }),
            Archetype::Generator => json!({
                "properties": {
                    "File Size": "1KB",
                    "Batch Size": "1",
                    "Data Format": "Text"
                },
                "schedulingPeriod": "1 sec"
            }),
            Archetype::HttpListener => json!({
                "properties": {
                    "Listening Port": "8081",
                    "Base Path": "/nifi"
                }
            }),
            Archetype::Transformer => json!({
                "properties": {
                    "Replacement Value": "transformed",
                    "Search Value": "original"
                }
            }),
            Archetype::Filter => json!({
                "properties": {
                    "Filter Mode": "include",
                    "Filter": ".*"
                }
            }),
            Archetype::Logger => json!({
                "properties": {
                    "Log Level": "info",
                    "Log Payload": "true"
                },
                "autoTerminatedRelationships": ["success"]
            }),
            Archetype::FileWriter => json!({
                "properties": {
                    "Directory": "/tmp/output",
                    "Conflict Resolution Strategy": "replace"
                }
            }),
            Archetype::DatabaseWriter => json!({
                "properties": {
                    "Database Connection Pooling Service": "",
                    "SQL Statement": "INSERT INTO test_table (data) VALUES (?)"
                }
            }),
        }
    }

    /// Short processor class name, e.g. `LogAttribute`
    pub fn short_type(&self) -> &'static str {
        self.processor_type()
            .strip_prefix(STANDARD)
            .map(|s| s.trim_start_matches('.'))
            .unwrap_or(self.processor_type())
    }
}

/// Keyword condition over lower-cased text
#[derive(Debug, Clone, Copy)]
pub enum Keywords {
    /// Every keyword must appear
    All(&'static [&'static str]),
    /// At least one keyword must appear
    Any(&'static [&'static str]),
}

impl Keywords {
    pub fn matches(&self, text: &str) -> bool {
        match self {
            Keywords::All(words) => words.iter().all(|w| text.contains(w)),
            Keywords::Any(words) => words.iter().any(|w| text.contains(w)),
        }
    }
}

/// One (condition, archetype) row of a rule table
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub when: Keywords,
    pub archetype: Archetype,
}

/// Rule table for one role
#[derive(Debug, Clone, Copy)]
pub struct RoleRules {
    pub role: Role,
    pub rules: &'static [Rule],
    /// Used when no rule matches; `None` makes the role optional
    pub fallback: Option<Archetype>,
}

impl RoleRules {
    pub fn select(&self, text: &str) -> Option<Archetype> {
        self.rules
            .iter()
            .find(|rule| rule.when.matches(text))
            .map(|rule| rule.archetype)
            .or(self.fallback)
    }
}

/// Role tables in flow order
pub const CATALOG: &[RoleRules] = &[
    RoleRules {
        role: Role::Source,
        rules: &[
            Rule { when: Keywords::All(&["file", "read"]), archetype: Archetype::FileReader },
            Rule { when: Keywords::All(&["generate"]), archetype: Archetype::Generator },
            Rule { when: Keywords::All(&["http"]), archetype: Archetype::HttpListener },
        ],
        fallback: Some(Archetype::Generator),
    },
    RoleRules {
        role: Role::Transform,
        rules: &[Rule {
            when: Keywords::Any(&["transform", "convert"]),
            archetype: Archetype::Transformer,
        }],
        fallback: None,
    },
    RoleRules {
        role: Role::Filter,
        rules: &[Rule { when: Keywords::Any(&["filter"]), archetype: Archetype::Filter }],
        fallback: None,
    },
    RoleRules {
        role: Role::Destination,
        rules: &[
            Rule { when: Keywords::All(&["log"]), archetype: Archetype::Logger },
            Rule { when: Keywords::All(&["file", "write"]), archetype: Archetype::FileWriter },
            Rule { when: Keywords::All(&["database"]), archetype: Archetype::DatabaseWriter },
        ],
        fallback: Some(Archetype::Logger),
    },
];

/// A role filled by an archetype
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageSelection {
    pub role: Role,
    pub archetype: Archetype,
}

/// Stages for a description, in flow order
pub fn select_stages(description: &str) -> Vec<StageSelection> {
    let text = description.to_lowercase();
    CATALOG
        .iter()
        .filter_map(|table| {
            table.select(&text).map(|archetype| StageSelection {
                role: table.role,
                archetype,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roles(description: &str) -> Vec<(&'static str, &'static str)> {
        select_stages(description)
            .into_iter()
            .map(|s| (s.role.label(), s.archetype.label()))
            .collect()
    }

    #[test]
    fn test_selection_table() {
        let cases: &[(&str, &[(&str, &str)])] = &[
            (
                "Generate data and log it",
                &[("source", "generator"), ("destination", "logger")],
            ),
            (
                "Read from file, transform data, and write to output file",
                &[
                    ("source", "file-reader"),
                    ("transform", "transformer"),
                    ("destination", "file-writer"),
                ],
            ),
            (
                "Listen for HTTP requests, filter data, and log results",
                &[
                    ("source", "http-listener"),
                    ("filter", "filter"),
                    ("destination", "logger"),
                ],
            ),
            (
                "Convert records and store them in the database",
                &[
                    ("source", "generator"),
                    ("transform", "transformer"),
                    ("destination", "database-writer"),
                ],
            ),
            ("something unrelated", &[("source", "generator"), ("destination", "logger")]),
        ];

        for (description, expected) in cases {
            assert_eq!(&roles(description), expected, "description: {}", description);
        }
    }

    #[test]
    fn test_precedence_file_read_over_http() {
        let stages = select_stages("read a file that arrived over http");
        assert_eq!(stages[0].archetype, Archetype::FileReader);
    }

    #[test]
    fn test_log_wins_over_file_write() {
        let stages = select_stages("write the file and log it");
        assert_eq!(stages.last().unwrap().archetype, Archetype::Logger);
    }

    #[test]
    fn test_case_insensitive() {
        let stages = select_stages("GENERATE and FILTER");
        let labels: Vec<&str> = stages.iter().map(|s| s.archetype.label()).collect();
        assert_eq!(labels, vec!["generator", "filter", "logger"]);
    }

    #[test]
    fn test_logger_terminates_success_by_default() {
        let config = Archetype::Logger.default_config();
        assert_eq!(config["autoTerminatedRelationships"], json!(["success"]));
        assert_eq!(Archetype::Logger.short_type(), "LogAttribute");
    }
}
