//! CLI command implementations

use std::io::{self, BufRead, Write};
use std::path::Path;
use std::sync::Arc;

use serde_json::{json, Map, Value as Json};

use crate::observability::Logger;
use crate::record::{
    FieldType, Record, RecordError, RecordResult, RecordType, TypeRegistry, Value,
};

use super::args::{Cli, Command};
use super::config::Config;
use super::errors::{CliError, CliResult};
use super::io::{read_requests, write_error, write_response};

/// Error code for stdin lines that are not a keyword-argument object
const INVALID_REQUEST: &str = "CHECKED_INVALID_REQUEST";

/// Parses arguments and runs the selected command
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    if let Some(severity) = cli.log_level {
        Logger::set_min_severity(severity);
    }
    run_command(cli.command, cli.log_level.is_some())
}

pub fn run_command(cmd: Command, log_level_overridden: bool) -> CliResult<()> {
    match cmd {
        Command::Demo => demo(&mut io::stdout().lock()),
        Command::Construct { config, type_name } => {
            let registry = load_registry(&config, log_level_overridden)?;
            construct(&registry, &type_name)
        }
        Command::Describe { config } => {
            let registry = load_registry(&config, log_level_overridden)?;
            describe(&registry, &mut io::stdout().lock())
        }
    }
}

/// Loads the config, applies its log level, then declares its record types
fn load_registry(path: &Path, log_level_overridden: bool) -> CliResult<TypeRegistry> {
    let config = Config::load(path)?;
    if !log_level_overridden {
        Logger::set_min_severity(config.log_level);
    }
    config.registry()
}

/// Construct records of one declared type from stdin
pub fn construct(registry: &TypeRegistry, type_name: &str) -> CliResult<()> {
    let record_type = registry
        .get(type_name)
        .ok_or_else(|| CliError::UnknownType(type_name.to_string()))?;

    let stdin = io::stdin();
    let stdout = io::stdout();
    construct_stream(record_type, stdin.lock(), &mut stdout.lock())?;
    Ok(())
}

/// Constructs one record per input line, writing one response per line.
///
/// Rejected records are reported as error responses and do not stop the
/// stream. Returns the number of records constructed.
pub fn construct_stream<R: BufRead, W: Write>(
    record_type: &Arc<RecordType>,
    reader: R,
    writer: &mut W,
) -> CliResult<usize> {
    let mut constructed = 0;

    for request in read_requests(reader) {
        let request = match request {
            Ok(request) => request,
            Err(e) => {
                write_error(writer, INVALID_REQUEST, &e.to_string())?;
                continue;
            }
        };

        let Some(object) = request.as_object() else {
            write_error(
                writer,
                INVALID_REQUEST,
                "expected a JSON object of keyword arguments",
            )?;
            continue;
        };

        let outcome =
            keyword_arguments(record_type, object).and_then(|kwargs| record_type.construct(kwargs));
        match outcome {
            Ok(record) => {
                constructed += 1;
                write_response(
                    writer,
                    json!({
                        "repr": record.to_string(),
                        "fields": record.to_json(),
                    }),
                )?;
            }
            Err(e) => write_error(writer, e.code(), &e.to_string())?,
        }
    }

    Ok(constructed)
}

/// Turns a JSON object into keyword arguments for `record_type`.
///
/// Names are checked before any value is decoded, so an undeclared name is
/// reported as such whatever its value. Values are decoded in declaration
/// order; one with no `Value` form (array, object, out-of-range integer) is a
/// coercion failure of its field.
fn keyword_arguments(
    record_type: &RecordType,
    object: &Map<String, Json>,
) -> RecordResult<Vec<(String, Value)>> {
    let decoded =
        check_names(record_type, object).and_then(|()| decode_values(record_type, object));

    if let Err(err) = &decoded {
        let message = err.to_string();
        Logger::warn(
            "RECORD_REJECTED",
            &[
                ("code", err.code()),
                ("message", message.as_str()),
                ("type", record_type.name()),
            ],
        );
    }
    decoded
}

fn decode_values(
    record_type: &RecordType,
    object: &Map<String, Json>,
) -> RecordResult<Vec<(String, Value)>> {
    let mut kwargs = Vec::with_capacity(object.len());
    for field in record_type.fields() {
        let Some(json) = object.get(field.name()) else {
            continue;
        };
        let value = Value::try_from(json).map_err(|source| RecordError::Coercion {
            storage_name: field.storage_name().to_string(),
            value_repr: json.to_string(),
            source,
        })?;
        kwargs.push((field.name().to_string(), value));
    }
    Ok(kwargs)
}

/// Unknown names first, in input order, then required fields in declaration order
fn check_names(record_type: &RecordType, object: &Map<String, Json>) -> RecordResult<()> {
    if let Some(unknown) = object.keys().find(|name| !record_type.has_field(name)) {
        return Err(RecordError::UnexpectedArgument(unknown.clone()));
    }
    if let Some(missing) = record_type
        .fields()
        .iter()
        .find(|field| field.is_required() && !object.contains_key(field.name()))
    {
        return Err(RecordError::MissingArgument(missing.name().to_string()));
    }
    Ok(())
}

/// Print every declared record type with its fields
pub fn describe<W: Write>(registry: &TypeRegistry, writer: &mut W) -> CliResult<()> {
    write_response(writer, describe_registry(registry))
}

fn describe_registry(registry: &TypeRegistry) -> Json {
    let types: Vec<Json> = registry
        .iter()
        .map(|record_type| {
            let fields: Vec<Json> = record_type
                .fields()
                .iter()
                .map(|field| {
                    json!({
                        "name": field.name(),
                        "storage_name": field.storage_name(),
                        "coercion": field.coercion().label(),
                        "required": field.is_required(),
                        "default": field.default().map(Value::repr),
                    })
                })
                .collect();
            json!({ "name": record_type.name(), "fields": fields })
        })
        .collect();
    Json::Array(types)
}

/// Runs the Movie and Cat examples, one line per scenario
pub fn demo<W: Write>(writer: &mut W) -> CliResult<()> {
    let movie = RecordType::builder("Movie")
        .field("title", FieldType::Str)
        .field("year", FieldType::Int)
        .field("box_office", FieldType::Float)
        .build()
        .map_err(declaration_failed)?;

    let movie_with_defaults = RecordType::builder("Movie")
        .field_with_default("title", FieldType::Str, "")
        .field_with_default("year", FieldType::Int, 0)
        .field_with_default("box_office", FieldType::Float, 0.0)
        .build()
        .map_err(declaration_failed)?;

    let cat = RecordType::builder("Cat")
        .field("name", FieldType::Str)
        .field("weight", FieldType::Float)
        .build()
        .map_err(declaration_failed)?;

    let godfather = movie
        .bind()
        .arg("title", "The Godfather")
        .arg("year", 1972)
        .arg("box_office", 137)
        .apply();
    report(writer, "Movie(title='The Godfather', year=1972, box_office=137)", &godfather)?;

    if let Ok(mut godfather) = godfather {
        let outcome = godfather.set("year", "MCMLXXII").map(|_| godfather);
        report(writer, "movie.year = 'MCMLXXII'", &outcome)?;
    }

    let avatar = movie
        .bind()
        .arg("title", "Avatar")
        .arg("year", 2009)
        .arg("box_office", "billions")
        .apply();
    report(writer, "Movie(title='Avatar', year=2009, box_office='billions')", &avatar)?;

    let brian = movie_with_defaults.bind().arg("title", "Life of Brian").apply();
    report(writer, "Movie(title='Life of Brian')", &brian)?;

    let titanic = movie_with_defaults
        .bind()
        .arg("title", "Titanic")
        .arg("director", "James Cameron")
        .apply();
    report(writer, "Movie(title='Titanic', director='James Cameron')", &titanic)?;

    let felix = cat.bind().arg("name", "Felix").arg("weight", None::<f64>).apply();
    report(writer, "Cat(name='Felix', weight=None)", &felix)?;

    let felix = cat.bind().arg("name", "Felix").arg("weight", 3.2).apply();
    report(writer, "Cat(name='Felix', weight=3.2)", &felix)?;

    if let Ok(mut felix) = felix {
        let outcome = felix.set("color", "tan").map(|_| felix);
        report(writer, "felix.color = 'tan'", &outcome)?;
    }

    Ok(())
}

fn report<W: Write>(
    writer: &mut W,
    call: &str,
    outcome: &RecordResult<Record>,
) -> CliResult<()> {
    match outcome {
        Ok(record) => writeln!(writer, ">>> {}\n{}", call, record)?,
        Err(e) => writeln!(writer, ">>> {}\n{}: {}", call, e.code(), e)?,
    }
    Ok(())
}

fn declaration_failed(e: RecordError) -> CliError {
    CliError::Config(format!("Invalid built-in record type: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cat() -> Arc<RecordType> {
        RecordType::builder("Cat")
            .field("name", FieldType::Str)
            .field("weight", FieldType::Float)
            .build()
            .unwrap()
    }

    fn responses(output: &[u8]) -> Vec<Json> {
        output
            .split(|b| *b == b'\n')
            .filter(|line| !line.is_empty())
            .map(|line| serde_json::from_slice(line).unwrap())
            .collect()
    }

    #[test]
    fn test_construct_stream_mixed_outcomes() {
        let input = concat!(
            "{\"name\": \"Felix\", \"weight\": 3}\n",
            "{\"name\": \"Felix\", \"weight\": \"half stone\"}\n",
            "{\"name\": \"Felix\", \"weight\": 3.2, \"age\": 7}\n",
            "{\"name\": \"Felix\"}\n",
        );
        let mut out = Vec::new();
        let constructed = construct_stream(&cat(), input.as_bytes(), &mut out).unwrap();
        assert_eq!(constructed, 1);

        let lines = responses(&out);
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0]["status"], "ok");
        assert_eq!(lines[0]["data"]["repr"], "Cat(name='Felix', weight=3.0)");
        assert_eq!(lines[0]["data"]["fields"]["weight"], 3.0);

        assert_eq!(lines[1]["code"], "CHECKED_COERCION_FAILED");
        assert_eq!(lines[1]["message"], "_weight cannot be set to 'half stone'");

        assert_eq!(lines[2]["code"], "CHECKED_UNEXPECTED_ARGUMENT");
        assert_eq!(lines[2]["message"], "got an unexpected keyword argument 'age'");

        assert_eq!(lines[3]["code"], "CHECKED_MISSING_ARGUMENT");
    }

    #[test]
    fn test_construct_stream_invalid_requests() {
        let input = "[1, 2]\nnot json\n";
        let mut out = Vec::new();
        assert_eq!(construct_stream(&cat(), input.as_bytes(), &mut out).unwrap(), 0);

        let lines = responses(&out);
        assert_eq!(lines.len(), 2);
        assert!(lines.iter().all(|l| l["code"] == INVALID_REQUEST));
    }

    /// An undeclared name is reported as such even when its value has no
    /// record form.
    #[test]
    fn test_construct_stream_unknown_name_checked_before_value() {
        let input = concat!(
            "{\"name\": \"Felix\", \"weight\": 3.2, \"tags\": [1]}\n",
            "{\"tags\": {\"a\": 1}, \"name\": \"Felix\"}\n",
        );
        let mut out = Vec::new();
        assert_eq!(construct_stream(&cat(), input.as_bytes(), &mut out).unwrap(), 0);

        let lines = responses(&out);
        assert_eq!(lines.len(), 2);
        for line in &lines {
            assert_eq!(line["code"], "CHECKED_UNEXPECTED_ARGUMENT");
            assert_eq!(line["message"], "got an unexpected keyword argument 'tags'");
        }
    }

    #[test]
    fn test_construct_stream_undecodable_value_is_coercion_failure() {
        let input = concat!(
            "{\"name\": [\"Felix\"], \"weight\": 3.2}\n",
            "{\"name\": \"Felix\", \"weight\": {\"kg\": 3}}\n",
            "{\"name\": \"Felix\", \"weight\": 18446744073709551615}\n",
            "{\"name\": [\"Felix\"]}\n",
        );
        let mut out = Vec::new();
        assert_eq!(construct_stream(&cat(), input.as_bytes(), &mut out).unwrap(), 0);

        let lines = responses(&out);
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0]["code"], "CHECKED_COERCION_FAILED");
        assert_eq!(lines[0]["message"], "_name cannot be set to [\"Felix\"]");
        assert_eq!(lines[1]["message"], "_weight cannot be set to {\"kg\":3}");
        assert_eq!(
            lines[2]["message"],
            "_weight cannot be set to 18446744073709551615"
        );
        assert_eq!(lines[3]["code"], "CHECKED_MISSING_ARGUMENT");
        assert_eq!(lines[3]["message"], "missing a required argument: 'weight'");
    }

    #[test]
    fn test_construct_stream_applies_defaults() {
        let registry = Config::from_json(
            r#"{ "record_types": [ { "name": "Cat", "fields": [
                { "name": "name", "type": "str" },
                { "name": "weight", "type": "float", "default": 0 } ] } ] }"#,
        )
        .unwrap()
        .registry()
        .unwrap();
        let cat = registry.get("Cat").unwrap();

        let mut out = Vec::new();
        let input = "{\"name\": \"Felix\"}\n";
        assert_eq!(construct_stream(cat, input.as_bytes(), &mut out).unwrap(), 1);
        assert_eq!(responses(&out)[0]["data"]["repr"], "Cat(name='Felix', weight=0.0)");
    }

    #[test]
    fn test_construct_unknown_type() {
        let registry = TypeRegistry::new();
        let err = construct(&registry, "Dog").unwrap_err();
        assert_eq!(err.code(), "CHECKED_CLI_UNKNOWN_TYPE");
    }

    #[test]
    fn test_describe_lists_fields() {
        let registry = Config::from_json(
            r#"{ "record_types": [ { "name": "Movie", "fields": [
                { "name": "title", "type": "str" },
                { "name": "box_office", "type": "float", "default": 0 } ] } ] }"#,
        )
        .unwrap()
        .registry()
        .unwrap();
        let mut out = Vec::new();
        describe(&registry, &mut out).unwrap();

        let parsed: Json = serde_json::from_slice(&out).unwrap();
        let fields = &parsed["data"][0]["fields"];
        assert_eq!(fields[0]["storage_name"], "_title");
        assert_eq!(fields[0]["required"], true);
        assert_eq!(fields[0]["default"], Json::Null);
        assert_eq!(fields[1]["coercion"], "float");
        assert_eq!(fields[1]["default"], "0");
    }

    #[test]
    fn test_demo_output() {
        let mut out = Vec::new();
        demo(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("Movie(title='The Godfather', year=1972, box_office=137.0)"));
        assert!(text.contains("_year cannot be set to 'MCMLXXII'"));
        assert!(text.contains("_box_office cannot be set to 'billions'"));
        assert!(text.contains("Movie(title='Life of Brian', year=0, box_office=0.0)"));
        assert!(text.contains("got an unexpected keyword argument 'director'"));
        assert!(text.contains("_weight cannot be set to None"));
        assert!(text.contains("'Cat' object has no attribute 'color'"));
    }
}
