use opquery::DbError;
use opquery::cli::{Command, json_to_document, run};
use opquery::cluster::TopologyKind;

fn build(options: Option<&str>, read: Option<&str>, topology: TopologyKind) -> Result<serde_json::Value, DbError> {
    let out = run(Command::BuildSpec {
        db: "shop".into(),
        collection: "orders".into(),
        filter_json: Some(r#"{"status":"open"}"#.into()),
        options_json: options.map(str::to_string),
        read_json: read.map(str::to_string),
        topology,
    })?;
    Ok(serde_json::from_str(&out)?)
}

#[test]
fn build_prints_wrapped_selector() {
    let v = build(Some(r#"{"sort":{"ts":-1},"limit":5,"tailable":true}"#), None, TopologyKind::Single).unwrap();
    assert_eq!(v["selector"]["$query"]["status"], "open");
    assert_eq!(v["selector"]["$orderby"]["ts"], -1);
    assert_eq!(v["options"]["limit"], 5);
    assert_eq!(v["options"]["flags"], serde_json::json!(["tailable_cursor"]));
    assert_eq!(v["db_name"], "shop");
    assert_eq!(v["coll_name"], "orders");
}

#[test]
fn build_with_read_preference_on_router() {
    let v = build(None, Some(r#"{"mode":"nearest"}"#), TopologyKind::Sharded).unwrap();
    assert_eq!(v["selector"]["$readPreference"]["mode"], "nearest");
    assert_eq!(v["read"]["mode"], "nearest");
}

#[test]
fn build_errors_surface() {
    assert!(matches!(build(Some("[1,2]"), None, TopologyKind::Single), Err(DbError::InvalidArgument(_))));
    assert!(matches!(build(Some("{"), None, TopologyKind::Single), Err(DbError::Json(_))));
    assert!(matches!(build(None, None, TopologyKind::Unknown), Err(DbError::Topology(_))));
    assert!(matches!(
        build(None, Some(r#"{"mode":"fastest"}"#), TopologyKind::Single),
        Err(DbError::InvalidReadPreference(_))
    ));
}

#[test]
fn index_name_command() {
    let out = run(Command::IndexName { spec_json: r#"{"name":1,"age":-1}"#.into() }).unwrap();
    assert_eq!(out, "name_1_age_-1");
}

#[test]
fn json_objects_only() {
    assert_eq!(json_to_document(r#"{"a":"b"}"#).unwrap().get_str("a").unwrap(), "b");
    assert!(json_to_document("3").is_err());
}
