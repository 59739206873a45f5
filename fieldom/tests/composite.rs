use fieldom::{Field, FieldError, FieldValue, construct_field};
use serde_json::{Value, json};

fn blog_post() -> Field {
    construct_field(json!({
        "properties": {
            "title": {"type": "text", "required": true, "fields": {"raw": {"type": "keyword"}}},
            "published": {"type": "date"},
            "author": {
                "type": "object",
                "properties": {
                    "name": {"type": "text", "required": true},
                    "ip": {"type": "ip"}
                }
            },
            "comments": {
                "type": "nested",
                "properties": {
                    "body": {"type": "text"},
                    "stars": {"type": "byte", "required": true}
                }
            }
        }
    }))
    .unwrap()
}

#[test]
fn collect_fields_is_depth_first_with_multi_fields() {
    let post = blog_post();
    let names: Vec<&str> = post.collect_fields().map(Field::name).collect();
    assert_eq!(
        names,
        ["text", "keyword", "date", "object", "text", "ip", "nested", "text", "byte"]
    );

    let first: Vec<_> = post.walk().map(|(path, _)| path).collect();
    let second: Vec<_> = post.walk().map(|(path, _)| path).collect();
    assert_eq!(first, second);
}

#[test]
fn shared_definitions_are_visited_each_time() {
    let tag = Field::keyword().with_field("raw", Field::keyword());
    let field = Field::object_of([("a", tag.clone()), ("b", tag)]);
    let paths: Vec<String> = field.walk().map(|(path, _)| path).collect();
    assert_eq!(paths, ["a", "a.raw", "b", "b.raw"]);
}

#[test]
fn merge_is_additive_and_existing_wins() {
    let mut post = blog_post();
    let other = construct_field(json!({
        "properties": {
            "title": {"type": "keyword"},
            "author": {"properties": {"name": {"type": "keyword"}, "email": {"type": "keyword"}}},
            "comments": {"type": "nested", "properties": {"created": {"type": "date"}}},
            "tags": {"type": "keyword", "multi": true}
        }
    }))
    .unwrap();

    post.merge(&other);

    assert_eq!(post.property("title").map(Field::name), Some("text"));
    assert_eq!(post.property("tags").map(Field::name), Some("keyword"));
    assert!(post.property("tags").is_some_and(Field::is_multi));

    let author = post.property("author").unwrap();
    assert_eq!(author.property("name").map(Field::name), Some("text"));
    assert_eq!(author.property("email").map(Field::name), Some("keyword"));

    let comments = post.property("comments").unwrap();
    assert!(comments.contains("body"));
    assert!(comments.contains("created"));
}

#[test]
fn merged_copies_are_independent() {
    let mut ours = Field::object();
    let mut theirs = Field::object_of([("meta", Field::object_of([("a", Field::keyword())]))]);

    ours.merge(&theirs);
    theirs
        .add_field("extra", "integer")
        .unwrap();

    assert!(!ours.contains("extra"));
    assert_eq!(ours.property("meta").and_then(|m| m.property("a")).map(Field::name), Some("keyword"));
}

#[test]
fn deserialize_wraps_mappings_into_documents() {
    let post = blog_post();
    let value = post
        .deserialize(json!({
            "title": "Hello",
            "published": "2016-01-01T10:00:00",
            "author": {"name": "ada", "ip": "10.0.0.1"},
            "comments": [{"body": "nice", "stars": "4"}]
        }))
        .unwrap();

    let doc = value.as_doc().unwrap();
    assert!(matches!(doc.lookup("published"), Some(FieldValue::DateTime(_))));
    assert!(matches!(doc.lookup("author.ip"), Some(FieldValue::Ip(_))));
    assert_eq!(doc.lookup("comments.0.stars"), Some(&FieldValue::Integer(4)));

    assert_eq!(
        post.serialize(&value).unwrap(),
        json!({
            "title": "Hello",
            "published": "2016-01-01T10:00:00",
            "author": {"name": "ada", "ip": "10.0.0.1/32"},
            "comments": [{"body": "nice", "stars": 4}]
        })
    );
}

#[test]
fn object_rejects_scalars() {
    let err = blog_post().deserialize(json!({"author": "ada"})).unwrap_err();
    assert_eq!(err.path(), "author");
    assert!(matches!(err.root_cause(), FieldError::Validation { .. }));
}

#[test]
fn clean_cascades_into_every_nested_document() {
    let post = blog_post();

    let ok = post
        .clean(json!({"title": "t", "author": {"name": "n"}, "comments": [{"stars": 1}, {"stars": 2}]}))
        .unwrap();
    assert_eq!(ok.as_doc().map(|doc| doc.len()), Some(3));

    let err = post
        .clean(json!({"title": "t", "comments": [{"stars": 1}, {"body": "no stars"}]}))
        .unwrap_err();
    assert_eq!(err.path(), "comments.stars");
    assert!(err.is_required());

    let err = post.clean(json!({"author": {"name": "n"}})).unwrap_err();
    assert_eq!(err.to_string(), "field `title`: value required for this field");
}

#[test]
fn absent_object_skips_its_required_children() {
    let post = blog_post();
    assert!(post.clean(json!({"title": "t"})).is_ok());
}

#[test]
fn empty_values_for_composites() {
    let post = blog_post();
    let comments = post.property("comments").unwrap();
    assert_eq!(comments.empty(), FieldValue::List(Vec::new()));

    let author = post.property("author").unwrap();
    let empty = author.empty();
    let doc = empty.as_doc().unwrap();
    assert!(doc.is_empty());
    assert!(doc.schema().contains_key("name"));
    assert_eq!(author.serialize(&empty).unwrap(), Value::Object(Default::default()));
}
