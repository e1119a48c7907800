//! Integration tests for loading and reducing OpenAPI documents.

use openapi_reduce::{
    closure, reduce, schema_union, LoadError, LoadOptions, LoadedSpec, ReduceError, SelectionSet,
    UnresolvedRefs, NO_TAG,
};
use serde_json::{json, Value};

fn petstore() -> Value {
    json!({
        "openapi": "3.0.1",
        "info": { "title": "Petstore", "version": "1.0.0" },
        "servers": [{ "url": "https://petstore.example.com/v1" }],
        "security": [{ "apiKey": [] }],
        "tags": [{ "name": "pets" }, { "name": "store" }],
        "paths": {
            "/pets": {
                "get": {
                    "operationId": "listPets",
                    "summary": "List all pets",
                    "tags": ["pets"],
                    "responses": {
                        "200": { "content": { "application/json": { "schema": { "$ref": "#/components/schemas/Pets" } } } },
                        "default": { "content": { "application/json": { "schema": { "$ref": "#/components/schemas/Error" } } } }
                    }
                },
                "post": {
                    "operationId": "createPet",
                    "summary": "Create a pet",
                    "tags": ["pets"],
                    "requestBody": {
                        "content": {
                            "application/json": { "schema": { "$ref": "#/components/schemas/NewPet" } },
                            "application/xml": { "schema": { "type": "string" } }
                        }
                    },
                    "responses": { "201": { "description": "Null response" } }
                }
            },
            "/pets/{petId}": {
                "parameters": [{ "name": "petId", "in": "path", "required": true, "schema": { "type": "string" } }],
                "get": {
                    "operationId": "getPet",
                    "summary": "Info for a specific pet",
                    "tags": ["pets", "details"],
                    "responses": {
                        "200": { "content": { "application/json": { "schema": { "$ref": "#/components/schemas/Pet" } } } }
                    }
                }
            },
            "/store/orders": {
                "post": {
                    "operationId": "placeOrder",
                    "tags": ["store"],
                    "requestBody": { "content": { "application/json": { "schema": { "$ref": "#/components/schemas/Order" } } } },
                    "responses": {
                        "200": { "content": { "application/json": { "schema": { "$ref": "#/components/schemas/Order" } } } }
                    }
                }
            },
            "/health": {
                "get": { "operationId": "health" }
            }
        },
        "components": {
            "schemas": {
                "Pet": {
                    "type": "object",
                    "required": ["id", "name"],
                    "properties": {
                        "id": { "type": "integer" },
                        "name": { "type": "string" },
                        "tag": { "$ref": "#/components/schemas/Tag" }
                    }
                },
                "Tag": { "type": "object", "properties": { "name": { "type": "string" } } },
                "Pets": { "type": "array", "items": { "$ref": "#/components/schemas/Pet" } },
                "NewPet": {
                    "allOf": [
                        { "$ref": "#/components/schemas/PetBase" },
                        { "type": "object", "properties": { "owner": { "$ref": "#/components/schemas/Owner" } } }
                    ]
                },
                "PetBase": { "type": "object", "properties": { "name": { "type": "string" } } },
                "Owner": {
                    "type": "object",
                    "properties": { "pets": { "type": "array", "items": { "$ref": "#/components/schemas/NewPet" } } }
                },
                "Order": {
                    "type": "object",
                    "properties": { "pet": { "oneOf": [{ "$ref": "#/components/schemas/Pet" }, { "type": "null" }] } }
                },
                "Error": { "type": "object", "properties": { "message": { "type": "string" } } },
                "Unused": { "type": "string" }
            },
            "securitySchemes": {
                "apiKey": { "type": "apiKey", "in": "header", "name": "X-API-Key" }
            }
        }
    })
}

fn load(doc: &Value) -> LoadedSpec {
    LoadedSpec::from_value(doc.clone(), &LoadOptions::new()).unwrap()
}

fn select(ids: &[&str]) -> SelectionSet {
    ids.iter().copied().collect()
}

fn schema_names(doc: &Value) -> Vec<String> {
    doc["components"]["schemas"]
        .as_object()
        .unwrap()
        .keys()
        .cloned()
        .collect()
}

// === Load & Catalog Tests ===

mod loading {
    use super::*;

    #[test]
    fn malformed_json_is_format_error() {
        let err = LoadedSpec::parse("{\"openapi\": ", &LoadOptions::new()).unwrap_err();
        assert!(matches!(err, LoadError::InvalidJson { .. }));
    }

    #[test]
    fn missing_marker_is_not_openapi() {
        let err = LoadedSpec::parse(r#"{"swagger": "2.0", "paths": {}}"#, &LoadOptions::new())
            .unwrap_err();
        assert!(matches!(err, LoadError::NotOpenApi));
    }

    #[test]
    fn operations_are_extracted() {
        let spec = load(&petstore());
        let catalog = spec.catalog();

        assert_eq!(catalog.len(), 5);
        assert_eq!(spec.schemas().len(), 9);

        let get_pet = catalog.by_id("getPet").unwrap();
        assert_eq!(get_pet.path, "/pets/{petId}");
        assert_eq!(get_pet.summary, "Info for a specific pet");
        assert_eq!(get_pet.tag, "pets");
        assert_eq!(catalog.by_id("health").unwrap().tag, NO_TAG);
    }

    #[test]
    fn by_tag_groups() {
        let spec = load(&petstore());
        let groups = spec.catalog().by_tag();

        assert_eq!(groups.keys().copied().collect::<Vec<_>>(), vec![NO_TAG, "pets", "store"]);
        let pets: Vec<_> = groups["pets"].iter().map(|op| op.id()).collect();
        assert_eq!(pets, vec!["listPets", "createPet", "getPet"]);
    }

    #[test]
    fn by_id_unknown() {
        let spec = load(&petstore());
        assert!(matches!(
            spec.catalog().by_id("deletePet"),
            Err(ReduceError::OperationNotFound { .. })
        ));
    }

    #[test]
    fn duplicate_operation_id_rejected() {
        let mut doc = petstore();
        doc["paths"]["/store/orders"]["post"]["operationId"] = json!("listPets");

        let err = LoadedSpec::from_value(doc, &LoadOptions::new()).unwrap_err();
        match err {
            LoadError::DuplicateOperation {
                operation_id,
                first,
                second,
            } => {
                assert_eq!(operation_id, "listPets");
                assert_eq!(first, "GET /pets");
                assert_eq!(second, "POST /store/orders");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_operation_id_rejected() {
        let mut doc = petstore();
        doc["paths"]["/health"]["get"] = json!({ "summary": "no id" });

        let err = LoadedSpec::from_value(doc, &LoadOptions::new()).unwrap_err();
        assert!(matches!(err, LoadError::MissingOperationId { path, .. } if path == "/health"));
    }

    #[test]
    fn unresolved_reference_policy() {
        let mut doc = petstore();
        doc["components"]["schemas"]["Tag"]["properties"]["color"] =
            json!({ "$ref": "#/components/schemas/Color" });

        let spec = LoadedSpec::from_value(doc.clone(), &LoadOptions::new()).unwrap();
        let schemas = &spec.catalog().by_id("getPet").unwrap().schemas;
        assert!(schemas.contains("Tag"));
        assert!(!schemas.contains("Color"));

        let err = LoadedSpec::from_value(doc, &LoadOptions::new().deny_unresolved(true)).unwrap_err();
        assert!(matches!(
            err,
            LoadError::UnresolvedReference { schema, referenced_from } if schema == "Color" && referenced_from == "Tag"
        ));
    }
}

// === Closure Tests ===

mod closure_properties {
    use super::*;

    #[test]
    fn operation_schema_sets_are_closed() {
        let spec = load(&petstore());
        for operation in spec.catalog().iter() {
            let again = closure(
                operation.schemas.iter().map(String::as_str),
                spec.schemas(),
                UnresolvedRefs::Tolerate,
                operation.id(),
            )
            .unwrap();
            assert_eq!(again, operation.schemas, "{} is not closed", operation.id());
        }
    }

    #[test]
    fn mutual_recursion_terminates() {
        let spec = load(&petstore());
        let create = spec.catalog().by_id("createPet").unwrap();

        let names: Vec<_> = create.schemas.iter().map(String::as_str).collect();
        assert_eq!(names, vec!["NewPet", "Owner", "PetBase"]);
    }

    #[test]
    fn inline_media_types_contribute_nothing() {
        let spec = load(&petstore());
        // application/xml carries an inline schema only
        assert!(!spec.catalog().by_id("createPet").unwrap().schemas.contains("Unused"));
        assert!(spec.catalog().by_id("health").unwrap().schemas.is_empty());
    }
}

// === Reduction Tests ===

mod reduction {
    use super::*;

    #[test]
    fn get_pet_scenario() {
        let doc = petstore();
        let spec = load(&doc);

        let reduced = spec.reduce(&select(&["getPet"])).unwrap().into_value();

        assert_eq!(schema_names(&reduced), vec!["Pet", "Tag"]);
        let paths: Vec<_> = reduced["paths"].as_object().unwrap().keys().cloned().collect();
        assert_eq!(paths, vec!["/pets/{petId}"]);
        assert_eq!(reduced["paths"]["/pets/{petId}"], doc["paths"]["/pets/{petId}"]);
    }

    #[test]
    fn verbs_on_one_path_merge() {
        let doc = petstore();
        let spec = load(&doc);

        let reduced = spec
            .reduce(&select(&["listPets", "createPet"]))
            .unwrap()
            .into_value();

        let pets = reduced["paths"]["/pets"].as_object().unwrap();
        assert_eq!(pets.keys().collect::<Vec<_>>(), vec!["get", "post"]);
        assert_eq!(reduced["paths"]["/pets"], doc["paths"]["/pets"]);
    }

    #[test]
    fn select_all_round_trips() {
        let doc = petstore();
        let spec = load(&doc);

        let reduced = spec.reduce(&SelectionSet::all(spec.catalog())).unwrap();
        let out = &reduced.document;

        assert_eq!(out["paths"], doc["paths"]);
        let mut expected = doc["components"]["schemas"].clone();
        expected.as_object_mut().unwrap().remove("Unused");
        assert_eq!(out["components"]["schemas"], expected);
        assert_eq!(reduced.stats.operations_selected, 5);
        assert_eq!(reduced.stats.schemas_selected, 8);
        assert_eq!(reduced.stats.schemas_total, 9);
    }

    #[test]
    fn empty_selection() {
        let doc = petstore();
        let spec = load(&doc);

        let reduced = spec.reduce(&SelectionSet::new()).unwrap().into_value();
        assert_eq!(reduced["paths"], json!({}));
        assert_eq!(reduced["components"]["schemas"], json!({}));
    }

    #[test]
    fn other_fields_carried_over() {
        let doc = petstore();
        let spec = load(&doc);

        let reduced = spec.reduce(&select(&["placeOrder"])).unwrap().into_value();
        for field in ["openapi", "info", "servers", "security", "tags"] {
            assert_eq!(reduced[field], doc[field], "{field} changed");
        }
        assert_eq!(
            reduced["components"]["securitySchemes"],
            doc["components"]["securitySchemes"]
        );
    }

    #[test]
    fn selection_monotonicity() {
        let doc = petstore();
        let spec = load(&doc);
        let small = select(&["getPet"]);
        let large = select(&["getPet", "placeOrder", "createPet"]);

        let small_union = schema_union(spec.catalog(), &small).unwrap();
        let large_union = schema_union(spec.catalog(), &large).unwrap();
        assert!(small_union.is_subset(&large_union));

        let small_doc = spec.reduce(&small).unwrap().into_value();
        let large_doc = spec.reduce(&large).unwrap().into_value();
        for (path, item) in small_doc["paths"].as_object().unwrap() {
            for method in item.as_object().unwrap().keys() {
                assert!(large_doc["paths"][path].get(method).is_some());
            }
        }
    }

    #[test]
    fn unknown_selection_fails_without_output() {
        let doc = petstore();
        let spec = load(&doc);

        let err = reduce(spec.document(), spec.catalog(), &select(&["getPet", "nope"])).unwrap_err();
        assert!(matches!(err, ReduceError::OperationNotFound { operation_id } if operation_id == "nope"));
        assert_eq!(*spec.document(), doc);
    }

    #[test]
    fn by_tag_selection() {
        let doc = petstore();
        let spec = load(&doc);

        let selection = SelectionSet::by_tags(spec.catalog(), &["store"]);
        let reduced = spec.reduce(&selection).unwrap().into_value();

        assert_eq!(schema_names(&reduced), vec!["Pet", "Tag", "Order"]);
    }
}
