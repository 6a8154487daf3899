//! Allow-list projection from the generic value tree into the typed model.
//!
//! Each object level recognizes a fixed key set; recognized keys populate
//! descriptor fields and everything else is discarded. A recognized key
//! whose value has the wrong shape degrades to the field's default, the same
//! as if the key were absent. Projection itself never fails: the only decode
//! failures are parse failures and a non-object root.

use tracing::trace;

use crate::error::{Result, SchemaError};
use crate::model::{
    AssemblySnapshot, FieldDescriptor, MethodDescriptor, ParameterDescriptor, PropertyDescriptor,
    TypeDescriptor,
};
use crate::value::{parse_value, Value};

/// Decode one snapshot payload into an [`AssemblySnapshot`].
///
/// Fails only when the payload does not parse as a value tree or when its
/// root is not an object; no partially populated snapshot is ever returned.
pub fn decode_snapshot(payload: &[u8]) -> Result<AssemblySnapshot> {
    let root = parse_value(payload)?;
    let Value::Object(entries) = root else {
        return Err(SchemaError::RootNotObject);
    };
    Ok(project_assembly(&entries))
}

fn project_assembly(entries: &[(String, Value)]) -> AssemblySnapshot {
    let mut snapshot = AssemblySnapshot::default();
    for (key, value) in entries {
        match key.as_str() {
            "assemblyName" => snapshot.assembly_name = str_field(value),
            "timestamp" => snapshot.timestamp = str_field(value),
            "types" => snapshot.types = array_of(value, project_type),
            other => trace!(key = other, "skipping unrecognized snapshot key"),
        }
    }
    snapshot
}

fn project_type(entries: &[(String, Value)]) -> TypeDescriptor {
    let mut ty = TypeDescriptor::default();
    for (key, value) in entries {
        match key.as_str() {
            "name" => ty.name = str_field(value),
            "fullName" => ty.full_name = str_field(value),
            "namespace" => ty.namespace = str_field(value),
            "baseType" => ty.base_type = str_field(value),
            "isClass" => ty.is_class = bool_field(value),
            "isStruct" => ty.is_struct = bool_field(value),
            "isEnum" => ty.is_enum = bool_field(value),
            "isInterface" => ty.is_interface = bool_field(value),
            "fields" => ty.fields = array_of(value, project_field),
            "methods" => ty.methods = array_of(value, project_method),
            "properties" => ty.properties = array_of(value, project_property),
            other => trace!(key = other, "skipping unrecognized type key"),
        }
    }
    ty
}

fn project_field(entries: &[(String, Value)]) -> FieldDescriptor {
    let mut field = FieldDescriptor::default();
    for (key, value) in entries {
        match key.as_str() {
            "name" => field.name = str_field(value),
            "fieldType" => field.field_type = str_field(value),
            "isPublic" => field.is_public = bool_field(value),
            "isStatic" => field.is_static = bool_field(value),
            "isReadOnly" => field.is_read_only = bool_field(value),
            other => trace!(key = other, "skipping unrecognized field key"),
        }
    }
    field
}

fn project_method(entries: &[(String, Value)]) -> MethodDescriptor {
    let mut method = MethodDescriptor::default();
    for (key, value) in entries {
        match key.as_str() {
            "name" => method.name = str_field(value),
            "returnType" => method.return_type = str_field(value),
            "isPublic" => method.is_public = bool_field(value),
            "isStatic" => method.is_static = bool_field(value),
            "parameters" => method.parameters = array_of(value, project_parameter),
            other => trace!(key = other, "skipping unrecognized method key"),
        }
    }
    method
}

fn project_parameter(entries: &[(String, Value)]) -> ParameterDescriptor {
    let mut param = ParameterDescriptor::default();
    for (key, value) in entries {
        match key.as_str() {
            "name" => param.name = str_field(value),
            "parameterType" => param.parameter_type = str_field(value),
            other => trace!(key = other, "skipping unrecognized parameter key"),
        }
    }
    param
}

fn project_property(entries: &[(String, Value)]) -> PropertyDescriptor {
    let mut prop = PropertyDescriptor::default();
    for (key, value) in entries {
        match key.as_str() {
            "name" => prop.name = str_field(value),
            "propertyType" => prop.property_type = str_field(value),
            "canRead" => prop.can_read = bool_field(value),
            "canWrite" => prop.can_write = bool_field(value),
            other => trace!(key = other, "skipping unrecognized property key"),
        }
    }
    prop
}

fn str_field(value: &Value) -> String {
    value.as_str().unwrap_or_default().to_string()
}

fn bool_field(value: &Value) -> bool {
    value.as_bool().unwrap_or_default()
}

/// Project every object entry of an array value; non-object entries and
/// non-array values degrade to nothing.
fn array_of<T>(value: &Value, project: fn(&[(String, Value)]) -> T) -> Vec<T> {
    match value.as_array() {
        Some(items) => items
            .iter()
            .filter_map(|item| item.as_object().map(project))
            .collect(),
        None => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CORE_PAYLOAD: &[u8] = br#"{"assemblyName":"Core","timestamp":"t1","types":[{"name":"Foo","fullName":"NS.Foo","namespace":"NS","baseType":"","isClass":true,"isStruct":false,"isEnum":false,"isInterface":false,"fields":[{"name":"x","fieldType":"int","isPublic":true,"isStatic":false,"isReadOnly":false}],"methods":[],"properties":[]}]}"#;

    #[test]
    fn decodes_core_scenario() {
        let snapshot = decode_snapshot(CORE_PAYLOAD).unwrap();

        assert_eq!(snapshot.assembly_name, "Core");
        assert_eq!(snapshot.timestamp, "t1");
        assert_eq!(snapshot.types.len(), 1);

        let ty = &snapshot.types[0];
        assert_eq!(ty.name, "Foo");
        assert_eq!(ty.full_name, "NS.Foo");
        assert_eq!(ty.namespace, "NS");
        assert_eq!(ty.base_type, "");
        assert!(ty.is_class);
        assert!(!ty.is_struct && !ty.is_enum && !ty.is_interface);

        assert_eq!(ty.fields.len(), 1);
        let field = &ty.fields[0];
        assert_eq!(field.name, "x");
        assert_eq!(field.field_type, "int");
        assert!(field.is_public);
        assert!(!field.is_static);
        assert!(!field.is_read_only);

        assert!(ty.methods.is_empty());
        assert!(ty.properties.is_empty());
    }

    #[test]
    fn redecoding_is_idempotent() {
        let first = decode_snapshot(CORE_PAYLOAD).unwrap();
        let second = decode_snapshot(CORE_PAYLOAD).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn unknown_keys_of_any_shape_are_tolerated() {
        let payload = br#"{
            "assemblyName":"Core",
            "schemaVersion":"2.0",
            "producer":{"engine":"unity","extras":[1,2,3]},
            "tags":["a","b"],
            "experimental":true,
            "timestamp":"t1"
        }"#;
        let snapshot = decode_snapshot(payload).unwrap();
        assert_eq!(snapshot.assembly_name, "Core");
        assert_eq!(snapshot.timestamp, "t1");
        assert!(snapshot.types.is_empty());
    }

    #[test]
    fn missing_root_delimiter_fails_with_no_snapshot() {
        let payload = br#"{"assemblyName":"Core","timestamp":"t1""#;
        assert!(decode_snapshot(payload).is_err());
    }

    #[test]
    fn non_object_root_fails() {
        let err = decode_snapshot(br#"["not","an","object"]"#).unwrap_err();
        assert!(matches!(err, SchemaError::RootNotObject));

        let err = decode_snapshot(br#""just a string""#).unwrap_err();
        assert!(matches!(err, SchemaError::RootNotObject));
    }

    #[test]
    fn wrong_shape_fields_degrade_to_defaults() {
        // assemblyName is a bool, isClass is a string, fields is an object.
        let payload = br#"{
            "assemblyName":true,
            "timestamp":"t1",
            "types":[{"name":"Foo","isClass":"yes","fields":{"name":"x"}}]
        }"#;
        let snapshot = decode_snapshot(payload).unwrap();
        assert_eq!(snapshot.assembly_name, "");
        assert_eq!(snapshot.timestamp, "t1");
        let ty = &snapshot.types[0];
        assert_eq!(ty.name, "Foo");
        assert!(!ty.is_class);
        assert!(ty.fields.is_empty());
    }

    #[test]
    fn non_object_array_entries_are_skipped() {
        let payload = br#"{"types":[{"name":"A"},"stray",42,{"name":"B"}]}"#;
        let snapshot = decode_snapshot(payload).unwrap();
        let names: Vec<_> = snapshot.types.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, ["A", "B"]);
    }

    #[test]
    fn declaration_order_is_preserved() {
        let payload = br#"{"types":[
            {"name":"A","methods":[
                {"name":"m1","parameters":[
                    {"name":"p1","parameterType":"int"},
                    {"name":"p2","parameterType":"bool"},
                    {"name":"p3","parameterType":"string"}
                ]},
                {"name":"m2"}
            ]},
            {"name":"B"},
            {"name":"C"}
        ]}"#;
        let snapshot = decode_snapshot(payload).unwrap();

        let type_names: Vec<_> = snapshot.types.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(type_names, ["A", "B", "C"]);

        let methods = &snapshot.types[0].methods;
        assert_eq!(methods[0].name, "m1");
        assert_eq!(methods[1].name, "m2");

        let params: Vec<_> = methods[0]
            .parameters
            .iter()
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(params, ["p1", "p2", "p3"]);
    }

    #[test]
    fn properties_and_methods_project() {
        let payload = br#"{"types":[{
            "name":"Svc",
            "methods":[{"name":"Run","returnType":"void","isPublic":true,"isStatic":true,"parameters":[]}],
            "properties":[{"name":"Count","propertyType":"int","canRead":true,"canWrite":false}]
        }]}"#;
        let snapshot = decode_snapshot(payload).unwrap();
        let ty = &snapshot.types[0];

        let method = &ty.methods[0];
        assert_eq!(method.name, "Run");
        assert_eq!(method.return_type, "void");
        assert!(method.is_public && method.is_static);
        assert!(method.parameters.is_empty());

        let prop = &ty.properties[0];
        assert_eq!(prop.name, "Count");
        assert_eq!(prop.property_type, "int");
        assert!(prop.can_read);
        assert!(!prop.can_write);
    }

    #[test]
    fn additive_kind_flags_are_stored_as_sent() {
        let payload = br#"{"types":[{"name":"Odd","isClass":true,"isEnum":true}]}"#;
        let snapshot = decode_snapshot(payload).unwrap();
        let ty = &snapshot.types[0];
        assert!(ty.is_class);
        assert!(ty.is_enum);
    }

    #[test]
    fn empty_object_decodes_to_defaults() {
        let snapshot = decode_snapshot(b"{}").unwrap();
        assert_eq!(snapshot, AssemblySnapshot::default());
    }
}
