//! Integration tests for file input

use std::path::Path;

use ddlkit::{
    generate_script, load_model, read_script, translate_file, DdlError, DefaultValue, Dialect,
    GenerateOptions, TranslateOptions,
};

use crate::common::{create_model_file, create_sql_file, SHOP_SCHEMA};

#[test]
fn test_translate_file_utf8_with_bom_and_crlf() {
    let mut content = vec![0xEF, 0xBB, 0xBF];
    content.extend_from_slice(SHOP_SCHEMA.replace('\n', "\r\n").as_bytes());
    let file = create_sql_file(&content);

    let translation = translate_file(file.path(), &TranslateOptions::new("postgresql")).unwrap();
    assert_eq!(translation.tables.len(), 2);
    assert!(!translation.sql.contains('\r'));
    assert_eq!(
        translation.sql,
        ddlkit::translate(SHOP_SCHEMA, "postgresql").sql
    );
}

#[test]
fn test_translate_file_windows_1252() {
    // "crème brûlée" saved by a legacy editor
    let file = create_sql_file(
        b"CREATE TABLE menu (item VARCHAR(20) NOT NULL DEFAULT 'cr\xe8me br\xfbl\xe9e');",
    );

    let sql = read_script(file.path()).unwrap();
    assert!(sql.contains("'crème brûlée'"));

    let translation = translate_file(file.path(), &TranslateOptions::new("mysql")).unwrap();
    assert_eq!(
        translation.tables[0].column("item").unwrap().default,
        Some(DefaultValue::Literal("'crème brûlée'".to_string()))
    );
    assert!(translation
        .sql
        .contains("\t`item` VARCHAR(20) NOT NULL DEFAULT 'crème brûlée'\n"));
}

#[test]
fn test_missing_files_are_errors() {
    let missing = Path::new("/nonexistent/ddlkit/schema.sql");

    let err = translate_file(missing, &TranslateOptions::new("mysql")).unwrap_err();
    assert!(matches!(err, DdlError::ScriptRead { .. }));
    assert!(err.to_string().contains("schema.sql"));

    let err = load_model(Path::new("/nonexistent/ddlkit/model.json")).unwrap_err();
    assert!(matches!(err, DdlError::ModelRead { .. }));
}

#[test]
fn test_load_model_and_generate_data() {
    let file = create_model_file(
        r##"[
            {
                "name": "colors",
                "columns": [
                    { "name": "id", "type": "INT", "primaryKey": true, "autoIncrement": true },
                    { "name": "label", "type": "VARCHAR", "length": 30, "nullable": false },
                    { "name": "hex", "type": "CHAR", "length": 7, "default": null }
                ],
                "data": [
                    { "id": 1, "label": "red", "hex": "#ff0000" },
                    { "id": 2, "label": "it's blue" },
                    { "id": 3, "label": null, "hex": "" }
                ]
            }
        ]"##,
    );

    let tables = load_model(file.path()).unwrap();
    let options = GenerateOptions {
        max_row: 2,
        ..GenerateOptions::new(Dialect::Sqlserver)
    };
    let generated = generate_script(&tables, &options, true);

    assert_eq!(
        generated.sql,
        "IF OBJECT_ID(N'colors', N'U') IS NULL\n\
         CREATE TABLE colors\n(\n\
         \tid INT PRIMARY KEY NOT NULL IDENTITY(1,1),\n\
         \tlabel NVARCHAR(30) NOT NULL,\n\
         \thex NCHAR(7) DEFAULT NULL\n\
         );\n\n\
         INSERT INTO colors (id, label, hex) VALUES\n\
         (1, 'red', '#ff0000'),\n\
         (2, 'it''s blue', null);\n\n\
         INSERT INTO colors (id, label, hex) VALUES\n\
         (3, '', null);"
    );
    assert!(generated.warnings.is_empty());
}

#[test]
fn test_load_model_rejects_invalid_json() {
    let file = create_model_file(r#"{ "name": "not an array" }"#);
    let err = load_model(file.path()).unwrap_err();
    assert!(matches!(err, DdlError::ModelJson(_)));
}
