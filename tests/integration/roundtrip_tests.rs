//! Round-trip tests: generated SQL parses back into the same structure

use ddlkit::{parse_script, translate, Dialect};
use pretty_assertions::assert_eq;

use crate::common::{column_shape, primary_key_set, SHOP_SCHEMA};

#[test]
fn test_output_reparses_in_every_dialect() {
    let original = parse_script(SHOP_SCHEMA);
    assert_eq!(original.tables.len(), 2);

    for dialect in Dialect::ALL {
        let translation = translate(SHOP_SCHEMA, dialect.name());
        let reparsed = parse_script(&translation.sql);
        assert!(
            reparsed.warnings.is_empty(),
            "{}: {:?}",
            dialect,
            reparsed.warnings
        );
        assert_eq!(reparsed.tables.len(), original.tables.len(), "{}", dialect);

        for (before, after) in original.tables.iter().zip(&reparsed.tables) {
            assert_eq!(before.name, after.name, "{}", dialect);
            assert_eq!(column_shape(before), column_shape(after), "{}", dialect);
            assert_eq!(primary_key_set(before), primary_key_set(after), "{}", dialect);
        }
    }
}

#[test]
fn test_mysql_output_keeps_types() {
    let translation = translate(SHOP_SCHEMA, "mysql");
    let reparsed = parse_script(&translation.sql);

    let types = |table: &ddlkit::Table| -> Vec<(String, Option<u32>, Option<u32>)> {
        table
            .columns
            .iter()
            .map(|c| (c.data_type.clone(), c.length, c.scale))
            .collect()
    };

    let customers = &reparsed.tables[0];
    assert_eq!(
        types(customers),
        vec![
            ("INT".to_string(), Some(11), None),
            ("VARCHAR".to_string(), Some(120), None),
            ("VARCHAR".to_string(), Some(80), None),
            ("ENUM".to_string(), None, None),
            ("BOOLEAN".to_string(), None, None),
            ("DECIMAL".to_string(), Some(10), Some(2)),
            ("DATETIME".to_string(), None, None),
        ]
    );
    assert_eq!(
        customers.column("tier").unwrap().values,
        vec!["basic", "gold", "platinum"]
    );
    assert_eq!(types(&reparsed.tables[1]), types(&translation.tables[1]));
    assert_eq!(
        reparsed.tables[1].foreign_keys,
        translation.tables[1].foreign_keys
    );
}

#[test]
fn test_translation_is_idempotent() {
    for dialect in Dialect::ALL {
        let first = translate(SHOP_SCHEMA, dialect.name());
        let second = translate(&first.sql, dialect.name());

        // the DROP comments of the source script do not survive as statements
        let (drops, body) = first.sql.split_once("\n\n").unwrap();
        assert!(drops.lines().all(|line| line.starts_with("-- DROP TABLE")));
        assert_eq!(second.sql, body, "{}", dialect);
    }
}

#[test]
fn test_postgres_output_keeps_indexes_and_comments() {
    let translation = translate(SHOP_SCHEMA, "postgresql");
    let reparsed = parse_script(&translation.sql);

    let customers = &reparsed.tables[0];
    assert_eq!(customers.indexes.len(), 1);
    assert!(customers.indexes[0].unique);
    assert!(customers.column("id").unwrap().auto_increment);

    let order_lines = &reparsed.tables[1];
    assert_eq!(
        order_lines.indexes[0].name.as_deref(),
        Some("idx_order_lines_customer")
    );
    assert_eq!(
        order_lines.column("note").unwrap().description.as_deref(),
        Some("free text")
    );
}

#[test]
fn test_non_ascii_defaults_survive_every_dialect() {
    let source = "CREATE TABLE menu (name VARCHAR(10) DEFAULT 'ééé', dish VARCHAR(30) NOT NULL DEFAULT 'crème brûlée', id INT);";

    for dialect in Dialect::ALL {
        let first = translate(source, dialect.name());
        assert!(first.warnings.is_empty(), "{}: {:?}", dialect, first.warnings);
        assert!(first.sql.contains("DEFAULT 'ééé'"), "{}", dialect);
        assert!(first.sql.contains("DEFAULT 'crème brûlée'"), "{}", dialect);

        let second = translate(&first.sql, dialect.name());
        assert_eq!(second.sql, first.sql, "{}", dialect);
    }
}

#[test]
fn test_keyword_named_column_survives_retranslation() {
    let source = "CREATE TABLE `settings` (\n\
                  `id` int NOT NULL,\n\
                  `key` varchar(10) NOT NULL,\n\
                  `index` int DEFAULT NULL,\n\
                  PRIMARY KEY (`id`)\n\
                  );";

    for dialect in Dialect::ALL {
        let first = translate(source, dialect.name());
        let reparsed = parse_script(&first.sql);
        assert!(reparsed.warnings.is_empty(), "{}: {:?}", dialect, reparsed.warnings);
        let names: Vec<&str> = reparsed.tables[0]
            .columns
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(names, vec!["id", "key", "index"], "{}", dialect);

        let second = translate(&first.sql, dialect.name());
        assert_eq!(second.sql, first.sql, "{}", dialect);
    }
}

#[test]
fn test_uuid_columns_keep_their_width() {
    let source = "CREATE TABLE tokens (id UUID PRIMARY KEY, g UNIQUEIDENTIFIER);";

    let mysql = translate(source, "mysql");
    assert!(mysql.sql.contains("\t`id` CHAR(36) PRIMARY KEY NOT NULL,\n"));
    assert!(mysql.sql.contains("\t`g` CHAR(36) NULL\n"));
    assert_eq!(translate(&mysql.sql, "mysql").sql, mysql.sql);

    let postgres = translate(source, "postgresql");
    assert!(postgres.sql.contains("\tid UUID PRIMARY KEY NOT NULL,\n"));
}
