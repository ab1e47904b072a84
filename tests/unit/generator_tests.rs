//! Unit tests for SQL generation

use ddlkit::{
    create_table, generate_script, insert_statements, parse_model_json, translate, Column,
    DefaultValue, Dialect, ForeignKey, GenerateOptions, Index, Row, Table, Warning,
};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

fn row(pairs: &[(&str, Value)]) -> Row {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

fn orders_table() -> Table {
    let mut table = Table::new("orders");
    table.columns = vec![
        Column::new("order_id", "INT").not_null(),
        Column::new("line_no", "INT").not_null(),
        Column::new("customer_id", "INT"),
    ];
    table.primary_key = vec!["order_id".to_string(), "line_no".to_string()];
    table
}

fn customer_key(on_delete: Option<&str>) -> ForeignKey {
    ForeignKey {
        name: None,
        column_name: vec!["customer_id".to_string()],
        referenced_table: "customers".to_string(),
        referenced_column: vec!["id".to_string()],
        on_update: None,
        on_delete: on_delete.map(str::to_string),
    }
}

// ============================================================================
// Reference scenarios
// ============================================================================

#[test]
fn test_mysql_table_to_postgres() {
    let translation = translate(
        "CREATE TABLE users (id INT PRIMARY KEY, name VARCHAR(50) NOT NULL, active TINYINT(1) DEFAULT 1)",
        "postgresql",
    );
    assert_eq!(
        translation.sql,
        "CREATE TABLE IF NOT EXISTS \"users\"\n(\n\
         \tid INTEGER PRIMARY KEY NOT NULL,\n\
         \tname CHARACTER VARYING(50) NOT NULL,\n\
         \tactive BOOLEAN DEFAULT TRUE\n\
         );"
    );
    assert!(translation.warnings.is_empty());
}

#[test]
fn test_composite_primary_key_mysql() {
    let generated = create_table(&orders_table(), &GenerateOptions::new(Dialect::Mysql));
    assert_eq!(
        generated.sql,
        "CREATE TABLE IF NOT EXISTS `orders`\n(\n\
         \t`order_id` INT NOT NULL,\n\
         \t`line_no` INT NOT NULL,\n\
         \t`customer_id` INT NULL,\n\
         \tPRIMARY KEY(`order_id`, `line_no`)\n\
         );"
    );
}

#[test]
fn test_invalid_on_delete_is_dropped() {
    let mut table = orders_table();
    table.foreign_keys = vec![customer_key(Some("INVALID"))];

    let generated = create_table(&table, &GenerateOptions::new(Dialect::Mysql));
    assert!(generated.sql.contains(
        "CONSTRAINT `fk_orders_customer_id` FOREIGN KEY (`customer_id`) REFERENCES `customers`(`id`),"
    ));
    assert!(!generated.sql.contains("ON DELETE"));
    assert_eq!(
        generated.warnings,
        vec![Warning::InvalidForeignKeyAction {
            table: "orders".to_string(),
            constraint: "fk_orders_customer_id".to_string(),
            action: "INVALID".to_string(),
        }]
    );
}

#[test]
fn test_rows_are_batched() {
    let mut table = Table::new("readings");
    table.columns = vec![Column::new("id", "INT").primary(), Column::new("value", "DOUBLE")];
    table.data = (0..250)
        .map(|i| row(&[("id", json!(i)), ("value", json!(i as f64 / 2.0))]))
        .collect();

    let options = GenerateOptions {
        max_row: 100,
        ..GenerateOptions::new(Dialect::Postgresql)
    };
    let inserts = insert_statements(&table, &options);
    let rows: Vec<usize> = inserts
        .iter()
        .map(|sql| sql.lines().filter(|line| line.starts_with('(')).count())
        .collect();
    assert_eq!(rows, vec![100, 100, 50]);
    assert!(inserts
        .iter()
        .all(|sql| sql.starts_with("INSERT INTO \"readings\" (id, value) VALUES\n")));
}

#[test]
fn test_enum_on_sqlite_is_sized_text() {
    let mut table = Table::new("shirts");
    table.columns = vec![Column::new("size", "ENUM").with_values(["small", "medium", "large"])];

    let generated = create_table(&table, &GenerateOptions::new(Dialect::Sqlite));
    assert_eq!(
        generated.sql,
        "CREATE TABLE IF NOT EXISTS shirts\n(\n\tsize NVARCHAR(8) NULL\n);"
    );

    let generated = create_table(&table, &GenerateOptions::new(Dialect::Mariadb));
    assert!(generated
        .sql
        .contains("\t`size` enum('small','medium','large') NULL"));
}

// ============================================================================
// Properties
// ============================================================================

#[test]
fn test_required_columns_never_get_null() {
    let mut table = Table::new("required");
    table.columns = vec![
        Column::new("id", "BIGINT").primary(),
        Column::new("label", "VARCHAR").with_length(20).not_null(),
        Column::new("enabled", "BOOLEAN").not_null(),
        Column::new("ratio", "FLOAT").not_null(),
    ];
    table.data = vec![
        row(&[("id", Value::Null), ("label", Value::Null)]),
        row(&[("id", json!("")), ("enabled", json!("null")), ("ratio", json!(" "))]),
        Row::new(),
    ];

    for dialect in Dialect::ALL {
        for sql in insert_statements(&table, &GenerateOptions::new(dialect)) {
            let values = sql.split_once("VALUES").unwrap().1;
            assert!(!values.contains("null"), "{}: {}", dialect, sql);
        }
    }

    let mysql = insert_statements(&table, &GenerateOptions::new(Dialect::Mysql));
    assert!(mysql[0].ends_with("(0, '', 0, 0),\n(0, '', 0, 0),\n(0, '', 0, 0);"));
}

#[test]
fn test_composite_key_has_single_clause_in_every_dialect() {
    let mut table = orders_table();
    // flags on the columns must not produce inline markers
    table.mark_primary("order_id");
    table.mark_primary("line_no");

    for dialect in Dialect::ALL {
        let sql = create_table(&table, &GenerateOptions::new(dialect)).sql;
        assert_eq!(sql.matches("PRIMARY KEY").count(), 1, "{}", dialect);
        assert!(sql.contains(&format!(
            "PRIMARY KEY({})",
            dialect.quote_columns(&table.primary_key)
        )));
    }
}

#[test]
fn test_foreign_key_reuses_declared_index() {
    let mut table = orders_table();
    table.foreign_keys = vec![customer_key(Some("cascade"))];
    table.indexes = vec![Index {
        name: Some("idx_orders_by_customer".to_string()),
        columns: vec!["customer_id".to_string()],
        unique: false,
    }];

    let generated = create_table(&table, &GenerateOptions::new(Dialect::Postgresql));
    assert_eq!(generated.sql.matches("CREATE INDEX").count(), 1);
    assert!(generated.sql.ends_with(
        ");\nCREATE INDEX IF NOT EXISTS idx_orders_by_customer ON \"orders\" (customer_id);"
    ));
    assert!(generated.sql.contains("REFERENCES \"customers\"(id) ON DELETE CASCADE\n"));
    assert!(generated.warnings.is_empty());
}

#[test]
fn test_foreign_key_gets_supporting_index() {
    let mut table = orders_table();
    table.foreign_keys = vec![ForeignKey {
        name: Some("fk_orders_customer".to_string()),
        ..customer_key(None)
    }];

    let sql = create_table(&table, &GenerateOptions::new(Dialect::Sqlserver)).sql;
    assert!(sql.ends_with(");\nCREATE INDEX idx_orders_customer ON orders (customer_id);"));

    let sql = create_table(&table, &GenerateOptions::new(Dialect::Mysql)).sql;
    assert!(sql.contains("\tINDEX `idx_orders_customer` (`customer_id`)\n);"));

    let options = GenerateOptions {
        include_indexes: false,
        ..GenerateOptions::new(Dialect::Mysql)
    };
    assert!(!create_table(&table, &options).sql.contains("INDEX"));

    let options = GenerateOptions {
        include_foreign_keys: false,
        ..GenerateOptions::new(Dialect::Mysql)
    };
    let sql = create_table(&table, &options).sql;
    assert!(!sql.contains("FOREIGN KEY"));
    assert!(!sql.contains("INDEX"));
}

#[test]
fn test_duplicate_and_empty_indexes_are_reported() {
    let mut table = orders_table();
    table.indexes = vec![
        Index {
            name: Some("idx_pk_again".to_string()),
            columns: vec!["line_no".to_string(), "order_id".to_string()],
            unique: true,
        },
        Index {
            name: None,
            columns: Vec::new(),
            unique: false,
        },
    ];

    let generated = create_table(&table, &GenerateOptions::new(Dialect::Sqlite));
    assert!(!generated.sql.contains("CREATE UNIQUE INDEX"));
    assert_eq!(
        generated.warnings,
        vec![
            Warning::DuplicateIndex {
                table: "orders".to_string(),
                index: "idx_pk_again".to_string(),
            },
            Warning::IncompleteIndex {
                table: "orders".to_string(),
                index: "idx_orders_".to_string(),
            },
        ]
    );
}

#[test]
fn test_unsupported_type_falls_back_to_text() {
    let mut table = Table::new("places");
    table.columns = vec![Column::new("shape", "GEOGRAPHY")];

    let generated = create_table(&table, &GenerateOptions::new(Dialect::Sqlserver));
    assert!(generated.sql.contains("\tshape NVARCHAR(MAX) NULL"));
    assert!(matches!(
        generated.warnings.as_slice(),
        [Warning::UnsupportedType { data_type, .. }] if data_type == "GEOGRAPHY"
    ));
}

#[test]
fn test_json_model_with_multi_word_types() {
    let tables = parse_model_json(
        r#"[
            {
                "name": "readings",
                "columns": [
                    { "name": "label", "type": "character varying", "length": 40, "nullable": false },
                    { "name": "taken_at", "type": "timestamp with time zone" },
                    { "name": "value", "type": "double precision", "nullable": false }
                ]
            }
        ]"#,
    )
    .unwrap();
    let table = &tables[0];

    let postgres = create_table(table, &GenerateOptions::new(Dialect::Postgresql));
    assert!(postgres.sql.contains("\tlabel CHARACTER VARYING(40) NOT NULL,\n"));
    assert!(postgres.sql.contains("\ttaken_at TIMESTAMP WITH TIME ZONE NULL,\n"));
    assert!(postgres.sql.contains("\tvalue DOUBLE PRECISION NOT NULL\n"));
    assert!(postgres.warnings.is_empty());

    let mysql = create_table(table, &GenerateOptions::new(Dialect::Mysql));
    assert!(mysql.sql.contains("\t`label` VARCHAR(40) NOT NULL,\n"));
    assert!(mysql.sql.contains("\t`value` DOUBLE NOT NULL\n"));

    let sqlite = create_table(table, &GenerateOptions::new(Dialect::Sqlite));
    assert!(sqlite.sql.contains("\tlabel NVARCHAR(40) NOT NULL,\n"));
    assert!(sqlite.warnings.is_empty());
}

#[test]
fn test_default_lengths() {
    let mut table = Table::new("notes");
    table.columns = vec![Column::new("title", "VARCHAR")];

    let mysql = create_table(&table, &GenerateOptions::new(Dialect::Mysql)).sql;
    assert!(mysql.contains("`title` VARCHAR(255) NULL"));
    let sqlserver = create_table(&table, &GenerateOptions::new(Dialect::Sqlserver)).sql;
    assert!(sqlserver.contains("title NVARCHAR(MAX) NULL"));
    let postgres = create_table(&table, &GenerateOptions::new(Dialect::Postgresql)).sql;
    assert!(postgres.contains("title CHARACTER VARYING NULL"));
}

#[test]
fn test_generate_script_with_data() {
    let mut flags = Table::new("flags");
    flags.columns = vec![
        Column::new("code", "CHAR").with_length(3).primary(),
        Column::new("enabled", "TINYINT")
            .with_length(1)
            .not_null()
            .with_default(DefaultValue::Literal("1".to_string())),
        Column::new("note", "TEXT"),
    ];
    flags.data = vec![
        row(&[("code", json!("abc")), ("enabled", json!("false")), ("note", json!("it's"))]),
        row(&[("code", json!("xyz")), ("note", json!("  "))]),
    ];
    let mut empty = Table::new("empty_table");
    empty.columns = vec![Column::new("id", "INT")];

    let generated = generate_script(
        &[flags, empty],
        &GenerateOptions::new(Dialect::Postgresql),
        true,
    );
    assert_eq!(
        generated.sql,
        "CREATE TABLE IF NOT EXISTS \"flags\"\n(\n\
         \tcode CHAR(3) PRIMARY KEY NOT NULL,\n\
         \tenabled BOOLEAN NOT NULL DEFAULT TRUE,\n\
         \tnote TEXT NULL\n\
         );\n\n\
         INSERT INTO \"flags\" (code, enabled, note) VALUES\n\
         (E'abc', FALSE, E'it''s'),\n\
         (E'xyz', TRUE, null);\n\n\
         CREATE TABLE IF NOT EXISTS \"empty_table\"\n(\n\tid INTEGER NULL\n);"
    );
    assert!(generated.warnings.is_empty());
}
