//! Unit tests for script parsing

use ddlkit::{parse_create_table, parse_script, DefaultValue, Warning};

// ============================================================================
// MySQL dumps
// ============================================================================

const MYSQL_DUMP: &str = r#"-- MySQL dump 10.13
/*!40101 SET NAMES utf8mb4 */;
DROP TABLE IF EXISTS `products`;
CREATE TABLE `products` (
  `id` int(10) unsigned NOT NULL AUTO_INCREMENT,
  `sku` varchar(32) NOT NULL,
  `title` varchar(200) DEFAULT NULL,
  `size` enum('small','medium','large') NOT NULL DEFAULT 'medium',
  `price` decimal(8,2) NOT NULL DEFAULT '0.00',
  `in_stock` tinyint(1) NOT NULL DEFAULT 1,
  `updated_at` timestamp NULL DEFAULT CURRENT_TIMESTAMP ON UPDATE CURRENT_TIMESTAMP,
  `notes` text COMMENT 'internal notes',
  PRIMARY KEY (`id`),
  UNIQUE KEY `uq_products_sku` (`sku`),
  KEY `idx_products_title` (`title`),
  FULLTEXT KEY `ft_products_notes` (`notes`)
) ENGINE=InnoDB AUTO_INCREMENT=42 DEFAULT CHARSET=utf8mb4;
LOCK TABLES `products` WRITE;
UNLOCK TABLES;
"#;

#[test]
fn test_mysql_dump_columns() {
    let script = parse_script(MYSQL_DUMP);
    assert!(script.warnings.is_empty());
    assert_eq!(script.dropped_tables, vec!["products"]);
    assert_eq!(script.tables.len(), 1);

    let table = &script.tables[0];
    assert_eq!(table.name, "products");
    let names: Vec<&str> = table.columns.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["id", "sku", "title", "size", "price", "in_stock", "updated_at", "notes"]
    );

    let id = table.column("id").unwrap();
    assert_eq!(id.data_type, "INT");
    assert_eq!(id.length, Some(10));
    assert!(id.auto_increment);
    assert!(id.primary_key);
    assert!(!id.nullable);

    let title = table.column("title").unwrap();
    assert!(title.nullable);
    assert_eq!(title.default, Some(DefaultValue::Null));

    let size = table.column("size").unwrap();
    assert_eq!(size.data_type, "ENUM");
    assert_eq!(size.values, vec!["small", "medium", "large"]);
    assert_eq!(size.default, Some(DefaultValue::Literal("'medium'".to_string())));

    let price = table.column("price").unwrap();
    assert_eq!((price.length, price.scale), (Some(8), Some(2)));

    let updated_at = table.column("updated_at").unwrap();
    assert_eq!(
        updated_at.default,
        Some(DefaultValue::Literal("CURRENT_TIMESTAMP".to_string()))
    );

    let notes = table.column("notes").unwrap();
    assert_eq!(notes.description.as_deref(), Some("internal notes"));
    assert_eq!(notes.default, None);
}

#[test]
fn test_mysql_dump_keys_and_indexes() {
    let script = parse_script(MYSQL_DUMP);
    let table = &script.tables[0];

    assert_eq!(table.primary_key, vec!["id"]);
    assert!(!table.column("sku").unwrap().primary_key);

    // FULLTEXT is dropped, UNIQUE KEY and KEY become indexes
    let indexes: Vec<(Option<&str>, bool)> = table
        .indexes
        .iter()
        .map(|i| (i.name.as_deref(), i.unique))
        .collect();
    assert_eq!(
        indexes,
        vec![
            (Some("uq_products_sku"), true),
            (Some("idx_products_title"), false)
        ]
    );
}

#[test]
fn test_foreign_keys_inline_and_table_level() {
    let table = parse_create_table(
        "CREATE TABLE order_lines (
            order_id INT NOT NULL REFERENCES orders(id) ON DELETE CASCADE,
            product_id INT NOT NULL,
            CONSTRAINT fk_lines_product FOREIGN KEY (product_id) REFERENCES products (id) ON UPDATE NO ACTION
        )",
    )
    .unwrap();

    assert_eq!(table.foreign_keys.len(), 2);
    let inline = &table.foreign_keys[0];
    assert_eq!(inline.column_name, vec!["order_id"]);
    assert_eq!(inline.referenced_table, "orders");
    assert_eq!(inline.referenced_column, vec!["id"]);
    assert_eq!(inline.on_delete.as_deref(), Some("CASCADE"));

    let named = &table.foreign_keys[1];
    assert_eq!(named.name.as_deref(), Some("fk_lines_product"));
    assert_eq!(named.on_update.as_deref(), Some("NO ACTION"));
    assert_eq!(named.on_delete, None);
}

// ============================================================================
// PostgreSQL dumps
// ============================================================================

#[test]
fn test_postgres_dump_with_side_statements() {
    let sql = r#"
SET statement_timeout = 0;
CREATE SEQUENCE public.invoices_id_seq START WITH 1 INCREMENT BY 1;

CREATE TABLE public.invoices (
    id bigint DEFAULT nextval('invoices_id_seq'::regclass) NOT NULL,
    number character varying(20) COLLATE pg_catalog."default" NOT NULL,
    status character varying(12) DEFAULT 'draft'::character varying NOT NULL,
    total numeric(12,2) DEFAULT 0,
    paid boolean DEFAULT false,
    issued_at timestamp with time zone DEFAULT now(),
    CONSTRAINT invoices_pkey PRIMARY KEY (id)
);

ALTER TABLE public.invoices OWNER TO billing;
CREATE INDEX invoices_status_idx ON public.invoices USING btree (status);
COMMENT ON COLUMN public.invoices.number IS 'printed invoice number';
"#;
    let script = parse_script(sql);
    assert!(script.warnings.is_empty());
    assert_eq!(script.tables.len(), 1);

    let table = &script.tables[0];
    assert_eq!(table.name, "invoices");
    assert_eq!(table.primary_key, vec!["id"]);

    let id = table.column("id").unwrap();
    assert_eq!(id.data_type, "BIGINT");
    assert!(id.auto_increment);
    assert_eq!(id.default, None);

    let status = table.column("status").unwrap();
    assert_eq!(
        status.default,
        Some(DefaultValue::Literal("'draft'::character varying".to_string()))
    );
    assert!(!status.nullable);

    assert_eq!(table.column("paid").unwrap().data_type, "BOOLEAN");
    assert_eq!(table.column("issued_at").unwrap().data_type, "TIMESTAMPTZ");
    assert_eq!(
        table.column("number").unwrap().description.as_deref(),
        Some("printed invoice number")
    );

    assert_eq!(table.indexes.len(), 1);
    assert_eq!(table.indexes[0].name.as_deref(), Some("invoices_status_idx"));
    assert_eq!(table.indexes[0].columns, vec!["status"]);
}

// ============================================================================
// SQL Server scripts
// ============================================================================

#[test]
fn test_sqlserver_batches_and_brackets() {
    let sql = "CREATE TABLE [dbo].[Customers]\r\n(\r\n\
               \x20   [Id] INT IDENTITY(1,1) NOT NULL,\r\n\
               \x20   [Name] NVARCHAR(100) NOT NULL,\r\n\
               \x20   [Active] BIT NOT NULL DEFAULT ((0)),\r\n\
               \x20   CONSTRAINT [PK_Customers] PRIMARY KEY CLUSTERED ([Id] ASC)\r\n\
               )\r\nGO\r\n\
               CREATE NONCLUSTERED INDEX [IX_Customers_Name] ON [dbo].[Customers] ([Name] ASC)\r\nGO\r\n";

    let script = parse_script(sql);
    assert!(script.warnings.is_empty());
    let table = &script.tables[0];
    assert_eq!(table.name, "Customers");
    assert_eq!(table.primary_key, vec!["Id"]);
    assert!(table.column("Id").unwrap().auto_increment);
    assert_eq!(table.column("Name").unwrap().length, Some(100));
    assert_eq!(
        table.column("Active").unwrap().default,
        Some(DefaultValue::Literal("0".to_string()))
    );
    assert_eq!(table.indexes.len(), 1);
    assert_eq!(table.indexes[0].columns, vec!["Name"]);
}

#[test]
fn test_delimiter_blocks_are_skipped() {
    let sql = "CREATE TABLE a (id INT);\n\
               DELIMITER $$\n\
               CREATE TRIGGER trg BEFORE INSERT ON a FOR EACH ROW BEGIN SET NEW.id = 1; END$$\n\
               DELIMITER ;\n\
               CREATE TABLE b (id INT);";
    let script = parse_script(sql);
    let names: Vec<&str> = script.tables.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["a", "b"]);
    assert!(script.warnings.is_empty());
}

// ============================================================================
// Failure isolation
// ============================================================================

#[test]
fn test_malformed_statements_are_reported_per_statement() {
    let sql = "CREATE TABLE ok_one (id INT);\n\n\
               CREATE TABLE no_body AS SELECT 1;\n\
               CREATE TABLE only_keys (PRIMARY KEY (id));\n\
               CREATE TABLE ok_two (id INT);";
    let script = parse_script(sql);

    let names: Vec<&str> = script.tables.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["ok_one", "ok_two"]);

    let lines: Vec<(usize, usize)> = script
        .warnings
        .iter()
        .map(|w| match w {
            Warning::MalformedStatement {
                statement, line, ..
            } => (*statement, *line),
            other => panic!("unexpected warning {:?}", other),
        })
        .collect();
    assert_eq!(lines, vec![(2, 3), (3, 4)]);
}

#[test]
fn test_unparseable_column_item_does_not_fail_table() {
    let table = parse_create_table(
        "CREATE TABLE shapes (id INT PRIMARY KEY, outline GEOMETRY NOT NULL, label VARCHAR(20))",
    )
    .unwrap();
    let names: Vec<&str> = table.columns.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["id", "label"]);
}
