//! Common test utilities for ddlkit tests

use std::io::Write;

use ddlkit::Table;
use tempfile::NamedTempFile;

/// A MySQL dump with keys, indexes, a foreign key and value sets
pub const SHOP_SCHEMA: &str = r#"-- shop schema
DROP TABLE IF EXISTS `order_lines`;
DROP TABLE IF EXISTS `customers`;

CREATE TABLE IF NOT EXISTS `customers` (
  `id` int(11) NOT NULL AUTO_INCREMENT,
  `email` varchar(120) NOT NULL,
  `name` varchar(80) DEFAULT NULL,
  `tier` enum('basic','gold','platinum') NOT NULL DEFAULT 'basic',
  `active` tinyint(1) NOT NULL DEFAULT 1,
  `balance` decimal(10,2) DEFAULT '0.00',
  `created_at` datetime DEFAULT CURRENT_TIMESTAMP,
  PRIMARY KEY (`id`),
  UNIQUE KEY `uq_customers_email` (`email`)
) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4;

CREATE TABLE IF NOT EXISTS `order_lines` (
  `order_id` int(11) NOT NULL,
  `line_no` int(11) NOT NULL,
  `customer_id` int(11) NOT NULL,
  `note` text COMMENT 'free text',
  PRIMARY KEY (`order_id`, `line_no`),
  KEY `idx_order_lines_customer` (`customer_id`),
  CONSTRAINT `fk_order_lines_customer` FOREIGN KEY (`customer_id`) REFERENCES `customers` (`id`) ON DELETE CASCADE
) ENGINE=InnoDB;
"#;

/// Helper to create a temp SQL file with content
pub fn create_sql_file(content: &[u8]) -> NamedTempFile {
    create_file(".sql", content)
}

/// Helper to create a temp JSON model file with content
pub fn create_model_file(content: &str) -> NamedTempFile {
    create_file(".json", content.as_bytes())
}

fn create_file(suffix: &str, content: &[u8]) -> NamedTempFile {
    let mut file = NamedTempFile::with_suffix(suffix).unwrap();
    file.write_all(content).unwrap();
    file.flush().unwrap();
    file
}

/// Column name, nullability and primary key flag of every column
pub fn column_shape(table: &Table) -> Vec<(String, bool, bool)> {
    table
        .columns
        .iter()
        .map(|c| (c.name.clone(), c.nullable, c.primary_key))
        .collect()
}

/// Primary key as a sorted list
pub fn primary_key_set(table: &Table) -> Vec<String> {
    let mut keys = table.effective_primary_key();
    keys.sort();
    keys
}
