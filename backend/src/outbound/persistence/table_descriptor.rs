//! Static description of the `fulfillment_address` table.
//!
//! Diesel's `table!` macro gives compile-time column types but says nothing
//! about defaults or partial indexes. This descriptor fills that gap and
//! renders the DDL that the migration ships, so the two can be compared in
//! tests and dumped by `fulfillment-schema-dump`.

/// PostgreSQL column types used by the address table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Text,
    Jsonb,
    Timestamptz,
}

impl ColumnType {
    /// SQL spelling of the type.
    pub fn sql(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Jsonb => "jsonb",
            Self::Timestamptz => "timestamptz",
        }
    }
}

/// Server-side column default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnDefault {
    None,
    Now,
}

/// One column of a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnDescriptor {
    pub name: &'static str,
    pub column_type: ColumnType,
    pub nullable: bool,
    pub default: ColumnDefault,
    pub primary_key: bool,
}

impl ColumnDescriptor {
    const fn text(name: &'static str) -> Self {
        Self {
            name,
            column_type: ColumnType::Text,
            nullable: true,
            default: ColumnDefault::None,
            primary_key: false,
        }
    }

    fn definition(&self) -> String {
        let mut sql = format!("\"{}\" {}", self.name, self.column_type.sql());
        if !self.nullable {
            sql.push_str(" NOT NULL");
        }
        if self.default == ColumnDefault::Now {
            sql.push_str(" DEFAULT now()");
        }
        sql
    }
}

/// A secondary index, optionally partial.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexDescriptor {
    pub name: &'static str,
    pub columns: &'static [&'static str],
    pub predicate: Option<&'static str>,
    pub unique: bool,
}

impl IndexDescriptor {
    /// Render an idempotent `CREATE INDEX` statement for `table`.
    ///
    /// ```
    /// use fulfillment::outbound::persistence::table_descriptor::IndexDescriptor;
    ///
    /// let index = IndexDescriptor {
    ///     name: "IDX_demo_live",
    ///     columns: &["owner_id"],
    ///     predicate: Some("deleted_at IS NULL"),
    ///     unique: false,
    /// };
    /// assert_eq!(
    ///     index.create_statement("demo"),
    ///     r#"CREATE INDEX IF NOT EXISTS "IDX_demo_live" ON "demo" (owner_id) WHERE deleted_at IS NULL"#
    /// );
    /// ```
    pub fn create_statement(&self, table: &str) -> String {
        let unique = if self.unique { "UNIQUE " } else { "" };
        let mut sql = format!(
            "CREATE {unique}INDEX IF NOT EXISTS \"{}\" ON \"{table}\" ({})",
            self.name,
            self.columns.join(", ")
        );
        if let Some(predicate) = self.predicate {
            sql.push_str(" WHERE ");
            sql.push_str(predicate);
        }
        sql
    }
}

/// Columns and indexes of one table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableDescriptor {
    pub name: &'static str,
    pub columns: &'static [ColumnDescriptor],
    pub indexes: &'static [IndexDescriptor],
}

impl TableDescriptor {
    /// Look up a column by name.
    pub fn column(&self, name: &str) -> Option<&ColumnDescriptor> {
        self.columns.iter().find(|column| column.name == name)
    }

    /// Column names in declaration order.
    pub fn column_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.columns.iter().map(|column| column.name)
    }

    pub fn create_table_statement(&self) -> String {
        let mut lines: Vec<String> = self
            .columns
            .iter()
            .map(|column| format!("    {}", column.definition()))
            .collect();
        let keys: Vec<String> = self
            .columns
            .iter()
            .filter(|column| column.primary_key)
            .map(|column| format!("\"{}\"", column.name))
            .collect();
        if !keys.is_empty() {
            lines.push(format!(
                "    CONSTRAINT \"{}_pkey\" PRIMARY KEY ({})",
                self.name,
                keys.join(", ")
            ));
        }
        format!(
            "CREATE TABLE IF NOT EXISTS \"{}\" (\n{}\n)",
            self.name,
            lines.join(",\n")
        )
    }

    pub fn create_index_statements(&self) -> Vec<String> {
        self.indexes
            .iter()
            .map(|index| index.create_statement(self.name))
            .collect()
    }

    /// Full DDL: the table followed by its indexes, one statement per
    /// paragraph, each terminated by `;`.
    pub fn ddl(&self) -> String {
        let mut statements = vec![self.create_table_statement()];
        statements.extend(self.create_index_statements());
        let mut ddl = statements.join(";\n\n");
        ddl.push_str(";\n");
        ddl
    }
}

/// Descriptor for the `fulfillment_address` table.
pub static FULFILLMENT_ADDRESS_TABLE: TableDescriptor = TableDescriptor {
    name: "fulfillment_address",
    columns: &[
        ColumnDescriptor {
            name: "id",
            column_type: ColumnType::Text,
            nullable: false,
            default: ColumnDefault::None,
            primary_key: true,
        },
        ColumnDescriptor::text("fulfillment_id"),
        ColumnDescriptor::text("company"),
        ColumnDescriptor::text("first_name"),
        ColumnDescriptor::text("last_name"),
        ColumnDescriptor::text("address_1"),
        ColumnDescriptor::text("address_2"),
        ColumnDescriptor::text("city"),
        ColumnDescriptor::text("country_code"),
        ColumnDescriptor::text("province"),
        ColumnDescriptor::text("postal_code"),
        ColumnDescriptor::text("phone"),
        ColumnDescriptor {
            name: "metadata",
            column_type: ColumnType::Jsonb,
            nullable: true,
            default: ColumnDefault::None,
            primary_key: false,
        },
        ColumnDescriptor {
            name: "created_at",
            column_type: ColumnType::Timestamptz,
            nullable: false,
            default: ColumnDefault::Now,
            primary_key: false,
        },
        ColumnDescriptor {
            name: "updated_at",
            column_type: ColumnType::Timestamptz,
            nullable: false,
            default: ColumnDefault::Now,
            primary_key: false,
        },
        ColumnDescriptor {
            name: "deleted_at",
            column_type: ColumnType::Timestamptz,
            nullable: true,
            default: ColumnDefault::None,
            primary_key: false,
        },
    ],
    indexes: &[
        IndexDescriptor {
            name: "IDX_fulfillment_address_fulfillment_id",
            columns: &["fulfillment_id"],
            predicate: Some("deleted_at IS NULL"),
            unique: false,
        },
        IndexDescriptor {
            name: "IDX_fulfillment_address_deleted_at",
            columns: &["deleted_at"],
            predicate: Some("deleted_at IS NOT NULL"),
            unique: false,
        },
    ],
};
