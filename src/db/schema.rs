//! Static schema context for InventoryDB.
//!
//! The service does not introspect the database; the eleven documented
//! tables are declared here and rendered into the text block that every
//! prompt embeds. The rendering mirrors the `Table(\n  Column PK,\n ...)`
//! shape the model was tuned against.

use std::sync::OnceLock;

/// Key annotation on a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyRef {
    /// Primary key column.
    Primary,
    /// Foreign key column referencing `table.column`.
    Foreign {
        table: &'static str,
        column: &'static str,
    },
}

/// A column in the schema context.
#[derive(Debug, Clone, Copy)]
pub struct ColumnDef {
    pub name: &'static str,
    pub key: Option<KeyRef>,
}

impl ColumnDef {
    /// Creates a plain column with no key annotation.
    pub const fn new(name: &'static str) -> Self {
        Self { name, key: None }
    }

    /// Creates a primary key column.
    pub const fn primary(name: &'static str) -> Self {
        Self {
            name,
            key: Some(KeyRef::Primary),
        }
    }

    /// Creates a foreign key column referencing `table.column`.
    pub const fn references(
        name: &'static str,
        table: &'static str,
        column: &'static str,
    ) -> Self {
        Self {
            name,
            key: Some(KeyRef::Foreign { table, column }),
        }
    }

    fn render(&self) -> String {
        match self.key {
            None => self.name.to_string(),
            Some(KeyRef::Primary) => format!("{} PK", self.name),
            Some(KeyRef::Foreign { table, column }) => {
                format!("{} FK -> {}.{}", self.name, table, column)
            }
        }
    }
}

/// A table in the schema context.
#[derive(Debug, Clone)]
pub struct TableDef {
    pub name: &'static str,
    pub columns: Vec<ColumnDef>,
}

impl TableDef {
    pub fn new(name: &'static str, columns: Vec<ColumnDef>) -> Self {
        Self { name, columns }
    }

    fn render(&self) -> String {
        let column_lines = self
            .columns
            .iter()
            .map(|c| format!("  {}", c.render()))
            .collect::<Vec<_>>()
            .join(",\n");
        format!("{}(\n{}\n)", self.name, column_lines)
    }
}

/// The complete schema context embedded in prompts.
#[derive(Debug, Clone)]
pub struct SchemaContext {
    pub tables: Vec<TableDef>,
}

impl SchemaContext {
    /// Formats the schema for inclusion in the LLM prompt.
    pub fn format_for_prompt(&self) -> String {
        self.tables
            .iter()
            .map(TableDef::render)
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Returns the names of all tables in the context.
    pub fn table_names(&self) -> Vec<&'static str> {
        self.tables.iter().map(|t| t.name).collect()
    }
}

/// Returns the fixed InventoryDB schema context.
pub fn inventory_schema() -> &'static SchemaContext {
    static SCHEMA: OnceLock<SchemaContext> = OnceLock::new();
    SCHEMA.get_or_init(build_inventory_schema)
}

fn build_inventory_schema() -> SchemaContext {
    use ColumnDef as C;

    SchemaContext {
        tables: vec![
            TableDef::new(
                "Customers",
                vec![
                    C::primary("CustomerId"),
                    C::new("CustomerCode"),
                    C::new("CustomerName"),
                    C::new("Email"),
                    C::new("Phone"),
                    C::new("BillingCity"),
                    C::new("BillingCountry"),
                    C::new("IsActive"),
                ],
            ),
            TableDef::new(
                "Vendors",
                vec![
                    C::primary("VendorId"),
                    C::new("VendorCode"),
                    C::new("VendorName"),
                    C::new("Email"),
                    C::new("Phone"),
                    C::new("City"),
                    C::new("Country"),
                    C::new("IsActive"),
                ],
            ),
            TableDef::new(
                "Sites",
                vec![
                    C::primary("SiteId"),
                    C::new("SiteCode"),
                    C::new("SiteName"),
                    C::new("City"),
                    C::new("Country"),
                    C::new("IsActive"),
                ],
            ),
            TableDef::new(
                "Locations",
                vec![
                    C::primary("LocationId"),
                    C::references("SiteId", "Sites", "SiteId"),
                    C::new("LocationCode"),
                    C::new("LocationName"),
                    C::new("ParentLocationId"),
                    C::new("IsActive"),
                ],
            ),
            TableDef::new(
                "Items",
                vec![
                    C::primary("ItemId"),
                    C::new("ItemCode"),
                    C::new("ItemName"),
                    C::new("Category"),
                    C::new("UnitOfMeasure"),
                    C::new("IsActive"),
                ],
            ),
            TableDef::new(
                "Assets",
                vec![
                    C::primary("AssetId"),
                    C::new("AssetTag"),
                    C::new("AssetName"),
                    C::references("SiteId", "Sites", "SiteId"),
                    C::references("LocationId", "Locations", "LocationId"),
                    C::new("SerialNumber"),
                    C::new("Category"),
                    C::new("Status"),
                    C::new("Cost"),
                    C::new("PurchaseDate"),
                    C::references("VendorId", "Vendors", "VendorId"),
                ],
            ),
            TableDef::new(
                "Bills",
                vec![
                    C::primary("BillId"),
                    C::references("VendorId", "Vendors", "VendorId"),
                    C::new("BillNumber"),
                    C::new("BillDate"),
                    C::new("DueDate"),
                    C::new("TotalAmount"),
                    C::new("Currency"),
                    C::new("Status"),
                ],
            ),
            TableDef::new(
                "PurchaseOrders",
                vec![
                    C::primary("POId"),
                    C::new("PONumber"),
                    C::references("VendorId", "Vendors", "VendorId"),
                    C::new("PODate"),
                    C::new("Status"),
                    C::references("SiteId", "Sites", "SiteId"),
                ],
            ),
            TableDef::new(
                "PurchaseOrderLines",
                vec![
                    C::primary("POLineId"),
                    C::references("POId", "PurchaseOrders", "POId"),
                    C::new("LineNumber"),
                    C::references("ItemId", "Items", "ItemId"),
                    C::new("ItemCode"),
                    C::new("Quantity"),
                    C::new("UnitPrice"),
                ],
            ),
            TableDef::new(
                "SalesOrders",
                vec![
                    C::primary("SOId"),
                    C::new("SONumber"),
                    C::references("CustomerId", "Customers", "CustomerId"),
                    C::new("SODate"),
                    C::new("Status"),
                    C::references("SiteId", "Sites", "SiteId"),
                ],
            ),
            TableDef::new(
                "SalesOrderLines",
                vec![
                    C::primary("SOLineId"),
                    C::references("SOId", "SalesOrders", "SOId"),
                    C::new("LineNumber"),
                    C::references("ItemId", "Items", "ItemId"),
                    C::new("ItemCode"),
                    C::new("Quantity"),
                    C::new("UnitPrice"),
                ],
            ),
            TableDef::new(
                "AssetTransactions",
                vec![
                    C::primary("AssetTxnId"),
                    C::references("AssetId", "Assets", "AssetId"),
                    C::references("FromLocationId", "Locations", "LocationId"),
                    C::references("ToLocationId", "Locations", "LocationId"),
                    C::new("TxnType"),
                    C::new("Quantity"),
                    C::new("TxnDate"),
                ],
            ),
        ],
    }
}
