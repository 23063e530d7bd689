//! Reference-data service
//!
//! Quality, colour, product type, and storage location are homogeneous
//! id -> name lookup tables. The table is selected by a tagged variant, so
//! the SQL identifier always comes from a static match, never from request
//! input, and every variant supports the same create/update/delete/get/
//! list operations.

use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use shared::models::{MasterNames, RefItem};
use shared::validation::validate_ref_name;

use crate::error::{AppError, AppResult};

/// The four reference lookup tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefTable {
    Quality,
    Colour,
    ProductType,
    StorageLocation,
}

impl RefTable {
    /// SQL table identifier; static by construction
    pub fn table_name(&self) -> &'static str {
        match self {
            RefTable::Quality => "quality",
            RefTable::Colour => "colour",
            RefTable::ProductType => "product_type",
            RefTable::StorageLocation => "storage_location",
        }
    }

    /// Display name for messages
    pub fn display_name(&self) -> &'static str {
        match self {
            RefTable::Quality => "Quality",
            RefTable::Colour => "Colour",
            RefTable::ProductType => "Product type",
            RefTable::StorageLocation => "Storage location",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "quality" => Some(RefTable::Quality),
            "colour" => Some(RefTable::Colour),
            "product_type" => Some(RefTable::ProductType),
            "storage_location" => Some(RefTable::StorageLocation),
            _ => None,
        }
    }
}

/// Input for creating or renaming a reference item
#[derive(Debug, Deserialize)]
pub struct RefItemInput {
    pub name: String,
}

/// Reference-data service
#[derive(Clone)]
pub struct RefDataService {
    db: PgPool,
}

impl RefDataService {
    /// Create a new RefDataService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Create a new item, rejecting case-insensitive duplicates
    pub async fn create_item(&self, table: RefTable, input: RefItemInput) -> AppResult<RefItem> {
        let name = self.validated_name(&input.name)?;

        let exists = sqlx::query_scalar::<_, bool>(&format!(
            "SELECT EXISTS(SELECT 1 FROM {} WHERE LOWER(name) = LOWER($1))",
            table.table_name()
        ))
        .bind(&name)
        .fetch_one(&self.db)
        .await?;

        if exists {
            return Err(AppError::DuplicateEntry(format!(
                "{} name",
                table.display_name()
            )));
        }

        let item = sqlx::query_as::<_, (i32, String)>(&format!(
            "INSERT INTO {} (name) VALUES ($1) RETURNING id, name",
            table.table_name()
        ))
        .bind(&name)
        .fetch_one(&self.db)
        .await?;

        Ok(RefItem {
            id: item.0,
            name: item.1,
        })
    }

    /// Rename an item, rejecting case-insensitive duplicates among the
    /// other rows
    pub async fn update_item(
        &self,
        table: RefTable,
        item_id: i32,
        input: RefItemInput,
    ) -> AppResult<RefItem> {
        let name = self.validated_name(&input.name)?;

        let duplicate = sqlx::query_scalar::<_, bool>(&format!(
            "SELECT EXISTS(SELECT 1 FROM {} WHERE LOWER(name) = LOWER($1) AND id <> $2)",
            table.table_name()
        ))
        .bind(&name)
        .bind(item_id)
        .fetch_one(&self.db)
        .await?;

        if duplicate {
            return Err(AppError::DuplicateEntry(format!(
                "{} name",
                table.display_name()
            )));
        }

        let item = sqlx::query_as::<_, (i32, String)>(&format!(
            "UPDATE {} SET name = $1 WHERE id = $2 RETURNING id, name",
            table.table_name()
        ))
        .bind(&name)
        .bind(item_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound(table.display_name().to_string()))?;

        Ok(RefItem {
            id: item.0,
            name: item.1,
        })
    }

    /// Delete an item
    pub async fn delete_item(&self, table: RefTable, item_id: i32) -> AppResult<()> {
        let result = sqlx::query(&format!(
            "DELETE FROM {} WHERE id = $1",
            table.table_name()
        ))
        .bind(item_id)
        .execute(&self.db)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(table.display_name().to_string()));
        }

        Ok(())
    }

    /// Get one item by id
    pub async fn get_item(&self, table: RefTable, item_id: i32) -> AppResult<RefItem> {
        let item = sqlx::query_as::<_, (i32, String)>(&format!(
            "SELECT id, name FROM {} WHERE id = $1",
            table.table_name()
        ))
        .bind(item_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound(table.display_name().to_string()))?;

        Ok(RefItem {
            id: item.0,
            name: item.1,
        })
    }

    /// List all items of one table, ordered by name
    pub async fn list_items(&self, table: RefTable) -> AppResult<Vec<RefItem>> {
        let rows = sqlx::query_as::<_, (i32, String)>(&format!(
            "SELECT id, name FROM {} ORDER BY name",
            table.table_name()
        ))
        .fetch_all(&self.db)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(id, name)| RefItem { id, name })
            .collect())
    }

    /// All four lookup tables in one response
    pub async fn master_names(&self) -> AppResult<MasterNames> {
        Ok(MasterNames {
            qualities: self.list_items(RefTable::Quality).await?,
            colours: self.list_items(RefTable::Colour).await?,
            product_types: self.list_items(RefTable::ProductType).await?,
            storage_locations: self.list_items(RefTable::StorageLocation).await?,
        })
    }

    fn validated_name(&self, raw: &str) -> AppResult<String> {
        validate_ref_name(raw).map_err(|msg| AppError::Validation {
            field: "name".to_string(),
            message: msg.to_string(),
        })?;
        Ok(raw.trim().to_string())
    }
}
