//! # Supplier Registry and Balances

use chrono::Utc;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use shoebox_core::validation::{validate_optional_text, validate_supplier_name};
use shoebox_core::{Supplier, SupplierBalance, SupplierPayment};

use crate::error::{EngineError, EngineResult};
use crate::Engine;

const MAX_DETAIL_LEN: usize = 500;

/// Input for [`Engine::create_supplier`].
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSupplier {
    pub name: String,
    #[serde(default)]
    pub contact: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl Engine {
    pub async fn create_supplier(&self, input: NewSupplier) -> EngineResult<Supplier> {
        validate_supplier_name(&input.name)?;

        let supplier = Supplier {
            id: Uuid::new_v4().to_string(),
            name: input.name.trim().to_string(),
            contact: validate_optional_text("contact", input.contact.as_deref(), MAX_DETAIL_LEN)?,
            address: validate_optional_text("address", input.address.as_deref(), MAX_DETAIL_LEN)?,
            notes: validate_optional_text("notes", input.notes.as_deref(), MAX_DETAIL_LEN)?,
            created_at: Utc::now(),
        };

        self.db.suppliers().insert(&supplier).await?;

        info!(supplier_id = %supplier.id, name = %supplier.name, "Supplier created");
        Ok(supplier)
    }

    pub async fn get_supplier(&self, id: &str) -> EngineResult<Supplier> {
        self.db
            .suppliers()
            .get_by_id(id)
            .await?
            .ok_or_else(|| EngineError::not_found("Supplier", id))
    }

    pub async fn list_suppliers(&self) -> EngineResult<Vec<Supplier>> {
        Ok(self.db.suppliers().list().await?)
    }

    pub async fn payments_by_supplier(&self, supplier_id: &str) -> EngineResult<Vec<SupplierPayment>> {
        self.require_supplier(supplier_id).await?;
        Ok(self.db.payments().list_by_supplier(supplier_id).await?)
    }

    /// Outstanding credit for one supplier, derived from its rows on every call.
    ///
    /// A negative outstanding amount means the store has paid more than it
    /// owes and holds credit in its favor.
    pub async fn supplier_balance(&self, supplier_id: &str) -> EngineResult<SupplierBalance> {
        self.require_supplier(supplier_id).await?;

        let purchases = self.db.purchases().list_by_supplier(supplier_id).await?;
        let payments = self.db.payments().list_by_supplier(supplier_id).await?;

        Ok(SupplierBalance::compute(supplier_id, &purchases, &payments))
    }

    pub(crate) async fn require_supplier(&self, supplier_id: &str) -> EngineResult<()> {
        if self.db.suppliers().exists(supplier_id).await? {
            Ok(())
        } else {
            Err(EngineError::not_found("Supplier", supplier_id))
        }
    }
}
