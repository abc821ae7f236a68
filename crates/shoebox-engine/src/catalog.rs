//! # Catalog
//!
//! The engine only reads the catalog. Registration exists so products (and
//! their declared sizes) can be put in place by the back office.

use chrono::Utc;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use shoebox_core::validation::{validate_price, validate_product_name};
use shoebox_core::{Money, Product, SizeSet};

use crate::error::{EngineError, EngineResult};
use crate::Engine;

/// Declared sizes as sent by a client: a JSON list (strings or numbers) or
/// encoded text.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SizesInput {
    List(Vec<serde_json::Value>),
    Encoded(String),
}

impl SizesInput {
    fn into_size_set(self) -> EngineResult<SizeSet> {
        let sizes = match self {
            SizesInput::List(values) => {
                SizeSet::parse(&serde_json::Value::Array(values).to_string())?
            }
            SizesInput::Encoded(text) => SizeSet::parse(&text)?,
        };
        Ok(sizes)
    }
}

impl From<&str> for SizesInput {
    fn from(text: &str) -> Self {
        SizesInput::Encoded(text.to_string())
    }
}

/// Input for [`Engine::register_product`].
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub name: String,
    pub sizes: SizesInput,
    /// List price, local minor units.
    pub price_cents: i64,
    /// Cost basis, foreign minor units.
    pub cost_cents: i64,
}

impl Engine {
    pub async fn register_product(&self, input: NewProduct) -> EngineResult<Product> {
        validate_product_name(&input.name)?;
        validate_price("list price", Money::from_cents(input.price_cents))?;
        validate_price("cost price", Money::from_cents(input.cost_cents))?;
        let sizes = input.sizes.into_size_set()?;

        let now = Utc::now();
        let product = Product {
            id: Uuid::new_v4().to_string(),
            name: input.name.trim().to_string(),
            sizes,
            price_cents: input.price_cents,
            cost_cents: input.cost_cents,
            is_active: true,
            created_at: now,
            updated_at: now,
        };

        self.db.products().insert(&product).await?;

        info!(product_id = %product.id, name = %product.name, sizes = product.sizes.len(), "Product registered");
        Ok(product)
    }

    pub async fn get_product(&self, id: &str) -> EngineResult<Product> {
        self.db
            .products()
            .get_by_id(id)
            .await?
            .ok_or_else(|| EngineError::not_found("Product", id))
    }

    /// Loads a product and checks that `size` is one of its declared sizes.
    pub(crate) async fn resolve_variant(&self, product_id: &str, size: &str) -> EngineResult<Product> {
        let product = self.get_product(product_id).await?;

        if !product.offers_size(size) {
            return Err(EngineError::not_found(
                "Size",
                format!("{} / {}", product_id, size),
            ));
        }

        Ok(product)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::engine;
    use shoebox_core::{CoreError, ValidationError};

    #[tokio::test]
    async fn test_register_and_get() {
        let engine = engine().await;
        let product = engine
            .register_product(NewProduct {
                name: "  Boot Ranger ".to_string(),
                sizes: SizesInput::List(vec![serde_json::json!("40"), serde_json::json!(41)]),
                price_cents: 8_000_000,
                cost_cents: 3500,
            })
            .await
            .unwrap();

        assert_eq!(product.name, "Boot Ranger");
        assert!(product.offers_size("41"));
        let loaded = engine.get_product(&product.id).await.unwrap();
        assert_eq!(loaded.sizes, product.sizes);
    }

    #[tokio::test]
    async fn test_register_rejects_bad_sizes() {
        let engine = engine().await;
        let err = engine
            .register_product(NewProduct {
                name: "Dup".to_string(),
                sizes: "40,40".into(),
                price_cents: 100,
                cost_cents: 1,
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err.as_domain(),
            Some(CoreError::Validation(ValidationError::Duplicate { .. }))
        ));
    }

    #[tokio::test]
    async fn test_unknown_product_and_size() {
        let engine = engine().await;
        assert!(matches!(
            engine.get_product("nope").await.unwrap_err().as_domain(),
            Some(CoreError::NotFound { .. })
        ));

        let product = crate::test_support::shoe(&engine, "40,41").await;
        assert!(engine.resolve_variant(&product.id, "41").await.is_ok());
        assert!(matches!(
            engine.resolve_variant(&product.id, "45").await.unwrap_err().as_domain(),
            Some(CoreError::NotFound { .. })
        ));
    }

    #[test]
    fn test_sizes_input_accepts_both_shapes() {
        let list: NewProduct = serde_json::from_str(
            r#"{"name":"A","sizes":["40","41"],"priceCents":1,"costCents":1}"#,
        )
        .unwrap();
        assert!(matches!(list.sizes, SizesInput::List(_)));

        let text: NewProduct = serde_json::from_str(
            r#"{"name":"A","sizes":"40,41","priceCents":1,"costCents":1}"#,
        )
        .unwrap();
        assert!(matches!(text.sizes, SizesInput::Encoded(_)));
    }
}
