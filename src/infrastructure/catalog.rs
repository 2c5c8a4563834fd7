//! Product catalog loading

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::shared::errors::AppError;
use crate::shared::types::Product;

/// Load the catalog. Failure here aborts the run: with no catalog there is
/// nothing to resolve.
pub fn load_catalog(path: &Path) -> Result<Vec<Product>, AppError> {
    let raw = fs::read_to_string(path)
        .map_err(|e| AppError::CatalogError(format!("read {}: {}", path.display(), e)))?;
    let products: Vec<Product> = serde_json::from_str(&raw)
        .map_err(|e| AppError::CatalogError(format!("parse {}: {}", path.display(), e)))?;

    let mut seen = HashSet::new();
    for product in &products {
        if !seen.insert(product.id.as_str()) {
            return Err(AppError::CatalogError(format!(
                "duplicate product id {:?}",
                product.id
            )));
        }
    }
    Ok(products)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn parses_a_catalog_with_source_aliases() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("products.json");
        // `offers`/`site`/`akakce_url` are the keys older catalogs used
        fs::write(
            &path,
            r#"[
                {
                    "id": "gpu-1",
                    "name": "Example GPU",
                    "akakce_url": "https://example.com/ref",
                    "offers": [
                        {"site": "storea", "url": "https://a.example.com/gpu"},
                        {"store": "storeb", "url": "https://b.example.com/gpu"}
                    ]
                }
            ]"#,
        )
        .unwrap();

        let products = load_catalog(&path).unwrap();
        assert_eq!(products.len(), 1);
        let product = &products[0];
        assert_eq!(product.reference_url.as_deref(), Some("https://example.com/ref"));
        assert_eq!(product.sources.len(), 2);
        assert_eq!(product.sources[0].store, "storea");
        assert_eq!(product.sources[1].store, "storeb");
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("products.json");
        fs::write(
            &path,
            r#"[
                {"id": "x", "name": "One", "sources": []},
                {"id": "x", "name": "Two", "sources": []}
            ]"#,
        )
        .unwrap();
        assert!(load_catalog(&path).is_err());
    }

    #[test]
    fn missing_catalog_is_an_error() {
        let dir = tempdir().unwrap();
        assert!(load_catalog(&dir.path().join("nope.json")).is_err());
    }
}
