use tracing::info;

use crate::db::{ProductStore, StoreResult};
use crate::models::{NewProduct, Product};

struct Sample {
    name: &'static str,
    price: f64,
    image: &'static str,
    description: &'static str,
    category: &'static str,
}

static SAMPLES: &[Sample] = &[
    Sample {
        name: "T-shirt Noir Premium",
        price: 29.99,
        image: "https://images.unsplash.com/photo-1610502778270-c5c6f4c7d575",
        description: "T-shirt noir de qualité premium, 100% coton. Coupe moderne et confortable.",
        category: "Vêtements",
    },
    Sample {
        name: "Appareil Photo Zenit",
        price: 299.99,
        image: "https://images.unsplash.com/photo-1656452991253-7aad419e6cea",
        description: "Appareil photo vintage Zenit, parfait pour les amateurs de photographie analogique.",
        category: "Électronique",
    },
    Sample {
        name: "Écouteurs Apple",
        price: 199.99,
        image: "https://images.pexels.com/photos/14272792/pexels-photo-14272792.jpeg",
        description: "Écouteurs Apple blancs avec qualité audio exceptionnelle et design élégant.",
        category: "Électronique",
    },
    Sample {
        name: "Casque Audio Noir",
        price: 89.99,
        image: "https://images.unsplash.com/photo-1641563786213-185d68345426",
        description: "Casque audio noir professionnel avec réduction de bruit et confort optimal.",
        category: "Électronique",
    },
];

/// The fixed sample catalog, with fresh ids and timestamps.
pub fn sample_products() -> Vec<Product> {
    SAMPLES
        .iter()
        .map(|s| {
            Product::new(NewProduct {
                name: s.name.to_string(),
                price: s.price,
                image: s.image.to_string(),
                description: s.description.to_string(),
                category: s.category.to_string(),
            })
        })
        .collect()
}

/// Insert the sample catalog when the collection holds no products.
///
/// Returns how many products were inserted (zero when the collection was
/// already populated). Existing content is never compared against the samples.
/// The count and the insert are separate calls, so two instances starting
/// together on an empty store can both seed it.
pub async fn seed_if_empty(store: &dyn ProductStore) -> StoreResult<usize> {
    let existing = store.count().await?;
    if existing > 0 {
        info!(existing, "Collection already populated, skipping seed");
        return Ok(0);
    }

    let products = sample_products();
    store.insert_many(&products).await?;
    info!(count = products.len(), "Sample products initialized");
    Ok(products.len())
}
