use crate::domain::product::{parse_concern_tags, Category, Product, ProductId, SkinType};

/// Built-in studio catalog used when no catalog file is configured.
#[derive(Debug, Clone, Copy)]
struct ProductSeed {
    id: &'static str,
    brand: &'static str,
    name: &'static str,
    category: Category,
    skin_type: SkinType,
    concerns: &'static str,
    price: u64,
}

const PRODUCT_SEEDS: &[ProductSeed] = &[
    ProductSeed {
        id: "cln-gel-001",
        brand: "CeraVe",
        name: "Foaming Facial Cleanser",
        category: Category::Cleanser,
        skin_type: SkinType::Oily,
        concerns: "acne; oil control",
        price: 1_150,
    },
    ProductSeed {
        id: "cln-cream-002",
        brand: "Cetaphil",
        name: "Gentle Skin Cleanser",
        category: Category::Cleanser,
        skin_type: SkinType::All,
        concerns: "sensitivity; dryness",
        price: 899,
    },
    ProductSeed {
        id: "cln-bha-003",
        brand: "Minimalist",
        name: "Salicylic Acid Face Wash",
        category: Category::Cleanser,
        skin_type: SkinType::Oily,
        concerns: "acne; blackheads",
        price: 299,
    },
    ProductSeed {
        id: "tnr-ha-001",
        brand: "Klairs",
        name: "Supple Preparation Toner",
        category: Category::Toner,
        skin_type: SkinType::Dry,
        concerns: "dryness; sensitivity",
        price: 1_700,
    },
    ProductSeed {
        id: "tnr-aha-002",
        brand: "The Ordinary",
        name: "Glycolic Acid 7% Toning Solution",
        category: Category::Toner,
        skin_type: SkinType::Combination,
        concerns: "pigmentation; texture",
        price: 1_050,
    },
    ProductSeed {
        id: "srm-niac-001",
        brand: "The Ordinary",
        name: "Niacinamide 10% + Zinc 1%",
        category: Category::Serum,
        skin_type: SkinType::Oily,
        concerns: "acne; pores; oil control",
        price: 590,
    },
    ProductSeed {
        id: "srm-vitc-002",
        brand: "Minimalist",
        name: "Vitamin C 10% Brightening Serum",
        category: Category::Serum,
        skin_type: SkinType::All,
        concerns: "pigmentation; dullness",
        price: 699,
    },
    ProductSeed {
        id: "srm-ha-003",
        brand: "The Ordinary",
        name: "Hyaluronic Acid 2% + B5",
        category: Category::Serum,
        skin_type: SkinType::Dry,
        concerns: "dehydration; dryness",
        price: 650,
    },
    ProductSeed {
        id: "srm-alpha-004",
        brand: "Deconstruct",
        name: "Alpha Arbutin Pigment Corrector",
        category: Category::Serum,
        skin_type: SkinType::All,
        concerns: "dark spots; pigmentation",
        price: 749,
    },
    ProductSeed {
        id: "mst-gel-001",
        brand: "Neutrogena",
        name: "Hydro Boost Water Gel",
        category: Category::Moisturizer,
        skin_type: SkinType::Oily,
        concerns: "dehydration; oil control",
        price: 999,
    },
    ProductSeed {
        id: "mst-cream-002",
        brand: "CeraVe",
        name: "Moisturising Cream",
        category: Category::Moisturizer,
        skin_type: SkinType::Dry,
        concerns: "dryness; barrier repair",
        price: 1_250,
    },
    ProductSeed {
        id: "mst-light-003",
        brand: "Simple",
        name: "Light Hydrating Moisturiser",
        category: Category::Moisturizer,
        skin_type: SkinType::All,
        concerns: "sensitivity",
        price: 475,
    },
    ProductSeed {
        id: "spf-gel-001",
        brand: "La Roche-Posay",
        name: "Anthelios Invisible Fluid SPF 50+",
        category: Category::Sunscreen,
        skin_type: SkinType::All,
        concerns: "pigmentation; sun protection",
        price: 1_850,
    },
    ProductSeed {
        id: "spf-matte-002",
        brand: "Re'equil",
        name: "Oil Control Mattifying Sunscreen SPF 50",
        category: Category::Sunscreen,
        skin_type: SkinType::Oily,
        concerns: "oil control; sun protection",
        price: 595,
    },
    ProductSeed {
        id: "exf-bha-001",
        brand: "Paula's Choice",
        name: "2% BHA Liquid Exfoliant",
        category: Category::Exfoliant,
        skin_type: SkinType::Combination,
        concerns: "acne; blackheads; texture",
        price: 2_900,
    },
    ProductSeed {
        id: "exf-pha-002",
        brand: "COSRX",
        name: "AHA/BHA Clarifying Treatment",
        category: Category::Exfoliant,
        skin_type: SkinType::All,
        concerns: "texture; pigmentation",
        price: 1_100,
    },
];

pub(crate) fn seed_products() -> Vec<Product> {
    PRODUCT_SEEDS
        .iter()
        .map(|seed| Product {
            id: ProductId(seed.id.to_owned()),
            brand: seed.brand.to_owned(),
            name: seed.name.to_owned(),
            category: seed.category,
            skin_type: seed.skin_type,
            concern_tags: parse_concern_tags(seed.concerns),
            price: seed.price,
        })
        .collect()
}
