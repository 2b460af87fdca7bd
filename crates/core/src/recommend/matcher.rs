use crate::catalog::Catalog;
use crate::domain::product::{Category, Product};
use crate::domain::profile::SkinProfile;

/// Catalog entries in `category` that suit the profile, in catalog order.
///
/// A product suits the profile when its skin type is the profile's or the
/// universal `All`, and, when the profile carries concern tags, when at least
/// one of its own tags is among them. No candidates is a normal outcome and
/// yields an empty vector.
pub fn match_products(
    catalog: &Catalog,
    category: Category,
    profile: &SkinProfile,
) -> Vec<Product> {
    matching(catalog, category, profile).cloned().collect()
}

pub(crate) fn matching<'a>(
    catalog: &'a Catalog,
    category: Category,
    profile: &'a SkinProfile,
) -> impl Iterator<Item = &'a Product> + 'a {
    catalog.iter().filter(move |product| {
        product.category == category
            && profile.skin_type.accepts(product.skin_type)
            && (profile.concern_tags.is_empty() || profile.intersects(&product.concern_tags))
    })
}
