use fake::Fake;
use fake::faker::lorem::en::{Sentence, Word};
use rayon::prelude::*;
use uuid::Uuid;

use letsplay_models::NewProduct;

pub const CATEGORIES: [&str; 5] = ["games", "consoles", "controllers", "accessories", "collectibles"];

pub fn generate_products(owner_ids: &[Uuid], per_owner: usize) -> Vec<NewProduct> {
    owner_ids
        .par_iter()
        .flat_map_iter(|owner_id| (0..per_owner).map(move |_| fake_product(*owner_id)))
        .collect()
}

fn fake_product(owner_id: Uuid) -> NewProduct {
    let word: String = Word().fake();
    let category = CATEGORIES[(0..CATEGORIES.len()).fake::<usize>()];
    let cents = (100..50_000).fake::<i64>();

    let mut name = format!("{word} {category}");
    if let Some(first) = name.get_mut(0..1) {
        first.make_ascii_uppercase();
    }

    NewProduct {
        name,
        description: Some(Sentence(4..10).fake()),
        price: cents as f64 / 100.0,
        category: Some(category.to_string()),
        stock: (0..200).fake(),
        owner_id,
    }
}
